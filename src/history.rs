//! Browser history abstraction
//!
//! The navigator never touches a real window. It talks to a [`Browser`]:
//! read the current location, push a history entry, scroll to the top.
//! [`MemoryBrowser`] is the in-process implementation used by tests, the demo
//! and any host that keeps its own history stack.

use serde::{Deserialize, Serialize};

/// How the window scrolls back to the top after a page is mounted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// State object stored with every pushed entry.
///
/// Serialises as `{"path": "<canonical path>"}`. Only its presence matters on
/// back/forward; the path is re-read from the location instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    pub path: String,
}

impl HistoryState {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Navigation history entry
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// URL path shown in the address bar for this entry
    pub path: String,
    /// State pushed with the entry; `None` for the entry the page loaded with
    pub state: Option<HistoryState>,
}

impl HistoryEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            state: None,
        }
    }

    pub fn with_state(path: impl Into<String>, state: HistoryState) -> Self {
        Self {
            path: path.into(),
            state: Some(state),
        }
    }
}

/// Back/forward notification, the equivalent of a `popstate` event.
#[derive(Debug, Clone, PartialEq)]
pub struct PopStateEvent {
    /// State of the entry that became current. May be `None` after a reload.
    pub state: Option<HistoryState>,
}

/// What the navigator needs from the hosting browser window
pub trait Browser {
    /// Current `location.pathname`
    fn pathname(&self) -> String;

    /// Push a new history entry (never replace)
    fn push_state(&mut self, state: HistoryState, url: &str);

    /// Scroll the window back to the top
    fn scroll_to_top(&mut self, behavior: ScrollBehavior);
}

/// In-memory browser with a bounded history stack
#[derive(Debug, Clone)]
pub struct MemoryBrowser {
    entries: Vec<HistoryEntry>,
    current: usize,
    /// Maximum history size (0 = unlimited)
    max_size: usize,
    scrolls: Vec<ScrollBehavior>,
}

impl MemoryBrowser {
    const DEFAULT_MAX_SIZE: usize = 1000;

    /// Open a window at `initial_path`. The first entry carries no state.
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self::with_max_size(initial_path, Self::DEFAULT_MAX_SIZE)
    }

    pub fn with_max_size(initial_path: impl Into<String>, max_size: usize) -> Self {
        Self {
            entries: vec![HistoryEntry::new(initial_path)],
            current: 0,
            max_size,
            scrolls: Vec::new(),
        }
    }

    pub fn current_entry(&self) -> &HistoryEntry {
        &self.entries[self.current]
    }

    /// Go back one entry, as the browser's back button does.
    pub fn back(&mut self) -> Option<PopStateEvent> {
        if !self.can_go_back() {
            return None;
        }
        self.current -= 1;
        Some(self.pop_event())
    }

    /// Go forward one entry.
    pub fn forward(&mut self) -> Option<PopStateEvent> {
        if !self.can_go_forward() {
            return None;
        }
        self.current += 1;
        Some(self.pop_event())
    }

    pub fn can_go_back(&self) -> bool {
        self.current > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.current + 1 < self.entries.len()
    }

    /// Number of entries in the stack
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Every scroll-to-top request received so far, oldest first
    pub fn scrolls(&self) -> &[ScrollBehavior] {
        &self.scrolls
    }

    fn pop_event(&self) -> PopStateEvent {
        PopStateEvent {
            state: self.current_entry().state.clone(),
        }
    }

    fn enforce_size_limit(&mut self) {
        if self.max_size > 0 && self.entries.len() > self.max_size {
            let excess = self.entries.len() - self.max_size;
            self.entries.drain(0..excess);
            self.current = self.current.saturating_sub(excess);
        }
    }
}

impl Default for MemoryBrowser {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Browser for MemoryBrowser {
    fn pathname(&self) -> String {
        self.current_entry().path.clone()
    }

    fn push_state(&mut self, state: HistoryState, url: &str) {
        // Pushing drops any forward entries
        self.entries.truncate(self.current + 1);
        self.entries.push(HistoryEntry::with_state(url, state));
        self.current = self.entries.len() - 1;
        self.enforce_size_limit();
    }

    fn scroll_to_top(&mut self, behavior: ScrollBehavior) {
        self.scrolls.push(behavior);
    }
}
