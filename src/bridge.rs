//! History bridge
//!
//! Keeps the rendered page in sync with the address bar on initial load and
//! on back/forward. The path always comes from the live location, never from
//! the entry's stored state, and neither event adds a history entry.

use crate::debug_log;
use crate::history::PopStateEvent;
use crate::navigator::{Location, Navigate, PendingNavigation};

/// Connects browser history events to a navigator
#[derive(Debug, Clone)]
pub struct HistoryBridge<N> {
    navigator: N,
}

impl<N: Navigate + Location> HistoryBridge<N> {
    pub fn new(navigator: N) -> Self {
        Self { navigator }
    }

    /// Render the page for the current location once the document is ready.
    pub fn on_load(&self) -> PendingNavigation {
        let path = self.navigator.pathname();
        debug_log!("Initial load at '{}'", path);
        self.navigator.restore(&path)
    }

    /// Render the page for the location the browser just moved to.
    pub fn on_pop_state(&self, event: &PopStateEvent) -> PendingNavigation {
        let path = self.navigator.pathname();
        debug_log!(
            "popstate to '{}' (entry state: {:?})",
            path,
            event.state.as_ref().map(|state| state.path.as_str())
        );
        self.navigator.restore(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NavigationOutcome;
    use crate::history::HistoryState;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct FakeNavigator {
        location: Rc<RefCell<String>>,
        restored: Rc<RefCell<Vec<String>>>,
        pushed: Rc<RefCell<Vec<String>>>,
    }

    impl Navigate for FakeNavigator {
        fn navigate(&self, path: &str) -> PendingNavigation {
            self.pushed.borrow_mut().push(path.to_string());
            let path = path.to_string();
            Box::pin(async move { NavigationOutcome::Rendered { path } })
        }

        fn restore(&self, path: &str) -> PendingNavigation {
            self.restored.borrow_mut().push(path.to_string());
            let path = path.to_string();
            Box::pin(async move { NavigationOutcome::Rendered { path } })
        }
    }

    impl Location for FakeNavigator {
        fn pathname(&self) -> String {
            self.location.borrow().clone()
        }
    }

    #[test]
    fn test_on_load_uses_location() {
        let navigator = FakeNavigator::default();
        *navigator.location.borrow_mut() = "/church.html".to_string();
        let bridge = HistoryBridge::new(navigator.clone());

        let outcome = pollster::block_on(bridge.on_load());
        assert!(outcome.is_rendered());
        assert_eq!(*navigator.restored.borrow(), vec!["/church.html".to_string()]);
        assert!(navigator.pushed.borrow().is_empty());
    }

    #[test]
    fn test_pop_state_ignores_entry_state() {
        let navigator = FakeNavigator::default();
        *navigator.location.borrow_mut() = "/about".to_string();
        let bridge = HistoryBridge::new(navigator.clone());

        let event = PopStateEvent {
            state: Some(HistoryState::new("/somewhere-else")),
        };
        pollster::block_on(bridge.on_pop_state(&event));

        let event = PopStateEvent { state: None };
        pollster::block_on(bridge.on_pop_state(&event));

        assert_eq!(
            *navigator.restored.borrow(),
            vec!["/about".to_string(), "/about".to_string()]
        );
        assert!(navigator.pushed.borrow().is_empty());
    }
}
