//! Link interception
//!
//! One delegated click listener for the whole document. Clicks on internal
//! links are turned into navigations; everything else is left to the
//! browser's default behavior.

use crate::navigator::{Navigate, PendingNavigation};
use crate::trace_log;

/// An element on a click's propagation path
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub tag: String,
    pub href: Option<String>,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            href: None,
        }
    }

    /// An `<a>` element with the given `href` attribute.
    pub fn link(href: impl Into<String>) -> Self {
        Self {
            tag: "a".to_string(),
            href: Some(href.into()),
        }
    }

    pub fn is_anchor(&self) -> bool {
        self.tag.eq_ignore_ascii_case("a")
    }
}

/// A click as seen by the document-level listener
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    /// Target first, then its ancestors up to the document
    pub path: Vec<Node>,
    default_prevented: bool,
}

impl ClickEvent {
    pub fn new(path: Vec<Node>) -> Self {
        Self {
            path,
            default_prevented: false,
        }
    }

    /// Nearest anchor at or above the click target, with or without an
    /// `href`. An `<a>` lacking `href` still ends the search, so an outer
    /// link around it is not considered.
    pub fn closest_anchor(&self) -> Option<&Node> {
        self.path.iter().find(|node| node.is_anchor())
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Whether a raw `href` attribute should be handled by the navigator.
///
/// Only same-origin absolute paths qualify. Fragment links (any `#`),
/// relative paths, protocol-relative (`//host`) and full URLs are skipped.
///
/// ```
/// use portal_navigator::interceptor::should_intercept;
///
/// assert!(should_intercept("/about"));
/// assert!(!should_intercept("/about#team"));
/// assert!(!should_intercept("https://example.com/"));
/// assert!(!should_intercept("//cdn.example.com/app.js"));
/// ```
pub fn should_intercept(href: &str) -> bool {
    !href.is_empty() && !href.contains('#') && href.starts_with('/') && !href.starts_with("//")
}

/// Document-level click handler that routes internal links
#[derive(Debug, Clone)]
pub struct LinkInterceptor<N: Navigate> {
    navigator: N,
}

impl<N: Navigate> LinkInterceptor<N> {
    pub fn new(navigator: N) -> Self {
        Self { navigator }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Handle a click.
    ///
    /// When the nearest anchor carries an internal `href`, the default action
    /// is suppressed and exactly one navigation is started with the raw
    /// `href`. Otherwise the event is left untouched and `None` is returned.
    pub fn handle_click(&self, event: &mut ClickEvent) -> Option<PendingNavigation> {
        let href = event.closest_anchor()?.href.clone()?;

        if !should_intercept(&href) {
            trace_log!("Leaving click on '{}' to the browser", href);
            return None;
        }

        event.prevent_default();
        trace_log!("Intercepted click on '{}'", href);
        Some(self.navigator.navigate(&href))
    }
}
