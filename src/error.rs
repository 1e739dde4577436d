//! Navigation errors and outcomes
//!
//! Every navigation ends in exactly one [`NavigationOutcome`]. Errors never
//! escape the navigator; they are logged, shown as a retry panel, and
//! reported here.

use crate::page::PageError;
use std::fmt;

// ============================================================================
// Navigation Errors
// ============================================================================

/// Errors that can end a navigation attempt
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationError {
    /// A dynamic route segment failed validation (e.g. `/marketplace/edit/abc`).
    ///
    /// Unlike a missing route, this fails the navigation.
    InvalidRouteParam { path: String, segment: String },

    /// The page factory threw or its deferred result rejected
    PageFailed { path: String, message: String },

    /// Guards kept redirecting past the configured limit
    TooManyRedirects { path: String, limit: usize },
}

impl NavigationError {
    pub(crate) fn page_failed(path: &str, error: &PageError) -> Self {
        NavigationError::PageFailed {
            path: path.to_string(),
            message: error.message().to_string(),
        }
    }

    /// Canonical path of the navigation that failed
    pub fn path(&self) -> &str {
        match self {
            NavigationError::InvalidRouteParam { path, .. }
            | NavigationError::PageFailed { path, .. }
            | NavigationError::TooManyRedirects { path, .. } => path,
        }
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::InvalidRouteParam { segment, .. } => {
                write!(f, "Invalid identifier: {}", segment)
            }
            NavigationError::PageFailed { message, .. } => {
                write!(f, "{}", message)
            }
            NavigationError::TooManyRedirects { path, limit } => {
                write!(f, "Too many redirects ({}) while resolving {}", limit, path)
            }
        }
    }
}

impl std::error::Error for NavigationError {}

// ============================================================================
// Navigation Outcome
// ============================================================================

/// Result of a navigation attempt
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    /// The page was mounted
    Rendered { path: String },
    /// No route matched; the not-found page was mounted
    NotFound { path: String },
    /// A guard refused the route; its fallback view was mounted
    Denied { path: String, reason: String },
    /// The retry panel is showing
    Failed(NavigationError),
    /// A later navigation was issued before this one finished; nothing was committed
    Superseded { path: String },
}

impl NavigationOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, NavigationOutcome::Rendered { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, NavigationOutcome::NotFound { .. })
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, NavigationOutcome::Denied { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, NavigationOutcome::Failed(_))
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, NavigationOutcome::Superseded { .. })
    }

    /// Whether something was committed to the page container and history.
    pub fn is_committed(&self) -> bool {
        self.is_rendered() || self.is_not_found() || self.is_denied()
    }

    /// Canonical path this outcome refers to
    pub fn path(&self) -> &str {
        match self {
            NavigationOutcome::Rendered { path }
            | NavigationOutcome::NotFound { path }
            | NavigationOutcome::Denied { path, .. }
            | NavigationOutcome::Superseded { path } => path,
            NavigationOutcome::Failed(error) => error.path(),
        }
    }

    pub fn error(&self) -> Option<&NavigationError> {
        match self {
            NavigationOutcome::Failed(error) => Some(error),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
