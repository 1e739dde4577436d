//! Route guards
//!
//! Guards run after lookup and before the page factory. They decide whether a
//! route may render for the current session:
//!
//! - [`AuthGuard`] keeps signed-out visitors away from account pages
//!   (create ad, my ads, edit ad) and shows a sign-in panel instead.
//! - [`GuestGuard`] keeps signed-in users off the login and register pages.
//! - [`guard_fn`] turns a closure into a guard, including redirects.

use crate::config::NavigatorConfig;
use crate::navigator::NavigationRequest;
use crate::pages;
use crate::session::{Session, Storage};
use crate::view::View;
use std::rc::Rc;

/// Result of a guard check
#[derive(Debug, Clone, PartialEq)]
pub enum GuardResult {
    /// Allow navigation to proceed
    Allow,

    /// Render the guard's fallback view instead of the page
    Deny {
        /// Reason for denying navigation
        reason: String,
    },

    /// Resolve a different path within the same navigation
    Redirect {
        /// Path to redirect to
        to: String,
    },
}

impl GuardResult {
    pub fn allow() -> Self {
        GuardResult::Allow
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        GuardResult::Deny {
            reason: reason.into(),
        }
    }

    pub fn redirect(to: impl Into<String>) -> Self {
        GuardResult::Redirect { to: to.into() }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, GuardResult::Allow)
    }

    pub fn is_deny(&self) -> bool {
        matches!(self, GuardResult::Deny { .. })
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, GuardResult::Redirect { .. })
    }

    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            GuardResult::Redirect { to } => Some(to.as_str()),
            _ => None,
        }
    }
}

/// Trait for route guards
///
/// Checks are synchronous: everything a guard consults (the session token in
/// storage) is available without I/O.
///
/// # Example
///
/// ```
/// use portal_navigator::{GuardResult, NavigationRequest, RouteGuard};
///
/// struct ClosedForMaintenance;
///
/// impl RouteGuard for ClosedForMaintenance {
///     fn check(&self, _request: &NavigationRequest) -> GuardResult {
///         GuardResult::deny("The marketplace is closed for maintenance")
///     }
/// }
/// ```
pub trait RouteGuard {
    /// Decide whether the request may render
    fn check(&self, request: &NavigationRequest) -> GuardResult;

    /// View mounted when [`check`](Self::check) denies
    fn fallback(&self, reason: &str, _config: &NavigatorConfig) -> View {
        pages::access_denied(reason)
    }

    /// Guard name (for logs)
    fn name(&self) -> &str {
        "RouteGuard"
    }
}

/// Boxed route guard for dynamic dispatch
pub type BoxedGuard = Box<dyn RouteGuard>;

/// Create a guard from a closure
///
/// ```
/// use portal_navigator::{guard_fn, GuardResult};
///
/// let legacy = guard_fn(|request| {
///     if request.path == "/gallery" {
///         GuardResult::redirect("/about")
///     } else {
///         GuardResult::allow()
///     }
/// });
/// ```
pub fn guard_fn<F>(f: F) -> FnGuard<F>
where
    F: Fn(&NavigationRequest) -> GuardResult + 'static,
{
    FnGuard { f }
}

/// Guard created from a function or closure
pub struct FnGuard<F> {
    f: F,
}

impl<F> RouteGuard for FnGuard<F>
where
    F: Fn(&NavigationRequest) -> GuardResult + 'static,
{
    fn check(&self, request: &NavigationRequest) -> GuardResult {
        (self.f)(request)
    }

    fn name(&self) -> &str {
        "FnGuard"
    }
}

type AuthCheckFn = Box<dyn Fn() -> bool>;

/// Requires a signed-in session
pub struct AuthGuard {
    check_fn: AuthCheckFn,
}

impl AuthGuard {
    /// `check_fn` returns `true` when the visitor is signed in.
    pub fn new<F>(check_fn: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        Self {
            check_fn: Box::new(check_fn),
        }
    }

    /// Guard backed by a session's stored access token.
    pub fn from_session<S: Storage + 'static>(session: Rc<Session<S>>) -> Self {
        Self::new(move || session.is_authenticated())
    }
}

impl RouteGuard for AuthGuard {
    fn check(&self, _request: &NavigationRequest) -> GuardResult {
        if (self.check_fn)() {
            GuardResult::allow()
        } else {
            GuardResult::deny("Authentication required")
        }
    }

    fn fallback(&self, _reason: &str, config: &NavigatorConfig) -> View {
        pages::auth_required(&config.login_path)
    }

    fn name(&self) -> &str {
        "AuthGuard"
    }
}

/// Only for visitors who are not signed in
pub struct GuestGuard {
    check_fn: AuthCheckFn,
}

impl GuestGuard {
    /// `check_fn` returns `true` when the visitor is signed in.
    pub fn new<F>(check_fn: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        Self {
            check_fn: Box::new(check_fn),
        }
    }

    pub fn from_session<S: Storage + 'static>(session: Rc<Session<S>>) -> Self {
        Self::new(move || session.is_authenticated())
    }
}

impl RouteGuard for GuestGuard {
    fn check(&self, _request: &NavigationRequest) -> GuardResult {
        if (self.check_fn)() {
            GuardResult::deny("Already signed in")
        } else {
            GuardResult::allow()
        }
    }

    fn fallback(&self, _reason: &str, config: &NavigatorConfig) -> View {
        pages::already_signed_in(&config.signed_in_home)
    }

    fn name(&self) -> &str {
        "GuestGuard"
    }
}
