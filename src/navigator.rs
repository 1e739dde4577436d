//! The navigator
//!
//! [`Router`] owns the route table, the page container and the browser, and
//! drives every navigation through `Idle -> Loading -> Rendering -> Idle`, or
//! `Idle -> Loading -> Failed -> Idle` when something goes wrong.
//!
//! Calling [`Router::navigate`] does the synchronous part immediately (path
//! normalization and the loading placeholder) and hands back the rest as a
//! [`PendingNavigation`] for the host's executor to drive. Awaiting a
//! deferred page factory is the only suspension point.
//!
//! Each navigation carries a generation number. Only the most recently issued
//! navigation may commit anything; a slower, older one resolves to
//! [`NavigationOutcome::Superseded`] and leaves the page alone.

use crate::config::NavigatorConfig;
use crate::container::PageContainer;
use crate::error::{NavigationError, NavigationOutcome};
use crate::history::{Browser, HistoryState};
use crate::path::normalize;
use crate::route::RouteTable;
use crate::view::View;
use crate::{debug_log, error_log, trace_log};
#[cfg(feature = "guard")]
use crate::guards::GuardResult;
#[cfg(feature = "guard")]
use crate::route::RouteMatch;
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

// ============================================================================
// NavigationRequest
// ============================================================================

/// One navigation attempt.
///
/// # Example
///
/// ```
/// use portal_navigator::NavigationRequest;
///
/// let request = NavigationRequest::new("/about.html", 3);
/// assert_eq!(request.requested, "/about.html");
/// assert_eq!(request.path, "/about");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationRequest {
    /// Path as handed to the navigator
    pub requested: String,
    /// Canonical path being resolved
    pub path: String,
    /// Generation this request was issued under
    pub generation: u64,
}

impl NavigationRequest {
    pub fn new(requested: impl Into<String>, generation: u64) -> Self {
        let requested = requested.into();
        let path = normalize(&requested);
        Self {
            requested,
            path,
            generation,
        }
    }

    /// Same request, resolving a different path (after a guard redirect).
    fn redirected(&self, to: &str) -> Self {
        Self {
            requested: self.requested.clone(),
            path: normalize(to),
            generation: self.generation,
        }
    }
}

// ============================================================================
// Navigator state
// ============================================================================

/// Where the latest navigation is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorState {
    Idle,
    Loading,
    Rendering,
    Failed,
}

/// Whether a committed navigation adds a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// Push one new entry (link clicks, programmatic navigation)
    Push,
    /// Leave history alone (back/forward, initial load)
    Keep,
}

/// The deferred remainder of a navigation
pub type PendingNavigation = Pin<Box<dyn Future<Output = NavigationOutcome>>>;

/// Something that can start navigations
pub trait Navigate {
    /// Navigate to `path`, pushing a history entry on success.
    fn navigate(&self, path: &str) -> PendingNavigation;

    /// Render `path` without touching history.
    fn restore(&self, path: &str) -> PendingNavigation;
}

/// Read access to the current location
pub trait Location {
    /// Current `location.pathname`
    fn pathname(&self) -> String;
}

// ============================================================================
// Router
// ============================================================================

enum ResolvedKind {
    Rendered,
    NotFound,
    Denied { reason: String },
}

struct Resolved {
    path: String,
    view: View,
    kind: ResolvedKind,
}

struct RouterInner<B> {
    routes: RouteTable,
    container: RefCell<PageContainer>,
    browser: RefCell<B>,
    config: NavigatorConfig,
    generation: Cell<u64>,
    state: Cell<NavigatorState>,
    current: RefCell<Option<String>>,
}

/// Router - owns the route table, the page container and the browser
///
/// Cloning is cheap and yields another handle to the same router, which is
/// how the link interceptor and the history bridge reach it.
pub struct Router<B: Browser> {
    inner: Rc<RouterInner<B>>,
}

impl<B: Browser> Clone for Router<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<B: Browser + 'static> Router<B> {
    /// Create a router
    ///
    /// # Example
    ///
    /// ```
    /// use portal_navigator::{MemoryBrowser, NavigatorConfig, Route, RouteTable, Router};
    /// use portal_navigator::view::div;
    ///
    /// let routes = RouteTable::new().route(Route::view("/", || div().class("home")));
    /// let router = Router::new(routes, MemoryBrowser::new("/"), NavigatorConfig::default());
    ///
    /// let outcome = pollster::block_on(router.navigate("/index.html"));
    /// assert!(outcome.is_rendered());
    /// assert!(router.container().page().unwrap().has_class("home"));
    /// ```
    pub fn new(routes: RouteTable, browser: B, config: NavigatorConfig) -> Self {
        let container = PageContainer::new(&config);
        Self {
            inner: Rc::new(RouterInner {
                routes,
                container: RefCell::new(container),
                browser: RefCell::new(browser),
                config,
                generation: Cell::new(0),
                state: Cell::new(NavigatorState::Idle),
                current: RefCell::new(None),
            }),
        }
    }

    /// Navigate to `path`, pushing one history entry once the page is mounted.
    pub fn navigate(&self, path: &str) -> PendingNavigation {
        self.navigate_with(path, HistoryMode::Push)
    }

    /// Start a navigation.
    ///
    /// Before returning: the path is normalized, the generation is bumped and
    /// the loading placeholder replaces whatever the container held.
    pub fn navigate_with(&self, path: &str, mode: HistoryMode) -> PendingNavigation {
        let generation = self.inner.generation.get() + 1;
        self.inner.generation.set(generation);

        let request = NavigationRequest::new(path, generation);
        debug_log!(
            "Navigation #{}: '{}' -> '{}' ({:?})",
            generation,
            request.requested,
            request.path,
            mode
        );

        self.inner.state.set(NavigatorState::Loading);
        self.inner.container.borrow_mut().show_loading();

        let inner = Rc::clone(&self.inner);
        Box::pin(async move {
            let result = inner.resolve(&request).await;
            inner.commit(&request, mode, result)
        })
    }

    pub fn state(&self) -> NavigatorState {
        self.inner.state.get()
    }

    /// Generation of the most recently issued navigation
    pub fn generation(&self) -> u64 {
        self.inner.generation.get()
    }

    /// Canonical path of the last committed page
    pub fn current_path(&self) -> Option<String> {
        self.inner.current.borrow().clone()
    }

    pub fn container(&self) -> Ref<'_, PageContainer> {
        self.inner.container.borrow()
    }

    pub fn browser(&self) -> Ref<'_, B> {
        self.inner.browser.borrow()
    }

    /// Mutable browser access, e.g. to press back on a [`MemoryBrowser`].
    ///
    /// [`MemoryBrowser`]: crate::history::MemoryBrowser
    pub fn browser_mut(&self) -> RefMut<'_, B> {
        self.inner.browser.borrow_mut()
    }

    pub fn routes(&self) -> &RouteTable {
        &self.inner.routes
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.inner.config
    }
}

impl<B: Browser + 'static> Navigate for Router<B> {
    fn navigate(&self, path: &str) -> PendingNavigation {
        self.navigate_with(path, HistoryMode::Push)
    }

    fn restore(&self, path: &str) -> PendingNavigation {
        self.navigate_with(path, HistoryMode::Keep)
    }
}

impl<B: Browser> Location for Router<B> {
    fn pathname(&self) -> String {
        self.inner.browser.borrow().pathname()
    }
}

impl<B: Browser> fmt::Debug for Router<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("state", &self.inner.state.get())
            .field("generation", &self.inner.generation.get())
            .field("current", &self.inner.current.borrow())
            .field("routes", &self.inner.routes)
            .finish_non_exhaustive()
    }
}

impl<B: Browser> RouterInner<B> {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }

    /// Look up, run guards, invoke the factory and await it if deferred.
    async fn resolve(&self, request: &NavigationRequest) -> Result<Resolved, NavigationError> {
        #[cfg(feature = "guard")]
        let (path, matched) = match self.guarded_lookup(request)? {
            GuardOutcome::Allow { path, matched } => (path, matched),
            GuardOutcome::Deny { path, reason, view } => {
                return Ok(Resolved {
                    path,
                    view,
                    kind: ResolvedKind::Denied { reason },
                });
            }
        };
        #[cfg(not(feature = "guard"))]
        let (path, matched) = (request.path.clone(), self.routes.lookup(&request.path)?);

        trace_log!("Navigation #{} matched {:?}", request.generation, matched);

        let kind = if matched.is_not_found() {
            ResolvedKind::NotFound
        } else {
            ResolvedKind::Rendered
        };

        let page = matched
            .build()
            .map_err(|err| NavigationError::page_failed(&path, &err))?;

        if page.is_deferred() {
            trace_log!("Navigation #{} awaiting deferred page", request.generation);
        }
        let view = page
            .resolve()
            .await
            .map_err(|err| NavigationError::page_failed(&path, &err))?;

        Ok(Resolved { path, view, kind })
    }

    /// Lookup plus guards, following redirects up to `max_redirects`.
    #[cfg(feature = "guard")]
    fn guarded_lookup(
        &self,
        request: &NavigationRequest,
    ) -> Result<GuardOutcome<'_>, NavigationError> {
        let mut request = request.clone();
        let mut redirects = 0;

        'lookup: loop {
            let matched = self.routes.lookup(&request.path)?;

            for guard in matched.guards() {
                match guard.check(&request) {
                    GuardResult::Allow => {}
                    GuardResult::Deny { reason } => {
                        debug_log!("{} denied '{}': {}", guard.name(), request.path, reason);
                        let view = guard.fallback(&reason, &self.config);
                        return Ok(GuardOutcome::Deny {
                            path: request.path,
                            reason,
                            view,
                        });
                    }
                    GuardResult::Redirect { to } => {
                        redirects += 1;
                        if redirects > self.config.max_redirects {
                            return Err(NavigationError::TooManyRedirects {
                                path: request.path,
                                limit: self.config.max_redirects,
                            });
                        }
                        debug_log!(
                            "{} redirected '{}' -> '{}'",
                            guard.name(),
                            request.path,
                            to
                        );
                        request = request.redirected(&to);
                        continue 'lookup;
                    }
                }
            }

            return Ok(GuardOutcome::Allow {
                path: request.path,
                matched,
            });
        }
    }

    /// Apply a finished navigation, unless a newer one has been issued.
    fn commit(
        &self,
        request: &NavigationRequest,
        mode: HistoryMode,
        result: Result<Resolved, NavigationError>,
    ) -> NavigationOutcome {
        if let Err(error) = &result {
            error_log!("Failed to load page '{}': {}", request.path, error);
        }

        if !self.is_current(request.generation) {
            debug_log!(
                "Navigation #{} to '{}' superseded by #{}",
                request.generation,
                request.path,
                self.generation.get()
            );
            return NavigationOutcome::Superseded {
                path: request.path.clone(),
            };
        }

        match result {
            Ok(resolved) => {
                self.state.set(NavigatorState::Rendering);
                self.container.borrow_mut().show(resolved.view);

                {
                    let mut browser = self.browser.borrow_mut();
                    if mode == HistoryMode::Push {
                        browser.push_state(HistoryState::new(&resolved.path), &resolved.path);
                    }
                    browser.scroll_to_top(self.config.scroll_behavior);
                }

                *self.current.borrow_mut() = Some(resolved.path.clone());
                self.state.set(NavigatorState::Idle);
                debug_log!("Navigation #{} rendered '{}'", request.generation, resolved.path);

                match resolved.kind {
                    ResolvedKind::Rendered => NavigationOutcome::Rendered {
                        path: resolved.path,
                    },
                    ResolvedKind::NotFound => NavigationOutcome::NotFound {
                        path: resolved.path,
                    },
                    ResolvedKind::Denied { reason } => NavigationOutcome::Denied {
                        path: resolved.path,
                        reason,
                    },
                }
            }
            Err(error) => {
                self.state.set(NavigatorState::Failed);
                self.container
                    .borrow_mut()
                    .show_error(format!("{}{}", self.config.error_prefix, error));
                self.state.set(NavigatorState::Idle);
                NavigationOutcome::Failed(error)
            }
        }
    }
}

#[cfg(feature = "guard")]
enum GuardOutcome<'a> {
    Allow { path: String, matched: RouteMatch<'a> },
    Deny { path: String, reason: String, view: View },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{MemoryBrowser, ScrollBehavior};
    use crate::page::PageError;
    use crate::route::{DynamicRoute, Route};
    use crate::view::div;
    use tokio::sync::oneshot;

    fn router(routes: RouteTable) -> Router<MemoryBrowser> {
        Router::new(routes, MemoryBrowser::new("/"), NavigatorConfig::default())
    }

    fn basic_routes() -> RouteTable {
        RouteTable::new()
            .route(Route::view("/", || div().class("home")))
            .route(Route::view("/about", || div().class("gallery")))
            .route(Route::load("/church", || async { Ok(div().class("church-page")) }))
            .route(Route::new("/broken", || Err(PageError::new("boom"))))
            .route(Route::load("/offline", || async {
                Err(PageError::new("network down"))
            }))
            .dynamic(DynamicRoute::new("/marketplace/edit/", |id| async move {
                Ok(div().class("edit-ad-page").attr("data-ad-id", id))
            }))
    }

    #[test]
    fn test_request_normalizes() {
        let request = NavigationRequest::new("/church/index.html", 1);
        assert_eq!(request.path, "/church");
        assert_eq!(request.redirected("/login/").path, "/login");
    }

    #[test]
    fn test_loader_shown_before_resolution() {
        let router = router(basic_routes());
        let pending = router.navigate("/church");

        assert!(router.container().is_loading());
        assert_eq!(router.state(), NavigatorState::Loading);
        assert_eq!(router.browser().len(), 1);

        let outcome = pollster::block_on(pending);
        assert!(outcome.is_rendered());
        assert_eq!(router.state(), NavigatorState::Idle);
        assert!(router.container().page().unwrap().has_class("church-page"));
    }

    #[test]
    fn test_success_pushes_canonical_path_and_scrolls() {
        let router = router(basic_routes());
        let outcome = pollster::block_on(router.navigate("/about.html"));

        assert_eq!(
            outcome,
            NavigationOutcome::Rendered {
                path: "/about".to_string()
            }
        );
        let browser = router.browser();
        assert_eq!(browser.len(), 2);
        assert_eq!(browser.pathname(), "/about");
        assert_eq!(
            browser.current_entry().state,
            Some(HistoryState::new("/about"))
        );
        assert_eq!(browser.scrolls(), &[ScrollBehavior::Smooth]);
        drop(browser);
        assert_eq!(router.current_path(), Some("/about".to_string()));
    }

    #[test]
    fn test_dynamic_route_renders_with_id() {
        let router = router(basic_routes());
        let outcome = pollster::block_on(router.navigate("/marketplace/edit/7"));
        assert!(outcome.is_rendered());
        assert_eq!(
            router.container().page().unwrap().get_attr("data-ad-id"),
            Some("7")
        );
    }

    #[test]
    fn test_not_found_is_committed() {
        let router = router(basic_routes());
        let outcome = pollster::block_on(router.navigate("/nonexistent"));

        assert!(outcome.is_not_found());
        assert!(router.container().page().unwrap().has_class("error-page"));
        assert_eq!(router.browser().pathname(), "/nonexistent");
    }

    #[test]
    fn test_invalid_id_fails_not_404() {
        let router = router(basic_routes());
        let outcome = pollster::block_on(router.navigate("/marketplace/edit/abc"));

        assert!(matches!(
            outcome.error(),
            Some(NavigationError::InvalidRouteParam { .. })
        ));
        assert_eq!(
            router.container().error_message(),
            Some("Failed to load page: Invalid identifier: abc")
        );
        assert_eq!(router.browser().len(), 1);
    }

    #[test]
    fn test_sync_failure_then_recovery() {
        let router = router(basic_routes());

        let outcome = pollster::block_on(router.navigate("/broken"));
        assert!(outcome.is_failed());
        assert_eq!(router.state(), NavigatorState::Idle);
        assert_eq!(
            router.container().error_message(),
            Some("Failed to load page: boom")
        );
        assert!(router.browser().scrolls().is_empty());

        let outcome = pollster::block_on(router.navigate("/about"));
        assert!(outcome.is_rendered());
        assert!(router.container().page().unwrap().has_class("gallery"));
    }

    #[test]
    fn test_rejected_deferred_page_fails() {
        let router = router(basic_routes());
        let outcome = pollster::block_on(router.navigate("/offline"));

        assert_eq!(
            outcome,
            NavigationOutcome::Failed(NavigationError::PageFailed {
                path: "/offline".to_string(),
                message: "network down".to_string(),
            })
        );
        assert_eq!(router.state(), NavigatorState::Idle);
    }

    #[test]
    fn test_restore_keeps_history() {
        let router = router(basic_routes());
        pollster::block_on(router.navigate("/about"));
        let outcome = pollster::block_on(router.restore("/"));

        assert!(outcome.is_rendered());
        assert_eq!(router.browser().len(), 2);
        assert!(router.container().page().unwrap().has_class("home"));
    }

    #[test]
    fn test_generation_increments() {
        let router = router(basic_routes());
        assert_eq!(router.generation(), 0);
        let first = router.navigate("/");
        let second = router.navigate("/about");
        assert_eq!(router.generation(), 2);
        drop(first);
        pollster::block_on(second);
    }

    #[tokio::test]
    async fn test_slow_navigation_does_not_overwrite_later_one() {
        let (tx, rx) = oneshot::channel::<View>();
        let rx = Rc::new(RefCell::new(Some(rx)));

        let routes = RouteTable::new()
            .route(Route::load("/slow", move || {
                let rx = rx.borrow_mut().take();
                async move {
                    match rx {
                        Some(rx) => rx.await.map_err(|_| PageError::new("sender dropped")),
                        None => Err(PageError::new("already loaded")),
                    }
                }
            }))
            .route(Route::view("/fast", || div().class("fast")));
        let router = router(routes);

        let slow = router.navigate("/slow");
        let fast = router.navigate("/fast");

        let (slow_outcome, fast_outcome) = tokio::join!(slow, async move {
            let outcome = fast.await;
            tx.send(div().class("slow")).unwrap();
            outcome
        });

        assert!(fast_outcome.is_rendered());
        assert_eq!(
            slow_outcome,
            NavigationOutcome::Superseded {
                path: "/slow".to_string()
            }
        );
        assert!(router.container().page().unwrap().has_class("fast"));
        assert_eq!(router.browser().len(), 2);
        assert_eq!(router.browser().pathname(), "/fast");
    }

    #[tokio::test]
    async fn test_stale_failure_does_not_show_error() {
        let (tx, rx) = oneshot::channel::<View>();
        let rx = Rc::new(RefCell::new(Some(rx)));

        let routes = RouteTable::new()
            .route(Route::load("/slow", move || {
                let rx = rx.borrow_mut().take();
                async move {
                    match rx {
                        Some(rx) => rx.await.map_err(|_| PageError::new("sender dropped")),
                        None => Err(PageError::new("already loaded")),
                    }
                }
            }))
            .route(Route::view("/fast", || div().class("fast")));
        let router = router(routes);

        let slow = router.navigate("/slow");
        let fast = router.navigate("/fast");

        let (slow_outcome, _) = tokio::join!(slow, async move {
            let outcome = fast.await;
            drop(tx);
            outcome
        });

        assert!(slow_outcome.is_superseded());
        assert!(router.container().error_message().is_none());
        assert!(router.container().page().unwrap().has_class("fast"));
    }

    #[cfg(feature = "guard")]
    mod guarded {
        use super::*;
        use crate::guards::{guard_fn, AuthGuard, GuardResult};

        #[test]
        fn test_denied_route_mounts_fallback() {
            let routes = RouteTable::new().route(
                Route::view("/marketplace/create", || div().class("create-ad-page"))
                    .guard(AuthGuard::new(|| false)),
            );
            let router = router(routes);
            let outcome = pollster::block_on(router.navigate("/marketplace/create"));

            assert!(outcome.is_denied());
            assert!(router
                .container()
                .page()
                .unwrap()
                .has_class("auth-required"));
            assert_eq!(router.browser().pathname(), "/marketplace/create");
        }

        #[test]
        fn test_guard_redirect_resolves_target() {
            let routes = RouteTable::new()
                .route(Route::view("/about", || div().class("gallery")))
                .route(
                    Route::view("/gallery", || div())
                        .guard(guard_fn(|_| GuardResult::redirect("/about.html"))),
                );
            let router = router(routes);
            let outcome = pollster::block_on(router.navigate("/gallery"));

            assert_eq!(
                outcome,
                NavigationOutcome::Rendered {
                    path: "/about".to_string()
                }
            );
            assert_eq!(router.browser().len(), 2);
            assert_eq!(router.browser().pathname(), "/about");
        }

        #[test]
        fn test_redirect_loop_fails() {
            let routes = RouteTable::new()
                .route(Route::view("/a", div).guard(guard_fn(|_| GuardResult::redirect("/b"))))
                .route(Route::view("/b", div).guard(guard_fn(|_| GuardResult::redirect("/a"))));
            let router = Router::new(
                routes,
                MemoryBrowser::default(),
                NavigatorConfig::default().max_redirects(3),
            );
            let outcome = pollster::block_on(router.navigate("/a"));

            assert!(matches!(
                outcome.error(),
                Some(NavigationError::TooManyRedirects { limit: 3, .. })
            ));
            assert!(router.container().error_message().is_some());
        }
    }
}
