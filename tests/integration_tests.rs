//! Integration tests for portal_navigator
//!
//! These tests drive the router the way the page does: through the link
//! interceptor and the history bridge, against an in-memory browser.

use portal_navigator::interceptor::{ClickEvent, Node};
use portal_navigator::pages::{portal_routes, PortalPages};
use portal_navigator::page::{param_fn, view_fn};
use portal_navigator::view::{div, View};
use portal_navigator::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tokio::sync::oneshot;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn portal(signed_in: bool) -> Router<MemoryBrowser> {
    init_logger();
    let pages = PortalPages {
        home: view_fn(|| div().class("home-page")),
        about: view_fn(|| div().class("gallery-page")),
        church: Rc::new(|| -> Result<Page, PageError> {
            Err(PageError::new("church data unavailable"))
        }),
        edit_ad: param_fn(|id| async move {
            Ok(div().class("edit-ad-page").attr("data-ad-id", id))
        }),
        ..PortalPages::placeholders()
    };
    let config = NavigatorConfig::default();
    let routes = portal_routes(pages, move || signed_in, &config);
    Router::new(routes, MemoryBrowser::new("/"), config)
}

fn page_has_class(router: &Router<MemoryBrowser>, class: &str) -> bool {
    router
        .container()
        .page()
        .is_some_and(|page| page.has_class(class))
}

// ============================================================================
// Startup Tests
// ============================================================================

#[test]
fn test_initial_load_renders_location_without_push() {
    init_logger();
    let routes = RouteTable::new().route(Route::view("/about", || div().class("gallery-page")));
    let router = Router::new(
        routes,
        MemoryBrowser::new("/about.html"),
        NavigatorConfig::default(),
    );
    let bridge = HistoryBridge::new(router.clone());

    let outcome = pollster::block_on(bridge.on_load());

    assert!(outcome.is_rendered());
    assert!(page_has_class(&router, "gallery-page"));
    assert_eq!(router.current_path().as_deref(), Some("/about"));
    assert_eq!(router.browser().len(), 1);
}

#[test]
fn test_unknown_path_renders_not_found() {
    let router = portal(false);
    let outcome = pollster::block_on(router.navigate("/nonexistent"));

    assert!(outcome.is_not_found());
    assert!(page_has_class(&router, "error-page"));
    assert!(router.container().to_html().contains("404"));
}

// ============================================================================
// Link Interception Tests
// ============================================================================

#[test]
fn test_internal_link_navigates_once() {
    let router = portal(false);
    let links = LinkInterceptor::new(router.clone());

    let mut click = ClickEvent::new(vec![Node::new("img"), Node::link("/about")]);
    let pending = links.handle_click(&mut click).expect("internal link");

    assert!(click.default_prevented());
    assert!(router.container().is_loading());

    let outcome = pollster::block_on(pending);
    assert!(outcome.is_rendered());
    assert!(page_has_class(&router, "gallery-page"));
    assert_eq!(router.browser().len(), 2);
    assert_eq!(router.browser().pathname(), "/about");
}

#[test]
fn test_external_link_is_left_alone() {
    let router = portal(false);
    let links = LinkInterceptor::new(router.clone());

    let mut click = ClickEvent::new(vec![Node::link("https://external.example/x")]);
    assert!(links.handle_click(&mut click).is_none());

    assert!(!click.default_prevented());
    assert_eq!(router.generation(), 0);
    assert!(router.container().is_empty());
    assert_eq!(router.browser().len(), 1);
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[test]
fn test_failing_page_shows_retry_panel_then_recovers() {
    let router = portal(false);

    let outcome = pollster::block_on(router.navigate("/church"));
    assert!(outcome.is_failed());
    assert_eq!(router.state(), NavigatorState::Idle);
    assert_eq!(
        router.container().error_message(),
        Some("Failed to load page: church data unavailable")
    );
    assert!(router.container().to_html().contains("location.reload()"));
    assert_eq!(router.browser().len(), 1);

    let outcome = pollster::block_on(router.navigate("/about"));
    assert!(outcome.is_rendered());
    assert!(page_has_class(&router, "gallery-page"));
}

#[test]
fn test_invalid_edit_id_is_a_load_failure() {
    let router = portal(true);
    let outcome = pollster::block_on(router.navigate("/marketplace/edit/abc"));

    assert!(matches!(
        outcome,
        NavigationOutcome::Failed(NavigationError::InvalidRouteParam { .. })
    ));
    assert!(router.container().error_message().is_some());
    assert!(!page_has_class(&router, "error-page"));
}

// ============================================================================
// History Tests
// ============================================================================

#[test]
fn test_edit_page_then_back() {
    let router = portal(true);
    let bridge = HistoryBridge::new(router.clone());

    pollster::block_on(router.navigate("/"));
    assert!(page_has_class(&router, "home-page"));

    let pending = router.navigate("/marketplace/edit/7");
    assert!(router.container().is_loading());
    let outcome = pollster::block_on(pending);
    assert!(outcome.is_rendered());
    let id = router
        .container()
        .page()
        .and_then(|page| page.get_attr("data-ad-id").map(str::to_string));
    assert_eq!(id.as_deref(), Some("7"));

    let entries_before = router.browser().len();
    let event = router.browser_mut().back().expect("history entry");
    let outcome = pollster::block_on(bridge.on_pop_state(&event));

    assert!(outcome.is_rendered());
    assert!(page_has_class(&router, "home-page"));
    assert_eq!(router.browser().len(), entries_before);
    assert!(router.browser().can_go_forward());
}

#[test]
fn test_forward_after_back() {
    let router = portal(false);
    let bridge = HistoryBridge::new(router.clone());

    pollster::block_on(router.navigate("/about"));
    let event = router.browser_mut().back().expect("back");
    pollster::block_on(bridge.on_pop_state(&event));
    assert_eq!(router.current_path().as_deref(), Some("/"));

    let event = router.browser_mut().forward().expect("forward");
    pollster::block_on(bridge.on_pop_state(&event));
    assert!(page_has_class(&router, "gallery-page"));
    assert_eq!(router.browser().len(), 2);
}

// ============================================================================
// Guard Tests
// ============================================================================

#[cfg(feature = "guard")]
#[test]
fn test_account_pages_need_sign_in() {
    let router = portal(false);
    let outcome = pollster::block_on(router.navigate("/marketplace/my-ads"));

    assert!(outcome.is_denied());
    assert!(page_has_class(&router, "auth-required"));
    assert!(router.container().to_html().contains("href=\"/login\""));
}

#[cfg(feature = "guard")]
#[test]
fn test_edit_page_needs_sign_in() {
    let router = portal(false);
    let outcome = pollster::block_on(router.navigate("/marketplace/edit/7"));

    assert_eq!(
        outcome,
        NavigationOutcome::Denied {
            path: "/marketplace/edit/7".to_string(),
            reason: "Authentication required".to_string(),
        }
    );
    assert!(page_has_class(&router, "auth-required"));
    assert!(!page_has_class(&router, "edit-ad-page"));
    assert_eq!(router.browser().pathname(), "/marketplace/edit/7");
}

#[cfg(feature = "guard")]
#[test]
fn test_login_page_for_guests_only() {
    let guest = portal(false);
    assert!(pollster::block_on(guest.navigate("/login")).is_rendered());

    let member = portal(true);
    let outcome = pollster::block_on(member.navigate("/login"));
    assert!(outcome.is_denied());
    assert!(page_has_class(&member, "auth-redirect"));
}

#[cfg(feature = "guard")]
#[test]
fn test_guards_follow_session() {
    init_logger();
    let session = Rc::new(Session::new(MemoryStorage::new()));
    let routes = RouteTable::new().route(
        Route::view("/marketplace/create", || div().class("create-ad-page"))
            .guard(AuthGuard::from_session(session.clone())),
    );
    let router = Router::new(routes, MemoryBrowser::default(), NavigatorConfig::default());

    assert!(pollster::block_on(router.navigate("/marketplace/create")).is_denied());

    session
        .storage()
        .set(Session::<MemoryStorage>::ACCESS_TOKEN_KEY, "token");
    assert!(pollster::block_on(router.navigate("/marketplace/create")).is_rendered());
    assert!(page_has_class(&router, "create-ad-page"));
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[tokio::test]
async fn test_latest_navigation_wins() {
    init_logger();
    let (tx, rx) = oneshot::channel::<View>();
    let rx = Rc::new(RefCell::new(Some(rx)));
    let slow_calls = Rc::new(Cell::new(0));
    let calls = slow_calls.clone();

    let routes = RouteTable::new()
        .route(Route::load("/church", move || {
            calls.set(calls.get() + 1);
            let rx = rx.borrow_mut().take();
            async move {
                match rx {
                    Some(rx) => rx.await.map_err(|_| PageError::new("cancelled")),
                    None => Err(PageError::new("already loaded")),
                }
            }
        }))
        .route(Route::view("/about", || div().class("gallery-page")));
    let router = Router::new(routes, MemoryBrowser::default(), NavigatorConfig::default());
    let links = LinkInterceptor::new(router.clone());

    let mut first = ClickEvent::new(vec![Node::link("/church")]);
    let mut second = ClickEvent::new(vec![Node::link("/about")]);
    let slow = links.handle_click(&mut first).expect("first click");
    let fast = links.handle_click(&mut second).expect("second click");

    let (slow_outcome, fast_outcome) = tokio::join!(slow, async move {
        let outcome = fast.await;
        let _ = tx.send(div().class("church-page"));
        outcome
    });

    assert!(fast_outcome.is_rendered());
    assert!(slow_outcome.is_superseded());
    assert_eq!(slow_calls.get(), 1);
    assert!(page_has_class(&router, "gallery-page"));
    assert_eq!(router.browser().pathname(), "/about");
    assert_eq!(router.browser().len(), 2);
}
