//! Portal Demo - Navigation Walkthrough
//!
//! Runs the portal routes against an in-memory browser: initial load, link
//! clicks, a failing page, a guarded page and back/forward.
//!
//! Run with `RUST_LOG=debug cargo run --example portal_demo` to see every
//! state transition.

use portal_navigator::interceptor::{ClickEvent, Node};
use portal_navigator::page::{load_fn, view_fn};
use portal_navigator::pages::{portal_routes, PortalPages};
use portal_navigator::session::LoginResponse;
use portal_navigator::view::{div, View};
use portal_navigator::*;
use std::rc::Rc;

fn main() {
    env_logger::init();

    let session = Rc::new(Session::new(MemoryStorage::new()));
    let config = NavigatorConfig::default();

    let pages = PortalPages {
        home: view_fn(|| {
            div()
                .class("home-page")
                .child(View::new("h1").text("Village portal"))
                .child(View::new("a").attr("href", "/church").text("Church"))
        }),
        church: load_fn(|| async {
            Ok(div()
                .class("church-page")
                .child(View::new("h1").text("Church"))
                .child(View::new("p").text("Sunday liturgy at 9:00")))
        }),
        history: view_fn(|| div().class("history-page").text("Founded in 1628")),
        ..PortalPages::placeholders()
    };

    let is_authenticated = {
        let session = Rc::clone(&session);
        move || session.is_authenticated()
    };
    let routes = portal_routes(pages, is_authenticated, &config);
    let router = Router::new(routes, MemoryBrowser::new("/index.html"), config);

    let bridge = HistoryBridge::new(router.clone());
    let links = LinkInterceptor::new(router.clone());

    report(&router, "load", pollster::block_on(bridge.on_load()));

    for href in ["/church.html", "/history/", "https://example.com/", "/marketplace/create"] {
        let mut click = ClickEvent::new(vec![Node::new("span"), Node::link(href)]);
        match links.handle_click(&mut click) {
            Some(pending) => report(&router, href, pollster::block_on(pending)),
            None => println!("{:<22} left to the browser", href),
        }
    }

    let login = LoginResponse {
        access: "demo-access".to_string(),
        refresh: "demo-refresh".to_string(),
        user: match serde_json::from_str(r#"{"id":1,"username":"demo"}"#) {
            Ok(user) => user,
            Err(err) => {
                eprintln!("bad demo user: {}", err);
                return;
            }
        },
    };
    if let Err(err) = session.sign_in(&login) {
        eprintln!("sign in failed: {}", err);
        return;
    }
    report(
        &router,
        "/marketplace/create",
        pollster::block_on(router.navigate("/marketplace/create")),
    );
    report(
        &router,
        "/marketplace/edit/x",
        pollster::block_on(router.navigate("/marketplace/edit/x")),
    );

    loop {
        let event = router.browser_mut().back();
        let Some(event) = event else { break };
        let path = router.pathname();
        let outcome = pollster::block_on(bridge.on_pop_state(&event));
        report(&router, &format!("back to {}", path), outcome);
    }

    println!();
    println!("{}", router.container().to_html());
}

fn report(router: &Router<MemoryBrowser>, action: &str, outcome: NavigationOutcome) {
    let shown = match router.container().content() {
        ContainerContent::Page(view) => {
            format!("<{} class=\"{}\">", view.tag(), view.classes().join(" "))
        }
        ContainerContent::Error(message) => format!("retry panel: {}", message),
        ContainerContent::Loading => "loader".to_string(),
        ContainerContent::Empty => "nothing".to_string(),
    };
    println!(
        "{:<22} {:<10} {:<40} history={}",
        action,
        outcome_label(&outcome),
        shown,
        router.browser().len()
    );
}

fn outcome_label(outcome: &NavigationOutcome) -> &'static str {
    match outcome {
        NavigationOutcome::Rendered { .. } => "rendered",
        NavigationOutcome::NotFound { .. } => "404",
        NavigationOutcome::Denied { .. } => "denied",
        NavigationOutcome::Failed(_) => "failed",
        NavigationOutcome::Superseded { .. } => "stale",
    }
}
