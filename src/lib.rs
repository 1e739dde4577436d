//! # Portal Navigator
//!
//! Client-side navigation for the community portal's single-page frontend:
//!
//! - **Path normalization** - `/about.html`, `/about/` and `/about` are one page
//! - **Route table** - static pages, `/marketplace/edit/<id>` and a 404 fallback
//! - **Async page loading** - loader first, then the page or a retry panel
//! - **Race safety** - a slow page never overwrites a newer navigation
//! - **Link interception** - internal `<a href>` clicks become navigations
//! - **History sync** - initial load and back/forward re-render from the location
//! - **Route guards** - account pages for signed-in users, login for guests
//!
//! # Quick Start
//!
//! ```
//! use portal_navigator::{
//!     DynamicRoute, HistoryBridge, LinkInterceptor, MemoryBrowser, NavigatorConfig, Route,
//!     RouteTable, Router,
//! };
//! use portal_navigator::interceptor::{ClickEvent, Node};
//! use portal_navigator::view::div;
//!
//! let routes = RouteTable::new()
//!     .route(Route::view("/", || div().class("home")))
//!     .route(Route::load("/church", || async { Ok(div().class("church-page")) }))
//!     .dynamic(DynamicRoute::new("/marketplace/edit/", |id| async move {
//!         Ok(div().class("edit-ad-page").attr("data-ad-id", id))
//!     }));
//!
//! let router = Router::new(routes, MemoryBrowser::new("/"), NavigatorConfig::default());
//! let bridge = HistoryBridge::new(router.clone());
//! let links = LinkInterceptor::new(router.clone());
//!
//! pollster::block_on(bridge.on_load());
//!
//! let mut click = ClickEvent::new(vec![Node::new("span"), Node::link("/church.html")]);
//! if let Some(pending) = links.handle_click(&mut click) {
//!     assert!(router.container().is_loading());
//!     pollster::block_on(pending);
//! }
//!
//! assert_eq!(router.current_path().as_deref(), Some("/church"));
//! assert!(router.container().page().unwrap().has_class("church-page"));
//! ```
//!
//! # Portal Routes
//!
//! [`pages::portal_routes`] wires every portal section to its canonical path:
//!
//! ```
//! use portal_navigator::pages::{portal_routes, PortalPages};
//! use portal_navigator::NavigatorConfig;
//!
//! let routes = portal_routes(PortalPages::placeholders(), || false, &NavigatorConfig::default());
//! assert!(routes.lookup("/marketplace/edit/42").unwrap().is_dynamic());
//! ```
//!
//! # Feature Flags
//!
//! - `log` (default) - Uses the standard `log` crate for logging
//! - `tracing` - Uses the `tracing` crate for structured logging (mutually exclusive with `log`)
//! - `guard` (default) - Route guards

#![cfg_attr(docsrs, feature(doc_cfg))]
// Lints are configured in Cargo.toml [lints] section

// Logging abstraction
pub mod logging;

// Building blocks
pub mod config;
pub mod path;
pub mod page;
pub mod view;

// Core navigation modules
pub mod container;
pub mod history;
pub mod navigator;
pub mod route;

// Error handling
pub mod error;

// Event plumbing
pub mod bridge;
pub mod interceptor;

// Guards
#[cfg(feature = "guard")]
pub mod guards;

// Portal pages and session
pub mod pages;
pub mod session;

pub use bridge::HistoryBridge;
pub use config::{ApiConfig, Environment, NavigatorConfig};
pub use container::{ContainerContent, PageContainer};
pub use error::{NavigationError, NavigationOutcome};
#[cfg(feature = "guard")]
pub use guards::{guard_fn, AuthGuard, BoxedGuard, FnGuard, GuardResult, GuestGuard, RouteGuard};
pub use history::{Browser, HistoryState, MemoryBrowser, PopStateEvent, ScrollBehavior};
pub use interceptor::LinkInterceptor;
pub use navigator::{
    HistoryMode, Location, Navigate, NavigationRequest, NavigatorState, PendingNavigation, Router,
};
pub use page::{Page, PageError, PageFactory, ParamPageFactory};
pub use path::normalize;
pub use route::{validate_route_path, DynamicRoute, Route, RouteMatch, RouteTable};
pub use session::{MemoryStorage, Session, Storage, User};
pub use view::View;
