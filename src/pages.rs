//! Built-in pages and the portal route table
//!
//! The navigator renders a handful of fixed fragments itself (loader, retry
//! panel, 404). The portal's content pages are supplied by the application
//! through [`PortalPages`] and wired to their canonical paths by
//! [`portal_routes`].

use crate::config::NavigatorConfig;
#[cfg(feature = "guard")]
use crate::guards::{AuthGuard, GuestGuard};
use crate::page::{param_fn, view_fn, Page, PageFactory, ParamPageFactory};
use crate::route::{DynamicRoute, Route, RouteTable};
use crate::view::{div, View};
#[cfg(feature = "guard")]
use std::rc::Rc;

/// Canonical portal paths
pub mod paths {
    pub const HOME: &str = "/";
    pub const ABOUT: &str = "/about";
    pub const HISTORY: &str = "/history";
    pub const CHURCH: &str = "/church";
    pub const MARKETPLACE: &str = "/marketplace";
    pub const LOGIN: &str = "/login";
    pub const REGISTER: &str = "/register";
    pub const CREATE_AD: &str = "/marketplace/create";
    pub const MY_ADS: &str = "/marketplace/my-ads";
    pub const EDIT_AD_PREFIX: &str = "/marketplace/edit/";
    pub const COMMUNITY_RULES: &str = "/community-rules";
}

// ============================================================================
// Fixed fragments
// ============================================================================

/// Spinner shown while a page loads
pub fn loader(text: &str) -> View {
    div()
        .class("page-loader")
        .child(div().class("spinner"))
        .child(View::new("p").text(text))
}

/// Error card with a full-reload button
pub fn retry_panel(message: &str, retry_label: &str) -> View {
    div().class("placeholder-content").class("card").class("retry-panel").child(
        div()
            .class("card-content")
            .child(View::new("p").class("error-message").text(message))
            .child(
                View::new("button")
                    .class("btn-primary")
                    .attr("type", "button")
                    .attr("data-action", "reload")
                    .attr("onclick", "location.reload()")
                    .text(retry_label),
            ),
    )
}

fn page_header(title: &str) -> View {
    div()
        .class("page-header")
        .child(View::new("h1").text(title))
}

fn card(content: View) -> View {
    div()
        .class("placeholder-content")
        .class("card")
        .child(content.class("card-content"))
}

/// The 404 page
pub fn not_found(config: &NavigatorConfig) -> View {
    div().class("error-page").child(page_header("404")).child(card(
        div()
            .child(View::new("p").class("error-message").text(&config.not_found_text))
            .child(
                View::new("a")
                    .class("btn-primary")
                    .attr("href", paths::HOME)
                    .text(&config.home_label),
            ),
    ))
}

/// Page for sections that are not built yet
pub fn placeholder(title: &str, text: &str) -> View {
    div().class("placeholder-page").child(page_header(title)).child(card(
        div()
            .child(View::new("p").class("placeholder-text").text(text))
            .child(
                View::new("p")
                    .class("placeholder-note")
                    .text("This page is under construction"),
            ),
    ))
}

/// Shown instead of account pages to signed-out visitors
pub fn auth_required(login_path: &str) -> View {
    div().class("auth-required").child(
        div().class("card").child(
            div()
                .class("card-content")
                .child(View::new("p").class("error-message").text("Sign in required"))
                .child(View::new("p").text("Please sign in to continue"))
                .child(
                    View::new("a")
                        .class("btn-primary")
                        .attr("href", login_path)
                        .text("Sign in"),
                ),
        ),
    )
}

/// Shown instead of login/register to signed-in users
pub fn already_signed_in(home: &str) -> View {
    div().class("auth-redirect").child(
        div().class("card").child(
            div()
                .class("card-content")
                .child(View::new("p").text("You are already signed in"))
                .child(
                    View::new("a")
                        .class("btn-primary")
                        .attr("href", home)
                        .text("Go to the marketplace"),
                ),
        ),
    )
}

/// Generic guard refusal
pub fn access_denied(reason: &str) -> View {
    div().class("access-denied").child(
        div()
            .class("card")
            .child(div().class("card-content").child(View::new("p").text(reason))),
    )
}

// ============================================================================
// Portal route table
// ============================================================================

/// Page factories for every portal section
pub struct PortalPages {
    pub home: PageFactory,
    pub about: PageFactory,
    pub history: PageFactory,
    pub church: PageFactory,
    pub marketplace: PageFactory,
    pub login: PageFactory,
    pub register: PageFactory,
    pub create_ad: PageFactory,
    pub my_ads: PageFactory,
    pub community_rules: PageFactory,
    pub edit_ad: ParamPageFactory,
}

impl PortalPages {
    /// Every section as an "under construction" page.
    pub fn placeholders() -> Self {
        fn stub(title: &'static str, text: &'static str) -> PageFactory {
            view_fn(move || placeholder(title, text))
        }

        Self {
            home: stub("Home", "Village news and announcements"),
            about: stub("Gallery", "Photos and videos of the villages"),
            history: stub("History", "The history of the villages"),
            church: stub("Church", "Services, clergy and schedule"),
            marketplace: stub("Marketplace", "Local classified ads"),
            login: stub("Sign in", "Sign in to your account"),
            register: stub("Register", "Create an account"),
            create_ad: stub("New ad", "Post a classified ad"),
            my_ads: stub("My ads", "Manage your ads"),
            community_rules: stub("Community rules", "Rules of the marketplace"),
            edit_ad: param_fn(|id| async move {
                Ok(placeholder("Edit ad", &format!("Editing ad #{}", id))
                    .class("edit-ad-page")
                    .attr("data-ad-id", id))
            }),
        }
    }
}

impl Default for PortalPages {
    fn default() -> Self {
        Self::placeholders()
    }
}

/// Build the portal's route table.
///
/// `is_authenticated` backs the guards: account pages require a session,
/// login and register are for guests only. The 404 page uses `config` texts.
///
/// Without the `guard` feature no guards are attached, `is_authenticated` is
/// never called and every page is reachable by anyone.
pub fn portal_routes<F>(
    pages: PortalPages,
    is_authenticated: F,
    config: &NavigatorConfig,
) -> RouteTable
where
    F: Fn() -> bool + 'static,
{
    let not_found_config = config.clone();

    #[cfg(feature = "guard")]
    let is_authenticated: Rc<dyn Fn() -> bool> = Rc::new(is_authenticated);
    #[cfg(not(feature = "guard"))]
    let _ = is_authenticated;

    #[cfg(feature = "guard")]
    let signed_in = {
        let check = is_authenticated.clone();
        move || AuthGuard::new({
            let check = check.clone();
            move || check()
        })
    };
    #[cfg(feature = "guard")]
    let guest_only = {
        let check = is_authenticated.clone();
        move || GuestGuard::new({
            let check = check.clone();
            move || check()
        })
    };

    let create_ad = Route::from_factory(paths::CREATE_AD, pages.create_ad);
    let my_ads = Route::from_factory(paths::MY_ADS, pages.my_ads);
    let edit_ad = DynamicRoute::from_factory(paths::EDIT_AD_PREFIX, pages.edit_ad);
    let login = Route::from_factory(paths::LOGIN, pages.login).name("login");
    let register = Route::from_factory(paths::REGISTER, pages.register).name("register");

    #[cfg(feature = "guard")]
    let (create_ad, my_ads, edit_ad, login, register) = (
        create_ad.guard(signed_in()),
        my_ads.guard(signed_in()),
        edit_ad.guard(signed_in()),
        login.guard(guest_only()),
        register.guard(guest_only()),
    );

    RouteTable::new()
        .route(Route::from_factory(paths::HOME, pages.home).name("home"))
        .route(Route::from_factory(paths::ABOUT, pages.about).name("gallery"))
        .route(Route::from_factory(paths::HISTORY, pages.history).name("history"))
        .route(Route::from_factory(paths::CHURCH, pages.church).name("church"))
        .route(Route::from_factory(paths::MARKETPLACE, pages.marketplace).name("marketplace"))
        .route(login)
        .route(register)
        .route(create_ad.name("create-ad"))
        .route(my_ads.name("my-ads"))
        .route(
            Route::from_factory(paths::COMMUNITY_RULES, pages.community_rules)
                .name("community-rules"),
        )
        .dynamic(edit_ad)
        .not_found(move || Ok(Page::ready(not_found(&not_found_config))))
}
