//! Route definition and the route table
//!
//! Static routes are keyed by canonical path. Dynamic routes are a prefix
//! followed by a numeric identifier (`/marketplace/edit/42`). Anything else
//! resolves to the not-found page.

use crate::config::NavigatorConfig;
use crate::error::NavigationError;
#[cfg(feature = "guard")]
use crate::guards::{BoxedGuard, RouteGuard};
use crate::page::{
    load_fn, param_fn, view_fn, DeferredPage, Page, PageError, PageFactory, ParamPageFactory,
};
use crate::path::{is_canonical, normalize};
use crate::view::View;
use crate::{pages, trace_log, warn_log};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

// ============================================================================
// Route Validation
// ============================================================================

/// Validate a static route path.
///
/// Returns an error message if the path is invalid, `Ok(())` otherwise.
///
/// # Validation Rules
///
/// - Must start with `/`
/// - No consecutive slashes (`//`)
/// - No `:param` segments (parameters belong to [`DynamicRoute`])
/// - Must already be canonical (see [`normalize`])
pub fn validate_route_path(path: &str) -> Result<(), String> {
    if !path.starts_with('/') {
        return Err(format!("Route path '{}' must start with '/'", path));
    }

    if path.contains("//") {
        return Err("Route path cannot contain consecutive slashes".to_string());
    }

    if path.split('/').any(|segment| segment.starts_with(':')) {
        return Err(format!(
            "Route path '{}' has a parameter segment; register it as a dynamic route",
            path
        ));
    }

    if !is_canonical(path) {
        return Err(format!(
            "Route path '{}' is not canonical (expected '{}')",
            path,
            normalize(path)
        ));
    }

    Ok(())
}

/// An identifier is one or more ASCII digits.
fn is_valid_id(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

// ============================================================================
// Route
// ============================================================================

/// A static route: canonical path plus the factory that builds its page
pub struct Route {
    path: String,
    name: Option<String>,
    factory: PageFactory,
    #[cfg(feature = "guard")]
    guards: Vec<BoxedGuard>,
}

impl Route {
    /// Create a route from a factory that may fail or defer.
    ///
    /// # Example
    ///
    /// ```
    /// use portal_navigator::{Page, Route};
    /// use portal_navigator::view::div;
    ///
    /// let route = Route::new("/church", || Ok(Page::ready(div().class("church-page"))));
    /// assert_eq!(route.path(), "/church");
    /// ```
    pub fn new<F>(path: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Page, PageError> + 'static,
    {
        Self::from_factory(path, Rc::new(factory))
    }

    /// Create a route around an existing shared factory.
    pub fn from_factory(path: impl Into<String>, factory: PageFactory) -> Self {
        Self {
            path: path.into(),
            name: None,
            factory,
            #[cfg(feature = "guard")]
            guards: Vec::new(),
        }
    }

    /// Create a route whose page is built synchronously.
    pub fn view<F>(path: impl Into<String>, builder: F) -> Self
    where
        F: Fn() -> View + 'static,
    {
        Self::from_factory(path, view_fn(builder))
    }

    /// Create a route whose page is loaded asynchronously.
    pub fn load<F, Fut>(path: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<View, PageError>> + 'static,
    {
        Self::from_factory(path, load_fn(loader))
    }

    /// Give the route a name for [`RouteTable::path_for`].
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach a guard. Guards run in insertion order before the factory.
    #[cfg(feature = "guard")]
    pub fn guard(mut self, guard: impl RouteGuard + 'static) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn route_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn factory(&self) -> &PageFactory {
        &self.factory
    }

    /// Invoke the factory.
    pub fn build(&self) -> Result<Page, PageError> {
        (self.factory)()
    }

    #[cfg(feature = "guard")]
    pub fn guards(&self) -> &[BoxedGuard] {
        &self.guards
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// DynamicRoute
// ============================================================================

/// A route made of a fixed prefix and a numeric identifier
pub struct DynamicRoute {
    prefix: String,
    factory: ParamPageFactory,
    #[cfg(feature = "guard")]
    guards: Vec<BoxedGuard>,
}

impl DynamicRoute {
    /// Create a dynamic route. A missing trailing `/` is added to `prefix`.
    ///
    /// ```
    /// use portal_navigator::DynamicRoute;
    /// use portal_navigator::view::div;
    ///
    /// let edit = DynamicRoute::new("/marketplace/edit", |id| async move {
    ///     Ok(div().attr("data-ad-id", id))
    /// });
    /// assert_eq!(edit.prefix(), "/marketplace/edit/");
    /// assert_eq!(edit.url_for(42), "/marketplace/edit/42");
    /// ```
    pub fn new<F, Fut>(prefix: impl Into<String>, factory: F) -> Self
    where
        F: Fn(String) -> Fut + 'static,
        Fut: Future<Output = Result<View, PageError>> + 'static,
    {
        Self::from_factory(prefix, param_fn(factory))
    }

    pub fn from_factory(prefix: impl Into<String>, factory: ParamPageFactory) -> Self {
        let mut prefix = prefix.into();
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        Self {
            prefix,
            factory,
            #[cfg(feature = "guard")]
            guards: Vec::new(),
        }
    }

    #[cfg(feature = "guard")]
    pub fn guard(mut self, guard: impl RouteGuard + 'static) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Build the path for identifier `id`.
    pub fn url_for(&self, id: impl fmt::Display) -> String {
        format!("{}{}", self.prefix, id)
    }

    /// Invoke the factory with a validated identifier.
    pub fn build(&self, id: String) -> DeferredPage {
        (self.factory)(id)
    }

    #[cfg(feature = "guard")]
    pub fn guards(&self) -> &[BoxedGuard] {
        &self.guards
    }
}

impl fmt::Debug for DynamicRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicRoute")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// RouteTable
// ============================================================================

/// Result of a route table lookup
pub enum RouteMatch<'a> {
    /// Exact static match
    Static(&'a Route),
    /// Dynamic route with its validated identifier
    Dynamic { route: &'a DynamicRoute, id: String },
    /// No route; render this not-found factory
    NotFound(&'a PageFactory),
}

impl RouteMatch<'_> {
    pub fn is_static(&self) -> bool {
        matches!(self, RouteMatch::Static(_))
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, RouteMatch::Dynamic { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RouteMatch::NotFound(_))
    }

    /// Identifier of a dynamic match
    pub fn id(&self) -> Option<&str> {
        match self {
            RouteMatch::Dynamic { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Guards attached to the matched route
    #[cfg(feature = "guard")]
    pub fn guards(&self) -> &[BoxedGuard] {
        match self {
            RouteMatch::Static(route) => route.guards(),
            RouteMatch::Dynamic { route, .. } => route.guards(),
            RouteMatch::NotFound(_) => &[],
        }
    }

    /// Invoke the matched factory.
    pub fn build(&self) -> Result<Page, PageError> {
        match self {
            RouteMatch::Static(route) => route.build(),
            RouteMatch::Dynamic { route, id } => Ok(Page::Deferred(route.build(id.clone()))),
            RouteMatch::NotFound(factory) => factory(),
        }
    }
}

impl fmt::Debug for RouteMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteMatch::Static(route) => f.debug_tuple("Static").field(&route.path).finish(),
            RouteMatch::Dynamic { route, id } => f
                .debug_struct("Dynamic")
                .field("prefix", &route.prefix)
                .field("id", id)
                .finish(),
            RouteMatch::NotFound(_) => f.write_str("NotFound"),
        }
    }
}

/// Mapping from canonical path to page factory
pub struct RouteTable {
    routes: HashMap<String, Route>,
    dynamic: Vec<DynamicRoute>,
    not_found: PageFactory,
}

impl RouteTable {
    /// Empty table whose not-found page is the built-in 404 page.
    pub fn new() -> Self {
        let config = NavigatorConfig::default();
        Self {
            routes: HashMap::new(),
            dynamic: Vec::new(),
            not_found: view_fn(move || pages::not_found(&config)),
        }
    }

    /// Register a static route.
    ///
    /// The path is normalized first. A later registration for the same
    /// canonical path replaces the earlier one.
    pub fn route(mut self, mut route: Route) -> Self {
        if let Err(message) = validate_route_path(&route.path) {
            warn_log!("{}", message);
            route.path = normalize(&route.path);
        }

        if self.routes.contains_key(&route.path) {
            warn_log!("Replacing existing route for '{}'", route.path);
        }
        trace_log!("Registering route '{}'", route.path);
        self.routes.insert(route.path.clone(), route);
        self
    }

    /// Register a dynamic route.
    ///
    /// A later registration for the same prefix replaces the earlier one.
    pub fn dynamic(mut self, route: DynamicRoute) -> Self {
        trace_log!("Registering dynamic route '{}<id>'", route.prefix);
        match self.dynamic.iter_mut().find(|existing| existing.prefix == route.prefix) {
            Some(existing) => {
                warn_log!("Replacing existing dynamic route for '{}<id>'", route.prefix);
                *existing = route;
            }
            None => self.dynamic.push(route),
        }
        self
    }

    /// Replace the not-found factory.
    pub fn not_found<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Result<Page, PageError> + 'static,
    {
        self.not_found = Rc::new(factory);
        self
    }

    /// Resolve a canonical path.
    ///
    /// A path under a dynamic prefix whose remainder is not all digits is an
    /// error, not a not-found.
    pub fn lookup(&self, path: &str) -> Result<RouteMatch<'_>, NavigationError> {
        if let Some(route) = self.routes.get(path) {
            return Ok(RouteMatch::Static(route));
        }

        for route in &self.dynamic {
            if let Some(segment) = path.strip_prefix(route.prefix.as_str()) {
                if !is_valid_id(segment) {
                    return Err(NavigationError::InvalidRouteParam {
                        path: path.to_string(),
                        segment: segment.to_string(),
                    });
                }
                return Ok(RouteMatch::Dynamic {
                    route,
                    id: segment.to_string(),
                });
            }
        }

        Ok(RouteMatch::NotFound(&self.not_found))
    }

    /// Path of the route registered under `name`
    pub fn path_for(&self, name: &str) -> Option<&str> {
        self.routes
            .values()
            .find(|route| route.route_name() == Some(name))
            .map(Route::path)
    }

    /// Registered static paths, sorted
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    pub fn dynamic_routes(&self) -> &[DynamicRoute] {
        &self.dynamic
    }

    pub fn len(&self) -> usize {
        self.routes.len() + self.dynamic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty() && self.dynamic.is_empty()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.paths())
            .field("dynamic", &self.dynamic)
            .finish_non_exhaustive()
    }
}
