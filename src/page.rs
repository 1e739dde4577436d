//! Page factories
//!
//! A factory produces the root view of a page, either immediately or as a
//! deferred result that the navigator awaits. Factories are external
//! collaborators; the navigator only cares whether they succeed.

use crate::view::View;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

/// Error raised by a page factory, synchronously or from its deferred result.
#[derive(Debug, Clone, PartialEq)]
pub struct PageError {
    message: String,
}

impl PageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PageError {}

impl From<String> for PageError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for PageError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Deferred page result.
///
/// Not `Send`: pages are built and awaited on the single UI thread.
pub type DeferredPage = Pin<Box<dyn Future<Output = Result<View, PageError>>>>;

/// What a factory hands back.
pub enum Page {
    /// The page is ready to mount.
    Ready(View),
    /// The page resolves later; the navigator suspends on it.
    Deferred(DeferredPage),
}

impl Page {
    pub fn ready(view: View) -> Self {
        Page::Ready(view)
    }

    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<View, PageError>> + 'static,
    {
        Page::Deferred(Box::pin(future))
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Page::Deferred(_))
    }

    /// Resolve to a view, awaiting the deferred result if there is one.
    pub async fn resolve(self) -> Result<View, PageError> {
        match self {
            Page::Ready(view) => Ok(view),
            Page::Deferred(future) => future.await,
        }
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Ready(view) => f.debug_tuple("Ready").field(view).finish(),
            Page::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Zero-argument factory. An `Err` models a synchronous throw.
pub type PageFactory = Rc<dyn Fn() -> Result<Page, PageError>>;

/// Factory for a parameterised route; receives the validated identifier and
/// always answers with a deferred result.
pub type ParamPageFactory = Rc<dyn Fn(String) -> DeferredPage>;

/// Wrap a closure returning a view as a synchronous [`PageFactory`].
pub fn view_fn<F>(f: F) -> PageFactory
where
    F: Fn() -> View + 'static,
{
    Rc::new(move || Ok(Page::Ready(f())))
}

/// Wrap an async closure as a deferred [`PageFactory`].
pub fn load_fn<F, Fut>(f: F) -> PageFactory
where
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<View, PageError>> + 'static,
{
    Rc::new(move || Ok(Page::deferred(f())))
}

/// Wrap an async closure taking the route identifier.
pub fn param_fn<F, Fut>(f: F) -> ParamPageFactory
where
    F: Fn(String) -> Fut + 'static,
    Fut: Future<Output = Result<View, PageError>> + 'static,
{
    Rc::new(move |id| Box::pin(f(id)) as DeferredPage)
}
