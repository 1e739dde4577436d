//! Page container
//!
//! The single mount point the navigator renders into. It holds at most one
//! logical page; every state change replaces the previous content wholesale.

use crate::config::NavigatorConfig;
use crate::pages;
use crate::view::View;

/// What the container currently holds
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerContent {
    /// Nothing mounted yet
    Empty,
    /// Loading placeholder
    Loading,
    /// A mounted page
    Page(View),
    /// Retry panel showing this message
    Error(String),
}

/// The `<main id="main-content">` element of the portal
#[derive(Debug, Clone)]
pub struct PageContainer {
    content: ContainerContent,
    loading_text: String,
    retry_label: String,
}

impl PageContainer {
    /// Element id the container is mounted under
    pub const ELEMENT_ID: &'static str = "main-content";

    pub fn new(config: &NavigatorConfig) -> Self {
        Self {
            content: ContainerContent::Empty,
            loading_text: config.loading_text.clone(),
            retry_label: config.retry_label.clone(),
        }
    }

    /// Clear previous content and mount `view`.
    pub fn show(&mut self, view: View) {
        self.content = ContainerContent::Page(view);
    }

    /// Replace content with the loading placeholder.
    pub fn show_loading(&mut self) {
        self.content = ContainerContent::Loading;
    }

    /// Replace content with a retry panel carrying `message`.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.content = ContainerContent::Error(message.into());
    }

    pub fn content(&self) -> &ContainerContent {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.content, ContainerContent::Empty)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.content, ContainerContent::Loading)
    }

    /// The mounted page, if a page (not a loader or error) is showing.
    pub fn page(&self) -> Option<&View> {
        match &self.content {
            ContainerContent::Page(view) => Some(view),
            _ => None,
        }
    }

    /// Error message, if the retry panel is showing.
    pub fn error_message(&self) -> Option<&str> {
        match &self.content {
            ContainerContent::Error(message) => Some(message),
            _ => None,
        }
    }

    /// The container element with its current content as a single child.
    pub fn to_view(&self) -> View {
        let root = View::new("main")
            .attr("id", Self::ELEMENT_ID)
            .class("dynamic-content");

        match &self.content {
            ContainerContent::Empty => root,
            ContainerContent::Loading => root.child(pages::loader(&self.loading_text)),
            ContainerContent::Page(view) => root.child(view.clone()),
            ContainerContent::Error(message) => {
                root.child(pages::retry_panel(message, &self.retry_label))
            }
        }
    }

    pub fn to_html(&self) -> String {
        self.to_view().to_html()
    }
}
