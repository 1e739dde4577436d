//! Structured view tree
//!
//! Pages are built as plain data rather than by mutating a live document, so
//! every page factory can be exercised in tests and serialised to markup by
//! whatever host mounts it.
//!
//! ```
//! use portal_navigator::view::{div, View};
//!
//! let card = div()
//!     .class("card")
//!     .child(View::new("p").text("Hello"))
//!     .child(View::new("a").attr("href", "/").text("Home"));
//!
//! assert_eq!(
//!     card.to_html(),
//!     r#"<div class="card"><p>Hello</p><a href="/">Home</a></div>"#
//! );
//! ```

use std::fmt::Write as _;

/// A child of a [`View`]: either a nested element or a text run.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewNode {
    Element(View),
    Text(String),
}

impl From<View> for ViewNode {
    fn from(view: View) -> Self {
        ViewNode::Element(view)
    }
}

impl From<String> for ViewNode {
    fn from(text: String) -> Self {
        ViewNode::Text(text)
    }
}

impl From<&str> for ViewNode {
    fn from(text: &str) -> Self {
        ViewNode::Text(text.to_string())
    }
}

/// An element in the view tree.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    tag: String,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    children: Vec<ViewNode>,
}

impl View {
    /// Create an empty element with the given tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add a CSS class.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set an attribute, replacing a previous value for the same name.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            self.attrs.push((name, value));
        }
        self
    }

    /// Append a child element or text run.
    pub fn child(mut self, child: impl Into<ViewNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append several children.
    pub fn children<I, C>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ViewNode>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Append a text run.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(ViewNode::Text(text.into()))
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Get an attribute value.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn child_nodes(&self) -> &[ViewNode] {
        &self.children
    }

    /// Concatenated text of this element and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                ViewNode::Text(text) => out.push_str(text),
                ViewNode::Element(view) => view.collect_text(out),
            }
        }
    }

    /// Depth-first search for the first element (self included) matching `pred`.
    pub fn find(&self, pred: &dyn Fn(&View) -> bool) -> Option<&View> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            ViewNode::Element(view) => view.find(pred),
            ViewNode::Text(_) => None,
        })
    }

    /// First element carrying `class`.
    pub fn find_by_class(&self, class: &str) -> Option<&View> {
        self.find(&|view| view.has_class(class))
    }

    /// Serialise to HTML markup. Text and attribute values are escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&self.classes.join(" ")));
        }
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        out.push('>');
        for child in &self.children {
            match child {
                ViewNode::Text(text) => out.push_str(&escape(text)),
                ViewNode::Element(view) => view.write_html(out),
            }
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// Shorthand for `View::new("div")`.
pub fn div() -> View {
    View::new("div")
}

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
