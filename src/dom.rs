//! Rendering surface seam.
//!
//! [`Element`] is a detached, plain-value element tree; building one has no side
//! effects. A [`Surface`] materialises trees into live nodes addressed by
//! [`NodeId`] and offers the handful of DOM operations the toaster needs.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Write as _};

/// Handle to a live node on a [`Surface`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Placement {
    Append,
    Prepend,
}

pub trait Surface {
    /// Materialises a detached tree and returns its (unattached) root.
    fn create(&mut self, element: Element) -> NodeId;

    /// Appends `node` to the document root.
    fn attach_to_body(&mut self, node: NodeId);

    fn insert(&mut self, parent: NodeId, child: NodeId, placement: Placement);

    /// Detaches `node` (and its subtree) from the document.
    fn remove(&mut self, node: NodeId);

    fn children(&self, parent: NodeId) -> Vec<NodeId>;

    fn data(&self, node: NodeId, key: &str) -> Option<String>;

    fn set_data(&mut self, node: NodeId, key: &str, value: &str);

    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    /// `node` itself or its nearest ancestor carrying `class`.
    fn closest(&self, node: NodeId, class: &str) -> Option<NodeId>;

    /// Whether `node` is `ancestor` or lies beneath it.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;

    /// First descendant of `root` (depth first, `root` included) carrying `class`.
    fn query(&self, root: NodeId, class: &str) -> Option<NodeId>;
}

/// A detached element tree.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    dataset: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    /// Adds every whitespace separated class in `classes`, skipping repeats.
    #[must_use]
    pub fn class(mut self, classes: &str) -> Self {
        self.add_classes(classes);
        self
    }

    pub fn add_classes(&mut self, classes: &str) {
        for class in classes.split_whitespace() {
            if !self.has_class(class) {
                self.classes.push(class.to_string());
            }
        }
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_data(key, value);
        self
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.dataset.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_style(property, value);
        self
    }

    pub fn set_style(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.style.insert(property.into(), value.into());
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn maybe_child(self, child: Option<Self>) -> Self {
        match child {
            Some(child) => self.child(child),
            None => self,
        }
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

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn data_value(&self, key: &str) -> Option<&str> {
        self.dataset.get(key).map(String::as_str)
    }

    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[Self] {
        &self.children
    }

    pub(crate) fn take_children(&mut self) -> Vec<Self> {
        std::mem::take(&mut self.children)
    }

    pub(crate) fn push_child(&mut self, child: Self) {
        self.children.push(child);
    }

    /// Depth-first search, `self` included.
    pub fn find<P>(&self, predicate: P) -> Option<&Self>
    where
        P: Fn(&Self) -> bool + Copy,
    {
        if predicate(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(predicate))
    }

    pub fn find_class(&self, class: &str) -> Option<&Self> {
        self.find(|element| element.has_class(class))
    }

    /// Renders the tree as a single line of HTML. Text and attribute values are
    /// escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&self.classes.join(" ")));
        }
        for (name, value) in &self.attributes {
            let _ = write!(out, " {name}=\"{}\"", escape(value));
        }
        for (key, value) in &self.dataset {
            let _ = write!(out, " data-{key}=\"{}\"", escape(value));
        }
        if !self.style.is_empty() {
            let style = self
                .style
                .iter()
                .map(|(property, value)| format!("{property}: {value}"))
                .collect::<Vec<_>>()
                .join("; ");
            let _ = write!(out, " style=\"{}\"", escape(&style));
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::Element;

    #[test]
    fn classes_are_deduplicated() {
        let element = Element::div().class("a b").class("b c");
        assert_eq!(element.classes(), ["a", "b", "c"]);
    }

    #[test]
    fn html_escapes_text_and_attributes() {
        let element = Element::new("span")
            .attr("title", "\"quoted\"")
            .text("<b>bold</b> & more");
        assert_eq!(
            element.to_html(),
            "<span title=\"&quot;quoted&quot;\">&lt;b&gt;bold&lt;/b&gt; &amp; more</span>"
        );
    }

    #[test]
    fn find_walks_depth_first() {
        let tree = Element::div()
            .child(Element::div().class("row").child(Element::new("em").class("hit")))
            .child(Element::div().class("hit"));
        let hit = tree.find_class("hit");
        assert_eq!(hit.map(Element::tag), Some("em"));
    }
}
