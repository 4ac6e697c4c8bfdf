use std::collections::BTreeMap;

use crate::util::class_names;

/// One child slot of a [`Node`].
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    Node(Node),
}

impl Content {
    /// Returns the flattened text of this child.
    pub fn text_content(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Node(node) => node.text_content(),
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) => Some(node),
            Self::Text(_) => None,
        }
    }
}

impl From<Node> for Content {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// A virtual UI node: tag, attributes, classes, data set, style and children.
///
/// Built with chained setters. Setters ignore empty values so optional
/// attributes can be passed through without branching at the call site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub classes: Vec<String>,
    pub data: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    pub children: Vec<Content>,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn button(label: impl Into<String>) -> Self {
        Self::new("button").text(label)
    }

    pub fn input(kind: &str, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new("input")
            .attr("type", kind)
            .attr("name", name)
            .attr("value", value)
    }

    // Attributes
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.attributes.insert(key.into(), value);
        }
        self
    }

    /// Sets a boolean attribute (`checked`, `selected`, `required`) when `on` is true.
    pub fn flag(self, key: &str, on: bool) -> Self {
        if on { self.attr(key, key) } else { self }
    }

    pub fn role(self, role: &str) -> Self {
        self.attr("role", role)
    }

    pub fn name(self, name: impl Into<String>) -> Self {
        self.attr("name", name)
    }

    /// Adds one or more space-separated classes.
    pub fn class(mut self, class: impl AsRef<str>) -> Self {
        let joined = class_names(self.classes.iter().map(String::as_str).chain([class.as_ref()]));
        self.classes = joined.split_whitespace().map(str::to_string).collect();
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.data.insert(key.into(), value);
        }
        self
    }

    pub fn style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.style.insert(key.into(), value);
        }
        self
    }

    // Children
    pub fn child(mut self, child: impl Into<Content>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<C: Into<Content>>(mut self, children: impl IntoIterator<Item = C>) -> Self {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() { self } else { self.child(Content::Text(text)) }
    }

    /// Applies a set of attributes in place. Empty values are skipped and the
    /// `class`/`data-*`/`style:*` prefixes route to their dedicated maps.
    pub fn set_attributes<K, V>(&mut self, attributes: impl IntoIterator<Item = (K, V)>)
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in attributes {
            let key = key.as_ref();
            let value = value.into();
            if value.is_empty() {
                continue;
            }
            let node = std::mem::take(self);
            *self = if key == "class" || key == "className" {
                node.class(value)
            } else if let Some(data_key) = key.strip_prefix("data-") {
                node.data(data_key, value)
            } else if let Some(style_key) = key.strip_prefix("style:") {
                node.style(style_key, value)
            } else {
                node.attr(key, value)
            };
        }
    }

    /// Replaces all children.
    pub fn set_content<C: Into<Content>>(&mut self, content: impl IntoIterator<Item = C>) {
        self.children = content.into_iter().map(Into::into).collect();
    }

    // Queries
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn get_data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn child_nodes(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter_map(Content::as_node)
    }

    /// Depth-first search for the first node matching `predicate`, including `self`.
    pub fn find(&self, predicate: &dyn Fn(&Node) -> bool) -> Option<&Node> {
        if predicate(self) {
            return Some(self);
        }
        self.child_nodes().find_map(|child| child.find(predicate))
    }

    /// Collects every node matching `predicate`, in document order.
    pub fn find_all<'a>(&'a self, predicate: &dyn Fn(&Node) -> bool, out: &mut Vec<&'a Node>) {
        if predicate(self) {
            out.push(self);
        }
        for child in self.child_nodes() {
            child.find_all(predicate, out);
        }
    }

    /// Finds a descendant by its `name` attribute.
    pub fn find_by_name(&self, name: &str) -> Option<&Node> {
        self.find(&|n| n.get_attr("name") == Some(name))
    }

    /// Concatenated text of all descendant text children, whitespace-collapsed.
    pub fn text_content(&self) -> String {
        let parts: Vec<String> = self
            .children
            .iter()
            .map(Content::text_content)
            .filter(|t| !t.trim().is_empty())
            .collect();
        parts.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Builds a node from a tag, an attribute list and children in one call.
///
/// ```
/// use salesgrid_lib::view::{create, Content};
///
/// let node = create("div", [("class", "container")], [Content::from("Hello")]);
/// assert!(node.has_class("container"));
/// assert_eq!(node.text_content(), "Hello");
/// ```
pub fn create<K, V, C>(
    tag: &str,
    attributes: impl IntoIterator<Item = (K, V)>,
    children: impl IntoIterator<Item = C>,
) -> Node
where
    K: AsRef<str>,
    V: Into<String>,
    C: Into<Content>,
{
    let mut node = Node::new(tag);
    node.set_attributes(attributes);
    node.set_content(children);
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_are_skipped() {
        let node = Node::div().attr("title", "").data("name", "").style("width", "").text("");
        assert!(node.attributes.is_empty());
        assert!(node.data.is_empty());
        assert!(node.style.is_empty());
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_set_attributes_routes_prefixes() {
        let mut node = Node::div();
        node.set_attributes([
            ("class", "table-row header-row"),
            ("data-name", "rows"),
            ("style:--columns", "1fr 1fr"),
            ("role", "row"),
        ]);
        assert!(node.has_class("header-row"));
        assert_eq!(node.get_data("name"), Some("rows"));
        assert_eq!(node.style.get("--columns").map(String::as_str), Some("1fr 1fr"));
        assert_eq!(node.get_attr("role"), Some("row"));
    }

    #[test]
    fn test_set_content_replaces() {
        let mut node = Node::div().text("old");
        node.set_content(["a", "b"]);
        assert_eq!(node.text_content(), "a b");
        node.set_content(Vec::<Content>::new());
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_find_by_name() {
        let node = Node::new("form")
            .child(Node::div().child(Node::input("text", "search", "abc")));
        let input = node.find_by_name("search").unwrap();
        assert_eq!(input.get_attr("value"), Some("abc"));
    }
}
