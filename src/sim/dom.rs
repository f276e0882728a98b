use std::collections::HashMap;

use crate::dom::{Element, NodeId, Placement, Surface};

#[derive(Debug)]
struct Node {
    /// The node's own markup; children live in `children`.
    element: Element,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed [`Surface`] with a document body.
///
/// Removing a node drops its whole subtree from the arena. Every `remove` call is
/// counted per node, including calls for nodes that are already gone.
#[derive(Debug)]
pub struct MemoryDom {
    nodes: HashMap<NodeId, Node>,
    body: NodeId,
    next_id: u64,
    removals: HashMap<NodeId, usize>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: HashMap::new(),
            body: NodeId::new(0),
            next_id: 0,
            removals: HashMap::new(),
        };
        dom.body = dom.alloc(Element::new("body"), None);
        dom
    }

    pub const fn body(&self) -> NodeId {
        self.body
    }

    /// Whether `node` still exists in the arena.
    pub fn exists(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Whether `node` is reachable from the body.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(self.body, node)
    }

    pub fn removal_count(&self, node: NodeId) -> usize {
        self.removals.get(&node).copied().unwrap_or(0)
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes
            .get(&node)
            .and_then(|n| n.element.style_value(property))
            .map(str::to_string)
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes.get(&node).is_some_and(|n| n.element.has_class(class))
    }

    /// The live subtree under `node`, as a detached element tree.
    pub fn snapshot(&self, node: NodeId) -> Option<Element> {
        let current = self.nodes.get(&node)?;
        let mut element = current.element.clone();
        for child in &current.children {
            if let Some(child) = self.snapshot(*child) {
                element.push_child(child);
            }
        }
        Some(element)
    }

    pub fn render(&self, node: NodeId) -> String {
        self.snapshot(node).map(|e| e.to_html()).unwrap_or_default()
    }

    fn alloc(&mut self, mut element: Element, parent: Option<NodeId>) -> NodeId {
        self.next_id += 1;
        let id = NodeId::new(self.next_id);
        let children = element.take_children();
        self.nodes.insert(
            id,
            Node {
                element,
                parent,
                children: Vec::new(),
            },
        );
        let children: Vec<NodeId> = children
            .into_iter()
            .map(|child| self.alloc(child, Some(id)))
            .collect();
        if let Some(node) = self.nodes.get_mut(&id) {
            node.children = children;
        }
        id
    }

    fn detach(&mut self, node: NodeId) {
        let parent = self.nodes.get_mut(&node).and_then(|n| n.parent.take());
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|child| *child != node);
        }
    }

    fn drop_subtree(&mut self, node: NodeId) {
        if let Some(removed) = self.nodes.remove(&node) {
            for child in removed.children {
                self.drop_subtree(child);
            }
        }
    }

    fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(node), |current| {
            self.nodes.get(current).and_then(|n| n.parent)
        })
        .filter(|current| self.nodes.contains_key(current))
    }
}

impl Surface for MemoryDom {
    fn create(&mut self, element: Element) -> NodeId {
        self.alloc(element, None)
    }

    fn attach_to_body(&mut self, node: NodeId) {
        self.insert(self.body, node, Placement::Append);
    }

    fn insert(&mut self, parent: NodeId, child: NodeId, placement: Placement) {
        if !self.exists(parent) || !self.exists(child) || self.contains(child, parent) {
            return;
        }
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(parent) = self.nodes.get_mut(&parent) {
            match placement {
                Placement::Append => parent.children.push(child),
                Placement::Prepend => parent.children.insert(0, child),
            }
        }
    }

    fn remove(&mut self, node: NodeId) {
        *self.removals.entry(node).or_default() += 1;
        if node == self.body {
            return;
        }
        self.detach(node);
        self.drop_subtree(node);
    }

    fn children(&self, parent: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&parent)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn data(&self, node: NodeId, key: &str) -> Option<String> {
        self.nodes
            .get(&node)
            .and_then(|n| n.element.data_value(key))
            .map(str::to_string)
    }

    fn set_data(&mut self, node: NodeId, key: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(&node) {
            node.element.set_data(key, value);
        }
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(&node) {
            node.element.set_style(property, value);
        }
    }

    fn closest(&self, node: NodeId, class: &str) -> Option<NodeId> {
        self.ancestors(node).find(|current| self.has_class(*current, class))
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|current| current == ancestor)
    }

    fn query(&self, root: NodeId, class: &str) -> Option<NodeId> {
        let current = self.nodes.get(&root)?;
        if current.element.has_class(class) {
            return Some(root);
        }
        current
            .children
            .iter()
            .find_map(|child| self.query(*child, class))
    }
}
