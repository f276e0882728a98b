use std::collections::HashMap;

use tracing::debug;

use crate::dom::{Element, NodeId, Surface};
use crate::types::Position;

pub(crate) const POSITION_DATA: &str = "bt-position";

/// One stacking container per requested position, created on first use and kept
/// for the lifetime of the registry.
#[derive(Debug, Default)]
pub struct ContainerRegistry {
    containers: HashMap<Position, NodeId>,
}

impl ContainerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create<S: Surface>(&mut self, surface: &mut S, position: Position) -> NodeId {
        if let Some(node) = self.containers.get(&position) {
            return *node;
        }
        let element = Element::div()
            .class(&position.layout_classes().join(" "))
            .data(POSITION_DATA, position.as_str());
        let node = surface.create(element);
        surface.attach_to_body(node);
        self.containers.insert(position, node);
        debug!(%position, container = %node, "toast container created");
        node
    }

    pub fn get(&self, position: Position) -> Option<NodeId> {
        self.containers.get(&position).copied()
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}
