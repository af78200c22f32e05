//! Scene graph
//!
//! A flat slotmap of nodes, each carrying named `f32` properties and a
//! parent/children relation. This is the stage most callers animate.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::error::{Result, StageError};
use crate::stage::{Stage, TargetId};

/// A node in the scene graph
#[derive(Clone, Debug, Default)]
pub struct SceneNode {
    name: Option<String>,
    properties: FxHashMap<String, f32>,
    parent: Option<TargetId>,
    children: SmallVec<[TargetId; 4]>,
}

impl SceneNode {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent(&self) -> Option<TargetId> {
        self.parent
    }

    pub fn children(&self) -> &[TargetId] {
        &self.children
    }

    pub fn property(&self, name: &str) -> Option<f32> {
        self.properties.get(name).copied()
    }

    /// Iterate over all properties of this node
    pub fn properties(&self) -> impl Iterator<Item = (&str, f32)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Slotmap-backed scene graph
pub struct Scene {
    nodes: SlotMap<TargetId, SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Create an unnamed, unparented node
    pub fn spawn(&mut self) -> TargetId {
        self.nodes.insert(SceneNode::default())
    }

    /// Create a named, unparented node
    pub fn spawn_named(&mut self, name: impl Into<String>) -> TargetId {
        self.nodes.insert(SceneNode {
            name: Some(name.into()),
            ..Default::default()
        })
    }

    pub fn get(&self, id: TargetId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    /// Find the first node with the given name
    pub fn find(&self, name: &str) -> Option<TargetId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name() == Some(name))
            .map(|(id, _)| id)
    }

    /// Define (or overwrite) a property on a node
    pub fn insert_property(
        &mut self,
        target: TargetId,
        name: impl Into<String>,
        value: f32,
    ) -> Result<()> {
        let node = self
            .nodes
            .get_mut(target)
            .ok_or(StageError::UnknownTarget(target))?;
        node.properties.insert(name.into(), value);
        Ok(())
    }

    /// Parent `child` under `parent`, detaching it from any previous parent
    pub fn add_child(&mut self, parent: TargetId, child: TargetId) -> Result<()> {
        if !self.nodes.contains_key(parent) {
            return Err(StageError::UnknownTarget(parent));
        }
        if !self.nodes.contains_key(child) {
            return Err(StageError::UnknownTarget(child));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(StageError::CyclicParent { parent, child });
        }

        self.detach(child);
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        Ok(())
    }

    /// Remove a node and its whole subtree, returning how many nodes were removed
    pub fn despawn(&mut self, target: TargetId) -> usize {
        if !self.nodes.contains_key(target) {
            return 0;
        }
        self.detach(target);

        let mut removed = 0;
        let mut stack: SmallVec<[TargetId; 8]> = SmallVec::new();
        stack.push(target);
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.remove(id) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        tracing::debug!(?target, removed, "despawned scene subtree");
        removed
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes
    pub fn iter(&self) -> impl Iterator<Item = (TargetId, &SceneNode)> {
        self.nodes.iter()
    }

    fn is_ancestor_or_self(&self, ancestor: TargetId, mut node: TargetId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.nodes.get(node).and_then(|n| n.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for Scene {
    fn contains(&self, target: TargetId) -> bool {
        self.nodes.contains_key(target)
    }

    fn property(&self, target: TargetId, name: &str) -> Option<f32> {
        self.nodes.get(target)?.property(name)
    }

    fn set_property(&mut self, target: TargetId, name: &str, value: f32) -> Result<()> {
        let node = self
            .nodes
            .get_mut(target)
            .ok_or(StageError::UnknownTarget(target))?;
        match node.properties.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(StageError::MissingProperty {
                target,
                property: name.to_string(),
            }),
        }
    }

    fn parent(&self, target: TargetId) -> Option<TargetId> {
        self.nodes.get(target)?.parent
    }

    fn detach(&mut self, target: TargetId) -> bool {
        let Some(parent) = self.nodes.get_mut(target).and_then(|n| n.parent.take()) else {
            return false;
        };
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|c| *c != target);
        }
        true
    }
}
