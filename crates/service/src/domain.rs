//! Request and response shapes for the mind map resources.
//!
//! Create inputs carry the fields a client must supply. Patch inputs are
//! overwrite-by-presence: a key that is absent keeps the stored value. For
//! nullable columns (`parent_id`, `label`) an explicit `null` clears the value.

use std::collections::HashMap;

use models::{mind_map, node, node_connection};
use sea_orm::Set;
use serde::{Deserialize, Deserializer, Serialize};

/// Maps a present key (including `null`) to `Some`, leaving absent keys to `#[serde(default)]`.
fn present<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMindMap {
    pub title: String,
    pub user_id: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MindMapPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub user_id: Option<i32>,
}

impl MindMapPatch {
    pub fn apply(self, am: &mut mind_map::ActiveModel) {
        if let Some(t) = self.title { am.title = Set(t); }
        if let Some(u) = self.user_id { am.user_id = Set(u); }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNode {
    pub map_id: i32,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub parent_id: Option<i32>,
    #[serde(default)]
    pub position: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodePatch {
    #[serde(default)]
    pub map_id: Option<i32>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub parent_id: Option<Option<i32>>,
    #[serde(default)]
    pub position: Option<String>,
}

impl NodePatch {
    pub fn apply(self, am: &mut node::ActiveModel) {
        if let Some(m) = self.map_id { am.map_id = Set(m); }
        if let Some(t) = self.text { am.text = Set(t); }
        if let Some(p) = self.parent_id { am.parent_id = Set(p); }
        if let Some(p) = self.position { am.position = Set(p); }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewConnection {
    pub from_node_id: i32,
    pub to_node_id: i32,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionPatch {
    #[serde(default)]
    pub from_node_id: Option<i32>,
    #[serde(default)]
    pub to_node_id: Option<i32>,
    #[serde(default, deserialize_with = "present")]
    pub label: Option<Option<String>>,
}

impl ConnectionPatch {
    pub fn apply(self, am: &mut node_connection::ActiveModel) {
        if let Some(f) = self.from_node_id { am.from_node_id = Set(f); }
        if let Some(t) = self.to_node_id { am.to_node_id = Set(t); }
        if let Some(l) = self.label { am.label = Set(l); }
    }
}

/// A node together with the edges leaving and entering it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeWithConnections {
    #[serde(flatten)]
    pub node: node::Model,
    pub from_connections: Vec<node_connection::Model>,
    pub to_connections: Vec<node_connection::Model>,
}

/// Payload of `GET /api/mindmaps/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMapTree {
    #[serde(flatten)]
    pub map: mind_map::Model,
    pub nodes: Vec<NodeWithConnections>,
}

impl MindMapTree {
    /// Attach every connection to its source node and to its target node.
    ///
    /// Nodes keep the order they are given in; connections keep theirs within
    /// each bucket. A connection whose other endpoint lives in another map only
    /// shows up on the local side.
    pub fn assemble(
        map: mind_map::Model,
        nodes: Vec<node::Model>,
        connections: Vec<node_connection::Model>,
    ) -> Self {
        let mut outgoing: HashMap<i32, Vec<node_connection::Model>> = HashMap::new();
        let mut incoming: HashMap<i32, Vec<node_connection::Model>> = HashMap::new();
        for c in connections {
            outgoing.entry(c.from_node_id).or_default().push(c.clone());
            incoming.entry(c.to_node_id).or_default().push(c);
        }
        let nodes = nodes
            .into_iter()
            .map(|node| NodeWithConnections {
                from_connections: outgoing.remove(&node.id).unwrap_or_default(),
                to_connections: incoming.remove(&node.id).unwrap_or_default(),
                node,
            })
            .collect();
        Self { map, nodes }
    }

    pub fn connection_count(&self) -> usize {
        self.nodes.iter().map(|n| n.from_connections.len()).sum()
    }
}
