//! Core types for workflow trees
//!
//! A workflow is a rooted tree: the start node heads a singly linked chain
//! of `childNode`s, and route nodes fan out into an ordered list of
//! condition nodes, each of which heads its own chain.
//!
//! Children are held behind `Arc` so that edits copy only the path from the
//! root to the changed node and history snapshots share everything else.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Unique identifier for a node
pub type NodeId = String;

/// Shared handle to an immutable node
pub type NodeRef = Arc<WorkflowNode>;

/// The kind of a node without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    /// Root of the workflow (the initiator)
    Start,
    /// Approval step
    Approver,
    /// Carbon-copy / notification step
    Notifier,
    /// Handling step
    Audit,
    /// Branching node holding condition nodes
    Route,
    /// One branch of a route node
    Condition,
    /// Node backed by a caller-supplied material
    Custom,
}

impl NodeType {
    /// Key used for this type in locale tables and the material registry
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Start => "start",
            NodeType::Approver => "approver",
            NodeType::Notifier => "notifier",
            NodeType::Audit => "audit",
            NodeType::Route => "route",
            NodeType::Condition => "condition",
            NodeType::Custom => "custom",
        }
    }

    /// Whether a node of this type may sit in a `childNode` chain
    pub fn is_chainable(&self) -> bool {
        !matches!(self, NodeType::Start | NodeType::Condition)
    }

    /// Whether a node of this type may take the place of a `current` node
    ///
    /// Start and condition nodes only replace their own kind; every other
    /// type is interchangeable within a chain.
    pub fn can_replace(&self, current: NodeType) -> bool {
        match current {
            NodeType::Start | NodeType::Condition => *self == current,
            _ => self.is_chainable(),
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload of a node, tagged by `nodeType` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "nodeType", rename_all = "camelCase")]
pub enum NodeKind {
    Start,
    Approver,
    Notifier,
    Audit,
    Route {
        #[serde(rename = "conditionNodeList", default)]
        condition_node_list: Vec<NodeRef>,
    },
    Condition,
    Custom {
        /// Key of the material this node was created from
        material: String,
    },
}

impl NodeKind {
    /// Get the payload-free node type
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Start => NodeType::Start,
            NodeKind::Approver => NodeType::Approver,
            NodeKind::Notifier => NodeType::Notifier,
            NodeKind::Audit => NodeType::Audit,
            NodeKind::Route { .. } => NodeType::Route,
            NodeKind::Condition => NodeType::Condition,
            NodeKind::Custom { .. } => NodeType::Custom,
        }
    }
}

/// A node in a workflow tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
    /// Unique identifier, unique across the whole tree
    pub id: NodeId,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Material-specific configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
    /// Next node in the chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_node: Option<NodeRef>,
    /// Kind and kind-specific payload
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl WorkflowNode {
    /// Create a bare node of the given kind
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: None,
            desc: None,
            config: None,
            child_node: None,
            kind,
        }
    }

    /// Create a start node
    pub fn start(id: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Start)
    }

    /// Create an approver node
    pub fn approver(id: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Approver)
    }

    /// Create a notifier node
    pub fn notifier(id: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Notifier)
    }

    /// Create an audit node
    pub fn audit(id: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Audit)
    }

    /// Create a condition node
    pub fn condition(id: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Condition)
    }

    /// Create a route node holding the given conditions
    pub fn route(id: impl Into<String>, conditions: Vec<WorkflowNode>) -> Self {
        Self::new(
            id,
            NodeKind::Route {
                condition_node_list: conditions.into_iter().map(Arc::new).collect(),
            },
        )
    }

    /// Create a node backed by a custom material
    pub fn custom(id: impl Into<String>, material: impl Into<String>) -> Self {
        Self::new(
            id,
            NodeKind::Custom {
                material: material.into(),
            },
        )
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the description
    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    /// Set the configuration payload
    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the next node in the chain
    pub fn with_child(mut self, child: WorkflowNode) -> Self {
        self.child_node = Some(Arc::new(child));
        self
    }

    /// Get the payload-free node type
    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// Check if this is a route node
    pub fn is_route(&self) -> bool {
        matches!(self.kind, NodeKind::Route { .. })
    }

    /// Check if this is a condition node
    pub fn is_condition(&self) -> bool {
        matches!(self.kind, NodeKind::Condition)
    }

    /// Condition nodes of a route (empty for every other kind)
    pub fn conditions(&self) -> &[NodeRef] {
        match &self.kind {
            NodeKind::Route {
                condition_node_list,
            } => condition_node_list,
            _ => &[],
        }
    }

    /// Find the position of a condition by id
    pub fn condition_index(&self, condition_id: &str) -> Option<usize> {
        self.conditions().iter().position(|c| c.id == condition_id)
    }

    /// Copy of this route with its condition list replaced
    ///
    /// Non-route nodes are returned unchanged.
    pub fn with_conditions(&self, conditions: Vec<NodeRef>) -> WorkflowNode {
        let mut node = self.clone();
        if let NodeKind::Route {
            condition_node_list,
        } = &mut node.kind
        {
            *condition_node_list = conditions;
        }
        node
    }

    /// Key under which this node's material is registered
    pub fn material_key(&self) -> &str {
        match &self.kind {
            NodeKind::Custom { material } => material,
            other => other.node_type().as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_json_shape() {
        let route = WorkflowNode::route(
            "route-1",
            vec![
                WorkflowNode::condition("c1").with_name("Condition 1"),
                WorkflowNode::condition("c2").with_name("Condition 2"),
            ],
        )
        .with_child(WorkflowNode::notifier("n1"));

        let json = serde_json::to_value(&route).unwrap();
        assert_eq!(json["nodeType"], "route");
        assert_eq!(json["conditionNodeList"].as_array().unwrap().len(), 2);
        assert_eq!(json["conditionNodeList"][0]["nodeType"], "condition");
        assert_eq!(json["childNode"]["id"], "n1");
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_parse_web_editor_document() {
        let json = r#"{
            "id": "start",
            "nodeType": "start",
            "name": "Initiator",
            "childNode": {
                "id": "r1",
                "nodeType": "route",
                "conditionNodeList": [
                    { "id": "c1", "nodeType": "condition", "childNode": { "id": "a1", "nodeType": "approver" } },
                    { "id": "c2", "nodeType": "condition" }
                ]
            }
        }"#;

        let node: WorkflowNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.node_type(), NodeType::Start);
        let route = node.child_node.as_ref().unwrap();
        assert!(route.is_route());
        assert_eq!(route.conditions().len(), 2);
        assert_eq!(route.condition_index("c2"), Some(1));
        let approver = route.conditions()[0].child_node.as_ref().unwrap();
        assert_eq!(approver.node_type(), NodeType::Approver);
    }

    #[test]
    fn test_material_key() {
        assert_eq!(WorkflowNode::approver("a").material_key(), "approver");
        assert_eq!(WorkflowNode::custom("x", "webhook").material_key(), "webhook");
    }

    #[test]
    fn test_with_conditions_ignores_non_routes() {
        let node = WorkflowNode::approver("a");
        let same = node.with_conditions(vec![Arc::new(WorkflowNode::condition("c"))]);
        assert_eq!(same, node);
        assert!(same.conditions().is_empty());
    }

    #[test]
    fn test_chainable_types() {
        assert!(NodeType::Approver.is_chainable());
        assert!(NodeType::Route.is_chainable());
        assert!(!NodeType::Start.is_chainable());
        assert!(!NodeType::Condition.is_chainable());
    }
}
