//! Error types for the workflow editor

use thiserror::Error;

use crate::types::NodeType;
use crate::validation::ValidationError;

/// Result type alias using EditorError
pub type Result<T> = std::result::Result<T, EditorError>;

/// Errors that can occur while editing a workflow tree
#[derive(Debug, Error)]
pub enum EditorError {
    /// No node with the given id exists in the tree
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// The tree is empty, so there is nothing to attach to or edit
    #[error("Workflow has no start node")]
    EmptyTree,

    /// The node exists but is not a route node
    #[error("Node '{0}' is not a route node")]
    NotARouteNode(String),

    /// A route node does not hold the requested condition
    #[error("Condition '{condition_id}' not found in route '{route_id}'")]
    ConditionNotFound { route_id: String, condition_id: String },

    /// An inserted node reuses an id already present in the tree
    #[error("Duplicate node id: {0}")]
    DuplicateNodeId(String),

    /// A node of this type cannot be placed in a `childNode` chain
    #[error("Node '{node_id}' of type '{node_type}' cannot be placed in a chain")]
    InvalidPlacement { node_id: String, node_type: NodeType },

    /// The start node can only be replaced, never deleted
    #[error("The start node '{0}' cannot be removed")]
    CannotRemoveStartNode(String),

    /// No material is registered under the given key
    #[error("Unknown node material: {0}")]
    UnknownMaterial(String),

    /// An action payload carried an unrecognised `type` tag
    #[error("Unknown editor action: {0}")]
    UnknownAction(String),

    /// Structural validation failed
    #[error("Workflow is invalid: {}", format_issues(.0))]
    Invalid(Vec<ValidationError>),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EditorError {
    /// Create a condition-not-found error
    pub fn condition_not_found(route_id: impl Into<String>, condition_id: impl Into<String>) -> Self {
        Self::ConditionNotFound {
            route_id: route_id.into(),
            condition_id: condition_id.into(),
        }
    }
}

fn format_issues(issues: &[ValidationError]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
