//! Structural validation for workflow trees
//!
//! Checks the shape rules the editor relies on: a start node at the root
//! and nowhere else, unique ids, route nodes with at least two conditions,
//! conditions only inside route lists, and (optionally) that every custom
//! node refers to a registered material.

use std::collections::HashSet;

use crate::material::MaterialRegistry;
use crate::types::{NodeKind, NodeType, WorkflowNode};

/// Minimum number of conditions a route node must hold
pub const MIN_ROUTE_CONDITIONS: usize = 2;

/// Validation error with location context
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The workflow has no start node
    MissingStartNode,
    /// The root of the tree is not a start node
    RootNotStart { node_id: String, node_type: NodeType },
    /// A start node appears below the root
    MisplacedStartNode { node_id: String },
    /// An id is used by more than one node
    DuplicateId { node_id: String },
    /// A route node holds fewer than two conditions
    TooFewConditions { route_id: String, count: usize },
    /// A condition node sits in a `childNode` chain
    MisplacedCondition { node_id: String },
    /// A route's condition list holds something other than a condition
    NonConditionBranch { route_id: String, node_id: String },
    /// A custom node refers to a material that is not registered
    UnknownMaterial { node_id: String, material: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingStartNode => write!(f, "Workflow has no start node"),
            Self::RootNotStart { node_id, node_type } => {
                write!(f, "Root node '{}' is a {} node, not a start node", node_id, node_type)
            }
            Self::MisplacedStartNode { node_id } => {
                write!(f, "Start node '{}' is not at the root", node_id)
            }
            Self::DuplicateId { node_id } => write!(f, "Id '{}' is used more than once", node_id),
            Self::TooFewConditions { route_id, count } => {
                write!(
                    f,
                    "Route '{}' has {} condition(s), needs at least {}",
                    route_id, count, MIN_ROUTE_CONDITIONS
                )
            }
            Self::MisplacedCondition { node_id } => {
                write!(f, "Condition '{}' is outside of a route", node_id)
            }
            Self::NonConditionBranch { route_id, node_id } => {
                write!(
                    f,
                    "Route '{}' holds non-condition node '{}' as a branch",
                    route_id, node_id
                )
            }
            Self::UnknownMaterial { node_id, material } => {
                write!(f, "Node '{}' uses unknown material '{}'", node_id, material)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a workflow tree
///
/// Returns all validation errors found (not just the first).
/// Pass a registry to also check custom materials.
pub fn validate_workflow(
    start_node: Option<&WorkflowNode>,
    registry: Option<&MaterialRegistry>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let Some(root) = start_node else {
        errors.push(ValidationError::MissingStartNode);
        return errors;
    };

    if root.node_type() != NodeType::Start {
        errors.push(ValidationError::RootNotStart {
            node_id: root.id.clone(),
            node_type: root.node_type(),
        });
    }

    let mut seen = HashSet::new();
    check_node(root, Placement::Root, registry, &mut seen, &mut errors);
    errors
}

/// Where a node sits relative to its parent
#[derive(Clone, Copy, PartialEq)]
enum Placement {
    Root,
    Chain,
    Branch,
}

fn check_node<'a>(
    node: &'a WorkflowNode,
    placement: Placement,
    registry: Option<&MaterialRegistry>,
    seen: &mut HashSet<&'a str>,
    errors: &mut Vec<ValidationError>,
) {
    if !seen.insert(node.id.as_str()) {
        errors.push(ValidationError::DuplicateId {
            node_id: node.id.clone(),
        });
    }

    match &node.kind {
        NodeKind::Start if placement != Placement::Root => {
            errors.push(ValidationError::MisplacedStartNode {
                node_id: node.id.clone(),
            });
        }
        NodeKind::Condition if placement != Placement::Branch => {
            errors.push(ValidationError::MisplacedCondition {
                node_id: node.id.clone(),
            });
        }
        NodeKind::Route {
            condition_node_list,
        } => {
            if condition_node_list.len() < MIN_ROUTE_CONDITIONS {
                errors.push(ValidationError::TooFewConditions {
                    route_id: node.id.clone(),
                    count: condition_node_list.len(),
                });
            }
            for branch in condition_node_list {
                if !branch.is_condition() {
                    errors.push(ValidationError::NonConditionBranch {
                        route_id: node.id.clone(),
                        node_id: branch.id.clone(),
                    });
                }
                check_node(branch, Placement::Branch, registry, seen, errors);
            }
        }
        NodeKind::Custom { material } => {
            if let Some(reg) = registry {
                if !reg.contains(material) {
                    errors.push(ValidationError::UnknownMaterial {
                        node_id: node.id.clone(),
                        material: material.clone(),
                    });
                }
            }
        }
        _ => {}
    }

    if let Some(child) = &node.child_node {
        check_node(child, Placement::Chain, registry, seen, errors);
    }
}
