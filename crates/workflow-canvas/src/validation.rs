//! Structural checks for canvas graphs
//!
//! Graph operations never fail; they keep these properties by construction.
//! `validate_graph` reports every violation found in a snapshot that came
//! from somewhere else (deserialized, hand-built, or edited externally).

use std::collections::HashSet;

use crate::types::{Graph, NodeVariant};

/// Validation error with location context
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// No trigger node in the graph
    MissingTrigger,
    /// More than one trigger node
    MultipleTriggers,
    /// Two nodes share an id
    DuplicateNodeId { node_id: String },
    /// Two edges share an id
    DuplicateEdgeId { edge_id: String },
    /// An edge references a non-existent node
    UnknownNode { edge_id: String, node_id: String },
    /// A node without a branch list has more than one outgoing edge
    MultipleOutgoing { node_id: String, count: usize },
    /// A branch list does not hold exactly one default branch
    DefaultBranchCount { node_id: String, count: usize },
    /// A branch points at a node that does not exist
    DanglingBranchTarget {
        node_id: String,
        branch_id: String,
        target_id: String,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTrigger => write!(f, "Graph has no trigger node"),
            Self::MultipleTriggers => write!(f, "Graph has multiple trigger nodes"),
            Self::DuplicateNodeId { node_id } => write!(f, "Duplicate node id '{}'", node_id),
            Self::DuplicateEdgeId { edge_id } => write!(f, "Duplicate edge id '{}'", edge_id),
            Self::UnknownNode { edge_id, node_id } => {
                write!(f, "Edge '{}' references unknown node '{}'", edge_id, node_id)
            }
            Self::MultipleOutgoing { node_id, count } => {
                write!(f, "Node '{}' has {} outgoing edges", node_id, count)
            }
            Self::DefaultBranchCount { node_id, count } => {
                write!(
                    f,
                    "Switch '{}' has {} default branches, expected exactly one",
                    node_id, count
                )
            }
            Self::DanglingBranchTarget {
                node_id,
                branch_id,
                target_id,
            } => {
                write!(
                    f,
                    "Branch '{}' of switch '{}' targets unknown node '{}'",
                    branch_id, node_id, target_id
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a canvas graph
///
/// Returns all validation errors found (not just the first).
pub fn validate_graph(graph: &Graph) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_trigger(graph, &mut errors);
    validate_unique_ids(graph, &mut errors);
    validate_edge_references(graph, &mut errors);
    validate_outgoing(graph, &mut errors);
    validate_branches(graph, &mut errors);

    if !errors.is_empty() {
        log::debug!("Graph failed validation with {} errors", errors.len());
    }
    errors
}

fn validate_trigger(graph: &Graph, errors: &mut Vec<ValidationError>) {
    let triggers = graph
        .nodes
        .iter()
        .filter(|n| n.variant == NodeVariant::Trigger)
        .count();
    match triggers {
        0 => errors.push(ValidationError::MissingTrigger),
        1 => {}
        _ => errors.push(ValidationError::MultipleTriggers),
    }
}

fn validate_unique_ids(graph: &Graph, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for node in &graph.nodes {
        if !seen.insert(node.id.as_str()) {
            errors.push(ValidationError::DuplicateNodeId {
                node_id: node.id.clone(),
            });
        }
    }

    let mut seen = HashSet::new();
    for edge in &graph.edges {
        if !seen.insert(edge.id.as_str()) {
            errors.push(ValidationError::DuplicateEdgeId {
                edge_id: edge.id.clone(),
            });
        }
    }
}

/// Check that all edge source/target nodes exist
fn validate_edge_references(graph: &Graph, errors: &mut Vec<ValidationError>) {
    let node_ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();

    for edge in &graph.edges {
        for endpoint in [&edge.source_id, &edge.target_id] {
            if !node_ids.contains(endpoint.as_str()) {
                errors.push(ValidationError::UnknownNode {
                    edge_id: edge.id.clone(),
                    node_id: endpoint.clone(),
                });
            }
        }
    }
}

fn validate_outgoing(graph: &Graph, errors: &mut Vec<ValidationError>) {
    for node in graph.nodes.iter().filter(|n| n.branches.is_none()) {
        let count = graph.outgoing_edges(&node.id).count();
        if count > 1 {
            errors.push(ValidationError::MultipleOutgoing {
                node_id: node.id.clone(),
                count,
            });
        }
    }
}

fn validate_branches(graph: &Graph, errors: &mut Vec<ValidationError>) {
    for node in &graph.nodes {
        let Some(branches) = &node.branches else {
            continue;
        };

        let defaults = branches.iter().filter(|b| b.is_default()).count();
        if defaults != 1 {
            errors.push(ValidationError::DefaultBranchCount {
                node_id: node.id.clone(),
                count: defaults,
            });
        }

        // Empty targets are not materialized yet
        for branch in branches.iter().filter(|b| !b.target_id.is_empty()) {
            if !graph.contains_node(&branch.target_id) {
                errors.push(ValidationError::DanglingBranchTarget {
                    node_id: node.id.clone(),
                    branch_id: branch.id.clone(),
                    target_id: branch.target_id.clone(),
                });
            }
        }
    }
}
