//! Switch branch reconciliation
//!
//! A switch node carries an ordered branch list ending in exactly one
//! default branch. Every branch resolves to a target node that sits one
//! vertical step below the switch, fanned out symmetrically around it.
//! Reconciliation reuses existing targets, materializes missing ones,
//! prunes targets whose branch disappeared and rebuilds every
//! switch-to-target edge from the reconciled list. Applying the same
//! branch list twice yields the same graph.

use std::collections::HashSet;

use crate::catalog::StepOption;
use crate::config::LayoutConfig;
use crate::constants::ids;
use crate::graph::{allocate_node_id, unique_edge_id, update_node_with_option};
use crate::types::{Branch, Edge, Graph, Node, NodeId, Point, Side};

/// Horizontal offset of branch `index` out of `count`, relative to the switch
pub fn branch_offset(index: usize, count: usize, spacing: f64) -> f64 {
    let middle = (count.saturating_sub(1)) as f64 / 2.0;
    (index as f64 - middle) * spacing
}

/// Keep condition branches in order and exactly one trailing default branch
fn normalize(desired: &[Branch]) -> Vec<Branch> {
    let mut branches: Vec<Branch> = desired.iter().filter(|b| !b.is_default()).cloned().collect();
    let default = desired
        .iter()
        .find(|b| b.is_default())
        .cloned()
        .unwrap_or_else(Branch::default_branch);
    branches.push(default);
    branches
}

/// Reconcile a switch's branch targets and edges with `desired`
///
/// Targets that have to be materialized start out as `fill`, normally the
/// catalog's default option.
pub fn set_switch_branches(
    graph: &Graph,
    switch_id: &str,
    desired: &[Branch],
    layout: &LayoutConfig,
    fill: &StepOption,
) -> Graph {
    let Some(switch) = graph.find_node(switch_id) else {
        return graph.clone();
    };
    let origin = switch.position;
    let mut branches = normalize(desired);
    let count = branches.len();

    let mut next = graph.clone();
    let mut kept: HashSet<NodeId> = HashSet::new();
    let mut materialized = 0;

    for (index, branch) in branches.iter_mut().enumerate() {
        let position = Point::new(
            origin.x + branch_offset(index, count, layout.horizontal_spacing),
            layout.clamp_y(origin.y + layout.vertical_step),
        );

        let explicit = Some(branch.target_id.as_str())
            .filter(|id| !id.is_empty() && *id != switch_id && !kept.contains(*id))
            .filter(|id| next.contains_node(id))
            .map(str::to_string);
        let associated = next
            .branch_target(switch_id, &branch.id)
            .map(|n| n.id.clone())
            .filter(|id| !kept.contains(id));

        let target_id = match explicit.or(associated) {
            Some(id) => {
                if let Some(node) = next.find_node_mut(&id) {
                    node.position = position;
                    node.parent_node_id = Some(switch_id.to_string());
                    node.branch_id = Some(branch.id.clone());
                }
                id
            }
            None => {
                let id = allocate_node_id(&mut next);
                let mut node = update_node_with_option(&Node::add_step(id.clone(), position), fill);
                node.parent_node_id = Some(switch_id.to_string());
                node.branch_id = Some(branch.id.clone());
                next.nodes.push(node);
                materialized += 1;
                id
            }
        };

        branch.target_id = target_id.clone();
        kept.insert(target_id);
    }

    let pruned: HashSet<NodeId> = next
        .nodes
        .iter()
        .filter(|n| n.parent_node_id.as_deref() == Some(switch_id) && !kept.contains(&n.id))
        .map(|n| n.id.clone())
        .collect();
    next.nodes.retain(|n| !pruned.contains(&n.id));
    next.edges.retain(|e| {
        e.source_id != switch_id && !pruned.contains(&e.source_id) && !pruned.contains(&e.target_id)
    });

    for branch in &branches {
        let base = format!("{}{}-{}", ids::EDGE_PREFIX, switch_id, branch.id);
        let edge_id = unique_edge_id(&next, &base);
        next.edges.push(Edge {
            id: edge_id,
            source_id: switch_id.to_string(),
            source_side: Side::Bottom,
            target_id: branch.target_id.clone(),
            target_side: Side::Top,
            has_arrow: true,
            branch_id: Some(branch.id.clone()),
        });
    }

    if let Some(node) = next.find_node_mut(switch_id) {
        node.branches = Some(branches);
    }

    log::debug!(
        "Reconciled switch '{}': {} branch(es), {} materialized, {} pruned",
        switch_id,
        count,
        materialized,
        pruned.len()
    );
    next
}

/// Give a switch `condition_count` condition branches plus one default branch
pub fn initialize_switch_node(
    graph: &Graph,
    switch_id: &str,
    condition_count: usize,
    layout: &LayoutConfig,
    fill: &StepOption,
) -> Graph {
    let mut desired: Vec<Branch> = (1..=condition_count)
        .map(|i| Branch::condition(format!("{}{}", ids::BRANCH_PREFIX, i), format!("Condition {}", i)))
        .collect();
    desired.push(Branch::default_branch());
    set_switch_branches(graph, switch_id, &desired, layout, fill)
}

fn current_branches(graph: &Graph, switch_id: &str) -> Option<Vec<Branch>> {
    graph
        .find_node(switch_id)
        .map(|n| n.branches.clone().unwrap_or_default())
}

/// Add a condition branch just before the default branch
pub fn append_switch_branch(
    graph: &Graph,
    switch_id: &str,
    layout: &LayoutConfig,
    fill: &StepOption,
) -> Graph {
    let Some(mut branches) = current_branches(graph, switch_id) else {
        return graph.clone();
    };

    let taken: HashSet<&str> = branches.iter().map(|b| b.id.as_str()).collect();
    let index = (1..)
        .find(|i| !taken.contains(format!("{}{}", ids::BRANCH_PREFIX, i).as_str()))
        .unwrap_or(1);
    let conditions = branches.iter().filter(|b| !b.is_default()).count();
    let branch = Branch::condition(
        format!("{}{}", ids::BRANCH_PREFIX, index),
        format!("Condition {}", conditions + 1),
    );

    let at = branches.iter().position(|b| b.is_default()).unwrap_or(branches.len());
    branches.insert(at, branch);
    set_switch_branches(graph, switch_id, &branches, layout, fill)
}

/// Set the condition text of one condition branch
pub fn set_switch_branch_condition(
    graph: &Graph,
    switch_id: &str,
    branch_id: &str,
    condition: &str,
    layout: &LayoutConfig,
    fill: &StepOption,
) -> Graph {
    let Some(mut branches) = current_branches(graph, switch_id) else {
        return graph.clone();
    };
    let Some(branch) = branches.iter_mut().find(|b| b.id == branch_id && !b.is_default()) else {
        return graph.clone();
    };
    branch.condition = condition.to_string();
    set_switch_branches(graph, switch_id, &branches, layout, fill)
}

/// Drop one condition branch and prune its target
///
/// The default branch cannot be removed.
pub fn remove_switch_branch(
    graph: &Graph,
    switch_id: &str,
    branch_id: &str,
    layout: &LayoutConfig,
    fill: &StepOption,
) -> Graph {
    let Some(branches) = current_branches(graph, switch_id) else {
        return graph.clone();
    };
    if !branches.iter().any(|b| b.id == branch_id && !b.is_default()) {
        return graph.clone();
    }
    let remaining: Vec<Branch> = branches.into_iter().filter(|b| b.id != branch_id).collect();
    set_switch_branches(graph, switch_id, &remaining, layout, fill)
}

/// Turn a switch back into a plain step
///
/// Drops the branch list, every branch target and every edge leaving the
/// switch. Nodes below the targets are left in place.
pub fn clear_switch_branches(graph: &Graph, switch_id: &str) -> Graph {
    let has_branches = graph
        .find_node(switch_id)
        .is_some_and(|n| n.branches.is_some());
    if !has_branches {
        return graph.clone();
    }

    let mut next = graph.clone();
    let targets: HashSet<NodeId> = next
        .nodes
        .iter()
        .filter(|n| n.parent_node_id.as_deref() == Some(switch_id))
        .map(|n| n.id.clone())
        .collect();
    next.nodes.retain(|n| !targets.contains(&n.id));
    next.edges.retain(|e| {
        e.source_id != switch_id && !targets.contains(&e.source_id) && !targets.contains(&e.target_id)
    });
    if let Some(node) = next.find_node_mut(switch_id) {
        node.branches = None;
    }

    log::debug!(
        "Cleared switch '{}' and pruned {} branch target(s)",
        switch_id,
        targets.len()
    );
    next
}
