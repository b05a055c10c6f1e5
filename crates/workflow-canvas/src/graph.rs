//! Snapshot-in, snapshot-out graph operations
//!
//! Every function here reads an immutable `Graph` and returns a new one.
//! Requests that cannot apply (unknown ids, self-connections, duplicate
//! edges) return an unchanged copy instead of failing.

use crate::catalog::{StepOption, TriggerDescriptor};
use crate::config::LayoutConfig;
use crate::constants::{ids, labels};
use crate::types::{BranchId, Edge, Graph, Node, NodeVariant, Point, Side};

/// Options for a new connection
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectOptions {
    pub source_side: Side,
    pub target_side: Side,
    pub has_arrow: bool,
    pub branch_id: Option<BranchId>,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            source_side: Side::Bottom,
            target_side: Side::Top,
            has_arrow: true,
            branch_id: None,
        }
    }
}

/// Result of a node removal
#[derive(Debug, Clone)]
pub struct RemoveOutcome {
    pub graph: Graph,
    /// Whether a node was actually removed
    pub removed: bool,
}

impl Graph {
    /// Create a graph holding only the reserved trigger
    pub fn seeded(trigger: &TriggerDescriptor, position: Point) -> Self {
        let mut node = Node::new(ids::TRIGGER_NODE, NodeVariant::Trigger, position);
        apply_trigger_fields(&mut node, trigger);
        Self {
            nodes: vec![node],
            edges: Vec::new(),
            next_node_index: 0,
        }
    }
}

fn apply_trigger_fields(node: &mut Node, trigger: &TriggerDescriptor) {
    node.title = trigger.label.clone();
    node.description = trigger.description.clone();
    node.icon = trigger.icon_key.clone();
    node.category = trigger.group_title.clone();
}

/// Refresh the trigger's display fields from a new descriptor
pub fn refresh_trigger(graph: &Graph, trigger: &TriggerDescriptor) -> Graph {
    let mut next = graph.clone();
    if let Some(node) = next.nodes.iter_mut().find(|n| n.is_trigger()) {
        apply_trigger_fields(node, trigger);
        log::debug!("Refreshed trigger from descriptor '{}'", trigger.id);
    }
    next
}

/// Synthesize the id for the next created node and advance the counter
///
/// Indices whose id is already taken are skipped; the counter never moves back.
pub(crate) fn allocate_node_id(graph: &mut Graph) -> String {
    loop {
        let id = format!("{}{}", ids::NODE_PREFIX, graph.next_node_index);
        graph.next_node_index += 1;
        if !graph.contains_node(&id) {
            return id;
        }
    }
}

/// Resolve a synthesized edge id against existing ids by suffixing `-1`, `-2`, ...
pub(crate) fn unique_edge_id(graph: &Graph, base: &str) -> String {
    let taken = |id: &str| graph.edges.iter().any(|e| e.id == id);
    if !taken(base) {
        return base.to_string();
    }
    let mut suffix = 1;
    loop {
        let candidate = format!("{}-{}", base, suffix);
        if !taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Append an unconfigured step below `parent_id`, connected bottom to top
pub fn insert_node_after(graph: &Graph, parent_id: &str, layout: &LayoutConfig) -> Graph {
    let Some(parent) = graph.find_node(parent_id) else {
        return graph.clone();
    };
    let position = Point::new(
        parent.position.x,
        layout.clamp_y(parent.position.y + layout.vertical_step),
    );

    let mut next = graph.clone();
    let node_id = allocate_node_id(&mut next);
    next.nodes.push(Node::add_step(node_id.clone(), position));

    let edge_id = unique_edge_id(&next, &format!("{}{}-{}", ids::EDGE_PREFIX, parent_id, node_id));
    next.edges.push(Edge {
        id: edge_id,
        source_id: parent_id.to_string(),
        source_side: Side::Bottom,
        target_id: node_id.clone(),
        target_side: Side::Top,
        has_arrow: true,
        branch_id: None,
    });

    log::debug!("Inserted '{}' after '{}'", node_id, parent_id);
    next
}

/// Remove a node and every edge directly touching it
///
/// Downstream nodes are left in place even when they lose their only
/// incoming edge. A switch branch that targeted the node is left without a
/// target until the switch is reconciled again. Guarding the trigger and
/// placeholders is the caller's job.
pub fn remove_node(graph: &Graph, node_id: &str) -> RemoveOutcome {
    if !graph.contains_node(node_id) {
        return RemoveOutcome {
            graph: graph.clone(),
            removed: false,
        };
    }

    let mut next = Graph {
        nodes: graph.nodes.iter().filter(|n| n.id != node_id).cloned().collect(),
        edges: graph.edges.iter().filter(|e| !e.touches(node_id)).cloned().collect(),
        next_node_index: graph.next_node_index,
    };
    for branch in next
        .nodes
        .iter_mut()
        .filter_map(|n| n.branches.as_mut())
        .flatten()
        .filter(|b| b.target_id == node_id)
    {
        branch.target_id.clear();
    }
    log::debug!(
        "Removed '{}' and {} edge(s)",
        node_id,
        graph.edges.len() - next.edges.len()
    );
    RemoveOutcome {
        graph: next,
        removed: true,
    }
}

/// Remove one edge by id
pub fn remove_edge(graph: &Graph, edge_id: &str) -> Graph {
    let mut next = graph.clone();
    next.edges.retain(|e| e.id != edge_id);
    if next.edges.len() != graph.edges.len() {
        log::debug!("Removed edge '{}'", edge_id);
    }
    next
}

/// Connect `source_id` to `target_id`, replacing the source's previous outgoing edge
pub fn connect_nodes(
    graph: &Graph,
    source_id: &str,
    target_id: &str,
    opts: &ConnectOptions,
) -> Graph {
    if source_id == target_id || !graph.contains_node(source_id) || !graph.contains_node(target_id)
    {
        return graph.clone();
    }
    let duplicate = graph.edges.iter().any(|e| {
        e.source_id == source_id
            && e.target_id == target_id
            && e.source_side == opts.source_side
            && e.target_side == opts.target_side
    });
    if duplicate {
        return graph.clone();
    }

    let mut next = graph.clone();
    next.edges.retain(|e| e.source_id != source_id);
    let edge_id = unique_edge_id(&next, &format!("{}{}-{}", ids::EDGE_PREFIX, source_id, target_id));
    next.edges.push(Edge {
        id: edge_id.clone(),
        source_id: source_id.to_string(),
        source_side: opts.source_side,
        target_id: target_id.to_string(),
        target_side: opts.target_side,
        has_arrow: opts.has_arrow,
        branch_id: opts.branch_id.clone(),
    });

    log::debug!("Connected '{}' -> '{}' as '{}'", source_id, target_id, edge_id);
    next
}

/// Write a new position for one node
pub fn move_node(graph: &Graph, node_id: &str, position: Point) -> Graph {
    let mut next = graph.clone();
    if let Some(node) = next.find_node_mut(node_id) {
        node.position = position;
    }
    next
}

/// Merge a catalog option's display fields into a node
///
/// Status and panel fall back to the defaults of the resulting variant
/// when the option does not name them.
pub fn update_node_with_option(node: &Node, option: &StepOption) -> Node {
    let mut updated = node.clone();
    updated.title = option.label.clone();
    updated.description = option.description.clone();
    updated.icon = option.icon.clone();
    updated.variant = option.variant;
    updated.category = option.category.clone();
    updated.status = option
        .status
        .clone()
        .unwrap_or_else(|| option.variant.default_status().to_string());
    updated.panel = option.panel.unwrap_or_else(|| option.variant.default_panel());
    updated
}

/// Replace one node in a snapshot with the result of `update_node_with_option`
pub fn apply_option_to_node(graph: &Graph, node_id: &str, option: &StepOption) -> Graph {
    let mut next = graph.clone();
    if let Some(node) = next.find_node_mut(node_id) {
        *node = update_node_with_option(node, option);
        log::debug!("Applied option '{}' to '{}'", option.id, node_id);
    }
    next
}

/// Whether a node still waits for a catalog choice
pub fn is_unconfigured(node: &Node) -> bool {
    node.variant == NodeVariant::Add && node.status == labels::STATUS_PENDING
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::types::Panel;

    fn layout() -> LayoutConfig {
        LayoutConfig::default()
    }

    fn seeded() -> Graph {
        Graph::seeded(
            &TriggerDescriptor::new("booked", "Appointment booked"),
            Point::new(480.0, 180.0),
        )
    }

    #[test]
    fn test_seeded_graph_has_trigger() {
        let graph = seeded();
        let trigger = graph.trigger().unwrap();
        assert_eq!(trigger.id, ids::TRIGGER_NODE);
        assert_eq!(trigger.title, "Appointment booked");
        assert_eq!(trigger.panel, Panel::TriggerEdit);
        assert_eq!(graph.next_node_index, 0);
    }

    #[test]
    fn test_insert_after_trigger() {
        let graph = insert_node_after(&seeded(), ids::TRIGGER_NODE, &layout());

        let node = graph.find_node("node-0").unwrap();
        assert_eq!(node.position, Point::new(480.0, 360.0));
        assert_eq!(node.variant, NodeVariant::Add);
        assert_eq!(graph.next_node_index, 1);

        let edge = &graph.edges[0];
        assert_eq!(edge.source_id, ids::TRIGGER_NODE);
        assert_eq!(edge.target_id, "node-0");
        assert_eq!((edge.source_side, edge.target_side), (Side::Bottom, Side::Top));
    }

    #[test]
    fn test_insert_after_missing_parent_is_noop() {
        let graph = seeded();
        assert_eq!(insert_node_after(&graph, "ghost", &layout()), graph);
    }

    #[test]
    fn test_insert_clamps_to_canvas_bottom() {
        let graph = GraphBuilder::new()
            .add_node("low", NodeVariant::Action, (0.0, 3100.0))
            .build();
        let graph = insert_node_after(&graph, "low", &layout());
        assert_eq!(graph.find_node("node-0").unwrap().position.y, layout().canvas_max_y);
    }

    #[test]
    fn test_remove_node_cascades_only_direct_edges() {
        let graph = insert_node_after(&seeded(), ids::TRIGGER_NODE, &layout());
        let graph = insert_node_after(&graph, "node-0", &layout());

        let outcome = remove_node(&graph, "node-0");
        assert!(outcome.removed);
        assert!(outcome.graph.edges.iter().all(|e| !e.touches("node-0")));
        assert!(outcome.graph.contains_node("node-1"));
        assert_eq!(outcome.graph.incoming_edges("node-1").count(), 0);
        assert_eq!(outcome.graph.next_node_index, 2);
    }

    #[test]
    fn test_allocation_skips_taken_ids() {
        let graph = GraphBuilder::new()
            .add_node("node-0", NodeVariant::Action, (480.0, 180.0))
            .add_node("node-1", NodeVariant::Action, (800.0, 180.0))
            .build();
        assert_eq!(graph.next_node_index, 0);

        let graph = insert_node_after(&graph, "node-0", &layout());
        assert!(graph.contains_node("node-2"));
        assert_eq!(graph.nodes.iter().filter(|n| n.id == "node-0").count(), 1);
        assert_eq!(graph.next_node_index, 3);

        let graph = insert_node_after(&graph, "node-2", &layout());
        assert!(graph.contains_node("node-3"));
    }

    #[test]
    fn test_remove_branch_target_clears_branch() {
        let graph = GraphBuilder::new()
            .add_node("switch", NodeVariant::Condition, (480.0, 360.0))
            .build();
        let graph = crate::branches::initialize_switch_node(
            &graph,
            "switch",
            1,
            &layout(),
            &StepOption::add_step(),
        );
        let target = graph.find_node("switch").unwrap().branches.as_ref().unwrap()[0]
            .target_id
            .clone();

        let graph = remove_node(&graph, &target).graph;
        let branches = graph.find_node("switch").unwrap().branches.clone().unwrap();
        assert_eq!(branches[0].target_id, "");
        assert!(!branches[1].target_id.is_empty());
    }

    #[test]
    fn test_remove_missing_node() {
        let graph = seeded();
        let outcome = remove_node(&graph, "ghost");
        assert!(!outcome.removed);
        assert_eq!(outcome.graph, graph);
    }

    #[test]
    fn test_remove_edge() {
        let graph = insert_node_after(&seeded(), ids::TRIGGER_NODE, &layout());
        let edge_id = graph.edges[0].id.clone();
        assert!(remove_edge(&graph, &edge_id).edges.is_empty());
        assert_eq!(remove_edge(&graph, "nope"), graph);
    }

    #[test]
    fn test_connect_replaces_outgoing_edge() {
        let graph = GraphBuilder::new()
            .add_node("a", NodeVariant::Action, (0.0, 0.0))
            .add_node("b", NodeVariant::Action, (0.0, 180.0))
            .add_node("c", NodeVariant::Action, (0.0, 360.0))
            .add_edge("a", "b")
            .build();

        let graph = connect_nodes(&graph, "a", "c", &ConnectOptions::default());
        let outgoing: Vec<_> = graph.outgoing_edges("a").collect();
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].target_id, "c");
    }

    #[test]
    fn test_connect_self_and_duplicate_are_noops() {
        let graph = GraphBuilder::new()
            .add_node("a", NodeVariant::Action, (0.0, 0.0))
            .add_node("b", NodeVariant::Action, (0.0, 180.0))
            .build();
        assert_eq!(connect_nodes(&graph, "a", "a", &ConnectOptions::default()), graph);

        let once = connect_nodes(&graph, "a", "b", &ConnectOptions::default());
        let twice = connect_nodes(&once, "a", "b", &ConnectOptions::default());
        assert_eq!(once, twice);
        assert_eq!(connect_nodes(&graph, "a", "ghost", &ConnectOptions::default()), graph);
    }

    #[test]
    fn test_connect_suffixes_colliding_id() {
        let mut graph = GraphBuilder::new()
            .add_node("a", NodeVariant::Action, (0.0, 0.0))
            .add_node("b", NodeVariant::Action, (0.0, 180.0))
            .add_node("c", NodeVariant::Action, (0.0, 360.0))
            .build();
        // An unrelated edge already holds the id a->b would synthesize
        graph.edges.push(Edge {
            id: "edge-a-b".to_string(),
            source_id: "c".to_string(),
            source_side: Side::Bottom,
            target_id: "b".to_string(),
            target_side: Side::Top,
            has_arrow: true,
            branch_id: None,
        });

        let graph = connect_nodes(&graph, "a", "b", &ConnectOptions::default());
        let edge = graph.outgoing_edges("a").next().unwrap();
        assert_eq!(edge.id, "edge-a-b-1");
    }

    #[test]
    fn test_update_node_with_option_derives_defaults() {
        let node = Node::add_step("node-0", Point::new(0.0, 0.0));
        let option = StepOption {
            id: "send-email".to_string(),
            label: "Send email".to_string(),
            description: "Email the client".to_string(),
            icon: "mail".to_string(),
            variant: NodeVariant::Action,
            type_label: "Action".to_string(),
            status: None,
            panel: None,
            category: "messaging".to_string(),
            initial_branch_count: None,
        };

        let updated = update_node_with_option(&node, &option);
        assert_eq!(updated.id, "node-0");
        assert_eq!(updated.title, "Send email");
        assert_eq!(updated.variant, NodeVariant::Action);
        assert_eq!(updated.status, labels::STATUS_READY);
        assert_eq!(updated.panel, Panel::Action);
        assert!(!is_unconfigured(&updated));
        assert!(is_unconfigured(&node));
    }

    #[test]
    fn test_refresh_trigger() {
        let graph = refresh_trigger(
            &seeded(),
            &TriggerDescriptor::new("cancelled", "Appointment cancelled").with_icon("x"),
        );
        let trigger = graph.trigger().unwrap();
        assert_eq!(trigger.title, "Appointment cancelled");
        assert_eq!(trigger.icon, "x");
    }

    #[test]
    fn test_move_node() {
        let graph = move_node(&seeded(), ids::TRIGGER_NODE, Point::new(480.0, 240.0));
        assert_eq!(graph.trigger().unwrap().position.y, 240.0);
    }
}
