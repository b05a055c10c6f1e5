//! Fluent builder for canvas graphs
//!
//! Provides a compact API for constructing graphs programmatically, mostly
//! for seeding editors and for tests.

use crate::catalog::TriggerDescriptor;
use crate::constants::ids;
use crate::types::{Edge, Graph, Node, NodeVariant, Point, Side};

/// Fluent builder for constructing canvas graphs
///
/// # Example
///
/// ```ignore
/// let graph = GraphBuilder::new()
///     .with_trigger(TriggerDescriptor::new("booked", "Appointment booked"), (480.0, 180.0))
///     .add_node("reminder", NodeVariant::Action, (480.0, 360.0))
///     .with_title("Send reminder")
///     .add_edge("trigger", "reminder")
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    next_node_index: usize,
}

impl GraphBuilder {
    /// Create a new, empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the reserved trigger node
    pub fn with_trigger(mut self, trigger: TriggerDescriptor, position: (f64, f64)) -> Self {
        let seeded = Graph::seeded(&trigger, Point::new(position.0, position.1));
        self.nodes.extend(seeded.nodes);
        self
    }

    /// Add a bare node of the given variant
    pub fn add_node(mut self, id: impl Into<String>, variant: NodeVariant, position: (f64, f64)) -> Self {
        self.nodes
            .push(Node::new(id, variant, Point::new(position.0, position.1)));
        self
    }

    /// Set the title on the most recently added node
    ///
    /// Must be called immediately after `add_node`.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.title = title.into();
        }
        self
    }

    /// Add a bottom-to-top edge with a synthesized id
    pub fn add_edge(self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.add_edge_with_sides(source, Side::Bottom, target, Side::Top)
    }

    /// Add an edge between explicit sides
    pub fn add_edge_with_sides(
        mut self,
        source: impl Into<String>,
        source_side: Side,
        target: impl Into<String>,
        target_side: Side,
    ) -> Self {
        let source = source.into();
        let target = target.into();
        self.edges.push(Edge {
            id: format!("{}{}-{}", ids::EDGE_PREFIX, source, target),
            source_id: source,
            source_side,
            target_id: target,
            target_side,
            has_arrow: true,
            branch_id: None,
        });
        self
    }

    /// Start synthetic node ids at `index`
    pub fn with_next_node_index(mut self, index: usize) -> Self {
        self.next_node_index = index;
        self
    }

    /// Build the graph without validation
    pub fn build(self) -> Graph {
        Graph {
            nodes: self.nodes,
            edges: self.edges,
            next_node_index: self.next_node_index,
        }
    }
}
