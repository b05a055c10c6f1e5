//! Core types for workflow canvas graphs
//!
//! These types define the structure of an editor graph: nodes with their
//! canvas positions and display fields, the edges between their anchor
//! sides, and the branch lists carried by switch nodes.

use serde::{Deserialize, Serialize};

use crate::constants::{ids, labels};

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for an edge
pub type EdgeId = String;

/// Unique identifier for a branch (unique within its switch)
pub type BranchId = String;

/// A point in canvas-local (pre-transform) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset this point by `distance` along a unit direction
    pub fn offset(self, direction: (f64, f64), distance: f64) -> Self {
        Self {
            x: self.x + direction.0 * distance,
            y: self.y + direction.1 * distance,
        }
    }

    /// Manhattan distance, which equals the Euclidean one on axis-aligned segments
    pub fn axis_distance(self, other: Point) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Half extents of a node's axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HalfSize {
    pub half_width: f64,
    pub half_height: f64,
}

/// A side of a node's boundary where an edge leaves or arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Unit direction pointing away from the node on this side
    pub fn direction(self) -> (f64, f64) {
        match self {
            Side::Top => (0.0, -1.0),
            Side::Bottom => (0.0, 1.0),
            Side::Left => (-1.0, 0.0),
            Side::Right => (1.0, 0.0),
        }
    }

    /// Whether this side's direction acts on the vertical axis
    pub fn is_vertical(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }

    /// Anchor point on this side of a node centered at `center`
    pub fn anchor_point(self, center: Point, size: HalfSize) -> Point {
        match self {
            Side::Top => Point::new(center.x, center.y - size.half_height),
            Side::Bottom => Point::new(center.x, center.y + size.half_height),
            Side::Left => Point::new(center.x - size.half_width, center.y),
            Side::Right => Point::new(center.x + size.half_width, center.y),
        }
    }
}

/// Kind of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeVariant {
    /// The reserved workflow trigger
    Trigger,
    /// A configured step
    Action,
    /// A switch with branches
    Condition,
    /// An unconfigured step waiting for a catalog choice
    Add,
    /// A non-interactive stand-in
    Placeholder,
}

impl NodeVariant {
    /// Placeholders are never dragged, connected, selected for deletion or hit by drops
    pub fn is_placeholder(self) -> bool {
        matches!(self, NodeVariant::Placeholder)
    }

    /// Panel opened for this variant when the node names none
    pub fn default_panel(self) -> Panel {
        match self {
            NodeVariant::Trigger => Panel::TriggerEdit,
            NodeVariant::Action => Panel::Action,
            NodeVariant::Condition => Panel::Condition,
            NodeVariant::Add | NodeVariant::Placeholder => Panel::Catalog,
        }
    }

    /// Status assigned for this variant when a descriptor names none
    pub fn default_status(self) -> &'static str {
        match self {
            NodeVariant::Trigger => labels::STATUS_ACTIVE,
            NodeVariant::Action | NodeVariant::Condition => labels::STATUS_READY,
            NodeVariant::Add | NodeVariant::Placeholder => labels::STATUS_PENDING,
        }
    }
}

/// Side panel the editor shows next to the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Panel {
    /// Step catalog (choose what a node does)
    #[default]
    Catalog,
    /// Trigger editor
    TriggerEdit,
    /// Action step settings
    Action,
    /// Switch/branch settings
    Condition,
}

/// Kind of a switch branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchType {
    Condition,
    Default,
}

/// One outgoing path of a switch node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: BranchId,
    pub label: String,
    #[serde(rename = "type")]
    pub branch_type: BranchType,
    /// Condition expression text (empty for the default branch)
    #[serde(default)]
    pub condition: String,
    /// Node this branch leads to; may be empty until materialized
    #[serde(default)]
    pub target_id: NodeId,
}

impl Branch {
    /// Create a condition branch with no target yet
    pub fn condition(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            branch_type: BranchType::Condition,
            condition: String::new(),
            target_id: String::new(),
        }
    }

    /// Create the default branch with no target yet
    pub fn default_branch() -> Self {
        Self {
            id: ids::DEFAULT_BRANCH.to_string(),
            label: labels::DEFAULT_BRANCH.to_string(),
            branch_type: BranchType::Default,
            condition: String::new(),
            target_id: String::new(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.branch_type == BranchType::Default
    }
}

/// A node instance on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,
    pub title: String,
    pub description: String,
    pub variant: NodeVariant,
    /// Center of the node in canvas-local coordinates
    pub position: Point,
    pub panel: Panel,
    /// Opaque icon key, resolved by the presentation layer
    pub icon: String,
    pub status: String,
    pub category: String,
    /// Branch list of a switch node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<Branch>>,
    /// Switch this node is a branch target of
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_node_id: Option<NodeId>,
    /// Branch of the parent switch this node is the target of
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<BranchId>,
}

impl Node {
    /// Create an unconfigured "add step" node
    pub fn add_step(id: impl Into<String>, position: Point) -> Self {
        Self {
            id: id.into(),
            title: labels::ADD_STEP_TITLE.to_string(),
            description: labels::ADD_STEP_DESCRIPTION.to_string(),
            variant: NodeVariant::Add,
            position,
            panel: Panel::Catalog,
            icon: labels::ADD_STEP_ICON.to_string(),
            status: labels::STATUS_PENDING.to_string(),
            category: String::new(),
            branches: None,
            parent_node_id: None,
            branch_id: None,
        }
    }

    /// Create a bare node of the given variant with default panel and status
    pub fn new(id: impl Into<String>, variant: NodeVariant, position: Point) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            description: String::new(),
            variant,
            position,
            panel: variant.default_panel(),
            icon: String::new(),
            status: variant.default_status().to_string(),
            category: String::new(),
            branches: None,
            parent_node_id: None,
            branch_id: None,
        }
    }

    pub fn is_trigger(&self) -> bool {
        self.variant == NodeVariant::Trigger
    }

    pub fn is_placeholder(&self) -> bool {
        self.variant.is_placeholder()
    }

    /// Whether `point` lies within `center ± size` (edges inclusive)
    pub fn contains(&self, point: Point, size: HalfSize) -> bool {
        (point.x - self.position.x).abs() <= size.half_width
            && (point.y - self.position.y).abs() <= size.half_height
    }
}

/// A directed connection between two nodes' anchor sides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Unique identifier for this edge
    pub id: EdgeId,
    pub source_id: NodeId,
    pub source_side: Side,
    pub target_id: NodeId,
    pub target_side: Side,
    pub has_arrow: bool,
    /// Set on switch-to-target edges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<BranchId>,
}

impl Edge {
    /// Whether this edge touches `node_id` at either end
    pub fn touches(&self, node_id: &str) -> bool {
        self.source_id == node_id || self.target_id == node_id
    }
}

/// A complete editor graph snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Counter behind synthetic `node-{n}` ids; only ever grows
    pub next_node_index: usize,
}

impl Graph {
    /// Find a node by ID
    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find a node by ID (mutable)
    pub fn find_node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Find an edge by ID
    pub fn find_edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// The reserved trigger node, if seeded
    pub fn trigger(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is_trigger())
    }

    /// Get edges coming into a node
    pub fn incoming_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.target_id == node_id)
    }

    /// Get edges going out of a node
    pub fn outgoing_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.source_id == node_id)
    }

    pub fn has_outgoing(&self, node_id: &str) -> bool {
        self.outgoing_edges(node_id).next().is_some()
    }

    /// Look up the child a switch materialized for one of its branches
    pub fn branch_target(&self, switch_id: &str, branch_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| {
            n.parent_node_id.as_deref() == Some(switch_id)
                && n.branch_id.as_deref() == Some(branch_id)
        })
    }
}
