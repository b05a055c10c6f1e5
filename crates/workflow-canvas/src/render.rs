//! Render output derived from a graph snapshot
//!
//! Everything here is in canvas-local coordinates. The pan/zoom transform
//! is applied by the presentation layer on top of this output and never
//! flows back into it.

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::interaction::{EditorState, PendingConnection, Tool};
use crate::routing::{build_orthogonal_path, build_preview_path};
use crate::types::{BranchId, EdgeId, Graph, HalfSize, NodeId, NodeVariant, Point, Side};

/// Side every connection drag starts from
pub const SOURCE_ANCHOR_SIDE: Side = Side::Bottom;

/// Precomputed path of one stored edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedEdge {
    pub edge_id: EdgeId,
    pub path: String,
}

/// A node ready to paint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: NodeId,
    pub title: String,
    pub description: String,
    pub variant: NodeVariant,
    pub icon: String,
    pub status: String,
    pub position: Point,
    pub half_size: HalfSize,
    pub selected: bool,
    pub draggable: bool,
}

/// An edge ready to paint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    pub id: EdgeId,
    pub source_id: NodeId,
    /// Empty for the live preview
    pub target_id: NodeId,
    pub path: String,
    pub has_arrow: bool,
    /// The in-progress connection drag
    pub preview: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<BranchId>,
}

/// A connection handle ready to paint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderAnchor {
    pub node_id: NodeId,
    pub side: Side,
    pub position: Point,
    /// Whether a connection drag may start here
    pub interactive: bool,
}

/// Complete paint list for one snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOutput {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
    pub anchors: Vec<RenderAnchor>,
}

/// Whether a connection drag may start from `node_id`
///
/// Only non-placeholder nodes without an outgoing edge expose their anchor.
pub fn anchor_exposed(graph: &Graph, node_id: &str) -> bool {
    graph
        .find_node(node_id)
        .is_some_and(|n| !n.is_placeholder() && !graph.has_outgoing(node_id))
}

/// Canvas position of a node's anchor on `side`
pub fn anchor_position(graph: &Graph, node_id: &str, side: Side, size: HalfSize) -> Option<Point> {
    graph
        .find_node(node_id)
        .map(|n| side.anchor_point(n.position, size))
}

/// Route every edge whose endpoints both exist
pub fn route_edges(graph: &Graph, config: &EditorConfig) -> Vec<RoutedEdge> {
    let size = config.node.half_size();
    graph
        .edges
        .iter()
        .filter_map(|edge| {
            let start = anchor_position(graph, &edge.source_id, edge.source_side, size)?;
            let end = anchor_position(graph, &edge.target_id, edge.target_side, size)?;
            Some(RoutedEdge {
                edge_id: edge.id.clone(),
                path: build_orthogonal_path(
                    start,
                    end,
                    edge.source_side,
                    edge.target_side,
                    &config.routing,
                ),
            })
        })
        .collect()
}

/// Assemble the paint list from a snapshot and its precomputed routes
pub fn render(
    graph: &Graph,
    state: &EditorState,
    routes: &[RoutedEdge],
    pending: Option<&PendingConnection>,
    config: &EditorConfig,
) -> RenderOutput {
    let size = config.node.half_size();

    let nodes = graph
        .nodes
        .iter()
        .map(|node| RenderNode {
            id: node.id.clone(),
            title: node.title.clone(),
            description: node.description.clone(),
            variant: node.variant,
            icon: node.icon.clone(),
            status: node.status.clone(),
            position: node.position,
            half_size: size,
            selected: state.selected_node_id.as_deref() == Some(node.id.as_str()),
            draggable: state.tool == Tool::Select && !node.is_placeholder(),
        })
        .collect();

    let mut edges: Vec<RenderEdge> = routes
        .iter()
        .filter_map(|routed| {
            let edge = graph.find_edge(&routed.edge_id)?;
            Some(RenderEdge {
                id: edge.id.clone(),
                source_id: edge.source_id.clone(),
                target_id: edge.target_id.clone(),
                path: routed.path.clone(),
                has_arrow: edge.has_arrow,
                preview: false,
                branch_id: edge.branch_id.clone(),
            })
        })
        .collect();

    if let Some(pending) = pending {
        if let Some(anchor) =
            anchor_position(graph, &pending.anchor_node_id, pending.anchor_side, size)
        {
            edges.push(RenderEdge {
                id: format!("preview-{}", pending.anchor_node_id),
                source_id: pending.anchor_node_id.clone(),
                target_id: String::new(),
                path: build_preview_path(
                    anchor,
                    pending.anchor_side,
                    pending.live_position,
                    &config.routing,
                ),
                has_arrow: true,
                preview: true,
                branch_id: None,
            });
        }
    }

    let anchors = graph
        .nodes
        .iter()
        .filter(|n| !n.is_placeholder())
        .map(|node| RenderAnchor {
            node_id: node.id.clone(),
            side: SOURCE_ANCHOR_SIDE,
            position: SOURCE_ANCHOR_SIDE.anchor_point(node.position, size),
            interactive: !graph.has_outgoing(&node.id),
        })
        .collect();

    RenderOutput {
        nodes,
        edges,
        anchors,
    }
}
