//! Interaction controller
//!
//! Owns the current graph snapshot, the editor state (selection, panel,
//! tool) and the transient gesture sessions. Pointer input is translated
//! into pure graph operations; every new snapshot is re-routed before the
//! handler returns, so the render output always matches the graph.
//!
//! All positions handled here are canvas-local. The viewport's pan/zoom
//! never enters this module.

use serde::{Deserialize, Serialize};

use crate::branches::{
    append_switch_branch, clear_switch_branches, initialize_switch_node, remove_switch_branch,
    set_switch_branch_condition,
};
use crate::catalog::{StepCatalog, StepOption, TriggerDescriptor};
use crate::config::EditorConfig;
use crate::error::Result;
use crate::events::{EditorEvent, EventQueue};
use crate::gesture::{Gesture, PointerId};
use crate::graph::{
    apply_option_to_node, connect_nodes, insert_node_after, move_node, refresh_trigger,
    remove_edge, remove_node, ConnectOptions,
};
use crate::render::{self, anchor_exposed, RenderOutput, RoutedEdge, SOURCE_ANCHOR_SIDE};
use crate::types::{Graph, Node, NodeId, NodeVariant, Panel, Point, Side};

/// Active canvas tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Pointer drags on nodes pan the canvas
    Pan,
    /// Pointer drags on nodes move them
    #[default]
    Select,
}

/// Selection and panel state, transitioned only through pure functions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    pub selected_node_id: Option<NodeId>,
    pub active_panel: Panel,
    pub tool: Tool,
}

impl EditorState {
    /// Select a node and open the panel it asks for
    pub fn select(&self, node: &Node) -> Self {
        Self {
            selected_node_id: Some(node.id.clone()),
            active_panel: panel_for(node),
            tool: self.tool,
        }
    }

    /// Clear the selection and fall back to the catalog
    pub fn clear_selection(&self) -> Self {
        Self {
            selected_node_id: None,
            active_panel: Panel::Catalog,
            tool: self.tool,
        }
    }

    pub fn with_tool(&self, tool: Tool) -> Self {
        Self {
            tool,
            ..self.clone()
        }
    }

    pub fn with_panel(&self, panel: Panel) -> Self {
        Self {
            active_panel: panel,
            ..self.clone()
        }
    }
}

/// Panel opened when `node` is selected
pub fn panel_for(node: &Node) -> Panel {
    match node.variant {
        NodeVariant::Trigger => Panel::TriggerEdit,
        NodeVariant::Add => Panel::Catalog,
        _ => node.panel,
    }
}

/// The single in-progress connection drag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingConnection {
    pub anchor_node_id: NodeId,
    pub anchor_side: Side,
    /// Pointer position the preview path is routed to
    pub live_position: Point,
}

#[derive(Debug, Clone)]
struct NodeDrag {
    node_id: NodeId,
    origin: Point,
    pointer_origin: Point,
}

/// Single owner of the editor graph and its gesture state
#[derive(Debug)]
pub struct InteractionController {
    graph: Graph,
    state: EditorState,
    config: EditorConfig,
    routes: Vec<RoutedEdge>,
    connection: Gesture<PendingConnection>,
    node_drag: Gesture<NodeDrag>,
    events: EventQueue,
    /// Option applied to materialized branch targets
    fill_option: StepOption,
}

impl InteractionController {
    /// Create a controller over an existing snapshot
    pub fn new(graph: Graph, config: EditorConfig) -> Self {
        Self::with_state(graph, EditorState::default(), config)
    }

    /// Create a controller with an externally supplied editor state
    pub fn with_state(graph: Graph, state: EditorState, config: EditorConfig) -> Self {
        let routes = render::route_edges(&graph, &config);
        Self {
            graph,
            state,
            config,
            routes,
            connection: Gesture::new(),
            node_drag: Gesture::new(),
            events: EventQueue::new(),
            fill_option: StepOption::add_step(),
        }
    }

    /// Create a controller over a graph holding only the trigger
    pub fn seeded(trigger: &TriggerDescriptor, position: Point, config: EditorConfig) -> Self {
        Self::new(Graph::seeded(trigger, position), config)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Precomputed paths for every routable edge
    pub fn routes(&self) -> &[RoutedEdge] {
        &self.routes
    }

    pub fn pending_connection(&self) -> Option<&PendingConnection> {
        self.connection.session()
    }

    /// Node currently being dragged
    pub fn dragged_node(&self) -> Option<&str> {
        self.node_drag.session().map(|d| d.node_id.as_str())
    }

    /// Materialize new branch targets from `catalog`'s default option
    pub fn use_catalog(&mut self, catalog: &StepCatalog) {
        self.fill_option = catalog.default_option();
    }

    /// Option new branch targets start out as
    pub fn fill_option(&self) -> &StepOption {
        &self.fill_option
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        self.events.drain()
    }

    /// Paint list for the current snapshot
    pub fn render(&self) -> RenderOutput {
        render::render(
            &self.graph,
            &self.state,
            &self.routes,
            self.connection.session(),
            &self.config,
        )
    }

    /// Install a new snapshot and re-route every edge
    fn commit(&mut self, graph: Graph) {
        if graph == self.graph {
            return;
        }
        self.graph = graph;
        self.routes = render::route_edges(&self.graph, &self.config);
        self.events.push(EditorEvent::GraphChanged);
    }

    fn set_state(&mut self, state: EditorState) {
        if state.selected_node_id != self.state.selected_node_id {
            self.events
                .push(EditorEvent::selection(state.selected_node_id.as_deref()));
        }
        if state.active_panel != self.state.active_panel {
            self.events.push(EditorEvent::PanelChanged {
                panel: state.active_panel,
            });
        }
        self.state = state;
    }

    pub fn set_tool(&mut self, tool: Tool) {
        let state = self.state.with_tool(tool);
        self.set_state(state);
    }

    // ---- selection and panels ----

    /// Select a node and route to its panel; ignored with the pan tool
    pub fn click_node(&mut self, node_id: &str) {
        if self.state.tool == Tool::Pan {
            return;
        }
        let Some(node) = self.graph.find_node(node_id) else {
            return;
        };
        let state = self.state.select(node);
        self.set_state(state);
    }

    /// Apply a catalog option to the selected node
    ///
    /// A branching option also initializes the node's switch branches; any
    /// other option turns a switch back into a plain step, dropping its
    /// branch targets and their edges.
    pub fn apply_option(&mut self, option: &StepOption) {
        let Some(node_id) = self.state.selected_node_id.clone() else {
            return;
        };
        let Some(node) = self.graph.find_node(&node_id) else {
            return;
        };
        if node.is_trigger() {
            return;
        }

        let mut graph = apply_option_to_node(&self.graph, &node_id, option);
        if option.is_branching() {
            let count = option
                .initial_branch_count
                .unwrap_or(self.config.switch.default_condition_branches);
            graph = initialize_switch_node(
                &graph,
                &node_id,
                count,
                &self.config.layout,
                &self.fill_option,
            );
        } else {
            graph = clear_switch_branches(&graph, &node_id);
        }
        self.commit(graph);
        self.drop_sessions_for_missing_nodes();

        if let Some(node) = self.graph.find_node(&node_id) {
            let state = self.state.select(node);
            self.set_state(state);
        }
    }

    /// Look up a catalog option by id and apply it to the selected node
    pub fn apply_option_by_id(&mut self, catalog: &StepCatalog, option_id: &str) -> Result<()> {
        let option = catalog.require_option(option_id)?.clone();
        self.use_catalog(catalog);
        self.apply_option(&option);
        Ok(())
    }

    /// Refresh the trigger's display fields
    pub fn apply_trigger(&mut self, trigger: &TriggerDescriptor) {
        let graph = refresh_trigger(&self.graph, trigger);
        self.commit(graph);
    }

    // ---- structural edits ----

    /// Append an unconfigured step after `parent_id`
    pub fn insert_after(&mut self, parent_id: &str) {
        let graph = insert_node_after(&self.graph, parent_id, &self.config.layout);
        self.commit(graph);
    }

    pub fn append_branch(&mut self, switch_id: &str) {
        let graph = append_switch_branch(
            &self.graph,
            switch_id,
            &self.config.layout,
            &self.fill_option,
        );
        self.commit(graph);
    }

    pub fn set_branch_condition(&mut self, switch_id: &str, branch_id: &str, condition: &str) {
        let graph = set_switch_branch_condition(
            &self.graph,
            switch_id,
            branch_id,
            condition,
            &self.config.layout,
            &self.fill_option,
        );
        self.commit(graph);
    }

    pub fn remove_branch(&mut self, switch_id: &str, branch_id: &str) {
        let graph = remove_switch_branch(
            &self.graph,
            switch_id,
            branch_id,
            &self.config.layout,
            &self.fill_option,
        );
        self.commit(graph);
        self.drop_sessions_for_missing_nodes();
        self.clear_selection_if_missing();
    }

    /// Context action on a node: remove it and its direct edges
    ///
    /// Refused for the trigger and for placeholders. Returns whether the
    /// node was removed.
    pub fn delete_node(&mut self, node_id: &str) -> bool {
        match self.graph.find_node(node_id) {
            None => return false,
            Some(node) if node.is_trigger() || node.is_placeholder() => {
                log::debug!("Refused to remove protected node '{}'", node_id);
                return false;
            }
            Some(_) => {}
        }

        let outcome = remove_node(&self.graph, node_id);
        if !outcome.removed {
            return false;
        }
        self.commit(outcome.graph);
        self.drop_sessions_for_missing_nodes();
        self.clear_selection_if_missing();
        true
    }

    /// Context action on an edge: remove only that edge
    pub fn delete_edge(&mut self, edge_id: &str) -> bool {
        if self.graph.find_edge(edge_id).is_none() {
            return false;
        }
        let graph = remove_edge(&self.graph, edge_id);
        self.commit(graph);
        self.events.push(EditorEvent::EdgeRemoved {
            edge_id: edge_id.to_string(),
        });
        true
    }

    fn clear_selection_if_missing(&mut self) {
        let missing = self
            .state
            .selected_node_id
            .as_deref()
            .is_some_and(|id| !self.graph.contains_node(id));
        if missing {
            let state = self.state.clear_selection();
            self.set_state(state);
        }
    }

    /// Discard gestures whose node disappeared under them
    fn drop_sessions_for_missing_nodes(&mut self) {
        let drag_lost = self
            .node_drag
            .session()
            .is_some_and(|d| !self.graph.contains_node(&d.node_id));
        if drag_lost {
            if let Some(drag) = self.node_drag.abort() {
                self.events.push(EditorEvent::DragCancelled {
                    node_id: drag.node_id,
                });
            }
        }

        let anchor_lost = self
            .connection
            .session()
            .is_some_and(|c| !self.graph.contains_node(&c.anchor_node_id));
        if anchor_lost {
            if let Some(pending) = self.connection.abort() {
                self.events.push(EditorEvent::ConnectionDiscarded {
                    node_id: pending.anchor_node_id,
                });
            }
        }
    }

    // ---- gestures ----

    /// Pointer-down on a node body. Returns whether a drag started, in
    /// which case the pointer is captured and background panning must not start.
    pub fn begin_node_drag(&mut self, node_id: &str, pointer_id: PointerId, position: Point) -> bool {
        if self.state.tool != Tool::Select {
            return false;
        }
        let Some(node) = self.graph.find_node(node_id) else {
            return false;
        };
        if node.is_placeholder() {
            return false;
        }

        let drag = NodeDrag {
            node_id: node_id.to_string(),
            origin: node.position,
            pointer_origin: position,
        };
        if !self.node_drag.start(pointer_id, drag) {
            return false;
        }
        log::debug!("Started dragging '{}' with pointer {}", node_id, pointer_id);
        true
    }

    /// Pointer-down on a node's anchor. Returns whether a connection drag
    /// started, in which case background panning must not start.
    pub fn begin_connection(&mut self, node_id: &str, pointer_id: PointerId, position: Point) -> bool {
        if !anchor_exposed(&self.graph, node_id) {
            return false;
        }
        let pending = PendingConnection {
            anchor_node_id: node_id.to_string(),
            anchor_side: SOURCE_ANCHOR_SIDE,
            live_position: position,
        };
        if !self.connection.start(pointer_id, pending) {
            return false;
        }
        log::debug!("Started connection from '{}' with pointer {}", node_id, pointer_id);
        self.events.push(EditorEvent::ConnectionStarted {
            node_id: node_id.to_string(),
        });
        true
    }

    /// Pointer-move. Returns whether a gesture owned by this pointer consumed it.
    pub fn pointer_move(&mut self, pointer_id: PointerId, position: Point) -> bool {
        let mut handled = false;

        if let Some(pending) = self.connection.session_for(pointer_id) {
            pending.live_position = position;
            handled = true;
        }

        let drag_target = self.node_drag.session_for(pointer_id).map(|drag| {
            // Nodes only travel vertically
            let y = drag.origin.y + (position.y - drag.pointer_origin.y);
            (drag.node_id.clone(), Point::new(drag.origin.x, y))
        });
        if let Some((node_id, target)) = drag_target {
            let clamped = Point::new(target.x, self.config.layout.clamp_y(target.y));
            log::trace!("Dragging '{}' to y={}", node_id, clamped.y);
            let graph = move_node(&self.graph, &node_id, clamped);
            self.commit(graph);
            handled = true;
        }

        handled
    }

    /// Pointer-up. Commits whichever gesture this pointer owns.
    pub fn pointer_up(&mut self, pointer_id: PointerId, position: Point) -> bool {
        let mut handled = false;

        if let Some(mut pending) = self.connection.commit(pointer_id) {
            pending.live_position = position;
            self.finish_connection(pending);
            handled = true;
        }

        if let Some(drag) = self.node_drag.commit(pointer_id) {
            log::debug!("Finished dragging '{}'", drag.node_id);
            self.events.push(EditorEvent::DragCommitted {
                node_id: drag.node_id,
            });
            handled = true;
        }

        handled
    }

    /// Pointer-cancel. Discards this pointer's gestures without touching the graph.
    pub fn pointer_cancel(&mut self, pointer_id: PointerId) -> bool {
        let mut handled = false;

        if let Some(pending) = self.connection.cancel(pointer_id) {
            log::debug!("Cancelled connection from '{}'", pending.anchor_node_id);
            self.events.push(EditorEvent::ConnectionDiscarded {
                node_id: pending.anchor_node_id,
            });
            handled = true;
        }

        if let Some(drag) = self.node_drag.cancel(pointer_id) {
            log::debug!("Cancelled dragging '{}'", drag.node_id);
            self.events.push(EditorEvent::DragCancelled {
                node_id: drag.node_id,
            });
            handled = true;
        }

        handled
    }

    /// First non-placeholder node other than `exclude` whose box contains `point`
    pub fn hit_test(&self, point: Point, exclude: &str) -> Option<&Node> {
        let size = self.config.node.half_size();
        self.graph
            .nodes
            .iter()
            .filter(|n| n.id != exclude && !n.is_placeholder())
            .find(|n| n.contains(point, size))
    }

    fn finish_connection(&mut self, pending: PendingConnection) {
        let source_id = pending.anchor_node_id;
        let target_id = self
            .hit_test(pending.live_position, &source_id)
            .map(|n| n.id.clone());

        let Some(target_id) = target_id else {
            log::debug!("Connection from '{}' dropped on empty canvas", source_id);
            self.events
                .push(EditorEvent::ConnectionDiscarded { node_id: source_id });
            return;
        };

        let opts = ConnectOptions {
            source_side: pending.anchor_side,
            ..ConnectOptions::default()
        };
        let graph = connect_nodes(&self.graph, &source_id, &target_id, &opts);
        self.commit(graph);
        self.events.push(EditorEvent::ConnectionCommitted {
            source_id,
            target_id,
        });
    }
}
