//! Pointer dispatch between the interaction controller and the viewport
//!
//! Interactive elements (draggable nodes, exposed anchors) are pan-locked:
//! when they consume a pointer-down, the background pan never starts for
//! that pointer. Anything they decline falls through to the viewport.

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::gesture::{PointerButton, PointerEvent, PointerId, PointerKind};
use crate::interaction::InteractionController;
use crate::types::{EdgeId, Graph, NodeId, Point};
use crate::viewport::Viewport;

/// Element under the pointer, as reported by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PointerTarget {
    Background,
    Node(NodeId),
    Anchor(NodeId),
    Edge(EdgeId),
}

/// One pointer event with both coordinate spaces
///
/// `event.position` is canvas-local and drives the controller; `screen` is
/// the raw pixel position and drives panning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerInput {
    pub target: PointerTarget,
    pub event: PointerEvent,
    pub screen: Point,
}

/// Who handled a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dispatch {
    /// A pan-locked element or its gesture
    Controller,
    /// The background pan
    Viewport,
    Ignored,
}

/// An editor canvas: controller plus viewport
#[derive(Debug)]
pub struct Canvas {
    controller: InteractionController,
    viewport: Viewport,
}

impl Canvas {
    pub fn new(graph: Graph, config: EditorConfig) -> Self {
        let viewport = Viewport::new(config.viewport.clone());
        Self {
            controller: InteractionController::new(graph, config),
            viewport,
        }
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut InteractionController {
        &mut self.controller
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Route one pointer event
    pub fn handle(&mut self, input: &PointerInput) -> Dispatch {
        let PointerEvent {
            pointer_id,
            kind,
            position,
            button,
        } = input.event;

        match kind {
            PointerKind::Down => self.pointer_down(&input.target, pointer_id, position, button, input.screen),
            PointerKind::Move => {
                if self.controller.pointer_move(pointer_id, position) {
                    Dispatch::Controller
                } else if self.viewport.pointer_move(pointer_id, input.screen) {
                    Dispatch::Viewport
                } else {
                    Dispatch::Ignored
                }
            }
            PointerKind::Up => {
                if self.controller.pointer_up(pointer_id, position) {
                    Dispatch::Controller
                } else if self.viewport.pointer_up(pointer_id) {
                    Dispatch::Viewport
                } else {
                    Dispatch::Ignored
                }
            }
            PointerKind::Cancel => {
                let controller = self.controller.pointer_cancel(pointer_id);
                let viewport = self.viewport.pointer_cancel(pointer_id);
                match (controller, viewport) {
                    (true, _) => Dispatch::Controller,
                    (false, true) => Dispatch::Viewport,
                    (false, false) => Dispatch::Ignored,
                }
            }
        }
    }

    fn pointer_down(
        &mut self,
        target: &PointerTarget,
        pointer_id: PointerId,
        position: Point,
        button: PointerButton,
        screen: Point,
    ) -> Dispatch {
        if button == PointerButton::Secondary {
            return self.context_action(target);
        }

        let consumed = match target {
            PointerTarget::Anchor(node_id) => {
                self.controller.begin_connection(node_id, pointer_id, position)
            }
            PointerTarget::Node(node_id) => {
                self.controller.begin_node_drag(node_id, pointer_id, position)
            }
            PointerTarget::Background | PointerTarget::Edge(_) => false,
        };
        if consumed {
            return Dispatch::Controller;
        }

        if self.viewport.pointer_down(pointer_id, screen) {
            Dispatch::Viewport
        } else {
            Dispatch::Ignored
        }
    }

    fn context_action(&mut self, target: &PointerTarget) -> Dispatch {
        let handled = match target {
            PointerTarget::Node(node_id) => self.controller.delete_node(node_id),
            PointerTarget::Edge(edge_id) => self.controller.delete_edge(edge_id),
            PointerTarget::Anchor(_) | PointerTarget::Background => false,
        };
        if handled {
            Dispatch::Controller
        } else {
            Dispatch::Ignored
        }
    }

    /// A completed click on an element
    pub fn click(&mut self, target: &PointerTarget) {
        if let PointerTarget::Node(node_id) = target {
            self.controller.click_node(node_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::interaction::Tool;
    use crate::types::NodeVariant;

    fn canvas() -> Canvas {
        let graph = GraphBuilder::new()
            .add_node("a", NodeVariant::Action, (480.0, 180.0))
            .add_node("b", NodeVariant::Action, (480.0, 360.0))
            .build();
        Canvas::new(graph, EditorConfig::default())
    }

    fn input(target: PointerTarget, kind: PointerKind, x: f64, y: f64) -> PointerInput {
        PointerInput {
            target,
            event: PointerEvent {
                pointer_id: 1,
                kind,
                position: Point::new(x, y),
                button: PointerButton::Primary,
            },
            screen: Point::new(x, y),
        }
    }

    #[test]
    fn test_anchor_drag_is_pan_locked() {
        let mut canvas = canvas();
        let anchor = PointerTarget::Anchor("a".to_string());

        let down = canvas.handle(&input(anchor.clone(), PointerKind::Down, 480.0, 216.0));
        assert_eq!(down, Dispatch::Controller);
        assert!(!canvas.viewport().is_panning());

        let moved = canvas.handle(&input(anchor.clone(), PointerKind::Move, 480.0, 350.0));
        assert_eq!(moved, Dispatch::Controller);
        assert_eq!(canvas.viewport().offset(), Point::default());

        canvas.handle(&input(anchor, PointerKind::Up, 480.0, 350.0));
        assert_eq!(canvas.controller().graph().outgoing_edges("a").count(), 1);
    }

    #[test]
    fn test_background_pans() {
        let mut canvas = canvas();
        let bg = PointerTarget::Background;
        assert_eq!(canvas.handle(&input(bg.clone(), PointerKind::Down, 0.0, 0.0)), Dispatch::Viewport);
        canvas.handle(&input(bg.clone(), PointerKind::Move, 25.0, -10.0));
        assert_eq!(canvas.viewport().offset(), Point::new(25.0, -10.0));
        assert_eq!(canvas.handle(&input(bg, PointerKind::Up, 25.0, -10.0)), Dispatch::Viewport);
    }

    #[test]
    fn test_node_with_pan_tool_falls_through_to_pan() {
        let mut canvas = canvas();
        canvas.controller_mut().set_tool(Tool::Pan);
        let node = PointerTarget::Node("b".to_string());

        assert_eq!(canvas.handle(&input(node.clone(), PointerKind::Down, 480.0, 360.0)), Dispatch::Viewport);
        canvas.handle(&input(node, PointerKind::Move, 480.0, 400.0));
        assert_eq!(canvas.controller().graph().find_node("b").unwrap().position.y, 360.0);
        assert_eq!(canvas.viewport().offset(), Point::new(0.0, 40.0));
    }

    #[test]
    fn test_cancel_clears_everything() {
        let mut canvas = canvas();
        let anchor = PointerTarget::Anchor("b".to_string());
        canvas.handle(&input(anchor.clone(), PointerKind::Down, 480.0, 396.0));
        let before = canvas.controller().graph().clone();

        assert_eq!(canvas.handle(&input(anchor, PointerKind::Cancel, 0.0, 0.0)), Dispatch::Controller);
        assert!(canvas.controller().pending_connection().is_none());
        assert_eq!(canvas.controller().graph(), &before);
    }

    #[test]
    fn test_secondary_click_removes_edge() {
        let mut canvas = canvas();
        let anchor = PointerTarget::Anchor("a".to_string());
        canvas.handle(&input(anchor.clone(), PointerKind::Down, 480.0, 216.0));
        canvas.handle(&input(anchor, PointerKind::Up, 480.0, 360.0));
        let edge_id = canvas.controller().graph().edges[0].id.clone();

        let mut context = input(PointerTarget::Edge(edge_id), PointerKind::Down, 0.0, 0.0);
        context.event.button = PointerButton::Secondary;
        assert_eq!(canvas.handle(&context), Dispatch::Controller);
        assert!(canvas.controller().graph().edges.is_empty());
        assert!(!canvas.viewport().is_panning());
    }

    #[test]
    fn test_click_selects() {
        let mut canvas = canvas();
        canvas.click(&PointerTarget::Node("a".to_string()));
        assert_eq!(canvas.controller().state().selected_node_id.as_deref(), Some("a"));
    }
}
