//! Pointer gesture state machine
//!
//! Every gesture (node drag, connection drag, pan) runs through the same
//! lifecycle, independent of any concrete input API:
//!
//! ```text
//! Idle --start--> Active --end----> Committed
//!                   |  ^
//!                 move |
//!                   +--+--cancel--> Cancelled
//! ```
//!
//! A gesture is keyed by the pointer that started it. Move, end and cancel
//! events from any other pointer are ignored, which also drops stale or
//! duplicated deliveries after a gesture has finished.

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Identifier the input layer assigns to one pointer (mouse, pen, touch)
pub type PointerId = u32;

/// Abstract pointer event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// Which button pressed a pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    #[default]
    Primary,
    /// Context-menu button
    Secondary,
}

/// A pointer event in canvas-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerEvent {
    pub pointer_id: PointerId,
    pub kind: PointerKind,
    pub position: Point,
    #[serde(default)]
    pub button: PointerButton,
}

/// Lifecycle phase of a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    #[default]
    Idle,
    Active,
    Committed,
    Cancelled,
}

/// A single gesture slot holding session data while active
#[derive(Debug, Clone)]
pub struct Gesture<S> {
    phase: GesturePhase,
    pointer_id: Option<PointerId>,
    session: Option<S>,
}

impl<S> Default for Gesture<S> {
    fn default() -> Self {
        Self {
            phase: GesturePhase::Idle,
            pointer_id: None,
            session: None,
        }
    }
}

impl<S> Gesture<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == GesturePhase::Active
    }

    /// Pointer driving the active gesture
    pub fn pointer_id(&self) -> Option<PointerId> {
        self.pointer_id.filter(|_| self.is_active())
    }

    /// Start a gesture; refused while another one is active
    pub fn start(&mut self, pointer_id: PointerId, session: S) -> bool {
        if self.is_active() {
            return false;
        }
        self.phase = GesturePhase::Active;
        self.pointer_id = Some(pointer_id);
        self.session = Some(session);
        true
    }

    /// Session of the active gesture, whichever pointer drives it
    pub fn session(&self) -> Option<&S> {
        self.session.as_ref().filter(|_| self.is_active())
    }

    /// Session for a move event, only if `pointer_id` owns the gesture
    pub fn session_for(&mut self, pointer_id: PointerId) -> Option<&mut S> {
        if self.owned_by(pointer_id) {
            self.session.as_mut()
        } else {
            None
        }
    }

    /// Finish the gesture normally, handing back its session
    pub fn commit(&mut self, pointer_id: PointerId) -> Option<S> {
        self.finish(pointer_id, GesturePhase::Committed)
    }

    /// Discard the gesture, handing back its session
    pub fn cancel(&mut self, pointer_id: PointerId) -> Option<S> {
        self.finish(pointer_id, GesturePhase::Cancelled)
    }

    /// Discard the active gesture regardless of which pointer owns it
    pub fn abort(&mut self) -> Option<S> {
        match self.pointer_id() {
            Some(pointer_id) => self.cancel(pointer_id),
            None => None,
        }
    }

    fn owned_by(&self, pointer_id: PointerId) -> bool {
        self.is_active() && self.pointer_id == Some(pointer_id)
    }

    fn finish(&mut self, pointer_id: PointerId, phase: GesturePhase) -> Option<S> {
        if !self.owned_by(pointer_id) {
            return None;
        }
        self.phase = phase;
        self.pointer_id = None;
        self.session.take()
    }
}
