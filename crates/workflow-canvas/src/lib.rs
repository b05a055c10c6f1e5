//! Workflow Canvas - graph editing core for a visual workflow builder
//!
//! This crate holds everything behind a node-and-edge workflow canvas that
//! does not need a renderer:
//!
//! - A graph model of steps, switch branches and directed edges, edited
//!   only through pure snapshot-in/snapshot-out operations
//! - Orthogonal edge routing with rounded corners, emitted as SVG path data
//! - An interaction controller for node drags, connection drags and
//!   context actions, built on pointer-id keyed gesture sessions
//! - A pan/zoom viewport whose background pan yields to interactive elements
//!
//! # Architecture
//!
//! - `graph` / `branches`: pure graph operations and switch reconciliation
//! - `routing`: anchor-to-anchor path computation
//! - `InteractionController`: owns the current snapshot and editor state
//! - `Canvas`: dispatches pointer input between controller and `Viewport`
//! - `render`: derives the paint list from a snapshot
//!
//! # Example
//!
//! ```ignore
//! use workflow_canvas::{EditorConfig, InteractionController, Point, TriggerDescriptor};
//!
//! let trigger = TriggerDescriptor::new("booked", "Appointment booked");
//! let mut editor = InteractionController::seeded(&trigger, Point::new(480.0, 180.0), EditorConfig::default());
//! editor.insert_after("trigger");
//! let output = editor.render();
//! ```

pub mod branches;
pub mod builder;
pub mod canvas;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod gesture;
pub mod graph;
pub mod interaction;
pub mod render;
pub mod routing;
pub mod types;
pub mod validation;
pub mod viewport;

// Re-export key types
pub use builder::GraphBuilder;
pub use canvas::{Canvas, Dispatch, PointerInput, PointerTarget};
pub use catalog::{StepCatalog, StepGroup, StepOption, TriggerDescriptor};
pub use config::EditorConfig;
pub use error::{EditorError, Result};
pub use events::EditorEvent;
pub use gesture::{PointerButton, PointerEvent, PointerId, PointerKind};
pub use interaction::{EditorState, InteractionController, PendingConnection, Tool};
pub use render::RenderOutput;
pub use types::{Branch, BranchType, Edge, Graph, Node, NodeVariant, Panel, Point, Side};
pub use validation::{validate_graph, ValidationError};
pub use viewport::{ViewTransform, Viewport};
