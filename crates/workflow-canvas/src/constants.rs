//! Canvas-wide constants
//!
//! Single source of truth for reserved ids and the default geometry used
//! when no explicit configuration is supplied.

/// Reserved identifiers and synthetic id prefixes
pub mod ids {
    /// Id of the single reserved trigger node
    pub const TRIGGER_NODE: &str = "trigger";
    /// Prefix for nodes created by insert-after or branch materialization
    pub const NODE_PREFIX: &str = "node-";
    /// Prefix for synthesized edge ids
    pub const EDGE_PREFIX: &str = "edge-";
    /// Prefix for condition branch ids
    pub const BRANCH_PREFIX: &str = "branch-";
    /// Id of the trailing default branch of a switch
    pub const DEFAULT_BRANCH: &str = "branch-default";
}

/// Default values for editor configuration
pub mod defaults {
    /// Vertical distance between a node and the node inserted after it
    pub const VERTICAL_STEP: f64 = 180.0;
    /// Horizontal distance between sibling branch targets
    pub const HORIZONTAL_SPACING: f64 = 280.0;
    /// Smallest y a node center may take
    pub const CANVAS_MIN_Y: f64 = 40.0;
    /// Largest y a node center may take
    pub const CANVAS_MAX_Y: f64 = 3160.0;
    /// Half of a node's rendered width
    pub const NODE_HALF_WIDTH: f64 = 140.0;
    /// Half of a node's rendered height
    pub const NODE_HALF_HEIGHT: f64 = 36.0;
    /// Distance an edge travels straight out of (and into) an anchor
    pub const ROUTE_OFFSET: f64 = 24.0;
    /// Upper bound for rounded corner radii
    pub const CORNER_RADIUS: f64 = 12.0;
    /// Minimum zoom scale
    pub const MIN_ZOOM: f64 = 0.25;
    /// Maximum zoom scale
    pub const MAX_ZOOM: f64 = 2.0;
    /// Zoom increment for zoom in/out
    pub const ZOOM_STEP: f64 = 0.1;
    /// Condition branches created for a fresh switch
    pub const CONDITION_BRANCHES: usize = 2;
}

/// Display defaults for synthesized nodes and branches
pub mod labels {
    /// Title of an unconfigured step
    pub const ADD_STEP_TITLE: &str = "Add step";
    /// Description of an unconfigured step
    pub const ADD_STEP_DESCRIPTION: &str = "Choose what happens next";
    /// Icon key of an unconfigured step
    pub const ADD_STEP_ICON: &str = "plus";
    /// Label of the trailing default branch
    pub const DEFAULT_BRANCH: &str = "Otherwise";
    /// Status assigned to unconfigured steps
    pub const STATUS_PENDING: &str = "pending";
    /// Status assigned to configured steps
    pub const STATUS_READY: &str = "ready";
    /// Status assigned to the trigger
    pub const STATUS_ACTIVE: &str = "active";
}
