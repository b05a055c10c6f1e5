//! Configuration types for the workflow canvas

use serde::{Deserialize, Serialize};

use crate::constants::defaults;
use crate::error::{EditorError, Result};
use crate::types::HalfSize;

/// Placement of inserted and materialized nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Vertical distance from a parent to a node placed below it
    pub vertical_step: f64,
    /// Horizontal distance between sibling branch targets
    pub horizontal_spacing: f64,
    /// Vertical bounds for node centers
    pub canvas_min_y: f64,
    pub canvas_max_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            vertical_step: defaults::VERTICAL_STEP,
            horizontal_spacing: defaults::HORIZONTAL_SPACING,
            canvas_min_y: defaults::CANVAS_MIN_Y,
            canvas_max_y: defaults::CANVAS_MAX_Y,
        }
    }
}

impl LayoutConfig {
    /// Clamp a node center y into the canvas's vertical bounds
    ///
    /// Inverted bounds resolve to `canvas_max_y` instead of panicking.
    pub fn clamp_y(&self, y: f64) -> f64 {
        y.max(self.canvas_min_y).min(self.canvas_max_y)
    }
}

/// Node box geometry used for anchors and hit-testing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeConfig {
    pub half_width: f64,
    pub half_height: f64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            half_width: defaults::NODE_HALF_WIDTH,
            half_height: defaults::NODE_HALF_HEIGHT,
        }
    }
}

impl NodeConfig {
    pub fn half_size(&self) -> HalfSize {
        HalfSize {
            half_width: self.half_width,
            half_height: self.half_height,
        }
    }
}

/// Orthogonal edge routing parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoutingConfig {
    /// Straight run out of the source anchor and into the target anchor
    pub offset: f64,
    /// Upper bound for rounded corner radii
    pub corner_radius: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            offset: defaults::ROUTE_OFFSET,
            corner_radius: defaults::CORNER_RADIUS,
        }
    }
}

/// Zoom limits for the viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: defaults::MIN_ZOOM,
            max_zoom: defaults::MAX_ZOOM,
            zoom_step: defaults::ZOOM_STEP,
        }
    }
}

/// Switch node defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwitchConfig {
    /// Condition branches a fresh switch starts with (plus one default branch)
    pub default_condition_branches: usize,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            default_condition_branches: defaults::CONDITION_BRANCHES,
        }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub layout: LayoutConfig,
    pub node: NodeConfig,
    pub routing: RoutingConfig,
    pub viewport: ViewportConfig,
    pub switch: SwitchConfig,
}

impl EditorConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject sizes and bounds the geometry code cannot work with
    pub fn validate(&self) -> Result<()> {
        let layout = &self.layout;
        if layout.vertical_step <= 0.0 || layout.horizontal_spacing <= 0.0 {
            return Err(EditorError::invalid_config(
                "layout steps must be positive",
            ));
        }
        if layout.canvas_min_y > layout.canvas_max_y {
            return Err(EditorError::invalid_config(format!(
                "canvas bounds are inverted: {} > {}",
                layout.canvas_min_y, layout.canvas_max_y
            )));
        }
        if self.node.half_width <= 0.0 || self.node.half_height <= 0.0 {
            return Err(EditorError::invalid_config("node size must be positive"));
        }
        if self.routing.offset < 0.0 || self.routing.corner_radius < 0.0 {
            return Err(EditorError::invalid_config(
                "routing offset and corner radius must not be negative",
            ));
        }
        let viewport = &self.viewport;
        if viewport.min_zoom <= 0.0 || viewport.min_zoom > viewport.max_zoom {
            return Err(EditorError::invalid_config(format!(
                "zoom limits are invalid: {}..{}",
                viewport.min_zoom, viewport.max_zoom
            )));
        }
        Ok(())
    }
}
