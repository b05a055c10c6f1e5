//! Canvas pan and zoom
//!
//! The viewport owns a 2D pan offset and a zoom scale. Both are applied by
//! the presentation layer as a transform on top of the canvas-local render
//! output; neither is read by routing or hit-testing.
//!
//! Panning is driven by raw screen-pixel pointer deltas, applied 1:1.

use serde::{Deserialize, Serialize};

use crate::config::ViewportConfig;
use crate::gesture::{Gesture, PointerId};
use crate::types::Point;

/// Transform from canvas-local to screen coordinates:
/// `screen = canvas * scale + translate`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewTransform {
    pub translate: Point,
    pub scale: f64,
}

impl ViewTransform {
    pub fn to_screen(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.scale + self.translate.x,
            canvas.y * self.scale + self.translate.y,
        )
    }

    /// Map a screen position back into canvas-local coordinates
    pub fn to_canvas(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.translate.x) / self.scale,
            (screen.y - self.translate.y) / self.scale,
        )
    }

    /// CSS/SVG transform string
    pub fn css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.translate.x, self.translate.y, self.scale
        )
    }
}

/// Clamp into the zoom limits; inverted limits resolve to `max_zoom`
fn clamp_zoom(zoom: f64, limits: &ViewportConfig) -> f64 {
    zoom.max(limits.min_zoom).min(limits.max_zoom)
}

#[derive(Debug, Clone)]
struct PanSession {
    pointer_origin: Point,
    offset_origin: Point,
}

/// Pan offset and zoom owner
#[derive(Debug)]
pub struct Viewport {
    offset: Point,
    zoom: f64,
    limits: ViewportConfig,
    pan: Gesture<PanSession>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl Viewport {
    pub fn new(limits: ViewportConfig) -> Self {
        Self {
            offset: Point::default(),
            zoom: clamp_zoom(1.0, &limits),
            limits,
            pan: Gesture::new(),
        }
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_active()
    }

    pub fn transform(&self) -> ViewTransform {
        ViewTransform {
            translate: self.offset,
            scale: self.zoom,
        }
    }

    /// Pointer-down on the background. Callers must not forward pointer-downs
    /// already consumed by a pan-locked element.
    pub fn pointer_down(&mut self, pointer_id: PointerId, screen: Point) -> bool {
        let session = PanSession {
            pointer_origin: screen,
            offset_origin: self.offset,
        };
        let started = self.pan.start(pointer_id, session);
        if started {
            log::trace!("Pan started with pointer {}", pointer_id);
        }
        started
    }

    pub fn pointer_move(&mut self, pointer_id: PointerId, screen: Point) -> bool {
        let Some(session) = self.pan.session_for(pointer_id) else {
            return false;
        };
        self.offset = Point::new(
            session.offset_origin.x + (screen.x - session.pointer_origin.x),
            session.offset_origin.y + (screen.y - session.pointer_origin.y),
        );
        true
    }

    pub fn pointer_up(&mut self, pointer_id: PointerId) -> bool {
        self.pan.commit(pointer_id).is_some()
    }

    /// End the pan, keeping the offset reached so far
    pub fn pointer_cancel(&mut self, pointer_id: PointerId) -> bool {
        self.pan.cancel(pointer_id).is_some()
    }

    pub fn set_offset(&mut self, offset: Point) {
        self.offset = offset;
    }

    /// Set the zoom scale, clamped to the configured limits
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom, &self.limits);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + self.limits.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - self.limits.zoom_step);
    }

    /// Back to no pan and unit zoom
    pub fn reset(&mut self) {
        self.pan.abort();
        self.offset = Point::default();
        self.set_zoom(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pan_applies_raw_delta() {
        let mut viewport = Viewport::default();
        viewport.set_offset(Point::new(10.0, 20.0));

        assert!(viewport.pointer_down(1, Point::new(100.0, 100.0)));
        assert!(viewport.pointer_move(1, Point::new(130.0, 80.0)));
        assert_eq!(viewport.offset(), Point::new(40.0, 0.0));

        assert!(viewport.pointer_up(1));
        assert!(!viewport.pointer_move(1, Point::new(500.0, 500.0)));
        assert_eq!(viewport.offset(), Point::new(40.0, 0.0));
    }

    #[test]
    fn test_pan_ignores_zoom() {
        let mut viewport = Viewport::default();
        viewport.set_zoom(2.0);
        viewport.pointer_down(1, Point::new(0.0, 0.0));
        viewport.pointer_move(1, Point::new(50.0, 0.0));
        assert_eq!(viewport.offset(), Point::new(50.0, 0.0));
    }

    #[test]
    fn test_foreign_pointer_does_not_pan() {
        let mut viewport = Viewport::default();
        viewport.pointer_down(1, Point::new(0.0, 0.0));
        assert!(!viewport.pointer_move(2, Point::new(50.0, 50.0)));
        assert!(viewport.pointer_cancel(1));
        assert!(!viewport.is_panning());
        assert_eq!(viewport.offset(), Point::default());
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut viewport = Viewport::default();
        viewport.set_zoom(10.0);
        assert_eq!(viewport.zoom(), 2.0);
        viewport.set_zoom(0.0);
        assert_eq!(viewport.zoom(), 0.25);
        viewport.reset();
        viewport.zoom_in();
        assert!((viewport.zoom() - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_inverted_limits_do_not_panic() {
        let mut viewport = Viewport::new(ViewportConfig {
            min_zoom: 3.0,
            max_zoom: 2.0,
            zoom_step: 0.1,
        });
        assert_eq!(viewport.zoom(), 2.0);
        viewport.zoom_out();
        assert_eq!(viewport.zoom(), 2.0);
    }

    #[test]
    fn test_transform_round_trip() {
        let transform = ViewTransform {
            translate: Point::new(40.0, -20.0),
            scale: 2.0,
        };
        let screen = transform.to_screen(Point::new(10.0, 10.0));
        assert_eq!(screen, Point::new(60.0, 0.0));
        assert_eq!(transform.to_canvas(screen), Point::new(10.0, 10.0));
        assert_eq!(transform.css(), "translate(40px, -20px) scale(2)");
    }
}
