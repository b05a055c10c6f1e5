//! Orthogonal edge routing
//!
//! Turns two anchor points and their exit sides into an axis-aligned
//! polyline with rounded interior corners, rendered as an SVG path string.
//! Routing is a pure function of its arguments: the same inputs always
//! produce the same path.
//!
//! The route leaves the source straight out of its side for a fixed offset,
//! approaches the target straight into its side for the same offset, and
//! joins the two with at most one bend:
//!
//! ```text
//!   start
//!     |
//!   startExt ----- bend
//!                   |
//!               endApproach
//!                   |
//!                  end
//! ```

use crate::config::RoutingConfig;
use crate::types::{Point, Side};

/// Tolerance for treating two coordinates as equal
const EPSILON: f64 = 1e-9;

fn same(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn same_point(a: Point, b: Point) -> bool {
    same(a.x, b.x) && same(a.y, b.y)
}

/// Pick the single bend joining `from` to `to`, if they are not aligned
fn bend_point(from: Point, to: Point, source_side: Side, target_side: Side) -> Option<Point> {
    if same(from.x, to.x) || same(from.y, to.y) {
        return None;
    }
    let bend = match (source_side.is_vertical(), target_side.is_vertical()) {
        // Same axis: travel across on the other axis first
        (true, true) => Point::new(to.x, from.y),
        (false, false) => Point::new(from.x, to.y),
        // Perpendicular: keep the source's axis, then turn into the target's
        (true, false) => Point::new(from.x, to.y),
        (false, true) => Point::new(to.x, from.y),
    };
    Some(bend)
}

/// Compute the deduplicated vertex list of a route
pub fn route_points(
    start: Point,
    end: Point,
    source_side: Side,
    target_side: Side,
    offset: f64,
) -> Vec<Point> {
    let start_ext = start.offset(source_side.direction(), offset);
    let end_approach = end.offset(target_side.direction(), offset);
    let bend = bend_point(start_ext, end_approach, source_side, target_side);

    let mut points: Vec<Point> = Vec::with_capacity(5);
    for point in [Some(start), Some(start_ext), bend, Some(end_approach), Some(end)]
        .into_iter()
        .flatten()
    {
        if points.last().is_some_and(|last| same_point(*last, point)) {
            continue;
        }
        points.push(point);
    }
    points
}

fn segment_length(a: Point, b: Point) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Corner radius at every interior vertex of `points`
///
/// Each radius is capped by the configured radius and by half of both
/// adjacent segments, so neighbouring corners never overlap.
pub fn corner_radii(points: &[Point], radius: f64) -> Vec<f64> {
    points
        .windows(3)
        .map(|w| {
            let before = segment_length(w[0], w[1]);
            let after = segment_length(w[1], w[2]);
            radius.min(before / 2.0).min(after / 2.0).max(0.0)
        })
        .collect()
}

/// Point at `distance` from `from` towards `to`
fn toward(from: Point, to: Point, distance: f64) -> Point {
    let length = segment_length(from, to);
    if length < EPSILON {
        return from;
    }
    Point::new(
        from.x + (to.x - from.x) / length * distance,
        from.y + (to.y - from.y) / length * distance,
    )
}

fn fmt_coord(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}", rounded)
}

fn fmt_point(point: Point) -> String {
    format!("{} {}", fmt_coord(point.x), fmt_coord(point.y))
}

/// Render a vertex list as a path with quadratic rounded corners
pub fn render_path(points: &[Point], radius: f64) -> String {
    let Some((first, rest)) = points.split_first() else {
        return String::new();
    };
    let mut path = format!("M {}", fmt_point(*first));
    if rest.is_empty() {
        return path;
    }

    let radii = corner_radii(points, radius);
    for (i, r) in radii.iter().enumerate() {
        let (prev, vertex, next) = (points[i], points[i + 1], points[i + 2]);
        let corner_start = toward(vertex, prev, *r);
        let corner_end = toward(vertex, next, *r);
        path.push_str(&format!(
            " L {} Q {} {}",
            fmt_point(corner_start),
            fmt_point(vertex),
            fmt_point(corner_end)
        ));
    }

    if let Some(last) = points.last() {
        path.push_str(&format!(" L {}", fmt_point(*last)));
    }
    path
}

/// Route an edge from `start` (leaving through `source_side`) to `end`
/// (arriving through `target_side`)
pub fn build_orthogonal_path(
    start: Point,
    end: Point,
    source_side: Side,
    target_side: Side,
    config: &RoutingConfig,
) -> String {
    let points = route_points(start, end, source_side, target_side, config.offset);
    render_path(&points, config.corner_radius)
}

/// Side a live preview enters through: from above when the pointer is at
/// or below the anchor, from below otherwise
pub fn preview_target_side(anchor: Point, pointer: Point) -> Side {
    if pointer.y >= anchor.y {
        Side::Top
    } else {
        Side::Bottom
    }
}

/// Route the in-progress connection from an anchor to the pointer
pub fn build_preview_path(
    anchor: Point,
    anchor_side: Side,
    pointer: Point,
    config: &RoutingConfig,
) -> String {
    build_orthogonal_path(
        anchor,
        pointer,
        anchor_side,
        preview_target_side(anchor, pointer),
        config,
    )
}
