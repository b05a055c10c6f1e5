//! End-to-end editing scenarios through the public API

use workflow_canvas::branches::{branch_offset, initialize_switch_node, set_switch_branches};
use workflow_canvas::config::{LayoutConfig, RoutingConfig};
use workflow_canvas::graph::{connect_nodes, insert_node_after, remove_node, ConnectOptions};
use workflow_canvas::routing::{build_orthogonal_path, corner_radii, route_points};
use workflow_canvas::{
    validate_graph, Canvas, Dispatch, EditorConfig, EditorEvent, Graph, GraphBuilder,
    InteractionController, NodeVariant, Point, PointerButton, PointerEvent, PointerInput,
    PointerKind, PointerTarget, Side, StepOption, TriggerDescriptor,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn seeded() -> Graph {
    Graph::seeded(
        &TriggerDescriptor::new("appointment-booked", "Appointment booked"),
        Point::new(480.0, 180.0),
    )
}

fn chain() -> Graph {
    let layout = LayoutConfig::default();
    let graph = insert_node_after(&seeded(), "trigger", &layout);
    insert_node_after(&graph, "node-0", &layout)
}

#[test]
fn insert_after_seeded_trigger() {
    init_logging();
    let graph = insert_node_after(&seeded(), "trigger", &LayoutConfig::default());

    let node = graph.find_node("node-0").unwrap();
    assert_eq!(node.position, Point::new(480.0, 360.0));
    assert_eq!(node.variant, NodeVariant::Add);

    assert_eq!(graph.edges.len(), 1);
    let edge = &graph.edges[0];
    assert_eq!((edge.source_id.as_str(), edge.target_id.as_str()), ("trigger", "node-0"));
    assert_eq!((edge.source_side, edge.target_side), (Side::Bottom, Side::Top));
    assert!(validate_graph(&graph).is_empty());
}

#[test]
fn removing_middle_node_leaves_tail_unattached() {
    init_logging();
    let graph = chain();
    assert_eq!(graph.find_node("node-1").unwrap().position, Point::new(480.0, 540.0));
    assert!(graph
        .edges
        .iter()
        .any(|e| e.source_id == "node-0" && e.target_id == "node-1"));

    let outcome = remove_node(&graph, "node-0");
    assert!(outcome.removed);
    assert!(outcome.graph.contains_node("node-1"));
    assert_eq!(outcome.graph.incoming_edges("node-1").count(), 0);
    assert!(outcome.graph.edges.iter().all(|e| !e.touches("node-0")));
}

#[test]
fn switch_initialization_fans_out_targets() {
    init_logging();
    let layout = LayoutConfig::default();
    let graph = GraphBuilder::new()
        .add_node("switch", NodeVariant::Condition, (480.0, 360.0))
        .build();

    let graph = initialize_switch_node(&graph, "switch", 2, &layout, &StepOption::add_step());
    let branches = graph.find_node("switch").unwrap().branches.clone().unwrap();
    assert_eq!(branches.len(), 3);
    assert_eq!(branches.iter().filter(|b| b.is_default()).count(), 1);
    assert!(branches.last().unwrap().is_default());

    let xs: Vec<f64> = branches
        .iter()
        .map(|b| graph.find_node(&b.target_id).unwrap().position)
        .inspect(|p| assert_eq!(p.y, 540.0))
        .map(|p| p.x - 480.0)
        .collect();
    let spacing = layout.horizontal_spacing;
    assert_eq!(xs, vec![-spacing, 0.0, spacing]);

    assert_eq!(graph.outgoing_edges("switch").count(), 3);
}

#[test]
fn anchor_drop_replaces_previous_connection() {
    init_logging();
    let config = EditorConfig::default();
    let mut graph = chain();
    graph = insert_node_after(&graph, "node-1", &config.layout);
    // node-0 points at nothing so its anchor is exposed
    graph.edges.retain(|e| e.source_id != "node-0");

    let mut canvas = Canvas::new(graph, config);
    let press = |kind, x, y| PointerInput {
        target: PointerTarget::Anchor("node-0".to_string()),
        event: PointerEvent {
            pointer_id: 7,
            kind,
            position: Point::new(x, y),
            button: PointerButton::Primary,
        },
        screen: Point::new(x, y),
    };

    assert_eq!(canvas.handle(&press(PointerKind::Down, 480.0, 396.0)), Dispatch::Controller);
    assert_eq!(canvas.handle(&press(PointerKind::Move, 500.0, 700.0)), Dispatch::Controller);
    assert!(canvas.controller().render().edges.iter().any(|e| e.preview));
    assert_eq!(canvas.handle(&press(PointerKind::Up, 470.0, 730.0)), Dispatch::Controller);

    let graph = canvas.controller().graph();
    let outgoing: Vec<_> = graph.outgoing_edges("node-0").collect();
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].target_id, "node-2");
    assert_eq!(canvas.viewport().offset(), Point::default());

    let events = canvas.controller_mut().drain_events();
    assert!(events.contains(&EditorEvent::ConnectionCommitted {
        source_id: "node-0".to_string(),
        target_id: "node-2".to_string(),
    }));
}

#[test]
fn connect_keeps_single_outgoing_edge() {
    let graph = chain();
    let graph = connect_nodes(&graph, "trigger", "node-1", &ConnectOptions::default());
    assert_eq!(graph.outgoing_edges("trigger").count(), 1);
    assert_eq!(graph.outgoing_edges("trigger").next().unwrap().target_id, "node-1");

    let again = connect_nodes(&graph, "trigger", "node-1", &ConnectOptions::default());
    assert_eq!(again, graph);
}

#[test]
fn branch_reconciliation_is_idempotent() {
    let layout = LayoutConfig::default();
    let graph = GraphBuilder::new()
        .add_node("switch", NodeVariant::Condition, (480.0, 360.0))
        .build();
    let graph = initialize_switch_node(&graph, "switch", 3, &layout, &StepOption::add_step());
    let branches = graph.find_node("switch").unwrap().branches.clone().unwrap();

    let once = set_switch_branches(&graph, "switch", &branches, &layout, &StepOption::add_step());
    let twice = set_switch_branches(&once, "switch", &branches, &layout, &StepOption::add_step());
    assert_eq!(once, graph);
    assert_eq!(twice, once);
}

#[test]
fn branch_offsets_are_symmetric() {
    for count in 1..8 {
        let offsets: Vec<f64> = (0..count).map(|i| branch_offset(i, count, 280.0)).collect();
        let sum: f64 = offsets.iter().sum();
        assert!(sum.abs() < 1e-9, "offsets for {} sum to {}", count, sum);
        if count % 2 == 1 {
            assert_eq!(offsets[count / 2], 0.0);
        }
    }
}

#[test]
fn routing_is_deterministic_and_corner_safe() {
    let routing = RoutingConfig::default();
    let cases = [
        (Point::new(0.0, 0.0), Point::new(300.0, 180.0), Side::Bottom, Side::Top),
        (Point::new(0.0, 0.0), Point::new(10.0, 30.0), Side::Bottom, Side::Top),
        (Point::new(0.0, 0.0), Point::new(200.0, -50.0), Side::Right, Side::Left),
        (Point::new(0.0, 0.0), Point::new(-90.0, 90.0), Side::Bottom, Side::Right),
    ];

    for (start, end, from, to) in cases {
        let first = build_orthogonal_path(start, end, from, to, &routing);
        let second = build_orthogonal_path(start, end, from, to, &routing);
        assert_eq!(first, second);

        let points = route_points(start, end, from, to, routing.offset);
        let radii = corner_radii(&points, routing.corner_radius);
        for (i, radius) in radii.iter().enumerate() {
            let prev = points[i].axis_distance(points[i + 1]);
            let next = points[i + 1].axis_distance(points[i + 2]);
            assert!(*radius <= routing.corner_radius);
            assert!(*radius <= prev / 2.0 + 1e-9);
            assert!(*radius <= next / 2.0 + 1e-9);
        }
    }
}

#[test]
fn drop_outside_every_node_creates_nothing() {
    let mut controller = InteractionController::new(chain(), EditorConfig::default());
    controller.insert_after("node-1");
    assert!(controller.begin_connection("node-2", 1, Point::new(480.0, 756.0)));
    assert!(controller.pointer_up(1, Point::new(900.0, 900.0)));
    assert!(!controller.graph().has_outgoing("node-2"));
    assert_eq!(controller.hit_test(Point::new(900.0, 900.0), "node-2"), None);
    assert_eq!(
        controller.hit_test(Point::new(500.0, 370.0), "node-2").map(|n| n.id.as_str()),
        Some("node-0")
    );
}

#[test]
fn cancelled_node_drag_keeps_applied_moves() {
    init_logging();
    let mut canvas = Canvas::new(chain(), EditorConfig::default());
    let drag = |kind, y| PointerInput {
        target: PointerTarget::Node("node-1".to_string()),
        event: PointerEvent {
            pointer_id: 3,
            kind,
            position: Point::new(480.0, y),
            button: PointerButton::Primary,
        },
        screen: Point::new(480.0, y),
    };

    assert_eq!(canvas.handle(&drag(PointerKind::Down, 540.0)), Dispatch::Controller);
    assert_eq!(canvas.handle(&drag(PointerKind::Move, 600.0)), Dispatch::Controller);
    assert_eq!(canvas.handle(&drag(PointerKind::Move, 640.0)), Dispatch::Controller);
    assert_eq!(canvas.handle(&drag(PointerKind::Cancel, 900.0)), Dispatch::Controller);

    let node = canvas.controller().graph().find_node("node-1").unwrap();
    assert_eq!(node.position, Point::new(480.0, 640.0));
    assert!(canvas.controller().dragged_node().is_none());
    assert!(!canvas.viewport().is_panning());

    // Later moves on the same pointer do nothing
    assert_eq!(canvas.handle(&drag(PointerKind::Move, 800.0)), Dispatch::Ignored);
    let events = canvas.controller_mut().drain_events();
    assert!(events.contains(&EditorEvent::DragCancelled {
        node_id: "node-1".to_string()
    }));
    assert!(!events.iter().any(|e| matches!(e, EditorEvent::DragCommitted { .. })));
}
