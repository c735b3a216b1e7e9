//! Integration tests for the placement API
//!
//! These tests drive whole scenes through the public entry points and check the
//! guarantees callers rely on.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use float_cmp::approx_eq;

use schemplace::{
    LayoutError, Placer, SchemplaceError,
    config::{AppConfig, LayoutConfig, OutputConfig},
    geometry::Orientation,
    layout,
    scene::{Connection, Net, Port, Scene, SchematicBox, Side},
};

fn two_port(id: &str) -> SchematicBox {
    SchematicBox::new(
        id,
        vec![
            Port::new(format!("{id}.1").as_str(), 0.0, -0.5),
            Port::new(format!("{id}.2").as_str(), 0.0, 0.5),
        ],
    )
}

fn one_port(id: &str) -> SchematicBox {
    SchematicBox::new(id, vec![Port::new(format!("{id}.1").as_str(), 0.0, 0.0)])
}

fn placed<'a>(scene: &'a Scene, id: &str) -> &'a SchematicBox {
    scene
        .find_box(id)
        .unwrap_or_else(|| panic!("box {id} missing from output"))
}

fn slot(scene: &Scene, id: &str) -> (Side, usize) {
    let annotation = placed(scene, id)
        .placement
        .unwrap_or_else(|| panic!("box {id} has no placement"));
    (annotation.side, annotation.ascending_box_index)
}

/// A central box with two ports on each side and a few satellites.
fn four_port_scene() -> Scene {
    Scene::new(
        vec![
            SchematicBox::new(
                "U1",
                vec![
                    Port::new("U1.1", -1.0, 0.0),
                    Port::new("U1.2", -1.0, 1.0),
                    Port::new("U1.3", 1.0, 0.0),
                    Port::new("U1.4", 1.0, 1.0),
                ],
            ),
            two_port("R1"),
            one_port("C1"),
            one_port("J1"),
        ],
        vec![
            Connection::new("R1.1", "U1.2"),
            Connection::new("U1.1", "R1.2"),
            Connection::new("C1.1", "U1.2"),
            Connection::new("J1.1", "U1.4"),
        ],
        Vec::new(),
    )
}

/// Three resistors on the right, two of them in one slot sharing `gnd`.
fn bus_scene() -> Scene {
    Scene::new(
        vec![
            SchematicBox::new(
                "U1",
                vec![
                    Port::new("U1.1", 1.0, 0.0),
                    Port::new("U1.2", 1.0, 1.0),
                    Port::new("U1.3", 1.0, 2.0),
                ],
            ),
            SchematicBox::new(
                "R1",
                vec![Port::new("R1.1", -0.5, 0.0), Port::new("R1.2", 0.5, 0.0)],
            ),
            SchematicBox::new(
                "R2",
                vec![Port::new("R2.1", -0.5, 0.0), Port::new("R2.2", 0.5, 0.0)],
            ),
            SchematicBox::new(
                "R3",
                vec![Port::new("R3.1", -0.5, 0.0), Port::new("R3.2", 0.5, 0.0)],
            ),
        ],
        vec![
            Connection::new("U1.1", "R1.1"),
            Connection::new("U1.1", "R2.1"),
            Connection::new("U1.2", "R3.1"),
            Connection::new("R1.2", "gnd"),
            Connection::new("gnd", "R2.2"),
            Connection::new("R3.2", "gnd"),
        ],
        vec![Net::new("gnd")],
    )
}

#[test]
fn test_placer_api_exists() {
    let _placer = Placer::default();
    let _placer = Placer::new(AppConfig::default());
}

#[test]
fn test_input_scene_not_mutated() {
    let scene = bus_scene();
    let snapshot = scene.clone();

    let output = layout(&scene).expect("Failed to lay out");

    assert_eq!(scene, snapshot);
    assert_ne!(output, snapshot);
}

#[test]
fn test_satellite_follows_majority_and_lowest_rank() {
    let output = layout(&four_port_scene()).expect("Failed to lay out");

    // R1 touches both left ports; the upper one (U1.1) ranks first.
    assert_eq!(slot(&output, "R1"), (Side::Left, 0));
    // C1 only reaches the lower left port.
    assert_eq!(slot(&output, "C1"), (Side::Left, 1));
    // J1 is on the right; its port ranks second there, compacted to 0.
    assert_eq!(slot(&output, "J1"), (Side::Right, 0));
}

#[test]
fn test_unconnected_boxes_appended_in_order() {
    let scene = Scene::new(
        vec![
            one_port("Z1"),
            SchematicBox::new(
                "U1",
                vec![
                    Port::new("U1.1", -1.0, 0.0),
                    Port::new("U1.2", 1.0, 0.0),
                    Port::new("U1.3", 1.0, 1.0),
                ],
            ),
            one_port("A1"),
            one_port("B1"),
            one_port("B2"),
            one_port("Z2"),
        ],
        vec![
            Connection::new("A1.1", "U1.1"),
            Connection::new("B1.1", "U1.2"),
            Connection::new("B2.1", "U1.3"),
        ],
        Vec::new(),
    );

    let output = layout(&scene).expect("Failed to lay out");

    assert_eq!(slot(&output, "A1"), (Side::Left, 0));
    assert_eq!(slot(&output, "B1"), (Side::Right, 0));
    assert_eq!(slot(&output, "B2"), (Side::Right, 1));
    // Unconnected boxes default to the left, after every ranked box, in input order.
    assert_eq!(slot(&output, "Z1"), (Side::Left, 1));
    assert_eq!(slot(&output, "Z2"), (Side::Left, 2));
}

#[test]
fn test_first_of_tied_boxes_is_central() {
    let first = SchematicBox::new("A", vec![Port::new("A.1", 1.0, 0.0), Port::new("A.2", 1.0, 1.0)]);
    let second = SchematicBox::new("B", vec![Port::new("B.1", -1.0, 0.0), Port::new("B.2", -1.0, 1.0)]);
    let connections = vec![Connection::new("A.1", "B.1")];

    let output = layout(&Scene::new(
        vec![first.clone(), second.clone()],
        connections.clone(),
        Vec::new(),
    ))
    .expect("Failed to lay out");
    assert!(placed(&output, "A").placement.is_none());
    assert!(placed(&output, "B").placement.is_some());

    let output = layout(&Scene::new(vec![second, first], connections, Vec::new()))
        .expect("Failed to lay out");
    assert!(placed(&output, "B").placement.is_none());
    assert!(placed(&output, "A").placement.is_some());
}

#[test]
fn test_two_port_box_turns_towards_its_connections() {
    let scene = Scene::new(
        vec![
            SchematicBox::new(
                "U1",
                vec![
                    Port::new("U1.1", -1.0, 0.0),
                    Port::new("U1.2", -0.5, 0.0),
                    Port::new("U1.3", 1.0, 0.0),
                ],
            ),
            two_port("R1"),
        ],
        vec![
            Connection::new("R1.1", "U1.1"),
            Connection::new("R1.2", "U1.2"),
        ],
        Vec::new(),
    );

    let output = layout(&scene).expect("Failed to lay out");
    let r1 = placed(&output, "R1");

    // Both targets lie to the right of R1 on one horizontal line.
    assert!(r1.x < -1.0);
    let (p1, p2) = (r1.ports[0], r1.ports[1]);
    assert!(p2.rx > p1.rx, "port axis should point rightward: {p1:?} {p2:?}");
    assert!(approx_eq!(f32, p1.ry, 0.0, epsilon = 1e-6));
    assert!(approx_eq!(f32, p2.ry, 0.0, epsilon = 1e-6));
    assert_eq!(r1.orientation, Some(Orientation::new(270, false).unwrap()));

    // Without auto-rotation the ports stay as declared.
    let placer = Placer::new(AppConfig::new(
        LayoutConfig::default().with_auto_rotate(false),
        OutputConfig::default(),
    ));
    let output = placer.layout(&scene).expect("Failed to lay out");
    assert_eq!(placed(&output, "R1").ports, two_port("R1").ports);
    assert!(placed(&output, "R1").orientation.is_none());
}

#[test]
fn test_central_box_stays_at_origin() {
    let mut scene = four_port_scene();
    scene.boxes[0].x = 12.0;
    scene.boxes[0].y = -3.0;

    let output = layout(&scene).expect("Failed to lay out");
    let u1 = placed(&output, "U1");
    assert_eq!((u1.x, u1.y), (0.0, 0.0));
    assert!(u1.placement.is_none());
    assert!(u1.orientation.is_none());
}

#[test]
fn test_slot_members_share_coordinates() {
    let placer = Placer::new(AppConfig::new(
        LayoutConfig::default().with_slide_net_boxes(false),
        OutputConfig::default(),
    ));
    let output = placer.layout(&bus_scene()).expect("Failed to lay out");

    let mut by_slot: BTreeMap<(Side, usize), Vec<&SchematicBox>> = BTreeMap::new();
    for b in output.boxes.iter().filter(|b| b.net_alias.is_none()) {
        if let Some(p) = b.placement {
            by_slot.entry((p.side, p.ascending_box_index)).or_default().push(b);
        }
    }

    let r_slot = &by_slot[&(Side::Right, 0)];
    assert_eq!(r_slot.len(), 2);
    for boxes in by_slot.values() {
        assert!(boxes.iter().all(|b| b.x == boxes[0].x && b.y == boxes[0].y));
    }
}

#[test]
fn test_net_alias_inserted_once() {
    let first = layout(&bus_scene()).expect("Failed to lay out");

    let aliases: Vec<&SchematicBox> = first.boxes.iter().filter(|b| b.net_alias.is_some()).collect();
    assert_eq!(aliases.len(), 1);
    assert_eq!(aliases[0].box_id, "gnd__alias_right_0");
    assert!(
        first
            .connections
            .contains(&Connection::new("R1.2", "gnd__alias_right_0.net"))
    );
    assert!(first.connections.contains(&Connection::new("R3.2", "gnd")));

    let second = layout(&first).expect("Failed to lay out again");
    assert_eq!(second.boxes.len(), first.boxes.len());
    let ids: HashSet<_> = second.boxes.iter().map(|b| b.box_id).collect();
    assert_eq!(ids.len(), second.boxes.len());
    assert_eq!(
        second.boxes.iter().filter(|b| b.net_alias.is_some()).count(),
        1
    );

    // The hub stays in the slot of the boxes wired to it.
    let alias = placed(&second, "gnd__alias_right_0");
    assert_eq!(alias.placement, placed(&first, "gnd__alias_right_0").placement);
    assert_eq!(alias.placement, placed(&second, "R1").placement);
    assert!(alias.x > 0.0);
}

#[test]
fn test_optional_stages_can_be_disabled() {
    let config = LayoutConfig::default()
        .with_slide_net_boxes(false)
        .with_insert_net_aliases(false)
        .with_center_sides(false)
        .with_auto_rotate(false);
    let placer = Placer::new(AppConfig::new(config, OutputConfig::default()));

    let output = placer.layout(&bus_scene()).expect("Failed to lay out");
    assert_eq!(output.boxes.len(), 4);
    assert_eq!(output.connections, bus_scene().connections);

    // Rows come straight from the index grid.
    assert_eq!(placed(&output, "R1").y, 0.0);
    assert_eq!(placed(&output, "R2").y, 0.0);
    assert!(approx_eq!(f32, placed(&output, "R3").y, 1.25, ulps = 4));
}

#[test]
fn test_empty_scene_rejected() {
    assert_eq!(layout(&Scene::default()), Err(LayoutError::EmptyScene));
}

#[test]
fn test_portless_central_box_rejected() {
    let scene = Scene::new(
        vec![SchematicBox::new("U1", Vec::new()), SchematicBox::new("U2", Vec::new())],
        Vec::new(),
        Vec::new(),
    );
    assert!(matches!(
        layout(&scene),
        Err(LayoutError::DegenerateCentralBox { box_id }) if box_id == "U1"
    ));
}

#[test]
fn test_unknown_endpoint_rejected() {
    let mut scene = four_port_scene();
    scene.connections.push(Connection::new("U1.1", "U9.1"));

    match layout(&scene) {
        Err(LayoutError::MalformedConnection { index, endpoint }) => {
            assert_eq!(index, 4);
            assert_eq!(endpoint, "U9.1");
        }
        other => panic!("expected a malformed connection, got {other:?}"),
    }
}

#[test]
fn test_prefix_box_ids_do_not_collide() {
    // U1 and U10 share a prefix; only U10's port decides U10's side.
    let scene = Scene::new(
        vec![
            SchematicBox::new(
                "U1",
                vec![
                    Port::new("U1.1", -1.0, 0.0),
                    Port::new("U1.2", 1.0, 0.0),
                    Port::new("U1.3", 1.0, 1.0),
                ],
            ),
            one_port("U10"),
        ],
        vec![Connection::new("U10.1", "U1.2")],
        Vec::new(),
    );

    let output = layout(&scene).expect("Failed to lay out");
    assert_eq!(slot(&output, "U10"), (Side::Right, 0));
}

#[test]
fn test_placer_reports_layout_errors() {
    let err = Placer::default().layout(&Scene::default()).unwrap_err();
    assert!(matches!(err, SchemplaceError::Layout(LayoutError::EmptyScene)));
}

#[test]
fn test_json_round_trip_through_placer() {
    let placer = Placer::default();
    let output = placer.layout(&bus_scene()).expect("Failed to lay out");
    let json = placer.to_json(&output).expect("Failed to serialize");

    assert!(json.contains("\"placement\""));
    assert!(json.contains("\"net_alias\":\"gnd\""));

    let back = placer.parse(&json).expect("Failed to parse output");
    assert_eq!(back, output);
}

mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    /// Boxes as port offset lists, plus connections as pairs of endpoint picks.
    fn scene_strategy() -> impl Strategy<Value = Scene> {
        let port = (-2i8..=2, 0u8..4);
        let boxes = prop::collection::vec(prop::collection::vec(port, 1..5), 1..7);
        let picks = prop::collection::vec((any::<prop::sample::Index>(), any::<prop::sample::Index>()), 0..10);
        let net_count = 0usize..3;

        (boxes, picks, net_count).prop_map(|(boxes, picks, net_count)| {
            let boxes: Vec<SchematicBox> = boxes
                .into_iter()
                .enumerate()
                .map(|(bi, ports)| {
                    let id = format!("B{bi}");
                    let ports = ports
                        .into_iter()
                        .enumerate()
                        .map(|(pi, (rx, ry))| {
                            Port::new(format!("{id}.{pi}").as_str(), f32::from(rx), f32::from(ry))
                        })
                        .collect();
                    SchematicBox::new(id.as_str(), ports)
                })
                .collect();
            let nets: Vec<Net> = (0..net_count).map(|n| Net::new(format!("n{n}").as_str())).collect();

            let mut endpoints: Vec<_> = boxes.iter().flat_map(|b| b.ports.iter().map(|p| p.port_id)).collect();
            endpoints.extend(nets.iter().map(|n| n.net_id));

            let connections = picks
                .into_iter()
                .map(|(a, b)| Connection::new(*a.get(&endpoints), *b.get(&endpoints)))
                .collect();

            Scene::new(boxes, connections, nets)
        })
    }

    fn check_layout_invariants(scene: Scene) -> Result<(), TestCaseError> {
        let snapshot = scene.clone();
        let output = layout(&scene).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(&scene, &snapshot);

        // Every input box survives, exactly one box is central.
        prop_assert!(output.boxes.len() >= scene.boxes.len());
        for b in &scene.boxes {
            prop_assert!(output.find_box(b.box_id).is_some());
        }
        prop_assert_eq!(output.boxes.iter().filter(|b| b.placement.is_none()).count(), 1);

        let mut used: BTreeMap<Side, BTreeSet<usize>> = BTreeMap::new();
        let mut xs: BTreeMap<(Side, usize), f32> = BTreeMap::new();
        for b in &output.boxes {
            prop_assert!(b.x.is_finite() && b.y.is_finite());
            let Some(p) = b.placement else {
                continue;
            };
            used.entry(p.side).or_default().insert(p.ascending_box_index);
            if b.net_alias.is_some() {
                continue;
            }

            // Alias boxes sit on their ports, every other box on its column.
            let x = *xs.entry((p.side, p.ascending_box_index)).or_insert(b.x);
            prop_assert_eq!(x, b.x);
            prop_assert_eq!(b.x < 0.0, p.side == Side::Left);
        }

        // Indices on each side are dense from zero.
        for indices in used.values() {
            let expected: BTreeSet<usize> = (0..indices.len()).collect();
            prop_assert_eq!(indices, &expected);
        }

        // Every connection still ends at a port or a declared net.
        let mut endpoints: HashSet<_> = output
            .boxes
            .iter()
            .flat_map(|b| b.ports.iter().map(|p| p.port_id))
            .collect();
        endpoints.extend(output.nets.iter().map(|n| n.net_id));
        for c in &output.connections {
            prop_assert!(endpoints.contains(&c.from) && endpoints.contains(&c.to));
        }

        Ok(())
    }

    /// Boxes sharing a slot must not overlap vertically.
    ///
    /// Rotation and aliasing run after sliding and change port offsets, so they
    /// are switched off here.
    fn check_slot_spans_disjoint(scene: Scene) -> Result<(), TestCaseError> {
        let placer = Placer::new(AppConfig::new(
            LayoutConfig::default()
                .with_auto_rotate(false)
                .with_insert_net_aliases(false),
            OutputConfig::default(),
        ));
        let output = placer
            .layout(&scene)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let mut spans: BTreeMap<(Side, usize), Vec<(f32, f32)>> = BTreeMap::new();
        for b in &output.boxes {
            let Some(p) = b.placement else {
                continue;
            };
            let top = b.ports.iter().map(|p| p.ry).fold(0.0f32, f32::min);
            let bottom = b.ports.iter().map(|p| p.ry).fold(0.0f32, f32::max);
            spans
                .entry((p.side, p.ascending_box_index))
                .or_default()
                .push((b.y + top, b.y + bottom));
        }

        for members in spans.values_mut() {
            members.sort_by(|a, b| a.0.total_cmp(&b.0));
            for pair in members.windows(2) {
                prop_assert!(
                    pair[0].1 < pair[1].0,
                    "overlapping spans {:?} and {:?}",
                    pair[0],
                    pair[1]
                );
            }
        }

        Ok(())
    }

    proptest! {
        #[test]
        fn layout_invariants_hold(scene in scene_strategy()) {
            check_layout_invariants(scene)?;
        }

        #[test]
        fn slot_members_never_overlap(scene in scene_strategy()) {
            check_slot_spans_disjoint(scene)?;
        }
    }
}
