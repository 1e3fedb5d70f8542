#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use estibuild::geometry::{EntityKind, RawEntity, RingRole};
use estibuild::math::polygon_2d::{distance_to_boundary, perimeter_2d, signed_area_2d};
use estibuild::math::Point2;
use estibuild::operations::RingOffset;
use estibuild::report::TopologyIssue;
use estibuild::{Condition, EstiError, Pipeline, PipelineConfig, Report};

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> RawEntity {
    RawEntity::polyline("WALLS", &[(x0, y0), (x1, y0), (x1, y1), (x0, y1)], true)
}

fn run(entities: &[RawEntity]) -> Report {
    Pipeline::new(&PipelineConfig::default())
        .run(entities)
        .unwrap()
}

fn pts(coords: &[(f64, f64)]) -> Vec<Point2> {
    coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
}

#[test]
fn square_room_with_default_walls() {
    let report = run(&[rect(0.0, 0.0, 5.0, 5.0)]);
    assert_eq!(report.rings.len(), 1);
    let room = &report.rings[0];
    assert!(room.counted);
    assert_relative_eq!(room.built_up_area, 25.0, epsilon = 1e-12);
    assert!(room.carpet_area > 0.0 && room.carpet_area < 25.0);
    assert!(!room.carpet_is_fallback);
    // Offset is half of the 0.2 wall.
    assert_relative_eq!(room.carpet_area, 4.8 * 4.8, epsilon = 1e-9);
    assert_relative_eq!(room.perimeter, 20.0, epsilon = 1e-12);
    assert_relative_eq!(room.long_wall_length, 9.6, epsilon = 1e-12);
    assert_relative_eq!(room.short_wall_length, 9.6, epsilon = 1e-12);
    assert!(report.conditions.is_empty());
}

#[test]
fn loose_lines_form_a_room() {
    let entities = vec![
        RawEntity::line("0", 0.0, 0.0, 6.0, 0.0),
        RawEntity::line("0", 6.0, 4.0, 6.0, 0.0),
        RawEntity::line("0", 6.0, 4.0, 0.0, 4.0),
        RawEntity::line("0", 0.0, 0.0, 0.0, 4.0),
    ];
    let report = run(&entities);
    assert_eq!(report.totals.room_count, 1);
    assert_relative_eq!(report.totals.built_up_area, 24.0, epsilon = 1e-12);
}

#[test]
fn two_disjoint_rectangles_are_measured_separately() {
    let report = run(&[rect(0.0, 0.0, 4.0, 3.0), rect(10.0, 0.0, 16.0, 2.0)]);
    assert_eq!(report.rings.len(), 2);
    assert_eq!(report.totals.room_count, 2);

    let mut areas: Vec<f64> = report.rings.iter().map(|r| r.built_up_area).collect();
    areas.sort_by(f64::total_cmp);
    assert_relative_eq!(areas[0], 12.0, epsilon = 1e-12);
    assert_relative_eq!(areas[1], 12.0, epsilon = 1e-12);

    let small = report
        .rings
        .iter()
        .find(|r| r.bounds.min_x > 5.0)
        .unwrap();
    assert_relative_eq!(small.bounds.width(), 6.0, epsilon = 1e-12);
    assert_relative_eq!(small.bounds.height(), 2.0, epsilon = 1e-12);
    assert_relative_eq!(report.totals.built_up_area, 24.0, epsilon = 1e-12);
    assert_relative_eq!(report.totals.perimeter, 14.0 + 16.0, epsilon = 1e-12);
}

#[test]
fn dangling_segment_excludes_only_its_room() {
    let entities = vec![
        rect(0.0, 0.0, 4.0, 4.0),
        RawEntity::line("WALLS", 4.0, 2.0, 7.0, 2.0),
        rect(20.0, 0.0, 25.0, 5.0),
    ];
    let report = run(&entities);

    let dangling: Vec<_> = report
        .conditions
        .iter()
        .filter_map(|c| match c {
            Condition::DegenerateTopology {
                issue: TopologyIssue::DanglingEnd,
                vertices,
                ..
            } => Some(vertices),
            _ => None,
        })
        .collect();
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0], &vec![Point2::new(7.0, 2.0)]);

    // The spoiled room is still reported with its vertices.
    let spoiled = report.rings.iter().find(|r| !r.counted).unwrap();
    assert_relative_eq!(spoiled.built_up_area, 16.0, epsilon = 1e-12);
    assert_eq!(spoiled.vertices.len(), 4);

    assert_eq!(report.totals.room_count, 1);
    assert_relative_eq!(report.totals.built_up_area, 25.0, epsilon = 1e-12);

    let spoiled_conditions: Vec<_> = report.conditions_for_ring(spoiled.ring).collect();
    assert!(matches!(
        spoiled_conditions.as_slice(),
        [Condition::DegenerateTopology {
            issue: TopologyIssue::DanglingEnd,
            ..
        }]
    ));
    let clean = report.counted_rings().next().unwrap();
    assert_eq!(report.conditions_for_ring(clean.ring).count(), 0);
}

#[test]
fn rooms_joined_by_a_narrow_passage_keep_both_floors() {
    // Two 4 x 4 rooms linked by a 0.15 wide passage; the 0.1 inset closes
    // the passage but both floors remain.
    let entities = vec![RawEntity::polyline(
        "WALLS",
        &[
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 1.925),
            (6.0, 1.925),
            (6.0, 0.0),
            (10.0, 0.0),
            (10.0, 4.0),
            (6.0, 4.0),
            (6.0, 2.075),
            (4.0, 2.075),
            (4.0, 4.0),
            (0.0, 4.0),
        ],
        true,
    )];
    let report = run(&entities);
    let room = &report.rings[0];
    assert!(room.counted);
    assert_relative_eq!(room.built_up_area, 32.0 + 2.0 * 0.15, epsilon = 1e-9);
    assert!(!room.carpet_is_fallback);
    assert_relative_eq!(room.carpet_area, 2.0 * 3.8 * 3.8, epsilon = 1e-9);
    assert!(report.conditions.is_empty());
}

#[test]
fn zero_carpet_offset_fails_the_run() {
    let config = PipelineConfig {
        offset_distance: Some(0.0),
        ..PipelineConfig::default()
    };
    let err = Pipeline::new(&config)
        .run(&[rect(0.0, 0.0, 5.0, 5.0)])
        .unwrap_err();
    assert!(matches!(err, EstiError::Config(_)));
}

#[test]
fn collapsed_offset_applies_fallback_factor_exactly() {
    let config = PipelineConfig {
        offset_distance: Some(1.0),
        ..PipelineConfig::default()
    };
    // Bounding box 10 x 2: d = 1.0 is half the short side.
    let report = Pipeline::new(&config)
        .run(&[rect(0.0, 0.0, 10.0, 2.0), rect(20.0, 0.0, 30.0, 10.0)])
        .unwrap();

    let thin = &report.rings[0];
    assert!(thin.carpet_is_fallback);
    assert_eq!(thin.carpet_area, thin.built_up_area * 0.88);
    assert!(matches!(
        report.conditions.as_slice(),
        [Condition::CollapsedOffset { ring: 0, fallback_factor, .. }] if *fallback_factor == 0.88
    ));

    let wide = &report.rings[1];
    assert!(!wide.carpet_is_fallback);
    assert_relative_eq!(wide.carpet_area, 8.0 * 8.0, epsilon = 1e-9);
}

#[test]
fn offset_beyond_half_width_collapses() {
    let config = PipelineConfig {
        offset_distance: Some(2.0),
        carpet_fallback_factor: 0.75,
        ..PipelineConfig::default()
    };
    let report = Pipeline::new(&config)
        .run(&[rect(0.0, 0.0, 3.0, 3.0)])
        .unwrap();
    assert_eq!(report.rings[0].carpet_area, 9.0 * 0.75);
    assert!(matches!(
        report.conditions[0],
        Condition::CollapsedOffset { .. }
    ));
}

#[test]
fn l_shaped_room() {
    let entities = vec![RawEntity::polyline(
        "0",
        &[
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 2.0),
            (2.0, 2.0),
            (2.0, 4.0),
            (0.0, 4.0),
        ],
        true,
    )];
    let report = run(&entities);
    let room = &report.rings[0];
    assert_relative_eq!(room.built_up_area, 12.0, epsilon = 1e-12);
    assert_relative_eq!(room.perimeter, 16.0, epsilon = 1e-12);
    // Inset by 0.1: arms 1.8 wide.
    assert_relative_eq!(room.carpet_area, 3.8 * 1.8 + 1.8 * 2.0, epsilon = 1e-9);
}

#[test]
fn perimeter_ignores_start_and_direction() {
    let ring = pts(&[(0.0, 0.0), (5.0, 0.0), (6.0, 3.0), (2.0, 5.0), (-1.0, 2.0)]);
    let expected = perimeter_2d(&ring);
    for shift in 0..ring.len() {
        let mut rotated = ring.clone();
        rotated.rotate_left(shift);
        assert_relative_eq!(perimeter_2d(&rotated), expected, epsilon = 1e-12);
        rotated.reverse();
        assert_relative_eq!(perimeter_2d(&rotated), expected, epsilon = 1e-12);
    }
}

#[test]
fn offset_round_trip_reconstructs_boundary() {
    let shapes = [
        pts(&[(0.0, 0.0), (8.0, 0.0), (8.0, 5.0), (0.0, 5.0)]),
        pts(&[
            (0.0, 0.0),
            (6.0, 0.0),
            (6.0, 2.0),
            (2.0, 2.0),
            (2.0, 6.0),
            (0.0, 6.0),
        ]),
        pts(&[
            (0.0, 0.0),
            (9.0, 0.0),
            (9.0, 6.0),
            (6.0, 6.0),
            (6.0, 3.0),
            (3.0, 3.0),
            (3.0, 6.0),
            (0.0, 6.0),
        ]),
    ];
    for shape in &shapes {
        for d in [0.1, 0.25, 0.5] {
            let inset = RingOffset::new(shape, d).execute().unwrap();
            let back = RingOffset::new(&inset, -d).execute().unwrap();
            for p in &back {
                assert!(distance_to_boundary(p, shape) < 1e-9 * (1.0 + d));
            }
            for p in shape {
                assert!(distance_to_boundary(p, &back) < 1e-9 * (1.0 + d));
            }
            assert_relative_eq!(signed_area_2d(&back), signed_area_2d(shape), epsilon = 1e-9);
        }
    }
}

#[test]
fn unsupported_entities_are_reported_not_fatal() {
    let entities = vec![
        RawEntity {
            kind: EntityKind::Other("SPLINE".to_owned()),
            layer: "WALLS".to_owned(),
            vertices: vec![],
            closed: false,
        },
        rect(0.0, 0.0, 3.0, 3.0),
        RawEntity::line("Text", 0.0, 0.0, 100.0, 100.0),
    ];
    let report = run(&entities);
    assert_eq!(report.totals.room_count, 1);
    assert_eq!(
        report.conditions,
        vec![Condition::UnsupportedEntity {
            entity: 0,
            entity_kind: "SPLINE".to_owned(),
            layer: "WALLS".to_owned(),
        }]
    );
}

#[test]
fn partitioned_plan_with_junctions_allowed() {
    let config = PipelineConfig {
        allow_junctions: true,
        ..PipelineConfig::default()
    };
    let entities = vec![
        rect(0.0, 0.0, 10.0, 6.0),
        RawEntity::line("WALLS", 4.0, 0.0, 4.0, 6.0),
    ];
    let report = Pipeline::new(&config).run(&entities).unwrap();

    let outline: Vec<_> = report.counted_rings().collect();
    assert_eq!(outline.len(), 1);
    assert_relative_eq!(outline[0].built_up_area, 60.0, epsilon = 1e-12);

    let rooms: Vec<_> = report
        .rings
        .iter()
        .filter(|r| r.role == RingRole::Partition)
        .collect();
    assert_eq!(rooms.len(), 2);
    let total: f64 = rooms.iter().map(|r| r.built_up_area).sum();
    assert_relative_eq!(total, 60.0, epsilon = 1e-12);
    assert!(report.conditions.is_empty());
}

#[test]
fn report_serializes_to_json() {
    let report = run(&[rect(0.0, 0.0, 5.0, 5.0), RawEntity::line("0", 9.0, 9.0, 9.5, 9.0)]);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["units"], "m");
    assert_eq!(json["totals"]["room_count"], 1);
    assert_eq!(json["rings"][0]["role"], "primary");
    assert_eq!(json["conditions"][0]["kind"], "degenerate_topology");
    assert_eq!(json["conditions"][0]["issue"], "dangling_end");
}
