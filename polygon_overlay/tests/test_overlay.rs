mod test_utils;

use polygon_overlay::{
    assert_fuzzy_eq,
    core::traits::FuzzyEq,
    geometry::{ClosureConvention, Geometry, MultiPolygon, Polygon, Rect, RingOrientation},
    overlay::{
        difference, intersection, overlay, sym_difference, union, OverlayOp, OverlayOptions,
    },
    ring,
    strategy::CartesianStrategy,
};
use test_utils::{
    create_property_set, property_sets_match, result_extents, square, GeometryProperties,
};

fn run(a: &Geometry<f64>, b: &Geometry<f64>, op: OverlayOp) -> MultiPolygon<f64> {
    overlay(a, b, op, &CartesianStrategy::default(), &OverlayOptions::new()).unwrap()
}

fn run_with(
    a: &Geometry<f64>,
    b: &Geometry<f64>,
    op: OverlayOp,
    options: &OverlayOptions<f64>,
) -> MultiPolygon<f64> {
    overlay(a, b, op, &CartesianStrategy::default(), options).unwrap()
}

#[test]
fn triangle_intersection() {
    let a = Geometry::from(Rect::new(0.0, 0.0, 2.0, 2.0));
    let b = Geometry::from(ring![(2.0, 1.0), (2.0, 4.0), (4.0, 4.0), (4.0, 0.0), (1.0, 0.0)]);
    let result = intersection(&a, &b).unwrap();
    let expected = [GeometryProperties::new(
        1,
        0.5,
        2.0 + 2.0f64.sqrt(),
        1.0,
        0.0,
        2.0,
        1.0,
    )];
    assert!(property_sets_match(&create_property_set(&result), &expected));

    let result = union(&a, &b).unwrap();
    assert_eq!(result.len(), 1);
    assert_fuzzy_eq!(result.area(), 12.0);
}

#[test]
fn identical_squares() {
    let a = Geometry::from(Rect::new(0.0, 0.0, 1.0, 1.0));
    let expected = [GeometryProperties::new(1, 1.0, 4.0, 0.0, 0.0, 1.0, 1.0)];
    for op in [OverlayOp::Union, OverlayOp::Intersection] {
        let result = run(&a, &a, op);
        assert!(
            property_sets_match(&create_property_set(&result), &expected),
            "op: {}",
            op
        );
    }

    for op in [OverlayOp::Difference, OverlayOp::SymDifference] {
        let result = run(&a, &a, op);
        assert!(result.is_empty(), "op: {}, result: {:?}", op, result);
    }
}

#[test]
fn edge_touching_boxes() {
    let a = Geometry::from(Rect::new(0.0, 0.0, 1.0, 1.0));
    let b = Geometry::from(Rect::new(1.0, 0.0, 2.0, 1.0));
    let result = union(&a, &b).unwrap();
    let expected = [GeometryProperties::new(1, 2.0, 6.0, 0.0, 0.0, 2.0, 1.0)];
    assert!(property_sets_match(&create_property_set(&result), &expected));

    let result = intersection(&a, &b).unwrap();
    assert!(result.is_empty());

    let result = difference(&a, &b).unwrap();
    let expected = [GeometryProperties::new(1, 1.0, 4.0, 0.0, 0.0, 1.0, 1.0)];
    assert!(property_sets_match(&create_property_set(&result), &expected));
}

#[test]
fn crossing_boxes_all_ops() {
    let a = Geometry::from(Rect::new(0.0, 0.0, 2.0, 2.0));
    let b = Geometry::from(Rect::new(1.0, 1.0, 3.0, 3.0));

    let result = union(&a, &b).unwrap();
    let expected = [GeometryProperties::new(1, 7.0, 12.0, 0.0, 0.0, 3.0, 3.0)];
    assert!(property_sets_match(&create_property_set(&result), &expected));

    let result = intersection(&a, &b).unwrap();
    let expected = [GeometryProperties::new(1, 1.0, 4.0, 1.0, 1.0, 2.0, 2.0)];
    assert!(property_sets_match(&create_property_set(&result), &expected));

    let result = difference(&a, &b).unwrap();
    let expected = [GeometryProperties::new(1, 3.0, 8.0, 0.0, 0.0, 2.0, 2.0)];
    assert!(property_sets_match(&create_property_set(&result), &expected));

    let result = sym_difference(&a, &b).unwrap();
    let expected = [
        GeometryProperties::new(1, 3.0, 8.0, 0.0, 0.0, 2.0, 2.0),
        GeometryProperties::new(1, 3.0, 8.0, 1.0, 1.0, 3.0, 3.0),
    ];
    assert!(property_sets_match(&create_property_set(&result), &expected));
}

#[test]
fn disjoint_inputs() {
    let a = Geometry::from(Rect::new(0.0, 0.0, 1.0, 1.0));
    let b = Geometry::from(Rect::new(5.0, 5.0, 7.0, 7.0));

    assert!(intersection(&a, &b).unwrap().is_empty());

    let result = union(&a, &b).unwrap();
    let expected = [
        GeometryProperties::new(1, 1.0, 4.0, 0.0, 0.0, 1.0, 1.0),
        GeometryProperties::new(1, 4.0, 8.0, 5.0, 5.0, 7.0, 7.0),
    ];
    assert!(property_sets_match(&create_property_set(&result), &expected));

    let result = difference(&a, &b).unwrap();
    assert_eq!(result.len(), 1);
    assert_fuzzy_eq!(result.area(), 1.0);
}

#[test]
fn containment() {
    let outer = Geometry::from(Rect::new(0.0, 0.0, 4.0, 4.0));
    let inner = Geometry::from(Rect::new(1.0, 1.0, 2.0, 2.0));

    let result = union(&outer, &inner).unwrap();
    let expected = [GeometryProperties::new(1, 16.0, 16.0, 0.0, 0.0, 4.0, 4.0)];
    assert!(property_sets_match(&create_property_set(&result), &expected));

    let result = intersection(&outer, &inner).unwrap();
    let expected = [GeometryProperties::new(1, 1.0, 4.0, 1.0, 1.0, 2.0, 2.0)];
    assert!(property_sets_match(&create_property_set(&result), &expected));

    let result = difference(&outer, &inner).unwrap();
    let expected = [GeometryProperties::new(2, 15.0, 20.0, 0.0, 0.0, 4.0, 4.0)];
    assert!(property_sets_match(&create_property_set(&result), &expected));

    assert!(difference(&inner, &outer).unwrap().is_empty());

    let result = sym_difference(&outer, &inner).unwrap();
    assert!(property_sets_match(&create_property_set(&result), &expected));
}

#[test]
fn polygon_with_hole() {
    let a = Geometry::from(Polygon::new(
        Rect::new(0.0, 0.0, 10.0, 10.0).to_ring(),
        vec![Rect::new(4.0, 4.0, 6.0, 6.0).to_ring()],
    ));
    // b crosses the outer ring top and bottom and the hole through its middle
    let b = Geometry::from(Rect::new(5.0, -1.0, 15.0, 11.0));

    let result = union(&a, &b).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.polygons[0].interiors.len(), 1);
    assert_fuzzy_eq!(result.area(), 168.0);

    let result = intersection(&a, &b).unwrap();
    assert_eq!(result.len(), 1);
    assert!(result.polygons[0].interiors.is_empty());
    assert_fuzzy_eq!(result.area(), 48.0);

    let result = difference(&a, &b).unwrap();
    assert_eq!(result.len(), 1);
    assert_fuzzy_eq!(result.area(), 48.0);

    let result = difference(&b, &a).unwrap();
    assert_eq!(result.len(), 2);
    assert_fuzzy_eq!(result.area(), 72.0);

    let result = sym_difference(&a, &b).unwrap();
    assert_eq!(result.len(), 3);
    assert_fuzzy_eq!(result.area(), 120.0);
}

#[test]
fn checkerboard_cluster() {
    let a = Geometry::from(MultiPolygon::new(vec![
        square(0.0, 0.0, 1.0),
        square(1.0, 1.0, 1.0),
    ]));
    let b = Geometry::from(MultiPolygon::new(vec![
        square(1.0, 0.0, 1.0),
        square(0.0, 1.0, 1.0),
    ]));

    for shortcut in [true, false] {
        let mut options = OverlayOptions::new();
        options.cluster_rank_shortcut = shortcut;

        let result = run_with(&a, &b, OverlayOp::Union, &options);
        let expected = [GeometryProperties::new(1, 4.0, 8.0, 0.0, 0.0, 2.0, 2.0)];
        assert!(
            property_sets_match(&create_property_set(&result), &expected),
            "shortcut: {}",
            shortcut
        );

        let result = run_with(&a, &b, OverlayOp::Intersection, &options);
        assert!(result.is_empty(), "shortcut: {}", shortcut);
    }
}

#[test]
fn corner_touching_cells_keep_every_ring() {
    // two cells touching at (2, 1), the second one repeated as b
    let a = Geometry::from(MultiPolygon::new(vec![
        square(1.0, 1.0, 1.0),
        square(2.0, 0.0, 1.0),
    ]));
    let b = Geometry::from(square(2.0, 0.0, 1.0));

    let u = union(&a, &b).unwrap();
    assert_fuzzy_eq!(u.area(), 2.0);
    let i = intersection(&a, &b).unwrap();
    assert_fuzzy_eq!(i.area(), 1.0);
    let d = difference(&a, &b).unwrap();
    assert_eq!(d.len(), 1);
    assert_fuzzy_eq!(d.area(), 1.0);
    assert_fuzzy_eq!(u.area() + i.area(), a.area() + b.area());

    // b fills the notch between both cells, sharing one edge with each
    let b = Geometry::from(square(2.0, 1.0, 1.0));
    let d = difference(&a, &b).unwrap();
    assert_fuzzy_eq!(d.area(), 2.0);
    let u = union(&a, &b).unwrap();
    assert_fuzzy_eq!(u.area(), 3.0);
    assert!(intersection(&a, &b).unwrap().is_empty());
}

#[test]
fn orientation_of_input_is_irrelevant() {
    let cw = Geometry::from(Rect::new(0.0, 0.0, 2.0, 2.0));
    let ccw = Geometry::from(ring![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
    let b = Geometry::from(Rect::new(1.0, 1.0, 3.0, 3.0));
    for op in [
        OverlayOp::Union,
        OverlayOp::Intersection,
        OverlayOp::Difference,
        OverlayOp::SymDifference,
    ] {
        let r1 = run(&cw, &b, op);
        let r2 = run(&ccw, &b, op);
        assert!(
            property_sets_match(&create_property_set(&r1), &create_property_set(&r2)),
            "op: {}",
            op
        );
    }
}

#[test]
fn output_conventions() {
    let a = Geometry::from(Rect::new(0.0, 0.0, 4.0, 4.0));
    let b = Geometry::from(Rect::new(1.0, 1.0, 2.0, 2.0));

    let result = difference(&a, &b).unwrap();
    let polygon = &result.polygons[0];
    assert!(polygon.exterior.has_closing_point());
    assert_eq!(
        polygon.exterior.orientation(),
        Some(RingOrientation::CounterClockwise)
    );
    assert_eq!(
        polygon.interiors[0].orientation(),
        Some(RingOrientation::Clockwise)
    );

    let mut options = OverlayOptions::new();
    options.output_orientation = RingOrientation::Clockwise;
    options.closure = ClosureConvention::Open;
    let result = run_with(&a, &b, OverlayOp::Difference, &options);
    let polygon = &result.polygons[0];
    assert!(!polygon.exterior.has_closing_point());
    assert_eq!(polygon.exterior.len(), 4);
    assert_eq!(polygon.exterior.orientation(), Some(RingOrientation::Clockwise));
    assert_eq!(
        polygon.interiors[0].orientation(),
        Some(RingOrientation::CounterClockwise)
    );
}

#[test]
fn idempotence() {
    let a = Geometry::from(Polygon::new(
        Rect::new(0.0, 0.0, 10.0, 10.0).to_ring(),
        vec![Rect::new(2.0, 2.0, 3.0, 3.0).to_ring()],
    ));
    let expected = [GeometryProperties::new(2, 99.0, 44.0, 0.0, 0.0, 10.0, 10.0)];
    for op in [OverlayOp::Union, OverlayOp::Intersection] {
        let result = run(&a, &a, op);
        assert!(
            property_sets_match(&create_property_set(&result), &expected),
            "op: {}",
            op
        );
    }
}

#[test]
fn union_result_contains_inputs_extents() {
    let a = Geometry::from(ring![(0.0, 0.0), (3.0, 0.5), (1.0, 2.0)]);
    let b = Geometry::from(ring![(1.0, -1.0), (2.5, 2.5), (0.0, 1.5)]);
    let result = union(&a, &b).unwrap();
    let extents = result_extents(&result).unwrap();
    assert!(extents.min_x.fuzzy_eq(0.0));
    assert!(extents.min_y.fuzzy_eq(-1.0));
    assert!(extents.max_x.fuzzy_eq(3.0));
    assert!(extents.max_y.fuzzy_eq(2.5));

    let i = intersection(&a, &b).unwrap().area();
    let u = result.area();
    assert_fuzzy_eq!(u + i, a.area() + b.area());
}

#[test]
fn degenerate_inputs_terminate() {
    let square = Geometry::from(Rect::new(0.0, 0.0, 2.0, 2.0));
    // zero area sliver and a ring with a spike
    let sliver = Geometry::from(ring![(0.0, 1.0), (3.0, 1.0), (1.5, 1.0)]);
    let spike = Geometry::from(ring![
        (1.0, 1.0),
        (3.0, 1.0),
        (4.0, 1.0),
        (3.0, 1.0),
        (3.0, 3.0),
        (1.0, 3.0)
    ]);
    let bow_tie = Geometry::from(ring![(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 3.0)]);
    for other in [&sliver, &spike, &bow_tie] {
        for op in [
            OverlayOp::Union,
            OverlayOp::Intersection,
            OverlayOp::Difference,
            OverlayOp::SymDifference,
        ] {
            // result quality is best effort, only termination and sane output are required
            let result = run(&square, other, op);
            for polygon in result.iter() {
                assert!(polygon.exterior.len() >= 4);
                assert!(polygon.area().is_finite());
            }
        }
    }

    let result = union(&square, &sliver).unwrap();
    assert_fuzzy_eq!(result.area(), 4.0);
}

#[test]
fn debug_trace_does_not_change_result() {
    let _ = env_logger::builder().is_test(true).try_init();
    let a = Geometry::from(Rect::new(0.0, 0.0, 2.0, 2.0));
    let b = Geometry::from(ring![(2.0, 1.0), (2.0, 4.0), (4.0, 4.0), (4.0, 0.0), (1.0, 0.0)]);
    let mut options = OverlayOptions::new();
    let plain = run_with(&a, &b, OverlayOp::Union, &options);
    options.debug_trace = true;
    let traced = run_with(&a, &b, OverlayOp::Union, &options);
    assert_eq!(plain, traced);
}

#[test]
fn f32_coordinates() {
    let a = Geometry::from(Rect::new(0.0f32, 0.0, 2.0, 2.0));
    let b = Geometry::from(Rect::new(1.0f32, 1.0, 3.0, 3.0));
    let result = union(&a, &b).unwrap();
    assert_eq!(result.len(), 1);
    assert!((result.area() - 7.0).abs() < 1e-4);
}
