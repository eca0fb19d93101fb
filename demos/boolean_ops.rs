use polygon_overlay::{
    core::traits::FuzzyEq,
    geometry::{ClosureConvention, Geometry, MultiPolygon, Polygon, Rect, RingOrientation},
    overlay::{self, OverlayOp, OverlayOptions},
    ring,
    strategy::CartesianStrategy,
};

fn main() {
    union_operations();
    intersection_operations();
    difference_operations();
    special_cases();
}

fn print_result(label: &str, result: &MultiPolygon<f64>) {
    println!(
        "{}: {} polygon(s), area = {:.2}",
        label,
        result.len(),
        result.area()
    );
    for (i, polygon) in result.iter().enumerate() {
        println!(
            "  polygon {}: {} exterior points, {} hole(s)",
            i,
            polygon.exterior.len(),
            polygon.interiors.len()
        );
    }
}

fn union_operations() {
    println!("Testing union operations...");

    let rect1 = Geometry::from(Rect::new(0.0, 0.0, 10.0, 10.0));
    let rect2 = Geometry::from(Rect::new(5.0, 5.0, 15.0, 15.0));
    let result = overlay::union(&rect1, &rect2).unwrap();
    assert_eq!(result.len(), 1, "Overlapping rectangles union to one polygon");
    assert!(
        result.area().fuzzy_eq(175.0),
        "Union area should be 100 + 100 - 25"
    );
    print_result("Union of overlapping rectangles", &result);

    // union closing a gap produces a hole
    let u_shape = Geometry::from(ring![
        (0.0, 0.0),
        (9.0, 0.0),
        (9.0, 9.0),
        (6.0, 9.0),
        (6.0, 3.0),
        (3.0, 3.0),
        (3.0, 9.0),
        (0.0, 9.0)
    ]);
    let lid = Geometry::from(Rect::new(-1.0, 7.0, 10.0, 10.0));
    let result = overlay::union(&u_shape, &lid).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.polygons[0].interiors.len(), 1, "Lid closes the U into a hole");
    print_result("Union of U shape and lid", &result);

    println!("Union operations completed successfully!\n");
}

fn intersection_operations() {
    println!("Testing intersection operations...");

    let rect1 = Geometry::from(Rect::new(0.0, 0.0, 10.0, 10.0));
    let rect2 = Geometry::from(Rect::new(5.0, 5.0, 15.0, 15.0));
    let result = overlay::intersection(&rect1, &rect2).unwrap();
    assert!(result.area().fuzzy_eq(25.0));
    print_result("Intersection of overlapping rectangles", &result);

    let rect3 = Geometry::from(Rect::new(20.0, 0.0, 30.0, 10.0));
    let result = overlay::intersection(&rect1, &rect3).unwrap();
    assert!(
        result.is_empty(),
        "Non-overlapping rectangles should have no intersection"
    );
    println!("Non-overlapping rectangles: no intersection as expected");

    println!("Intersection operations completed successfully!\n");
}

fn difference_operations() {
    println!("Testing difference operations...");

    let outer = Geometry::from(Rect::new(0.0, 0.0, 20.0, 20.0));
    let inner = Geometry::from(Rect::new(5.0, 5.0, 15.0, 15.0));
    let result = overlay::difference(&outer, &inner).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(
        result.polygons[0].interiors.len(),
        1,
        "Difference should produce 1 polygon with 1 hole"
    );
    assert!(result.area().fuzzy_eq(300.0));
    print_result("Outer - inner", &result);

    let result = overlay::difference(&inner, &outer).unwrap();
    assert!(result.is_empty(), "Inner - outer should be empty");
    println!("Inner - outer rectangle: empty result as expected");

    println!("Difference operations completed successfully!\n");
}

fn special_cases() {
    println!("Testing special cases and symmetric difference...");

    let square = Geometry::from(Rect::new(0.0, 0.0, 10.0, 10.0));
    let result = overlay::sym_difference(&square, &square).unwrap();
    assert!(
        result.is_empty(),
        "Symmetric difference of identical squares is empty"
    );
    println!("Symmetric difference of identical squares: empty result as expected");

    let with_hole = Geometry::from(Polygon::new(
        Rect::new(0.0, 0.0, 10.0, 10.0).to_ring(),
        vec![Rect::new(4.0, 4.0, 6.0, 6.0).to_ring()],
    ));
    let plug = Geometry::from(Rect::new(3.0, 3.0, 7.0, 7.0));
    let result = overlay::union(&with_hole, &plug).unwrap();
    assert!(result.polygons[0].interiors.is_empty(), "Plug fills the hole");
    print_result("Polygon with hole united with plug", &result);

    // custom options: clockwise exteriors without repeated closing point
    let mut options = OverlayOptions::new();
    options.output_orientation = RingOrientation::Clockwise;
    options.closure = ClosureConvention::Open;
    let result = overlay::overlay(
        &with_hole,
        &plug,
        OverlayOp::SymDifference,
        &CartesianStrategy::default(),
        &options,
    )
    .unwrap();
    assert!(result.area().fuzzy_eq(88.0));
    assert_eq!(result.len(), 2, "Frame with plug hole plus the original hole as an island");
    print_result("Symmetric difference with custom options", &result);

    println!("Special cases completed successfully!\n");
}
