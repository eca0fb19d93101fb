use polygon_overlay::{
    core::{math::vec2, traits::FuzzyEq},
    geometry::{Geometry, LineString, Polygon, Rect},
    overlay::{clip_linestring, OverlayOp, OverlayOptions},
    strategy::CartesianStrategy,
};

fn main() {
    let field = Geometry::from(Polygon::new(
        Rect::new(0.0, 0.0, 10.0, 10.0).to_ring(),
        vec![Rect::new(4.0, 4.0, 6.0, 6.0).to_ring()],
    ));
    let path = Geometry::from(LineString::from_points(vec![
        vec2(-2.0, 5.0),
        vec2(12.0, 5.0),
        vec2(12.0, 8.0),
        vec2(5.0, 8.0),
    ]));

    let strategy = CartesianStrategy::default();
    let options = OverlayOptions::new();

    let inside =
        clip_linestring(&path, &field, OverlayOp::Intersection, &strategy, &options).unwrap();
    println!("Pieces inside the field: {}", inside.len());
    for line in inside.line_strings.iter() {
        println!("  {:?}", line.points);
    }
    // 4 + 4 along y = 5 (hole skipped) plus 5 along y = 8
    assert!(inside.length().fuzzy_eq(13.0));

    let outside =
        clip_linestring(&path, &field, OverlayOp::Difference, &strategy, &options).unwrap();
    println!("Pieces outside the field: {}", outside.len());
    assert!(outside.length().fuzzy_eq(path_length(&path) - 13.0));
}

fn path_length(g: &Geometry<f64>) -> f64 {
    match g {
        Geometry::LineString(ls) => ls.length(),
        _ => 0.0,
    }
}
