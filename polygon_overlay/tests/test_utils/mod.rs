#![allow(dead_code)]
use polygon_overlay::{
    core::{math::Vector2, traits::FuzzyEq},
    geometry::{extents_of, MultiPolygon, Polygon, Rect, Ring},
    AABB,
};

/// Fuzzy compare AABB values
pub fn aabb_fuzzy_eq_eps(a: &AABB<f64>, b: &AABB<f64>, eps: f64) -> bool {
    a.min_x.fuzzy_eq_eps(b.min_x, eps)
        && a.min_y.fuzzy_eq_eps(b.min_y, eps)
        && a.max_x.fuzzy_eq_eps(b.max_x, eps)
        && a.max_y.fuzzy_eq_eps(b.max_y, eps)
}

/// Holds a set of properties of an output polygon for comparison in tests.
#[derive(Debug, Copy, Clone)]
pub struct GeometryProperties {
    pub ring_count: usize,
    pub area: f64,
    pub perimeter: f64,
    pub extents: AABB<f64>,
}

impl GeometryProperties {
    // property comparer epsilon
    pub const PROP_CMP_EPS: f64 = 1e-4;

    pub fn new(
        ring_count: usize,
        area: f64,
        perimeter: f64,
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    ) -> Self {
        Self {
            ring_count,
            area,
            perimeter,
            extents: AABB::new(min_x, min_y, max_x, max_y),
        }
    }

    pub fn from_polygon(polygon: &Polygon<f64>) -> Self {
        let perimeter = polygon
            .interiors
            .iter()
            .fold(polygon.exterior.perimeter(), |acc, h| acc + h.perimeter());
        Self {
            ring_count: polygon.ring_count(),
            area: polygon.area(),
            perimeter,
            extents: polygon.exterior.extents().unwrap(),
        }
    }

    pub fn fuzzy_eq_eps(&self, other: &Self, eps: f64) -> bool {
        if self.ring_count != other.ring_count {
            return false;
        }
        if !self.area.fuzzy_eq_eps(other.area, eps) {
            return false;
        }
        if !self.perimeter.fuzzy_eq_eps(other.perimeter, eps) {
            return false;
        }
        if !aabb_fuzzy_eq_eps(&self.extents, &other.extents, eps) {
            return false;
        }
        true
    }
}

pub fn create_property_set(result: &MultiPolygon<f64>) -> Vec<GeometryProperties> {
    result.iter().map(GeometryProperties::from_polygon).collect()
}

pub fn property_sets_match(
    result_set: &[GeometryProperties],
    expected_set: &[GeometryProperties],
) -> bool {
    let mut sets_match = true;
    if result_set.len() != expected_set.len() {
        sets_match = false;
    } else {
        // sets are small, N^2 compare is fine
        for properties_expected in expected_set {
            let match_count = result_set
                .iter()
                .filter(|properties_result| {
                    properties_expected
                        .fuzzy_eq_eps(properties_result, GeometryProperties::PROP_CMP_EPS)
                })
                .count();

            if match_count != 1 {
                sets_match = false;
                break;
            }
        }
    }

    if !sets_match {
        eprintln!("result:\n{:?}", result_set);
        eprintln!("expected:\n{:?}", expected_set);
    }

    sets_match
}

/// Regular polygon with `n` vertexes, counter clockwise.
pub fn regular_ngon(n: usize, cx: f64, cy: f64, radius: f64, rotation: f64) -> Ring<f64> {
    let step = std::f64::consts::TAU / n as f64;
    let points = (0..n)
        .map(|i| {
            let angle = rotation + step * i as f64;
            Vector2::new(cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect();
    Ring::from_points(points)
}

pub fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
    Polygon::from(Rect::new(x, y, x + size, y + size).to_ring())
}

/// Bounding box of all output exteriors.
pub fn result_extents(result: &MultiPolygon<f64>) -> Option<AABB<f64>> {
    let points: Vec<Vector2<f64>> = result
        .iter()
        .flat_map(|p| p.exterior.points.iter().copied())
        .collect();
    extents_of(&points)
}
