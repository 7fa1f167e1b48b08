//! Convex hull engine: the boundary shape drawn around every pixel group.
//!
//! Algorithm: monotone chain
//! 1. Sort points by x, ties by y (total order, so duplicates are stable)
//! 2. Sweep forward for the lower chain, backward for the upper chain,
//!    popping the middle point of any triple whose cross product is <= 0
//!    (right turns AND collinear boundary points are dropped)
//! 3. Join the chains, each minus its last point
//!
//! The hull is then pushed outward from its own vertex centroid by a
//! padding distance and rounded to whole units. The bounding box used for
//! hover/selection is taken over that expanded polygon.

use serde::{Deserialize, Serialize};

use crate::geometry::{Bounds, Vec2};

/// Twice the signed area of triangle (o, a, b); > 0 for a left turn.
#[inline]
fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn build_chain<'a>(points: impl Iterator<Item = &'a Vec2>) -> Vec<Vec2> {
    let mut chain: Vec<Vec2> = Vec::new();
    for &p in points {
        while chain.len() >= 2 && cross(chain[chain.len() - 2], chain[chain.len() - 1], p) <= 0.0 {
            chain.pop();
        }
        chain.push(p);
    }
    chain
}

/// Convex hull of `points` in consistent (counter-clockwise in y-up terms)
/// winding order. Zero or one point is returned unchanged.
pub fn convex_hull(points: &[Vec2]) -> Vec<Vec2> {
    if points.len() <= 1 {
        return points.to_vec();
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));

    let mut lower = build_chain(sorted.iter());
    let mut upper = build_chain(sorted.iter().rev());

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Mean of the hull vertices (not of the raw input points).
pub fn hull_centroid(hull: &[Vec2]) -> Option<Vec2> {
    Vec2::centroid(hull)
}

/// Push each hull vertex `padding` units away from the hull centroid and
/// round to whole units.
///
/// A vertex sitting on the centroid has no direction; its distance is taken
/// as 1 so the offset collapses to zero instead of dividing by zero. When
/// *every* vertex sits on the centroid (a single member, or members stacked
/// on one spot) the point is expanded into a diamond of radius `padding` so
/// the boundary keeps a usable area.
pub fn expand_hull(hull: &[Vec2], padding: f32) -> Vec<Vec2> {
    let Some(centroid) = hull_centroid(hull) else {
        return Vec::new();
    };

    if hull.iter().all(|p| p.distance_squared(&centroid) == 0.0) {
        return [
            Vec2::new(padding, 0.0),
            Vec2::new(0.0, padding),
            Vec2::new(-padding, 0.0),
            Vec2::new(0.0, -padding),
        ]
        .iter()
        .map(|offset| (centroid + *offset).round())
        .collect();
    }

    hull.iter()
        .map(|p| {
            let d = *p - centroid;
            let mut dist = d.length();
            if dist == 0.0 {
                dist = 1.0;
            }
            (*p + d * (padding / dist)).round()
        })
        .collect()
}

/// Whether `point` lies inside or on a convex polygon produced by
/// [`convex_hull`]. `epsilon` absorbs float noise on the edges.
pub fn hull_contains(hull: &[Vec2], point: Vec2, epsilon: f32) -> bool {
    match hull.len() {
        0 => false,
        1 => hull[0].distance(&point) <= epsilon,
        2 => {
            let (a, b) = (hull[0], hull[1]);
            let len = a.distance(&b).max(f32::EPSILON);
            let off_line = cross(a, b, point).abs() / len;
            let within = (point - a).x * (b - a).x + (point - a).y * (b - a).y;
            off_line <= epsilon && within >= -epsilon * len && within <= len * len + epsilon * len
        }
        n => (0..n).all(|i| {
            let a = hull[i];
            let b = hull[(i + 1) % n];
            let len = a.distance(&b).max(f32::EPSILON);
            cross(a, b, point) / len >= -epsilon
        }),
    }
}

/// Cached boundary geometry of one group, derived from member positions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HullGeometry {
    /// Raw convex hull of member world positions
    pub hull: Vec<Vec2>,
    /// Hull pushed outward by the group's padding, rounded
    pub expanded: Vec<Vec2>,
    /// Axis-aligned box over `expanded`
    pub bounds: Bounds,
}

impl HullGeometry {
    /// Geometry for a group with no members: a zero-area box on its anchor.
    pub fn empty_at(anchor: Vec2) -> Self {
        Self {
            hull: Vec::new(),
            expanded: Vec::new(),
            bounds: Bounds::degenerate_at(anchor),
        }
    }

    pub fn compute(points: &[Vec2], padding: f32, anchor: Vec2) -> Self {
        if points.is_empty() {
            return Self::empty_at(anchor);
        }
        let hull = convex_hull(points);
        let expanded = expand_hull(&hull, padding);
        let bounds = Bounds::from_points(&expanded).unwrap_or_else(|| Bounds::degenerate_at(anchor));
        Self {
            hull,
            expanded,
            bounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f32, f32)]) -> Vec<Vec2> {
        raw.iter().map(|&(x, y)| Vec2::new(x, y)).collect()
    }

    #[test]
    fn test_square_drops_interior_point() {
        let hull = convex_hull(&pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (5.0, 5.0)]));
        assert_eq!(hull, pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]));
    }

    #[test]
    fn test_collinear_points_dropped() {
        let hull = convex_hull(&pts(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (10.0, 10.0)]));
        assert_eq!(hull.len(), 3);
        assert!(!hull.contains(&Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(convex_hull(&[]).is_empty());
        let one = pts(&[(3.0, 4.0)]);
        assert_eq!(convex_hull(&one), one);

        let two = convex_hull(&pts(&[(10.0, 0.0), (0.0, 0.0)]));
        assert_eq!(two, pts(&[(0.0, 0.0), (10.0, 0.0)]));
    }

    #[test]
    fn test_centroid_uses_hull_vertices() {
        // Interior point (1,1) would pull the input mean off-center.
        let hull = convex_hull(&pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (1.0, 1.0)]));
        assert_eq!(hull_centroid(&hull), Some(Vec2::new(2.0, 2.0)));
    }

    #[test]
    fn test_expand_square() {
        let hull = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let expanded = expand_hull(&hull, 10.0);
        // Diagonal push of 10 units: 10/sqrt(2) ~= 7.07 per axis, rounded
        assert_eq!(expanded[0], Vec2::new(-7.0, -7.0));
        assert_eq!(expanded[2], Vec2::new(17.0, 17.0));
    }

    #[test]
    fn test_expand_single_point_is_diamond() {
        let expanded = expand_hull(&pts(&[(5.0, 5.0)]), 20.0);
        assert_eq!(expanded.len(), 4);
        for p in &expanded {
            assert_eq!(p.distance(&Vec2::new(5.0, 5.0)), 20.0);
        }
    }

    #[test]
    fn test_expand_zero_padding_is_identity() {
        let hull = pts(&[(0.0, 0.0), (6.0, 0.0), (3.0, 6.0)]);
        assert_eq!(expand_hull(&hull, 0.0), hull);
    }

    #[test]
    fn test_geometry_bounds_over_expanded() {
        let geo = HullGeometry::compute(
            &pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]),
            10.0,
            Vec2::ZERO,
        );
        assert_eq!(geo.bounds.min, Vec2::new(-7.0, -7.0));
        assert_eq!(geo.bounds.max, Vec2::new(17.0, 17.0));
    }

    #[test]
    fn test_geometry_empty_collapses_to_anchor() {
        let anchor = Vec2::new(42.0, -3.0);
        let geo = HullGeometry::compute(&[], 20.0, anchor);
        assert!(geo.hull.is_empty());
        assert_eq!(geo.bounds, Bounds::degenerate_at(anchor));
    }

    #[test]
    fn test_hull_contains() {
        let hull = convex_hull(&pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]));
        assert!(hull_contains(&hull, Vec2::new(5.0, 5.0), 1e-3));
        assert!(hull_contains(&hull, Vec2::new(10.0, 5.0), 1e-3));
        assert!(!hull_contains(&hull, Vec2::new(11.0, 5.0), 1e-3));

        let segment = pts(&[(0.0, 0.0), (10.0, 0.0)]);
        assert!(hull_contains(&segment, Vec2::new(4.0, 0.0), 1e-3));
        assert!(!hull_contains(&segment, Vec2::new(4.0, 1.0), 1e-3));
    }
}
