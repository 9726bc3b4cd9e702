use crate::bounding_volume::Aabb;
use crate::math::{Real, Vector, DIM};
use crate::shape::Triangle;

/// Tests if a triangle intersects an AABB.
///
/// This is a Separating Axis Theorem test over the 13 candidate axes of a
/// triangle/box pair: the three box face normals, the triangle face normal,
/// and the nine cross-products between box edge directions and triangle edge
/// directions. If no candidate axis separates the projections, the shapes
/// intersect.
///
/// Boundary contacts count as intersections: a triangle touching a face,
/// edge, or vertex of the box is reported as intersecting. This keeps
/// surface voxelization free of seam gaps when a triangle lies exactly on
/// the boundary between two voxels.
///
/// Degenerate (zero-area) triangles are valid inputs; their projections
/// collapse to points or segments, which the interval tests handle without
/// any special casing.
pub fn intersection_test_aabb_triangle(aabb: &Aabb, triangle: &Triangle) -> bool {
    let half_extents = aabb.half_extents();
    let center = aabb.center();

    // Work in the box's local frame.
    let vertices = [
        triangle.a - center,
        triangle.b - center,
        triangle.c - center,
    ];

    // The three box face normals.
    for d in 0..DIM {
        let min = vertices[0][d].min(vertices[1][d]).min(vertices[2][d]);
        let max = vertices[0][d].max(vertices[1][d]).max(vertices[2][d]);

        if max < -half_extents[d] || min > half_extents[d] {
            return false;
        }
    }

    // The triangle face normal (plane/box overlap test). For a degenerate
    // triangle the normal is zero and this axis can never separate.
    // Edge directions are translation-invariant, so the uncentered ones work.
    let edges = triangle.edges_scaled_directions();
    let normal = edges[0].cross(&edges[1]);
    let radius = half_extents.dot(&normal.abs());

    if vertices[0].dot(&normal).abs() > radius {
        return false;
    }

    // The nine cross-products between box edge directions and triangle edge
    // directions. A near-zero cross-product (parallel edges) projects
    // everything to zero and never separates, so it needs no epsilon skip.
    for edge in &edges {
        for d in 0..DIM {
            let axis = Vector::ith(d, 1.0).cross(edge);

            if !projections_overlap(&vertices, &half_extents, &axis) {
                return false;
            }
        }
    }

    true
}

// Projects the triangle vertices and the box half-extents onto `axis` and
// checks the resulting intervals for (inclusive) overlap.
fn projections_overlap(
    vertices: &[Vector<Real>; 3],
    half_extents: &Vector<Real>,
    axis: &Vector<Real>,
) -> bool {
    let p0 = vertices[0].dot(axis);
    let p1 = vertices[1].dot(axis);
    let p2 = vertices[2].dot(axis);

    let radius = half_extents.dot(&axis.abs());
    let min = p0.min(p1).min(p2);
    let max = p0.max(p1).max(p2);

    !(max < -radius || min > radius)
}

#[cfg(test)]
mod test {
    use super::intersection_test_aabb_triangle;
    use crate::bounding_volume::Aabb;
    use crate::math::{Point, Vector};
    use crate::shape::Triangle;

    fn unit_box() -> Aabb {
        Aabb::from_half_extents(Point::origin(), Vector::repeat(0.5))
    }

    #[test]
    fn triangle_inside_box_intersects() {
        let tri = Triangle::new(
            Point::new(-0.1, -0.1, 0.0),
            Point::new(0.1, -0.1, 0.0),
            Point::new(0.0, 0.1, 0.0),
        );
        assert!(intersection_test_aabb_triangle(&unit_box(), &tri));
    }

    #[test]
    fn large_triangle_containing_box_intersects() {
        let tri = Triangle::new(
            Point::new(-10.0, -10.0, 0.0),
            Point::new(10.0, -10.0, 0.0),
            Point::new(0.0, 10.0, 0.0),
        );
        assert!(intersection_test_aabb_triangle(&unit_box(), &tri));
    }

    #[test]
    fn touching_face_counts_as_intersecting() {
        // The triangle lies exactly on the x = 0.5 face of the box.
        let tri = Triangle::new(
            Point::new(0.5, -0.2, -0.2),
            Point::new(0.5, 0.2, -0.2),
            Point::new(0.5, 0.0, 0.2),
        );
        assert!(intersection_test_aabb_triangle(&unit_box(), &tri));
    }

    #[test]
    fn separated_by_face_normal() {
        let tri = Triangle::new(
            Point::new(0.6, -0.2, -0.2),
            Point::new(0.6, 0.2, -0.2),
            Point::new(0.6, 0.0, 0.2),
        );
        assert!(!intersection_test_aabb_triangle(&unit_box(), &tri));
    }

    #[test]
    fn separated_by_triangle_plane() {
        // The vertices straddle the box on every coordinate axis, but the
        // triangle plane x + y + z = 2.4 stays clear of the box corners.
        let tri = Triangle::new(
            Point::new(2.4, 0.0, 0.0),
            Point::new(0.0, 2.4, 0.0),
            Point::new(0.0, 0.0, 2.4),
        );
        assert!(!intersection_test_aabb_triangle(&unit_box(), &tri));
    }

    #[test]
    fn separated_by_edge_cross_product() {
        // A thin triangle in the z = 0 plane past the (+x, -y) corner: its
        // plane crosses the box and every coordinate interval overlaps, but
        // the Z x AB cross-product axis separates.
        let tri = Triangle::new(
            Point::new(0.7, -0.45, 0.0),
            Point::new(0.45, -0.7, 0.0),
            Point::new(1.5, -1.5, 0.0),
        );
        assert!(!intersection_test_aabb_triangle(&unit_box(), &tri));
    }

    #[test]
    fn degenerate_point_triangle() {
        let inside = Point::new(0.2, 0.2, 0.2);
        let outside = Point::new(0.7, 0.2, 0.2);
        let on_boundary = Point::new(0.5, 0.5, 0.5);

        let tri = |p| Triangle::new(p, p, p);
        assert!(intersection_test_aabb_triangle(&unit_box(), &tri(inside)));
        assert!(!intersection_test_aabb_triangle(&unit_box(), &tri(outside)));
        assert!(intersection_test_aabb_triangle(&unit_box(), &tri(on_boundary)));
    }
}
