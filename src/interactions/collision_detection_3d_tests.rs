use approx::assert_relative_eq;

use crate::assert_float_eq;
use crate::interactions::{
    line_plane, line_triangle, sphere_polygon, sphere_sphere, sphere_triangle, triangle_triangle, LineKind,
};
use crate::models::{PolygonTree, Triangle, Vector3};

fn floor_triangle() -> Triangle {
    Triangle::new(
        Vector3::new(-2.0, 0.0, -2.0),
        Vector3::new(0.0, 0.0, 2.0),
        Vector3::new(2.0, 0.0, -2.0),
    )
}

fn square_at(x: f64, size: f64) -> Vec<Triangle> {
    let (lo, hi) = (x - size, x + size);
    vec![
        Triangle::new(Vector3::new(lo, 0.0, -size), Vector3::new(lo, 0.0, size), Vector3::new(hi, 0.0, size)),
        Triangle::new(Vector3::new(lo, 0.0, -size), Vector3::new(hi, 0.0, size), Vector3::new(hi, 0.0, -size)),
    ]
}

#[test]
fn test_sphere_sphere_separated() {
    assert!(sphere_sphere(&Vector3::zero(), 1.0, &Vector3::new(0.0, 2.5, 0.0), 1.0).is_none());
}

#[test]
fn test_sphere_sphere_touching_counts() {
    let contact = sphere_sphere(&Vector3::zero(), 1.0, &Vector3::new(0.0, 0.0, 2.0), 1.0).unwrap();
    assert_float_eq(contact.penetration, 0.0, 1e-12, None);
    assert_relative_eq!(contact.point, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
}

#[test]
fn test_sphere_sphere_weighted_contact_point() {
    // Overlap of 1.0 shared 1:3 between radii 1 and 3
    let contact = sphere_sphere(&Vector3::zero(), 1.0, &Vector3::new(3.0, 0.0, 0.0), 3.0).unwrap();

    assert_float_eq(contact.penetration, 1.0, 1e-12, None);
    assert_relative_eq!(contact.normal, Vector3::unit_x(), epsilon = 1e-12);
    assert_relative_eq!(contact.point, Vector3::new(0.75, 0.0, 0.0), epsilon = 1e-12);
}

#[test]
fn test_sphere_sphere_symmetry() {
    let cases = [
        (Vector3::new(0.3, -0.2, 1.0), 0.7, Vector3::new(1.1, 0.4, 0.2), 1.3),
        (Vector3::new(-4.0, 0.0, 0.0), 1.0, Vector3::new(4.0, 0.0, 0.0), 1.0),
        (Vector3::new(1.0, 1.0, 1.0), 2.0, Vector3::new(1.5, 1.5, 1.5), 0.1),
    ];

    for (center_a, radius_a, center_b, radius_b) in cases {
        let forward = sphere_sphere(&center_a, radius_a, &center_b, radius_b);
        let backward = sphere_sphere(&center_b, radius_b, &center_a, radius_a);
        assert_eq!(forward.is_some(), backward.is_some());

        if let (Some(forward), Some(backward)) = (forward, backward) {
            assert_relative_eq!(forward.point, backward.point, epsilon = 1e-12);
            assert_relative_eq!(forward.normal, -backward.normal, epsilon = 1e-12);
            assert_float_eq(forward.penetration, backward.penetration, 1e-12, None);
        }
    }
}

#[test]
fn test_sphere_sphere_coincident_centres_have_no_normal() {
    let contact = sphere_sphere(&Vector3::zero(), 1.0, &Vector3::zero(), 1.0).unwrap();
    assert!(contact.normal.is_zero());
    assert_float_eq(contact.penetration, 2.0, 1e-12, None);
}

#[test]
fn test_sphere_triangle_face_contact() {
    let contact = sphere_triangle(&Vector3::new(0.0, 0.5, 0.0), 1.0, &floor_triangle()).unwrap();

    assert_relative_eq!(contact.point, Vector3::zero(), epsilon = 1e-12);
    assert_relative_eq!(contact.normal, Vector3::new(0.0, -1.0, 0.0), epsilon = 1e-12);
    assert_float_eq(contact.penetration, 0.5, 1e-12, None);
}

#[test]
fn test_sphere_triangle_clamps_to_edge_and_vertex() {
    let triangle = floor_triangle();

    // Beyond the back edge z = -2
    let edge = sphere_triangle(&Vector3::new(0.0, 0.0, -2.5), 1.0, &triangle).unwrap();
    assert_relative_eq!(edge.point, Vector3::new(0.0, 0.0, -2.0), epsilon = 1e-12);
    assert_relative_eq!(edge.normal, Vector3::unit_z(), epsilon = 1e-12);

    // Past the corner (2, 0, -2)
    let corner = sphere_triangle(&Vector3::new(2.3, 0.3, -2.3), 1.0, &triangle).unwrap();
    assert_relative_eq!(corner.point, Vector3::new(2.0, 0.0, -2.0), epsilon = 1e-12);

    assert!(sphere_triangle(&Vector3::new(4.0, 0.0, -4.0), 1.0, &triangle).is_none());
}

#[test]
fn test_sphere_triangle_centre_on_face_uses_face_normal() {
    let triangle = floor_triangle();
    let contact = sphere_triangle(&Vector3::zero(), 0.5, &triangle).unwrap();

    assert_relative_eq!(contact.normal, -triangle.normal(), epsilon = 1e-12);
    assert_float_eq(contact.penetration, 0.5, 1e-12, None);
}

#[test]
fn test_triangle_triangle_crossing() {
    let upright = Triangle::new(
        Vector3::new(0.0, -1.0, -1.0),
        Vector3::new(0.0, 1.0, -1.0),
        Vector3::new(0.0, 0.0, 1.0),
    );
    let points = triangle_triangle(&floor_triangle(), &upright);

    assert_eq!(points.len(), 2);
    let mut zs: Vec<f64> = points.iter().map(|p| p.z).collect();
    zs.sort_by(f64::total_cmp);
    assert_float_eq(zs[0], -1.0, 1e-9, None);
    assert_float_eq(zs[1], 1.0, 1e-9, None);
    assert!(points.iter().all(|p| p.x.abs() < 1e-9 && p.y.abs() < 1e-9));
}

#[test]
fn test_triangle_triangle_apart() {
    let lifted = Triangle::new(
        Vector3::new(0.0, 1.0, -1.0),
        Vector3::new(0.0, 3.0, -1.0),
        Vector3::new(0.0, 2.0, 1.0),
    );
    assert!(triangle_triangle(&floor_triangle(), &lifted).is_empty());
}

#[test]
fn test_sphere_polygon_flat_tree() {
    let tree = PolygonTree::from_triangles(square_at(0.0, 1.0));
    let collision = sphere_polygon(&Vector3::new(0.0, 0.5, 0.0), 1.0, &tree).unwrap();

    // The centre sits above the shared diagonal, so both faces touch
    assert_eq!(collision.contacts.len(), 2);
    assert_relative_eq!(collision.closest.point, Vector3::zero(), epsilon = 1e-12);

    assert!(sphere_polygon(&Vector3::new(0.0, 3.0, 0.0), 1.0, &tree).is_none());
}

#[test]
fn test_sphere_polygon_picks_closest_contact() {
    let mut tree = PolygonTree::new();
    tree.add_root(vec![Triangle::new(
        Vector3::new(-1.0, 0.0, -1.0),
        Vector3::new(-1.0, 0.0, 1.0),
        Vector3::new(1.0, 0.0, 0.0),
    )]);
    tree.add_root(vec![Triangle::new(
        Vector3::new(-1.0, 0.8, -1.0),
        Vector3::new(-1.0, 0.8, 1.0),
        Vector3::new(1.0, 0.8, 0.0),
    )]);

    let collision = sphere_polygon(&Vector3::new(0.0, 0.5, 0.0), 1.0, &tree).unwrap();
    assert_eq!(collision.contacts.len(), 2);
    assert_float_eq(collision.closest.point.y, 0.8, 1e-12, None);
}

#[test]
fn test_sphere_polygon_children_short_circuit_parent() {
    let mut tree = PolygonTree::new();
    let root = tree.add_root(square_at(0.0, 3.0));
    tree.add_child(root, square_at(-1.5, 0.5)).unwrap();
    tree.add_child(root, square_at(1.5, 0.5)).unwrap();

    // Over the left child: the parent's larger faces are not consulted
    let over_child = sphere_polygon(&Vector3::new(-1.5, 0.5, 0.0), 1.0, &tree).unwrap();
    assert!(over_child.contacts.iter().all(|c| c.point.x <= -1.0 + 1e-12));
    assert_eq!(over_child.contacts.len(), 2);

    // Away from both children the parent answers
    let over_parent = sphere_polygon(&Vector3::new(0.0, 0.5, 2.5), 1.0, &tree).unwrap();
    assert_relative_eq!(over_parent.closest.point, Vector3::new(0.0, 0.0, 2.5), epsilon = 1e-12);
}

#[test]
fn test_line_plane_kinds() {
    let origin = Vector3::new(0.0, 2.0, 0.0);
    let down = Vector3::new(0.0, -1.0, 0.0);
    let up = Vector3::unit_y();

    assert_eq!(line_plane(&origin, &down, &Vector3::zero(), &up, LineKind::Ray), Some(Vector3::zero()));
    assert_eq!(line_plane(&origin, &down, &Vector3::zero(), &up, LineKind::Segment), None);
    assert_eq!(line_plane(&origin, &(down * 2.0), &Vector3::zero(), &up, LineKind::Segment), Some(Vector3::zero()));
    assert_eq!(line_plane(&origin, &-down, &Vector3::zero(), &up, LineKind::Ray), None);
    assert_eq!(line_plane(&origin, &-down, &Vector3::zero(), &up, LineKind::Infinite), Some(Vector3::zero()));
}

#[test]
fn test_line_plane_parallel() {
    let hit = line_plane(&Vector3::unit_y(), &Vector3::unit_x(), &Vector3::zero(), &Vector3::unit_y(), LineKind::Infinite);
    assert_eq!(hit, None);
}

#[test]
fn test_line_triangle_miss_outside_face() {
    let hit = line_triangle(&Vector3::new(5.0, 1.0, 0.0), &Vector3::new(0.0, -1.0, 0.0), &floor_triangle(), LineKind::Ray);
    assert_eq!(hit, None);
}
