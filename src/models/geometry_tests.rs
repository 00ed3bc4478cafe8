use approx::assert_relative_eq;

use crate::assert_float_eq;
use crate::errors::PhysicsError;
use crate::models::{Boundary, PointMass, PolygonTree, Quaternion, Triangle, Vector3};
use std::f64::consts::FRAC_PI_2;

fn unit_right_triangle() -> Triangle {
    Triangle::new(Vector3::zero(), Vector3::unit_x(), Vector3::unit_y())
}

#[test]
fn test_triangle_basic_measures() {
    let triangle = unit_right_triangle();

    assert_eq!(triangle.normal(), Vector3::unit_z());
    assert_float_eq(triangle.area(), 0.5, 1e-12, None);
    assert_relative_eq!(triangle.centroid(), Vector3::new(1.0 / 3.0, 1.0 / 3.0, 0.0), epsilon = 1e-12);
    assert_eq!(triangle.edges()[1], (Vector3::unit_x(), Vector3::unit_y()));
}

#[test]
fn test_degenerate_triangle_has_nan_normal() {
    let sliver = Triangle::new(Vector3::zero(), Vector3::unit_x(), Vector3::new(2.0, 0.0, 0.0));
    assert!(!sliver.normal().is_finite());
    assert_eq!(sliver.area(), 0.0);
}

#[test]
fn test_triangle_contains_point() {
    let triangle = unit_right_triangle();

    assert!(triangle.contains_point(&Vector3::new(0.25, 0.25, 0.0), 1e-9));
    assert!(triangle.contains_point(&Vector3::new(0.5, 0.5, 0.0), 1e-9), "Edges are included");
    assert!(!triangle.contains_point(&Vector3::new(0.6, 0.6, 0.0), 1e-9));
    assert!(!triangle.contains_point(&Vector3::new(-0.1, 0.5, 0.0), 1e-9));
}

#[test]
fn test_triangle_closest_point_regions() {
    let triangle = unit_right_triangle();

    // Interior projection
    assert_relative_eq!(triangle.closest_point(&Vector3::new(0.2, 0.3, 5.0)), Vector3::new(0.2, 0.3, 0.0), epsilon = 1e-12);
    // Vertex regions
    assert_eq!(triangle.closest_point(&Vector3::new(-1.0, -1.0, 0.0)), Vector3::zero());
    assert_eq!(triangle.closest_point(&Vector3::new(2.0, -0.5, 0.0)), Vector3::unit_x());
    assert_eq!(triangle.closest_point(&Vector3::new(-0.5, 2.0, 1.0)), Vector3::unit_y());
    // Edge regions
    assert_relative_eq!(triangle.closest_point(&Vector3::new(0.5, -1.0, 0.0)), Vector3::new(0.5, 0.0, 0.0), epsilon = 1e-12);
    assert_relative_eq!(triangle.closest_point(&Vector3::new(-1.0, 0.5, 0.0)), Vector3::new(0.0, 0.5, 0.0), epsilon = 1e-12);
    assert_relative_eq!(triangle.closest_point(&Vector3::new(1.0, 1.0, 0.0)), Vector3::new(0.5, 0.5, 0.0), epsilon = 1e-12);
}

#[test]
fn test_triangle_to_world() {
    let orientation = Quaternion::from_axis_angle(&Vector3::unit_z(), FRAC_PI_2);
    let world = unit_right_triangle().to_world(&Vector3::new(0.0, 0.0, 1.0), &orientation);

    assert_relative_eq!(world.vertices[1], Vector3::new(0.0, 1.0, 1.0), epsilon = 1e-12);
    assert_relative_eq!(world.vertices[2], Vector3::new(-1.0, 0.0, 1.0), epsilon = 1e-12);
}

#[test]
fn test_polygon_tree_structure() {
    let mut tree = PolygonTree::new();
    assert!(tree.is_empty());

    let root = tree.add_root(vec![unit_right_triangle()]);
    let child = tree.add_child(root, vec![unit_right_triangle(), unit_right_triangle()]).unwrap();
    tree.add_child(child, Vec::new()).unwrap();

    assert_eq!(tree.len(), 3);
    assert_eq!(tree.triangle_count(), 3);
    assert_eq!(tree.roots(), &[root]);
    assert!(tree.node(root).unwrap().has_children());
    assert_eq!(tree.add_child(7, Vec::new()), Err(PhysicsError::IndexOutOfBounds(7)));
}

#[test]
fn test_polygon_bounds_enclose_descendants() {
    let far = Triangle::new(
        Vector3::new(10.0, 0.0, 0.0),
        Vector3::new(11.0, 0.0, 0.0),
        Vector3::new(10.0, 1.0, 0.0),
    );
    let mut tree = PolygonTree::new();
    let root = tree.add_root(vec![unit_right_triangle()]);
    tree.add_child(root, vec![far]).unwrap();

    let node = tree.node(root).unwrap();
    for vertex in far.vertices.iter().chain(unit_right_triangle().vertices.iter()) {
        assert!(vertex.distance(&node.bounding_center) <= node.bounding_radius + 1e-12);
    }
}

#[test]
fn test_insertions_keep_ancestor_bounds_current() {
    let shifted = |dx: f64| {
        Triangle::new(
            Vector3::new(dx, 0.0, 0.0),
            Vector3::new(dx + 1.0, 0.0, 0.0),
            Vector3::new(dx, 1.0, 0.0),
        )
    };
    let mut tree = PolygonTree::new();
    let root = tree.add_root(vec![shifted(0.0)]);
    let other_root = tree.add_root(vec![shifted(-20.0)]);
    let untouched = tree.node(other_root).unwrap().clone();

    let child = tree.add_child(root, vec![shifted(5.0)]).unwrap();
    let grandchild = tree.add_child(child, vec![shifted(30.0)]).unwrap();

    assert_eq!(tree.node(grandchild).unwrap().parent, Some(child));
    assert_eq!(tree.node(root).unwrap().parent, None);
    assert_eq!(tree.node(other_root).unwrap(), &untouched);

    let root_node = tree.node(root).unwrap();
    assert!(Vector3::new(31.0, 0.0, 0.0).distance(&root_node.bounding_center) <= root_node.bounding_radius + 1e-12);

    let mut rebuilt = tree.clone();
    rebuilt.recompute_bounds();
    assert_eq!(rebuilt, tree);
}

#[test]
fn test_polygon_to_world_moves_bounds() {
    let tree = PolygonTree::from_triangles(vec![unit_right_triangle()]);
    let moved = tree.to_world(&Vector3::new(5.0, 0.0, 0.0), &Quaternion::identity());

    let before = tree.node(0).unwrap();
    let after = moved.node(0).unwrap();
    assert_relative_eq!(after.bounding_center, before.bounding_center + Vector3::new(5.0, 0.0, 0.0), epsilon = 1e-12);
    assert_float_eq(after.bounding_radius, before.bounding_radius, 1e-12, None);
}

#[test]
fn test_boundary() {
    let boundary = Boundary::cube(2.0).unwrap();
    assert!(boundary.contains(&Vector3::new(2.0, -2.0, 0.0)));
    assert!(!boundary.contains(&Vector3::new(2.1, 0.0, 0.0)));
    assert!(Boundary::default().contains(&Vector3::new(1e300, -1e300, 0.0)));
    assert_eq!(Boundary::cube(-1.0), Err(PhysicsError::InvalidBoundary));
    assert_eq!(Boundary::cube(f64::NAN), Err(PhysicsError::InvalidBoundary));
    assert_eq!(
        Boundary::new(Vector3::new(0.0, f64::NAN, 0.0), Vector3::new(1.0, 1.0, 1.0)),
        Err(PhysicsError::InvalidBoundary)
    );
}

#[test]
fn test_point_mass_reach() {
    let point = PointMass::new(Vector3::new(3.0, 4.0, 0.0), 0.5);
    assert_eq!(point.radius(), 0.5);
    assert_float_eq(point.reach(), 5.5, 1e-12, None);
}
