use crate::models::{PolygonTree, Triangle, Vector3};
use crate::utils::GEOMETRY_EPSILON;

/// A single narrow-phase contact.
///
/// `normal` points from the first shape towards the second. A zero normal
/// means the direction is undefined (coincident sphere centres); the resolver
/// substitutes a random direction in that case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionContact {
    pub point: Vector3,
    pub normal: Vector3,
    pub penetration: f64,
}

/// Every contact a sphere makes with a polygon tree, plus the one closest to
/// the sphere centre which is used for resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonCollision {
    pub contacts: Vec<CollisionContact>,
    pub closest: CollisionContact,
}

/// How far a line extends from its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Unbounded in both directions.
    Infinite,
    /// Starts at the origin and extends along the direction.
    Ray,
    /// From the origin to `origin + direction`.
    Segment,
}

impl LineKind {
    fn accepts(&self, t: f64) -> bool {
        match self {
            LineKind::Infinite => true,
            LineKind::Ray => t >= -GEOMETRY_EPSILON,
            LineKind::Segment => t >= -GEOMETRY_EPSILON && t <= 1.0 + GEOMETRY_EPSILON,
        }
    }
}

/// Tests two spheres for overlap.
///
/// Touching spheres (distance exactly `radius_a + radius_b`) count as
/// colliding. The contact point sits on the line between the centres, inside
/// the overlap region at the radius-weighted share of the penetration depth.
///
/// # Arguments
/// * `center_a`, `radius_a` - The first sphere.
/// * `center_b`, `radius_b` - The second sphere.
///
/// # Returns
/// `Some(contact)` with the normal pointing from `a` to `b`, or `None`.
///
/// # Example
/// ```
/// use rs_rigid_body::interactions::sphere_sphere;
/// use rs_rigid_body::models::Vector3;
///
/// let contact = sphere_sphere(&Vector3::zero(), 1.0, &Vector3::new(1.5, 0.0, 0.0), 1.0).unwrap();
/// assert_eq!(contact.normal, Vector3::unit_x());
/// assert!((contact.penetration - 0.5).abs() < 1e-12);
/// assert!((contact.point.x - 0.75).abs() < 1e-12);
///
/// assert!(sphere_sphere(&Vector3::zero(), 1.0, &Vector3::new(3.0, 0.0, 0.0), 1.0).is_none());
/// ```
pub fn sphere_sphere(center_a: &Vector3, radius_a: f64, center_b: &Vector3, radius_b: f64) -> Option<CollisionContact> {
    let delta = *center_b - *center_a;
    let combined_radius = radius_a + radius_b;
    let distance_squared = delta.magnitude_squared();

    if distance_squared > combined_radius * combined_radius {
        return None;
    }

    let distance = distance_squared.sqrt();
    let penetration = combined_radius - distance;
    let normal = if distance == 0.0 { Vector3::zero() } else { delta / distance };
    let reach = radius_a - penetration * radius_a / combined_radius;

    Some(CollisionContact {
        point: *center_a + normal * reach,
        normal,
        penetration,
    })
}

/// Tests a sphere against a world-space triangle.
///
/// The contact point is the closest point on the triangle (interior, edge or
/// vertex). The normal points from the sphere centre to that point. A centre
/// lying exactly on the triangle uses the reversed face normal.
pub fn sphere_triangle(center: &Vector3, radius: f64, triangle: &Triangle) -> Option<CollisionContact> {
    let closest = triangle.closest_point(center);
    let delta = closest - *center;
    let distance_squared = delta.magnitude_squared();

    if distance_squared > radius * radius {
        return None;
    }

    let distance = distance_squared.sqrt();
    let normal = if distance <= GEOMETRY_EPSILON {
        -triangle.normal()
    } else {
        delta / distance
    };

    Some(CollisionContact {
        point: closest,
        normal,
        penetration: radius - distance,
    })
}

/// Collects the points where two triangles cut each other.
///
/// Edges of each triangle are tested as segments against the other. When the
/// triangles cross properly this yields the two endpoints of the intersection
/// segment. Coplanar pairs are not treated specially and give no reliable
/// answer.
///
/// # Example
/// ```
/// use rs_rigid_body::interactions::triangle_triangle;
/// use rs_rigid_body::models::{Triangle, Vector3};
///
/// let flat = Triangle::new(
///     Vector3::new(-2.0, 0.0, -2.0),
///     Vector3::new(2.0, 0.0, -2.0),
///     Vector3::new(0.0, 0.0, 2.0),
/// );
/// let upright = Triangle::new(
///     Vector3::new(0.0, -1.0, -1.0),
///     Vector3::new(0.0, 1.0, -1.0),
///     Vector3::new(0.0, 0.0, 1.0),
/// );
/// assert_eq!(triangle_triangle(&flat, &upright).len(), 2);
/// ```
pub fn triangle_triangle(first: &Triangle, second: &Triangle) -> Vec<Vector3> {
    let mut points: Vec<Vector3> = Vec::with_capacity(2);

    let crossings = first
        .edges()
        .into_iter()
        .filter_map(|(start, end)| line_triangle(&start, &(end - start), second, LineKind::Segment))
        .chain(
            second
                .edges()
                .into_iter()
                .filter_map(|(start, end)| line_triangle(&start, &(end - start), first, LineKind::Segment)),
        );

    for point in crossings {
        // A crossing at a shared vertex is reported by both adjoining edges
        if !points.iter().any(|known| known.distance(&point) <= GEOMETRY_EPSILON) {
            points.push(point);
        }
    }
    points
}

/// Tests a sphere against every face of a polygon tree.
///
/// Nodes whose bounding sphere the sphere cannot reach are skipped with
/// their whole subtree. Children are tested before their parent, and a
/// parent's own faces are only tested when none of its children reported
/// contact.
///
/// # Returns
/// All contacts plus the closest to `center`, or `None` when nothing touches.
pub fn sphere_polygon(center: &Vector3, radius: f64, polygon: &PolygonTree) -> Option<PolygonCollision> {
    let contacts: Vec<CollisionContact> = polygon
        .roots()
        .iter()
        .flat_map(|&root| sphere_polygon_node(center, radius, polygon, root))
        .collect();

    let closest = contacts
        .iter()
        .copied()
        .reduce(|best, contact| {
            if contact.point.distance_squared(center) < best.point.distance_squared(center) {
                contact
            } else {
                best
            }
        })?;

    Some(PolygonCollision { contacts, closest })
}

fn sphere_polygon_node(center: &Vector3, radius: f64, polygon: &PolygonTree, index: usize) -> Vec<CollisionContact> {
    let Some(node) = polygon.node(index) else {
        return Vec::new();
    };

    if center.distance(&node.bounding_center) > radius + node.bounding_radius {
        return Vec::new();
    }

    let from_children: Vec<CollisionContact> = node
        .children
        .iter()
        .flat_map(|&child| sphere_polygon_node(center, radius, polygon, child))
        .collect();
    if !from_children.is_empty() {
        return from_children;
    }

    node.triangles
        .iter()
        .filter_map(|triangle| sphere_triangle(center, radius, triangle))
        .collect()
}

/// Intersects a line with a plane.
///
/// # Arguments
/// * `origin` - Start of the line.
/// * `direction` - Direction; for [`LineKind::Segment`] also the length.
/// * `plane_point` - Any point on the plane.
/// * `plane_normal` - The plane normal (need not be unit length).
/// * `kind` - How far the line extends.
///
/// # Returns
/// The intersection point, or `None` for a parallel line or a hit outside
/// the line's extent.
pub fn line_plane(
    origin: &Vector3,
    direction: &Vector3,
    plane_point: &Vector3,
    plane_normal: &Vector3,
    kind: LineKind,
) -> Option<Vector3> {
    let denominator = plane_normal.dot(direction);
    if denominator.abs() <= GEOMETRY_EPSILON * direction.magnitude() * plane_normal.magnitude() {
        return None;
    }

    let t = plane_normal.dot(&(*plane_point - *origin)) / denominator;
    if !kind.accepts(t) {
        return None;
    }
    Some(*origin + *direction * t)
}

/// Intersects a line with a triangle (edges included).
///
/// # Example
/// ```
/// use rs_rigid_body::interactions::{line_triangle, LineKind};
/// use rs_rigid_body::models::{Triangle, Vector3};
///
/// let floor = Triangle::new(
///     Vector3::new(-1.0, 0.0, -1.0),
///     Vector3::new(1.0, 0.0, -1.0),
///     Vector3::new(0.0, 0.0, 1.0),
/// );
/// let down = Vector3::new(0.0, -1.0, 0.0);
///
/// let hit = line_triangle(&Vector3::new(0.0, 5.0, 0.0), &down, &floor, LineKind::Ray);
/// assert_eq!(hit, Some(Vector3::zero()));
///
/// let short = line_triangle(&Vector3::new(0.0, 5.0, 0.0), &down, &floor, LineKind::Segment);
/// assert_eq!(short, None);
/// ```
pub fn line_triangle(origin: &Vector3, direction: &Vector3, triangle: &Triangle, kind: LineKind) -> Option<Vector3> {
    let [a, b, c] = triangle.vertices;
    let plane_normal = (b - a).cross(&(c - a));

    let hit = line_plane(origin, direction, &a, &plane_normal, kind)?;
    if triangle.contains_point(&hit, GEOMETRY_EPSILON) {
        Some(hit)
    } else {
        None
    }
}
