use crate::models::{Quaternion, Vector3};

/// A triangle given by three vertices, either body-local or in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vector3; 3],
}

impl Triangle {
    pub fn new(a: Vector3, b: Vector3, c: Vector3) -> Self {
        Self { vertices: [a, b, c] }
    }

    /// Unit normal following the right-hand rule over `a → b → c`.
    ///
    /// Degenerate (zero-area) triangles produce a NaN normal.
    pub fn normal(&self) -> Vector3 {
        let [a, b, c] = self.vertices;
        (b - a).cross(&(c - a)).normalized()
    }

    pub fn centroid(&self) -> Vector3 {
        let [a, b, c] = self.vertices;
        (a + b + c) / 3.0
    }

    pub fn area(&self) -> f64 {
        let [a, b, c] = self.vertices;
        (b - a).cross(&(c - a)).magnitude() * 0.5
    }

    /// The three edges as `(start, end)` pairs.
    pub fn edges(&self) -> [(Vector3, Vector3); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }

    /// Transforms a body-local triangle into world space.
    ///
    /// # Example
    /// ```
    /// use rs_rigid_body::models::{Quaternion, Triangle, Vector3};
    ///
    /// let local = Triangle::new(Vector3::zero(), Vector3::unit_x(), Vector3::unit_y());
    /// let world = local.to_world(&Vector3::new(0.0, 0.0, 5.0), &Quaternion::identity());
    /// assert_eq!(world.vertices[1], Vector3::new(1.0, 0.0, 5.0));
    /// ```
    pub fn to_world(&self, position: &Vector3, orientation: &Quaternion) -> Triangle {
        let [a, b, c] = self.vertices;
        Triangle::new(
            orientation.rotate(&a, true) + *position,
            orientation.rotate(&b, true) + *position,
            orientation.rotate(&c, true) + *position,
        )
    }

    /// Whether a point lying on the triangle's plane is inside it (edges
    /// included, within `epsilon` in barycentric units).
    pub fn contains_point(&self, point: &Vector3, epsilon: f64) -> bool {
        let [a, b, c] = self.vertices;
        let v0 = c - a;
        let v1 = b - a;
        let v2 = *point - a;

        let dot00 = v0.dot(&v0);
        let dot01 = v0.dot(&v1);
        let dot02 = v0.dot(&v2);
        let dot11 = v1.dot(&v1);
        let dot12 = v1.dot(&v2);

        let inv_denom = 1.0 / (dot00 * dot11 - dot01 * dot01);
        let u = (dot11 * dot02 - dot01 * dot12) * inv_denom;
        let v = (dot00 * dot12 - dot01 * dot02) * inv_denom;

        u >= -epsilon && v >= -epsilon && u + v <= 1.0 + epsilon
    }

    /// Closest point on the triangle (interior, edge or vertex) to `point`.
    pub fn closest_point(&self, point: &Vector3) -> Vector3 {
        let [a, b, c] = self.vertices;
        let ab = b - a;
        let ac = c - a;

        // Vertex region A
        let ap = *point - a;
        let d1 = ab.dot(&ap);
        let d2 = ac.dot(&ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return a;
        }

        // Vertex region B
        let bp = *point - b;
        let d3 = ab.dot(&bp);
        let d4 = ac.dot(&bp);
        if d3 >= 0.0 && d4 <= d3 {
            return b;
        }

        // Edge region AB
        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = d1 / (d1 - d3);
            return a + ab * v;
        }

        // Vertex region C
        let cp = *point - c;
        let d5 = ab.dot(&cp);
        let d6 = ac.dot(&cp);
        if d6 >= 0.0 && d5 <= d6 {
            return c;
        }

        // Edge region AC
        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return a + ac * w;
        }

        // Edge region BC
        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return b + (c - b) * w;
        }

        // Interior: project onto the plane
        let denom = 1.0 / (va + vb + vc);
        let v = vb * denom;
        let w = vc * denom;
        a + ab * v + ac * w
    }
}
