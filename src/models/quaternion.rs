use approx::{AbsDiffEq, RelativeEq};

use crate::models::{Matrix3, Vector3};

/// Quaternion representation for 3D rotations to avoid gimbal lock
///
/// Only unit quaternions describe rotations. Composing many small per-tick
/// rotations drifts off the unit hypersphere, so owners repair it with
/// [`Quaternion::become_unit_quaternion`] or the more thorough
/// [`Quaternion::become_orthonormalized`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Quaternion::identity()
    }
}

impl Quaternion {
    /// Creates a quaternion from its components, vector part first.
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Creates a new identity quaternion (no rotation)
    pub const fn identity() -> Self {
        Self {
            w: 1.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    pub fn is_identity(&self, epsilon: f64) -> bool {
        (self.w - 1.0).abs() < epsilon &&
            self.x.abs() < epsilon &&
            self.y.abs() < epsilon &&
            self.z.abs() < epsilon
    }

    /// Creates a quaternion from axis-angle representation
    ///
    /// `w = cos(radians / 2)` and the vector part is the normalized axis scaled
    /// by `sin(radians / 2)`. A (near) zero axis yields the identity.
    ///
    /// # Example
    /// ```
    /// use rs_rigid_body::models::{Quaternion, Vector3};
    /// use std::f64::consts::FRAC_PI_2;
    ///
    /// let q = Quaternion::from_axis_angle(&Vector3::unit_z(), FRAC_PI_2);
    /// let rotated = q.rotate(&Vector3::unit_x(), true);
    /// assert!((rotated.y - 1.0).abs() < 1e-12);
    /// ```
    pub fn from_axis_angle(axis: &Vector3, radians: f64) -> Self {
        let magnitude = axis.magnitude();
        if magnitude < 1e-10 {
            return Quaternion::identity();
        }

        let half_angle = radians / 2.0;
        let sin_half = half_angle.sin();

        Quaternion {
            w: half_angle.cos(),
            x: axis.x / magnitude * sin_half,
            y: axis.y / magnitude * sin_half,
            z: axis.z / magnitude * sin_half,
        }
    }

    /// Rotation by `|rotation|` radians around `rotation` (an axis-encoded
    /// angular displacement such as `angular_velocity * dt`).
    pub fn from_rotation_vector(rotation: &Vector3) -> Self {
        Quaternion::from_axis_angle(rotation, rotation.magnitude())
    }

    /// Returns the length/magnitude of the quaternion
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    pub fn magnitude_squared(&self) -> f64 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn is_unit(&self, epsilon: f64) -> bool {
        (self.magnitude() - 1.0).abs() <= epsilon
    }

    pub fn dot(&self, other: &Quaternion) -> f64 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Returns a normalized version of the quaternion
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag < 1e-10 {
            return Quaternion::identity();
        }
        Quaternion {
            w: self.w / mag,
            x: self.x / mag,
            y: self.y / mag,
            z: self.z / mag,
        }
    }

    /// Renormalizes in place.
    pub fn become_unit_quaternion(&mut self) {
        *self = self.normalized();
    }

    /// Overwrites all four components in place.
    pub fn store_new_values(&mut self, x: f64, y: f64, z: f64, w: f64) {
        self.x = x;
        self.y = y;
        self.z = z;
        self.w = w;
    }

    /// Multiplies two quaternions (composition of rotations)
    ///
    /// `a.multiply(&b)` applies `b` first and then `a`.
    pub fn multiply(&self, other: &Quaternion) -> Quaternion {
        Quaternion {
            w: self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
            x: self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            y: self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            z: self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
        }
    }

    /// Returns the conjugate of the quaternion
    pub fn conjugate(&self) -> Quaternion {
        Quaternion {
            w: self.w,
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }

    /// Returns the inverse of the quaternion
    pub fn inverse(&self) -> Quaternion {
        let mag_squared = self.magnitude_squared();
        if mag_squared < 1e-10 {
            return Quaternion::identity();
        }

        let conj = self.conjugate();
        Quaternion {
            w: conj.w / mag_squared,
            x: conj.x / mag_squared,
            y: conj.y / mag_squared,
            z: conj.z / mag_squared,
        }
    }

    /// Rotates a vector: `q * (0, v) * q⁻¹`.
    ///
    /// With `is_unit` the conjugate stands in for the inverse. Passing a
    /// non-unit quaternion with `is_unit == true` silently scales the result.
    pub fn rotate(&self, vector: &Vector3, is_unit: bool) -> Vector3 {
        let inverse = if is_unit { self.conjugate() } else { self.inverse() };
        self.sandwich(vector, &inverse)
    }

    /// Applies the opposite rotation: `q⁻¹ * (0, v) * q`.
    pub fn rotate_reverse(&self, vector: &Vector3, is_unit: bool) -> Vector3 {
        let inverse = if is_unit { self.conjugate() } else { self.inverse() };
        inverse.sandwich(vector, self)
    }

    fn sandwich(&self, vector: &Vector3, right: &Quaternion) -> Vector3 {
        // Convert the vector to a quaternion with w=0
        let p = Quaternion {
            w: 0.0,
            x: vector.x,
            y: vector.y,
            z: vector.z,
        };

        let rotated = self.multiply(&p).multiply(right);
        Vector3::new(rotated.x, rotated.y, rotated.z)
    }

    /// Rotation axis (unit length) or `+x` for the identity.
    pub fn axis(&self) -> Vector3 {
        let sin_half = (1.0 - self.w * self.w).max(0.0).sqrt();
        if sin_half < 1e-10 {
            return Vector3::unit_x();
        }
        Vector3::new(self.x / sin_half, self.y / sin_half, self.z / sin_half)
    }

    /// Rotation angle in radians, in [0, 2π].
    pub fn angle(&self) -> f64 {
        2.0 * self.w.clamp(-1.0, 1.0).acos()
    }

    /// Derives the shortest-arc rotation that carries `reference` onto the
    /// direction of `target`.
    ///
    /// Used by drag-to-rotate style interaction, so it favours clarity over
    /// speed. Anti-parallel inputs rotate half a turn around any perpendicular
    /// axis.
    ///
    /// # Example
    /// ```
    /// use rs_rigid_body::models::{Quaternion, Vector3};
    ///
    /// let q = Quaternion::get_angle_around_axis(&Vector3::unit_x(), &Vector3::new(0.0, 3.0, 0.0));
    /// let rotated = q.rotate(&Vector3::unit_x(), true);
    /// assert!((rotated.y - 1.0).abs() < 1e-12);
    /// ```
    pub fn get_angle_around_axis(reference: &Vector3, target: &Vector3) -> Quaternion {
        let axis = reference.cross(target);
        let radians = reference.angle_between(target);

        if axis.is_nearly_zero(1e-12) {
            if radians < std::f64::consts::FRAC_PI_2 {
                return Quaternion::identity();
            }
            return Quaternion::from_axis_angle(&reference.any_orthogonal(), std::f64::consts::PI);
        }

        Quaternion::from_axis_angle(&axis, radians)
    }

    /// Rotation matrix (row-major, acts on column vectors).
    ///
    /// Uses the homogeneous form, so a non-unit quaternion yields the same
    /// rotation scaled by `|q|²`.
    pub fn to_matrix(&self) -> Matrix3 {
        let (w, x, y, z) = (self.w, self.x, self.y, self.z);
        let (ww, xx, yy, zz) = (w * w, x * x, y * y, z * z);

        Matrix3::from_rows([
            [ww + xx - yy - zz, 2.0 * (x * y - z * w), 2.0 * (x * z + y * w)],
            [2.0 * (x * y + z * w), ww - xx + yy - zz, 2.0 * (y * z - x * w)],
            [2.0 * (x * z - y * w), 2.0 * (y * z + x * w), ww - xx - yy + zz],
        ])
    }

    /// Converts a rotation matrix back into a quaternion.
    pub fn from_matrix(matrix: &Matrix3) -> Quaternion {
        let m = &matrix.m;
        let trace = m[0][0] + m[1][1] + m[2][2];

        if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Quaternion {
                w: 0.25 * s,
                x: (m[2][1] - m[1][2]) / s,
                y: (m[0][2] - m[2][0]) / s,
                z: (m[1][0] - m[0][1]) / s,
            }
        } else if m[0][0] > m[1][1] && m[0][0] > m[2][2] {
            let s = (1.0 + m[0][0] - m[1][1] - m[2][2]).sqrt() * 2.0;
            Quaternion {
                w: (m[2][1] - m[1][2]) / s,
                x: 0.25 * s,
                y: (m[0][1] + m[1][0]) / s,
                z: (m[0][2] + m[2][0]) / s,
            }
        } else if m[1][1] > m[2][2] {
            let s = (1.0 + m[1][1] - m[0][0] - m[2][2]).sqrt() * 2.0;
            Quaternion {
                w: (m[0][2] - m[2][0]) / s,
                x: (m[0][1] + m[1][0]) / s,
                y: 0.25 * s,
                z: (m[1][2] + m[2][1]) / s,
            }
        } else {
            let s = (1.0 + m[2][2] - m[0][0] - m[1][1]).sqrt() * 2.0;
            Quaternion {
                w: (m[1][0] - m[0][1]) / s,
                x: (m[0][2] + m[2][0]) / s,
                y: (m[1][2] + m[2][1]) / s,
                z: 0.25 * s,
            }
        }
    }

    /// Repairs drift through a matrix round trip: quaternion → matrix →
    /// Gram-Schmidt → quaternion. Costlier than
    /// [`Quaternion::become_unit_quaternion`] but also removes skew.
    ///
    /// # Example
    /// ```
    /// use rs_rigid_body::models::{Quaternion, Vector3};
    ///
    /// let mut q = Quaternion::from_axis_angle(&Vector3::unit_y(), 0.5);
    /// q.store_new_values(q.x * 1.1, q.y * 1.1, q.z * 1.1, q.w * 1.1);
    /// q.become_orthonormalized();
    /// assert!(q.is_unit(1e-12));
    /// assert!((q.angle() - 0.5).abs() < 1e-12);
    /// ```
    pub fn become_orthonormalized(&mut self) {
        let mut matrix = self.to_matrix();
        matrix.orthonormalize();

        let mut repaired = Quaternion::from_matrix(&matrix).normalized();
        // q and -q are the same rotation; keep the sign continuous
        if repaired.dot(self) < 0.0 {
            repaired = Quaternion {
                w: -repaired.w,
                x: -repaired.x,
                y: -repaired.y,
                z: -repaired.z,
            };
        }
        *self = repaired;
    }
}

impl AbsDiffEq for Quaternion {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.w.abs_diff_eq(&other.w, epsilon)
            && self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl RelativeEq for Quaternion {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.w.relative_eq(&other.w, epsilon, max_relative)
            && self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}
