use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use approx::{AbsDiffEq, RelativeEq};
use rand::Rng;

use crate::models::{FromCoordinates, Quaternion, ToCoordinates};

/// A 3-component vector used for positions, velocities, forces and axes.
///
/// `Vector3` is `Copy`, so every operator returns a new value. Only
/// `normalize`, `scale` and `rotate_around_axis` mutate the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    /// Creates a new vector from its components.
    ///
    /// # Example
    /// ```
    /// use rs_rigid_body::models::Vector3;
    ///
    /// let v = Vector3::new(1.0, 2.0, 3.0);
    /// assert_eq!(v.y, 2.0);
    /// ```
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub const fn unit_x() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    pub const fn unit_y() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    pub const fn unit_z() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    /// Returns `true` only when every component is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    pub fn is_nearly_zero(&self, epsilon: f64) -> bool {
        self.magnitude_squared() <= epsilon * epsilon
    }

    pub fn dot(&self, other: &Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Calculates the cross product `self × other`.
    ///
    /// # Example
    /// ```
    /// use rs_rigid_body::models::Vector3;
    ///
    /// let z = Vector3::unit_x().cross(&Vector3::unit_y());
    /// assert_eq!(z, Vector3::unit_z());
    /// ```
    pub fn cross(&self, other: &Vector3) -> Vector3 {
        Vector3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Normalizes the vector in place.
    ///
    /// A zero-length vector is not guarded against: its components become NaN.
    /// Check [`Vector3::is_zero`] first when the input can be degenerate.
    pub fn normalize(&mut self) {
        let magnitude = self.magnitude();
        self.x /= magnitude;
        self.y /= magnitude;
        self.z /= magnitude;
    }

    /// Returns a normalized copy. Same zero-length caveat as [`Vector3::normalize`].
    pub fn normalized(&self) -> Vector3 {
        let mut result = *self;
        result.normalize();
        result
    }

    /// Multiplies every component in place.
    pub fn scale(&mut self, factor: f64) {
        self.x *= factor;
        self.y *= factor;
        self.z *= factor;
    }

    pub fn divide(&self, divisor: f64) -> Vector3 {
        Vector3::new(self.x / divisor, self.y / divisor, self.z / divisor)
    }

    pub fn distance(&self, other: &Vector3) -> f64 {
        (*other - *self).magnitude()
    }

    pub fn distance_squared(&self, other: &Vector3) -> f64 {
        (*other - *self).magnitude_squared()
    }

    /// Angle in radians between two vectors, in [0, π].
    ///
    /// # Example
    /// ```
    /// use rs_rigid_body::models::Vector3;
    /// use std::f64::consts::FRAC_PI_2;
    ///
    /// let angle = Vector3::unit_x().angle_between(&Vector3::unit_z());
    /// assert!((angle - FRAC_PI_2).abs() < 1e-12);
    /// ```
    pub fn angle_between(&self, other: &Vector3) -> f64 {
        let cosine = self.dot(other) / (self.magnitude() * other.magnitude());
        // Rounding can push the cosine just past ±1
        cosine.clamp(-1.0, 1.0).acos()
    }

    /// Component of `self` parallel to `onto`.
    pub fn project_onto(&self, onto: &Vector3) -> Vector3 {
        *onto * (self.dot(onto) / onto.magnitude_squared())
    }

    /// Component of `self` perpendicular to the unit vector `normal`.
    pub fn reject_from_unit(&self, normal: &Vector3) -> Vector3 {
        *self - *normal * self.dot(normal)
    }

    /// Rotates the vector in place around `axis` by `radians` (right-handed).
    pub fn rotate_around_axis(&mut self, axis: &Vector3, radians: f64) {
        let rotated = Quaternion::from_axis_angle(axis, radians).rotate(self, true);
        *self = rotated;
    }

    /// Any unit vector perpendicular to `self`.
    pub fn any_orthogonal(&self) -> Vector3 {
        let helper = if self.x.abs() < 0.9 { Vector3::unit_x() } else { Vector3::unit_y() };
        self.cross(&helper).normalized()
    }

    /// Draws a uniformly distributed unit vector from `rng`.
    pub fn random_unit<R: Rng>(rng: &mut R) -> Vector3 {
        loop {
            let candidate = Vector3::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            );
            let length_squared = candidate.magnitude_squared();
            if length_squared > 1e-6 && length_squared <= 1.0 {
                return candidate / length_squared.sqrt();
            }
        }
    }

    pub fn component(&self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    pub fn component_mut(&mut self, axis: usize) -> &mut f64 {
        match axis {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => &mut self.z,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl FromCoordinates<(f64, f64, f64)> for Vector3 {
    fn from_coord(position: (f64, f64, f64)) -> Self {
        Vector3::new(position.0, position.1, position.2)
    }
}

impl ToCoordinates<(f64, f64, f64)> for Vector3 {
    fn to_coord(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }
}

impl From<(f64, f64, f64)> for Vector3 {
    fn from(value: (f64, f64, f64)) -> Self {
        Vector3::from_coord(value)
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Vector3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, rhs: Vector3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: f64) -> Vector3 {
        Vector3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vector3> for f64 {
    type Output = Vector3;

    fn mul(self, rhs: Vector3) -> Vector3 {
        rhs * self
    }
}

impl MulAssign<f64> for Vector3 {
    fn mul_assign(&mut self, rhs: f64) {
        self.scale(rhs);
    }
}

impl Div<f64> for Vector3 {
    type Output = Vector3;

    fn div(self, rhs: f64) -> Vector3 {
        self.divide(rhs)
    }
}

impl DivAssign<f64> for Vector3 {
    fn div_assign(&mut self, rhs: f64) {
        *self = self.divide(rhs);
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl AbsDiffEq for Vector3 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl RelativeEq for Vector3 {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}

/// A pair of orthogonal unit vectors describing which way a body faces.
///
/// `standard` is the forward direction and `orthogonal` is an "up"-like
/// reference that pins the roll around `standard`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleVector {
    pub standard: Vector3,
    pub orthogonal: Vector3,
}

impl DoubleVector {
    pub fn new(standard: Vector3, orthogonal: Vector3) -> Self {
        Self { standard, orthogonal }
    }

    /// Both vectors rotated by `orientation`.
    pub fn rotated(&self, orientation: &Quaternion) -> DoubleVector {
        DoubleVector {
            standard: orientation.rotate(&self.standard, true),
            orthogonal: orientation.rotate(&self.orthogonal, true),
        }
    }
}

impl Default for DoubleVector {
    /// Facing +x with +y as the orthogonal reference.
    fn default() -> Self {
        Self::new(Vector3::unit_x(), Vector3::unit_y())
    }
}
