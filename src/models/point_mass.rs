use crate::models::Vector3;

/// A body-local offset carrying a scalar mass.
///
/// By convention the mass doubles as the point's radius when sizing the
/// owning body's bounding sphere and when treating the point as a small solid
/// sphere for inertia.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMass {
    pub offset: Vector3,
    pub mass: f64,
}

impl PointMass {
    pub fn new(offset: Vector3, mass: f64) -> Self {
        Self { offset, mass }
    }

    /// Radius of the point, equal to its mass.
    pub fn radius(&self) -> f64 {
        self.mass
    }

    /// Distance from the body origin to the far side of this point.
    pub fn reach(&self) -> f64 {
        self.offset.magnitude() + self.radius()
    }
}
