use crate::errors::PhysicsError;
use crate::models::Vector3;

/// Axis-aligned box that keeps a body's centre inside the simulated world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub lower: Vector3,
    pub upper: Vector3,
}

impl Boundary {
    /// Creates a boundary box, rejecting a lower corner above the upper one or
/// any NaN coordinate.
    ///
    /// # Example
    /// ```
    /// use rs_rigid_body::models::{Boundary, Vector3};
    ///
    /// let ok = Boundary::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));
    /// assert!(ok.is_ok());
    ///
    /// let inverted = Boundary::new(Vector3::new(1.0, 0.0, 0.0), Vector3::zero());
    /// assert!(inverted.is_err());
    /// ```
    pub fn new(lower: Vector3, upper: Vector3) -> Result<Self, PhysicsError> {
        let ordered = (0..3).all(|axis| lower.component(axis) <= upper.component(axis));
        if !ordered {
            return Err(PhysicsError::InvalidBoundary);
        }
        Ok(Self { lower, upper })
    }

    /// A box that never constrains anything.
    pub fn unbounded() -> Self {
        Self {
            lower: Vector3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            upper: Vector3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
        }
    }

    /// Cube of half-size `half_extent` centred on the origin.
    pub fn cube(half_extent: f64) -> Result<Self, PhysicsError> {
        Boundary::new(
            Vector3::new(-half_extent, -half_extent, -half_extent),
            Vector3::new(half_extent, half_extent, half_extent),
        )
    }

    pub fn contains(&self, point: &Vector3) -> bool {
        (0..3).all(|axis| {
            let value = point.component(axis);
            value >= self.lower.component(axis) && value <= self.upper.component(axis)
        })
    }
}

impl Default for Boundary {
    fn default() -> Self {
        Boundary::unbounded()
    }
}

/// What happens to the velocity component along an axis whose boundary the
/// body crossed. The position is clamped back onto the boundary either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryBehavior {
    /// The component flips sign (the body bounces off the wall).
    #[default]
    Reflect,
    /// The component is zeroed (the body comes to rest against the wall).
    Clamp,
}
