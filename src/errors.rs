use std::fmt;
use std::error::Error;

/// Represents errors that can occur while building or configuring a simulation.
///
/// Per-tick physics never returns these: degenerate numeric input inside the
/// integration and collision paths propagates as NaN instead.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Indicates an invalid mass value (e.g., negative mass).
    InvalidMass,
    /// Indicates an invalid radius value (e.g., zero or negative radius).
    InvalidRadius,
    /// Indicates an invalid time value (e.g., negative time step).
    InvalidTime,
    /// Indicates a coefficient outside of [0, 1] (elasticity, friction).
    InvalidCoefficient,
    /// Indicates a boundary box whose lower corner exceeds its upper corner.
    InvalidBoundary,
    /// A configuration value outside of its accepted range.
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    /// Point masses can only be added to composite (rigid) bodies.
    NotComposite,
    /// Indicates a body or polygon node index that does not exist.
    IndexOutOfBounds(usize),
    /// A general error for calculations that produce invalid results.
    CalculationError(String),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PhysicsError::InvalidMass => write!(f, "Invalid mass value"),
            PhysicsError::InvalidRadius => write!(f, "Invalid radius value"),
            PhysicsError::InvalidTime => write!(f, "Invalid time value"),
            PhysicsError::InvalidCoefficient => write!(f, "Invalid coefficient value"),
            PhysicsError::InvalidBoundary => write!(f, "Boundary lower corner must not exceed the upper corner"),
            PhysicsError::OutOfRange { name, value, min, max } => {
                write!(f, "{} = {} is outside of [{}, {}]", name, value, min, max)
            }
            PhysicsError::NotComposite => write!(f, "Point masses can only be added to a rigid body"),
            PhysicsError::IndexOutOfBounds(index) => write!(f, "Index {} is out of bounds", index),
            PhysicsError::CalculationError(msg) => write!(f, "Calculation error: {}", msg),
        }
    }
}

impl Error for PhysicsError {}
