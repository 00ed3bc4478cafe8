use crate::models::Vector3;
use crate::utils;

pub const DEFAULT_SIMULATION_CONSTANTS: utils::SimulationConstants = utils::SimulationConstants {
    gravity: Vector3::new(0.0, -9.80665, 0.0),
    elasticity: 0.75,
    kinetic_friction: 0.3,
    static_friction: 0.5,
};

pub const DEFAULT_COLLISION_SETTINGS: utils::CollisionSettings = utils::CollisionSettings {
    penetration_threshold_percent: 0.0,
    pull_apart_instant_percent: 1.0,
    pull_apart_spring_velocity: 2.0,
    pull_apart_mode: utils::PullApartMode::Instant,
    elasticity: None,
    coefficient_blend: utils::CoefficientBlend::Average,
};

/// Composite bodies grow their bounding radius to this multiple of the
/// farthest point mass reach.
pub const RADIUS_SAFETY_MARGIN: f64 = 1.1;

/// Allowed deviation of an orientation's magnitude from 1 before a
/// spinning body renormalizes it.
pub const ORIENTATION_DRIFT_TOLERANCE: f64 = 1e-9;

/// Slack used by the geometric tests (barycentric and parametric units).
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// Relative speeds below this are treated as resting contact.
pub const VELOCITY_EPSILON: f64 = 1e-12;

/// Overlap, as a fraction of the combined radius past the threshold, at
/// which `PullApartMode::Force` pushes at the full spring velocity.
pub const PULL_APART_FORCE_FULL_DEPTH_PERCENT: f64 = 0.1;
