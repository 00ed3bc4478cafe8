use crate::bodies::Body;
use crate::models::{Matrix3, Vector3};
use crate::utils::{CollisionSettings, PullApartMode, PULL_APART_FORCE_FULL_DEPTH_PERCENT, VELOCITY_EPSILON};

/// What one side of a contact contributes to the impulse computation.
///
/// A static surface is modelled with zero inverse mass and inertia, which
/// makes it immovable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactSide {
    pub inverse_mass: f64,
    pub inverse_inertia: Matrix3,
    /// Contact point relative to the world centre of mass.
    pub lever: Vector3,
    /// Velocity of the material point at the contact.
    pub point_velocity: Vector3,
}

impl ContactSide {
    pub fn of_body(body: &Body, contact_point: &Vector3) -> Self {
        Self {
            inverse_mass: body.inverse_mass(),
            inverse_inertia: body.inverse_inertia_world(),
            lever: *contact_point - body.world_center_of_mass(),
            point_velocity: body.velocity_at_point(contact_point),
        }
    }

    pub fn immovable() -> Self {
        Self {
            inverse_mass: 0.0,
            inverse_inertia: Matrix3::zero(),
            lever: Vector3::zero(),
            point_velocity: Vector3::zero(),
        }
    }

    /// `(r × d) · I⁻¹ (r × d)`, the rotational share of the effective mass
    /// along `direction`.
    fn angular_term(&self, direction: &Vector3) -> f64 {
        let r_cross_d = self.lever.cross(direction);
        r_cross_d.dot(&self.inverse_inertia.multiply_vector(&r_cross_d))
    }

    fn effective_inverse_mass(&self, direction: &Vector3) -> f64 {
        self.inverse_mass + self.angular_term(direction)
    }
}

/// Coefficients resolved for one contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactMaterial {
    pub restitution: f64,
    pub kinetic_friction: f64,
    pub static_friction: f64,
}

impl ContactMaterial {
    /// Blends two bodies' coefficients. A global elasticity in `settings`
    /// overrides the blended restitution.
    pub fn between(settings: &CollisionSettings, a: &Body, b: &Body) -> Self {
        let blend = settings.coefficient_blend();
        Self {
            restitution: settings
                .elasticity()
                .unwrap_or_else(|| blend.combine(a.elasticity(), b.elasticity())),
            kinetic_friction: blend.combine(a.kinetic_friction(), b.kinetic_friction()),
            static_friction: blend.combine(a.static_friction(), b.static_friction()),
        }
    }

    /// Coefficients of a body hitting a static surface.
    pub fn of_body(settings: &CollisionSettings, body: &Body) -> Self {
        Self {
            restitution: settings.elasticity().unwrap_or(body.elasticity()),
            kinetic_friction: body.kinetic_friction(),
            static_friction: body.static_friction(),
        }
    }
}

/// Calculates the normal impulse magnitude for a contact.
///
/// The impulse accounts for both linear and angular response of each side.
///
/// # Arguments
/// * `a`, `b` - The two sides of the contact.
/// * `normal` - Unit normal pointing from `a` to `b`.
/// * `restitution` - Coefficient of restitution (0.0 = perfectly inelastic, 1.0 = perfectly elastic).
///
/// # Returns
/// `None` when the sides are already separating along the normal, otherwise
/// the (positive) impulse magnitude to apply to `b` along `normal`.
pub fn calculate_collision_impulse(a: &ContactSide, b: &ContactSide, normal: &Vector3, restitution: f64) -> Option<f64> {
    let relative_velocity = b.point_velocity - a.point_velocity;
    let normal_speed = relative_velocity.dot(normal);

    if normal_speed >= -VELOCITY_EPSILON {
        return None;
    }

    let denominator = a.effective_inverse_mass(normal) + b.effective_inverse_mass(normal);
    Some(-(1.0 + restitution) * normal_speed / denominator)
}

/// Calculates the Coulomb friction impulse for a contact whose normal
/// impulse is `normal_impulse`.
///
/// The impulse that would stop sliding outright is used while it stays
/// inside the static cone (`|jt| <= μs·jn`). Beyond that, kinetic friction
/// caps it at `μk·jn`.
///
/// # Returns
/// The friction impulse to apply to `b` (a zero vector without sliding).
pub fn calculate_friction_impulse(
    a: &ContactSide,
    b: &ContactSide,
    normal: &Vector3,
    normal_impulse: f64,
    material: &ContactMaterial,
) -> Vector3 {
    let relative_velocity = b.point_velocity - a.point_velocity;
    let tangential_velocity = relative_velocity.reject_from_unit(normal);
    let sliding_speed = tangential_velocity.magnitude();

    if sliding_speed <= VELOCITY_EPSILON {
        return Vector3::zero();
    }

    let tangent = tangential_velocity / sliding_speed;
    let denominator = a.effective_inverse_mass(&tangent) + b.effective_inverse_mass(&tangent);
    let stopping_impulse = sliding_speed / denominator;

    let magnitude = if stopping_impulse <= material.static_friction * normal_impulse {
        stopping_impulse
    } else {
        material.kinetic_friction * normal_impulse
    };
    -tangent * magnitude
}

/// Position or velocity correction that separates penetrating bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PullApart {
    /// Move each side by the given displacement.
    Displace { a: Vector3, b: Vector3 },
    /// Add the given velocity to each side.
    Accelerate { a: Vector3, b: Vector3 },
}

/// Works out the pull-apart correction for a contact, if any.
///
/// Nothing happens unless `penetration` exceeds
/// `penetration_threshold_percent * combined_radius`. The correction is
/// split between the sides by inverse mass, so an immovable side never moves.
///
/// In `Force` mode the target separating speed grows linearly with the
/// overlap past the threshold and reaches `pull_apart_spring_velocity` at
/// `PULL_APART_FORCE_FULL_DEPTH_PERCENT` of the combined radius. Only the
/// shortfall against the current separating speed is added.
///
/// # Arguments
/// * `settings` - Pull-apart configuration.
/// * `inverse_mass_a`, `inverse_mass_b` - Inverse masses of the two sides.
/// * `separating_speed` - Current `(v_b - v_a) · normal` of the centres of mass.
/// * `normal` - Unit normal pointing from `a` to `b`.
/// * `penetration` - Overlap depth along the normal.
/// * `combined_radius` - Sum of the radii involved.
pub fn calculate_pull_apart(
    settings: &CollisionSettings,
    inverse_mass_a: f64,
    inverse_mass_b: f64,
    separating_speed: f64,
    normal: &Vector3,
    penetration: f64,
    combined_radius: f64,
) -> Option<PullApart> {
    let threshold = settings.penetration_threshold_percent() * combined_radius;
    if penetration <= threshold {
        return None;
    }

    let total_inverse_mass = inverse_mass_a + inverse_mass_b;
    let share_a = inverse_mass_a / total_inverse_mass;
    let share_b = inverse_mass_b / total_inverse_mass;

    match settings.pull_apart_mode() {
        PullApartMode::None => None,
        PullApartMode::Instant => {
            let distance = penetration * settings.pull_apart_instant_percent();
            Some(PullApart::Displace {
                a: -*normal * (distance * share_a),
                b: *normal * (distance * share_b),
            })
        }
        PullApartMode::Force => {
            let spring = settings.pull_apart_spring_velocity();
            let full_depth = PULL_APART_FORCE_FULL_DEPTH_PERCENT * combined_radius;
            let target = spring * ((penetration - threshold) / full_depth).min(1.0);
            let added = (target - separating_speed).clamp(0.0, spring);
            if added == 0.0 {
                return None;
            }
            Some(PullApart::Accelerate {
                a: -*normal * (added * share_a),
                b: *normal * (added * share_b),
            })
        }
    }
}

/// Applies the `a` half of a pull-apart correction to `body`.
pub(crate) fn apply_pull_apart_a(body: &mut Body, pull_apart: &PullApart) {
    match pull_apart {
        PullApart::Displace { a, .. } => body.position += *a,
        PullApart::Accelerate { a, .. } => body.velocity += *a,
    }
}

/// Applies the `b` half of a pull-apart correction to `body`.
pub(crate) fn apply_pull_apart_b(body: &mut Body, pull_apart: &PullApart) {
    match pull_apart {
        PullApart::Displace { b, .. } => body.position += *b,
        PullApart::Accelerate { b, .. } => body.velocity += *b,
    }
}
