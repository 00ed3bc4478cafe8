use crate::errors::PhysicsError;
use crate::models::{Boundary, BoundaryBehavior, DoubleVector, Matrix3, PointMass, Quaternion, Vector3};
use crate::utils::{SimulationConstants, DEFAULT_SIMULATION_CONSTANTS, RADIUS_SAFETY_MARGIN};

/// Everything needed to construct a [`Body`].
///
/// Coefficients left as `None` fall back to the simulation constants passed to
/// [`BodyDescriptor::resolve_coefficients`] (or the crate defaults).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDescriptor {
    pub position: Vector3,
    pub facing: DoubleVector,
    pub radius: f64,
    pub mass: f64,
    pub elasticity: Option<f64>,
    pub kinetic_friction: Option<f64>,
    pub static_friction: Option<f64>,
    pub boundary: Boundary,
}

impl BodyDescriptor {
    /// An unbounded body facing +x with default coefficients.
    pub fn new(position: Vector3, radius: f64, mass: f64) -> Self {
        Self {
            position,
            facing: DoubleVector::default(),
            radius,
            mass,
            elasticity: None,
            kinetic_friction: None,
            static_friction: None,
            boundary: Boundary::unbounded(),
        }
    }

    pub fn with_facing(mut self, facing: DoubleVector) -> Self {
        self.facing = facing;
        self
    }

    pub fn with_elasticity(mut self, elasticity: f64) -> Self {
        self.elasticity = Some(elasticity);
        self
    }

    pub fn with_friction(mut self, kinetic_friction: f64, static_friction: f64) -> Self {
        self.kinetic_friction = Some(kinetic_friction);
        self.static_friction = Some(static_friction);
        self
    }

    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Fills unset coefficients from `constants`.
    pub fn resolve_coefficients(mut self, constants: &SimulationConstants) -> Self {
        self.elasticity = Some(self.elasticity.unwrap_or(constants.elasticity));
        self.kinetic_friction = Some(self.kinetic_friction.unwrap_or(constants.kinetic_friction));
        self.static_friction = Some(self.static_friction.unwrap_or(constants.static_friction));
        self
    }

    fn validate(&self) -> Result<(), PhysicsError> {
        if !(self.radius > 0.0) || !self.radius.is_finite() {
            return Err(PhysicsError::InvalidRadius);
        }
        if !(self.mass >= 0.0) || !self.mass.is_finite() {
            return Err(PhysicsError::InvalidMass);
        }
        for coefficient in [self.elasticity, self.kinetic_friction, self.static_friction].into_iter().flatten() {
            if !(0.0..=1.0).contains(&coefficient) {
                return Err(PhysicsError::InvalidCoefficient);
            }
        }
        Boundary::new(self.boundary.lower, self.boundary.upper)?;
        Ok(())
    }
}

/// Mass layout of a composite body.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeMass {
    pub(crate) point_masses: Vec<PointMass>,
    pub(crate) hull_mass: f64,
    pub(crate) center_of_mass: Vector3,
    pub(crate) inertia_tensor: Matrix3,
    pub(crate) inverse_inertia_tensor: Matrix3,
    pub(crate) angular_momentum: Vector3,
}

impl CompositeMass {
    fn new(hull_mass: f64, hull_radius: f64) -> Self {
        let mut composite = Self {
            point_masses: Vec::new(),
            hull_mass,
            center_of_mass: Vector3::zero(),
            inertia_tensor: Matrix3::zero(),
            inverse_inertia_tensor: Matrix3::zero(),
            angular_momentum: Vector3::zero(),
        };
        composite.recalculate(hull_radius);
        composite
    }

    pub fn point_mass_total(&self) -> f64 {
        self.point_masses.iter().map(|point| point.mass).sum()
    }

    pub fn total_mass(&self) -> f64 {
        self.hull_mass + self.point_mass_total()
    }

    /// Recomputes centre of mass and the body-frame inertia tensor about it.
    ///
    /// Every point mass is a solid sphere whose radius equals its mass. The
    /// hull adds an isotropic `2/5 * m * r²` term around the centre of mass
    /// and does not move the centre of mass.
    pub(crate) fn recalculate(&mut self, hull_radius: f64) {
        let point_mass_total = self.point_mass_total();
        self.center_of_mass = if self.point_masses.is_empty() || point_mass_total == 0.0 {
            Vector3::zero()
        } else {
            self.point_masses
                .iter()
                .fold(Vector3::zero(), |acc, point| acc + point.offset * point.mass)
                / point_mass_total
        };

        let hull_term = 0.4 * self.hull_mass * hull_radius * hull_radius;
        let mut tensor = Matrix3::diagonal(hull_term, hull_term, hull_term);

        for point in &self.point_masses {
            let d = point.offset - self.center_of_mass;
            let m = point.mass;
            let own = 0.4 * m * point.radius() * point.radius();
            let d_squared = d.magnitude_squared();

            // Parallel-axis term m * (|d|² I - d dᵀ) plus the sphere's own inertia
            let contribution = Matrix3::from_rows([
                [own + m * (d_squared - d.x * d.x), -m * d.x * d.y, -m * d.x * d.z],
                [-m * d.y * d.x, own + m * (d_squared - d.y * d.y), -m * d.y * d.z],
                [-m * d.z * d.x, -m * d.z * d.y, own + m * (d_squared - d.z * d.z)],
            ]);
            tensor = tensor.add(&contribution);
        }

        self.inertia_tensor = tensor;
        self.inverse_inertia_tensor = tensor.inverse();
    }
}

/// Which integration rules a body follows.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyKind {
    /// Translates only; orientation never changes.
    Ball,
    /// A uniform solid sphere that keeps spinning at its angular velocity.
    SolidBall,
    /// Built from point masses; spins from angular momentum through an
    /// inertia tensor that turns with the body.
    RigidBody(CompositeMass),
}

/// A simulated body.
///
/// Each tick runs `prepare_for_new_timer_cycle`, then the caller applies
/// forces, collisions are resolved, and finally `timer_test_position(dt)` and
/// `timer_finish` integrate and clean up.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub(crate) kind: BodyKind,
    pub(crate) position: Vector3,
    pub(crate) orientation: Quaternion,
    pub(crate) orientation_at_tick_start: Quaternion,
    pub(crate) original_direction_facing: DoubleVector,
    pub(crate) velocity: Vector3,
    pub(crate) angular_velocity: Vector3,
    pub(crate) mass: f64,
    pub(crate) radius: f64,
    pub(crate) elasticity: f64,
    pub(crate) kinetic_friction: f64,
    pub(crate) static_friction: f64,
    pub(crate) external_force: Vector3,
    pub(crate) internal_force: Vector3,
    pub(crate) torque: Vector3,
    pub(crate) boundary: Boundary,
    pub(crate) boundary_behavior: BoundaryBehavior,
}

impl Body {
    fn from_descriptor(descriptor: BodyDescriptor, kind: BodyKind) -> Result<Self, PhysicsError> {
        descriptor.validate()?;
        let descriptor = descriptor.resolve_coefficients(&DEFAULT_SIMULATION_CONSTANTS);

        let mass = match &kind {
            BodyKind::RigidBody(composite) => composite.total_mass(),
            _ => descriptor.mass,
        };

        Ok(Self {
            kind,
            position: descriptor.position,
            orientation: Quaternion::identity(),
            orientation_at_tick_start: Quaternion::identity(),
            original_direction_facing: descriptor.facing,
            velocity: Vector3::zero(),
            angular_velocity: Vector3::zero(),
            mass,
            radius: descriptor.radius,
            elasticity: descriptor.elasticity.unwrap_or_default(),
            kinetic_friction: descriptor.kinetic_friction.unwrap_or_default(),
            static_friction: descriptor.static_friction.unwrap_or_default(),
            external_force: Vector3::zero(),
            internal_force: Vector3::zero(),
            torque: Vector3::zero(),
            boundary: descriptor.boundary,
            boundary_behavior: BoundaryBehavior::default(),
        })
    }

    /// Creates a ball that translates but never rotates.
    ///
    /// # Example
    /// ```
    /// use rs_rigid_body::bodies::{Body, BodyDescriptor};
    /// use rs_rigid_body::models::Vector3;
    ///
    /// let ball = Body::new_ball(BodyDescriptor::new(Vector3::zero(), 1.0, 2.0)).unwrap();
    /// assert_eq!(ball.mass(), 2.0);
    /// assert!(Body::new_ball(BodyDescriptor::new(Vector3::zero(), -1.0, 2.0)).is_err());
    /// ```
    pub fn new_ball(descriptor: BodyDescriptor) -> Result<Self, PhysicsError> {
        Body::from_descriptor(descriptor, BodyKind::Ball)
    }

    /// Creates a uniform solid sphere that can spin.
    pub fn new_solid_ball(descriptor: BodyDescriptor) -> Result<Self, PhysicsError> {
        Body::from_descriptor(descriptor, BodyKind::SolidBall)
    }

    /// Creates a composite body. `descriptor.mass` is the hull mass; point
    /// masses added later contribute the rest.
    pub fn new_rigid_body(descriptor: BodyDescriptor) -> Result<Self, PhysicsError> {
        let composite = CompositeMass::new(descriptor.mass, descriptor.radius);
        Body::from_descriptor(descriptor, BodyKind::RigidBody(composite))
    }

    /// Adds a point mass at a body-local offset and refreshes the aggregate
    /// mass, centre of mass, inertia and bounding radius.
    ///
    /// # Arguments
    /// * `x`, `y`, `z` - Body-local offset of the point.
    /// * `mass` - Mass of the point, which also acts as its radius.
    ///
    /// # Returns
    /// A copy of the stored point mass.
    ///
    /// # Errors
    /// `NotComposite` for balls and `InvalidMass` for a negative mass.
    ///
    /// # Example
    /// ```
    /// use rs_rigid_body::bodies::{Body, BodyDescriptor};
    /// use rs_rigid_body::models::Vector3;
    ///
    /// let mut body = Body::new_rigid_body(BodyDescriptor::new(Vector3::zero(), 1.0, 0.0)).unwrap();
    /// body.add_point_mass(2.0, 0.0, 0.0, 1.0).unwrap();
    /// body.add_point_mass(-2.0, 0.0, 0.0, 3.0).unwrap();
    ///
    /// assert_eq!(body.mass(), 4.0);
    /// assert_eq!(body.center_of_mass(), Vector3::new(-1.0, 0.0, 0.0));
    /// assert!(body.radius() >= 5.0);
    /// ```
    pub fn add_point_mass(&mut self, x: f64, y: f64, z: f64, mass: f64) -> Result<PointMass, PhysicsError> {
        if !(mass >= 0.0) {
            return Err(PhysicsError::InvalidMass);
        }

        let point = PointMass::new(Vector3::new(x, y, z), mass);
        let required_radius = point.reach() * RADIUS_SAFETY_MARGIN;
        let radius = self.radius.max(required_radius);

        let BodyKind::RigidBody(composite) = &mut self.kind else {
            return Err(PhysicsError::NotComposite);
        };
        composite.point_masses.push(point);
        composite.recalculate(radius);

        self.mass = composite.total_mass();
        self.radius = radius;
        self.refresh_angular_velocity();
        Ok(point)
    }

    pub fn kind(&self) -> &BodyKind {
        &self.kind
    }

    /// Whether the body's orientation changes during integration.
    pub fn is_rotating(&self) -> bool {
        !matches!(self.kind, BodyKind::Ball)
    }

    pub fn point_masses(&self) -> &[PointMass] {
        match &self.kind {
            BodyKind::RigidBody(composite) => &composite.point_masses,
            _ => &[],
        }
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    pub fn orientation(&self) -> Quaternion {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Quaternion) {
        self.orientation = orientation;
        self.refresh_angular_velocity();
    }

    pub fn velocity(&self) -> Vector3 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vector3) {
        self.velocity = velocity;
    }

    /// World-frame angular velocity (axis-encoded, magnitude = rad/s).
    pub fn angular_velocity(&self) -> Vector3 {
        self.angular_velocity
    }

    /// Sets the angular velocity. Composite bodies convert it to angular
    /// momentum through their current world inertia; balls ignore it.
    pub fn set_angular_velocity(&mut self, angular_velocity: Vector3) {
        match &self.kind {
            BodyKind::Ball => {}
            BodyKind::SolidBall => self.angular_velocity = angular_velocity,
            BodyKind::RigidBody(composite) => {
                let rotation = self.orientation.to_matrix();
                let inertia_world = composite.inertia_tensor.rotated_by(&rotation);
                let momentum = inertia_world.multiply_vector(&angular_velocity);
                if let BodyKind::RigidBody(composite) = &mut self.kind {
                    composite.angular_momentum = momentum;
                }
                self.angular_velocity = angular_velocity;
            }
        }
    }

    /// World-frame angular momentum.
    pub fn angular_momentum(&self) -> Vector3 {
        match &self.kind {
            BodyKind::Ball => Vector3::zero(),
            BodyKind::SolidBall => self.angular_velocity * self.solid_ball_inertia(),
            BodyKind::RigidBody(composite) => composite.angular_momentum,
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inverse_mass(&self) -> f64 {
        1.0 / self.mass
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Body-local centre of mass.
    pub fn center_of_mass(&self) -> Vector3 {
        match &self.kind {
            BodyKind::RigidBody(composite) => composite.center_of_mass,
            _ => Vector3::zero(),
        }
    }

    pub fn world_center_of_mass(&self) -> Vector3 {
        self.position + self.orientation.rotate(&self.center_of_mass(), true)
    }

    /// The original facing basis rotated by the current orientation.
    pub fn direction_facing(&self) -> DoubleVector {
        self.original_direction_facing.rotated(&self.orientation)
    }

    pub fn original_direction_facing(&self) -> DoubleVector {
        self.original_direction_facing
    }

    pub fn elasticity(&self) -> f64 {
        self.elasticity
    }

    pub fn kinetic_friction(&self) -> f64 {
        self.kinetic_friction
    }

    pub fn static_friction(&self) -> f64 {
        self.static_friction
    }

    pub fn set_coefficients(&mut self, elasticity: f64, kinetic_friction: f64, static_friction: f64) -> Result<(), PhysicsError> {
        for coefficient in [elasticity, kinetic_friction, static_friction] {
            if !(0.0..=1.0).contains(&coefficient) {
                return Err(PhysicsError::InvalidCoefficient);
            }
        }
        self.elasticity = elasticity;
        self.kinetic_friction = kinetic_friction;
        self.static_friction = static_friction;
        Ok(())
    }

    pub fn external_force(&self) -> Vector3 {
        self.external_force
    }

    pub fn internal_force(&self) -> Vector3 {
        self.internal_force
    }

    /// Torque about the world centre of mass accumulated this tick.
    pub fn torque(&self) -> Vector3 {
        self.torque
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub fn set_boundary(&mut self, boundary: Boundary) -> Result<(), PhysicsError> {
        self.boundary = Boundary::new(boundary.lower, boundary.upper)?;
        Ok(())
    }

    pub fn boundary_behavior(&self) -> BoundaryBehavior {
        self.boundary_behavior
    }

    pub fn set_boundary_behavior(&mut self, behavior: BoundaryBehavior) {
        self.boundary_behavior = behavior;
    }

    /// Rotation applied since the last `prepare_for_new_timer_cycle`.
    pub fn rotation_this_tick(&self) -> Quaternion {
        self.orientation.multiply(&self.orientation_at_tick_start.conjugate())
    }

    fn solid_ball_inertia(&self) -> f64 {
        0.4 * self.mass * self.radius * self.radius
    }

    /// Inverse inertia tensor in world frame. Balls report zero (they never
    /// pick up spin).
    pub fn inverse_inertia_world(&self) -> Matrix3 {
        match &self.kind {
            BodyKind::Ball => Matrix3::zero(),
            BodyKind::SolidBall => {
                let inverse = 1.0 / self.solid_ball_inertia();
                Matrix3::diagonal(inverse, inverse, inverse)
            }
            BodyKind::RigidBody(composite) => {
                composite.inverse_inertia_tensor.rotated_by(&self.orientation.to_matrix())
            }
        }
    }

    /// Velocity of the material point currently at `world_point`.
    pub fn velocity_at_point(&self, world_point: &Vector3) -> Vector3 {
        let lever = *world_point - self.world_center_of_mass();
        self.velocity + self.angular_velocity.cross(&lever)
    }

    /// Linear plus rotational kinetic energy.
    pub fn kinetic_energy(&self) -> f64 {
        let linear = 0.5 * self.mass * self.velocity.magnitude_squared();
        let rotational = match &self.kind {
            BodyKind::Ball => 0.0,
            BodyKind::SolidBall => 0.5 * self.solid_ball_inertia() * self.angular_velocity.magnitude_squared(),
            BodyKind::RigidBody(composite) => 0.5 * self.angular_velocity.dot(&composite.angular_momentum),
        };
        linear + rotational
    }

    /// Applies an instantaneous impulse at `lever` (world frame, measured from
    /// the world centre of mass).
    pub fn apply_impulse(&mut self, lever: &Vector3, impulse: &Vector3) {
        self.velocity += *impulse / self.mass;

        let angular_impulse = lever.cross(impulse);
        let solid_inertia = self.solid_ball_inertia();
        match &mut self.kind {
            BodyKind::Ball => {}
            BodyKind::SolidBall => {
                self.angular_velocity += angular_impulse / solid_inertia;
            }
            BodyKind::RigidBody(composite) => {
                composite.angular_momentum += angular_impulse;
                self.refresh_angular_velocity();
            }
        }
    }

    /// Re-derives a composite body's angular velocity from its momentum and
    /// the current orientation of its inertia tensor.
    pub(crate) fn refresh_angular_velocity(&mut self) {
        if let BodyKind::RigidBody(composite) = &self.kind {
            let rotation = self.orientation.to_matrix();
            let inverse_inertia = composite.inverse_inertia_tensor.rotated_by(&rotation);
            self.angular_velocity = inverse_inertia.multiply_vector(&composite.angular_momentum);
        }
    }
}
