use log::{debug, trace};

use crate::bodies::{Body, BodyKind};
use crate::models::{BoundaryBehavior, Quaternion, Vector3};
use crate::utils::ORIENTATION_DRIFT_TOLERANCE;

impl Body {
    /// Starts a tick: clears the force and torque accumulators and remembers
    /// the current orientation for [`Body::rotation_this_tick`].
    pub fn prepare_for_new_timer_cycle(&mut self) {
        self.external_force = Vector3::zero();
        self.internal_force = Vector3::zero();
        self.torque = Vector3::zero();
        self.orientation_at_tick_start = self.orientation;
    }

    /// Accumulates a world-frame force applied at a world-frame offset from
    /// the body position.
    ///
    /// # Arguments
    /// * `offset` - Point of application relative to `position`, world frame.
    /// * `force` - The force in world frame.
    ///
    /// # Example
    /// ```
    /// use rs_rigid_body::bodies::{Body, BodyDescriptor};
    /// use rs_rigid_body::models::Vector3;
    ///
    /// let mut ball = Body::new_solid_ball(BodyDescriptor::new(Vector3::zero(), 1.0, 1.0)).unwrap();
    /// ball.prepare_for_new_timer_cycle();
    /// ball.apply_external_force(&Vector3::new(1.0, 0.0, 0.0), &Vector3::new(0.0, 2.0, 0.0));
    ///
    /// assert_eq!(ball.external_force(), Vector3::new(0.0, 2.0, 0.0));
    /// assert_eq!(ball.torque(), Vector3::new(0.0, 0.0, 2.0));
    /// ```
    pub fn apply_external_force(&mut self, offset: &Vector3, force: &Vector3) {
        self.external_force += *force;
        self.accumulate_torque(offset, force);
    }

    /// Accumulates a world-frame force through the world centre of mass.
    pub fn apply_central_force(&mut self, force: &Vector3) {
        self.external_force += *force;
    }

    /// Accumulates a force given in body frame at a body-local offset, as a
    /// thruster mounted on the body would push.
    pub fn apply_internal_force(&mut self, local_offset: &Vector3, local_force: &Vector3) {
        let offset = self.orientation.rotate(local_offset, true);
        let force = self.orientation.rotate(local_force, true);
        self.internal_force += force;
        self.accumulate_torque(&offset, &force);
    }

    fn accumulate_torque(&mut self, offset: &Vector3, force: &Vector3) {
        let lever = *offset - self.orientation.rotate(&self.center_of_mass(), true);
        self.torque += lever.cross(force);
    }

    /// Integrates one tick of length `dt` (semi-implicit Euler).
    ///
    /// Velocity picks up the accumulated forces before the position moves,
    /// spinning bodies rotate about their world centre of mass, and the
    /// boundary box is enforced last.
    pub fn timer_test_position(&mut self, dt: f64) {
        let total_force = self.external_force + self.internal_force;
        self.velocity += total_force * (dt / self.mass);
        self.position += self.velocity * dt;

        match &mut self.kind {
            BodyKind::Ball => {}
            BodyKind::SolidBall => {
                let inertia = 0.4 * self.mass * self.radius * self.radius;
                self.angular_velocity += self.torque * (dt / inertia);
            }
            BodyKind::RigidBody(composite) => {
                composite.angular_momentum += self.torque * dt;
                self.refresh_angular_velocity();
            }
        }

        if self.is_rotating() && !self.angular_velocity.is_zero() {
            self.rotate_about_center_of_mass(&(self.angular_velocity * dt));
        }

        self.enforce_boundary();
    }

    fn rotate_about_center_of_mass(&mut self, rotation: &Vector3) {
        let center_of_mass = self.world_center_of_mass();
        let step = Quaternion::from_rotation_vector(rotation);
        self.orientation = step.multiply(&self.orientation);
        self.position = center_of_mass - self.orientation.rotate(&self.center_of_mass(), true);
    }

    fn enforce_boundary(&mut self) {
        let boundary = self.boundary;
        for axis in 0..3 {
            let lower = boundary.lower.component(axis);
            let upper = boundary.upper.component(axis);
            let value = self.position.component(axis);

            let inward = if value < lower {
                1.0
            } else if value > upper {
                -1.0
            } else {
                continue;
            };

            *self.position.component_mut(axis) = value.clamp(lower, upper);
            let speed = self.velocity.component_mut(axis);
            *speed = match self.boundary_behavior {
                BoundaryBehavior::Reflect => inward * speed.abs(),
                BoundaryBehavior::Clamp => 0.0,
            };
            trace!("Body hit boundary on axis {} at {}", axis, value);
        }
    }

    /// Ends a tick: repairs orientation drift and clears the accumulators.
    ///
    /// Solid balls renormalize only once their orientation has drifted past
    /// tolerance. Composite bodies run the full matrix round trip every tick.
    pub fn timer_finish(&mut self) {
        match self.kind {
            BodyKind::Ball => {}
            BodyKind::SolidBall => {
                if !self.orientation.is_unit(ORIENTATION_DRIFT_TOLERANCE) {
                    debug!("Renormalizing drifted orientation |q| = {}", self.orientation.magnitude());
                    self.orientation.become_unit_quaternion();
                }
            }
            BodyKind::RigidBody(_) => {
                self.orientation.become_orthonormalized();
                self.refresh_angular_velocity();
            }
        }

        self.external_force = Vector3::zero();
        self.internal_force = Vector3::zero();
        self.torque = Vector3::zero();
    }
}
