use log::{trace, warn};
use rand::Rng;

use crate::bodies::Body;
use crate::errors::PhysicsError;
use crate::interactions::collision_response_3d::{apply_pull_apart_a, apply_pull_apart_b};
use crate::interactions::{
    calculate_collision_impulse, calculate_friction_impulse, calculate_pull_apart, line_plane, line_triangle,
    sphere_polygon, sphere_sphere, sphere_triangle, triangle_triangle, CollisionContact, ContactMaterial,
    ContactSide, LineKind, PolygonCollision,
};
use crate::models::{PolygonTree, Triangle, Vector3};
use crate::utils::{CollisionSettings, PullApartMode, DEFAULT_COLLISION_SETTINGS};

/// What resolving one contact did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionResolution {
    /// Total impulse (normal plus friction) applied to the second body.
    /// `None` when the bodies were already separating.
    pub impulse: Option<Vector3>,
    /// Whether a pull-apart correction was applied.
    pub pulled_apart: bool,
}

/// Narrow-phase detection and impulse response for pairs of bodies.
///
/// Detection methods never mutate anything. The `resolve_*` methods mutate the
/// bodies passed in: velocities (and spin) through impulses, and positions or
/// velocities through the pull-apart correction.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionHandler {
    settings: CollisionSettings,
}

impl Default for CollisionHandler {
    fn default() -> Self {
        Self::new(None)
    }
}

impl CollisionHandler {
    /// Creates a handler, falling back to the default settings.
    ///
    /// # Example
    /// ```
    /// use rs_rigid_body::interactions::CollisionHandler;
    /// use rs_rigid_body::utils::PullApartMode;
    ///
    /// let mut handler = CollisionHandler::new(None);
    /// assert_eq!(handler.pull_apart_mode(), PullApartMode::Instant);
    ///
    /// assert!(handler.set_penetration_threshold_percent(0.05).is_ok());
    /// assert!(handler.set_penetration_threshold_percent(1.5).is_err());
    /// assert_eq!(handler.penetration_threshold_percent(), 0.05);
    /// ```
    pub fn new(settings: Option<CollisionSettings>) -> Self {
        Self {
            settings: settings.unwrap_or(DEFAULT_COLLISION_SETTINGS),
        }
    }

    pub fn settings(&self) -> &CollisionSettings {
        &self.settings
    }

    pub fn penetration_threshold_percent(&self) -> f64 {
        self.settings.penetration_threshold_percent()
    }

    pub fn set_penetration_threshold_percent(&mut self, value: f64) -> Result<(), PhysicsError> {
        self.settings.set_penetration_threshold_percent(value)
    }

    pub fn pull_apart_instant_percent(&self) -> f64 {
        self.settings.pull_apart_instant_percent()
    }

    pub fn set_pull_apart_instant_percent(&mut self, value: f64) -> Result<(), PhysicsError> {
        self.settings.set_pull_apart_instant_percent(value)
    }

    pub fn pull_apart_spring_velocity(&self) -> f64 {
        self.settings.pull_apart_spring_velocity()
    }

    pub fn set_pull_apart_spring_velocity(&mut self, value: f64) -> Result<(), PhysicsError> {
        self.settings.set_pull_apart_spring_velocity(value)
    }

    pub fn pull_apart_mode(&self) -> PullApartMode {
        self.settings.pull_apart_mode()
    }

    pub fn set_pull_apart_mode(&mut self, mode: PullApartMode) {
        self.settings.set_pull_apart_mode(mode);
    }

    pub fn elasticity(&self) -> Option<f64> {
        self.settings.elasticity()
    }

    pub fn set_elasticity(&mut self, value: Option<f64>) -> Result<(), PhysicsError> {
        self.settings.set_elasticity(value)
    }

    /// Bounding-sphere test between two bodies.
    pub fn sphere_sphere(&self, a: &Body, b: &Body) -> Option<CollisionContact> {
        sphere_sphere(&a.position(), a.radius(), &b.position(), b.radius())
    }

    /// Tests a body's bounding sphere against a world-space triangle.
    pub fn sphere_triangle(&self, sphere: &Body, triangle: &Triangle) -> Option<CollisionContact> {
        sphere_triangle(&sphere.position(), sphere.radius(), triangle)
    }

    pub fn triangle_triangle(&self, first: &Triangle, second: &Triangle) -> Vec<Vector3> {
        triangle_triangle(first, second)
    }

    /// Tests a body's bounding sphere against a world-space polygon tree.
    pub fn sphere_polygon(&self, sphere: &Body, polygon: &PolygonTree) -> Option<PolygonCollision> {
        sphere_polygon(&sphere.position(), sphere.radius(), polygon)
    }

    pub fn line_plane(
        &self,
        origin: &Vector3,
        direction: &Vector3,
        plane_point: &Vector3,
        plane_normal: &Vector3,
        kind: LineKind,
    ) -> Option<Vector3> {
        line_plane(origin, direction, plane_point, plane_normal, kind)
    }

    pub fn line_triangle(&self, origin: &Vector3, direction: &Vector3, triangle: &Triangle, kind: LineKind) -> Option<Vector3> {
        line_triangle(origin, direction, triangle, kind)
    }

    /// Resolves a contact between two bodies.
    ///
    /// Applies the restitution impulse (skipped when the bodies already
    /// separate along the normal), Coulomb friction, and then the configured
    /// pull-apart correction.
    ///
    /// # Arguments
    /// * `a`, `b` - The bodies, in the order the contact was detected.
    /// * `contact` - The contact, normal pointing from `a` to `b`.
    /// * `rng` - Source for the tie-break direction when the normal is undefined.
    ///
    /// # Example
    /// ```
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    /// use rs_rigid_body::bodies::{Body, BodyDescriptor};
    /// use rs_rigid_body::interactions::CollisionHandler;
    /// use rs_rigid_body::models::Vector3;
    ///
    /// let elastic = |x: f64| BodyDescriptor::new(Vector3::new(x, 0.0, 0.0), 1.0, 1.0)
    ///     .with_elasticity(1.0)
    ///     .with_friction(0.0, 0.0);
    /// let mut a = Body::new_ball(elastic(-1.0)).unwrap();
    /// let mut b = Body::new_ball(elastic(1.0)).unwrap();
    /// a.set_velocity(Vector3::new(1.0, 0.0, 0.0));
    ///
    /// let handler = CollisionHandler::default();
    /// let contact = handler.sphere_sphere(&a, &b).unwrap();
    /// handler.resolve_collision(&mut a, &mut b, &contact, &mut StdRng::seed_from_u64(1));
    ///
    /// assert!(a.velocity().x.abs() < 1e-12);
    /// assert!((b.velocity().x - 1.0).abs() < 1e-12);
    /// ```
    pub fn resolve_collision<R: Rng>(
        &self,
        a: &mut Body,
        b: &mut Body,
        contact: &CollisionContact,
        rng: &mut R,
    ) -> CollisionResolution {
        let normal = Self::usable_normal(contact, rng);
        let side_a = ContactSide::of_body(a, &contact.point);
        let side_b = ContactSide::of_body(b, &contact.point);
        let material = ContactMaterial::between(&self.settings, a, b);

        let mut resolution = CollisionResolution::default();

        if let Some(normal_impulse) = calculate_collision_impulse(&side_a, &side_b, &normal, material.restitution) {
            let friction = calculate_friction_impulse(&side_a, &side_b, &normal, normal_impulse, &material);
            let impulse = normal * normal_impulse + friction;

            a.apply_impulse(&side_a.lever, &(-impulse));
            b.apply_impulse(&side_b.lever, &impulse);
            trace!("Applied impulse {:?} at {:?}", impulse, contact.point);
            resolution.impulse = Some(impulse);
        }

        let separating_speed = (b.velocity() - a.velocity()).dot(&normal);
        let pull_apart = calculate_pull_apart(
            &self.settings,
            a.inverse_mass(),
            b.inverse_mass(),
            separating_speed,
            &normal,
            contact.penetration,
            a.radius() + b.radius(),
        );
        if let Some(pull_apart) = pull_apart {
            apply_pull_apart_a(a, &pull_apart);
            apply_pull_apart_b(b, &pull_apart);
            resolution.pulled_apart = true;
        }

        resolution
    }

    /// Resolves a contact between a body and an immovable surface (for
    /// instance a static polygon). The surface behaves like infinite mass
    /// with zero velocity. The contact normal points from the body into the
    /// surface.
    pub fn resolve_static_collision<R: Rng>(
        &self,
        body: &mut Body,
        contact: &CollisionContact,
        rng: &mut R,
    ) -> CollisionResolution {
        let normal = Self::usable_normal(contact, rng);
        let side = ContactSide::of_body(body, &contact.point);
        let surface = ContactSide::immovable();
        let material = ContactMaterial::of_body(&self.settings, body);

        let mut resolution = CollisionResolution::default();

        if let Some(normal_impulse) = calculate_collision_impulse(&side, &surface, &normal, material.restitution) {
            let friction = calculate_friction_impulse(&side, &surface, &normal, normal_impulse, &material);
            let impulse = normal * normal_impulse + friction;

            body.apply_impulse(&side.lever, &(-impulse));
            resolution.impulse = Some(impulse);
        }

        let separating_speed = -body.velocity().dot(&normal);
        let pull_apart = calculate_pull_apart(
            &self.settings,
            body.inverse_mass(),
            0.0,
            separating_speed,
            &normal,
            contact.penetration,
            body.radius(),
        );
        if let Some(pull_apart) = pull_apart {
            apply_pull_apart_a(body, &pull_apart);
            resolution.pulled_apart = true;
        }

        resolution
    }

    fn usable_normal<R: Rng>(contact: &CollisionContact, rng: &mut R) -> Vector3 {
        if contact.normal.is_zero() {
            let normal = Vector3::random_unit(rng);
            warn!("Contact at {:?} has no defined normal, using random direction {:?}", contact.point, normal);
            return normal;
        }
        contact.normal
    }
}
