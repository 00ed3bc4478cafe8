//! A container that drives a set of bodies through the per-tick cycle.
//!
//! Each tick prepares every body, applies gravity, detects every contact
//! against the pre-tick positions in a single pass (ascending body index
//! pairs, then bodies against static polygons), resolves the contacts in that
//! order, and only then integrates and finishes every body.
//!
//! # Example
//!
//! ```
//! use rs_rigid_body::bodies::{Body, BodyDescriptor};
//! use rs_rigid_body::models::Vector3;
//! use rs_rigid_body::simulation::Simulation;
//! use rs_rigid_body::utils::SimulationConstants;
//!
//! let mut sim = Simulation::new(Some(SimulationConstants::weightless()), None, 7).unwrap();
//! let left = sim.add_body(Body::new_ball(BodyDescriptor::new(Vector3::new(-3.0, 0.0, 0.0), 1.0, 1.0)).unwrap());
//! sim.body_mut(left).unwrap().set_velocity(Vector3::new(1.0, 0.0, 0.0));
//!
//! sim.simulate(10, 0.1).unwrap();
//! assert!((sim.body(left).unwrap().position().x + 2.0).abs() < 1e-9);
//! ```
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bodies::Body;
use crate::errors::PhysicsError;
use crate::interactions::{CollisionContact, CollisionHandler};
use crate::models::{PolygonTree, Vector3};
use crate::utils::{CollisionSettings, SimulationConstants};

/// A contact found during the detection pass of a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectedCollision {
    /// Two bodies, `first < second`, normal pointing from `first` to `second`.
    Pair {
        first: usize,
        second: usize,
        contact: CollisionContact,
    },
    /// A body against a static polygon, normal pointing into the polygon.
    Static {
        body: usize,
        polygon: usize,
        contact: CollisionContact,
    },
}

/// Owns bodies, static geometry, the collision handler and the random source
/// used for collision tie-breaks.
#[derive(Debug, Clone)]
pub struct Simulation {
    bodies: Vec<Body>,
    static_polygons: Vec<PolygonTree>,
    handler: CollisionHandler,
    constants: SimulationConstants,
    rng: StdRng,
    elapsed: f64,
    ticks: u64,
}

impl Simulation {
    /// Creates an empty simulation.
    ///
    /// # Arguments
    /// * `constants` - World constants, `None` for the defaults.
    /// * `settings` - Collision settings, `None` for the defaults.
    /// * `seed` - Seed of the random source, which makes runs reproducible.
    ///
    /// # Errors
    /// Returns an error if `constants` fail validation.
    pub fn new(
        constants: Option<SimulationConstants>,
        settings: Option<CollisionSettings>,
        seed: u64,
    ) -> Result<Self, PhysicsError> {
        let constants = constants.unwrap_or_default();
        constants.validate()?;

        Ok(Self {
            bodies: Vec::new(),
            static_polygons: Vec::new(),
            handler: CollisionHandler::new(settings),
            constants,
            rng: StdRng::seed_from_u64(seed),
            elapsed: 0.0,
            ticks: 0,
        })
    }

    /// Adds a body and returns its index.
    ///
    /// Bodies built from a [`crate::bodies::BodyDescriptor`] pick up the crate
    /// default coefficients; call `resolve_coefficients(sim.constants())` on
    /// the descriptor first to use this simulation's instead.
    pub fn add_body(&mut self, body: Body) -> usize {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    /// Removes a body. Later bodies shift down by one index.
    pub fn remove_body(&mut self, index: usize) -> Result<Body, PhysicsError> {
        if index >= self.bodies.len() {
            return Err(PhysicsError::IndexOutOfBounds(index));
        }
        Ok(self.bodies.remove(index))
    }

    pub fn body(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    pub fn body_mut(&mut self, index: usize) -> Option<&mut Body> {
        self.bodies.get_mut(index)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Adds world-space static geometry and returns its index.
    pub fn add_static_polygon(&mut self, polygon: PolygonTree) -> usize {
        self.static_polygons.push(polygon);
        self.static_polygons.len() - 1
    }

    pub fn static_polygons(&self) -> &[PolygonTree] {
        &self.static_polygons
    }

    pub fn handler(&self) -> &CollisionHandler {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut CollisionHandler {
        &mut self.handler
    }

    pub fn constants(&self) -> &SimulationConstants {
        &self.constants
    }

    /// Simulated time so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Starts a tick on every body. Apply forces between this and
    /// [`Simulation::advance`].
    pub fn prepare_tick(&mut self) {
        for body in self.bodies.iter_mut() {
            body.prepare_for_new_timer_cycle();
        }
    }

    pub fn apply_external_force(&mut self, index: usize, offset: &Vector3, force: &Vector3) -> Result<(), PhysicsError> {
        let body = self.bodies.get_mut(index).ok_or(PhysicsError::IndexOutOfBounds(index))?;
        body.apply_external_force(offset, force);
        Ok(())
    }

    pub fn apply_internal_force(&mut self, index: usize, local_offset: &Vector3, local_force: &Vector3) -> Result<(), PhysicsError> {
        let body = self.bodies.get_mut(index).ok_or(PhysicsError::IndexOutOfBounds(index))?;
        body.apply_internal_force(local_offset, local_force);
        Ok(())
    }

    /// Runs the detection pass against the current positions.
    ///
    /// Body pairs come first in ascending `(first, second)` order, followed by
    /// every body against every static polygon. Only the closest polygon
    /// contact is kept per body and polygon.
    pub fn detect_collisions(&self) -> Vec<DetectedCollision> {
        let mut collisions = Vec::new();

        for first in 0..self.bodies.len() {
            for second in (first + 1)..self.bodies.len() {
                if let Some(contact) = self.handler.sphere_sphere(&self.bodies[first], &self.bodies[second]) {
                    collisions.push(DetectedCollision::Pair { first, second, contact });
                }
            }
        }

        for (body, sphere) in self.bodies.iter().enumerate() {
            for (polygon, tree) in self.static_polygons.iter().enumerate() {
                if let Some(collision) = self.handler.sphere_polygon(sphere, tree) {
                    collisions.push(DetectedCollision::Static {
                        body,
                        polygon,
                        contact: collision.closest,
                    });
                }
            }
        }

        collisions
    }

    /// Finishes the tick started by [`Simulation::prepare_tick`].
    ///
    /// # Arguments
    /// * `dt` - Length of the tick in seconds.
    ///
    /// # Returns
    /// The number of contacts resolved.
    ///
    /// # Errors
    /// `InvalidTime` when `dt` is negative or not finite.
    pub fn advance(&mut self, dt: f64) -> Result<usize, PhysicsError> {
        if !(dt >= 0.0) || !dt.is_finite() {
            return Err(PhysicsError::InvalidTime);
        }

        let gravity = self.constants.gravity;
        if !gravity.is_zero() {
            for body in self.bodies.iter_mut() {
                let weight = gravity * body.mass();
                body.apply_central_force(&weight);
            }
        }

        let collisions = self.detect_collisions();
        for collision in &collisions {
            match *collision {
                DetectedCollision::Pair { first, second, contact } => {
                    let (head, tail) = self.bodies.split_at_mut(second);
                    let resolution = self.handler.resolve_collision(&mut head[first], &mut tail[0], &contact, &mut self.rng);
                    trace!("Bodies {} and {}: {:?}", first, second, resolution);
                }
                DetectedCollision::Static { body, polygon, contact } => {
                    let resolution = self.handler.resolve_static_collision(&mut self.bodies[body], &contact, &mut self.rng);
                    trace!("Body {} and polygon {}: {:?}", body, polygon, resolution);
                }
            }
        }

        for body in self.bodies.iter_mut() {
            body.timer_test_position(dt);
        }
        for body in self.bodies.iter_mut() {
            body.timer_finish();
        }

        self.elapsed += dt;
        self.ticks += 1;
        if !collisions.is_empty() {
            debug!("Tick {} resolved {} contacts", self.ticks, collisions.len());
        }
        Ok(collisions.len())
    }

    /// One full tick without caller-applied forces.
    pub fn step(&mut self, dt: f64) -> Result<usize, PhysicsError> {
        self.prepare_tick();
        self.advance(dt)
    }

    /// Runs `steps` ticks of length `dt`.
    ///
    /// # Returns
    /// The total number of contacts resolved.
    pub fn simulate(&mut self, steps: usize, dt: f64) -> Result<usize, PhysicsError> {
        let mut contacts = 0;
        for _ in 0..steps {
            contacts += self.step(dt)?;
        }
        Ok(contacts)
    }

    pub fn total_kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    pub fn total_momentum(&self) -> Vector3 {
        self.bodies
            .iter()
            .fold(Vector3::zero(), |acc, body| acc + body.velocity() * body.mass())
    }
}
