use approx::assert_relative_eq;

use crate::assert_float_eq;
use crate::bodies::{Body, BodyDescriptor};
use crate::errors::PhysicsError;
use crate::models::{Boundary, PolygonTree, Triangle, Vector3};
use crate::simulation::{DetectedCollision, Simulation};
use crate::utils::{CollisionSettings, PullApartMode, SimulationConstants};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn weightless() -> Simulation {
    Simulation::new(Some(SimulationConstants::weightless()), None, 11).unwrap()
}

fn elastic_ball(x: f64, velocity: f64) -> Body {
    let descriptor = BodyDescriptor::new(Vector3::new(x, 0.0, 0.0), 1.0, 1.0)
        .with_elasticity(1.0)
        .with_friction(0.0, 0.0);
    let mut ball = Body::new_ball(descriptor).unwrap();
    ball.set_velocity(Vector3::new(velocity, 0.0, 0.0));
    ball
}

#[test]
fn test_new_rejects_invalid_constants() {
    let constants = SimulationConstants::new(None, Some(2.0), None, None);
    assert_eq!(Simulation::new(Some(constants), None, 0).unwrap_err(), PhysicsError::InvalidCoefficient);
}

#[test]
fn test_advance_rejects_bad_time_step() {
    let mut sim = weightless();
    assert_eq!(sim.step(-0.1), Err(PhysicsError::InvalidTime));
    assert_eq!(sim.step(f64::NAN), Err(PhysicsError::InvalidTime));
    assert_eq!(sim.ticks(), 0);
}

#[test]
fn test_gravity_accelerates_bodies() {
    let mut sim = Simulation::new(None, None, 0).unwrap();
    let index = sim.add_body(Body::new_ball(BodyDescriptor::new(Vector3::zero(), 1.0, 3.0)).unwrap());

    sim.step(0.5).unwrap();

    let body = sim.body(index).unwrap();
    assert_float_eq(body.velocity().y, -9.80665 * 0.5, 1e-12, Some("Free fall is independent of mass"));
    assert_float_eq(sim.elapsed(), 0.5, 1e-12, None);
}

#[test]
fn test_head_on_spheres_swap_velocities() {
    init_logger();
    let mut sim = weightless();
    let left = sim.add_body(elastic_ball(-3.0, 5.0));
    let right = sim.add_body(elastic_ball(3.0, -5.0));

    let mut ticks = 0;
    while sim.body(left).unwrap().position().distance(&sim.body(right).unwrap().position()) > 2.0 {
        assert_eq!(sim.step(0.1).unwrap(), 0);
        ticks += 1;
        assert!(ticks < 100, "Spheres never met");
    }
    assert_eq!(ticks, 4);

    assert_eq!(sim.step(0.1).unwrap(), 1);

    assert_relative_eq!(sim.body(left).unwrap().velocity(), Vector3::new(-5.0, 0.0, 0.0), epsilon = 1e-9);
    assert_relative_eq!(sim.body(right).unwrap().velocity(), Vector3::new(5.0, 0.0, 0.0), epsilon = 1e-9);
}

#[test]
fn test_detection_pass_uses_ascending_pairs() {
    let mut sim = weightless();
    sim.add_body(elastic_ball(0.0, 0.0));
    sim.add_body(elastic_ball(1.0, 0.0));
    sim.add_body(elastic_ball(1.5, 0.0));
    sim.add_body(elastic_ball(40.0, 0.0));

    let pairs: Vec<(usize, usize)> = sim
        .detect_collisions()
        .into_iter()
        .map(|collision| match collision {
            DetectedCollision::Pair { first, second, .. } => (first, second),
            other => panic!("unexpected {:?}", other),
        })
        .collect();

    assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
}

#[test]
fn test_all_contacts_are_seen_before_resolution() {
    let settings = {
        let mut settings = CollisionSettings::default();
        settings.set_pull_apart_mode(PullApartMode::None);
        settings
    };
    let mut sim = Simulation::new(Some(SimulationConstants::weightless()), Some(settings), 0).unwrap();
    sim.add_body(elastic_ball(-1.9, 1.0));
    sim.add_body(elastic_ball(0.0, 0.0));
    sim.add_body(elastic_ball(1.9, -1.0));

    // Both contacts on the middle ball are found against pre-tick positions
    assert_eq!(sim.step(0.01).unwrap(), 2);
    assert_relative_eq!(sim.total_momentum(), Vector3::zero(), epsilon = 1e-12);
}

#[test]
fn test_ball_comes_to_rest_on_static_floor() {
    init_logger();
    let mut sim = Simulation::new(None, None, 3).unwrap();
    sim.add_static_polygon(PolygonTree::from_triangles(vec![
        Triangle::new(Vector3::new(-5.0, 0.0, -5.0), Vector3::new(-5.0, 0.0, 5.0), Vector3::new(5.0, 0.0, 5.0)),
        Triangle::new(Vector3::new(-5.0, 0.0, -5.0), Vector3::new(5.0, 0.0, 5.0), Vector3::new(5.0, 0.0, -5.0)),
    ]));
    let descriptor = BodyDescriptor::new(Vector3::new(0.0, 3.0, 0.0), 0.5, 1.0).with_elasticity(0.5);
    let ball = sim.add_body(Body::new_solid_ball(descriptor).unwrap());

    let contacts = sim.simulate(600, 0.01).unwrap();
    let body = sim.body(ball).unwrap();

    assert!(contacts > 0);
    assert!(body.position().y > 0.4, "Ball sank into the floor: {:?}", body.position());
    assert!(body.position().y < 0.6, "Ball should have settled: {:?}", body.position());
    assert!(body.velocity().magnitude() < 0.2);
}

#[test]
fn test_ball_settles_on_floor_with_force_pull_apart() {
    init_logger();
    let settings = CollisionSettings::new(None, None, None, Some(PullApartMode::Force)).unwrap();
    let mut sim = Simulation::new(None, Some(settings), 3).unwrap();
    sim.add_static_polygon(PolygonTree::from_triangles(vec![
        Triangle::new(Vector3::new(-5.0, 0.0, -5.0), Vector3::new(-5.0, 0.0, 5.0), Vector3::new(5.0, 0.0, 5.0)),
        Triangle::new(Vector3::new(-5.0, 0.0, -5.0), Vector3::new(5.0, 0.0, 5.0), Vector3::new(5.0, 0.0, -5.0)),
    ]));
    let descriptor = BodyDescriptor::new(Vector3::new(0.0, 3.0, 0.0), 0.5, 1.0).with_elasticity(0.0);
    let ball = sim.add_body(Body::new_solid_ball(descriptor).unwrap());

    sim.simulate(1500, 0.01).unwrap();
    let mut highest: f64 = 0.0;
    for _ in 0..500 {
        sim.step(0.01).unwrap();
        highest = highest.max(sim.body(ball).unwrap().position().y);
    }
    let body = sim.body(ball).unwrap();

    assert!(body.position().y > 0.45, "Ball sank into the floor: {:?}", body.position());
    assert!(highest < 0.5, "Ball keeps leaving the floor, reached y = {}", highest);
    assert!(body.velocity().magnitude() < 1e-3, "Ball is still moving: {:?}", body.velocity());
}

#[test]
fn test_elastic_box_conserves_energy() {
    let mut sim = weightless();
    let boundary = Boundary::cube(5.0).unwrap();
    let starts = [
        (Vector3::new(-3.0, 0.0, 0.0), Vector3::new(2.0, 0.5, 0.0)),
        (Vector3::new(3.0, 0.2, 0.0), Vector3::new(-1.5, 0.0, 0.3)),
        (Vector3::new(0.0, 3.0, 1.0), Vector3::new(0.0, -2.0, 0.0)),
    ];
    for (position, velocity) in starts {
        let descriptor = BodyDescriptor::new(position, 0.5, 1.0)
            .with_elasticity(1.0)
            .with_friction(0.0, 0.0)
            .with_boundary(boundary);
        let mut ball = Body::new_ball(descriptor).unwrap();
        ball.set_velocity(velocity);
        sim.add_body(ball);
    }

    let energy = sim.total_kinetic_energy();
    sim.simulate(500, 0.01).unwrap();

    assert_float_eq(sim.total_kinetic_energy(), energy, 1e-9, Some("Elastic walls and collisions keep energy"));
    assert!(sim.bodies().iter().all(|body| boundary.contains(&body.position())));
}

#[test]
fn test_same_seed_reproduces_run() {
    let run = || {
        let mut sim = weightless();
        // Coincident centres force the random tie-break
        sim.add_body(elastic_ball(0.0, 0.0));
        sim.add_body(elastic_ball(0.0, 0.0));
        sim.simulate(5, 0.1).unwrap();
        (sim.body(0).unwrap().position(), sim.body(1).unwrap().position())
    };

    let (first, second) = run();
    assert!(first.is_finite() && second.is_finite());
    assert_eq!(run(), (first, second));
}

#[test]
fn test_forces_reach_bodies_by_index() {
    let mut sim = weightless();
    let index = sim.add_body(Body::new_solid_ball(BodyDescriptor::new(Vector3::zero(), 1.0, 2.0)).unwrap());

    sim.prepare_tick();
    sim.apply_external_force(index, &Vector3::unit_x(), &Vector3::new(0.0, 4.0, 0.0)).unwrap();
    sim.advance(0.5).unwrap();

    let body = sim.body(index).unwrap();
    assert_relative_eq!(body.velocity(), Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    assert!(body.angular_velocity().z > 0.0);

    assert_eq!(
        sim.apply_internal_force(5, &Vector3::zero(), &Vector3::unit_x()),
        Err(PhysicsError::IndexOutOfBounds(5))
    );
}

#[test]
fn test_remove_body_shifts_indices() {
    let mut sim = weightless();
    sim.add_body(elastic_ball(0.0, 0.0));
    sim.add_body(elastic_ball(10.0, 0.0));

    let removed = sim.remove_body(0).unwrap();
    assert_eq!(removed.position().x, 0.0);
    assert_eq!(sim.body(0).unwrap().position().x, 10.0);
    assert_eq!(sim.remove_body(3).unwrap_err(), PhysicsError::IndexOutOfBounds(3));
}
