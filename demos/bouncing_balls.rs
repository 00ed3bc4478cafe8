// demos/bouncing_balls.rs

use log::info;
use rs_rigid_body::bodies::{Body, BodyDescriptor};
use rs_rigid_body::errors::PhysicsError;
use rs_rigid_body::models::{PolygonTree, Triangle, Vector3};
use rs_rigid_body::simulation::Simulation;
use rs_rigid_body::utils::SimulationConstants;

fn floor(half_extent: f64) -> PolygonTree {
    let a = Vector3::new(-half_extent, 0.0, -half_extent);
    let b = Vector3::new(half_extent, 0.0, -half_extent);
    let c = Vector3::new(half_extent, 0.0, half_extent);
    let d = Vector3::new(-half_extent, 0.0, half_extent);
    // Wound so the face normals point up
    PolygonTree::from_triangles(vec![Triangle::new(a, c, b), Triangle::new(a, d, c)])
}

fn main() -> Result<(), PhysicsError> {
    env_logger::init();

    let constants = SimulationConstants::new(None, Some(0.8), None, None);
    let mut sim = Simulation::new(Some(constants), None, 42)?;
    sim.add_static_polygon(floor(20.0));

    // Two plain balls and one spinning solid ball dropped from different heights
    for (index, height) in [4.0, 6.0, 8.0].into_iter().enumerate() {
        let descriptor = BodyDescriptor::new(Vector3::new(index as f64 * 3.0 - 3.0, height, 0.0), 0.5, 1.0)
            .resolve_coefficients(sim.constants());
        let body = if index == 2 {
            Body::new_solid_ball(descriptor)?
        } else {
            Body::new_ball(descriptor)?
        };
        sim.add_body(body);
    }

    // A dumbbell thrown sideways into the others
    let mut dumbbell = Body::new_rigid_body(
        BodyDescriptor::new(Vector3::new(8.0, 3.0, 0.0), 0.5, 0.0).resolve_coefficients(sim.constants()),
    )?;
    dumbbell.add_point_mass(0.0, 0.5, 0.0, 0.5)?;
    dumbbell.add_point_mass(0.0, -0.5, 0.0, 0.5)?;
    dumbbell.set_velocity(Vector3::new(-4.0, 0.0, 0.0));
    sim.add_body(dumbbell);

    let dt = 0.01;
    for second in 0..5 {
        let contacts = sim.simulate(100, dt)?;
        info!("t = {}s, {} contacts resolved this second", second + 1, contacts);
        for (index, body) in sim.bodies().iter().enumerate() {
            info!("  body {}: position {:?}, velocity {:?}", index, body.position(), body.velocity());
        }
        println!(
            "t = {:.1}s  kinetic energy = {:.3} J  momentum = {:?}",
            sim.elapsed(),
            sim.total_kinetic_energy(),
            sim.total_momentum()
        );
    }

    Ok(())
}
