use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::assert_float_eq;
use crate::models::{Quaternion, Vector3};
use std::f64::consts::{FRAC_PI_2, PI};

fn random_unit_quaternion(rng: &mut StdRng) -> Quaternion {
    let axis = Vector3::random_unit(rng);
    Quaternion::from_axis_angle(&axis, rng.random_range(-PI..PI))
}

#[test]
fn test_identity() {
    let q = Quaternion::identity();
    assert_eq!(q, Quaternion::new(0.0, 0.0, 0.0, 1.0));
    assert!(q.is_identity(1e-12));
    assert_eq!(q.rotate(&Vector3::new(1.0, 2.0, 3.0), true), Vector3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_from_axis_angle_components() {
    let q = Quaternion::from_axis_angle(&Vector3::new(0.0, 0.0, 2.0), PI);
    assert_float_eq(q.w, 0.0, 1e-12, None);
    assert_float_eq(q.z, 1.0, 1e-12, Some("Axis is normalized before scaling"));

    assert!(Quaternion::from_axis_angle(&Vector3::zero(), 1.0).is_identity(1e-12));
}

#[test]
fn test_unit_quaternion_closure() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..200 {
        let a = random_unit_quaternion(&mut rng);
        let b = random_unit_quaternion(&mut rng);
        assert_float_eq(a.multiply(&b).magnitude(), 1.0, 1e-9, None);
    }
}

#[test]
fn test_multiply_applies_right_operand_first() {
    let about_z = Quaternion::from_axis_angle(&Vector3::unit_z(), FRAC_PI_2);
    let about_x = Quaternion::from_axis_angle(&Vector3::unit_x(), FRAC_PI_2);

    // x --(z)--> y --(x)--> z
    let composed = about_x.multiply(&about_z);
    assert_relative_eq!(composed.rotate(&Vector3::unit_x(), true), Vector3::unit_z(), epsilon = 1e-12);

    // x --(x)--> x --(z)--> y
    let reversed = about_z.multiply(&about_x);
    assert_relative_eq!(reversed.rotate(&Vector3::unit_x(), true), Vector3::unit_y(), epsilon = 1e-12);
}

#[test]
fn test_rotation_round_trip() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..200 {
        let q = random_unit_quaternion(&mut rng);
        let v = Vector3::new(
            rng.random_range(-10.0..10.0),
            rng.random_range(-10.0..10.0),
            rng.random_range(-10.0..10.0),
        );

        let back = q.inverse().rotate(&q.rotate(&v, true), true);
        assert_relative_eq!(back, v, epsilon = 1e-9);
        assert_relative_eq!(q.rotate_reverse(&q.rotate(&v, true), true), v, epsilon = 1e-9);
    }
}

#[test]
fn test_rotate_non_unit_without_flag() {
    let q = Quaternion::from_axis_angle(&Vector3::unit_z(), FRAC_PI_2);
    let scaled = Quaternion::new(q.x * 3.0, q.y * 3.0, q.z * 3.0, q.w * 3.0);

    assert_relative_eq!(scaled.rotate(&Vector3::unit_x(), false), Vector3::unit_y(), epsilon = 1e-12);
    // Claiming unit length for a non-unit quaternion scales the result by |q|²
    assert_relative_eq!(scaled.rotate(&Vector3::unit_x(), true), Vector3::unit_y() * 9.0, epsilon = 1e-9);
}

#[test]
fn test_axis_and_angle() {
    let q = Quaternion::from_axis_angle(&Vector3::new(1.0, 1.0, 0.0), 0.8);
    assert_float_eq(q.angle(), 0.8, 1e-12, None);
    assert_relative_eq!(q.axis(), Vector3::new(1.0, 1.0, 0.0).normalized(), epsilon = 1e-12);
}

#[test]
fn test_store_new_values() {
    let mut q = Quaternion::identity();
    q.store_new_values(0.0, 1.0, 0.0, 0.0);
    assert_eq!(q, Quaternion::new(0.0, 1.0, 0.0, 0.0));
}

#[test]
fn test_get_angle_around_axis() {
    let reference = Vector3::new(1.0, 0.0, 1.0);
    let target = Vector3::new(0.0, 2.0, 0.0);
    let q = Quaternion::get_angle_around_axis(&reference, &target);

    let rotated = q.rotate(&reference, true);
    assert_relative_eq!(rotated.normalized(), target.normalized(), epsilon = 1e-12);

    let opposite = Quaternion::get_angle_around_axis(&Vector3::unit_x(), &Vector3::new(-2.0, 0.0, 0.0));
    assert_relative_eq!(opposite.rotate(&Vector3::unit_x(), true), Vector3::new(-1.0, 0.0, 0.0), epsilon = 1e-12);
}

#[test]
fn test_matrix_round_trip() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..100 {
        let q = random_unit_quaternion(&mut rng);
        let back = Quaternion::from_matrix(&q.to_matrix());

        // q and -q describe the same rotation
        let aligned = if back.dot(&q) < 0.0 {
            Quaternion::new(-back.x, -back.y, -back.z, -back.w)
        } else {
            back
        };
        assert_relative_eq!(aligned, q, epsilon = 1e-9);
    }
}

#[test]
fn test_matrix_rotates_like_quaternion() {
    let q = Quaternion::from_axis_angle(&Vector3::new(0.2, -1.0, 0.5), 1.3);
    let v = Vector3::new(0.4, 2.0, -1.0);
    assert_relative_eq!(q.to_matrix().multiply_vector(&v), q.rotate(&v, true), epsilon = 1e-12);
}

#[test]
fn test_repairs_remove_drift() {
    let step = Quaternion::from_axis_angle(&Vector3::new(0.3, 0.4, 0.5), 0.01);
    let mut drifting = Quaternion::identity();
    for _ in 0..1000 {
        drifting = step.multiply(&drifting);
    }
    let scaled = Quaternion::new(drifting.x * 1.01, drifting.y * 1.01, drifting.z * 1.01, drifting.w * 1.01);

    let mut renormalized = scaled;
    renormalized.become_unit_quaternion();
    assert!(renormalized.is_unit(1e-12));

    let mut orthonormalized = scaled;
    orthonormalized.become_orthonormalized();
    assert!(orthonormalized.is_unit(1e-12));
    assert!(orthonormalized.dot(&drifting) > 0.0, "Sign stays continuous");
    assert_relative_eq!(orthonormalized, drifting.normalized(), epsilon = 1e-9);
}
