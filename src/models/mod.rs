mod coordinates;
mod vector3;
mod quaternion;
mod matrix3;
mod point_mass;
mod boundary;
mod triangle;
mod polygon;

pub use coordinates::*;
pub use vector3::*;
pub use quaternion::*;
pub use matrix3::*;
pub use point_mass::*;
pub use boundary::*;
pub use triangle::*;
pub use polygon::*;

#[cfg(test)]
mod quaternion_tests;
#[cfg(test)]
mod geometry_tests;
