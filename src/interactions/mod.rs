mod collision_detection_3d;
mod collision_response_3d;
mod collision_handler;

pub use collision_detection_3d::*;
pub use collision_response_3d::*;
pub use collision_handler::*;

#[cfg(test)]
mod collision_detection_3d_tests;
