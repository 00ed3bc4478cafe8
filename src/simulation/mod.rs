mod body_simulation;

pub use body_simulation::*;

#[cfg(test)]
mod body_simulation_tests;
