mod body;
mod body_integration;

pub use body::*;
