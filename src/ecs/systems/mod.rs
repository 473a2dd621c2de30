//! ECS systems (transform propagation).

pub mod transform;

pub use transform::transform_system;
