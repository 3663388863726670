// Domain layer: value types and the seams to external systems.

pub mod model;
pub mod ports;
