// Domain layer: record schemas, cleaning results and ports (interfaces).

pub mod model;
pub mod ports;
