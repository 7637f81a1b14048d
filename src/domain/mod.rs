// Domain layer: core models, ports and the ranking rules. No I/O here.

pub mod model;
pub mod ports;
pub mod ranking;
