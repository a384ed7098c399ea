// Domain layer: models and ports (interfaces). No HTTP or filesystem code here.

pub mod chart;
pub mod model;
pub mod ports;
pub mod table;
