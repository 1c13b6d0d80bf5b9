//! Steps concretos agrupados por tipo (`StepKind`).

pub mod extract;
pub mod load;
pub mod model;
pub mod transform;
