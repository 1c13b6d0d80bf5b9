//! Motor de recomputación incremental.
//!
//! `Skippy` envuelve un `Pipeline` y decide en cada corrida entre:
//! - baseline (primera corrida: todo se ejecuta y se registran hashes),
//! - skip (ningún hash de columna cambió),
//! - rerun parcial (sólo los steps alcanzados por el conjunto a recomputar),
//! - rerun completo (umbral de cambios alcanzado o definición modificada).
//!
//! Cada decisión queda registrada en el `EventStore`.

pub mod baseline;
pub mod engine;

pub use baseline::{HashBaseline, HashDiff};
pub use engine::{RunDecision, Skippy};
