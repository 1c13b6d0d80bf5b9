//! Pipeline: composición ordenada de steps sobre un dataset acumulado.
//!
//! - `availability`: función pura (steps, columnas semilla) → columnas
//!   disponibles por step.
//! - `core`: `Pipeline` (construcción, DAG agregado, fit / transform / run).

pub mod availability;
pub mod core;

pub use self::availability::{available_columns, check_bindings};
pub use self::core::Pipeline;
