//! Colaborador tabular mínimo que necesita el motor.
//!
//! - `Value`: celda tipada con marcador explícito de ausencia (`Missing`).
//! - `DataFrame`: columnas ordenadas por nombre, todas de igual longitud.
//!
//! Las filas se identifican por posición; no hay índice de etiquetas.

pub mod dataframe;
pub mod value;

pub use dataframe::DataFrame;
pub use value::{Value, ValueType};
