//! Definiciones relacionadas a Steps.
//!
//! Un Step es una unidad de transformación del dataset con bindings de
//! columnas por rol y parámetros. Este módulo define:
//! - `Step`: contrato usado por el pipeline (fit / transform / columnas / dag).
//! - `StepConfig`: bindings de columnas y parámetros con escritura validada.
//! - `naming`: reglas de naming de columnas derivadas y expansión de iterables.

pub mod config;
pub mod definition;
pub mod naming;

pub use config::StepConfig;
pub use definition::{Step, StepKind};
pub use naming::{derived_name, expand, ColumnBinding};
