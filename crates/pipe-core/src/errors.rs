//! Errores del core.
//!
//! Un único enum para todo el motor: los steps devuelven `PipeError` y el
//! pipeline lo propaga sin modificarlo. Las decisiones de `Skippy` (skip,
//! rerun parcial) no son errores; se reportan como eventos.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone, Serialize, Deserialize)]
pub enum PipeError {
    /// Asignación fuera de las opciones válidas (o de tipo incorrecto).
    #[error("validation failed for '{field}': {reason}")]
    Validation { field: String, reason: String },
    /// Operación no soportada por el contenedor/step (p. ej. opciones en un iterable).
    #[error("operation not implemented: {0}")]
    Unimplemented(String),
    /// Fallo leyendo de una fuente externa; se propaga tal cual.
    #[error("extraction failed: {0}")]
    Extraction(String),
    #[error("load failed: {0}")]
    Load(String),
    #[error("missing column '{0}'")]
    MissingColumn(String),
    #[error("column '{column}' has {found} rows, expected {expected}")]
    LengthMismatch { column: String, expected: usize, found: usize },
    #[error("column '{column}': expected {expected}")]
    TypeMismatch { column: String, expected: String },
    #[error("column graph contains a cycle")]
    CyclicDag,
    #[error("invalid step index {0}")]
    InvalidStepIndex(usize),
    #[error("model error: {0}")]
    Model(String),
    #[error("io: {0}")]
    Io(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl PipeError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation { field: field.into(),
                           reason: reason.into() }
    }

    /// `true` para errores de configuración que el usuario puede corregir.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl From<std::io::Error> for PipeError {
    fn from(e: std::io::Error) -> Self {
        PipeError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for PipeError {
    fn from(e: serde_json::Error) -> Self {
        PipeError::Internal(format!("serde_json: {e}"))
    }
}
