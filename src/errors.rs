//! Errores de la aplicación (CLI / demo).
//!
//! Envuelve `PipeError` distinguiendo un pipeline rechazado al construirlo
//! (bindings inválidos, ciclos) de un fallo durante la corrida.

use pipe_core::PipeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Uso inválido: {0}")]
    Usage(String),
    #[error("Pipeline rechazado: {0}")]
    Rejected(PipeError),
    #[error("Error de ejecución: {0}")]
    Run(PipeError),
}

impl AppError {
    /// Código de salida del binario.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Usage(_) => 2,
            AppError::Rejected(_) => 4,
            AppError::Run(_) => 5,
        }
    }
}

impl From<PipeError> for AppError {
    fn from(e: PipeError) -> Self {
        match e {
            PipeError::Validation { .. } | PipeError::CyclicDag => AppError::Rejected(e),
            other => AppError::Run(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_rejections() {
        let err: AppError = PipeError::validation("Step.x", "missing").into();
        assert_eq!(err.exit_code(), 4);
        let err: AppError = PipeError::CyclicDag.into();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn other_errors_are_run_failures() {
        let err: AppError = PipeError::MissingColumn("a".into()).into();
        assert_eq!(err.exit_code(), 5);
        assert_eq!(err.to_string(), "Error de ejecución: missing column 'a'");
        assert_eq!(AppError::Usage("x".into()).exit_code(), 2);
    }
}
