//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable (`CONFIG`).
use std::env;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use pipe_core::config::{init_dotenv, EngineConfig};

/// Filtro de logging (sintaxis `EnvFilter`).
pub const LOG_VAR: &str = "PIPEFLOW_LOG";
/// Destino por defecto del export JSON de `pipeflow etl`.
pub const EXPORT_PATH_VAR: &str = "PIPEFLOW_EXPORT_PATH";

const DEFAULT_LOG_FILTER: &str = "info";

/// Configuración global de la aplicación.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Configuración del motor incremental.
    pub engine: EngineConfig,
    pub log_filter: String,
    /// `None` = el load de la demo queda en memoria.
    pub export_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        init_dotenv();
        let log_filter = env::var(LOG_VAR).ok()
                                          .filter(|v| !v.trim().is_empty())
                                          .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let export_path = env::var(EXPORT_PATH_VAR).ok()
                                                   .filter(|v| !v.trim().is_empty())
                                                   .map(PathBuf::from);
        Self { engine: EngineConfig::from_env(),
               log_filter,
               export_path }
    }
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);
