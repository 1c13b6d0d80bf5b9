//! Configuración del motor desde variables de entorno.
//! Usa la convención `PIPEFLOW_*`; el archivo `.env` se carga una sola vez.

use std::env;

use dotenvy::dotenv;
use log::warn;
use once_cell::sync::Lazy;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

/// Variable de entorno del umbral de rerun completo.
pub const FULL_RERUN_THRESHOLD_VAR: &str = "PIPEFLOW_FULL_RERUN_THRESHOLD";

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Proporción (0, 1] de columnas cambiadas a partir de la cual `Skippy`
    /// abandona el rerun parcial y recalcula todo. `1.0` = sólo cuando
    /// cambiaron todas las columnas comparadas.
    pub full_rerun_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { full_rerun_threshold: 1.0 }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let mut cfg = Self::default();
        if let Ok(raw) = env::var(FULL_RERUN_THRESHOLD_VAR) {
            match parse_threshold(&raw) {
                Some(t) => cfg.full_rerun_threshold = t,
                None => warn!("{FULL_RERUN_THRESHOLD_VAR}={raw:?} fuera de (0, 1]; se usa {}",
                              cfg.full_rerun_threshold),
            }
        }
        cfg
    }

    /// Umbral explícito (se ignora si está fuera de (0, 1]).
    pub fn with_full_rerun_threshold(mut self, threshold: f64) -> Self {
        if threshold > 0.0 && threshold <= 1.0 {
            self.full_rerun_threshold = threshold;
        }
        self
    }

    /// `true` si `changed` de `total` columnas justifica un rerun completo.
    pub fn is_full_rerun(&self, changed: usize, total: usize) -> bool {
        total > 0 && changed as f64 >= self.full_rerun_threshold * total as f64
    }
}

fn parse_threshold(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|t| *t > 0.0 && *t <= 1.0)
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
