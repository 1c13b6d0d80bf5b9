//! Steps de carga: consumen todas las columnas disponibles aguas arriba, no
//! producen columnas y devuelven el dataset intacto tras escribirlo.

use std::fmt::Debug;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::info;
use pipe_core::{DataFrame, PipeError, Step, StepConfig, StepKind};
use serde_json::{json, Value as Json};

/// Destino de un `Load`.
pub trait LoadTarget: Debug + Send {
    fn name(&self) -> &str;

    fn write(&self, df: &DataFrame) -> Result<(), PipeError>;
}

/// Acumula en memoria cada dataset cargado.
#[derive(Debug, Clone, Default)]
pub struct MemoryTarget {
    frames: Arc<Mutex<Vec<DataFrame>>>,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copia de los datasets recibidos hasta ahora.
    pub fn frames(&self) -> Vec<DataFrame> {
        self.frames.lock().map(|f| f.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<DataFrame> {
        self.frames.lock().ok().and_then(|f| f.last().cloned())
    }
}

impl LoadTarget for MemoryTarget {
    fn name(&self) -> &str {
        "memory"
    }

    fn write(&self, df: &DataFrame) -> Result<(), PipeError> {
        self.frames
            .lock()
            .map_err(|e| PipeError::Load(format!("memory target poisoned: {e}")))?
            .push(df.clone());
        Ok(())
    }
}

/// Exporta el dataset como arreglo JSON de registros (una entrada por fila).
#[derive(Debug, Clone)]
pub struct JsonFileTarget {
    path: PathBuf,
}

impl JsonFileTarget {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LoadTarget for JsonFileTarget {
    fn name(&self) -> &str {
        "json_file"
    }

    fn write(&self, df: &DataFrame) -> Result<(), PipeError> {
        let file = File::create(&self.path).map_err(|e| PipeError::Load(format!("{}: {e}", self.path.display())))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &df.to_records())
            .map_err(|e| PipeError::Load(format!("{}: {e}", self.path.display())))?;
        info!("exported {} rows to {}", df.n_rows(), self.path.display());
        Ok(())
    }
}

#[derive(Debug)]
pub struct Load<T>
    where T: LoadTarget
{
    config: StepConfig,
    available: Vec<String>,
    target: T,
}

impl<T> Load<T> where T: LoadTarget
{
    pub fn new(target: T) -> Self {
        Self { config: StepConfig::new(),
               available: Vec::new(),
               target }
    }

    pub fn target(&self) -> &T {
        &self.target
    }
}

impl<T> Step for Load<T> where T: LoadTarget
{
    fn name(&self) -> &str {
        "Load"
    }

    fn kind(&self) -> StepKind {
        StepKind::Load
    }

    fn config(&self) -> &StepConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut StepConfig {
        &mut self.config
    }

    fn columns_in(&self) -> Vec<String> {
        self.available.clone()
    }

    fn columns_out(&self) -> Vec<String> {
        Vec::new()
    }

    fn update_available_columns(&mut self, columns: &[String]) -> Result<(), PipeError> {
        self.available = columns.to_vec();
        Ok(())
    }

    fn transform(&self, df: DataFrame) -> Result<DataFrame, PipeError> {
        self.target.write(&df)?;
        Ok(df)
    }

    fn definition(&self) -> Json {
        json!({
            "name": self.name(),
            "kind": self.kind(),
            "target": self.target.name(),
        })
    }
}
