//! Steps de extracción: sin columnas de entrada, salidas fijas.
//!
//! El frame extraído se concatena horizontalmente al dataset recibido; las
//! columnas homónimas se reemplazan en su posición.

use std::fmt;

use log::debug;
use pipe_core::dag::ColumnDag;
use pipe_core::{DataFrame, PipeError, Step, StepConfig, StepKind};

/// Nodos aislados: una columna nativa no depende de nada.
fn source_dag(columns: &[String]) -> ColumnDag {
    let mut dag = ColumnDag::new();
    for c in columns {
        dag.ensure_node(c);
    }
    dag
}

/// Extracción de un frame en memoria (p. ej. un dataset de demo).
#[derive(Debug, Clone)]
pub struct FrameExtract {
    name: String,
    config: StepConfig,
    frame: DataFrame,
}

impl FrameExtract {
    pub fn new(name: impl Into<String>, frame: DataFrame) -> Self {
        Self { name: name.into(),
               config: StepConfig::new(),
               frame }
    }
}

impl Step for FrameExtract {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StepKind {
        StepKind::Extract
    }

    fn config(&self) -> &StepConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut StepConfig {
        &mut self.config
    }

    fn columns_in(&self) -> Vec<String> {
        Vec::new()
    }

    fn columns_out(&self) -> Vec<String> {
        self.frame.column_names()
    }

    fn dag(&self) -> ColumnDag {
        source_dag(&self.columns_out())
    }

    fn transform(&self, df: DataFrame) -> Result<DataFrame, PipeError> {
        debug!("{}: extracting {} rows", self.name, self.frame.n_rows());
        df.hstack(self.frame.clone())
    }
}

/// Extracción desde una función (lectura de archivo, query, generador...).
/// Las columnas declaradas son el contrato: si la función no las entrega,
/// falla con `Extraction`.
pub struct FnExtract<F>
    where F: Fn() -> Result<DataFrame, PipeError> + Send
{
    name: String,
    config: StepConfig,
    columns: Vec<String>,
    extract: F,
}

impl<F> FnExtract<F> where F: Fn() -> Result<DataFrame, PipeError> + Send
{
    pub fn new<S: Into<String>>(name: impl Into<String>, columns: impl IntoIterator<Item = S>, extract: F) -> Self {
        Self { name: name.into(),
               config: StepConfig::new(),
               columns: columns.into_iter().map(Into::into).collect(),
               extract }
    }
}

impl<F> fmt::Debug for FnExtract<F> where F: Fn() -> Result<DataFrame, PipeError> + Send
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnExtract")
         .field("name", &self.name)
         .field("columns", &self.columns)
         .finish()
    }
}

impl<F> Step for FnExtract<F> where F: Fn() -> Result<DataFrame, PipeError> + Send
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StepKind {
        StepKind::Extract
    }

    fn config(&self) -> &StepConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut StepConfig {
        &mut self.config
    }

    fn columns_in(&self) -> Vec<String> {
        Vec::new()
    }

    fn columns_out(&self) -> Vec<String> {
        self.columns.clone()
    }

    fn dag(&self) -> ColumnDag {
        source_dag(&self.columns)
    }

    fn transform(&self, df: DataFrame) -> Result<DataFrame, PipeError> {
        let extracted = (self.extract)().map_err(|e| match e {
                                             PipeError::Extraction(_) => e,
                                             other => PipeError::Extraction(format!("{}: {other}", self.name)),
                                         })?;
        if let Some(missing) = self.columns.iter().find(|c| !extracted.contains(c)) {
            return Err(PipeError::Extraction(format!("{}: declared column '{missing}' was not extracted", self.name)));
        }
        df.hstack(extracted.select(&self.columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipe_core::Value;

    fn frame() -> DataFrame {
        DataFrame::from_columns([("x", vec![Value::Int(1), Value::Int(2)])]).unwrap()
    }

    #[test]
    fn frame_extract_has_no_inputs_and_isolated_nodes() {
        let step = FrameExtract::new("Dummy", frame());
        assert!(step.columns_in().is_empty());
        assert_eq!(step.columns_out(), vec!["x"]);
        let dag = step.dag();
        assert!(dag.contains("x"));
        assert!(dag.edges().is_empty());
        assert_eq!(step.transform(DataFrame::new()).unwrap(), frame());
    }

    #[test]
    fn fn_extract_checks_declared_columns() {
        let ok = FnExtract::new("Gen", ["x"], || Ok(frame()));
        assert_eq!(ok.transform(DataFrame::new()).unwrap().column_names(), vec!["x"]);

        let bad = FnExtract::new("Gen", ["x", "y"], || Ok(frame()));
        assert!(matches!(bad.transform(DataFrame::new()), Err(PipeError::Extraction(_))));

        let failing = FnExtract::new("Io", ["x"], || Err(PipeError::Io("disk".into())));
        assert!(matches!(failing.transform(DataFrame::new()), Err(PipeError::Extraction(m)) if m.contains("disk")));
    }
}
