#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pipe_core::dag::ColumnDag;
use pipe_core::frame::{DataFrame, Value, ValueType};
use pipe_core::params::Param;
use pipe_core::{ColumnBinding, PipeError, Step, StepConfig, StepKind};

pub fn ints(v: &[i64]) -> Vec<Value> {
    v.iter().copied().map(Value::Int).collect()
}

pub fn floats(v: &[f64]) -> Vec<Value> {
    v.iter().copied().map(Value::Float).collect()
}

pub fn frame_ab() -> DataFrame {
    DataFrame::from_columns([("a", ints(&[1, 2, 3])), ("b", ints(&[10, 20, 30]))]).unwrap()
}

/// Extract de prueba: aporta un frame fijo.
#[derive(Debug)]
pub struct Seed {
    config: StepConfig,
    frame: DataFrame,
}

impl Seed {
    pub fn new(frame: DataFrame) -> Self {
        Self { config: StepConfig::new(),
               frame }
    }
}

impl Step for Seed {
    fn name(&self) -> &str {
        "Seed"
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
        let mut dag = ColumnDag::new();
        for c in self.frame.column_names() {
            dag.ensure_node(&c);
        }
        dag
    }

    fn transform(&self, df: DataFrame) -> Result<DataFrame, PipeError> {
        df.hstack(self.frame.clone())
    }
}

/// Transform de prueba: `out = in + by`, con `by` iterable opcional. Cuenta
/// cuántas veces se ejecutó `transform` y guarda las columnas vistas en
/// cada `fit` (que exige sus inputs).
#[derive(Debug)]
pub struct Shift {
    name: String,
    config: StepConfig,
    pub calls: Arc<AtomicUsize>,
    pub fitted_on: Arc<Mutex<Vec<Vec<String>>>>,
}

impl Shift {
    pub fn new(name: &str, inputs: &[&str], by: &[i64]) -> Self {
        let mut config = StepConfig::new().with_column("in", Param::multi_select(inputs.iter().copied()));
        if !by.is_empty() {
            config = config.with_param("by", Param::iterable(by.iter().copied(), ValueType::Int));
        }
        Self { name: name.to_string(),
               config,
               calls: Arc::new(AtomicUsize::new(0)),
               fitted_on: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    pub fn fitted_on(&self) -> Arc<Mutex<Vec<Vec<String>>>> {
        Arc::clone(&self.fitted_on)
    }
}

impl Step for Shift {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StepKind {
        StepKind::Transform
    }

    fn config(&self) -> &StepConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut StepConfig {
        &mut self.config
    }

    fn fit(&mut self, df: &DataFrame) -> Result<(), PipeError> {
        for column in self.columns_in() {
            df.require(&column)?;
        }
        self.fitted_on.lock().map_err(|e| PipeError::Internal(e.to_string()))?.push(df.column_names());
        Ok(())
    }

    fn transform(&self, mut df: DataFrame) -> Result<DataFrame, PipeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        for b in self.bindings() {
            let by = b.params.get("by").and_then(Value::as_f64).unwrap_or(0.0);
            let values = df.require(&b.source)?
                           .iter()
                           .map(|v| v.as_f64().map(|x| Value::from_f64(x + by)).unwrap_or(Value::Missing))
                           .collect();
            df.insert_column(b.output, values)?;
        }
        Ok(df)
    }
}

/// Copia `in` sobre una columna de nombre fijo, aunque ya exista aguas arriba.
#[derive(Debug)]
pub struct Feedback {
    config: StepConfig,
    to: String,
}

impl Feedback {
    pub fn new(from: &str, to: &str) -> Self {
        Self { config: StepConfig::new().with_column("in", Param::option(from)),
               to: to.to_string() }
    }
}

impl Step for Feedback {
    fn name(&self) -> &str {
        "Feedback"
    }

    fn kind(&self) -> StepKind {
        StepKind::Transform
    }

    fn config(&self) -> &StepConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut StepConfig {
        &mut self.config
    }

    fn bindings(&self) -> Vec<ColumnBinding> {
        self.columns_in()
            .into_iter()
            .map(|source| ColumnBinding { source,
                                          params: BTreeMap::new(),
                                          output: self.to.clone() })
            .collect()
    }

    fn transform(&self, mut df: DataFrame) -> Result<DataFrame, PipeError> {
        for b in self.bindings() {
            let values = df.require(&b.source)?.to_vec();
            df.insert_column(b.output, values)?;
        }
        Ok(df)
    }
}

/// Load de prueba: registra el número de columnas recibidas.
#[derive(Debug, Default)]
pub struct Collect {
    config: StepConfig,
    available: Vec<String>,
    pub seen: Arc<Mutex<Vec<usize>>>,
}

impl Step for Collect {
    fn name(&self) -> &str {
        "Collect"
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

    fn update_available_columns(&mut self, columns: &[String]) -> Result<(), PipeError> {
        self.available = columns.to_vec();
        Ok(())
    }

    fn transform(&self, df: DataFrame) -> Result<DataFrame, PipeError> {
        self.seen.lock().map_err(|e| PipeError::Load(e.to_string()))?.push(df.n_cols());
        Ok(df)
    }
}
