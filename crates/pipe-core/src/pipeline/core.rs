//! Core Pipeline implementation

use log::debug;
use serde_json::json;
use uuid::Uuid;

use super::availability::{available_columns, check_bindings};
use crate::constants::ENGINE_VERSION;
use crate::dag::ColumnDag;
use crate::errors::PipeError;
use crate::frame::DataFrame;
use crate::hashing::hash_value;
use crate::step::Step;

/// Composición ordenada de steps.
///
/// Mantiene el dataset acumulado de la última corrida exitosa y el DAG
/// agregado (unión de los fragmentos de cada step). El dataset retenido sólo
/// se reasigna cuando la cadena completa terminó sin error.
#[derive(Debug)]
pub struct Pipeline {
    id: Uuid,
    steps: Vec<Box<dyn Step>>,
    dag: ColumnDag,
    df: DataFrame,
    seed_columns: Vec<String>,
}

impl Pipeline {
    /// Pipeline sin dataset previo: el primer step debe aportar las columnas.
    pub fn new(steps: Vec<Box<dyn Step>>) -> Result<Self, PipeError> {
        Self::with_dataset(steps, DataFrame::new())
    }

    /// Pipeline sobre un dataset precursor; sus columnas quedan disponibles
    /// para todos los steps.
    pub fn with_dataset(steps: Vec<Box<dyn Step>>, df: DataFrame) -> Result<Self, PipeError> {
        let mut pipeline = Self { id: Uuid::new_v4(),
                                  seed_columns: df.column_names(),
                                  steps,
                                  dag: ColumnDag::new(),
                                  df };
        pipeline.refresh()?;
        Ok(pipeline)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn steps(&self) -> &[Box<dyn Step>] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&dyn Step> {
        self.steps.get(index).map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// DAG agregado (lectura; p. ej. para visualización).
    pub fn dag(&self) -> &ColumnDag {
        &self.dag
    }

    /// Dataset retenido de la última corrida.
    pub fn dataset(&self) -> &DataFrame {
        &self.df
    }

    pub fn dataset_mut(&mut self) -> &mut DataFrame {
        &mut self.df
    }

    pub fn set_dataset(&mut self, df: DataFrame) {
        self.df = df;
    }

    /// Columnas seleccionables por cada step (semilla ∪ salidas previas).
    pub fn available_columns(&self) -> Vec<Vec<String>> {
        available_columns(&self.steps, &self.seed_columns)
    }

    /// Recalcula opciones de columnas, valida bindings y reconstruye el DAG.
    pub fn refresh(&mut self) -> Result<(), PipeError> {
        let pools = available_columns(&self.steps, &self.seed_columns);
        for (step, pool) in self.steps.iter_mut().zip(&pools) {
            step.update_available_columns(pool)?;
        }
        check_bindings(&self.steps, &pools)?;

        let mut dag = ColumnDag::new();
        for step in &self.steps {
            dag.extend(&step.dag());
        }
        if !dag.is_acyclic() {
            return Err(PipeError::CyclicDag);
        }
        self.dag = dag;
        Ok(())
    }

    /// Aplica una edición a un step y re-propaga. Si la edición o la
    /// propagación fallan, la configuración previa del step se restaura.
    pub fn edit_step<F>(&mut self, index: usize, edit: F) -> Result<(), PipeError>
        where F: FnOnce(&mut dyn Step) -> Result<(), PipeError>
    {
        let step = self.steps.get_mut(index).ok_or(PipeError::InvalidStepIndex(index))?;
        let before = step.config().clone();
        let result = edit(step.as_mut()).and_then(|_| self.refresh());
        if let Err(e) = result {
            *self.steps[index].config_mut() = before;
            self.refresh()?;
            return Err(e);
        }
        Ok(())
    }

    /// Añade un step al final; si sus bindings no son válidos no se añade.
    pub fn push_step(&mut self, step: Box<dyn Step>) -> Result<(), PipeError> {
        self.steps.push(step);
        if let Err(e) = self.refresh() {
            self.steps.pop();
            self.refresh()?;
            return Err(e);
        }
        Ok(())
    }

    /// Hash determinista de la definición (versión del motor + steps).
    pub fn definition_hash(&self) -> String {
        let steps: Vec<serde_json::Value> = self.steps.iter().map(|s| s.definition()).collect();
        hash_value(&json!({ "engine_version": ENGINE_VERSION, "steps": steps }))
    }

    /// `fit` de cada step contra el dataset original (no el acumulado).
    pub fn fit(&mut self, df: &DataFrame) -> Result<(), PipeError> {
        for step in self.steps.iter_mut() {
            step.fit(df)?;
        }
        Ok(())
    }

    /// `transform` encadenado de todos los steps.
    pub fn transform(&self, df: DataFrame) -> Result<DataFrame, PipeError> {
        let mut acc = df;
        for step in &self.steps {
            acc = step.transform(acc)?;
        }
        Ok(acc)
    }

    /// `fit` + `transform` por step sobre el dataset acumulado; retiene el
    /// resultado final.
    pub fn fit_transform(&mut self, df: DataFrame) -> Result<DataFrame, PipeError> {
        let all: Vec<usize> = (0..self.steps.len()).collect();
        let out = self.fit_transform_steps(&all, df)?;
        self.df = out.clone();
        Ok(out)
    }

    /// `fit_transform` sobre el propio dataset retenido.
    pub fn run(&mut self) -> Result<DataFrame, PipeError> {
        let df = self.df.clone();
        self.fit_transform(df)
    }

    /// Ejecuta sólo los steps indicados (en orden declarado) sin tocar el
    /// dataset retenido.
    pub(crate) fn fit_transform_steps(&mut self, indices: &[usize], df: DataFrame) -> Result<DataFrame, PipeError> {
        let mut acc = df;
        for &i in indices {
            let step = self.steps.get_mut(i).ok_or(PipeError::InvalidStepIndex(i))?;
            debug!("step {i} ({}) fit_transform over {} columns", step.name(), acc.n_cols());
            acc = step.fit_transform(acc)?;
        }
        Ok(acc)
    }
}
