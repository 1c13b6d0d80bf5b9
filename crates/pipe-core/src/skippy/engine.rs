use std::collections::HashSet;

use indexmap::IndexSet;
use log::{debug, info};

use super::baseline::HashBaseline;
use crate::config::EngineConfig;
use crate::errors::PipeError;
use crate::event::{EventStore, FullRerunReason, InMemoryEventStore, RunEvent, RunEventKind};
use crate::frame::DataFrame;
use crate::pipeline::Pipeline;
use crate::step::StepKind;

/// Decisión tomada en la última corrida.
#[derive(Debug, Clone, PartialEq)]
pub enum RunDecision {
    Baseline,
    Skipped,
    Partial { changed: Vec<String>, recompute: Vec<String> },
    Full { changed: Vec<String>, reason: FullRerunReason },
}

/// Ejecutor incremental sobre un `Pipeline`.
///
/// Compara hashes de contenido por columna (restringidos a los nodos del DAG)
/// contra el baseline y recalcula únicamente lo alcanzado por los cambios.
/// El dataset retenido y el baseline se confirman sólo si la corrida
/// termina sin error.
#[derive(Debug)]
pub struct Skippy<E = InMemoryEventStore>
    where E: EventStore
{
    pipeline: Pipeline,
    config: EngineConfig,
    baseline: HashBaseline,
    events: E,
    last_decision: Option<RunDecision>,
    // columnas producidas por los steps en la última corrida completa
    outputs: IndexSet<String>,
}

impl Skippy<InMemoryEventStore> {
    /// Motor con store de eventos en memoria y configuración del entorno.
    pub fn new(pipeline: Pipeline) -> Self {
        Self::with_store(pipeline, InMemoryEventStore::default())
    }
}

impl<E> Skippy<E> where E: EventStore
{
    pub fn with_store(pipeline: Pipeline, events: E) -> Self {
        Self { pipeline,
               config: EngineConfig::from_env(),
               baseline: HashBaseline::default(),
               events,
               last_decision: None,
               outputs: IndexSet::new() }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Acceso mutable al pipeline (p. ej. `edit_step`); un cambio de
    /// definición fuerza un rerun completo en la siguiente corrida.
    pub fn pipeline_mut(&mut self) -> &mut Pipeline {
        &mut self.pipeline
    }

    pub fn dataset(&self) -> &DataFrame {
        self.pipeline.dataset()
    }

    pub fn dataset_mut(&mut self) -> &mut DataFrame {
        self.pipeline.dataset_mut()
    }

    pub fn baseline(&self) -> &HashBaseline {
        &self.baseline
    }

    pub fn last_decision(&self) -> Option<&RunDecision> {
        self.last_decision.as_ref()
    }

    pub fn event_store(&self) -> &E {
        &self.events
    }

    /// Eventos registrados para el pipeline envuelto.
    pub fn events(&self) -> Vec<RunEvent> {
        self.events.list(self.pipeline.id())
    }

    /// Corrida incremental sobre el dataset retenido por el pipeline.
    pub fn run(&mut self) -> Result<DataFrame, PipeError> {
        let df = self.pipeline.dataset().clone();
        self.fit_transform(df)
    }

    /// Corrida incremental sobre `df`.
    pub fn fit_transform(&mut self, df: DataFrame) -> Result<DataFrame, PipeError> {
        if self.baseline.is_empty() {
            return self.record_baseline(df);
        }

        let nodes = self.pipeline.dag().node_names();
        let diff = self.baseline.diff(&df.column_hashes(), &nodes);
        debug!("hash diff: {} of {} columns changed", diff.changed.len(), diff.compared);

        let definition = self.pipeline.definition_hash();
        if self.baseline.definition_hash() != Some(definition.as_str()) {
            return self.full_rerun(df, diff.changed, FullRerunReason::DefinitionChanged);
        }
        if diff.changed.is_empty() {
            info!("No changes detected - skipping.");
            self.events.append_kind(self.pipeline.id(), RunEventKind::NoChangesDetected);
            self.last_decision = Some(RunDecision::Skipped);
            return Ok(df);
        }
        if self.config.is_full_rerun(diff.changed.len(), diff.compared) {
            return self.full_rerun(df, diff.changed, FullRerunReason::ThresholdReached);
        }
        self.partial_rerun(df, diff.changed)
    }

    /// Columnas que declaran los steps vigentes.
    fn produced_columns(&self) -> IndexSet<String> {
        self.pipeline.steps().iter().flat_map(|s| s.columns_out()).collect()
    }

    /// Base del merge: el dataset retenido, salvo que esté vacío o no
    /// coincida en filas con el frame entrante.
    fn merge_base(&self, df: DataFrame) -> DataFrame {
        let retained = self.pipeline.dataset();
        if retained.is_empty() || retained.n_rows() != df.n_rows() {
            df
        } else {
            retained.clone()
        }
    }

    fn record_baseline(&mut self, df: DataFrame) -> Result<DataFrame, PipeError> {
        let out = self.pipeline.fit_transform(df)?;
        let definition_hash = self.pipeline.definition_hash();
        self.baseline.clear();
        self.baseline.merge(out.column_hashes());
        self.baseline.set_definition_hash(definition_hash.clone());
        self.outputs = self.produced_columns();
        info!("Baseline recorded for {} columns.", out.n_cols());
        self.events.append_kind(self.pipeline.id(),
                                RunEventKind::BaselineRecorded { columns: out.n_cols(),
                                                                 definition_hash });
        self.last_decision = Some(RunDecision::Baseline);
        Ok(out)
    }

    fn full_rerun(&mut self, df: DataFrame, changed: Vec<String>, reason: FullRerunReason) -> Result<DataFrame, PipeError> {
        info!("Changes detected - rerunning full pipeline ({reason:?}).");
        let all: Vec<usize> = (0..self.pipeline.len()).collect();
        let out = self.pipeline.fit_transform_steps(&all, df.clone())?;

        let mut merged = self.merge_base(df);
        merged.update(&out);
        let produced = self.produced_columns();
        if reason == FullRerunReason::DefinitionChanged {
            // salidas que la nueva definición ya no produce
            for stale in self.outputs.difference(&produced) {
                merged.remove_column(stale);
            }
            self.baseline.clear();
            self.baseline.merge(merged.column_hashes());
        } else {
            self.baseline.merge(out.column_hashes());
        }
        self.baseline.set_definition_hash(self.pipeline.definition_hash());
        self.outputs = produced;
        self.pipeline.set_dataset(merged.clone());

        let id = self.pipeline.id();
        self.events.append_kind(id,
                                RunEventKind::FullRerun { changed: changed.clone(),
                                                          reason });
        self.events.append_kind(id, RunEventKind::RunMerged { columns: out.column_names() });
        self.last_decision = Some(RunDecision::Full { changed, reason });
        Ok(merged)
    }

    fn partial_rerun(&mut self, df: DataFrame, changed: Vec<String>) -> Result<DataFrame, PipeError> {
        let recompute = self.pipeline.dag().recompute_set(&changed);
        info!("Changes detected - rerunning pipeline for {changed:?} only.");

        let in_set: HashSet<&str> = recompute.iter().map(String::as_str).collect();
        // columnas derivadas que desaparecieron: se reconstruyen con su productor
        let missing: HashSet<&str> = changed.iter().map(String::as_str).filter(|c| !df.contains(c)).collect();
        let mut affected = Vec::new();
        let mut loads = Vec::new();
        let mut needed: IndexSet<String> = IndexSet::new();
        let mut produced: HashSet<String> = HashSet::new();
        for (i, step) in self.pipeline.steps().iter().enumerate() {
            let inputs = step.columns_in();
            let rebuilds = matches!(step.kind(), StepKind::Transform | StepKind::Model)
                           && step.columns_out().iter().any(|c| missing.contains(c.as_str()));
            if !rebuilds && !inputs.iter().any(|c| in_set.contains(c.as_str())) {
                continue;
            }
            if step.kind() == StepKind::Load {
                loads.push(i);
                continue;
            }
            affected.push(i);
            needed.extend(inputs);
            produced.extend(step.columns_out());
        }
        needed.extend(recompute.iter().cloned());
        let needed: Vec<String> = needed.into_iter().filter(|c| !produced.contains(c)).collect();
        debug!("partial rerun: steps {affected:?} over {} columns", needed.len());

        let subset = df.select_present(&needed);
        let out = self.pipeline.fit_transform_steps(&affected, subset)?;
        let touched = out.select_present(&recompute);

        let mut merged = self.merge_base(df);
        merged.update(&touched);
        let merged = self.pipeline.fit_transform_steps(&loads, merged)?;

        // lo que nadie pudo reconstruir deja de compararse
        let vanished: Vec<&String> = recompute.iter().filter(|c| !merged.contains(c)).collect();
        self.baseline.merge(touched.column_hashes());
        self.baseline.forget(&vanished);
        self.pipeline.set_dataset(merged.clone());

        let id = self.pipeline.id();
        self.events.append_kind(id,
                                RunEventKind::PartialRerun { changed: changed.clone(),
                                                             recompute: recompute.clone() });
        self.events.append_kind(id, RunEventKind::RunMerged { columns: touched.column_names() });
        self.last_decision = Some(RunDecision::Partial { changed, recompute });
        Ok(merged)
    }
}
