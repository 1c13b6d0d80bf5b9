//! Tipos de evento de `Skippy` y estructura `RunEvent`.
//!
//! Cada decisión del motor (baseline, skip, rerun parcial o completo) queda
//! registrada como evento append-only. Son informativos: un error de un step
//! no genera evento, se propaga al caller.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Motivo de un rerun completo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FullRerunReason {
    /// La proporción de columnas cambiadas alcanzó el umbral configurado.
    ThresholdReached,
    /// El hash de definición del pipeline no coincide con el del baseline.
    DefinitionChanged,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunEventKind {
    /// Primera corrida: se ejecutó todo y se registraron hashes.
    BaselineRecorded { columns: usize, definition_hash: String },
    /// Ningún hash cambió; no se ejecutó nada.
    NoChangesDetected,
    /// Rerun restringido al conjunto a recomputar.
    PartialRerun { changed: Vec<String>, recompute: Vec<String> },
    FullRerun { changed: Vec<String>, reason: FullRerunReason },
    /// Cierre de una corrida con cómputo: columnas mergeadas en el dataset.
    RunMerged { columns: Vec<String> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    pub seq: u64, // orden append dentro del pipeline
    pub pipeline_id: Uuid,
    pub kind: RunEventKind,
    pub ts: DateTime<Utc>, // metadato, no entra en ninguna comparación
}
