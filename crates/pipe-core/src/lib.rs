//! pipe-core: pipeline ETL por columnas con recomputación incremental
pub mod config;
pub mod constants;
pub mod dag;
pub mod errors;
pub mod event;
pub mod frame;
pub mod hashing;
pub mod params;
pub mod pipeline;
pub mod skippy;
pub mod step;

pub use config::EngineConfig;
pub use dag::{ColumnDag, ColumnNode};
pub use errors::PipeError;
pub use event::{EventStore, FullRerunReason, InMemoryEventStore, RunEvent, RunEventKind};
pub use frame::{DataFrame, Value, ValueType};
pub use params::{Param, ParamContainer, ParamKind, ParamValue};
pub use pipeline::Pipeline;
pub use skippy::{HashBaseline, RunDecision, Skippy};
pub use step::{derived_name, ColumnBinding, Step, StepConfig, StepKind};
