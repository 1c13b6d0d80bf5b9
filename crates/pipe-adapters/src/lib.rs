//! pipe-adapters: steps concretos sobre el contrato `Step` del core
//!
//! Este crate provee:
//! - Extract: `FrameExtract` (frame en memoria) y `FnExtract` (closure).
//! - Transform: `DayOfWeek`, `Normalise`, `MovingAverage`.
//! - Model: trait `Regressor`, `LinearRegression` (OLS) y el wrapper
//!   `ModelStep<R>` con roles `target` / `features`.
//! - Load: `Load<T: LoadTarget>` con `MemoryTarget` y `JsonFileTarget`.
//!
//! Nota: el core no conoce ninguno de estos tipos; sólo ve `Box<dyn Step>`.

pub mod regressor;
pub mod steps;
pub mod utils;

pub use regressor::{LinearRegression, Regressor};
pub use steps::extract::{FnExtract, FrameExtract};
pub use steps::load::{JsonFileTarget, Load, LoadTarget, MemoryTarget};
pub use steps::model::ModelStep;
pub use steps::transform::{DayOfWeek, MovingAverage, Normalise};
pub use utils::combine;
