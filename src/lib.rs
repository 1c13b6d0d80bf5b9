//! pipeflow: demos y configuración de aplicación sobre `pipe-core` y
//! `pipe-adapters`.
pub mod config;
pub mod demo;
pub mod errors;

pub use config::CONFIG;
pub use errors::AppError;
