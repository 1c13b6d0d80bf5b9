//! Constantes del motor core.
//!
//! Agrupa valores estáticos que participan en el naming de columnas derivadas
//! y en el hash de definición del pipeline. Cambiar `ENGINE_VERSION` invalida
//! cualquier baseline de hashes registrada por `Skippy`.

/// Versión lógica del motor. Forma parte del `definition_hash` del pipeline.
pub const ENGINE_VERSION: &str = "P1.0";

/// Separador entre la columna fuente y el step que la deriva
/// (`source|StepName(param=value)`).
pub const COLUMN_SEPARATOR: &str = "|";

/// Rol de columna de entrada por defecto.
pub const ROLE_IN: &str = "in";
/// Rol reservado: nunca cuenta como input ni recibe opciones.
pub const ROLE_OUT: &str = "out";
/// Rol de columna objetivo en steps de modelo.
pub const ROLE_TARGET: &str = "target";
/// Rol de columnas explicativas en steps de modelo.
pub const ROLE_FEATURES: &str = "features";

/// Clave reservada para el intercepto dentro de los coeffs de un modelo.
pub const INTERCEPT: &str = "Intercept";
