use serde::{Deserialize, Serialize};

use super::{ParamContainer, ParamKind, ParamValue};
use crate::errors::PipeError;
use crate::frame::{Value, ValueType};

/// Secuencia tipada que multiplica un parámetro lógico en varias columnas
/// derivadas (p. ej. ventanas de media móvil). No tiene opciones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Iterable {
    value: Vec<Value>,
    dtype: ValueType,
}

impl Iterable {
    pub fn new(value: Vec<Value>, dtype: ValueType) -> Self {
        Self { value, dtype }
    }

    pub fn dtype(&self) -> ValueType {
        self.dtype
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.value.iter()
    }

    fn check(&self, values: &[Value]) -> Result<(), PipeError> {
        match values.iter().find(|v| v.value_type() != Some(self.dtype)) {
            Some(bad) => Err(PipeError::validation(bad.to_string(), format!("expected {}", self.dtype))),
            None => Ok(()),
        }
    }
}

impl ParamContainer for Iterable {
    fn kind(&self) -> ParamKind {
        ParamKind::Iterable
    }

    fn value(&self) -> ParamValue {
        ParamValue::Many(self.value.clone())
    }

    fn set(&mut self, value: ParamValue) -> Result<(), PipeError> {
        let values = value.to_vec();
        self.check(&values)?;
        self.value = values;
        Ok(())
    }

    fn update(&mut self, value: ParamValue, options: Option<Vec<Value>>) -> Result<(), PipeError> {
        if options.is_some() {
            return Err(PipeError::Unimplemented("iterable parameters have no options".into()));
        }
        self.set(value)
    }
}
