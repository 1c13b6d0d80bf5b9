use serde::{Deserialize, Serialize};

use super::{not_in_options, ParamContainer, ParamKind, ParamValue};
use crate::errors::PipeError;
use crate::frame::Value;

/// Conjunto ordenado de valores elegidos, subconjunto de `options`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiSelect {
    value: Vec<Value>,
    options: Vec<Value>,
}

impl MultiSelect {
    pub fn new(value: Vec<Value>) -> Self {
        Self { options: value.clone(),
               value }
    }

    pub fn get(&self) -> &[Value] {
        &self.value
    }
}

impl ParamContainer for MultiSelect {
    fn kind(&self) -> ParamKind {
        ParamKind::MultiSelect
    }

    fn value(&self) -> ParamValue {
        ParamValue::Many(self.value.clone())
    }

    fn options(&self) -> Option<&[Value]> {
        Some(&self.options)
    }

    fn set(&mut self, value: ParamValue) -> Result<(), PipeError> {
        let values = value.to_vec();
        if let Some(bad) = values.iter().find(|v| !self.options.contains(v)) {
            return Err(not_in_options(bad, &self.options));
        }
        self.value = values;
        Ok(())
    }

    fn update(&mut self, value: ParamValue, options: Option<Vec<Value>>) -> Result<(), PipeError> {
        let values = value.to_vec();
        self.options = options.unwrap_or_else(|| values.clone());
        self.value = values;
        Ok(())
    }

    fn set_options(&mut self, options: Vec<Value>) -> Result<(), PipeError> {
        self.options = options;
        Ok(())
    }
}
