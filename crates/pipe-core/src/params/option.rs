use serde::{Deserialize, Serialize};

use super::{expect_one, not_in_options, ParamContainer, ParamKind, ParamValue};
use crate::errors::PipeError;
use crate::frame::Value;

/// Selección única entre `options`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionParam {
    value: Value,
    options: Vec<Value>,
}

impl OptionParam {
    pub fn new(value: Value) -> Self {
        let options = if value.is_missing() { vec![] } else { vec![value.clone()] };
        Self { value, options }
    }

    pub fn get(&self) -> &Value {
        &self.value
    }
}

impl ParamContainer for OptionParam {
    fn kind(&self) -> ParamKind {
        ParamKind::Option
    }

    fn value(&self) -> ParamValue {
        ParamValue::One(self.value.clone())
    }

    fn options(&self) -> Option<&[Value]> {
        Some(&self.options)
    }

    fn set(&mut self, value: ParamValue) -> Result<(), PipeError> {
        let v = expect_one(self.kind(), value)?;
        if !self.options.contains(&v) {
            return Err(not_in_options(&v, &self.options));
        }
        self.value = v;
        Ok(())
    }

    fn update(&mut self, value: ParamValue, options: Option<Vec<Value>>) -> Result<(), PipeError> {
        let v = expect_one(self.kind(), value)?;
        self.options = options.unwrap_or_else(|| vec![v.clone()]);
        self.value = v;
        Ok(())
    }

    fn set_options(&mut self, options: Vec<Value>) -> Result<(), PipeError> {
        self.options = options;
        Ok(())
    }
}
