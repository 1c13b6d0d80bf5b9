//! Parámetros planos (bool, fecha, texto): sin opciones, validan tipo.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{expect_one, ParamContainer, ParamKind, ParamValue};
use crate::errors::PipeError;
use crate::frame::Value;

fn no_options(kind: ParamKind, options: &Option<Vec<Value>>) -> Result<(), PipeError> {
    match options {
        Some(_) => Err(PipeError::Unimplemented(format!("{kind:?} parameters have no options"))),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoolParam {
    value: bool,
}

impl BoolParam {
    pub fn new(value: bool) -> Self {
        Self { value }
    }

    pub fn get(&self) -> bool {
        self.value
    }
}

impl ParamContainer for BoolParam {
    fn kind(&self) -> ParamKind {
        ParamKind::Bool
    }

    fn value(&self) -> ParamValue {
        ParamValue::One(Value::Bool(self.value))
    }

    fn set(&mut self, value: ParamValue) -> Result<(), PipeError> {
        match expect_one(self.kind(), value)? {
            Value::Bool(b) => {
                self.value = b;
                Ok(())
            }
            other => Err(PipeError::validation(other.to_string(), "expected bool")),
        }
    }

    fn update(&mut self, value: ParamValue, options: Option<Vec<Value>>) -> Result<(), PipeError> {
        no_options(self.kind(), &options)?;
        self.set(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateParam {
    value: NaiveDate,
}

impl DateParam {
    pub fn new(value: NaiveDate) -> Self {
        Self { value }
    }

    pub fn get(&self) -> NaiveDate {
        self.value
    }
}

impl ParamContainer for DateParam {
    fn kind(&self) -> ParamKind {
        ParamKind::Date
    }

    fn value(&self) -> ParamValue {
        ParamValue::One(Value::Date(self.value))
    }

    fn set(&mut self, value: ParamValue) -> Result<(), PipeError> {
        let v = expect_one(self.kind(), value)?;
        match v.as_date() {
            Some(d) => {
                self.value = d;
                Ok(())
            }
            None => Err(PipeError::validation(v.to_string(), "expected date (YYYY-MM-DD)")),
        }
    }

    fn update(&mut self, value: ParamValue, options: Option<Vec<Value>>) -> Result<(), PipeError> {
        no_options(self.kind(), &options)?;
        self.set(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextParam {
    value: String,
}

impl TextParam {
    pub fn new(value: String) -> Self {
        Self { value }
    }

    pub fn get(&self) -> &str {
        &self.value
    }
}

impl ParamContainer for TextParam {
    fn kind(&self) -> ParamKind {
        ParamKind::Text
    }

    fn value(&self) -> ParamValue {
        ParamValue::One(Value::Str(self.value.clone()))
    }

    fn set(&mut self, value: ParamValue) -> Result<(), PipeError> {
        match expect_one(self.kind(), value)? {
            Value::Str(s) => {
                self.value = s;
                Ok(())
            }
            other => Err(PipeError::validation(other.to_string(), "expected text")),
        }
    }

    fn update(&mut self, value: ParamValue, options: Option<Vec<Value>>) -> Result<(), PipeError> {
        no_options(self.kind(), &options)?;
        self.set(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_accepts_iso_strings() {
        let mut p = DateParam::new(NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
        p.set(ParamValue::one("2020-02-29")).unwrap();
        assert_eq!(p.get(), NaiveDate::from_ymd_opt(2020, 2, 29).unwrap());
        assert!(p.set(ParamValue::one("not a date")).is_err());
    }

    #[test]
    fn plain_params_have_no_options() {
        let mut b = BoolParam::new(false);
        assert!(matches!(b.set_options(vec![]), Err(PipeError::Unimplemented(_))));
        assert!(matches!(b.update(ParamValue::one(true), Some(vec![])), Err(PipeError::Unimplemented(_))));
        assert!(b.set(ParamValue::one(1i64)).unwrap_err().is_validation());
        assert!(!b.get());
    }
}
