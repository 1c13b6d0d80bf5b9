//! Contenedores de parámetros y de bindings de columnas.
//!
//! Cada variante de `Param` implementa la capacidad `ParamContainer`
//! (`value`, `options`, `set`, `update`, `set_options`). `Param` es el tagged
//! variant que despacha según `ParamKind`; añadir un tipo nuevo implica una
//! variante nueva aquí, no subclases abiertas.
//!
//! Contratos (deliberadamente distintos entre variantes):
//! - `set`: escritura validada; si falla, el contenedor queda intacto.
//! - `update(value, options)`: reinicia valor y opciones sin validar.
//!   `OptionParam` usa `[value]` como opciones por defecto y `MultiSelect` usa
//!   el propio conjunto elegido; `Iterable` y los escalares planos no tienen
//!   opciones y responden `Unimplemented` si se les pasan.

mod iterable;
mod multi_select;
mod option;
mod scalar;

pub use iterable::Iterable;
pub use multi_select::MultiSelect;
pub use option::OptionParam;
pub use scalar::{BoolParam, DateParam, TextParam};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::PipeError;
use crate::frame::{Value, ValueType};

/// Tipo de contenedor (tabla de despacho).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamKind {
    Option,
    MultiSelect,
    Iterable,
    Bool,
    Date,
    Text,
}

impl ParamKind {
    /// `true` si el contenedor mantiene una lista de opciones válidas.
    pub fn has_options(self) -> bool {
        matches!(self, ParamKind::Option | ParamKind::MultiSelect)
    }
}

/// Valor escrito/leído de un contenedor: uno o varios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    One(Value),
    Many(Vec<Value>),
}

impl ParamValue {
    pub fn one(v: impl Into<Value>) -> Self {
        ParamValue::One(v.into())
    }

    pub fn many<I, V>(values: I) -> Self
        where I: IntoIterator<Item = V>,
              V: Into<Value>
    {
        ParamValue::Many(values.into_iter().map(Into::into).collect())
    }

    /// Vista como lista (un `One` es una lista de un elemento).
    pub fn to_vec(&self) -> Vec<Value> {
        match self {
            ParamValue::One(v) => vec![v.clone()],
            ParamValue::Many(vs) => vs.clone(),
        }
    }
}

/// Capacidad común de todos los contenedores.
pub trait ParamContainer {
    fn kind(&self) -> ParamKind;

    fn value(&self) -> ParamValue;

    /// Opciones válidas, si el contenedor las tiene.
    fn options(&self) -> Option<&[Value]> {
        None
    }

    /// Escritura validada contra opciones / tipo.
    fn set(&mut self, value: ParamValue) -> Result<(), PipeError>;

    /// Reinicio de valor + opciones (ver contratos del módulo).
    fn update(&mut self, value: ParamValue, options: Option<Vec<Value>>) -> Result<(), PipeError>;

    /// Reemplaza sólo las opciones; el valor actual no cambia.
    fn set_options(&mut self, _options: Vec<Value>) -> Result<(), PipeError> {
        Err(PipeError::Unimplemented(format!("{:?} parameters have no options", self.kind())))
    }
}

/// Tagged variant de parámetros y bindings de columnas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Param {
    Option(OptionParam),
    MultiSelect(MultiSelect),
    Iterable(Iterable),
    Bool(BoolParam),
    Date(DateParam),
    Text(TextParam),
}

impl Param {
    /// Selección única; opciones por defecto `[value]`.
    pub fn option(value: impl Into<Value>) -> Self {
        Param::Option(OptionParam::new(value.into()))
    }

    /// Selección única sin valor (p. ej. target de un modelo aún no elegido).
    pub fn unset_option() -> Self {
        Param::Option(OptionParam::new(Value::Missing))
    }

    pub fn multi_select<I, V>(values: I) -> Self
        where I: IntoIterator<Item = V>,
              V: Into<Value>
    {
        Param::MultiSelect(MultiSelect::new(values.into_iter().map(Into::into).collect()))
    }

    pub fn iterable<I, V>(values: I, dtype: ValueType) -> Self
        where I: IntoIterator<Item = V>,
              V: Into<Value>
    {
        Param::Iterable(Iterable::new(values.into_iter().map(Into::into).collect(), dtype))
    }

    pub fn boolean(b: bool) -> Self {
        Param::Bool(BoolParam::new(b))
    }

    pub fn date(d: NaiveDate) -> Self {
        Param::Date(DateParam::new(d))
    }

    pub fn text(s: impl Into<String>) -> Self {
        Param::Text(TextParam::new(s.into()))
    }

    fn container(&self) -> &dyn ParamContainer {
        match self {
            Param::Option(p) => p,
            Param::MultiSelect(p) => p,
            Param::Iterable(p) => p,
            Param::Bool(p) => p,
            Param::Date(p) => p,
            Param::Text(p) => p,
        }
    }

    fn container_mut(&mut self) -> &mut dyn ParamContainer {
        match self {
            Param::Option(p) => p,
            Param::MultiSelect(p) => p,
            Param::Iterable(p) => p,
            Param::Bool(p) => p,
            Param::Date(p) => p,
            Param::Text(p) => p,
        }
    }

    pub fn is_iterable(&self) -> bool {
        matches!(self, Param::Iterable(_))
    }

    /// Valores individuales sobre los que itera el parámetro (`Iterable` y
    /// `MultiSelect`); un `Option` itera su único valor.
    pub fn values(&self) -> Vec<Value> {
        self.value().to_vec()
    }

    /// Nombres de columna ligados (ignora `Missing` y strings vacíos).
    pub fn column_names(&self) -> Vec<String> {
        self.values()
            .into_iter()
            .filter_map(|v| match v {
                Value::Str(s) if !s.is_empty() => Some(s),
                _ => None,
            })
            .collect()
    }
}

impl ParamContainer for Param {
    fn kind(&self) -> ParamKind {
        self.container().kind()
    }

    fn value(&self) -> ParamValue {
        self.container().value()
    }

    fn options(&self) -> Option<&[Value]> {
        self.container().options()
    }

    fn set(&mut self, value: ParamValue) -> Result<(), PipeError> {
        self.container_mut().set(value)
    }

    fn update(&mut self, value: ParamValue, options: Option<Vec<Value>>) -> Result<(), PipeError> {
        self.container_mut().update(value, options)
    }

    fn set_options(&mut self, options: Vec<Value>) -> Result<(), PipeError> {
        self.container_mut().set_options(options)
    }
}

/// Mensaje de validación compartido por los contenedores con opciones.
pub(crate) fn not_in_options(value: &Value, options: &[Value]) -> PipeError {
    let opts: Vec<String> = options.iter().map(|o| o.to_string()).collect();
    PipeError::validation(value.to_string(), format!("not in options [{}]", opts.join(", ")))
}

pub(crate) fn expect_one(kind: ParamKind, value: ParamValue) -> Result<Value, PipeError> {
    match value {
        ParamValue::One(v) => Ok(v),
        ParamValue::Many(_) => Err(PipeError::validation(format!("{kind:?}"), "expected a single value")),
    }
}
