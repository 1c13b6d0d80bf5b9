use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::ROLE_OUT;
use crate::errors::PipeError;
use crate::frame::Value;
use crate::params::{Param, ParamContainer, ParamValue};

/// Bindings de columnas (rol → contenedor) y parámetros (nombre → contenedor)
/// de un step. El orden de declaración se conserva.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepConfig {
    columns: IndexMap<String, Param>,
    params: IndexMap<String, Param>,
}

impl StepConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, role: impl Into<String>, binding: Param) -> Self {
        self.columns.insert(role.into(), binding);
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, param: Param) -> Self {
        self.params.insert(name.into(), param);
        self
    }

    pub fn column(&self, role: &str) -> Option<&Param> {
        self.columns.get(role)
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.get(name)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Columnas ligadas a un rol (vacío si el rol no existe).
    pub fn bound(&self, role: &str) -> Vec<String> {
        self.columns.get(role).map(Param::column_names).unwrap_or_default()
    }

    /// Todas las columnas ligadas salvo el rol `out`, en orden de roles.
    pub fn columns_in(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|(role, _)| role.as_str() != ROLE_OUT)
            .flat_map(|(_, p)| p.column_names())
            .collect()
    }

    /// Parámetros iterables ordenados por nombre (orden determinista del
    /// producto cartesiano).
    pub fn iterable_params(&self) -> Vec<(String, Vec<Value>)> {
        let mut out: Vec<(String, Vec<Value>)> = self.params
                                                     .iter()
                                                     .filter(|(_, p)| p.is_iterable())
                                                     .map(|(k, p)| (k.clone(), p.values()))
                                                     .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// Escritura validada de un binding de columna.
    pub fn set_column(&mut self, role: &str, value: ParamValue) -> Result<(), PipeError> {
        self.columns
            .get_mut(role)
            .ok_or_else(|| PipeError::validation(role, "unknown column role"))?
            .set(value)
    }

    /// Escritura validada de un parámetro.
    pub fn set_param(&mut self, name: &str, value: ParamValue) -> Result<(), PipeError> {
        self.params
            .get_mut(name)
            .ok_or_else(|| PipeError::validation(name, "unknown parameter"))?
            .set(value)
    }

    /// Reinicio (sin validar) de un binding; ver `ParamContainer::update`.
    pub fn update_column(&mut self, role: &str, value: ParamValue, options: Option<Vec<Value>>) -> Result<(), PipeError> {
        self.columns
            .get_mut(role)
            .ok_or_else(|| PipeError::validation(role, "unknown column role"))?
            .update(value, options)
    }

    pub fn update_param(&mut self, name: &str, value: ParamValue, options: Option<Vec<Value>>) -> Result<(), PipeError> {
        self.params
            .get_mut(name)
            .ok_or_else(|| PipeError::validation(name, "unknown parameter"))?
            .update(value, options)
    }

    /// Reemplaza las opciones de un rol concreto.
    pub fn set_column_options(&mut self, role: &str, columns: &[String]) -> Result<(), PipeError> {
        let options = columns.iter().map(|c| Value::Str(c.clone())).collect();
        self.columns
            .get_mut(role)
            .ok_or_else(|| PipeError::validation(role, "unknown column role"))?
            .set_options(options)
    }

    /// Reemplaza las opciones de todos los roles salvo `out`; no cambia los
    /// valores ligados.
    pub fn set_available_columns(&mut self, columns: &[String]) -> Result<(), PipeError> {
        let options: Vec<Value> = columns.iter().map(|c| Value::Str(c.clone())).collect();
        for (role, binding) in self.columns.iter_mut() {
            if role == ROLE_OUT || !binding.kind().has_options() {
                continue;
            }
            binding.set_options(options.clone())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ValueType;

    #[test]
    fn columns_in_skips_out_role() {
        let cfg = StepConfig::new().with_column("in", Param::multi_select(["a", "b"]))
                                   .with_column("out", Param::option("sink"))
                                   .with_column("target", Param::option("y"));
        assert_eq!(cfg.columns_in(), vec!["a", "b", "y"]);
    }

    #[test]
    fn available_columns_only_touch_options() {
        let mut cfg = StepConfig::new().with_column("in", Param::option("a"))
                                       .with_param("periods", Param::iterable([2i64], ValueType::Int));
        cfg.set_available_columns(&["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(cfg.bound("in"), vec!["a"]);
        cfg.set_column("in", ParamValue::one("b")).unwrap();
        assert!(cfg.set_column("in", ParamValue::one("c")).is_err());
        assert_eq!(cfg.bound("in"), vec!["b"]);
    }

    #[test]
    fn iterable_params_sorted_by_name() {
        let cfg = StepConfig::new().with_param("z", Param::iterable([1i64], ValueType::Int))
                                   .with_param("flag", Param::boolean(true))
                                   .with_param("a", Param::iterable([2i64], ValueType::Int));
        let names: Vec<String> = cfg.iterable_params().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "z"]);
    }
}
