//! Wrapper de modelos: un `Regressor` ligado a un target y a features.
//!
//! - Salida: `target|ModelName` (una sola columna).
//! - DAG: target y cada feature apuntan a la salida.
//! - Las opciones de `features` excluyen el target vigente.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use log::debug;
use pipe_core::constants::{INTERCEPT, ROLE_FEATURES, ROLE_TARGET};
use pipe_core::params::Param;
use pipe_core::{derived_name, ColumnBinding, DataFrame, PipeError, Step, StepConfig, StepKind, Value};
use serde_json::{json, Value as Json};

use crate::regressor::Regressor;

#[derive(Debug)]
pub struct ModelStep<R>
    where R: Regressor
{
    config: StepConfig,
    regressor: R,
    coeffs: IndexMap<String, f64>,
}

impl<R> ModelStep<R> where R: Regressor
{
    pub fn new<S: AsRef<str>>(regressor: R, target: &str, features: &[S]) -> Self {
        let features: Vec<&str> = features.iter().map(AsRef::as_ref).collect();
        Self { config: StepConfig::new().with_column(ROLE_TARGET, Param::option(target))
                                        .with_column(ROLE_FEATURES, Param::multi_select(features)),
               regressor,
               coeffs: IndexMap::new() }
    }

    /// Modelo sin target ni features; se ligan luego con `edit_step`.
    pub fn unbound(regressor: R) -> Self {
        Self { config: StepConfig::new().with_column(ROLE_TARGET, Param::unset_option())
                                        .with_column(ROLE_FEATURES, Param::multi_select(Vec::<Value>::new())),
               regressor,
               coeffs: IndexMap::new() }
    }

    pub fn regressor(&self) -> &R {
        &self.regressor
    }

    fn target(&self) -> Option<String> {
        self.config.bound(ROLE_TARGET).into_iter().next()
    }

    fn features(&self) -> Vec<String> {
        self.config.bound(ROLE_FEATURES)
    }

    fn output(&self, target: &str) -> String {
        derived_name(target, self.regressor.name(), &BTreeMap::new())
    }
}

impl<R> Step for ModelStep<R> where R: Regressor
{
    fn name(&self) -> &str {
        self.regressor.name()
    }

    fn kind(&self) -> StepKind {
        StepKind::Model
    }

    fn config(&self) -> &StepConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut StepConfig {
        &mut self.config
    }

    /// Cada input (target + features) alimenta la única salida.
    fn bindings(&self) -> Vec<ColumnBinding> {
        let Some(target) = self.target() else {
            return Vec::new();
        };
        let output = self.output(&target);
        self.columns_in()
            .into_iter()
            .map(|source| ColumnBinding { source,
                                          params: BTreeMap::new(),
                                          output: output.clone() })
            .collect()
    }

    fn update_available_columns(&mut self, columns: &[String]) -> Result<(), PipeError> {
        let target = self.target();
        let features: Vec<String> = columns.iter().filter(|c| Some(*c) != target.as_ref()).cloned().collect();
        self.config.set_column_options(ROLE_TARGET, columns)?;
        self.config.set_column_options(ROLE_FEATURES, &features)
    }

    fn fit(&mut self, df: &DataFrame) -> Result<(), PipeError> {
        let target = self.target().ok_or_else(|| PipeError::validation(ROLE_TARGET, "no target selected"))?;
        let features = self.features();
        if features.is_empty() {
            return Err(PipeError::validation(ROLE_FEATURES, "no features selected"));
        }

        let y_col = df.require(&target)?;
        let x_cols = features.iter().map(|f| df.require(f)).collect::<Result<Vec<_>, _>>()?;
        let mut x = Vec::with_capacity(df.n_rows());
        let mut y = Vec::with_capacity(df.n_rows());
        for row in 0..df.n_rows() {
            let features_row: Option<Vec<f64>> = x_cols.iter().map(|c| c[row].as_f64()).collect();
            if let (Some(yv), Some(xs)) = (y_col[row].as_f64(), features_row) {
                y.push(yv);
                x.push(xs);
            }
        }
        debug!("{}: fitting on {} of {} rows", self.regressor.name(), y.len(), df.n_rows());
        self.regressor.fit(&x, &y)?;

        let mut coeffs: IndexMap<String, f64> =
            features.into_iter().zip(self.regressor.coefficients().iter().copied()).collect();
        if let Some(intercept) = self.regressor.intercept() {
            coeffs.insert(INTERCEPT.to_string(), intercept);
        }
        self.coeffs = coeffs;
        Ok(())
    }

    fn transform(&self, mut df: DataFrame) -> Result<DataFrame, PipeError> {
        let target = self.target().ok_or_else(|| PipeError::validation(ROLE_TARGET, "no target selected"))?;
        if self.coeffs.is_empty() {
            return Err(PipeError::Model(format!("{} has not been fitted", self.regressor.name())));
        }
        let features = self.features();
        let weights = features.iter()
                              .map(|f| {
                                  self.coeffs
                                      .get(f)
                                      .copied()
                                      .ok_or_else(|| PipeError::Model(format!("no coefficient for feature '{f}'")))
                              })
                              .collect::<Result<Vec<f64>, _>>()?;
        let intercept = self.coeffs.get(INTERCEPT).copied().unwrap_or(0.0);
        let x_cols = features.iter().map(|f| df.require(f)).collect::<Result<Vec<_>, _>>()?;

        let predictions = (0..df.n_rows()).map(|row| {
                                              let xs: Option<Vec<f64>> = x_cols.iter().map(|c| c[row].as_f64()).collect();
                                              xs.map(|xs| {
                                                    let dot: f64 = xs.iter().zip(&weights).map(|(x, w)| x * w).sum();
                                                    Value::from_f64(dot + intercept)
                                                })
                                                .unwrap_or(Value::Missing)
                                          })
                                          .collect();
        df.insert_column(self.output(&target), predictions)?;
        Ok(df)
    }

    fn coeffs(&self) -> IndexMap<String, f64> {
        self.coeffs.clone()
    }

    fn definition(&self) -> Json {
        json!({
            "name": self.name(),
            "kind": self.kind(),
            "config": self.config(),
            "regressor": self.regressor.params(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regressor::LinearRegression;
    use pipe_core::params::ParamContainer;

    fn cols(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn output_is_target_pipe_model_name() {
        let step = ModelStep::new(LinearRegression::default(), "y", &["x1", "x2"]);
        assert_eq!(step.columns_out(), vec!["y|LinearRegression"]);
        assert_eq!(step.columns_in(), vec!["y", "x1", "x2"]);
        let edges = step.dag().edges();
        assert_eq!(edges.len(), 3);
        assert!(edges.iter().all(|(_, to)| to == "y|LinearRegression"));
    }

    #[test]
    fn unbound_model_has_no_outputs() {
        let step = ModelStep::unbound(LinearRegression::default());
        assert!(step.columns_out().is_empty());
        assert!(step.columns_in().is_empty());
    }

    #[test]
    fn feature_options_exclude_target() {
        let mut step = ModelStep::new(LinearRegression::default(), "y", &["x"]);
        step.update_available_columns(&cols(&["x", "y", "z"])).unwrap();
        let opts = |role: &str| -> Vec<String> {
            step.config().column(role).and_then(|p| p.options()).unwrap().iter().map(|v| v.to_string()).collect()
        };
        assert_eq!(opts(ROLE_TARGET), cols(&["x", "y", "z"]));
        assert_eq!(opts(ROLE_FEATURES), cols(&["x", "z"]));
    }

    #[test]
    fn fit_transform_predicts_and_exposes_intercept() {
        let f = |v: &[f64]| v.iter().copied().map(Value::Float).collect::<Vec<_>>();
        let df = DataFrame::from_columns([("x", f(&[0.0, 1.0, 2.0])), ("y", f(&[1.0, 3.0, 5.0]))]).unwrap();
        let mut step = ModelStep::new(LinearRegression::default(), "y", &["x"]);
        let out = step.fit_transform(df).unwrap();
        let pred: Vec<f64> = out.column("y|LinearRegression").unwrap().iter().filter_map(Value::as_f64).collect();
        for (p, e) in pred.iter().zip([1.0, 3.0, 5.0]) {
            assert!((p - e).abs() < 1e-9);
        }
        let coeffs = step.coeffs();
        let keys: Vec<&str> = coeffs.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["x", "Intercept"]);
    }

    #[test]
    fn transform_before_fit_fails() {
        let df = DataFrame::from_columns([("x", vec![Value::Float(1.0)]), ("y", vec![Value::Float(1.0)])]).unwrap();
        let step = ModelStep::new(LinearRegression::default(), "y", &["x"]);
        assert!(matches!(step.transform(df), Err(PipeError::Model(_))));
    }
}
