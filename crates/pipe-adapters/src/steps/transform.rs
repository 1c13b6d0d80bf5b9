//! Transformaciones por columna: `DayOfWeek`, `Normalise`, `MovingAverage`.
//!
//! Todas añaden columnas derivadas (`source|Name[(params)]`) al final del
//! dataset y nunca eliminan las existentes.

use chrono::Datelike;
use indexmap::IndexMap;
use pipe_core::constants::ROLE_IN;
use pipe_core::frame::ValueType;
use pipe_core::params::Param;
use pipe_core::{DataFrame, PipeError, Step, StepConfig, StepKind, Value};

use crate::utils::combine;

/// Columna numérica como `Option<f64>` (ausentes y NaN → `None`); falla si
/// hay celdas no numéricas.
fn numeric(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>, PipeError> {
    df.require(column)?
      .iter()
      .map(|v| match (v.is_missing(), v.as_f64()) {
          (true, _) => Ok(None),
          (false, Some(x)) => Ok(Some(x)),
          (false, None) if matches!(v, Value::Float(_)) => Ok(None),
          _ => Err(PipeError::TypeMismatch { column: column.to_string(),
                                             expected: "numeric values".into() }),
      })
      .collect()
}

/// Día de la semana (lunes = 0) de una columna de fechas.
#[derive(Debug, Clone)]
pub struct DayOfWeek {
    config: StepConfig,
}

impl DayOfWeek {
    pub fn new(column: &str) -> Self {
        Self { config: StepConfig::new().with_column(ROLE_IN, Param::option(column)) }
    }
}

impl Step for DayOfWeek {
    fn name(&self) -> &str {
        "DayOfWeek"
    }

    fn kind(&self) -> StepKind {
        StepKind::Transform
    }

    fn config(&self) -> &StepConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut StepConfig {
        &mut self.config
    }

    fn transform(&self, mut df: DataFrame) -> Result<DataFrame, PipeError> {
        for b in self.bindings() {
            let values = df.require(&b.source)?
                           .iter()
                           .map(|v| match v.as_date() {
                               Some(d) => Ok(Value::Int(i64::from(d.weekday().num_days_from_monday()))),
                               None if v.is_missing() => Ok(Value::Missing),
                               None => Err(PipeError::TypeMismatch { column: b.source.clone(),
                                                                     expected: "dates".into() }),
                           })
                           .collect::<Result<Vec<_>, _>>()?;
            df.insert_column(b.output, values)?;
        }
        Ok(df)
    }
}

/// Divide cada columna por su media aprendida en `fit`.
///
/// Las medias se acumulan entre fits ("gana la nueva"), de modo que un rerun
/// parcial sobre un subconjunto de columnas conserva las del resto.
#[derive(Debug, Clone)]
pub struct Normalise {
    config: StepConfig,
    means: IndexMap<String, f64>,
}

impl Normalise {
    pub fn new<S: AsRef<str>>(columns: &[S]) -> Self {
        let cols: Vec<&str> = columns.iter().map(AsRef::as_ref).collect();
        Self { config: StepConfig::new().with_column(ROLE_IN, Param::multi_select(cols)),
               means: IndexMap::new() }
    }
}

impl Step for Normalise {
    fn name(&self) -> &str {
        "Normalise"
    }

    fn kind(&self) -> StepKind {
        StepKind::Transform
    }

    fn config(&self) -> &StepConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut StepConfig {
        &mut self.config
    }

    fn fit(&mut self, df: &DataFrame) -> Result<(), PipeError> {
        let mut fresh = IndexMap::new();
        for column in self.columns_in() {
            if !df.contains(&column) {
                continue;
            }
            let present: Vec<f64> = numeric(df, &column)?.into_iter().flatten().collect();
            let mean = if present.is_empty() {
                f64::NAN
            } else {
                present.iter().sum::<f64>() / present.len() as f64
            };
            fresh.insert(column, mean);
        }
        self.means = combine(&self.means, fresh);
        Ok(())
    }

    fn transform(&self, mut df: DataFrame) -> Result<DataFrame, PipeError> {
        for b in self.bindings() {
            let mean = *self.means
                            .get(&b.source)
                            .ok_or_else(|| PipeError::Model(format!("Normalise has no mean for '{}'; call fit first", b.source)))?;
            let values = numeric(&df, &b.source)?.into_iter()
                                                 .map(|x| x.map(|x| Value::from_f64(x / mean)).unwrap_or(Value::Missing))
                                                 .collect();
            df.insert_column(b.output, values)?;
        }
        Ok(df)
    }

    fn coeffs(&self) -> IndexMap<String, f64> {
        self.means.clone()
    }
}

/// Media móvil de ventana `periods` (parámetro iterable). La ventana debe
/// estar completa y sin ausentes; si no, la celda queda `Missing`.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    config: StepConfig,
}

impl MovingAverage {
    pub const PERIODS: &'static str = "periods";

    pub fn new<S: AsRef<str>>(columns: &[S], periods: &[i64]) -> Self {
        let cols: Vec<&str> = columns.iter().map(AsRef::as_ref).collect();
        Self { config: StepConfig::new().with_column(ROLE_IN, Param::multi_select(cols))
                                        .with_param(Self::PERIODS, Param::iterable(periods.iter().copied(), ValueType::Int)) }
    }
}

fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Value> {
    (0..values.len()).map(|i| {
                         if i + 1 < window {
                             return Value::Missing;
                         }
                         let slice = &values[i + 1 - window..=i];
                         let present: Option<Vec<f64>> = slice.iter().copied().collect();
                         present.map(|xs| Value::from_f64(xs.iter().sum::<f64>() / window as f64))
                                .unwrap_or(Value::Missing)
                     })
                     .collect()
}

impl Step for MovingAverage {
    fn name(&self) -> &str {
        "MovingAverage"
    }

    fn kind(&self) -> StepKind {
        StepKind::Transform
    }

    fn config(&self) -> &StepConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut StepConfig {
        &mut self.config
    }

    fn transform(&self, mut df: DataFrame) -> Result<DataFrame, PipeError> {
        for b in self.bindings() {
            let window = b.params
                          .get(Self::PERIODS)
                          .and_then(Value::as_i64)
                          .filter(|p| *p > 0)
                          .ok_or_else(|| PipeError::validation(Self::PERIODS, "window must be a positive integer"))?;
            let values = rolling_mean(&numeric(&df, &b.source)?, window as usize);
            df.insert_column(b.output, values)?;
        }
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn floats(v: &[f64]) -> Vec<Value> {
        v.iter().copied().map(Value::Float).collect()
    }

    #[test]
    fn day_of_week_counts_from_monday() {
        let d = |m| Value::Date(NaiveDate::from_ymd_opt(2019, m, 1).unwrap());
        let df = DataFrame::from_columns([("date", vec![d(1), d(4), Value::Missing])]).unwrap();
        let out = DayOfWeek::new("date").transform(df).unwrap();
        assert_eq!(out.column("date|DayOfWeek").unwrap(), &[Value::Int(1), Value::Int(0), Value::Missing]);

        let bad = DataFrame::from_columns([("date", vec![Value::Str("soon".into())])]).unwrap();
        assert!(matches!(DayOfWeek::new("date").transform(bad), Err(PipeError::TypeMismatch { .. })));
    }

    #[test]
    fn normalise_divides_by_fitted_mean_and_merges_means() {
        let df = DataFrame::from_columns([("a", floats(&[1.0, 3.0])), ("b", floats(&[2.0, 2.0]))]).unwrap();
        let mut step = Normalise::new(&["a", "b"]);
        let out = step.fit_transform(df).unwrap();
        assert_eq!(out.column("a|Normalise").unwrap(), floats(&[0.5, 1.5]).as_slice());
        assert_eq!(step.coeffs().get("b"), Some(&2.0));

        // un fit parcial sólo reemplaza las medias presentes
        let partial = DataFrame::from_columns([("a", floats(&[10.0, 10.0]))]).unwrap();
        step.fit(&partial).unwrap();
        assert_eq!(step.coeffs().get("a"), Some(&10.0));
        assert_eq!(step.coeffs().get("b"), Some(&2.0));
    }

    #[test]
    fn normalise_without_fit_fails() {
        let df = DataFrame::from_columns([("a", floats(&[1.0]))]).unwrap();
        assert!(matches!(Normalise::new(&["a"]).transform(df), Err(PipeError::Model(_))));
    }

    #[test]
    fn moving_average_needs_a_full_window() {
        let df = DataFrame::from_columns([("x", floats(&[1.0, 2.0, 3.0, 4.0]))]).unwrap();
        let out = MovingAverage::new(&["x"], &[2, 3]).transform(df).unwrap();
        assert_eq!(out.column("x|MovingAverage(periods=2)").unwrap(),
                   &[Value::Missing, Value::Float(1.5), Value::Float(2.5), Value::Float(3.5)]);
        assert_eq!(out.column("x|MovingAverage(periods=3)").unwrap(),
                   &[Value::Missing, Value::Missing, Value::Float(2.0), Value::Float(3.0)]);
    }

    #[test]
    fn moving_average_propagates_gaps() {
        let df = DataFrame::from_columns([("x", vec![Value::Float(1.0), Value::Missing, Value::Float(3.0)])]).unwrap();
        let out = MovingAverage::new(&["x"], &[2]).transform(df).unwrap();
        assert_eq!(out.column("x|MovingAverage(periods=2)").unwrap(), &[Value::Missing, Value::Missing, Value::Missing]);
    }

    #[test]
    fn moving_average_rejects_non_positive_window() {
        let df = DataFrame::from_columns([("x", floats(&[1.0]))]).unwrap();
        assert!(MovingAverage::new(&["x"], &[0]).transform(df).unwrap_err().is_validation());
    }
}
