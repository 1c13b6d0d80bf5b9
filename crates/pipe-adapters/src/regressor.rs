//! Estimadores que puede envolver un `ModelStep`.
//!
//! El step sólo necesita ajustar sobre una matriz densa y leer coeficientes
//! lineales; la predicción la hace el step a partir de sus `coeffs`.

use std::fmt::Debug;

use pipe_core::PipeError;
use serde_json::{json, Value as Json};

const PIVOT_EPS: f64 = 1e-12;

pub trait Regressor: Debug + Send {
    /// Nombre usado en la columna de salida (`target|Name`).
    fn name(&self) -> &str;

    /// Hiperparámetros (entran en el hash de definición).
    fn params(&self) -> Json {
        json!({})
    }

    /// Ajuste sobre `x` (filas × features) y `y`.
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), PipeError>;

    /// Un coeficiente por feature, en el orden de ajuste.
    fn coefficients(&self) -> &[f64];

    fn intercept(&self) -> Option<f64>;
}

/// Mínimos cuadrados ordinarios vía ecuaciones normales.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    fit_intercept: bool,
    coef: Vec<f64>,
    intercept: Option<f64>,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new(true)
    }
}

impl LinearRegression {
    pub fn new(fit_intercept: bool) -> Self {
        Self { fit_intercept,
               coef: Vec::new(),
               intercept: None }
    }
}

impl Regressor for LinearRegression {
    fn name(&self) -> &str {
        "LinearRegression"
    }

    fn params(&self) -> Json {
        json!({ "fit_intercept": self.fit_intercept })
    }

    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), PipeError> {
        if x.is_empty() {
            return Err(PipeError::Model("no rows to fit".into()));
        }
        if x.len() != y.len() {
            return Err(PipeError::Model(format!("{} rows of features but {} targets", x.len(), y.len())));
        }
        let k = x[0].len();
        if x.iter().any(|row| row.len() != k) {
            return Err(PipeError::Model("ragged feature matrix".into()));
        }

        // columnas de diseño: [1?, x_0, .., x_k-1]
        let offset = usize::from(self.fit_intercept);
        let p = k + offset;
        let mut xtx = vec![vec![0.0; p]; p];
        let mut xty = vec![0.0; p];
        for (row, target) in x.iter().zip(y) {
            let design: Vec<f64> = std::iter::repeat(1.0).take(offset).chain(row.iter().copied()).collect();
            for i in 0..p {
                xty[i] += design[i] * target;
                for j in 0..p {
                    xtx[i][j] += design[i] * design[j];
                }
            }
        }

        let beta = solve(xtx, xty)?;
        self.intercept = self.fit_intercept.then(|| beta[0]);
        self.coef = beta[offset..].to_vec();
        Ok(())
    }

    fn coefficients(&self) -> &[f64] {
        &self.coef
    }

    fn intercept(&self) -> Option<f64> {
        self.intercept
    }
}

/// Eliminación gaussiana con pivoteo parcial.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, PipeError> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
                            .unwrap_or(col);
        if a[pivot][col].abs() < PIVOT_EPS {
            return Err(PipeError::Model("singular design matrix (collinear or constant features)".into()));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        let pivot_row = a[col].clone();
        for row in col + 1..n {
            let factor = a[row][col] / pivot_row[col];
            if factor == 0.0 {
                continue;
            }
            for (cell, p) in a[row].iter_mut().zip(&pivot_row).skip(col) {
                *cell -= factor * p;
            }
            let pivot_b = b[col];
            b[row] -= factor * pivot_b;
        }
    }

    let mut out = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|j| a[row][j] * out[j]).sum();
        out[row] = (b[row] - tail) / a[row][row];
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_exact_line() {
        let x: Vec<Vec<f64>> = (0..5).map(|i| vec![i as f64]).collect();
        let y: Vec<f64> = (0..5).map(|i| 3.0 + 2.0 * i as f64).collect();
        let mut lr = LinearRegression::default();
        lr.fit(&x, &y).unwrap();
        assert!((lr.coefficients()[0] - 2.0).abs() < 1e-9);
        assert!((lr.intercept().unwrap() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn without_intercept_fits_through_origin() {
        let x = vec![vec![1.0], vec![2.0]];
        let mut lr = LinearRegression::new(false);
        lr.fit(&x, &[2.0, 4.0]).unwrap();
        assert!((lr.coefficients()[0] - 2.0).abs() < 1e-9);
        assert_eq!(lr.intercept(), None);
    }

    #[test]
    fn constant_feature_is_singular() {
        let x = vec![vec![1.0], vec![1.0], vec![1.0]];
        let err = LinearRegression::default().fit(&x, &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, PipeError::Model(_)));
    }
}
