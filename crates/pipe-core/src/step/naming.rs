//! Naming de columnas derivadas y expansión de parámetros iterables.
//!
//! `source|StepName` sin iterables; `source|StepName(p=v,q=w)` con iterables.
//! Con varios iterables se toma el producto cartesiano, con los parámetros
//! ordenados por nombre. Orden de enumeración: combinación de parámetros
//! (externo) × columna de entrada (interno).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::StepConfig;
use crate::constants::COLUMN_SEPARATOR;
use crate::frame::Value;

/// Una expansión: qué columna fuente y qué binding de parámetros producen
/// qué columna de salida.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnBinding {
    pub source: String,
    pub params: BTreeMap<String, Value>,
    pub output: String,
}

/// Identificador de una columna derivada.
pub fn derived_name(source: &str, step_name: &str, params: &BTreeMap<String, Value>) -> String {
    format!("{source}{COLUMN_SEPARATOR}{step_name}{}", param_suffix(params))
}

fn param_suffix(params: &BTreeMap<String, Value>) -> String {
    if params.is_empty() {
        return String::new();
    }
    let items: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("({})", items.join(","))
}

/// Producto cartesiano de los iterables (ya ordenados por nombre). Sin
/// iterables hay exactamente una combinación vacía; un iterable vacío anula
/// todas las combinaciones.
fn combinations(iterables: &[(String, Vec<Value>)]) -> Vec<BTreeMap<String, Value>> {
    let mut combos = vec![BTreeMap::new()];
    for (name, values) in iterables {
        let mut next = Vec::with_capacity(combos.len() * values.len());
        for combo in &combos {
            for v in values {
                let mut c = combo.clone();
                c.insert(name.clone(), v.clone());
                next.push(c);
            }
        }
        combos = next;
    }
    combos
}

/// Expande las columnas de entrada dadas según los iterables de `config`.
pub fn expand(step_name: &str, inputs: &[String], config: &StepConfig) -> Vec<ColumnBinding> {
    let mut out = Vec::new();
    for params in combinations(&config.iterable_params()) {
        for source in inputs {
            out.push(ColumnBinding { output: derived_name(source, step_name, &params),
                                     source: source.clone(),
                                     params: params.clone() });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ValueType;
    use crate::params::Param;

    fn cols(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plain_step_has_no_suffix() {
        let out = expand("DayOfWeek", &cols(&["date"]), &StepConfig::new());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].output, "date|DayOfWeek");
        assert!(out[0].params.is_empty());
    }

    #[test]
    fn iterable_is_outer_loop() {
        let cfg = StepConfig::new().with_param("periods", Param::iterable([2i64, 3], ValueType::Int));
        let names: Vec<String> = expand("MovingAverage", &cols(&["a", "b"]), &cfg).into_iter()
                                                                              .map(|b| b.output)
                                                                              .collect();
        assert_eq!(names,
                   vec!["a|MovingAverage(periods=2)",
                        "b|MovingAverage(periods=2)",
                        "a|MovingAverage(periods=3)",
                        "b|MovingAverage(periods=3)"]);
    }

    #[test]
    fn several_iterables_cross_product_sorted_by_name() {
        let cfg = StepConfig::new().with_param("window", Param::iterable([5i64], ValueType::Int))
                                   .with_param("lag", Param::iterable([1i64, 2], ValueType::Int));
        let names: Vec<String> = expand("Lagged", &cols(&["x"]), &cfg).into_iter().map(|b| b.output).collect();
        assert_eq!(names, vec!["x|Lagged(lag=1,window=5)", "x|Lagged(lag=2,window=5)"]);
    }

    #[test]
    fn empty_iterable_yields_nothing() {
        let cfg = StepConfig::new().with_param("periods", Param::iterable(Vec::<i64>::new(), ValueType::Int));
        assert!(expand("MovingAverage", &cols(&["a"]), &cfg).is_empty());
    }
}
