//! Pipelines de demostración sobre un dataset sintético de nocionales.
//!
//! - `etl_pipeline`: extract → DayOfWeek(date) → LinearRegression → load.
//! - `skippy_pipeline`: extract → MovingAverage → Normalise, envuelto en `Skippy`.

use chrono::NaiveDate;
use pipe_adapters::{DayOfWeek, FrameExtract, LinearRegression, Load, LoadTarget, ModelStep, MovingAverage, Normalise};
use pipe_core::{DataFrame, PipeError, Pipeline, Skippy, Step, Value};

use crate::config::CONFIG;

pub const ADDED: &str = "added_notional";
pub const REMOVED: &str = "removed_notional";
pub const FIRM: &str = "firm_id";
pub const DATE: &str = "date";

/// Ventanas de la media móvil del pipeline incremental.
pub const MOVING_AVERAGE_PERIODS: [i64; 2] = [2, 3];

const FIRMS: [&str; 2] = ["A", "B"];
const MONTHS: u32 = 5;

/// 10 filas: dos firmas × cinco inicios de mes de 2019, ordenadas por firma
/// y fecha. Los nocionales vienen de `0..20` repartido en dos columnas.
pub fn dummy_dataset() -> Result<DataFrame, PipeError> {
    let mut added = Vec::new();
    let mut removed = Vec::new();
    let mut firm = Vec::new();
    let mut date = Vec::new();
    for (f, name) in FIRMS.iter().enumerate() {
        for month in 0..MONTHS {
            // fila original antes de ordenar: firmas alternadas por mes
            let row = (month as usize * FIRMS.len() + f) as i64;
            let day = NaiveDate::from_ymd_opt(2019, month + 1, 1)
                .ok_or_else(|| PipeError::Internal(format!("invalid month {}", month + 1)))?;
            added.push(Value::Int(2 * row));
            removed.push(Value::Int(2 * row + 1));
            firm.push(Value::Str((*name).to_string()));
            date.push(Value::Date(day));
        }
    }
    DataFrame::from_columns([(ADDED, added), (REMOVED, removed), (FIRM, firm), (DATE, date)])
}

fn dummy_extract() -> Result<FrameExtract, PipeError> {
    Ok(FrameExtract::new("DummyData", dummy_dataset()?))
}

/// Pipeline ETL de la demo con el destino de carga indicado.
pub fn etl_pipeline<T>(target: T) -> Result<Pipeline, PipeError>
    where T: LoadTarget + 'static
{
    let day_of_week = format!("{DATE}|DayOfWeek");
    let steps: Vec<Box<dyn Step>> = vec![Box::new(dummy_extract()?),
                                         Box::new(DayOfWeek::new(DATE)),
                                         Box::new(ModelStep::new(LinearRegression::default(), ADDED, &[day_of_week])),
                                         Box::new(Load::new(target))];
    Pipeline::new(steps)
}

/// Columnas producidas por la media móvil, en el orden en que las nombra el step.
pub fn moving_average_columns() -> Vec<String> {
    MovingAverage::new(&[ADDED, REMOVED], &MOVING_AVERAGE_PERIODS).columns_out()
}

/// Pipeline incremental de la demo, con la configuración global del motor.
pub fn skippy_pipeline() -> Result<Skippy, PipeError> {
    let steps: Vec<Box<dyn Step>> = vec![Box::new(dummy_extract()?),
                                         Box::new(MovingAverage::new(&[ADDED, REMOVED], &MOVING_AVERAGE_PERIODS)),
                                         Box::new(Normalise::new(&moving_average_columns()))];
    Ok(Skippy::new(Pipeline::new(steps)?).with_config(CONFIG.engine.clone()))
}

/// Tabla de texto (tabulada) para la salida del CLI.
pub fn format_table(df: &DataFrame) -> String {
    let mut out = df.column_names().join("\t");
    for row in 0..df.n_rows() {
        out.push('\n');
        let cells: Vec<String> = df.iter()
                                   .map(|(_, values)| values.get(row).map(Value::to_string).unwrap_or_default())
                                   .collect();
        out.push_str(&cells.join("\t"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_dataset_is_sorted_by_firm_then_date() {
        let df = dummy_dataset().unwrap();
        assert_eq!(df.n_rows(), 10);
        let firms: Vec<String> = df.column(FIRM).unwrap().iter().map(Value::to_string).collect();
        assert_eq!(firms, ["A", "A", "A", "A", "A", "B", "B", "B", "B", "B"]);
        let added: Vec<i64> = df.column(ADDED).unwrap().iter().filter_map(Value::as_i64).collect();
        assert_eq!(added, [0, 4, 8, 12, 16, 2, 6, 10, 14, 18]);
        assert_eq!(df.get(5, DATE).map(Value::to_string), Some("2019-01-01".to_string()));
    }

    #[test]
    fn format_table_renders_missing_as_empty() {
        let df = DataFrame::from_columns([("a", vec![Value::Int(1), Value::Missing])]).unwrap();
        assert_eq!(format_table(&df), "a\n1\n");
    }
}
