use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Value;
use crate::errors::PipeError;
use crate::hashing::hash_column;

/// Dataset tabular en memoria: columnas ordenadas, todas con `n_rows` celdas.
///
/// Un frame sin columnas tiene 0 filas y acepta cualquier longitud para su
/// primera columna.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataFrame {
    columns: IndexMap<String, Vec<Value>>,
    n_rows: usize,
}

impl DataFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construye un frame a partir de pares (nombre, valores) validando longitudes.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, PipeError>
        where I: IntoIterator<Item = (S, Vec<Value>)>,
              S: Into<String>
    {
        let mut df = Self::new();
        for (name, values) in columns {
            df.insert_column(name, values)?;
        }
        Ok(df)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// `true` si no hay columnas.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Igual que `column` pero falla con `MissingColumn`.
    pub fn require(&self, name: &str) -> Result<&[Value], PipeError> {
        self.column(name).ok_or_else(|| PipeError::MissingColumn(name.to_string()))
    }

    /// Celda (fila, columna), si existe.
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        self.columns.get(name).and_then(|c| c.get(row))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Inserta (o reemplaza en su posición) una columna.
    pub fn insert_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<(), PipeError> {
        let name = name.into();
        let only_this = self.columns.len() == 1 && self.columns.contains_key(&name);
        if !self.columns.is_empty() && !only_this && values.len() != self.n_rows {
            return Err(PipeError::LengthMismatch { column: name,
                                                   expected: self.n_rows,
                                                   found: values.len() });
        }
        self.n_rows = values.len();
        self.columns.insert(name, values);
        Ok(())
    }

    /// Variante encadenable de `insert_column`.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Value>) -> Result<Self, PipeError> {
        self.insert_column(name, values)?;
        Ok(self)
    }

    pub fn remove_column(&mut self, name: &str) -> Option<Vec<Value>> {
        let removed = self.columns.shift_remove(name);
        if self.columns.is_empty() {
            self.n_rows = 0;
        }
        removed
    }

    /// Concatenación horizontal: las columnas de `other` se añaden al final;
    /// las homónimas se reemplazan en su posición original.
    pub fn hstack(mut self, other: DataFrame) -> Result<Self, PipeError> {
        for (name, values) in other.columns {
            self.insert_column(name, values)?;
        }
        Ok(self)
    }

    /// Selección por lista de nombres (en el orden dado); falla si falta alguna.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, PipeError> {
        let mut out = Self::new();
        for name in names {
            let values = self.require(name.as_ref())?;
            out.insert_column(name.as_ref(), values.to_vec())?;
        }
        Ok(out)
    }

    /// Selección tolerante: ignora los nombres ausentes.
    pub fn select_present<S: AsRef<str>>(&self, names: &[S]) -> Self {
        let mut out = Self { columns: IndexMap::new(),
                             n_rows: 0 };
        for name in names {
            if let Some(values) = self.columns.get(name.as_ref()) {
                out.n_rows = values.len();
                out.columns.insert(name.as_ref().to_string(), values.clone());
            }
        }
        out
    }

    /// Reindexa al conjunto de nombres dado, rellenando con `Missing` las
    /// columnas ausentes. Las columnas fuera de `names` se descartan.
    pub fn reindex<S: AsRef<str>>(&self, names: &[S]) -> Self {
        let mut out = Self { columns: IndexMap::new(),
                             n_rows: self.n_rows };
        for name in names {
            let values = self.columns
                             .get(name.as_ref())
                             .cloned()
                             .unwrap_or_else(|| vec![Value::Missing; self.n_rows]);
            out.columns.insert(name.as_ref().to_string(), values);
        }
        out
    }

    /// Merge estilo `update`: las columnas de `other` sobreescriben celda a
    /// celda (por posición de fila) a las homónimas de `self`; las columnas
    /// que `self` no tiene se añaden al final. Un frame vacío adopta `other`.
    ///
    /// Filas de `other` más allá de `n_rows` se ignoran; si `other` es más
    /// corto, las filas restantes de `self` quedan intactas (y las columnas
    /// nuevas se rellenan con `Missing`).
    pub fn update(&mut self, other: &DataFrame) {
        if self.columns.is_empty() {
            *self = other.clone();
            return;
        }
        for (name, values) in other.columns.iter() {
            let n = self.n_rows;
            let target = self.columns
                             .entry(name.clone())
                             .or_insert_with(|| vec![Value::Missing; n]);
            for (cell, value) in target.iter_mut().zip(values.iter()) {
                *cell = value.clone();
            }
        }
    }

    /// Hash de contenido por columna (`hash_column`), en orden de columnas.
    pub fn column_hashes(&self) -> IndexMap<String, String> {
        self.columns
            .iter()
            .map(|(name, values)| (name.clone(), hash_column(values)))
            .collect()
    }

    /// Representación en registros JSON (una entrada por fila).
    pub fn to_records(&self) -> Vec<serde_json::Map<String, serde_json::Value>> {
        (0..self.n_rows).map(|row| {
                            self.columns
                                .iter()
                                .map(|(name, values)| (name.clone(), cell_to_json(&values[row])))
                                .collect()
                        })
                        .collect()
    }
}

fn cell_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Missing => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::from(*i),
        Value::Float(f) => serde_json::Number::from_f64(*f).map(serde_json::Value::Number)
                                                           .unwrap_or(serde_json::Value::Null),
        Value::Str(s) => serde_json::Value::String(s.clone()),
        Value::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
    }
}
