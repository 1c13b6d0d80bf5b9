//! Hash helpers – abstracción para poder cambiar de algoritmo sin tocar el
//! resto del core. Todo hash es blake3 en hex (64 caracteres).

use blake3::Hasher;
use serde_json::Value as Json;

use super::to_canonical_json;
use crate::frame::Value;

/// Hashea un string y devuelve hex.
pub fn hash_str(input: &str) -> String {
    let mut h = Hasher::new();
    h.update(input.as_bytes());
    h.finalize().to_hex().to_string()
}

/// Hash de un JSON sobre su forma canónica (independiente del orden de claves).
pub fn hash_value(value: &Json) -> String {
    hash_str(&to_canonical_json(value))
}

/// Hash de contenido de una columna.
///
/// Función pura de los valores y de su orden: cada celda se codifica con un
/// tag de tipo seguido de bytes little-endian, por lo que `Int(1)` y
/// `Float(1.0)` producen hashes distintos y no interviene ningún estado del
/// proceso.
pub fn hash_column(values: &[Value]) -> String {
    let mut h = Hasher::new();
    h.update(&(values.len() as u64).to_le_bytes());
    for v in values {
        match v {
            Value::Missing => {
                h.update(&[0]);
            }
            Value::Bool(b) => {
                h.update(&[1, *b as u8]);
            }
            Value::Int(i) => {
                h.update(&[2]);
                h.update(&i.to_le_bytes());
            }
            Value::Float(f) => {
                h.update(&[3]);
                h.update(&f.to_bits().to_le_bytes());
            }
            Value::Str(s) => {
                h.update(&[4]);
                h.update(&(s.len() as u64).to_le_bytes());
                h.update(s.as_bytes());
            }
            Value::Date(d) => {
                h.update(&[5]);
                h.update(&chrono::Datelike::num_days_from_ce(d).to_le_bytes());
            }
        }
    }
    h.finalize().to_hex().to_string()
}
