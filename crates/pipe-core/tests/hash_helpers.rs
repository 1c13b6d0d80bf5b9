use pipe_core::frame::Value;
use pipe_core::hashing::{hash_column, hash_value};
use serde_json::json;

#[test]
fn hash_value_produces_hex_64() {
    let v = json!({"b":2, "a":1});
    let h = hash_value(&v);
    // blake3 hex length is 64
    assert_eq!(h.len(), 64);
    // deterministic: same value with different key order yields same hash
    let v2 = json!({"a":1, "b":2});
    assert_eq!(h, hash_value(&v2));
}

#[test]
fn column_hash_is_order_and_type_sensitive() {
    let a = vec![Value::Int(1), Value::Int(2)];
    let b = vec![Value::Int(2), Value::Int(1)];
    assert_eq!(hash_column(&a), hash_column(&a.clone()));
    assert_ne!(hash_column(&a), hash_column(&b));
    assert_ne!(hash_column(&[Value::Int(1)]), hash_column(&[Value::Float(1.0)]));
    assert_ne!(hash_column(&[Value::Missing]), hash_column(&[]));
    assert_ne!(hash_column(&[Value::Str("ab".into()), Value::Str("c".into())]),
               hash_column(&[Value::Str("a".into()), Value::Str("bc".into())]));
}
