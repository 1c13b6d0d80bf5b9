use indexmap::IndexMap;

/// Une dos mapas de coeficientes: claves de ambos, gana el valor nuevo.
/// Conserva el orden de `old` y añade al final las claves sólo presentes en
/// `new`.
pub fn combine(old: &IndexMap<String, f64>, new: IndexMap<String, f64>) -> IndexMap<String, f64> {
    if old.is_empty() {
        return new;
    }
    let mut out = old.clone();
    for (k, v) in new {
        out.insert(k, v);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, f64)]) -> IndexMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn new_values_win_and_keys_are_unioned() {
        let old = map(&[("a", 1.0), ("b", 2.0)]);
        let out = combine(&old, map(&[("b", 20.0), ("c", 3.0)]));
        assert_eq!(out, map(&[("a", 1.0), ("b", 20.0), ("c", 3.0)]));
        let keys: Vec<&str> = out.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_old_adopts_new() {
        assert_eq!(combine(&IndexMap::new(), map(&[("x", 1.0)])), map(&[("x", 1.0)]));
    }
}
