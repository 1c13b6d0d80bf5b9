use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Hashes de contenido registrados en la última corrida con cómputo, más el
/// hash de definición del pipeline vigente en el baseline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HashBaseline {
    hashes: IndexMap<String, String>,
    definition_hash: Option<String>,
}

/// Resultado de comparar hashes actuales contra el baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashDiff {
    /// Nodos cambiados, en el orden de nodos recibido.
    pub changed: Vec<String>,
    /// Nodos comparados (presentes en al menos un lado).
    pub compared: usize,
}

impl HashBaseline {
    /// `true` hasta que se registra el primer baseline.
    pub fn is_empty(&self) -> bool {
        self.definition_hash.is_none()
    }

    pub fn hashes(&self) -> &IndexMap<String, String> {
        &self.hashes
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.hashes.get(column).map(String::as_str)
    }

    pub fn definition_hash(&self) -> Option<&str> {
        self.definition_hash.as_deref()
    }

    pub fn set_definition_hash(&mut self, hash: String) {
        self.definition_hash = Some(hash);
    }

    /// Compara nodo a nodo. Ausente en ambos lados: se ignora. Presente en
    /// un solo lado o con hash distinto: cambiado.
    pub fn diff<S: AsRef<str>>(&self, current: &IndexMap<String, String>, nodes: &[S]) -> HashDiff {
        let mut changed = Vec::new();
        let mut compared = 0;
        for node in nodes {
            let name = node.as_ref();
            match (current.get(name), self.hashes.get(name)) {
                (None, None) => continue,
                (Some(now), Some(before)) if now == before => compared += 1,
                _ => {
                    compared += 1;
                    changed.push(name.to_string());
                }
            }
        }
        HashDiff { changed, compared }
    }

    /// Merge "gana el nuevo": las columnas de `fresh` reemplazan su hash, el
    /// resto se conserva.
    pub fn merge(&mut self, fresh: IndexMap<String, String>) {
        for (name, hash) in fresh {
            self.hashes.insert(name, hash);
        }
    }

    /// Descarta los hashes de columnas que ya no existen en el dataset.
    pub fn forget<S: AsRef<str>>(&mut self, columns: &[S]) {
        for c in columns {
            self.hashes.shift_remove(c.as_ref());
        }
    }

    pub fn clear(&mut self) {
        self.hashes.clear();
        self.definition_hash = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn diff_ignores_columns_absent_on_both_sides() {
        let mut base = HashBaseline::default();
        base.merge(map(&[("a", "1"), ("b", "2")]));
        let diff = base.diff(&map(&[("a", "1"), ("b", "2")]), &["a", "b", "ghost"]);
        assert!(diff.changed.is_empty());
        assert_eq!(diff.compared, 2);
    }

    #[test]
    fn one_sided_presence_counts_as_changed() {
        let mut base = HashBaseline::default();
        base.merge(map(&[("a", "1"), ("b", "2")]));
        let diff = base.diff(&map(&[("a", "9"), ("c", "3")]), &["a", "b", "c"]);
        assert_eq!(diff.changed, vec!["a", "b", "c"]);
        assert_eq!(diff.compared, 3);
    }

    #[test]
    fn merge_keeps_old_where_fresh_is_silent() {
        let mut base = HashBaseline::default();
        base.merge(map(&[("a", "1"), ("b", "2")]));
        base.merge(map(&[("b", "20"), ("c", "3")]));
        assert_eq!(base.hashes(), &map(&[("a", "1"), ("b", "20"), ("c", "3")]));
        assert!(base.is_empty());
        base.set_definition_hash("def".into());
        assert!(!base.is_empty());
    }

    #[test]
    fn forgotten_columns_are_ignored_by_diff() {
        let mut base = HashBaseline::default();
        base.merge(map(&[("a", "1"), ("b", "2")]));
        base.forget(&["b"]);
        assert_eq!(base.get("b"), None);
        let diff = base.diff(&map(&[("a", "1")]), &["a", "b"]);
        assert!(diff.changed.is_empty());
        assert_eq!(diff.compared, 1);
    }
}
