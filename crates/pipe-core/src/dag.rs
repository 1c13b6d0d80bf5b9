//! Grafo de dependencias entre columnas.
//!
//! Nodos = identificadores de columna (con el binding de parámetros que los
//! produjo), aristas = "la columna origen alimenta a la destino". Se usa para
//! razonar invalidaciones, no para planificar ejecución.

use std::collections::{BTreeMap, HashSet};

use indexmap::IndexMap;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::frame::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnNode {
    pub name: String,
    pub params: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default)]
pub struct ColumnDag {
    graph: DiGraph<ColumnNode, ()>,
    index: IndexMap<String, NodeIndex>,
}

impl ColumnDag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta un nodo o actualiza su binding de parámetros.
    pub fn add_node(&mut self, name: &str, params: BTreeMap<String, Value>) -> NodeIndex {
        let idx = self.ensure_node(name);
        self.graph[idx].params = params;
        idx
    }

    /// Devuelve el nodo existente o lo crea sin parámetros.
    pub fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(idx) = self.index.get(name) {
            return *idx;
        }
        let idx = self.graph.add_node(ColumnNode { name: name.to_string(),
                                                   params: BTreeMap::new() });
        self.index.insert(name.to_string(), idx);
        idx
    }

    /// Arista `from → to` (idempotente).
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let a = self.ensure_node(from);
        let b = self.ensure_node(to);
        self.graph.update_edge(a, b, ());
    }

    /// Unión con otro grafo: los atributos de nodos de `other` prevalecen
    /// cuando traen parámetros.
    pub fn extend(&mut self, other: &ColumnDag) {
        for node in other.graph.node_weights() {
            if node.params.is_empty() {
                self.ensure_node(&node.name);
            } else {
                self.add_node(&node.name, node.params.clone());
            }
        }
        for (from, to) in other.edges() {
            self.add_edge(&from, &to);
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn node(&self, name: &str) -> Option<&ColumnNode> {
        self.index.get(name).map(|idx| &self.graph[*idx])
    }

    /// Nombres de nodos en orden de inserción.
    pub fn node_names(&self) -> Vec<String> {
        self.index.keys().cloned().collect()
    }

    pub fn edges(&self) -> Vec<(String, String)> {
        self.graph
            .raw_edges()
            .iter()
            .map(|e| (self.graph[e.source()].name.clone(), self.graph[e.target()].name.clone()))
            .collect()
    }

    /// Sucesores directos, en orden de inserción.
    pub fn successors(&self, name: &str) -> Vec<String> {
        let Some(idx) = self.index.get(name) else {
            return Vec::new();
        };
        let mut out: Vec<NodeIndex> = self.graph.neighbors_directed(*idx, Direction::Outgoing).collect();
        out.sort();
        out.into_iter().map(|n| self.graph[n].name.clone()).collect()
    }

    /// Todos los descendientes (transitivos) de `name`, sin incluirlo.
    pub fn descendants(&self, name: &str) -> Vec<String> {
        let Some(start) = self.index.get(name).copied() else {
            return Vec::new();
        };
        let mut visited = HashSet::new();
        let mut stack = vec![start];
        let mut found = Vec::new();
        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            if node != start {
                found.push(node);
            }
            stack.extend(self.graph.neighbors_directed(node, Direction::Outgoing));
        }
        found.sort();
        found.into_iter().map(|n| self.graph[n].name.clone()).collect()
    }

    /// Conjunto a recomputar: columnas cambiadas ∪ sus descendientes, en
    /// orden de inserción del grafo. Nombres desconocidos se conservan al
    /// final tal cual.
    pub fn recompute_set<S: AsRef<str>>(&self, changed: &[S]) -> Vec<String> {
        let mut known: Vec<NodeIndex> = Vec::new();
        let mut unknown: Vec<String> = Vec::new();
        for c in changed {
            match self.index.get(c.as_ref()) {
                Some(idx) => {
                    known.push(*idx);
                    for d in self.descendants(c.as_ref()) {
                        if let Some(di) = self.index.get(&d) {
                            known.push(*di);
                        }
                    }
                }
                None => unknown.push(c.as_ref().to_string()),
            }
        }
        known.sort();
        known.dedup();
        let mut out: Vec<String> = known.into_iter().map(|n| self.graph[n].name.clone()).collect();
        for u in unknown {
            if !out.contains(&u) {
                out.push(u);
            }
        }
        out
    }

    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }
}
