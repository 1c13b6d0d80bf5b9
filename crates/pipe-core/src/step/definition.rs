use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as Json};

use super::naming::{expand, ColumnBinding};
use super::StepConfig;
use crate::constants::ROLE_IN;
use crate::dag::ColumnDag;
use crate::errors::PipeError;
use crate::frame::DataFrame;

/// Tipo general del step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    /// Sin columnas de entrada; aporta columnas nativas del dataset.
    Extract,
    Transform,
    /// Una salida por target (`target|Model`).
    Model,
    /// Sin columnas de salida; consume todo lo disponible aguas arriba.
    Load,
}

/// Contrato de un Step.
///
/// Las implementaciones sólo tienen que exponer nombre, tipo, configuración y
/// `transform`; el resto tiene defaults basados en el rol `in` y en la regla
/// de naming. `transform` nunca elimina columnas existentes (salvo que un
/// step de carga devuelve su input tal cual tras el efecto externo).
pub trait Step: std::fmt::Debug + Send {
    /// Nombre usado en las columnas derivadas (`source|Name`).
    fn name(&self) -> &str;

    fn kind(&self) -> StepKind;

    fn config(&self) -> &StepConfig;

    fn config_mut(&mut self) -> &mut StepConfig;

    /// Expansión columna fuente → columna derivada.
    fn bindings(&self) -> Vec<ColumnBinding> {
        expand(self.name(), &self.config().bound(ROLE_IN), self.config())
    }

    fn columns_in(&self) -> Vec<String> {
        self.config().columns_in()
    }

    /// Columnas producidas, sin duplicados y en orden de expansión.
    fn columns_out(&self) -> Vec<String> {
        let set: IndexSet<String> = self.bindings().into_iter().map(|b| b.output).collect();
        set.into_iter().collect()
    }

    /// Fragmento de DAG: una arista por (input → output), con el binding de
    /// parámetros anotado en el nodo de salida.
    fn dag(&self) -> ColumnDag {
        let mut dag = ColumnDag::new();
        for b in self.bindings() {
            // la fuente antes que su derivada: fija el orden de `recompute_set`
            dag.ensure_node(&b.source);
            dag.add_node(&b.output, b.params.clone());
            dag.add_edge(&b.source, &b.output);
        }
        dag
    }

    /// Actualiza las opciones seleccionables de los roles de entrada.
    fn update_available_columns(&mut self, columns: &[String]) -> Result<(), PipeError> {
        self.config_mut().set_available_columns(columns)
    }

    /// Aprende coeficientes a partir del dataset (no lo modifica).
    fn fit(&mut self, _df: &DataFrame) -> Result<(), PipeError> {
        Ok(())
    }

    fn transform(&self, df: DataFrame) -> Result<DataFrame, PipeError>;

    fn fit_transform(&mut self, df: DataFrame) -> Result<DataFrame, PipeError> {
        self.fit(&df)?;
        self.transform(df)
    }

    /// Estado aprendido en el último `fit`.
    fn coeffs(&self) -> IndexMap<String, f64> {
        IndexMap::new()
    }

    /// Descripción determinista del step (entra en el hash de definición).
    fn definition(&self) -> Json {
        json!({
            "name": self.name(),
            "kind": self.kind(),
            "config": self.config(),
        })
    }
}
