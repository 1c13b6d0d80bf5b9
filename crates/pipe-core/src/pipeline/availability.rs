//! Propagación de columnas disponibles.
//!
//! Se recalcula desde cero cada vez que cambia la lista de steps o la
//! configuración de alguno, en lugar de mutar listas compartidas en sitio.

use indexmap::IndexSet;

use crate::errors::PipeError;
use crate::step::{Step, StepKind};

/// Para cada step `i`: columnas semilla ∪ salidas de los steps `0..i`.
pub fn available_columns(steps: &[Box<dyn Step>], seed: &[String]) -> Vec<Vec<String>> {
    let mut pool: IndexSet<String> = seed.iter().cloned().collect();
    let mut out = Vec::with_capacity(steps.len());
    for step in steps {
        out.push(pool.iter().cloned().collect());
        pool.extend(step.columns_out());
    }
    out
}

/// Verifica que cada input ligado esté disponible para su step. Los steps de
/// carga consumen todo lo disponible y no se verifican.
pub fn check_bindings(steps: &[Box<dyn Step>], pools: &[Vec<String>]) -> Result<(), PipeError> {
    for (step, pool) in steps.iter().zip(pools) {
        if step.kind() == StepKind::Load {
            continue;
        }
        if let Some(missing) = step.columns_in().into_iter().find(|c| !pool.contains(c)) {
            return Err(PipeError::validation(format!("{}.{missing}", step.name()),
                                             "column is not produced by an upstream step"));
        }
    }
    Ok(())
}
