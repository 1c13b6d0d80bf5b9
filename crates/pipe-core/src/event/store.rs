use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use super::{RunEvent, RunEventKind};

/// Almacenamiento de eventos append-only.
pub trait EventStore {
    /// Agrega un evento a partir de su kind y devuelve el evento completo (con seq y ts).
    fn append_kind(&mut self, pipeline_id: Uuid, kind: RunEventKind) -> RunEvent;
    /// Lista eventos de un pipeline (orden ascendente por seq).
    fn list(&self, pipeline_id: Uuid) -> Vec<RunEvent>;
}

#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    pub inner: HashMap<Uuid, Vec<RunEvent>>,
}

impl EventStore for InMemoryEventStore {
    fn append_kind(&mut self, pipeline_id: Uuid, kind: RunEventKind) -> RunEvent {
        let vec = self.inner.entry(pipeline_id).or_default();
        let ev = RunEvent { seq: vec.len() as u64,
                            pipeline_id,
                            kind,
                            ts: Utc::now() };
        vec.push(ev.clone());
        ev
    }

    fn list(&self, pipeline_id: Uuid) -> Vec<RunEvent> {
        self.inner.get(&pipeline_id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_per_pipeline() {
        let mut store = InMemoryEventStore::default();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(store.append_kind(a, RunEventKind::NoChangesDetected).seq, 0);
        assert_eq!(store.append_kind(a, RunEventKind::NoChangesDetected).seq, 1);
        assert_eq!(store.append_kind(b, RunEventKind::NoChangesDetected).seq, 0);
        assert_eq!(store.list(a).len(), 2);
        assert!(store.list(Uuid::new_v4()).is_empty());
    }
}
