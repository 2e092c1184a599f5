//! Beziehungs-Speicher des Diagramms in Einfüge-Reihenfolge.

use anyhow::Context;
use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::ids::{Clock, IdGenerator, SequentialIds, SystemClock};
use super::relation::{EditableRelation, Endpoint, Relation, RelationData};

/// Alle Beziehungen des Diagramms, erreichbar über ihre ID.
pub struct RelationStore {
    relations: IndexMap<String, Relation>,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
}

impl Default for RelationStore {
    fn default() -> Self {
        Self::new(SequentialIds::new("relation"), SystemClock)
    }
}

impl std::fmt::Debug for RelationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationStore")
            .field("relations", &self.relations)
            .finish_non_exhaustive()
    }
}

/// Entfernt Schlüssel mit leeren Werten (`null`, `false`, `0`, `""`).
fn omit_empty(seed: Map<String, Value>) -> Map<String, Value> {
    seed.into_iter()
        .filter(|(_, value)| match value {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
        .collect()
}

impl RelationStore {
    pub fn new(ids: impl IdGenerator + 'static, clock: impl Clock + 'static) -> Self {
        Self {
            relations: IndexMap::new(),
            ids: Box::new(ids),
            clock: Box::new(clock),
        }
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Erzeugt eine neue Beziehung aus `seed` (Standardwerte für alles Fehlende).
    ///
    /// Leere Seed-Werte werden ignoriert. Eine nicht-leere `id` im Seed
    /// ersetzt die generierte ID.
    pub fn create(&mut self, seed: Value) -> anyhow::Result<&mut Relation> {
        let mut seed = match seed {
            Value::Object(map) => omit_empty(map),
            Value::Null => Map::new(),
            other => anyhow::bail!("Seed muss ein JSON-Objekt sein, erhalten: {}", other),
        };

        let id = match seed.remove("id") {
            Some(Value::String(id)) => id,
            _ => self.fresh_id(),
        };
        let mut relation = Relation::new(RelationData::new(id.clone(), self.clock.now_millis()));
        relation
            .set_data(Value::Object(seed))
            .with_context(|| format!("Beziehung '{}' konnte nicht erstellt werden", id))?;

        log::debug!(
            "Beziehung '{}' erstellt ({} → {})",
            id,
            relation.from(),
            relation.to()
        );
        Ok(self.attach(relation))
    }

    /// Hängt eine vorhandene Beziehung an; leere IDs werden neu vergeben,
    /// gleiche IDs ersetzen den bisherigen Eintrag.
    pub fn attach(&mut self, mut relation: Relation) -> &mut Relation {
        if relation.id().is_empty() {
            relation.set_id(self.fresh_id());
        }
        let id = relation.id().to_string();
        let (index, replaced) = self.relations.insert_full(id, relation);
        if let Some(old) = replaced {
            log::warn!("Beziehung '{}' wurde ersetzt", old.id());
        }
        &mut self.relations[index]
    }

    /// Nächste generierte ID, die noch nicht vergeben ist.
    fn fresh_id(&mut self) -> String {
        loop {
            let id = self.ids.next_id();
            if !self.relations.contains_key(&id) {
                return id;
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Relation> {
        self.relations.shift_remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Relation> {
        self.relations.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Relation> {
        self.relations.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relation> {
        self.relations.values()
    }

    /// Beziehungen, die `node_id` als Start oder Ziel haben.
    pub fn relations_by_node(&self, node_id: &str) -> Vec<&Relation> {
        self.relations
            .values()
            .filter(|r| r.from() == node_id || r.to() == node_id)
            .collect()
    }

    /// Löst alle Endpunkte, die auf `node_id` zeigen (samt Prozent-Anker).
    pub fn unbind_node(&mut self, node_id: &str) -> usize {
        if node_id.is_empty() {
            return 0;
        }
        let mut unbound = 0;
        for relation in self.relations.values_mut() {
            for end in Endpoint::BOTH {
                if relation.endpoint_node(end) == node_id {
                    relation.bind_endpoint(end, "");
                    relation.set_percent(end, None);
                    unbound += 1;
                }
            }
        }
        unbound
    }

    /// Entfernt alle Beziehungen mit leerem `from` oder `to`.
    pub fn remove_disabled(&mut self) -> Vec<Relation> {
        let disabled: Vec<String> = self
            .relations
            .values()
            .filter(|r| r.from().is_empty() || r.to().is_empty())
            .map(|r| r.id().to_string())
            .collect();

        let removed: Vec<Relation> = disabled
            .iter()
            .filter_map(|id| self.relations.shift_remove(id))
            .collect();
        if !removed.is_empty() {
            log::info!("{} unvollständige Beziehung(en) entfernt", removed.len());
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::FixedClock;
    use serde_json::json;

    fn store() -> RelationStore {
        RelationStore::new(SequentialIds::new("rel"), FixedClock(42))
    }

    #[test]
    fn create_merges_seed_over_defaults() {
        let mut store = store();
        let rel = store
            .create(json!({ "from": "a", "to": "b", "text": "", "line-color": "#f00" }))
            .expect("Erstellung erwartet");
        assert_eq!(rel.id(), "rel-1");
        assert_eq!(rel.data().created, 42);
        assert_eq!(rel.line_style().color, "#f00");
        assert_eq!(rel.text(), crate::core::DEFAULT_RELATION_TEXT);
    }

    #[test]
    fn create_keeps_seeded_id() {
        let mut store = store();
        store
            .create(json!({ "id": "fest", "from": "a" }))
            .expect("Erstellung erwartet");
        assert!(store.get("fest").is_some());
    }

    #[test]
    fn create_rejects_non_object_seed() {
        let mut store = store();
        assert!(store.create(json!("a")).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn relations_by_node_matches_both_ends() {
        let mut store = store();
        store.create(json!({ "from": "a", "to": "b" })).expect("r1");
        store.create(json!({ "from": "b", "to": "c" })).expect("r2");
        store.create(json!({ "from": "c", "to": "d" })).expect("r3");
        let ids: Vec<&str> = store.relations_by_node("b").iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["rel-1", "rel-2"]);
    }

    #[test]
    fn unbind_then_sweep_removes_dangling_relations() {
        let mut store = store();
        store
            .create(json!({ "from": "a", "to": "b", "toPoint": 0.5 }))
            .expect("r1");
        store.create(json!({ "from": "c", "to": "d" })).expect("r2");

        assert_eq!(store.unbind_node("b"), 1);
        let rel = store.get("rel-1").expect("r1");
        assert_eq!(rel.to(), "");
        assert_eq!(rel.percent(Endpoint::To), None);

        let removed = store.remove_disabled();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id(), "rel-1");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn generated_ids_skip_loaded_ones() {
        let mut store = store();
        store.attach(Relation::new(RelationData::new("rel-1", 0)));
        let rel = store.create(json!({ "from": "a" })).expect("Erstellung erwartet");
        assert_eq!(rel.id(), "rel-2");
    }

    #[test]
    fn attach_assigns_missing_id_and_replaces_duplicates() {
        let mut store = store();
        let id = store.attach(Relation::new(RelationData::new("", 0))).id().to_string();
        assert_eq!(id, "rel-1");

        let mut data = RelationData::new("rel-1", 0);
        data.text = "neu".into();
        store.attach(Relation::new(data));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("rel-1").map(|r| r.text()), Some("neu"));
    }
}
