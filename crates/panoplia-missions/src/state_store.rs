// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Versioned persistence of mission states.
//!
//! All states live in one document under `mission-states`:
//!
//! ```json
//! { "version": 2, "missions": { "<id>": { "status": "active", ... } } }
//! ```
//!
//! Two older layouts are folded into it the first time the document is read:
//! the version-less `{ "<id>": state }` map, and the numeric-id
//! `enhanced-mission-states` key. The latter is removed once the merged
//! document has been written.
//!
//! Entries are decoded one by one. An entry that does not decode is logged
//! and written back verbatim, so it never costs the other missions their
//! status. When the document as a whole cannot be read, every write is
//! refused rather than replacing it with an empty one.

use std::collections::BTreeMap;
use std::sync::Arc;

use panoplia_core::{Clock, EpochMillis, MissionId};
use panoplia_storage::{SafeStore, Stored, keys};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::registry::MissionRegistry;
use crate::state::{MissionState, MissionStatus};

/// Current layout of the `mission-states` document.
pub const SCHEMA_VERSION: u32 = 2;

/// The decoded `mission-states` document.
#[derive(Debug, Clone, PartialEq, Default)]
struct StateDocument {
    missions: BTreeMap<MissionId, MissionState>,
    /// Entries that did not decode, keyed as stored.
    kept: BTreeMap<String, Value>,
}

impl StateDocument {
    fn insert_entry(&mut self, key: String, value: Value) -> Option<&mut MissionState> {
        match serde_json::from_value::<MissionState>(value.clone()) {
            Ok(mut state) => {
                let id = MissionId::new(key);
                state.id = id.clone();
                self.kept.remove(id.as_str());
                self.missions.insert(id.clone(), state);
                self.missions.get_mut(&id)
            }
            Err(e) => {
                warn!(mission_id = %key, error = %e, "keeping undecodable mission state as is");
                self.kept.insert(key, value);
                None
            }
        }
    }
}

#[derive(Deserialize)]
struct RawDocument {
    version: u32,
    missions: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStates {
    Versioned(RawDocument),
    Unversioned(BTreeMap<String, Value>),
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    version: u32,
    missions: BTreeMap<&'a str, EntryRef<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum EntryRef<'a> {
    State(&'a MissionState),
    Kept(&'a Value),
}

/// Entry of the numeric-id layout.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyState {
    #[serde(default)]
    status: String,
    #[serde(default)]
    checkboxes: BTreeMap<String, bool>,
    #[serde(default)]
    quiz_score: f64,
    #[serde(default)]
    updated_at: Option<EpochMillis>,
}

fn legacy_status(status: &str) -> Option<MissionStatus> {
    match status {
        "active" | "in_progress" | "in-progress" | "started" => Some(MissionStatus::Active),
        "completed" => Some(MissionStatus::Completed),
        "failed" | "expired" => Some(MissionStatus::Expired),
        "abandoned" => Some(MissionStatus::Abandoned),
        _ => None,
    }
}

/// Unversioned entries may predate the window anchor. Fall back to the last
/// update, then to `now`, so migration does not expire them.
fn anchor_window(state: &mut MissionState, now: EpochMillis) {
    if state.started_at == 0 {
        state.started_at = if state.updated_at > 0 { state.updated_at } else { now };
    }
}

/// Reads and writes mission states, migrating older layouts on load.
#[derive(Clone)]
pub struct MissionStateStore {
    store: SafeStore,
    registry: Arc<MissionRegistry>,
    clock: Arc<dyn Clock>,
}

impl MissionStateStore {
    pub fn new(store: SafeStore, registry: Arc<MissionRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            registry,
            clock,
        }
    }

    /// The current document, migrating older layouts on the way.
    ///
    /// `None` when the stored document could not be read at all.
    fn load(&self) -> Option<StateDocument> {
        let mut migrated = false;
        let mut doc = StateDocument::default();
        match self.store.load_json::<RawStates>(keys::MISSION_STATES) {
            Stored::Present(RawStates::Versioned(raw)) => {
                if raw.version > SCHEMA_VERSION {
                    warn!(
                        version = raw.version,
                        supported = SCHEMA_VERSION,
                        "mission states written by a newer release"
                    );
                }
                for (key, value) in raw.missions {
                    doc.insert_entry(key, value);
                }
            }
            Stored::Present(RawStates::Unversioned(map)) => {
                migrated = true;
                let now = self.clock.now_millis();
                for (key, value) in map {
                    if let Some(state) = doc.insert_entry(key, value) {
                        anchor_window(state, now);
                    }
                }
                info!("wrapping unversioned mission states");
            }
            Stored::Absent => {}
            Stored::Unreadable => return None,
        }

        if let Stored::Present(legacy) = self
            .store
            .load_json::<BTreeMap<String, Value>>(keys::LEGACY_MISSION_STATES)
        {
            let (merged, kept) = self.merge_legacy(&mut doc, legacy);
            info!(merged, kept, "migrated legacy mission states");
            migrated = true;
        }

        if migrated && self.save(&doc) {
            self.store.remove(keys::LEGACY_MISSION_STATES);
        }
        Some(doc)
    }

    /// Fold numeric-id entries into `doc`. Entries already present win.
    ///
    /// Entries that do not decode are carried over verbatim as
    /// `legacy-<n>`. Returns how many entries were merged and kept.
    fn merge_legacy(
        &self,
        doc: &mut StateDocument,
        legacy: BTreeMap<String, Value>,
    ) -> (usize, usize) {
        let now = self.clock.now_millis();
        let (mut merged, mut kept) = (0, 0);
        for (key, value) in legacy {
            let entry = match serde_json::from_value::<LegacyState>(value.clone()) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(legacy_id = %key, error = %e, "undecodable legacy mission state");
                    doc.kept.entry(format!("legacy-{key}")).or_insert(value);
                    kept += 1;
                    continue;
                }
            };
            let Some(status) = legacy_status(&entry.status) else {
                debug!(legacy_id = %key, status = %entry.status, "skipping legacy entry without a status");
                continue;
            };
            let id = key
                .parse::<u32>()
                .ok()
                .and_then(|n| self.registry.by_legacy_id(n))
                .map(|def| def.id.clone())
                .unwrap_or_else(|| MissionId::new(format!("legacy-{key}")));
            if doc.missions.contains_key(&id) || doc.kept.contains_key(id.as_str()) {
                continue;
            }

            let at = entry.updated_at.unwrap_or(now);
            let state = MissionState {
                id: id.clone(),
                status,
                checklist: entry.checkboxes,
                quiz_score: entry.quiz_score.clamp(0.0, 100.0).round() as u8,
                started_at: at,
                updated_at: at,
            };
            doc.missions.insert(id, state);
            merged += 1;
        }
        (merged, kept)
    }

    fn save(&self, doc: &StateDocument) -> bool {
        let mut missions: BTreeMap<&str, EntryRef<'_>> = doc
            .kept
            .iter()
            .map(|(key, value)| (key.as_str(), EntryRef::Kept(value)))
            .collect();
        for (id, state) in &doc.missions {
            missions.insert(id.as_str(), EntryRef::State(state));
        }
        let document = DocumentRef {
            version: SCHEMA_VERSION,
            missions,
        };
        self.store.write_json(keys::MISSION_STATES, &document)
    }

    /// `None` for an unknown id, and also while the document is unreadable.
    pub fn get(&self, id: &MissionId) -> Option<MissionState> {
        self.load()?.missions.remove(id)
    }

    /// The state of `id`, created as active on first interaction.
    ///
    /// `None` when the document is unreadable or a new state could not be
    /// persisted.
    pub fn get_or_create(&self, id: &MissionId) -> Option<MissionState> {
        let Some(mut doc) = self.load() else {
            warn!(mission_id = %id, "mission states unreadable; not creating state");
            return None;
        };
        if let Some(state) = doc.missions.get(id) {
            return Some(state.clone());
        }
        if doc.kept.contains_key(id.as_str()) {
            warn!(mission_id = %id, "stored state is undecodable; not replacing it");
            return None;
        }
        let state = MissionState::new(id.clone(), self.clock.now_millis());
        doc.missions.insert(id.clone(), state.clone());
        if !self.save(&doc) {
            return None;
        }
        debug!(mission_id = %id, "mission state created");
        Some(state)
    }

    pub fn put(&self, state: &MissionState) -> bool {
        self.put_many(std::slice::from_ref(state))
    }

    /// Write several states with a single document update. Refused while the
    /// stored document is unreadable.
    pub fn put_many(&self, states: &[MissionState]) -> bool {
        if states.is_empty() {
            return true;
        }
        let Some(mut doc) = self.load() else {
            warn!(count = states.len(), "mission states unreadable; write refused");
            return false;
        };
        for state in states {
            doc.kept.remove(state.id.as_str());
            doc.missions.insert(state.id.clone(), state.clone());
        }
        self.save(&doc)
    }

    pub fn all(&self) -> Vec<MissionState> {
        self.load()
            .map(|doc| doc.missions.into_values().collect())
            .unwrap_or_default()
    }

    /// Delete every mission state, legacy layout included.
    pub fn reset_all(&self) -> bool {
        let cleared = self.store.remove(keys::MISSION_STATES)
            && self.store.remove(keys::LEGACY_MISSION_STATES);
        if cleared {
            info!("all mission states reset");
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use panoplia_core::{HealthStatus, KvStore, ManualClock, PanopliaError};
    use panoplia_storage::MemoryStore;

    /// Memory store whose reads can be made to fail.
    #[derive(Default)]
    struct FlakyReads {
        inner: MemoryStore,
        failing: AtomicBool,
    }

    impl KvStore for FlakyReads {
        fn name(&self) -> &str {
            "flaky"
        }

        fn get(&self, key: &str) -> Result<Option<String>, PanopliaError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(PanopliaError::Internal("read timed out".into()));
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), PanopliaError> {
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), PanopliaError> {
            self.inner.remove(key)
        }

        fn health_check(&self) -> HealthStatus {
            self.inner.health_check()
        }
    }

    fn store_on(backend: Arc<dyn KvStore>) -> (MissionStateStore, SafeStore) {
        let safe = SafeStore::new(backend);
        let store = MissionStateStore::new(
            safe.clone(),
            Arc::new(MissionRegistry::builtin()),
            Arc::new(ManualClock::new(10_000)),
        );
        (store, safe)
    }

    fn fixture() -> (MissionStateStore, SafeStore) {
        let safe = SafeStore::new(Arc::new(MemoryStore::new()));
        let clock = Arc::new(ManualClock::new(10_000));
        let store = MissionStateStore::new(
            safe.clone(),
            Arc::new(MissionRegistry::builtin()),
            clock,
        );
        (store, safe)
    }

    fn write_raw(safe: &SafeStore, key: &str, value: serde_json::Value) {
        assert!(safe.write_json(key, &value));
    }

    #[test]
    fn get_or_create_starts_active_and_persists() {
        let (store, safe) = fixture();
        let id = MissionId::new("jejum");
        assert!(store.get(&id).is_none());

        let state = store.get_or_create(&id).unwrap();
        assert_eq!(state.status, MissionStatus::Active);
        assert_eq!(state.started_at, 10_000);
        assert_eq!(store.get(&id), Some(state));

        let raw: serde_json::Value = safe.read_json(keys::MISSION_STATES).unwrap();
        assert_eq!(raw["version"], SCHEMA_VERSION);
        assert_eq!(raw["missions"]["jejum"]["status"], "active");
    }

    #[test]
    fn unversioned_map_is_wrapped() {
        let (store, safe) = fixture();
        write_raw(
            &safe,
            keys::MISSION_STATES,
            serde_json::json!({
                "jejum": { "status": "completed", "quizScore": 0, "updatedAt": 5 }
            }),
        );

        let state = store.get(&MissionId::new("jejum")).unwrap();
        assert_eq!(state.id.as_str(), "jejum");
        assert_eq!(state.status, MissionStatus::Completed);

        let raw: serde_json::Value = safe.read_json(keys::MISSION_STATES).unwrap();
        assert_eq!(raw["version"], SCHEMA_VERSION);
    }

    #[test]
    fn unversioned_entries_get_a_window_anchor() {
        let (store, safe) = fixture();
        write_raw(
            &safe,
            keys::MISSION_STATES,
            serde_json::json!({
                "jejum": { "status": "active", "quizScore": 0, "updatedAt": 9_000 },
                "louvor-diario": { "status": "active" },
                "mente-renovada": { "status": "active", "startedAt": 4_000, "updatedAt": 9_500 }
            }),
        );

        assert_eq!(store.get(&MissionId::new("jejum")).unwrap().started_at, 9_000);
        assert_eq!(
            store.get(&MissionId::new("louvor-diario")).unwrap().started_at,
            10_000
        );
        assert_eq!(
            store.get(&MissionId::new("mente-renovada")).unwrap().started_at,
            4_000
        );
    }

    #[test]
    fn undecodable_entry_is_kept_verbatim() {
        let (store, safe) = fixture();
        write_raw(
            &safe,
            keys::MISSION_STATES,
            serde_json::json!({
                "version": 2,
                "missions": {
                    "jejum": { "id": "jejum", "status": "completed" },
                    "outra": { "id": "outra", "status": "failed" }
                }
            }),
        );

        assert_eq!(
            store.get(&MissionId::new("jejum")).unwrap().status,
            MissionStatus::Completed
        );
        assert!(store.get(&MissionId::new("outra")).is_none());
        assert!(store.get_or_create(&MissionId::new("outra")).is_none());

        assert!(store.put(&MissionState::new(MissionId::new("falar-a-verdade"), 10_000)));
        let raw: serde_json::Value = safe.read_json(keys::MISSION_STATES).unwrap();
        assert_eq!(raw["missions"]["jejum"]["status"], "completed");
        assert_eq!(raw["missions"]["outra"]["status"], "failed");
        assert_eq!(raw["missions"]["falar-a-verdade"]["status"], "active");
    }

    #[test]
    fn unreadable_document_is_never_overwritten() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(keys::MISSION_STATES, "{\"version\": 2, \"missions\"").unwrap();
        let (store, safe) = store_on(backend);

        assert!(store.all().is_empty());
        assert!(store.get_or_create(&MissionId::new("jejum")).is_none());
        assert!(!store.put(&MissionState::new(MissionId::new("jejum"), 10_000)));
        assert_eq!(
            safe.read_raw(keys::MISSION_STATES).as_deref(),
            Some("{\"version\": 2, \"missions\"")
        );
    }

    #[test]
    fn failed_read_then_write_keeps_terminal_states() {
        let backend = Arc::new(FlakyReads::default());
        let (store, safe) = store_on(backend.clone());
        let mut done = MissionState::new(MissionId::new("jejum"), 10_000);
        done.transition(MissionStatus::Completed, 10_000);
        assert!(store.put(&done));

        backend.failing.store(true, Ordering::SeqCst);
        assert!(store.get(&MissionId::new("jejum")).is_none());
        assert!(!store.put(&MissionState::new(MissionId::new("mente-renovada"), 10_000)));
        assert!(store.get_or_create(&MissionId::new("jejum")).is_none());

        backend.failing.store(false, Ordering::SeqCst);
        assert_eq!(store.get(&MissionId::new("jejum")), Some(done));
        assert!(store.get(&MissionId::new("mente-renovada")).is_none());
        assert!(safe.read_raw(keys::MISSION_STATES).is_some());
    }

    #[test]
    fn legacy_states_are_migrated_once() {
        let (store, safe) = fixture();
        write_raw(
            &safe,
            keys::MISSION_STATES,
            serde_json::json!({
                "version": 2,
                "missions": {
                    "falar-a-verdade": { "id": "falar-a-verdade", "status": "abandoned" }
                }
            }),
        );
        write_raw(
            &safe,
            keys::LEGACY_MISSION_STATES,
            serde_json::json!({
                "1": { "status": "failed", "checkboxes": {}, "quizScore": 0, "updatedAt": 7 },
                "2": { "status": "completed" },
                "12": { "status": "in_progress", "checkboxes": { "oracao": true }, "quizScore": 140.0 },
                "99": { "status": "completed" },
                "13": { "status": "locked" },
                "7": { "status": "completed", "quizScore": "alto" }
            }),
        );

        let states: BTreeMap<_, _> = store
            .all()
            .into_iter()
            .map(|s| (s.id.as_str().to_string(), s))
            .collect();

        assert_eq!(states["cinturao-da-verdade"].status, MissionStatus::Expired);
        assert_eq!(states["cinturao-da-verdade"].updated_at, 7);
        // already present in the new document
        assert_eq!(states["falar-a-verdade"].status, MissionStatus::Abandoned);
        assert_eq!(states["rotina-matinal"].status, MissionStatus::Active);
        assert!(states["rotina-matinal"].is_checked("oracao"));
        assert_eq!(states["rotina-matinal"].quiz_score, 100);
        assert_eq!(states["legacy-99"].status, MissionStatus::Completed);
        assert!(!states.contains_key("jejum"));

        assert!(!states.contains_key("memorizar-versiculo"));
        let raw: serde_json::Value = safe.read_json(keys::MISSION_STATES).unwrap();
        assert_eq!(raw["missions"]["legacy-7"]["quizScore"], "alto");

        assert!(safe.read_raw(keys::LEGACY_MISSION_STATES).is_none());
    }

    #[test]
    fn put_many_and_reset_all() {
        let (store, _) = fixture();
        let a = MissionState::new(MissionId::new("a"), 1);
        let b = MissionState::new(MissionId::new("b"), 2);
        assert!(store.put_many(&[a, b]));
        assert_eq!(store.all().len(), 2);

        assert!(store.reset_all());
        assert!(store.all().is_empty());
    }

    #[test]
    fn unavailable_storage_degrades() {
        let safe = SafeStore::new(Arc::new(MemoryStore::disabled()));
        let store = MissionStateStore::new(
            safe,
            Arc::new(MissionRegistry::builtin()),
            Arc::new(ManualClock::new(0)),
        );
        assert!(store.get_or_create(&MissionId::new("jejum")).is_none());
        assert!(!store.put(&MissionState::new(MissionId::new("jejum"), 0)));
        assert!(store.all().is_empty());
    }
}
