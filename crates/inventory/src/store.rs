//! The inventory store: collection, draft, filters and persistence.

use std::collections::HashSet;

use eggman_core::{DomainResult, Entity};
use eggman_events::{EventBus, InMemoryEventBus, Subscription};
use eggman_storage::KeyValueStore;

use crate::equipment::{Equipment, EquipmentDraft, EquipmentId};
use crate::error::{InventoryError, InventoryResult};
use crate::filter::{EquipmentFilter, InventorySummary};
use crate::interaction::{Confirm, DELETE_PROMPT, FocusRequest};

/// Key under which the whole collection is stored.
pub const STORAGE_KEY: &str = "eggmanEquipments";

/// Result of submitting the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The draft failed validation; nothing changed.
    Rejected,
    Created(EquipmentId),
    Updated(EquipmentId),
    /// The record being edited no longer exists; the collection is unchanged.
    Stale(EquipmentId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Declined,
    NotFound,
    Deleted,
}

/// Published on the store's subscription after every state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryChange {
    Loaded { count: usize },
    Created(EquipmentId),
    Updated(EquipmentId),
    Deleted(EquipmentId),
    EditStarted(EquipmentId),
    DraftReset,
    FilterChanged,
}

/// Equipment inventory owned by the application root.
///
/// The in-memory collection only changes after the new collection has been
/// written to storage, so memory and storage agree after every successful call.
pub struct InventoryStore<S>
where
    S: KeyValueStore,
{
    storage: S,
    equipments: Vec<Equipment>,
    draft: EquipmentDraft,
    filter: EquipmentFilter,
    changes: InMemoryEventBus<InventoryChange>,
}

impl<S> core::fmt::Debug for InventoryStore<S>
where
    S: KeyValueStore,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InventoryStore")
            .field("equipments", &self.equipments.len())
            .field("draft", &self.draft)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl<S> InventoryStore<S>
where
    S: KeyValueStore,
{
    /// Load the collection from `storage` (empty when nothing was stored yet).
    ///
    /// A stored value that is not a list of complete records, or that repeats
    /// an id, is reported as [`InventoryError::Corrupt`].
    pub fn load(storage: S) -> InventoryResult<Self> {
        let equipments = match storage.get(STORAGE_KEY)? {
            Some(raw) => parse_collection(&raw)?,
            None => Vec::new(),
        };

        tracing::info!(count = equipments.len(), "inventory loaded");

        let store = Self {
            storage,
            equipments,
            draft: EquipmentDraft::blank(),
            filter: EquipmentFilter::default(),
            changes: InMemoryEventBus::new(),
        };
        store.notify(InventoryChange::Loaded {
            count: store.equipments.len(),
        });
        Ok(store)
    }

    pub fn subscribe(&self) -> Subscription<InventoryChange> {
        self.changes.subscribe()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // --- form -------------------------------------------------------------

    pub fn draft(&self) -> &EquipmentDraft {
        &self.draft
    }

    /// Mutable access for form bindings. Edits stay local to the draft.
    pub fn draft_mut(&mut self) -> &mut EquipmentDraft {
        &mut self.draft
    }

    /// True while the draft is a copy of a stored record.
    pub fn is_editing(&self) -> bool {
        self.draft.id().is_some()
    }

    pub fn is_form_valid(&self) -> bool {
        self.draft.is_valid()
    }

    /// Commit the draft: update the record being edited, or append a new one.
    pub fn save_equipment(&mut self) -> InventoryResult<SaveOutcome> {
        if let Err(reason) = self.draft.validate() {
            tracing::debug!(%reason, "save ignored: form invalid");
            return Ok(SaveOutcome::Rejected);
        }

        let mut next = self.equipments.clone();
        let outcome = match self.draft.id().cloned() {
            Some(id) => match next.iter().position(|e| e.id() == &id) {
                Some(index) => {
                    next[index] = Equipment::from_draft(id.clone(), &self.draft);
                    SaveOutcome::Updated(id)
                }
                None => {
                    tracing::warn!(%id, "edited equipment no longer exists; draft discarded");
                    SaveOutcome::Stale(id)
                }
            },
            None => {
                let id = EquipmentId::generate();
                next.push(Equipment::from_draft(id.clone(), &self.draft));
                SaveOutcome::Created(id)
            }
        };

        self.commit(next)?;
        self.draft = EquipmentDraft::blank();

        match &outcome {
            SaveOutcome::Created(id) => {
                tracing::info!(%id, "equipment created");
                self.notify(InventoryChange::Created(id.clone()));
            }
            SaveOutcome::Updated(id) => {
                tracing::info!(%id, "equipment updated");
                self.notify(InventoryChange::Updated(id.clone()));
            }
            _ => self.notify(InventoryChange::DraftReset),
        }
        Ok(outcome)
    }

    /// Load `record` into the draft and enter edit mode.
    ///
    /// The returned [`FocusRequest`] is for the rendering layer to perform after
    /// it has redrawn the form.
    pub fn edit_equipment(&mut self, record: &Equipment) -> FocusRequest {
        self.draft = EquipmentDraft::from_record(record);
        tracing::debug!(id = %record.id(), "editing equipment");
        self.notify(InventoryChange::EditStarted(record.id().clone()));
        FocusRequest::name_field()
    }

    /// Discard the draft and leave edit mode. Storage is not touched.
    pub fn cancel_edit(&mut self) {
        self.draft = EquipmentDraft::blank();
        self.notify(InventoryChange::DraftReset);
    }

    /// Remove the record with `id` once `confirm` agrees.
    pub fn delete_equipment<C>(&mut self, id: &EquipmentId, confirm: &C) -> InventoryResult<DeleteOutcome>
    where
        C: Confirm + ?Sized,
    {
        if !confirm.confirm(DELETE_PROMPT) {
            tracing::debug!(%id, "delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        let Some(index) = self.equipments.iter().position(|e| e.id() == id) else {
            return Ok(DeleteOutcome::NotFound);
        };

        let mut next = self.equipments.clone();
        next.remove(index);
        self.commit(next)?;

        tracing::info!(%id, "equipment deleted");
        self.notify(InventoryChange::Deleted(id.clone()));
        Ok(DeleteOutcome::Deleted)
    }

    // --- filters ------------------------------------------------------------

    pub fn filter(&self) -> &EquipmentFilter {
        &self.filter
    }

    pub fn set_category_filter(&mut self, category: &str) {
        self.filter.set_category(category);
        self.notify(InventoryChange::FilterChanged);
    }

    pub fn set_status_filter(&mut self, status: &str) -> DomainResult<()> {
        self.filter.set_status(status)?;
        self.notify(InventoryChange::FilterChanged);
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        self.filter = EquipmentFilter::default();
        self.notify(InventoryChange::FilterChanged);
    }

    // --- derived views --------------------------------------------------------

    pub fn equipments(&self) -> &[Equipment] {
        &self.equipments
    }

    pub fn find(&self, id: &EquipmentId) -> Option<&Equipment> {
        self.equipments.iter().find(|e| e.id() == id)
    }

    pub fn filtered_equipments(&self) -> Vec<&Equipment> {
        self.filter.apply(&self.equipments)
    }

    pub fn summary(&self) -> InventorySummary {
        InventorySummary::of(&self.equipments)
    }

    pub fn total_equipments(&self) -> usize {
        self.equipments.len()
    }

    pub fn available_count(&self) -> usize {
        self.summary().available
    }

    pub fn borrowed_count(&self) -> usize {
        self.summary().borrowed
    }

    // --- internals ------------------------------------------------------------

    /// Write `next` in full, then adopt it as the in-memory collection.
    fn commit(&mut self, next: Vec<Equipment>) -> InventoryResult<()> {
        let raw = serde_json::to_string(&next)?;
        self.storage.set(STORAGE_KEY, &raw)?;
        self.equipments = next;
        Ok(())
    }

    fn notify(&self, change: InventoryChange) {
        if let Err(err) = self.changes.publish(change) {
            tracing::warn!(?err, "failed to publish inventory change");
        }
    }
}

fn parse_collection(raw: &str) -> InventoryResult<Vec<Equipment>> {
    let equipments: Vec<Equipment> =
        serde_json::from_str(raw).map_err(|e| InventoryError::Corrupt(e.to_string()))?;

    let mut seen = HashSet::with_capacity(equipments.len());
    if let Some(dup) = equipments.iter().find(|e| !seen.insert(e.id())) {
        return Err(InventoryError::Corrupt(format!("duplicate id {}", dup.id())));
    }
    Ok(equipments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use eggman_storage::{InMemoryKeyValueStore, StorageError, StorageResult};
    use proptest::prelude::*;

    use crate::equipment::EquipmentStatus;
    use crate::interaction::FormField;

    type TestStore = InventoryStore<Arc<InMemoryKeyValueStore>>;

    fn empty_store() -> TestStore {
        InventoryStore::load(Arc::new(InMemoryKeyValueStore::new())).unwrap()
    }

    fn fill(store: &mut TestStore, name: &str, category: &str, patrimony: &str) {
        let draft = store.draft_mut();
        draft.name = name.to_string();
        draft.category = category.to_string();
        draft.patrimony = patrimony.to_string();
    }

    fn create(store: &mut TestStore, name: &str, category: &str, patrimony: &str) -> EquipmentId {
        fill(store, name, category, patrimony);
        match store.save_equipment().unwrap() {
            SaveOutcome::Created(id) => id,
            other => panic!("expected Created, got {other:?}"),
        }
    }

    fn persisted(store: &TestStore) -> Option<String> {
        store.storage().get(STORAGE_KEY).unwrap()
    }

    fn yes(_: &str) -> bool {
        true
    }

    fn no(_: &str) -> bool {
        false
    }

    #[test]
    fn load_without_stored_value_starts_empty() {
        let store = empty_store();
        assert!(store.equipments().is_empty());
        assert!(!store.is_editing());
        assert_eq!(persisted(&store), None);
    }

    #[test]
    fn load_reads_previously_stored_collection() {
        let raw = r#"[{"id":"a1","name":"Notebook Dell","category":"notebook","patrimony":"PAT-1","status":"emprestado"},
                      {"id":"b2","name":"Câmera","category":"camera","patrimony":"PAT-2","status":"disponível"}]"#;
        let store = InventoryStore::load(InMemoryKeyValueStore::with_value(STORAGE_KEY, raw)).unwrap();

        assert_eq!(store.total_equipments(), 2);
        assert_eq!(store.equipments()[0].name(), "Notebook Dell");
        assert_eq!(store.borrowed_count(), 1);
        assert_eq!(store.available_count(), 1);
    }

    #[test]
    fn load_rejects_malformed_or_duplicated_data() {
        let garbage = InMemoryKeyValueStore::with_value(STORAGE_KEY, "{not json");
        assert!(matches!(InventoryStore::load(garbage), Err(InventoryError::Corrupt(_))));

        let partial = InMemoryKeyValueStore::with_value(STORAGE_KEY, r#"[{"id":"a1","name":"x"}]"#);
        assert!(matches!(InventoryStore::load(partial), Err(InventoryError::Corrupt(_))));

        let dup = r#"[{"id":"a1","name":"x","category":"other","patrimony":"1","status":"disponível"},
                      {"id":"a1","name":"y","category":"other","patrimony":"2","status":"disponível"}]"#;
        let dup = InMemoryKeyValueStore::with_value(STORAGE_KEY, dup);
        assert!(matches!(InventoryStore::load(dup), Err(InventoryError::Corrupt(_))));
    }

    #[test]
    fn drone_lifecycle_scenario() {
        let mut store = empty_store();

        let id = create(&mut store, "Drone X", "camera", "PAT-001");
        assert_eq!(store.total_equipments(), 1);
        assert_eq!(store.available_count(), 1);
        assert_eq!(store.borrowed_count(), 0);

        let record = store.find(&id).unwrap().clone();
        let _ = store.edit_equipment(&record);
        store.draft_mut().status = EquipmentStatus::Borrowed;
        assert_eq!(store.save_equipment().unwrap(), SaveOutcome::Updated(id.clone()));
        assert_eq!(store.available_count(), 0);
        assert_eq!(store.borrowed_count(), 1);

        assert_eq!(store.delete_equipment(&id, &yes).unwrap(), DeleteOutcome::Deleted);
        assert!(store.equipments().is_empty());
        assert_eq!(persisted(&store).as_deref(), Some("[]"));
    }

    #[test]
    fn save_resets_draft_and_persists_whole_collection() {
        let mut store = empty_store();
        create(&mut store, "Projetor", "projector", "PAT-10");
        create(&mut store, "Notebook", "notebook", "PAT-11");

        assert_eq!(store.draft(), &EquipmentDraft::blank());
        assert!(!store.is_editing());

        let raw = persisted(&store).unwrap();
        let stored: Vec<Equipment> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, store.equipments());
        assert_eq!(stored[0].name(), "Projetor");
        assert_eq!(stored[1].name(), "Notebook");
    }

    #[test]
    fn update_replaces_record_in_place() {
        let mut store = empty_store();
        let first = create(&mut store, "A", "other", "1");
        create(&mut store, "B", "other", "2");

        let record = store.find(&first).unwrap().clone();
        let focus = store.edit_equipment(&record);
        assert_eq!(focus.field, FormField::Name);
        assert!(store.is_editing());

        store.draft_mut().name = "A2".to_string();
        // Draft edits are not visible until saved.
        assert_eq!(store.find(&first).unwrap().name(), "A");

        store.save_equipment().unwrap();
        assert_eq!(store.equipments()[0].id(), &first);
        assert_eq!(store.equipments()[0].name(), "A2");
        assert_eq!(store.total_equipments(), 2);
    }

    #[test]
    fn saving_a_stale_draft_leaves_collection_unchanged() {
        let mut store = empty_store();
        let id = create(&mut store, "Tripé", "other", "PAT-3");
        let keep = create(&mut store, "Cabo", "other", "PAT-4");

        let record = store.find(&id).unwrap().clone();
        let _ = store.edit_equipment(&record);
        store.delete_equipment(&id, &yes).unwrap();

        store.draft_mut().name = "Tripé novo".to_string();
        assert_eq!(store.save_equipment().unwrap(), SaveOutcome::Stale(id));
        assert_eq!(store.total_equipments(), 1);
        assert_eq!(store.equipments()[0].id(), &keep);
        assert!(!store.is_editing());
    }

    #[test]
    fn cancel_edit_leaves_collection_and_storage_untouched() {
        let mut store = empty_store();
        let id = create(&mut store, "Drone X", "camera", "PAT-001");
        let before = persisted(&store);
        let collection = store.equipments().to_vec();

        let record = store.find(&id).unwrap().clone();
        let _ = store.edit_equipment(&record);
        store.draft_mut().name = "changed".to_string();
        store.cancel_edit();

        assert_eq!(store.equipments(), collection.as_slice());
        assert_eq!(persisted(&store), before);
        assert_eq!(store.draft(), &EquipmentDraft::blank());
        assert!(!store.is_editing());
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut store = empty_store();
        let id = create(&mut store, "Drone X", "camera", "PAT-001");

        let asked = std::cell::Cell::new(0);
        let prompt = |msg: &str| {
            assert_eq!(msg, DELETE_PROMPT);
            asked.set(asked.get() + 1);
            false
        };
        assert_eq!(store.delete_equipment(&id, &prompt).unwrap(), DeleteOutcome::Declined);
        assert_eq!(asked.get(), 1);
        assert_eq!(store.delete_equipment(&id, &no).unwrap(), DeleteOutcome::Declined);
        assert_eq!(persisted(&store).map(|raw| raw.contains("Drone X")), Some(true));
        assert_eq!(store.total_equipments(), 1);
    }

    #[test]
    fn delete_of_unknown_id_does_not_write() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        let mut store = InventoryStore::load(Arc::clone(&storage)).unwrap();
        let unknown: EquipmentId = "missing".parse().unwrap();

        assert_eq!(store.delete_equipment(&unknown, &yes).unwrap(), DeleteOutcome::NotFound);
        assert_eq!(storage.get(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn filters_narrow_the_list_without_touching_counts() {
        let mut store = empty_store();
        create(&mut store, "Cam 1", "camera", "1");
        create(&mut store, "Note 1", "notebook", "2");
        create(&mut store, "Cam 2", "camera", "3");

        store.set_category_filter("camera");
        let names: Vec<_> = store.filtered_equipments().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["Cam 1", "Cam 2"]);
        assert_eq!(store.total_equipments(), 3);

        store.set_status_filter("emprestado").unwrap();
        assert!(store.filtered_equipments().is_empty());

        assert!(store.set_status_filter("perdido").is_err());
        store.clear_filters();
        assert_eq!(store.filtered_equipments().len(), 3);
    }

    #[test]
    fn subscribers_are_told_about_each_change() {
        let mut store = empty_store();
        let changes = store.subscribe();

        let id = create(&mut store, "Drone X", "camera", "PAT-001");
        let record = store.find(&id).unwrap().clone();
        let _ = store.edit_equipment(&record);
        store.cancel_edit();
        store.set_category_filter("camera");
        store.delete_equipment(&id, &yes).unwrap();

        assert_eq!(
            changes.drain(),
            vec![
                InventoryChange::Created(id.clone()),
                InventoryChange::EditStarted(id.clone()),
                InventoryChange::DraftReset,
                InventoryChange::FilterChanged,
                InventoryChange::Deleted(id),
            ]
        );
    }

    #[test]
    fn many_creates_never_share_an_id() {
        let mut store = empty_store();
        for i in 0..2_000 {
            create(&mut store, "item", "other", &i.to_string());
        }
        let ids: HashSet<_> = store.equipments().iter().map(|e| e.id().clone()).collect();
        assert_eq!(ids.len(), 2_000);
    }

    /// Accepts reads, refuses writes.
    struct ReadOnlyStorage;

    impl KeyValueStore for ReadOnlyStorage {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Poisoned)
        }
    }

    #[test]
    fn failed_write_keeps_memory_and_draft_as_they_were() {
        let mut store = InventoryStore::load(ReadOnlyStorage).unwrap();
        store.draft_mut().name = "Drone X".to_string();
        store.draft_mut().category = "camera".to_string();
        store.draft_mut().patrimony = "PAT-001".to_string();

        let err = store.save_equipment().unwrap_err();
        assert!(matches!(err, InventoryError::Storage(_)));
        assert!(store.equipments().is_empty());
        assert_eq!(store.draft().name, "Drone X");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: a draft with a blank required field never reaches the collection.
        #[test]
        fn blank_required_field_blocks_save(
            name in prop_oneof![Just(String::new()), Just("  ".to_string()), "[a-z]{1,8}"],
            category in prop_oneof![Just(String::new()), Just("camera".to_string())],
            patrimony in prop_oneof![Just(String::new()), Just("\t".to_string()), "[A-Z0-9-]{1,8}"],
        ) {
            prop_assume!(name.trim().is_empty() || category.is_empty() || patrimony.trim().is_empty());

            let mut store = empty_store();
            create(&mut store, "seed", "other", "PAT-0");
            let before = persisted(&store);

            fill(&mut store, &name, &category, &patrimony);
            prop_assert!(!store.is_form_valid());
            prop_assert_eq!(store.save_equipment().unwrap(), SaveOutcome::Rejected);
            prop_assert_eq!(store.total_equipments(), 1);
            prop_assert_eq!(persisted(&store), before);
        }

        /// Property: what is written is what is read back, in order.
        #[test]
        fn persisted_collection_round_trips(
            rows in prop::collection::vec(("[a-zA-Z ]{1,12}", "[a-z0-9-]{1,8}", any::<bool>()), 0..12),
        ) {
            let storage = Arc::new(InMemoryKeyValueStore::new());
            let mut store = InventoryStore::load(Arc::clone(&storage)).unwrap();
            for (name, patrimony, borrowed) in &rows {
                prop_assume!(!name.trim().is_empty());
                fill(&mut store, name, "notebook", patrimony);
                if *borrowed {
                    store.draft_mut().status = EquipmentStatus::Borrowed;
                }
                store.save_equipment().unwrap();
            }

            let reloaded = InventoryStore::load(storage).unwrap();
            prop_assert_eq!(reloaded.equipments(), store.equipments());
        }
    }
}
