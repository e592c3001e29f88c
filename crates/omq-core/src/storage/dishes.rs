//! Dish collection with plan-tier gating
//!
//! Loaded once from `dishes` and written back in full after every change.
//! The plan used for gating is passed in by the caller so the decision is
//! made against whatever plan is current at call time.

use std::collections::HashSet;

use anyhow::Result;
use tracing::info;

use super::{subscription, LocalStorage};
use crate::constants::keys;
use crate::dish::{Dish, DishFields};
use crate::plan::{PlanTier, UpgradePrompt};

/// Result of an add
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(Dish),
    /// Plan limit reached; nothing changed
    LimitReached(UpgradePrompt),
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added(_))
    }
}

/// Result of a duplicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateOutcome {
    Duplicated(Dish),
    /// No dish with that id; nothing changed
    NotFound,
    /// Plan limit reached; nothing changed
    LimitReached(UpgradePrompt),
}

/// The owner's dishes, mirrored to local storage
pub struct DishStore<'a> {
    storage: &'a LocalStorage,
    dishes: Vec<Dish>,
}

impl<'a> DishStore<'a> {
    /// Rehydrate from storage. Missing or malformed data starts empty;
    /// a failed read is returned so nothing overwrites the stored list.
    pub fn load(storage: &'a LocalStorage) -> Result<Self> {
        let dishes: Vec<Dish> = storage.get_json(keys::DISHES)?.unwrap_or_default();
        info!("Loaded {} dishes", dishes.len());
        Ok(Self { storage, dishes })
    }

    /// All dishes in insertion order
    pub fn dishes(&self) -> &[Dish] {
        &self.dishes
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }

    /// Find a dish by id
    pub fn get(&self, id: &str) -> Option<&Dish> {
        self.dishes.iter().find(|d| d.id == id)
    }

    /// Active plan as currently persisted
    pub fn current_plan(&self) -> Result<PlanTier> {
        subscription::current_plan(self.storage)
    }

    /// Whether one more dish fits under `plan`
    pub fn can_add(&self, plan: PlanTier) -> bool {
        plan.allows(self.dishes.len())
    }

    /// Whether the collection is full (or over, after a downgrade)
    pub fn is_at_limit(&self, plan: PlanTier) -> bool {
        !self.can_add(plan)
    }

    /// Create a dish unless `plan` is already full
    pub fn add_dish(&mut self, fields: DishFields, plan: PlanTier) -> Result<AddOutcome> {
        if !self.can_add(plan) {
            info!(
                "Add refused: {} dishes on {} (limit {})",
                self.dishes.len(),
                plan,
                plan.dish_limit()
            );
            return Ok(AddOutcome::LimitReached(UpgradePrompt::new(plan)));
        }

        let dish = Dish::create(fields);
        let mut next = self.dishes.clone();
        next.push(dish.clone());
        self.commit(next)?;
        info!("Added dish {} ({})", dish.id, dish.name);
        Ok(AddOutcome::Added(dish))
    }

    /// Copy an existing dish, subject to the same limit as add
    pub fn duplicate_dish(&mut self, id: &str, plan: PlanTier) -> Result<DuplicateOutcome> {
        let Some(source) = self.get(id) else {
            return Ok(DuplicateOutcome::NotFound);
        };
        if !self.can_add(plan) {
            return Ok(DuplicateOutcome::LimitReached(UpgradePrompt::new(plan)));
        }

        let copy = source.duplicate();
        let mut next = self.dishes.clone();
        next.push(copy.clone());
        self.commit(next)?;
        info!("Duplicated dish {} as {}", id, copy.id);
        Ok(DuplicateOutcome::Duplicated(copy))
    }

    /// Remove one dish. Returns whether anything was removed.
    pub fn delete_dish(&mut self, id: &str) -> Result<bool> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        let next: Vec<Dish> = self.dishes.iter().filter(|d| d.id != id).cloned().collect();
        self.commit(next)?;
        info!("Deleted dish {}", id);
        Ok(true)
    }

    /// Remove every dish whose id is listed; unknown ids are ignored.
    /// Returns how many were removed.
    pub fn delete_selected<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<usize> {
        let wanted: HashSet<&str> = ids.iter().map(AsRef::as_ref).collect();
        let next: Vec<Dish> = self
            .dishes
            .iter()
            .filter(|d| !wanted.contains(d.id.as_str()))
            .cloned()
            .collect();
        let removed = self.dishes.len() - next.len();
        if removed > 0 {
            self.commit(next)?;
            info!("Deleted {} selected dishes", removed);
        }
        Ok(removed)
    }

    /// Persist the new collection, then adopt it
    fn commit(&mut self, next: Vec<Dish>) -> Result<()> {
        self.storage.set_json(keys::DISHES, &next)?;
        self.dishes = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::dish::{DishType, Quantity};

    fn create_test_storage() -> (LocalStorage, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage =
            LocalStorage::open(&temp_dir.path().join("test.db")).expect("Failed to open storage");
        (storage, temp_dir)
    }

    fn fields(name: &str) -> DishFields {
        DishFields {
            name: name.to_string(),
            description: "House special".to_string(),
            dish_type: DishType::MainCourse,
            ingredients: "rice, saffron".to_string(),
            allergens: "Seafood".to_string(),
            price: "18".to_string(),
            image: Some("/photos/paella.jpg".to_string()),
            quantity: Quantity::Normal,
        }
    }

    fn added(outcome: AddOutcome) -> Dish {
        match outcome {
            AddOutcome::Added(dish) => dish,
            other => panic!("expected Added, got {:?}", other),
        }
    }

    #[test]
    fn test_limit_reached_for_every_plan() {
        for plan in PlanTier::all() {
            let (storage, _temp) = create_test_storage();
            let mut store = DishStore::load(&storage).unwrap();

            for i in 0..plan.dish_limit() {
                assert!(store.add_dish(fields(&format!("Dish {}", i)), *plan).unwrap().is_added());
            }

            let outcome = store.add_dish(fields("One too many"), *plan).unwrap();
            assert_eq!(outcome, AddOutcome::LimitReached(UpgradePrompt::new(*plan)));
            assert_eq!(store.len(), plan.dish_limit());
            assert!(store.is_at_limit(*plan));
        }
    }

    #[test]
    fn test_gate_follows_plan_at_call_time() {
        let (storage, _temp) = create_test_storage();
        let mut store = DishStore::load(&storage).unwrap();
        for i in 0..5 {
            store.add_dish(fields(&format!("Dish {}", i)), PlanTier::Free).unwrap();
        }

        assert!(!store.add_dish(fields("Blocked"), PlanTier::Free).unwrap().is_added());
        assert!(store.add_dish(fields("Allowed"), PlanTier::Plus).unwrap().is_added());
        assert_eq!(store.len(), 6);

        // Downgrading leaves the extra dish in place
        assert!(store.is_at_limit(PlanTier::Free));
        assert_eq!(store.len(), 6);
    }

    #[test]
    fn test_duplicate_copies_everything_but_id_and_timestamp() {
        let (storage, _temp) = create_test_storage();
        let mut store = DishStore::load(&storage).unwrap();
        let original = added(store.add_dish(fields("Paella"), PlanTier::Free).unwrap());

        let copy = match store.duplicate_dish(&original.id, PlanTier::Free).unwrap() {
            DuplicateOutcome::Duplicated(dish) => dish,
            other => panic!("expected Duplicated, got {:?}", other),
        };

        assert_eq!(copy.name, "Paella (Copy)");
        assert_ne!(copy.id, original.id);
        assert!(copy.created_at >= original.created_at);
        assert_eq!(copy.description, original.description);
        assert_eq!(copy.dish_type, original.dish_type);
        assert_eq!(copy.ingredients, original.ingredients);
        assert_eq!(copy.allergens, original.allergens);
        assert_eq!(copy.price, original.price);
        assert_eq!(copy.image, original.image);
        assert_eq!(copy.quantity, original.quantity);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_duplicate_unknown_id_is_noop() {
        let (storage, _temp) = create_test_storage();
        let mut store = DishStore::load(&storage).unwrap();
        store.add_dish(fields("Paella"), PlanTier::Free).unwrap();

        let outcome = store.duplicate_dish("missing", PlanTier::Free).unwrap();
        assert_eq!(outcome, DuplicateOutcome::NotFound);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_respects_limit() {
        let (storage, _temp) = create_test_storage();
        let mut store = DishStore::load(&storage).unwrap();
        let mut first = None;
        for i in 0..5 {
            let dish = added(store.add_dish(fields(&format!("Dish {}", i)), PlanTier::Free).unwrap());
            first.get_or_insert(dish);
        }

        let first = first.expect("at least one dish");
        let outcome = store.duplicate_dish(&first.id, PlanTier::Free).unwrap();
        assert!(matches!(outcome, DuplicateOutcome::LimitReached(_)));
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (storage, _temp) = create_test_storage();
        let mut store = DishStore::load(&storage).unwrap();
        let dish = added(store.add_dish(fields("Paella"), PlanTier::Free).unwrap());
        store.add_dish(fields("Tapas"), PlanTier::Free).unwrap();

        assert!(store.delete_dish(&dish.id).unwrap());
        let after_first: Vec<Dish> = store.dishes().to_vec();

        assert!(!store.delete_dish(&dish.id).unwrap());
        assert_eq!(store.dishes(), after_first.as_slice());
    }

    #[test]
    fn test_delete_selected_ignores_unknown_ids() {
        let (storage, _temp) = create_test_storage();
        let mut store = DishStore::load(&storage).unwrap();
        let a = added(store.add_dish(fields("A"), PlanTier::Free).unwrap());
        let b = added(store.add_dish(fields("B"), PlanTier::Free).unwrap());
        let c = added(store.add_dish(fields("C"), PlanTier::Free).unwrap());

        let removed = store
            .delete_selected(&[a.id.clone(), "ghost".to_string(), c.id.clone()])
            .unwrap();

        assert_eq!(removed, 2);
        assert_eq!(store.dishes(), &[b]);
    }

    #[test]
    fn test_round_trip_through_storage() {
        let (storage, _temp) = create_test_storage();
        let saved: Vec<Dish> = {
            let mut store = DishStore::load(&storage).unwrap();
            store.add_dish(fields("Paella"), PlanTier::Plus).unwrap();
            store.add_dish(fields("Tapas"), PlanTier::Plus).unwrap();
            store.dishes().to_vec()
        };

        let reloaded = DishStore::load(&storage).unwrap();
        assert_eq!(reloaded.dishes(), saved.as_slice());
    }

    #[test]
    fn test_malformed_storage_loads_empty() {
        let (storage, _temp) = create_test_storage();
        storage.set(keys::DISHES, "[{\"id\": 1}").unwrap();

        let store = DishStore::load(&storage).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_current_plan_reads_storage() {
        let (storage, _temp) = create_test_storage();
        let store = DishStore::load(&storage).unwrap();
        assert_eq!(store.current_plan().unwrap(), PlanTier::Free);

        storage.set(keys::CURRENT_PLAN, "OMQ Premium").unwrap();
        assert_eq!(store.current_plan().unwrap(), PlanTier::Premium);
    }

    fn stored(storage: &LocalStorage) -> Vec<Dish> {
        DishStore::load(storage).unwrap().dishes().to_vec()
    }

    #[test]
    fn test_duplicate_is_persisted() {
        let (storage, _temp) = create_test_storage();
        let mut store = DishStore::load(&storage).unwrap();
        let dish = added(store.add_dish(fields("Paella"), PlanTier::Free).unwrap());

        store.duplicate_dish(&dish.id, PlanTier::Free).unwrap();

        let reloaded = stored(&storage);
        assert_eq!(reloaded, store.dishes());
        assert_eq!(reloaded[1].name, "Paella (Copy)");
    }

    #[test]
    fn test_deletes_are_persisted() {
        let (storage, _temp) = create_test_storage();
        let mut store = DishStore::load(&storage).unwrap();
        let a = added(store.add_dish(fields("A"), PlanTier::Free).unwrap());
        let b = added(store.add_dish(fields("B"), PlanTier::Free).unwrap());
        let c = added(store.add_dish(fields("C"), PlanTier::Free).unwrap());

        store.delete_dish(&a.id).unwrap();
        assert_eq!(stored(&storage), vec![b.clone(), c.clone()]);

        store.delete_selected(&[c.id.clone()]).unwrap();
        assert_eq!(stored(&storage), vec![b]);
    }

    #[test]
    fn test_noops_leave_stored_value_untouched() {
        let (storage, _temp) = create_test_storage();
        let mut store = DishStore::load(&storage).unwrap();
        for i in 0..5 {
            store.add_dish(fields(&format!("Dish {}", i)), PlanTier::Free).unwrap();
        }
        let before = storage.get(keys::DISHES).unwrap();

        assert!(!store.delete_dish("missing").unwrap());
        assert_eq!(store.delete_selected(&["missing"]).unwrap(), 0);
        assert_eq!(
            store.duplicate_dish("missing", PlanTier::Free).unwrap(),
            DuplicateOutcome::NotFound
        );
        let first = store.dishes()[0].id.clone();
        assert!(matches!(
            store.duplicate_dish(&first, PlanTier::Free).unwrap(),
            DuplicateOutcome::LimitReached(_)
        ));
        assert!(!store.add_dish(fields("Blocked"), PlanTier::Free).unwrap().is_added());

        assert_eq!(storage.get(keys::DISHES).unwrap(), before);
    }

    #[test]
    fn test_read_failure_does_not_load_empty() {
        let (storage, _temp) = create_test_storage();
        let mut store = DishStore::load(&storage).unwrap();
        store.add_dish(fields("Paella"), PlanTier::Free).unwrap();
        let conn = storage.db().conn();

        conn.execute_batch("ALTER TABLE local_storage RENAME TO local_storage_moved")
            .unwrap();
        assert!(DishStore::load(&storage).is_err());

        conn.execute_batch("ALTER TABLE local_storage_moved RENAME TO local_storage")
            .unwrap();
        assert_eq!(stored(&storage).len(), 1);
    }
}
