//! Process-local store. Every save works on a copy of the tables and swaps it
//! in only when all staged changes apply.

use crate::adapters::cancellable;
use crate::domain::changes::{Change, ChangeSet, PendingPoint};
use crate::domain::model::{City, CityId, PointId, PointOfInterest};
use crate::domain::ports::{AsyncCityInfoRepository, CityInfoRepository};
use crate::utils::error::{CityInfoError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default)]
struct Tables {
    cities: BTreeMap<CityId, City>,
    points: BTreeMap<PointId, PointOfInterest>,
    last_city_id: CityId,
    last_point_id: PointId,
}

impl Tables {
    fn insert_city(&mut self, city: City) {
        self.last_city_id += 1;
        let city_id = self.last_city_id;
        for mut point in city.points_of_interest {
            self.last_point_id += 1;
            point.id = self.last_point_id;
            point.city_id = city_id;
            self.points.insert(point.id, point);
        }
        self.cities.insert(
            city_id,
            City {
                id: city_id,
                points_of_interest: Vec::new(),
                ..city
            },
        );
    }

    fn points_for(&self, city_id: CityId) -> Vec<PointOfInterest> {
        self.points
            .values()
            .filter(|p| p.city_id == city_id)
            .cloned()
            .collect()
    }

    fn city(&self, city_id: CityId, include_points_of_interest: bool) -> Option<City> {
        let mut city = self.cities.get(&city_id)?.clone();
        if include_points_of_interest {
            city.points_of_interest = self.points_for(city_id);
        }
        Some(city)
    }

    fn cities(&self, include_points_of_interest: bool) -> Vec<City> {
        let mut cities: Vec<City> = self
            .cities
            .keys()
            .filter_map(|id| self.city(*id, include_points_of_interest))
            .collect();
        cities.sort_by(|a, b| a.name.cmp(&b.name));
        cities
    }

    /// Apply one change; `false` when it violates the schema.
    fn apply(&mut self, change: Change, assigned: &mut Vec<(PendingPoint, PointId)>) -> bool {
        match change {
            Change::Insert {
                city_id,
                mut point,
                pending,
            } => {
                if !self.cities.contains_key(&city_id) {
                    return false;
                }
                self.last_point_id += 1;
                point.id = self.last_point_id;
                point.city_id = city_id;
                assigned.push((pending, point.id));
                self.points.insert(point.id, point);
                true
            }
            Change::Update(point) => match self.points.get_mut(&point.id) {
                Some(stored) if stored.city_id == point.city_id => {
                    *stored = point;
                    true
                }
                _ => false,
            },
            Change::Delete { city_id, point_id } => match self.points.get(&point_id) {
                Some(stored) if stored.city_id == city_id => {
                    self.points.remove(&point_id);
                    true
                }
                _ => false,
            },
        }
    }
}

#[derive(Debug)]
pub struct InMemoryCityStore {
    tables: Mutex<Tables>,
    reject_saves: AtomicBool,
    healthy: AtomicBool,
}

impl Default for InMemoryCityStore {
    fn default() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            reject_saves: AtomicBool::new(false),
            healthy: AtomicBool::new(true),
        }
    }
}

impl InMemoryCityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `cities` (and their points) with fresh identities
    /// assigned in the given order.
    pub fn with_cities(cities: Vec<City>) -> Self {
        let store = Self::default();
        if let Ok(mut tables) = store.tables.lock() {
            for city in cities {
                tables.insert_city(city);
            }
        }
        store
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| CityInfoError::StoreError {
            message: "in-memory store lock poisoned".to_string(),
        })
    }

    /// Insert `cities` only when the store holds none. Returns whether it did.
    pub fn ensure_seed_data(&self, cities: Vec<City>) -> Result<bool> {
        let mut tables = self.tables()?;
        if !tables.cities.is_empty() {
            return Ok(false);
        }
        for city in cities {
            tables.insert_city(city);
        }
        Ok(true)
    }

    /// Make every following save report an unsuccessful write.
    pub fn reject_saves(&self, reject: bool) {
        self.reject_saves.store(reject, Ordering::SeqCst);
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn point_count(&self) -> Result<usize> {
        Ok(self.tables()?.points.len())
    }
}

impl CityInfoRepository for InMemoryCityStore {
    fn city_exists(&self, city_id: CityId) -> Result<bool> {
        Ok(self.tables()?.cities.contains_key(&city_id))
    }

    fn cities(&self) -> Result<Vec<City>> {
        Ok(self.tables()?.cities(false))
    }

    fn all_city_info(&self) -> Result<Vec<City>> {
        Ok(self.tables()?.cities(true))
    }

    fn city(&self, city_id: CityId, include_points_of_interest: bool) -> Result<Option<City>> {
        Ok(self.tables()?.city(city_id, include_points_of_interest))
    }

    fn points_of_interest_for_city(&self, city_id: CityId) -> Result<Vec<PointOfInterest>> {
        Ok(self.tables()?.points_for(city_id))
    }

    fn point_of_interest_for_city(
        &self,
        city_id: CityId,
        point_id: PointId,
    ) -> Result<Option<PointOfInterest>> {
        Ok(self
            .tables()?
            .points
            .get(&point_id)
            .filter(|p| p.city_id == city_id)
            .cloned())
    }

    fn save(&self, changes: ChangeSet) -> Result<bool> {
        if self.reject_saves.load(Ordering::SeqCst) {
            tracing::debug!("Rejecting save of {} change(s)", changes.len());
            return Ok(false);
        }

        let mut tables = self.tables()?;
        let mut working = tables.clone();
        let mut assigned = Vec::new();
        for change in changes {
            if !working.apply(change, &mut assigned) {
                return Ok(false);
            }
        }
        *tables = working;
        drop(tables);

        for (pending, id) in assigned {
            pending.assign(id);
        }
        Ok(true)
    }

    fn health_check(&self) -> Result<bool> {
        drop(self.tables()?);
        Ok(self.healthy.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl AsyncCityInfoRepository for InMemoryCityStore {
    async fn city_exists_async(&self, city_id: CityId, cancel: &CancellationToken) -> Result<bool> {
        cancellable(cancel, || self.city_exists(city_id)).await
    }

    async fn cities_async(&self, cancel: &CancellationToken) -> Result<Vec<City>> {
        cancellable(cancel, || self.cities()).await
    }

    async fn all_city_info_async(&self, cancel: &CancellationToken) -> Result<Vec<City>> {
        cancellable(cancel, || self.all_city_info()).await
    }

    async fn city_async(
        &self,
        city_id: CityId,
        include_points_of_interest: bool,
        cancel: &CancellationToken,
    ) -> Result<Option<City>> {
        cancellable(cancel, || self.city(city_id, include_points_of_interest)).await
    }

    async fn points_of_interest_for_city_async(
        &self,
        city_id: CityId,
        cancel: &CancellationToken,
    ) -> Result<Vec<PointOfInterest>> {
        cancellable(cancel, || self.points_of_interest_for_city(city_id)).await
    }

    async fn point_of_interest_for_city_async(
        &self,
        city_id: CityId,
        point_id: PointId,
        cancel: &CancellationToken,
    ) -> Result<Option<PointOfInterest>> {
        cancellable(cancel, || self.point_of_interest_for_city(city_id, point_id)).await
    }

    async fn save_async(&self, changes: ChangeSet, cancel: &CancellationToken) -> Result<bool> {
        cancellable(cancel, || self.save(changes)).await
    }

    async fn health_check_async(&self, cancel: &CancellationToken) -> Result<bool> {
        cancellable(cancel, || self.health_check()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::UNASSIGNED_ID;

    fn store() -> InMemoryCityStore {
        InMemoryCityStore::with_cities(vec![
            City::new("Paris", "The one with that big tower.", "en.parisinfo.com/")
                .with_point("Eiffel Tower", "A wrought iron lattice tower."),
            City::new("Antwerp", "The one with the cathedral.", "www.visitantwerpen.be"),
        ])
    }

    fn new_point(name: &str) -> PointOfInterest {
        PointOfInterest {
            id: UNASSIGNED_ID,
            name: name.to_string(),
            description: None,
            city_id: UNASSIGNED_ID,
        }
    }

    #[test]
    fn test_cities_are_ordered_by_name() {
        let names: Vec<String> = store().cities().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Antwerp", "Paris"]);
    }

    #[test]
    fn test_city_children_only_when_requested() {
        let store = store();
        assert!(store.city(1, false).unwrap().unwrap().points_of_interest.is_empty());
        assert_eq!(store.city(1, true).unwrap().unwrap().points_of_interest.len(), 1);
    }

    #[test]
    fn test_point_lookup_is_scoped_to_city() {
        let store = store();
        assert!(store.point_of_interest_for_city(1, 1).unwrap().is_some());
        assert!(store.point_of_interest_for_city(2, 1).unwrap().is_none());
    }

    #[test]
    fn test_save_assigns_identity_after_commit() {
        let store = store();
        let mut changes = ChangeSet::new();
        let pending = changes.add_point_for_city(2, new_point("Cathedral"));
        assert_eq!(pending.id(), None);

        assert!(store.save(changes).unwrap());
        assert_eq!(pending.id(), Some(2));
        assert_eq!(store.points_of_interest_for_city(2).unwrap().len(), 1);
    }

    #[test]
    fn test_save_is_all_or_nothing() {
        let store = store();
        let mut changes = ChangeSet::new();
        let pending = changes.add_point_for_city(2, new_point("Cathedral"));
        changes.add_point_for_city(42, new_point("Nowhere"));

        assert!(!store.save(changes).unwrap());
        assert_eq!(pending.id(), None);
        assert_eq!(store.point_count().unwrap(), 1);
    }

    #[test]
    fn test_rejected_saves_leave_tables_untouched() {
        let store = store();
        store.reject_saves(true);
        let point = store.point_of_interest_for_city(1, 1).unwrap().unwrap();
        let mut changes = ChangeSet::new();
        changes.delete_point(&point);

        assert!(!store.save(changes).unwrap());
        assert!(store.point_of_interest_for_city(1, 1).unwrap().is_some());
    }

    #[test]
    fn test_seed_applies_to_empty_store_only() {
        let store = InMemoryCityStore::new();
        assert!(store.ensure_seed_data(vec![City::new("Sofia", "", "")]).unwrap());
        assert!(!store.ensure_seed_data(vec![City::new("Sydney", "", "")]).unwrap());
        assert_eq!(store.cities().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_save_commits_nothing() {
        let store = store();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut changes = ChangeSet::new();
        changes.add_point_for_city(2, new_point("Cathedral"));

        let result = store.save_async(changes, &cancel).await;
        assert!(matches!(result, Err(CityInfoError::Cancelled)));
        assert_eq!(store.point_count().unwrap(), 1);
    }
}
