//! SQLite-backed store. One transaction per save.

use crate::adapters::cancellable;
use crate::domain::changes::{Change, ChangeSet, PendingPoint};
use crate::domain::model::{City, CityId, PointId, PointOfInterest};
use crate::domain::ports::{AsyncCityInfoRepository, CityInfoRepository};
use crate::utils::error::{CityInfoError, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row, Transaction};
use std::fmt;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS cities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    link TEXT
);
CREATE TABLE IF NOT EXISTS points_of_interest (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    city_id INTEGER NOT NULL REFERENCES cities(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_points_of_interest_city ON points_of_interest(city_id);
";

pub struct SqliteCityStore {
    connection: Mutex<Connection>,
}

impl fmt::Debug for SqliteCityStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteCityStore").finish_non_exhaustive()
    }
}

fn city_from_row(row: &Row<'_>) -> rusqlite::Result<City> {
    Ok(City {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        link: row.get(3)?,
        points_of_interest: Vec::new(),
    })
}

fn point_from_row(row: &Row<'_>) -> rusqlite::Result<PointOfInterest> {
    Ok(PointOfInterest {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        city_id: row.get(3)?,
    })
}

fn is_constraint_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(failure, _) if failure.code == ErrorCode::ConstraintViolation
    )
}

/// Row ids are i64; point ids are i32.
fn point_id_from_rowid(rowid: i64) -> Result<PointId> {
    PointId::try_from(rowid).map_err(|_| CityInfoError::StoreError {
        message: format!("Row id {} does not fit a point id", rowid),
    })
}

impl SqliteCityStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> Result<Self> {
        connection.pragma_update(None, "foreign_keys", true)?;
        connection.execute_batch(SCHEMA)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.connection.lock().map_err(|_| CityInfoError::StoreError {
            message: "SQLite connection lock poisoned".to_string(),
        })
    }

    /// Insert `cities` only when the table is empty. Returns whether it did.
    pub fn ensure_seed_data(&self, cities: Vec<City>) -> Result<bool> {
        let mut connection = self.connection()?;
        let count: i64 = connection.query_row("SELECT COUNT(*) FROM cities", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(false);
        }

        let tx = connection.transaction()?;
        for city in cities {
            tx.execute(
                "INSERT INTO cities (name, description, link) VALUES (?1, ?2, ?3)",
                params![city.name, city.description, city.link],
            )?;
            let city_id = tx.last_insert_rowid();
            for point in city.points_of_interest {
                tx.execute(
                    "INSERT INTO points_of_interest (name, description, city_id) VALUES (?1, ?2, ?3)",
                    params![point.name, point.description, city_id],
                )?;
            }
        }
        tx.commit()?;
        tracing::info!("Seeded SQLite store");
        Ok(true)
    }

    fn query_cities(connection: &Connection) -> Result<Vec<City>> {
        let mut statement =
            connection.prepare("SELECT id, name, description, link FROM cities ORDER BY name, id")?;
        let cities = statement
            .query_map([], city_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cities)
    }

    fn query_points(connection: &Connection, city_id: CityId) -> Result<Vec<PointOfInterest>> {
        let mut statement = connection.prepare(
            "SELECT id, name, description, city_id FROM points_of_interest WHERE city_id = ?1 ORDER BY id",
        )?;
        let points = statement
            .query_map(params![city_id], point_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(points)
    }

    /// Apply one change inside `tx`; `Ok(false)` when it matched no row or
    /// broke a constraint.
    fn apply(
        tx: &Transaction<'_>,
        change: Change,
        assigned: &mut Vec<(PendingPoint, PointId)>,
    ) -> Result<bool> {
        let outcome = match change {
            Change::Insert {
                city_id,
                point,
                pending,
            } => {
                let inserted = tx.execute(
                    "INSERT INTO points_of_interest (name, description, city_id) VALUES (?1, ?2, ?3)",
                    params![point.name, point.description, city_id],
                );
                if inserted.is_ok() {
                    assigned.push((pending, point_id_from_rowid(tx.last_insert_rowid())?));
                }
                inserted
            }
            Change::Update(point) => tx.execute(
                "UPDATE points_of_interest SET name = ?1, description = ?2 WHERE id = ?3 AND city_id = ?4",
                params![point.name, point.description, point.id, point.city_id],
            ),
            Change::Delete { city_id, point_id } => tx.execute(
                "DELETE FROM points_of_interest WHERE id = ?1 AND city_id = ?2",
                params![point_id, city_id],
            ),
        };

        match outcome {
            Ok(rows) => Ok(rows == 1),
            Err(e) if is_constraint_violation(&e) => {
                tracing::debug!("Constraint violation while saving: {}", e);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl CityInfoRepository for SqliteCityStore {
    fn city_exists(&self, city_id: CityId) -> Result<bool> {
        let connection = self.connection()?;
        let found: Option<i64> = connection
            .query_row("SELECT 1 FROM cities WHERE id = ?1", params![city_id], |row| row.get(0))
            .optional()?;
        Ok(found.is_some())
    }

    fn cities(&self) -> Result<Vec<City>> {
        Self::query_cities(&*self.connection()?)
    }

    fn all_city_info(&self) -> Result<Vec<City>> {
        let connection = self.connection()?;
        let mut cities = Self::query_cities(&connection)?;
        for city in &mut cities {
            city.points_of_interest = Self::query_points(&connection, city.id)?;
        }
        Ok(cities)
    }

    fn city(&self, city_id: CityId, include_points_of_interest: bool) -> Result<Option<City>> {
        let connection = self.connection()?;
        let city = connection
            .query_row(
                "SELECT id, name, description, link FROM cities WHERE id = ?1",
                params![city_id],
                city_from_row,
            )
            .optional()?;
        match city {
            Some(mut city) if include_points_of_interest => {
                city.points_of_interest = Self::query_points(&connection, city_id)?;
                Ok(Some(city))
            }
            other => Ok(other),
        }
    }

    fn points_of_interest_for_city(&self, city_id: CityId) -> Result<Vec<PointOfInterest>> {
        Self::query_points(&*self.connection()?, city_id)
    }

    fn point_of_interest_for_city(
        &self,
        city_id: CityId,
        point_id: PointId,
    ) -> Result<Option<PointOfInterest>> {
        let connection = self.connection()?;
        let point = connection
            .query_row(
                "SELECT id, name, description, city_id FROM points_of_interest WHERE city_id = ?1 AND id = ?2",
                params![city_id, point_id],
                point_from_row,
            )
            .optional()?;
        Ok(point)
    }

    fn save(&self, changes: ChangeSet) -> Result<bool> {
        let mut connection = self.connection()?;
        let tx = connection.transaction()?;
        let mut assigned = Vec::new();
        for change in changes {
            if !Self::apply(&tx, change, &mut assigned)? {
                tx.rollback()?;
                return Ok(false);
            }
        }
        tx.commit()?;

        for (pending, id) in assigned {
            pending.assign(id);
        }
        Ok(true)
    }

    fn health_check(&self) -> Result<bool> {
        let connection = self.connection()?;
        let one: i64 = connection.query_row("SELECT 1", [], |row| row.get(0))?;
        Ok(one == 1)
    }
}

#[async_trait]
impl AsyncCityInfoRepository for SqliteCityStore {
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

    fn store() -> SqliteCityStore {
        let store = SqliteCityStore::open_in_memory().unwrap();
        store
            .ensure_seed_data(vec![
                City::new("Paris", "The one with that big tower.", "en.parisinfo.com/")
                    .with_point("Eiffel Tower", "A wrought iron lattice tower."),
                City::new("Antwerp", "The one with the cathedral.", "www.visitantwerpen.be"),
            ])
            .unwrap();
        store
    }

    fn new_point(name: &str) -> PointOfInterest {
        PointOfInterest {
            id: UNASSIGNED_ID,
            name: name.to_string(),
            description: Some(String::new()),
            city_id: UNASSIGNED_ID,
        }
    }

    #[test]
    fn test_cities_ordered_by_name() {
        let names: Vec<String> = store().cities().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Antwerp", "Paris"]);
    }

    #[test]
    fn test_insert_assigns_rowid() {
        let store = store();
        let mut changes = ChangeSet::new();
        let pending = changes.add_point_for_city(2, new_point("Cathedral"));
        assert!(store.save(changes).unwrap());

        let id = pending.id().unwrap();
        let stored = store.point_of_interest_for_city(2, id).unwrap().unwrap();
        assert_eq!(stored.name, "Cathedral");
        assert_eq!(stored.description.as_deref(), Some(""));
    }

    #[test]
    fn test_insert_for_missing_city_is_rejected() {
        let store = store();
        let mut changes = ChangeSet::new();
        let pending = changes.add_point_for_city(77, new_point("Nowhere"));
        assert!(!store.save(changes).unwrap());
        assert_eq!(pending.id(), None);
    }

    #[test]
    fn test_failed_change_rolls_back_whole_set() {
        let store = store();
        let mut changes = ChangeSet::new();
        changes.add_point_for_city(2, new_point("Cathedral"));
        changes.delete_point(&PointOfInterest {
            id: 999,
            ..new_point("Ghost")
        });
        assert!(!store.save(changes).unwrap());
        assert!(store.points_of_interest_for_city(2).unwrap().is_empty());
    }

    #[test]
    fn test_seed_only_once() {
        let store = store();
        assert!(!store.ensure_seed_data(vec![City::new("Sofia", "", "")]).unwrap());
        assert!(store.health_check().unwrap());
    }

    #[test]
    fn test_oversized_rowid_is_a_store_error() {
        assert_eq!(point_id_from_rowid(42).unwrap(), 42);
        assert!(matches!(
            point_id_from_rowid(i64::from(i32::MAX) + 1),
            Err(CityInfoError::StoreError { .. })
        ));
    }
}
