//! Unit of work handed to a store's `save`.
//!
//! Mutations are staged here without touching the store; the store commits the
//! whole set atomically or not at all.

use crate::domain::model::{CityId, PointId, PointOfInterest};
use std::sync::{Arc, OnceLock};

/// Handle to a staged insert. Carries the store-assigned identity once the
/// owning change set has been committed.
#[derive(Debug, Clone, Default)]
pub struct PendingPoint {
    id: Arc<OnceLock<PointId>>,
}

impl PendingPoint {
    pub fn id(&self) -> Option<PointId> {
        self.id.get().copied()
    }

    /// Called by a store after the insert has been committed.
    pub fn assign(&self, id: PointId) {
        let _ = self.id.set(id);
    }
}

#[derive(Debug, Clone)]
pub enum Change {
    Insert {
        city_id: CityId,
        point: PointOfInterest,
        pending: PendingPoint,
    },
    Update(PointOfInterest),
    Delete { city_id: CityId, point_id: PointId },
}

#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `point` with the city's collection. Any identity or parent
    /// already on `point` is ignored.
    pub fn add_point_for_city(&mut self, city_id: CityId, mut point: PointOfInterest) -> PendingPoint {
        point.city_id = city_id;
        let pending = PendingPoint::default();
        self.changes.push(Change::Insert {
            city_id,
            point,
            pending: pending.clone(),
        });
        pending
    }

    pub fn update_point(&mut self, point: &PointOfInterest) {
        self.changes.push(Change::Update(point.clone()));
    }

    pub fn delete_point(&mut self, point: &PointOfInterest) {
        self.changes.push(Change::Delete {
            city_id: point.city_id,
            point_id: point.id,
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }
}

impl IntoIterator for ChangeSet {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::UNASSIGNED_ID;

    #[test]
    fn test_insert_takes_parent_from_caller() {
        let mut changes = ChangeSet::new();
        let point = PointOfInterest {
            id: UNASSIGNED_ID,
            name: "Cathedral".to_string(),
            description: None,
            city_id: 99,
        };
        let pending = changes.add_point_for_city(2, point);

        assert_eq!(pending.id(), None);
        match changes.iter().next() {
            Some(Change::Insert { city_id, point, .. }) => {
                assert_eq!(*city_id, 2);
                assert_eq!(point.city_id, 2);
            }
            other => panic!("unexpected change: {:?}", other),
        }
    }

    #[test]
    fn test_pending_id_is_shared_and_set_once() {
        let pending = PendingPoint::default();
        let observer = pending.clone();
        pending.assign(12);
        pending.assign(13);
        assert_eq!(observer.id(), Some(12));
    }
}
