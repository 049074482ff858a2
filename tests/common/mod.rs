#![allow(dead_code)]

use async_trait::async_trait;
use city_info::core::{Mapper, PointsOfInterestService};
use city_info::domain::model::City;
use city_info::domain::ports::Notifier;
use city_info::InMemoryCityStore;
use std::sync::{Arc, Mutex};

/// Keeps every message instead of delivering it.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, subject: &str, message: &str) {
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), message.to_string()));
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn send(&self, subject: &str, message: &str) {
        self.record(subject, message);
    }

    async fn send_async(&self, subject: &str, message: &str) {
        self.record(subject, message);
    }
}

/// City 1 "Springfield" holding points 1..=5, point 5 being {Park, Park};
/// city 2 "Shelbyville" holding point 6.
pub fn springfield() -> Vec<City> {
    vec![
        City::new("Springfield", "Home of the nuclear plant.", "www.springfield.gov")
            .with_point("Town Hall", "Seat of the mayor.")
            .with_point("Power Plant", "Sector 7G.")
            .with_point("Library", "Rarely visited.")
            .with_point("Stadium", "Home of the Isotopes.")
            .with_point("Park", "Park"),
        City::new("Shelbyville", "The rival town.", "www.shelbyville.gov")
            .with_point("Lemon Tree", "Historic landmark."),
    ]
}

pub fn store() -> Arc<InMemoryCityStore> {
    Arc::new(InMemoryCityStore::with_cities(springfield()))
}

pub type Service = PointsOfInterestService<InMemoryCityStore, RecordingNotifier>;

pub fn service(store: &Arc<InMemoryCityStore>, notifier: &Arc<RecordingNotifier>) -> Service {
    PointsOfInterestService::new(store.clone(), notifier.clone(), Mapper::default())
}
