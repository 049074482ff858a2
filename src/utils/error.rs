use thiserror::Error;

#[derive(Error, Debug)]
pub enum CityInfoError {
    #[error("Persistence failed: {message}")]
    PersistenceError { message: String },

    #[error("Store error: {message}")]
    StoreError { message: String },

    #[cfg(feature = "store-sqlite")]
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Notification failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Notification failed: {message}")]
    NotificationError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl CityInfoError {
    /// Write failure reported by the store for a city / point pair.
    pub fn save_failed(city_id: i32, point_id: Option<i32>) -> Self {
        let message = match point_id {
            Some(point_id) => format!(
                "A problem while saving city Id: {}, Point Of Int: {}.",
                city_id, point_id
            ),
            None => format!(
                "A problem while saving Point of Int for city Id: {}.",
                city_id
            ),
        };
        CityInfoError::PersistenceError { message }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, CityInfoError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, CityInfoError>;
