use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Profile store not available: {0}")]
    Unavailable(String),
}
