use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid connection URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported database driver: {0}")]
    UnsupportedDriver(String),

    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("No user found with email {email}")]
    NotFound { email: String },

    #[error("Database did not report a generated id")]
    MissingInsertId,
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
