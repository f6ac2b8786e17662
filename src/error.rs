use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemberSearchError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{entity} not found with id {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Team {0} does not exist")]
    MissingTeam(i64),

    #[error("Expected at most one row, query returned {0}")]
    NonUniqueResult(usize),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl From<::config::ConfigError> for MemberSearchError {
    fn from(err: ::config::ConfigError) -> Self {
        MemberSearchError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MemberSearchError>;
