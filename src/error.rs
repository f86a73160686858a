use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Column '{column}' not found in {table}")]
    MissingColumn { column: String, table: &'static str },

    #[error("Invalid time '{value}'")]
    InvalidTime { value: String },
}

pub type RosterResult<T> = Result<T, RosterError>;
