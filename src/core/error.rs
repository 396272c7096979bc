use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown unit kind: {0:?}")]
    UnknownUnitKind(String),

    #[error("Invalid build job #{index}: {reason}")]
    InvalidBuildJob { index: usize, reason: String },

    #[error("Invalid turn snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Plan submission failed: {0}")]
    Submission(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, BotError>;
