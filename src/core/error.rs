use thiserror::Error;

use crate::core::types::{SnapshotVersion, UnitId};

#[derive(Error, Debug)]
pub enum TacticianError {
    #[error("Unit not found in snapshot: {0}")]
    UnitNotFound(UnitId),

    #[error("Stale candidate path: built against snapshot {path_version}, current is {current_version}")]
    StalePath {
        path_version: SnapshotVersion,
        current_version: SnapshotVersion,
    },

    #[error("Candidate path for unit {path_unit} handed to unit {unit}")]
    ForeignPath { path_unit: UnitId, unit: UnitId },

    #[error("Invalid behavior setting: {0}")]
    InvalidBehavior(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, TacticianError>;
