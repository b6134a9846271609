pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::{Result, TacticianError};
pub use types::{SideId, SnapshotVersion, Turn, UnitId};
