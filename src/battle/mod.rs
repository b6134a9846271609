//! Battle world model as the bot consumes it
//!
//! Board, units, candidate paths and the read-only snapshot, plus the
//! collaborator services the ranking engine leans on: line of sight and
//! to-hit odds, self-inflicted hazards, and path generation.

pub mod board;
pub mod dice;
pub mod fire_control;
pub mod hazards;
pub mod hex;
pub mod path;
pub mod pathing;
pub mod snapshot;
pub mod terrain;
pub mod units;

// Re-exports for convenient access
pub use board::{Board, BoardEdge, BoardHex, Minefield};
pub use dice::two_d6_at_least;
pub use fire_control::{target_movement_modifier, Engagement, FireControl, StandardFireControl};
pub use hazards::{HazardModel, StandardHazardModel};
pub use hex::{HexCoord, HexDirection, Position};
pub use path::{CandidatePath, MoveMode, MoveStep, StepKind};
pub use pathing::{find_route, PathGenerator, ReachablePathGenerator};
pub use snapshot::{ArtilleryStrike, GameOptions, WorldSnapshot};
pub use terrain::Terrain;
pub use units::{RangeBracket, Unit, UnitKind, Weapon};
