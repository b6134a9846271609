//! Read-only view of the world at decision time

use serde::{Deserialize, Serialize};

use crate::battle::board::Board;
use crate::battle::hex::HexCoord;
use crate::battle::units::Unit;
use crate::core::types::{SideId, SnapshotVersion, Turn, UnitId};

/// Optional rules that change what the bot can expect
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    /// Weapons may fire at extreme range
    pub extreme_range: bool,
    /// Weapons may fire at any range with line of sight (at extreme penalty)
    pub line_of_sight_range: bool,
}

impl GameOptions {
    /// Whether shots past long range are allowed at all
    pub fn beyond_long_range(&self) -> bool {
        self.extreme_range || self.line_of_sight_range
    }
}

/// An artillery strike already in flight, landing this turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtilleryStrike {
    pub target: HexCoord,
    pub damage: f64,
    /// Damage lost per hex away from the target hex
    pub falloff: f64,
    pub side: SideId,
}

impl ArtilleryStrike {
    /// Damage dealt to a unit standing at `hex`
    pub fn damage_at(&self, hex: HexCoord) -> f64 {
        let distance = self.target.distance(&hex) as f64;
        (self.damage - self.falloff * distance).max(0.0)
    }
}

/// Everything the acting side can see, frozen for one decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub version: SnapshotVersion,
    pub turn: Turn,
    pub board: Board,
    pub units: Vec<Unit>,
    #[serde(default)]
    pub options: GameOptions,
    #[serde(default)]
    pub artillery: Vec<ArtilleryStrike>,
}

impl WorldSnapshot {
    pub fn new(version: SnapshotVersion, turn: Turn, board: Board) -> Self {
        Self {
            version,
            turn,
            board,
            units: Vec::new(),
            options: GameOptions::default(),
            artillery: Vec::new(),
        }
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.units.push(unit);
        self
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Units on other sides
    pub fn enemies_of(&self, unit: &Unit) -> Vec<&Unit> {
        self.units.iter().filter(|u| u.side != unit.side).collect()
    }

    /// Other units on the same side
    pub fn friends_of(&self, unit: &Unit) -> Vec<&Unit> {
        self.units
            .iter()
            .filter(|u| u.side == unit.side && u.id != unit.id)
            .collect()
    }
}
