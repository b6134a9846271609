//! Units and their weapons, as the bot sees them
//!
//! This is a read-only projection of the game's entity model: just the
//! numbers the outcome estimator and the considerations need.

use serde::{Deserialize, Serialize};

use crate::battle::hex::Position;
use crate::core::types::{SideId, UnitId};

/// Broad unit class; decides which attacks and hazards apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UnitKind {
    #[default]
    Mech,
    Vehicle,
    Infantry,
    Aerospace,
    /// Crew that bailed out of a destroyed unit; not a combatant
    EjectedCrew,
}

/// Range bracket of a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RangeBracket {
    Short,
    Medium,
    Long,
    Extreme,
}

impl RangeBracket {
    /// Additive to-hit penalty for the bracket
    pub fn to_hit_modifier(&self) -> i32 {
        match self {
            RangeBracket::Short => 0,
            RangeBracket::Medium => 2,
            RangeBracket::Long => 4,
            RangeBracket::Extreme => 6,
        }
    }
}

/// A mounted weapon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub damage: f64,
    pub short_range: u32,
    pub medium_range: u32,
    pub long_range: u32,
    #[serde(default)]
    pub min_range: u32,
}

impl Weapon {
    pub fn new(name: impl Into<String>, damage: f64, short: u32, medium: u32, long: u32) -> Self {
        Self {
            name: name.into(),
            damage,
            short_range: short,
            medium_range: medium,
            long_range: long,
            min_range: 0,
        }
    }

    /// Extreme range reaches as far past long as medium reaches past short
    pub fn extreme_range(&self) -> u32 {
        self.long_range + (self.medium_range - self.short_range.min(self.medium_range))
    }

    /// Furthest range this weapon can shoot at
    pub fn max_range(&self, extreme_allowed: bool) -> u32 {
        if extreme_allowed {
            self.extreme_range()
        } else {
            self.long_range
        }
    }

    /// Range bracket for a shot at `distance`, None if out of range
    pub fn bracket(&self, distance: u32, extreme_allowed: bool) -> Option<RangeBracket> {
        if distance == 0 {
            return None;
        }
        if distance <= self.short_range {
            Some(RangeBracket::Short)
        } else if distance <= self.medium_range {
            Some(RangeBracket::Medium)
        } else if distance <= self.long_range {
            Some(RangeBracket::Long)
        } else if extreme_allowed && distance <= self.extreme_range() {
            Some(RangeBracket::Extreme)
        } else {
            None
        }
    }

    /// To-hit penalty for firing inside minimum range
    pub fn min_range_modifier(&self, distance: u32) -> i32 {
        if distance <= self.min_range {
            (self.min_range - distance + 1) as i32
        } else {
            0
        }
    }
}

/// A unit on (or off) the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub side: SideId,
    pub kind: UnitKind,
    /// None when the acting side does not know where the unit is
    pub position: Option<Position>,
    #[serde(default)]
    pub off_board: bool,
    #[serde(default)]
    pub airborne: bool,
    pub tonnage: f64,
    pub armor: f64,
    pub max_armor: f64,
    pub walk_mp: u32,
    pub run_mp: u32,
    #[serde(default)]
    pub jump_mp: u32,
    pub gunnery: u8,
    pub piloting: u8,
    #[serde(default)]
    pub weapons: Vec<Weapon>,
    /// Already moved during the current turn
    #[serde(default)]
    pub has_moved: bool,
    /// Hexes moved this turn, if it has moved
    #[serde(default)]
    pub hexes_moved: u32,
    #[serde(default)]
    pub jumped: bool,
    /// Retreating off the board
    #[serde(default)]
    pub withdrawing: bool,
    /// Rules or faction forbid this unit from punching and kicking
    #[serde(default)]
    pub physical_attacks_forbidden: bool,
}

impl Unit {
    pub fn new(id: UnitId, name: impl Into<String>, side: SideId, kind: UnitKind) -> Self {
        Self {
            id,
            name: name.into(),
            side,
            kind,
            position: None,
            off_board: false,
            airborne: false,
            tonnage: 50.0,
            armor: 100.0,
            max_armor: 100.0,
            walk_mp: 4,
            run_mp: 6,
            jump_mp: 0,
            gunnery: 4,
            piloting: 5,
            weapons: Vec::new(),
            has_moved: false,
            hexes_moved: 0,
            jumped: false,
            withdrawing: false,
            physical_attacks_forbidden: false,
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapons.push(weapon);
        self
    }

    /// Crew and other non-fighting units never count as threats or targets
    pub fn is_combatant(&self) -> bool {
        !matches!(self.kind, UnitKind::EjectedCrew)
    }

    /// Cannot change hex this turn
    pub fn is_immobile(&self) -> bool {
        self.walk_mp == 0 && self.jump_mp == 0
    }

    /// Fraction of armor left (0.0-1.0)
    pub fn health_fraction(&self) -> f64 {
        if self.max_armor <= 0.0 {
            return 0.0;
        }
        (self.armor / self.max_armor).clamp(0.0, 1.0)
    }

    /// Furthest distance any weapon can reach
    pub fn max_weapon_range(&self, extreme_allowed: bool) -> u32 {
        self.weapons
            .iter()
            .map(|w| w.max_range(extreme_allowed))
            .max()
            .unwrap_or(0)
    }

    /// Hexes this unit can cover in one turn
    pub fn max_move(&self) -> u32 {
        self.run_mp.max(self.jump_mp)
    }

    /// Whether this unit can punch or kick at all
    pub fn can_make_physical_attacks(&self) -> bool {
        matches!(self.kind, UnitKind::Mech) && !self.physical_attacks_forbidden && !self.airborne
    }

    pub fn kick_damage(&self) -> f64 {
        (self.tonnage / 5.0).floor()
    }

    pub fn punch_damage(&self) -> f64 {
        (self.tonnage / 10.0).ceil()
    }

    /// Damage from a fall of `levels` elevation levels
    pub fn fall_damage(&self, levels: u32) -> f64 {
        (self.tonnage / 10.0).ceil() * (levels as f64 + 1.0)
    }
}
