//! Terrain types and the rules hooks the bot needs from them

use serde::{Deserialize, Serialize};

/// Primary terrain type for a board hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Terrain {
    #[default]
    Clear,
    Pavement,
    Rough,
    Rubble,
    LightWoods,
    HeavyWoods,
    ShallowWater,
    DeepWater,
    Ice,
    Lava,
    Building,
}

impl Terrain {
    /// Movement points to enter the hex, None if impassable for ground units
    pub fn movement_cost(&self) -> Option<u32> {
        match self {
            Terrain::Clear | Terrain::Pavement | Terrain::Ice => Some(1),
            Terrain::Rough | Terrain::Rubble | Terrain::LightWoods => Some(2),
            Terrain::ShallowWater | Terrain::Lava => Some(2),
            Terrain::HeavyWoods | Terrain::Building => Some(3),
            Terrain::DeepWater => None,
        }
    }

    /// Does this terrain block line of sight?
    pub fn blocks_los(&self) -> bool {
        matches!(self, Terrain::HeavyWoods | Terrain::Building)
    }

    /// To-hit penalty for shots at a unit standing in this terrain
    pub fn to_hit_modifier(&self) -> i32 {
        match self {
            Terrain::LightWoods => 1,
            Terrain::HeavyWoods | Terrain::Building => 2,
            Terrain::ShallowWater => 1,
            _ => 0,
        }
    }

    /// Piloting roll modifier for entering the hex, None if no roll is needed
    pub fn piloting_modifier(&self, running: bool) -> Option<i32> {
        match self {
            Terrain::Rubble => Some(0),
            Terrain::ShallowWater => Some(-1),
            Terrain::Ice => Some(if running { 4 } else { 2 }),
            Terrain::Pavement if running => Some(0),
            _ => None,
        }
    }

    /// Damage taken for entering the hex, as (chance, damage)
    pub fn hazard(&self) -> Option<(f64, f64)> {
        match self {
            Terrain::Lava => Some((1.0, 10.0)),
            // Ice can give way under heavy units
            Terrain::Ice => Some((1.0 / 6.0, 5.0)),
            _ => None,
        }
    }
}
