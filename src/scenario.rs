//! Battle scenarios for the headless runner, tests and benchmarks
//!
//! A scenario is a snapshot plus the side the bot plays. Scenarios load from
//! and save to JSON, or come from [`ScenarioGenerator`], which builds the
//! same battlefield for the same seed.

use std::fs;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::battle::board::{Board, Minefield};
use crate::battle::hex::{HexCoord, HexDirection, Position};
use crate::battle::snapshot::{ArtilleryStrike, WorldSnapshot};
use crate::battle::terrain::Terrain;
use crate::battle::units::{Unit, UnitKind, Weapon};
use crate::core::error::Result;
use crate::core::types::{SideId, UnitId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Side whose units the bot moves
    pub acting_side: SideId,
    pub snapshot: WorldSnapshot,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Units the bot controls, in snapshot order
    pub fn acting_units(&self) -> impl Iterator<Item = &Unit> {
        self.snapshot
            .units
            .iter()
            .filter(move |u| u.side == self.acting_side && u.position.is_some() && !u.off_board)
    }
}

/// (name, damage, short, medium, long, minimum range)
const WEAPON_CATALOG: &[(&str, f64, u32, u32, u32, u32)] = &[
    ("Medium Laser", 5.0, 3, 6, 9, 0),
    ("Large Laser", 8.0, 5, 10, 15, 0),
    ("PPC", 10.0, 6, 12, 18, 3),
    ("LRM 10", 6.0, 7, 14, 21, 6),
    ("SRM 6", 8.0, 3, 6, 9, 0),
    ("AC/10", 10.0, 5, 10, 15, 0),
];

/// (chance per hex, terrain)
const TERRAIN_MIX: &[(f64, Terrain)] = &[
    (0.08, Terrain::LightWoods),
    (0.04, Terrain::HeavyWoods),
    (0.04, Terrain::Rough),
    (0.02, Terrain::Rubble),
    (0.02, Terrain::ShallowWater),
    (0.01, Terrain::DeepWater),
    (0.01, Terrain::Building),
];

/// Seeded random battlefield
#[derive(Debug, Clone)]
pub struct ScenarioGenerator {
    pub width: u32,
    pub height: u32,
    pub units_per_side: usize,
    pub minefields: usize,
    pub artillery: bool,
}

impl Default for ScenarioGenerator {
    fn default() -> Self {
        Self {
            width: 20,
            height: 16,
            units_per_side: 4,
            minefields: 2,
            artillery: true,
        }
    }
}

impl ScenarioGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&self, seed: u64) -> Scenario {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut board = Board::new(self.width, self.height);

        for r in 0..self.height as i32 {
            for q in 0..self.width as i32 {
                let coord = HexCoord::new(q, r);
                let roll: f64 = rng.gen();
                let mut threshold = 0.0;
                for (chance, terrain) in TERRAIN_MIX {
                    threshold += chance;
                    if roll < threshold {
                        board.set_terrain(coord, *terrain);
                        break;
                    }
                }
                if rng.gen_bool(0.05) {
                    board.set_elevation(coord, rng.gen_range(1..=2));
                }
            }
        }

        for _ in 0..self.minefields {
            let coord = self.random_hex(&mut rng, 2, self.height.saturating_sub(2));
            board.add_minefield(Minefield {
                coord,
                density: rng.gen_range(0.2..0.6),
                damage: 10.0,
            });
        }

        let mut snapshot = WorldSnapshot::new(1, 1, board);

        // Side 0 deploys along the south edge, side 1 along the north
        let bands = [
            (SideId(0), self.height.saturating_sub(3), self.height, HexDirection::NorthEast),
            (SideId(1), 0, 3.min(self.height), HexDirection::SouthWest),
        ];
        for (side, r_min, r_max, facing) in bands {
            for index in 0..self.units_per_side {
                let mut unit = self.random_unit(&mut rng, side, index);
                let hex = self.random_hex(&mut rng, r_min, r_max);
                let elevation = snapshot.board.elevation(hex);
                unit.position = Some(Position::new(hex, facing).at_elevation(elevation));
                if side == SideId(1) && rng.gen_bool(0.5) {
                    unit.has_moved = true;
                    unit.hexes_moved = rng.gen_range(0..=unit.run_mp);
                }
                snapshot.units.push(unit);
            }
        }

        if self.artillery {
            let target = self.random_hex(&mut rng, 0, self.height);
            snapshot.artillery.push(ArtilleryStrike {
                target,
                damage: 20.0,
                falloff: 10.0,
                side: SideId(0),
            });
        }

        Scenario {
            name: format!("generated-{}", seed),
            acting_side: SideId(0),
            snapshot,
        }
    }

    fn random_hex(&self, rng: &mut ChaCha8Rng, r_min: u32, r_max: u32) -> HexCoord {
        let r_max = r_max.max(r_min + 1);
        HexCoord::new(
            rng.gen_range(0..self.width.max(1)) as i32,
            rng.gen_range(r_min..r_max).min(self.height.saturating_sub(1)) as i32,
        )
    }

    fn random_unit(&self, rng: &mut ChaCha8Rng, side: SideId, index: usize) -> Unit {
        let tonnage = *[20.0, 35.0, 50.0, 65.0, 80.0, 100.0].choose(rng).unwrap_or(&50.0);
        let mut unit = Unit::new(
            UnitId::from_u128(rng.gen()),
            format!("{}-{}", side_name(side), index + 1),
            side,
            UnitKind::Mech,
        );
        unit.tonnage = tonnage;
        unit.max_armor = tonnage * 2.5;
        unit.armor = unit.max_armor * rng.gen_range(0.2..=1.0);
        unit.walk_mp = (8.0 - tonnage / 20.0).round().max(2.0) as u32;
        unit.run_mp = (unit.walk_mp as f64 * 1.5).ceil() as u32;
        if rng.gen_bool(0.3) {
            unit.jump_mp = unit.walk_mp;
        }
        unit.gunnery = rng.gen_range(3..=5);
        unit.piloting = rng.gen_range(4..=6);

        let weapon_count = rng.gen_range(1..=3);
        for _ in 0..weapon_count {
            if let Some(&(name, damage, short, medium, long, min_range)) = WEAPON_CATALOG.choose(rng) {
                let mut weapon = Weapon::new(name, damage, short, medium, long);
                weapon.min_range = min_range;
                unit.weapons.push(weapon);
            }
        }
        unit
    }
}

fn side_name(side: SideId) -> &'static str {
    match side.0 {
        0 => "Blue",
        1 => "Red",
        _ => "Gray",
    }
}
