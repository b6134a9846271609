//! Bot behavior configuration loaded from TOML
//!
//! Behavior settings are the named knobs considerations read: how eager the
//! bot is to trade damage, how much it values its own armor, whether it
//! sticks with friends, and which enemies it will leave alone. Operators can
//! adjust them between turns with short text commands.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::battle::board::BoardEdge;
use crate::battle::hex::HexCoord;
use crate::battle::units::Unit;
use crate::core::error::{Result, TacticianError};
use crate::core::types::UnitId;

/// Which enemies the bot refuses to count as targets or threats
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HonorPolicy {
    /// Units explicitly left alone
    pub ignored_units: Vec<UnitId>,
    /// Leave retreating units alone
    pub ignore_withdrawing: bool,
}

impl HonorPolicy {
    pub fn disregards(&self, enemy: &Unit) -> bool {
        self.ignored_units.contains(&enemy.id) || (self.ignore_withdrawing && enemy.withdrawing)
    }
}

/// Weights of the stock decision set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionWeights {
    pub attack: f64,
    pub maneuver: f64,
    pub flee: f64,
    pub herd: f64,
    pub objective: f64,
}

impl Default for DecisionWeights {
    fn default() -> Self {
        Self {
            attack: 1.0,
            maneuver: 1.0,
            flee: 1.5,
            herd: 0.3,
            objective: 0.8,
        }
    }
}

/// Complete behavior profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorSettings {
    /// Name of this profile (set from filename)
    pub name: String,
    /// Eagerness to close and trade fire (0.0 = timid, 1.0 = reckless)
    pub aggression: f64,
    /// Weight on damage the unit expects to take (0.0 = ignores it)
    pub self_preservation: f64,
    /// Tendency to stay near friendly units
    pub herd_mentality: f64,
    /// Willingness to accept risk when the payoff is damage dealt
    pub bravery: f64,
    /// Withdraw badly damaged units toward the home edge
    pub forced_withdrawal: bool,
    /// Every unit runs for the home edge
    pub auto_flee: bool,
    /// Armor fraction below which forced withdrawal applies
    pub withdrawal_threshold: f64,
    /// Edge the bot retreats toward
    pub home_edge: BoardEdge,
    /// Objective hexes worth threatening
    pub strategic_targets: Vec<HexCoord>,
    /// Enemy units worth extra attention
    pub priority_units: Vec<UnitId>,
    pub honor: HonorPolicy,
    pub decisions: DecisionWeights,
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            aggression: 0.5,
            self_preservation: 0.5,
            herd_mentality: 0.3,
            bravery: 0.5,
            forced_withdrawal: true,
            auto_flee: false,
            withdrawal_threshold: 0.3,
            home_edge: BoardEdge::default(),
            strategic_targets: Vec::new(),
            priority_units: Vec::new(),
            honor: HonorPolicy::default(),
            decisions: DecisionWeights::default(),
        }
    }
}

impl BehaviorSettings {
    /// Range-check every knob
    pub fn validate(&self) -> Result<()> {
        let knobs = [
            ("aggression", self.aggression),
            ("self_preservation", self.self_preservation),
            ("herd_mentality", self.herd_mentality),
            ("bravery", self.bravery),
            ("withdrawal_threshold", self.withdrawal_threshold),
        ];
        for (name, value) in knobs {
            if !(0.0..=1.0).contains(&value) {
                return Err(TacticianError::InvalidBehavior(format!(
                    "{} must be within 0.0..=1.0, got {}",
                    name, value
                )));
            }
        }

        let weights = &self.decisions;
        for (name, value) in [
            ("attack", weights.attack),
            ("maneuver", weights.maneuver),
            ("flee", weights.flee),
            ("herd", weights.herd),
            ("objective", weights.objective),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TacticianError::InvalidBehavior(format!(
                    "decision weight {} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Should this unit be heading home rather than fighting
    pub fn wants_withdrawal(&self, unit: &Unit) -> bool {
        self.auto_flee
            || unit.withdrawing
            || (self.forced_withdrawal && unit.health_fraction() < self.withdrawal_threshold)
    }

    pub fn is_priority_target(&self, unit: &Unit) -> bool {
        self.priority_units.contains(&unit.id)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let settings: BehaviorSettings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply one operator command, e.g. `aggression 8` or `target 4,7`
    ///
    /// Scales are 0-10 and stored as tenths. On error the settings are left
    /// untouched.
    pub fn apply_command(&mut self, command: &str) -> Result<()> {
        let mut words = command.split_whitespace();
        let verb = words
            .next()
            .ok_or_else(|| TacticianError::UnknownCommand(command.to_string()))?
            .to_ascii_lowercase();
        let argument = words.next();

        let mut updated = self.clone();
        match (verb.as_str(), argument) {
            ("aggression", Some(arg)) => updated.aggression = parse_scale(arg)?,
            ("caution", Some(arg)) => updated.self_preservation = parse_scale(arg)?,
            ("herding", Some(arg)) => updated.herd_mentality = parse_scale(arg)?,
            ("bravery", Some(arg)) => updated.bravery = parse_scale(arg)?,
            ("flee", None) => updated.auto_flee = true,
            ("withdraw", Some(arg)) => updated.forced_withdrawal = parse_switch(arg)?,
            ("ignore", Some(arg)) => {
                let id = parse_unit(arg)?;
                if !updated.honor.ignored_units.contains(&id) {
                    updated.honor.ignored_units.push(id);
                }
            }
            ("prioritize", Some(arg)) => {
                let id = parse_unit(arg)?;
                if !updated.priority_units.contains(&id) {
                    updated.priority_units.push(id);
                }
            }
            ("target", Some(arg)) => {
                let hex = parse_hex(arg)?;
                if !updated.strategic_targets.contains(&hex) {
                    updated.strategic_targets.push(hex);
                }
            }
            ("edge", Some(arg)) => updated.home_edge = parse_edge(arg)?,
            _ => return Err(TacticianError::UnknownCommand(command.to_string())),
        }

        if words.next().is_some() {
            return Err(TacticianError::UnknownCommand(command.to_string()));
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn parse_scale(arg: &str) -> Result<f64> {
    let value: f64 = arg
        .parse()
        .map_err(|_| TacticianError::InvalidBehavior(format!("not a number: {}", arg)))?;
    if !(0.0..=10.0).contains(&value) {
        return Err(TacticianError::InvalidBehavior(format!(
            "scale must be 0-10, got {}",
            arg
        )));
    }
    Ok(value / 10.0)
}

fn parse_switch(arg: &str) -> Result<bool> {
    match arg.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(TacticianError::InvalidBehavior(format!("expected on/off, got {}", arg))),
    }
}

fn parse_unit(arg: &str) -> Result<UnitId> {
    arg.parse()
        .map_err(|_| TacticianError::InvalidBehavior(format!("not a unit id: {}", arg)))
}

fn parse_hex(arg: &str) -> Result<HexCoord> {
    let invalid = || TacticianError::InvalidBehavior(format!("expected q,r, got {}", arg));
    let (q, r) = arg.split_once(',').ok_or_else(invalid)?;
    let q = q.trim().parse().map_err(|_| invalid())?;
    let r = r.trim().parse().map_err(|_| invalid())?;
    Ok(HexCoord::new(q, r))
}

fn parse_edge(arg: &str) -> Result<BoardEdge> {
    match arg.to_ascii_lowercase().as_str() {
        "north" => Ok(BoardEdge::North),
        "south" => Ok(BoardEdge::South),
        "east" => Ok(BoardEdge::East),
        "west" => Ok(BoardEdge::West),
        _ => Err(TacticianError::InvalidBehavior(format!("unknown edge: {}", arg))),
    }
}

/// Load a behavior profile
///
/// Loads from `data/behaviors/{name}.toml`
pub fn load_behavior(name: &str) -> Result<BehaviorSettings> {
    let contents = fs::read_to_string(behavior_path(name))?;
    let mut settings = BehaviorSettings::from_toml_str(&contents)?;
    settings.name = name.to_string();
    Ok(settings)
}

/// Get path to a behavior profile
fn behavior_path(name: &str) -> PathBuf {
    PathBuf::from("data/behaviors").join(format!("{}.toml", name))
}
