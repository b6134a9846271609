//! Hex coordinates for the battle board (axial coordinates)
//!
//! Uses axial coordinates (q, r) for easy neighbor calculation.

use serde::{Deserialize, Serialize};

/// Axial hex coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Cube coordinate S (derived from q and r)
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Distance in hexes
    pub fn distance(&self, other: &Self) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// Neighbor in the given direction
    pub fn step(&self, direction: HexDirection) -> Self {
        let offset = direction.offset();
        Self::new(self.q + offset.q, self.r + offset.r)
    }

    /// Get all 6 neighboring hex coordinates
    pub fn neighbors(&self) -> [HexCoord; 6] {
        HexDirection::all().map(|d| self.step(d))
    }

    /// Hexes on the straight line from self to other (inclusive)
    pub fn line_to(&self, other: &Self) -> Vec<HexCoord> {
        let n = self.distance(other) as i32;
        if n == 0 {
            return vec![*self];
        }

        // Nudge off exact vertex crossings so the line is deterministic
        let (q0, r0) = (self.q as f64 + 1e-6, self.r as f64 + 1e-6);
        let (q1, r1) = (other.q as f64 + 1e-6, other.r as f64 + 1e-6);

        (0..=n)
            .map(|i| {
                let t = i as f64 / n as f64;
                Self::round(q0 + (q1 - q0) * t, r0 + (r1 - r0) * t)
            })
            .collect()
    }

    /// Round fractional axial coordinates to the containing hex
    fn round(q: f64, r: f64) -> Self {
        let s = -q - r;
        let mut rq = q.round();
        let mut rr = r.round();
        let rs = s.round();

        let q_diff = (rq - q).abs();
        let r_diff = (rr - r).abs();
        let s_diff = (rs - s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            rq = -rr - rs;
        } else if r_diff > s_diff {
            rr = -rq - rs;
        }

        Self::new(rq as i32, rr as i32)
    }

    /// Get all hexes within range (inclusive)
    pub fn hexes_in_range(&self, range: u32) -> Vec<HexCoord> {
        let range = range as i32;
        let mut results = Vec::new();
        for q in -range..=range {
            for r in (-range).max(-q - range)..=range.min(-q + range) {
                results.push(HexCoord::new(self.q + q, self.r + r));
            }
        }
        results
    }

    /// Direction of the first step from self toward other
    ///
    /// None when both coordinates are the same hex.
    pub fn direction_to(&self, other: &Self) -> Option<HexDirection> {
        let line = self.line_to(other);
        let next = line.get(1)?;
        HexDirection::all()
            .into_iter()
            .find(|d| self.step(*d) == *next)
    }
}

/// Facing of a unit, one per hex side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HexDirection {
    #[default]
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl HexDirection {
    /// Get the hex offset for this direction
    pub fn offset(&self) -> HexCoord {
        match self {
            HexDirection::East => HexCoord::new(1, 0),
            HexDirection::NorthEast => HexCoord::new(1, -1),
            HexDirection::NorthWest => HexCoord::new(0, -1),
            HexDirection::West => HexCoord::new(-1, 0),
            HexDirection::SouthWest => HexCoord::new(-1, 1),
            HexDirection::SouthEast => HexCoord::new(0, 1),
        }
    }

    /// Get opposite direction
    pub fn opposite(&self) -> Self {
        self.rotate(3)
    }

    /// Rotate by a number of hex sides (positive = counter-clockwise)
    pub fn rotate(&self, sides: i32) -> Self {
        let index = (self.index() as i32 + sides).rem_euclid(6) as usize;
        Self::all()[index]
    }

    /// Number of hex sides between two facings (0-3)
    pub fn turns_to(&self, other: &Self) -> u32 {
        let diff = (self.index() as i32 - other.index() as i32).rem_euclid(6);
        diff.min(6 - diff) as u32
    }

    fn index(&self) -> usize {
        match self {
            HexDirection::East => 0,
            HexDirection::NorthEast => 1,
            HexDirection::NorthWest => 2,
            HexDirection::West => 3,
            HexDirection::SouthWest => 4,
            HexDirection::SouthEast => 5,
        }
    }

    /// All directions
    pub fn all() -> [HexDirection; 6] {
        [
            HexDirection::East,
            HexDirection::NorthEast,
            HexDirection::NorthWest,
            HexDirection::West,
            HexDirection::SouthWest,
            HexDirection::SouthEast,
        ]
    }
}

/// Where a unit stands: hex, facing, and elevation above the hex floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    pub hex: HexCoord,
    pub facing: HexDirection,
    pub elevation: i32,
}

impl Position {
    pub fn new(hex: HexCoord, facing: HexDirection) -> Self {
        Self {
            hex,
            facing,
            elevation: 0,
        }
    }

    pub fn at_elevation(mut self, elevation: i32) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn distance(&self, other: &Position) -> u32 {
        self.hex.distance(&other.hex)
    }
}
