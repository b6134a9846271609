//! Battle board with hex grid, terrain, minefields, and line of sight

use serde::{Deserialize, Serialize};

use crate::battle::hex::HexCoord;
use crate::battle::terrain::Terrain;

/// A single hex on the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardHex {
    pub coord: HexCoord,
    pub terrain: Terrain,
    pub elevation: i32,
}

impl BoardHex {
    pub fn new(coord: HexCoord, terrain: Terrain) -> Self {
        Self {
            coord,
            terrain,
            elevation: 0,
        }
    }
}

/// A minefield the acting side knows about
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Minefield {
    pub coord: HexCoord,
    /// Chance (0.0-1.0) that entering the hex sets it off
    pub density: f64,
    pub damage: f64,
}

/// Board edges, used for withdrawal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BoardEdge {
    North,
    #[default]
    South,
    East,
    West,
}

/// The full board, stored row-major (r outer, q inner)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub width: u32,
    pub height: u32,
    hexes: Vec<BoardHex>,
    #[serde(default)]
    pub minefields: Vec<Minefield>,
}

impl Board {
    /// Create a new board with clear terrain
    pub fn new(width: u32, height: u32) -> Self {
        let mut hexes = Vec::with_capacity((width * height) as usize);
        for r in 0..height as i32 {
            for q in 0..width as i32 {
                hexes.push(BoardHex::new(HexCoord::new(q, r), Terrain::Clear));
            }
        }

        Self {
            width,
            height,
            hexes,
            minefields: Vec::new(),
        }
    }

    fn index(&self, coord: HexCoord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(coord.r as usize * self.width as usize + coord.q as usize)
        } else {
            None
        }
    }

    /// Check if coordinate is within board bounds
    pub fn in_bounds(&self, coord: HexCoord) -> bool {
        coord.q >= 0
            && coord.r >= 0
            && coord.q < self.width as i32
            && coord.r < self.height as i32
    }

    pub fn get_hex(&self, coord: HexCoord) -> Option<&BoardHex> {
        self.index(coord).and_then(|i| self.hexes.get(i))
    }

    pub fn get_hex_mut(&mut self, coord: HexCoord) -> Option<&mut BoardHex> {
        self.index(coord).and_then(move |i| self.hexes.get_mut(i))
    }

    /// Terrain at a coordinate; off-board reads as clear
    pub fn terrain(&self, coord: HexCoord) -> Terrain {
        self.get_hex(coord).map(|h| h.terrain).unwrap_or_default()
    }

    pub fn elevation(&self, coord: HexCoord) -> i32 {
        self.get_hex(coord).map(|h| h.elevation).unwrap_or(0)
    }

    pub fn set_terrain(&mut self, coord: HexCoord, terrain: Terrain) {
        if let Some(hex) = self.get_hex_mut(coord) {
            hex.terrain = terrain;
        }
    }

    pub fn set_elevation(&mut self, coord: HexCoord, elevation: i32) {
        if let Some(hex) = self.get_hex_mut(coord) {
            hex.elevation = elevation;
        }
    }

    pub fn add_minefield(&mut self, minefield: Minefield) {
        self.minefields.retain(|m| m.coord != minefield.coord);
        self.minefields.push(minefield);
    }

    pub fn minefield_at(&self, coord: HexCoord) -> Option<&Minefield> {
        self.minefields.iter().find(|m| m.coord == coord)
    }

    /// Check line of sight between two hexes
    ///
    /// Intervening blocking terrain blocks the line unless both ends sit
    /// above it.
    pub fn has_line_of_sight(&self, from: HexCoord, to: HexCoord) -> bool {
        let line = from.line_to(&to);
        let eye_level = self.elevation(from).min(self.elevation(to));

        line.iter()
            .skip(1)
            .take(line.len().saturating_sub(2))
            .filter_map(|coord| self.get_hex(*coord))
            .all(|hex| !hex.terrain.blocks_los() || hex.elevation < eye_level)
    }

    /// Distance in hexes from a coordinate to a board edge
    pub fn distance_to_edge(&self, coord: HexCoord, edge: BoardEdge) -> u32 {
        let d = match edge {
            BoardEdge::North => coord.r,
            BoardEdge::South => self.height as i32 - 1 - coord.r,
            BoardEdge::West => coord.q,
            BoardEdge::East => self.width as i32 - 1 - coord.q,
        };
        d.max(0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_creation() {
        let board = Board::new(10, 8);
        assert_eq!(board.width, 10);
        assert_eq!(board.height, 8);
        assert!(board.get_hex(HexCoord::new(9, 7)).is_some());
        assert!(board.get_hex(HexCoord::new(10, 7)).is_none());
        assert!(board.get_hex(HexCoord::new(-1, 0)).is_none());
    }

    #[test]
    fn test_get_hex_coordinates_match() {
        let board = Board::new(6, 6);
        let hex = board.get_hex(HexCoord::new(4, 2)).expect("on board");
        assert_eq!(hex.coord, HexCoord::new(4, 2));
    }

    #[test]
    fn test_line_of_sight_open() {
        let board = Board::new(10, 10);
        assert!(board.has_line_of_sight(HexCoord::new(0, 0), HexCoord::new(5, 0)));
    }

    #[test]
    fn test_line_of_sight_blocked_by_heavy_woods() {
        let mut board = Board::new(10, 10);
        board.set_terrain(HexCoord::new(2, 0), Terrain::HeavyWoods);
        assert!(!board.has_line_of_sight(HexCoord::new(0, 0), HexCoord::new(5, 0)));
    }

    #[test]
    fn test_high_ground_sees_over_woods() {
        let mut board = Board::new(10, 10);
        board.set_terrain(HexCoord::new(2, 0), Terrain::HeavyWoods);
        board.set_elevation(HexCoord::new(0, 0), 2);
        board.set_elevation(HexCoord::new(5, 0), 2);
        assert!(board.has_line_of_sight(HexCoord::new(0, 0), HexCoord::new(5, 0)));
    }

    #[test]
    fn test_minefield_replaces_existing() {
        let mut board = Board::new(5, 5);
        let coord = HexCoord::new(1, 1);
        board.add_minefield(Minefield { coord, density: 0.2, damage: 10.0 });
        board.add_minefield(Minefield { coord, density: 0.5, damage: 20.0 });
        assert_eq!(board.minefields.len(), 1);
        assert_eq!(board.minefield_at(coord).map(|m| m.density), Some(0.5));
    }

    #[test]
    fn test_distance_to_edge() {
        let board = Board::new(10, 20);
        let coord = HexCoord::new(3, 5);
        assert_eq!(board.distance_to_edge(coord, BoardEdge::North), 5);
        assert_eq!(board.distance_to_edge(coord, BoardEdge::South), 14);
        assert_eq!(board.distance_to_edge(coord, BoardEdge::West), 3);
        assert_eq!(board.distance_to_edge(coord, BoardEdge::East), 6);
    }
}
