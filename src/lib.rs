//! Hex Tactician - utility-based path ranking for hex wargame bots

pub mod ai;
pub mod battle;
pub mod core;
pub mod scenario;
