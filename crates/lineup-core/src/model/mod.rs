// Data model: players, pools, and generated lineups.

pub mod player;
pub mod team;
