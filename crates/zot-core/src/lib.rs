//! zot-core: Core simulation logic for the Zot roguelike
//!
//! This crate contains the turn-based game logic with no I/O
//! dependencies: the spell casting and targeting pipeline, spell power
//! computation, the channelling state machine, mutation and stat
//! systems, god conducts and the zot clock. Rendering, input and
//! persistence live in other crates.

pub mod board;
pub mod gameloop;
pub mod magic;
pub mod monster;
pub mod options;
pub mod player;
pub mod zot;

mod consts;
mod rng;

pub use board::{Board, Coord, Tile};
pub use consts::*;
pub use gameloop::{Command, GameState, TurnOutcome};
pub use magic::{
    cast_a_spell, calc_spell_power, CastError, CastResult, Spell, SpellOutcome, Targeter,
};
pub use monster::{Monster, MonsterId};
pub use options::Options;
pub use player::You;
pub use rng::GameRng;
