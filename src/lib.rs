//! Typing Rush engine: a terminal typing-action game.
//!
//! The player types words to hold an avatar away from a scrolling danger
//! wall.  Completed words build score, combo and a fever heat meter; every
//! few words the run switches into a frenzy sentence or a boss battle.
//! Everything here is deterministic given a clock value, a word source and
//! an RNG, which the binary supplies.

pub mod boss;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod fever;
pub mod frenzy;
pub mod powerups;
pub mod snapshot;
pub mod words;
