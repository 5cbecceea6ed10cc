//! Mini-games. Each game is a plain state machine; the binary drives them
//! from stdin and records results in [`stats::GameStats`].

pub mod arithmetic;
pub mod baseball;
pub mod memory;
pub mod quiz;
pub mod reaction;
pub mod rps;
pub mod stats;

pub use baseball::BaseballError;
pub use stats::GameStats;
