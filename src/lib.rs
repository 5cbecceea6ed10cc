//! milbase: a personal service dashboard
//!
//! This crate provides:
//! - A discharge progress calculator (`discharge` module) with D-day countdowns
//! - A compact 2048 `Board` with table-driven moves (`engine` module)
//! - Memos, service-life tips and a vacation planner
//! - Small games and their persistent statistics (`games` module)
//! - A JSON file `Store` holding all of the above under well-known keys
//!
//! Quick start:
//! ```
//! use chrono::NaiveDate;
//! use milbase::discharge::{DischargeProgress, ServiceType};
//! use milbase::engine::{self as GameEngine, Board, Move};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let enlisted = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
//! let today = NaiveDate::from_ymd_opt(2025, 12, 4).unwrap();
//! let progress = DischargeProgress::compute(enlisted, ServiceType::Army, today).unwrap();
//! assert_eq!(progress.service_days + progress.remaining_days, progress.total_service_days);
//!
//! // One-time table init
//! GameEngine::new();
//! let mut rng = StdRng::seed_from_u64(42);
//! let b0 = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
//! assert_eq!(b0.count_empty(), 14);
//! let slide = b0.slide(Move::Left);
//! assert!(slide.board.count_empty() >= 14);
//! ```
pub mod discharge;
pub mod engine;
pub mod games;
pub mod memo;
pub mod paths;
pub mod profile;
pub mod store;
pub mod tips;
pub mod vacation;
