//! Faction-Go: personality-driven Go opponents.
//!
//! This crate picks moves for six AI factions on small Go boards and hands
//! turns back and forth between the engine and an external player.
//!
//! ## Modules
//!
//! - [`constants`] - Board limits, pacing delays and personality thresholds
//! - [`board`] - Board grid, colors and text parsing
//! - [`analysis`] - Chains, liberties, eyes, territory and move legality
//! - [`game`] - Board state, plays and opponent profiles
//! - [`config`] - Session and pacing configuration
//! - [`error`] - Board and move errors
//! - [`pacing`] - Cooperative waits and the offline-cycle budget
//! - [`roll`] - Injected random source
//! - [`patterns`] - 3x3 shape pattern matching
//! - [`moves`] - Candidate moves by category
//! - [`personality`] - Priority ladders and [`personality::get_move`]
//! - [`turns`] - Per-color turn futures
//! - [`session`] - A running game driving the AI seat
//!
//! ## Example
//!
//! ```
//! use faction_go::board::Color;
//! use faction_go::config::PacingConfig;
//! use faction_go::game::{BoardState, Opponent, Play};
//! use faction_go::pacing::Pacer;
//! use faction_go::personality::get_move;
//! use faction_go::roll::FixedRoll;
//!
//! let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
//! rt.block_on(async {
//!     // a lone black stone in atari on the edge
//!     let state = BoardState::from_rows(&["XO...", ".....", ".....", ".....", "....."], None).unwrap();
//!     let pacer = Pacer::new(PacingConfig::instant());
//!     let play = get_move(&state, Color::White, Opponent::TheBlackHand, &pacer, false, &mut FixedRoll(0.0))
//!         .await
//!         .unwrap();
//!     assert_eq!(play, Play::Move((1, 0)));
//! });
//! ```

pub mod analysis;
pub mod board;
pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod moves;
pub mod pacing;
pub mod patterns;
pub mod personality;
pub mod roll;
pub mod session;
pub mod turns;
