//! Tournament orchestration.
//!
//! This module provides everything above the raw match table:
//! - Shared data models (slots, match records, standings)
//! - Winner propagation and match sequencing
//! - Final standings
//! - The [`Director`], which ties the pieces into one tournament session
//!
//! ## Example
//!
//! ```
//! use match_day::tournament::{Director, Format, NextAction, Winner};
//!
//! let roster = vec!["Alpha".to_string(), "Beta".to_string()];
//! let mut director = Director::new(roster, Format::SingleElimination);
//! director.generate_bracket()?;
//!
//! if let NextAction::Play { id, home, away } = director.advance()? {
//!     println!("now playing: {home} vs {away}");
//!     director.record_result(id, Winner::Team(home))?;
//! }
//! # Ok::<(), match_day::tournament::TournamentError>(())
//! ```

pub mod director;
pub mod models;
pub mod progression;
pub mod standings;

pub use director::{Director, NextAction, TournamentError, TournamentEvent, TournamentResult};
pub use models::{Format, MatchId, MatchRecord, Slot, Standing, Winner};
pub use progression::{next_unresolved, propagate_winner};
pub use standings::{PODIUM, rank};
