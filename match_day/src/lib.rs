//! # Match Day
//!
//! A single-event tournament engine with a live match scoreboard.
//!
//! The engine takes an ordered roster, generates a round-robin or
//! single-elimination bracket, sequences the matches, runs each playable
//! match on a tick-driven scoreboard state machine, propagates winners into
//! later rounds, and reports podium standings when the bracket is
//! exhausted.
//!
//! ## Architecture
//!
//! - [`bracket`]: pure pairing generation for both formats, with typed
//!   forward references between elimination rounds
//! - [`store`]: the flat match table plus JSON snapshot save/load
//! - [`tournament`]: sequencing, winner propagation, standings, and the
//!   [`Director`] session object that orchestrates a tournament
//! - [`scoreboard`]: the per-match timer state machine (regulation,
//!   overtime, finished) driven by tick and score events
//!
//! Everything is synchronous and single-session: one scoreboard session is
//! live at a time, and the director does not offer the next match until
//! the previous one resolves. Display and audio concerns stay outside the
//! crate; the engine communicates with them through drained event queues.
//!
//! ## Example
//!
//! ```
//! use match_day::{Director, Format, NextAction, Outcome, SessionState, Side, Winner};
//! use match_day::scoreboard::SessionInspect;
//!
//! let roster: Vec<String> = ["Alpha", "Beta"].iter().map(|s| s.to_string()).collect();
//! let mut director = Director::new(roster, Format::RoundRobin);
//! director.generate_bracket()?;
//!
//! while let NextAction::Play { id, home, away } = director.advance()? {
//!     let mut session = SessionState::new(home.clone(), away.clone());
//!     session = session.score(Side::Home);
//!     session = session.score(Side::Home);
//!     session = session.score(Side::Away);
//!     let winner = match session.outcome() {
//!         Some(Outcome::Home) => Winner::Team(home),
//!         Some(Outcome::Away) => Winner::Team(away),
//!         _ => Winner::Draw,
//!     };
//!     director.record_result(id, winner)?;
//! }
//! # Ok::<(), match_day::TournamentError>(())
//! ```

pub mod bracket;
pub mod scoreboard;
pub mod store;
pub mod tournament;

pub use bracket::{BracketError, generate};
pub use scoreboard::{
    Outcome, ScoreboardView, SessionEvent, SessionInspect, SessionState, Side,
    constants::{FINISH_TOTAL, REGULATION_SECS},
};
pub use store::{MatchStore, Snapshot, StoreError, StoreResult};
pub use tournament::{
    Director, Format, MatchId, MatchRecord, NextAction, Slot, Standing, TournamentError,
    TournamentEvent, TournamentResult, Winner,
};
