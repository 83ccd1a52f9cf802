//! Tournament director: owns the roster and the match store, and drives a
//! tournament from bracket generation through final standings.
//!
//! The director is the explicit session state the components share;
//! nothing here is ambient or global. The display surface drives it with
//! [`Director::advance`] and [`Director::record_result`] and drains
//! [`TournamentEvent`]s after each call.

use std::collections::VecDeque;
use std::fmt;
use std::path::Path;

use log::info;
use thiserror::Error;

use super::models::{Format, MatchId, MatchRecord, Slot, Standing, Winner};
use super::progression::{next_unresolved, propagate_winner};
use super::standings;
use crate::bracket::{self, BracketError};
use crate::store::{MatchStore, StoreError};

/// Tournament orchestration errors.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error(transparent)]
    Bracket(#[from] BracketError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no bracket has been generated")]
    NoBracket,

    /// A forward reference that resolves to no stored match, or that is
    /// still unresolved when its match comes up to play. Indicates a
    /// generator or propagation fault; surfaced, never skipped.
    #[error("placeholder references unknown or unresolved match {0}")]
    InconsistentPlaceholder(MatchId),

    #[error("drawn match {0} cannot seed a later round")]
    DrawNotPropagable(MatchId),
}

pub type TournamentResult<T> = Result<T, TournamentError>;

/// Events queued by the director and drained by the caller.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentEvent {
    BracketGenerated { format: Format, matches: usize },
    ByeAdvanced { id: MatchId, winner: Winner },
    WinnerRecorded { id: MatchId, winner: Winner },
    SlotFilled { from: MatchId, into: MatchId },
    TournamentComplete,
}

impl fmt::Display for TournamentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::BracketGenerated { format, matches } => {
                format!("generated {matches} {format} matches")
            }
            Self::ByeAdvanced { id, winner } => {
                format!("match {id} advanced without play: {winner}")
            }
            Self::WinnerRecorded { id, winner } => {
                format!("match {id} winner recorded: {winner}")
            }
            Self::SlotFilled { from, into } => {
                format!("winner of match {from} placed into match {into}")
            }
            Self::TournamentComplete => "tournament complete".to_string(),
        };
        write!(f, "{repr}")
    }
}

/// What the operator should do next.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NextAction {
    /// A playable match: both sides are real participants. Open a
    /// scoreboard session for it.
    Play {
        id: MatchId,
        home: String,
        away: String,
    },
    /// No unresolved matches remain; the podium is final.
    Complete(Vec<Standing>),
}

/// The tournament session.
#[derive(Debug, Default)]
pub struct Director {
    roster: Vec<String>,
    format: Format,
    store: MatchStore,
    generated: bool,
    events: VecDeque<TournamentEvent>,
}

impl Director {
    #[must_use]
    pub fn new(roster: Vec<String>, format: Format) -> Self {
        Self {
            roster,
            format,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    #[must_use]
    pub fn format(&self) -> Format {
        self.format
    }

    /// Switch formats for the next generation. Existing matches are
    /// untouched until [`Director::generate_bracket`] runs.
    pub fn set_format(&mut self, format: Format) {
        self.format = format;
    }

    /// All matches in the current tournament, id ascending.
    #[must_use]
    pub fn matches(&self) -> &[MatchRecord] {
        self.store.all()
    }

    /// Regenerate the bracket from the roster. Full regeneration: every
    /// previous match is deleted first. Fails closed on an empty roster,
    /// leaving the store untouched.
    pub fn generate_bracket(&mut self) -> TournamentResult<usize> {
        let pairings = bracket::generate(&self.roster, self.format)?;
        let count = pairings.len();
        self.store.replace_all(pairings, self.format);
        self.generated = true;
        self.events.push_back(TournamentEvent::BracketGenerated {
            format: self.format,
            matches: count,
        });
        info!(
            "bracket generated: {count} {} matches for {} participants",
            self.format,
            self.roster.len()
        );
        Ok(count)
    }

    /// Find the current match, auto-resolving byes along the way.
    ///
    /// Loops until a playable pairing or exhaustion: an all-bye pairing
    /// records a bye winner, a one-bye pairing records the real side, and
    /// each auto-resolution propagates before the next candidate is
    /// examined, so multi-round bye cascades settle here without
    /// recursion.
    pub fn advance(&mut self) -> TournamentResult<NextAction> {
        if self.store.is_empty() && !self.generated {
            return Err(TournamentError::NoBracket);
        }

        loop {
            let Some(idx) = next_unresolved(self.store.all()) else {
                self.events.push_back(TournamentEvent::TournamentComplete);
                return Ok(NextAction::Complete(self.standings()));
            };

            let record = &self.store.all()[idx];
            let (id, home, away) = (record.id, record.home.clone(), record.away.clone());

            match (home, away) {
                (Slot::Bye, Slot::Bye) => {
                    self.auto_resolve(id, Winner::Bye)?;
                }
                (Slot::Team(name), Slot::Bye) | (Slot::Bye, Slot::Team(name)) => {
                    self.auto_resolve(id, Winner::Team(name))?;
                }
                (Slot::WinnerOf(referent), _) | (_, Slot::WinnerOf(referent)) => {
                    // Every earlier match is decided, so propagation should
                    // have filled this slot already.
                    return Err(TournamentError::InconsistentPlaceholder(referent));
                }
                (Slot::Team(home), Slot::Team(away)) => {
                    return Ok(NextAction::Play { id, home, away });
                }
            }
        }
    }

    /// Record the outcome of a played match and run the propagation pass.
    pub fn record_result(&mut self, id: MatchId, winner: Winner) -> TournamentResult<()> {
        self.events.push_back(TournamentEvent::WinnerRecorded {
            id,
            winner: winner.clone(),
        });
        self.apply_result(id, winner)
    }

    fn auto_resolve(&mut self, id: MatchId, winner: Winner) -> TournamentResult<()> {
        self.events.push_back(TournamentEvent::ByeAdvanced {
            id,
            winner: winner.clone(),
        });
        self.apply_result(id, winner)
    }

    fn apply_result(&mut self, id: MatchId, winner: Winner) -> TournamentResult<()> {
        self.store.set_winner(id, winner.clone())?;
        for into in propagate_winner(&mut self.store, id, &winner)? {
            self.events
                .push_back(TournamentEvent::SlotFilled { from: id, into });
        }
        Ok(())
    }

    /// Current podium; final once [`Director::advance`] reports
    /// completion.
    #[must_use]
    pub fn standings(&self) -> Vec<Standing> {
        standings::rank(self.store.all())
    }

    pub fn drain_events(&mut self) -> VecDeque<TournamentEvent> {
        std::mem::take(&mut self.events)
    }

    /// Write the match table to a snapshot file.
    pub fn save(&self, path: &Path) -> TournamentResult<()> {
        self.store.save(path)?;
        Ok(())
    }

    /// Rebuild a director from a snapshot file. The roster is recovered
    /// from team slots in appearance order; the format comes from the
    /// stored records.
    pub fn load(path: &Path) -> TournamentResult<Self> {
        let store = MatchStore::load(path)?;
        let format = store
            .all()
            .first()
            .map(|record| record.format)
            .unwrap_or_default();
        let roster = roster_from_matches(store.all());
        let generated = !store.is_empty();
        Ok(Self {
            roster,
            format,
            store,
            generated,
            events: VecDeque::new(),
        })
    }
}

/// Team labels in first-appearance order across all stored slots.
fn roster_from_matches(matches: &[MatchRecord]) -> Vec<String> {
    let mut roster: Vec<String> = Vec::new();
    for record in matches {
        for slot in [&record.home, &record.away] {
            if let Some(team) = slot.as_team() {
                if !roster.iter().any(|known| known == team) {
                    roster.push(team.to_string());
                }
            }
        }
    }
    roster
}
