//! Data models shared by the bracket generator, match store, and director.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Match ID type. Ids are 1-based and assigned in generation order.
pub type MatchId = u32;

/// Tournament format selected by the operator.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// Every pair of participants meets exactly once.
    #[default]
    RoundRobin,
    /// Knockout bracket padded with byes to a power of two.
    SingleElimination,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::RoundRobin => "round robin",
            Self::SingleElimination => "single elimination",
        };
        write!(f, "{repr}")
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "round_robin" | "round-robin" | "rr" => Ok(Self::RoundRobin),
            "single_elimination" | "single-elimination" | "elimination" | "se" => {
                Ok(Self::SingleElimination)
            }
            other => Err(format!("unknown format: {other}")),
        }
    }
}

/// One side of a match.
///
/// Later elimination rounds reference earlier matches through
/// [`Slot::WinnerOf`] instead of the legacy "Winner of match N" strings;
/// the string form only exists in [`fmt::Display`] output.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Slot {
    /// A real participant, identified by the roster label.
    Team(String),
    /// Forward reference to the winner of an earlier match.
    WinnerOf(MatchId),
    /// No opponent. Auto-resolves without play.
    Bye,
}

impl Slot {
    /// Whether this slot is the bye marker.
    #[must_use]
    pub fn is_bye(&self) -> bool {
        matches!(self, Self::Bye)
    }

    /// Roster label if the slot holds a real participant.
    #[must_use]
    pub fn as_team(&self) -> Option<&str> {
        match self {
            Self::Team(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Team(name) => write!(f, "{name}"),
            Self::WinnerOf(id) => write!(f, "Winner of match {id}"),
            Self::Bye => write!(f, "Bye"),
        }
    }
}

/// Recorded outcome of a match.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Winner {
    /// A participant won outright.
    Team(String),
    /// A bye-versus-bye pairing; the bye advances.
    Bye,
    /// Tie sentinel. Unreachable while the finish total is odd, but the
    /// scoreboard contract includes it and the engine must not drop it.
    Draw,
}

impl Winner {
    /// Whether this outcome names a real participant.
    #[must_use]
    pub fn as_team(&self) -> Option<&str> {
        match self {
            Self::Team(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Team(name) => write!(f, "{name}"),
            Self::Bye => write!(f, "Bye"),
            Self::Draw => write!(f, "Draw"),
        }
    }
}

/// A stored match. Created in bulk when a bracket is generated, decided at
/// most once, never deleted individually.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MatchRecord {
    /// 1-based id, continuous across all rounds.
    pub id: MatchId,
    pub home: Slot,
    pub away: Slot,
    /// `None` until the match is decided.
    pub winner: Option<Winner>,
    /// Format tag of the generating bracket.
    pub format: Format,
}

impl MatchRecord {
    #[must_use]
    pub fn new(id: MatchId, home: Slot, away: Slot, format: Format) -> Self {
        Self {
            id,
            home,
            away,
            winner: None,
            format,
        }
    }

    /// Whether a winner has been recorded.
    #[must_use]
    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    /// Whether either side is the bye marker.
    #[must_use]
    pub fn has_bye(&self) -> bool {
        self.home.is_bye() || self.away.is_bye()
    }
}

impl fmt::Display for MatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "match {}: {} vs {}", self.id, self.home, self.away)?;
        if let Some(winner) = &self.winner {
            write!(f, " (winner: {winner})")?;
        }
        Ok(())
    }
}

/// One row of the final standings.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Standing {
    pub team: String,
    pub wins: u32,
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wins = self.wins;
        let noun = if wins == 1 { "win" } else { "wins" };
        write!(f, "{} ({wins} {noun})", self.team)
    }
}
