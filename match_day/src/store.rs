//! In-memory match store with JSON snapshot save/load.
//!
//! One flat table of [`MatchRecord`]s addressed by 1-based id. The store is
//! replaced wholesale on bracket generation and mutated only through
//! [`MatchStore::set_winner`]. A snapshot file is the entire persistence
//! surface; there are no migrations and no secondary indexes.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tournament::models::{Format, MatchId, MatchRecord, Slot, Winner};

/// Errors from store mutation and snapshot IO.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("match not found: {0}")]
    NotFound(MatchId),

    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Serialized form of the store.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Snapshot {
    pub saved_at: DateTime<Utc>,
    pub matches: Vec<MatchRecord>,
}

/// The match table for the current tournament.
#[derive(Clone, Debug, Default)]
pub struct MatchStore {
    matches: Vec<MatchRecord>,
}

impl MatchStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delete every existing match, then bulk-insert the given pairings
    /// with ids assigned 1..=len in input order.
    pub fn replace_all(&mut self, pairings: Vec<(Slot, Slot)>, format: Format) {
        self.matches = pairings
            .into_iter()
            .enumerate()
            .map(|(idx, (home, away))| {
                MatchRecord::new((idx + 1) as MatchId, home, away, format)
            })
            .collect();
    }

    /// All matches, ordered by id ascending.
    #[must_use]
    pub fn all(&self) -> &[MatchRecord] {
        &self.matches
    }

    #[must_use]
    pub fn get(&self, id: MatchId) -> Option<&MatchRecord> {
        self.matches.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Record a winner. Overwrite-permissive: re-setting an already decided
    /// match simply replaces the previous winner.
    pub fn set_winner(&mut self, id: MatchId, winner: Winner) -> StoreResult<()> {
        let record = self
            .matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::NotFound(id))?;
        record.winner = Some(winner);
        Ok(())
    }

    /// Mutable view for the propagation pass; not exposed outside the crate.
    pub(crate) fn all_mut(&mut self) -> &mut [MatchRecord] {
        &mut self.matches
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            saved_at: Utc::now(),
            matches: self.matches.clone(),
        }
    }

    #[must_use]
    pub fn restore(snapshot: Snapshot) -> Self {
        Self {
            matches: snapshot.matches,
        }
    }

    /// Write the store to a JSON snapshot file.
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.snapshot())?;
        info!("saved {} matches to {}", self.len(), path.display());
        Ok(())
    }

    /// Read a store back from a JSON snapshot file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let file = File::open(path)?;
        let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))?;
        info!(
            "loaded {} matches from {} (saved at {})",
            snapshot.matches.len(),
            path.display(),
            snapshot.saved_at
        );
        Ok(Self::restore(snapshot))
    }
}
