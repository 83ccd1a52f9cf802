//! Sequencing and winner-propagation primitives.
//!
//! Propagation is one flat pass over the whole store per completed match,
//! never recursive: a match two rounds downstream resolves only when its
//! own immediate predecessor completes and the pass runs again. Multi-round
//! bye cascades are handled by the director looping on
//! [`next_unresolved`], not by recursing here.

use std::collections::HashSet;

use log::debug;

use super::director::{TournamentError, TournamentResult};
use super::models::{MatchId, MatchRecord, Slot, Winner};
use crate::store::MatchStore;

/// Index of the first match (in id order) without a recorded winner.
#[must_use]
pub fn next_unresolved(matches: &[MatchRecord]) -> Option<usize> {
    matches.iter().position(|record| !record.is_decided())
}

/// Substitute the completed match's winner into every slot that references
/// it. Returns the ids of matches that were touched.
///
/// The pass is idempotent: once substituted, no slot references the
/// completed match any more, so a second pass is a no-op. Any forward
/// reference that fails to resolve to an existing match id is surfaced as
/// [`TournamentError::InconsistentPlaceholder`] rather than skipped. A
/// drawn match is only an error if some later slot actually depends on it.
pub fn propagate_winner(
    store: &mut MatchStore,
    completed: MatchId,
    winner: &Winner,
) -> TournamentResult<Vec<MatchId>> {
    let replacement = match winner {
        Winner::Team(name) => Some(Slot::Team(name.clone())),
        Winner::Bye => Some(Slot::Bye),
        Winner::Draw => None,
    };

    let known_ids: HashSet<MatchId> = store.all().iter().map(|record| record.id).collect();
    let mut touched = Vec::new();

    for record in store.all_mut() {
        let mut hit = false;
        for slot in [&mut record.home, &mut record.away] {
            let Slot::WinnerOf(referent) = *slot else {
                continue;
            };
            if !known_ids.contains(&referent) {
                return Err(TournamentError::InconsistentPlaceholder(referent));
            }
            if referent != completed {
                continue;
            }
            match &replacement {
                Some(replacement) => {
                    *slot = replacement.clone();
                    hit = true;
                }
                None => return Err(TournamentError::DrawNotPropagable(completed)),
            }
        }
        if hit {
            touched.push(record.id);
        }
    }

    if !touched.is_empty() {
        debug!("propagated winner of match {completed} into {touched:?}");
    }
    Ok(touched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::models::Format;

    fn elimination_store(teams: &[&str]) -> MatchStore {
        let roster: Vec<String> = teams.iter().map(|s| s.to_string()).collect();
        let pairings = crate::bracket::generate(&roster, Format::SingleElimination).unwrap();
        let mut store = MatchStore::new();
        store.replace_all(pairings, Format::SingleElimination);
        store
    }

    #[test]
    fn test_next_unresolved_in_id_order() {
        let mut store = elimination_store(&["A", "B", "C", "D"]);
        assert_eq!(next_unresolved(store.all()), Some(0));

        store.set_winner(1, Winner::Team("A".to_string())).unwrap();
        assert_eq!(next_unresolved(store.all()), Some(1));

        store.set_winner(2, Winner::Team("C".to_string())).unwrap();
        store.set_winner(3, Winner::Team("A".to_string())).unwrap();
        assert_eq!(next_unresolved(store.all()), None);
    }

    #[test]
    fn test_propagation_fills_both_matching_slots() {
        // A final referencing the same match twice is malformed input for a
        // generator, but the pass itself replaces every matching slot.
        let mut store = MatchStore::new();
        store.replace_all(
            vec![
                (Slot::Team("A".to_string()), Slot::Team("B".to_string())),
                (Slot::WinnerOf(1), Slot::WinnerOf(1)),
            ],
            Format::SingleElimination,
        );
        let touched =
            propagate_winner(&mut store, 1, &Winner::Team("A".to_string())).unwrap();
        assert_eq!(touched, vec![2]);
        let record = store.get(2).unwrap();
        assert_eq!(record.home, Slot::Team("A".to_string()));
        assert_eq!(record.away, Slot::Team("A".to_string()));
    }

    #[test]
    fn test_propagation_is_a_flat_single_pass() {
        let mut store = elimination_store(&["A", "B", "C", "D", "E", "F", "G", "H"]);
        propagate_winner(&mut store, 1, &Winner::Team("A".to_string())).unwrap();

        // Semifinal slot is filled, the final is not: match 7 still waits
        // on match 5 completing.
        assert_eq!(store.get(5).unwrap().home, Slot::Team("A".to_string()));
        assert_eq!(store.get(7).unwrap().home, Slot::WinnerOf(5));
    }

    #[test]
    fn test_propagation_idempotence() {
        let mut store = elimination_store(&["A", "B", "C", "D"]);
        let winner = Winner::Team("B".to_string());

        let first = propagate_winner(&mut store, 1, &winner).unwrap();
        assert_eq!(first, vec![3]);
        let after_first = store.all().to_vec();

        let second = propagate_winner(&mut store, 1, &winner).unwrap();
        assert!(second.is_empty());
        assert_eq!(store.all(), &after_first[..]);
    }

    #[test]
    fn test_bye_winner_propagates_as_bye() {
        let mut store = elimination_store(&["A", "B", "C", "D", "E"]);
        // Match 4 is the all-bye pairing; its "winner" is a bye that flows
        // into match 6.
        propagate_winner(&mut store, 4, &Winner::Bye).unwrap();
        assert_eq!(store.get(6).unwrap().away, Slot::Bye);
    }

    #[test]
    fn test_unknown_referent_is_surfaced() {
        let mut store = MatchStore::new();
        store.replace_all(
            vec![
                (Slot::Team("A".to_string()), Slot::Team("B".to_string())),
                (Slot::WinnerOf(9), Slot::Team("C".to_string())),
            ],
            Format::SingleElimination,
        );
        let err = propagate_winner(&mut store, 1, &Winner::Team("A".to_string())).unwrap_err();
        assert!(matches!(err, TournamentError::InconsistentPlaceholder(9)));
    }

    #[test]
    fn test_draw_without_dependents_is_harmless() {
        let roster: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        let pairings = crate::bracket::generate(&roster, Format::RoundRobin).unwrap();
        let mut store = MatchStore::new();
        store.replace_all(pairings, Format::RoundRobin);

        let touched = propagate_winner(&mut store, 1, &Winner::Draw).unwrap();
        assert!(touched.is_empty());
    }

    #[test]
    fn test_draw_with_dependents_is_an_error() {
        let mut store = elimination_store(&["A", "B", "C", "D"]);
        let err = propagate_winner(&mut store, 1, &Winner::Draw).unwrap_err();
        assert!(matches!(err, TournamentError::DrawNotPropagable(1)));
    }
}
