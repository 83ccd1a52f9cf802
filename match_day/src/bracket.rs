//! Bracket generation for round-robin and single-elimination formats.
//!
//! Generation is a pure function from an ordered roster to an ordered list
//! of pairings. Elimination rounds are built with an explicit per-round
//! loop; each pairing's position in the output (1-based) is the match id it
//! will receive on insertion, so a [`Slot::WinnerOf`] reference always
//! points at an already-emitted pairing.

use log::debug;
use thiserror::Error;

use crate::tournament::models::{Format, MatchId, Slot};

/// Errors from bracket generation. Generation fails closed: on error no
/// pairings are produced and the store is left untouched.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum BracketError {
    #[error("at least one participant is required")]
    NoParticipants,
}

/// Generate the full pairing list for a roster under the given format.
///
/// Pairings are ordered; their 1-based positions are the ids the match
/// store will assign. A single-participant roster is degenerate and yields
/// no pairings; an empty roster is an error.
pub fn generate(teams: &[String], format: Format) -> Result<Vec<(Slot, Slot)>, BracketError> {
    if teams.is_empty() {
        return Err(BracketError::NoParticipants);
    }

    let pairings = match format {
        Format::RoundRobin => round_robin(teams),
        Format::SingleElimination => single_elimination(teams),
    };
    debug!(
        "generated {} {format} pairings for {} participants",
        pairings.len(),
        teams.len()
    );
    Ok(pairings)
}

/// Every unordered pair exactly once: outer index ascending, inner index
/// ascending, n*(n-1)/2 pairings.
fn round_robin(teams: &[String]) -> Vec<(Slot, Slot)> {
    let mut pairings = Vec::with_capacity(teams.len() * teams.len().saturating_sub(1) / 2);
    for (i, home) in teams.iter().enumerate() {
        for away in &teams[i + 1..] {
            pairings.push((Slot::Team(home.clone()), Slot::Team(away.clone())));
        }
    }
    pairings
}

/// Pad the roster with byes to the next power of two, then pair
/// consecutively round by round until a single final remains. Produces
/// exactly `padded - 1` pairings.
fn single_elimination(teams: &[String]) -> Vec<(Slot, Slot)> {
    let padded = teams.len().next_power_of_two();
    let mut current: Vec<Slot> = teams.iter().cloned().map(Slot::Team).collect();
    current.resize(padded, Slot::Bye);

    let mut pairings = Vec::with_capacity(padded.saturating_sub(1));
    while current.len() > 1 {
        let mut next_round = Vec::with_capacity(current.len() / 2);
        let mut slots = current.into_iter();
        while let (Some(home), Some(away)) = (slots.next(), slots.next()) {
            pairings.push((home, away));
            next_round.push(Slot::WinnerOf(pairings.len() as MatchId));
        }
        current = next_round;
    }
    pairings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_roster_is_rejected() {
        assert_eq!(
            generate(&[], Format::RoundRobin),
            Err(BracketError::NoParticipants)
        );
        assert_eq!(
            generate(&[], Format::SingleElimination),
            Err(BracketError::NoParticipants)
        );
    }

    #[test]
    fn test_single_participant_is_degenerate() {
        let teams = roster(&["A"]);
        assert!(generate(&teams, Format::RoundRobin).unwrap().is_empty());
        assert!(
            generate(&teams, Format::SingleElimination)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_round_robin_four_teams_fixed_order() {
        let teams = roster(&["A", "B", "C", "D"]);
        let pairings = generate(&teams, Format::RoundRobin).unwrap();
        let expected: Vec<(Slot, Slot)> = [
            ("A", "B"),
            ("A", "C"),
            ("A", "D"),
            ("B", "C"),
            ("B", "D"),
            ("C", "D"),
        ]
        .iter()
        .map(|(h, a)| (Slot::Team(h.to_string()), Slot::Team(a.to_string())))
        .collect();
        assert_eq!(pairings, expected);
    }

    #[test]
    fn test_elimination_four_teams() {
        let teams = roster(&["A", "B", "C", "D"]);
        let pairings = generate(&teams, Format::SingleElimination).unwrap();
        assert_eq!(
            pairings,
            vec![
                (Slot::Team("A".to_string()), Slot::Team("B".to_string())),
                (Slot::Team("C".to_string()), Slot::Team("D".to_string())),
                (Slot::WinnerOf(1), Slot::WinnerOf(2)),
            ]
        );
    }

    #[test]
    fn test_elimination_five_teams_pads_to_eight() {
        let teams = roster(&["A", "B", "C", "D", "E"]);
        let pairings = generate(&teams, Format::SingleElimination).unwrap();
        // 8 padded entrants -> 7 matches: 4 + 2 + 1.
        assert_eq!(pairings.len(), 7);

        let byes = pairings
            .iter()
            .flat_map(|(h, a)| [h, a])
            .filter(|slot| slot.is_bye())
            .count();
        assert_eq!(byes, 3);

        assert_eq!(
            pairings[2],
            (Slot::Team("E".to_string()), Slot::Bye),
            "fifth seed pairs against the first bye"
        );
        assert_eq!(pairings[3], (Slot::Bye, Slot::Bye));
        assert_eq!(pairings[4], (Slot::WinnerOf(1), Slot::WinnerOf(2)));
        assert_eq!(pairings[5], (Slot::WinnerOf(3), Slot::WinnerOf(4)));
        assert_eq!(pairings[6], (Slot::WinnerOf(5), Slot::WinnerOf(6)));
    }

    #[test]
    fn test_elimination_references_point_backwards() {
        let teams: Vec<String> = (1..=20).map(|i| format!("Team {i}")).collect();
        let pairings = generate(&teams, Format::SingleElimination).unwrap();
        assert_eq!(pairings.len(), 31);

        for (idx, (home, away)) in pairings.iter().enumerate() {
            let id = (idx + 1) as MatchId;
            for slot in [home, away] {
                if let Slot::WinnerOf(referent) = slot {
                    assert!(
                        *referent < id,
                        "match {id} references match {referent} which is not earlier"
                    );
                }
            }
        }
    }

    #[test]
    fn test_elimination_each_match_feeds_one_later_slot() {
        let teams = roster(&["A", "B", "C", "D", "E", "F"]);
        let pairings = generate(&teams, Format::SingleElimination).unwrap();
        let last = pairings.len() as MatchId;

        for id in 1..last {
            let referents = pairings
                .iter()
                .flat_map(|(h, a)| [h, a])
                .filter(|slot| **slot == Slot::WinnerOf(id))
                .count();
            assert_eq!(referents, 1, "match {id} must feed exactly one later slot");
        }
    }
}
