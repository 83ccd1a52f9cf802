//! Final standings: win tallies over decided matches.

use super::models::{MatchRecord, Standing};

/// Standings are reported for the podium only.
pub const PODIUM: usize = 3;

/// Tally wins per participant across decided matches, in store order.
///
/// Wins recorded for the bye marker or as draws are not attributed to
/// anyone; a real team's win in a bye pairing counts like any other. Ties
/// keep first-seen order (the sort is stable) and the result is truncated
/// to the podium.
#[must_use]
pub fn rank(matches: &[MatchRecord]) -> Vec<Standing> {
    let mut standings: Vec<Standing> = Vec::new();
    for record in matches {
        let Some(winner) = &record.winner else {
            continue;
        };
        let Some(team) = winner.as_team() else {
            continue;
        };
        match standings.iter_mut().find(|s| s.team == team) {
            Some(standing) => standing.wins += 1,
            None => standings.push(Standing {
                team: team.to_string(),
                wins: 1,
            }),
        }
    }
    standings.sort_by(|a, b| b.wins.cmp(&a.wins));
    standings.truncate(PODIUM);
    standings
}
