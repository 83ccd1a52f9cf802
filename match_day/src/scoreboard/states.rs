//! Phase definitions for the scoreboard session.

use super::Outcome;

/// Regulation play, clock counting down from the full period.
#[derive(Debug)]
pub struct Regulation {}

/// Overtime, clock counting up from zero. Has no automatic end; only a
/// score event leaves this phase.
#[derive(Debug)]
pub struct Overtime {}

/// Match resolved. The session keeps the outcome until it is torn down.
#[derive(Debug)]
pub struct Finished {
    pub outcome: Outcome,
}
