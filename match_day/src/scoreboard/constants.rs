//! Scoreboard timing and completion constants.

/// Regulation period length in seconds (3 minutes on the wall clock).
pub const REGULATION_SECS: u32 = 180;

/// Combined score at which a match resolves. The total is odd, so an
/// equal-score finish is unreachable under this rule.
pub const FINISH_TOTAL: u8 = 3;
