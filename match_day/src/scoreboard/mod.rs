//! Live scoreboard session for a single match.
//!
//! The session is a type-safe finite state machine over three phases:
//! regulation (counting down), overtime (counting up), and finished.
//! Transitions consume the session value; callers hold a [`SessionState`]
//! and replace it on every tick or score event. Side effects that concern
//! the display and audio collaborators are queued as [`SessionEvent`]s and
//! drained by the caller.
//!
//! Session state is ephemeral. Dropping a live session discards the match
//! in progress; the match record stays unresolved and the sequencer offers
//! it again.

pub mod constants;
pub mod states;

use std::collections::VecDeque;
use std::fmt;

use enum_dispatch::enum_dispatch;
use log::debug;
use serde::{Deserialize, Serialize};

use self::constants::{FINISH_TOTAL, REGULATION_SECS};
use self::states::{Finished, Overtime, Regulation};

/// The two sides of the scoreboard.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Home => "home",
            Self::Away => "away",
        };
        write!(f, "{repr}")
    }
}

/// Final outcome of a session.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Home,
    Away,
    /// Equal tallies at the finish total. Unreachable while the total is
    /// odd; kept because the completion contract includes it.
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Home => "home side wins",
            Self::Away => "away side wins",
            Self::Draw => "draw",
        };
        write!(f, "{repr}")
    }
}

/// Events queued during a session and drained by the caller.
///
/// [`SessionEvent::RegulationExpired`] is the audio collaborator's alert
/// trigger; it is queued exactly once per regulation-to-overtime
/// transition, at the transition instant.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SessionEvent {
    PointScored { side: Side, play_number: u8 },
    RegulationExpired,
    ClockRearmed,
    MatchFinished { outcome: Outcome },
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::PointScored { side, play_number } => {
                format!("point for {side}, play {play_number} begins")
            }
            Self::RegulationExpired => "regulation time expired, overtime".to_string(),
            Self::ClockRearmed => "clock reset to full period".to_string(),
            Self::MatchFinished { outcome } => format!("match finished: {outcome}"),
        };
        write!(f, "{repr}")
    }
}

/// Everything the display surface needs for one render pass.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ScoreboardView {
    pub home_name: String,
    pub away_name: String,
    pub home_score: u8,
    pub away_score: u8,
    /// The "current play" indicator: one more than total points scored.
    pub play_number: u8,
    /// Remaining regulation seconds, or elapsed overtime seconds.
    pub clock_secs: u32,
    pub in_overtime: bool,
    pub paused: bool,
    pub finished: bool,
    pub outcome: Option<Outcome>,
}

impl ScoreboardView {
    /// mm:ss rendering of the clock.
    #[must_use]
    pub fn clock_display(&self) -> String {
        format!("{:02}:{:02}", self.clock_secs / 60, self.clock_secs % 60)
    }
}

/// Mutable session data shared across all phases.
#[derive(Debug)]
pub struct SessionData {
    home_name: String,
    away_name: String,
    home_score: u8,
    away_score: u8,
    remaining_secs: u32,
    overtime_secs: u32,
    paused: bool,
    events: VecDeque<SessionEvent>,
}

impl SessionData {
    fn new(home_name: String, away_name: String) -> Self {
        Self {
            home_name,
            away_name,
            home_score: 0,
            away_score: 0,
            remaining_secs: REGULATION_SECS,
            overtime_secs: 0,
            paused: false,
            events: VecDeque::new(),
        }
    }

    fn total(&self) -> u8 {
        self.home_score + self.away_score
    }

    fn view(&self, clock_secs: u32, in_overtime: bool, outcome: Option<Outcome>) -> ScoreboardView {
        ScoreboardView {
            home_name: self.home_name.clone(),
            away_name: self.away_name.clone(),
            home_score: self.home_score,
            away_score: self.away_score,
            play_number: self.total() + 1,
            clock_secs,
            in_overtime,
            paused: self.paused,
            finished: outcome.is_some(),
            outcome,
        }
    }
}

/// A scoreboard session in a specific phase.
#[derive(Debug)]
pub struct Session<T> {
    pub data: SessionData,
    pub state: T,
}

pub type RegulationSession = Session<Regulation>;
pub type OvertimeSession = Session<Overtime>;
pub type FinishedSession = Session<Finished>;

/// Read access and event drainage available in every phase.
#[enum_dispatch]
pub trait SessionInspect {
    fn view(&self) -> ScoreboardView;
    fn drain_events(&mut self) -> VecDeque<SessionEvent>;
    fn is_paused(&self) -> bool;
    fn outcome(&self) -> Option<Outcome>;
}

impl SessionInspect for RegulationSession {
    fn view(&self) -> ScoreboardView {
        self.data.view(self.data.remaining_secs, false, None)
    }

    fn drain_events(&mut self) -> VecDeque<SessionEvent> {
        std::mem::take(&mut self.data.events)
    }

    fn is_paused(&self) -> bool {
        self.data.paused
    }

    fn outcome(&self) -> Option<Outcome> {
        None
    }
}

impl SessionInspect for OvertimeSession {
    fn view(&self) -> ScoreboardView {
        self.data.view(self.data.overtime_secs, true, None)
    }

    fn drain_events(&mut self) -> VecDeque<SessionEvent> {
        std::mem::take(&mut self.data.events)
    }

    fn is_paused(&self) -> bool {
        self.data.paused
    }

    fn outcome(&self) -> Option<Outcome> {
        None
    }
}

impl SessionInspect for FinishedSession {
    fn view(&self) -> ScoreboardView {
        self.data
            .view(self.data.remaining_secs, false, Some(self.state.outcome))
    }

    fn drain_events(&mut self) -> VecDeque<SessionEvent> {
        std::mem::take(&mut self.data.events)
    }

    fn is_paused(&self) -> bool {
        self.data.paused
    }

    fn outcome(&self) -> Option<Outcome> {
        Some(self.state.outcome)
    }
}

impl RegulationSession {
    /// Open a session for a playable match. The clock starts running
    /// immediately, counting down from the full period.
    #[must_use]
    pub fn new(home_name: impl Into<String>, away_name: impl Into<String>) -> Self {
        Self {
            data: SessionData::new(home_name.into(), away_name.into()),
            state: Regulation {},
        }
    }

    fn tick(mut self) -> SessionState {
        if self.data.paused {
            return self.into();
        }
        self.data.remaining_secs = self.data.remaining_secs.saturating_sub(1);
        if self.data.remaining_secs == 0 {
            debug!(
                "regulation expired: {} {}:{} {}",
                self.data.home_name, self.data.home_score, self.data.away_score, self.data.away_name
            );
            self.data.events.push_back(SessionEvent::RegulationExpired);
            let Session { data, state: _ } = self;
            return Session {
                data,
                state: Overtime {},
            }
            .into();
        }
        self.into()
    }
}

impl OvertimeSession {
    fn tick(mut self) -> SessionState {
        if !self.data.paused {
            self.data.overtime_secs += 1;
        }
        self.into()
    }
}

/// Apply a score event from any live phase. Every point re-arms the clock
/// to the full period and returns play to regulation; reaching the finish
/// total resolves the match instead.
fn apply_score(mut data: SessionData, side: Side) -> SessionState {
    match side {
        Side::Home => data.home_score += 1,
        Side::Away => data.away_score += 1,
    }
    let total = data.total();
    data.events.push_back(SessionEvent::PointScored {
        side,
        play_number: total + 1,
    });

    data.remaining_secs = REGULATION_SECS;
    data.overtime_secs = 0;
    data.paused = false;
    data.events.push_back(SessionEvent::ClockRearmed);

    if total >= FINISH_TOTAL {
        let outcome = match data.home_score.cmp(&data.away_score) {
            std::cmp::Ordering::Greater => Outcome::Home,
            std::cmp::Ordering::Less => Outcome::Away,
            std::cmp::Ordering::Equal => Outcome::Draw,
        };
        data.events.push_back(SessionEvent::MatchFinished { outcome });
        return Session {
            data,
            state: Finished { outcome },
        }
        .into();
    }

    Session {
        data,
        state: Regulation {},
    }
    .into()
}

/// A session in whatever phase it currently occupies.
#[enum_dispatch(SessionInspect)]
#[derive(Debug)]
pub enum SessionState {
    Regulation(RegulationSession),
    Overtime(OvertimeSession),
    Finished(FinishedSession),
}

impl SessionState {
    /// Open a new session in regulation play.
    #[must_use]
    pub fn new(home_name: impl Into<String>, away_name: impl Into<String>) -> Self {
        RegulationSession::new(home_name, away_name).into()
    }

    /// Advance the clock by one tick. Paused sessions observe the tick but
    /// mutate nothing; finished sessions ignore it.
    #[must_use]
    pub fn tick(self) -> Self {
        match self {
            Self::Regulation(session) => session.tick(),
            Self::Overtime(session) => session.tick(),
            Self::Finished(session) => session.into(),
        }
    }

    /// Record a point for one side. Ignored once the match is finished.
    #[must_use]
    pub fn score(self, side: Side) -> Self {
        match self {
            Self::Regulation(session) => apply_score(session.data, side),
            Self::Overtime(session) => apply_score(session.data, side),
            Self::Finished(session) => session.into(),
        }
    }

    /// Toggle the paused flag. A no-op on a finished session.
    pub fn toggle_pause(&mut self) {
        match self {
            Self::Regulation(session) => session.data.paused = !session.data.paused,
            Self::Overtime(session) => session.data.paused = !session.data.paused,
            Self::Finished(_) => {}
        }
    }

    /// Whether the session has resolved.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open() -> SessionState {
        SessionState::new("Alpha", "Beta")
    }

    fn drain(session: &mut SessionState) -> Vec<SessionEvent> {
        session.drain_events().into_iter().collect()
    }

    #[test]
    fn test_initial_view() {
        let session = open();
        let view = session.view();
        assert_eq!(view.home_name, "Alpha");
        assert_eq!(view.away_name, "Beta");
        assert_eq!(view.play_number, 1);
        assert_eq!(view.clock_secs, 180);
        assert_eq!(view.clock_display(), "03:00");
        assert!(!view.paused);
        assert!(!view.in_overtime);
        assert!(!view.finished);
    }

    #[test]
    fn test_countdown() {
        let mut session = open();
        for _ in 0..30 {
            session = session.tick();
        }
        assert_eq!(session.view().clock_secs, 150);
        assert_eq!(session.view().clock_display(), "02:30");
    }

    #[test]
    fn test_regulation_expiry_enters_overtime_with_one_alert() {
        let mut session = open();
        for _ in 0..181 {
            session = session.tick();
        }
        let view = session.view();
        assert!(view.in_overtime);
        assert_eq!(view.clock_secs, 1, "one overtime second has elapsed");

        let alerts = drain(&mut session)
            .into_iter()
            .filter(|event| *event == SessionEvent::RegulationExpired)
            .count();
        assert_eq!(alerts, 1);
    }

    #[test]
    fn test_overtime_has_no_automatic_end() {
        let mut session = open();
        for _ in 0..10_000 {
            session = session.tick();
        }
        let view = session.view();
        assert!(view.in_overtime);
        assert_eq!(view.clock_secs, 10_000 - 180);
        assert!(!view.finished);
    }

    #[test]
    fn test_paused_ticks_mutate_nothing() {
        let mut session = open();
        session = session.tick();
        session.toggle_pause();
        for _ in 0..50 {
            session = session.tick();
        }
        assert_eq!(session.view().clock_secs, 179);
        assert!(session.is_paused());

        session.toggle_pause();
        session = session.tick();
        assert_eq!(session.view().clock_secs, 178);
    }

    #[test]
    fn test_score_rearms_clock_and_leaves_overtime() {
        let mut session = open();
        for _ in 0..200 {
            session = session.tick();
        }
        assert!(session.view().in_overtime);

        session = session.score(Side::Home);
        let view = session.view();
        assert!(!view.in_overtime);
        assert_eq!(view.clock_secs, 180);
        assert_eq!(view.home_score, 1);
        assert_eq!(view.play_number, 2);
        assert!(!view.paused);
    }

    #[test]
    fn test_play_number_is_total_plus_one() {
        let mut session = open();
        session = session.score(Side::Home);
        assert_eq!(session.view().play_number, 2);
        session = session.score(Side::Away);
        assert_eq!(session.view().play_number, 3);
    }

    #[test]
    fn test_three_points_finish_the_match() {
        let mut session = open();
        session = session.score(Side::Home);
        session = session.score(Side::Away);
        assert!(!session.is_finished());
        session = session.score(Side::Home);

        assert!(session.is_finished());
        assert_eq!(session.outcome(), Some(Outcome::Home));
        let events = drain(&mut session);
        assert!(events.contains(&SessionEvent::MatchFinished {
            outcome: Outcome::Home
        }));
    }

    #[test]
    fn test_sweep_finish_for_away() {
        let mut session = open();
        for _ in 0..3 {
            session = session.score(Side::Away);
        }
        assert_eq!(session.outcome(), Some(Outcome::Away));
    }

    #[test]
    fn test_odd_totals_never_draw() {
        // Every split of 3 points has a strict majority side.
        for home_points in 0..=3u8 {
            let mut session = open();
            for _ in 0..home_points {
                session = session.score(Side::Home);
            }
            for _ in 0..(3 - home_points) {
                session = session.score(Side::Away);
            }
            assert!(session.is_finished());
            assert_ne!(session.outcome(), Some(Outcome::Draw));
        }
    }

    #[test]
    fn test_finished_session_ignores_input() {
        let mut session = open();
        for _ in 0..3 {
            session = session.score(Side::Home);
        }
        session = session.tick();
        session = session.score(Side::Away);
        session.toggle_pause();

        let view = session.view();
        assert_eq!(view.home_score, 3);
        assert_eq!(view.away_score, 0);
        assert!(view.finished);
        assert!(!view.paused);
    }

    #[test]
    fn test_alert_fires_again_after_rearm() {
        // Re-armed regulation can expire a second time; each transition
        // queues its own alert.
        let mut session = open();
        for _ in 0..180 {
            session = session.tick();
        }
        session = session.score(Side::Home);
        for _ in 0..180 {
            session = session.tick();
        }
        let alerts = drain(&mut session)
            .into_iter()
            .filter(|event| *event == SessionEvent::RegulationExpired)
            .count();
        assert_eq!(alerts, 2);
    }
}
