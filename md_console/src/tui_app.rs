//! Terminal UI for the operator console.
//!
//! One ratatui application drives the whole session: bracket screen,
//! live scoreboard, and final standings, with a rolling record log at the
//! bottom. The scoreboard is advanced by wall-clock ticks measured against
//! a 100 ms input poll, so timer and key events interleave on one thread.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::debug;
use match_day::scoreboard::SessionInspect;
use match_day::{
    Director, Format, MatchId, NextAction, Outcome, SessionEvent, SessionState, Side, Standing,
    Winner,
};
use ratatui::{
    DefaultTerminal, Frame,
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    layout::{Alignment, Constraint, Layout, Rect},
    style::Stylize,
    text::{Line, Span},
    widgets::{Block, Cell, List, ListItem, Paragraph, Row, Table},
};

const POLL_TIMEOUT: Duration = Duration::from_millis(100);
const TICK_INTERVAL: Duration = Duration::from_secs(1);
const MAX_LOG_RECORDS: usize = 256;

/// Importance label for a console record.
#[derive(Clone)]
enum RecordKind {
    Info,
    Match,
    Alert,
    Error,
}

/// A timestamped console message shown in the record log.
#[derive(Clone)]
struct Record {
    datetime: DateTime<Utc>,
    kind: RecordKind,
    content: String,
}

impl Record {
    fn new(kind: RecordKind, content: String) -> Self {
        Self {
            datetime: Utc::now(),
            kind,
            content,
        }
    }
}

impl From<&Record> for ListItem<'_> {
    fn from(val: &Record) -> Self {
        let repr = match val.kind {
            RecordKind::Info => "INFO".light_blue(),
            RecordKind::Match => "MATCH".light_yellow(),
            RecordKind::Alert => "ALERT".light_magenta(),
            RecordKind::Error => "ERROR".light_red(),
        };

        let msg = vec![
            format!("[{} ", val.datetime.format("%H:%M:%S")).into(),
            Span::styled(format!("{repr:5}"), repr.style),
            format!("]: {}", val.content).into(),
        ];

        ListItem::new(Line::from(msg))
    }
}

enum Screen {
    Bracket,
    Scoreboard,
    Standings,
}

pub struct TuiApp {
    director: Director,
    session: Option<SessionState>,
    current_match: Option<MatchId>,
    screen: Screen,
    records: VecDeque<Record>,
    standings: Vec<Standing>,
    save_path: PathBuf,
    last_tick: Instant,
    should_quit: bool,
}

impl TuiApp {
    pub fn new(director: Director, save_path: PathBuf) -> Self {
        Self {
            director,
            session: None,
            current_match: None,
            screen: Screen::Bracket,
            records: VecDeque::with_capacity(MAX_LOG_RECORDS),
            standings: Vec::new(),
            save_path,
            last_tick: Instant::now(),
            should_quit: false,
        }
    }

    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.record(
            RecordKind::Info,
            format!(
                "{} participants, {} format; press g to generate the bracket",
                self.director.roster().len(),
                self.director.format()
            ),
        );
        self.drain_director_events();

        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(POLL_TIMEOUT)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            self.tick_session();
        }
        Ok(())
    }

    fn record(&mut self, kind: RecordKind, content: String) {
        if self.records.len() == MAX_LOG_RECORDS {
            self.records.pop_front();
        }
        self.records.push_back(Record::new(kind, content));
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match self.screen {
            Screen::Bracket => self.handle_bracket_key(key),
            Screen::Scoreboard => self.handle_scoreboard_key(key),
            Screen::Standings => self.handle_standings_key(key),
        }
    }

    fn handle_bracket_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('g') => {
                if let Err(e) = self.director.generate_bracket() {
                    self.record(RecordKind::Error, e.to_string());
                }
                self.drain_director_events();
            }
            KeyCode::Char('f') => {
                let format = match self.director.format() {
                    Format::RoundRobin => Format::SingleElimination,
                    Format::SingleElimination => Format::RoundRobin,
                };
                self.director.set_format(format);
                self.record(
                    RecordKind::Info,
                    format!("format set to {format}; regenerate to apply"),
                );
            }
            KeyCode::Char('n') | KeyCode::Enter => self.advance(),
            KeyCode::Char('s') => self.save_snapshot(),
            _ => {}
        }
    }

    fn handle_scoreboard_key(&mut self, key: KeyEvent) {
        match key.code {
            // Leaving a live match discards the session; the match stays
            // unresolved and will be offered again.
            KeyCode::Char('q') | KeyCode::Esc => {
                self.session = None;
                self.current_match = None;
                self.screen = Screen::Bracket;
                self.record(RecordKind::Info, "live match discarded".to_string());
            }
            KeyCode::Char('1') => self.score(Side::Home),
            KeyCode::Char('2') => self.score(Side::Away),
            KeyCode::Char(' ') => {
                if let Some(session) = self.session.as_mut() {
                    session.toggle_pause();
                }
            }
            _ => {}
        }
    }

    fn handle_standings_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('g') => {
                self.screen = Screen::Bracket;
                self.handle_bracket_key(KeyEvent::from(KeyCode::Char('g')));
            }
            KeyCode::Char('s') => self.save_snapshot(),
            _ => {}
        }
    }

    fn advance(&mut self) {
        match self.director.advance() {
            Ok(NextAction::Play { id, home, away }) => {
                self.record(RecordKind::Match, format!("match {id}: {home} vs {away}"));
                self.session = Some(SessionState::new(home, away));
                self.current_match = Some(id);
                self.last_tick = Instant::now();
                self.screen = Screen::Scoreboard;
            }
            Ok(NextAction::Complete(standings)) => {
                self.standings = standings;
                self.screen = Screen::Standings;
            }
            Err(e) => self.record(RecordKind::Error, e.to_string()),
        }
        self.drain_director_events();
    }

    fn score(&mut self, side: Side) {
        if let Some(session) = self.session.take() {
            self.session = Some(session.score(side));
            self.drain_session_events();
        }
    }

    fn tick_session(&mut self) {
        if self.session.is_none() {
            return;
        }
        while self.last_tick.elapsed() >= TICK_INTERVAL {
            self.last_tick += TICK_INTERVAL;
            if let Some(session) = self.session.take() {
                self.session = Some(session.tick());
            }
        }
        self.drain_session_events();
    }

    fn drain_session_events(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let events = session.drain_events();
        for event in events {
            match &event {
                SessionEvent::RegulationExpired => {
                    ring_bell();
                    self.record(RecordKind::Alert, event.to_string());
                }
                SessionEvent::PointScored { .. } => {
                    self.record(RecordKind::Match, event.to_string());
                }
                SessionEvent::ClockRearmed => debug!("{event}"),
                SessionEvent::MatchFinished { .. } => {
                    self.record(RecordKind::Match, event.to_string());
                }
            }
        }
        self.finish_session_if_resolved();
    }

    fn finish_session_if_resolved(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let Some(outcome) = session.outcome() else {
            return;
        };
        let view = session.view();
        let winner = match outcome {
            Outcome::Home => Winner::Team(view.home_name),
            Outcome::Away => Winner::Team(view.away_name),
            Outcome::Draw => Winner::Draw,
        };

        self.session = None;
        self.screen = Screen::Bracket;
        if let Some(id) = self.current_match.take() {
            if let Err(e) = self.director.record_result(id, winner) {
                self.record(RecordKind::Error, e.to_string());
            }
            self.drain_director_events();
        }
    }

    fn drain_director_events(&mut self) {
        let events = self.director.drain_events();
        for event in events {
            self.record(RecordKind::Info, event.to_string());
        }
    }

    fn save_snapshot(&mut self) {
        match self.director.save(&self.save_path) {
            Ok(()) => self.record(
                RecordKind::Info,
                format!("snapshot saved to {}", self.save_path.display()),
            ),
            Err(e) => self.record(RecordKind::Error, e.to_string()),
        }
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        let [main, log] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(10)]).areas(frame.area());

        match self.screen {
            Screen::Bracket => self.draw_bracket(frame, main),
            Screen::Scoreboard => self.draw_scoreboard(frame, main),
            Screen::Standings => self.draw_standings(frame, main),
        }
        self.draw_log(frame, log);
    }

    fn draw_bracket(&self, frame: &mut Frame<'_>, area: Rect) {
        let header = Row::new(vec!["Id", "Home", "Away", "Winner"]).bold();
        let rows: Vec<Row<'_>> = self
            .director
            .matches()
            .iter()
            .map(|record| {
                let winner = record
                    .winner
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "—".to_string());
                Row::new(vec![
                    Cell::new(record.id.to_string()),
                    Cell::new(record.home.to_string()),
                    Cell::new(record.away.to_string()),
                    Cell::new(winner),
                ])
            })
            .collect();

        let title = format!(
            " Bracket — {} ({} matches) — g generate | n next match | f format | s save | q quit ",
            self.director.format(),
            self.director.matches().len()
        );
        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Percentage(35),
                Constraint::Percentage(35),
                Constraint::Percentage(25),
            ],
        )
        .header(header)
        .block(Block::bordered().title(title));

        frame.render_widget(table, area);
    }

    fn draw_scoreboard(&self, frame: &mut Frame<'_>, area: Rect) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let view = session.view();

        let clock_label = if view.in_overtime {
            format!("{} OT", view.clock_display())
        } else {
            view.clock_display()
        };
        let status = if view.paused { "PAUSED" } else { "" };

        let lines = vec![
            Line::from(""),
            Line::from(
                format!("{}  vs  {}", view.home_name, view.away_name)
                    .bold()
                    .white(),
            ),
            Line::from(""),
            Line::from(
                format!("{}  :  {}", view.home_score, view.away_score)
                    .bold()
                    .light_yellow(),
            ),
            Line::from(format!("play {}", view.play_number)),
            Line::from(""),
            Line::from(if view.in_overtime {
                clock_label.clone().light_red().bold()
            } else {
                clock_label.clone().light_green().bold()
            }),
            Line::from(status.light_magenta()),
            Line::from(""),
            Line::from("1/2 score | space pause | q leave match".dim()),
        ];

        let board = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" Scoreboard "));
        frame.render_widget(board, area);
    }

    fn draw_standings(&self, frame: &mut Frame<'_>, area: Rect) {
        let mut lines: Vec<Line<'_>> = vec![Line::from("Final results".bold()), Line::from("")];
        if self.standings.is_empty() {
            lines.push(Line::from("no decided matches"));
        }
        for (place, standing) in self.standings.iter().enumerate() {
            lines.push(Line::from(format!("{}. {standing}", place + 1)));
        }
        lines.push(Line::from(""));
        lines.push(Line::from("g new bracket | s save | q quit".dim()));

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" Standings "));
        frame.render_widget(paragraph, area);
    }

    fn draw_log(&self, frame: &mut Frame<'_>, area: Rect) {
        let items: Vec<ListItem<'_>> = self
            .records
            .iter()
            .rev()
            .take(area.height.saturating_sub(2) as usize)
            .map(ListItem::from)
            .collect();
        let list = List::new(items).block(Block::bordered().title(" Log "));
        frame.render_widget(list, area);
    }
}

/// The audio collaborator: one fire-and-forget terminal bell.
fn ring_bell() {
    let mut stdout = io::stdout();
    let _ = stdout.write_all(b"\x07");
    let _ = stdout.flush();
}
