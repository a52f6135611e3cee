use std::time::Instant;

use crate::catalog::{Catalog, Difficulty};
use crate::runtime::{Clock, SystemClock};
use crate::score_store::ScoreRecord;
use crate::stats::Stats;
use crate::timer::{SessionTimer, TimerSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionStatus {
    /// No snippet shown
    Idle,
    Running,
    /// Snippet reproduced exactly before the time ran out
    Completed,
    /// Time ran out first
    Expired,
}

impl SessionStatus {
    pub fn accepts_input(self) -> bool {
        self == SessionStatus::Running
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Expired)
    }
}

/// What an input change did to the session
#[derive(Debug, Clone, PartialEq)]
pub enum InputOutcome {
    /// Not running, nothing changed
    Ignored,
    Updated(Stats),
    /// The snippet was finished; carries the one record for this attempt
    Completed(ScoreRecord),
}

/// One attempt at typing a snippet, from showing it to completion or expiry
#[derive(Debug)]
pub struct Session<C: Clock = SystemClock> {
    catalog: Catalog,
    clock: C,
    username: String,
    time_limit_secs: u32,
    status: SessionStatus,
    difficulty: Difficulty,
    index: usize,
    snippet: Option<String>,
    input: String,
    started_at: Option<Instant>,
    finished: bool,
    stats: Stats,
    timer: SessionTimer,
}

impl Session<SystemClock> {
    pub fn new(catalog: Catalog, username: impl Into<String>, time_limit_secs: u32) -> Self {
        Self::with_clock(catalog, username, time_limit_secs, SystemClock)
    }
}

impl<C: Clock> Session<C> {
    pub fn with_clock(
        catalog: Catalog,
        username: impl Into<String>,
        time_limit_secs: u32,
        clock: C,
    ) -> Self {
        Self {
            catalog,
            clock,
            username: username.into(),
            time_limit_secs,
            status: SessionStatus::Idle,
            difficulty: Difficulty::default(),
            index: 0,
            snippet: None,
            input: String::new(),
            started_at: None,
            finished: false,
            stats: Stats::fresh(),
            timer: SessionTimer::new(),
        }
    }

    /// Shows snippet `index` (wrapped) of `difficulty` and starts the clock.
    /// Returns false, leaving the session idle with nothing shown, when the
    /// difficulty has no snippets.
    pub fn begin_snippet(&mut self, difficulty: Difficulty, index: usize) -> bool {
        self.timer.cancel();
        self.difficulty = difficulty;
        self.clear_attempt();

        let Some((wrapped, text)) = self.catalog.get(difficulty, index) else {
            tracing::debug!("no snippets for {}", difficulty);
            self.index = 0;
            self.snippet = None;
            self.status = SessionStatus::Idle;
            return false;
        };

        self.index = wrapped;
        self.snippet = Some(text.to_string());
        let now = self.clock.now();
        self.started_at = Some(now);
        self.timer.start(self.time_limit_secs, now);
        self.status = SessionStatus::Running;
        tracing::debug!("started {} snippet {}", difficulty, wrapped);
        true
    }

    /// Recomputes statistics for the whole input buffer. Completes the
    /// attempt when the input matches the snippet exactly.
    pub fn on_input_changed(&mut self, new_input: &str) -> InputOutcome {
        if !self.status.accepts_input() {
            return InputOutcome::Ignored;
        }
        let (Some(snippet), Some(started_at)) = (self.snippet.as_deref(), self.started_at) else {
            return InputOutcome::Ignored;
        };

        let elapsed = self.clock.now().saturating_duration_since(started_at);
        let stats = Stats::compute(new_input, snippet, elapsed);
        let done = new_input == snippet;

        self.input.clear();
        self.input.push_str(new_input);
        self.stats = stats;

        if done && !self.finished {
            self.finished = true;
            self.timer.cancel();
            self.status = SessionStatus::Completed;
            let record =
                ScoreRecord::new(self.username.clone(), stats.wpm, stats.accuracy, self.difficulty);
            tracing::info!(
                "completed {} snippet {}: {} wpm, {}%",
                self.difficulty,
                self.index,
                stats.wpm,
                stats.accuracy
            );
            return InputOutcome::Completed(record);
        }

        InputOutcome::Updated(stats)
    }

    /// Time ran out. Disables input; expired attempts are not scored.
    pub fn on_timer_expired(&mut self) -> bool {
        if !self.status.accepts_input() {
            return false;
        }
        self.timer.cancel();
        self.status = SessionStatus::Expired;
        tracing::debug!("{} snippet {} expired", self.difficulty, self.index);
        true
    }

    /// Feeds elapsed seconds into the countdown, expiring the attempt if it
    /// runs out. Returns the signals in order.
    pub fn poll_timer(&mut self) -> Vec<TimerSignal> {
        let signals = self.timer.poll(self.clock.now());
        if signals.contains(&TimerSignal::Expired) {
            self.on_timer_expired();
        }
        signals
    }

    pub fn reset(&mut self) {
        self.timer.cancel();
        self.clear_attempt();
        self.snippet = None;
        self.status = SessionStatus::Idle;
    }

    /// Moves on cyclically, however the current attempt ended
    pub fn next_snippet(&mut self) -> bool {
        let len = self.catalog.len(self.difficulty).max(1);
        self.begin_snippet(self.difficulty, (self.index + 1) % len)
    }

    /// Same snippet again from scratch
    pub fn restart(&mut self) -> bool {
        self.begin_snippet(self.difficulty, self.index)
    }

    pub fn switch_difficulty(&mut self, difficulty: Difficulty) -> bool {
        self.reset();
        self.begin_snippet(difficulty, 0)
    }

    fn clear_attempt(&mut self) {
        self.input.clear();
        self.started_at = None;
        self.finished = false;
        self.stats = Stats::fresh();
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn snippet(&self) -> Option<&str> {
        self.snippet.as_deref()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn time_remaining(&self) -> u32 {
        self.timer.remaining()
    }

    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}
