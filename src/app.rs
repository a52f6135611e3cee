use crate::catalog::Difficulty;
use crate::highlight::LanguageHint;
use crate::presenter::Presenter;
use crate::runtime::{Clock, SystemClock};
use crate::score_store::{ScoreBackend, ScoreStore};
use crate::session::{InputOutcome, Session, SessionStatus};
use crate::stats::Stats;
use crate::timer::TimerSignal;

/// Drives a [`Session`] from user actions and clock ticks, records finished
/// attempts in the [`ScoreStore`] and keeps the presenter up to date.
#[derive(Debug)]
pub struct App<P: Presenter, B: ScoreBackend, C: Clock = SystemClock> {
    pub session: Session<C>,
    pub scores: ScoreStore<B>,
    pub presenter: P,
    leaderboard_depth: usize,
}

impl<P: Presenter, B: ScoreBackend, C: Clock> App<P, B, C> {
    pub fn new(
        session: Session<C>,
        scores: ScoreStore<B>,
        presenter: P,
        leaderboard_depth: usize,
    ) -> Self {
        Self {
            session,
            scores,
            presenter,
            leaderboard_depth,
        }
    }

    /// Shows the leaderboard and the first snippet of `difficulty`
    pub fn start(&mut self, difficulty: Difficulty) {
        self.show_leaderboard();
        self.session.begin_snippet(difficulty, 0);
        self.show_snippet();
    }

    pub fn type_char(&mut self, c: char) {
        if !self.session.status().accepts_input() {
            return;
        }
        let mut input = self.session.input().to_string();
        input.push(c);
        self.input_changed(&input);
    }

    pub fn backspace(&mut self) {
        if !self.session.status().accepts_input() {
            return;
        }
        let mut input = self.session.input().to_string();
        if input.pop().is_some() {
            self.input_changed(&input);
        }
    }

    pub fn input_changed(&mut self, input: &str) {
        match self.session.on_input_changed(input) {
            InputOutcome::Ignored => {}
            InputOutcome::Updated(stats) => self.show_stats(stats),
            InputOutcome::Completed(record) => {
                self.show_stats(self.session.stats());
                if let Err(e) = self.scores.append(record) {
                    tracing::warn!("could not persist score: {}", e);
                }
                self.show_leaderboard();
                self.presenter.display_status(SessionStatus::Completed);
            }
        }
    }

    pub fn next_snippet(&mut self) {
        self.session.next_snippet();
        self.show_snippet();
    }

    pub fn restart(&mut self) {
        self.session.restart();
        self.show_snippet();
    }

    pub fn switch_difficulty(&mut self, difficulty: Difficulty) {
        self.session.switch_difficulty(difficulty);
        self.show_snippet();
    }

    pub fn cycle_difficulty(&mut self, forward: bool) {
        let current = self.session.difficulty();
        let target = if forward { current.next() } else { current.prev() };
        self.switch_difficulty(target);
    }

    /// Forwards whole seconds from the countdown to the presenter
    pub fn on_tick(&mut self) {
        for signal in self.session.poll_timer() {
            match signal {
                TimerSignal::Tick(remaining) => self.presenter.display_time_remaining(remaining),
                TimerSignal::Expired => {
                    self.presenter.display_time_remaining(0);
                    self.presenter.display_status(SessionStatus::Expired);
                }
            }
        }
    }

    pub fn clear_scores(&mut self) {
        if let Err(e) = self.scores.clear() {
            tracing::warn!("could not clear scores: {}", e);
        }
        self.show_leaderboard();
    }

    pub fn leaderboard_depth(&self) -> usize {
        self.leaderboard_depth
    }

    fn show_snippet(&mut self) {
        match self.session.snippet() {
            Some(text) => {
                let hint = LanguageHint::sniff(text);
                self.presenter.display_snippet(text, hint);
                self.show_stats(self.session.stats());
                self.presenter
                    .display_time_remaining(self.session.time_remaining());
            }
            None => self.presenter.clear_snippet(),
        }
        self.presenter.display_status(self.session.status());
    }

    fn show_stats(&mut self, stats: Stats) {
        self.presenter.display_stats(stats.wpm, stats.accuracy);
    }

    fn show_leaderboard(&mut self) {
        let top = self.scores.leaderboard(self.leaderboard_depth);
        self.presenter.display_leaderboard(top);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::presenter::{PresenterCall, RecordingPresenter};
    use crate::runtime::ManualClock;
    use crate::score_store::{MemoryScoreBackend, ScoreRecord};
    use std::time::Duration;

    type TestApp = App<RecordingPresenter, MemoryScoreBackend, ManualClock>;

    fn app_with(catalog: Catalog) -> (TestApp, ManualClock, MemoryScoreBackend) {
        let clock = ManualClock::new();
        let backend = MemoryScoreBackend::new();
        let session = Session::with_clock(catalog, "ada", 30, clock.clone());
        let scores = ScoreStore::open(backend.clone(), 50);
        (
            App::new(session, scores, RecordingPresenter::new(), 5),
            clock,
            backend,
        )
    }

    fn app() -> (TestApp, ManualClock, MemoryScoreBackend) {
        app_with(Catalog::embedded())
    }

    fn type_str(app: &mut TestApp, s: &str) {
        for c in s.chars() {
            app.type_char(c);
        }
    }

    #[test]
    fn start_shows_leaderboard_then_snippet() {
        let (mut app, _, _) = app();
        app.start(Difficulty::Easy);

        assert_eq!(
            app.presenter.calls,
            vec![
                PresenterCall::Leaderboard(vec![]),
                PresenterCall::Snippet("for i in range(10):".into(), LanguageHint::Python),
                PresenterCall::Stats(0, 100),
                PresenterCall::TimeRemaining(30),
                PresenterCall::Status(SessionStatus::Running),
            ]
        );
    }

    #[test]
    fn start_with_empty_catalog_clears_snippet() {
        let (mut app, _, _) = app_with(Catalog::default());
        app.start(Difficulty::Medium);

        assert!(app.presenter.calls.contains(&PresenterCall::ClearSnippet));
        assert_eq!(
            app.presenter.calls.last(),
            Some(&PresenterCall::Status(SessionStatus::Idle))
        );
    }

    #[test]
    fn typing_updates_stats() {
        let (mut app, clock, _) = app();
        app.start(Difficulty::Easy);
        app.next_snippet();
        clock.advance(Duration::from_secs(6));
        type_str(&mut app, "let x = 1");

        assert_eq!(app.presenter.last_stats(), Some((18, 82)));
    }

    #[test]
    fn backspace_recomputes() {
        let (mut app, _, _) = app();
        app.start(Difficulty::Easy);
        type_str(&mut app, "fox");
        app.backspace();
        assert_eq!(app.session.input(), "fo");
        // "fo" vs "for i in range(10):" is 2 of 19
        assert_eq!(app.presenter.last_stats().map(|s| s.1), Some(11));
    }

    #[test]
    fn backspace_on_empty_input_does_nothing() {
        let (mut app, _, _) = app();
        app.start(Difficulty::Easy);
        let before = app.presenter.calls.len();
        app.backspace();
        assert_eq!(app.presenter.calls.len(), before);
    }

    #[test]
    fn completion_appends_one_record_and_refreshes_leaderboard() {
        let (mut app, clock, backend) = app();
        app.start(Difficulty::Easy);
        clock.advance(Duration::from_secs(4));
        type_str(&mut app, "for i in range(10):");

        assert_eq!(app.session.status(), SessionStatus::Completed);
        assert_eq!(backend.saved().len(), 1);
        let top = app.presenter.last_leaderboard().unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].username, "ada");
        assert_eq!(top[0].accuracy, 100);
        assert_eq!(
            app.presenter.calls.last(),
            Some(&PresenterCall::Status(SessionStatus::Completed))
        );

        // further typing is disabled and never scores again
        app.type_char('x');
        app.input_changed("for i in range(10):");
        assert_eq!(backend.saved().len(), 1);
    }

    #[test]
    fn expiry_is_not_scored() {
        let (mut app, clock, backend) = app();
        app.start(Difficulty::Hard);
        type_str(&mut app, "try");

        for _ in 0..30 {
            clock.advance(Duration::from_secs(1));
            app.on_tick();
        }

        assert_eq!(app.session.status(), SessionStatus::Expired);
        assert!(backend.saved().is_empty());
        assert!(app
            .presenter
            .calls
            .contains(&PresenterCall::Status(SessionStatus::Expired)));
        assert!(app.presenter.calls.contains(&PresenterCall::TimeRemaining(1)));

        app.type_char(' ');
        assert_eq!(app.session.input(), "try");
    }

    #[test]
    fn full_store_keeps_fifty() {
        let existing = (0..50)
            .map(|i| ScoreRecord::new(format!("old{i}"), i, 50, Difficulty::Easy))
            .collect();
        let backend = MemoryScoreBackend::with_records(existing);
        let clock = ManualClock::new();
        let session = Session::with_clock(Catalog::embedded(), "new", 30, clock.clone());
        let mut app = App::new(
            session,
            ScoreStore::open(backend.clone(), 50),
            RecordingPresenter::new(),
            5,
        );

        app.start(Difficulty::Easy);
        type_str(&mut app, "for i in range(10):");

        let saved = backend.saved();
        assert_eq!(saved.len(), 50);
        assert_eq!(saved[0].username, "new");
        assert_eq!(saved[49].username, "old48");
    }

    #[test]
    fn cycle_difficulty_resets_to_first_snippet() {
        let (mut app, _, _) = app();
        app.start(Difficulty::Easy);
        app.next_snippet();
        app.cycle_difficulty(true);
        assert_eq!(app.session.difficulty(), Difficulty::Medium);
        assert_eq!(app.session.index(), 0);

        app.cycle_difficulty(false);
        app.cycle_difficulty(false);
        assert_eq!(app.session.difficulty(), Difficulty::Hard);
    }

    #[test]
    fn clear_scores_shows_empty_leaderboard() {
        let backend =
            MemoryScoreBackend::with_records(vec![ScoreRecord::new("x", 1, 1, Difficulty::Easy)]);
        let session = Session::with_clock(Catalog::embedded(), "x", 30, ManualClock::new());
        let mut app = App::new(
            session,
            ScoreStore::open(backend.clone(), 50),
            RecordingPresenter::new(),
            5,
        );
        app.clear_scores();
        assert_eq!(app.presenter.last_leaderboard(), Some(&[][..]));
        assert!(backend.saved().is_empty());
    }
}
