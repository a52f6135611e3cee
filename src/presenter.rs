use crate::highlight::LanguageHint;
use crate::score_store::ScoreRecord;
use crate::session::SessionStatus;

/// What the core tells whatever is showing the game.
///
/// The core never touches a UI toolkit; it only calls these.
pub trait Presenter {
    fn display_snippet(&mut self, text: &str, hint: LanguageHint);
    /// No snippet available for the selected difficulty
    fn clear_snippet(&mut self);
    fn display_stats(&mut self, wpm: u32, accuracy: u8);
    fn display_time_remaining(&mut self, seconds: u32);
    fn display_leaderboard(&mut self, records: &[ScoreRecord]);
    /// Status changes; terminal statuses mean input is disabled and
    /// moving on to the next snippet is offered.
    fn display_status(&mut self, status: SessionStatus);
}

/// Every call, in order. Used to observe the core in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterCall {
    Snippet(String, LanguageHint),
    ClearSnippet,
    Stats(u32, u8),
    TimeRemaining(u32),
    Leaderboard(Vec<ScoreRecord>),
    Status(SessionStatus),
}

#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub calls: Vec<PresenterCall>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_stats(&self) -> Option<(u32, u8)> {
        self.calls.iter().rev().find_map(|c| match c {
            PresenterCall::Stats(wpm, acc) => Some((*wpm, *acc)),
            _ => None,
        })
    }

    pub fn last_leaderboard(&self) -> Option<&[ScoreRecord]> {
        self.calls.iter().rev().find_map(|c| match c {
            PresenterCall::Leaderboard(records) => Some(records.as_slice()),
            _ => None,
        })
    }
}

impl Presenter for RecordingPresenter {
    fn display_snippet(&mut self, text: &str, hint: LanguageHint) {
        self.calls.push(PresenterCall::Snippet(text.to_string(), hint));
    }

    fn clear_snippet(&mut self) {
        self.calls.push(PresenterCall::ClearSnippet);
    }

    fn display_stats(&mut self, wpm: u32, accuracy: u8) {
        self.calls.push(PresenterCall::Stats(wpm, accuracy));
    }

    fn display_time_remaining(&mut self, seconds: u32) {
        self.calls.push(PresenterCall::TimeRemaining(seconds));
    }

    fn display_leaderboard(&mut self, records: &[ScoreRecord]) {
        self.calls.push(PresenterCall::Leaderboard(records.to_vec()));
    }

    fn display_status(&mut self, status: SessionStatus) {
        self.calls.push(PresenterCall::Status(status));
    }
}
