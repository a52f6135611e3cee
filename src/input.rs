use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::presenter::Presenter;
use crate::runtime::Clock;
use crate::score_store::ScoreBackend;

/// What a key press asks the game to do while a snippet is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Type(char),
    Backspace,
    Next,
    Retry,
    /// true moves to the harder difficulty
    CycleDifficulty(bool),
    Quit,
}

pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        // ctrl+c to quit
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(c) => Some(Action::Type(c)),
        KeyCode::Enter => Some(Action::Type('\n')),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Right | KeyCode::Tab => Some(Action::Next),
        KeyCode::Left => Some(Action::Retry),
        KeyCode::Down => Some(Action::CycleDifficulty(true)),
        KeyCode::Up => Some(Action::CycleDifficulty(false)),
        _ => None,
    }
}

impl<P: Presenter, B: ScoreBackend, C: Clock> App<P, B, C> {
    /// Applies everything but [`Action::Quit`], which belongs to the caller
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Type(c) => self.type_char(c),
            Action::Backspace => self.backspace(),
            Action::Next => self.next_snippet(),
            Action::Retry => self.restart(),
            Action::CycleDifficulty(forward) => self.cycle_difficulty(forward),
            Action::Quit => {}
        }
    }
}
