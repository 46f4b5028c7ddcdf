//! Keybinding definitions for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Whether printable keys are shortcuts or text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    Normal,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Help,
    ToggleTheme,
    GoSearch,
    GoMyTrips,
    GoLogin,
    GoRegister,
    Logout,
    NextField,
    PrevField,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Confirm,
    Cancel,
    Toggle,
    Replace,
    Delete,
    Add,
    Save,
    Export,
    Share,
    Rename,
    Refresh,
    Input(char),
    Backspace,
}

pub fn map_key(event: KeyEvent, mode: KeyMode) -> Option<Action> {
    let KeyEvent {
        code,
        modifiers,
        kind,
        ..
    } = event;
    if kind == KeyEventKind::Release {
        return None;
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('t') => Some(Action::ToggleTheme),
            _ => None,
        };
    }

    let shared = match code {
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::NextField),
        KeyCode::BackTab => Some(Action::PrevField),
        KeyCode::Up => Some(Action::MoveUp),
        KeyCode::Down => Some(Action::MoveDown),
        KeyCode::Left => Some(Action::MoveLeft),
        KeyCode::Right => Some(Action::MoveRight),
        KeyCode::Backspace => Some(Action::Backspace),
        _ => None,
    };
    if shared.is_some() {
        return shared;
    }

    match mode {
        KeyMode::Text => match code {
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        KeyMode::Normal => match code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('?') => Some(Action::Help),
            KeyCode::Char('t') => Some(Action::ToggleTheme),
            KeyCode::Char('/') => Some(Action::GoSearch),
            KeyCode::Char('m') => Some(Action::GoMyTrips),
            KeyCode::Char('i') => Some(Action::GoLogin),
            KeyCode::Char('u') => Some(Action::GoRegister),
            KeyCode::Char('o') => Some(Action::Logout),
            KeyCode::Char('k') => Some(Action::MoveUp),
            KeyCode::Char('j') => Some(Action::MoveDown),
            KeyCode::Char('h') => Some(Action::MoveLeft),
            KeyCode::Char('l') => Some(Action::MoveRight),
            KeyCode::Char(' ') => Some(Action::Toggle),
            KeyCode::Char('r') => Some(Action::Replace),
            KeyCode::Char('d') => Some(Action::Delete),
            KeyCode::Char('a') => Some(Action::Add),
            KeyCode::Char('s') => Some(Action::Save),
            KeyCode::Char('e') => Some(Action::Export),
            KeyCode::Char('y') => Some(Action::Share),
            KeyCode::Char('n') => Some(Action::Rename),
            _ => None,
        },
    }
}
