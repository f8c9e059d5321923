//! Maps terminal key events onto the chat's action vocabulary.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Submit,
    Abort,
    NewChat,
    CyclePersona,
    Insert(char),
    Backspace,
    ScrollUp(u16),
    ScrollDown(u16),
    Quit,
}

const PAGE: u16 = 10;

pub fn map_key(key: KeyEvent) -> Option<UiAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => Some(UiAction::Quit),
        KeyCode::Char('n') if ctrl => Some(UiAction::NewChat),
        KeyCode::Char(c) if !ctrl => Some(UiAction::Insert(c)),
        KeyCode::Enter => Some(UiAction::Submit),
        KeyCode::Esc => Some(UiAction::Abort),
        KeyCode::Tab => Some(UiAction::CyclePersona),
        KeyCode::Backspace => Some(UiAction::Backspace),
        KeyCode::Up => Some(UiAction::ScrollUp(1)),
        KeyCode::Down => Some(UiAction::ScrollDown(1)),
        KeyCode::PageUp => Some(UiAction::ScrollUp(PAGE)),
        KeyCode::PageDown => Some(UiAction::ScrollDown(PAGE)),
        _ => None,
    }
}
