//! Single-line text inputs on top of `tui-input`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Paragraph;
use tui_input::{Input, InputRequest};

use crate::theme;

/// Editing request for a key, or `None` if the key doesn't edit text.
pub fn request_for(key: &KeyEvent) -> Option<InputRequest> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('u') if ctrl => Some(InputRequest::DeleteLine),
        KeyCode::Char('w') if ctrl => Some(InputRequest::DeletePrevWord),
        KeyCode::Char('a') if ctrl => Some(InputRequest::GoToStart),
        KeyCode::Char('e') if ctrl => Some(InputRequest::GoToEnd),
        KeyCode::Char(c) if !ctrl => Some(InputRequest::InsertChar(c)),
        KeyCode::Backspace => Some(InputRequest::DeletePrevChar),
        KeyCode::Delete => Some(InputRequest::DeleteNextChar),
        KeyCode::Left => Some(InputRequest::GoToPrevChar),
        KeyCode::Right => Some(InputRequest::GoToNextChar),
        KeyCode::Home => Some(InputRequest::GoToStart),
        KeyCode::End => Some(InputRequest::GoToEnd),
        _ => None,
    }
}

/// Apply `key` to `input`. Returns `true` if the value changed.
pub fn edit(input: &mut Input, key: &KeyEvent) -> bool {
    let Some(request) = request_for(key) else {
        return false;
    };
    let before = input.value().to_owned();
    input.handle(request);
    input.value() != before
}

/// Draw `input` on one line. Masked inputs show bullets; an empty unfocused
/// input shows `placeholder`. The terminal cursor follows a focused input.
pub fn render_input(
    frame: &mut Frame,
    area: Rect,
    input: &Input,
    focused: bool,
    masked: bool,
    placeholder: &str,
) {
    let width = usize::from(area.width.max(1));
    let scroll = input.visual_scroll(width.saturating_sub(1));

    let (text, style) = if input.value().is_empty() && !focused {
        (placeholder.to_owned(), theme::key_hint())
    } else if masked {
        (
            "•".repeat(input.value().chars().count()),
            Style::default().fg(theme::NEON_CYAN),
        )
    } else {
        (input.value().to_owned(), Style::default().fg(theme::NEON_CYAN))
    };

    let offset = u16::try_from(scroll).unwrap_or(u16::MAX);
    frame.render_widget(Paragraph::new(text).style(style).scroll((0, offset)), area);

    if focused {
        let cursor = input.visual_cursor().saturating_sub(scroll);
        let x = area.x + u16::try_from(cursor).unwrap_or(u16::MAX).min(area.width.saturating_sub(1));
        frame.set_cursor_position((x, area.y));
    }
}
