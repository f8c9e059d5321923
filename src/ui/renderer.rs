use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::core::conversation::ConversationController;
use crate::core::message::Role;
use crate::core::monitor::ConnectionStatus;

/// Everything one frame needs, borrowed from the chat loop.
pub struct ChatView<'a> {
    pub controller: &'a ConversationController,
    pub status: ConnectionStatus,
    pub base_url: &'a str,
    pub model: &'a str,
    /// Lines scrolled up from the bottom of the transcript.
    pub scroll_from_bottom: u16,
}

const WELCOME_LINES: [&str; 5] = [
    "Welcome to localchat!",
    "Make sure your local inference server is running with:",
    "  1. A model loaded",
    "  2. The API server enabled in its settings",
    "  3. The server listening on the configured base URL",
];

pub fn build_transcript_lines(controller: &ConversationController) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if controller.messages().is_empty() && controller.error().is_none() {
        for (index, text) in WELCOME_LINES.iter().enumerate() {
            let style = if index == 0 {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            lines.push(Line::from(Span::styled(*text, style)));
        }
        return lines;
    }

    for message in controller.messages() {
        match message.role {
            // The preamble is shown as the persona in the title bar instead.
            Role::System => continue,
            Role::User => {
                let style = Style::default().fg(Color::Cyan);
                let mut content_lines = message.content.lines();
                let first = content_lines.next().unwrap_or_default().to_string();
                lines.push(Line::from(vec![
                    Span::styled("You: ", style.add_modifier(Modifier::BOLD)),
                    Span::styled(first, style),
                ]));
                for rest in content_lines {
                    lines.push(Line::from(Span::styled(format!("     {rest}"), style)));
                }
            }
            Role::Assistant => {
                for content_line in message.content.lines() {
                    lines.push(Line::from(Span::styled(
                        content_line.to_string(),
                        Style::default().fg(Color::White),
                    )));
                }
            }
        }
        lines.push(Line::from(""));
    }

    if controller.is_awaiting_reply() {
        lines.push(Line::from(Span::styled(
            "Thinking...",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    if let Some(error) = controller.error() {
        let style = Style::default().fg(Color::Red);
        lines.push(Line::from(Span::styled(
            "Error",
            style.add_modifier(Modifier::BOLD),
        )));
        for error_line in error.lines() {
            lines.push(Line::from(Span::styled(error_line.to_string(), style)));
        }
    }

    lines
}

/// Number of terminal rows the lines occupy once wrapped to `width` columns.
pub fn wrapped_line_count(lines: &[Line], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let total: usize = lines
        .iter()
        .map(|line| {
            let line_width: usize = line
                .spans
                .iter()
                .map(|span| span.content.as_ref().width())
                .sum();
            line_width.max(1).div_ceil(width)
        })
        .sum();
    u16::try_from(total).unwrap_or(u16::MAX)
}

pub fn status_span(status: ConnectionStatus, base_url: &str) -> Option<Span<'static>> {
    match status {
        ConnectionStatus::Checking => None,
        ConnectionStatus::Connected => Some(Span::styled(
            format!("● Connected to {base_url}"),
            Style::default().fg(Color::Green),
        )),
        ConnectionStatus::Disconnected => Some(Span::styled(
            format!("✕ Not connected to {base_url}"),
            Style::default().fg(Color::Red),
        )),
    }
}

pub fn ui(f: &mut Frame, view: &ChatView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    let mut title_spans = vec![Span::styled(
        format!(
            "localchat v{} - {} ({})",
            env!("CARGO_PKG_VERSION"),
            view.controller.persona(),
            view.model
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(status) = status_span(view.status, view.base_url) {
        title_spans.push(Span::raw(" • "));
        title_spans.push(status);
    }
    f.render_widget(Paragraph::new(Line::from(title_spans)), chunks[0]);

    let lines = build_transcript_lines(view.controller);
    let transcript_height = chunks[1].height;
    let total = wrapped_line_count(&lines, chunks[1].width);
    let max_offset = total.saturating_sub(transcript_height);
    let scroll_offset = max_offset.saturating_sub(view.scroll_from_bottom.min(max_offset));

    let transcript = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll_offset, 0));
    f.render_widget(transcript, chunks[1]);

    let input_title = if view.controller.is_awaiting_reply() {
        "Waiting for reply (Esc to abort, Ctrl+N new chat, Ctrl+C to quit)"
    } else {
        "Type your message (Enter to send, Tab persona, Ctrl+N new chat, Ctrl+C to quit)"
    };
    let input_style = if view.controller.is_awaiting_reply() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let input = Paragraph::new(view.controller.input())
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(input_title));
    f.render_widget(input, chunks[2]);

    if !view.controller.is_awaiting_reply() {
        let input_width = u16::try_from(view.controller.input().width()).unwrap_or(u16::MAX);
        let max_x = chunks[2].width.saturating_sub(2);
        f.set_cursor_position((
            chunks[2].x + 1 + input_width.min(max_x.saturating_sub(1)),
            chunks[2].y + 1,
        ));
    }
}
