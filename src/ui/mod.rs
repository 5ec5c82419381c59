pub mod editor;
pub mod list;
pub mod modal;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::shell::state::{DELETE_PROMPT, ShellState};

use modal::Modal;

/// What the API badge in the panel header shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBadge {
    pub base: String,
    pub custom: bool,
}

impl ApiBadge {
    fn line(&self) -> Line<'static> {
        if self.custom {
            Line::from(Span::styled(
                format!("API: {}", self.base),
                Style::default().fg(Color::Green),
            ))
        } else {
            Line::from(Span::styled(
                "API: (default)",
                Style::default().fg(Color::Yellow),
            ))
        }
    }
}

pub fn note_count_label(state: &ShellState) -> String {
    if state.is_loading() {
        return "Loading…".to_string();
    }
    match state.notes().len() {
        1 => "1 note".to_string(),
        n => format!("{n} notes"),
    }
}

/// Draws the whole screen, dialogs included
pub fn draw_app(frame: &mut Frame, state: &ShellState, badge: &ApiBadge) {
    let error_height = state
        .error()
        .map_or(0, |error| error_banner_height(error, frame.area().width));
    let [top_bar, panel_header, banner, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(2),
        Constraint::Length(error_height),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_top_bar(frame, top_bar, state);
    draw_panel_header(frame, panel_header, state, badge);
    if let Some(error) = state.error() {
        draw_error(frame, banner, error);
    }
    draw_body(frame, body, state);
    frame.render_widget(
        Paragraph::new("↑/↓ select  e edit  d delete  n new  r refresh  q quit")
            .style(Style::default().fg(Color::DarkGray)),
        footer,
    );

    if let Some(session) = state.editor() {
        let inner = Modal::EDITOR.render(frame, session.mode.dialog_title());
        session.form.render(frame, inner, state.is_saving());
    } else if state.pending_delete().is_some() {
        let inner = Modal::CONFIRM.render(frame, "Delete note");
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(DELETE_PROMPT),
                Line::default(),
                Line::from("[y] Delete   [n] Keep").right_aligned(),
            ])
            .wrap(Wrap { trim: true }),
            inner,
        );
    }
}

fn draw_top_bar(frame: &mut Frame, area: Rect, state: &ShellState) {
    let block = Block::default().borders(Borders::BOTTOM);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [brand, actions] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(32)]).areas(inner);

    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                "Notes",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Create, edit, and organize your thoughts",
                Style::default().fg(Color::DarkGray),
            )),
        ]),
        brand,
    );

    let refresh_label = if state.is_refreshing() {
        "[r] Refreshing…"
    } else {
        "[r] Refresh"
    };
    let refresh_style = if state.can_refresh() {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(
        Paragraph::new(
            Line::from(vec![
                Span::styled(refresh_label, refresh_style),
                Span::raw("  "),
                Span::styled("[n] + Add note", Style::default().fg(Color::Cyan)),
            ])
            .right_aligned(),
        ),
        actions,
    );
}

fn draw_panel_header(frame: &mut Frame, area: Rect, state: &ShellState, badge: &ApiBadge) {
    let [left, right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Percentage(50)]).areas(area);

    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                "Your notes",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                note_count_label(state),
                Style::default().fg(Color::DarkGray),
            )),
        ]),
        left,
    );
    frame.render_widget(Paragraph::new(badge.line().right_aligned()), right);
}

const MAX_ERROR_LINES: u16 = 6;

fn error_paragraph(error: &str) -> Paragraph<'_> {
    Paragraph::new(error).wrap(Wrap { trim: true })
}

/// Banner rows for the wrapped message plus borders, capped
fn error_banner_height(error: &str, width: u16) -> u16 {
    let lines = error_paragraph(error).line_count(width.saturating_sub(2));
    u16::try_from(lines)
        .unwrap_or(MAX_ERROR_LINES)
        .clamp(1, MAX_ERROR_LINES)
        + 2
}

fn draw_error(frame: &mut Frame, area: Rect, error: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(Span::styled(
            "Something went wrong",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(error_paragraph(error).block(block), area);
}

fn draw_body(frame: &mut Frame, area: Rect, state: &ShellState) {
    if state.is_loading() {
        draw_empty_state(
            frame,
            area,
            "Loading notes",
            "Fetching your latest notes from the server…",
        );
    } else if state.notes().is_empty() {
        draw_empty_state(
            frame,
            area,
            "No notes yet",
            "Create your first note to get started. Press [n] to add one.",
        );
    } else {
        list::render(frame, area, state.notes(), state.selected());
    }
}

fn draw_empty_state(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let [_, content, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Fill(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                title.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .centered(),
            Line::from(Span::styled(
                subtitle.to_string(),
                Style::default().fg(Color::DarkGray),
            ))
            .centered(),
        ]),
        content,
    );
}
