use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tui_textarea::{CursorMove, TextArea};

use crate::dto::{Note, NotePayload};

pub const EMPTY_HINT: &str = "Add a title or some content to save.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit,
}

impl EditorMode {
    pub const fn dialog_title(self) -> &'static str {
        match self {
            Self::Create => "Create note",
            Self::Edit => "Edit note",
        }
    }

    pub const fn submit_label(self, busy: bool) -> &'static str {
        match (busy, self) {
            (true, _) => "Saving…",
            (false, Self::Create) => "Create note",
            (false, Self::Edit) => "Save changes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Content,
}

/// Title/content form backing the editor dialog.
///
/// The title field is a single line. A stored title that spans lines is shown
/// flattened but sent back unchanged unless the title field is edited.
pub struct EditorForm {
    mode: EditorMode,
    original_title: String,
    title_edited: bool,
    title: TextArea<'static>,
    content: TextArea<'static>,
    focus: Field,
    touched: bool,
}

impl EditorForm {
    pub fn new(mode: EditorMode, initial: Option<&Note>) -> Self {
        let (title, content) = initial.map_or((String::new(), String::new()), |note| {
            (note.title.clone(), note.content.clone())
        });

        let mut title_area = TextArea::new(vec![title.replace('\n', " ")]);
        title_area.set_placeholder_text("e.g. Grocery list");
        title_area.move_cursor(CursorMove::End);

        let mut content = TextArea::new(content.split('\n').map(str::to_owned).collect());
        content.set_placeholder_text("Write your note...");

        let mut form = Self {
            mode,
            original_title: title,
            title_edited: false,
            title: title_area,
            content,
            focus: Field::Title,
            touched: false,
        };
        form.restyle();
        form
    }

    pub const fn mode(&self) -> EditorMode {
        self.mode
    }

    pub const fn focus(&self) -> Field {
        self.focus
    }

    pub fn title(&self) -> String {
        self.title.lines().concat()
    }

    pub fn content(&self) -> String {
        self.content.lines().join("\n")
    }

    pub fn can_save(&self) -> bool {
        !self.title().trim().is_empty() || !self.content().trim().is_empty()
    }

    pub fn show_hint(&self) -> bool {
        self.touched && !self.can_save()
    }

    /// Validates the form. Returns the payload to send, or `None` and shows
    /// the inline hint.
    pub fn submit(&mut self) -> Option<NotePayload> {
        self.touched = true;
        if !self.can_save() {
            return None;
        }

        let title = if self.title_edited {
            self.title()
        } else {
            self.original_title.clone()
        };
        Some(NotePayload {
            title: title.trim().to_string(),
            content: self.content(),
        })
    }

    /// Moving focus away from a field counts as touching the form
    pub fn switch_focus(&mut self) {
        self.touched = true;
        self.focus = match self.focus {
            Field::Title => Field::Content,
            Field::Content => Field::Title,
        };
        self.restyle();
    }

    /// Returns a payload when the key submitted a valid form
    pub fn handle_key(&mut self, key: KeyEvent, busy: bool) -> Option<NotePayload> {
        match key.code {
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if busy {
                    None
                } else {
                    self.submit()
                }
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.switch_focus();
                None
            }
            KeyCode::Enter if self.focus == Field::Title => {
                self.switch_focus();
                None
            }
            _ if busy => None,
            _ => {
                match self.focus {
                    Field::Title => self.title_edited |= self.title.input(key),
                    Field::Content => {
                        self.content.input(key);
                    }
                }
                None
            }
        }
    }

    fn restyle(&mut self) {
        let focused = Style::default().fg(Color::Cyan);
        let idle = Style::default().fg(Color::DarkGray);

        for (field, area, label) in [
            (Field::Title, &mut self.title, "Title"),
            (Field::Content, &mut self.content, "Content"),
        ] {
            let active = self.focus == field;
            area.set_block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Plain)
                    .border_style(if active { focused } else { idle })
                    .title(label),
            );
            area.set_cursor_line_style(Style::default());
            area.set_cursor_style(if active {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            });
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, busy: bool) {
        let [title_area, content_area, hint_area, actions_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(&self.title, title_area);
        frame.render_widget(&self.content, content_area);

        if self.show_hint() {
            frame.render_widget(
                Paragraph::new(EMPTY_HINT).style(Style::default().fg(Color::Red)),
                hint_area,
            );
        }

        let enabled = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let disabled = Style::default().fg(Color::DarkGray);
        let cancel_style = if busy { disabled } else { Style::default() };
        let submit_style = if busy || !self.can_save() {
            disabled
        } else {
            enabled
        };

        let actions = Line::from(vec![
            Span::styled("[Esc] Cancel", cancel_style),
            Span::raw("   "),
            Span::styled(
                format!("[Ctrl+S] {}", self.mode.submit_label(busy)),
                submit_style,
            ),
        ])
        .right_aligned();
        frame.render_widget(Paragraph::new(actions), actions_area);
    }
}
