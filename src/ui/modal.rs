use crossterm::event::{Event, KeyCode, MouseButton, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear},
};

const CLOSE_LABEL: &str = "[x]";

/// Why a dialog was asked to close
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismiss {
    Escape,
    Backdrop,
    CloseButton,
}

/// Centered overlay dialog geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modal {
    width_percent: u16,
    height_percent: u16,
}

impl Modal {
    pub const EDITOR: Self = Self::new(70, 70);
    pub const CONFIRM: Self = Self::new(50, 30);

    pub const fn new(width_percent: u16, height_percent: u16) -> Self {
        Self {
            width_percent,
            height_percent,
        }
    }

    /// Dialog rectangle inside the full frame area
    pub fn area(self, frame: Rect) -> Rect {
        let [row] = Layout::vertical([Constraint::Percentage(self.height_percent)])
            .flex(Flex::Center)
            .areas(frame);
        let [dialog] = Layout::horizontal([Constraint::Percentage(self.width_percent)])
            .flex(Flex::Center)
            .areas(row);
        dialog
    }

    /// Clears the dialog area, draws its frame and returns the inner area
    pub fn render(self, frame: &mut Frame, title: &str) -> Rect {
        let dialog = self.area(frame.area());

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::Cyan))
            .title(
                Line::from(format!(" {title} "))
                    .style(Style::default().add_modifier(Modifier::BOLD)),
            )
            .title(Line::from(CLOSE_LABEL).right_aligned());

        let inner = block.inner(dialog);
        frame.render_widget(Clear, dialog);
        frame.render_widget(block, dialog);
        inner
    }

    /// Decides whether an input event dismisses the dialog
    pub fn dismissal(self, event: &Event, frame: Rect) -> Option<Dismiss> {
        match event {
            Event::Key(key) if key.code == KeyCode::Esc => Some(Dismiss::Escape),
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let dialog = self.area(frame);
                let position = Position::new(mouse.column, mouse.row);
                if close_button(dialog).contains(position) {
                    Some(Dismiss::CloseButton)
                } else if dialog.contains(position) {
                    None
                } else {
                    Some(Dismiss::Backdrop)
                }
            }
            _ => None,
        }
    }
}

/// Where the close label sits on the dialog's top border
fn close_button(dialog: Rect) -> Rect {
    let width = u16::try_from(CLOSE_LABEL.len()).unwrap_or(3);
    Rect {
        x: dialog.right().saturating_sub(width + 1),
        y: dialog.y,
        width,
        height: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers, MouseEvent};

    const FRAME: Rect = Rect {
        x: 0,
        y: 0,
        width: 100,
        height: 40,
    };

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn dialog_is_centered() {
        let dialog = Modal::new(50, 50).area(FRAME);
        assert_eq!(dialog, Rect::new(25, 10, 50, 20));
    }

    #[test]
    fn escape_dismisses() {
        let event = Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(
            Modal::EDITOR.dismissal(&event, FRAME),
            Some(Dismiss::Escape)
        );
    }

    #[test]
    fn click_on_backdrop_dismisses_but_inside_does_not() {
        let modal = Modal::new(50, 50);
        assert_eq!(modal.dismissal(&click(1, 1), FRAME), Some(Dismiss::Backdrop));
        assert_eq!(modal.dismissal(&click(50, 20), FRAME), None);
    }

    #[test]
    fn click_on_close_label_dismisses() {
        let modal = Modal::new(50, 50);
        let dialog = modal.area(FRAME);
        let target = close_button(dialog);
        assert_eq!(
            modal.dismissal(&click(target.x + 1, target.y), FRAME),
            Some(Dismiss::CloseButton)
        );
    }

    #[test]
    fn other_keys_are_ignored() {
        let event = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert_eq!(Modal::CONFIRM.dismissal(&event, FRAME), None);
    }
}
