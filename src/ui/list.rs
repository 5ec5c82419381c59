use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::dto::Note;

/// Rows taken by one card, borders included
pub const CARD_HEIGHT: u16 = 6;

/// Index of the first visible card so that `selected` stays on screen
pub const fn scroll_offset(selected: usize, capacity: usize) -> usize {
    if capacity == 0 || selected < capacity {
        0
    } else {
        selected + 1 - capacity
    }
}

/// Draws the visible slice of cards and returns how many were drawn
pub fn render(frame: &mut Frame, area: Rect, notes: &[Note], selected: usize) -> usize {
    let capacity = usize::from((area.height / CARD_HEIGHT).max(1));
    let offset = scroll_offset(selected, capacity);

    let mut drawn = 0;
    for (slot, (index, note)) in notes
        .iter()
        .enumerate()
        .skip(offset)
        .take(capacity)
        .enumerate()
    {
        let Ok(slot) = u16::try_from(slot) else {
            break;
        };
        let y = area.y + slot * CARD_HEIGHT;
        let height = CARD_HEIGHT.min(area.bottom().saturating_sub(y));
        if height < 3 {
            break;
        }

        let card = Rect {
            x: area.x,
            y,
            width: area.width,
            height,
        };
        render_card(frame, card, note, index == selected);
        drawn += 1;
    }

    drawn
}

fn render_card(frame: &mut Frame, area: Rect, note: &Note, selected: bool) {
    let border_style = if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(Span::styled(
            note.display_title().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from("[e] Edit  [d] Delete").right_aligned());

    let body = note.preview().map_or_else(
        || {
            Paragraph::new(Span::styled(
                "No content",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))
        },
        |preview| Paragraph::new(preview).wrap(Wrap { trim: false }),
    );

    frame.render_widget(body.block(block), area);
}
