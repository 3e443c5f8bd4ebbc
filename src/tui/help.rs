//! Help popup: key bindings grouped by what they act on.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const POPUP_WIDTH: u16 = 72;
const POPUP_HEIGHT: u16 = 20;

/// (key, description)
type Shortcut = (&'static str, &'static str);

const PAGING: (&str, &[Shortcut]) = (
    "PAGING",
    &[
        ("Right / n", "Next page"),
        ("Left / p", "Previous page"),
        ("Home", "First page"),
        ("End", "Last page"),
        ("Up / Down", "Select row"),
        ("Enter", "Show full message"),
    ],
);

const TABLE: (&str, &[Shortcut]) = (
    "TABLE",
    &[
        ("1-9", "Sort by column (again: reverse)"),
        ("/", "Search: words, \"exact phrase\""),
        ("Esc", "Clear search / close popup"),
        ("Tab", "Incoming / outgoing log"),
    ],
);

const MISC: (&str, &[Shortcut]) = (
    "MISC",
    &[
        ("F12", "Toggle debug log"),
        ("PgUp/PgDn", "Scroll debug log"),
        ("l", "Cycle debug log filter"),
        ("?", "Toggle this help"),
        ("q / Ctrl-C", "Quit"),
    ],
);

/// Draw the help popup centered over the current frame.
pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();
    let popup_area = centered_rect(
        POPUP_WIDTH.min(area.width.saturating_sub(2)),
        POPUP_HEIGHT.min(area.height.saturating_sub(2)),
        area,
    );

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " HELP ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(Span::styled(
            " Press any key to close ",
            Style::default().fg(Color::Gray),
        )));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(inner);

    frame.render_widget(Paragraph::new(section_lines(&[PAGING])), inset(left, 1, 1));
    frame.render_widget(
        Paragraph::new(section_lines(&[TABLE, MISC])),
        inset(right, 1, 1),
    );
}

fn section_lines(sections: &[(&'static str, &'static [Shortcut])]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, (title, shortcuts)) in sections.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            *title,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            "\u{2500}".repeat(30),
            Style::default().fg(Color::DarkGray),
        )));
        for (key, desc) in shortcuts.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<12}", key), Style::default().fg(Color::Yellow)),
                Span::styled(*desc, Style::default().fg(Color::Gray)),
            ]));
        }
    }
    lines
}

/// Return a centered sub-rect of the given size within `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Shrink a rect by `h` columns and `v` rows on each side.
fn inset(area: Rect, h: u16, v: u16) -> Rect {
    Rect::new(
        area.x + h,
        area.y + v,
        area.width.saturating_sub(h * 2),
        area.height.saturating_sub(v * 2),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let r = centered_rect(20, 10, Rect::new(0, 0, 100, 50));
        assert_eq!(r, Rect::new(40, 20, 20, 10));

        // Larger than the area: clamp to it.
        let r = centered_rect(200, 100, Rect::new(5, 5, 10, 10));
        assert_eq!(r, Rect::new(5, 5, 10, 10));
    }

    #[test]
    fn test_sections_have_title_and_rule() {
        let lines = section_lines(&[TABLE, MISC]);
        // title + rule + 4 entries, blank, title + rule + 5 entries
        assert_eq!(lines.len(), 2 + 4 + 1 + 2 + 5);
        assert_eq!(lines[0].spans[0].content, "TABLE");
    }
}
