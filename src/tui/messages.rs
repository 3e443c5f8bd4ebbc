//! Table pane: search line, the table page, and the paging footer.
//!
//! Shared by the incoming and outgoing tabs.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget,
    },
};
use unicode_width::UnicodeWidthChar;

use super::search::{self, SearchState};
use crate::table::{TableColumn, TableDisplay};

/// Render the pane into `area`.
pub fn render<C: TableColumn>(
    area: Rect,
    buf: &mut Buffer,
    title: &str,
    table: &TableDisplay<C>,
    search_state: &SearchState,
    loading: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    block.render(area, buf);
    if inner.height < 3 || inner.width < 20 {
        return;
    }

    let [search_area, table_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    search::render(search_area, buf, search_state, &table.options().search_label);

    let widths = column_widths(table.columns(), table_area.width);
    let header = Row::new(table.columns().iter().map(|c| header_cell(table, *c)))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(0);

    let page_rows = table.page_rows();
    let rows: Vec<Row> = page_rows
        .iter()
        .map(|msg| {
            Row::new(
                table
                    .columns()
                    .iter()
                    .zip(widths.iter())
                    .map(|(col, w)| Cell::from(truncate(&col.cell(msg), *w as usize))),
            )
        })
        .collect();

    let widget = Table::new(rows, widths.iter().map(|w| Constraint::Length(*w)))
        .header(header)
        .column_spacing(1)
        .row_highlight_style(Style::default().fg(Color::Black).bg(Color::Yellow));

    let mut state = TableState::default();
    if !page_rows.is_empty() {
        state.select(Some(table.selected()));
    }
    StatefulWidget::render(widget, table_area, buf, &mut state);

    if page_rows.is_empty() && table_area.height > 1 {
        let text = if loading {
            "Loading..."
        } else if table.is_empty() {
            "No data available in table"
        } else {
            "No matching records found"
        };
        let empty_area = Rect::new(table_area.x, table_area.y + 1, table_area.width, 1);
        Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray)))
            .render(empty_area, buf);
    }

    render_footer(footer_area, buf, table);
}

/// Header cell with a sort marker when the column is ordered.
fn header_cell<C: TableColumn>(table: &TableDisplay<C>, column: C) -> Cell<'static> {
    let title = match table.sort_direction(column) {
        Some(dir) => format!("{} {}", column.data_key(), dir.marker()),
        None => column.data_key().to_string(),
    };
    Cell::from(Span::styled(title, Style::default().fg(Color::Cyan)))
}

/// Fixed-width columns get their width; the rest share what is left after
/// one column of spacing between cells.
fn column_widths<C: TableColumn>(columns: &[C], total: u16) -> Vec<u16> {
    let spacing = columns.len().saturating_sub(1) as u16;
    let fixed: u16 = columns.iter().filter_map(|c| c.width()).sum();
    let flexible = columns.iter().filter(|c| c.width().is_none()).count() as u16;
    let share = total
        .saturating_sub(fixed + spacing)
        .checked_div(flexible)
        .unwrap_or(0);
    columns.iter().map(|c| c.width().unwrap_or(share)).collect()
}

/// Cut `text` to at most `width` terminal columns, marking the cut with `~`.
/// Newlines are shown as spaces.
fn truncate(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    let mut chars = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .peekable();

    while let Some(c) = chars.next() {
        let w = c.width().unwrap_or(0);
        // Keep one column for the marker unless this is the last char.
        let reserve = usize::from(chars.peek().is_some());
        if used + w + reserve > width {
            if width > 0 {
                out.push('~');
            }
            return out;
        }
        out.push(c);
        used += w;
    }
    out
}

fn render_footer<C: TableColumn>(area: Rect, buf: &mut Buffer, table: &TableDisplay<C>) {
    let page = format!("Page {}/{}", table.page() + 1, table.page_count());
    let info = table.info();
    let pad = (area.width as usize).saturating_sub(info.len() + page.len() + 1);

    let line = Line::from(vec![
        Span::styled(info, Style::default().fg(Color::Gray)),
        Span::raw(" ".repeat(pad)),
        Span::styled(page, Style::default().fg(Color::Cyan)),
    ]);
    Paragraph::new(line).render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, OutgoingColumn};
    use crate::tui::incoming::IncomingView;
    use crate::tui::outgoing::OutgoingView;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("this is too long", 8), "this is~");
        assert_eq!(truncate("two\nlines", 20), "two lines");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // Each CJK char is two columns wide.
        assert_eq!(truncate("日本語テキスト", 7), "日本語~");
    }

    #[test]
    fn test_column_widths() {
        assert_eq!(column_widths(Column::ALL, 80), vec![6, 19, 15, 37]);
        assert_eq!(column_widths(Column::ALL, 10)[3], 0);
        // 6+19+15+9+7+10 fixed, 6 spacing.
        assert_eq!(column_widths(OutgoingColumn::ALL, 100)[6], 28);
    }

    #[test]
    fn test_render_headers_and_rows() {
        let mut view = IncomingView::initialize(5);
        view.apply(
            serde_json::from_str(
                r#"{"messages":[{"id":3,"created_at":"t3","mobile":"m3","body":"b3"},{"id":1,"created_at":"t1","mobile":"m1","body":"b1"}]}"#,
            )
            .unwrap(),
        );

        let area = Rect::new(0, 0, 80, 10);
        let mut buf = Buffer::empty(area);
        render(area, &mut buf, "Incoming", view.table(), &SearchState::default(), false);

        let text: Vec<String> = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect()
            })
            .collect();

        assert!(text[2].contains("id v"), "{:?}", text);
        assert!(text[2].contains("created_at"));
        assert!(text[2].contains("mobile"));
        assert!(text[2].contains("body"));
        assert!(text[3].contains("t3"));
        assert!(text[4].contains("t1"));
        assert!(text[8].contains("Showing 1 to 2 of 2 entries"));
        assert!(text[8].contains("Page 1/1"));
    }

    #[test]
    fn test_render_empty_table() {
        let view = IncomingView::initialize(5);
        let area = Rect::new(0, 0, 60, 8);
        let mut buf = Buffer::empty(area);
        render(area, &mut buf, "Incoming", view.table(), &SearchState::default(), false);

        let row: String = (0..area.width).map(|x| buf[(x, 3)].symbol().to_string()).collect();
        assert!(row.contains("No data available in table"), "{}", row);
    }

    #[test]
    fn test_render_outgoing_headers() {
        let mut view = OutgoingView::new(5);
        view.apply(
            serde_json::from_str(r#"{"messages":[{"id":9,"mobile":"m9","body":"b9","status":2,"retries":3}]}"#)
                .unwrap(),
        );

        let area = Rect::new(0, 0, 110, 8);
        let mut buf = Buffer::empty(area);
        render(area, &mut buf, "Outgoing", view.table(), &SearchState::default(), false);

        let row = |y: u16| -> String { (0..area.width).map(|x| buf[(x, y)].symbol().to_string()).collect() };
        assert!(row(0).contains("Outgoing"));
        assert!(row(2).contains("status"));
        assert!(row(2).contains("retries"));
        assert!(row(3).contains("failed"), "{}", row(3));
    }
}
