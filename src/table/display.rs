//! Paginated table state

use super::column::{SortDirection, TableColumn};

/// Display settings fixed when the table is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions<C: TableColumn> {
    /// Rows per page.
    pub page_length: usize,
    /// Whether the page length may be changed after construction.
    pub length_change: bool,
    /// Label drawn in front of the search box. Empty = no label.
    pub search_label: String,
    /// Multi-column ordering, primary key first.
    pub order: Vec<(C, SortDirection)>,
    pub columns: Vec<C>,
}

impl<C: TableColumn> Default for TableOptions<C> {
    /// Ten rows, resizable, labelled search box, first column ascending.
    fn default() -> Self {
        Self {
            page_length: 10,
            length_change: true,
            search_label: "Search:".to_string(),
            order: C::ALL.iter().take(1).map(|c| (*c, SortDirection::Asc)).collect(),
            columns: C::ALL.to_vec(),
        }
    }
}

/// The table display: data set plus paging, ordering and search state.
#[derive(Debug)]
pub struct TableDisplay<C: TableColumn> {
    options: TableOptions<C>,
    rows: Vec<C::Row>,
    search: String,
    /// Current page (0-based).
    page: usize,
    /// Selected row within the current page.
    selected: usize,
}

impl<C: TableColumn> TableDisplay<C> {
    /// Build an empty table with the given options.
    pub fn new(mut options: TableOptions<C>) -> Self {
        options.page_length = options.page_length.max(1);
        Self {
            options,
            rows: Vec::new(),
            search: String::new(),
            page: 0,
            selected: 0,
        }
    }

    pub fn options(&self) -> &TableOptions<C> {
        &self.options
    }

    pub fn columns(&self) -> &[C] {
        &self.options.columns
    }

    /// Remove every row.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.page = 0;
        self.selected = 0;
    }

    /// Append rows to the data set, keeping the given order.
    pub fn add_data<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = C::Row>,
    {
        self.rows.extend(rows);
        self.clamp();
    }

    /// The data set in insertion order (no ordering or filtering applied).
    pub fn data(&self) -> &[C::Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Change rows per page. Refused when length change is disabled.
    pub fn set_page_length(&mut self, length: usize) -> bool {
        if !self.options.length_change || length == 0 {
            return false;
        }
        self.options.page_length = length;
        self.page = 0;
        self.selected = 0;
        true
    }

    pub fn order(&self) -> &[(C, SortDirection)] {
        &self.options.order
    }

    /// Sort by `column`. Toggles direction if it is already the primary key,
    /// otherwise makes it the only key, ascending.
    pub fn sort_by(&mut self, column: C) {
        let order = &mut self.options.order;
        match order.first_mut() {
            Some((primary, dir)) if *primary == column => *dir = dir.toggled(),
            _ => *order = vec![(column, SortDirection::Asc)],
        }
        self.page = 0;
        self.selected = 0;
    }

    /// Sort direction of `column` if it is part of the ordering.
    pub fn sort_direction(&self, column: C) -> Option<SortDirection> {
        self.options
            .order
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, d)| *d)
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Set the search filter. Each word of the query (or each double-quoted
    /// phrase) must appear, case-insensitively, in at least one column.
    pub fn set_search(&mut self, query: &str) {
        self.search = query.to_string();
        self.page = 0;
        self.selected = 0;
    }

    fn matches(&self, row: &C::Row, terms: &[String]) -> bool {
        terms.iter().all(|term| {
            self.options
                .columns
                .iter()
                .any(|c| c.cell(row).to_lowercase().contains(term.as_str()))
        })
    }

    /// Indices into `data()` after filtering and ordering.
    fn display_indices(&self) -> Vec<usize> {
        let terms = search_terms(&self.search);
        let mut indices: Vec<usize> = (0..self.rows.len())
            .filter(|&i| self.matches(&self.rows[i], &terms))
            .collect();

        // Stable sort: ties keep insertion order.
        indices.sort_by(|&a, &b| {
            let (a, b) = (&self.rows[a], &self.rows[b]);
            self.options
                .order
                .iter()
                .map(|(col, dir)| dir.apply(col.compare(a, b)))
                .find(|o| o.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        indices
    }

    /// All rows that pass the filter, in display order.
    pub fn display_rows(&self) -> Vec<&C::Row> {
        self.display_indices()
            .into_iter()
            .map(|i| &self.rows[i])
            .collect()
    }

    /// Number of rows that pass the search filter.
    pub fn filtered_len(&self) -> usize {
        let terms = search_terms(&self.search);
        self.rows.iter().filter(|r| self.matches(r, &terms)).count()
    }

    pub fn page_length(&self) -> usize {
        self.options.page_length
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Number of pages. An empty table still has one (empty) page.
    pub fn page_count(&self) -> usize {
        self.filtered_len().div_ceil(self.options.page_length).max(1)
    }

    pub fn next_page(&mut self) -> bool {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            self.selected = 0;
            true
        } else {
            false
        }
    }

    pub fn previous_page(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            self.selected = 0;
            true
        } else {
            false
        }
    }

    pub fn first_page(&mut self) {
        self.page = 0;
        self.selected = 0;
    }

    pub fn last_page(&mut self) {
        self.page = self.page_count() - 1;
        self.selected = 0;
    }

    /// Rows on the current page, in display order.
    pub fn page_rows(&self) -> Vec<&C::Row> {
        let len = self.options.page_length;
        self.display_indices()
            .into_iter()
            .skip(self.page * len)
            .take(len)
            .map(|i| &self.rows[i])
            .collect()
    }

    /// Index of the selected row within the current page.
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&C::Row> {
        self.page_rows().get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.page_rows().len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Summary line, e.g. "Showing 1 to 5 of 12 entries".
    pub fn info(&self) -> String {
        let filtered = self.filtered_len();
        let total = self.rows.len();
        let (start, end) = if filtered == 0 {
            (0, 0)
        } else {
            let start = self.page * self.options.page_length + 1;
            let end = (start + self.options.page_length - 1).min(filtered);
            (start, end)
        };

        let mut info = format!("Showing {} to {} of {} entries", start, end, filtered);
        if filtered != total {
            info.push_str(&format!(" (filtered from {} total entries)", total));
        }
        info
    }

    /// Keep page and selection inside the current data.
    fn clamp(&mut self) {
        let last = self.page_count() - 1;
        if self.page > last {
            self.page = last;
        }
        let rows = self.page_rows().len();
        if self.selected >= rows {
            self.selected = rows.saturating_sub(1);
        }
    }
}

/// Lowercased search terms: whitespace-separated words, with `"..."`
/// kept together as one phrase.
fn search_terms(query: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in query.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                if !current.is_empty() {
                    terms.push(std::mem::take(&mut current));
                }
            }
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    terms.push(std::mem::take(&mut current));
                }
            }
            c => current.extend(c.to_lowercase()),
        }
    }
    if !current.is_empty() {
        terms.push(current);
    }
    terms
}
