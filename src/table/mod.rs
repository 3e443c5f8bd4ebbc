//! Table display model: a paginated, sortable, searchable grid of gateway
//! records.
//!
//! Rows are stored in insertion order. Ordering, search filtering and paging
//! are applied on read, so `clear` + `add_data` never reorder the data set.

mod column;
mod display;

pub use column::{Column, OutgoingColumn, SortDirection, TableColumn};
pub use display::{TableDisplay, TableOptions};
