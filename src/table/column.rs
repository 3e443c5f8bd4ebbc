//! Table columns and ordering rules

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt::Debug;

use crate::models::{IncomingMessage, OutgoingMessage};

/// A column set for one kind of row.
///
/// Implemented by small `Copy` enums; `ALL` gives the render order.
pub trait TableColumn: Copy + Eq + Debug + 'static {
    type Row: Debug;

    const ALL: &'static [Self];

    /// JSON field name the column is bound to. Also used as the header title.
    fn data_key(&self) -> &'static str;

    /// Cell text for a row.
    fn cell<'a>(&self, row: &'a Self::Row) -> Cow<'a, str>;

    /// Compare two rows on this column, ascending.
    fn compare(&self, a: &Self::Row, b: &Self::Row) -> Ordering;

    /// Fixed width in terminal columns. `None` takes the remaining space.
    fn width(&self) -> Option<u16>;

    /// Column at a zero-based header position.
    fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

fn id_cell(id: Option<i64>) -> Cow<'static, str> {
    match id {
        Some(id) => Cow::Owned(id.to_string()),
        None => Cow::Borrowed(""),
    }
}

/// A column of the incoming-messages table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    CreatedAt,
    Mobile,
    Body,
}

impl TableColumn for Column {
    type Row = IncomingMessage;

    const ALL: &'static [Column] = &[Column::Id, Column::CreatedAt, Column::Mobile, Column::Body];

    fn data_key(&self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::CreatedAt => "created_at",
            Column::Mobile => "mobile",
            Column::Body => "body",
        }
    }

    fn cell<'a>(&self, msg: &'a IncomingMessage) -> Cow<'a, str> {
        match self {
            Column::Id => id_cell(msg.id),
            Column::CreatedAt => Cow::Borrowed(&msg.created_at),
            Column::Mobile => Cow::Borrowed(&msg.mobile),
            Column::Body => Cow::Borrowed(&msg.body),
        }
    }

    /// `id` compares numerically (missing ids first); the others as strings.
    fn compare(&self, a: &IncomingMessage, b: &IncomingMessage) -> Ordering {
        match self {
            Column::Id => a.id.cmp(&b.id),
            Column::CreatedAt => a.created_at.cmp(&b.created_at),
            Column::Mobile => a.mobile.cmp(&b.mobile),
            Column::Body => a.body.cmp(&b.body),
        }
    }

    fn width(&self) -> Option<u16> {
        match self {
            Column::Id => Some(6),
            Column::CreatedAt => Some(19),
            Column::Mobile => Some(15),
            Column::Body => None,
        }
    }
}

/// A column of the outgoing log table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutgoingColumn {
    Id,
    CreatedAt,
    Mobile,
    Status,
    Retries,
    Device,
    Body,
}

impl TableColumn for OutgoingColumn {
    type Row = OutgoingMessage;

    const ALL: &'static [OutgoingColumn] = &[
        OutgoingColumn::Id,
        OutgoingColumn::CreatedAt,
        OutgoingColumn::Mobile,
        OutgoingColumn::Status,
        OutgoingColumn::Retries,
        OutgoingColumn::Device,
        OutgoingColumn::Body,
    ];

    fn data_key(&self) -> &'static str {
        match self {
            OutgoingColumn::Id => "id",
            OutgoingColumn::CreatedAt => "created_at",
            OutgoingColumn::Mobile => "mobile",
            OutgoingColumn::Status => "status",
            OutgoingColumn::Retries => "retries",
            OutgoingColumn::Device => "device",
            OutgoingColumn::Body => "body",
        }
    }

    fn cell<'a>(&self, msg: &'a OutgoingMessage) -> Cow<'a, str> {
        match self {
            OutgoingColumn::Id => id_cell(msg.id),
            OutgoingColumn::CreatedAt => Cow::Borrowed(&msg.created_at),
            OutgoingColumn::Mobile => Cow::Borrowed(&msg.mobile),
            OutgoingColumn::Status => match msg.status {
                Some(status) => Cow::Owned(status.to_string()),
                None => Cow::Borrowed(""),
            },
            OutgoingColumn::Retries => Cow::Owned(msg.retries.to_string()),
            OutgoingColumn::Device => Cow::Borrowed(&msg.device),
            OutgoingColumn::Body => Cow::Borrowed(&msg.body),
        }
    }

    fn compare(&self, a: &OutgoingMessage, b: &OutgoingMessage) -> Ordering {
        match self {
            OutgoingColumn::Id => a.id.cmp(&b.id),
            OutgoingColumn::CreatedAt => a.created_at.cmp(&b.created_at),
            OutgoingColumn::Mobile => a.mobile.cmp(&b.mobile),
            OutgoingColumn::Status => a.status.cmp(&b.status),
            OutgoingColumn::Retries => a.retries.cmp(&b.retries),
            OutgoingColumn::Device => a.device.cmp(&b.device),
            OutgoingColumn::Body => a.body.cmp(&b.body),
        }
    }

    fn width(&self) -> Option<u16> {
        match self {
            OutgoingColumn::Id => Some(6),
            OutgoingColumn::CreatedAt => Some(19),
            OutgoingColumn::Mobile => Some(15),
            OutgoingColumn::Status => Some(9),
            OutgoingColumn::Retries => Some(7),
            OutgoingColumn::Device => Some(10),
            OutgoingColumn::Body => None,
        }
    }
}

/// Sort direction for an ordering entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Marker drawn next to the sorted column header.
    pub fn marker(&self) -> &'static str {
        match self {
            SortDirection::Asc => "^",
            SortDirection::Desc => "v",
        }
    }

    pub fn apply(&self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeliveryStatus;

    fn msg(id: i64, mobile: &str) -> IncomingMessage {
        IncomingMessage {
            id: Some(id),
            created_at: format!("t{}", id),
            mobile: mobile.to_string(),
            body: format!("b{}", id),
            device: None,
        }
    }

    #[test]
    fn test_column_order_and_keys() {
        let keys: Vec<&str> = Column::ALL.iter().map(|c| c.data_key()).collect();
        assert_eq!(keys, vec!["id", "created_at", "mobile", "body"]);
        for (i, col) in Column::ALL.iter().enumerate() {
            assert_eq!(Column::from_index(i), Some(*col));
        }
        assert_eq!(Column::from_index(4), None);
        assert_eq!(OutgoingColumn::from_index(6), Some(OutgoingColumn::Body));
    }

    #[test]
    fn test_id_compares_numerically() {
        // "10" < "9" as strings, but not as ids.
        assert_eq!(Column::Id.compare(&msg(10, "a"), &msg(9, "a")), Ordering::Greater);

        let mut missing = msg(1, "a");
        missing.id = None;
        assert_eq!(Column::Id.compare(&missing, &msg(1, "a")), Ordering::Less);
        assert_eq!(Column::Id.cell(&missing), "");
    }

    #[test]
    fn test_outgoing_status_cell() {
        let mut out = OutgoingMessage {
            status: Some(DeliveryStatus::Failed),
            retries: 3,
            ..OutgoingMessage::default()
        };
        assert_eq!(OutgoingColumn::Status.cell(&out), "failed");
        assert_eq!(OutgoingColumn::Retries.cell(&out), "3");
        out.status = None;
        assert_eq!(OutgoingColumn::Status.cell(&out), "");
    }

    #[test]
    fn test_direction_apply() {
        let a = msg(1, "a");
        let b = msg(2, "b");
        let ord = Column::Mobile.compare(&a, &b);
        assert_eq!(SortDirection::Asc.apply(ord), Ordering::Less);
        assert_eq!(SortDirection::Desc.apply(ord), Ordering::Greater);
        assert_eq!(SortDirection::Desc.toggled(), SortDirection::Asc);
    }
}
