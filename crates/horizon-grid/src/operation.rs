//! Change descriptions emitted with every row-array mutation.

use std::ops::Range;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// What happened to a contiguous run of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    /// Rows were inserted at `from_row_index`.
    Create,
    /// Existing rows were modified in place.
    Update,
    /// Rows were removed; indices refer to the array before removal.
    Delete,
}

/// A half-open run of rows `[from_row_index, to_row_index)` and what
/// happened to it.
///
/// Operations serialize in the camelCase shape persistence layers expect:
///
/// ```
/// use horizon_grid::Operation;
///
/// let json = serde_json::to_string(&Operation::create(3, 5)).unwrap();
/// assert_eq!(json, r#"{"type":"CREATE","fromRowIndex":3,"toRowIndex":5}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub from_row_index: usize,
    pub to_row_index: usize,
}

impl Operation {
    pub const fn new(kind: OperationKind, from_row_index: usize, to_row_index: usize) -> Self {
        Self {
            kind,
            from_row_index,
            to_row_index,
        }
    }

    pub const fn create(from: usize, to: usize) -> Self {
        Self::new(OperationKind::Create, from, to)
    }

    pub const fn update(from: usize, to: usize) -> Self {
        Self::new(OperationKind::Update, from, to)
    }

    pub const fn delete(from: usize, to: usize) -> Self {
        Self::new(OperationKind::Delete, from, to)
    }

    /// Number of rows covered.
    pub fn len(&self) -> usize {
        self.to_row_index.saturating_sub(self.from_row_index)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The covered rows as a range.
    pub fn rows(&self) -> Range<usize> {
        self.from_row_index..self.to_row_index
    }
}

/// Payload of the [`changed`](crate::DataGrid::changed) signal.
///
/// `data` is the complete new row array; `operations` describe how it
/// differs from the previous one, in order.
#[derive(Debug)]
pub struct GridChange<T> {
    pub data: Arc<Vec<T>>,
    pub operations: Vec<Operation>,
}

impl<T> Clone for GridChange<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            operations: self.operations.clone(),
        }
    }
}
