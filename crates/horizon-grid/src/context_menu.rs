//! Row context menu.
//!
//! The grid does not draw menus. On a context click it emits a
//! [`ContextMenuRequest`] listing the applicable items; the host shows them
//! and calls [`DataGrid::apply_context_menu_item`](crate::DataGrid::apply_context_menu_item)
//! with the one the user picked.

use horizon_grid_core::Point;

use crate::cell::{Cell, Selection};

/// A row action offered by the context menu.
///
/// Row indices are zero-based and ranges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextMenuItem {
    InsertRowBelow(usize),
    DuplicateRow(usize),
    DeleteRow(usize),
    DuplicateRows { from: usize, to: usize },
    DeleteRows { from: usize, to: usize },
}

impl ContextMenuItem {
    /// Default label for the item, with one-based row numbers.
    pub fn label(&self) -> String {
        match self {
            ContextMenuItem::InsertRowBelow(_) => "Insert row below".into(),
            ContextMenuItem::DuplicateRow(_) => "Duplicate row".into(),
            ContextMenuItem::DeleteRow(_) => "Delete row".into(),
            ContextMenuItem::DuplicateRows { from, to } => {
                format!("Duplicate rows {}-{}", from + 1, to + 1)
            }
            ContextMenuItem::DeleteRows { from, to } => {
                format!("Delete rows {}-{}", from + 1, to + 1)
            }
        }
    }
}

/// Payload of the [`context_menu_requested`](crate::DataGrid::context_menu_requested)
/// signal.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenuRequest {
    /// Pointer position, in viewport space.
    pub position: Point,
    /// The cell that was clicked.
    pub cell: Cell,
    pub items: Vec<ContextMenuItem>,
}

/// Items for the current selection.
///
/// A multi-row selection offers whole-range actions; otherwise the actions
/// apply to the active row.
pub fn build_items(selection: Option<Selection>, active_row: Option<usize>) -> Vec<ContextMenuItem> {
    let Some(row) = active_row else {
        return Vec::new();
    };
    let mut items = vec![ContextMenuItem::InsertRowBelow(row)];
    match selection {
        Some(sel) if sel.min.row != sel.max.row => {
            items.push(ContextMenuItem::DuplicateRows {
                from: sel.min.row,
                to: sel.max.row,
            });
            items.push(ContextMenuItem::DeleteRows {
                from: sel.min.row,
                to: sel.max.row,
            });
        }
        _ => {
            items.push(ContextMenuItem::DuplicateRow(row));
            items.push(ContextMenuItem::DeleteRow(row));
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Position;

    #[test]
    fn test_single_row_items() {
        let sel = Selection::single(Position::new(0, 2));
        assert_eq!(
            build_items(Some(sel), Some(2)),
            vec![
                ContextMenuItem::InsertRowBelow(2),
                ContextMenuItem::DuplicateRow(2),
                ContextMenuItem::DeleteRow(2),
            ]
        );
    }

    #[test]
    fn test_range_items() {
        let sel = Selection::from_corners(Position::new(0, 1), Position::new(2, 3));
        let items = build_items(Some(sel), Some(1));
        assert_eq!(items[1], ContextMenuItem::DuplicateRows { from: 1, to: 3 });
        assert_eq!(items[2].label(), "Delete rows 2-4");
    }

    #[test]
    fn test_no_active_row() {
        assert!(build_items(None, None).is_empty());
    }
}
