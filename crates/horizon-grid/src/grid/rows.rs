//! Row mutations driven by the grid.
//!
//! Every method returns the operations it emitted; an empty list means the
//! call was a no-op (rows locked, range out of bounds, nothing changed).

use horizon_grid_core::logging::targets;

use crate::cell::{CellPosition, Position};
use crate::context_menu::ContextMenuItem;
use crate::grid::DataGrid;
use crate::operation::Operation;
use crate::rows;

impl<T> DataGrid<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Insert `count` new rows after `row` and move the active cell to the
    /// last of them.
    pub fn insert_rows_after(&mut self, row: usize, count: usize) -> Vec<Operation> {
        if count == 0 || self.rows_locked("insert") {
            return Vec::new();
        }
        let at = (row + 1).min(self.row_count());
        self.insert_at(at, count)
    }

    /// Append `count` new rows at the end.
    pub fn add_rows(&mut self, count: usize) -> Vec<Operation> {
        if count == 0 || self.rows_locked("add") {
            return Vec::new();
        }
        self.insert_at(self.row_count(), count)
    }

    fn insert_at(&mut self, at: usize, count: usize) -> Vec<Operation> {
        let Some(factory) = self.row_factory.clone() else {
            tracing::warn!(target: targets::ROWS, "no row factory, cannot create rows");
            return Vec::new();
        };
        let before = self.state.snapshot();
        let (data, operation) = rows::insert_rows(&self.data, at, count, &factory);
        let operations = self.apply_change(data, vec![operation]);

        let col = self.state.active().map_or(0, |active| active.col());
        let last = operation.to_row_index - 1;
        self.state.set_selection_cell(None);
        self.state
            .set_active(Some(CellPosition::new(col, last).with_no_scroll_x()));
        self.commit(before);
        operations
    }

    /// Duplicate rows `min..=max` right after `max` and select the copies.
    pub fn duplicate_rows(&mut self, min: usize, max: usize) -> Vec<Operation> {
        if self.rows_locked("duplicate") {
            return Vec::new();
        }
        let duplicated = match &self.row_factory {
            Some(factory) => rows::duplicate_rows(&self.data, min, max, |row| factory.duplicate(row)),
            None => rows::duplicate_rows(&self.data, min, max, T::clone),
        };
        let Some((data, operation)) = duplicated else {
            return Vec::new();
        };

        let before = self.state.snapshot();
        let operations = self.apply_change(data, vec![operation]);
        let last_col = self.column_count().saturating_sub(1);
        self.state.set_active(Some(
            CellPosition::new(0, operation.from_row_index).with_no_scroll_x(),
        ));
        self.state.set_selection_cell(Some(
            CellPosition::new(last_col, operation.to_row_index - 1).with_no_scroll_x(),
        ));
        self.commit(before);
        operations
    }

    /// Delete rows `min..=max`.
    ///
    /// The active cell keeps its row if it still exists, otherwise it moves
    /// to the new last row; an emptied grid goes idle.
    pub fn delete_rows(&mut self, min: usize, max: usize) -> Vec<Operation> {
        if self.rows_locked("delete") {
            return Vec::new();
        }
        let Some((data, operation)) = rows::delete_rows(&self.data, min, max) else {
            return Vec::new();
        };
        let before = self.state.snapshot();
        self.state.stop_editing();
        self.state.set_selection_cell(None);
        let operations = self.apply_change(data, vec![operation]);
        self.commit(before);
        operations
    }

    /// Delete rows covered by the current selection.
    pub fn delete_selected_rows(&mut self) -> Vec<Operation> {
        match self.state.selection() {
            Some(selection) => self.delete_rows(selection.min.row, selection.max.row),
            None => Vec::new(),
        }
    }

    /// Clear the selected cells.
    ///
    /// With `smart` set, a selection whose cells are all empty deletes its
    /// rows instead, unless rows are locked. Disabled cells are left alone.
    /// Nothing is emitted when no value changes.
    pub fn delete_selection(&mut self, smart: bool) -> Vec<Operation> {
        if self.state.is_editing() {
            return Vec::new();
        }
        let Some(selection) = self.state.selection() else {
            return Vec::new();
        };

        let all_empty = selection.positions().all(|Position { col, row }| {
            self.columns[col].is_cell_empty(&self.data[row], row)
        });
        if smart && all_empty && !self.options.lock_rows {
            tracing::debug!(
                target: targets::ROWS,
                from = selection.min.row,
                to = selection.max.row,
                "selection already empty, deleting rows"
            );
            return self.delete_rows(selection.min.row, selection.max.row);
        }

        let mut data = self.data.to_vec();
        for Position { col, row } in selection.positions() {
            let column = &self.columns[col];
            if !column.is_disabled(&data[row], row) {
                data[row] = column.delete_value(&data[row], row);
            }
        }
        if data == *self.data {
            return Vec::new();
        }

        let before = self.state.snapshot();
        let operations = self.apply_change(
            data,
            vec![Operation::update(selection.min.row, selection.max.row + 1)],
        );
        self.commit(before);
        operations
    }

    /// Fill `rows` rows below the selection by repeating its rows
    /// (fill-down), then extend the selection over them.
    ///
    /// Values travel through each column's codec, so columns without one
    /// and disabled cells are skipped. The fill stops at the last row.
    pub fn expand_selection(&mut self, rows: usize) -> Vec<Operation> {
        if rows == 0 || self.options.disable_expand_selection || self.state.is_editing() {
            return Vec::new();
        }
        let Some(selection) = self.state.selection() else {
            return Vec::new();
        };
        let end = (selection.max.row + rows).min(self.row_count().saturating_sub(1));
        if end <= selection.max.row {
            return Vec::new();
        }

        let height = selection.height();
        let mut data = self.data.to_vec();
        for row in selection.max.row + 1..=end {
            let source = selection.min.row + (row - selection.max.row - 1) % height;
            for col in selection.columns() {
                let column = &self.columns[col];
                let Some(codec) = column.codec() else {
                    continue;
                };
                if column.is_disabled(&data[row], row) {
                    continue;
                }
                let text = codec.serialize(&data[source], source);
                data[row] = codec.deserialize(&data[row], text.as_deref().unwrap_or(""), row);
            }
        }

        let before = self.state.snapshot();
        let operations = self.apply_change(data, vec![Operation::update(selection.max.row + 1, end + 1)]);
        self.state.set_active(Some(selection.min.into()));
        self.state
            .set_selection_cell(Some(CellPosition::new(selection.max.col, end)));
        self.commit(before);
        operations
    }

    /// Replace one row, e.g. when a cell editor commits its value.
    pub fn update_row(&mut self, row: usize, value: T) -> Vec<Operation> {
        if self.data.get(row).is_none_or(|current| *current == value) {
            return Vec::new();
        }
        let mut data = self.data.to_vec();
        data[row] = value;
        let before = self.state.snapshot();
        let operations = self.apply_change(data, vec![Operation::update(row, row + 1)]);
        self.commit(before);
        operations
    }

    /// Run the action the user picked from a context menu.
    pub fn apply_context_menu_item(&mut self, item: ContextMenuItem) -> Vec<Operation> {
        match item {
            ContextMenuItem::InsertRowBelow(row) => self.insert_rows_after(row, 1),
            ContextMenuItem::DuplicateRow(row) => self.duplicate_rows(row, row),
            ContextMenuItem::DeleteRow(row) => self.delete_rows(row, row),
            ContextMenuItem::DuplicateRows { from, to } => self.duplicate_rows(from, to),
            ContextMenuItem::DeleteRows { from, to } => self.delete_rows(from, to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Selection;
    use crate::grid::tests::{Row, columns, grid, record, row};
    use crate::rows::RowFactory;
    use crate::selection::Interaction;

    #[test]
    fn test_insert_rows_after() {
        let mut grid = grid(3);
        grid.set_active_cell(1, 0).unwrap();
        let operations = grid.insert_rows_after(0, 2);
        assert_eq!(operations, vec![Operation::create(1, 3)]);
        assert_eq!(grid.row_count(), 5);
        assert_eq!(grid.data()[1], Row::default());
        assert_eq!(grid.data()[3].a.as_deref(), Some("a1"));

        let active = grid.state().active().unwrap();
        assert_eq!(active.position, Position::new(1, 2));
        assert!(active.do_not_scroll_x);
    }

    #[test]
    fn test_insert_without_factory_is_noop() {
        let mut grid = DataGrid::new(columns(), vec![Row::default()]);
        assert!(grid.insert_rows_after(0, 1).is_empty());
        assert_eq!(grid.row_count(), 1);
    }

    #[test]
    fn test_add_rows_on_empty_grid() {
        let mut grid = grid(0);
        assert_eq!(grid.add_rows(2), vec![Operation::create(0, 2)]);
        assert_eq!(grid.get_active_cell(), Some(Position::new(0, 1)));
    }

    #[test]
    fn test_duplicate_selects_copies() {
        let mut grid = grid(4);
        let operations = grid.duplicate_rows(1, 2);
        assert_eq!(operations, vec![Operation::create(3, 5)]);
        assert_eq!(grid.data()[3], grid.data()[1]);
        assert_eq!(grid.data()[4], grid.data()[2]);
        assert_eq!(
            grid.get_selection(),
            Some(Selection::from_corners(Position::new(0, 3), Position::new(2, 4)))
        );
    }

    #[test]
    fn test_duplicate_uses_factory() {
        let mut grid = grid(1).with_row_factory(
            RowFactory::from_default().with_duplicate(|r: &Row| Row { a: None, ..r.clone() }),
        );
        grid.duplicate_rows(0, 0);
        assert_eq!(grid.data()[1].a, None);
        assert_eq!(grid.data()[1].b.as_deref(), Some("b0"));
    }

    #[test]
    fn test_delete_rows_reanchors() {
        let mut grid = grid(4);
        grid.set_active_cell(2, 3).unwrap();
        assert_eq!(grid.delete_rows(2, 3), vec![Operation::delete(2, 4)]);
        assert_eq!(grid.get_active_cell(), Some(Position::new(2, 1)));

        grid.delete_rows(0, 1);
        assert_eq!(grid.row_count(), 0);
        assert_eq!(grid.interaction(), Interaction::Idle);
    }

    #[test]
    fn test_locked_rows_are_noops() {
        let mut grid = grid(2);
        grid.set_options(grid.options().clone().with_lock_rows(true));
        let changes = record(&grid.changed);
        assert!(grid.insert_rows_after(0, 1).is_empty());
        assert!(grid.add_rows(1).is_empty());
        assert!(grid.duplicate_rows(0, 1).is_empty());
        assert!(grid.delete_rows(0, 0).is_empty());
        assert!(changes.lock().is_empty());
        assert_eq!(grid.row_count(), 2);
    }

    #[test]
    fn test_delete_selection_clears_then_removes() {
        let mut grid = grid(3);
        grid.set_selection(Some((Position::new(0, 1), Position::new(2, 1))));

        assert_eq!(grid.delete_selection(true), vec![Operation::update(1, 2)]);
        assert_eq!(grid.data()[1], Row::default());
        assert_eq!(grid.row_count(), 3);

        assert_eq!(grid.delete_selection(true), vec![Operation::delete(1, 2)]);
        assert_eq!(grid.row_count(), 2);
    }

    #[test]
    fn test_delete_selection_without_smart_keeps_rows() {
        let mut grid = grid(2);
        grid.set_active_cell(0, 0).unwrap();
        grid.delete_selection(false);
        assert_eq!(grid.data()[0].a, None);
        assert!(grid.delete_selection(false).is_empty());
        assert_eq!(grid.row_count(), 2);
    }

    #[test]
    fn test_delete_selection_skips_disabled() {
        let mut cols = columns();
        cols[0] = cols[0].clone().with_disabled(true);
        let mut grid = DataGrid::new(cols, vec![row("a", "b", "c")]);
        grid.set_selection(Some((Position::new(0, 0), Position::new(2, 0))));
        grid.delete_selection(true);
        assert_eq!(grid.data()[0], row("a", "", ""));
    }

    #[test]
    fn test_expand_selection_repeats_pattern() {
        let mut grid = grid(6);
        grid.set_selection(Some((Position::new(0, 0), Position::new(1, 1))));
        let operations = grid.expand_selection(10);
        assert_eq!(operations, vec![Operation::update(2, 6)]);
        let a: Vec<_> = grid.data().iter().map(|r| r.a.clone().unwrap()).collect();
        assert_eq!(a, vec!["a0", "a1", "a0", "a1", "a0", "a1"]);
        assert_eq!(grid.data()[4].c.as_deref(), Some("c4"));
        assert_eq!(grid.get_selection().unwrap().max, Position::new(1, 5));
    }

    #[test]
    fn test_update_row() {
        let mut grid = grid(2);
        assert!(grid.update_row(0, grid.data()[0].clone()).is_empty());
        assert!(grid.update_row(5, Row::default()).is_empty());
        assert_eq!(grid.update_row(1, Row::default()), vec![Operation::update(1, 2)]);
    }

    #[test]
    fn test_context_menu_actions() {
        let mut grid = grid(3);
        assert_eq!(
            grid.apply_context_menu_item(ContextMenuItem::InsertRowBelow(2)),
            vec![Operation::create(3, 4)]
        );
        assert_eq!(
            grid.apply_context_menu_item(ContextMenuItem::DeleteRows { from: 0, to: 1 }),
            vec![Operation::delete(0, 2)]
        );
        assert_eq!(grid.row_count(), 2);
    }
}
