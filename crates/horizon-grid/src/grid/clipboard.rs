//! Copy, cut and paste.

use horizon_grid_core::{PerfSpan, logging::targets};

use crate::cell::{CellPosition, Position, Selection};
use crate::clipboard::codec::{encode_html, encode_tsv};
use crate::clipboard::{
    ClipboardBackend, ClipboardError, ClipboardPayload, CopyMethod, PasteData, PasteError,
    PasteTicket, unsupported_notice, write_with_fallback,
};
use crate::error::Result;
use crate::grid::DataGrid;
use crate::operation::Operation;

impl<T> DataGrid<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    // =========================================================================
    // Copy
    // =========================================================================

    /// Clipboard texts of the selected cells, row by row.
    ///
    /// `None` without a selection or while editing, when copy belongs to the
    /// cell editor.
    pub fn selection_values(&self) -> Option<Vec<Vec<Option<String>>>> {
        if self.state.is_editing() {
            return None;
        }
        let selection = self.state.selection()?;
        let values = selection
            .rows()
            .map(|row| {
                selection
                    .columns()
                    .map(|col| self.columns[col].copy_value(&self.data[row], row))
                    .collect()
            })
            .collect();
        Some(values)
    }

    /// The selection encoded as tab-separated text and an HTML table.
    ///
    /// `Ok(None)` when there is nothing to copy.
    pub fn copy(&self) -> Result<Option<ClipboardPayload>> {
        let _span = PerfSpan::new("copy");
        let Some(values) = self.selection_values() else {
            return Ok(None);
        };
        let text = encode_tsv(&values).map_err(ClipboardError::from)?;
        Ok(Some(ClipboardPayload::rich(text, encode_html(&values))))
    }

    /// Copy the selection to `backend`.
    ///
    /// Returns `Ok(None)` when there is nothing to copy.
    ///
    /// # Errors
    ///
    /// Fails with [`ClipboardError::Unsupported`] when the backend accepts
    /// neither rich nor plain text; [`clipboard_unsupported`](Self::clipboard_unsupported)
    /// is emitted first with a notice for the user.
    pub fn copy_to(&self, backend: &mut dyn ClipboardBackend) -> Result<Option<CopyMethod>> {
        let Some(payload) = self.copy()? else {
            return Ok(None);
        };
        let text = payload.text.unwrap_or_default();
        let html = payload.html.unwrap_or_default();
        match write_with_fallback(backend, &text, &html) {
            Ok(method) => {
                tracing::debug!(target: targets::CLIPBOARD, ?method, "selection copied");
                Ok(Some(method))
            }
            Err(err) => {
                if matches!(err, ClipboardError::Unsupported { .. }) {
                    self.clipboard_unsupported.emit(unsupported_notice());
                }
                Err(err.into())
            }
        }
    }

    /// Copy the selection, then clear its cells.
    ///
    /// Cutting never deletes rows, whatever the smart-delete setting.
    pub fn cut(&mut self) -> Result<Option<(ClipboardPayload, Vec<Operation>)>> {
        let Some(payload) = self.copy()? else {
            return Ok(None);
        };
        let operations = self.delete_selection(false);
        Ok(Some((payload, operations)))
    }

    /// Cut the selection to `backend`. Cells are only cleared once the copy
    /// succeeded.
    pub fn cut_to(&mut self, backend: &mut dyn ClipboardBackend) -> Result<Vec<Operation>> {
        match self.copy_to(backend)? {
            Some(_) => Ok(self.delete_selection(false)),
            None => Ok(Vec::new()),
        }
    }

    // =========================================================================
    // Paste
    // =========================================================================

    /// Paste `payload` at the selection.
    ///
    /// A single pasted row is repeated over every selected row. Several rows
    /// are written row for row from the selection's top-left corner,
    /// appending rows as needed unless rows are locked, in which case the
    /// excess is dropped. Disabled cells, columns without a codec and
    /// columns past the last one are skipped. The pasted area is selected
    /// afterwards.
    ///
    /// Any pending [`begin_paste`](Self::begin_paste) ticket is superseded.
    ///
    /// # Errors
    ///
    /// Fails without an active cell, while editing, for an empty payload and
    /// for ragged payloads under [`RaggedPaste::Reject`](crate::RaggedPaste::Reject).
    pub fn paste(&mut self, payload: &ClipboardPayload) -> Result<Vec<Operation>> {
        self.paste_generation += 1;
        self.apply_paste(payload)
    }

    /// Read `backend` and paste its contents.
    pub fn paste_from(&mut self, backend: &mut dyn ClipboardBackend) -> Result<Vec<Operation>> {
        let ticket = self.begin_paste();
        let payload = backend.read()?;
        self.finish_paste(ticket, &payload)
    }

    /// Start a paste whose payload arrives later, e.g. from an asynchronous
    /// clipboard read.
    pub fn begin_paste(&mut self) -> PasteTicket {
        self.paste_generation += 1;
        PasteTicket(self.paste_generation)
    }

    /// Finish a paste started with [`begin_paste`](Self::begin_paste).
    ///
    /// Only the newest gesture applies; an older ticket fails with
    /// [`PasteError::Superseded`] and changes nothing.
    pub fn finish_paste(
        &mut self,
        ticket: PasteTicket,
        payload: &ClipboardPayload,
    ) -> Result<Vec<Operation>> {
        if ticket.0 != self.paste_generation {
            tracing::debug!(
                target: targets::CLIPBOARD,
                ticket = ticket.0,
                newest = self.paste_generation,
                "dropping superseded paste"
            );
            return Err(PasteError::Superseded { ticket: ticket.0 }.into());
        }
        self.apply_paste(payload)
    }

    fn apply_paste(&mut self, payload: &ClipboardPayload) -> Result<Vec<Operation>> {
        let _span = PerfSpan::new("paste");
        if self.state.is_editing() {
            return Err(PasteError::Editing.into());
        }
        let selection = self.state.selection().ok_or(PasteError::NoActiveCell)?;
        let rows = payload.rows().ok_or(PasteError::Empty)?;
        let mut paste = PasteData::new(rows, self.options.ragged_paste)?;

        let columns = self.column_count();
        let width = paste.width().min(columns - selection.min.col);
        for offset in 0..width {
            let column = &self.columns[selection.min.col + offset];
            paste.map_column(offset, |values| column.pre_paste(values));
        }

        let before = self.state.snapshot();
        let (operations, extent) = if paste.is_single_row() {
            self.paste_single_row(&paste, selection, width)
        } else {
            self.paste_rows(&paste, selection, width)
        };

        tracing::debug!(
            target: targets::CLIPBOARD,
            rows = paste.height(),
            width,
            operations = operations.len(),
            "paste applied"
        );

        self.state.set_active(Some(extent.min.into()));
        self.state.set_selection_cell(Some(CellPosition::from(extent.max)));
        self.commit(before);
        Ok(operations)
    }

    /// Write one payload row into every selected row.
    fn paste_single_row(
        &mut self,
        paste: &PasteData,
        selection: Selection,
        width: usize,
    ) -> (Vec<Operation>, Selection) {
        let mut data = self.data.to_vec();
        for row in selection.rows() {
            self.write_row(&mut data, row, paste, 0, selection.min.col, width);
        }
        let operations = self.apply_change(
            data,
            vec![Operation::update(selection.min.row, selection.max.row + 1)],
        );
        let corner = Position::new(selection.min.col + width - 1, selection.max.row);
        (operations, Selection::from_corners(selection.min, corner))
    }

    /// Write payload rows row for row from the selection's top-left corner.
    fn paste_rows(
        &mut self,
        paste: &PasteData,
        selection: Selection,
        width: usize,
    ) -> (Vec<Operation>, Selection) {
        let origin = selection.min;
        let existing = self.row_count();
        let mut height = paste.height();
        let mut data = self.data.to_vec();

        if origin.row + height > existing {
            match (&self.row_factory, self.options.lock_rows) {
                (Some(factory), false) => {
                    data.extend((existing..origin.row + height).map(|_| factory.create()));
                }
                _ => {
                    tracing::debug!(
                        target: targets::CLIPBOARD,
                        dropped = origin.row + height - existing,
                        "cannot create rows, dropping pasted rows"
                    );
                    height = existing - origin.row;
                }
            }
        }

        for offset in 0..height {
            self.write_row(&mut data, origin.row + offset, paste, offset, origin.col, width);
        }

        let end = origin.row + height;
        let mut operations = vec![Operation::update(origin.row, end.min(existing))];
        if end > existing {
            operations.push(Operation::create(existing, end));
        }
        let operations = self.apply_change(data, operations);
        let corner = Position::new(origin.col + width - 1, end - 1);
        (operations, Selection::from_corners(origin, corner))
    }

    /// Write payload row `source` into `data[row]` from column `first_col`.
    fn write_row(
        &self,
        data: &mut [T],
        row: usize,
        paste: &PasteData,
        source: usize,
        first_col: usize,
        width: usize,
    ) {
        for offset in 0..width {
            let Some(text) = paste.cell(source, offset) else {
                continue;
            };
            let column = &self.columns[first_col + offset];
            if column.is_disabled(&data[row], row) {
                continue;
            }
            if let Some(updated) = column.paste_value(&data[row], text, row) {
                data[row] = updated;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::error::GridError;
    use crate::grid::tests::{Row, columns, grid, record, row};
    use crate::options::RaggedPaste;

    #[test]
    fn test_copy_selection() {
        let mut grid = grid(3);
        grid.set_selection(Some((Position::new(0, 0), Position::new(1, 1))));
        let payload = grid.copy().unwrap().unwrap();
        assert_eq!(payload.text.as_deref(), Some("a0\tb0\na1\tb1"));
        assert!(payload.html.unwrap().starts_with("<table><tr><td>a0</td>"));
    }

    #[test]
    fn test_nothing_to_copy() {
        let grid = grid(2);
        let mut clipboard = MemoryClipboard::new();
        assert!(grid.copy_to(&mut clipboard).unwrap().is_none());
    }

    #[test]
    fn test_copy_unsupported_notifies() {
        let mut grid = grid(2);
        let notices = record(&grid.clipboard_unsupported);
        grid.set_active_cell(0, 0).unwrap();
        let mut clipboard = MemoryClipboard::new()
            .with_rich_supported(false)
            .with_text_supported(false);

        let err = grid.copy_to(&mut clipboard).unwrap_err();
        assert!(matches!(
            err,
            GridError::Clipboard(ClipboardError::Unsupported { .. })
        ));
        assert_eq!(notices.lock().len(), 1);
    }

    #[test]
    fn test_cut_clears_cells_but_keeps_rows() {
        let mut grid = grid(2);
        grid.set_active_cell(0, 1).unwrap();
        let mut clipboard = MemoryClipboard::new();
        let operations = grid.cut_to(&mut clipboard).unwrap();
        assert_eq!(operations, vec![Operation::update(1, 2)]);
        assert_eq!(clipboard.payload().text.as_deref(), Some("a1"));
        assert_eq!(grid.data()[1].a, None);

        // The cell is empty now, but cut still does not delete the row.
        grid.cut().unwrap();
        assert_eq!(grid.row_count(), 2);
    }

    #[test]
    fn test_single_row_broadcasts_over_selection() {
        let mut grid = grid(4);
        grid.set_selection(Some((Position::new(1, 0), Position::new(1, 2))));
        let operations = grid.paste(&ClipboardPayload::text("x\ty")).unwrap();
        assert_eq!(operations, vec![Operation::update(0, 3)]);
        for r in 0..3 {
            assert_eq!(grid.data()[r].b.as_deref(), Some("x"));
            assert_eq!(grid.data()[r].c.as_deref(), Some("y"));
        }
        assert_eq!(grid.data()[3].b.as_deref(), Some("b3"));
        assert_eq!(
            grid.get_selection(),
            Some(Selection::from_corners(Position::new(1, 0), Position::new(2, 2)))
        );
    }

    #[test]
    fn test_multi_row_appends_rows() {
        let mut grid = grid(2);
        let changes = record(&grid.changed);
        grid.set_active_cell(2, 1).unwrap();
        let operations = grid
            .paste(&ClipboardPayload::text("1\tdropped\n2\n3"))
            .unwrap();
        assert_eq!(
            operations,
            vec![Operation::update(1, 2), Operation::create(2, 4)]
        );
        assert_eq!(grid.row_count(), 4);
        let c: Vec<_> = grid.data().iter().map(|r| r.c.clone()).collect();
        assert_eq!(
            c,
            vec![Some("c0".into()), Some("1".into()), Some("2".into()), Some("3".into())]
        );
        assert_eq!(changes.lock().len(), 1);
        assert_eq!(grid.get_selection().unwrap().max, Position::new(2, 3));
    }

    #[test]
    fn test_multi_row_with_locked_rows_drops_excess() {
        let mut grid = grid(2);
        grid.set_options(grid.options().clone().with_lock_rows(true));
        grid.set_active_cell(0, 1).unwrap();
        let operations = grid.paste(&ClipboardPayload::text("x\ny\nz")).unwrap();
        assert_eq!(operations, vec![Operation::update(1, 2)]);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.data()[1].a.as_deref(), Some("x"));
    }

    #[test]
    fn test_paste_skips_disabled_cells() {
        let mut cols = columns();
        cols[1] = cols[1].clone().with_disabled_when(|_, index| index == 0);
        let mut grid = DataGrid::new(cols, vec![Row::default(); 2]);
        grid.set_active_cell(0, 0).unwrap();
        grid.paste(&ClipboardPayload::text("a\tb\nc\td")).unwrap();
        assert_eq!(grid.data()[0], row("a", "", ""));
        assert_eq!(grid.data()[1], row("c", "d", ""));
    }

    #[test]
    fn test_pre_paste_sees_whole_column() {
        let mut cols = columns();
        cols[0] = cols[0].clone().with_pre_paste_values(|values| {
            values.into_iter().map(|v| v.to_uppercase()).collect()
        });
        let mut grid = DataGrid::new(cols, vec![Row::default(); 2]);
        grid.set_active_cell(0, 0).unwrap();
        grid.paste(&ClipboardPayload::text("a\tb\nc\td")).unwrap();
        assert_eq!(grid.data()[0], row("A", "b", ""));
        assert_eq!(grid.data()[1], row("C", "d", ""));
    }

    #[test]
    fn test_paste_html_preferred() {
        let mut grid = grid(1);
        grid.set_active_cell(0, 0).unwrap();
        let payload =
            ClipboardPayload::rich("ignored", "<table><tr><td>one</td><td>two</td></tr></table>");
        grid.paste(&payload).unwrap();
        assert_eq!(grid.data()[0], row("one", "two", "c0"));
    }

    #[test]
    fn test_paste_errors() {
        let mut grid = grid(2);
        assert!(matches!(
            grid.paste(&ClipboardPayload::text("x")),
            Err(GridError::Paste(PasteError::NoActiveCell))
        ));

        grid.set_active_cell(0, 0).unwrap();
        grid.start_editing();
        assert!(matches!(
            grid.paste(&ClipboardPayload::text("x")),
            Err(GridError::Paste(PasteError::Editing))
        ));
        grid.stop_editing(false);

        assert!(matches!(
            grid.paste(&ClipboardPayload::default()),
            Err(GridError::Paste(PasteError::Empty))
        ));

        grid.set_options(grid.options().clone().with_ragged_paste(RaggedPaste::Reject));
        assert!(matches!(
            grid.paste(&ClipboardPayload::text("a\tb\nc")),
            Err(GridError::Paste(PasteError::IrregularShape { .. }))
        ));
    }

    #[test]
    fn test_latest_paste_wins() {
        let mut grid = grid(1);
        grid.set_active_cell(0, 0).unwrap();
        let first = grid.begin_paste();
        let second = grid.begin_paste();

        let err = grid
            .finish_paste(first, &ClipboardPayload::text("old"))
            .unwrap_err();
        assert!(matches!(
            err,
            GridError::Paste(PasteError::Superseded { ticket }) if ticket == first.id()
        ));
        grid.finish_paste(second, &ClipboardPayload::text("new")).unwrap();
        assert_eq!(grid.data()[0].a.as_deref(), Some("new"));
    }

    #[test]
    fn test_paste_from_backend() {
        let mut grid = grid(1);
        grid.set_active_cell(1, 0).unwrap();
        let mut clipboard = MemoryClipboard::with_payload(ClipboardPayload::text("z"));
        grid.paste_from(&mut clipboard).unwrap();
        assert_eq!(grid.data()[0].b.as_deref(), Some("z"));

        let mut empty = MemoryClipboard::new();
        assert!(matches!(
            grid.paste_from(&mut empty),
            Err(GridError::Clipboard(ClipboardError::Empty))
        ));
    }
}
