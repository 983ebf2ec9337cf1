//! Pointer input.

use horizon_grid_core::{Point, logging::targets};

use crate::cell::{Cell, CellPosition, Position};
use crate::context_menu::{ContextMenuRequest, build_items};
use crate::events::{PointerButton, PointerEvent};
use crate::grid::DataGrid;
use crate::selection::SelectionMode;

impl<T> DataGrid<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Handle a pointer press. Returns whether the grid consumed it.
    ///
    /// A press outside the grid's outer rectangle is not consumed and clears
    /// the active cell, as losing focus does.
    pub fn pointer_down(&mut self, event: &PointerEvent) -> bool {
        if event.button == PointerButton::Middle || self.column_count() == 0 {
            return false;
        }
        let outer = self.viewport.outer;
        if !outer.is_empty() && !outer.contains(event.position) {
            tracing::trace!(target: targets::SELECTION, "press outside the grid");
            self.focus_lost();
            return false;
        }
        let Some(cell) = self
            .layout
            .resolve(event.position, &self.viewport, true)
            .filter(|cell| cell.col < self.column_count() as isize)
        else {
            return false;
        };

        let before = self.state.snapshot();
        if event.is_context_click() {
            self.context_click(event.position, cell);
            self.commit(before);
            return true;
        }
        if self.hits_fill_handle(event.position) {
            tracing::trace!(target: targets::SELECTION, "fill drag started");
            self.state.begin_fill();
            self.commit(before);
            return true;
        }

        let rows = self.row_count();
        if rows == 0 || cell.row >= rows as isize {
            return false;
        }
        let last_col = self.column_count() - 1;
        let last_row = rows - 1;
        let extend = event.modifiers.shift && self.state.active().is_some();

        match (cell.is_gutter(), cell.is_header()) {
            (true, true) => self.select_all_cells(),
            (true, false) => {
                let row = cell.row as usize;
                let corner = CellPosition::new(last_col, row).with_no_scroll_x();
                if let (true, Some(active)) = (extend, self.state.active()) {
                    let anchor = CellPosition::new(0, active.row()).with_no_scroll_x();
                    self.state.set_active(Some(anchor));
                    self.state.set_selection_cell(Some(corner));
                    self.state.set_mode(SelectionMode::rows(false));
                } else {
                    self.state.set_selection_cell(None);
                    self.state
                        .set_active(Some(CellPosition::new(0, row).with_no_scroll_x()));
                    self.state.set_selection_cell(Some(corner));
                    self.state.set_mode(SelectionMode::rows(true));
                }
            }
            (false, true) => {
                let col = cell.col as usize;
                let corner = CellPosition::new(col, last_row).with_no_scroll_y();
                if let (true, Some(active)) = (extend, self.state.active()) {
                    let anchor = CellPosition::new(active.col(), 0).with_no_scroll_y();
                    self.state.set_active(Some(anchor));
                    self.state.set_selection_cell(Some(corner));
                    self.state.set_mode(SelectionMode::columns(false));
                } else {
                    self.state.set_selection_cell(None);
                    self.state
                        .set_active(Some(CellPosition::new(col, 0).with_no_scroll_y()));
                    self.state.set_selection_cell(Some(corner));
                    self.state.set_mode(SelectionMode::columns(true));
                }
            }
            (false, false) => {
                let position = Position::new(cell.col as usize, cell.row as usize);
                if extend {
                    self.state.set_selection_cell(Some(position.into()));
                    self.state.set_mode(SelectionMode::cells(false));
                } else {
                    let reactivates = self.get_active_cell() == Some(position)
                        && !self.state.has_range()
                        && !self.state.is_editing();
                    self.state.set_selection_cell(None);
                    self.state.set_active(Some(position.into()));
                    self.state.set_mode(SelectionMode::cells(true));
                    if reactivates && !self.is_cell_disabled(position) {
                        self.state.start_editing(None);
                    }
                }
            }
        }

        self.commit(before);
        true
    }

    /// Handle pointer motion: drag extension, fill drag or hover.
    ///
    /// Returns whether anything changed.
    pub fn pointer_move(&mut self, event: &PointerEvent) -> bool {
        let rows = self.row_count();
        let cols = self.column_count();
        if rows == 0 || cols == 0 {
            return false;
        }

        if self.state.fill().is_some() {
            let point = self.viewport.clamp(event.position);
            let (Some(selection), Some(cell)) = (
                self.state.selection(),
                self.layout.resolve(point, &self.viewport, true),
            ) else {
                return false;
            };
            let below = rows - 1 - selection.max.row;
            let extra = (cell.row - selection.max.row as isize).clamp(0, below as isize);
            return self.state.set_fill_rows(extra as usize);
        }

        let mode = self.state.mode();
        if mode.active {
            // Dragging past the edge keeps extending to the outermost cell.
            let point = self.viewport.clamp(event.position);
            let Some(cell) = self.layout.resolve(point, &self.viewport, true) else {
                return false;
            };
            let col = if mode.columns {
                cell.col.clamp(0, cols as isize - 1) as usize
            } else {
                cols - 1
            };
            let row = if mode.rows {
                cell.row.clamp(0, rows as isize - 1) as usize
            } else {
                rows - 1
            };
            let mut target = CellPosition::new(col, row);
            if !mode.columns {
                target = target.with_no_scroll_x();
            }
            if !mode.rows {
                target = target.with_no_scroll_y();
            }

            let before = self.state.snapshot();
            let changed = self.state.set_selection_cell(Some(target));
            self.commit(before);
            return changed;
        }

        let hovered = self
            .layout
            .resolve(event.position, &self.viewport, false)
            .filter(|cell| cell.row >= 0 && (cell.row as usize) < rows)
            .map(|cell| cell.row as usize);
        self.state.set_hovered_row(hovered)
    }

    /// Handle a pointer release: commit a fill drag and end range dragging.
    pub fn pointer_up(&mut self, _event: &PointerEvent) -> bool {
        let mut handled = false;
        if let Some(fill) = self.state.take_fill() {
            handled = true;
            if fill.rows > 0 {
                self.expand_selection(fill.rows);
            }
        }

        let mode = self.state.mode();
        if mode.active {
            handled = true;
            self.state.set_mode(SelectionMode {
                active: false,
                ..mode
            });
        }
        handled
    }

    /// Handle a double click: edit the active cell when it was hit.
    pub fn double_click(&mut self, event: &PointerEvent) -> bool {
        let Some(position) = self
            .layout
            .resolve(event.position, &self.viewport, true)
            .and_then(Cell::to_position)
        else {
            return false;
        };
        if self.get_active_cell() != Some(position)
            || self.state.has_range()
            || self.is_cell_disabled(position)
        {
            return false;
        }
        let before = self.state.snapshot();
        let started = self.state.start_editing(None);
        self.commit(before);
        started
    }

    /// The grid lost focus: drop the active cell, range and editing.
    pub fn focus_lost(&mut self) -> bool {
        let before = self.state.snapshot();
        let changed = self.state.clear();
        self.commit(before);
        changed
    }

    /// Clear the hover highlight, e.g. when the pointer leaves the grid.
    pub fn pointer_leave(&mut self) -> bool {
        self.state.set_hovered_row(None)
    }

    fn hits_fill_handle(&self, point: Point) -> bool {
        if self.options.disable_expand_selection || self.state.is_editing() {
            return false;
        }
        self.state
            .selection()
            .and_then(|selection| {
                self.layout
                    .fill_handle_rect(&selection, self.options.fill_handle_size)
            })
            .is_some_and(|rect| self.viewport.to_viewport(rect).contains(point))
    }

    fn context_click(&mut self, position: Point, cell: Cell) {
        let rows = self.row_count();
        let target = match (cell.is_gutter(), cell.is_header()) {
            (_, true) => None,
            _ if cell.row < 0 || cell.row as usize >= rows => None,
            (true, false) => {
                let col = self.state.active().map_or(0, |active| active.col());
                Some(Position::new(col, cell.row as usize))
            }
            (false, false) => Some(Position::new(cell.col as usize, cell.row as usize)),
        };

        if let Some(target) = target {
            let inside = self
                .state
                .selection()
                .is_some_and(|selection| selection.contains(target));
            if !inside {
                self.state.set_selection_cell(None);
                self.state.set_active(Some(target.into()));
            }
            self.state.set_mode(SelectionMode::NONE);
        }

        if self.options.disable_context_menu || self.options.lock_rows {
            return;
        }
        let items = build_items(
            self.state.selection(),
            self.state.active().map(|active| active.row()),
        );
        if items.is_empty() {
            return;
        }
        tracing::trace!(target: targets::SELECTION, ?cell, "context menu requested");
        self.context_menu_requested.emit(ContextMenuRequest {
            position,
            cell,
            items,
        });
    }
}
