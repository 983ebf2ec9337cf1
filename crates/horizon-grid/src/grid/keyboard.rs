//! Keyboard navigation and editing.

use horizon_grid_core::logging::targets;

use crate::cell::{CellPosition, Position};
use crate::events::{FocusDirection, Key, KeyEvent, KeyboardModifiers};
use crate::grid::DataGrid;
use crate::operation::Operation;
use crate::selection::SelectionMode;

impl<T> DataGrid<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Handle a key press. Returns whether the grid consumed it.
    ///
    /// Keys are ignored without an active cell. A `false` return for Tab at
    /// either end of the grid means the grid gave up focus and the host
    /// should move it on.
    pub fn key_down(&mut self, event: &KeyEvent) -> bool {
        let Some(active) = self.state.active() else {
            return false;
        };
        if self.row_count() == 0 || self.column_count() == 0 {
            return false;
        }
        let modifiers = event.modifiers;
        let editing = self.state.is_editing();

        match event.key {
            Key::Escape => self.escape(),
            key if key.is_arrow() => self.arrow(key, modifiers, active),
            Key::Tab => self.tab(modifiers.shift, active),
            Key::Enter if editing => {
                self.stop_editing(true);
                true
            }
            Key::Enter | Key::F2 if !editing => self.start_editing(),
            Key::Home | Key::End if !editing => {
                let col = if event.key == Key::Home {
                    0
                } else {
                    self.column_count() - 1
                };
                let row = match (modifiers.command(), event.key) {
                    (true, Key::Home) => 0,
                    (true, _) => self.row_count() - 1,
                    (false, _) => self.state.selection_cell().unwrap_or(active).row(),
                };
                self.move_to(Position::new(col, row), modifiers.shift);
                true
            }
            Key::PageUp | Key::PageDown if !editing => {
                let origin = if modifiers.shift {
                    self.state.selection_cell().unwrap_or(active)
                } else {
                    active
                };
                let page = self.layout.rows_per_page(&self.viewport, origin.row());
                let row = if event.key == Key::PageUp {
                    origin.row().saturating_sub(page)
                } else {
                    (origin.row() + page).min(self.row_count() - 1)
                };
                self.move_to(Position::new(origin.col(), row), modifiers.shift);
                true
            }
            Key::Backspace | Key::Delete if !editing => {
                self.delete_selection(self.options.smart_delete);
                true
            }
            key if modifiers.command() && key.is_char('a') && !editing => {
                self.select_all();
                true
            }
            key if modifiers.command() && key.is_char('d') && !editing => {
                if let Some(selection) = self.state.selection() {
                    self.duplicate_rows(selection.min.row, selection.max.row);
                }
                true
            }
            Key::Character(c) if !editing && !modifiers.command() && !c.is_control() => {
                self.start_editing_with(Some(c.to_string()))
            }
            _ => false,
        }
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Start editing the active cell, collapsing any range.
    ///
    /// Refused for disabled cells.
    pub fn start_editing(&mut self) -> bool {
        self.start_editing_with(None)
    }

    /// Start editing seeded with typed text that replaces the cell content.
    pub fn start_editing_with(&mut self, seed: Option<String>) -> bool {
        let Some(active) = self.get_active_cell() else {
            return false;
        };
        if self.state.is_editing() || self.is_cell_disabled(active) {
            return false;
        }
        let before = self.state.snapshot();
        self.state.set_selection_cell(None);
        self.state.set_mode(SelectionMode::NONE);
        let started = self.state.start_editing(seed);
        self.commit(before);
        started
    }

    /// Text typed to start the current edit, if any.
    pub fn edit_seed(&self) -> Option<&str> {
        self.state.edit_seed()
    }

    /// Stop editing, optionally moving down a row.
    ///
    /// Moving down from the last row appends a row when `auto_add_row` is
    /// on and rows can be created. Returns the operations of that append.
    pub fn stop_editing(&mut self, move_down: bool) -> Vec<Operation> {
        let Some(active) = self.state.active() else {
            return Vec::new();
        };
        if !self.state.is_editing() {
            return Vec::new();
        }
        let before = self.state.snapshot();
        self.state.stop_editing();
        self.state.set_last_edited(Some(active.position));

        if !move_down {
            self.commit(before);
            return Vec::new();
        }
        if active.row() + 1 < self.row_count() {
            self.state
                .set_active(Some(CellPosition::new(active.col(), active.row() + 1)));
            self.commit(before);
            return Vec::new();
        }
        self.commit(before);
        if self.options.auto_add_row && !self.options.lock_rows && self.row_factory.is_some() {
            return self.insert_rows_after(active.row(), 1);
        }
        Vec::new()
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    fn escape(&mut self) -> bool {
        let before = self.state.snapshot();
        if self.state.is_editing() {
            self.state.stop_editing();
        } else if self.state.has_range() {
            self.state.set_selection_cell(None);
        } else {
            self.state.clear();
        }
        self.commit(before);
        true
    }

    fn arrow(&mut self, key: Key, modifiers: KeyboardModifiers, active: CellPosition) -> bool {
        if self.state.is_editing() {
            let key_sensitive = self
                .column(active.col())
                .is_some_and(|column| column.is_key_sensitive());
            if key_sensitive || matches!(key, Key::ArrowLeft | Key::ArrowRight) {
                return false;
            }
            self.stop_editing(false);
        }

        let origin = if modifiers.shift {
            self.state.selection_cell().unwrap_or(active).position
        } else {
            active.position
        };
        let target = self.step(origin, key, modifiers.command());
        self.move_to(target, modifiers.shift);
        true
    }

    /// One arrow step from `origin`, or to the edge with `jump`.
    fn step(&self, origin: Position, key: Key, jump: bool) -> Position {
        let last_col = self.column_count() - 1;
        let last_row = self.row_count() - 1;
        let Position { col, row } = origin;
        match key {
            Key::ArrowUp if jump => Position::new(col, 0),
            Key::ArrowUp => Position::new(col, row.saturating_sub(1)),
            Key::ArrowDown if jump => Position::new(col, last_row),
            Key::ArrowDown => Position::new(col, (row + 1).min(last_row)),
            Key::ArrowLeft if jump => Position::new(0, row),
            Key::ArrowLeft => Position::new(col.saturating_sub(1), row),
            Key::ArrowRight if jump => Position::new(last_col, row),
            Key::ArrowRight => Position::new((col + 1).min(last_col), row),
            _ => origin,
        }
    }

    /// Move the active cell, or with `extend` the selection cell.
    fn move_to(&mut self, target: Position, extend: bool) {
        let before = self.state.snapshot();
        if extend {
            self.state.set_selection_cell(Some(target.into()));
        } else {
            self.state.set_selection_cell(None);
            self.state.set_active(Some(target.into()));
        }
        self.state.set_mode(SelectionMode::NONE);
        self.commit(before);
    }

    fn tab(&mut self, backward: bool, active: CellPosition) -> bool {
        if self.state.is_editing() {
            self.stop_editing(false);
        }
        let cols = self.column_count();
        let rows = self.row_count();
        let Position { col, row } = active.position;

        let next = if backward {
            match (col, row) {
                (0, 0) => None,
                (0, row) => Some(Position::new(cols - 1, row - 1)),
                (col, row) => Some(Position::new(col - 1, row)),
            }
        } else if col + 1 < cols {
            Some(Position::new(col + 1, row))
        } else if row + 1 < rows {
            Some(Position::new(0, row + 1))
        } else {
            None
        };

        match next {
            Some(target) => {
                self.move_to(target, false);
                true
            }
            None => {
                let direction = if backward {
                    FocusDirection::Previous
                } else {
                    FocusDirection::Next
                };
                tracing::trace!(target: targets::SELECTION, ?direction, "focus leaves grid");
                let before = self.state.snapshot();
                self.state.clear();
                self.commit(before);
                self.focus_exit.emit(direction);
                false
            }
        }
    }
}
