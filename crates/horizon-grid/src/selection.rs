//! Active cell, range selection and editing state.
//!
//! [`SelectionState`] is the single source of truth for where the user is
//! in the grid. It stores the active cell and the opposite corner of the
//! range (the *selection cell*); the rectangular [`Selection`] is always
//! derived from the two and never stored.
//!
//! The state moves through four phases, reported by
//! [`SelectionState::interaction`]:
//!
//! - `Idle`: no active cell
//! - `CellActive`: an active cell and no range
//! - `RangeSelecting`: a pointer drag is extending the range
//! - `RangeSelected`: a range is fixed
//!
//! Editing is an orthogonal flag that can only be set in `CellActive`.
//! Every setter compares before writing and reports whether anything
//! changed, so callers can emit notifications only on real transitions.

use crate::cell::{CellPosition, Position, Selection};

/// How a pointer drag extends the range.
///
/// A drag started on the row gutter extends rows only, one started on the
/// header extends columns only, and a body drag extends both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionMode {
    pub columns: bool,
    pub rows: bool,
    /// The pointer is held down.
    pub active: bool,
}

impl SelectionMode {
    /// No drag in progress.
    pub const NONE: Self = Self {
        columns: false,
        rows: false,
        active: false,
    };

    /// Body-cell drag extending both axes.
    pub const fn cells(active: bool) -> Self {
        Self {
            columns: true,
            rows: true,
            active,
        }
    }

    /// Gutter drag extending whole rows.
    pub const fn rows(active: bool) -> Self {
        Self {
            columns: false,
            rows: true,
            active,
        }
    }

    /// Header drag extending whole columns.
    pub const fn columns(active: bool) -> Self {
        Self {
            columns: true,
            rows: false,
            active,
        }
    }
}

/// A fill-handle drag in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillDrag {
    /// Rows below the selection the fill currently covers.
    pub rows: usize,
}

/// Interaction phase of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    Idle,
    CellActive,
    RangeSelecting,
    RangeSelected,
}

/// What notifications depend on, compared before and after a transition.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StateSnapshot {
    pub active: Option<CellPosition>,
    pub selection_cell: Option<CellPosition>,
    pub selection: Option<Selection>,
    pub editing: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    active: Option<CellPosition>,
    selection_cell: Option<CellPosition>,
    mode: SelectionMode,
    editing: bool,
    edit_seed: Option<String>,
    fill: Option<FillDrag>,
    last_edited: Option<Position>,
    hovered_row: Option<usize>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn active(&self) -> Option<CellPosition> {
        self.active
    }

    pub fn selection_cell(&self) -> Option<CellPosition> {
        self.selection_cell
    }

    /// The normalized selection. `None` exactly when there is no active cell.
    pub fn selection(&self) -> Option<Selection> {
        let active = self.active?;
        let corner = self.selection_cell.unwrap_or(active);
        Some(Selection::from_corners(active.position, corner.position))
    }

    /// Whether the selection spans more than the active cell.
    pub fn has_range(&self) -> bool {
        self.selection().is_some_and(|sel| !sel.is_single_cell())
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Text that started the current edit, when editing began by typing.
    pub fn edit_seed(&self) -> Option<&str> {
        self.edit_seed.as_deref()
    }

    pub fn fill(&self) -> Option<FillDrag> {
        self.fill
    }

    /// The cell whose editor committed most recently.
    pub fn last_edited(&self) -> Option<Position> {
        self.last_edited
    }

    /// The body row under the pointer.
    pub fn hovered_row(&self) -> Option<usize> {
        self.hovered_row
    }

    pub fn interaction(&self) -> Interaction {
        if self.active.is_none() {
            Interaction::Idle
        } else if self.mode.active || self.fill.is_some() {
            Interaction::RangeSelecting
        } else if self.has_range() {
            Interaction::RangeSelected
        } else {
            Interaction::CellActive
        }
    }

    pub(crate) fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            active: self.active,
            selection_cell: self.selection_cell,
            selection: self.selection(),
            editing: self.editing,
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Move the active cell. Clearing it returns the state to `Idle`.
    pub fn set_active(&mut self, active: Option<CellPosition>) -> bool {
        if active.is_none() {
            return self.clear();
        }
        let changed = self.active != active;
        // Scroll hints may differ even when the position does not.
        self.active = active;
        if changed {
            self.stop_editing();
            if self.selection_cell == self.active {
                self.selection_cell = None;
            }
        }
        changed
    }

    /// Move the selection cell. A selection cell equal to the active cell
    /// collapses the range.
    pub fn set_selection_cell(&mut self, cell: Option<CellPosition>) -> bool {
        if self.active.is_none() {
            return false;
        }
        let cell = cell.filter(|c| Some(*c) != self.active);
        let changed = self.selection_cell != cell;
        self.selection_cell = cell;
        if self.selection_cell.is_some() {
            self.stop_editing();
        }
        changed
    }

    pub fn set_mode(&mut self, mode: SelectionMode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    /// Enter editing, optionally seeded with typed text.
    ///
    /// Refused without an active cell or while a range is selected.
    pub fn start_editing(&mut self, seed: Option<String>) -> bool {
        if self.active.is_none() || self.has_range() || self.editing {
            return false;
        }
        self.editing = true;
        self.edit_seed = seed;
        true
    }

    pub fn stop_editing(&mut self) -> bool {
        if !self.editing {
            return false;
        }
        self.editing = false;
        self.edit_seed = None;
        true
    }

    pub fn begin_fill(&mut self) -> bool {
        if self.active.is_none() || self.fill.is_some() {
            return false;
        }
        self.stop_editing();
        self.fill = Some(FillDrag::default());
        true
    }

    pub fn set_fill_rows(&mut self, rows: usize) -> bool {
        match &mut self.fill {
            Some(fill) if fill.rows != rows => {
                fill.rows = rows;
                true
            }
            _ => false,
        }
    }

    /// End the fill drag, returning it.
    pub fn take_fill(&mut self) -> Option<FillDrag> {
        self.fill.take()
    }

    pub fn set_last_edited(&mut self, cell: Option<Position>) -> bool {
        let changed = self.last_edited != cell;
        self.last_edited = cell;
        changed
    }

    pub fn set_hovered_row(&mut self, row: Option<usize>) -> bool {
        let changed = self.hovered_row != row;
        self.hovered_row = row;
        changed
    }

    /// Return to `Idle`.
    pub fn clear(&mut self) -> bool {
        let changed = self.active.is_some()
            || self.selection_cell.is_some()
            || self.editing
            || self.fill.is_some()
            || self.mode != SelectionMode::NONE;
        self.active = None;
        self.selection_cell = None;
        self.mode = SelectionMode::NONE;
        self.editing = false;
        self.edit_seed = None;
        self.fill = None;
        changed
    }

    /// Keep every cell inside a grid of the given size.
    ///
    /// Cells past the last row re-anchor to the last row and cells past the
    /// last column to the last column; an empty grid returns to `Idle`.
    pub fn clamp_to(&mut self, row_count: usize, column_count: usize) -> bool {
        if row_count == 0 || column_count == 0 {
            let cleared = self.clear();
            let hover = self.set_hovered_row(None);
            let edited = self.set_last_edited(None);
            return cleared || hover || edited;
        }

        let clamp = |cell: Option<CellPosition>| {
            cell.map(|mut c| {
                c.position = c.position.clamp_to(column_count, row_count);
                c
            })
        };

        let before = self.snapshot();
        self.active = clamp(self.active);
        let selection_cell = clamp(self.selection_cell);
        self.selection_cell = selection_cell.filter(|c| Some(*c) != self.active);
        if self.has_range() {
            self.stop_editing();
        }
        let mut changed = before != self.snapshot();

        if self.hovered_row.is_some_and(|row| row >= row_count) {
            changed |= self.set_hovered_row(None);
        }
        if self
            .last_edited
            .is_some_and(|p| p.row >= row_count || p.col >= column_count)
        {
            changed |= self.set_last_edited(None);
        }
        changed
    }
}
