//! The data grid controller.
//!
//! [`DataGrid`] ties the pieces together: it owns the row array, the
//! columns, the measured layout and the [`SelectionState`], translates
//! input into transitions and mutations, and reports everything through
//! signals. Input handling is split by source:
//!
//! - `pointer`: presses, drags, the fill handle and context clicks
//! - `keyboard`: navigation keys, editing and shortcuts
//! - `clipboard`: copy, cut and paste
//! - `rows`: structural mutations, smart delete and fill-down
//!
//! # Notifications
//!
//! Every public entry point snapshots the state before it runs and compares
//! afterwards, so signals fire once per real transition and never for
//! no-ops. Data changes emit [`changed`](DataGrid::changed) before any state
//! notification caused by the same call.

mod clipboard;
mod keyboard;
mod pointer;
mod rows;

use std::sync::Arc;

use horizon_grid_core::{CoreError, Point, Signal, logging::targets};

use crate::cell::{CellPosition, ColumnRef, Position, Selection};
use crate::column::Column;
use crate::context_menu::ContextMenuRequest;
use crate::error::{GridError, Result};
use crate::events::FocusDirection;
use crate::geometry::{GridLayout, Viewport};
use crate::operation::{GridChange, Operation};
use crate::options::GridOptions;
use crate::rows::RowFactory;
use crate::selection::{Interaction, SelectionMode, SelectionState, StateSnapshot};
use crate::validation::ValidationErrors;

/// A headless, spreadsheet-like editable grid over rows of `T`.
///
/// The grid never mutates rows in place. Each mutation builds a new row
/// array, stores it, and emits it through [`changed`](Self::changed)
/// together with the [`Operation`]s describing the difference.
pub struct DataGrid<T> {
    columns: Vec<Column<T>>,
    data: Arc<Vec<T>>,
    options: GridOptions,
    layout: GridLayout,
    viewport: Viewport,
    state: SelectionState,
    validation: ValidationErrors,
    row_factory: Option<RowFactory<T>>,
    /// Ticket of the newest paste gesture.
    paste_generation: u64,

    // Signals
    /// Emitted after every data mutation.
    pub changed: Signal<GridChange<T>>,
    /// Emitted when the active cell moves or is cleared.
    pub active_cell_changed: Signal<Option<Position>>,
    /// Emitted when the selected rectangle changes.
    pub selection_changed: Signal<Option<Selection>>,
    /// Emitted when editing starts (`true`) or stops (`false`).
    ///
    /// Hosts use this to blur foreign inputs and clear page text selection
    /// when editing starts.
    pub editing_changed: Signal<bool>,
    /// Emitted with the new scroll offset when the active or selection cell
    /// needs to be revealed.
    pub scroll_requested: Signal<Point>,
    /// Emitted on a context click with the applicable row actions.
    pub context_menu_requested: Signal<ContextMenuRequest>,
    /// Emitted when Tab leaves the grid at either end.
    pub focus_exit: Signal<FocusDirection>,
    /// Emitted with a user-facing notice when programmatic copy failed.
    pub clipboard_unsupported: Signal<String>,
    /// Emitted with the new overlay when validation results change.
    pub validation_changed: Signal<ValidationErrors>,
}

impl<T> DataGrid<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a grid over `data` with default options.
    ///
    /// The layout is derived from the column widths; use
    /// [`with_layout`](Self::with_layout) for measured geometry.
    pub fn new(columns: Vec<Column<T>>, data: Vec<T>) -> Self {
        let options = GridOptions::default();
        let mut layout = Self::layout_for(&columns, &options);
        layout.set_row_count(data.len());
        let validation = ValidationErrors::compute(&data, &columns);

        tracing::debug!(
            target: targets::SELECTION,
            rows = data.len(),
            columns = columns.len(),
            "data grid created"
        );

        Self {
            columns,
            data: Arc::new(data),
            options,
            layout,
            viewport: Viewport::default(),
            state: SelectionState::new(),
            validation,
            row_factory: None,
            paste_generation: 0,
            changed: Signal::new(),
            active_cell_changed: Signal::new(),
            selection_changed: Signal::new(),
            editing_changed: Signal::new(),
            scroll_requested: Signal::new(),
            context_menu_requested: Signal::new(),
            focus_exit: Signal::new(),
            clipboard_unsupported: Signal::new(),
            validation_changed: Signal::new(),
        }
    }

    /// Apply options, rebuilding the layout from them.
    pub fn with_options(mut self, options: GridOptions) -> Self {
        self.set_options(options);
        self
    }

    /// Use explicit layout measurements.
    ///
    /// A layout that does not fit the columns is dropped with a warning and
    /// the derived layout stays; see [`set_layout`](Self::set_layout).
    pub fn with_layout(mut self, layout: GridLayout) -> Self {
        if let Err(err) = self.set_layout(layout) {
            tracing::warn!(
                target: targets::LAYOUT,
                error = %err,
                "layout rejected, keeping the derived layout"
            );
        }
        self
    }

    /// Factory for rows created by inserts, paste overflow and auto-add.
    ///
    /// Without a factory the grid cannot create rows.
    pub fn with_row_factory(mut self, factory: RowFactory<T>) -> Self {
        self.row_factory = Some(factory);
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    fn layout_for(columns: &[Column<T>], options: &GridOptions) -> GridLayout {
        GridLayout::from_columns(columns, options).unwrap_or_else(|err| {
            tracing::warn!(
                target: targets::LAYOUT,
                error = %err,
                "invalid layout measurements, hit testing disabled"
            );
            GridLayout::unmeasured()
        })
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: GridOptions) {
        self.layout = Self::layout_for(&self.columns, &options);
        self.layout.set_row_count(self.data.len());
        self.options = options;
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Replace the layout measurements.
    ///
    /// # Errors
    ///
    /// Fails with [`GridError::Layout`] when a measured layout has a
    /// different number of columns than the grid. An unmeasured layout is
    /// always accepted and disables hit testing.
    pub fn set_layout(&mut self, mut layout: GridLayout) -> Result<()> {
        if layout.is_measured() && layout.column_count() != self.columns.len() {
            return Err(CoreError::InvalidGeometry(format!(
                "layout has {} columns, the grid has {}",
                layout.column_count(),
                self.columns.len()
            ))
            .into());
        }
        layout.set_row_count(self.data.len());
        self.layout = layout;
        Ok(())
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Record where the grid is on screen and its current scroll offset.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn row_factory(&self) -> Option<&RowFactory<T>> {
        self.row_factory.as_ref()
    }

    pub fn set_row_factory(&mut self, factory: Option<RowFactory<T>>) {
        self.row_factory = factory;
    }

    // =========================================================================
    // Data and columns
    // =========================================================================

    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Shared handle to the current row array.
    pub fn data_arc(&self) -> Arc<Vec<T>> {
        Arc::clone(&self.data)
    }

    /// Replace the rows from outside, e.g. after the host persisted a change.
    ///
    /// Selection is clamped into the new row count and validation is
    /// recomputed. No [`changed`](Self::changed) is emitted.
    pub fn set_data(&mut self, data: Vec<T>) {
        let before = self.state.snapshot();
        self.data = Arc::new(data);
        self.layout.set_row_count(self.data.len());
        self.state.clamp_to(self.data.len(), self.columns.len());
        self.revalidate_all();
        self.commit(before);
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column<T>> {
        self.columns.get(index)
    }

    /// Index of the column with `id`.
    pub fn column_index(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.id() == id)
    }

    /// Replace the columns, rebuilding the layout and the validation overlay.
    pub fn set_columns(&mut self, columns: Vec<Column<T>>) {
        let before = self.state.snapshot();
        self.columns = columns;
        self.layout = Self::layout_for(&self.columns, &self.options);
        self.layout.set_row_count(self.data.len());
        self.state.clamp_to(self.data.len(), self.columns.len());
        self.revalidate_all();
        self.commit(before);
    }

    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether a body cell is read-only. Cells outside the grid count as
    /// disabled.
    pub fn is_cell_disabled(&self, position: Position) -> bool {
        match (self.columns.get(position.col), self.data.get(position.row)) {
            (Some(column), Some(row)) => column.is_disabled(row, position.row),
            _ => true,
        }
    }

    pub fn validation_errors(&self) -> &ValidationErrors {
        &self.validation
    }

    fn revalidate_all(&mut self) {
        let _span = horizon_grid_core::PerfSpan::new("validate");
        let validation = ValidationErrors::compute(&self.data, &self.columns);
        if validation != self.validation {
            self.validation = validation;
            tracing::debug!(
                target: targets::VALIDATION,
                errors = self.validation.error_count(),
                "validation recomputed"
            );
            if self.validation_changed.has_connections() {
                self.validation_changed.emit(self.validation.clone());
            }
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn interaction(&self) -> Interaction {
        self.state.interaction()
    }

    pub fn get_active_cell(&self) -> Option<Position> {
        self.state.active().map(|cell| cell.position)
    }

    pub fn get_selection(&self) -> Option<Selection> {
        self.state.selection()
    }

    pub fn is_editing(&self) -> bool {
        self.state.is_editing()
    }

    /// Move the active cell, collapsing any range.
    ///
    /// A column index or row past the end is clamped to the last one; an
    /// empty grid stays idle.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ColumnNotFound`] for an unknown column id.
    pub fn set_active_cell(&mut self, column: impl Into<ColumnRef>, row: usize) -> Result<()> {
        let col = self.resolve_column(column.into())?;
        if self.row_count() == 0 || self.column_count() == 0 {
            return Ok(());
        }
        let position = Position::new(col, row).clamp_to(self.column_count(), self.row_count());

        let before = self.state.snapshot();
        self.state.set_selection_cell(None);
        self.state.set_active(Some(position.into()));
        self.state.set_mode(SelectionMode::NONE);
        self.commit(before);
        Ok(())
    }

    /// Select the rectangle spanned by `active` and `corner`, or clear the
    /// selection with `None`. Both corners are clamped into the grid.
    pub fn set_selection(&mut self, selection: Option<(Position, Position)>) {
        let before = self.state.snapshot();
        match selection {
            Some((active, corner)) if self.row_count() > 0 && self.column_count() > 0 => {
                let (cols, rows) = (self.column_count(), self.row_count());
                self.state.set_active(Some(active.clamp_to(cols, rows).into()));
                self.state
                    .set_selection_cell(Some(corner.clamp_to(cols, rows).into()));
                self.state.set_mode(SelectionMode::NONE);
            }
            _ => {
                self.state.clear();
            }
        }
        self.commit(before);
    }

    /// Select every cell.
    pub fn select_all(&mut self) {
        if self.row_count() == 0 || self.column_count() == 0 {
            return;
        }
        let before = self.state.snapshot();
        self.select_all_cells();
        self.commit(before);
    }

    fn select_all_cells(&mut self) {
        let last = Position::new(self.column_count() - 1, self.row_count() - 1);
        self.state.set_active(Some(Position::new(0, 0).into()));
        self.state.set_selection_cell(Some(last.into()));
        self.state.set_mode(SelectionMode::NONE);
    }

    fn resolve_column(&self, column: ColumnRef) -> Result<usize> {
        match column {
            ColumnRef::Index(index) => Ok(index),
            ColumnRef::Id(id) => self
                .column_index(&id)
                .ok_or(GridError::ColumnNotFound(id)),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Emit notifications for everything that changed since `before`.
    fn commit(&mut self, before: StateSnapshot) {
        let after = self.state.snapshot();
        if before == after {
            return;
        }

        if before.active != after.active {
            tracing::trace!(
                target: targets::SELECTION,
                active = ?after.active.map(|cell| cell.position),
                "active cell changed"
            );
            self.active_cell_changed
                .emit(after.active.map(|cell| cell.position));
            if let Some(active) = after.active {
                self.reveal(active);
            }
        } else if before.selection_cell != after.selection_cell {
            if let Some(cell) = after.selection_cell {
                self.reveal(cell);
            }
        }

        if before.selection != after.selection {
            self.selection_changed.emit(after.selection);
        }

        if before.editing != after.editing {
            tracing::debug!(
                target: targets::SELECTION,
                editing = after.editing,
                "editing changed"
            );
            self.editing_changed.emit(after.editing);
        }
    }

    /// Scroll so `cell` is visible, unless it opts out on an axis.
    fn reveal(&mut self, cell: CellPosition) {
        if !self.layout.is_measured() || self.viewport.outer.is_empty() {
            return;
        }
        let scroll = self.layout.scroll_to_reveal(&cell, &self.viewport);
        if scroll != self.viewport.scroll {
            self.viewport.scroll = scroll;
            self.scroll_requested.emit(scroll);
        }
    }

    /// Store a mutated row array and report it.
    ///
    /// The selection is clamped silently; callers wrap this in their own
    /// snapshot and [`commit`](Self::commit).
    fn apply_change(&mut self, data: Vec<T>, operations: Vec<Operation>) -> Vec<Operation> {
        if operations.is_empty() {
            return operations;
        }
        self.data = Arc::new(data);
        self.layout.set_row_count(self.data.len());

        let mut validation_changed = false;
        for operation in &operations {
            validation_changed |= self.validation.apply(operation, &self.data, &self.columns);
        }

        tracing::debug!(
            target: targets::ROWS,
            rows = self.data.len(),
            operations = ?operations,
            "data changed"
        );
        self.changed.emit(GridChange {
            data: Arc::clone(&self.data),
            operations: operations.clone(),
        });
        if validation_changed && self.validation_changed.has_connections() {
            self.validation_changed.emit(self.validation.clone());
        }

        self.state.clamp_to(self.data.len(), self.columns.len());
        operations
    }

    /// Whether structural mutations are refused, logging when they are.
    fn rows_locked(&self, action: &'static str) -> bool {
        if self.options.lock_rows {
            tracing::debug!(target: targets::ROWS, action, "rows are locked");
        }
        self.options.lock_rows
    }
}

impl<T> std::fmt::Debug for DataGrid<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataGrid")
            .field("rows", &self.data.len())
            .field("columns", &self.columns.len())
            .field("state", &self.state)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(DataGrid<String>: Send, Sync);
