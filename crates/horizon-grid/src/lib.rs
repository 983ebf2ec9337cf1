//! Horizon Grid - a headless, spreadsheet-like editable data grid.
//!
//! The grid owns the interaction state of an editable table (active cell,
//! rectangular selection, editing flag, fill-down drag, validation overlay)
//! and turns pointer, keyboard and clipboard input into new row arrays plus
//! a list of [`Operation`]s describing what changed. It never paints and
//! never persists: the host renders from the grid's queries and signals and
//! decides what to do with each [`GridChange`].
//!
//! # Example
//!
//! ```
//! use horizon_grid::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq, Default)]
//! struct Employee {
//!     name: Option<String>,
//! }
//!
//! let columns = vec![Column::text(
//!     "name",
//!     |row: &Employee| row.name.clone(),
//!     |row: &Employee, value| Employee { name: value, ..row.clone() },
//! )
//! .with_schema(ValidationSchema::new().required())];
//!
//! let mut grid = DataGrid::new(columns, vec![Employee::default(); 3])
//!     .with_row_factory(RowFactory::from_default());
//!
//! grid.changed.connect(|change| {
//!     println!("{} rows, operations: {:?}", change.data.len(), change.operations);
//! });
//!
//! grid.set_active_cell(ColumnRef::Index(0), 0).expect("column exists");
//! let operations = grid
//!     .paste(&ClipboardPayload::text("x\ny"))
//!     .expect("paste applies");
//! assert_eq!(operations, vec![Operation::update(0, 2)]);
//! ```

pub mod cell;
pub mod clipboard;
pub mod column;
pub mod context_menu;
mod error;
pub mod events;
pub mod geometry;
pub mod grid;
pub mod operation;
pub mod options;
pub mod prelude;
pub mod rows;
pub mod selection;
pub mod validation;

pub use cell::{Cell, CellPosition, ColumnRef, Position, Selection};
pub use clipboard::{
    ClipboardBackend, ClipboardError, ClipboardPayload, CopyMethod, MemoryClipboard, PasteData,
    PasteError, PasteTicket,
};
#[cfg(feature = "system-clipboard")]
pub use clipboard::SystemClipboard;
pub use column::{Column, ColumnCodec, Disabled, Value};
pub use context_menu::{ContextMenuItem, ContextMenuRequest};
pub use error::{GridError, OptionsError, Result};
pub use events::{FocusDirection, Key, KeyEvent, KeyboardModifiers, PointerButton, PointerEvent};
pub use geometry::{GridLayout, RowHeights, Viewport};
pub use grid::DataGrid;
pub use operation::{GridChange, Operation, OperationKind};
pub use options::{GridOptions, RaggedPaste};
pub use rows::RowFactory;
pub use selection::{Interaction, SelectionMode, SelectionState};
pub use validation::{Rule, ValidationErrors, ValidationSchema};

pub use horizon_grid_core::{Point, Rect, Signal, Size};
