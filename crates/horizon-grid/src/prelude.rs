//! Everything a host usually needs in one import.
//!
//! ```
//! use horizon_grid::prelude::*;
//!
//! let grid: DataGrid<Vec<String>> = DataGrid::new(Vec::new(), Vec::new());
//! assert_eq!(grid.interaction(), Interaction::Idle);
//! ```

// ============================================================================
// Controller
// ============================================================================

pub use crate::grid::DataGrid;
pub use crate::options::{GridOptions, RaggedPaste};
pub use crate::rows::RowFactory;
pub use crate::{GridError, Result};

// ============================================================================
// Columns and Validation
// ============================================================================

pub use crate::column::{Column, ColumnCodec, Disabled, Value};
pub use crate::validation::{Rule, ValidationErrors, ValidationSchema};

// ============================================================================
// Cells and Selection
// ============================================================================

pub use crate::cell::{Cell, CellPosition, ColumnRef, Position, Selection};
pub use crate::selection::Interaction;

// ============================================================================
// Input
// ============================================================================

pub use crate::events::{
    FocusDirection, Key, KeyEvent, KeyboardModifiers, PointerButton, PointerEvent,
};
pub use crate::geometry::{GridLayout, RowHeights, Viewport};

// ============================================================================
// Clipboard and Changes
// ============================================================================

pub use crate::clipboard::{ClipboardBackend, ClipboardPayload, MemoryClipboard};
pub use crate::context_menu::{ContextMenuItem, ContextMenuRequest};
pub use crate::operation::{GridChange, Operation, OperationKind};

// ============================================================================
// Geometry and Signals
// ============================================================================

pub use horizon_grid_core::{Point, Rect, Signal, Size};
