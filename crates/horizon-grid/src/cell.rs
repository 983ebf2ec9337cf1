//! Cell coordinates and rectangular selections.
//!
//! Two coordinate flavours exist. [`Cell`] is what hit testing produces and
//! may point at the gutter (`col == -1`) or the header (`row == -1`).
//! [`Position`] always names a body cell and is what the active cell and
//! selections are made of.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// A resolved cell, possibly in the gutter column or header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub col: isize,
    pub row: isize,
}

impl Cell {
    /// The header cell above the gutter.
    pub const CORNER: Self = Self { col: -1, row: -1 };

    #[inline]
    pub const fn new(col: isize, row: isize) -> Self {
        Self { col, row }
    }

    /// The cell lies in the row-number gutter.
    #[inline]
    pub fn is_gutter(&self) -> bool {
        self.col < 0
    }

    /// The cell lies in the header row.
    #[inline]
    pub fn is_header(&self) -> bool {
        self.row < 0
    }

    /// Convert to a body position when both coordinates are non-negative.
    pub fn to_position(self) -> Option<Position> {
        Some(Position::new(
            usize::try_from(self.col).ok()?,
            usize::try_from(self.row).ok()?,
        ))
    }
}

/// A body cell coordinate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub col: usize,
    pub row: usize,
}

impl Position {
    #[inline]
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// Clamp into a grid of the given size. Both counts must be non-zero.
    pub fn clamp_to(self, column_count: usize, row_count: usize) -> Self {
        Self {
            col: self.col.min(column_count.saturating_sub(1)),
            row: self.row.min(row_count.saturating_sub(1)),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

impl From<Position> for Cell {
    fn from(p: Position) -> Self {
        Cell::new(p.col as isize, p.row as isize)
    }
}

/// A body position plus scroll hints.
///
/// The hints tell the host not to scroll along an axis when revealing the
/// cell, e.g. a gutter click should not scroll horizontally. Equality only
/// looks at the position.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellPosition {
    pub position: Position,
    pub do_not_scroll_x: bool,
    pub do_not_scroll_y: bool,
}

impl CellPosition {
    pub const fn new(col: usize, row: usize) -> Self {
        Self {
            position: Position::new(col, row),
            do_not_scroll_x: false,
            do_not_scroll_y: false,
        }
    }

    pub fn with_no_scroll_x(mut self) -> Self {
        self.do_not_scroll_x = true;
        self
    }

    pub fn with_no_scroll_y(mut self) -> Self {
        self.do_not_scroll_y = true;
        self
    }

    #[inline]
    pub fn col(&self) -> usize {
        self.position.col
    }

    #[inline]
    pub fn row(&self) -> usize {
        self.position.row
    }
}

impl PartialEq for CellPosition {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl Eq for CellPosition {}

impl From<Position> for CellPosition {
    fn from(position: Position) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// A rectangular selection with `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub min: Position,
    pub max: Position,
}

impl Selection {
    /// Normalize two corners into a selection.
    pub fn from_corners(a: Position, b: Position) -> Self {
        Self {
            min: Position::new(a.col.min(b.col), a.row.min(b.row)),
            max: Position::new(a.col.max(b.col), a.row.max(b.row)),
        }
    }

    /// A selection covering one cell.
    pub fn single(p: Position) -> Self {
        Self { min: p, max: p }
    }

    pub fn contains(&self, p: Position) -> bool {
        self.columns().contains(&p.col) && self.rows().contains(&p.row)
    }

    /// Like [`contains`](Self::contains) but for a hit-test cell.
    pub fn contains_cell(&self, cell: Cell) -> bool {
        cell.to_position().is_some_and(|p| self.contains(p))
    }

    pub fn rows(&self) -> RangeInclusive<usize> {
        self.min.row..=self.max.row
    }

    pub fn columns(&self) -> RangeInclusive<usize> {
        self.min.col..=self.max.col
    }

    pub fn width(&self) -> usize {
        self.max.col - self.min.col + 1
    }

    pub fn height(&self) -> usize {
        self.max.row - self.min.row + 1
    }

    pub fn is_single_cell(&self) -> bool {
        self.min == self.max
    }

    /// Iterate positions row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.rows()
            .flat_map(move |row| self.columns().map(move |col| Position::new(col, row)))
    }
}

/// Addresses a column either by index or by its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnRef {
    Index(usize),
    Id(String),
}

impl From<usize> for ColumnRef {
    fn from(index: usize) -> Self {
        ColumnRef::Index(index)
    }
}

impl From<&str> for ColumnRef {
    fn from(id: &str) -> Self {
        ColumnRef::Id(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_normalizes_corners() {
        for a_col in 0..3 {
            for a_row in 0..3 {
                for b_col in 0..3 {
                    for b_row in 0..3 {
                        let a = Position::new(a_col, a_row);
                        let b = Position::new(b_col, b_row);
                        let sel = Selection::from_corners(a, b);
                        assert!(sel.min.col <= sel.max.col);
                        assert!(sel.min.row <= sel.max.row);
                        assert!(sel.contains(a) && sel.contains(b));
                        assert_eq!(sel, Selection::from_corners(b, a));
                    }
                }
            }
        }
    }

    #[test]
    fn test_cursor_equality_ignores_hints() {
        let a = CellPosition::new(1, 2);
        let b = CellPosition::new(1, 2).with_no_scroll_x();
        assert_eq!(a, b);
        assert_ne!(a, CellPosition::new(2, 2));
    }

    #[test]
    fn test_cell_regions() {
        assert!(Cell::CORNER.is_gutter() && Cell::CORNER.is_header());
        assert_eq!(Cell::new(-1, 3).to_position(), None);
        assert_eq!(Cell::new(2, 3).to_position(), Some(Position::new(2, 3)));
    }

    #[test]
    fn test_selection_positions_row_major() {
        let sel = Selection::from_corners(Position::new(1, 0), Position::new(2, 1));
        let cells: Vec<_> = sel.positions().collect();
        assert_eq!(
            cells,
            vec![
                Position::new(1, 0),
                Position::new(2, 0),
                Position::new(1, 1),
                Position::new(2, 1),
            ]
        );
        assert_eq!(sel.width(), 2);
        assert_eq!(sel.height(), 2);
        assert!(Selection::single(Position::new(0, 0)).is_single_cell());
    }

    #[test]
    fn test_position_clamp() {
        assert_eq!(Position::new(9, 9).clamp_to(3, 2), Position::new(2, 1));
    }
}
