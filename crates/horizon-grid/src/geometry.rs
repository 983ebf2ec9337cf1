//! Grid geometry: hit testing, cell rectangles and scroll targets.
//!
//! Horizontally the grid is a list of layout slots: the row-number gutter
//! (slot 0), one slot per logical column, and optionally a sticky column on
//! the right edge. Logical column `i` therefore lives in slot `i + 1`.
//! Vertically a sticky header row sits above the body rows.
//!
//! Coordinates come in three spaces:
//!
//! - *viewport* space: where pointer events arrive, with the grid's outer
//!   rectangle at [`Viewport::outer`]
//! - *content* space: the unscrolled grid, with the gutter at x = 0 and the
//!   header at y = 0
//! - body rows are additionally offset by the header height

use std::fmt;
use std::sync::Arc;

use horizon_grid_core::logging::targets;
use horizon_grid_core::{CoreError, Point, Rect, Size};

use crate::cell::{Cell, CellPosition, Position, Selection};
use crate::column::Column;
use crate::options::GridOptions;

/// Body row heights.
#[derive(Clone)]
pub enum RowHeights {
    /// Every row has the same height.
    Fixed(f32),
    /// Height computed per row index.
    Variable(Arc<dyn Fn(usize) -> f32 + Send + Sync>),
}

impl RowHeights {
    fn height(&self, row: usize) -> f32 {
        match self {
            RowHeights::Fixed(height) => *height,
            RowHeights::Variable(height) => height(row).max(0.0),
        }
    }
}

impl fmt::Debug for RowHeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowHeights::Fixed(height) => f.debug_tuple("Fixed").field(height).finish(),
            RowHeights::Variable(_) => write!(f, "Variable(..)"),
        }
    }
}

/// Where the grid is on screen and how far it is scrolled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// The grid's outer rectangle in viewport space.
    pub outer: Rect,
    /// Scroll offset of the content.
    pub scroll: Point,
}

impl Viewport {
    pub fn new(outer: Rect, scroll: Point) -> Self {
        Self { outer, scroll }
    }

    /// Convert a viewport-space point to content space.
    pub fn to_content(&self, point: Point) -> Point {
        Point::new(
            point.x - self.outer.left() + self.scroll.x,
            point.y - self.outer.top() + self.scroll.y,
        )
    }

    /// The nearest point to `point` inside the outer rectangle.
    ///
    /// Points are returned unchanged while the outer rectangle is empty.
    pub fn clamp(&self, point: Point) -> Point {
        if self.outer.is_empty() {
            return point;
        }
        Point::new(
            point.x.clamp(self.outer.left(), self.outer.right().next_down()),
            point.y.clamp(self.outer.top(), self.outer.bottom().next_down()),
        )
    }

    /// Convert a content-space rectangle to viewport space.
    pub fn to_viewport(&self, rect: Rect) -> Rect {
        rect.translate(
            self.outer.left() - self.scroll.x,
            self.outer.top() - self.scroll.y,
        )
    }
}

/// Measured column and row layout.
#[derive(Debug, Clone)]
pub struct GridLayout {
    /// Width of each layout slot.
    column_widths: Vec<f32>,
    /// Cumulative right edge of each layout slot.
    column_rights: Vec<f32>,
    has_sticky_right: bool,
    header_height: f32,
    row_heights: RowHeights,
    /// Top of each row for variable heights.
    row_positions: Vec<f32>,
    row_count: usize,
}

impl GridLayout {
    /// Build a layout from explicit measurements.
    ///
    /// Every width and height must be finite and non-negative.
    pub fn new(
        gutter_width: f32,
        column_widths: &[f32],
        sticky_right_width: Option<f32>,
        header_height: f32,
        row_heights: RowHeights,
    ) -> Result<Self, CoreError> {
        let mut widths = Vec::with_capacity(column_widths.len() + 2);
        widths.push(gutter_width);
        widths.extend_from_slice(column_widths);
        widths.extend(sticky_right_width);

        let fixed_height = match &row_heights {
            RowHeights::Fixed(height) => Some(*height),
            RowHeights::Variable(_) => None,
        };
        for value in widths.iter().copied().chain([header_height]).chain(fixed_height) {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::InvalidGeometry(format!(
                    "measurement {value} is not a finite, non-negative size"
                )));
            }
        }

        let column_rights = widths
            .iter()
            .scan(0.0, |right, width| {
                *right += width;
                Some(*right)
            })
            .collect();

        tracing::trace!(
            target: targets::LAYOUT,
            slots = widths.len(),
            header_height,
            "layout measured"
        );

        Ok(Self {
            column_widths: widths,
            column_rights,
            has_sticky_right: sticky_right_width.is_some(),
            header_height,
            row_heights,
            row_positions: Vec::new(),
            row_count: 0,
        })
    }

    /// Layout derived from column widths and grid options.
    pub fn from_columns<T>(columns: &[Column<T>], options: &GridOptions) -> Result<Self, CoreError> {
        let widths: Vec<f32> = columns.iter().map(Column::width).collect();
        Self::new(
            options.gutter_column_width,
            &widths,
            options.sticky_right_column_width,
            options.header_row_height,
            RowHeights::Fixed(options.row_height),
        )
    }

    /// A layout with no measurements; hit testing resolves nothing.
    pub fn unmeasured() -> Self {
        Self {
            column_widths: Vec::new(),
            column_rights: Vec::new(),
            has_sticky_right: false,
            header_height: 0.0,
            row_heights: RowHeights::Fixed(0.0),
            row_positions: Vec::new(),
            row_count: 0,
        }
    }

    pub fn is_measured(&self) -> bool {
        !self.column_rights.is_empty()
    }

    /// Replace the row heights, keeping the row count.
    pub fn set_row_heights(&mut self, row_heights: RowHeights) {
        self.row_heights = row_heights;
        self.set_row_count(self.row_count);
    }

    /// Update the number of body rows.
    pub fn set_row_count(&mut self, row_count: usize) {
        self.row_count = row_count;
        self.row_positions.clear();
        if let RowHeights::Variable(_) = self.row_heights {
            self.row_positions.reserve(row_count);
            let mut y = 0.0;
            for row in 0..row_count {
                self.row_positions.push(y);
                y += self.row_heights.height(row);
            }
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of logical columns.
    pub fn column_count(&self) -> usize {
        self.column_widths
            .len()
            .saturating_sub(1 + usize::from(self.has_sticky_right))
    }

    pub fn header_height(&self) -> f32 {
        self.header_height
    }

    pub fn gutter_width(&self) -> f32 {
        self.column_widths.first().copied().unwrap_or(0.0)
    }

    pub fn sticky_right_width(&self) -> f32 {
        if self.has_sticky_right {
            self.column_widths.last().copied().unwrap_or(0.0)
        } else {
            0.0
        }
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Top of a body row, relative to the first body row.
    pub fn row_top(&self, row: usize) -> f32 {
        match &self.row_heights {
            RowHeights::Fixed(height) => row as f32 * height,
            RowHeights::Variable(_) => match self.row_positions.get(row) {
                Some(&top) => top,
                None => self.rows_height(),
            },
        }
    }

    pub fn row_height(&self, row: usize) -> f32 {
        self.row_heights.height(row)
    }

    /// Total height of the body rows.
    pub fn rows_height(&self) -> f32 {
        match &self.row_heights {
            RowHeights::Fixed(height) => self.row_count as f32 * height,
            RowHeights::Variable(_) => match self.row_positions.last() {
                Some(&top) => top + self.row_height(self.row_count - 1),
                None => 0.0,
            },
        }
    }

    /// Body row under a y offset measured from the first body row.
    ///
    /// Negative offsets give -1. Offsets past the last row give an index
    /// at or beyond the row count; callers clamp.
    pub fn row_at(&self, y: f32) -> isize {
        if y < 0.0 {
            return -1;
        }
        match &self.row_heights {
            RowHeights::Fixed(height) if *height > 0.0 => (y / height).floor() as isize,
            RowHeights::Fixed(_) => 0,
            RowHeights::Variable(_) => {
                let mut lo = 0;
                let mut hi = self.row_positions.len();

                while lo < hi {
                    let mid = (lo + hi) / 2;
                    let row_top = self.row_positions[mid];
                    if y < row_top {
                        hi = mid;
                    } else if y >= row_top + self.row_height(mid) {
                        lo = mid + 1;
                    } else {
                        return mid as isize;
                    }
                }
                lo as isize
            }
        }
    }

    // =========================================================================
    // Hit testing
    // =========================================================================

    fn slot_to_column(&self, slot: usize) -> isize {
        let count = self.column_count();
        match slot {
            0 => -1,
            slot if slot <= count => slot as isize - 1,
            _ => count as isize - 1,
        }
    }

    /// Resolve a viewport-space point to a cell.
    ///
    /// With `include_sticky`, points over the sticky gutter resolve to
    /// column -1, points over the sticky header resolve to row -1 and points
    /// over the sticky right column resolve to the last logical column,
    /// regardless of scroll. Without it, only content geometry counts.
    ///
    /// Returns `None` before the layout is measured, for points outside the
    /// outer rectangle and when the point lies right of every column.
    pub fn resolve(&self, point: Point, viewport: &Viewport, include_sticky: bool) -> Option<Cell> {
        if !self.is_measured() || !viewport.outer.contains(point) {
            return None;
        }
        let outer = viewport.outer;
        let local = Point::new(point.x - outer.left(), point.y - outer.top());
        let content = viewport.to_content(point);

        let col = if include_sticky && local.x <= self.gutter_width() {
            -1
        } else if include_sticky
            && self.has_sticky_right
            && local.x >= outer.width() - self.sticky_right_width()
        {
            self.column_count() as isize - 1
        } else {
            let slot = self.column_rights.iter().position(|&right| content.x < right)?;
            self.slot_to_column(slot)
        };

        let row = if include_sticky && local.y <= self.header_height {
            -1
        } else {
            self.row_at(content.y - self.header_height)
        };

        Some(Cell::new(col, row))
    }

    // =========================================================================
    // Rectangles
    // =========================================================================

    /// Content-space rectangle of a body cell.
    pub fn cell_rect(&self, position: Position) -> Option<Rect> {
        if position.col >= self.column_count() {
            return None;
        }
        Some(Rect::new(
            self.column_rights[position.col],
            self.header_height + self.row_top(position.row),
            self.column_widths[position.col + 1],
            self.row_height(position.row),
        ))
    }

    /// Content-space bounding rectangle of a selection.
    pub fn selection_rect(&self, selection: &Selection) -> Option<Rect> {
        let min = self.cell_rect(selection.min)?;
        let max = self.cell_rect(selection.max)?;
        Some(min.union(&max))
    }

    /// Content-space square centered on the selection's bottom-right corner.
    pub fn fill_handle_rect(&self, selection: &Selection, size: f32) -> Option<Rect> {
        let corner = self.selection_rect(selection)?.bottom_right();
        Some(Rect::new(
            corner.x - size / 2.0,
            corner.y - size / 2.0,
            size,
            size,
        ))
    }

    /// Size of the whole grid including gutter and header.
    pub fn content_size(&self) -> Size {
        Size::new(
            self.column_rights.last().copied().unwrap_or(0.0),
            self.header_height + self.rows_height(),
        )
    }

    /// Scroll offset that brings `cursor` into view past the sticky bands.
    ///
    /// Axes the cursor opts out of keep their current offset.
    pub fn scroll_to_reveal(&self, cursor: &CellPosition, viewport: &Viewport) -> Point {
        let mut scroll = viewport.scroll;
        let Some(rect) = self.cell_rect(cursor.position) else {
            return scroll;
        };
        let size = viewport.outer.size;

        if !cursor.do_not_scroll_x {
            let visible_left = scroll.x + self.gutter_width();
            let visible_right = scroll.x + size.width - self.sticky_right_width();
            if rect.left() < visible_left {
                scroll.x = rect.left() - self.gutter_width();
            } else if rect.right() > visible_right {
                scroll.x = rect.right() - size.width + self.sticky_right_width();
            }
        }

        if !cursor.do_not_scroll_y {
            let visible_top = scroll.y + self.header_height;
            let visible_bottom = scroll.y + size.height;
            if rect.top() < visible_top {
                scroll.y = rect.top() - self.header_height;
            } else if rect.bottom() > visible_bottom {
                scroll.y = rect.bottom() - size.height;
            }
        }

        let content = self.content_size();
        scroll.x = scroll.x.min(content.width - size.width).max(0.0);
        scroll.y = scroll.y.min(content.height - size.height).max(0.0);
        scroll
    }

    /// Number of rows that fit in the body area, at least one.
    pub fn rows_per_page(&self, viewport: &Viewport, near_row: usize) -> usize {
        let body = (viewport.outer.height() - self.header_height).max(0.0);
        let height = self.row_height(near_row);
        if height <= 0.0 {
            return 1;
        }
        ((body / height).floor() as usize).max(1)
    }
}
