#![forbid(unsafe_code)]

//! Grid geometry primitives.
//!
//! Coordinates are grid cells, not pixels: `row` counts down from the top of
//! a container, `col` counts right from its left edge, both 0-indexed.

use bitflags::bitflags;

/// A concrete grid cell inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct GridPos {
    /// Row index (0 = top).
    pub row: u16,
    /// Column index (0 = left).
    pub col: u16,
}

impl GridPos {
    /// Create a new grid position.
    #[inline]
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }
}

/// Number of rows and columns a placed entity occupies.
///
/// Spans are never zero; constructors clamp to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSpan {
    rows: u16,
    cols: u16,
}

impl GridSpan {
    /// A single cell.
    pub const ONE: Self = Self { rows: 1, cols: 1 };

    /// Create a span, clamping both axes to at least 1.
    #[inline]
    pub const fn new(rows: u16, cols: u16) -> Self {
        Self {
            rows: if rows == 0 { 1 } else { rows },
            cols: if cols == 0 { 1 } else { cols },
        }
    }

    /// Span covering `cols` columns of a single row.
    #[inline]
    pub const fn cols(cols: u16) -> Self {
        Self::new(1, cols)
    }

    /// Span covering `rows` rows of a single column.
    #[inline]
    pub const fn rows(rows: u16) -> Self {
        Self::new(rows, 1)
    }

    /// Row count (always >= 1).
    #[inline]
    pub const fn row_span(&self) -> u16 {
        self.rows
    }

    /// Column count (always >= 1).
    #[inline]
    pub const fn col_span(&self) -> u16 {
        self.cols
    }
}

impl Default for GridSpan {
    fn default() -> Self {
        Self::ONE
    }
}

/// A placed rectangle of grid cells: origin plus span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridArea {
    pub pos: GridPos,
    pub span: GridSpan,
}

impl GridArea {
    /// Create an area from an origin and span.
    #[inline]
    pub const fn new(pos: GridPos, span: GridSpan) -> Self {
        Self { pos, span }
    }

    /// A single-cell area.
    #[inline]
    pub const fn cell(row: u16, col: u16) -> Self {
        Self::new(GridPos::new(row, col), GridSpan::ONE)
    }

    #[inline]
    pub const fn row(&self) -> u16 {
        self.pos.row
    }

    #[inline]
    pub const fn col(&self) -> u16 {
        self.pos.col
    }

    /// Right-most column covered (inclusive).
    #[inline]
    pub const fn right_col(&self) -> u16 {
        self.pos.col.saturating_add(self.span.cols - 1)
    }

    /// Bottom-most row covered (inclusive).
    #[inline]
    pub const fn bottom_row(&self) -> u16 {
        self.pos.row.saturating_add(self.span.rows - 1)
    }

    /// Whether a cell lies inside this area.
    #[inline]
    pub const fn contains(&self, pos: GridPos) -> bool {
        pos.row >= self.pos.row
            && pos.row <= self.bottom_row()
            && pos.col >= self.pos.col
            && pos.col <= self.right_col()
    }
}

bitflags! {
    /// Which cell edges a widget sticks to inside its grid area.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Sticky: u8 {
        const N = 0b0001;
        const S = 0b0010;
        const E = 0b0100;
        const W = 0b1000;
        const EW = Self::E.bits() | Self::W.bits();
        const NS = Self::N.bits() | Self::S.bits();
        const NSEW = Self::NS.bits() | Self::EW.bits();
    }
}

/// Orientation of sliders and scrollbars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orient {
    #[default]
    Horizontal,
    Vertical,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_clamps_zero_to_one() {
        let span = GridSpan::new(0, 0);
        assert_eq!(span.row_span(), 1);
        assert_eq!(span.col_span(), 1);
    }

    #[test]
    fn area_edges_are_inclusive() {
        let area = GridArea::new(GridPos::new(3, 2), GridSpan::new(2, 3));
        assert_eq!(area.bottom_row(), 4);
        assert_eq!(area.right_col(), 4);
        assert!(area.contains(GridPos::new(4, 4)));
        assert!(!area.contains(GridPos::new(5, 4)));
        assert!(!area.contains(GridPos::new(3, 1)));
    }

    #[test]
    fn single_cell_edges_equal_origin() {
        let area = GridArea::cell(7, 9);
        assert_eq!(area.bottom_row(), 7);
        assert_eq!(area.right_col(), 9);
    }

    #[test]
    fn edges_saturate_at_max() {
        let area = GridArea::new(GridPos::new(u16::MAX, u16::MAX), GridSpan::new(4, 4));
        assert_eq!(area.bottom_row(), u16::MAX);
        assert_eq!(area.right_col(), u16::MAX);
    }

    #[test]
    fn sticky_composites() {
        assert_eq!(Sticky::NSEW, Sticky::N | Sticky::S | Sticky::E | Sticky::W);
        assert!(Sticky::EW.contains(Sticky::W));
        assert!(!Sticky::EW.contains(Sticky::N));
    }
}
