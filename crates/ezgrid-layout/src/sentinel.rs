#![forbid(unsafe_code)]

//! Placement requests: absolute coordinates or relative sentinels.
//!
//! A sentinel asks the container to compute the coordinate from its own
//! bookkeeping ("next row", "same column", "right of everything"). The
//! resolution rules live in [`GridCursor::resolve`](crate::GridCursor::resolve).
//!
//! Callers that still speak in the legacy integer codes (negative values are
//! sentinels, non-negative values are coordinates) can convert with
//! `TryFrom<i32>`.

use std::fmt;

/// Legacy integer codes for row sentinels.
pub mod row_code {
    pub const FIRST: i32 = 0;
    pub const SAME: i32 = -1;
    pub const NEXT: i32 = -2;
    pub const BOTTOM: i32 = -3;
    pub const EXTEND: i32 = -4;
    pub const OVERLAY: i32 = -5;
}

/// Legacy integer codes for column sentinels.
///
/// There is no distinct code for [`ColSpec::Left`]; it shares `-1` with
/// `SAME` in the legacy scheme, so `-1` decodes to `Same`.
pub mod col_code {
    pub const SAME: i32 = -1;
    pub const NEXT: i32 = -2;
    pub const RIGHT: i32 = -3;
    pub const EXTEND: i32 = -4;
    pub const OVERLAY: i32 = -5;
}

/// Row placement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RowSpec {
    /// Explicit row.
    At(u16),
    /// Row 0.
    First,
    /// The row of the last placed widget.
    Same,
    /// The row after the tallest widget of the current row.
    #[default]
    Next,
    /// The bottom-most row used so far.
    Bottom,
    /// One row below everything placed so far.
    Extend,
    /// Exactly on top of the last placed widget (forces column overlay too).
    Overlay,
}

/// Column placement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColSpec {
    /// Explicit column.
    At(u16),
    /// Column 0.
    Left,
    /// The column of the last placed widget.
    #[default]
    Same,
    /// Right after the last placed widget's span.
    Next,
    /// The right-most column used so far.
    Right,
    /// One column right of everything placed so far.
    Extend,
    /// Exactly on top of the last placed widget (forces row overlay too).
    Overlay,
}

impl From<u16> for RowSpec {
    fn from(row: u16) -> Self {
        Self::At(row)
    }
}

impl From<u16> for ColSpec {
    fn from(col: u16) -> Self {
        Self::At(col)
    }
}

/// Error decoding a legacy integer sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelError {
    UnknownRowCode(i32),
    UnknownColCode(i32),
    OutOfRange(i32),
}

impl fmt::Display for SentinelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRowCode(code) => write!(f, "unknown row sentinel code {code}"),
            Self::UnknownColCode(code) => write!(f, "unknown column sentinel code {code}"),
            Self::OutOfRange(value) => write!(f, "grid coordinate {value} out of range"),
        }
    }
}

impl std::error::Error for SentinelError {}

fn coordinate(value: i32) -> Result<u16, SentinelError> {
    u16::try_from(value).map_err(|_| SentinelError::OutOfRange(value))
}

impl TryFrom<i32> for RowSpec {
    type Error = SentinelError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            row_code::FIRST => Ok(Self::First),
            row_code::SAME => Ok(Self::Same),
            row_code::NEXT => Ok(Self::Next),
            row_code::BOTTOM => Ok(Self::Bottom),
            row_code::EXTEND => Ok(Self::Extend),
            row_code::OVERLAY => Ok(Self::Overlay),
            c if c < 0 => Err(SentinelError::UnknownRowCode(c)),
            c => coordinate(c).map(Self::At),
        }
    }
}

impl TryFrom<i32> for ColSpec {
    type Error = SentinelError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            col_code::SAME => Ok(Self::Same),
            col_code::NEXT => Ok(Self::Next),
            col_code::RIGHT => Ok(Self::Right),
            col_code::EXTEND => Ok(Self::Extend),
            col_code::OVERLAY => Ok(Self::Overlay),
            c if c < 0 => Err(SentinelError::UnknownColCode(c)),
            c => coordinate(c).map(Self::At),
        }
    }
}

/// Column span request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColSpan {
    /// A fixed number of columns.
    Exact(u16),
    /// From the resolved column through the container's right-most column.
    All,
}

impl Default for ColSpan {
    fn default() -> Self {
        Self::Exact(1)
    }
}

impl From<u16> for ColSpan {
    fn from(cols: u16) -> Self {
        Self::Exact(cols)
    }
}

/// A row/column request pair handed to every `add_*` call.
///
/// The default is "next row, same column": a vertical stack.
///
/// ```
/// use ezgrid_layout::{ColSpec, Place, RowSpec};
///
/// let beside = Place::same_row().col(ColSpec::Next);
/// assert_eq!(beside.row, RowSpec::Same);
/// assert_eq!(Place::at(2, 3).col, ColSpec::At(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Place {
    pub row: RowSpec,
    pub col: ColSpec,
}

impl Place {
    #[inline]
    pub const fn new(row: RowSpec, col: ColSpec) -> Self {
        Self { row, col }
    }

    /// Explicit coordinates.
    #[inline]
    pub const fn at(row: u16, col: u16) -> Self {
        Self::new(RowSpec::At(row), ColSpec::At(col))
    }

    /// Start a new row (the default).
    #[inline]
    pub const fn next_row() -> Self {
        Self::new(RowSpec::Next, ColSpec::Same)
    }

    /// Stay on the current row, in the next column.
    #[inline]
    pub const fn same_row() -> Self {
        Self::new(RowSpec::Same, ColSpec::Next)
    }

    /// Stack on top of the last placed widget.
    #[inline]
    pub const fn overlay() -> Self {
        Self::new(RowSpec::Overlay, ColSpec::Overlay)
    }

    /// Replace the row request.
    #[must_use]
    pub const fn row(mut self, row: RowSpec) -> Self {
        self.row = row;
        self
    }

    /// Replace the column request.
    #[must_use]
    pub const fn col(mut self, col: ColSpec) -> Self {
        self.col = col;
        self
    }
}
