#![forbid(unsafe_code)]

//! Per-container placement bookkeeping.
//!
//! A [`GridCursor`] is owned by every layout host. It answers two questions:
//!
//! - **Where does the next widget go?** [`GridCursor::resolve`] turns a
//!   [`RowSpec`]/[`ColSpec`] pair into a concrete [`GridPos`].
//! - **What has been used so far?** [`GridCursor::remember`] records a placed
//!   widget's area.
//!
//! # Invariants
//!
//! 1. `right_col` and `bottom_row` never decrease. Removing a widget does not
//!    retract them.
//! 2. `last_used_rowspan` is the tallest span placed in the current row; only
//!    a `Next` row resolution resets it to 1.
//! 3. The `last_used_*` fields describe sequential row-major insertion. They
//!    are meaningless for random-access placement, which is fine: random
//!    access uses explicit coordinates.

use ezgrid_core::geometry::{GridArea, GridPos};

use crate::sentinel::{ColSpan, ColSpec, RowSpec};

/// Placement state of one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCursor {
    right_col: u16,
    bottom_row: u16,
    last_row: Option<u16>,
    last_col: Option<u16>,
    last_rowspan: u16,
    last_colspan: u16,
}

impl GridCursor {
    /// Bookkeeping for an empty container.
    pub const fn new() -> Self {
        Self {
            right_col: 0,
            bottom_row: 0,
            last_row: None,
            last_col: None,
            last_rowspan: 1,
            last_colspan: 1,
        }
    }

    /// Furthest column ever used.
    #[inline]
    pub const fn right_col(&self) -> u16 {
        self.right_col
    }

    /// Furthest row ever used.
    #[inline]
    pub const fn bottom_row(&self) -> u16 {
        self.bottom_row
    }

    /// `(right_col, bottom_row)`.
    #[inline]
    pub const fn extent(&self) -> (u16, u16) {
        (self.right_col, self.bottom_row)
    }

    /// Row of the last placement, `None` before the first one.
    #[inline]
    pub const fn last_used_row(&self) -> Option<u16> {
        self.last_row
    }

    /// Column of the last placement, `None` before the first one or after a
    /// new row began.
    #[inline]
    pub const fn last_used_col(&self) -> Option<u16> {
        self.last_col
    }

    #[inline]
    pub const fn last_used_rowspan(&self) -> u16 {
        self.last_rowspan
    }

    #[inline]
    pub const fn last_used_colspan(&self) -> u16 {
        self.last_colspan
    }

    /// Whether nothing has been placed yet.
    #[inline]
    pub const fn is_unused(&self) -> bool {
        self.last_row.is_none()
    }

    /// Resolve a placement request against this container.
    ///
    /// `Same` on an unused axis fixes that axis to 0 and keeps the fix.
    /// `Next` row starts a new row: it resets the rowspan to 1 and the
    /// column state to unset. `Overlay` on either axis overlays both.
    pub fn resolve(&mut self, row: RowSpec, col: ColSpec) -> GridPos {
        let (row, col) = if row == RowSpec::Overlay || col == ColSpec::Overlay {
            (RowSpec::Overlay, ColSpec::Overlay)
        } else {
            (row, col)
        };

        let row = match row {
            RowSpec::At(row) => row,
            RowSpec::First => 0,
            RowSpec::Same => *self.last_row.get_or_insert(0),
            RowSpec::Next => {
                let row = match self.last_row {
                    Some(last) => last.saturating_add(self.last_rowspan),
                    None => 0,
                };
                self.last_rowspan = 1;
                self.last_col = None;
                self.last_colspan = 1;
                row
            }
            RowSpec::Bottom => self.bottom_row,
            RowSpec::Extend => self.bottom_row.saturating_add(1),
            RowSpec::Overlay => self.last_row.unwrap_or(0),
        };

        let col = match col {
            ColSpec::At(col) => col,
            ColSpec::Left => 0,
            ColSpec::Same => *self.last_col.get_or_insert(0),
            ColSpec::Next => match self.last_col {
                Some(last) => last.saturating_add(self.last_colspan),
                None => 0,
            },
            ColSpec::Right => self.right_col,
            ColSpec::Extend => self.right_col.saturating_add(1),
            ColSpec::Overlay => self.last_col.unwrap_or(0),
        };

        GridPos::new(row, col)
    }

    /// Resolve a column span request at column `col`.
    pub fn col_span(&self, col: u16, span: ColSpan) -> u16 {
        match span {
            ColSpan::Exact(cols) => cols.max(1),
            ColSpan::All => self.right_col.saturating_sub(col).saturating_add(1),
        }
    }

    /// Record a placed widget's area.
    pub fn remember(&mut self, area: GridArea) {
        self.last_row = Some(area.row());
        self.last_col = Some(area.col());
        self.last_colspan = area.span.col_span();
        self.last_rowspan = self.last_rowspan.max(area.span.row_span());
        self.bottom_row = self.bottom_row.max(area.bottom_row());
        self.right_col = self.right_col.max(area.right_col());
    }
}

impl Default for GridCursor {
    fn default() -> Self {
        Self::new()
    }
}
