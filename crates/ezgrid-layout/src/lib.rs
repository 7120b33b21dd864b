#![forbid(unsafe_code)]

//! Relative grid placement.
//!
//! Widgets are laid out on a per-container grid. Instead of computing
//! coordinates by hand, callers ask for relative positions and the container
//! works them out from what it has placed so far:
//!
//! - [`RowSpec`] / [`ColSpec`] - absolute coordinates or sentinels
//!   (`Next`, `Same`, `Extend`, `Overlay`, ...)
//! - [`Place`] - a row/column request pair
//! - [`GridCursor`] - a container's bookkeeping: resolves requests and
//!   tracks the extent used so far
//!
//! ```
//! use ezgrid_core::geometry::{GridArea, GridSpan};
//! use ezgrid_layout::{ColSpec, GridCursor, RowSpec};
//!
//! let mut cursor = GridCursor::new();
//!
//! // A label and an entry side by side, then a tall listbox below them.
//! let label = cursor.resolve(RowSpec::Next, ColSpec::Same);
//! cursor.remember(GridArea::new(label, GridSpan::ONE));
//! let entry = cursor.resolve(RowSpec::Same, ColSpec::Next);
//! cursor.remember(GridArea::new(entry, GridSpan::ONE));
//! let list = cursor.resolve(RowSpec::Next, ColSpec::Same);
//! cursor.remember(GridArea::new(list, GridSpan::rows(5)));
//!
//! assert_eq!((label.row, label.col), (0, 0));
//! assert_eq!((entry.row, entry.col), (0, 1));
//! assert_eq!((list.row, list.col), (1, 0));
//! assert_eq!(cursor.resolve(RowSpec::Next, ColSpec::Same).row, 6);
//! ```

pub mod cursor;
pub mod sentinel;

pub use cursor::GridCursor;
pub use ezgrid_core::geometry::{GridArea, GridPos, GridSpan};
pub use sentinel::{ColSpan, ColSpec, Place, RowSpec, SentinelError};
