#![forbid(unsafe_code)]

//! ezgrid public facade crate.
//!
//! Re-exports the types most programs need from the internal crates and
//! offers a prelude for day-to-day use.
//!
//! ```
//! use ezgrid::prelude::*;
//!
//! let mut gui = Gui::new(HeadlessToolkit::new(), GuiConfig::default())?;
//! let root = gui.root();
//! gui.add_label(root, "Host", Place::next_row())?;
//! let host = gui.add_entry_field(root, None, "localhost", Place::same_row())?;
//! assert_eq!(gui.node(host)?.area().map(|a| (a.row(), a.col())), Some((0, 1)));
//! # Ok::<(), ezgrid::Error>(())
//! ```

// --- Core re-exports -------------------------------------------------------

pub use ezgrid_core::{Event, EventKind, GridArea, GridPos, GridSpan, NativeHandle, Orient, Sticky};

// --- Layout re-exports -----------------------------------------------------

pub use ezgrid_layout::{ColSpan, ColSpec, GridCursor, Place, RowSpec, SentinelError};

// --- Widget re-exports -----------------------------------------------------

pub use ezgrid_widgets::{
    Gui, GuiConfig, HeadlessToolkit, ImageOptions, ImageSource, SliderOptions, TabRef, Teardown,
    Toolkit, Value, WidgetError, WidgetId, WidgetKind,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use ezgrid_runtime::{Simulator, init_logging};

/// Top-level error type for ezgrid programs.
pub type Error = WidgetError;

/// Standard result type for ezgrid APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ColSpan, ColSpec, Error, Event, EventKind, Gui, GuiConfig, HeadlessToolkit, Place,
        Result, RowSpec, Sticky, TabRef, Toolkit, Value, WidgetId,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{Simulator, runtime};

    pub use crate::{core, layout, widgets};
}

pub use ezgrid_core as core;
pub use ezgrid_layout as layout;
#[cfg(feature = "runtime")]
pub use ezgrid_runtime as runtime;
pub use ezgrid_widgets as widgets;
