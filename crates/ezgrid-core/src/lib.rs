#![forbid(unsafe_code)]

//! Core: grid geometry, native widget handles, and events.
//!
//! Everything in this crate is plain data shared by the layout engine
//! (`ezgrid-layout`), the widget tree (`ezgrid-widgets`), and whatever native
//! toolkit sits underneath.

pub mod event;
pub mod geometry;
pub mod handle;

pub use event::{Event, EventKind};
pub use geometry::{GridArea, GridPos, GridSpan, Orient, Sticky};
pub use handle::NativeHandle;
