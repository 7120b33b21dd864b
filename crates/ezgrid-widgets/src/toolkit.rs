#![forbid(unsafe_code)]

//! The native toolkit seam.
//!
//! Everything that actually draws pixels lives behind [`Toolkit`]. The widget
//! tree only ever talks to it through opaque [`NativeHandle`]s, which keeps
//! layout, ownership, and tab bookkeeping testable without a display.

use std::fmt;
use std::time::Duration;

use ezgrid_core::event::EventKind;
use ezgrid_core::geometry::{GridArea, Orient, Sticky};
use ezgrid_core::handle::NativeHandle;
use image::RgbImage;

use crate::value::Value;

/// Kind of native widget to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeKind {
    /// Top-level application window.
    Root,
    /// Secondary window with its own grid.
    Toplevel,
    Frame,
    LabelFrame,
    Label,
    Button,
    Entry,
    Checkbutton,
    OptionMenu,
    Listbox,
    Scale,
    Text,
    Scrollbar,
    Canvas,
    Notebook,
    /// Clickable tab header inside a notebook.
    TabLabel,
}

impl NativeKind {
    /// Whether widgets of this kind host a grid of children.
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            Self::Root | Self::Toplevel | Self::Frame | Self::LabelFrame
        )
    }
}

/// Creation options passed to [`Toolkit::create_widget`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NativeOptions {
    pub text: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub orient: Option<Orient>,
    pub range: Option<(f64, f64)>,
    pub choices: Vec<String>,
    /// Draw a sunken border (scroll containers).
    pub sunken: bool,
}

impl NativeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn orient(mut self, orient: Orient) -> Self {
        self.orient = Some(orient);
        self
    }

    #[must_use]
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    #[must_use]
    pub fn choices(mut self, choices: Vec<String>) -> Self {
        self.choices = choices;
        self
    }

    #[must_use]
    pub fn sunken(mut self) -> Self {
        self.sunken = true;
        self
    }
}

/// Identifies a deferred task scheduled through the toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskToken(u64);

impl TaskToken {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Failures reported by a toolkit backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolkitError {
    /// The handle does not name a live native widget.
    UnknownHandle(NativeHandle),
    /// The widget kind does not support the operation.
    Unsupported {
        kind: NativeKind,
        operation: &'static str,
    },
    /// Backend-specific failure.
    Backend(String),
}

impl fmt::Display for ToolkitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownHandle(handle) => write!(f, "unknown native widget {handle}"),
            Self::Unsupported { kind, operation } => {
                write!(f, "{kind:?} widgets do not support {operation}")
            }
            Self::Backend(message) => write!(f, "toolkit error: {message}"),
        }
    }
}

impl std::error::Error for ToolkitError {}

/// The native collaborator.
///
/// Implementations own the real widgets. Deferred tasks are not callbacks:
/// the toolkit hands the [`TaskToken`] back to the event loop when the delay
/// expires, and the loop routes it to `Gui::run_deferred`.
pub trait Toolkit {
    fn create_widget(
        &mut self,
        kind: NativeKind,
        parent: Option<NativeHandle>,
        options: &NativeOptions,
    ) -> Result<NativeHandle, ToolkitError>;

    fn place(
        &mut self,
        handle: NativeHandle,
        area: GridArea,
        sticky: Sticky,
    ) -> Result<(), ToolkitError>;

    /// Release a native widget. Unknown handles are ignored.
    fn destroy(&mut self, handle: NativeHandle);

    /// Ask the toolkit to report `kind` events for `handle`.
    fn bind_event(&mut self, handle: NativeHandle, kind: EventKind) -> Result<(), ToolkitError>;

    fn schedule_deferred(&mut self, delay: Duration, token: TaskToken);

    /// Cancel a pending task. Unknown or already fired tokens are ignored.
    fn cancel_deferred(&mut self, token: TaskToken);

    fn raise(&mut self, handle: NativeHandle);

    fn lower(&mut self, handle: NativeHandle);

    fn set_text(&mut self, handle: NativeHandle, text: &str) -> Result<(), ToolkitError>;

    fn show_value(&mut self, handle: NativeHandle, value: &Value) -> Result<(), ToolkitError>;

    fn set_choices(&mut self, handle: NativeHandle, choices: &[String]) -> Result<(), ToolkitError>;

    fn show_image(&mut self, handle: NativeHandle, image: &RgbImage) -> Result<(), ToolkitError>;

    /// Move a scrollbar thumb to the `[first, last]` fraction of its track.
    fn set_scroll(&mut self, bar: NativeHandle, first: f32, last: f32);

    fn focus(&mut self, handle: NativeHandle);

    /// Flush pending geometry and redraws.
    fn update(&mut self);
}
