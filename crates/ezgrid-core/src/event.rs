#![forbid(unsafe_code)]

//! Events delivered from the native toolkit (or synthesized by the widget
//! layer) to bound handlers.

use crate::handle::NativeHandle;

/// The kinds of events a handler can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// Primary button press on the widget.
    Click,
    /// Double click; listboxes and entry fields use it as "activate".
    DoubleClick,
    /// Button command invocation.
    Command,
    /// The widget's backing value changed from the native side.
    Change,
    /// A notebook's selected tab changed.
    TabChanged,
}

impl EventKind {
    /// Tk-style event name, used for logging.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Click => "<Button-1>",
            Self::DoubleClick => "<Double-Button-1>",
            Self::Command => "<<Command>>",
            Self::Change => "<<Change>>",
            Self::TabChanged => "<<NotebookTabChanged>>",
        }
    }
}

/// A delivered event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// Native widget the event is addressed to.
    pub handle: NativeHandle,
    pub kind: EventKind,
}

impl Event {
    #[inline]
    pub const fn new(handle: NativeHandle, kind: EventKind) -> Self {
        Self { handle, kind }
    }
}
