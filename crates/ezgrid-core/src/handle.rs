#![forbid(unsafe_code)]

//! Opaque native widget handles.

use std::fmt;

/// Identifier the native toolkit hands back for a widget it created.
///
/// Handles are only compared for identity; their numeric value carries no
/// meaning beyond that. `Display` renders them the way Tk path names look
/// (`.w17`), which keeps logs readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NativeHandle(u64);

impl NativeHandle {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".w{}", self.0)
    }
}
