#![forbid(unsafe_code)]

//! GUI-wide configuration.

use std::time::Duration;

/// Environment variable overriding [`GuiConfig::initial_tab_select_delay`]
/// (milliseconds).
pub const ENV_TAB_SELECT_DELAY_MS: &str = "EZGRID_TAB_SELECT_DELAY_MS";

/// Environment variable enabling [`GuiConfig::trace_layout`] (`1`/`true`).
pub const ENV_TRACE_LAYOUT: &str = "EZGRID_TRACE_LAYOUT";

/// Configuration for a [`Gui`](crate::gui::Gui).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuiConfig {
    /// Delay before a notebook's first tab is selected and announced, so
    /// handlers bound right after `add_tab` still see the selection.
    pub initial_tab_select_delay: Duration,
    /// Default width of derived thumbnails, in pixels.
    pub thumbnail_width: u32,
    /// Default visible canvas size `(width, height)`, in pixels.
    pub canvas_size: (u32, u32),
    /// Mark every new container for layout tracing.
    pub trace_layout: bool,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            initial_tab_select_delay: Duration::from_millis(500),
            thumbnail_width: 100,
            canvas_size: (400, 200),
            trace_layout: false,
        }
    }
}

impl GuiConfig {
    /// Defaults, overridden by `EZGRID_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults, overridden by whatever `lookup` returns.
    ///
    /// Unparseable values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(ms) = lookup(ENV_TAB_SELECT_DELAY_MS).and_then(|v| v.trim().parse::<u64>().ok())
        {
            config.initial_tab_select_delay = Duration::from_millis(ms);
        }
        if let Some(flag) = lookup(ENV_TRACE_LAYOUT) {
            config.trace_layout = matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        config
    }

    #[must_use]
    pub fn with_initial_tab_select_delay(mut self, delay: Duration) -> Self {
        self.initial_tab_select_delay = delay;
        self
    }

    #[must_use]
    pub fn with_thumbnail_width(mut self, width: u32) -> Self {
        self.thumbnail_width = width;
        self
    }

    #[must_use]
    pub fn with_canvas_size(mut self, width: u32, height: u32) -> Self {
        self.canvas_size = (width, height);
        self
    }

    #[must_use]
    pub fn with_trace_layout(mut self, enabled: bool) -> Self {
        self.trace_layout = enabled;
        self
    }
}
