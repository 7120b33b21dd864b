#![forbid(unsafe_code)]

//! Deterministic GUI simulator for testing.
//!
//! `Simulator` drives a [`Gui`] over a [`HeadlessToolkit`]: user input is
//! injected as native events and the virtual clock is advanced by hand, so
//! deferred work (such as a notebook's first selection) runs exactly when a
//! test says so.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use ezgrid_layout::Place;
//! use ezgrid_runtime::simulator::Simulator;
//!
//! let mut sim = Simulator::new(Default::default()).unwrap();
//! let root = sim.gui().root();
//! let nb = sim.gui_mut().add_notebook(root, Place::next_row(), 1).unwrap();
//! sim.gui_mut().add_tab(nb, Some("General"), None).unwrap();
//!
//! assert_eq!(sim.settle().unwrap(), 1);
//! assert_eq!(sim.now(), Duration::from_millis(500));
//! assert_eq!(sim.gui().selected_tab(nb).unwrap(), Some(0));
//! ```

use std::time::Duration;

use ezgrid_core::event::{Event, EventKind};
use ezgrid_widgets::{
    Gui, GuiConfig, HeadlessToolkit, TabRef, TaskToken, ToolkitCall, Value, WidgetError, WidgetId,
};
use tracing::{debug, trace};

/// Upper bound on clock steps in [`Simulator::settle`].
const MAX_SETTLE_STEPS: usize = 10_000;

/// Record of a deferred task that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRecord {
    /// Virtual time the task ran at.
    pub at: Duration,
    pub token: TaskToken,
    /// Whether the task still had something to act on.
    pub acted: bool,
}

/// Deterministic simulator over a headless toolkit.
#[derive(Debug)]
pub struct Simulator {
    gui: Gui<HeadlessToolkit>,
    task_log: Vec<TaskRecord>,
}

impl Simulator {
    /// Create a GUI with a fresh headless toolkit.
    pub fn new(config: GuiConfig) -> Result<Self, WidgetError> {
        Ok(Self::with_gui(Gui::new(HeadlessToolkit::new(), config)?))
    }

    /// Drive an existing GUI.
    pub fn with_gui(gui: Gui<HeadlessToolkit>) -> Self {
        Self {
            gui,
            task_log: Vec::new(),
        }
    }

    pub fn gui(&self) -> &Gui<HeadlessToolkit> {
        &self.gui
    }

    pub fn gui_mut(&mut self) -> &mut Gui<HeadlessToolkit> {
        &mut self.gui
    }

    pub fn into_gui(self) -> Gui<HeadlessToolkit> {
        self.gui
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.gui.toolkit().now()
    }

    /// Advance the clock and run every task that comes due, in due order.
    ///
    /// Returns how many tasks acted.
    pub fn advance(&mut self, by: Duration) -> Result<usize, WidgetError> {
        let due = self.gui.toolkit_mut().advance(by);
        let at = self.now();
        let mut acted = 0;
        for token in due {
            let did = self.gui.run_deferred(token)?;
            trace!(token = token.raw(), ?at, acted = did, "deferred task ran");
            self.task_log.push(TaskRecord {
                at,
                token,
                acted: did,
            });
            acted += usize::from(did);
        }
        Ok(acted)
    }

    /// Run the clock forward until no task is pending.
    ///
    /// Returns how many tasks acted.
    pub fn settle(&mut self) -> Result<usize, WidgetError> {
        let mut acted = 0;
        for _ in 0..MAX_SETTLE_STEPS {
            let Some(wait) = self.gui.toolkit().next_due() else {
                debug!(now = ?self.now(), acted, "settled");
                return Ok(acted);
            };
            acted += self.advance(wait)?;
        }
        debug!(now = ?self.now(), "settle gave up with tasks still pending");
        Ok(acted)
    }

    /// Click a widget. Returns the number of handlers called.
    pub fn click(&mut self, id: WidgetId) -> Result<usize, WidgetError> {
        let handle = self.gui.handle(id)?;
        self.gui.dispatch(Event::new(handle, EventKind::Click))
    }

    /// Press a button.
    pub fn press(&mut self, id: WidgetId) -> Result<usize, WidgetError> {
        self.gui.invoke(id)
    }

    /// Click the label of a notebook tab.
    pub fn click_tab(&mut self, notebook: WidgetId, tab: impl Into<TabRef>) -> Result<usize, WidgetError> {
        let tab = tab.into();
        let label = self
            .gui
            .node(notebook)?
            .tabs()
            .and_then(|tabs| tabs.resolve(&tab).and_then(|ix| tabs.get(ix)))
            .map(|found| found.label)
            .ok_or_else(|| WidgetError::TabNotFound {
                notebook,
                tab: tab.to_string(),
            })?;
        self.gui.dispatch(Event::new(label, EventKind::Click))
    }

    /// Type a value into a widget as the user would.
    pub fn type_value(&mut self, id: WidgetId, value: impl Into<Value>) -> Result<usize, WidgetError> {
        self.gui.input(id, value)
    }

    /// Native calls made so far.
    pub fn calls(&self) -> &[ToolkitCall] {
        self.gui.toolkit().calls()
    }

    /// Deferred tasks run so far.
    pub fn task_log(&self) -> &[TaskRecord] {
        &self.task_log
    }

    pub fn clear_logs(&mut self) {
        self.task_log.clear();
        self.gui.toolkit_mut().take_calls();
    }
}
