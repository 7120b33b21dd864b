#![forbid(unsafe_code)]

//! Runtime support: a deterministic simulator and logging setup.
//!
//! A real toolkit binding runs its own event loop and forwards native events
//! to [`Gui::dispatch`](ezgrid_widgets::Gui::dispatch) and due deferred tasks
//! to [`Gui::run_deferred`](ezgrid_widgets::Gui::run_deferred).
//! [`Simulator`] does the same over the headless toolkit's virtual clock.

pub mod logging;
pub mod simulator;

pub use logging::{LoggingError, init as init_logging};
pub use simulator::{Simulator, TaskRecord};
