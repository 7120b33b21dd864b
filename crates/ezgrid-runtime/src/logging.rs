#![forbid(unsafe_code)]

//! Logging setup.
//!
//! Spans and events use `ezgrid.*` names and the `ezgrid.layout` target for
//! placement traces. [`init`] installs a formatting subscriber filtered by
//! `EZGRID_LOG` (falling back to `RUST_LOG`, then to `warn`).
//!
//! ```no_run
//! ezgrid_runtime::logging::init().expect("logging");
//! ```

use std::fmt;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter directives for ezgrid, e.g. `ezgrid.layout=trace,debug`.
pub const ENV_LOG: &str = "EZGRID_LOG";

/// Directives used when no variable is set.
pub const DEFAULT_DIRECTIVES: &str = "warn";

/// Errors from [`init`].
#[derive(Debug)]
pub enum LoggingError {
    /// The filter directives did not parse.
    Filter(ParseError),
    /// A global subscriber is already installed.
    AlreadySet,
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter(err) => write!(f, "invalid log filter: {err}"),
            Self::AlreadySet => write!(f, "a global tracing subscriber is already set"),
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Filter(err) => Some(err),
            Self::AlreadySet => None,
        }
    }
}

impl From<ParseError> for LoggingError {
    fn from(err: ParseError) -> Self {
        Self::Filter(err)
    }
}

/// Pick the directives: `EZGRID_LOG`, then `RUST_LOG`, then the default.
pub fn directives_from(lookup: impl Fn(&str) -> Option<String>) -> String {
    let set = |key: &str| lookup(key).filter(|value: &String| !value.trim().is_empty());
    set(ENV_LOG)
        .or_else(|| set("RUST_LOG"))
        .unwrap_or_else(|| DEFAULT_DIRECTIVES.to_owned())
}

/// Build the filter for `directives`.
pub fn filter(directives: &str) -> Result<EnvFilter, LoggingError> {
    Ok(EnvFilter::try_new(directives)?)
}

/// Install the global subscriber: formatted events to stderr, span closes
/// included so `ezgrid.destroy` and friends show their timing.
pub fn init() -> Result<(), LoggingError> {
    let directives = directives_from(|key| std::env::var(key).ok());
    let filter = filter(&directives)?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|_| LoggingError::AlreadySet)?;
    tracing::debug!(%directives, "logging initialized");
    Ok(())
}
