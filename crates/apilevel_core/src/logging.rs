//! Subscriber setup for hosts and tests.
//!
//! The engine only emits `tracing` events; installing a subscriber is up to
//! the host. [`LoggingConfig`] covers the common setups:
//!
//! ```
//! use apilevel_core::logging::{LogFormat, LoggingConfig};
//! use tracing::Level;
//!
//! // Development: see every selection decision.
//! let dev = LoggingConfig::new()
//!     .with_level(Level::DEBUG)
//!     .with_format(LogFormat::Pretty);
//!
//! // CI: structured output, only this crate at debug.
//! let ci = LoggingConfig::new()
//!     .with_format(LogFormat::Json)
//!     .with_env_filter("apilevel_core=debug,warn");
//!
//! dev.init();
//! ```

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON lines.
    Json,
}

/// Subscriber configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    level: Level,
    format: LogFormat,
    /// Directive string such as `"apilevel_core=debug,warn"`.
    env_filter: Option<String>,
    span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl LoggingConfig {
    /// Creates the default configuration: `INFO`, pretty output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum level, used when no env filter is set or it fails to parse.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets per-target directives (`target=level,...`).
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Returns the maximum level.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Returns the output format.
    #[must_use]
    pub fn format(&self) -> LogFormat {
        self.format
    }

    /// Builds the filter; an invalid directive string falls back to the level.
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        match &self.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
            }
            None => EnvFilter::new(self.level.as_str()),
        }
    }

    /// Installs the global subscriber.
    ///
    /// Returns false if a subscriber was already installed; the existing one
    /// is kept.
    pub fn init(&self) -> bool {
        let env_filter = self.env_filter();
        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };

        let registry = tracing_subscriber::registry().with(env_filter);
        let installed = match self.format {
            LogFormat::Pretty => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_span_events(span_events),
                )
                .try_init(),
            LogFormat::Compact => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_span_events(span_events),
                )
                .try_init(),
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_span_events(span_events),
                )
                .try_init(),
        }
        .is_ok();

        if installed {
            tracing::debug!(level = %self.level, format = ?self.format, "logging initialized");
        }
        installed
    }
}
