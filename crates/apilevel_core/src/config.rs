//! Resolution settings.
//!
//! [`ResolutionConfig`] is a plain value with builder methods and serde
//! support, so hosts can embed it in their own configuration files:
//!
//! ```
//! use apilevel_core::config::{FallbackLevel, ResolutionConfig, TieBreak};
//!
//! let config: ResolutionConfig =
//!     serde_json::from_str(r#"{ "tie_break": "last_declared" }"#).unwrap();
//!
//! assert_eq!(config.tie_break, TieBreak::LastDeclared);
//! assert_eq!(config.fallback_level, FallbackLevel::Warn);
//! ```

use serde::{Deserialize, Serialize};

/// Which candidate wins when several declare an identical ceiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The candidate declared first wins (default).
    #[default]
    FirstDeclared,
    /// The candidate declared last wins.
    LastDeclared,
}

/// Level of the event logged when a version lies outside the known range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackLevel {
    /// Do not log fallbacks.
    Off,
    /// `TRACE`
    Trace,
    /// `DEBUG`
    Debug,
    /// `INFO`
    Info,
    /// `WARN` (default).
    #[default]
    Warn,
}

/// Settings applied to every specification a registry creates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Tie-break between identical ceilings.
    pub tie_break: TieBreak,
    /// Level of the out-of-range fallback event.
    pub fallback_level: FallbackLevel,
}

impl ResolutionConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tie-break between identical ceilings.
    #[must_use]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Sets the level of the out-of-range fallback event.
    #[must_use]
    pub fn with_fallback_level(mut self, level: FallbackLevel) -> Self {
        self.fallback_level = level;
        self
    }
}
