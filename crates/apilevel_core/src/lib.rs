//! Version-aware capability resolution for source generators.
//!
//! `apilevel_core` picks, for a detected version of some external API, the
//! implementation of a capability trait that was written for the closest
//! supported release line:
//!
//! - [`version`] - Dotted versions and the orderings used for selection
//! - [`capability`] - Capability identity (`dyn Trait` types)
//! - [`ceiling`] - Candidates, their ceilings and discovery
//! - [`specification`] - Selection, narrowing and facade caching
//! - [`function`] - Values bound to a capability
//! - [`registry`] - Family registration and version detection
//! - [`context`] - Environment binding and cross-family resolution
//! - [`dump`] - Deterministic snapshots of facades
//! - [`config`] - Resolution settings
//! - [`logging`] - Subscriber setup
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use apilevel_core::prelude::*;
//!
//! trait JavaApi: Send + Sync {
//!     fn list_factory(&self) -> &'static str;
//! }
//!
//! #[derive(Default, MaxApiLevel)]
//! #[api_level(max = "8")]
//! struct Java8;
//!
//! #[derive(Default, MaxApiLevel)]
//! #[api_level(max = "9")]
//! struct Java9;
//!
//! impl JavaApi for Java8 {
//!     fn list_factory(&self) -> &'static str { "java.util.Arrays.asList" }
//! }
//!
//! impl JavaApi for Java9 {
//!     fn list_factory(&self) -> &'static str { "java.util.List.of" }
//! }
//!
//! let registry = Arc::new(ApiRegistry::new());
//! registry
//!     .register_provider::<dyn JavaApi>(
//!         ArtifactProvider::new("java")
//!             .with_candidate(Candidate::of::<Java8>().provides::<dyn JavaApi>(|c| c))
//!             .with_candidate(Candidate::of::<Java9>().provides::<dyn JavaApi>(|c| c)),
//!     )
//!     .unwrap();
//!
//! let context = ApiContext::new(registry)
//!     .with_environment(StaticEnvironment::new().with_artifact("java", [8, 0, 312]));
//!
//! assert_eq!(context.require_api::<dyn JavaApi>().unwrap().list_factory(), "java.util.Arrays.asList");
//! ```

// Self-reference so `#[derive(MaxApiLevel)]` output resolves inside this crate.
extern crate self as apilevel_core;

/// Capability identity.
pub mod capability;

/// Candidates, ceilings and discovery.
pub mod ceiling;

/// Resolution settings.
pub mod config;

/// Environment binding and cross-family resolution.
pub mod context;

/// Deterministic facade snapshots.
pub mod dump;

/// Error types.
pub mod error;

/// Values bound to a capability.
pub mod function;

/// Subscriber setup.
pub mod logging;

/// Family registration and version detection.
pub mod registry;

/// Selection, narrowing and facade caching.
pub mod specification;

/// Dotted versions.
pub mod version;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::capability::*;
    pub use crate::ceiling::*;
    pub use crate::config::*;
    pub use crate::context::*;
    pub use crate::dump::*;
    pub use crate::error::*;
    pub use crate::function::*;
    pub use crate::registry::*;
    pub use crate::specification::*;
    pub use crate::version::*;
}
