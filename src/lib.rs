//! Version-aware capability resolution for source generators.
//!
//! Generators targeting several releases of a framework describe each
//! release line once, as a candidate implementing the family's capability
//! traits, and let `apilevel` pick the right one for the version found in the
//! environment.
//!
//! ```
//! use std::sync::Arc;
//!
//! use apilevel::prelude::*;
//!
//! trait SpringApi: Send + Sync {
//!     fn jakarta(&self) -> bool;
//! }
//!
//! #[derive(Default, MaxApiLevel)]
//! #[api_level(max = "5.3")]
//! struct Spring53;
//!
//! #[derive(Default, MaxApiLevel)]
//! #[api_level(max = "6")]
//! struct Spring6;
//!
//! impl SpringApi for Spring53 {
//!     fn jakarta(&self) -> bool { false }
//! }
//!
//! impl SpringApi for Spring6 {
//!     fn jakarta(&self) -> bool { true }
//! }
//!
//! let registry = Arc::new(ApiRegistry::new());
//! registry
//!     .register_provider::<dyn SpringApi>(
//!         ArtifactProvider::new("org.springframework:spring-core")
//!             .with_candidate(Candidate::of::<Spring53>().provides::<dyn SpringApi>(|c| c))
//!             .with_candidate(Candidate::of::<Spring6>().provides::<dyn SpringApi>(|c| c)),
//!     )
//!     .unwrap();
//!
//! let context = ApiContext::new(registry).with_environment(
//!     StaticEnvironment::new().with_artifact("org.springframework:spring-core", [6, 1, 4]),
//! );
//! assert!(context.require_api::<dyn SpringApi>().unwrap().jakarta());
//! ```

pub use apilevel_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use apilevel_internal::prelude::*;
}
