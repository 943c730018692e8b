//! # apilevel Internal Library
//!
//! Re-exports the core apilevel crates for convenience.

/// Version-aware capability resolution engine.
pub use apilevel_core;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use apilevel_core::prelude::*;
}
