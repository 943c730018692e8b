//! Capability identities.
//!
//! A *capability* is the type callers resolve a facade for, almost always a
//! trait object such as `dyn JavaApi`. The same identity doubles as the
//! *family marker* under which a provider registers its candidates: by
//! convention the family is keyed by its root capability.
//!
//! ```
//! use apilevel_core::capability::CapabilityId;
//!
//! trait JavaApi: Send + Sync {
//!     fn record_class(&self) -> &'static str;
//! }
//!
//! let id = CapabilityId::of::<dyn JavaApi>();
//! assert!(id.type_name().contains("JavaApi"));
//! ```

use core::any::TypeId;
use core::fmt;

/// A type that can be resolved to a shared facade.
///
/// Any `Send + Sync + 'static` type, sized or not, is a capability; the
/// blanket implementation makes `dyn Trait` usable as long as the trait has
/// `Send + Sync` supertraits.
pub trait Capability: Send + Sync + 'static {}

impl<T: ?Sized + Send + Sync + 'static> Capability for T {}

/// Unique identifier for a capability type.
///
/// Based on [`TypeId`], so each capability type has exactly one
/// `CapabilityId`. The type name is kept for diagnostics and error messages.
#[derive(Clone, Copy)]
pub struct CapabilityId {
    type_id: TypeId,
    type_name: &'static str,
}

impl CapabilityId {
    /// Creates a `CapabilityId` for the given capability type.
    #[must_use]
    pub fn of<C: ?Sized + Capability>() -> Self {
        Self {
            type_id: TypeId::of::<C>(),
            type_name: core::any::type_name::<C>(),
        }
    }

    /// Returns the underlying `TypeId`.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the type name for debugging.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

// Identity is the TypeId alone; type names are not guaranteed unique.
impl PartialEq for CapabilityId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for CapabilityId {}

impl core::hash::Hash for CapabilityId {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}
