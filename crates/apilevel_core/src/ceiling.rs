//! Candidate ceilings and discovery.
//!
//! A *candidate* is one concrete implementation of an API family that is
//! known to be correct up to a declared *ceiling* version. Candidates are
//! described with [`Candidate`] and turned into sorted
//! [`CandidateDescriptor`]s by [`discover`].
//!
//! # Declaring Candidates
//!
//! The ceiling is usually declared on the type with
//! `#[derive(MaxApiLevel)]`; the capabilities it serves are listed on the
//! builder, one upcast per capability:
//!
//! ```
//! use apilevel_core::ceiling::{Candidate, MaxApiLevel};
//!
//! trait JavaApi: Send + Sync {
//!     fn record_class(&self) -> &'static str;
//! }
//!
//! #[derive(Default, MaxApiLevel)]
//! #[api_level(max = "16")]
//! struct Java16;
//!
//! impl JavaApi for Java16 {
//!     fn record_class(&self) -> &'static str {
//!         "java.lang.Record"
//!     }
//! }
//!
//! let candidate = Candidate::of::<Java16>()
//!     .provides::<dyn JavaApi>(|java| java)
//!     .build();
//!
//! assert_eq!(candidate.ceiling().map(ToString::to_string).as_deref(), Some("16"));
//! ```
//!
//! # Inheritance Between Candidates
//!
//! Newer candidates normally reuse older behaviour and override only what
//! changed, either through trait default methods or by delegating to the
//! older candidate type. The engine never mixes methods of different
//! candidates: once a candidate is selected, plain trait dispatch on that one
//! type answers every call.

use core::any::Any;
use core::fmt;
use core::marker::PhantomData;
use std::sync::Arc;

use crate::capability::{Capability, CapabilityId};
use crate::error::{ApiError, ApiResult};
use crate::version::ApiVersion;

/// Re-export the `#[derive(MaxApiLevel)]` macro next to its trait.
pub use apilevel_macros::MaxApiLevel;

/// Type-erased candidate instance.
pub(crate) type ErasedInstance = Arc<dyn Any + Send + Sync>;

/// Type-erased facade; always holds an `Arc<C>` for the capability it was built for.
pub(crate) type ErasedFacade = Box<dyn Any + Send + Sync>;

/// Factory creating a fresh candidate instance.
type Factory = Arc<dyn Fn() -> ErasedInstance + Send + Sync>;

/// Converts an erased instance into an erased `Arc<C>` facade.
type Upcast = Arc<dyn Fn(ErasedInstance) -> Option<ErasedFacade> + Send + Sync>;

/// Declares the highest version a candidate supports.
///
/// Usually derived:
///
/// ```
/// use apilevel_core::ceiling::MaxApiLevel;
///
/// #[derive(MaxApiLevel)]
/// #[api_level(max = "4.3")]
/// struct Scout43;
///
/// assert_eq!(Scout43::MAX_API_LEVEL, &[4, 3]);
/// ```
///
/// An empty slice means "no ceiling declared" and is rejected by [`discover`].
pub trait MaxApiLevel {
    /// Ceiling segments, most significant first.
    const MAX_API_LEVEL: &'static [u32];
}

// ─────────────────────────────────────────────────────────────────────────────
// Candidate
// ─────────────────────────────────────────────────────────────────────────────

/// One implementation of an API family, valid up to its ceiling.
///
/// Cheap to clone; the factory and upcasts are shared.
#[derive(Clone)]
pub struct Candidate {
    name: String,
    ceiling: Option<ApiVersion>,
    factory: Factory,
    provides: Vec<(CapabilityId, Upcast)>,
}

impl Candidate {
    /// Starts a candidate for `T`, taking the ceiling from [`MaxApiLevel`].
    #[must_use]
    pub fn of<T>() -> CandidateBuilder<T>
    where
        T: MaxApiLevel + Default + Send + Sync + 'static,
    {
        let builder = Self::new(T::default);
        if T::MAX_API_LEVEL.is_empty() {
            builder
        } else {
            builder.ceiling(ApiVersion::new(T::MAX_API_LEVEL))
        }
    }

    /// Starts a candidate created by `factory`, without a ceiling.
    ///
    /// A ceiling must be set with [`CandidateBuilder::ceiling`] before the
    /// candidate can be discovered.
    #[must_use]
    pub fn new<T, F>(factory: F) -> CandidateBuilder<T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        CandidateBuilder {
            name: core::any::type_name::<T>().to_string(),
            ceiling: None,
            factory: Arc::new(move || Arc::new(factory()) as ErasedInstance),
            provides: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Returns the candidate's name (the type name unless overridden).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared ceiling, if any.
    #[must_use]
    pub fn ceiling(&self) -> Option<&ApiVersion> {
        self.ceiling.as_ref()
    }

    /// Returns the capabilities this candidate can be resolved as.
    pub fn capabilities(&self) -> impl Iterator<Item = CapabilityId> + '_ {
        self.provides.iter().map(|(id, _)| *id)
    }

    /// Returns true if this candidate can be resolved as `capability`.
    #[must_use]
    pub fn provides(&self, capability: CapabilityId) -> bool {
        self.provides.iter().any(|(id, _)| *id == capability)
    }
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("name", &self.name)
            .field("ceiling", &self.ceiling.as_ref().map(ToString::to_string))
            .field("provides", &self.capabilities().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`Candidate`].
pub struct CandidateBuilder<T> {
    name: String,
    ceiling: Option<ApiVersion>,
    factory: Factory,
    provides: Vec<(CapabilityId, Upcast)>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> CandidateBuilder<T> {
    /// Overrides the candidate name used in diagnostics.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the ceiling, replacing one taken from [`MaxApiLevel`].
    #[must_use]
    pub fn ceiling(mut self, ceiling: impl Into<ApiVersion>) -> Self {
        self.ceiling = Some(ceiling.into());
        self
    }

    /// Declares that this candidate can be resolved as capability `C`.
    ///
    /// `upcast` converts the shared instance into the capability; for a
    /// trait object it is simply `|c| c`. Declaring the same capability twice
    /// keeps the last upcast.
    #[must_use]
    pub fn provides<C>(mut self, upcast: impl Fn(Arc<T>) -> Arc<C> + Send + Sync + 'static) -> Self
    where
        C: ?Sized + Capability,
    {
        let id = CapabilityId::of::<C>();
        let erased: Upcast = Arc::new(move |instance: ErasedInstance| {
            let concrete = instance.downcast::<T>().ok()?;
            Some(Box::new(upcast(concrete)) as ErasedFacade)
        });
        self.provides.retain(|(existing, _)| *existing != id);
        self.provides.push((id, erased));
        self
    }

    /// Finishes the candidate.
    #[must_use]
    pub fn build(self) -> Candidate {
        Candidate {
            name: self.name,
            ceiling: self.ceiling,
            factory: self.factory,
            provides: self.provides,
        }
    }
}

impl<T: Send + Sync + 'static> From<CandidateBuilder<T>> for Candidate {
    fn from(builder: CandidateBuilder<T>) -> Self {
        builder.build()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Discovery
// ─────────────────────────────────────────────────────────────────────────────

/// A discovered candidate: its validated ceiling plus declaration order.
#[derive(Clone)]
pub struct CandidateDescriptor {
    ceiling: ApiVersion,
    declaration_order: usize,
    candidate: Candidate,
}

impl CandidateDescriptor {
    /// Returns the candidate's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.candidate.name()
    }

    /// Returns the declared ceiling.
    #[must_use]
    pub fn ceiling(&self) -> &ApiVersion {
        &self.ceiling
    }

    /// Returns the position of the candidate in the list it was discovered from.
    #[must_use]
    pub fn declaration_order(&self) -> usize {
        self.declaration_order
    }

    /// Returns the capabilities this candidate can be resolved as.
    pub fn capabilities(&self) -> impl Iterator<Item = CapabilityId> + '_ {
        self.candidate.capabilities()
    }

    /// Returns true if this candidate can be resolved as `capability`.
    #[must_use]
    pub fn provides(&self, capability: CapabilityId) -> bool {
        self.candidate.provides(capability)
    }

    /// Creates a fresh instance of the candidate type.
    pub(crate) fn instantiate(&self) -> ErasedInstance {
        (self.candidate.factory)()
    }

    /// Upcasts an instance created by [`instantiate`](Self::instantiate).
    pub(crate) fn upcast(
        &self,
        capability: CapabilityId,
        instance: ErasedInstance,
    ) -> Option<ErasedFacade> {
        self.candidate
            .provides
            .iter()
            .find(|(id, _)| *id == capability)
            .and_then(|(_, upcast)| upcast(instance))
    }
}

impl fmt::Debug for CandidateDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateDescriptor")
            .field("name", &self.name())
            .field("ceiling", &self.ceiling.to_string())
            .field("declaration_order", &self.declaration_order)
            .field("provides", &self.capabilities().collect::<Vec<_>>())
            .finish()
    }
}

/// Walks `candidates` once and returns their descriptors sorted by reach.
///
/// Sorting is stable, so candidates declaring identical ceilings keep their
/// declaration order.
///
/// # Errors
///
/// Returns [`ApiError::MissingCeiling`] for the first candidate without a
/// ceiling.
pub fn discover(
    candidates: impl IntoIterator<Item = Candidate>,
) -> ApiResult<Vec<CandidateDescriptor>> {
    let mut descriptors = candidates
        .into_iter()
        .enumerate()
        .map(|(declaration_order, candidate)| {
            let ceiling = candidate
                .ceiling
                .clone()
                .ok_or_else(|| ApiError::MissingCeiling {
                    candidate: candidate.name.clone(),
                })?;
            tracing::trace!(
                candidate = %candidate.name,
                ceiling = %ceiling,
                "discovered candidate"
            );
            Ok(CandidateDescriptor {
                ceiling,
                declaration_order,
                candidate,
            })
        })
        .collect::<ApiResult<Vec<_>>>()?;

    descriptors.sort_by(|a, b| a.ceiling.cmp_reach(&b.ceiling));
    Ok(descriptors)
}
