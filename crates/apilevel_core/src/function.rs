//! Values that may depend on a resolved capability.
//!
//! Generators often need a value that is either fixed (a constant name) or
//! derived from the resolved API (a class name that moved between releases).
//! [`ApiFunction`] captures both shapes behind one type.
//!
//! ```
//! use apilevel_core::ceiling::Candidate;
//! use apilevel_core::function::ApiFunction;
//! use apilevel_core::specification::ApiSpecification;
//! use apilevel_core::version::ApiVersion;
//!
//! trait JavaApi: Send + Sync {
//!     fn generated_annotation(&self) -> &'static str;
//! }
//!
//! struct Java9;
//!
//! impl JavaApi for Java9 {
//!     fn generated_annotation(&self) -> &'static str {
//!         "javax.annotation.processing.Generated"
//!     }
//! }
//!
//! let spec = ApiSpecification::create::<dyn JavaApi>(
//!     [Candidate::new(|| Java9).ceiling([9]).provides::<dyn JavaApi>(|c| c).build()],
//!     ApiVersion::new([17]),
//! )
//! .unwrap();
//!
//! let annotation = ApiFunction::<dyn JavaApi, _>::bound(|java| java.generated_annotation());
//! assert_eq!(annotation.apply(), None);
//! assert_eq!(
//!     annotation.apply_with(&spec),
//!     Some("javax.annotation.processing.Generated")
//! );
//! ```

use core::fmt;
use std::sync::Arc;

use crate::capability::{Capability, CapabilityId};
use crate::error::ApiResult;

/// Anything that can resolve capabilities for a fixed version.
///
/// Implemented by [`ApiSpecification`](crate::specification::ApiSpecification)
/// (capabilities of one family) and [`ApiContext`](crate::context::ApiContext)
/// (capabilities of every registered family).
pub trait ApiResolver {
    /// Resolves capability `C`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::error::ApiError) describing why `C` is
    /// not available.
    fn resolve<C: ?Sized + Capability>(&self) -> ApiResult<Arc<C>>;
}

impl<R: ApiResolver> ApiResolver for Arc<R> {
    fn resolve<C: ?Sized + Capability>(&self) -> ApiResult<Arc<C>> {
        R::resolve::<C>(self)
    }
}

enum Kind<A: ?Sized, T> {
    Constant(T),
    Bound(Arc<dyn Fn(&A) -> T + Send + Sync>),
}

/// A value that is either constant or computed from capability `A`.
pub struct ApiFunction<A: ?Sized, T> {
    kind: Kind<A, T>,
}

impl<A: ?Sized + Capability, T> ApiFunction<A, T> {
    /// A value independent of any API.
    #[must_use]
    pub fn constant(value: T) -> Self {
        Self {
            kind: Kind::Constant(value),
        }
    }

    /// A value computed from the resolved capability `A`.
    #[must_use]
    pub fn bound(function: impl Fn(&A) -> T + Send + Sync + 'static) -> Self {
        Self {
            kind: Kind::Bound(Arc::new(function)),
        }
    }

    /// Returns true for [`constant`](Self::constant) functions.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        matches!(self.kind, Kind::Constant(_))
    }

    /// Returns the capability a bound function needs, `None` for constants.
    #[must_use]
    pub fn api_capability(&self) -> Option<CapabilityId> {
        match self.kind {
            Kind::Constant(_) => None,
            Kind::Bound(_) => Some(CapabilityId::of::<A>()),
        }
    }

    /// Evaluates without any API: constants yield their value, bound functions `None`.
    #[must_use]
    pub fn apply(&self) -> Option<T>
    where
        T: Clone,
    {
        match &self.kind {
            Kind::Constant(value) => Some(value.clone()),
            Kind::Bound(_) => None,
        }
    }

    /// Evaluates against `resolver`.
    ///
    /// Bound functions resolve `A` first and yield `None` if that fails.
    #[must_use]
    pub fn apply_with<R: ApiResolver>(&self, resolver: &R) -> Option<T>
    where
        T: Clone,
    {
        match &self.kind {
            Kind::Constant(value) => Some(value.clone()),
            Kind::Bound(function) => match resolver.resolve::<A>() {
                Ok(api) => Some(function(&*api)),
                Err(err) => {
                    tracing::debug!(
                        capability = %CapabilityId::of::<A>(),
                        error = %err,
                        "api function could not resolve its capability"
                    );
                    None
                }
            },
        }
    }

    /// Composes `map` after this function.
    #[must_use]
    pub fn map<U>(self, map: impl Fn(T) -> U + Send + Sync + 'static) -> ApiFunction<A, U>
    where
        T: 'static,
        U: 'static,
    {
        let kind = match self.kind {
            Kind::Constant(value) => Kind::Constant(map(value)),
            Kind::Bound(function) => Kind::Bound(Arc::new(move |api: &A| map(function(api)))),
        };
        ApiFunction { kind }
    }
}

impl<A: ?Sized, T: Clone> Clone for ApiFunction<A, T> {
    fn clone(&self) -> Self {
        let kind = match &self.kind {
            Kind::Constant(value) => Kind::Constant(value.clone()),
            Kind::Bound(function) => Kind::Bound(Arc::clone(function)),
        };
        Self { kind }
    }
}

impl<A: ?Sized, T: fmt::Debug> fmt::Debug for ApiFunction<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Kind::Bound(_) => f
                .debug_tuple("Bound")
                .field(&core::any::type_name::<A>())
                .finish(),
        }
    }
}

impl<A: ?Sized + Capability, T> From<T> for ApiFunction<A, T> {
    fn from(value: T) -> Self {
        Self::constant(value)
    }
}
