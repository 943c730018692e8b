//! Error types for API resolution.
//!
//! Selection itself never fails: a version outside the known range falls back
//! to the oldest or newest candidate. What can fail is everything around it:
//! a missing environment, a capability nobody provides, and registration or
//! configuration mistakes.

use crate::capability::CapabilityId;

/// Convenience alias for results of this crate.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error resolving or registering an API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No environment is bound to the context, so no version can be detected.
    #[error("no environment bound: cannot resolve {capability}")]
    MissingEnvironment {
        /// The requested capability.
        capability: &'static str,
    },

    /// No candidate implements the requested capability.
    #[error("no candidate provides {capability}")]
    UnknownCapability {
        /// The requested capability.
        capability: &'static str,
    },

    /// The API family is not registered.
    #[error("api family {family} is not registered")]
    UnknownFamily {
        /// The family marker.
        family: &'static str,
    },

    /// The environment is bound but the family's version could not be detected in it.
    #[error("version of api family {family} could not be detected")]
    UndetectedVersion {
        /// The family marker.
        family: &'static str,
    },

    /// The API family was registered twice without unregistering.
    #[error("api family {family} is already registered")]
    DuplicateRegistration {
        /// The family marker.
        family: &'static str,
    },

    /// A candidate declares no ceiling.
    #[error("candidate {candidate} declares no max api level")]
    MissingCeiling {
        /// The candidate name.
        candidate: String,
    },

    /// A family was given an empty candidate list.
    #[error("api family {family} has no candidates")]
    NoCandidates {
        /// The family marker.
        family: &'static str,
    },

    /// A capability method has no implementation reachable from the selected candidate.
    #[error("{capability}::{method} is not implemented by the selected candidate")]
    MissingMethod {
        /// The capability declaring the method.
        capability: &'static str,
        /// The method name.
        method: &'static str,
    },
}

impl ApiError {
    /// Creates a [`MissingMethod`](Self::MissingMethod) error for capability `C`.
    ///
    /// Intended for trait default methods that have no implementation at a
    /// given level, so that narrowing succeeds and only the call fails:
    ///
    /// ```
    /// use apilevel_core::error::{ApiError, ApiResult};
    ///
    /// trait Records: Send + Sync {
    ///     fn record_class(&self) -> ApiResult<&'static str> {
    ///         Err(ApiError::missing_method::<dyn Records>("record_class"))
    ///     }
    /// }
    /// ```
    #[must_use]
    pub fn missing_method<C: ?Sized + crate::capability::Capability>(method: &'static str) -> Self {
        Self::MissingMethod {
            capability: CapabilityId::of::<C>().type_name(),
            method,
        }
    }

    pub(crate) fn unknown_capability(capability: CapabilityId) -> Self {
        Self::UnknownCapability {
            capability: capability.type_name(),
        }
    }

    pub(crate) fn unknown_family(family: CapabilityId) -> Self {
        Self::UnknownFamily {
            family: family.type_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Records: Send + Sync {}

    #[test]
    fn messages_name_the_capability() {
        let err = ApiError::unknown_capability(CapabilityId::of::<dyn Records>());
        assert!(err.to_string().contains("Records"));

        let err = ApiError::missing_method::<dyn Records>("record_class");
        let message = err.to_string();
        assert!(message.contains("Records"));
        assert!(message.contains("record_class"));
    }

    #[test]
    fn duplicate_registration_message() {
        let err = ApiError::DuplicateRegistration { family: "JavaApi" };
        assert_eq!(err.to_string(), "api family JavaApi is already registered");
    }
}
