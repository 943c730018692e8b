//! Registry of API families.
//!
//! An [`ApiRegistry`] maps each family marker (the root capability, e.g.
//! `dyn JavaApi`) to the [`ApiProvider`] that knows its candidates and how to
//! detect its version. There is no process-wide instance: hosts create one,
//! register their families, and share it (usually as `Arc<ApiRegistry>`) with
//! every [`ApiContext`](crate::context::ApiContext).
//!
//! ```
//! use apilevel_core::ceiling::Candidate;
//! use apilevel_core::context::StaticEnvironment;
//! use apilevel_core::registry::{ApiRegistry, ArtifactProvider};
//! use apilevel_core::version::ApiVersion;
//!
//! trait GuavaApi: Send + Sync {
//!     fn immutable_list(&self) -> &'static str;
//! }
//!
//! struct Guava19;
//!
//! impl GuavaApi for Guava19 {
//!     fn immutable_list(&self) -> &'static str { "com.google.common.collect.ImmutableList" }
//! }
//!
//! let registry = ApiRegistry::new();
//! registry
//!     .register_provider::<dyn GuavaApi>(
//!         ArtifactProvider::new("com.google.guava:guava")
//!             .with_candidate(Candidate::new(|| Guava19).ceiling([19]).provides::<dyn GuavaApi>(|c| c)),
//!     )
//!     .unwrap();
//!
//! let project = StaticEnvironment::new().with_artifact("com.google.guava:guava", [31, 1]);
//! assert_eq!(registry.version::<dyn GuavaApi>(&project), Some(ApiVersion::new([31, 1])));
//! assert_eq!(registry.latest_major_version::<dyn GuavaApi>(), Some(19));
//! ```

use core::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use parking_lot::RwLock;

use crate::capability::{Capability, CapabilityId};
use crate::ceiling::{Candidate, CandidateDescriptor, discover};
use crate::config::ResolutionConfig;
use crate::context::Environment;
use crate::error::{ApiError, ApiResult};
use crate::specification::ApiSpecification;
use crate::version::ApiVersion;

// ─────────────────────────────────────────────────────────────────────────────
// ApiProvider
// ─────────────────────────────────────────────────────────────────────────────

/// Supplies the candidates of one API family and detects its version.
///
/// Any `Fn() -> Vec<Candidate>` is a provider without version detection;
/// such families can only be resolved through pinned versions.
pub trait ApiProvider: Send + Sync + 'static {
    /// Returns the family's candidates, in declaration order.
    fn candidates(&self) -> Vec<Candidate>;

    /// Detects the family's version in `environment`.
    ///
    /// Providers needing more than artifact lookups can downcast the
    /// environment to their concrete probe type.
    fn detect_version(&self, environment: &dyn Environment) -> Option<ApiVersion> {
        let _ = environment;
        None
    }
}

impl<F> ApiProvider for F
where
    F: Fn() -> Vec<Candidate> + Send + Sync + 'static,
{
    fn candidates(&self) -> Vec<Candidate> {
        self()
    }
}

/// Provider detecting its version from one artifact of the environment.
#[derive(Debug, Clone)]
pub struct ArtifactProvider {
    artifact: String,
    candidates: Vec<Candidate>,
}

impl ArtifactProvider {
    /// Creates a provider reading the version of `artifact`.
    #[must_use]
    pub fn new(artifact: impl Into<String>) -> Self {
        Self {
            artifact: artifact.into(),
            candidates: Vec::new(),
        }
    }

    /// Adds a candidate; declaration order is the order of calls.
    #[must_use]
    pub fn with_candidate(mut self, candidate: impl Into<Candidate>) -> Self {
        self.candidates.push(candidate.into());
        self
    }

    /// Returns the artifact name.
    #[must_use]
    pub fn artifact(&self) -> &str {
        &self.artifact
    }
}

impl ApiProvider for ArtifactProvider {
    fn candidates(&self) -> Vec<Candidate> {
        self.candidates.clone()
    }

    fn detect_version(&self, environment: &dyn Environment) -> Option<ApiVersion> {
        environment.artifact_version(&self.artifact)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ApiRegistry
// ─────────────────────────────────────────────────────────────────────────────

struct RegisteredFamily {
    provider: Arc<dyn ApiProvider>,
    candidates: Arc<[CandidateDescriptor]>,
}

/// Registry of API families, keyed by family marker.
#[derive(Default)]
pub struct ApiRegistry {
    families: RwLock<HashMap<CapabilityId, RegisteredFamily>>,
    config: ResolutionConfig,
}

impl fmt::Debug for ApiRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRegistry")
            .field("families", &self.families())
            .field("config", &self.config)
            .finish()
    }
}

impl ApiRegistry {
    /// Creates an empty registry with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry applying `config` to every specification it creates.
    #[must_use]
    pub fn with_config(config: ResolutionConfig) -> Self {
        Self {
            families: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Returns the settings applied to created specifications.
    #[must_use]
    pub fn config(&self) -> &ResolutionConfig {
        &self.config
    }

    /// Registers `provider` for family `M`.
    ///
    /// Candidates are discovered once, here; later calls reuse the sorted
    /// descriptors.
    ///
    /// # Errors
    ///
    /// - [`ApiError::DuplicateRegistration`] if `M` is already registered.
    /// - [`ApiError::MissingCeiling`] if a candidate declares no ceiling.
    /// - [`ApiError::NoCandidates`] if the provider has no candidates.
    pub fn register_provider<M: ?Sized + Capability>(
        &self,
        provider: impl ApiProvider,
    ) -> ApiResult<()> {
        let family = CapabilityId::of::<M>();
        let duplicate = || ApiError::DuplicateRegistration {
            family: family.type_name(),
        };
        if self.families.read().contains_key(&family) {
            return Err(duplicate());
        }

        let candidates: Arc<[CandidateDescriptor]> = discover(provider.candidates())?.into();
        if candidates.is_empty() {
            return Err(ApiError::NoCandidates {
                family: family.type_name(),
            });
        }

        match self.families.write().entry(family) {
            Entry::Occupied(_) => return Err(duplicate()),
            Entry::Vacant(entry) => {
                entry.insert(RegisteredFamily {
                    provider: Arc::new(provider),
                    candidates: Arc::clone(&candidates),
                });
            }
        }

        tracing::debug!(
            family = %family,
            candidates = candidates.len(),
            "registered api family"
        );
        Ok(())
    }

    /// Removes family `M`, returning whether it was registered.
    ///
    /// Specifications created earlier keep working; they own their candidates.
    pub fn unregister_provider<M: ?Sized + Capability>(&self) -> bool {
        let family = CapabilityId::of::<M>();
        let removed = self.families.write().remove(&family).is_some();
        if removed {
            tracing::debug!(family = %family, "unregistered api family");
        }
        removed
    }

    /// Returns true if family `M` is registered.
    #[must_use]
    pub fn is_registered<M: ?Sized + Capability>(&self) -> bool {
        self.families.read().contains_key(&CapabilityId::of::<M>())
    }

    /// Returns the registered families, ordered by name.
    #[must_use]
    pub fn families(&self) -> Vec<CapabilityId> {
        let mut families: Vec<_> = self.families.read().keys().copied().collect();
        families.sort_by_key(|family| family.type_name());
        families
    }

    /// Creates a specification of family `M` for `version`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnknownFamily`] if `M` is not registered.
    pub fn create<M: ?Sized + Capability>(&self, version: ApiVersion) -> ApiResult<ApiSpecification> {
        self.create_for(CapabilityId::of::<M>(), version)
    }

    /// Creates a specification of `family` for `version`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnknownFamily`] if `family` is not registered.
    pub fn create_for(&self, family: CapabilityId, version: ApiVersion) -> ApiResult<ApiSpecification> {
        let candidates = self
            .families
            .read()
            .get(&family)
            .map(|registered| Arc::clone(&registered.candidates))
            .ok_or_else(|| ApiError::unknown_family(family))?;
        ApiSpecification::from_descriptors(family, candidates, version, self.config)
    }

    /// Detects the version of family `M` in `environment`.
    #[must_use]
    pub fn version<M: ?Sized + Capability>(&self, environment: &dyn Environment) -> Option<ApiVersion> {
        self.version_for(CapabilityId::of::<M>(), environment)
    }

    /// Detects the version of `family` in `environment`.
    #[must_use]
    pub fn version_for(&self, family: CapabilityId, environment: &dyn Environment) -> Option<ApiVersion> {
        let provider = self
            .families
            .read()
            .get(&family)
            .map(|registered| Arc::clone(&registered.provider))?;
        let version = provider.detect_version(environment);
        tracing::trace!(
            family = %family,
            version = ?version.as_ref().map(ToString::to_string),
            "detected api version"
        );
        version
    }

    /// Returns the highest major version among the ceilings of family `M`.
    #[must_use]
    pub fn latest_major_version<M: ?Sized + Capability>(&self) -> Option<u32> {
        self.families
            .read()
            .get(&CapabilityId::of::<M>())?
            .candidates
            .iter()
            .map(|candidate| candidate.ceiling().major())
            .max()
    }

    /// Returns every candidate of family `M`, sorted by reach.
    #[must_use]
    pub fn all_known<M: ?Sized + Capability>(&self) -> Vec<CandidateDescriptor> {
        self.families
            .read()
            .get(&CapabilityId::of::<M>())
            .map(|registered| registered.candidates.to_vec())
            .unwrap_or_default()
    }

    /// Returns the family resolving `capability`.
    ///
    /// A family marker resolves to itself. Otherwise the family whose
    /// candidates provide `capability` is returned; if several do, the one
    /// with the smallest name wins.
    #[must_use]
    pub fn family_of(&self, capability: CapabilityId) -> Option<CapabilityId> {
        let families = self.families.read();
        if families.contains_key(&capability) {
            return Some(capability);
        }
        families
            .iter()
            .filter(|(_, registered)| {
                registered
                    .candidates
                    .iter()
                    .any(|candidate| candidate.provides(capability))
            })
            .map(|(family, _)| *family)
            .min_by_key(|family| family.type_name())
    }
}
