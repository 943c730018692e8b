//! Per-run resolution context.
//!
//! An [`ApiContext`] binds a shared [`ApiRegistry`] to the environment being
//! generated for. It detects each family's version once, keeps one
//! [`ApiSpecification`] per family and answers capability requests from any
//! registered family.
//!
//! ```
//! use std::sync::Arc;
//!
//! use apilevel_core::ceiling::Candidate;
//! use apilevel_core::context::{ApiContext, StaticEnvironment};
//! use apilevel_core::registry::{ApiRegistry, ArtifactProvider};
//!
//! trait JavaApi: Send + Sync {
//!     fn has_records(&self) -> bool;
//! }
//!
//! struct Java11;
//! struct Java16;
//!
//! impl JavaApi for Java11 {
//!     fn has_records(&self) -> bool { false }
//! }
//!
//! impl JavaApi for Java16 {
//!     fn has_records(&self) -> bool { true }
//! }
//!
//! let registry = Arc::new(ApiRegistry::new());
//! registry
//!     .register_provider::<dyn JavaApi>(
//!         ArtifactProvider::new("java")
//!             .with_candidate(Candidate::new(|| Java11).ceiling([11]).provides::<dyn JavaApi>(|c| c))
//!             .with_candidate(Candidate::new(|| Java16).ceiling([16]).provides::<dyn JavaApi>(|c| c)),
//!     )
//!     .unwrap();
//!
//! let context = ApiContext::new(Arc::clone(&registry))
//!     .with_environment(StaticEnvironment::new().with_artifact("java", [17]));
//! assert!(context.require_api::<dyn JavaApi>().unwrap().has_records());
//!
//! let pinned = ApiContext::new(registry).with_version::<dyn JavaApi>([11]);
//! assert!(!pinned.require_api::<dyn JavaApi>().unwrap().has_records());
//! ```

use core::fmt;
use std::sync::Arc;

use downcast_rs::{DowncastSync, impl_downcast};
use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::capability::{Capability, CapabilityId};
use crate::error::{ApiError, ApiResult};
use crate::function::ApiResolver;
use crate::registry::ApiRegistry;
use crate::specification::ApiSpecification;
use crate::version::ApiVersion;

// ─────────────────────────────────────────────────────────────────────────────
// Environment
// ─────────────────────────────────────────────────────────────────────────────

/// Probe of the environment code is generated for.
///
/// Providers detect versions through it, either by artifact name or by
/// downcasting to the host's concrete probe type:
///
/// ```
/// use apilevel_core::context::Environment;
/// use apilevel_core::version::ApiVersion;
///
/// struct Toolchain {
///     release: u32,
/// }
///
/// impl Environment for Toolchain {}
///
/// let environment: &dyn Environment = &Toolchain { release: 21 };
/// let release = environment.downcast_ref::<Toolchain>().map(|t| ApiVersion::new([t.release]));
/// assert_eq!(release, Some(ApiVersion::new([21])));
/// ```
pub trait Environment: DowncastSync {
    /// Returns the version of `artifact`, if the environment contains it.
    fn artifact_version(&self, artifact: &str) -> Option<ApiVersion> {
        let _ = artifact;
        None
    }
}

impl_downcast!(sync Environment);

/// Environment backed by a fixed artifact → version map.
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    artifacts: HashMap<String, ApiVersion>,
}

impl StaticEnvironment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `artifact` at `version`.
    #[must_use]
    pub fn with_artifact(mut self, artifact: impl Into<String>, version: impl Into<ApiVersion>) -> Self {
        self.insert(artifact, version);
        self
    }

    /// Adds or replaces `artifact`.
    pub fn insert(&mut self, artifact: impl Into<String>, version: impl Into<ApiVersion>) {
        self.artifacts.insert(artifact.into(), version.into());
    }

    /// Returns the number of artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Returns true if no artifact is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl Environment for StaticEnvironment {
    fn artifact_version(&self, artifact: &str) -> Option<ApiVersion> {
        self.artifacts.get(artifact).cloned()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ApiContext
// ─────────────────────────────────────────────────────────────────────────────

/// Registry plus environment: resolves capabilities of every registered family.
pub struct ApiContext {
    registry: Arc<ApiRegistry>,
    environment: Option<Arc<dyn Environment>>,
    pinned: HashMap<CapabilityId, ApiVersion>,
    specifications: RwLock<HashMap<CapabilityId, Arc<ApiSpecification>>>,
}

impl ApiContext {
    /// Creates a context without environment.
    ///
    /// Only pinned families resolve until an environment is bound.
    #[must_use]
    pub fn new(registry: Arc<ApiRegistry>) -> Self {
        Self {
            registry,
            environment: None,
            pinned: HashMap::new(),
            specifications: RwLock::new(HashMap::new()),
        }
    }

    /// Binds `environment`, replacing any bound before.
    #[must_use]
    pub fn with_environment(self, environment: impl Environment) -> Self {
        self.with_shared_environment(Arc::new(environment))
    }

    /// Binds a shared environment, replacing any bound before.
    #[must_use]
    pub fn with_shared_environment(mut self, environment: Arc<dyn Environment>) -> Self {
        self.environment = Some(environment);
        self.specifications.get_mut().clear();
        self
    }

    /// Pins family `M` to `version`, bypassing detection.
    #[must_use]
    pub fn with_version<M: ?Sized + Capability>(mut self, version: impl Into<ApiVersion>) -> Self {
        let family = CapabilityId::of::<M>();
        self.pinned.insert(family, version.into());
        self.specifications.get_mut().remove(&family);
        self
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ApiRegistry> {
        &self.registry
    }

    /// Returns the bound environment.
    #[must_use]
    pub fn environment(&self) -> Option<&dyn Environment> {
        self.environment.as_deref()
    }

    /// Returns the version family `M` resolves at.
    ///
    /// # Errors
    ///
    /// See [`require_api`](Self::require_api).
    pub fn version<M: ?Sized + Capability>(&self) -> ApiResult<ApiVersion> {
        let family = CapabilityId::of::<M>();
        self.version_for(family, family)
    }

    /// Returns the specification of family `M`, creating it on first use.
    ///
    /// # Errors
    ///
    /// See [`require_api`](Self::require_api).
    pub fn specification<M: ?Sized + Capability>(&self) -> ApiResult<Arc<ApiSpecification>> {
        let family = CapabilityId::of::<M>();
        self.specification_for(family, family)
    }

    /// Resolves capability `C`, returning `None` on any failure.
    #[must_use]
    pub fn api<C: ?Sized + Capability>(&self) -> Option<Arc<C>> {
        self.require_api::<C>().ok()
    }

    /// Resolves capability `C`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::UnknownCapability`] if no registered family provides `C`.
    /// - [`ApiError::MissingEnvironment`] if the family is not pinned and no
    ///   environment is bound.
    /// - [`ApiError::UndetectedVersion`] if the environment does not reveal the
    ///   family's version.
    pub fn require_api<C: ?Sized + Capability>(&self) -> ApiResult<Arc<C>> {
        let capability = CapabilityId::of::<C>();
        let family = self
            .registry
            .family_of(capability)
            .ok_or_else(|| ApiError::unknown_capability(capability))?;
        self.specification_for(family, capability)?.require_api::<C>()
    }

    fn version_for(&self, family: CapabilityId, requested: CapabilityId) -> ApiResult<ApiVersion> {
        if let Some(version) = self.pinned.get(&family) {
            return Ok(version.clone());
        }
        let environment = self
            .environment
            .as_deref()
            .ok_or(ApiError::MissingEnvironment {
                capability: requested.type_name(),
            })?;
        self.registry
            .version_for(family, environment)
            .ok_or(ApiError::UndetectedVersion {
                family: family.type_name(),
            })
    }

    fn specification_for(
        &self,
        family: CapabilityId,
        requested: CapabilityId,
    ) -> ApiResult<Arc<ApiSpecification>> {
        if let Some(specification) = self.specifications.read().get(&family) {
            return Ok(Arc::clone(specification));
        }

        let version = self.version_for(family, requested)?;
        let specification = Arc::new(self.registry.create_for(family, version)?);
        tracing::debug!(specification = %specification, "bound api family");

        let mut specifications = self.specifications.write();
        Ok(Arc::clone(specifications.entry(family).or_insert(specification)))
    }
}

impl ApiResolver for ApiContext {
    fn resolve<C: ?Sized + Capability>(&self) -> ApiResult<Arc<C>> {
        self.require_api::<C>()
    }
}

impl fmt::Debug for ApiContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pinned: Vec<_> = self
            .pinned
            .iter()
            .map(|(family, version)| format!("{family}={version}"))
            .collect();
        pinned.sort();
        f.debug_struct("ApiContext")
            .field("registry", &self.registry)
            .field("has_environment", &self.environment.is_some())
            .field("pinned", &pinned)
            .field("specifications", &self.specifications.read().len())
            .finish()
    }
}
