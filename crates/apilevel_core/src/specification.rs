//! Candidate selection and facade composition.
//!
//! An [`ApiSpecification`] binds one candidate set to one target version and
//! hands out facades (`Arc<dyn Trait>`) for the capabilities those candidates
//! provide.
//!
//! # Selection
//!
//! Candidates are ordered by how far their ceiling reaches (see
//! [`ApiVersion::cmp_reach`]). For a target version the winner is:
//!
//! 1. a candidate whose ceiling is the same level as the version (suffixes
//!    ignored), otherwise
//! 2. the first candidate whose ceiling [`covers`](ApiVersion::covers) the
//!    version. When the version is older than every ceiling this is the
//!    oldest candidate, otherwise
//! 3. the candidate reaching furthest, when the version is newer than
//!    everything known.
//!
//! Selection is total: out-of-range versions fall back instead of failing, so
//! generation keeps working against too-old or too-new environments. Each
//! fallback is logged at [`ResolutionConfig::fallback_level`].
//!
//! # Narrowing
//!
//! Every requested capability is selected independently, over only the
//! candidates that declared it. Resolving a sub-capability therefore picks the
//! same candidate whether or not the family's root capability was resolved
//! first.
//!
//! # Example
//!
//! ```
//! use apilevel_core::ceiling::Candidate;
//! use apilevel_core::specification::ApiSpecification;
//! use apilevel_core::version::ApiVersion;
//!
//! trait JavaApi: Send + Sync {
//!     fn switch_expressions(&self) -> bool;
//! }
//!
//! struct Java11;
//! struct Java14;
//!
//! impl JavaApi for Java11 {
//!     fn switch_expressions(&self) -> bool { false }
//! }
//!
//! impl JavaApi for Java14 {
//!     fn switch_expressions(&self) -> bool { true }
//! }
//!
//! let candidates = [
//!     Candidate::new(|| Java11).ceiling([11]).provides::<dyn JavaApi>(|c| c).build(),
//!     Candidate::new(|| Java14).ceiling([14]).provides::<dyn JavaApi>(|c| c).build(),
//! ];
//!
//! let spec = ApiSpecification::create::<dyn JavaApi>(candidates, ApiVersion::new([17])).unwrap();
//! let java = spec.require_api::<dyn JavaApi>().unwrap();
//!
//! assert!(java.switch_expressions());
//! assert_eq!(spec.max_level(), &ApiVersion::new([14]));
//! ```

use core::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::capability::{Capability, CapabilityId};
use crate::ceiling::{Candidate, CandidateDescriptor, ErasedFacade, ErasedInstance, discover};
use crate::config::{FallbackLevel, ResolutionConfig, TieBreak};
use crate::dump::{Dump, Snapshot};
use crate::error::{ApiError, ApiResult};
use crate::function::ApiResolver;
use crate::version::ApiVersion;

// ─────────────────────────────────────────────────────────────────────────────
// Selection
// ─────────────────────────────────────────────────────────────────────────────

/// How a candidate was chosen for a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    /// The ceiling is the same level as the version.
    Exact,
    /// The ceiling covers the version.
    Covered,
    /// The version is older than every ceiling; the oldest candidate was used.
    OlderThanKnown,
    /// The version is newer than every ceiling; the newest candidate was used.
    NewerThanKnown,
}

impl SelectionKind {
    /// Returns true if the version lies outside the known range.
    #[must_use]
    pub fn is_fallback(self) -> bool {
        matches!(self, Self::OlderThanKnown | Self::NewerThanKnown)
    }
}

/// Outcome of selecting among sorted candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Selection {
    /// Index into the sorted candidate slice.
    pub(crate) index: usize,
    pub(crate) kind: SelectionKind,
}

/// Selects a candidate for `version` among `candidates` (sorted by reach).
///
/// Only candidates providing `capability` are eligible; `None` considers all.
/// Returns `None` only if no candidate is eligible.
pub(crate) fn select(
    candidates: &[CandidateDescriptor],
    version: &ApiVersion,
    capability: Option<CapabilityId>,
    tie_break: TieBreak,
) -> Option<Selection> {
    let eligible: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, candidate)| capability.is_none_or(|id| candidate.provides(id)))
        .map(|(index, _)| index)
        .collect();

    let oldest = *eligible.first()?;
    let newest = *eligible.last()?;

    let exact = eligible
        .iter()
        .copied()
        .find(|&index| candidates[index].ceiling().is_same_level(version));
    let covering = || {
        eligible
            .iter()
            .copied()
            .find(|&index| candidates[index].ceiling().covers(version))
    };

    let older_than_known = || {
        eligible
            .iter()
            .all(|&index| version.cmp_level(candidates[index].ceiling()).is_lt())
    };

    let selection = match exact {
        Some(index) => Selection {
            index,
            kind: SelectionKind::Exact,
        },
        None => match covering() {
            Some(index) if index == oldest && older_than_known() => Selection {
                index,
                kind: SelectionKind::OlderThanKnown,
            },
            Some(index) => Selection {
                index,
                kind: SelectionKind::Covered,
            },
            None => Selection {
                index: newest,
                kind: SelectionKind::NewerThanKnown,
            },
        },
    };

    Some(Selection {
        index: break_tie(candidates, &eligible, selection.index, tie_break),
        ..selection
    })
}

/// Applies `tie_break` among eligible candidates declaring the same ceiling as `chosen`.
fn break_tie(
    candidates: &[CandidateDescriptor],
    eligible: &[usize],
    chosen: usize,
    tie_break: TieBreak,
) -> usize {
    let ceiling = candidates[chosen].ceiling();
    let tied = eligible
        .iter()
        .copied()
        .filter(|&index| candidates[index].ceiling().cmp_reach(ceiling).is_eq());

    let winner = match tie_break {
        TieBreak::FirstDeclared => tied.min_by_key(|&index| candidates[index].declaration_order()),
        TieBreak::LastDeclared => tied.max_by_key(|&index| candidates[index].declaration_order()),
    };
    winner.unwrap_or(chosen)
}

/// Logs an out-of-range fallback at the configured level.
fn log_fallback(
    level: FallbackLevel,
    family: CapabilityId,
    capability: CapabilityId,
    version: &ApiVersion,
    candidate: &CandidateDescriptor,
    kind: SelectionKind,
) {
    macro_rules! fallback_event {
        ($level:expr) => {
            tracing::event!(
                $level,
                family = %family,
                capability = %capability,
                version = %version,
                candidate = candidate.name(),
                ceiling = %candidate.ceiling(),
                kind = ?kind,
                "version outside known api range, falling back"
            )
        };
    }

    match level {
        FallbackLevel::Off => {}
        FallbackLevel::Trace => fallback_event!(tracing::Level::TRACE),
        FallbackLevel::Debug => fallback_event!(tracing::Level::DEBUG),
        FallbackLevel::Info => fallback_event!(tracing::Level::INFO),
        FallbackLevel::Warn => fallback_event!(tracing::Level::WARN),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ApiSpecification
// ─────────────────────────────────────────────────────────────────────────────

/// A cached resolution of one capability.
struct Resolution {
    candidate: usize,
    /// Holds an `Arc<C>` for the capability this resolution is keyed by.
    facade: ErasedFacade,
}

/// A candidate set bound to a target version.
///
/// Resolution is cached per requested capability, so repeated calls are
/// idempotent and return the same `Arc`. Racing first resolutions may build
/// a facade redundantly; the first one stored is what every caller gets.
pub struct ApiSpecification {
    family: CapabilityId,
    version: ApiVersion,
    config: ResolutionConfig,
    candidates: Arc<[CandidateDescriptor]>,
    primary: Selection,
    // One instance per selected candidate, shared by all its facades.
    instances: RwLock<HashMap<usize, ErasedInstance>>,
    resolved: RwLock<HashMap<CapabilityId, Resolution>>,
}

impl ApiSpecification {
    /// Creates a specification for family `M` from `candidates`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingCeiling`] if a candidate declares no
    /// ceiling and [`ApiError::NoCandidates`] if `candidates` is empty.
    pub fn create<M: ?Sized + Capability>(
        candidates: impl IntoIterator<Item = Candidate>,
        version: ApiVersion,
    ) -> ApiResult<Self> {
        Self::create_with_config::<M>(candidates, version, ResolutionConfig::default())
    }

    /// Like [`create`](Self::create), with explicit settings.
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create).
    pub fn create_with_config<M: ?Sized + Capability>(
        candidates: impl IntoIterator<Item = Candidate>,
        version: ApiVersion,
        config: ResolutionConfig,
    ) -> ApiResult<Self> {
        let descriptors: Arc<[CandidateDescriptor]> = discover(candidates)?.into();
        Self::from_descriptors(CapabilityId::of::<M>(), descriptors, version, config)
    }

    /// Creates a specification from already discovered, sorted descriptors.
    pub(crate) fn from_descriptors(
        family: CapabilityId,
        candidates: Arc<[CandidateDescriptor]>,
        version: ApiVersion,
        config: ResolutionConfig,
    ) -> ApiResult<Self> {
        let primary = select(&candidates, &version, Some(family), config.tie_break)
            .or_else(|| select(&candidates, &version, None, config.tie_break))
            .ok_or(ApiError::NoCandidates {
                family: family.type_name(),
            })?;

        let winner = &candidates[primary.index];
        tracing::debug!(
            family = %family,
            version = %version,
            candidate = winner.name(),
            max_level = %winner.ceiling(),
            "created api specification"
        );
        if primary.kind.is_fallback() {
            log_fallback(config.fallback_level, family, family, &version, winner, primary.kind);
        }

        Ok(Self {
            family,
            version,
            config,
            candidates,
            primary,
            instances: RwLock::new(HashMap::new()),
            resolved: RwLock::new(HashMap::new()),
        })
    }

    /// Returns the family this specification was created for.
    #[must_use]
    pub fn family(&self) -> CapabilityId {
        self.family
    }

    /// Returns the target version.
    #[must_use]
    pub fn version(&self) -> &ApiVersion {
        &self.version
    }

    /// Returns the settings in effect.
    #[must_use]
    pub fn config(&self) -> &ResolutionConfig {
        &self.config
    }

    /// Returns the ceiling of the candidate serving the family marker.
    #[must_use]
    pub fn max_level(&self) -> &ApiVersion {
        self.candidates[self.primary.index].ceiling()
    }

    /// Returns the candidate serving the family marker.
    ///
    /// Falls back to selection over every candidate when none provides the marker.
    #[must_use]
    pub fn selected(&self) -> &CandidateDescriptor {
        &self.candidates[self.primary.index]
    }

    /// Returns how the family's candidate was selected.
    #[must_use]
    pub fn selection_kind(&self) -> SelectionKind {
        self.primary.kind
    }

    /// Returns all candidates, sorted by reach.
    #[must_use]
    pub fn candidates(&self) -> &[CandidateDescriptor] {
        &self.candidates
    }

    /// Returns the candidate that serves (or would serve) capability `C`.
    #[must_use]
    pub fn selected_for<C: ?Sized + Capability>(&self) -> Option<&CandidateDescriptor> {
        let capability = CapabilityId::of::<C>();
        let cached = self
            .resolved
            .read()
            .get(&capability)
            .map(|resolution| resolution.candidate);
        let index = match cached {
            Some(index) => index,
            None => select(&self.candidates, &self.version, Some(capability), self.config.tie_break)?.index,
        };
        Some(&self.candidates[index])
    }

    /// Resolves capability `C`, returning `None` if no candidate provides it.
    #[must_use]
    pub fn api<C: ?Sized + Capability>(&self) -> Option<Arc<C>> {
        self.require_api::<C>().ok()
    }

    /// Resolves capability `C`.
    ///
    /// Versions outside the known range never fail; they fall back to the
    /// oldest or newest candidate providing `C`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnknownCapability`] if no candidate provides `C`.
    pub fn require_api<C: ?Sized + Capability>(&self) -> ApiResult<Arc<C>> {
        let capability = CapabilityId::of::<C>();

        if let Some(facade) = self.cached::<C>(capability) {
            return Ok(facade);
        }

        let selection = select(&self.candidates, &self.version, Some(capability), self.config.tie_break)
            .ok_or_else(|| ApiError::unknown_capability(capability))?;
        let candidate = &self.candidates[selection.index];

        let facade = candidate
            .upcast(capability, self.instance(selection.index))
            .filter(|facade| facade.is::<Arc<C>>())
            .ok_or_else(|| ApiError::unknown_capability(capability))?;

        tracing::debug!(
            family = %self.family,
            capability = %capability,
            version = %self.version,
            candidate = candidate.name(),
            ceiling = %candidate.ceiling(),
            kind = ?selection.kind,
            "resolved api"
        );
        if selection.kind.is_fallback() && capability != self.family {
            log_fallback(
                self.config.fallback_level,
                self.family,
                capability,
                &self.version,
                candidate,
                selection.kind,
            );
        }

        let mut resolved = self.resolved.write();
        let resolution = resolved.entry(capability).or_insert(Resolution {
            candidate: selection.index,
            facade,
        });
        resolution
            .facade
            .downcast_ref::<Arc<C>>()
            .cloned()
            .ok_or_else(|| ApiError::unknown_capability(capability))
    }

    /// Returns the snapshot of the facade for capability `C`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnknownCapability`] if no candidate provides `C`.
    pub fn dump<C: ?Sized + Capability + Dump>(&self) -> ApiResult<Snapshot> {
        let facade = self.require_api::<C>()?;
        Ok(crate::dump::dump(&*facade))
    }

    /// Returns the cached facade for `capability`, if resolved before.
    fn cached<C: ?Sized + Capability>(&self, capability: CapabilityId) -> Option<Arc<C>> {
        self.resolved
            .read()
            .get(&capability)
            .and_then(|resolution| resolution.facade.downcast_ref::<Arc<C>>().cloned())
    }

    /// Returns the shared instance of the candidate at `index`, creating it on first use.
    fn instance(&self, index: usize) -> ErasedInstance {
        if let Some(instance) = self.instances.read().get(&index) {
            return Arc::clone(instance);
        }
        let fresh = self.candidates[index].instantiate();
        Arc::clone(self.instances.write().entry(index).or_insert(fresh))
    }
}

impl ApiResolver for ApiSpecification {
    fn resolve<C: ?Sized + Capability>(&self) -> ApiResult<Arc<C>> {
        self.require_api::<C>()
    }
}

impl fmt::Display for ApiSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (max level {} via {})",
            self.family,
            self.version,
            self.max_level(),
            self.selected().name()
        )
    }
}

impl fmt::Debug for ApiSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSpecification")
            .field("family", &self.family)
            .field("version", &self.version.to_string())
            .field("max_level", &self.max_level().to_string())
            .field("selected", &self.selected().name())
            .field("candidates", &self.candidates.len())
            .finish_non_exhaustive()
    }
}
