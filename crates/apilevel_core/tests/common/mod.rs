//! Shared fixtures for `apilevel_core` integration tests.
//!
//! Two families are modelled:
//!
//! - **Java** (`dyn JavaApi`), ceilings {8, 11, 13}. `Java11` and `Java13`
//!   both implement [`Java11Line`], whose provided methods hold the
//!   ceiling-11 behaviour; `Java13` overrides only its release. Narrowed
//!   capabilities `dyn Records` and `dyn Modules` are declared by subsets.
//! - **Scout** (`dyn ScoutApi`), ceilings {3, 4.3, 4}, exercising nested
//!   release lines.

#![allow(
    dead_code,
    reason = "shared fixtures, not all items used in every test binary"
)]

use std::sync::Arc;

use apilevel_core::ceiling::{Candidate, MaxApiLevel};
use apilevel_core::context::StaticEnvironment;
use apilevel_core::dump::{Dump, Snapshot};
use apilevel_core::error::{ApiError, ApiResult};
use apilevel_core::registry::{ApiRegistry, ArtifactProvider};
use apilevel_core::specification::ApiSpecification;
use apilevel_core::version::ApiVersion;

/// Artifact the Java family detects its version from.
pub const JAVA_ARTIFACT: &str = "java";

/// Artifact the Scout family detects its version from.
pub const SCOUT_ARTIFACT: &str = "scout";

// ─────────────────────────────────────────────────────────────────────────────
// Java family
// ─────────────────────────────────────────────────────────────────────────────

/// Root capability of the Java family.
pub trait JavaApi: Dump + Send + Sync {
    /// Release line of the candidate that answered.
    fn release(&self) -> u32;

    /// Class of the built-in HTTP client, if the release ships one.
    fn http_client(&self) -> Option<&'static str> {
        None
    }
}

/// Narrowed capability: record support.
pub trait Records: Send + Sync {
    /// Release line of the candidate that answered.
    fn release(&self) -> u32;

    /// Fully qualified record base class.
    fn record_class(&self) -> ApiResult<&'static str> {
        Err(ApiError::missing_method::<dyn Records>("record_class"))
    }
}

/// Narrowed capability: module system.
pub trait Modules: Send + Sync {
    /// Release line of the candidate that answered.
    fn release(&self) -> u32;
}

#[derive(Default, MaxApiLevel)]
#[api_level(max = "8")]
pub struct Java8;

#[derive(Default, MaxApiLevel)]
#[api_level(max = "11")]
pub struct Java11;

#[derive(Default, MaxApiLevel)]
#[api_level(max = "13")]
pub struct Java13;

/// The release line starting at ceiling 11.
///
/// Candidates on this line override only what changed; every other method
/// answers with the provided ceiling-11 behaviour.
pub trait Java11Line: Dump + Send + Sync {
    fn release(&self) -> u32 {
        11
    }

    fn http_client(&self) -> Option<&'static str> {
        Some("java.net.http.HttpClient")
    }
}

impl<T: Java11Line> JavaApi for T {
    fn release(&self) -> u32 {
        Java11Line::release(self)
    }

    fn http_client(&self) -> Option<&'static str> {
        Java11Line::http_client(self)
    }
}

impl JavaApi for Java8 {
    fn release(&self) -> u32 {
        8
    }
}

impl Java11Line for Java11 {}

impl Java11Line for Java13 {
    fn release(&self) -> u32 {
        13
    }
}

fn dump_java(java: &dyn JavaApi, snapshot: &mut Snapshot) {
    snapshot
        .insert("release", java.release())
        .insert("http_client", java.http_client());
}

impl Dump for Java8 {
    fn dump(&self, snapshot: &mut Snapshot) {
        dump_java(self, snapshot);
    }
}

impl Dump for Java11 {
    fn dump(&self, snapshot: &mut Snapshot) {
        dump_java(self, snapshot);
    }
}

impl Dump for Java13 {
    fn dump(&self, snapshot: &mut Snapshot) {
        dump_java(self, snapshot);
    }
}

// Records: declared by 8 (no record class) and 13.
impl Records for Java8 {
    fn release(&self) -> u32 {
        8
    }
}

impl Records for Java13 {
    fn release(&self) -> u32 {
        13
    }

    fn record_class(&self) -> ApiResult<&'static str> {
        Ok("java.lang.Record")
    }
}

// Modules: declared by 11 only.
impl Modules for Java11 {
    fn release(&self) -> u32 {
        11
    }
}

/// Java candidates in declaration order 8, 11, 13.
pub fn java_candidates() -> Vec<Candidate> {
    vec![
        Candidate::of::<Java8>()
            .provides::<dyn JavaApi>(|c| c)
            .provides::<dyn Records>(|c| c)
            .build(),
        Candidate::of::<Java11>()
            .provides::<dyn JavaApi>(|c| c)
            .provides::<dyn Modules>(|c| c)
            .build(),
        Candidate::of::<Java13>()
            .provides::<dyn JavaApi>(|c| c)
            .provides::<dyn Records>(|c| c)
            .build(),
    ]
}

/// Java specification for `version`.
pub fn java_spec(version: &str) -> ApiSpecification {
    ApiSpecification::create::<dyn JavaApi>(java_candidates(), v(version))
        .expect("java candidates are valid")
}

// ─────────────────────────────────────────────────────────────────────────────
// Scout family
// ─────────────────────────────────────────────────────────────────────────────

/// Root capability of the Scout family.
pub trait ScoutApi: Send + Sync {
    /// Ceiling of the candidate that answered, as text.
    fn line(&self) -> &'static str;
}

#[derive(Default, MaxApiLevel)]
#[api_level(max = "3")]
pub struct Scout3;

#[derive(Default, MaxApiLevel)]
#[api_level(max = "4.3")]
pub struct Scout43;

#[derive(Default, MaxApiLevel)]
#[api_level(max = "4")]
pub struct Scout4;

impl ScoutApi for Scout3 {
    fn line(&self) -> &'static str {
        "3"
    }
}

impl ScoutApi for Scout43 {
    fn line(&self) -> &'static str {
        "4.3"
    }
}

impl ScoutApi for Scout4 {
    fn line(&self) -> &'static str {
        "4"
    }
}

/// Scout candidates, deliberately declared out of order.
pub fn scout_candidates() -> Vec<Candidate> {
    vec![
        Candidate::of::<Scout4>().provides::<dyn ScoutApi>(|c| c).build(),
        Candidate::of::<Scout3>().provides::<dyn ScoutApi>(|c| c).build(),
        Candidate::of::<Scout43>().provides::<dyn ScoutApi>(|c| c).build(),
    ]
}

/// Scout specification for `version`.
pub fn scout_spec(version: &str) -> ApiSpecification {
    ApiSpecification::create::<dyn ScoutApi>(scout_candidates(), v(version))
        .expect("scout candidates are valid")
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Registry with both families registered against their artifacts.
pub fn registry() -> Arc<ApiRegistry> {
    let registry = ApiRegistry::new();
    registry
        .register_provider::<dyn JavaApi>(java_provider())
        .expect("java registers");
    registry
        .register_provider::<dyn ScoutApi>(
            scout_candidates()
                .into_iter()
                .fold(ArtifactProvider::new(SCOUT_ARTIFACT), |provider, candidate| {
                    provider.with_candidate(candidate)
                }),
        )
        .expect("scout registers");
    Arc::new(registry)
}

/// Java provider reading [`JAVA_ARTIFACT`].
pub fn java_provider() -> ArtifactProvider {
    java_candidates()
        .into_iter()
        .fold(ArtifactProvider::new(JAVA_ARTIFACT), |provider, candidate| {
            provider.with_candidate(candidate)
        })
}

/// Environment with the given Java and Scout versions.
pub fn environment(java: &str, scout: &str) -> StaticEnvironment {
    StaticEnvironment::new()
        .with_artifact(JAVA_ARTIFACT, v(java))
        .with_artifact(SCOUT_ARTIFACT, v(scout))
}

/// Parses a version, panicking on malformed input.
pub fn v(input: &str) -> ApiVersion {
    input.parse().expect("valid version")
}
