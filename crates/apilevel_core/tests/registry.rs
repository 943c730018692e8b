//! Family registration, detection and lookup.

mod common;

use apilevel_core::capability::CapabilityId;
use apilevel_core::ceiling::Candidate;
use apilevel_core::error::ApiError;
use apilevel_core::registry::ApiRegistry;
use common::{JavaApi, Modules, Records, ScoutApi, environment, java_candidates, java_provider, registry, v};

#[test]
fn register_then_unregister_leaves_no_state() {
    let registry = ApiRegistry::new();
    registry.register_provider::<dyn JavaApi>(java_provider()).unwrap();
    assert!(registry.is_registered::<dyn JavaApi>());

    assert!(registry.unregister_provider::<dyn JavaApi>());
    assert!(!registry.is_registered::<dyn JavaApi>());
    assert!(registry.families().is_empty());
    assert!(registry.all_known::<dyn JavaApi>().is_empty());
    assert_eq!(registry.latest_major_version::<dyn JavaApi>(), None);
    assert_eq!(registry.family_of(CapabilityId::of::<dyn Records>()), None);
    assert!(matches!(
        registry.create::<dyn JavaApi>(v("11")),
        Err(ApiError::UnknownFamily { .. })
    ));

    // The family can be registered again afterwards.
    registry.register_provider::<dyn JavaApi>(java_provider()).unwrap();
}

#[test]
fn second_registration_is_rejected() {
    let registry = registry();
    let err = registry.register_provider::<dyn JavaApi>(java_candidates).unwrap_err();
    assert_eq!(
        err,
        ApiError::DuplicateRegistration {
            family: CapabilityId::of::<dyn JavaApi>().type_name(),
        }
    );
    // The original provider still answers.
    assert_eq!(registry.version::<dyn JavaApi>(&environment("17", "4")), Some(v("17")));
}

#[test]
fn candidate_without_ceiling_is_rejected() {
    struct Bare;
    impl JavaApi for Bare {
        fn release(&self) -> u32 {
            0
        }
    }
    impl apilevel_core::dump::Dump for Bare {
        fn dump(&self, _snapshot: &mut apilevel_core::dump::Snapshot) {}
    }

    let registry = ApiRegistry::new();
    let err = registry
        .register_provider::<dyn JavaApi>(|| {
            vec![
                Candidate::new(|| Bare)
                    .named("Bare")
                    .provides::<dyn JavaApi>(|c| c)
                    .build(),
            ]
        })
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::MissingCeiling {
            candidate: "Bare".to_string()
        }
    );
    assert!(!registry.is_registered::<dyn JavaApi>());
}

#[test]
fn latest_major_version_is_highest_ceiling() {
    let registry = registry();
    assert_eq!(registry.latest_major_version::<dyn JavaApi>(), Some(13));
    assert_eq!(registry.latest_major_version::<dyn ScoutApi>(), Some(4));
}

#[test]
fn all_known_lists_sorted_candidates() {
    let registry = registry();
    let ceilings: Vec<_> = registry
        .all_known::<dyn ScoutApi>()
        .iter()
        .map(|candidate| candidate.ceiling().to_string())
        .collect();
    assert_eq!(ceilings, ["3", "4.3", "4"]);
    assert_eq!(registry.all_known::<dyn JavaApi>().len(), 3);
}

#[test]
fn family_of_finds_declaring_family() {
    let registry = registry();
    let java = CapabilityId::of::<dyn JavaApi>();
    assert_eq!(registry.family_of(java), Some(java));
    assert_eq!(registry.family_of(CapabilityId::of::<dyn Records>()), Some(java));
    assert_eq!(registry.family_of(CapabilityId::of::<dyn Modules>()), Some(java));
    assert_eq!(
        registry.family_of(CapabilityId::of::<dyn ScoutApi>()),
        Some(CapabilityId::of::<dyn ScoutApi>())
    );
}

#[test]
fn version_is_detected_per_family() {
    let registry = registry();
    let environment = environment("11.0.2", "4.3");
    assert_eq!(registry.version::<dyn JavaApi>(&environment), Some(v("11.0.2")));
    assert_eq!(registry.version::<dyn ScoutApi>(&environment), Some(v("4.3")));
}

#[test]
fn created_specification_outlives_unregistration() {
    let registry = registry();
    let spec = registry.create::<dyn JavaApi>(v("12")).unwrap();
    assert!(registry.unregister_provider::<dyn JavaApi>());
    assert_eq!(spec.require_api::<dyn JavaApi>().unwrap().release(), 13);
}

#[test]
fn families_are_listed_by_name() {
    let registry = registry();
    let names: Vec<_> = registry.families().iter().map(|f| f.type_name()).collect();
    assert_eq!(names.len(), 2);
    assert!(names.windows(2).all(|pair| pair[0] <= pair[1]));
}
