use ads_export::catalog::BoundaryTypeCatalog;
use ads_export::classify::{PeriodicPairRegistry, classify};
use ads_export::model::{BoundaryCondition, VolumeCondition};
use ads_export::ndvar::resolve_nd_var;
use ads_export::notify::ExportWarning;
use proptest::prelude::*;
use std::collections::HashMap;

fn condition_strategy() -> impl Strategy<Value = Option<BoundaryCondition>> {
    prop_oneof![
        1 => Just(None),
        8 => (0u32..=20, 0u32..4)
            .prop_map(|(t, i)| Some(BoundaryCondition::new(t, i, format!("d{t}_{i}")))),
    ]
}

#[test]
fn mixed_volume_types_resolve_to_max() {
    let blocks: Vec<VolumeCondition> = [0, 3, 5, 3]
        .iter()
        .map(|&t| VolumeCondition::new(t, 1, "v"))
        .collect();
    let r = resolve_nd_var(&blocks);
    assert_eq!((r.nd_var, r.mixed), (5, true));
}

#[test]
fn duplicate_periodic_faces_warn_once_per_extra() {
    let cat = BoundaryTypeCatalog::legacy();
    let domains = vec![
        Some(BoundaryCondition::new(13, 2, "a")),
        Some(BoundaryCondition::new(13, 2, "b")),
        Some(BoundaryCondition::new(13, 2, "c")),
        Some(BoundaryCondition::new(14, 2, "s")),
    ];
    let c = classify(cat, domains);
    let dups = c
        .warnings()
        .iter()
        .filter(|w| matches!(w, ExportWarning::DuplicatePeriodic { .. }))
        .count();
    assert_eq!(dups, 2);
    assert!(
        !c.warnings()
            .iter()
            .any(|w| matches!(w, ExportWarning::UnmatchedPeriodic { .. }))
    );
}

proptest! {
    #[test]
    fn ordinals_count_up_per_type(
        domains in prop::collection::vec(condition_strategy(), 0..40)
    ) {
        let cat = BoundaryTypeCatalog::legacy();
        let c = classify(cat, domains.clone());
        prop_assert_eq!(c.len(), domains.len());

        let mut next: HashMap<u32, u32> = HashMap::new();
        for a in c.assignments() {
            let expected = next.entry(a.condition.type_id).or_insert(0);
            prop_assert_eq!(a.ordinal, *expected);
            let prefix = format!("{:02}_", a.ordinal);
            prop_assert!(a.ads_name.starts_with(&prefix));
            *expected += 1;
        }
    }

    #[test]
    fn periodic_domains_match_or_warn_never_both(
        domains in prop::collection::vec(condition_strategy(), 0..40)
    ) {
        let cat = BoundaryTypeCatalog::legacy();
        let c = classify(cat, domains);
        let keys: Vec<u32> = c
            .assignments()
            .iter()
            .filter(|a| matches!(a.condition.type_id, 13 | 14))
            .map(|a| a.sequence_id)
            .collect();

        for a in c.assignments() {
            let Some(mate) = PeriodicPairRegistry::mate_key(&a.condition) else { continue };
            let has_mate = keys.contains(&mate);
            let orphan_warnings = c
                .warnings()
                .iter()
                .filter(|w| match w {
                    ExportWarning::UnmatchedPeriodic { name, .. } => *name == a.condition.name,
                    _ => false,
                })
                .count();
            // names encode (type, instance), so equal names share a pairing outcome
            prop_assert_eq!(has_mate, orphan_warnings == 0);
        }
    }

    #[test]
    fn duplicate_warnings_equal_extra_keys(
        domains in prop::collection::vec(condition_strategy(), 0..40)
    ) {
        let cat = BoundaryTypeCatalog::legacy();
        let c = classify(cat, domains);
        let mut per_key: HashMap<u32, usize> = HashMap::new();
        for a in c.assignments().iter().filter(|a| matches!(a.condition.type_id, 13 | 14)) {
            *per_key.entry(a.sequence_id).or_default() += 1;
        }
        let extra: usize = per_key.values().map(|n| n - 1).sum();
        let dups = c
            .warnings()
            .iter()
            .filter(|w| matches!(w, ExportWarning::DuplicatePeriodic { .. }))
            .count();
        prop_assert_eq!(dups, extra);
    }

    #[test]
    fn nd_var_is_max_of_specified(ids in prop::collection::vec(0u32..10, 0..20)) {
        let blocks: Vec<VolumeCondition> =
            ids.iter().map(|&t| VolumeCondition::new(t, 1, "v")).collect();
        let r = resolve_nd_var(&blocks);
        let specified: Vec<u32> = ids.iter().copied().filter(|&t| t != 0).collect();
        let expected = specified.iter().copied().max().unwrap_or(1);
        prop_assert_eq!(r.nd_var, expected);
        let mixed = specified.iter().any(|&t| Some(&t) != specified.first());
        prop_assert_eq!(r.mixed, mixed);
    }
}
