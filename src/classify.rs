//! Boundary classification.
//!
//! A single forward pass over the boundary domains assigns every domain the
//! sequence id written into its face records and the `NN_TYPENAME` label used
//! by the `.BCTYPE` file. `NN` is the per-type usage ordinal, counted from 0
//! in domain order.
//!
//! Periodic domains (types 13 and 14) are keyed by `100 * instance + type`.
//! After the pass every periodic domain must find the key of its opposite
//! role; duplicates and orphans are reported as warnings and never stop the
//! export.

use crate::catalog::BoundaryTypeCatalog;
use crate::model::{BoundaryCondition, GridModel};
use crate::notify::ExportWarning;
use std::collections::BTreeSet;

/// Type id substituted for unspecified (`0`) boundary conditions: "INVISCID".
pub const DEFAULT_TYPE_ID: u32 = 7;
/// Instance id given to substituted unspecified conditions.
pub const DEFAULT_INSTANCE_ID: u32 = 1;
/// Periodic face.
pub const PERIODIC_TYPE_ID: u32 = 13;
/// Periodic shadow face, paired with [`PERIODIC_TYPE_ID`].
pub const PERIODIC_SHADOW_TYPE_ID: u32 = 14;
/// "WALLFCHT": wall function with conjugate heat transfer.
pub const WALL_FUNCTION_CHT_TYPE_ID: u32 = 19;
/// "FMVINFLOW": upstream with floating meridional velocity.
pub const FLOATING_INFLOW_TYPE_ID: u32 = 20;

/// ADS tag for WALLFCHT faces, independent of the catalog type id.
const WALL_FUNCTION_CHT_TAG: u32 = 2008;
/// Magnitude of the negative ADS tag for FMVINFLOW faces.
const FLOATING_INFLOW_TAG: u32 = 2;

/// Sequence id composition: `100 * ordinal_or_instance + tag`.
fn compose(high: u32, tag: u32) -> u32 {
    high.wrapping_mul(100).wrapping_add(tag)
}

/// Per-domain classifier output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundaryAssignment {
    /// Value written into every face record of the domain.
    pub sequence_id: u32,
    /// `"<NN>_<TYPENAME>"`.
    pub ads_name: String,
    /// Condition after default/error substitution.
    pub condition: BoundaryCondition,
    /// Usage ordinal of the domain within its type.
    pub ordinal: u32,
}

/// Keys of periodic domains already seen in the current pass.
#[derive(Clone, Debug, Default)]
pub struct PeriodicPairRegistry {
    keys: BTreeSet<u32>,
}

impl PeriodicPairRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry key for a periodic condition.
    pub fn key(instance_id: u32, type_id: u32) -> u32 {
        compose(instance_id, type_id)
    }

    /// Insert a key; `false` if it was already present.
    pub fn insert(&mut self, key: u32) -> bool {
        self.keys.insert(key)
    }

    pub fn contains(&self, key: u32) -> bool {
        self.keys.contains(&key)
    }

    /// Key of the opposite role for a periodic condition, if it is periodic.
    pub fn mate_key(condition: &BoundaryCondition) -> Option<u32> {
        match condition.type_id {
            PERIODIC_TYPE_ID => Some(Self::key(condition.instance_id, PERIODIC_SHADOW_TYPE_ID)),
            PERIODIC_SHADOW_TYPE_ID => Some(Self::key(condition.instance_id, PERIODIC_TYPE_ID)),
            _ => None,
        }
    }
}

/// Substitute defaults for a queried condition.
///
/// Returns the condition to classify and whether the query succeeded. A
/// failed query, or a type id the catalog does not know, becomes the
/// catalog's error type; an unspecified type becomes [`DEFAULT_TYPE_ID`].
pub fn resolve_condition(
    catalog: &BoundaryTypeCatalog,
    queried: Option<BoundaryCondition>,
) -> (BoundaryCondition, bool) {
    let error = |name: String| BoundaryCondition {
        type_id: catalog.error_type_id(),
        instance_id: 0,
        name,
    };
    match queried {
        None => (error(crate::catalog::ERROR_TYPE_NAME.to_string()), false),
        Some(bc) if bc.type_id == 0 => (
            BoundaryCondition {
                type_id: DEFAULT_TYPE_ID,
                instance_id: DEFAULT_INSTANCE_ID,
                name: bc.name,
            },
            true,
        ),
        Some(bc) if bc.type_id as usize > catalog.len() => {
            log::warn!(
                "boundary condition '{}' has unknown type id {}",
                bc.name,
                bc.type_id
            );
            (error(bc.name), false)
        }
        Some(bc) => (bc, true),
    }
}

/// Result of classifying every boundary domain.
#[derive(Clone, Debug, Default)]
pub struct Classification {
    assignments: Vec<BoundaryAssignment>,
    warnings: Vec<ExportWarning>,
    failed_domains: Vec<usize>,
}

impl Classification {
    /// Assignments indexed by domain.
    pub fn assignments(&self) -> &[BoundaryAssignment] {
        &self.assignments
    }

    pub fn assignment(&self, domain: usize) -> Option<&BoundaryAssignment> {
        self.assignments.get(domain)
    }

    /// Sequence id of a domain; `0` for a domain outside the working set.
    pub fn sequence_id(&self, domain: usize) -> u32 {
        self.assignments.get(domain).map_or(0, |a| a.sequence_id)
    }

    pub fn ads_name(&self, domain: usize) -> Option<&str> {
        self.assignments.get(domain).map(|a| a.ads_name.as_str())
    }

    /// Warnings in emission order.
    pub fn warnings(&self) -> &[ExportWarning] {
        &self.warnings
    }

    /// Domains whose condition query failed.
    pub fn failed_domains(&self) -> &[usize] {
        &self.failed_domains
    }

    /// True when any condition query failed.
    pub fn failed(&self) -> bool {
        !self.failed_domains.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Classifier state for one export; counters never outlive it.
#[derive(Debug)]
pub struct BoundaryClassifier<'c> {
    catalog: &'c BoundaryTypeCatalog,
    usage_count: Vec<u32>,
    registry: PeriodicPairRegistry,
}

impl<'c> BoundaryClassifier<'c> {
    pub fn new(catalog: &'c BoundaryTypeCatalog) -> Self {
        Self {
            catalog,
            // index 0 unused; 1..=N real types, N + 1 error type
            usage_count: vec![0; catalog.error_type_id() as usize + 1],
            registry: PeriodicPairRegistry::new(),
        }
    }

    /// Classify domains given their queried conditions, in domain order.
    pub fn classify<I>(mut self, conditions: I) -> Classification
    where
        I: IntoIterator<Item = Option<BoundaryCondition>>,
    {
        let mut out = Classification::default();

        for (domain, queried) in conditions.into_iter().enumerate() {
            let (bc, ok) = resolve_condition(self.catalog, queried);
            if !ok {
                out.failed_domains.push(domain);
            }
            let assignment = self.assign(bc, &mut out.warnings);
            out.assignments.push(assignment);
        }

        let error_type_id = self.catalog.error_type_id();
        for assignment in &out.assignments {
            let bc = &assignment.condition;
            // a catalog with 12 or 13 types puts BCERROR on a periodic id
            if bc.type_id == error_type_id {
                continue;
            }
            if let Some(mate) = PeriodicPairRegistry::mate_key(bc) {
                if !self.registry.contains(mate) {
                    out.warnings.push(ExportWarning::UnmatchedPeriodic {
                        name: bc.name.clone(),
                        type_id: bc.type_id,
                        instance_id: bc.instance_id,
                    });
                }
            }
        }

        log::debug!(
            "classified {} boundary domains ({} warnings, {} failed)",
            out.assignments.len(),
            out.warnings.len(),
            out.failed_domains.len()
        );
        out
    }

    fn assign(
        &mut self,
        bc: BoundaryCondition,
        warnings: &mut Vec<ExportWarning>,
    ) -> BoundaryAssignment {
        let tid = bc.type_id;
        let ordinal = self.usage_count[tid as usize];
        let is_error = tid == self.catalog.error_type_id();

        let sequence_id = match tid {
            _ if is_error => compose(ordinal, tid),
            PERIODIC_TYPE_ID | PERIODIC_SHADOW_TYPE_ID => {
                let key = PeriodicPairRegistry::key(bc.instance_id, tid);
                if !self.registry.insert(key) {
                    warnings.push(ExportWarning::DuplicatePeriodic {
                        name: bc.name.clone(),
                        type_id: tid,
                        instance_id: bc.instance_id,
                    });
                }
                key
            }
            WALL_FUNCTION_CHT_TYPE_ID => compose(ordinal, WALL_FUNCTION_CHT_TAG),
            FLOATING_INFLOW_TYPE_ID => compose(ordinal, FLOATING_INFLOW_TAG).wrapping_neg(),
            _ => compose(ordinal, tid),
        };

        let type_name = self.catalog.name(tid).unwrap_or(crate::catalog::ERROR_TYPE_NAME);
        let ads_name = format!("{ordinal:02}_{type_name}");
        self.usage_count[tid as usize] += 1;

        BoundaryAssignment {
            sequence_id,
            ads_name,
            condition: bc,
            ordinal,
        }
    }
}

/// Classify a sequence of queried domain conditions.
pub fn classify<I>(catalog: &BoundaryTypeCatalog, conditions: I) -> Classification
where
    I: IntoIterator<Item = Option<BoundaryCondition>>,
{
    BoundaryClassifier::new(catalog).classify(conditions)
}

/// Classify every domain of a grid model.
pub fn classify_model<M: GridModel + ?Sized>(
    catalog: &BoundaryTypeCatalog,
    model: &M,
) -> Classification {
    classify(
        catalog,
        (0..model.domain_count()).map(|d| model.domain_condition(d)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogTable;

    fn bc(type_id: u32, instance_id: u32, name: &str) -> Option<BoundaryCondition> {
        Some(BoundaryCondition::new(type_id, instance_id, name))
    }

    #[test]
    fn ordinals_and_names_follow_domain_order() {
        let cat = BoundaryTypeCatalog::legacy();
        let c = classify(cat, [bc(2, 1, "in"), bc(3, 1, "out"), bc(2, 5, "in2")]);
        assert_eq!(c.ads_name(0), Some("00_INFLOW"));
        assert_eq!(c.ads_name(1), Some("00_OUTFLOW"));
        assert_eq!(c.ads_name(2), Some("01_INFLOW"));
        assert_eq!(c.sequence_id(0), 2);
        assert_eq!(c.sequence_id(2), 102);
        assert!(c.warnings().is_empty());
        assert!(!c.failed());
    }

    #[test]
    fn unspecified_becomes_inviscid() {
        let cat = BoundaryTypeCatalog::legacy();
        let c = classify(cat, [bc(0, 42, "wing")]);
        let a = c.assignment(0).unwrap();
        assert_eq!(a.condition.type_id, 7);
        assert_eq!(a.condition.instance_id, 1);
        assert_eq!(a.condition.name, "wing");
        assert_eq!(a.ads_name, "00_INVISCID");
        assert_eq!(a.sequence_id, 7);
    }

    #[test]
    fn special_wall_and_inflow_tags() {
        let cat = BoundaryTypeCatalog::legacy();
        let c = classify(
            cat,
            [bc(19, 1, "w0"), bc(19, 1, "w1"), bc(20, 1, "f0"), bc(20, 1, "f1")],
        );
        assert_eq!(c.sequence_id(0), 2008);
        assert_eq!(c.sequence_id(1), 2108);
        assert_eq!(c.sequence_id(2) as i32, -2);
        assert_eq!(c.sequence_id(3) as i32, -102);
        assert_eq!(c.sequence_id(3), u32::MAX - 101);
        assert_eq!(c.ads_name(1), Some("01_WALLFCHT"));
        assert_eq!(c.ads_name(3), Some("01_FMVINFLOW"));
    }

    #[test]
    fn intersector_types_use_usage_rule() {
        let cat = BoundaryTypeCatalog::legacy();
        let c = classify(cat, [bc(17, 4, "a"), bc(18, 4, "b"), bc(17, 4, "c")]);
        assert_eq!(c.sequence_id(0), 17);
        assert_eq!(c.sequence_id(1), 18);
        assert_eq!(c.sequence_id(2), 117);
        assert!(c.warnings().is_empty());
    }

    #[test]
    fn periodic_pair_shares_instance_base() {
        let cat = BoundaryTypeCatalog::legacy();
        let c = classify(cat, [bc(13, 3, "p"), bc(14, 3, "s")]);
        assert_eq!(c.sequence_id(0), 313);
        assert_eq!(c.sequence_id(1), 314);
        assert!(c.warnings().is_empty());
    }

    #[test]
    fn periodic_duplicate_and_orphan() {
        let cat = BoundaryTypeCatalog::legacy();
        let c = classify(cat, [bc(13, 3, "p"), bc(13, 3, "q"), bc(14, 8, "s")]);
        assert_eq!(
            c.warnings(),
            &[
                ExportWarning::DuplicatePeriodic {
                    name: "q".into(),
                    type_id: 13,
                    instance_id: 3
                },
                ExportWarning::UnmatchedPeriodic {
                    name: "p".into(),
                    type_id: 13,
                    instance_id: 3
                },
                ExportWarning::UnmatchedPeriodic {
                    name: "q".into(),
                    type_id: 13,
                    instance_id: 3
                },
                ExportWarning::UnmatchedPeriodic {
                    name: "s".into(),
                    type_id: 14,
                    instance_id: 8
                },
            ]
        );
    }

    #[test]
    fn failed_query_uses_error_type() {
        let cat = BoundaryTypeCatalog::legacy();
        let c = classify(cat, [None, bc(2, 1, "in"), None]);
        assert_eq!(c.failed_domains(), &[0, 2]);
        assert_eq!(c.ads_name(0), Some("00_BCERROR"));
        assert_eq!(c.ads_name(2), Some("01_BCERROR"));
        assert_eq!(c.sequence_id(0), 21);
        assert_eq!(c.sequence_id(2), 121);
        assert_eq!(c.assignment(0).unwrap().condition.name, "BCERROR");
    }

    #[test]
    fn unknown_type_id_is_a_failure() {
        let cat = BoundaryTypeCatalog::legacy();
        let c = classify(cat, [bc(57, 1, "odd")]);
        assert!(c.failed());
        assert_eq!(c.ads_name(0), Some("00_BCERROR"));
        assert_eq!(c.assignment(0).unwrap().condition.name, "odd");
    }

    #[test]
    fn error_type_on_periodic_id_is_not_paired() {
        let names: Vec<String> = (1..=12).map(|k| format!("T{k}")).collect();
        let cat = BoundaryTypeCatalog::from_table(CatalogTable {
            names,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(cat.error_type_id(), PERIODIC_TYPE_ID);

        let c = classify(&cat, [None, None]);
        assert!(c.warnings().is_empty(), "{:?}", c.warnings());
        assert_eq!(c.ads_name(1), Some("01_BCERROR"));
        assert_eq!(c.sequence_id(1), 113);
    }

    #[test]
    fn out_of_range_domain_has_zero_sequence() {
        let c = classify(BoundaryTypeCatalog::legacy(), [bc(1, 1, "t")]);
        assert_eq!(c.sequence_id(5), 0);
        assert_eq!(c.ads_name(5), None);
    }
}
