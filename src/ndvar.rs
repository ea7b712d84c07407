//! Dependent variable count (NDVAR) resolution.
//!
//! The volume condition type id of a block is the number of dependent flow
//! variables ADS carries per vertex. Blocks with an unspecified condition
//! (`0`) are ignored. The first specified block sets the count; a later block
//! with a different id flags the export as mixed and the count becomes the
//! larger of the two.

use crate::model::{GridModel, VolumeCondition};
use crate::notify::ExportWarning;

/// Count used when no block carries a specified condition.
pub const DEFAULT_ND_VAR: u32 = 1;

/// Resolved dependent variable count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariableCount {
    pub nd_var: u32,
    /// Specified blocks disagree on the type id.
    pub mixed: bool,
}

impl Default for VariableCount {
    fn default() -> Self {
        Self {
            nd_var: DEFAULT_ND_VAR,
            mixed: false,
        }
    }
}

impl VariableCount {
    /// Warning to report when the volume conditions are mixed.
    pub fn warning(&self) -> Option<ExportWarning> {
        self.mixed.then_some(ExportWarning::MixedVolumeTypes)
    }
}

/// Resolve NDVAR from volume conditions in block order.
pub fn resolve_nd_var<'a, I>(conditions: I) -> VariableCount
where
    I: IntoIterator<Item = &'a VolumeCondition>,
{
    let mut count = VariableCount::default();
    let mut seen_specified = false;
    for cond in conditions {
        if cond.type_id == 0 {
            continue;
        }
        if !seen_specified {
            seen_specified = true;
            count.nd_var = cond.type_id;
        } else if cond.type_id != count.nd_var {
            count.mixed = true;
            count.nd_var = count.nd_var.max(cond.type_id);
        }
    }
    count
}

/// Resolve NDVAR over a model's blocks.
///
/// The walk ends at the first block whose condition cannot be read.
pub fn resolve_model_nd_var<M: GridModel + ?Sized>(model: &M) -> VariableCount {
    let conditions: Vec<VolumeCondition> = (0..model.block_count())
        .map_while(|b| model.block_condition(b))
        .collect();
    let count = resolve_nd_var(&conditions);
    log::debug!(
        "NDVAR resolved to {} over {} blocks (mixed: {})",
        count.nd_var,
        conditions.len(),
        count.mixed
    );
    count
}
