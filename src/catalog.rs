//! ADS boundary type catalog.
//!
//! The catalog is configuration data: an ordered table mapping boundary type
//! ids `1..=N` to the names ADS expects, plus the sentinel id `N + 1`
//! (`BCERROR`) used when a domain's condition cannot be read. The size `N`
//! belongs to the loaded table; the built-in [`BoundaryTypeCatalog::legacy`]
//! table has 20 entries, and other tables can be deserialized with serde.
//!
//! Besides the names, a catalog carries the condition tables published to
//! the host application: one boundary condition per ADS type and the volume
//! conditions whose ids become the NDVAR count.

use crate::export_error::AdsExportError;
use crate::io::rest::VERTEX_VAR_CAPACITY;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;
use std::collections::BTreeSet;

/// Name reported for the sentinel error type id.
pub const ERROR_TYPE_NAME: &str = "BCERROR";

const LEGACY_BC_NAMES: [&str; 20] = [
    "FLOWTAN",
    "INFLOW",
    "OUTFLOW",
    "FARFIELD",
    "NRINFLOW",
    "NROUTFLOW",
    "INVISCID",
    "WALLF",
    "WALLIQ",
    "WALLIA",
    "WALLIS",
    "NMLINFLOW",
    "PERIODIC",
    "PERIODICSHDW",
    "ISOTHERMAL",
    "ADIABATIC",
    "INTSCT",
    "INTSCTSHDW",
    "WALLFCHT",
    "FMVINFLOW",
];

// Host-facing labels, in the order the host lists them.
const LEGACY_HOST_BCS: [(&str, u32); 20] = [
    ("1  Flow tangency", 1),
    ("2  Up-stream", 2),
    ("-2 Upstream with floating meridional V", 20),
    ("3  Down-stream", 3),
    ("4  Farfield in/out", 4),
    ("5  Cascade up-stream", 5),
    ("6  Cascade down-stream", 6),
    ("7  No flow normal to the surface", 7),
    ("8  Wall function", 8),
    ("9  Non-slip wall with Q input", 9),
    ("10 Non-slip wall Q = 0.0 ", 10),
    ("11 Non-slip wall in stationary frame", 11),
    ("12 Inlet flow normal to mesh", 12),
    ("13 Periodic face", 13),
    ("14 Periodic with face 13", 14),
    ("15 Constant T wall for heat conduction", 15),
    ("16 Adiabatic wall for heat conduction", 16),
    ("17 Intersector periodic with face", 17),
    ("18 Intersector periodic with face 17", 18),
    ("2008 Wall function - CHT", 19),
];

const LEGACY_HOST_VCS: [(&str, u32); 2] = [("Fluid", 5), ("Solid", 1)];

const_assert_eq!(LEGACY_BC_NAMES.len(), LEGACY_HOST_BCS.len());

static LEGACY: Lazy<BoundaryTypeCatalog> = Lazy::new(|| BoundaryTypeCatalog {
    names: LEGACY_BC_NAMES.iter().map(|s| s.to_string()).collect(),
    host_boundary_conditions: LEGACY_HOST_BCS
        .iter()
        .map(|&(label, type_id)| HostCondition::new(label, type_id))
        .collect(),
    host_volume_conditions: LEGACY_HOST_VCS
        .iter()
        .map(|&(label, type_id)| HostCondition::new(label, type_id))
        .collect(),
});

/// One entry of a condition table published to the host application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCondition {
    /// Label shown to the user.
    pub label: String,
    /// Type id the host hands back for domains/blocks using this condition.
    pub type_id: u32,
}

impl HostCondition {
    /// Create a new host condition entry.
    pub fn new(label: impl Into<String>, type_id: u32) -> Self {
        Self {
            label: label.into(),
            type_id,
        }
    }
}

/// Serialized form of a [`BoundaryTypeCatalog`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTable {
    /// ADS type names; entry `k` names type id `k + 1`.
    pub names: Vec<String>,
    /// Boundary conditions published to the host.
    #[serde(default)]
    pub host_boundary_conditions: Vec<HostCondition>,
    /// Volume conditions published to the host.
    #[serde(default)]
    pub host_volume_conditions: Vec<HostCondition>,
}

/// Immutable, ordered boundary type id → name table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogTable", into = "CatalogTable")]
pub struct BoundaryTypeCatalog {
    names: Vec<String>,
    host_boundary_conditions: Vec<HostCondition>,
    host_volume_conditions: Vec<HostCondition>,
}

impl BoundaryTypeCatalog {
    /// The built-in 20-entry table.
    pub fn legacy() -> &'static BoundaryTypeCatalog {
        &LEGACY
    }

    /// Build a catalog from table data, validating names and host type ids.
    ///
    /// Volume condition ids become NDVAR, so they must fit a vertex record.
    ///
    /// The host table is allowed to differ in length from `names`; that is
    /// checked when an export starts (see [`Self::check_host_table`]).
    pub fn from_table(table: CatalogTable) -> Result<Self, AdsExportError> {
        if table.names.is_empty() {
            return Err(AdsExportError::CatalogConfig(
                "catalog must name at least one boundary type".into(),
            ));
        }
        let mut seen = BTreeSet::new();
        for name in &table.names {
            if name.is_empty() || name == ERROR_TYPE_NAME {
                return Err(AdsExportError::CatalogConfig(format!(
                    "reserved or empty boundary type name `{name}`"
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(AdsExportError::CatalogConfig(format!(
                    "duplicate boundary type name `{name}`"
                )));
            }
        }
        let n = table.names.len() as u32;
        for cond in &table.host_boundary_conditions {
            if cond.type_id == 0 || cond.type_id > n {
                return Err(AdsExportError::CatalogConfig(format!(
                    "host condition `{}` uses type id {} outside 1..={n}",
                    cond.label, cond.type_id
                )));
            }
        }
        for cond in &table.host_volume_conditions {
            if cond.type_id == 0 || cond.type_id >= VERTEX_VAR_CAPACITY {
                return Err(AdsExportError::CatalogConfig(format!(
                    "volume condition `{}` uses NDVAR {} outside 1..{VERTEX_VAR_CAPACITY}",
                    cond.label, cond.type_id
                )));
            }
        }
        Ok(Self {
            names: table.names,
            host_boundary_conditions: table.host_boundary_conditions,
            host_volume_conditions: table.host_volume_conditions,
        })
    }

    /// Number of real boundary types (`N`).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false for a validated catalog.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The sentinel id used for domains whose condition could not be read.
    pub fn error_type_id(&self) -> u32 {
        self.names.len() as u32 + 1
    }

    /// Canonical ADS name for a type id.
    pub fn name(&self, type_id: u32) -> Option<&str> {
        match type_id {
            0 => None,
            id if id == self.error_type_id() => Some(ERROR_TYPE_NAME),
            id => self.names.get(id as usize - 1).map(String::as_str),
        }
    }

    /// Boundary conditions published to the host.
    pub fn host_boundary_conditions(&self) -> &[HostCondition] {
        &self.host_boundary_conditions
    }

    /// Volume conditions published to the host.
    pub fn host_volume_conditions(&self) -> &[HostCondition] {
        &self.host_volume_conditions
    }

    /// Startup check: the host must publish exactly one condition per type.
    pub fn check_host_table(&self) -> Result<(), AdsExportError> {
        if self.host_boundary_conditions.len() != self.names.len() {
            return Err(AdsExportError::CatalogMismatch {
                catalog: self.names.len(),
                host: self.host_boundary_conditions.len(),
            });
        }
        Ok(())
    }
}

impl Default for BoundaryTypeCatalog {
    fn default() -> Self {
        Self::legacy().clone()
    }
}

impl TryFrom<CatalogTable> for BoundaryTypeCatalog {
    type Error = AdsExportError;

    fn try_from(table: CatalogTable) -> Result<Self, Self::Error> {
        Self::from_table(table)
    }
}

impl From<BoundaryTypeCatalog> for CatalogTable {
    fn from(catalog: BoundaryTypeCatalog) -> Self {
        CatalogTable {
            names: catalog.names,
            host_boundary_conditions: catalog.host_boundary_conditions,
            host_volume_conditions: catalog.host_volume_conditions,
        }
    }
}
