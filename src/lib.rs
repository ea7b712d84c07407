#![cfg_attr(docsrs, feature(doc_cfg))]
//! # ads-export
//!
//! ads-export writes an unstructured CFD grid model as the ADS solver's native
//! file triple: `<base>.REST` (restart grid), `<base>.BCTYPE` (boundary type
//! map) and `<base>.BCVAL` (boundary values template).
//!
//! ## Features
//! - Boundary classification: per-domain ADS sequence ids, `NN_TYPENAME`
//!   labels and periodic face pair validation
//! - NDVAR resolution from volume conditions
//! - Face sequencing with ADS local face numbering per cell shape
//! - ASCII or raw little-endian binary `.REST` output
//! - Data-driven boundary type catalogs (built-in legacy table, or any
//!   serde-loadable table)
//!
//! ## Usage
//!
//! ```no_run
//! use ads_export::prelude::*;
//!
//! let model = InMemoryGridModel::new();
//! // ... add vertices, blocks, elements, domains and faces ...
//! let options = ExportOptions::new("out/case").with_encoding(Encoding::Binary);
//! let report = export_ads(&model, &options, &mut LogNotifier, &mut NullProgress)?;
//! assert!(report.is_success());
//! # Ok::<(), ads_export::export_error::AdsExportError>(())
//! ```
//!
//! Any host mesh can be exported by implementing [`model::GridModel`].

pub mod catalog;
pub mod classify;
pub mod export;
pub mod export_error;
pub mod io;
pub mod model;
pub mod ndvar;
pub mod notify;
pub mod sequence;
pub mod topology;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::catalog::{BoundaryTypeCatalog, CatalogTable, HostCondition};
    pub use crate::classify::{BoundaryAssignment, Classification, classify, classify_model};
    pub use crate::export::{ExportOptions, ExportReport, export_ads, export_ads_files};
    pub use crate::export_error::AdsExportError;
    pub use crate::io::record::{ByteOrder, Encoding};
    pub use crate::model::{
        BoundaryCondition, BoundaryFace, ConditionRecord, ElementData, GridModel,
        InMemoryGridModel, VolumeCondition,
    };
    pub use crate::ndvar::{VariableCount, resolve_nd_var};
    pub use crate::notify::{
        CollectingNotifier, ExportWarning, LogNotifier, Notifier, NullProgress, Progress,
    };
    pub use crate::sequence::{FaceRecord, FaceSequencer, fix_face};
    pub use crate::topology::cell_type::CellType;
}
