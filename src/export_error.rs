//! AdsExportError: Unified error type for ads-export public APIs
//!
//! Only fatal conditions are represented here. Soft problems (periodic pairing
//! issues, mixed volume conditions, failed per-domain condition queries) are
//! reported through [`Notifier`](crate::notify::Notifier) and the
//! [`ExportReport`](crate::export::ExportReport) instead.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for ads-export operations.
#[derive(Debug, Error)]
pub enum AdsExportError {
    /// Underlying write failure on an already open output file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// An output file could not be created.
    #[error("cannot open `{path}` for writing: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The resolved NDVAR does not fit the fixed vertex record buffer.
    #[error("NDVAR {nd_var} exceeds vertex record capacity (must be < {capacity})")]
    TooManyDependentVariables { nd_var: u32, capacity: u32 },
    /// The boundary type catalog and the host condition table disagree in size.
    #[error("BC count mismatch! catalog has {catalog} types, host table has {host}")]
    CatalogMismatch { catalog: usize, host: usize },
    /// Only little-endian binary output is produced.
    #[error("only little-endian byte order is supported")]
    UnsupportedByteOrder,
    /// A boundary face refers to an owner cell the grid model cannot resolve.
    #[error("boundary face owner cell {cell} not found in grid model")]
    MissingElement { cell: usize },
    /// An element has more vertices than a connectivity record holds.
    #[error("element {cell} has {vertices} vertices; records hold at most {capacity}")]
    ElementTooLarge {
        cell: usize,
        vertices: usize,
        capacity: usize,
    },
    /// An index or count does not fit a 32-bit record field.
    #[error("{what} {value} does not fit a 32-bit record field")]
    IndexOverflow { what: &'static str, value: usize },
    /// A vertex index below `vertex_count()` could not be read.
    #[error("vertex {vertex} not found in grid model")]
    MissingVertex { vertex: usize },
    /// Malformed boundary type table.
    #[error("invalid boundary type catalog: {0}")]
    CatalogConfig(String),
}
