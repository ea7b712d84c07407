//! ADS file writers.
//!
//! - [`record`]: numeric row emission in ASCII or raw binary form.
//! - [`rest`]: the `.REST` restart file (header, vertices, connectivity,
//!   boundary faces).
//! - [`bcval`] and [`bctype`]: the two ASCII boundary descriptor files.

pub mod bctype;
pub mod bcval;
pub mod record;
pub mod rest;

pub use record::{ByteOrder, Encoding, RecordWriter};
pub use rest::{RestHeader, RestWriter, VertexLayout};
