//! Element shape metadata shared by the writers and the face sequencer.

pub mod cell_type;

pub use cell_type::{CellType, MAX_ELEMENT_VERTICES};
