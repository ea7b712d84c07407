//! `.REST` restart file layout.
//!
//! ```text
//! title
//! 1 0 NDVAR 0 0 0 NBK 0 0 0 0 0 0 0 0      (15 fields)
//! 0 ... 0                                   (15 fields)
//! NNL NEL NBCL 0 NDVAR 0 ... 0              (15 fields)
//! 0 ... 0                                   (15 fields)
//! x y z d1 .. dNDVAR [psnd]                 (one per vertex)
//! v1 .. v8                                  (one per element, width 5)
//! cell ads_face sequence_id                 (one per boundary face)
//! ```

use crate::classify::Classification;
use crate::export_error::AdsExportError;
use crate::io::record::{HEADER_LINE_WIDTH, RecordWriter, one_based_field, record_field};
use crate::model::{ElementData, GridModel};
use crate::ndvar::VariableCount;
use crate::notify::Progress;
use crate::sequence::{StreamOutcome, write_face_records};
use crate::topology::cell_type::MAX_ELEMENT_VERTICES;
use std::io::Write;

/// Size of the per-vertex dependent variable buffer; NDVAR must stay below it
/// so the trailing value still fits.
pub const VERTEX_VAR_CAPACITY: u32 = 15;

/// Field width of connectivity records in ASCII mode.
pub const CONNECTIVITY_FIELD_WIDTH: usize = 5;

const DEPENDENT_FILL: f32 = 0.0;
const TRAILING_FILL: f32 = 0.0;

/// Float layout of one vertex record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexLayout {
    nd_var: u32,
}

impl VertexLayout {
    /// Validate NDVAR against the record buffer.
    pub fn new(nd_var: u32) -> Result<Self, AdsExportError> {
        if nd_var >= VERTEX_VAR_CAPACITY {
            return Err(AdsExportError::TooManyDependentVariables {
                nd_var,
                capacity: VERTEX_VAR_CAPACITY,
            });
        }
        Ok(Self { nd_var })
    }

    pub fn nd_var(&self) -> u32 {
        self.nd_var
    }

    /// Floats per record: xyz, NDVAR fillers, plus one more unless NDVAR is 1.
    pub fn width(&self) -> usize {
        let base = 3 + self.nd_var as usize;
        if self.nd_var != 1 { base + 1 } else { base }
    }

    /// Build the record for one vertex.
    pub fn record(&self, xyz: [f64; 3]) -> Vec<f32> {
        let mut values = Vec::with_capacity(self.width());
        values.extend(xyz.iter().map(|&c| c as f32));
        values.extend(std::iter::repeat_n(DEPENDENT_FILL, self.nd_var as usize));
        if self.nd_var != 1 {
            values.push(TRAILING_FILL);
        }
        values
    }
}

/// Fixed-width, 1-based connectivity record for element `cell`; unused
/// slots repeat the last vertex.
pub fn connectivity_record(
    element: &ElementData,
    cell: usize,
) -> Result<[u32; MAX_ELEMENT_VERTICES], AdsExportError> {
    let vertices = &element.vertices;
    if vertices.len() > MAX_ELEMENT_VERTICES {
        return Err(AdsExportError::ElementTooLarge {
            cell,
            vertices: vertices.len(),
            capacity: MAX_ELEMENT_VERTICES,
        });
    }
    let last = vertices.last().ok_or(AdsExportError::MissingElement { cell })?;
    let mut record = [one_based_field(*last, "vertex")?; MAX_ELEMENT_VERTICES];
    for (slot, &v) in record.iter_mut().zip(vertices) {
        *slot = one_based_field(v, "vertex")?;
    }
    Ok(record)
}

/// Counts written into header lines 1 and 3.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RestHeader {
    pub nd_var: u32,
    /// Number of blocks (NBK).
    pub blocks: u32,
    /// Number of vertices (NNL).
    pub vertices: u32,
    /// Number of cells over all blocks (NEL).
    pub elements: u32,
    /// Number of boundary faces over all domains (NBCL).
    pub boundary_faces: u32,
}

impl RestHeader {
    pub fn from_model<M: GridModel + ?Sized>(
        model: &M,
        nd_var: u32,
    ) -> Result<Self, AdsExportError> {
        let elements: usize = (0..model.block_count())
            .map(|b| model.block_element_count(b))
            .sum();
        Ok(Self {
            nd_var,
            blocks: record_field(model.block_count(), "block count")?,
            vertices: record_field(model.vertex_count(), "vertex count")?,
            elements: record_field(elements, "element count")?,
            boundary_faces: record_field(model.boundary_face_count(), "boundary face count")?,
        })
    }

    /// nsector, nisbc, ndvar, imesh, niter, itime, nbk, ...
    pub fn first_line(&self) -> [u32; HEADER_LINE_WIDTH] {
        let mut line = [0u32; HEADER_LINE_WIDTH];
        line[0] = 1;
        line[2] = self.nd_var;
        line[6] = self.blocks;
        line
    }

    /// nnl, nel, nbcl, ngrid, ncdut, ...
    pub fn third_line(&self) -> [u32; HEADER_LINE_WIDTH] {
        let mut line = [0u32; HEADER_LINE_WIDTH];
        line[0] = self.vertices;
        line[1] = self.elements;
        line[2] = self.boundary_faces;
        line[4] = self.nd_var;
        line
    }
}

/// Writes a complete `.REST` stream.
pub struct RestWriter<'a, M: GridModel + ?Sized> {
    model: &'a M,
    classification: &'a Classification,
    layout: VertexLayout,
}

impl<'a, M: GridModel + ?Sized> RestWriter<'a, M> {
    /// Fails before anything is written if NDVAR does not fit a vertex record.
    pub fn new(
        model: &'a M,
        classification: &'a Classification,
        variables: VariableCount,
    ) -> Result<Self, AdsExportError> {
        Ok(Self {
            model,
            classification,
            layout: VertexLayout::new(variables.nd_var)?,
        })
    }

    pub fn write<W, P>(
        &self,
        out: &mut RecordWriter<W>,
        title: &str,
        progress: &mut P,
    ) -> Result<StreamOutcome, AdsExportError>
    where
        W: Write,
        P: Progress + ?Sized,
    {
        let header = RestHeader::from_model(self.model, self.layout.nd_var())?;
        out.write_title(title)?;
        out.write_u32s(&header.first_line(), 1)?;
        out.write_zero_line()?;
        out.write_u32s(&header.third_line(), 1)?;
        out.write_zero_line()?;

        if !self.write_vertices(out, progress)?.is_complete() {
            return Ok(StreamOutcome::Incomplete);
        }
        if !self.write_connectivity(out, progress)?.is_complete() {
            return Ok(StreamOutcome::Incomplete);
        }
        write_face_records(self.model, self.classification, out, progress)
    }

    fn write_vertices<W, P>(
        &self,
        out: &mut RecordWriter<W>,
        progress: &mut P,
    ) -> Result<StreamOutcome, AdsExportError>
    where
        W: Write,
        P: Progress + ?Sized,
    {
        let count = self.model.vertex_count();
        let mut outcome = StreamOutcome::Incomplete;
        if progress.begin_step(count) {
            outcome = StreamOutcome::Complete;
            for index in 0..count {
                let xyz = self
                    .model
                    .vertex(index)
                    .ok_or(AdsExportError::MissingVertex { vertex: index })?;
                out.write_f32s(&self.layout.record(xyz))?;
                if !progress.increment() {
                    outcome = StreamOutcome::Incomplete;
                    break;
                }
            }
        }
        progress.end_step();
        Ok(outcome)
    }

    fn write_connectivity<W, P>(
        &self,
        out: &mut RecordWriter<W>,
        progress: &mut P,
    ) -> Result<StreamOutcome, AdsExportError>
    where
        W: Write,
        P: Progress + ?Sized,
    {
        let count = self.model.element_count();
        let mut outcome = StreamOutcome::Incomplete;
        if progress.begin_step(count) {
            outcome = StreamOutcome::Complete;
            for index in 0..count {
                let element = self
                    .model
                    .element(index)
                    .ok_or(AdsExportError::MissingElement { cell: index })?;
                let record = connectivity_record(&element, index)?;
                out.write_u32s(&record, CONNECTIVITY_FIELD_WIDTH)?;
                if !progress.increment() {
                    outcome = StreamOutcome::Incomplete;
                    break;
                }
            }
        }
        progress.end_step();
        Ok(outcome)
    }
}
