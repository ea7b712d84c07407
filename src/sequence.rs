//! Boundary face sequencing.
//!
//! Turns the model's boundary face stream into `.REST` face records
//! `[cell, ads_face, sequence_id]`. Local face numbers are remapped from the
//! grid model's convention to the ADS convention per owner cell shape.

use crate::classify::Classification;
use crate::export_error::AdsExportError;
use crate::io::record::{RecordWriter, one_based_field};
use crate::model::{BoundaryFace, GridModel};
use crate::notify::Progress;
use crate::topology::cell_type::CellType;
use std::io::Write;

/// ADS face index reported for shapes or local indices without a mapping.
pub const BAD_FACE_INDEX: u32 = 9999;

const TET_FACES: [u32; 4] = [4, 3, 1, 2];
const HEX_FACES: [u32; 6] = [5, 6, 3, 2, 4, 1];
const PRISM_FACES: [u32; 5] = [5, 1, 3, 4, 2];

/// Map a model-local face index to the 1-based ADS face index.
pub fn fix_face(shape: CellType, local_face: u32) -> u32 {
    let lookup = |table: &[u32]| {
        table
            .get(local_face as usize)
            .copied()
            .unwrap_or(BAD_FACE_INDEX)
    };
    match shape {
        CellType::Tetrahedron => lookup(&TET_FACES),
        CellType::Hexahedron => lookup(&HEX_FACES),
        CellType::Prism => lookup(&PRISM_FACES),
        CellType::Pyramid if (local_face as usize) < CellType::Pyramid.face_count() => {
            local_face + 1
        }
        _ => BAD_FACE_INDEX,
    }
}

/// One `.REST` boundary face record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceRecord {
    /// 1-based owner cell index.
    pub cell_id: u32,
    /// ADS local face index, or [`BAD_FACE_INDEX`].
    pub ads_face: u32,
    /// Sequence id of the owning boundary domain.
    pub sequence_id: u32,
}

impl FaceRecord {
    pub fn to_row(self) -> [u32; 3] {
        [self.cell_id, self.ads_face, self.sequence_id]
    }
}

/// Lazy face record stream over a grid model.
pub struct FaceSequencer<'a, M: GridModel + ?Sized + 'a> {
    model: &'a M,
    classification: &'a Classification,
    faces: M::FaceIter<'a>,
}

impl<'a, M: GridModel + ?Sized + 'a> FaceSequencer<'a, M> {
    pub fn new(model: &'a M, classification: &'a Classification) -> Self {
        Self {
            model,
            classification,
            faces: model.boundary_faces(),
        }
    }

    fn record(&self, face: BoundaryFace) -> Result<FaceRecord, AdsExportError> {
        let owner = self
            .model
            .element(face.owner_cell)
            .ok_or(AdsExportError::MissingElement {
                cell: face.owner_cell,
            })?;
        Ok(FaceRecord {
            cell_id: one_based_field(face.owner_cell, "cell")?,
            ads_face: fix_face(owner.shape, face.cell_face_index),
            sequence_id: self.classification.sequence_id(face.domain),
        })
    }
}

impl<'a, M: GridModel + ?Sized + 'a> Iterator for FaceSequencer<'a, M> {
    type Item = Result<FaceRecord, AdsExportError>;

    fn next(&mut self) -> Option<Self::Item> {
        let face = self.faces.next()?;
        Some(self.record(face))
    }
}

/// How a streamed phase ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamOutcome {
    Complete,
    /// The progress sink requested cancellation.
    Incomplete,
}

impl StreamOutcome {
    pub fn is_complete(self) -> bool {
        self == StreamOutcome::Complete
    }
}

/// Write every boundary face record, honoring cancellation after each one.
pub fn write_face_records<M, W, P>(
    model: &M,
    classification: &Classification,
    out: &mut RecordWriter<W>,
    progress: &mut P,
) -> Result<StreamOutcome, AdsExportError>
where
    M: GridModel + ?Sized,
    W: Write,
    P: Progress + ?Sized,
{
    if !progress.begin_step(model.boundary_face_count()) {
        progress.end_step();
        return Ok(StreamOutcome::Incomplete);
    }
    let mut outcome = StreamOutcome::Complete;
    for record in FaceSequencer::new(model, classification) {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                progress.end_step();
                return Err(err);
            }
        };
        if record.ads_face == BAD_FACE_INDEX {
            log::warn!(
                "boundary face of cell {} has no ADS face mapping",
                record.cell_id
            );
        }
        out.write_u32s(&record.to_row(), 1)?;
        if !progress.increment() {
            outcome = StreamOutcome::Incomplete;
            break;
        }
    }
    progress.end_step();
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BoundaryTypeCatalog;
    use crate::classify::classify_model;
    use crate::io::record::Encoding;
    use crate::model::{BoundaryCondition, ElementData, InMemoryGridModel};
    use crate::notify::NullProgress;

    #[test]
    fn permutation_tables() {
        let tet: Vec<u32> = (0..4).map(|f| fix_face(CellType::Tetrahedron, f)).collect();
        assert_eq!(tet, vec![4, 3, 1, 2]);
        let hex: Vec<u32> = (0..6).map(|f| fix_face(CellType::Hexahedron, f)).collect();
        assert_eq!(hex, vec![5, 6, 3, 2, 4, 1]);
        let prism: Vec<u32> = (0..5).map(|f| fix_face(CellType::Prism, f)).collect();
        assert_eq!(prism, vec![5, 1, 3, 4, 2]);
        let pyr: Vec<u32> = (0..5).map(|f| fix_face(CellType::Pyramid, f)).collect();
        assert_eq!(pyr, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn unmapped_faces_are_flagged() {
        assert_eq!(fix_face(CellType::Hexahedron, 6), BAD_FACE_INDEX);
        assert_eq!(fix_face(CellType::Tetrahedron, 4), BAD_FACE_INDEX);
        assert_eq!(fix_face(CellType::Prism, 5), BAD_FACE_INDEX);
        assert_eq!(fix_face(CellType::Pyramid, 5), BAD_FACE_INDEX);
        assert_eq!(fix_face(CellType::Triangle, 0), BAD_FACE_INDEX);
    }

    fn two_cell_model() -> InMemoryGridModel {
        let mut m = InMemoryGridModel::new();
        let blk = m.add_block(None);
        let hex = m.add_element(
            blk,
            ElementData::new(CellType::Hexahedron, [0, 1, 2, 3, 4, 5, 6, 7]),
        );
        let tet = m.add_element(blk, ElementData::new(CellType::Tetrahedron, [0, 1, 2, 8]));
        let wall = m.add_domain(Some(BoundaryCondition::new(8, 1, "wall")));
        let inlet = m.add_domain(Some(BoundaryCondition::new(2, 1, "inlet")));
        m.add_boundary_face(wall, hex, 0);
        m.add_boundary_face(wall, tet, 1);
        m.add_boundary_face(inlet, hex, 5);
        m
    }

    #[test]
    fn sequencer_yields_records_in_stream_order() {
        let m = two_cell_model();
        let c = classify_model(BoundaryTypeCatalog::legacy(), &m);
        let records: Vec<FaceRecord> = FaceSequencer::new(&m, &c)
            .collect::<Result<_, _>>()
            .unwrap();
        let rows: Vec<[u32; 3]> = records.into_iter().map(FaceRecord::to_row).collect();
        assert_eq!(rows, vec![[1, 5, 8], [2, 3, 8], [1, 1, 2]]);
    }

    #[test]
    fn missing_owner_is_an_error() {
        let mut m = InMemoryGridModel::new();
        let d = m.add_domain(Some(BoundaryCondition::new(1, 1, "t")));
        m.add_boundary_face(d, 3, 0);
        let c = classify_model(BoundaryTypeCatalog::legacy(), &m);
        let mut out = RecordWriter::new(Vec::new(), Encoding::Ascii);
        let err = write_face_records(&m, &c, &mut out, &mut NullProgress).unwrap_err();
        assert!(matches!(err, AdsExportError::MissingElement { cell: 3 }));
    }

    struct StopAfter(usize);

    impl Progress for StopAfter {
        fn begin_step(&mut self, _total: usize) -> bool {
            true
        }

        fn increment(&mut self) -> bool {
            self.0 = self.0.saturating_sub(1);
            self.0 > 0
        }
    }

    #[test]
    fn cancellation_stops_after_current_record() {
        let m = two_cell_model();
        let c = classify_model(BoundaryTypeCatalog::legacy(), &m);
        let mut out = RecordWriter::new(Vec::new(), Encoding::Ascii);
        let outcome = write_face_records(&m, &c, &mut out, &mut StopAfter(2)).unwrap();
        assert_eq!(outcome, StreamOutcome::Incomplete);
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert_eq!(text, "1 5 8\n2 3 8\n");
    }
}
