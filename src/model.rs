//! Grid model interface consumed by the exporter.
//!
//! The exporter never mutates the model. All indices are 0-based and stable:
//! domains (boundary face groups), blocks (volume regions), vertices and
//! elements are enumerated in the order the model reports them.
//!
//! [`InMemoryGridModel`] implements the trait over plain vectors.

use crate::topology::cell_type::CellType;
use std::collections::BTreeMap;

/// Attribute carrying the case name written as the `.REST` title.
pub const TITLE_ATTRIBUTE: &str = "Title";

/// Condition attached to a boundary domain or a volume block.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConditionRecord {
    /// Host type id; `0` means unspecified.
    pub type_id: u32,
    /// User-assigned instance id (pairs periodic faces).
    pub instance_id: u32,
    /// User-visible condition name.
    pub name: String,
}

impl ConditionRecord {
    pub fn new(type_id: u32, instance_id: u32, name: impl Into<String>) -> Self {
        Self {
            type_id,
            instance_id,
            name: name.into(),
        }
    }
}

/// Condition on a boundary face group.
pub type BoundaryCondition = ConditionRecord;
/// Condition on a volume region.
pub type VolumeCondition = ConditionRecord;

/// Element shape plus its ordered, 0-based vertex indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementData {
    pub shape: CellType,
    pub vertices: Vec<usize>,
}

impl ElementData {
    pub fn new(shape: CellType, vertices: impl Into<Vec<usize>>) -> Self {
        Self {
            shape,
            vertices: vertices.into(),
        }
    }
}

/// One boundary face as reported by the model's face stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundaryFace {
    /// Global, 0-based index of the cell owning the face.
    pub owner_cell: usize,
    /// Face index local to the owner cell, in the model's numbering.
    pub cell_face_index: u32,
    /// Boundary domain the face belongs to.
    pub domain: usize,
}

/// Read-only grid model queries.
pub trait GridModel {
    /// Lazy, finite stream of boundary faces.
    type FaceIter<'a>: Iterator<Item = BoundaryFace> + 'a
    where
        Self: 'a;

    /// Number of boundary domains.
    fn domain_count(&self) -> usize;
    /// Boundary condition of a domain, `None` when the query fails.
    fn domain_condition(&self, domain: usize) -> Option<BoundaryCondition>;
    /// Number of boundary faces in a domain.
    fn domain_element_count(&self, domain: usize) -> usize;

    /// Number of volume blocks.
    fn block_count(&self) -> usize;
    /// Volume condition of a block, `None` when the query fails.
    fn block_condition(&self, block: usize) -> Option<VolumeCondition>;
    /// Number of cells in a block.
    fn block_element_count(&self, block: usize) -> usize;

    fn vertex_count(&self) -> usize;
    fn vertex(&self, index: usize) -> Option<[f64; 3]>;

    fn element_count(&self) -> usize;
    fn element(&self, index: usize) -> Option<ElementData>;

    /// Boundary faces grouped by domain (faces of one boundary group are
    /// contiguous).
    fn boundary_faces(&self) -> Self::FaceIter<'_>;

    /// Total number of faces `boundary_faces` will yield.
    fn boundary_face_count(&self) -> usize {
        (0..self.domain_count())
            .map(|d| self.domain_element_count(d))
            .sum()
    }

    /// Named string attribute set on the model.
    fn attribute(&self, name: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
struct BlockData {
    condition: Option<VolumeCondition>,
    element_count: usize,
}

#[derive(Clone, Debug, Default)]
struct DomainData {
    condition: Option<BoundaryCondition>,
    faces: Vec<(usize, u32)>,
}

/// Vector-backed [`GridModel`].
#[derive(Clone, Debug, Default)]
pub struct InMemoryGridModel {
    vertices: Vec<[f64; 3]>,
    elements: Vec<ElementData>,
    blocks: Vec<BlockData>,
    domains: Vec<DomainData>,
    attributes: BTreeMap<String, String>,
}

impl InMemoryGridModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, xyz: [f64; 3]) -> usize {
        self.vertices.push(xyz);
        self.vertices.len() - 1
    }

    /// Add a volume block. `None` simulates a failing condition query.
    pub fn add_block(&mut self, condition: Option<VolumeCondition>) -> usize {
        self.blocks.push(BlockData {
            condition,
            element_count: 0,
        });
        self.blocks.len() - 1
    }

    /// Append a cell to `block` and return its global index.
    ///
    /// # Panics
    /// Panics if `block` was not created with [`Self::add_block`].
    pub fn add_element(&mut self, block: usize, element: ElementData) -> usize {
        self.blocks[block].element_count += 1;
        self.elements.push(element);
        self.elements.len() - 1
    }

    /// Add a boundary domain. `None` simulates a failing condition query.
    pub fn add_domain(&mut self, condition: Option<BoundaryCondition>) -> usize {
        self.domains.push(DomainData {
            condition,
            faces: Vec::new(),
        });
        self.domains.len() - 1
    }

    /// Attach face `cell_face_index` of `owner_cell` to `domain`.
    ///
    /// # Panics
    /// Panics if `domain` was not created with [`Self::add_domain`].
    pub fn add_boundary_face(&mut self, domain: usize, owner_cell: usize, cell_face_index: u32) {
        self.domains[domain]
            .faces
            .push((owner_cell, cell_face_index));
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }
}

impl GridModel for InMemoryGridModel {
    type FaceIter<'a> = Box<dyn Iterator<Item = BoundaryFace> + 'a>;

    fn domain_count(&self) -> usize {
        self.domains.len()
    }

    fn domain_condition(&self, domain: usize) -> Option<BoundaryCondition> {
        self.domains.get(domain)?.condition.clone()
    }

    fn domain_element_count(&self, domain: usize) -> usize {
        self.domains.get(domain).map_or(0, |d| d.faces.len())
    }

    fn block_count(&self) -> usize {
        self.blocks.len()
    }

    fn block_condition(&self, block: usize) -> Option<VolumeCondition> {
        self.blocks.get(block)?.condition.clone()
    }

    fn block_element_count(&self, block: usize) -> usize {
        self.blocks.get(block).map_or(0, |b| b.element_count)
    }

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn vertex(&self, index: usize) -> Option<[f64; 3]> {
        self.vertices.get(index).copied()
    }

    fn element_count(&self) -> usize {
        self.elements.len()
    }

    fn element(&self, index: usize) -> Option<ElementData> {
        self.elements.get(index).cloned()
    }

    fn boundary_faces(&self) -> Self::FaceIter<'_> {
        Box::new(self.domains.iter().enumerate().flat_map(|(domain, data)| {
            data.faces
                .iter()
                .map(move |&(owner_cell, cell_face_index)| BoundaryFace {
                    owner_cell,
                    cell_face_index,
                    domain,
                })
        }))
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faces_stream_grouped_by_domain() {
        let mut m = InMemoryGridModel::new();
        let blk = m.add_block(None);
        let tet = m.add_element(blk, ElementData::new(CellType::Tetrahedron, [0, 1, 2, 3]));
        let a = m.add_domain(None);
        let b = m.add_domain(None);
        m.add_boundary_face(b, tet, 2);
        m.add_boundary_face(a, tet, 0);
        m.add_boundary_face(b, tet, 3);

        let faces: Vec<_> = m.boundary_faces().map(|f| (f.domain, f.cell_face_index)).collect();
        assert_eq!(faces, vec![(0, 0), (1, 2), (1, 3)]);
        assert_eq!(m.boundary_face_count(), 3);
        assert_eq!(m.block_element_count(blk), 1);
    }

    #[test]
    fn failed_queries_are_none() {
        let mut m = InMemoryGridModel::new();
        m.add_domain(None);
        assert_eq!(m.domain_condition(0), None);
        assert_eq!(m.domain_condition(7), None);
        assert_eq!(m.vertex(0), None);
        assert_eq!(m.attribute(TITLE_ATTRIBUTE), None);
    }
}
