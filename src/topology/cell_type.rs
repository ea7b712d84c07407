//! Cell type metadata for grid-model elements.

/// Largest vertex count of any supported element shape (hexahedron).
///
/// Connectivity records are always this wide.
pub const MAX_ELEMENT_VERTICES: usize = 8;

/// Element shapes the grid model can report.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CellType {
    /// 0D vertex.
    Vertex,
    /// 1D segment/edge (bar).
    Segment,
    /// 2D simplex (triangle).
    Triangle,
    /// 2D tensor-product cell (quad).
    Quadrilateral,
    /// 3D simplex (tet).
    Tetrahedron,
    /// 3D tensor-product cell (hex).
    Hexahedron,
    /// 3D wedge/prism.
    Prism,
    /// 3D pyramid.
    Pyramid,
}

impl Default for CellType {
    fn default() -> Self {
        CellType::Vertex
    }
}

impl CellType {
    /// Returns the topological dimension of the cell.
    pub fn dimension(self) -> u8 {
        match self {
            CellType::Vertex => 0,
            CellType::Segment => 1,
            CellType::Triangle | CellType::Quadrilateral => 2,
            CellType::Tetrahedron | CellType::Hexahedron | CellType::Prism | CellType::Pyramid => 3,
        }
    }

    /// Number of corner vertices.
    pub fn vertex_count(self) -> usize {
        match self {
            CellType::Vertex => 1,
            CellType::Segment => 2,
            CellType::Triangle => 3,
            CellType::Quadrilateral | CellType::Tetrahedron => 4,
            CellType::Pyramid => 5,
            CellType::Prism => 6,
            CellType::Hexahedron => 8,
        }
    }

    /// Number of bounding faces for volume cells, zero otherwise.
    pub fn face_count(self) -> usize {
        match self {
            CellType::Tetrahedron => 4,
            CellType::Prism | CellType::Pyramid => 5,
            CellType::Hexahedron => 6,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hexahedron_is_widest_shape() {
        let shapes = [
            CellType::Vertex,
            CellType::Segment,
            CellType::Triangle,
            CellType::Quadrilateral,
            CellType::Tetrahedron,
            CellType::Hexahedron,
            CellType::Prism,
            CellType::Pyramid,
        ];
        let widest = shapes.iter().map(|s| s.vertex_count()).max();
        assert_eq!(widest, Some(MAX_ELEMENT_VERTICES));
    }

    #[test]
    fn only_volume_cells_have_faces() {
        assert_eq!(CellType::Triangle.face_count(), 0);
        assert_eq!(CellType::Tetrahedron.face_count(), 4);
        assert_eq!(CellType::Pyramid.face_count(), 5);
        assert_eq!(CellType::Hexahedron.dimension(), 3);
    }
}
