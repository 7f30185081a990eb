use crate::ir::DiagramKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VertexCell {
    pub id: u32,
    /// Raw label text; escaped when the document is serialized.
    pub value: String,
    pub style: String,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeCell {
    pub id: u32,
    pub value: String,
    pub style: String,
    pub source: u32,
    pub target: u32,
    pub source_point: Option<(f32, f32)>,
    pub target_point: Option<(f32, f32)>,
    pub waypoints: Vec<(f32, f32)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Vertex(VertexCell),
    Edge(EdgeCell),
}

impl Cell {
    pub fn id(&self) -> u32 {
        match self {
            Self::Vertex(vertex) => vertex.id,
            Self::Edge(edge) => edge.id,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Vertex(vertex) => &vertex.value,
            Self::Edge(edge) => &edge.value,
        }
    }

    pub fn as_vertex(&self) -> Option<&VertexCell> {
        match self {
            Self::Vertex(vertex) => Some(vertex),
            Self::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&EdgeCell> {
        match self {
            Self::Vertex(_) => None,
            Self::Edge(edge) => Some(edge),
        }
    }
}

/// Where one flowchart step ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct StepPlacement {
    pub id: String,
    pub level: usize,
    pub x: f32,
    pub y: f32,
    pub cell: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LifelinePlacement {
    pub participant: String,
    pub cell: u32,
    pub center_x: f32,
}

#[derive(Debug, Clone)]
pub enum DiagramData {
    Flowchart { placements: Vec<StepPlacement> },
    Sequence { lifelines: Vec<LifelinePlacement> },
    Erd { headers: Vec<(String, u32)> },
    Graph,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub kind: DiagramKind,
    pub cells: Vec<Cell>,
    pub width: f32,
    pub height: f32,
    pub diagram: DiagramData,
}

impl Layout {
    pub fn vertices(&self) -> impl Iterator<Item = &VertexCell> {
        self.cells.iter().filter_map(Cell::as_vertex)
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeCell> {
        self.cells.iter().filter_map(Cell::as_edge)
    }

    pub fn cell(&self, id: u32) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.id() == id)
    }

    pub fn placements(&self) -> &[StepPlacement] {
        match &self.diagram {
            DiagramData::Flowchart { placements } => placements,
            _ => &[],
        }
    }

    pub fn placement(&self, step_id: &str) -> Option<&StepPlacement> {
        self.placements().iter().find(|p| p.id == step_id)
    }
}
