mod erd;
mod flowchart;
mod network;
pub mod ranking;
mod sequence;
pub(crate) mod types;
pub use types::*;
use erd::*;
use flowchart::*;
use network::*;
use sequence::*;

use crate::config::{DEFAULT_VERTEX_HEIGHT, DEFAULT_VERTEX_WIDTH, LayoutConfig};
use crate::ir::{Diagram, DiagramKind};
use crate::shapes::{compose_style, style_for};
use crate::theme::{Palette, Theme};
use log::debug;

/// Ids 0 and 1 belong to the document's root and layer cells.
pub const FIRST_CELL_ID: u32 = 2;

/// Orthogonal routed connector with automatic jetty length.
pub const DEFAULT_EDGE_STYLE: &str =
    "edgeStyle=orthogonalEdgeStyle;rounded=0;orthogonalLoop=1;jettySize=auto;html=1;";

const BOUNDS_PADDING: f32 = 40.0;

pub fn compute_layout(diagram: &Diagram, theme: &Theme, config: &LayoutConfig) -> Layout {
    let layout = match diagram {
        Diagram::Flowchart(data) => compute_flowchart_layout(data, theme, &config.flowchart),
        Diagram::Sequence(data) => compute_sequence_layout(data, theme, &config.sequence),
        Diagram::Erd(data) => compute_erd_layout(data, theme, &config.erd),
        Diagram::Network(data) => compute_network_layout(data, theme, &config.network),
        Diagram::Custom(data) => compute_custom_layout(data, theme),
    };
    debug!(
        kind = layout.kind.as_str(),
        vertices = layout.vertices().count(),
        edges = layout.edges().count();
        "Layout computed"
    );
    layout
}

/// Geometry and look of a vertex about to be created.
#[derive(Debug, Clone, Copy)]
pub struct VertexSpec<'s> {
    pub label: &'s str,
    pub kind: &'s str,
    pub x: f32,
    pub y: f32,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub fill: Option<&'s str>,
    pub stroke: Option<&'s str>,
}

impl<'s> VertexSpec<'s> {
    pub fn new(label: &'s str, kind: &'s str, x: f32, y: f32) -> Self {
        Self {
            label,
            kind,
            x,
            y,
            width: None,
            height: None,
            fill: None,
            stroke: None,
        }
    }

    pub fn size(mut self, width: Option<f32>, height: Option<f32>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn palette(mut self, palette: &'s Palette) -> Self {
        self.fill = Some(palette.fill.as_str());
        self.stroke = Some(palette.stroke.as_str());
        self
    }
}

/// Absolute terminal points for a connector that is not routed by the editor.
#[derive(Debug, Clone, Default)]
pub struct EdgePoints {
    pub source: Option<(f32, f32)>,
    pub target: Option<(f32, f32)>,
    pub waypoints: Vec<(f32, f32)>,
}

/// Per-document cell factory: owns the id counter and the ordered cell list.
pub struct CellBuilder<'t> {
    theme: &'t Theme,
    next_id: u32,
    cells: Vec<Cell>,
}

impl<'t> CellBuilder<'t> {
    pub fn new(theme: &'t Theme) -> Self {
        Self {
            theme,
            next_id: FIRST_CELL_ID,
            cells: Vec::new(),
        }
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn create_vertex(&mut self, spec: VertexSpec<'_>) -> u32 {
        let fill = spec.fill.unwrap_or(self.theme.fill_color.as_str());
        let stroke = spec.stroke.unwrap_or(self.theme.stroke_color.as_str());
        let style = compose_style(style_for(spec.kind), fill, stroke);
        let id = self.allocate_id();
        self.cells.push(Cell::Vertex(VertexCell {
            id,
            value: spec.label.to_string(),
            style,
            geometry: Geometry {
                x: spec.x,
                y: spec.y,
                width: spec.width.unwrap_or(DEFAULT_VERTEX_WIDTH),
                height: spec.height.unwrap_or(DEFAULT_VERTEX_HEIGHT),
            },
        }));
        id
    }

    pub fn create_edge(
        &mut self,
        source: u32,
        target: u32,
        label: Option<&str>,
        style: Option<&str>,
    ) -> u32 {
        self.create_edge_between_points(source, target, label, style, EdgePoints::default())
    }

    pub fn create_edge_between_points(
        &mut self,
        source: u32,
        target: u32,
        label: Option<&str>,
        style: Option<&str>,
        points: EdgePoints,
    ) -> u32 {
        let id = self.allocate_id();
        self.cells.push(Cell::Edge(EdgeCell {
            id,
            value: label.unwrap_or_default().to_string(),
            style: style.unwrap_or(DEFAULT_EDGE_STYLE).to_string(),
            source,
            target,
            source_point: points.source,
            target_point: points.target,
            waypoints: points.waypoints,
        }));
        id
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn finish(self, kind: DiagramKind, diagram: DiagramData) -> Layout {
        let (max_x, max_y) = bounds(&self.cells);
        Layout {
            kind,
            cells: self.cells,
            width: max_x + BOUNDS_PADDING,
            height: max_y + BOUNDS_PADDING,
            diagram,
        }
    }
}

fn bounds(cells: &[Cell]) -> (f32, f32) {
    let mut max_x = 0.0f32;
    let mut max_y = 0.0f32;
    for cell in cells {
        match cell {
            Cell::Vertex(vertex) => {
                let geometry = vertex.geometry;
                max_x = max_x.max(geometry.x + geometry.width);
                max_y = max_y.max(geometry.y + geometry.height);
            }
            Cell::Edge(edge) => {
                let points = edge
                    .source_point
                    .iter()
                    .chain(edge.target_point.iter())
                    .chain(edge.waypoints.iter());
                for (x, y) in points {
                    max_x = max_x.max(*x);
                    max_y = max_y.max(*y);
                }
            }
        }
    }
    (max_x, max_y)
}
