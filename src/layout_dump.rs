use crate::layout::{Cell, DiagramData, Layout};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub kind: String,
    pub width: f32,
    pub height: f32,
    pub vertices: Vec<VertexDump>,
    pub edges: Vec<EdgeDump>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub levels: Vec<LevelDump>,
}

#[derive(Debug, Serialize)]
pub struct VertexDump {
    pub id: u32,
    pub value: String,
    pub style: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: u32,
    pub value: String,
    pub source: u32,
    pub target: u32,
    pub points: Vec<[f32; 2]>,
}

/// Members of one flowchart level, left to right.
#[derive(Debug, Serialize)]
pub struct LevelDump {
    pub level: usize,
    pub y: f32,
    pub steps: Vec<String>,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let mut vertices = Vec::new();
        let mut edges = Vec::new();
        for cell in &layout.cells {
            match cell {
                Cell::Vertex(vertex) => vertices.push(VertexDump {
                    id: vertex.id,
                    value: vertex.value.clone(),
                    style: vertex.style.clone(),
                    x: vertex.geometry.x,
                    y: vertex.geometry.y,
                    width: vertex.geometry.width,
                    height: vertex.geometry.height,
                }),
                Cell::Edge(edge) => edges.push(EdgeDump {
                    id: edge.id,
                    value: edge.value.clone(),
                    source: edge.source,
                    target: edge.target,
                    points: edge
                        .source_point
                        .iter()
                        .chain(edge.waypoints.iter())
                        .chain(edge.target_point.iter())
                        .map(|(x, y)| [*x, *y])
                        .collect(),
                }),
            }
        }

        let mut levels: Vec<LevelDump> = Vec::new();
        if let DiagramData::Flowchart { placements } = &layout.diagram {
            let mut ordered: Vec<_> = placements.iter().collect();
            ordered.sort_by(|a, b| a.level.cmp(&b.level).then(a.x.total_cmp(&b.x)));
            for placement in ordered {
                match levels.last_mut() {
                    Some(last) if last.level == placement.level => {
                        last.steps.push(placement.id.clone());
                    }
                    _ => levels.push(LevelDump {
                        level: placement.level,
                        y: placement.y,
                        steps: vec![placement.id.clone()],
                    }),
                }
            }
        }

        LayoutDump {
            kind: layout.kind.as_str().to_string(),
            width: layout.width,
            height: layout.height,
            vertices,
            edges,
            levels,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
