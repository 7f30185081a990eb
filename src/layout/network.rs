use std::collections::HashMap;

use log::debug;

use super::*;
use crate::config::NetworkConfig;
use crate::ir::{Connection, CustomData, NetworkData};

/// Plain labeled connector for caller-positioned diagrams.
pub const PLAIN_EDGE_STYLE: &str = "endArrow=classic;html=1;rounded=0;";

pub(super) fn compute_network_layout(
    data: &NetworkData,
    theme: &Theme,
    config: &NetworkConfig,
) -> Layout {
    let mut builder = CellBuilder::new(theme);
    let mut cell_of: HashMap<&str, u32> = HashMap::new();
    let columns = config.grid_columns.max(1);

    for (idx, node) in data.nodes.iter().enumerate() {
        let x = node
            .x
            .unwrap_or(config.margin + (idx % columns) as f32 * config.column_spacing);
        let y = node
            .y
            .unwrap_or(config.margin + (idx / columns) as f32 * config.row_spacing);
        let kind = node.kind.as_deref().unwrap_or("rectangle");
        let cell = builder.create_vertex(
            VertexSpec::new(&node.label, kind, x, y).size(node.width, node.height),
        );
        register(&mut cell_of, &node.id, cell);
    }

    connect(&mut builder, &cell_of, &data.connections);
    builder.finish(DiagramKind::Network, DiagramData::Graph)
}

pub(super) fn compute_custom_layout(data: &CustomData, theme: &Theme) -> Layout {
    let mut builder = CellBuilder::new(theme);
    let mut cell_of: HashMap<&str, u32> = HashMap::new();

    for shape in &data.shapes {
        let cell = builder.create_vertex(
            VertexSpec::new(&shape.label, &shape.kind, shape.x, shape.y)
                .size(shape.width, shape.height),
        );
        register(&mut cell_of, &shape.id, cell);
    }

    if let Some(connectors) = data.connectors.as_deref() {
        connect(&mut builder, &cell_of, connectors);
    }
    builder.finish(DiagramKind::Custom, DiagramData::Graph)
}

// First declaration of an id wins as a connector endpoint.
fn register<'a>(cell_of: &mut HashMap<&'a str, u32>, id: &'a str, cell: u32) {
    if cell_of.contains_key(id) {
        debug!(id; "Duplicate node id, connectors attach to the first one");
        return;
    }
    cell_of.insert(id, cell);
}

fn connect(builder: &mut CellBuilder<'_>, cell_of: &HashMap<&str, u32>, connections: &[Connection]) {
    for conn in connections {
        let (Some(&source), Some(&target)) =
            (cell_of.get(conn.from.as_str()), cell_of.get(conn.to.as_str()))
        else {
            debug!(from = conn.from.as_str(), to = conn.to.as_str(); "Dropping connector with unknown endpoint");
            continue;
        };
        builder.create_edge(source, target, conn.label.as_deref(), Some(PLAIN_EDGE_STYLE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{CustomShape, NetworkNode};

    fn node(id: &str, kind: Option<&str>, at: Option<(f32, f32)>) -> NetworkNode {
        NetworkNode {
            id: id.to_string(),
            label: id.to_uppercase(),
            kind: kind.map(str::to_string),
            x: at.map(|p| p.0),
            y: at.map(|p| p.1),
            width: None,
            height: None,
        }
    }

    #[test]
    fn network_nodes_keep_caller_positions() {
        let data = NetworkData {
            nodes: vec![
                node("r1", Some("router"), Some((300.0, 50.0))),
                node("s1", Some("switch"), Some((300.0, 200.0))),
            ],
            connections: vec![Connection::new("r1", "s1", Some("10G"))],
        };
        let layout = compute_network_layout(&data, &Theme::drawio_default(), &NetworkConfig::default());
        let vertices: Vec<_> = layout.vertices().collect();
        assert_eq!((vertices[0].geometry.x, vertices[0].geometry.y), (300.0, 50.0));
        assert!(vertices[0].style.starts_with("shape=mxgraph.cisco.routers.router;"));
        let edge = layout.edges().next().unwrap();
        assert_eq!(edge.value, "10G");
        assert_eq!(edge.style, PLAIN_EDGE_STYLE);
    }

    #[test]
    fn missing_positions_fall_back_to_grid() {
        let data = NetworkData {
            nodes: (0..5).map(|i| node(&format!("n{i}"), None, None)).collect(),
            connections: Vec::new(),
        };
        let layout = compute_network_layout(&data, &Theme::drawio_default(), &NetworkConfig::default());
        let positions: Vec<(f32, f32)> = layout
            .vertices()
            .map(|v| (v.geometry.x, v.geometry.y))
            .collect();
        assert_eq!(positions[0], (100.0, 100.0));
        assert_eq!(positions[3], (640.0, 100.0));
        assert_eq!(positions[4], (100.0, 250.0));
    }

    #[test]
    fn custom_shapes_and_connectors() {
        let data = CustomData {
            shapes: vec![
                CustomShape {
                    id: "a".into(),
                    label: "Alpha".into(),
                    kind: "cloud".into(),
                    x: 10.0,
                    y: 20.0,
                    width: Some(160.0),
                    height: None,
                },
                CustomShape {
                    id: "b".into(),
                    label: "Beta".into(),
                    kind: "unheard-of".into(),
                    x: 300.0,
                    y: 20.0,
                    width: None,
                    height: None,
                },
            ],
            connectors: Some(vec![
                Connection::new("a", "b", None),
                Connection::new("b", "zzz", None),
            ]),
        };
        let layout = compute_custom_layout(&data, &Theme::drawio_default());
        let vertices: Vec<_> = layout.vertices().collect();
        assert_eq!(vertices[0].geometry.width, 160.0);
        assert!(vertices[0].style.contains("shape=cloud;"));
        assert!(vertices[1].style.starts_with("rounded=0;"));
        assert_eq!(layout.edges().count(), 1);
    }

    #[test]
    fn custom_without_connectors() {
        let data = CustomData {
            shapes: Vec::new(),
            connectors: None,
        };
        let layout = compute_custom_layout(&data, &Theme::drawio_default());
        assert!(layout.cells.is_empty());
    }
}
