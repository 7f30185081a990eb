use std::collections::HashMap;

use log::{debug, warn};

use super::ranking::{FlowGraph, Levels};
use super::*;
use crate::config::FlowchartConfig;
use crate::ir::{Connection, FlowchartData, Step};

pub(super) fn compute_flowchart_layout(
    data: &FlowchartData,
    theme: &Theme,
    config: &FlowchartConfig,
) -> Layout {
    let step_ids: Vec<String> = data
        .steps
        .iter()
        .enumerate()
        .map(|(idx, step)| step.resolved_id(idx))
        .collect();

    let connections = match data.connections.as_deref() {
        Some(declared) if !declared.is_empty() => declared.to_vec(),
        _ => sequential_chain(&data.steps, &step_ids),
    };

    let graph = FlowGraph::new(
        &step_ids,
        connections
            .iter()
            .map(|conn| (conn.from.as_str(), conn.to.as_str())),
    );
    let levels = graph.assign_levels();
    let positions = assign_coordinates(&levels, config);

    let mut builder = CellBuilder::new(theme);
    let mut cell_of: HashMap<&str, u32> = HashMap::new();
    let mut placements = Vec::with_capacity(step_ids.len());

    for (step, id) in data.steps.iter().zip(&step_ids) {
        if cell_of.contains_key(id.as_str()) {
            warn!(step = id.as_str(); "Duplicate step id, keeping the first declaration");
            continue;
        }
        let Some(&(level, x, y)) = positions.get(id.as_str()) else {
            continue;
        };
        let kind = step.kind.as_deref().unwrap_or(&config.default_kind);
        let palette = theme.palette_for(kind);
        let cell = builder.create_vertex(
            VertexSpec::new(&step.label, kind, x, y)
                .size(step.width, step.height)
                .palette(&palette),
        );
        cell_of.insert(id.as_str(), cell);
        placements.push(StepPlacement {
            id: id.clone(),
            level,
            x,
            y,
            cell,
        });
    }

    for conn in &connections {
        let (Some(&source), Some(&target)) =
            (cell_of.get(conn.from.as_str()), cell_of.get(conn.to.as_str()))
        else {
            debug!(from = conn.from.as_str(), to = conn.to.as_str(); "Dropping connection with unknown endpoint");
            continue;
        };
        builder.create_edge(source, target, conn.label.as_deref(), None);
    }

    builder.finish(DiagramKind::Flowchart, DiagramData::Flowchart { placements })
}

/// `step[i] -> step[i + 1]`, labeled with the source step's connector label.
fn sequential_chain(steps: &[Step], step_ids: &[String]) -> Vec<Connection> {
    steps
        .iter()
        .zip(step_ids.windows(2))
        .map(|(step, pair)| Connection {
            from: pair[0].clone(),
            to: pair[1].clone(),
            label: step.connector_label.clone(),
        })
        .collect()
}

/// Centers each level's members on `center_x`, one row per level.
fn assign_coordinates<'l>(
    levels: &'l Levels,
    config: &FlowchartConfig,
) -> HashMap<&'l str, (usize, f32, f32)> {
    let mut positions = HashMap::with_capacity(levels.len());
    for (&level, members) in levels.rows() {
        let row_width = members.len().saturating_sub(1) as f32 * config.horizontal_spacing;
        let start_x = config.center_x - row_width / 2.0;
        let y = config.margin_y + level as f32 * config.level_height;
        for (idx, id) in members.iter().enumerate() {
            let x = start_x + idx as f32 * config.horizontal_spacing;
            positions.insert(id.as_str(), (level, x, y));
        }
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Step;

    fn layout(steps: Vec<Step>, connections: Option<Vec<Connection>>) -> Layout {
        let data = FlowchartData { steps, connections };
        compute_flowchart_layout(&data, &Theme::drawio_default(), &FlowchartConfig::default())
    }

    #[test]
    fn start_end_scenario() {
        let layout = layout(
            vec![
                Step::new("s", "Start").with_kind("terminator"),
                Step::new("e", "End").with_kind("terminator"),
            ],
            Some(vec![Connection::new("s", "e", Some("go"))]),
        );
        assert_eq!(layout.vertices().count(), 2);
        assert_eq!(layout.placement("s").unwrap().level, 0);
        assert_eq!(layout.placement("e").unwrap().level, 1);
        let edges: Vec<_> = layout.edges().collect();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].value, "go");
        assert_eq!(edges[0].source, layout.placement("s").unwrap().cell);
        assert_eq!(edges[0].target, layout.placement("e").unwrap().cell);
    }

    #[test]
    fn levels_are_centered() {
        let layout = layout(
            vec![
                Step::new("root", "Root"),
                Step::new("a", "A"),
                Step::new("b", "B"),
                Step::new("c", "C"),
            ],
            Some(vec![
                Connection::new("root", "a", None),
                Connection::new("root", "b", None),
                Connection::new("root", "c", None),
            ]),
        );
        let root = layout.placement("root").unwrap();
        assert_eq!((root.x, root.y), (400.0, 40.0));
        let xs: Vec<f32> = ["a", "b", "c"]
            .iter()
            .map(|id| layout.placement(id).unwrap().x)
            .collect();
        assert_eq!(xs, vec![200.0, 400.0, 600.0]);
        assert!(["a", "b", "c"].iter().all(|id| layout.placement(id).unwrap().y == 160.0));
    }

    #[test]
    fn missing_connections_synthesize_chain() {
        let mut first = Step::new("x", "First");
        first.connector_label = Some("then".to_string());
        let mut second = Step::new("y", "Second");
        second.id = None;
        let layout = layout(vec![first, second, Step::new("z", "Third")], None);
        assert_eq!(layout.placement("x").unwrap().level, 0);
        // Second step has no id and takes its position.
        assert_eq!(layout.placement("2").unwrap().level, 1);
        assert_eq!(layout.placement("z").unwrap().level, 2);
        let labels: Vec<&str> = layout.edges().map(|e| e.value.as_str()).collect();
        assert_eq!(labels, vec!["then", ""]);
    }

    #[test]
    fn empty_connection_list_also_chains() {
        let layout = layout(
            vec![Step::new("a", "A"), Step::new("b", "B")],
            Some(Vec::new()),
        );
        assert_eq!(layout.edges().count(), 1);
        assert_eq!(layout.placement("b").unwrap().level, 1);
    }

    #[test]
    fn dangling_connection_is_dropped() {
        let with_ghost = layout(
            vec![Step::new("a", "A"), Step::new("b", "B")],
            Some(vec![
                Connection::new("a", "b", None),
                Connection::new("a", "ghost", Some("lost")),
            ]),
        );
        assert_eq!(with_ghost.vertices().count(), 2);
        assert_eq!(with_ghost.edges().count(), 1);
        assert!(with_ghost.edges().all(|e| e.value != "lost"));
    }

    #[test]
    fn edges_reference_earlier_cells() {
        let layout = layout(
            vec![Step::new("a", "A"), Step::new("b", "B"), Step::new("c", "C")],
            Some(vec![
                Connection::new("c", "a", None),
                Connection::new("a", "b", None),
                Connection::new("b", "c", None),
            ]),
        );
        for edge in layout.edges() {
            assert!(edge.source < edge.id);
            assert!(edge.target < edge.id);
        }
    }

    #[test]
    fn duplicate_step_ids_produce_one_vertex() {
        let layout = layout(
            vec![Step::new("a", "A"), Step::new("a", "Again"), Step::new("b", "B")],
            Some(vec![Connection::new("a", "b", None)]),
        );
        assert_eq!(layout.vertices().count(), 2);
        assert_eq!(layout.vertices().next().unwrap().value, "A");
    }

    #[test]
    fn step_kind_drives_style_and_size() {
        let mut decision = Step::new("d", "Ok?").with_kind("decision");
        decision.width = Some(80.0);
        decision.height = Some(80.0);
        let layout = layout(vec![decision], None);
        let vertex = layout.vertices().next().unwrap();
        assert!(vertex.style.starts_with("rhombus;"));
        assert!(vertex.style.contains("fillColor=#fff2cc;"));
        assert_eq!((vertex.geometry.width, vertex.geometry.height), (80.0, 80.0));
    }

    #[test]
    fn layout_is_deterministic() {
        let build = || {
            layout(
                vec![
                    Step::new("a", "A"),
                    Step::new("b", "B"),
                    Step::new("c", "C"),
                    Step::new("d", "D"),
                ],
                Some(vec![
                    Connection::new("a", "b", None),
                    Connection::new("a", "c", None),
                    Connection::new("c", "d", None),
                    Connection::new("d", "a", None),
                ]),
            )
        };
        let first = build();
        let second = build();
        assert_eq!(first.placements(), second.placements());
        assert_eq!(first.cells, second.cells);
    }
}
