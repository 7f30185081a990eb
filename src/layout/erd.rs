use std::collections::{HashMap, HashSet};

use log::debug;

use super::*;
use crate::config::ErdConfig;
use crate::ir::{Entity, ErdData};

/// Undirected connector; the label is the only relationship semantics carried.
pub const RELATIONSHIP_EDGE_STYLE: &str =
    "edgeStyle=entityRelationEdgeStyle;endArrow=none;startArrow=none;html=1;rounded=0;";

pub(super) fn compute_erd_layout(data: &ErdData, theme: &Theme, config: &ErdConfig) -> Layout {
    let mut builder = CellBuilder::new(theme);
    let mut header_of: HashMap<&str, u32> = HashMap::new();
    let mut headers: Vec<(String, u32)> = Vec::with_capacity(data.entities.len());

    let entities: Vec<&Entity> = {
        let mut seen = HashSet::new();
        data.entities
            .iter()
            .filter(|entity| {
                let fresh = seen.insert(entity.id.as_str());
                if !fresh {
                    debug!(entity = entity.id.as_str(); "Duplicate entity ignored");
                }
                fresh
            })
            .collect()
    };

    let columns = config.columns.max(1);
    let mut row_top = config.margin;
    for row in entities.chunks(columns) {
        let mut tallest = 0.0f32;
        for (col, entity) in row.iter().enumerate() {
            let x = config.margin + col as f32 * config.column_spacing;
            let header = place_entity(&mut builder, entity, x, row_top, theme, config);
            header_of.insert(entity.id.as_str(), header);
            headers.push((entity.id.clone(), header));
            tallest = tallest.max(entity_height(entity, config));
        }
        row_top += tallest + config.row_gap;
    }

    for rel in &data.relationships {
        let (Some(&source), Some(&target)) =
            (header_of.get(rel.from.as_str()), header_of.get(rel.to.as_str()))
        else {
            debug!(from = rel.from.as_str(), to = rel.to.as_str(); "Dropping relationship with unknown entity");
            continue;
        };
        builder.create_edge(
            source,
            target,
            rel.label.as_deref(),
            Some(RELATIONSHIP_EDGE_STYLE),
        );
    }

    builder.finish(DiagramKind::Erd, DiagramData::Erd { headers })
}

fn entity_height(entity: &Entity, config: &ErdConfig) -> f32 {
    config.header_height + entity.attributes.len() as f32 * config.row_height
}

/// Header plus one row per attribute; returns the header cell id.
fn place_entity(
    builder: &mut CellBuilder<'_>,
    entity: &Entity,
    x: f32,
    y: f32,
    theme: &Theme,
    config: &ErdConfig,
) -> u32 {
    let header = builder.create_vertex(
        VertexSpec::new(&entity.name, "entity", x, y)
            .size(Some(config.entity_width), Some(config.header_height))
            .palette(&theme.entity_header),
    );
    for (idx, attribute) in entity.attributes.iter().enumerate() {
        let row_y = y + config.header_height + idx as f32 * config.row_height;
        builder.create_vertex(
            VertexSpec::new(attribute, "attribute", x, row_y)
                .size(Some(config.entity_width), Some(config.row_height))
                .palette(&theme.entity_attribute),
        );
    }
    header
}
