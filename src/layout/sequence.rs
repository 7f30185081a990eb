use std::collections::HashMap;

use log::debug;

use super::*;
use crate::config::SequenceConfig;
use crate::ir::SequenceData;

/// Solid line with a filled arrowhead.
pub const REQUEST_EDGE_STYLE: &str =
    "html=1;verticalAlign=bottom;endArrow=block;curved=0;rounded=0;";
/// Dashed line with an open arrowhead.
pub const REPLY_EDGE_STYLE: &str =
    "html=1;verticalAlign=bottom;endArrow=open;dashed=1;endSize=8;curved=0;rounded=0;";

pub(super) fn compute_sequence_layout(
    data: &SequenceData,
    theme: &Theme,
    config: &SequenceConfig,
) -> Layout {
    let mut builder = CellBuilder::new(theme);
    let mut lifelines: Vec<LifelinePlacement> = Vec::with_capacity(data.participants.len());
    let mut by_name: HashMap<&str, (u32, f32)> = HashMap::new();

    let top = config.margin;
    let lifeline_height =
        config.header_height + (data.interactions.len() + 1) as f32 * config.message_step;

    for (idx, participant) in data.participants.iter().enumerate() {
        if by_name.contains_key(participant.as_str()) {
            debug!(participant = participant.as_str(); "Duplicate participant ignored");
            continue;
        }
        let x = config.margin + idx as f32 * config.participant_spacing;
        let cell = builder.create_vertex(
            VertexSpec::new(participant, "lifeline", x, top)
                .size(Some(config.lifeline_width), Some(lifeline_height))
                .palette(&theme.lifeline),
        );
        let center_x = x + config.lifeline_width / 2.0;
        by_name.insert(participant.as_str(), (cell, center_x));
        lifelines.push(LifelinePlacement {
            participant: participant.clone(),
            cell,
            center_x,
        });
    }

    for (idx, interaction) in data.interactions.iter().enumerate() {
        let (Some(&(source, from_x)), Some(&(target, to_x))) = (
            by_name.get(interaction.from.as_str()),
            by_name.get(interaction.to.as_str()),
        ) else {
            debug!(
                from = interaction.from.as_str(),
                to = interaction.to.as_str();
                "Dropping interaction with unknown participant"
            );
            continue;
        };

        let y = top + config.header_height + (idx + 1) as f32 * config.message_step;
        let style = if interaction.dashed {
            REPLY_EDGE_STYLE
        } else {
            REQUEST_EDGE_STYLE
        };
        let points = if source == target {
            self_message_points(from_x, y, config)
        } else {
            EdgePoints {
                source: Some((from_x, y)),
                target: Some((to_x, y)),
                waypoints: Vec::new(),
            }
        };
        builder.create_edge_between_points(
            source,
            target,
            Some(interaction.message.as_str()),
            Some(style),
            points,
        );
    }

    builder.finish(DiagramKind::Sequence, DiagramData::Sequence { lifelines })
}

// Loops out to the right and comes back a little lower on the same lifeline.
fn self_message_points(center_x: f32, y: f32, config: &SequenceConfig) -> EdgePoints {
    let drop = config.message_step / 2.0;
    let loop_x = center_x + config.self_loop_width;
    EdgePoints {
        source: Some((center_x, y)),
        target: Some((center_x, y + drop)),
        waypoints: vec![(loop_x, y), (loop_x, y + drop)],
    }
}
