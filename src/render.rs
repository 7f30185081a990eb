use crate::error::DiagramError;
use crate::layout::{Cell, EdgeCell, Layout, VertexCell};
use anyhow::Result;
use std::io::Write as _;
use std::path::Path;

const AGENT: &str = concat!("drawio-rs-generator/", env!("CARGO_PKG_VERSION"));
const EDITOR_VERSION: &str = "24.7.17";

/// Serializes `layout` with the current UTC time as the modification stamp.
pub fn serialize_document(layout: &Layout) -> String {
    let modified = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    serialize_document_at(layout, &modified)
}

/// Serializes `layout` into a single-page `mxfile` document. Apart from the
/// `modified` attribute the output depends only on the layout.
pub fn serialize_document_at(layout: &Layout, modified: &str) -> String {
    let mut xml = String::new();
    xml.push_str(&format!(
        "<mxfile host=\"drawio-rs-generator\" modified=\"{}\" agent=\"{AGENT}\" version=\"{EDITOR_VERSION}\" type=\"device\">\n",
        escape_xml(modified)
    ));
    xml.push_str(&format!(
        "  <diagram name=\"Page-1\" id=\"{}-diagram\">\n",
        layout.kind.as_str()
    ));

    let page_width = layout.width.max(850.0).ceil();
    let page_height = layout.height.max(1100.0).ceil();
    xml.push_str(&format!(
        "    <mxGraphModel dx=\"1422\" dy=\"794\" grid=\"1\" gridSize=\"10\" guides=\"1\" tooltips=\"1\" connect=\"1\" arrows=\"1\" fold=\"1\" page=\"1\" pageScale=\"1\" pageWidth=\"{page_width}\" pageHeight=\"{page_height}\" math=\"0\" shadow=\"0\">\n"
    ));
    xml.push_str("      <root>\n");
    xml.push_str("        <mxCell id=\"0\" />\n");
    xml.push_str("        <mxCell id=\"1\" parent=\"0\" />\n");

    for cell in &layout.cells {
        match cell {
            Cell::Vertex(vertex) => push_vertex(&mut xml, vertex),
            Cell::Edge(edge) => push_edge(&mut xml, edge),
        }
    }

    xml.push_str("      </root>\n");
    xml.push_str("    </mxGraphModel>\n");
    xml.push_str("  </diagram>\n");
    xml.push_str("</mxfile>\n");
    xml
}

fn push_vertex(xml: &mut String, vertex: &VertexCell) {
    let geometry = vertex.geometry;
    xml.push_str(&format!(
        "        <mxCell id=\"{}\" value=\"{}\" style=\"{}\" vertex=\"1\" parent=\"1\">\n",
        vertex.id,
        escape_xml(&vertex.value),
        escape_xml(&vertex.style),
    ));
    xml.push_str(&format!(
        "          <mxGeometry x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" as=\"geometry\" />\n",
        geometry.x, geometry.y, geometry.width, geometry.height,
    ));
    xml.push_str("        </mxCell>\n");
}

fn push_edge(xml: &mut String, edge: &EdgeCell) {
    xml.push_str(&format!(
        "        <mxCell id=\"{}\" value=\"{}\" style=\"{}\" edge=\"1\" parent=\"1\" source=\"{}\" target=\"{}\">\n",
        edge.id,
        escape_xml(&edge.value),
        escape_xml(&edge.style),
        edge.source,
        edge.target,
    ));

    let has_points =
        edge.source_point.is_some() || edge.target_point.is_some() || !edge.waypoints.is_empty();
    if !has_points {
        xml.push_str("          <mxGeometry relative=\"1\" as=\"geometry\" />\n");
    } else {
        xml.push_str("          <mxGeometry relative=\"1\" as=\"geometry\">\n");
        if let Some((x, y)) = edge.source_point {
            xml.push_str(&format!(
                "            <mxPoint x=\"{x}\" y=\"{y}\" as=\"sourcePoint\" />\n"
            ));
        }
        if let Some((x, y)) = edge.target_point {
            xml.push_str(&format!(
                "            <mxPoint x=\"{x}\" y=\"{y}\" as=\"targetPoint\" />\n"
            ));
        }
        if !edge.waypoints.is_empty() {
            xml.push_str("            <Array as=\"points\">\n");
            for (x, y) in &edge.waypoints {
                xml.push_str(&format!("              <mxPoint x=\"{x}\" y=\"{y}\" />\n"));
            }
            xml.push_str("            </Array>\n");
        }
        xml.push_str("          </mxGeometry>\n");
    }
    xml.push_str("        </mxCell>\n");
}

/// Writes the whole document next to `output` and renames it into place, so
/// readers see either the old file or the complete new one.
pub fn write_output_drawio(xml: &str, output: &Path) -> Result<(), DiagramError> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(xml.as_bytes())?;
    file.flush()?;
    file.persist(output)?;
    Ok(())
}

pub fn write_output_stdout(xml: &str) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(xml.as_bytes())?;
    handle.flush()?;
    Ok(())
}

/// Escapes text for an attribute value. Line breaks and tabs become
/// character references so they survive attribute normalization; other
/// characters XML 1.0 forbids are dropped.
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            ch if is_xml_char(ch) => out.push(ch),
            _ => {}
        }
    }
    out
}

fn is_xml_char(ch: char) -> bool {
    matches!(
        ch,
        '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}
