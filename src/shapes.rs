//! Static shape-kind to base-style lookup.
//!
//! Base fragments are semicolon-terminated `key=value` pairs in the draw.io
//! style grammar. Colors are appended later by [`compose_style`].

use log::debug;
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const FALLBACK_KIND: &str = "rectangle";

static BASE_STYLES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("rectangle", "rounded=0;whiteSpace=wrap;html=1;"),
        ("rounded", "rounded=1;whiteSpace=wrap;html=1;"),
        ("process", "rounded=1;whiteSpace=wrap;html=1;arcSize=10;"),
        ("terminator", "rounded=1;whiteSpace=wrap;html=1;arcSize=50;"),
        ("ellipse", "ellipse;whiteSpace=wrap;html=1;"),
        ("circle", "ellipse;whiteSpace=wrap;html=1;aspect=fixed;"),
        ("rhombus", "rhombus;whiteSpace=wrap;html=1;"),
        (
            "parallelogram",
            "shape=parallelogram;perimeter=parallelogramPerimeter;whiteSpace=wrap;html=1;fixedSize=1;",
        ),
        (
            "hexagon",
            "shape=hexagon;perimeter=hexagonPerimeter2;whiteSpace=wrap;html=1;fixedSize=1;",
        ),
        ("triangle", "triangle;whiteSpace=wrap;html=1;"),
        (
            "cylinder",
            "shape=cylinder3;whiteSpace=wrap;html=1;boundedLbl=1;backgroundOutline=1;size=15;",
        ),
        ("cloud", "ellipse;shape=cloud;whiteSpace=wrap;html=1;"),
        (
            "document",
            "shape=document;whiteSpace=wrap;html=1;boundedLbl=1;",
        ),
        (
            "subprocess",
            "shape=process;whiteSpace=wrap;html=1;backgroundOutline=1;",
        ),
        (
            "note",
            "shape=note;whiteSpace=wrap;html=1;backgroundOutline=1;darkOpacity=0.05;",
        ),
        (
            "actor",
            "shape=umlActor;verticalLabelPosition=bottom;verticalAlign=top;html=1;outlineConnect=0;",
        ),
        (
            "text",
            "text;html=1;align=center;verticalAlign=middle;whiteSpace=wrap;",
        ),
        (
            "lifeline",
            "shape=umlLifeline;perimeter=lifelinePerimeter;whiteSpace=wrap;html=1;container=1;dropTarget=0;collapsible=0;recursiveResize=0;outlineConnect=0;portConstraint=eastwest;size=40;",
        ),
        (
            "entity",
            "rounded=0;whiteSpace=wrap;html=1;fontStyle=1;align=left;verticalAlign=middle;spacingLeft=6;",
        ),
        (
            "attribute",
            "rounded=0;whiteSpace=wrap;html=1;align=left;verticalAlign=middle;spacingLeft=6;",
        ),
        (
            "router",
            "shape=mxgraph.cisco.routers.router;sketch=0;html=1;pointerEvents=1;dashed=0;verticalLabelPosition=bottom;verticalAlign=top;align=center;outlineConnect=0;",
        ),
        (
            "switch",
            "shape=mxgraph.cisco.switches.workgroup_switch;sketch=0;html=1;pointerEvents=1;dashed=0;verticalLabelPosition=bottom;verticalAlign=top;align=center;outlineConnect=0;",
        ),
        (
            "server",
            "shape=mxgraph.cisco.servers.fileserver;sketch=0;html=1;pointerEvents=1;dashed=0;verticalLabelPosition=bottom;verticalAlign=top;align=center;outlineConnect=0;",
        ),
        (
            "firewall",
            "shape=mxgraph.cisco.security.firewall;sketch=0;html=1;pointerEvents=1;dashed=0;verticalLabelPosition=bottom;verticalAlign=top;align=center;outlineConnect=0;",
        ),
        (
            "workstation",
            "shape=mxgraph.cisco.computers_and_peripherals.pc;sketch=0;html=1;pointerEvents=1;dashed=0;verticalLabelPosition=bottom;verticalAlign=top;align=center;outlineConnect=0;",
        ),
        (
            "laptop",
            "shape=mxgraph.cisco.computers_and_peripherals.laptop;sketch=0;html=1;pointerEvents=1;dashed=0;verticalLabelPosition=bottom;verticalAlign=top;align=center;outlineConnect=0;",
        ),
    ])
});

// Flowchart and network vocabulary mapped onto registry entries.
static ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("rect", "rectangle"),
        ("box", "rectangle"),
        ("start", "terminator"),
        ("end", "terminator"),
        ("stop", "terminator"),
        ("decision", "rhombus"),
        ("diamond", "rhombus"),
        ("condition", "rhombus"),
        ("data", "parallelogram"),
        ("input", "parallelogram"),
        ("output", "parallelogram"),
        ("io", "parallelogram"),
        ("database", "cylinder"),
        ("db", "cylinder"),
        ("storage", "cylinder"),
        ("predefined", "subprocess"),
        ("preparation", "hexagon"),
        ("comment", "note"),
        ("user", "actor"),
        ("person", "actor"),
        ("pc", "workstation"),
        ("computer", "workstation"),
        ("desktop", "workstation"),
        ("internet", "cloud"),
    ])
});

/// Resolve a caller-supplied kind to a registry key; unknown kinds map to
/// [`FALLBACK_KIND`].
pub fn canonical_kind(kind: &str) -> &'static str {
    let normalized = kind.trim().to_ascii_lowercase();
    let key = ALIASES
        .get(normalized.as_str())
        .copied()
        .unwrap_or(normalized.as_str());
    match BASE_STYLES.get_key_value(key) {
        Some((name, _)) => *name,
        None => FALLBACK_KIND,
    }
}

pub fn is_known_kind(kind: &str) -> bool {
    let normalized = kind.trim().to_ascii_lowercase();
    ALIASES.contains_key(normalized.as_str()) || BASE_STYLES.contains_key(normalized.as_str())
}

pub fn style_for(kind: &str) -> &'static str {
    if !is_known_kind(kind) {
        debug!(kind; "Unknown shape kind, using rectangle");
    }
    BASE_STYLES
        .get(canonical_kind(kind))
        .copied()
        .unwrap_or("rounded=0;whiteSpace=wrap;html=1;")
}

pub fn compose_style(base: &str, fill: &str, stroke: &str) -> String {
    let mut style = String::with_capacity(base.len() + 40);
    style.push_str(base);
    if !style.is_empty() && !style.ends_with(';') {
        style.push(';');
    }
    style.push_str(&format!("fillColor={fill};strokeColor={stroke};"));
    style
}

/// All registry keys, sorted; used by the CLI listing and tests.
pub fn known_kinds() -> Vec<&'static str> {
    let mut kinds: Vec<&'static str> = BASE_STYLES.keys().copied().collect();
    kinds.sort_unstable();
    kinds
}
