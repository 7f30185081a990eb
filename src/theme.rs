use serde::{Deserialize, Serialize};

/// Fill and stroke pair appended to a shape's base style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub fill: String,
    pub stroke: String,
}

impl Palette {
    fn new(fill: &str, stroke: &str) -> Self {
        Self {
            fill: fill.to_string(),
            stroke: stroke.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub fill_color: String,
    pub stroke_color: String,
    pub terminator: Palette,
    pub decision: Palette,
    pub data: Palette,
    pub entity_header: Palette,
    pub entity_attribute: Palette,
    pub lifeline: Palette,
}

impl Theme {
    /// The draw.io default blue, with the editor's stock accent palettes.
    pub fn drawio_default() -> Self {
        Self {
            fill_color: "#dae8fc".to_string(),
            stroke_color: "#6c8ebf".to_string(),
            terminator: Palette::new("#d5e8d4", "#82b366"),
            decision: Palette::new("#fff2cc", "#d6b656"),
            data: Palette::new("#ffe6cc", "#d79b00"),
            entity_header: Palette::new("#dae8fc", "#6c8ebf"),
            entity_attribute: Palette::new("#ffffff", "#6c8ebf"),
            lifeline: Palette::new("#f5f5f5", "#666666"),
        }
    }

    pub fn monochrome() -> Self {
        let plain = Palette::new("#ffffff", "#000000");
        Self {
            fill_color: plain.fill.clone(),
            stroke_color: plain.stroke.clone(),
            terminator: plain.clone(),
            decision: plain.clone(),
            data: plain.clone(),
            entity_header: Palette::new("#f5f5f5", "#000000"),
            entity_attribute: plain.clone(),
            lifeline: plain,
        }
    }

    pub fn default_palette(&self) -> Palette {
        Palette {
            fill: self.fill_color.clone(),
            stroke: self.stroke_color.clone(),
        }
    }

    /// Palette used for a flowchart step of the given (registry-resolved) kind.
    pub fn palette_for(&self, kind: &str) -> Palette {
        match crate::shapes::canonical_kind(kind) {
            "terminator" => self.terminator.clone(),
            "rhombus" => self.decision.clone(),
            "parallelogram" | "document" => self.data.clone(),
            _ => self.default_palette(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::drawio_default()
    }
}
