use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    Flowchart,
    Sequence,
    Erd,
    Network,
    Custom,
}

impl DiagramKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "flowchart" => Some(Self::Flowchart),
            "sequence" => Some(Self::Sequence),
            "erd" => Some(Self::Erd),
            "network" => Some(Self::Network),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flowchart => "flowchart",
            Self::Sequence => "sequence",
            Self::Erd => "erd",
            Self::Network => "network",
            Self::Custom => "custom",
        }
    }
}

/// A parsed request: the diagram to build and the file it should land in.
#[derive(Debug, Clone)]
pub struct DiagramRequest {
    pub filename: String,
    pub diagram: Diagram,
}

#[derive(Debug, Clone)]
pub enum Diagram {
    Flowchart(FlowchartData),
    Sequence(SequenceData),
    Erd(ErdData),
    Network(NetworkData),
    Custom(CustomData),
}

impl Diagram {
    pub fn kind(&self) -> DiagramKind {
        match self {
            Self::Flowchart(_) => DiagramKind::Flowchart,
            Self::Sequence(_) => DiagramKind::Sequence,
            Self::Erd(_) => DiagramKind::Erd,
            Self::Network(_) => DiagramKind::Network,
            Self::Custom(_) => DiagramKind::Custom,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowchartData {
    pub steps: Vec<Step>,
    #[serde(default)]
    pub connections: Option<Vec<Connection>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub id: Option<String>,
    pub label: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub connector_label: Option<String>,
}

impl Step {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            label: label.to_string(),
            kind: None,
            width: None,
            height: None,
            connector_label: None,
        }
    }

    pub fn with_kind(mut self, kind: &str) -> Self {
        self.kind = Some(kind.to_string());
        self
    }

    /// Caller id, or the 1-based position when none was given.
    pub fn resolved_id(&self, index: usize) -> String {
        self.id.clone().unwrap_or_else(|| (index + 1).to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    #[serde(deserialize_with = "deserialize_id")]
    pub from: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub to: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl Connection {
    pub fn new(from: &str, to: &str, label: Option<&str>) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            label: label.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceData {
    pub participants: Vec<String>,
    pub interactions: Vec<Interaction>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub from: String,
    pub to: String,
    pub message: String,
    #[serde(default)]
    pub dashed: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErdData {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Connection>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkData {
    pub nodes: Vec<NetworkNode>,
    pub connections: Vec<Connection>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkNode {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub label: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomData {
    pub shapes: Vec<CustomShape>,
    #[serde(default)]
    pub connectors: Option<Vec<Connection>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomShape {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
}

// Callers write ids as strings or bare numbers; both name the same node.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Int(i64),
    Float(f64),
}

impl IdRepr {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Int(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    IdRepr::deserialize(deserializer).map(IdRepr::into_string)
}

fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<IdRepr>::deserialize(deserializer)?.map(IdRepr::into_string))
}
