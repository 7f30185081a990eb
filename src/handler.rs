//! Request boundary: parse, dispatch, serialize, persist.
//!
//! [`RequestHandler::handle`] is the caller-facing entry point and always
//! produces a [`GenerateResult`]; failures are carried inside it.

use std::path::{Component, Path, PathBuf};

use log::{error, info};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{Config, LayoutConfig};
use crate::error::DiagramError;
use crate::ir::{Diagram, DiagramKind, DiagramRequest};
use crate::layout::{Layout, compute_layout};
use crate::render::{serialize_document, write_output_drawio};
use crate::theme::Theme;

pub const FILE_EXTENSION: &str = ".drawio";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub message: String,
}

impl GenerateResult {
    pub fn ok(path: PathBuf) -> Self {
        let message = format!("Diagram written to {}", path.display());
        Self {
            success: true,
            path: Some(path),
            message,
        }
    }

    pub fn failed(err: &DiagramError) -> Self {
        Self {
            success: false,
            path: None,
            message: err.to_string(),
        }
    }
}

/// Reads `{ "type", "filename", "data" }` into a typed request.
pub fn parse_request(value: &Value) -> Result<DiagramRequest, DiagramError> {
    let tag = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DiagramError::MissingField("type"))?;
    let kind =
        DiagramKind::from_token(tag).ok_or_else(|| DiagramError::UnknownDiagramType(tag.to_string()))?;
    let filename = value
        .get("filename")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(DiagramError::MissingField("filename"))?;
    let data = value.get("data").ok_or(DiagramError::MissingField("data"))?;

    let diagram = match kind {
        DiagramKind::Flowchart => Diagram::Flowchart(parse_data(kind, data)?),
        DiagramKind::Sequence => Diagram::Sequence(parse_data(kind, data)?),
        DiagramKind::Erd => Diagram::Erd(parse_data(kind, data)?),
        DiagramKind::Network => Diagram::Network(parse_data(kind, data)?),
        DiagramKind::Custom => Diagram::Custom(parse_data(kind, data)?),
    };

    Ok(DiagramRequest {
        filename: filename.to_string(),
        diagram,
    })
}

fn parse_data<T: DeserializeOwned>(kind: DiagramKind, data: &Value) -> Result<T, DiagramError> {
    T::deserialize(data).map_err(|err| DiagramError::invalid_data(kind.as_str(), err))
}

/// Appends [`FILE_EXTENSION`] unless the name already ends with it.
pub fn with_extension(filename: &str) -> String {
    if filename.to_ascii_lowercase().ends_with(FILE_EXTENSION) {
        filename.to_string()
    } else {
        format!("{filename}{FILE_EXTENSION}")
    }
}

/// Rejects names that would resolve outside the output directory. Nested
/// relative names such as `team/board` are accepted.
pub fn check_filename(filename: &str) -> Result<(), DiagramError> {
    let escapes = Path::new(filename).components().any(|component| {
        matches!(
            component,
            Component::RootDir | Component::Prefix(_) | Component::ParentDir
        )
    });
    if escapes {
        return Err(DiagramError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

pub struct RequestHandler {
    output_dir: PathBuf,
    theme: Theme,
    layout: LayoutConfig,
}

impl RequestHandler {
    pub fn new(config: Config) -> Self {
        Self {
            output_dir: config.output_dir,
            theme: config.theme,
            layout: config.layout,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn layout(&self, diagram: &Diagram) -> Layout {
        compute_layout(diagram, &self.theme, &self.layout)
    }

    pub fn build_xml(&self, diagram: &Diagram) -> String {
        serialize_document(&self.layout(diagram))
    }

    /// Parses, builds and writes one request, returning the absolute path of
    /// the written file.
    pub fn generate(&self, request: &Value) -> Result<PathBuf, DiagramError> {
        let request = parse_request(request)?;
        let xml = self.build_xml(&request.diagram);
        self.persist(&request.filename, &xml)
    }

    /// Writes an already serialized document under the output directory.
    pub fn persist(&self, filename: &str, xml: &str) -> Result<PathBuf, DiagramError> {
        check_filename(filename)?;
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(with_extension(filename));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_output_drawio(xml, &path)?;
        Ok(std::fs::canonicalize(&path)?)
    }

    pub fn handle(&self, request: &Value) -> GenerateResult {
        match self.generate(request) {
            Ok(path) => {
                info!(path:? = path; "Diagram written");
                GenerateResult::ok(path)
            }
            Err(err) => {
                error!(error:% = err; "Diagram generation failed");
                GenerateResult::failed(&err)
            }
        }
    }
}
