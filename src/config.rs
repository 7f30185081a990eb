use crate::theme::{Palette, Theme};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable selecting the directory generated files are written to.
pub const OUTPUT_DIR_ENV: &str = "DRAWIO_OUTPUT_DIR";

pub const DEFAULT_VERTEX_WIDTH: f32 = 120.0;
pub const DEFAULT_VERTEX_HEIGHT: f32 = 60.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlowchartConfig {
    pub center_x: f32,
    pub horizontal_spacing: f32,
    pub margin_y: f32,
    pub level_height: f32,
    pub default_kind: String,
}

impl Default for FlowchartConfig {
    fn default() -> Self {
        Self {
            center_x: 400.0,
            horizontal_spacing: 200.0,
            margin_y: 40.0,
            level_height: 120.0,
            default_kind: "process".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SequenceConfig {
    pub margin: f32,
    pub participant_spacing: f32,
    pub lifeline_width: f32,
    pub header_height: f32,
    pub message_step: f32,
    pub self_loop_width: f32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            margin: 40.0,
            participant_spacing: 200.0,
            lifeline_width: 100.0,
            header_height: 40.0,
            message_step: 50.0,
            self_loop_width: 40.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ErdConfig {
    pub columns: usize,
    pub margin: f32,
    pub column_spacing: f32,
    pub entity_width: f32,
    pub header_height: f32,
    pub row_height: f32,
    pub row_gap: f32,
}

impl Default for ErdConfig {
    fn default() -> Self {
        Self {
            columns: 3,
            margin: 40.0,
            column_spacing: 260.0,
            entity_width: 180.0,
            header_height: 30.0,
            row_height: 26.0,
            row_gap: 80.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkConfig {
    pub margin: f32,
    pub grid_columns: usize,
    pub column_spacing: f32,
    pub row_spacing: f32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            margin: 100.0,
            grid_columns: 4,
            column_spacing: 180.0,
            row_spacing: 150.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub flowchart: FlowchartConfig,
    pub sequence: SequenceConfig,
    pub erd: ErdConfig,
    pub network: NetworkConfig,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub output_dir: PathBuf,
    pub theme: Theme,
    pub layout: LayoutConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: output_dir_from_env(),
            theme: Theme::drawio_default(),
            layout: LayoutConfig::default(),
        }
    }
}

/// Reads [`OUTPUT_DIR_ENV`], falling back to the working directory.
pub fn output_dir_from_env() -> PathBuf {
    resolve_output_dir(std::env::var_os(OUTPUT_DIR_ENV).map(PathBuf::from))
}

fn resolve_output_dir(from_env: Option<PathBuf>) -> PathBuf {
    match from_env {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    fill_color: Option<String>,
    stroke_color: Option<String>,
    terminator: Option<Palette>,
    decision: Option<Palette>,
    data: Option<Palette>,
    entity_header: Option<Palette>,
    entity_attribute: Option<Palette>,
    lifeline: Option<Palette>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    output_dir: Option<PathBuf>,
    flowchart: Option<FlowchartConfig>,
    sequence: Option<SequenceConfig>,
    erd: Option<ErdConfig>,
    network: Option<NetworkConfig>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    parse_config(config, &contents)
}

fn parse_config(mut config: Config, contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "monochrome" | "mono" => config.theme = Theme::monochrome(),
            "default" | "drawio" => config.theme = Theme::drawio_default(),
            other => anyhow::bail!("Unknown theme '{other}'"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.fill_color {
            config.theme.fill_color = v;
        }
        if let Some(v) = vars.stroke_color {
            config.theme.stroke_color = v;
        }
        if let Some(v) = vars.terminator {
            config.theme.terminator = v;
        }
        if let Some(v) = vars.decision {
            config.theme.decision = v;
        }
        if let Some(v) = vars.data {
            config.theme.data = v;
        }
        if let Some(v) = vars.entity_header {
            config.theme.entity_header = v;
        }
        if let Some(v) = vars.entity_attribute {
            config.theme.entity_attribute = v;
        }
        if let Some(v) = vars.lifeline {
            config.theme.lifeline = v;
        }
    }

    if let Some(dir) = parsed.output_dir {
        config.output_dir = dir;
    }
    if let Some(flowchart) = parsed.flowchart {
        config.layout.flowchart = flowchart;
    }
    if let Some(sequence) = parsed.sequence {
        config.layout.sequence = sequence;
    }
    if let Some(erd) = parsed.erd {
        config.layout.erd = erd;
    }
    if let Some(network) = parsed.network {
        config.layout.network = network;
    }

    Ok(config)
}
