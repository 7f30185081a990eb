use crate::config::load_config;
use crate::handler::{GenerateResult, RequestHandler, parse_request};
use crate::layout_dump::write_layout_dump;
use crate::render::{serialize_document, write_output_stdout};
use crate::shapes::known_kinds;
use anyhow::Result;
use clap::Parser;
use log::{error, info};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "drgen", version, about = "Generate draw.io diagrams from JSON requests")]
pub struct Args {
    /// Request JSON file ({"type", "filename", "data"}) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output directory. Overrides DRAWIO_OUTPUT_DIR and the config file.
    #[arg(short = 'o', long = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Config JSON file (theme, themeVariables, layout sections, outputDir)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Print the document to stdout instead of writing it
    #[arg(long = "print")]
    pub print: bool,

    /// Write a JSON dump of the computed layout
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// List the known shape kinds and exit
    #[arg(long = "listShapes")]
    pub list_shapes: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short = 'l', long = "log-level", default_value = "warn")]
    pub log_level: String,
}

/// Runs one request. `Ok(false)` means the request itself failed; the
/// failure has already been reported on stdout.
pub fn run(args: &Args) -> Result<bool> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }

    if args.list_shapes {
        for kind in known_kinds() {
            println!("{kind}");
        }
        return Ok(true);
    }

    let input = read_input(args.input.as_deref())?;
    let request: serde_json::Value = serde_json::from_str(&input)?;
    let handler = RequestHandler::new(config);

    if args.print || args.dump_layout.is_some() {
        let parsed = match parse_request(&request) {
            Ok(parsed) => parsed,
            Err(err) => {
                error!(error:% = err; "Diagram generation failed");
                return print_result(&GenerateResult::failed(&err));
            }
        };
        let layout = handler.layout(&parsed.diagram);
        if let Some(path) = &args.dump_layout {
            write_layout_dump(path, &layout)?;
            info!(path:? = path; "Layout dump written");
        }
        if args.print {
            write_output_stdout(&serialize_document(&layout))?;
            return Ok(true);
        }
    }

    print_result(&handler.handle(&request))
}

fn print_result(result: &GenerateResult) -> Result<bool> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(result.success)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
