#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod render;
pub mod shapes;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, load_config};
pub use error::DiagramError;
pub use handler::{GenerateResult, RequestHandler, parse_request};
pub use ir::{Diagram, DiagramKind, DiagramRequest};
pub use layout::{Layout, compute_layout};
pub use render::{serialize_document, serialize_document_at};
pub use theme::Theme;
