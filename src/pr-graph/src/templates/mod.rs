//! HTML page rendering using Handlebars.
//!
//! The page embeds the Mermaid description in a `mermaid` block, loads the
//! Mermaid client library and, optionally, d3 for zoom and pan.

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{
    create_handlebars_registry, DocumentRenderer, RenderOptions, D3_SRC, MERMAID_SRC,
};

/// Generates the page title for a repository.
///
/// Format: "Pull Request Graph ( {repository} )"
#[must_use]
pub fn document_title(repository: &str) -> String {
    format!("Pull Request Graph ( {repository} )")
}
