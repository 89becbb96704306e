//! HTML document renderer.

use super::TemplateError;
use handlebars::Handlebars;
use serde_json::json;

/// Name the page template is registered under.
const PAGE_TEMPLATE: &str = "page";

/// Mermaid client library.
pub const MERMAID_SRC: &str = "https://cdn.jsdelivr.net/npm/mermaid/dist/mermaid.min.js";

/// d3, used for zoom and pan.
pub const D3_SRC: &str = "https://cdn.jsdelivr.net/npm/d3@7";

/// Creates a Handlebars registry holding the page template.
///
/// The registry is configured with:
/// - HTML escaping (the default), so titles and diagram text are inert markup
/// - Strict mode (catches missing variables)
///
/// # Errors
///
/// Returns an error if the bundled template does not parse.
pub fn create_handlebars_registry() -> Result<Handlebars<'static>, TemplateError> {
    let mut hbs = Handlebars::new();

    // Enable strict mode to catch missing variables
    hbs.set_strict_mode(true);

    hbs.register_template_string(PAGE_TEMPLATE, include_str!("page.html.hbs"))?;
    Ok(hbs)
}

/// Knobs for the generated page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Whether to load d3 and make the diagram pannable and zoomable.
    pub zoom: bool,
    /// URL of the Mermaid script.
    pub mermaid_src: String,
    /// URL of the d3 script.
    pub d3_src: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            zoom: true,
            mermaid_src: MERMAID_SRC.to_string(),
            d3_src: D3_SRC.to_string(),
        }
    }
}

/// Renders a diagram into a standalone HTML page.
pub struct DocumentRenderer {
    handlebars: Handlebars<'static>,
    options: RenderOptions,
}

impl DocumentRenderer {
    /// Creates a renderer.
    ///
    /// # Errors
    ///
    /// Returns an error if the page template cannot be registered.
    pub fn new(options: RenderOptions) -> Result<Self, TemplateError> {
        Ok(Self {
            handlebars: create_handlebars_registry()?,
            options,
        })
    }

    /// Renders the page for `diagram` with the given `title`.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_document(&self, title: &str, diagram: &str) -> Result<String, TemplateError> {
        let data = json!({
            "title": title,
            "diagram": diagram,
            "zoom": self.options.zoom,
            "mermaid_src": self.options.mermaid_src,
            "d3_src": self.options.d3_src,
        });

        Ok(self.handlebars.render(PAGE_TEMPLATE, &data)?)
    }
}
