//! Page rendering error types.

/// Errors raised while producing the HTML page.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The page could not be rendered from its data.
    #[error("Failed to render page: {0}")]
    Render(#[from] handlebars::RenderError),

    /// The page template failed to compile.
    #[error("Failed to compile page template: {0}")]
    Compile(#[from] handlebars::TemplateError),
}
