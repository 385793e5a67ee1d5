//! Render adapters over the laid-out page model: generated PDF, filled template PDF, XFDF
//! import data, and the printable HTML summary.

mod html;
mod mapping;
mod pdf;
mod template;
mod xfdf;

use std::path::PathBuf;

use thiserror::Error;

pub use html::render_html;
pub use mapping::FieldMapping;
pub use pdf::render_pdf;
pub use template::{fill_template, TemplateStore};
pub use xfdf::render_xfdf;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{resource} not found at {}: {hint}", path.display())]
    MissingTemplate {
        resource: &'static str,
        path: PathBuf,
        hint: &'static str,
    },
    #[error("failed to read {}: {source}", path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("template cannot be filled: {0}")]
    Template(String),
    #[error("pdf assembly failed: {0}")]
    Pdf(String),
    #[error("xml serialization failed")]
    Xml(#[source] std::io::Error),
    #[error("field mapping is malformed: {0}")]
    Mapping(String),
}

impl RenderError {
    /// Operator-facing failures that need a file supplied before the request can succeed.
    pub fn is_missing_resource(&self) -> bool {
        matches!(self, RenderError::MissingTemplate { .. })
    }
}
