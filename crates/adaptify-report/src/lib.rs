//! adaptify-report: Text renderers for assessment reports.
//!
//! Implements `ReportRenderer` for Markdown and JSON. Charts and HTML are left
//! to the hosting application.

pub mod json;
pub mod markdown;

use adaptify_core::traits::ReportRenderer;

pub use json::JsonRenderer;
pub use markdown::MarkdownRenderer;

/// Look up a renderer by format name ("markdown"/"md" or "json").
pub fn renderer_for(format: &str) -> Option<Box<dyn ReportRenderer>> {
    match format.to_lowercase().as_str() {
        "markdown" | "md" => Some(Box::new(MarkdownRenderer::default())),
        "json" => Some(Box::new(JsonRenderer::default())),
        _ => None,
    }
}
