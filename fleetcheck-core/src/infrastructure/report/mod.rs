// fleetcheck-core/src/infrastructure/report/mod.rs

// Renderers for a finished run: terminal tables, JSON document, HTML pages.

pub mod console;
pub mod html;
pub mod json;

pub use console::render_console;
pub use html::HtmlRenderer;
pub use json::write_json;
