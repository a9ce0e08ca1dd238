//! Template storage and rendering
//!
//! Templates live as files in a single directory and are rendered with
//! [`minijinja`] against a JSON context.

mod error;
mod renderer;
mod store;

pub use error::TemplateError;
pub use renderer::{Context, TemplateRenderer};
pub use store::{is_safe_file_name, TemplateStore};
