//! Template error types

use thiserror::Error;

/// Errors that can occur when storing, loading or rendering templates
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No template file with this name exists
    #[error("Template '{0}' not found")]
    NotFound(String),

    /// Template name is empty, hidden, or contains path components
    #[error("invalid template name: {0}")]
    InvalidName(String),

    /// Template name does not end in a recognized extension
    #[error("only {} files are allowed, got '{filename}'", .allowed.join(", "))]
    InvalidExtension {
        /// Rejected file name
        filename: String,
        /// Recognized extensions
        allowed: Vec<String>,
    },

    /// Template syntax error or missing context variable
    #[error("failed to render template: {0}")]
    Render(#[from] minijinja::Error),

    /// I/O error while reading or writing the template directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
