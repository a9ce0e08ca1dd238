//! Request extractors
//!
//! - [`ValidatedJson`]: JSON body checked with `validator`
//! - [`TemplateUpload`]: a single uploaded file from a multipart body

mod upload;
mod validated;

pub use upload::{TemplateUpload, UploadLimit, UploadedFile, DEFAULT_MAX_UPLOAD_BYTES};
pub use validated::{format_validation_errors, ValidatedJson};
