//! htmail: render HTML email templates and send them over SMTP
//!
//! A small HTTP service that keeps a directory of HTML email templates,
//! renders them against caller-supplied variables, and mails the result
//! through a configured SMTP relay.
//!
//! # Components
//!
//! - [`template`]: template files on disk and the `minijinja` renderer
//! - [`email`]: message building plus SMTP and console delivery backends
//! - [`service`]: load, render and send, independent of HTTP
//! - [`api`]: axum router and handlers
//! - [`config`]: layered configuration via `figment`
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use htmail::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = HtmailConfig::load()?;
//!     let sender = htmail::email::backend_from_config(&config);
//!     let app = htmail::api::router(AppState::new(config, sender));
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![allow(clippy::missing_errors_doc)]

pub mod api;
pub mod config;
pub mod email;
pub mod error;
pub mod extractors;
pub mod health;
pub mod observability;
pub mod service;
pub mod state;
pub mod template;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! ```rust
    //! use htmail::prelude::*;
    //! ```

    pub use crate::config::HtmailConfig;
    pub use crate::email::{Email, EmailError, EmailSender};
    pub use crate::error::ApiError;
    pub use crate::extractors::{TemplateUpload, ValidatedJson};
    pub use crate::service::{EmailService, SendRequest, ServiceError};
    pub use crate::state::AppState;
    pub use crate::template::{Context, TemplateError, TemplateRenderer, TemplateStore};
}
