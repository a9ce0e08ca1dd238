//! Application state shared by all handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::HtmailConfig;
use crate::email::EmailSender;
use crate::extractors::UploadLimit;
use crate::service::EmailService;

/// Application state for the htmail router
///
/// Cheap to clone: the configuration is behind an `Arc` and the service only
/// holds shared handles.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use htmail::config::HtmailConfig;
/// use htmail::email::ConsoleBackend;
/// use htmail::state::AppState;
///
/// let state = AppState::new(HtmailConfig::default(), Arc::new(ConsoleBackend::new()));
/// assert_eq!(state.config().smtp.port, 587);
/// ```
#[derive(Clone)]
pub struct AppState {
    config: Arc<HtmailConfig>,
    service: EmailService,
}

impl AppState {
    /// Create state from configuration and an email backend
    #[must_use]
    pub fn new(config: HtmailConfig, sender: Arc<dyn EmailSender>) -> Self {
        let service = EmailService::new(&config, sender);
        Self {
            config: Arc::new(config),
            service,
        }
    }

    /// Get configuration reference
    #[must_use]
    pub fn config(&self) -> &HtmailConfig {
        &self.config
    }

    /// Get the render-and-send service
    #[must_use]
    pub const fn service(&self) -> &EmailService {
        &self.service
    }
}

impl FromRef<AppState> for UploadLimit {
    fn from_ref(state: &AppState) -> Self {
        Self(state.config.server.max_upload_bytes)
    }
}
