//! Configuration management for htmail
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Legacy environment variables (highest priority): `SMTP_SERVER`,
//!    `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD`, `USE_TLS`, `TEMPLATE_DIR`.
//!    `USE_TLS` enables TLS only when it equals `true` (any case); any other
//!    value disables it.
//! 2. Environment variables with the `HTMAIL_` prefix (`__` for nesting)
//! 3. `./config.toml` (or an explicit path given on the command line)
//! 4. `~/.config/htmail/config.toml` (user config, XDG)
//! 5. `/etc/htmail/config.toml` (system config)
//! 6. Hardcoded defaults (fallback)
//!
//! Environment variable format: `HTMAIL_SECTION__FIELD_NAME`
//! - Use `__` (double underscore) to separate nested sections
//! - Example: `HTMAIL_SERVER__BIND=127.0.0.1:9000`
//!
//! # Example Configuration
//!
//! ```toml
//! # config.toml
//! [server]
//! bind = "0.0.0.0:8000"
//! max_upload_bytes = 1048576
//!
//! [smtp]
//! host = "smtp.example.com"
//! port = 587
//! username = "mailer@example.com"
//! password = "secret"
//! use_tls = true
//!
//! [templates]
//! dir = "./templates"
//! extensions = ["html"]
//! strict_undefined = true
//! ```
//!
//! The configuration is read once at startup and never mutated afterwards.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Name used for the XDG and system configuration directories
pub const SERVICE_NAME: &str = "htmail";

/// Legacy environment variables and the configuration keys they map to
const LEGACY_ENV_KEYS: [(&str, &str); 5] = [
    ("SMTP_SERVER", "smtp.host"),
    ("SMTP_PORT", "smtp.port"),
    ("SMTP_USERNAME", "smtp.username"),
    ("SMTP_PASSWORD", "smtp.password"),
    ("TEMPLATE_DIR", "templates.dir"),
];

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Socket address to listen on
    pub bind: String,

    /// Allow cross-origin requests from any origin
    pub cors_permissive: bool,

    /// Maximum accepted size of an uploaded template, in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            cors_permissive: true,
            max_upload_bytes: 1024 * 1024,
        }
    }
}

/// SMTP relay configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpSettings {
    /// SMTP server hostname
    pub host: String,

    /// SMTP server port (usually 587 for STARTTLS)
    pub port: u16,

    /// SMTP username, also used as the sender when `from` is unset
    pub username: String,

    /// SMTP password
    pub password: String,

    /// Upgrade the connection with STARTTLS
    pub use_tls: bool,

    /// Explicit `From` address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 587,
            username: String::new(),
            password: String::new(),
            use_tls: true,
            from: None,
        }
    }
}

impl SmtpSettings {
    /// Address used in the `From` header
    #[must_use]
    pub fn sender(&self) -> &str {
        self.from.as_deref().unwrap_or(&self.username)
    }
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("use_tls", &self.use_tls)
            .field("from", &self.from)
            .finish()
    }
}

/// Which email backend delivers rendered messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailBackendKind {
    /// Deliver through the configured SMTP relay
    #[default]
    Smtp,
    /// Log messages instead of sending them
    Console,
}

/// Email delivery configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    /// Backend used to deliver messages
    pub backend: EmailBackendKind,
}

/// Template directory and renderer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Directory containing template files
    pub dir: PathBuf,

    /// Recognized template file extensions, without the leading dot
    pub extensions: Vec<String>,

    /// Fail rendering when the context lacks a referenced variable
    pub strict_undefined: bool,

    /// Escape HTML/XML output based on the template extension
    pub autoescape: bool,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("templates"),
            extensions: vec!["html".to_string()],
            strict_undefined: true,
            autoescape: true,
        }
    }
}

/// Attachment lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentSettings {
    /// Directory that attachment names are resolved against
    pub dir: PathBuf,
}

impl Default for AttachmentSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("attachments"),
        }
    }
}

/// Complete htmail configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HtmailConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// SMTP relay settings
    #[serde(default)]
    pub smtp: SmtpSettings,

    /// Email backend settings
    #[serde(default)]
    pub email: EmailSettings,

    /// Template settings
    #[serde(default)]
    pub templates: TemplateSettings,

    /// Attachment settings
    #[serde(default)]
    pub attachments: AttachmentSettings,
}

impl HtmailConfig {
    /// Load configuration from the standard locations
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file cannot be parsed or a value
    /// has the wrong type (for example a non-numeric `SMTP_PORT`).
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use htmail::config::HtmailConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = HtmailConfig::load()?;
    /// println!("templates live in {}", config.templates.dir.display());
    /// # Ok(())
    /// # }
    /// ```
    pub fn load() -> anyhow::Result<Self> {
        let mut figment = Self::defaults()?;

        let system_config = PathBuf::from("/etc")
            .join(SERVICE_NAME)
            .join("config.toml");
        if system_config.exists() {
            figment = figment.merge(Toml::file(&system_config));
        }

        let user_config = Self::recommended_path();
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        let local_config = PathBuf::from("./config.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        Ok(Self::with_env(figment).extract()?)
    }

    /// Load configuration from a specific file
    ///
    /// A missing file is not an error; defaults and environment variables
    /// still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the file contains invalid TOML or a value has the
    /// wrong type.
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let figment = Self::defaults()?.merge(Toml::file(path.as_ref()));
        Ok(Self::with_env(figment).extract()?)
    }

    /// Get the recommended XDG config path
    ///
    /// Returns `~/.config/htmail/config.toml`, or `./config.toml` when no
    /// config directory can be determined.
    #[must_use]
    pub fn recommended_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("./config.toml"),
            |config_dir| config_dir.join(SERVICE_NAME).join("config.toml"),
        )
    }

    fn defaults() -> anyhow::Result<Figment> {
        Ok(Figment::new().merge(Toml::string(&toml::to_string(&Self::default())?)))
    }

    fn with_env(figment: Figment) -> Figment {
        let legacy_names: Vec<&str> = LEGACY_ENV_KEYS.iter().map(|(name, _)| *name).collect();

        let figment = figment
            .merge(Env::prefixed("HTMAIL_").split("__").lowercase(true))
            .merge(Env::raw().only(&legacy_names).map(|name| {
                LEGACY_ENV_KEYS
                    .iter()
                    .find(|(legacy, _)| name.as_str().eq_ignore_ascii_case(legacy))
                    .map_or_else(|| name.as_str().to_owned(), |(_, key)| (*key).to_owned())
                    .into()
            }));

        // Legacy flag: only a case-insensitive "true" enables TLS
        match std::env::var("USE_TLS") {
            Ok(value) => figment.merge(Serialized::default(
                "smtp.use_tls",
                value.trim().eq_ignore_ascii_case("true"),
            )),
            Err(_) => figment,
        }
    }
}
