//! Directory-backed template store
//!
//! Templates are plain files in a single directory. The store never caches
//! content: every read goes to disk, so a freshly uploaded template is
//! visible to the next request.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tracing::{debug, warn};

use super::TemplateError;
use crate::config::TemplateSettings;

/// Returns true if `name` is a plain file name that stays inside its directory
///
/// Rejects empty names, hidden files, `.`/`..`, and anything containing a
/// path separator or NUL byte.
///
/// # Examples
///
/// ```rust
/// use htmail::template::is_safe_file_name;
///
/// assert!(is_safe_file_name("welcome.html"));
/// assert!(!is_safe_file_name("../etc/passwd"));
/// assert!(!is_safe_file_name(".hidden.html"));
/// ```
#[must_use]
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0'])
        && Path::new(name).file_name().is_some_and(|n| n == name)
}

/// Template files on disk
///
/// # Examples
///
/// ```rust,no_run
/// use htmail::template::TemplateStore;
///
/// # async fn example() -> Result<(), htmail::template::TemplateError> {
/// let store = TemplateStore::new("templates", ["html"]);
/// store.save("welcome.html", b"Hello {{ user_name }}").await?;
///
/// assert_eq!(store.list().await, vec!["welcome.html".to_string()]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
    extensions: Arc<[String]>,
}

impl TemplateStore {
    /// Create a store over `dir` recognizing the given extensions
    #[must_use]
    pub fn new<I, S>(dir: impl Into<PathBuf>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dir: dir.into(),
            extensions: extensions
                .into_iter()
                .map(|ext| ext.into().trim_start_matches('.').to_string())
                .collect(),
        }
    }

    /// Create a store from template settings
    #[must_use]
    pub fn from_settings(settings: &TemplateSettings) -> Self {
        Self::new(settings.dir.clone(), settings.extensions.iter().cloned())
    }

    /// Directory holding the templates
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Recognized extensions, without the leading dot
    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Create the template directory if it does not exist
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::Io` if the directory cannot be created.
    pub async fn ensure_dir(&self) -> Result<(), TemplateError> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    fn has_template_extension(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
    }

    /// Check that `name` is a valid template file name
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::InvalidName` for names with path components and
    /// `TemplateError::InvalidExtension` for unrecognized extensions.
    pub fn validate_name(&self, name: &str) -> Result<(), TemplateError> {
        if !is_safe_file_name(name) {
            return Err(TemplateError::InvalidName(name.to_string()));
        }

        if !self.has_template_extension(name) {
            return Err(TemplateError::InvalidExtension {
                filename: name.to_string(),
                allowed: self.extensions.to_vec(),
            });
        }

        Ok(())
    }

    /// List template file names, sorted
    ///
    /// A missing or unreadable directory yields an empty list.
    pub async fn list(&self) -> Vec<String> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(dir = %self.dir.display(), error = %e, "Cannot read template directory");
                }
                return Vec::new();
            }
        };

        let mut names = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(dir = %self.dir.display(), error = %e, "Error while listing templates");
                    break;
                }
            };

            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if self.validate_name(&name).is_err() {
                continue;
            }

            // Follows symlinks so linked templates are listed too
            match fs::metadata(entry.path()).await {
                Ok(meta) if meta.is_file() => names.push(name),
                _ => {}
            }
        }

        names.sort();
        names
    }

    /// Read a template's source text
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::NotFound` if no such file exists, a name or
    /// extension error for invalid names, or `TemplateError::Io` if the file
    /// cannot be read.
    pub async fn read(&self, name: &str) -> Result<String, TemplateError> {
        self.validate_name(name)?;

        let path = self.dir.join(name);
        match fs::read_to_string(&path).await {
            Ok(source) => {
                debug!(template = name, bytes = source.len(), "Template loaded");
                Ok(source)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(TemplateError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Store a template, replacing any existing file with the same name
    ///
    /// The content is written to a uniquely named hidden file in the template
    /// directory and renamed into place, so readers never observe a partially
    /// written template and concurrent uploads of one name do not collide.
    ///
    /// # Errors
    ///
    /// Returns a name or extension error before touching the disk, or
    /// `TemplateError::Io` if the file cannot be written.
    pub async fn save(&self, name: &str, data: &[u8]) -> Result<PathBuf, TemplateError> {
        self.validate_name(name)?;
        self.ensure_dir().await?;

        let path = self.dir.join(name);
        let dir = self.dir.clone();
        let target = path.clone();
        let data = data.to_vec();

        tokio::task::spawn_blocking(move || write_atomic(&dir, &target, &data))
            .await
            .map_err(std::io::Error::other)??;

        Ok(path)
    }
}

fn write_atomic(dir: &Path, path: &Path, data: &[u8]) -> std::io::Result<()> {
    // Dropped (and deleted) on any error before persist
    let mut tmp = tempfile::Builder::new()
        .prefix(".")
        .suffix(".upload")
        .tempfile_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
