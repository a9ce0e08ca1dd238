//! Template rendering with minijinja

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use tracing::debug;

use super::TemplateError;
use crate::config::TemplateSettings;

/// Variables a template is rendered against
pub type Context = serde_json::Map<String, serde_json::Value>;

/// Renders raw template text against a context
///
/// Templates are compiled from source on every call; nothing is cached
/// between requests.
///
/// # Examples
///
/// ```rust
/// use htmail::config::TemplateSettings;
/// use htmail::template::{Context, TemplateRenderer};
///
/// let renderer = TemplateRenderer::new(&TemplateSettings::default());
///
/// let mut context = Context::new();
/// context.insert("user_name".into(), "John Doe".into());
///
/// let html = renderer
///     .render("welcome.html", "<p>Hello {{ user_name }}</p>", &context)
///     .unwrap();
/// assert_eq!(html, "<p>Hello John Doe</p>");
/// ```
#[derive(Debug)]
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// Create a renderer configured from template settings
    #[must_use]
    pub fn new(settings: &TemplateSettings) -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_undefined_behavior(if settings.strict_undefined {
            UndefinedBehavior::Strict
        } else {
            UndefinedBehavior::Lenient
        });
        if !settings.autoescape {
            env.set_auto_escape_callback(|_| AutoEscape::None);
        }

        Self { env }
    }

    /// Render `source` as the template called `name`
    ///
    /// The name selects the autoescape mode (`.html` escapes HTML) and shows up
    /// in error messages.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::Render` on syntax errors and, in strict mode,
    /// when the template references a variable missing from `context`.
    pub fn render(
        &self,
        name: &str,
        source: &str,
        context: &Context,
    ) -> Result<String, TemplateError> {
        let html = self.env.render_named_str(name, source, context)?;
        debug!(template = name, bytes = html.len(), "Template rendered");
        Ok(html)
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new(&TemplateSettings::default())
    }
}
