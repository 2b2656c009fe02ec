//! Comment rendering with Jinja-compatible templates.
//!
//! Templates are loaded as `<name>.j2` from the configured directory first and fall back to the
//! built-in templates, so custom templates may `include` or `extend` sibling files as well as
//! the built-ins. In contrast to the tracker, this is an opinionated concrete client and does
//! not expose a generic trait interface.

use std::{path::Path, sync::Arc};

use minijinja::{Environment, Value, path_loader};
use tracing::{debug, error, instrument, warn};

use crate::base::{
    config::Config,
    templates::{self, RENDER_ERROR_COMMENT, TEMPLATE_EXTENSION},
    types::Res,
};

/// Template renderer for the application.
///
/// It is designed to be trivially cloneable.
#[derive(Clone)]
pub struct TemplateRenderer {
    inner: Arc<Environment<'static>>,
}

impl TemplateRenderer {
    /// Creates a renderer that prefers templates found in `dir`.
    ///
    /// A directory that does not exist is ignored with a warning.
    pub fn new(dir: Option<&Path>) -> Self {
        let dir_loader = dir
            .and_then(|dir| {
                if dir.is_dir() {
                    debug!("Using templates from `{}`.", dir.display());
                    Some(dir.to_path_buf())
                } else {
                    warn!("Templates directory `{}` not found; using built-in templates.", dir.display());
                    None
                }
            })
            .map(path_loader);

        let mut env = Environment::new();
        env.set_loader(move |file| {
            if let Some(load) = &dir_loader {
                if let Some(source) = load(file)? {
                    return Ok(Some(source));
                }
            }

            Ok(builtin_file(file).map(str::to_string))
        });

        Self { inner: Arc::new(env) }
    }

    /// Creates a renderer from the configured template directory.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.template_dir().as_deref())
    }

    /// Render the named template, substituting an apology if anything goes wrong.
    #[instrument(skip(self, context))]
    pub fn render(&self, name: &str, context: Value) -> String {
        match self.try_render(name, context) {
            Ok(text) => text,
            Err(err) => {
                error!("Failed to render template `{}`: {:#}", name, err);
                RENDER_ERROR_COMMENT.to_string()
            }
        }
    }

    /// Render the named template.
    pub fn try_render(&self, name: &str, context: Value) -> Res<String> {
        let template = self.inner.get_template(&format!("{name}.{TEMPLATE_EXTENSION}"))?;
        Ok(template.render(context)?)
    }
}

/// The built-in source for a template file name such as `passed.j2`.
fn builtin_file(file: &str) -> Option<&'static str> {
    file.strip_suffix(TEMPLATE_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
        .and_then(templates::builtin)
}
