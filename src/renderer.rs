//! Template rendering for confsync.
//! Parses templates with MiniJinja and writes the output into the staging root.

use log::info;
use minijinja::value::ValueKind;
use minijinja::{escape_formatter, AutoEscape, Environment, ErrorKind, UndefinedBehavior};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::context::ConfigContext;
use crate::discovery::TemplateRecord;
use crate::error::{Error, Result};
use crate::fsutil::ensure_dir;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders the template `name` with the given source against `context`.
    ///
    /// # Errors
    /// * `Error::TemplateParseError` if the source is not a valid template
    /// * `Error::RenderError` if execution fails, e.g. on an undefined value
    fn render(&self, name: &str, source: &str, context: &ConfigContext) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
///
/// Undefined values are strict: printing, iterating or accessing attributes of
/// something missing from the context fails the render. Booleans print as
/// `true`/`false` and null prints as nothing.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_formatter(|out, state, value| match value.kind() {
            ValueKind::Bool => write!(out, "{}", value.is_true()).map_err(|_| {
                minijinja::Error::new(ErrorKind::WriteFailure, "failed to write output")
            }),
            ValueKind::None => Ok(()),
            _ => escape_formatter(out, state, value),
        });
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, name: &str, source: &str, context: &ConfigContext) -> Result<String> {
        let mut env = self.env.clone();
        env.add_template_owned(name.to_string(), normalize_field_access(source).into_owned())
            .map_err(|e| Error::TemplateParseError {
                template: name.to_string(),
                reason: e.to_string(),
            })?;

        let render_error = |e: minijinja::Error| Error::RenderError {
            template: name.to_string(),
            reason: e.to_string(),
        };
        let tmpl = env.get_template(name).map_err(render_error)?;
        tmpl.render(context).map_err(render_error)
    }
}

/// Rewrites Go-style field access (`{{ .Port }}`, `{% if .Master %}`) to plain
/// Jinja paths.
///
/// Only expression and statement tags are rewritten. String literals, comments and
/// `{% raw %}` blocks are left as written, as are attribute access such as `a.b` and
/// numbers such as `.5`.
pub fn normalize_field_access(source: &str) -> Cow<'_, str> {
    static TAG: OnceLock<Regex> = OnceLock::new();
    static FIELD: OnceLock<Regex> = OnceLock::new();

    let tag = TAG.get_or_init(|| {
        Regex::new(concat!(
            r"(?s)(\{%-?\s*raw\s*-?%\}.*?\{%-?\s*endraw\s*-?%\}|\{#.*?#\})",
            r"|(\{\{|\{%)(.*?)(\}\}|%\})",
        ))
        .expect("valid tag regex")
    });
    // String literals come first so a quote is never taken as the character before a field.
    let field = FIELD.get_or_init(|| {
        Regex::new(concat!(
            r#""(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'"#,
            r"|(^|[^\w.\)\]])\.([A-Za-z_])",
        ))
        .expect("valid field regex")
    });

    tag.replace_all(source, |caps: &Captures| {
        if caps.get(1).is_some() {
            return caps[0].to_string();
        }
        let body = field.replace_all(&caps[3], |inner: &Captures| match inner.get(2) {
            Some(name) => format!("{}{}", &inner[1], name.as_str()),
            None => inner[0].to_string(),
        });
        format!("{}{}{}", &caps[2], body, &caps[4])
    })
}

/// Renders `record` into its location under `staging_root` and returns that path.
///
/// The template is parsed and executed before anything is written, so a failing
/// template leaves no staged file behind. The staged file is created or truncated and
/// closed before returning.
pub fn render_to_staging<P: AsRef<Path>>(
    renderer: &dyn TemplateRenderer,
    record: &TemplateRecord,
    staging_root: P,
    context: &ConfigContext,
) -> Result<PathBuf> {
    let name = record.name();
    let source = fs::read_to_string(&record.template_path).map_err(|e| Error::TemplateParseError {
        template: name.clone(),
        reason: format!("unable to read template source: {}", e),
    })?;
    let rendered = renderer.render(&name, &source, context)?;

    let staged = record.staged_path(staging_root);
    if let Some(parent) = staged.parent() {
        ensure_dir(parent)?;
    }

    let file_error = |source: io::Error| Error::FileError {
        path: staged.display().to_string(),
        source,
    };
    let mut out = BufWriter::new(File::create(&staged).map_err(file_error)?);
    out.write_all(rendered.as_bytes()).map_err(file_error)?;
    out.flush().map_err(file_error)?;

    info!("Built config: {} to {}", record.file_name, staged.display());
    Ok(staged)
}
