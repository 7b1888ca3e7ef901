//! Configuration context handling.
//! Loads the YAML configuration source into a read-only value tree that every template
//! is rendered against, optionally extended with the process environment.

use log::{debug, warn};
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::Path;

use crate::constants::ENV_KEY;
use crate::error::{Error, Result};

/// The variables bound as the root of every template.
///
/// Created once per run and never mutated while templates render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigContext {
    value: Value,
}

impl ConfigContext {
    /// Reads and parses the YAML configuration file at `path`.
    ///
    /// # Errors
    /// * `Error::ConfigLoadError` if the file cannot be read or is not a YAML mapping
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let load_error = |reason: String| Error::ConfigLoadError {
            path: path.display().to_string(),
            reason,
        };

        debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        Self::from_yaml(&content).map_err(load_error)
    }

    /// Parses a YAML document into a context. An empty document yields an empty mapping.
    pub fn from_yaml(content: &str) -> std::result::Result<Self, String> {
        let document: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| e.to_string())?;

        match yaml_to_json(document)? {
            Value::Null => Ok(Self::default()),
            value @ Value::Object(_) => Ok(Self { value }),
            _ => Err("the document root must be a mapping".to_string()),
        }
    }

    /// Adds the reserved `Env` entry holding the given environment variables.
    ///
    /// Variables are sorted by name; entries that are not valid UTF-8 are skipped.
    /// An `Env` key already present in the document is replaced.
    pub fn with_env<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let env: BTreeMap<String, String> = vars
            .into_iter()
            .filter_map(|(name, value)| {
                Some((name.into_string().ok()?, value.into_string().ok()?))
            })
            .collect();
        let env: Map<String, Value> = env
            .into_iter()
            .map(|(name, value)| (name, Value::String(value)))
            .collect();

        if let Value::Object(root) = &mut self.value {
            if root.contains_key(ENV_KEY) {
                warn!(
                    "Configuration key '{}' is replaced by the process environment",
                    ENV_KEY
                );
            }
            root.insert(ENV_KEY.to_string(), Value::Object(env));
        }
        self
    }

    /// Adds the current process environment under `Env`.
    pub fn with_process_env(self) -> Self {
        self.with_env(std::env::vars_os())
    }

    /// The whole value tree.
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    /// Resolves a dotted path such as `Servers.0.Host` or `.TcpPort`.
    ///
    /// `.` and the empty path resolve to the root. Segments applied to a sequence must be
    /// decimal indices.
    ///
    /// # Errors
    /// * `Error::UndefinedValueError` if any segment does not resolve
    pub fn lookup(&self, path: &str) -> Result<&Value> {
        let trimmed = path.strip_prefix('.').unwrap_or(path);
        if trimmed.is_empty() {
            return Ok(&self.value);
        }

        let mut current = &self.value;
        for segment in trimmed.split('.') {
            let next = match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            };
            current = next.ok_or_else(|| Error::UndefinedValueError {
                path: path.to_string(),
            })?;
        }
        Ok(current)
    }
}

impl Default for ConfigContext {
    /// An empty mapping.
    fn default() -> Self {
        Self {
            value: Value::Object(Map::new()),
        }
    }
}

fn yaml_to_json(value: serde_yaml::Value) -> std::result::Result<Value, String> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => yaml_number(&n),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<std::result::Result<_, _>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number)
    }
}

fn yaml_key(key: serde_yaml::Value) -> std::result::Result<String, String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        serde_yaml::Value::Tagged(tagged) => yaml_key(tagged.value),
        other => Err(format!("unsupported mapping key: {:?}", other)),
    }
}
