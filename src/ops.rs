//! Config operations: template generation, key lookup, listing, and result types.
//!
//! Provides the logic behind `gen`, `list` and `get`, and the
//! [`ConfigResult`] enum that callers use to display results.

use std::fmt::{self, Write as _};
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::accessor::ServerConfig;
use crate::error::ConfigError;
use crate::schema::{KeySchema, KeyScope};
use crate::source::ConfigSource;
use crate::types::{ConfigAction, FileFormat, ServerId};

/// Result of a config operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigResult {
    /// A generated sample config file.
    Template { text: String },
    /// Confirmation that a template was written to a file.
    TemplateWritten { path: PathBuf },
    /// A key's effective value and its doc lines.
    KeyValue {
        key: String,
        value: String,
        doc: Vec<String>,
    },
    /// Effective key-value pairs, sorted by key.
    Listing { entries: Vec<(String, String)> },
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::Template { text } => write!(f, "{text}"),
            ConfigResult::TemplateWritten { path } => {
                write!(f, "Config template written to {}", path.display())
            }
            ConfigResult::KeyValue { key, value, doc } => {
                for line in doc {
                    writeln!(f, "# {line}")?;
                }
                write!(f, "{key} = {value}")
            }
            ConfigResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
        }
    }
}

const TEMPLATE_HEADER: &[&str] = &[
    "Server configuration file.",
    "",
    "Commented-out settings show the defaults. Top-level settings apply to",
    "every virtual server; Port and WebPort are incremented per server id.",
    "To revert a value to its default, set it to an empty value.",
];

/// Render a commented sample config file from the schema.
///
/// Every setting is commented out, so the template loads as an empty
/// configuration.
pub fn generate_template(schema: &KeySchema, format: FileFormat) -> String {
    match format {
        FileFormat::Ini => ini_template(schema),
        FileFormat::Json => json_template(schema),
    }
}

fn ini_template(schema: &KeySchema) -> String {
    let mut out = String::new();
    for line in TEMPLATE_HEADER {
        push_comment(&mut out, "#", line);
    }
    push_comment(&mut out, "#", "Quote values containing # or ; with double quotes or backticks.");
    for spec in schema.specs() {
        out.push('\n');
        for line in spec.doc {
            push_comment(&mut out, "#", line);
        }
        if spec.scope == KeyScope::Global {
            push_comment(&mut out, "#", "Global only: ignored in per-server sections.");
        }
        let _ = writeln!(out, "#{} = {}", spec.key, spec.default.unwrap_or_default());
    }
    out.push('\n');
    push_comment(&mut out, "#", "Sections named by server id override settings for that server.");
    out.push_str("#[1]\n#Port =\n");
    out
}

fn json_template(schema: &KeySchema) -> String {
    let mut out = String::from("{\n");
    for line in TEMPLATE_HEADER {
        push_comment(&mut out, "  //", line);
    }
    for spec in schema.specs() {
        out.push('\n');
        for line in spec.doc {
            push_comment(&mut out, "  //", line);
        }
        if spec.scope == KeyScope::Global {
            push_comment(&mut out, "  //", "Global only: ignored in per-server objects.");
        }
        let key = serde_json::Value::from(spec.key);
        let value = spec
            .default
            .map_or(serde_json::Value::Null, serde_json::Value::from);
        let _ = writeln!(out, "  // {key}: {value},");
    }
    out.push('\n');
    push_comment(&mut out, "  //", "Objects keyed by server id override settings for that server.");
    out.push_str("  // \"1\": { \"Port\": null }\n}\n");
    out
}

fn push_comment(out: &mut String, marker: &str, line: &str) {
    if line.is_empty() {
        out.push_str(marker);
    } else {
        let _ = write!(out, "{marker} {line}");
    }
    out.push('\n');
}

/// Get a key's effective value, including its doc lines.
///
/// Fails with [`ConfigError::KeyNotFound`] when the key is neither stored nor
/// known to the schema.
pub fn get_value(config: &ServerConfig, key: &str) -> Result<ConfigResult, ConfigError> {
    let spec = config.schema().spec(key);
    if spec.is_none() && !config.get_all().contains_key(key) {
        return Err(ConfigError::KeyNotFound(key.into()));
    }
    Ok(ConfigResult::KeyValue {
        key: key.into(),
        value: config.string_value(key),
        doc: spec
            .map(|s| s.doc.iter().map(|l| l.to_string()).collect())
            .unwrap_or_default(),
    })
}

/// List the effective value of every schema key plus every stored key.
pub fn list_values(config: &ServerConfig) -> ConfigResult {
    let mut keys: Vec<String> = config.get_all().into_keys().collect();
    keys.extend(config.schema().specs().iter().map(|s| s.key.to_string()));
    keys.sort();
    keys.dedup();

    let entries = keys
        .into_iter()
        .map(|key| {
            let value = config.string_value(&key);
            (key, value)
        })
        .collect();
    ConfigResult::Listing { entries }
}

/// Handle a [`ConfigAction`] against a loaded source.
pub fn handle(
    source: &ConfigSource,
    schema: Arc<KeySchema>,
    action: &ConfigAction,
) -> Result<ConfigResult, ConfigError> {
    let config_for = |server: Option<ServerId>| match server {
        Some(id) => source.server_config(Arc::clone(&schema), id, None),
        None => source.global_config(Arc::clone(&schema)),
    };

    match action {
        ConfigAction::Gen { output, format } => {
            let text = generate_template(&schema, *format);
            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                            path: parent.to_path_buf(),
                            source: e,
                        })?;
                    }
                    std::fs::write(path, &text).map_err(|e| ConfigError::Io {
                        path: path.clone(),
                        source: e,
                    })?;
                    Ok(ConfigResult::TemplateWritten { path: path.clone() })
                }
                None => Ok(ConfigResult::Template { text }),
            }
        }
        ConfigAction::List { server } => Ok(list_values(&config_for(*server))),
        ConfigAction::Get { key, server } => get_value(&config_for(*server), key),
    }
}
