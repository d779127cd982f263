//! JSON backend.
//!
//! The top level must be an object. Each member is either a scalar, which
//! joins the global scope, or an object under an integer key, which is the
//! override scope for that server id. Only one level of nesting is allowed.
//!
//! Scalars become text: strings as-is, booleans as `"true"`/`"false"`,
//! `null` as the empty unset sentinel, and numbers only when they are
//! integers that fit in 64 bits. Fractions, exponents and out-of-range
//! integers are rejected rather than rounded through a float.
//!
//! Input passes through [`CommentStripper`] first, so `//` line comments are
//! allowed.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use serde_json::{Map, Value};

use crate::comments::CommentStripper;
use crate::error::LoadError;
use crate::types::{RawConfigMap, ServerId};

/// Parsed scopes of one JSON document.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct JsonDocument {
    pub global: RawConfigMap,
    pub overrides: BTreeMap<ServerId, RawConfigMap>,
}

/// Parse a JSON-with-comments document from `reader`. `path` is only used for
/// error messages.
pub fn parse<R: BufRead>(reader: R, path: &Path) -> Result<JsonDocument, LoadError> {
    let value: Value = serde_json::from_reader(CommentStripper::new(reader)).map_err(|source| {
        LoadError::JsonSyntax {
            path: path.to_path_buf(),
            source,
        }
    })?;
    from_value(value, path)
}

/// Split an already-parsed JSON value into scopes.
pub fn from_value(value: Value, path: &Path) -> Result<JsonDocument, LoadError> {
    let Value::Object(members) = value else {
        return Err(LoadError::NotAnObject {
            path: path.to_path_buf(),
        });
    };

    let mut doc = JsonDocument::default();
    for (key, value) in members {
        match value {
            Value::Object(scope) => {
                let Ok(id) = key.parse::<ServerId>() else {
                    return Err(LoadError::InvalidServerId {
                        path: path.to_path_buf(),
                        key,
                    });
                };
                let scope = override_scope(scope, path)?;
                doc.overrides.entry(id).or_default().extend(scope);
            }
            Value::Array(_) => {
                return Err(LoadError::NestedNotObject {
                    path: path.to_path_buf(),
                    key,
                });
            }
            scalar => {
                let text = scalar_text(&key, &scalar, path)?;
                doc.global.insert(key, text);
            }
        }
    }
    Ok(doc)
}

fn override_scope(members: Map<String, Value>, path: &Path) -> Result<RawConfigMap, LoadError> {
    let mut scope = RawConfigMap::new();
    for (key, value) in members {
        if matches!(value, Value::Object(_) | Value::Array(_)) {
            return Err(LoadError::NestedTooDeep {
                path: path.to_path_buf(),
                key,
            });
        }
        let text = scalar_text(&key, &value, path)?;
        scope.insert(key, text);
    }
    Ok(scope)
}

fn scalar_text(key: &str, value: &Value, path: &Path) -> Result<String, LoadError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Ok(u.to_string())
            } else {
                Err(LoadError::NonIntegerNumber {
                    path: path.to_path_buf(),
                    key: key.to_string(),
                })
            }
        }
        Value::Object(_) | Value::Array(_) => Err(LoadError::NestedTooDeep {
            path: path.to_path_buf(),
            key: key.to_string(),
        }),
    }
}
