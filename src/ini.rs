//! INI backend.
//!
//! Keys before the first section header form the global scope. A section
//! whose name is a run of ASCII digits is the override scope for that server
//! id; any other section is ignored.
//!
//! Line syntax:
//!
//! - `#` or `;` at the start of a line: comment.
//! - `[name]`: section header. Text after `]` is ignored.
//! - `key = value` or `key: value`, split at the first `=` or `:`.
//! - `key` alone, optionally followed by a comment: a boolean key, read as
//!   `"true"`.
//!
//! Values:
//!
//! - `"..."` keeps `#` and `;` and unescapes `\"`. The value ends at the
//!   first unescaped `"`; anything after it is dropped.
//! - `` `...` `` is taken literally up to the next backtick.
//! - Otherwise the value is cut at the first `#` or `;`, trimmed, and one
//!   pair of surrounding single quotes is removed.
//!
//! Repeated keys keep the last value; repeated sections merge.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::LoadError;
use crate::types::{RawConfigMap, ServerId};

/// Parsed scopes of one INI document.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IniDocument {
    pub global: RawConfigMap,
    pub overrides: BTreeMap<ServerId, RawConfigMap>,
}

/// Parse INI `content`. `path` is only used for error messages.
pub fn parse(content: &str, path: &Path) -> Result<IniDocument, LoadError> {
    let mut doc = IniDocument::default();
    // None = global scope, Some(None) = ignored section.
    let mut section: Option<Option<ServerId>> = None;

    for (i, raw) in content.lines().enumerate() {
        let line_no = i + 1;
        let syntax = |reason: &str| LoadError::IniSyntax {
            path: path.to_path_buf(),
            line: line_no,
            reason: reason.to_string(),
        };

        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let close = header
                .find(']')
                .ok_or_else(|| syntax("unclosed section header"))?;
            let name = header[..close].trim();
            let id = server_id(name);
            if id.is_none() {
                debug!(section = name, "ignoring section that is not a server id");
            }
            section = Some(id);
            continue;
        }

        // A comment before the first delimiter makes this a bare key.
        let delimiter = line
            .find(['=', ':'])
            .filter(|&at| line.find(['#', ';']).is_none_or(|comment| at < comment));
        let (key, value) = match delimiter {
            Some(at) => (line[..at].trim(), parse_value(&line[at + 1..]).map_err(syntax)?),
            None => (strip_inline_comment(line), "true".to_string()),
        };
        if key.is_empty() {
            return Err(syntax("missing key name"));
        }

        let scope = match section {
            None => &mut doc.global,
            Some(Some(id)) => doc.overrides.entry(id).or_default(),
            Some(None) => continue,
        };
        scope.insert(key.to_string(), value);
    }

    Ok(doc)
}

fn server_id(name: &str) -> Option<ServerId> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

fn parse_value(raw: &str) -> Result<String, &'static str> {
    let value = raw.trim_start();

    if let Some(rest) = value.strip_prefix('"') {
        let close = closing_quote(rest).ok_or("unterminated quoted value")?;
        return Ok(rest[..close].replace("\\\"", "\""));
    }
    if let Some(rest) = value.strip_prefix('`') {
        let close = rest.find('`').ok_or("unterminated quoted value")?;
        return Ok(rest[..close].to_string());
    }

    let value = strip_inline_comment(value);
    let value = value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .unwrap_or(value);
    Ok(value.to_string())
}

/// Byte offset of the first `"` not preceded by a backslash escape.
fn closing_quote(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return Some(i),
            _ => escaped = false,
        }
    }
    None
}

fn strip_inline_comment(s: &str) -> &str {
    match s.find(['#', ';']) {
        Some(at) => s[..at].trim(),
        None => s.trim(),
    }
}
