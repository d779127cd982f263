//! Core data types shared across the crate.
//!
//! Everything is text. A [`RawConfigMap`] stores booleans and integers as
//! strings so that an explicit empty string can mean "unset" in an override
//! layer, distinct from a key that is simply absent.
//!
//! # Layers
//!
//! ```text
//! Defaults table        KeySchema (consulted lazily at read time)
//!        ↑ overridden by
//! Global scope          top of the file, offset keys shifted per server
//!        ↑ overridden by
//! Override scope        [N] section / "N": { ... } object
//!        ↑ overridden by
//! Runtime writes        ServerConfig::set_value
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Canonical key → textual value.
pub type RawConfigMap = BTreeMap<String, String>;

/// Identity of one virtual server hosted in the process. Ids start at 1.
pub type ServerId = i64;

/// The closed set of on-disk formats, chosen once per file by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum FileFormat {
    /// INI with `[N]` override sections.
    Ini,
    /// JSON object with `//` line comments and `"N": { ... }` override objects.
    Json,
}

impl FileFormat {
    /// Pick the format from the file extension. Matching is exact (`.ini`,
    /// `.json`); anything else is unrecognized.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "ini" => Some(FileFormat::Ini),
            "json" => Some(FileFormat::Json),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Ini => "ini",
            FileFormat::Json => "json",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A config operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
///
/// `server: None` targets the global configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigAction {
    Gen {
        output: Option<PathBuf>,
        format: FileFormat,
    },
    List {
        server: Option<ServerId>,
    },
    Get {
        key: String,
        server: Option<ServerId>,
    },
}
