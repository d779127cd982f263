//! Loaded configuration files.
//!
//! [`ConfigSource::load`] picks the backend once, from the file extension,
//! parses the whole file and keeps only the resulting scopes. After that the
//! source is immutable: [`global_map`](ConfigSource::global_map) and
//! [`sub_map`](ConfigSource::sub_map) hand out independent copies, so any
//! number of resolutions may run against one source in parallel.
//!
//! Loading is a single blocking read. Failures are returned as-is and never
//! retried here.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::accessor::ServerConfig;
use crate::error::LoadError;
use crate::legacy::{self, LegacyNotice};
use crate::resolve;
use crate::schema::KeySchema;
use crate::types::{FileFormat, RawConfigMap, ServerId};
use crate::{ini, json};

#[derive(Debug, Clone)]
pub struct ConfigSource {
    path: PathBuf,
    format: FileFormat,
    global: RawConfigMap,
    overrides: BTreeMap<ServerId, RawConfigMap>,
    legacy_notices: Option<Vec<LegacyNotice>>,
}

impl ConfigSource {
    /// Read and parse the file at `path`.
    ///
    /// An unrecognized extension fails before the file is opened.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path).ok_or_else(|| LoadError::UnknownFormat {
            path: path.to_path_buf(),
        })?;
        let io_err = |source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        };

        let (global, overrides) = match format {
            FileFormat::Ini => {
                let content = std::fs::read_to_string(path).map_err(io_err)?;
                let doc = ini::parse(&content, path)?;
                (doc.global, doc.overrides)
            }
            FileFormat::Json => {
                let file = File::open(path).map_err(io_err)?;
                let doc = json::parse(BufReader::new(file), path)?;
                (doc.global, doc.overrides)
            }
        };

        let mut source = Self::from_scopes(format, global, overrides);
        source.path = path.to_path_buf();

        if format == FileFormat::Ini && legacy::is_legacy_file(path) {
            info!(path = %path.display(), "using legacy compatibility mode for configuration file");
            let translated = legacy::translate(&source.global);
            source.global = translated.config;
            source.legacy_notices = Some(translated.notices);
        }

        debug!(
            path = %path.display(),
            %format,
            global_keys = source.global.len(),
            overrides = source.overrides.len(),
            "loaded configuration source"
        );
        Ok(source)
    }

    /// Build a source from already-parsed scopes.
    pub fn from_scopes(
        format: FileFormat,
        global: RawConfigMap,
        overrides: BTreeMap<ServerId, RawConfigMap>,
    ) -> Self {
        Self {
            path: PathBuf::new(),
            format,
            global,
            overrides,
            legacy_notices: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Whether the global scope was translated from the legacy format.
    pub fn is_legacy(&self) -> bool {
        self.legacy_notices.is_some()
    }

    /// Unsupported legacy settings seen while loading.
    pub fn legacy_notices(&self) -> &[LegacyNotice] {
        self.legacy_notices.as_deref().unwrap_or_default()
    }

    /// A copy of the global scope.
    pub fn global_map(&self) -> RawConfigMap {
        self.global.clone()
    }

    /// A copy of the override scope for `id`, or `None` if there is none.
    pub fn sub_map(&self, id: ServerId) -> Option<RawConfigMap> {
        self.overrides.get(&id).cloned()
    }

    pub(crate) fn global_scope(&self) -> &RawConfigMap {
        &self.global
    }

    pub(crate) fn override_scope(&self, id: ServerId) -> Option<&RawConfigMap> {
        self.overrides.get(&id)
    }

    /// Ids that have an override scope, ascending.
    pub fn server_ids(&self) -> impl Iterator<Item = ServerId> + '_ {
        self.overrides.keys().copied()
    }

    /// The global scope as-is, including global-only keys.
    pub fn global_config(&self, schema: Arc<KeySchema>) -> ServerConfig {
        ServerConfig::new(self.global_map(), schema)
    }

    /// The resolved configuration for server `id`. See [`resolve::resolve`]
    /// for `base`.
    ///
    /// Global-only keys stay out of the resolved map but still read as their
    /// global value, whatever the server's own scope says.
    pub fn server_config(
        &self,
        schema: Arc<KeySchema>,
        id: ServerId,
        base: Option<RawConfigMap>,
    ) -> ServerConfig {
        let resolved = resolve::resolve(self, &schema, id, base);
        let inherited = self
            .global
            .iter()
            .filter(|(key, value)| schema.is_global_only(key) && !value.is_empty())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        ServerConfig::new(resolved, schema).with_inherited(inherited)
    }
}
