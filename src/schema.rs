//! The fixed key tables: defaults, global-only keys and offset keys.
//!
//! Each canonical key is described once by a [`KeySpec`]. The three tables
//! the resolver and the accessor need are views over the same list, so a key
//! can never be, say, offset without also being documented.
//!
//! The built-in schema is constructed once per process and shared read-only
//! through [`KeySchema::builtin`]. Custom schemas (tests, embedders with
//! their own keys) are built with [`KeySchema::new`] and passed explicitly.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, LazyLock};

/// Where a key may be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScope {
    /// Settable globally and per server.
    Server,
    /// Settable only at the top of the file. Never copied into a resolved
    /// per-server map; read it from the global configuration instead.
    Global,
}

/// One canonical configuration key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpec {
    pub key: &'static str,
    pub default: Option<&'static str>,
    pub doc: &'static [&'static str],
    pub scope: KeyScope,
    /// Inherited integer values are shifted by `server_id - 1`.
    pub offset: bool,
}

impl KeySpec {
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            default: None,
            doc: &[],
            scope: KeyScope::Server,
            offset: false,
        }
    }

    pub const fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    pub const fn doc(mut self, doc: &'static [&'static str]) -> Self {
        self.doc = doc;
        self
    }

    pub const fn global_only(mut self) -> Self {
        self.scope = KeyScope::Global;
        self
    }

    pub const fn offset(mut self) -> Self {
        self.offset = true;
        self
    }
}

/// Immutable lookup tables derived from a list of [`KeySpec`]s.
#[derive(Debug, Clone)]
pub struct KeySchema {
    specs: Vec<KeySpec>,
    defaults: BTreeMap<&'static str, &'static str>,
    global_only: BTreeSet<&'static str>,
    offset: BTreeSet<&'static str>,
}

impl KeySchema {
    /// Build a schema. A key listed twice keeps its last description.
    pub fn new(specs: impl IntoIterator<Item = KeySpec>) -> Self {
        let mut by_key: BTreeMap<&'static str, usize> = BTreeMap::new();
        let mut ordered: Vec<KeySpec> = Vec::new();
        for spec in specs {
            match by_key.get(spec.key) {
                Some(&i) => ordered[i] = spec,
                None => {
                    by_key.insert(spec.key, ordered.len());
                    ordered.push(spec);
                }
            }
        }

        let defaults = ordered
            .iter()
            .filter_map(|s| s.default.map(|d| (s.key, d)))
            .collect();
        let global_only = ordered
            .iter()
            .filter(|s| s.scope == KeyScope::Global)
            .map(|s| s.key)
            .collect();
        let offset = ordered.iter().filter(|s| s.offset).map(|s| s.key).collect();

        Self {
            specs: ordered,
            defaults,
            global_only,
            offset,
        }
    }

    /// The process-wide built-in schema.
    pub fn builtin() -> Arc<KeySchema> {
        static BUILTIN: LazyLock<Arc<KeySchema>> =
            LazyLock::new(|| Arc::new(KeySchema::new(BUILTIN_KEYS.iter().cloned())));
        Arc::clone(&BUILTIN)
    }

    /// An empty schema: no defaults, no special keys.
    pub fn empty() -> Self {
        Self::new([])
    }

    /// Specs in declaration order.
    pub fn specs(&self) -> &[KeySpec] {
        &self.specs
    }

    pub fn spec(&self, key: &str) -> Option<&KeySpec> {
        self.specs.iter().find(|s| s.key == key)
    }

    pub fn default_for(&self, key: &str) -> Option<&'static str> {
        self.defaults.get(key).copied()
    }

    pub fn is_global_only(&self, key: &str) -> bool {
        self.global_only.contains(key)
    }

    pub fn is_offset(&self, key: &str) -> bool {
        self.offset.contains(key)
    }

    pub fn offset_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.offset.iter().copied()
    }

    pub fn global_only_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.global_only.iter().copied()
    }
}

const BUILTIN_KEYS: &[KeySpec] = &[
    KeySpec::new("Address").doc(&["Address to bind the listeners to."]),
    KeySpec::new("Port").offset().doc(&[
        "Port for the native voice protocol.",
        "Incremented for each virtual server when set globally.",
    ]),
    KeySpec::new("WebPort").offset().doc(&[
        "Port for the WebSocket protocol.",
        "Incremented for each virtual server when set globally.",
    ]),
    KeySpec::new("WelcomeText")
        .default_value("Welcome to this server.")
        .doc(&["Message of the day (HTML) sent to connecting clients."]),
    KeySpec::new("ServerPassword").doc(&["Password required to join the server."]),
    KeySpec::new("MaxBandwidth")
        .default_value("72000")
        .doc(&["Maximum voice bandwidth per client, in bits per second."]),
    KeySpec::new("MaxUsers")
        .default_value("1000")
        .doc(&["Maximum number of concurrent clients."]),
    KeySpec::new("MaxUsersPerChannel")
        .default_value("0")
        .doc(&["Maximum clients per channel. 0 means unlimited."]),
    KeySpec::new("MaxTextMessageLength")
        .default_value("5000")
        .doc(&["Maximum length of a text message."]),
    KeySpec::new("MaxImageMessageLength")
        .default_value("131072")
        .doc(&["Maximum length of a message carrying an image."]),
    KeySpec::new("AllowHTML")
        .default_value("true")
        .doc(&["Whether clients may send HTML messages."]),
    KeySpec::new("DefaultChannel")
        .default_value("0")
        .doc(&["Channel (by id) new users join. The root channel is 0."]),
    KeySpec::new("RememberChannel")
        .default_value("true")
        .doc(&["Whether users rejoin the last channel they were in."]),
    KeySpec::new("SendOSInfo")
        .default_value("true")
        .doc(&["Whether to include server OS info in ping responses."]),
    KeySpec::new("AllowPing")
        .default_value("true")
        .doc(&["Whether to answer pings from the connect dialog."]),
    KeySpec::new("LogPath")
        .default_value("vservconf.log")
        .global_only()
        .doc(&["Path to the log file, relative to the data directory."]),
    KeySpec::new("CertPath")
        .default_value("cert.pem")
        .doc(&["TLS certificate chain, relative to the data directory."]),
    KeySpec::new("KeyPath")
        .default_value("key.pem")
        .doc(&["TLS private key, relative to the data directory."]),
    KeySpec::new("RegisterName").doc(&[
        "Public registration. All Register* keys must be set to register.",
        "RegisterName also names the root channel.",
    ]),
    KeySpec::new("RegisterHost"),
    KeySpec::new("RegisterPassword")
        .doc(&["Arbitrary secret guarding the registration. Don't lose it."]),
    KeySpec::new("RegisterWebUrl"),
    KeySpec::new("RegisterLocation"),
];
