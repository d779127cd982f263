//! Typed, thread-safe access to one resolved configuration.
//!
//! A [`ServerConfig`] owns its map behind a reader/writer lock: reads share
//! the lock, [`set_value`](ServerConfig::set_value) and
//! [`reset_value`](ServerConfig::reset_value) take it exclusively. Lookups
//! fall back to the inherited global-only values, then to the schema
//! defaults, then to the empty string.
//!
//! The typed getters never fail. A stored value that does not parse reads as
//! `0`, `0` or `false`. Use [`parse_value`](ServerConfig::parse_value) when a
//! parse failure should be an error instead.

use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::ConfigError;
use crate::schema::KeySchema;
use crate::types::RawConfigMap;

#[derive(Debug)]
pub struct ServerConfig {
    values: RwLock<RawConfigMap>,
    inherited: RawConfigMap,
    schema: Arc<KeySchema>,
}

impl ServerConfig {
    pub fn new(values: RawConfigMap, schema: Arc<KeySchema>) -> Self {
        Self {
            values: RwLock::new(values),
            inherited: RawConfigMap::new(),
            schema,
        }
    }

    /// Read-only values consulted after the stored ones and before the
    /// defaults. Servers inherit global-only keys through this layer.
    pub fn with_inherited(mut self, inherited: RawConfigMap) -> Self {
        self.inherited = inherited;
        self
    }

    pub fn schema(&self) -> &KeySchema {
        &self.schema
    }

    /// A copy of the stored values, without inherited values or defaults.
    pub fn get_all(&self) -> RawConfigMap {
        self.values.read().clone()
    }

    pub fn set_value(&self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        self.values.write().insert(key, value);
    }

    /// Drop the stored value so lookups fall through to the inherited value
    /// or the default.
    pub fn reset_value(&self, key: &str) {
        self.values.write().remove(key);
    }

    /// Stored value, else the inherited value, else the default, else `""`.
    pub fn string_value(&self, key: &str) -> String {
        if let Some(value) = self.values.read().get(key) {
            return value.clone();
        }
        if let Some(value) = self.inherited.get(key) {
            return value.clone();
        }
        self.schema.default_for(key).unwrap_or_default().to_string()
    }

    pub fn int_value(&self, key: &str) -> i64 {
        self.string_value(key).parse().unwrap_or_default()
    }

    pub fn unsigned_value(&self, key: &str) -> u32 {
        self.string_value(key).parse().unwrap_or_default()
    }

    pub fn bool_value(&self, key: &str) -> bool {
        parse_bool(&self.string_value(key)).unwrap_or_default()
    }

    /// The value as a path. Absolute paths are normalized as they are;
    /// relative ones are joined onto `base` first.
    pub fn path_value(&self, key: &str, base: &Path) -> PathBuf {
        let raw = PathBuf::from(self.string_value(key));
        if raw.is_absolute() {
            clean_path(&raw)
        } else {
            clean_path(&base.join(raw))
        }
    }

    /// Strict read: parse the effective value as `T`, failing with
    /// [`ConfigError::InvalidValue`].
    pub fn parse_value<T>(&self, key: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let value = self.string_value(key);
        value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            reason: e.to_string(),
            value,
        })
    }
}

/// Boolean spellings accepted by [`ServerConfig::bool_value`].
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Lexically normalize a path: drop `.`, fold `name/..`, keep leading `..`
/// on relative paths, and never climb above the root. An empty result is
/// `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{map, test_schema};
    use std::thread;

    fn config(pairs: &[(&str, &str)]) -> ServerConfig {
        ServerConfig::new(map(pairs), Arc::new(test_schema()))
    }

    #[test]
    fn stored_value_wins() {
        let cfg = config(&[("MaxUsers", "5")]);
        assert_eq!(cfg.string_value("MaxUsers"), "5");
    }

    #[test]
    fn falls_back_to_default_then_empty() {
        let cfg = config(&[]);
        assert_eq!(cfg.string_value("MaxUsers"), "1000");
        assert_eq!(cfg.string_value("Address"), "");
        assert_eq!(cfg.string_value("Unknown"), "");
    }

    #[test]
    fn bool_falls_back_to_default() {
        let cfg = config(&[]);
        assert!(cfg.bool_value("AllowHTML"));
        assert!(!cfg.bool_value("Unknown"));
    }

    #[test]
    fn bool_spellings() {
        let cfg = config(&[("A", "T"), ("B", "0"), ("C", "False"), ("D", "yes")]);
        assert!(cfg.bool_value("A"));
        assert!(!cfg.bool_value("B"));
        assert!(!cfg.bool_value("C"));
        assert!(!cfg.bool_value("D"));
    }

    #[test]
    fn int_parse_failure_is_zero() {
        let cfg = config(&[("MaxUsers", "lots"), ("Neg", "-4")]);
        assert_eq!(cfg.int_value("MaxUsers"), 0);
        assert_eq!(cfg.int_value("Neg"), -4);
        assert_eq!(cfg.int_value("Address"), 0);
    }

    #[test]
    fn unsigned_parse_failure_is_zero() {
        let cfg = config(&[("A", "-1"), ("B", "4294967296"), ("C", "4294967295")]);
        assert_eq!(cfg.unsigned_value("A"), 0);
        assert_eq!(cfg.unsigned_value("B"), 0);
        assert_eq!(cfg.unsigned_value("C"), u32::MAX);
        assert_eq!(cfg.unsigned_value("MaxUsers"), 1000);
    }

    #[test]
    fn strict_parse_reports_value() {
        let cfg = config(&[("MaxUsers", "lots")]);
        match cfg.parse_value::<u32>("MaxUsers") {
            Err(ConfigError::InvalidValue { key, value, .. }) => {
                assert_eq!(key, "MaxUsers");
                assert_eq!(value, "lots");
            }
            other => panic!("Expected InvalidValue, got: {other:?}"),
        }
        assert_eq!(config(&[]).parse_value::<u32>("MaxUsers").unwrap(), 1000);
    }

    #[test]
    fn set_and_reset() {
        let cfg = config(&[]);
        cfg.set_value("MaxUsers", "12");
        assert_eq!(cfg.int_value("MaxUsers"), 12);
        cfg.reset_value("MaxUsers");
        assert_eq!(cfg.int_value("MaxUsers"), 1000);
    }

    #[test]
    fn inherited_sits_between_stored_and_default() {
        let cfg = config(&[]).with_inherited(map(&[("LogPath", "global.log")]));
        assert_eq!(cfg.string_value("LogPath"), "global.log");
        assert!(cfg.get_all().is_empty());

        cfg.set_value("LogPath", "local.log");
        assert_eq!(cfg.string_value("LogPath"), "local.log");
        cfg.reset_value("LogPath");
        assert_eq!(cfg.string_value("LogPath"), "global.log");
    }

    #[test]
    fn get_all_is_a_snapshot() {
        let cfg = config(&[("Port", "1")]);
        let snapshot = cfg.get_all();
        cfg.set_value("Port", "2");
        assert_eq!(snapshot["Port"], "1");
        assert_eq!(cfg.get_all()["Port"], "2");
        assert!(!snapshot.contains_key("MaxUsers"));
    }

    #[test]
    fn writes_do_not_leak_between_configs() {
        let schema = Arc::new(test_schema());
        let base = map(&[("Port", "1")]);
        let a = ServerConfig::new(base.clone(), Arc::clone(&schema));
        let b = ServerConfig::new(base, schema);
        a.set_value("Port", "2");
        assert_eq!(b.string_value("Port"), "1");
    }

    #[test]
    fn concurrent_reads_and_writes() {
        let cfg = Arc::new(config(&[("MaxUsers", "0")]));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cfg = Arc::clone(&cfg);
                thread::spawn(move || {
                    for n in 0..100 {
                        if i % 2 == 0 {
                            cfg.set_value("MaxUsers", n.to_string());
                        } else {
                            let v = cfg.int_value("MaxUsers");
                            assert!((0..100).contains(&v));
                        }
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn relative_path_joins_base() {
        let cfg = config(&[("LogPath", "logs/../server.log")]);
        assert_eq!(
            cfg.path_value("LogPath", Path::new("/var/lib/vserv")),
            PathBuf::from("/var/lib/vserv/server.log")
        );
    }

    #[test]
    fn absolute_path_ignores_base() {
        let cfg = config(&[("CertPath", "/etc/./tls//cert.pem")]);
        assert_eq!(
            cfg.path_value("CertPath", Path::new("/var/lib/vserv")),
            PathBuf::from("/etc/tls/cert.pem")
        );
    }

    #[test]
    fn path_uses_default() {
        let cfg = config(&[]);
        assert_eq!(
            cfg.path_value("LogPath", Path::new("data")),
            PathBuf::from("data/server.log")
        );
    }

    #[test]
    fn clean_path_cases() {
        assert_eq!(clean_path(Path::new("")), PathBuf::from("."));
        assert_eq!(clean_path(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(clean_path(Path::new("../a/..")), PathBuf::from(".."));
        assert_eq!(clean_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(clean_path(Path::new("a/..")), PathBuf::from("."));
    }
}
