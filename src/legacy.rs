//! Translation of legacy-format configuration keys.
//!
//! A legacy file is recognized by name. Its global scope uses the legacy
//! server's key names; [`translate`] renames the keys this crate understands
//! and drops the rest. A handful of legacy settings are common enough that
//! silently dropping them would surprise operators, so each one seen produces
//! a [`LegacyNotice`] and an informational log line. Notices never stop the
//! translation.
//!
//! Override sections of a legacy file are not translated.

use std::fmt;
use std::path::Path;

use tracing::info;

use crate::types::RawConfigMap;

/// File names that switch a source into legacy compatibility mode.
pub const LEGACY_FILE_NAMES: &[&str] = &["murmur.ini"];

/// Legacy key → canonical key.
const RENAMES: &[(&str, &str)] = &[
    ("logfile", "LogPath"),
    ("welcometext", "WelcomeText"),
    ("port", "Port"),
    ("host", "Address"),
    ("serverpassword", "ServerPassword"),
    ("bandwidth", "MaxBandwidth"),
    ("users", "MaxUsers"),
    ("usersperchannel", "MaxUsersPerChannel"),
    ("textmessagelength", "MaxTextMessageLength"),
    ("imagemessagelength", "MaxImageMessageLength"),
    ("allowhtml", "AllowHTML"),
    ("defaultchannel", "DefaultChannel"),
    ("rememberchannel", "RememberChannel"),
    ("sendversion", "SendOSInfo"),
    ("allowping", "AllowPing"),
    ("sslCert", "CertPath"),
    ("sslKey", "KeyPath"),
    ("registerName", "RegisterName"),
    ("registerHostname", "RegisterHost"),
    ("registerPassword", "RegisterPassword"),
    ("registerUrl", "RegisterWebUrl"),
    ("registerLocation", "RegisterLocation"),
];

/// A recognized legacy setting that has no equivalent here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyNotice {
    /// `database`. `sqlite` is true when the driver is unset or SQLite, in
    /// which case the data can be imported.
    Database { sqlite: bool },
    /// `sslDHParams`
    DhParams,
    /// `sslCiphers`
    Ciphers,
    /// `ice`
    Ice,
    /// `grpc`
    Grpc,
}

impl LegacyNotice {
    /// The legacy key that triggered this notice.
    pub fn key(&self) -> &'static str {
        match self {
            LegacyNotice::Database { .. } => "database",
            LegacyNotice::DhParams => "sslDHParams",
            LegacyNotice::Ciphers => "sslCiphers",
            LegacyNotice::Ice => "ice",
            LegacyNotice::Grpc => "grpc",
        }
    }
}

impl fmt::Display for LegacyNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegacyNotice::Database { sqlite: true } => write!(
                f,
                "legacy databases are not read directly; import the SQLite database once instead"
            ),
            LegacyNotice::Database { sqlite: false } => {
                write!(f, "legacy databases are not read directly")
            }
            LegacyNotice::DhParams => {
                write!(f, "DHE cipher modes are not available, configured DH parameters are ignored")
            }
            LegacyNotice::Ciphers => write!(f, "changing the TLS cipher list is not supported"),
            LegacyNotice::Ice => write!(f, "the ICE RPC interface is not supported"),
            LegacyNotice::Grpc => write!(f, "the gRPC interface is not supported"),
        }
    }
}

/// Result of translating one legacy global scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyTranslation {
    pub config: RawConfigMap,
    pub notices: Vec<LegacyNotice>,
}

/// Whether `path` names a legacy-format file.
pub fn is_legacy_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| LEGACY_FILE_NAMES.contains(&n))
}

/// Rename legacy keys to canonical ones. Unknown keys are dropped; known but
/// unsupported ones are reported as notices and logged at info level.
pub fn translate(source: &RawConfigMap) -> LegacyTranslation {
    let mut out = LegacyTranslation::default();

    for (key, value) in source {
        if let Some((_, canonical)) = RENAMES.iter().find(|(legacy, _)| *legacy == key.as_str()) {
            out.config.insert(canonical.to_string(), value.clone());
        }

        let notice = match key.as_str() {
            "database" => Some(LegacyNotice::Database {
                sqlite: source
                    .get("dbDriver")
                    .is_none_or(|driver| driver == "QSQLITE"),
            }),
            "sslDHParams" => Some(LegacyNotice::DhParams),
            "sslCiphers" => Some(LegacyNotice::Ciphers),
            "ice" => Some(LegacyNotice::Ice),
            "grpc" => Some(LegacyNotice::Grpc),
            _ => None,
        };
        if let Some(notice) = notice {
            info!(key = notice.key(), "{notice}");
            out.notices.push(notice);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> RawConfigMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn renames_known_keys() {
        let t = translate(&map(&[("bandwidth", "50000")]));
        assert_eq!(t.config.get("MaxBandwidth").map(String::as_str), Some("50000"));
        assert!(!t.config.contains_key("bandwidth"));
        assert!(t.notices.is_empty());
    }

    #[test]
    fn rename_is_case_sensitive() {
        let t = translate(&map(&[("sslCert", "a.pem"), ("sslcert", "b.pem")]));
        assert_eq!(t.config["CertPath"], "a.pem");
        assert_eq!(t.config.len(), 1);
    }

    #[test]
    fn unknown_keys_dropped_silently() {
        let t = translate(&map(&[("uname", "x"), ("port", "64738")]));
        assert_eq!(t.config, map(&[("Port", "64738")]));
        assert!(t.notices.is_empty());
    }

    #[test]
    fn unsupported_keys_produce_notices() {
        let t = translate(&map(&[
            ("ice", "tcp -h 127.0.0.1 -p 6502"),
            ("sslCiphers", "EECDH+AESGCM"),
            ("users", "50"),
        ]));
        assert_eq!(t.config, map(&[("MaxUsers", "50")]));
        assert_eq!(t.notices.len(), 2);
        assert!(t.notices.contains(&LegacyNotice::Ice));
        assert!(t.notices.contains(&LegacyNotice::Ciphers));
    }

    #[test]
    fn database_notice_checks_driver() {
        let t = translate(&map(&[("database", "murmur.sqlite")]));
        assert_eq!(t.notices, vec![LegacyNotice::Database { sqlite: true }]);

        let t = translate(&map(&[("database", "murmur"), ("dbDriver", "QMYSQL")]));
        assert_eq!(t.notices, vec![LegacyNotice::Database { sqlite: false }]);
    }

    #[test]
    fn notice_text_names_the_limitation() {
        assert!(LegacyNotice::Grpc.to_string().contains("gRPC"));
        assert!(LegacyNotice::DhParams.to_string().contains("DH"));
        assert_eq!(LegacyNotice::DhParams.key(), "sslDHParams");
    }

    #[test]
    fn legacy_file_detection() {
        assert!(is_legacy_file(Path::new("/etc/murmur.ini")));
        assert!(is_legacy_file(Path::new("murmur.ini")));
        assert!(!is_legacy_file(Path::new("/etc/murmur.json")));
        assert!(!is_legacy_file(Path::new("/etc/server.ini")));
    }
}
