#[cfg(test)]
pub mod test {
    use std::collections::BTreeMap;

    use crate::schema::{KeySchema, KeySpec};
    use crate::source::ConfigSource;
    use crate::types::{FileFormat, RawConfigMap, ServerId};

    pub fn map(pairs: &[(&str, &str)]) -> RawConfigMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Two offset keys, one global-only key, a few defaults.
    pub fn test_schema() -> KeySchema {
        KeySchema::new([
            KeySpec::new("Address").doc(&["Bind address."]),
            KeySpec::new("Port").offset().doc(&["Native port."]),
            KeySpec::new("WebPort").offset(),
            KeySpec::new("MaxUsers")
                .default_value("1000")
                .doc(&["Maximum number of clients."]),
            KeySpec::new("AllowHTML").default_value("true"),
            KeySpec::new("LogPath")
                .default_value("server.log")
                .global_only()
                .doc(&["Log file."]),
        ])
    }

    pub fn source(global: &[(&str, &str)], overrides: &[(ServerId, &[(&str, &str)])]) -> ConfigSource {
        let overrides: BTreeMap<ServerId, RawConfigMap> = overrides
            .iter()
            .map(|(id, pairs)| (*id, map(pairs)))
            .collect();
        ConfigSource::from_scopes(FileFormat::Ini, map(global), overrides)
    }

    #[test]
    fn fixture_source_exposes_scopes() {
        let src = source(&[("Port", "1")], &[(2, &[("Port", "")])]);
        assert_eq!(src.global_map()["Port"], "1");
        assert_eq!(src.sub_map(2).unwrap()["Port"], "");
        assert!(src.sub_map(1).is_none());
    }
}
