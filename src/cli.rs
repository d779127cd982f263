//! Clap adapter.
//!
//! Compiled only with the `clap` Cargo feature (on by default). Embed
//! [`ConfigArgs`] in a host's clap derive to get `gen|list|get` subcommands
//! for inspecting a config file. The only bridge to the core is
//! [`ConfigArgs::into_action()`], which produces a framework-agnostic
//! [`ConfigAction`](crate::ConfigAction) for [`ops::handle`](crate::ops::handle).

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::types::{ConfigAction, FileFormat, ServerId};

/// Clap-derived args for the config inspection subcommand group.
///
/// ```ignore
/// #[derive(Subcommand)]
/// enum Commands {
///     Config(ConfigArgs),
/// }
/// ```
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Resolve for this virtual server instead of showing the global scope.
    #[arg(long, short = 's', global = true)]
    pub server: Option<ServerId>,

    #[command(subcommand)]
    pub action: Option<ConfigSubcommand>,
}

/// Available config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show every effective key-value pair.
    List,
    /// Generate a commented sample configuration file.
    Gen {
        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// File format of the sample.
        #[arg(short, long, value_enum, default_value_t = FileFormat::Ini)]
        format: FileFormat,
    },
    /// Show the effective value and documentation for a key.
    Get {
        /// Canonical key name (e.g. "MaxUsers").
        key: String,
    },
}

impl ConfigArgs {
    /// Convert clap-parsed args into a `ConfigAction`.
    ///
    /// Bare invocation and explicit `list` both map to `ConfigAction::List`.
    /// `--server` is ignored by `gen`.
    pub fn into_action(self) -> ConfigAction {
        let server = self.server;
        match self.action {
            None | Some(ConfigSubcommand::List) => ConfigAction::List { server },
            Some(ConfigSubcommand::Gen { output, format }) => ConfigAction::Gen { output, format },
            Some(ConfigSubcommand::Get { key }) => ConfigAction::Get { key, server },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    /// Wrapper so we can use `try_parse_from` on the subcommand.
    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ConfigArgs,
    }

    fn parse(args: &[&str]) -> ConfigAction {
        TestCli::try_parse_from(args).unwrap().config.into_action()
    }

    #[test]
    fn parse_bare_is_global_list() {
        assert_eq!(parse(&["test"]), ConfigAction::List { server: None });
    }

    #[test]
    fn parse_explicit_list() {
        assert_eq!(parse(&["test", "list"]), ConfigAction::List { server: None });
    }

    #[test]
    fn parse_list_for_server() {
        assert_eq!(
            parse(&["test", "list", "--server", "3"]),
            ConfigAction::List { server: Some(3) }
        );
    }

    #[test]
    fn parse_server_before_subcommand() {
        assert_eq!(
            parse(&["test", "-s", "2", "get", "Port"]),
            ConfigAction::Get {
                key: "Port".into(),
                server: Some(2),
            }
        );
    }

    #[test]
    fn parse_get_global() {
        assert_eq!(
            parse(&["test", "get", "LogPath"]),
            ConfigAction::Get {
                key: "LogPath".into(),
                server: None,
            }
        );
    }

    #[test]
    fn parse_gen_defaults_to_ini() {
        assert_eq!(
            parse(&["test", "gen"]),
            ConfigAction::Gen {
                output: None,
                format: FileFormat::Ini,
            }
        );
    }

    #[test]
    fn parse_gen_json_with_output() {
        assert_eq!(
            parse(&["test", "gen", "--format", "json", "-o", "server.json"]),
            ConfigAction::Gen {
                output: Some(PathBuf::from("server.json")),
                format: FileFormat::Json,
            }
        );
    }

    #[test]
    fn non_numeric_server_rejected() {
        assert!(TestCli::try_parse_from(["test", "list", "--server", "two"]).is_err());
    }

    #[test]
    fn invalid_subcommand_errors() {
        assert!(TestCli::try_parse_from(["test", "nope"]).is_err());
    }
}
