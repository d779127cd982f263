//! Layered configuration for processes that host several virtual servers.
//!
//! One configuration file describes every server a process runs. Top-level
//! settings apply to all of them; numbered sections override individual
//! servers. Resolving the configuration of server `id` is a pure merge over
//! an already-loaded [`ConfigSource`]:
//!
//! ```ignore
//! let schema = KeySchema::builtin();
//! let source = ConfigSource::load("server.ini")?;
//!
//! let server = source.server_config(Arc::clone(&schema), 3, None);
//! let port = server.unsigned_value("Port");
//! let log = source.global_config(schema).path_value("LogPath", base_dir);
//! ```
//!
//! # Layer precedence
//!
//! ```text
//! Defaults           KeySchema, consulted at read time
//!        ↑ overridden by
//! Global-only keys   global value, inherited at read time
//!        ↑ overridden by
//! Base map           optional caller-supplied lower layer
//!        ↑ overridden by
//! Global scope       top-level keys, offset keys shifted by id - 1
//!        ↑ overridden by
//! Server scope       [id] section / "id" object
//! ```
//!
//! Every layer is sparse. An **empty value means "unset"**: it removes the key
//! from the layers below, so reads fall back to the default rather than
//! seeing an empty string. There is no way to configure a key to literally
//! `""`.
//!
//! # Offset keys
//!
//! Keys marked with [`KeySpec::offset`] (`Port` and `WebPort` in the built-in
//! schema) are shifted by `id - 1` after the global merge, so a single global
//! `Port = 64738` gives server 3 port `64740`. Server sections are applied
//! after the shift and can replace or unset the shifted value. Values that do
//! not parse as integers are left as they are.
//!
//! # Global-only keys
//!
//! Keys marked with [`KeySpec::global_only`] (`LogPath`) describe the process
//! rather than a server. They never appear in a resolved server map, even if a
//! server section sets them, but every server's [`ServerConfig`] still reads
//! them as the global value.
//!
//! # File formats
//!
//! The format follows the file extension:
//!
//! - **`.ini`**: top-level `Key=Value` lines form the global scope,
//!   `[N]` sections the overrides. Values may be quoted; `#` and `;` start
//!   comments. Sections whose name is not a server id are ignored.
//! - **`.json`**: a single object. Scalar members form the global scope,
//!   object members keyed by server id the overrides. `//` line comments are
//!   stripped before parsing by [`CommentStripper`].
//!
//! # Legacy files
//!
//! An INI file named like the previous generation's config file
//! (`murmur.ini`) is loaded in legacy mode: its global keys are renamed to
//! their canonical names and settings without an equivalent are reported as
//! [`LegacyNotice`]s through `tracing`.
//!
//! # Concurrency
//!
//! [`ServerConfig`] keeps its values behind a reader/writer lock and is
//! `Send + Sync`. Share it through an `Arc`; runtime changes made with
//! [`ServerConfig::set_value`] are seen by every reader.
//!
//! # Clap adapter
//!
//! With the `clap` Cargo feature (on by default) [`ConfigArgs`] gives a host
//! binary `gen|list|get` subcommands. The adapter only produces a
//! [`ConfigAction`]; [`ops::handle`] does the work, so the core has no
//! dependency on any CLI framework.
//!
//! # Error handling
//!
//! Loading returns [`LoadError`], which always carries the offending path.
//! Operations return [`ConfigError`]. Enable the `rich-errors` feature for
//! [`miette::Diagnostic`](https://docs.rs/miette) implementations.

pub mod error;
pub mod legacy;
pub mod ops;
pub mod schema;
pub mod types;

mod accessor;
#[cfg(feature = "clap")]
mod cli;
mod comments;
pub mod ini;
pub mod json;
pub(crate) mod merge;
mod resolve;
mod source;

#[cfg(test)]
mod fixtures;

pub use accessor::{ServerConfig, clean_path, parse_bool};
#[cfg(feature = "clap")]
pub use cli::{ConfigArgs, ConfigSubcommand};
pub use comments::CommentStripper;
pub use error::{ConfigError, LoadError};
pub use legacy::LegacyNotice;
pub use ops::ConfigResult;
pub use resolve::{resolve, resolve_all};
pub use schema::{KeySchema, KeyScope, KeySpec};
pub use source::ConfigSource;
pub use types::{ConfigAction, FileFormat, RawConfigMap, ServerId};
