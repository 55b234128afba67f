//! Launch configuration for the compiler's LSP mode.

use std::path::PathBuf;

use crate::config::HostConfig;

/// Subcommand that puts the compiler into language-server mode.
const LSP_SUBCOMMAND: &str = "lsp";

/// Logging directive handed to the spawned compiler process.
const CHILD_LOG_ENV: (&str, &str) = ("RUST_LOG", "lsp_server=debug");

/// Communication channel between host and compiler.
///
/// Only standard-stream piping is supported; the compiler speaks the wire
/// protocol over its stdin/stdout.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum TransportKind {
    /// Piped standard input/output streams.
    #[default]
    Stdio,
}

/// Everything needed to spawn one compiler session.
///
/// Constructed once per session start and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Full path to the compiler executable.
    pub executable: PathBuf,
    /// Transport the spawned process speaks over.
    pub transport: TransportKind,
    /// Ordered argument vector, `lsp` subcommand first.
    pub args: Vec<String>,
    /// Environment variables set on the spawned process in addition to the
    /// inherited ones.
    pub env: Vec<(String, String)>,
}

impl LaunchConfig {
    /// Build the LSP launch configuration for a discovered executable.
    ///
    /// The argument vector is `["lsp"]` followed by the host configuration's
    /// tokenized `compiler_arguments`, and the child's `RUST_LOG` is pinned
    /// so the compiler's LSP server logs at debug level.
    #[must_use]
    pub fn for_lsp(executable: PathBuf, config: &HostConfig) -> Self {
        let mut args = vec![LSP_SUBCOMMAND.to_owned()];
        args.extend(config.arguments());

        Self {
            executable,
            transport: TransportKind::Stdio,
            args,
            env: vec![(CHILD_LOG_ENV.0.to_owned(), CHILD_LOG_ENV.1.to_owned())],
        }
    }
}
