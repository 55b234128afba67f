#![forbid(unsafe_code)]

//! Host-side launcher for the `IronPLC` compiler's LSP mode.
//!
//! Finds an installed `ironplcc` executable, spawns it with the `lsp`
//! subcommand, and manages the lifetime of the resulting stdio session.

pub mod config;
pub mod discovery;
pub mod errors;
pub mod launch;
pub mod session;

pub use config::HostConfig;
pub use errors::{AppError, Result};
