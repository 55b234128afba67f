#![forbid(unsafe_code)]

//! `ironplc-host` — thin host shim around compiler discovery and the
//! session manager.
//!
//! `locate` and `diagnostics` expose the discovery result; `run` starts an
//! LSP session and pipes it to this process's own stdio so any editor that
//! can spawn a stdio language server can use it directly.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use ironplc_host::config::HostConfig;
use ironplc_host::discovery::{DiscoveryResult, Locator};
use ironplc_host::launch::LaunchConfig;
use ironplc_host::session::SessionManager;
use ironplc_host::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "ironplc-host", about = "IronPLC compiler LSP launcher", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Locate the compiler and print the winning path and strategy.
    Locate,
    /// Print the resolved compiler path, or "none configured".
    Diagnostics,
    /// Locate the compiler, start an LSP session, and pipe it to stdio.
    Run,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;

    // Single-threaded cooperative model: everything in this shim runs on
    // one control thread; suspension happens only at session boundaries.
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let config = match &args.config {
        Some(path) => HostConfig::load_from_path(path)?,
        None => HostConfig::default(),
    };

    match args.command {
        CliCommand::Locate => {
            let (path, strategy) = locate_compiler(&config)?;
            println!("{} ({strategy})", path.display());
            Ok(())
        }
        CliCommand::Diagnostics => {
            match Locator::new(&config).locate() {
                DiscoveryResult::Found { path, .. } => {
                    println!("compiler path: {}", path.display());
                }
                DiscoveryResult::NotFound { .. } => println!("compiler path: none configured"),
            }
            Ok(())
        }
        CliCommand::Run => run_session(&config).await,
    }
}

/// Run discovery, converting a total miss into the single user-facing
/// error that lists every attempted path.
fn locate_compiler(config: &HostConfig) -> Result<(PathBuf, &'static str)> {
    match Locator::new(config).locate() {
        DiscoveryResult::Found { path, strategy } => Ok((path, strategy)),
        DiscoveryResult::NotFound { attempted } => {
            let tried: Vec<String> = attempted
                .iter()
                .map(|attempt| format!("{}: {}", attempt.strategy, attempt.path.display()))
                .collect();
            Err(AppError::Discovery(format!(
                "unable to locate the IronPLC compiler after searching [{}]. \
                 IronPLC is not installed or not configured",
                tried.join(", ")
            )))
        }
    }
}

/// Start one compiler session and pump bytes between the host's stdio and
/// the child's stdio until either side reaches EOF, then stop cleanly.
async fn run_session(config: &HostConfig) -> Result<()> {
    let (path, strategy) = locate_compiler(config)?;
    info!(strategy, path = %path.display(), "starting compiler session");

    let mut manager = SessionManager::new();
    let handle = manager.start(LaunchConfig::for_lsp(path, config))?;
    info!("{}", manager.diagnostic_description());

    let mut child_stdin = handle.stdin;
    let mut child_stdout = handle.stdout;
    let mut host_stdin = tokio::io::stdin();
    let mut host_stdout = tokio::io::stdout();

    tokio::select! {
        res = tokio::io::copy(&mut host_stdin, &mut child_stdin) => {
            if let Err(err) = res {
                warn!(%err, "host-to-compiler pump ended with error");
            }
        }
        res = tokio::io::copy(&mut child_stdout, &mut host_stdout) => {
            if let Err(err) = res {
                warn!(%err, "compiler-to-host pump ended with error");
            }
        }
    }

    // Closing the child's stdin is the exit signal for the server.
    drop(child_stdin);
    drop(child_stdout);
    manager.stop().await;
    Ok(())
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter).with_writer(std::io::stderr);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
