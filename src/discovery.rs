//! Compiler executable discovery.
//!
//! Evaluates an ordered list of candidate strategies and returns the first
//! directory that actually contains the compiler executable. The order is a
//! hard contract: explicit configuration beats the environment variable,
//! which beats the platform well-known install directories. Only the first
//! hit is used, so the list must never be reordered or evaluated in
//! parallel.

use std::env;
use std::path::PathBuf;

use tracing::info;

use crate::config::HostConfig;

/// Base name of the compiler executable, without platform extension.
pub const EXECUTABLE_BASE_NAME: &str = "ironplcc";

/// Environment variable naming a directory to search for the compiler.
pub const INSTALL_DIR_ENV_VAR: &str = "IRONPLC";

/// A named rule producing zero or one directory to check for the compiler.
///
/// Returning `None` from [`resolve`](CandidateStrategy::resolve) means the
/// strategy is inapplicable on this host (wrong platform, unset variable)
/// and is skipped silently — it never appears in diagnostics.
pub trait CandidateStrategy {
    /// Identifier used in logs and in the attempted-paths diagnostic.
    fn name(&self) -> &'static str;

    /// Candidate directory, or `None` when the strategy does not apply.
    fn resolve(&self) -> Option<PathBuf>;
}

/// One applicable-but-missed candidate recorded during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    /// Name of the strategy that produced the candidate directory.
    pub strategy: &'static str,
    /// Full executable path that was checked and found absent.
    pub path: PathBuf,
}

/// Outcome of a discovery run. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryResult {
    /// The executable exists at `path`; `strategy` is the rule that won.
    Found {
        /// Full path to the discovered executable.
        path: PathBuf,
        /// Name of the winning strategy.
        strategy: &'static str,
    },
    /// Every applicable strategy was tried and missed.
    NotFound {
        /// Each applicable strategy's checked path, in evaluation order.
        attempted: Vec<Attempt>,
    },
}

/// Configured override directory from `config.toml`.
struct ConfigurationStrategy {
    dir: Option<PathBuf>,
}

impl CandidateStrategy for ConfigurationStrategy {
    fn name(&self) -> &'static str {
        "configuration"
    }

    fn resolve(&self) -> Option<PathBuf> {
        self.dir.clone()
    }
}

/// Install directory taken from the `IRONPLC` environment variable.
/// Not generally set.
struct EnvironmentStrategy;

impl CandidateStrategy for EnvironmentStrategy {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn resolve(&self) -> Option<PathBuf> {
        env::var_os(INSTALL_DIR_ENV_VAR).map(PathBuf::from)
    }
}

/// Homebrew's binary directory. macOS only.
struct HomebrewStrategy;

impl CandidateStrategy for HomebrewStrategy {
    fn name(&self) -> &'static str {
        "homebrew"
    }

    fn resolve(&self) -> Option<PathBuf> {
        cfg!(target_os = "macos").then(|| PathBuf::from("/opt/homebrew/bin"))
    }
}

/// Per-user install directory under `%LOCALAPPDATA%`. Windows only.
struct LocalAppDataStrategy;

impl CandidateStrategy for LocalAppDataStrategy {
    fn name(&self) -> &'static str {
        "localappdata"
    }

    fn resolve(&self) -> Option<PathBuf> {
        if !cfg!(windows) {
            return None;
        }
        let local_app_data = env::var_os("LOCALAPPDATA")?;
        Some(
            PathBuf::from(local_app_data)
                .join("Programs")
                .join("IronPLC Compiler")
                .join("bin"),
        )
    }
}

/// Ordered compiler search over a fixed list of candidate strategies.
pub struct Locator {
    strategies: Vec<Box<dyn CandidateStrategy>>,
}

impl Locator {
    /// Production strategy list in precedence order: configuration
    /// override, `IRONPLC` environment variable, then the platform
    /// well-known install directories.
    #[must_use]
    pub fn new(config: &HostConfig) -> Self {
        Self::with_strategies(vec![
            Box::new(ConfigurationStrategy {
                dir: config.compiler_dir.clone(),
            }),
            Box::new(EnvironmentStrategy),
            Box::new(HomebrewStrategy),
            Box::new(LocalAppDataStrategy),
        ])
    }

    /// Build a locator over a caller-supplied strategy list. The list is
    /// evaluated in the given order, first hit wins.
    #[must_use]
    pub fn with_strategies(strategies: Vec<Box<dyn CandidateStrategy>>) -> Self {
        Self { strategies }
    }

    /// Search the strategies in order for an existing executable.
    ///
    /// A strategy that resolves no directory is skipped and not recorded.
    /// A resolved directory whose executable is absent — whether the
    /// directory itself exists or not — is recorded as an attempt. The
    /// first existing executable short-circuits the search.
    #[must_use]
    pub fn locate(&self) -> DiscoveryResult {
        let file_name = format!("{EXECUTABLE_BASE_NAME}{}", env::consts::EXE_SUFFIX);
        let mut attempted = Vec::new();

        for strategy in &self.strategies {
            let Some(dir) = strategy.resolve() else {
                continue;
            };

            let candidate = dir.join(&file_name);
            if candidate.exists() {
                info!(
                    strategy = strategy.name(),
                    path = %candidate.display(),
                    "found compiler"
                );
                return DiscoveryResult::Found {
                    path: candidate,
                    strategy: strategy.name(),
                };
            }

            attempted.push(Attempt {
                strategy: strategy.name(),
                path: candidate,
            });
        }

        DiscoveryResult::NotFound { attempted }
    }
}

impl std::fmt::Debug for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("Locator").field("strategies", &names).finish()
    }
}
