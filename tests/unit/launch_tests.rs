//! Unit tests for LSP launch configuration assembly.

use std::path::PathBuf;

use ironplc_host::config::HostConfig;
use ironplc_host::launch::{LaunchConfig, TransportKind};

#[test]
fn lsp_subcommand_comes_first() {
    let config = HostConfig::default();
    let launch = LaunchConfig::for_lsp(PathBuf::from("/opt/homebrew/bin/ironplcc"), &config);

    assert_eq!(launch.args, vec!["lsp"]);
}

#[test]
fn configured_arguments_follow_the_subcommand() {
    let config = HostConfig {
        compiler_dir: None,
        compiler_arguments: Some("--verbose 'log file.txt'".into()),
    };
    let launch = LaunchConfig::for_lsp(PathBuf::from("/custom/bin/ironplcc"), &config);

    assert_eq!(launch.args, vec!["lsp", "--verbose", "log file.txt"]);
}

#[test]
fn transport_is_stdio() {
    let launch = LaunchConfig::for_lsp(PathBuf::from("ironplcc"), &HostConfig::default());
    assert_eq!(launch.transport, TransportKind::Stdio);
    assert_eq!(launch.transport, TransportKind::default());
}

#[test]
fn child_environment_pins_lsp_server_logging() {
    let launch = LaunchConfig::for_lsp(PathBuf::from("ironplcc"), &HostConfig::default());
    assert!(launch
        .env
        .iter()
        .any(|(key, value)| key == "RUST_LOG" && value == "lsp_server=debug"));
}

#[test]
fn executable_path_is_carried_unchanged() {
    let path = PathBuf::from("/env/bin/ironplcc");
    let launch = LaunchConfig::for_lsp(path.clone(), &HostConfig::default());
    assert_eq!(launch.executable, path);
}
