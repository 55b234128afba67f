//! Unit tests for the discovery algorithm: positional precedence,
//! silent skipping of inapplicable strategies, and short-circuiting.

use std::env;
use std::path::{Path, PathBuf};

use ironplc_host::discovery::{
    CandidateStrategy, DiscoveryResult, Locator, EXECUTABLE_BASE_NAME,
};

/// Strategy with a fixed resolution, for driving the locator from tests.
struct FixedStrategy {
    name: &'static str,
    dir: Option<PathBuf>,
}

impl CandidateStrategy for FixedStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    fn resolve(&self) -> Option<PathBuf> {
        self.dir.clone()
    }
}

/// Strategy that must never be consulted.
struct PanicStrategy;

impl CandidateStrategy for PanicStrategy {
    fn name(&self) -> &'static str {
        "panic"
    }

    fn resolve(&self) -> Option<PathBuf> {
        panic!("strategy after the winning one must not be evaluated");
    }
}

fn executable_file_name() -> String {
    format!("{EXECUTABLE_BASE_NAME}{}", env::consts::EXE_SUFFIX)
}

/// Create the compiler executable file inside `dir`.
fn place_executable(dir: &Path) -> PathBuf {
    let path = dir.join(executable_file_name());
    std::fs::write(&path, b"").expect("write placeholder executable");
    path
}

#[test]
fn first_strategy_with_executable_wins() {
    let empty = tempfile::tempdir().expect("tempdir");
    let stocked = tempfile::tempdir().expect("tempdir");
    let expected = place_executable(stocked.path());

    let locator = Locator::with_strategies(vec![
        Box::new(FixedStrategy {
            name: "first",
            dir: Some(empty.path().to_path_buf()),
        }),
        Box::new(FixedStrategy {
            name: "second",
            dir: Some(stocked.path().to_path_buf()),
        }),
    ]);

    let DiscoveryResult::Found { path, strategy } = locator.locate() else {
        panic!("expected Found");
    };
    assert_eq!(strategy, "second");
    assert_eq!(path, expected);
}

#[test]
fn earlier_hit_shadows_later_hit() {
    let early = tempfile::tempdir().expect("tempdir");
    let late = tempfile::tempdir().expect("tempdir");
    let expected = place_executable(early.path());
    place_executable(late.path());

    let locator = Locator::with_strategies(vec![
        Box::new(FixedStrategy {
            name: "early",
            dir: Some(early.path().to_path_buf()),
        }),
        Box::new(FixedStrategy {
            name: "late",
            dir: Some(late.path().to_path_buf()),
        }),
    ]);

    let DiscoveryResult::Found { path, strategy } = locator.locate() else {
        panic!("expected Found");
    };
    assert_eq!(strategy, "early");
    assert_eq!(path, expected);
}

#[test]
fn strategies_after_a_hit_are_not_evaluated() {
    let stocked = tempfile::tempdir().expect("tempdir");
    place_executable(stocked.path());

    let locator = Locator::with_strategies(vec![
        Box::new(FixedStrategy {
            name: "winner",
            dir: Some(stocked.path().to_path_buf()),
        }),
        Box::new(PanicStrategy),
    ]);

    assert!(matches!(locator.locate(), DiscoveryResult::Found { .. }));
}

#[test]
fn inapplicable_strategies_are_skipped_silently() {
    let stocked = tempfile::tempdir().expect("tempdir");
    place_executable(stocked.path());

    let locator = Locator::with_strategies(vec![
        Box::new(FixedStrategy {
            name: "inapplicable",
            dir: None,
        }),
        Box::new(FixedStrategy {
            name: "applicable",
            dir: Some(stocked.path().to_path_buf()),
        }),
    ]);

    let DiscoveryResult::Found { strategy, .. } = locator.locate() else {
        panic!("expected Found");
    };
    assert_eq!(strategy, "applicable");
}

#[test]
fn all_misses_report_attempts_in_evaluation_order() {
    let first = tempfile::tempdir().expect("tempdir");
    let second = tempfile::tempdir().expect("tempdir");

    let locator = Locator::with_strategies(vec![
        Box::new(FixedStrategy {
            name: "skipped",
            dir: None,
        }),
        Box::new(FixedStrategy {
            name: "first",
            dir: Some(first.path().to_path_buf()),
        }),
        Box::new(FixedStrategy {
            name: "second",
            dir: Some(second.path().to_path_buf()),
        }),
    ]);

    let DiscoveryResult::NotFound { attempted } = locator.locate() else {
        panic!("expected NotFound");
    };
    assert_eq!(attempted.len(), 2, "inapplicable strategies are omitted");
    assert_eq!(attempted[0].strategy, "first");
    assert_eq!(attempted[0].path, first.path().join(executable_file_name()));
    assert_eq!(attempted[1].strategy, "second");
    assert_eq!(
        attempted[1].path,
        second.path().join(executable_file_name())
    );
}

#[test]
fn missing_directory_is_recorded_like_missing_executable() {
    let temp = tempfile::tempdir().expect("tempdir");
    let gone = temp.path().join("does-not-exist");

    let locator = Locator::with_strategies(vec![Box::new(FixedStrategy {
        name: "gone",
        dir: Some(gone.clone()),
    })]);

    let DiscoveryResult::NotFound { attempted } = locator.locate() else {
        panic!("expected NotFound");
    };
    assert_eq!(attempted.len(), 1);
    assert_eq!(attempted[0].path, gone.join(executable_file_name()));
}

#[test]
fn no_strategies_yield_an_empty_attempt_list() {
    let locator = Locator::with_strategies(Vec::new());

    let DiscoveryResult::NotFound { attempted } = locator.locate() else {
        panic!("expected NotFound");
    };
    assert!(attempted.is_empty());
}

/// Simulates the platform well-known directory scenario: configuration and
/// environment are inapplicable, the platform strategy has the executable.
#[test]
fn platform_default_wins_when_overrides_are_absent() {
    let well_known = tempfile::tempdir().expect("tempdir");
    let expected = place_executable(well_known.path());

    let locator = Locator::with_strategies(vec![
        Box::new(FixedStrategy {
            name: "configuration",
            dir: None,
        }),
        Box::new(FixedStrategy {
            name: "environment",
            dir: None,
        }),
        Box::new(FixedStrategy {
            name: "homebrew",
            dir: Some(well_known.path().to_path_buf()),
        }),
    ]);

    let DiscoveryResult::Found { path, strategy } = locator.locate() else {
        panic!("expected Found");
    };
    assert_eq!(strategy, "homebrew");
    assert_eq!(path, expected);
}
