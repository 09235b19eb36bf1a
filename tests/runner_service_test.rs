//! Tests for RunnerService
//!
//! The spawned child is a scripted runner; calls are inspected afterwards.

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use cypress_cli::application::probe::{FORCE_COLOR, FORCE_STDOUT_TTY};
use cypress_cli::application::services::{option_args, BinaryService, RunnerService};
use cypress_cli::application::{ApplicationError, CapabilityProbe};
use cypress_cli::config::Settings;
use cypress_cli::domain::OptionBag;
use cypress_cli::infrastructure::traits::RealFileSystem;
use cypress_cli::util::testing::{FixedTerminal, MapEnv, ScriptedRunner};

const VERSION: &str = "3.0.1";

struct Fixture {
    _temp: TempDir,
    runner: Arc<ScriptedRunner>,
    service: RunnerService,
}

fn fixture(runner: ScriptedRunner, with_binary: bool) -> Fixture {
    let temp = TempDir::new().unwrap();
    let settings = Settings {
        cache_folder: temp.path().to_path_buf(),
        run_binary: None,
        install_binary: None,
    };
    if with_binary {
        let path = settings.cached_binary_path(VERSION);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
    }

    let runner = Arc::new(runner);
    let env = Arc::new(MapEnv::new());
    let binary = Arc::new(BinaryService::new(
        Arc::new(settings),
        Arc::new(RealFileSystem),
        runner.clone(),
        env.clone(),
        temp.path().to_path_buf(),
        VERSION,
    ));
    let probe = CapabilityProbe::new(env, Arc::new(FixedTerminal::interactive()));
    let service = RunnerService::new(binary, runner.clone(), probe);

    Fixture {
        _temp: temp,
        runner,
        service,
    }
}

fn bag(pairs: &[(&str, &str)]) -> OptionBag {
    let mut bag = OptionBag::default();
    for (k, v) in pairs {
        bag.set(k, *v);
    }
    bag
}

#[test]
fn given_options_when_building_args_then_mode_first_and_kebab_flags() {
    let args = option_args("run", &bag(&[("reporterOptions", "a=b"), ("spec", "x.js")]));
    assert_eq!(args, vec!["run", "--reporter-options=a=b", "--spec=x.js"]);
}

#[test]
fn given_dev_mode_when_running_then_no_smoke_test_and_exit_code_returned() {
    let fx = fixture(ScriptedRunner::new("", Some(7)), false);
    let mut options = bag(&[("spec", "a.js")]);
    options.set("dev", true);

    let code = fx.service.run(&options).unwrap();

    assert_eq!(code, Some(7));
    let calls = fx.runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args[0], "run");
    assert!(calls[0].args.contains(&"--spec=a.js".to_string()));
    assert_eq!(calls[0].env.get(FORCE_COLOR).map(String::as_str), Some("1"));
    assert_eq!(calls[0].env.get(FORCE_STDOUT_TTY).map(String::as_str), Some("1"));
}

#[test]
fn given_verified_binary_when_running_then_smoke_test_precedes_run() {
    let reply = format!("{}\n", std::process::id());
    let fx = fixture(ScriptedRunner::new(&reply, Some(0)), true);

    fx.service.run(&OptionBag::default()).unwrap();

    let calls = fx.runner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].args[0], "--smoke-test");
    assert_eq!(calls[1].args, vec!["run"]);
}

#[test]
fn given_missing_binary_when_opening_then_not_found_and_nothing_spawned() {
    let fx = fixture(ScriptedRunner::new("", Some(0)), false);

    let result = fx.service.open(&OptionBag::default());

    assert!(matches!(result, Err(ApplicationError::BinaryNotFound(_))));
    assert!(fx.runner.calls().is_empty());
}

#[test]
fn given_detached_when_opening_then_spawned_without_waiting() {
    let fx = fixture(ScriptedRunner::new("", None), false);
    let mut options = OptionBag::default();
    options.set("dev", true);
    options.set("detached", true);

    fx.service.open(&options).unwrap();

    let calls = fx.runner.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].detached);
    assert_eq!(calls[0].args[0], "open");
}

#[test]
fn given_binary_cannot_be_executed_when_running_then_os_reason_in_message() {
    let fx = fixture(
        ScriptedRunner::unlaunchable(std::io::ErrorKind::PermissionDenied),
        false,
    );
    let mut options = OptionBag::default();
    options.set("dev", true);

    let err = fx.service.run(&options).unwrap_err();

    let message = err.to_string();
    assert!(matches!(err, ApplicationError::Io { .. }));
    assert!(message.starts_with("could not spawn "), "{}", message);
    assert!(message.ends_with("Cypress: permission denied"), "{}", message);
}
