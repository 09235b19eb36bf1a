//! Tests for BinaryService
//!
//! Real filesystem under a TempDir; the binary itself is a scripted runner.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use cypress_cli::application::services::{BinaryService, InstallOutcome, VerifyOutcome};
use cypress_cli::application::ApplicationError;
use cypress_cli::config::Settings;
use cypress_cli::infrastructure::traits::RealFileSystem;
use cypress_cli::util::testing::{MapEnv, ScriptedRunner};

const VERSION: &str = "3.0.1";

fn test_settings(cache_folder: PathBuf) -> Settings {
    Settings {
        cache_folder,
        run_binary: None,
        install_binary: None,
    }
}

fn service(settings: Settings, runner: Arc<ScriptedRunner>, env: MapEnv, cwd: &Path) -> BinaryService {
    BinaryService::new(
        Arc::new(settings),
        Arc::new(RealFileSystem),
        runner,
        Arc::new(env),
        cwd.to_path_buf(),
        VERSION,
    )
}

/// Put an executable stand-in where `install` would have put it.
fn install_fake_binary(settings: &Settings) -> PathBuf {
    let path = settings.cached_binary_path(VERSION);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "#!/bin/sh\n").unwrap();
    path
}

fn ping_reply() -> String {
    format!("starting\n{}\n", std::process::id())
}

// ============================================================
// versions
// ============================================================

#[test]
fn given_binary_reports_semver_when_resolving_versions_then_both_returned() {
    let temp = TempDir::new().unwrap();
    let settings = test_settings(temp.path().to_path_buf());
    let binary = install_fake_binary(&settings);
    let runner = Arc::new(ScriptedRunner::new("Cypress 3.0.2\n", Some(0)));

    let versions = service(settings, runner.clone(), MapEnv::new(), temp.path())
        .versions()
        .unwrap();

    assert_eq!(versions.package, VERSION);
    assert_eq!(versions.binary, "3.0.2");
    assert_eq!(runner.calls()[0].cmd, binary);
    assert_eq!(runner.calls()[0].args, vec!["--version"]);
}

#[test]
fn given_garbage_version_output_when_resolving_then_resolution_error() {
    let temp = TempDir::new().unwrap();
    let settings = test_settings(temp.path().to_path_buf());
    install_fake_binary(&settings);
    let runner = Arc::new(ScriptedRunner::new("segmentation fault", Some(0)));

    let result = service(settings, runner, MapEnv::new(), temp.path()).versions();
    assert!(matches!(result, Err(ApplicationError::Resolution { .. })));
}

#[test]
fn given_no_binary_when_resolving_versions_then_not_found() {
    let temp = TempDir::new().unwrap();
    let settings = test_settings(temp.path().to_path_buf());
    let runner = Arc::new(ScriptedRunner::new("", Some(0)));

    let result = service(settings, runner.clone(), MapEnv::new(), temp.path()).versions();
    assert!(matches!(result, Err(ApplicationError::BinaryNotFound(_))));
    assert!(runner.calls().is_empty());
}

// ============================================================
// verify
// ============================================================

#[test]
fn given_binary_echoes_ping_when_verifying_then_verified_and_marker_written() {
    let temp = TempDir::new().unwrap();
    let settings = test_settings(temp.path().to_path_buf());
    let binary = install_fake_binary(&settings);
    let marker = settings.version_dir(VERSION).join("verified");
    let runner = Arc::new(ScriptedRunner::new(&ping_reply(), Some(0)));
    let svc = service(settings, runner.clone(), MapEnv::new(), temp.path());

    assert_eq!(
        svc.verify(false).unwrap(),
        VerifyOutcome::Verified {
            binary: binary.clone()
        }
    );
    assert!(marker.exists());
    assert_eq!(runner.calls()[0].args[0], "--smoke-test");
    assert!(runner.calls()[0].args[1].starts_with("--ping="));

    // second call short-circuits on the marker
    assert_eq!(
        svc.verify(false).unwrap(),
        VerifyOutcome::AlreadyVerified { binary }
    );
    assert_eq!(runner.calls().len(), 1);

    svc.verify(true).unwrap();
    assert_eq!(runner.calls().len(), 2);
}

#[test]
fn given_wrong_ping_reply_when_verifying_then_verification_error() {
    let temp = TempDir::new().unwrap();
    let settings = test_settings(temp.path().to_path_buf());
    install_fake_binary(&settings);
    let marker = settings.version_dir(VERSION).join("verified");
    let runner = Arc::new(ScriptedRunner::new("pong\n", Some(0)));

    let result = service(settings, runner, MapEnv::new(), temp.path()).verify(true);
    assert!(matches!(result, Err(ApplicationError::Verification { .. })));
    assert!(!marker.exists());
}

#[test]
fn given_run_binary_override_when_verifying_then_no_marker_written() {
    let temp = TempDir::new().unwrap();
    let custom = temp.path().join("custom").join("Cypress");
    fs::create_dir_all(custom.parent().unwrap()).unwrap();
    fs::write(&custom, "").unwrap();
    let settings = Settings {
        run_binary: Some(custom.clone()),
        ..test_settings(temp.path().join("cache"))
    };
    let runner = Arc::new(ScriptedRunner::new(&ping_reply(), Some(0)));
    let svc = service(settings, runner.clone(), MapEnv::new(), temp.path());

    svc.verify(false).unwrap();
    svc.verify(false).unwrap();

    assert_eq!(runner.calls().len(), 2);
    assert_eq!(runner.calls()[0].cmd, custom);
    assert!(!temp.path().join("cache").exists());
}

// ============================================================
// install
// ============================================================

#[test]
fn given_install_binary_zero_when_installing_then_skipped() {
    let temp = TempDir::new().unwrap();
    let settings = Settings {
        install_binary: Some("0".to_string()),
        ..test_settings(temp.path().to_path_buf())
    };
    let runner = Arc::new(ScriptedRunner::new("", Some(0)));

    let outcome = service(settings, runner, MapEnv::new(), temp.path())
        .install(true)
        .unwrap();
    assert_eq!(outcome, InstallOutcome::Skipped);
}

#[test]
fn given_local_source_when_installing_then_copied_into_cache() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("download").join("Cypress");
    fs::create_dir_all(source.parent().unwrap()).unwrap();
    fs::write(&source, "binary").unwrap();
    let cache = temp.path().join("cache");
    let settings = Settings {
        install_binary: Some(source.to_string_lossy().into_owned()),
        ..test_settings(cache.clone())
    };
    let target = settings.cached_binary_path(VERSION);
    let runner = Arc::new(ScriptedRunner::new("", Some(0)));
    let svc = service(settings, runner, MapEnv::new(), temp.path());

    assert_eq!(
        svc.install(false).unwrap(),
        InstallOutcome::Installed {
            version: VERSION.to_string(),
            dir: cache.join(VERSION),
        }
    );
    assert_eq!(fs::read_to_string(&target).unwrap(), "binary");

    assert!(matches!(
        svc.install(false).unwrap(),
        InstallOutcome::AlreadyInstalled { .. }
    ));
    assert!(matches!(
        svc.install(true).unwrap(),
        InstallOutcome::Installed { .. }
    ));
}

#[test]
fn given_relative_source_during_postinstall_when_installing_then_resolved_from_project_root() {
    let temp = TempDir::new().unwrap();
    // postinstall runs inside node_modules/cypress
    let cwd = temp.path().join("node_modules").join("cypress");
    fs::create_dir_all(&cwd).unwrap();
    fs::write(temp.path().join("Cypress.bin"), "binary").unwrap();
    let settings = Settings {
        install_binary: Some("Cypress.bin".to_string()),
        ..test_settings(temp.path().join("cache"))
    };
    let target = settings.cached_binary_path(VERSION);
    let env = MapEnv::new().with("npm_lifecycle_event", "postinstall");
    let runner = Arc::new(ScriptedRunner::new("", Some(0)));

    service(settings, runner, env, &cwd).install(false).unwrap();
    assert!(target.is_file());
}

#[test]
fn given_version_as_install_source_when_installing_then_error() {
    let temp = TempDir::new().unwrap();
    let settings = Settings {
        install_binary: Some("3.0.2".to_string()),
        ..test_settings(temp.path().to_path_buf())
    };
    let runner = Arc::new(ScriptedRunner::new("", Some(0)));

    let result = service(settings, runner, MapEnv::new(), temp.path()).install(false);
    assert!(matches!(result, Err(ApplicationError::Install { .. })));
}

#[test]
fn given_no_source_when_installing_then_error() {
    let temp = TempDir::new().unwrap();
    let settings = test_settings(temp.path().to_path_buf());
    let runner = Arc::new(ScriptedRunner::new("", Some(0)));

    let result = service(settings, runner, MapEnv::new(), temp.path()).install(false);
    assert!(matches!(result, Err(ApplicationError::Install { .. })));
}
