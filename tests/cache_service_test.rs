//! Tests for CacheService

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use cypress_cli::application::services::CacheService;
use cypress_cli::config::Settings;
use cypress_cli::infrastructure::traits::RealFileSystem;

fn cache_service(cache_folder: PathBuf) -> CacheService {
    let settings = Settings {
        cache_folder,
        run_binary: None,
        install_binary: None,
    };
    CacheService::new(Arc::new(settings), Arc::new(RealFileSystem))
}

#[test]
fn given_versions_in_cache_when_listing_then_sorted_names() {
    let temp = TempDir::new().unwrap();
    for v in ["3.0.1", "2.1.0", "3.0.0"] {
        fs::create_dir_all(temp.path().join(v).join("Cypress")).unwrap();
    }
    fs::write(temp.path().join("stray.txt"), "").unwrap();

    let versions = cache_service(temp.path().to_path_buf()).list().unwrap();
    assert_eq!(versions, vec!["2.1.0", "3.0.0", "3.0.1"]);
}

#[test]
fn given_missing_cache_folder_when_listing_then_empty() {
    let temp = TempDir::new().unwrap();
    let versions = cache_service(temp.path().join("absent")).list().unwrap();
    assert!(versions.is_empty());
}

#[test]
fn given_cache_when_clearing_then_folder_removed() {
    let temp = TempDir::new().unwrap();
    let cache = temp.path().join("Cypress");
    fs::create_dir_all(cache.join("3.0.1")).unwrap();

    let svc = cache_service(cache.clone());
    svc.clear().unwrap();
    assert!(!cache.exists());

    // clearing twice is fine
    svc.clear().unwrap();
}

#[test]
fn given_settings_when_asking_path_then_cache_folder() {
    let svc = cache_service(PathBuf::from("/tmp/cy"));
    assert_eq!(svc.path(), PathBuf::from("/tmp/cy"));
}
