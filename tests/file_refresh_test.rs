//! End-to-end refresh from a YAML document on disk with the jobs running.

mod common;

use std::path::Path;
use std::time::Duration;

use appconfig_demo::domain::models::ProviderKind;
use appconfig_demo::{Application, Config};

/// Replace the document in one rename so the poller never reads a partial file
fn write_document(path: &Path, body: &str) {
    let staging = path.with_extension("staging");
    std::fs::write(&staging, body).unwrap();
    std::fs::rename(&staging, path).unwrap();
}

fn config_for(path: &Path) -> Config {
    let mut config = Config::default();
    config.provider.kind = ProviderKind::File;
    config.provider.path = path.to_path_buf();
    config.schedule.refresh_interval_ms = 20;
    config.schedule.log_interval_ms = 20;
    config.server.port = 0;
    config
}

#[tokio::test]
async fn test_scheduled_refresh_picks_up_file_changes() {
    common::setup_test_logging();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("remote.yaml");
    write_document(
        &path,
        "app:\n  message: Hello\n  version: 1.1.0\nfeature-management:\n  test-feature: false\n",
    );

    let config = config_for(&path);
    let app = Application::build(&config).await.unwrap();
    let state = app.state();
    assert_eq!(state.store.current().message, "Hello");
    assert_eq!(state.store.current().version, "1.1.0");

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let running = tokio::spawn(app.run(async move {
        let _ = rx.await;
    }));

    write_document(
        &path,
        "app:\n  message: Hello\n  message.feature-enabled: Hello (flag on)\n  version: 1.2.0\nfeature-management:\n  test-feature: true\n",
    );

    let mut refreshed = false;
    for _ in 0..200 {
        let snapshot = state.store.current();
        if snapshot.version == "1.2.0" {
            assert_eq!(snapshot.message, "Hello (flag on)");
            assert!(snapshot.feature_enabled);
            refreshed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(refreshed, "scheduled refresh should pick up the new document");
    assert!(state.poller.stats().total >= 2);

    tx.send(()).unwrap();
    running.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_missing_file_starts_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.provider.path = dir.path().join("remote.yaml");
    config.schedule.enabled = false;

    let app = Application::build(&config).await.unwrap();
    let snapshot = app.state().store.current();

    assert_eq!(snapshot.message, "Default message");
    assert_eq!(app.state().poller.stats().failed, 1);
}
