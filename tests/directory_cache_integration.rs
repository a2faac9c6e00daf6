use cache_cleaner::host::{ConsoleNotifier, DirectoryCache, LocalHost, StatsGateway};
use cache_cleaner::{ClearOrchestrator, ClearOutcome, ClearTrigger, Messages, PollPolicy};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const MB: usize = 1024 * 1024;

fn write_file(root: &Path, name: &str, len: usize) {
    let path = root.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, vec![7u8; len]).unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_manual_clear_on_disk_keeps_locked_entries() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "tracks/a.bin", 2 * MB);
    write_file(dir.path(), "tracks/b.bin", MB);
    write_file(dir.path(), "playing.bin", MB);
    write_file(dir.path(), "playing.bin.lock", 0);

    let host = LocalHost::new(DirectoryCache::new(dir.path()), ConsoleNotifier::new(false));
    let outcome = ClearOrchestrator::new(&host, Messages::default(), PollPolicy::default())
        .run_clear(ClearTrigger::Manual, false)
        .await;

    match outcome {
        ClearOutcome::Cleared { freed_mb, retries } => {
            assert!((freed_mb - 3.0).abs() < 1e-9);
            assert_eq!(retries, 0);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(dir.path().join("playing.bin").exists());
    assert!(!dir.path().join("tracks").exists());

    let remaining = host.cache_stats().await.unwrap().current_size_mb;
    assert!((remaining - 1.0).abs() < 1e-9);
}

#[tokio::test(start_paused = true)]
async fn test_second_manual_clear_reports_already_empty() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "x.bin", MB);

    let host = LocalHost::new(DirectoryCache::new(dir.path()), ConsoleNotifier::new(false));
    let orchestrator = ClearOrchestrator::new(&host, Messages::default(), PollPolicy::default());

    assert!(matches!(
        orchestrator.run_clear(ClearTrigger::Manual, true).await,
        ClearOutcome::Cleared { .. }
    ));
    assert_eq!(
        orchestrator.run_clear(ClearTrigger::Manual, true).await,
        ClearOutcome::AlreadyEmpty
    );
}
