#![cfg(unix)]

use dedsrv_manager::error::Error;
use dedsrv_manager::instance::{InstanceId, InstanceProcess, ProcessSupervisor};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_graceful_stop_terminates_child() {
    let id = InstanceId::from_name("abcd1234");
    let mut process = InstanceProcess::new(id, PathBuf::from("sleep"), vec!["30".to_string()]);
    process.spawn().unwrap();

    let started = Instant::now();
    process.stop(Duration::from_secs(5)).await.unwrap();

    // SIGTERM must end the child well before the grace period elapses.
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_forced_kill_after_grace_period() {
    let id = InstanceId::from_name("abcd1234");
    let mut process = InstanceProcess::new(
        id,
        PathBuf::from("sh"),
        vec!["-c".to_string(), "trap '' TERM; sleep 30".to_string()],
    );
    process.spawn().unwrap();
    // Give the shell a moment to install the trap.
    tokio::time::sleep(Duration::from_millis(200)).await;

    let started = Instant::now();
    process.stop(Duration::from_millis(300)).await.unwrap();

    // The child ignored SIGTERM, so stop had to wait out the grace period
    // and kill it, but it must not wait anywhere near the full sleep.
    assert!(started.elapsed() >= Duration::from_millis(300));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_spawn_failure_reports_error() {
    let id = InstanceId::from_name("abcd1234");
    let mut process = InstanceProcess::new(
        id,
        PathBuf::from("/nonexistent/amtrucks_server"),
        vec![],
    );

    assert!(matches!(process.spawn(), Err(Error::Spawn(_))));
}

#[tokio::test]
async fn test_supervisor_start_is_idempotent() {
    let mut supervisor = ProcessSupervisor::new(Duration::from_millis(500));
    let id = InstanceId::from_name("abcd1234");

    supervisor
        .start(&id, Path::new("sleep"), vec!["30".to_string()])
        .unwrap();
    supervisor
        .start(&id, Path::new("sleep"), vec!["30".to_string()])
        .unwrap();

    assert_eq!(supervisor.running_ids().len(), 1);
    assert!(supervisor.is_tracked(&id));

    supervisor.stop(&id).await.unwrap();
    assert!(supervisor.running_ids().is_empty());
}

#[tokio::test]
async fn test_stop_untracked_id_is_not_found() {
    let mut supervisor = ProcessSupervisor::new(Duration::from_millis(500));
    let id = InstanceId::from_name("abcd1234");

    assert!(matches!(
        supervisor.stop(&id).await,
        Err(Error::InstanceNotFound(_))
    ));
}

#[tokio::test]
async fn test_forget_drops_entry_without_stopping() {
    let mut supervisor = ProcessSupervisor::new(Duration::from_millis(500));
    let id = InstanceId::from_name("abcd1234");

    supervisor
        .start(&id, Path::new("sleep"), vec!["30".to_string()])
        .unwrap();

    assert!(supervisor.forget(&id));
    assert!(!supervisor.is_tracked(&id));
    assert!(!supervisor.forget(&id));
}

#[tokio::test]
async fn test_shutdown_all_stops_everything() {
    let mut supervisor = ProcessSupervisor::new(Duration::from_millis(500));

    for name in ["aaaa1111", "bbbb2222", "cccc3333"] {
        supervisor
            .start(
                &InstanceId::from_name(name),
                Path::new("sleep"),
                vec!["30".to_string()],
            )
            .unwrap();
    }
    assert_eq!(supervisor.running_ids().len(), 3);

    supervisor.shutdown_all().await.unwrap();
    assert!(supervisor.running_ids().is_empty());

    // Idempotent on an empty table.
    supervisor.shutdown_all().await.unwrap();
}

#[tokio::test]
async fn test_running_ids_sorted() {
    let mut supervisor = ProcessSupervisor::new(Duration::from_millis(500));

    for name in ["zz999999", "aa000000", "mm555555"] {
        supervisor
            .start(
                &InstanceId::from_name(name),
                Path::new("sleep"),
                vec!["30".to_string()],
            )
            .unwrap();
    }

    let ids: Vec<String> = supervisor
        .running_ids()
        .iter()
        .map(|id| id.to_string())
        .collect();
    assert_eq!(ids, vec!["aa000000", "mm555555", "zz999999"]);

    supervisor.shutdown_all().await.unwrap();
}
