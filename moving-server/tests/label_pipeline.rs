//! Label lifecycle, end to end against a stub toolchain:
//! render -> compile -> store -> publish, plus reprint and failure
//! behavior.

mod common;

use std::time::Duration;

use moving_server::labels::LabelStoreError;
use moving_server::{CompileError, LabelCompiler, LabelError, LabelService, LabelStore, PrintEvents};
use tempfile::TempDir;

use common::{FAILURE_BODY, STUB_PDF, SUCCESS_BODY, write_stub_toolchain};

/// Service wired to a stub toolchain whose invocations are counted in
/// `compiles.log` (one line per run).
fn counted_service(dir: &TempDir, stub_body: &str) -> (LabelService, LabelStore, PrintEvents) {
    let count_file = dir.path().join("compiles.log");
    let body = format!("echo run >> \"{}\"\n{stub_body}", count_file.display());
    let stub = write_stub_toolchain(dir.path(), &body);

    let compiler = LabelCompiler::new(stub.to_string_lossy().into_owned());
    let store = LabelStore::open(dir.path().join("labels.redb")).unwrap();
    let events = PrintEvents::new(16);
    let service = LabelService::new(
        compiler,
        store.clone(),
        events.clone(),
        "http://testserver",
    );
    (service, store, events)
}

fn compile_count(dir: &TempDir) -> usize {
    std::fs::read_to_string(dir.path().join("compiles.log"))
        .map(|s| s.lines().count())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_create_stores_artifact_and_publishes_event() {
    let dir = TempDir::new().unwrap();
    let (service, store, events) = counted_service(&dir, SUCCESS_BODY);

    service.create_label(7, "Kitchen utensils").await.unwrap();

    assert_eq!(store.get(7).unwrap(), STUB_PDF);
    assert_eq!(compile_count(&dir), 1);

    // Published before anyone subscribed; delivered on attach
    let mut sub = events.try_subscribe().unwrap();
    assert_eq!(sub.next_id().await, Some(7));
}

#[tokio::test]
async fn test_reprint_publishes_without_recompiling() {
    let dir = TempDir::new().unwrap();
    let (service, _store, events) = counted_service(&dir, SUCCESS_BODY);

    service.create_label(3, "Books").await.unwrap();
    service.reprint(3).await.unwrap();

    assert_eq!(compile_count(&dir), 1, "reprint must reuse the stored artifact");

    let mut sub = events.try_subscribe().unwrap();
    assert_eq!(sub.next_id().await, Some(3));
    assert_eq!(sub.next_id().await, Some(3));
}

#[tokio::test]
async fn test_failed_compile_stores_and_publishes_nothing() {
    let dir = TempDir::new().unwrap();
    let (service, store, events) = counted_service(&dir, FAILURE_BODY);

    let err = service.create_label(5, "Glassware").await.unwrap_err();
    match err {
        LabelError::Compile(CompileError::Failed {
            exit_code, stderr, ..
        }) => {
            assert_eq!(exit_code, 12);
            assert!(stderr.contains("Emergency stop"));
        }
        other => panic!("expected compile failure, got {other:?}"),
    }

    assert!(matches!(
        store.get(5),
        Err(LabelStoreError::NotFound(5))
    ));

    let mut sub = events.try_subscribe().unwrap();
    let outcome = tokio::time::timeout(Duration::from_millis(50), sub.next_id()).await;
    assert!(outcome.is_err(), "no event may be published for a failed compile");
}

#[tokio::test]
async fn test_duplicate_create_is_rejected_by_the_store() {
    let dir = TempDir::new().unwrap();
    let (service, store, _events) = counted_service(&dir, SUCCESS_BODY);

    service.create_label(9, "Winter coats").await.unwrap();
    let err = service.create_label(9, "Winter coats").await.unwrap_err();

    assert!(matches!(
        err,
        LabelError::Store(LabelStoreError::AlreadyExists(9))
    ));
    // First write stays intact
    assert_eq!(store.get(9).unwrap(), STUB_PDF);
}
