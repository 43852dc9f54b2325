//! Tests for typed whole-document storage.

use std::sync::Arc;

use rstest::{fixture, rstest};
use serde::{Deserialize, Serialize};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{InMemoryDocumentStore, MockDocumentStore};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Tally {
    #[serde(default)]
    label: String,
    #[serde(default)]
    count: Option<u32>,
    #[serde(default)]
    rows: Vec<String>,
}

impl CollectionDocument for Tally {
    const NAME: &'static str = "tally";
    const FILE_NAME: &'static str = "tally.json";

    fn fill_defaults(&mut self) {
        self.count.get_or_insert(0);
    }
}

#[fixture]
fn memory() -> Arc<InMemoryDocumentStore> {
    Arc::new(InMemoryDocumentStore::new())
}

fn tally_store(memory: &Arc<InMemoryDocumentStore>) -> RecordStore<Tally> {
    RecordBook::new(memory.clone()).store::<Tally>()
}

fn tally(label: &str, rows: &[&str]) -> Tally {
    Tally {
        label: label.to_owned(),
        count: Some(rows.len() as u32),
        rows: rows.iter().map(|row| (*row).to_owned()).collect(),
    }
}

#[rstest]
#[tokio::test]
async fn missing_document_is_not_found(memory: Arc<InMemoryDocumentStore>) {
    let store = tally_store(&memory);

    assert_eq!(
        store.load().await,
        Err(RecordStoreError::NotFound { document: "tally" })
    );
    let fallback = store.load_or_default().await.expect("default snapshot");
    assert_eq!(fallback.document, Tally::default());
    assert_eq!(fallback.revision, Revision::absent());
}

#[rstest]
#[tokio::test]
async fn blank_file_counts_as_never_written() {
    let memory = Arc::new(InMemoryDocumentStore::new().with_file("tally.json", "  \n"));
    let store = tally_store(&memory);
    assert!(matches!(
        store.load().await,
        Err(RecordStoreError::NotFound { .. })
    ));
}

#[rstest]
#[tokio::test]
async fn replace_then_load_round_trips(memory: Arc<InMemoryDocumentStore>) {
    let store = tally_store(&memory);
    let written = tally("bolts", &["a", "b"]);

    let revision = store.replace(written.clone()).await.expect("replace succeeds");
    let loaded = store.load().await.expect("load succeeds");

    assert_eq!(loaded.document, written);
    assert_eq!(loaded.revision, revision);
    let stored = memory.contents("tally.json").expect("file written");
    assert_eq!(Revision::of(&stored), revision);
}

#[rstest]
#[tokio::test]
async fn malformed_stored_document_is_reported() {
    let memory = Arc::new(InMemoryDocumentStore::new().with_file("tally.json", "{\"rows\": [1,"));
    let store = tally_store(&memory);

    let error = store.load().await.expect_err("malformed document");

    assert!(matches!(
        error,
        RecordStoreError::MalformedDocument {
            document: "tally",
            ..
        }
    ));
    assert_eq!(Error::from(error).code(), ErrorCode::MalformedDocument);
}

#[rstest]
#[case(b"{not json".as_slice())]
#[case(b"[1, 2, 3]".as_slice())]
#[case(b"".as_slice())]
#[tokio::test]
async fn invalid_body_leaves_document_unchanged(#[case] body: &[u8]) {
    let memory = Arc::new(InMemoryDocumentStore::new().with_file("tally.json", "{\"label\":\"kept\"}"));
    let store = tally_store(&memory);

    let error = store.replace_raw(body, None).await.expect_err("body rejected");

    assert!(matches!(error, RecordStoreError::InvalidInput { .. }));
    assert_eq!(Error::from(error).code(), ErrorCode::BadRequest);
    assert_eq!(
        memory.contents("tally.json"),
        Some(b"{\"label\":\"kept\"}".to_vec())
    );
}

#[rstest]
#[tokio::test]
async fn raw_writes_apply_server_defaults(memory: Arc<InMemoryDocumentStore>) {
    let store = tally_store(&memory);

    store
        .replace_raw(br#"{"label":"nuts"}"#, None)
        .await
        .expect("valid body stored");

    let loaded = store.load().await.expect("load succeeds");
    assert_eq!(loaded.document.count, Some(0));
}

#[rstest]
#[tokio::test]
async fn stale_revision_conflicts(memory: Arc<InMemoryDocumentStore>) {
    let store = tally_store(&memory);
    let first = store.replace(tally("a", &[])).await.expect("first write");
    store.replace(tally("b", &[])).await.expect("second write");

    let error = store
        .replace_if(tally("c", &[]), Some(&first))
        .await
        .expect_err("stale revision");

    assert!(matches!(error, RecordStoreError::Conflict { .. }));
    assert_eq!(Error::from(error).code(), ErrorCode::Conflict);
    let loaded = store.load().await.expect("load succeeds");
    assert_eq!(loaded.document.label, "b");
}

#[rstest]
#[tokio::test]
async fn absent_revision_guards_the_first_write(memory: Arc<InMemoryDocumentStore>) {
    let store = tally_store(&memory);

    store
        .replace_if(tally("first", &[]), Some(&Revision::absent()))
        .await
        .expect("first guarded write succeeds");
    let error = store
        .replace_if(tally("second", &[]), Some(&Revision::absent()))
        .await
        .expect_err("document now exists");

    assert!(matches!(error, RecordStoreError::Conflict { .. }));
}

#[rstest]
#[tokio::test]
async fn refused_update_writes_nothing(memory: Arc<InMemoryDocumentStore>) {
    let store = tally_store(&memory);

    let error = store
        .update(|_: &mut Tally| -> Result<(), MutationError> {
            Err(MutationError::invalid("no"))
        })
        .await
        .expect_err("edit refused");

    assert!(matches!(error, RecordStoreError::Rejected { .. }));
    assert!(memory.contents("tally.json").is_none());
}

#[rstest]
#[tokio::test]
async fn concurrent_updates_are_serialised(memory: Arc<InMemoryDocumentStore>) {
    let book = RecordBook::new(memory.clone());
    let mut tasks = Vec::new();
    for index in 0..16 {
        let store = book.store::<Tally>();
        tasks.push(tokio::spawn(async move {
            store
                .update(move |doc: &mut Tally| {
                    doc.rows.push(format!("row-{index}"));
                    Ok(())
                })
                .await
        }));
    }
    for task in tasks {
        task.await.expect("task joins").expect("update succeeds");
    }

    let loaded = book.store::<Tally>().load().await.expect("load succeeds");
    assert_eq!(loaded.document.rows.len(), 16);
}

#[rstest]
#[tokio::test]
async fn storage_failures_map_to_io_errors(memory: Arc<InMemoryDocumentStore>) {
    memory.fail_writes(Some("read-only file system"));
    let store = tally_store(&memory);

    let error = store.replace(tally("x", &[])).await.expect_err("write fails");

    assert!(matches!(error, RecordStoreError::Storage { .. }));
    let mapped = Error::from(error);
    assert_eq!(mapped.code(), ErrorCode::IoError);
    assert!(mapped.message().contains("read-only file system"));
}

#[rstest]
#[tokio::test]
async fn read_failures_surface_from_the_port() {
    let mut port = MockDocumentStore::new();
    port.expect_read()
        .times(1)
        .returning(|file| Err(DocumentStoreError::io(file, "permission denied")));
    let store = RecordBook::new(Arc::new(port)).store::<Tally>();

    let error = store.load().await.expect_err("read fails");

    assert_eq!(
        error,
        RecordStoreError::Storage {
            document: "tally",
            source: DocumentStoreError::io("tally.json", "permission denied"),
        }
    );
}

#[rstest]
#[tokio::test]
async fn store_acts_as_in_process_remote(memory: Arc<InMemoryDocumentStore>) {
    let store = tally_store(&memory);
    let remote: &dyn DocumentRemote<Tally> = &store;

    let initial = remote.load().await.expect("missing loads as default");
    assert_eq!(initial.revision, Revision::absent());

    let revision = remote
        .replace(&tally("remote", &["r"]), Some(&initial.revision))
        .await
        .expect("guarded replace succeeds");
    let stale = remote
        .replace(&tally("late", &[]), Some(&initial.revision))
        .await
        .expect_err("stale revision");

    assert!(matches!(stale, DocumentRemoteError::Conflict { .. }));
    assert_eq!(remote.load().await.expect("reload").revision, revision);
}
