//! Typed whole-document storage.
//!
//! [`RecordBook`] hands out one [`RecordStore`] per document type. Every
//! write on a document is serialised through a per-document async lock, so
//! read-modify-write sequences such as [`RecordStore::update`] never
//! interleave within one process.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::{Mutex as AsyncMutex, MutexGuard as AsyncMutexGuard};
use tracing::debug;

use super::ports::{DocumentRemote, DocumentRemoteError, DocumentStore, DocumentStoreError};
use super::{CollectionDocument, Error, MutationError, Revision, Snapshot};

/// Failures of typed document storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordStoreError {
    /// The document has never been written.
    #[error("{document} has not been written yet")]
    NotFound {
        /// Document name.
        document: &'static str,
    },
    /// The stored bytes do not decode as the document type.
    #[error("stored {document} document is malformed: {message}")]
    MalformedDocument {
        /// Document name.
        document: &'static str,
        /// Decoder message.
        message: String,
    },
    /// A submitted body does not decode as the document type.
    #[error("invalid {document} document: {message}")]
    InvalidInput {
        /// Document name.
        document: &'static str,
        /// Decoder message.
        message: String,
    },
    /// The caller's revision is stale.
    #[error("{document} revision mismatch: expected {expected}, found {actual}")]
    Conflict {
        /// Document name.
        document: &'static str,
        /// Revision supplied by the caller.
        expected: Revision,
        /// Revision currently stored.
        actual: Revision,
    },
    /// An edit applied through [`RecordStore::update`] was refused.
    #[error("{document} edit refused: {source}")]
    Rejected {
        /// Document name.
        document: &'static str,
        /// Why the edit was refused.
        #[source]
        source: MutationError,
    },
    /// The document could not be encoded.
    #[error("failed to encode {document}: {message}")]
    Encode {
        /// Document name.
        document: &'static str,
        /// Encoder message.
        message: String,
    },
    /// The storage port failed.
    #[error("{document} storage failed: {source}")]
    Storage {
        /// Document name.
        document: &'static str,
        /// Port error.
        #[source]
        source: DocumentStoreError,
    },
}

impl From<RecordStoreError> for Error {
    fn from(value: RecordStoreError) -> Self {
        match value {
            RecordStoreError::NotFound { .. } => Self::not_found(value.to_string()),
            RecordStoreError::MalformedDocument { .. } => {
                Self::malformed_document(value.to_string())
            }
            RecordStoreError::InvalidInput { .. } => Self::bad_request(value.to_string()),
            RecordStoreError::Conflict {
                ref expected,
                ref actual,
                ..
            } => Self::conflict(value.to_string()).with_details(serde_json::json!({
                "expected": expected.as_str(),
                "actual": actual.as_str(),
            })),
            RecordStoreError::Rejected { ref source, .. } => match source {
                MutationError::NotFound { .. } => Self::not_found(source.to_string()),
                _ => Self::bad_request(source.to_string()),
            },
            RecordStoreError::Encode { .. } => Self::internal(value.to_string()),
            RecordStoreError::Storage { .. } => Self::io_error(value.to_string()),
        }
    }
}

type DocumentLocks = HashMap<&'static str, Arc<AsyncMutex<()>>>;

/// Registry of typed stores sharing one storage port.
#[derive(Clone)]
pub struct RecordBook {
    store: Arc<dyn DocumentStore>,
    locks: Arc<Mutex<DocumentLocks>>,
}

impl RecordBook {
    /// Wrap a storage port.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Typed store for `D`. Stores for the same document share one lock.
    #[must_use]
    pub fn store<D: CollectionDocument>(&self) -> RecordStore<D> {
        let lock = self
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(D::NAME)
            .or_default()
            .clone();
        RecordStore {
            store: Arc::clone(&self.store),
            lock,
            _document: PhantomData,
        }
    }
}

/// Typed access to one document.
pub struct RecordStore<D> {
    store: Arc<dyn DocumentStore>,
    lock: Arc<AsyncMutex<()>>,
    _document: PhantomData<fn() -> D>,
}

impl<D> Clone for RecordStore<D> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            lock: Arc::clone(&self.lock),
            _document: PhantomData,
        }
    }
}

/// Guard proving the caller holds a document's write lock.
pub struct WriteGuard<'a>(AsyncMutexGuard<'a, ()>);

impl<D: CollectionDocument> RecordStore<D> {
    /// Load the document.
    ///
    /// # Errors
    /// [`RecordStoreError::NotFound`] when nothing was written yet (callers
    /// treat this as the empty collection), [`RecordStoreError::MalformedDocument`]
    /// when the stored bytes do not decode, or a storage error.
    pub async fn load(&self) -> Result<Snapshot<D>, RecordStoreError> {
        let bytes = self.read_raw().await?.ok_or(RecordStoreError::NotFound {
            document: D::NAME,
        })?;
        if bytes.trim_ascii().is_empty() {
            return Err(RecordStoreError::NotFound { document: D::NAME });
        }
        let document = serde_json::from_slice(&bytes).map_err(|error| {
            RecordStoreError::MalformedDocument {
                document: D::NAME,
                message: error.to_string(),
            }
        })?;
        Ok(Snapshot {
            document,
            revision: Revision::of(&bytes),
        })
    }

    /// Load the document, treating a missing one as its default.
    ///
    /// # Errors
    /// Propagates malformed documents and storage failures.
    pub async fn load_or_default(&self) -> Result<Snapshot<D>, RecordStoreError> {
        match self.load().await {
            Err(RecordStoreError::NotFound { .. }) => Ok(Snapshot {
                document: D::default(),
                revision: Revision::absent(),
            }),
            other => other,
        }
    }

    /// Stored bytes, verbatim.
    ///
    /// # Errors
    /// Propagates storage failures.
    pub async fn read_raw(&self) -> Result<Option<Vec<u8>>, RecordStoreError> {
        self.store
            .read(D::FILE_NAME)
            .await
            .map_err(|source| RecordStoreError::Storage {
                document: D::NAME,
                source,
            })
    }

    /// Overwrite the document (last writer wins).
    ///
    /// # Errors
    /// Propagates encoding and storage failures.
    pub async fn replace(&self, document: D) -> Result<Revision, RecordStoreError> {
        self.replace_if(document, None).await
    }

    /// Overwrite the document when the stored revision still equals `expected`.
    ///
    /// # Errors
    /// [`RecordStoreError::Conflict`] on a stale revision, otherwise encoding
    /// and storage failures.
    pub async fn replace_if(
        &self,
        document: D,
        expected: Option<&Revision>,
    ) -> Result<Revision, RecordStoreError> {
        let guard = self.lock().await;
        self.check_revision(&guard, expected).await?;
        self.write_locked(&guard, document).await
    }

    /// Decode a submitted body and store it.
    ///
    /// Nothing is written unless the body decodes as `D`.
    ///
    /// # Errors
    /// [`RecordStoreError::InvalidInput`] for bodies that do not decode, plus
    /// the failures of [`Self::replace_if`].
    pub async fn replace_raw(
        &self,
        body: &[u8],
        expected: Option<&Revision>,
    ) -> Result<Revision, RecordStoreError> {
        let document: D =
            serde_json::from_slice(body).map_err(|error| RecordStoreError::InvalidInput {
                document: D::NAME,
                message: error.to_string(),
            })?;
        self.replace_if(document, expected).await
    }

    /// Apply `edit` to the current document and store the result.
    ///
    /// # Errors
    /// [`RecordStoreError::Rejected`] when `edit` refuses; nothing is written.
    pub async fn update<T, F>(&self, edit: F) -> Result<(T, Revision), RecordStoreError>
    where
        F: FnOnce(&mut D) -> Result<T, MutationError> + Send,
    {
        let guard = self.lock().await;
        let Snapshot { mut document, .. } = self.load_or_default().await?;
        let output = edit(&mut document).map_err(|source| RecordStoreError::Rejected {
            document: D::NAME,
            source,
        })?;
        let revision = self.write_locked(&guard, document).await?;
        Ok((output, revision))
    }

    /// Take the document's write lock for a multi-step sequence.
    pub async fn lock(&self) -> WriteGuard<'_> {
        WriteGuard(self.lock.lock().await)
    }

    /// Write while already holding this document's lock.
    ///
    /// # Errors
    /// Propagates encoding and storage failures.
    pub async fn write_locked(
        &self,
        _guard: &WriteGuard<'_>,
        mut document: D,
    ) -> Result<Revision, RecordStoreError> {
        document.fill_defaults();
        let bytes =
            serde_json::to_vec_pretty(&document).map_err(|error| RecordStoreError::Encode {
                document: D::NAME,
                message: error.to_string(),
            })?;
        let revision = Revision::of(&bytes);
        self.store
            .write(D::FILE_NAME, bytes)
            .await
            .map_err(|source| RecordStoreError::Storage {
                document: D::NAME,
                source,
            })?;
        debug!(document = D::NAME, revision = %revision, "document replaced");
        Ok(revision)
    }

    async fn check_revision(
        &self,
        _guard: &WriteGuard<'_>,
        expected: Option<&Revision>,
    ) -> Result<(), RecordStoreError> {
        let Some(expected) = expected else {
            return Ok(());
        };
        let actual = match self.read_raw().await? {
            Some(bytes) if !bytes.trim_ascii().is_empty() => Revision::of(&bytes),
            _ => Revision::absent(),
        };
        if &actual == expected {
            Ok(())
        } else {
            Err(RecordStoreError::Conflict {
                document: D::NAME,
                expected: expected.clone(),
                actual,
            })
        }
    }
}

#[async_trait]
impl<D: CollectionDocument> DocumentRemote<D> for RecordStore<D> {
    async fn load(&self) -> Result<Snapshot<D>, DocumentRemoteError> {
        self.load_or_default().await.map_err(remote_error)
    }

    async fn replace(
        &self,
        document: &D,
        expected: Option<&Revision>,
    ) -> Result<Revision, DocumentRemoteError> {
        self.replace_if(document.clone(), expected)
            .await
            .map_err(remote_error)
    }
}

fn remote_error(error: RecordStoreError) -> DocumentRemoteError {
    match error {
        RecordStoreError::MalformedDocument { .. } => {
            DocumentRemoteError::malformed(error.to_string())
        }
        RecordStoreError::Conflict { .. } => DocumentRemoteError::conflict(error.to_string()),
        RecordStoreError::Storage { .. } | RecordStoreError::NotFound { .. } => {
            DocumentRemoteError::storage(error.to_string())
        }
        RecordStoreError::InvalidInput { .. }
        | RecordStoreError::Rejected { .. }
        | RecordStoreError::Encode { .. } => DocumentRemoteError::rejected(error.to_string()),
    }
}

#[cfg(test)]
mod tests;
