//! Port for raw document storage.
//!
//! Adapters store opaque bytes under a plain file name. Decoding, defaults
//! and revision checks belong to the record store on top of this port.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by document storage adapters.
    pub enum DocumentStoreError {
        /// Reading or writing the backing file failed.
        Io { file: String, message: String } =>
            "document storage failed for {file}: {message}",
        /// The name is not a single plain file name.
        InvalidName { file: String } =>
            "document name must be a plain file name: {file}",
    }
}

/// Whole-document byte storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the stored bytes, or `None` when the document was never written.
    async fn read(&self, file: &str) -> Result<Option<Vec<u8>>, DocumentStoreError>;

    /// Replace the stored bytes. Readers observe the old or the new contents,
    /// never a mix.
    async fn write(&self, file: &str, contents: Vec<u8>) -> Result<(), DocumentStoreError>;
}

/// Process-local store for tests and demos.
///
/// Writes can be made to fail on demand to exercise error paths.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
    write_failure: Mutex<Option<String>>,
}

impl InMemoryDocumentStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file.
    #[must_use]
    pub fn with_file(self, file: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(file.to_owned(), contents.into());
        self
    }

    /// Current bytes of a file.
    #[must_use]
    pub fn contents(&self, file: &str) -> Option<Vec<u8>> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(file)
            .cloned()
    }

    /// Make subsequent writes fail with `message`, or succeed again with `None`.
    pub fn fail_writes(&self, message: Option<&str>) {
        *self
            .write_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = message.map(str::to_owned);
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn read(&self, file: &str) -> Result<Option<Vec<u8>>, DocumentStoreError> {
        Ok(self.contents(file))
    }

    async fn write(&self, file: &str, contents: Vec<u8>) -> Result<(), DocumentStoreError> {
        let failure = self
            .write_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(message) = failure {
            return Err(DocumentStoreError::io(file, message));
        }
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(file.to_owned(), contents);
        Ok(())
    }
}
