//! JSON documents kept as files in one data directory.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tokio::task;
use tracing::debug;

use super::atomic_io::{plain_file_name, write_atomic};
use crate::domain::ports::{DocumentStore, DocumentStoreError};

/// File-backed [`DocumentStore`].
///
/// All access goes through a capability handle on the data directory, so
/// documents can never resolve outside it. Blocking file I/O runs on the
/// tokio blocking pool.
#[derive(Clone)]
pub struct JsonFileStore {
    root: Utf8PathBuf,
    dir: Arc<Dir>,
}

impl JsonFileStore {
    /// Open `root`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Io`] when the directory cannot be
    /// created or opened.
    pub fn open(root: &Utf8Path) -> Result<Self, DocumentStoreError> {
        let io_error = |err: io::Error| DocumentStoreError::io(root.as_str(), err.to_string());
        Dir::create_ambient_dir_all(root, ambient_authority()).map_err(io_error)?;
        let dir = Dir::open_ambient_dir(root, ambient_authority()).map_err(io_error)?;
        Ok(Self {
            root: root.to_path_buf(),
            dir: Arc::new(dir),
        })
    }

    /// The data directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    async fn blocking<T, F>(&self, file: &str, work: F) -> Result<T, DocumentStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> Result<T, DocumentStoreError> + Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        task::spawn_blocking(move || work(&dir))
            .await
            .map_err(|err| DocumentStoreError::io(file, err.to_string()))?
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn read(&self, file: &str) -> Result<Option<Vec<u8>>, DocumentStoreError> {
        let name = plain_file_name(file)?.to_owned();
        self.blocking(file, move |dir| match dir.read(&name) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(DocumentStoreError::io(name, err.to_string())),
        })
        .await
    }

    async fn write(&self, file: &str, contents: Vec<u8>) -> Result<(), DocumentStoreError> {
        let name = file.to_owned();
        let bytes = contents.len();
        self.blocking(file, move |dir| write_atomic(dir, &name, &contents))
            .await?;
        debug!(file, bytes, root = %self.root, "document file replaced");
        Ok(())
    }
}
