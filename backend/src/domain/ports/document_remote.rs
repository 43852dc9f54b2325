//! Port through which the sync client reaches its endpoint.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{CollectionDocument, Revision, Snapshot};

define_port_error! {
    /// Errors raised by document remotes.
    pub enum DocumentRemoteError {
        /// The request never produced a response.
        Transport { message: String } => "document transport failed: {message}",
        /// The endpoint refused the document as malformed.
        Rejected { message: String } => "document rejected: {message}",
        /// The endpoint holds a newer revision than the one supplied.
        Conflict { message: String } => "document revision conflict: {message}",
        /// The endpoint could not read or persist the document.
        Storage { message: String } => "document storage failed: {message}",
        /// The response or the stored document could not be decoded.
        Malformed { message: String } => "document is malformed: {message}",
    }
}

impl DocumentRemoteError {
    /// Whether retrying the same request may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Storage { .. })
    }
}

/// Load and replace one document as a whole.
///
/// A document that does not exist yet loads as its default value at
/// [`Revision::absent`].
#[async_trait]
pub trait DocumentRemote<D: CollectionDocument>: Send + Sync {
    /// Fetch the current document.
    async fn load(&self) -> Result<Snapshot<D>, DocumentRemoteError>;

    /// Overwrite the document. With `expected`, the write only happens while
    /// the stored revision still matches.
    async fn replace(
        &self,
        document: &D,
        expected: Option<&Revision>,
    ) -> Result<Revision, DocumentRemoteError>;
}
