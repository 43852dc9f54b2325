//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod document_remote;
mod document_store;

pub use document_remote::{DocumentRemote, DocumentRemoteError};
#[cfg(test)]
pub use document_store::MockDocumentStore;
pub use document_store::{DocumentStore, DocumentStoreError, InMemoryDocumentStore};
