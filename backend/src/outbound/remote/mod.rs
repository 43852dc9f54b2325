//! Remote document adapters used by the sync client.

mod http_remote;

pub use http_remote::{HttpDocumentRemote, HttpRemoteBuildError};
