//! Reqwest-backed document remote.
//!
//! Talks to the document endpoint of a running record service: `GET` loads
//! the whole document with its `ETag`, `PUT` replaces it, sending `If-Match`
//! when the caller supplies a revision.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, ETAG, HeaderMap, IF_MATCH};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::domain::ports::{DocumentRemote, DocumentRemoteError};
use crate::domain::{CollectionDocument, Revision, Snapshot};

const BODY_PREVIEW_LIMIT: usize = 200;

/// Failures while constructing an [`HttpDocumentRemote`].
#[derive(Debug, thiserror::Error)]
pub enum HttpRemoteBuildError {
    /// The reqwest client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    /// The document URL could not be derived from the base URL.
    #[error("invalid document endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Document remote for one collection behind `{base}/documents/{name}`.
pub struct HttpDocumentRemote<D> {
    client: Client,
    endpoint: Url,
    document: PhantomData<fn() -> D>,
}

impl<D: CollectionDocument> HttpDocumentRemote<D> {
    /// Build a remote rooted at the service API base, e.g.
    /// `http://127.0.0.1:8080/api/v1/`.
    ///
    /// # Errors
    ///
    /// Returns an error when the client cannot be built or the document URL
    /// cannot be joined onto `base`.
    pub fn new(base: &Url, timeout: Duration) -> Result<Self, HttpRemoteBuildError> {
        let client = Client::builder().timeout(timeout).build()?;
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join(&format!("documents/{}", D::NAME))?;
        Ok(Self {
            client,
            endpoint,
            document: PhantomData,
        })
    }

    /// URL this remote reads and writes.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[derive(Deserialize)]
struct SaveAck {
    revision: Option<String>,
}

#[async_trait]
impl<D: CollectionDocument> DocumentRemote<D> for HttpDocumentRemote<D> {
    async fn load(&self) -> Result<Snapshot<D>, DocumentRemoteError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let etag = revision_header(response.headers());
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let document = serde_json::from_slice(body.as_ref()).map_err(|error| {
            DocumentRemoteError::malformed(format!("invalid {} payload: {error}", D::NAME))
        })?;
        Ok(Snapshot {
            document,
            revision: etag.unwrap_or_else(|| Revision::of(body.as_ref())),
        })
    }

    async fn replace(
        &self,
        document: &D,
        expected: Option<&Revision>,
    ) -> Result<Revision, DocumentRemoteError> {
        let payload = serde_json::to_vec(document).map_err(|error| {
            DocumentRemoteError::malformed(format!("cannot encode {}: {error}", D::NAME))
        })?;
        let mut request = self
            .client
            .put(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        if let Some(revision) = expected {
            request = request.header(IF_MATCH, format!("\"{revision}\""));
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let etag = revision_header(response.headers());
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        if let Some(revision) = etag {
            return Ok(revision);
        }
        let ack: SaveAck = serde_json::from_slice(body.as_ref()).map_err(|error| {
            DocumentRemoteError::malformed(format!("invalid save acknowledgement: {error}"))
        })?;
        ack.revision.map(Revision::parse).ok_or_else(|| {
            DocumentRemoteError::malformed("save acknowledgement carried no revision")
        })
    }
}

fn revision_header(headers: &HeaderMap) -> Option<Revision> {
    headers
        .get(ETAG)
        .and_then(|value| value.to_str().ok())
        .map(Revision::parse)
}

fn map_transport_error(error: reqwest::Error) -> DocumentRemoteError {
    if error.is_timeout() {
        return DocumentRemoteError::transport(format!("request timed out: {error}"));
    }
    DocumentRemoteError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> DocumentRemoteError {
    let message = format!("status {status}: {}", body_preview(body));
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            DocumentRemoteError::rejected(message)
        }
        // The service answers a default for known documents, so a 404 means
        // a wrong base URL or an unregistered document name.
        StatusCode::NOT_FOUND => DocumentRemoteError::rejected(message),
        StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => {
            DocumentRemoteError::conflict(message)
        }
        status if status.is_server_error() => DocumentRemoteError::storage(message),
        _ => DocumentRemoteError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.chars().count() <= BODY_PREVIEW_LIMIT {
        return trimmed.to_owned();
    }
    let preview: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    format!("{preview}...")
}
