//! Client-side owner of a live collection.
//!
//! [`SyncClient`] loads a document once, applies typed mutations to its
//! in-memory copy and writes the whole collection back through a
//! [`DocumentRemote`]. Structural edits save at once; field edits are
//! debounced. One save runs at a time and each save serialises the latest
//! state, so a slow round trip can never overwrite a newer edit.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};

use super::ports::{DocumentRemote, DocumentRemoteError};
use super::{CollectionDocument, EditKind, Mutation, MutationError, Revision, Transform};

const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(1);
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(250);
const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Save timing and retry behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPolicy {
    /// Quiet period after a field edit before saving.
    pub debounce: Duration,
    /// Pause before retrying a transient failure.
    pub retry_backoff: Duration,
    /// Attempts per save, including the first.
    pub max_attempts: u32,
    /// Send the last known revision with every save.
    pub guard_revision: bool,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            guard_revision: false,
        }
    }
}

/// Failures surfaced to the operator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// The initial load failed; the client shows an empty collection.
    #[error("failed to load {document}: {source}")]
    FetchFailure {
        /// Document name.
        document: &'static str,
        /// Remote error.
        #[source]
        source: DocumentRemoteError,
    },
    /// Saving failed after all attempts; the edit is kept in memory.
    #[error("failed to save {document} after {attempts} attempt(s): {source}")]
    WriteFailure {
        /// Document name.
        document: &'static str,
        /// Attempts made.
        attempts: u32,
        /// Last remote error.
        #[source]
        source: DocumentRemoteError,
    },
    /// Edits and saves are refused until a load succeeds.
    #[error("{document} is not loaded; reload before editing")]
    NotLoaded {
        /// Document name.
        document: &'static str,
    },
    /// The mutation was refused and the collection left unchanged.
    #[error(transparent)]
    Rejected(#[from] MutationError),
}

/// Observable client state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    /// A load has succeeded.
    pub loaded: bool,
    /// Edits exist that are not yet persisted.
    pub dirty: bool,
    /// Revision of the last load or save.
    pub revision: Option<Revision>,
    /// Most recent unresolved failure.
    pub last_error: Option<SyncError>,
}

struct State<D> {
    collection: D,
    loaded: bool,
    edit_generation: u64,
    saved_generation: u64,
    revision: Option<Revision>,
    last_error: Option<SyncError>,
}

struct Inner<D: CollectionDocument> {
    remote: Arc<dyn DocumentRemote<D>>,
    policy: SyncPolicy,
    state: Mutex<State<D>>,
    save_gate: AsyncMutex<()>,
}

/// Live collection bound to a remote document.
///
/// Cloning yields another handle to the same collection.
pub struct SyncClient<D: CollectionDocument> {
    inner: Arc<Inner<D>>,
}

impl<D: CollectionDocument> Clone for SyncClient<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: CollectionDocument> SyncClient<D> {
    /// Create an unloaded client.
    #[must_use]
    pub fn new(remote: Arc<dyn DocumentRemote<D>>, policy: SyncPolicy) -> Self {
        Self {
            inner: Arc::new(Inner {
                remote,
                policy,
                state: Mutex::new(State {
                    collection: D::default(),
                    loaded: false,
                    edit_generation: 0,
                    saved_generation: 0,
                    revision: None,
                    last_error: None,
                }),
                save_gate: AsyncMutex::new(()),
            }),
        }
    }

    /// Load the collection.
    ///
    /// On failure the client shows an empty collection, records a
    /// [`SyncError::FetchFailure`] and refuses edits until a later call
    /// succeeds, so the empty fallback can never overwrite real data.
    ///
    /// # Errors
    /// Returns the recorded [`SyncError::FetchFailure`].
    pub async fn initialize(&self) -> Result<(), SyncError> {
        let result = self.inner.remote.load().await;
        let mut state = self.state();
        match result {
            Ok(snapshot) => {
                state.collection = snapshot.document;
                state.revision = Some(snapshot.revision);
                state.loaded = true;
                state.saved_generation = state.edit_generation;
                state.last_error = None;
                debug!(document = D::NAME, "collection loaded");
                Ok(())
            }
            Err(source) => {
                let error = SyncError::FetchFailure {
                    document: D::NAME,
                    source,
                };
                warn!(document = D::NAME, error = %error, "collection load failed");
                state.collection = D::default();
                state.loaded = false;
                state.revision = None;
                state.saved_generation = state.edit_generation;
                state.last_error = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Apply a typed mutation and schedule its save.
    ///
    /// Structural edits are saved before this returns. Field edits are saved
    /// once no further edit has arrived for the debounce window.
    ///
    /// # Errors
    /// [`SyncError::NotLoaded`] before a successful load,
    /// [`SyncError::Rejected`] when the mutation refuses, or the
    /// [`SyncError::WriteFailure`] of an immediate save.
    pub async fn dispatch<M: Mutation<D>>(&self, mutation: M) -> Result<(), SyncError> {
        let kind = mutation.kind();
        let generation = {
            let mut state = self.state();
            if !state.loaded {
                return Err(SyncError::NotLoaded { document: D::NAME });
            }
            let mut next = state.collection.clone();
            mutation.apply(&mut next)?;
            state.collection = next;
            state.edit_generation += 1;
            state.edit_generation
        };
        match kind {
            EditKind::Structural => self.flush().await,
            EditKind::Field => {
                self.schedule_save(generation);
                Ok(())
            }
        }
    }

    /// Replace the collection with `transform(collection)` and save at once.
    ///
    /// # Errors
    /// As for [`Self::dispatch`].
    pub async fn mutate<F>(&self, transform: F) -> Result<(), SyncError>
    where
        F: FnOnce(D) -> D + Send + 'static,
    {
        self.dispatch(Transform::structural(transform)).await
    }

    /// Replace the collection with `transform(collection)`, saving after the
    /// debounce window.
    ///
    /// # Errors
    /// As for [`Self::dispatch`].
    pub async fn edit<F>(&self, transform: F) -> Result<(), SyncError>
    where
        F: FnOnce(D) -> D + Send + 'static,
    {
        self.dispatch(Transform::field(transform)).await
    }

    /// Save pending edits now.
    ///
    /// Transient failures are retried after the policy backoff until
    /// `max_attempts` is exhausted. A failed save keeps the edits in memory
    /// and leaves the client dirty, so calling `flush` again retries.
    ///
    /// # Errors
    /// [`SyncError::NotLoaded`] before a successful load, or
    /// [`SyncError::WriteFailure`] after the final attempt.
    pub async fn flush(&self) -> Result<(), SyncError> {
        let _gate = self.inner.save_gate.lock().await;
        let (document, generation, expected) = {
            let state = self.state();
            if !state.loaded {
                return Err(SyncError::NotLoaded { document: D::NAME });
            }
            if state.saved_generation >= state.edit_generation {
                return Ok(());
            }
            let expected = if self.inner.policy.guard_revision {
                state.revision.clone()
            } else {
                None
            };
            (state.collection.clone(), state.edit_generation, expected)
        };

        let result = self.replace_with_retry(&document, expected.as_ref()).await;

        let mut state = self.state();
        match result {
            Ok(revision) => {
                state.saved_generation = state.saved_generation.max(generation);
                state.revision = Some(revision);
                state.last_error = None;
                debug!(document = D::NAME, generation, "collection saved");
                Ok(())
            }
            Err((attempts, source)) => {
                let error = SyncError::WriteFailure {
                    document: D::NAME,
                    attempts,
                    source,
                };
                warn!(document = D::NAME, error = %error, "collection save failed");
                state.last_error = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Read the live collection.
    #[must_use]
    pub fn view<R>(&self, read: impl FnOnce(&D) -> R) -> R {
        read(&self.state().collection)
    }

    /// Clone of the live collection.
    #[must_use]
    pub fn snapshot(&self) -> D {
        self.view(Clone::clone)
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        let state = self.state();
        SyncStatus {
            loaded: state.loaded,
            dirty: state.saved_generation < state.edit_generation,
            revision: state.revision.clone(),
            last_error: state.last_error.clone(),
        }
    }

    /// Most recent unresolved failure.
    #[must_use]
    pub fn last_error(&self) -> Option<SyncError> {
        self.state().last_error.clone()
    }

    fn state(&self) -> MutexGuard<'_, State<D>> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn schedule_save(&self, generation: u64) {
        let client = self.clone();
        let debounce = self.inner.policy.debounce;
        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let superseded = client.state().edit_generation != generation;
            if superseded {
                return;
            }
            if let Err(error) = client.flush().await {
                debug!(document = D::NAME, error = %error, "debounced save failed");
            }
        });
    }

    async fn replace_with_retry(
        &self,
        document: &D,
        expected: Option<&Revision>,
    ) -> Result<Revision, (u32, DocumentRemoteError)> {
        let max_attempts = self.inner.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.inner.remote.replace(document, expected).await {
                Ok(revision) => return Ok(revision),
                Err(error) if error.is_transient() && attempt < max_attempts => {
                    warn!(
                        document = D::NAME,
                        attempt,
                        error = %error,
                        "transient save failure; retrying"
                    );
                    tokio::time::sleep(self.inner.policy.retry_backoff).await;
                    attempt += 1;
                }
                Err(error) => return Err((attempt, error)),
            }
        }
    }
}
