//! Typed edit events consumed by the sync client.
//!
//! Views never touch a collection directly. They describe an edit as a
//! [`Mutation`], the sync client applies it to a copy of the collection and
//! decides when to persist based on its [`EditKind`].

use std::marker::PhantomData;

/// How an edit should be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// A single cell changed; saves are debounced.
    Field,
    /// Rows were added, removed or moved; saves happen immediately.
    Structural,
}

/// Reasons an edit is refused. The collection is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    /// A uniqueness rule would be broken.
    #[error("{what} already exists: {key}")]
    Duplicate {
        /// Kind of record, e.g. `tool`.
        what: &'static str,
        /// Offending key value.
        key: String,
    },
    /// The addressed record does not exist.
    #[error("{what} not found: {key}")]
    NotFound {
        /// Kind of record.
        what: &'static str,
        /// Key that was looked up.
        key: String,
    },
    /// A row index points past the end of the collection.
    #[error("row {index} is out of range")]
    OutOfRange {
        /// Requested row.
        index: usize,
    },
    /// Input failed validation.
    #[error("{message}")]
    Invalid {
        /// What was wrong.
        message: String,
    },
}

impl MutationError {
    /// Shorthand for [`MutationError::Invalid`].
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// An edit applied to one collection type.
pub trait Mutation<D>: Send + 'static {
    /// Persistence class of this edit.
    fn kind(&self) -> EditKind;

    /// Apply the edit in place.
    ///
    /// # Errors
    /// Returns a [`MutationError`] when the edit is not applicable.
    fn apply(self, document: &mut D) -> Result<(), MutationError>;
}

/// Whole-collection transformation, the untyped escape hatch.
///
/// # Examples
/// ```
/// use recordkeeper::domain::{EditKind, Mutation, Transform};
///
/// let mut rows = vec![1, 2, 3];
/// Transform::structural(|mut rows: Vec<i32>| {
///     rows.retain(|row| *row != 2);
///     rows
/// })
/// .apply(&mut rows)
/// .expect("transform applies");
/// assert_eq!(rows, vec![1, 3]);
/// ```
pub struct Transform<D, F> {
    kind: EditKind,
    transform: F,
    _document: PhantomData<fn(D) -> D>,
}

impl<D, F> Transform<D, F>
where
    F: FnOnce(D) -> D,
{
    /// A transformation saved immediately.
    #[must_use]
    pub const fn structural(transform: F) -> Self {
        Self {
            kind: EditKind::Structural,
            transform,
            _document: PhantomData,
        }
    }

    /// A transformation saved after the debounce window.
    #[must_use]
    pub const fn field(transform: F) -> Self {
        Self {
            kind: EditKind::Field,
            transform,
            _document: PhantomData,
        }
    }
}

impl<D, F> Mutation<D> for Transform<D, F>
where
    D: Default + 'static,
    F: FnOnce(D) -> D + Send + 'static,
{
    fn kind(&self) -> EditKind {
        self.kind
    }

    fn apply(self, document: &mut D) -> Result<(), MutationError> {
        let current = std::mem::take(document);
        *document = (self.transform)(current);
        Ok(())
    }
}

/// Look up a row by index, mapping a miss to [`MutationError::OutOfRange`].
pub(crate) fn row_mut<T>(rows: &mut [T], index: usize) -> Result<&mut T, MutationError> {
    rows.get_mut(index)
        .ok_or(MutationError::OutOfRange { index })
}

/// Remove a row by index, mapping a miss to [`MutationError::OutOfRange`].
pub(crate) fn remove_row<T>(rows: &mut Vec<T>, index: usize) -> Result<T, MutationError> {
    if index < rows.len() {
        Ok(rows.remove(index))
    } else {
        Err(MutationError::OutOfRange { index })
    }
}
