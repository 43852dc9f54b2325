//! Document identity and revision tokens.

use serde::{Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};

/// A collection persisted as one JSON document.
///
/// Implementors name themselves for routing and storage, and may fill
/// missing fields before every write.
pub trait CollectionDocument:
    Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static
{
    /// Routing name, e.g. `tools`.
    const NAME: &'static str;
    /// File name inside the data directory.
    const FILE_NAME: &'static str;

    /// Apply server-side defaults for fields the client omitted.
    fn fill_defaults(&mut self) {}
}

/// Opaque revision token: the SHA-256 digest of the stored bytes.
///
/// A document that has never been written has the digest of zero bytes, so
/// a client that loaded "nothing" can still guard its first write.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision(String);

impl Revision {
    /// Digest the stored representation.
    #[must_use]
    pub fn of(contents: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(contents)))
    }

    /// Revision of a document that does not exist yet.
    #[must_use]
    pub fn absent() -> Self {
        Self::of(&[])
    }

    /// Wrap a token received from a client, stripping `ETag` quoting.
    #[must_use]
    pub fn parse(token: impl AsRef<str>) -> Self {
        let raw = token.as_ref().trim();
        let raw = raw.strip_prefix("W/").unwrap_or(raw);
        Self(raw.trim_matches('"').to_owned())
    }

    /// Hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A loaded document with the revision it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<D> {
    /// Decoded document.
    pub document: D,
    /// Revision of the bytes it was decoded from.
    pub revision: Revision,
}
