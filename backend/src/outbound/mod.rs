//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: JSON files in a capability-scoped data directory
//! - **remote**: reqwest client for the document endpoint, used by the sync
//!   client
//!
//! Adapters are thin translators between domain types and bytes on disk or
//! on the wire. They contain no business logic.

pub mod persistence;
pub mod remote;
