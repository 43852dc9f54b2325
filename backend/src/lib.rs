//! Record keeping service: JSON document storage, sync client, and aggregates.
//!
//! The crate is organised hexagonally. [`domain`] owns the typed records,
//! the record store, the sync client and the pure aggregators. Inbound
//! adapters live in [`inbound`], outbound adapters in [`outbound`].

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use domain::TraceId;
pub use middleware::Trace;
