//! File-backed persistence adapters.
//!
//! Each document lives in its own JSON file under the configured data
//! directory. Writes replace the file atomically.

mod atomic_io;
mod json_file_store;

pub use json_file_store::JsonFileStore;
