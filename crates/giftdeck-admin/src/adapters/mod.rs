//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod firestore;
pub mod memory;

// Re-exports
pub use firestore::{FirestoreAccountRepository, FirestoreClient, FirestoreRankRepository};
pub use memory::{InMemoryStore, Snapshot};
