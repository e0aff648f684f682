//! Firestore Repository Implementations
//!
//! Talks to the Firestore REST API; both repositories share one client.

mod account_repository;
mod client;
mod rank_repository;
mod value;

pub use account_repository::FirestoreAccountRepository;
pub use client::FirestoreClient;
pub use rank_repository::FirestoreRankRepository;
