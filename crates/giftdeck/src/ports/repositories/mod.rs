//! Repository Ports
//!
//! Abstract interfaces for document store operations.

mod account_repository;
mod rank_repository;

pub use account_repository::*;
pub use rank_repository::*;
