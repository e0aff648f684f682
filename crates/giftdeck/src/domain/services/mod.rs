//! Domain Services
//!
//! Stateless helpers that operate on domain values.

mod referral_links;

pub use referral_links::*;
