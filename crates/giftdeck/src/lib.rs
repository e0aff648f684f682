//! Giftdeck Domain Library
//!
//! Core domain types and interfaces for the Giftdeck gift-card platform's
//! administrative tooling.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (Account, ReferralRank)
//!   - `value_objects/`: Immutable value types (AccountRole, DisplayLabel)
//!   - `services/`: Pure helpers (referral links, QR code URLs)
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Document store access
//!   - `services/`: Ambient services (clock)
//!
//! # Usage
//!
//! ```rust,ignore
//! use giftdeck::domain::{Account, ReferralRank};
//! use giftdeck::ports::{AccountRepository, RankRepository};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Account, AccountRole, DisplayLabel, DomainError, ReferralLinks, ReferralRank,
    DEFAULT_BUSINESS_LABEL, REFERRAL_BENEFITS, REFERRAL_RANK_NAME,
};
pub use ports::{AccountRepository, Clock, FixedClock, RankRepository, SystemClock};
