//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Account: Portal user (customer, business or admin)
//! - ReferralRank: Reward tier granted to customers referred by a business

mod account;
mod referral_rank;

pub use account::*;
pub use referral_rank::*;
