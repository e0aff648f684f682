//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod account_role;
mod display_label;

pub use account_role::*;
pub use display_label::*;
