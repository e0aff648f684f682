//! Service Ports
//!
//! Ambient services the use cases depend on.

mod clock;

pub use clock::*;
