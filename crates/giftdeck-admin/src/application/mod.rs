//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations over the store ports.

mod auditor;
mod link_service;
mod provisioner;

pub use auditor::{AuditReport, ReferralAuditor};
pub use link_service::{LinkSummary, ReferralLinkService};
pub use provisioner::{ProvisionSummary, ReferralProvisioner};
