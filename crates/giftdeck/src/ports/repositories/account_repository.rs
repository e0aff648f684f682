//! Account Repository Port
//!
//! Read-only access to the account collection.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, Account, AccountRole};

/// Repository interface for Account documents
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find all accounts whose role equals `role` (unordered)
    async fn find_by_role(&self, role: &AccountRole) -> Result<Vec<Account>, DomainError>;
}
