//! Rank Repository Port
//!
//! Abstract interface for reward-rank persistence operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{errors::DomainError, ReferralLinks, ReferralRank};

/// Repository interface for reward-rank documents
///
/// No uniqueness constraint is implied: two concurrent callers that both
/// observe an empty `find_by_business_and_name` may both `insert`.
#[async_trait]
pub trait RankRepository: Send + Sync {
    /// Find ranks where `businessId == business_id AND name == name`
    async fn find_by_business_and_name(
        &self,
        business_id: &str,
        name: &str,
    ) -> Result<Vec<ReferralRank>, DomainError>;

    /// Find all ranks with the given name
    async fn find_by_name(&self, name: &str) -> Result<Vec<ReferralRank>, DomainError>;

    /// Insert a new rank, returning the store-assigned id
    async fn insert(&self, rank: &ReferralRank) -> Result<String, DomainError>;

    /// Set signup link and QR code URL on an existing rank
    async fn update_links(
        &self,
        id: &str,
        links: &ReferralLinks,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;
}
