//! Referral Rank Auditor (Use Case)
//!
//! Read-only consistency check between business accounts and referral ranks.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use giftdeck::{
    AccountRepository, AccountRole, DomainError, RankRepository, ReferralRank, REFERRAL_RANK_NAME,
};

/// Shown in place of the id of a rank the store has not assigned one to
const UNSAVED_RANK_ID: &str = "<unsaved>";

/// Business with more than one referral rank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateRanks {
    pub business_id: String,
    pub rank_ids: Vec<String>,
}

/// Findings of one audit; all lists are sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    pub business_count: usize,
    pub rank_count: usize,
    /// Business accounts without a referral rank
    pub missing: Vec<String>,
    pub duplicates: Vec<DuplicateRanks>,
    /// Rank ids whose business is not a business account
    pub orphaned: Vec<String>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.duplicates.is_empty() && self.orphaned.is_empty()
    }
}

/// Application service for referral audits
pub struct ReferralAuditor<A: AccountRepository, R: RankRepository> {
    accounts: Arc<A>,
    ranks: Arc<R>,
}

impl<A: AccountRepository, R: RankRepository> ReferralAuditor<A, R> {
    pub fn new(accounts: Arc<A>, ranks: Arc<R>) -> Self {
        Self { accounts, ranks }
    }

    pub async fn audit(&self) -> Result<AuditReport, DomainError> {
        let businesses = self.accounts.find_by_role(&AccountRole::Business).await?;
        let ranks = self.ranks.find_by_name(REFERRAL_RANK_NAME).await?;

        let business_ids: BTreeSet<&str> = businesses.iter().map(|b| b.id.as_str()).collect();

        let mut by_business: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for rank in &ranks {
            by_business
                .entry(rank.business_id.as_str())
                .or_default()
                .push(rank_label(rank));
        }

        let missing = business_ids
            .iter()
            .filter(|id| !by_business.contains_key(*id))
            .map(|id| id.to_string())
            .collect();

        let duplicates = by_business
            .iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(business_id, ids)| {
                let mut rank_ids = ids.clone();
                rank_ids.sort();
                DuplicateRanks {
                    business_id: business_id.to_string(),
                    rank_ids,
                }
            })
            .collect();

        let mut orphaned: Vec<String> = by_business
            .iter()
            .filter(|(business_id, _)| !business_ids.contains(*business_id))
            .flat_map(|(_, ids)| ids.iter().cloned())
            .collect();
        orphaned.sort();

        let report = AuditReport {
            business_count: businesses.len(),
            rank_count: ranks.len(),
            missing,
            duplicates,
            orphaned,
        };

        tracing::info!(
            "Audit finished: {} missing, {} duplicated, {} orphaned",
            report.missing.len(),
            report.duplicates.len(),
            report.orphaned.len()
        );

        Ok(report)
    }
}

fn rank_label(rank: &ReferralRank) -> String {
    rank.id
        .clone()
        .unwrap_or_else(|| UNSAVED_RANK_ID.to_string())
}
