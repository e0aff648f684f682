//! Referral Link Service (Use Case)
//!
//! Populates signup links and QR code URLs on referral ranks that were
//! provisioned with empty ones. Ranks that already have a link are left
//! untouched.

use std::sync::Arc;

use giftdeck::{
    Clock, DomainError, RankRepository, ReferralLinks, ReferralRank, SystemClock,
    REFERRAL_RANK_NAME,
};

/// Per-rank failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFailure {
    pub rank_id: String,
    pub business_id: String,
    pub error: String,
}

/// Result of one link-fill pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSummary {
    pub total: usize,
    /// Ranks updated (or planned, on a dry run)
    pub updated: usize,
    pub already_set: usize,
    pub failures: Vec<LinkFailure>,
    pub dry_run: bool,
}

/// Application service for referral link generation
pub struct ReferralLinkService<R: RankRepository> {
    ranks: Arc<R>,
    clock: Arc<dyn Clock>,
    dry_run: bool,
}

impl<R: RankRepository> ReferralLinkService<R> {
    pub fn new(ranks: Arc<R>) -> Self {
        Self {
            ranks,
            clock: Arc::new(SystemClock),
            dry_run: false,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Fill links on every referral rank that lacks one.
    ///
    /// An invalid base URL or a failed rank listing aborts the pass.
    pub async fn fill_links(&self, app_base_url: &str) -> Result<LinkSummary, DomainError> {
        ReferralLinks::validate_base_url(app_base_url)?;

        let ranks = self.ranks.find_by_name(REFERRAL_RANK_NAME).await?;
        let mut summary = LinkSummary {
            total: ranks.len(),
            dry_run: self.dry_run,
            ..LinkSummary::default()
        };

        for rank in &ranks {
            if !rank.needs_links() {
                summary.already_set += 1;
                continue;
            }

            match self.fill_one(rank, app_base_url).await {
                Ok(()) => summary.updated += 1,
                Err(e) => {
                    let rank_id = rank.id.clone().unwrap_or_default();
                    tracing::error!(
                        business_id = %rank.business_id,
                        "Failed to set links on rank {}: {}",
                        rank_id,
                        e
                    );
                    summary.failures.push(LinkFailure {
                        rank_id,
                        business_id: rank.business_id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Link fill finished: {} ranks, {} updated, {} already set, {} failed",
            summary.total,
            summary.updated,
            summary.already_set,
            summary.failures.len()
        );

        Ok(summary)
    }

    async fn fill_one(&self, rank: &ReferralRank, app_base_url: &str) -> Result<(), DomainError> {
        let id = rank
            .id
            .as_deref()
            .ok_or_else(|| DomainError::Validation("rank has no id".to_string()))?;
        let links = ReferralLinks::build(app_base_url, &rank.business_id)?;

        if self.dry_run {
            tracing::info!(business_id = %rank.business_id, "Would set {}", links.signup_link);
            return Ok(());
        }

        self.ranks
            .update_links(id, &links, self.clock.now())
            .await?;
        tracing::info!(business_id = %rank.business_id, "Set {}", links.signup_link);
        Ok(())
    }
}
