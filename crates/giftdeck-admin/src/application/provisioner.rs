//! Referral Rank Provisioner (Use Case)
//!
//! Makes sure every business account has exactly one "Referral" rank.
//! Accounts are processed one at a time; a failure on one account is logged
//! and counted without stopping the pass. Check-then-insert is not atomic,
//! so two provisioners running at once can both create a rank for the same
//! business (see `ReferralAuditor`).

use std::sync::Arc;

use giftdeck::{
    Account, AccountRepository, AccountRole, Clock, DomainError, RankRepository, ReferralRank,
    SystemClock, REFERRAL_RANK_NAME,
};

/// What happened to one business account
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// Rank inserted with this id
    Created(String),
    /// Dry run: a rank would have been inserted
    WouldCreate,
    /// A referral rank already exists
    Skipped,
}

/// Per-account failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionFailure {
    pub business_id: String,
    pub error: String,
}

/// Result of one provisioning pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionSummary {
    /// Business accounts found
    pub total: usize,
    /// Ranks inserted (or planned, on a dry run)
    pub created: usize,
    pub skipped: usize,
    pub failures: Vec<ProvisionFailure>,
    pub dry_run: bool,
}

impl ProvisionSummary {
    /// Accounts that neither got nor already had a rank
    pub fn failed(&self) -> usize {
        self.total - self.created - self.skipped
    }
}

/// Application service for referral provisioning
pub struct ReferralProvisioner<A: AccountRepository, R: RankRepository> {
    accounts: Arc<A>,
    ranks: Arc<R>,
    clock: Arc<dyn Clock>,
    dry_run: bool,
}

impl<A: AccountRepository, R: RankRepository> ReferralProvisioner<A, R> {
    pub fn new(accounts: Arc<A>, ranks: Arc<R>) -> Self {
        Self {
            accounts,
            ranks,
            clock: Arc::new(SystemClock),
            dry_run: false,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Decide and report without inserting
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Provision a referral rank for every business account.
    ///
    /// Fails only when the business accounts cannot be listed.
    pub async fn provision_all(&self) -> Result<ProvisionSummary, DomainError> {
        let businesses = self.accounts.find_by_role(&AccountRole::Business).await?;

        tracing::info!("Found {} business accounts", businesses.len());

        let mut summary = ProvisionSummary {
            total: businesses.len(),
            dry_run: self.dry_run,
            ..ProvisionSummary::default()
        };

        for business in &businesses {
            match self.provision_one(business).await {
                Ok(ProvisionOutcome::Created(rank_id)) => {
                    tracing::info!(
                        business_id = %business.id,
                        "Created referral rank {} ({})",
                        rank_id,
                        business.display_label()
                    );
                    summary.created += 1;
                }
                Ok(ProvisionOutcome::WouldCreate) => summary.created += 1,
                Ok(ProvisionOutcome::Skipped) => summary.skipped += 1,
                Err(e) => {
                    tracing::error!(
                        business_id = %business.id,
                        "Failed to provision referral rank: {}",
                        e
                    );
                    summary.failures.push(ProvisionFailure {
                        business_id: business.id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Provisioning finished: {} total, {} created, {} skipped, {} failed",
            summary.total,
            summary.created,
            summary.skipped,
            summary.failed()
        );

        Ok(summary)
    }

    /// Check for an existing referral rank and insert one if absent
    pub async fn provision_one(&self, business: &Account) -> Result<ProvisionOutcome, DomainError> {
        let existing = self
            .ranks
            .find_by_business_and_name(&business.id, REFERRAL_RANK_NAME)
            .await?;

        if !existing.is_empty() {
            tracing::debug!(business_id = %business.id, "Referral rank exists, skipping");
            return Ok(ProvisionOutcome::Skipped);
        }

        let rank = ReferralRank::for_business(business, self.clock.now());

        if self.dry_run {
            tracing::info!(
                business_id = %business.id,
                "Would create referral rank ({})",
                rank.business_reference_code
            );
            return Ok(ProvisionOutcome::WouldCreate);
        }

        let id = self.ranks.insert(&rank).await?;
        Ok(ProvisionOutcome::Created(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryStore;
    use chrono::{TimeZone, Utc};
    use giftdeck::{FixedClock, REFERRAL_BENEFITS};

    fn business(id: &str) -> Account {
        Account::new(id, AccountRole::Business)
    }

    fn provisioner(store: &Arc<InMemoryStore>) -> ReferralProvisioner<InMemoryStore, InMemoryStore> {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        ReferralProvisioner::new(store.clone(), store.clone()).with_clock(Arc::new(FixedClock(now)))
    }

    async fn referral_ranks_for(store: &InMemoryStore, business_id: &str) -> Vec<ReferralRank> {
        store
            .find_by_business_and_name(business_id, REFERRAL_RANK_NAME)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_creates_rank_with_expected_fields() {
        let store = Arc::new(InMemoryStore::with_accounts(vec![
            business("b1").with_business_name("Acme")
        ]));

        let summary = provisioner(&store).provision_all().await.unwrap();
        assert_eq!(summary.created, 1);

        let ranks = referral_ranks_for(&store, "b1").await;
        assert_eq!(ranks.len(), 1);
        let rank = &ranks[0];
        assert_eq!(rank.business_id, "b1");
        assert_eq!(rank.name, "Referral");
        assert_eq!(rank.business_reference_code, "Acme");
        assert_eq!(rank.benefits, REFERRAL_BENEFITS);
        assert!(rank.is_active);
        assert_eq!(rank.qr_code_url, "");
        assert_eq!(rank.signup_link, "");
        assert_eq!(rank.created_at, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        assert_eq!(rank.created_at, rank.updated_at);
    }

    #[tokio::test]
    async fn test_fallback_label_when_no_names() {
        let store = Arc::new(InMemoryStore::with_accounts(vec![business("b2")]));

        provisioner(&store).provision_all().await.unwrap();

        let ranks = referral_ranks_for(&store, "b2").await;
        assert_eq!(ranks[0].business_reference_code, "Business");
    }

    #[tokio::test]
    async fn test_second_run_is_noop() {
        let store = Arc::new(InMemoryStore::with_accounts(vec![
            business("b1"),
            business("b2"),
            business("b3"),
        ]));
        let service = provisioner(&store);

        let first = service.provision_all().await.unwrap();
        assert_eq!(first.created, 3);
        let after_first = store.ranks().await;

        let second = service.provision_all().await.unwrap();
        assert_eq!(second.total, 3);
        assert_eq!(second.created, 0);
        assert_eq!(second.skipped, 3);
        assert_eq!(second.failed(), 0);
        assert_eq!(store.ranks().await, after_first);
    }

    #[tokio::test]
    async fn test_every_business_gets_exactly_one_rank() {
        let store = Arc::new(InMemoryStore::with_accounts(vec![
            business("b1"),
            business("b2"),
        ]));
        store
            .seed_rank(ReferralRank::for_business(&business("b1"), Utc::now()))
            .await;

        provisioner(&store).provision_all().await.unwrap();

        assert_eq!(referral_ranks_for(&store, "b1").await.len(), 1);
        assert_eq!(referral_ranks_for(&store, "b2").await.len(), 1);
    }

    #[tokio::test]
    async fn test_non_business_accounts_ignored() {
        let store = Arc::new(InMemoryStore::with_accounts(vec![
            business("b1"),
            Account::new("c1", AccountRole::Customer).with_name("Cara"),
            Account::new("a1", AccountRole::Admin),
            Account::new("x1", AccountRole::from("business")),
        ]));

        let summary = provisioner(&store).provision_all().await.unwrap();

        assert_eq!(summary.total, 1);
        assert_eq!(store.ranks().await.len(), 1);
        assert!(referral_ranks_for(&store, "c1").await.is_empty());
        assert!(referral_ranks_for(&store, "x1").await.is_empty());
    }

    #[tokio::test]
    async fn test_failure_on_one_account_does_not_block_others() {
        let store = Arc::new(
            InMemoryStore::with_accounts(vec![business("x"), business("y"), business("z")])
                .fail_lookup_for("x")
                .fail_insert_for("z"),
        );

        let summary = provisioner(&store).provision_all().await.unwrap();

        assert_eq!(referral_ranks_for(&store, "y").await.len(), 1);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.failed(), 2);
        let mut failed: Vec<_> = summary
            .failures
            .iter()
            .map(|f| f.business_id.as_str())
            .collect();
        failed.sort();
        assert_eq!(failed, vec!["x", "z"]);
    }

    #[tokio::test]
    async fn test_summary_accounting() {
        let store = Arc::new(
            InMemoryStore::with_accounts(
                ["b1", "b2", "b3", "b4", "b5"]
                    .into_iter()
                    .map(business)
                    .collect(),
            )
            .fail_insert_for("b5"),
        );
        for id in ["b1", "b2"] {
            store
                .seed_rank(ReferralRank::for_business(&business(id), Utc::now()))
                .await;
        }

        let summary = provisioner(&store).provision_all().await.unwrap();

        assert_eq!(summary.total, 5);
        assert_eq!(summary.created, 2);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].business_id, "b5");
    }

    #[tokio::test]
    async fn test_account_query_failure_is_fatal() {
        let store = Arc::new(InMemoryStore::with_accounts(vec![business("b1")]).fail_account_query());

        let result = provisioner(&store).provision_all().await;

        assert!(matches!(result, Err(DomainError::Repository(_))));
        assert!(store.ranks().await.is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let store = Arc::new(InMemoryStore::with_accounts(vec![
            business("b1"),
            business("b2"),
        ]));
        store
            .seed_rank(ReferralRank::for_business(&business("b1"), Utc::now()))
            .await;

        let summary = provisioner(&store)
            .with_dry_run(true)
            .provision_all()
            .await
            .unwrap();

        assert!(summary.dry_run);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(store.ranks().await.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = Arc::new(InMemoryStore::new());

        let summary = provisioner(&store).provision_all().await.unwrap();

        assert_eq!(summary, ProvisionSummary::default());
    }
}
