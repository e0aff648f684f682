//! In-memory implementation of the store ports
//!
//! Backs `--snapshot` runs against a local JSON export and the use-case
//! tests. Failures can be injected per business or per rank id.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tokio::sync::Mutex;
use uuid::Uuid;

use giftdeck::{
    Account, AccountRepository, AccountRole, DomainError, RankRepository, ReferralLinks,
    ReferralRank,
};

/// On-disk snapshot layout: `{"accounts": [...], "ranks": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub ranks: Vec<ReferralRank>,
}

impl Snapshot {
    /// Read a snapshot file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot from {:?}", path))?;
        let snapshot: Snapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot {:?}", path))?;
        Ok(snapshot)
    }

    /// Write the snapshot back as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize snapshot")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write snapshot to {:?}", path))?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct FailurePlan {
    account_query: bool,
    lookup: HashSet<String>,
    insert: HashSet<String>,
    update: HashSet<String>,
}

/// Document store held in memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    accounts: Mutex<Vec<Account>>,
    ranks: Mutex<Vec<ReferralRank>>,
    failures: FailurePlan,
}

impl InMemoryStore {
    /// Seed the store from a snapshot; ranks without an id get one
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let ranks = snapshot
            .ranks
            .into_iter()
            .map(|rank| match rank.id {
                Some(_) => rank,
                None => rank.with_id(Uuid::new_v4().to_string()),
            })
            .collect();

        Self {
            accounts: Mutex::new(snapshot.accounts),
            ranks: Mutex::new(ranks),
            failures: FailurePlan::default(),
        }
    }

    /// Current contents as a snapshot
    pub async fn snapshot(&self) -> Snapshot {
        Snapshot {
            accounts: self.accounts.lock().await.clone(),
            ranks: self.ranks.lock().await.clone(),
        }
    }
}

#[cfg(test)]
impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        Self::from_snapshot(Snapshot {
            accounts,
            ranks: Vec::new(),
        })
    }

    /// Make every account query fail
    pub fn fail_account_query(mut self) -> Self {
        self.failures.account_query = true;
        self
    }

    /// Make rank lookups for this business fail
    pub fn fail_lookup_for(mut self, business_id: &str) -> Self {
        self.failures.lookup.insert(business_id.to_string());
        self
    }

    /// Make rank inserts for this business fail
    pub fn fail_insert_for(mut self, business_id: &str) -> Self {
        self.failures.insert.insert(business_id.to_string());
        self
    }

    /// Make link updates for this rank id fail
    pub fn fail_update_for(mut self, rank_id: &str) -> Self {
        self.failures.update.insert(rank_id.to_string());
        self
    }

    pub async fn ranks(&self) -> Vec<ReferralRank> {
        self.ranks.lock().await.clone()
    }

    /// Add a rank directly, bypassing failure injection
    pub async fn seed_rank(&self, rank: ReferralRank) -> String {
        let id = rank.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
        self.ranks.lock().await.push(rank.with_id(id.clone()));
        id
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn find_by_role(&self, role: &AccountRole) -> Result<Vec<Account>, DomainError> {
        if self.failures.account_query {
            return Err(DomainError::Repository(
                "injected account query failure".to_string(),
            ));
        }

        let accounts = self.accounts.lock().await;
        Ok(accounts
            .iter()
            .filter(|account| &account.role == role)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RankRepository for InMemoryStore {
    async fn find_by_business_and_name(
        &self,
        business_id: &str,
        name: &str,
    ) -> Result<Vec<ReferralRank>, DomainError> {
        if self.failures.lookup.contains(business_id) {
            return Err(DomainError::Repository(format!(
                "injected lookup failure for {}",
                business_id
            )));
        }

        let ranks = self.ranks.lock().await;
        Ok(ranks
            .iter()
            .filter(|rank| rank.business_id == business_id && rank.name == name)
            .cloned()
            .collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<ReferralRank>, DomainError> {
        let ranks = self.ranks.lock().await;
        Ok(ranks.iter().filter(|rank| rank.name == name).cloned().collect())
    }

    async fn insert(&self, rank: &ReferralRank) -> Result<String, DomainError> {
        if self.failures.insert.contains(&rank.business_id) {
            return Err(DomainError::Repository(format!(
                "injected insert failure for {}",
                rank.business_id
            )));
        }

        let id = Uuid::new_v4().to_string();
        self.ranks
            .lock()
            .await
            .push(rank.clone().with_id(id.clone()));
        Ok(id)
    }

    async fn update_links(
        &self,
        id: &str,
        links: &ReferralLinks,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if self.failures.update.contains(id) {
            return Err(DomainError::Repository(format!(
                "injected update failure for {}",
                id
            )));
        }

        let mut ranks = self.ranks.lock().await;
        let rank = ranks
            .iter_mut()
            .find(|rank| rank.id.as_deref() == Some(id))
            .ok_or_else(|| DomainError::not_found("ReferralRank", id))?;

        rank.signup_link = links.signup_link.clone();
        rank.qr_code_url = links.qr_code_url.clone();
        rank.updated_at = updated_at;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn business(id: &str) -> Account {
        Account::new(id, AccountRole::Business)
    }

    #[tokio::test]
    async fn test_find_by_role_filters() {
        let store = InMemoryStore::with_accounts(vec![
            business("b1"),
            Account::new("c1", AccountRole::Customer),
        ]);

        let found = store.find_by_role(&AccountRole::Business).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "b1");
    }

    #[tokio::test]
    async fn test_insert_assigns_id() {
        let store = InMemoryStore::new();
        let rank = ReferralRank::for_business(&business("b1"), Utc::now());

        let id = store.insert(&rank).await.unwrap();
        let found = store
            .find_by_business_and_name("b1", "Referral")
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_deref(), Some(id.as_str()));
    }

    #[tokio::test]
    async fn test_update_links_missing_rank() {
        let store = InMemoryStore::new();
        let links = ReferralLinks::build("https://giftdeck.app", "b1").unwrap();

        let err = store
            .update_links("nope", &links, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_snapshot_round_trip_through_file() {
        let dir = std::env::temp_dir().join(format!("giftdeck-snapshot-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("store.json");

        fs::write(
            &path,
            r#"{"accounts":[{"id":"b1","role":"Business","businessName":"Acme"}]}"#,
        )
        .unwrap();

        let store = InMemoryStore::from_snapshot(Snapshot::load(&path).unwrap());
        let rank = ReferralRank::for_business(&business("b1"), Utc::now());
        store.insert(&rank).await.unwrap();
        store.snapshot().await.save(&path).unwrap();

        let reloaded = Snapshot::load(&path).unwrap();
        assert_eq!(reloaded.accounts.len(), 1);
        assert_eq!(reloaded.ranks.len(), 1);
        assert!(reloaded.ranks[0].id.is_some());

        fs::remove_dir_all(&dir).unwrap();
    }
}
