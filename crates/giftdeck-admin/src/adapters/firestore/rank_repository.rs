//! Firestore implementation of RankRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use giftdeck::{DomainError, RankRepository, ReferralLinks, ReferralRank};

use super::client::{FirestoreClient, FirestoreError};
use super::value::{Document, Filter, Value};

/// Reads and writes reward-rank documents
pub struct FirestoreRankRepository {
    client: Arc<FirestoreClient>,
    collection: String,
}

impl FirestoreRankRepository {
    pub fn new(client: Arc<FirestoreClient>, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
        }
    }
}

fn rank_fields(rank: &ReferralRank) -> HashMap<String, Value> {
    HashMap::from([
        ("name".to_string(), Value::string(&rank.name)),
        ("businessId".to_string(), Value::string(&rank.business_id)),
        (
            "businessReferenceCode".to_string(),
            Value::string(&rank.business_reference_code),
        ),
        ("benefits".to_string(), Value::string(&rank.benefits)),
        ("isActive".to_string(), Value::BooleanValue(rank.is_active)),
        ("qrCodeUrl".to_string(), Value::string(&rank.qr_code_url)),
        ("signupLink".to_string(), Value::string(&rank.signup_link)),
        ("createdAt".to_string(), Value::TimestampValue(rank.created_at)),
        ("updatedAt".to_string(), Value::TimestampValue(rank.updated_at)),
    ])
}

fn link_fields(links: &ReferralLinks, updated_at: DateTime<Utc>) -> HashMap<String, Value> {
    HashMap::from([
        ("qrCodeUrl".to_string(), Value::string(&links.qr_code_url)),
        ("signupLink".to_string(), Value::string(&links.signup_link)),
        ("updatedAt".to_string(), Value::TimestampValue(updated_at)),
    ])
}

impl TryFrom<Document> for ReferralRank {
    type Error = FirestoreError;

    fn try_from(doc: Document) -> Result<Self, Self::Error> {
        let malformed = |reason: &str| FirestoreError::Malformed {
            id: doc.id().to_string(),
            reason: reason.to_string(),
        };

        let business_id = doc
            .string("businessId")
            .ok_or_else(|| malformed("missing businessId"))?;
        let created_at = doc
            .timestamp("createdAt")
            .or(doc.create_time)
            .ok_or_else(|| malformed("missing createdAt"))?;
        let updated_at = doc
            .timestamp("updatedAt")
            .or(doc.update_time)
            .unwrap_or(created_at);

        Ok(Self {
            id: Some(doc.id().to_string()),
            name: doc.string("name").unwrap_or_default().to_string(),
            business_id: business_id.to_string(),
            business_reference_code: doc
                .string("businessReferenceCode")
                .unwrap_or_default()
                .to_string(),
            benefits: doc.string("benefits").unwrap_or_default().to_string(),
            is_active: doc.boolean("isActive").unwrap_or(false),
            qr_code_url: doc.string("qrCodeUrl").unwrap_or_default().to_string(),
            signup_link: doc.string("signupLink").unwrap_or_default().to_string(),
            created_at,
            updated_at,
        })
    }
}

fn into_ranks(docs: Vec<Document>) -> Result<Vec<ReferralRank>, DomainError> {
    docs.into_iter()
        .map(|doc| ReferralRank::try_from(doc).map_err(DomainError::from))
        .collect()
}

#[async_trait]
impl RankRepository for FirestoreRankRepository {
    async fn find_by_business_and_name(
        &self,
        business_id: &str,
        name: &str,
    ) -> Result<Vec<ReferralRank>, DomainError> {
        let filter = Filter::and(vec![
            Filter::equal("businessId", Value::string(business_id)),
            Filter::equal("name", Value::string(name)),
        ]);
        let docs = self.client.run_query(&self.collection, filter).await?;

        into_ranks(docs)
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<ReferralRank>, DomainError> {
        let docs = self
            .client
            .run_query(&self.collection, Filter::equal("name", Value::string(name)))
            .await?;

        into_ranks(docs)
    }

    async fn insert(&self, rank: &ReferralRank) -> Result<String, DomainError> {
        let doc = self
            .client
            .create_document(&self.collection, rank_fields(rank))
            .await?;

        Ok(doc.id().to_string())
    }

    async fn update_links(
        &self,
        id: &str,
        links: &ReferralLinks,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.client
            .patch_document(&self.collection, id, link_fields(links, updated_at))
            .await?;

        Ok(())
    }
}
