//! Firestore implementation of AccountRepository

use async_trait::async_trait;
use std::sync::Arc;

use giftdeck::{Account, AccountRepository, AccountRole, DomainError};

use super::client::FirestoreClient;
use super::value::{Document, Filter, Value};

/// Reads accounts from the users collection
pub struct FirestoreAccountRepository {
    client: Arc<FirestoreClient>,
    collection: String,
}

impl FirestoreAccountRepository {
    pub fn new(client: Arc<FirestoreClient>, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
        }
    }
}

impl From<Document> for Account {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id().to_string(),
            role: AccountRole::from(doc.string("role").unwrap_or_default()),
            business_name: doc.string("businessName").map(String::from),
            name: doc.string("name").map(String::from),
            email: doc.string("email").map(String::from),
        }
    }
}

#[async_trait]
impl AccountRepository for FirestoreAccountRepository {
    async fn find_by_role(&self, role: &AccountRole) -> Result<Vec<Account>, DomainError> {
        let docs = self
            .client
            .run_query(
                &self.collection,
                Filter::equal("role", Value::string(role.as_str())),
            )
            .await?;

        Ok(docs.into_iter().map(Into::into).collect())
    }
}
