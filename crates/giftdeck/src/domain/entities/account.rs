//! Account - Portal user record
//!
//! Owned by the document store; the admin tooling only reads it.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{AccountRole, DisplayLabel};

/// Account - A customer, business or admin of the portal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Store-assigned document id
    pub id: String,
    pub role: AccountRole,
    /// Trading name, set for business accounts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    /// Generic display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Account {
    pub fn new(id: impl Into<String>, role: AccountRole) -> Self {
        Self {
            id: id.into(),
            role,
            business_name: None,
            name: None,
            email: None,
        }
    }

    /// Builder-style setter for the business name
    pub fn with_business_name(mut self, business_name: impl Into<String>) -> Self {
        self.business_name = Some(business_name.into());
        self
    }

    /// Builder-style setter for the generic name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn is_business(&self) -> bool {
        self.role == AccountRole::Business
    }

    /// Human-readable label: business name, then name, then "Business"
    pub fn display_label(&self) -> String {
        DisplayLabel::for_account(self).into_string()
    }
}
