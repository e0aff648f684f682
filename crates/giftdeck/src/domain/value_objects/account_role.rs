//! AccountRole - Portal account roles

use serde::{Deserialize, Serialize};

/// Role stored on an account document.
///
/// Roles the tooling does not know about are kept verbatim in `Other`
/// so that reading a store with extra roles never fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountRole {
    Business,
    Customer,
    Admin,
    Other(String),
}

impl AccountRole {
    pub fn as_str(&self) -> &str {
        match self {
            AccountRole::Business => "Business",
            AccountRole::Customer => "Customer",
            AccountRole::Admin => "Admin",
            AccountRole::Other(role) => role,
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for AccountRole {
    fn from(s: &str) -> Self {
        match s {
            "Business" => AccountRole::Business,
            "Customer" => AccountRole::Customer,
            "Admin" => AccountRole::Admin,
            other => AccountRole::Other(other.to_string()),
        }
    }
}

impl From<String> for AccountRole {
    fn from(s: String) -> Self {
        AccountRole::from(s.as_str())
    }
}

impl From<AccountRole> for String {
    fn from(role: AccountRole) -> Self {
        role.as_str().to_string()
    }
}
