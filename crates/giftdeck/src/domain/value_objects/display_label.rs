//! DisplayLabel - Human-readable business label

use crate::domain::entities::Account;

/// Label used when an account carries neither a business name nor a name
pub const DEFAULT_BUSINESS_LABEL: &str = "Business";

/// Resolved display label for an account.
///
/// Candidates are tried in order: `businessName`, `name`, then
/// [`DEFAULT_BUSINESS_LABEL`]. A candidate counts only when it is set and
/// non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLabel(String);

impl DisplayLabel {
    /// First present value among the ordered candidates, or the default
    pub fn resolve<'a, I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let label = candidates
            .into_iter()
            .flatten()
            .find(|value| !value.is_empty())
            .unwrap_or(DEFAULT_BUSINESS_LABEL);
        Self(label.to_string())
    }

    pub fn for_account(account: &Account) -> Self {
        Self::resolve([account.business_name.as_deref(), account.name.as_deref()])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for DisplayLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
