//! ReferralRank - Reward tier tied to one business
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::Account;

/// Name shared by every referral rank record
pub const REFERRAL_RANK_NAME: &str = "Referral";

/// Benefits text written on newly provisioned referral ranks
pub const REFERRAL_BENEFITS: &str =
    "Earn rewards on gift card purchases made by customers you refer";

/// ReferralRank - one per business account
///
/// At most one rank named [`REFERRAL_RANK_NAME`] may exist per `business_id`.
/// The store does not enforce this; the provisioner checks before inserting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralRank {
    /// Store-assigned id, `None` until inserted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub business_id: String,
    /// Copy of the business display label at creation time
    pub business_reference_code: String,
    pub benefits: String,
    pub is_active: bool,
    #[serde(default)]
    pub qr_code_url: String,
    #[serde(default)]
    pub signup_link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReferralRank {
    /// Build the referral rank for a business account.
    ///
    /// Both timestamps take the single `now` value.
    pub fn for_business(business: &Account, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            name: REFERRAL_RANK_NAME.to_string(),
            business_id: business.id.clone(),
            business_reference_code: business.display_label(),
            benefits: REFERRAL_BENEFITS.to_string(),
            is_active: true,
            qr_code_url: String::new(),
            signup_link: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the rank with its store-assigned id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn is_referral(&self) -> bool {
        self.name == REFERRAL_RANK_NAME
    }

    /// Whether the signup link still needs to be populated
    pub fn needs_links(&self) -> bool {
        self.signup_link.is_empty()
    }
}
