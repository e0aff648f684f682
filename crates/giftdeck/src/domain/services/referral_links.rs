//! Referral link and QR code URL construction

use crate::domain::errors::DomainError;

/// Third-party QR code image endpoint
pub const QR_CODE_API: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Rendered QR code edge length in pixels
pub const QR_CODE_SIZE: u32 = 300;

/// Signup link and matching QR code image URL for one business
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralLinks {
    pub signup_link: String,
    pub qr_code_url: String,
}

impl ReferralLinks {
    /// Builds `{app_base_url}/signup?ref={business_id}` and its QR code URL
    pub fn build(app_base_url: &str, business_id: &str) -> Result<Self, DomainError> {
        let base = Self::validate_base_url(app_base_url)?;
        if business_id.is_empty() {
            return Err(DomainError::Validation(
                "business id must not be empty".to_string(),
            ));
        }

        let signup_link = format!(
            "{}/signup?ref={}",
            base,
            urlencoding::encode(business_id)
        );
        let qr_code_url = qr_code_url(&signup_link);

        Ok(Self {
            signup_link,
            qr_code_url,
        })
    }

    /// Checks the portal URL and returns it without trailing slashes
    pub fn validate_base_url(app_base_url: &str) -> Result<&str, DomainError> {
        let base = app_base_url.trim_end_matches('/');
        if base.starts_with("https://") || base.starts_with("http://") {
            Ok(base)
        } else {
            Err(DomainError::Validation(format!(
                "app base URL must be http(s): {}",
                app_base_url
            )))
        }
    }
}

/// QR code image URL encoding `data`
pub fn qr_code_url(data: &str) -> String {
    format!(
        "{}?size={}x{}&data={}",
        QR_CODE_API,
        QR_CODE_SIZE,
        QR_CODE_SIZE,
        urlencoding::encode(data)
    )
}
