use serde::{Deserialize, Serialize};

/// Checkout info returned when a payment is created.
///
/// The wire names carry the payment provider's branding; they are mapped
/// to neutral field names here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCheckout {
    pub payment_id: i64,
    #[serde(rename = "bkash_url")]
    pub checkout_url: Option<String>,
    #[serde(rename = "payment_id_bkash")]
    pub provider_payment_id: Option<String>,
    #[serde(default)]
    pub demo_mode: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Result of executing a payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub status: String,
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub demo_mode: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl PaymentOutcome {
    pub fn is_completed(&self) -> bool {
        self.status.eq_ignore_ascii_case("completed")
    }
}

/// Provider-side payment status from `GET /payment/status/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatus {
    #[serde(rename = "statusCode")]
    pub status_code: Option<String>,
    #[serde(rename = "statusMessage")]
    pub status_message: Option<String>,
    #[serde(rename = "paymentID")]
    pub payment_id: Option<String>,
    #[serde(rename = "trxID")]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub demo_mode: bool,
}

impl PaymentStatus {
    /// Provider code "0000" means the payment settled
    pub fn is_successful(&self) -> bool {
        self.status_code.as_deref() == Some("0000")
    }
}
