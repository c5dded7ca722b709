use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A plan catalog entry from `GET /subscriptions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub duration: String,
}

/// One of the user's subscriptions from `GET /user/subscriptions`.
/// Status is one of `active`, `expired`, or `cancelled`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSubscription {
    pub id: i64,
    pub user_id: i64,
    pub subscription_id: i64,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl UserSubscription {
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}
