use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Account profile as returned by the registration endpoint.
///
/// Login does not return a profile; the session keeps this unset until
/// a caller populates it out of band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}
