//! Account and profile records.

use serde::{Deserialize, Serialize};

/// Role string the backend assigns to administrators.
pub const ADMIN_ROLE: &str = "ADMIN";
/// Role string requested for self-registered accounts.
pub const DEFAULT_USER_ROLE: &str = "USUARIO";

/// Backend account record. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub role: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Back-reference from a profile to its owning account.
///
/// The backend either returns the bare account id or a populated summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileOwner {
    Id(String),
    Summary {
        #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        email: String,
        #[serde(rename = "nombre")]
        name: String,
    },
}

impl ProfileOwner {
    /// Owner email when the backend populated it.
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Summary { email, .. } => Some(email.as_str()),
        }
    }
}

/// Editable user profile. Updates always send the full record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "user")]
    pub owner: ProfileOwner,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "telefono", default)]
    pub phone: String,
    #[serde(rename = "preferencias", default)]
    pub preferences: Vec<String>,
    #[serde(rename = "avatar", default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}
