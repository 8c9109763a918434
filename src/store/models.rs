//! # Record Models
//!
//! Persisted record shapes and the payloads used to create or update them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The four record kinds held by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Beer,
    Brewery,
    Picture,
    User,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Beer => "Beer",
            RecordKind::Brewery => "Brewery",
            RecordKind::Picture => "Picture",
            RecordKind::User => "User",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==================
// Brewery
// ==================

/// A brewery with references to its profile and banner pictures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brewery {
    pub id: u64,
    pub name: String,
    pub address: String,
    pub profile_picture_id: u64,
    pub banner_picture_id: u64,
}

/// Brewery as returned by a single read, with its view count merged in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreweryDetails {
    #[serde(flatten)]
    pub brewery: Brewery,

    /// Absent when the counter store could not be reached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
}

/// Brewery fields with explicit picture ids
#[derive(Debug, Clone, Deserialize)]
pub struct BreweryInput {
    pub name: String,
    pub address: String,
    pub profile_picture_id: u64,
    pub banner_picture_id: u64,
}

/// Brewery creation from two picture references
///
/// The pictures are stored first, then the brewery pointing at them.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBrewery {
    pub name: String,
    pub address: String,
    pub profile_picture: String,
    pub banner_picture: String,
}

// ==================
// Picture
// ==================

/// A stored picture reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Picture {
    pub id: u64,
    /// Opaque external storage reference
    pub data: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PictureInput {
    pub data: String,
}

// ==================
// Beer
// ==================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beer {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub brewery_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BeerInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub brewery_id: u64,
}

// ==================
// User
// ==================

/// User account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub role: String,

    /// Argon2id hash (never plaintext, never serialized)
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
}

/// User update; the password is re-hashed only when supplied
#[derive(Debug, Clone, Deserialize)]
pub struct UserUpdate {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
}

fn default_role() -> String {
    "user".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn brewery() -> Brewery {
        Brewery {
            id: 1,
            name: "Brewdog".to_string(),
            address: "123 Fake St, London".to_string(),
            profile_picture_id: 1,
            banner_picture_id: 2,
        }
    }

    #[test]
    fn test_details_flatten_brewery_fields() {
        let details = BreweryDetails {
            brewery: brewery(),
            views: Some(4),
        };

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["name"], "Brewdog");
        assert_eq!(json["views"], 4);
    }

    #[test]
    fn test_details_omit_missing_views() {
        let details = BreweryDetails {
            brewery: brewery(),
            views: None,
        };

        let json = serde_json::to_value(&details).unwrap();
        assert!(json.get("views").is_none());

        let back: BreweryDetails = serde_json::from_value(json).unwrap();
        assert_eq!(back.views, None);
    }

    #[test]
    fn test_user_hash_never_serialized() {
        let user = User {
            id: 1,
            username: "terry".to_string(),
            email: "terry@example.com".to_string(),
            role: "admin".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_new_user_default_role() {
        let user: NewUser = serde_json::from_value(json!({
            "username": "a",
            "email": "a@b.c",
            "password": "password1"
        }))
        .unwrap();
        assert_eq!(user.role, "user");
    }
}
