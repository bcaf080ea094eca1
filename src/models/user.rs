//! User model

use serde::{Deserialize, Serialize};

/// A user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Database ID
    pub id: i64,
    /// Username
    pub username: String,
    /// Password hash (not serialized to JSON)
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Administrator flag
    pub is_admin: bool,
}

impl User {
    /// Self-targeting is always allowed; anything else needs the admin flag
    pub fn may_manage(&self, target_id: i64) -> bool {
        self.is_admin || self.id == target_id
    }

    /// Serialize without password (for API responses)
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            is_admin: self.is_admin,
        }
    }
}

/// Public user info (no password)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub is_admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_never_serialized() {
        let user = User {
            id: 3,
            username: "alice".to_string(),
            password: "pbkdf2_sha256$secret".to_string(),
            is_admin: false,
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("alice"));
    }
}
