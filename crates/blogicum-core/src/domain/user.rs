use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - a registered author or commenter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable profile fields, shared by registration and profile edit.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(profile: Profile, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: profile.username,
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email,
            password_hash,
            is_staff: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the profile fields, leaving identity and credentials untouched.
    pub fn apply_profile(&mut self, profile: Profile) {
        self.username = profile.username;
        self.first_name = profile.first_name;
        self.last_name = profile.last_name;
        self.email = profile.email;
        self.updated_at = Utc::now();
    }

    pub fn roles(&self) -> Vec<String> {
        let mut roles = vec!["user".to_string()];
        if self.is_staff {
            roles.push("staff".to_string());
        }
        roles
    }
}

/// The slice of a user shown next to their content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: Uuid,
    pub username: String,
}

impl From<&User> for AuthorRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}
