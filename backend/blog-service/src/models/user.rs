use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i32>,
    pub profile_image: Option<String>,
    pub role: String,
    /// Oldest bookmark first
    pub bookmarked_blogs: Vec<Uuid>,
    pub password_changed_at: Option<DateTime<Utc>>,
    /// Bumped on every password change; tokens carry the value they were issued under
    pub token_version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Unknown role strings fall back to the least privileged role
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or(Role::User)
    }

    /// True when a token issued under `version` predates the latest password change
    pub fn token_revoked(&self, version: i32) -> bool {
        version != self.token_version
    }
}

/// The caller's own account, as returned by auth endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i32>,
    pub profile_image: Option<String>,
    pub role: Role,
    pub bookmarked_blogs: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            age: user.age,
            profile_image: user.profile_image.clone(),
            role: user.role(),
            bookmarked_blogs: user.bookmarked_blogs.clone(),
            created_at: user.created_at,
        }
    }
}

/// Another user as seen by everyone else
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str, token_version: i32) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "reader".into(),
            email: "reader@example.com".into(),
            password_hash: "$argon2id$...".into(),
            first_name: "Rea".into(),
            last_name: "Der".into(),
            age: None,
            profile_image: None,
            role: role.into(),
            bookmarked_blogs: vec![],
            password_changed_at: None,
            token_version,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_roles() {
        assert_eq!(user("admin", 0).role(), Role::Admin);
        assert_eq!(user("user", 0).role(), Role::User);
        assert_eq!(user("superuser", 0).role(), Role::User);
    }

    #[test]
    fn test_token_revoked() {
        let u = user("user", 2);

        assert!(u.token_revoked(0));
        assert!(u.token_revoked(1));
        assert!(!u.token_revoked(2));
        assert!(!user("user", 0).token_revoked(0));
    }

    #[test]
    fn test_profile_hides_password_hash() {
        let json = serde_json::to_value(UserProfile::from(&user("user", 0))).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "user");
        assert!(json["bookmarkedBlogs"].is_array());
    }
}
