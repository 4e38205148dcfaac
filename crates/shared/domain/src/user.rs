//! User domain entity and related types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::{
    AVATAR_BACKGROUND, AVATAR_BASE_URL, DEFAULT_USER_COLOR, PRIMARY_ADMIN_ID, ROLE_ADMIN, ROLE_MEMBER,
};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    Member,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", ROLE_ADMIN),
            UserRole::Member => write!(f, "{}", ROLE_MEMBER),
        }
    }
}

/// User domain entity.
///
/// The password is kept in plain text; this app has no authentication
/// security model. `Debug` output redacts it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub avatar_url: String,
    pub role: UserRole,
    pub color: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

impl User {
    /// Build a freshly signed-up user with a generated avatar and default color
    pub fn new(id: String, name: String, email: String, password: String, role: UserRole) -> Self {
        let avatar_url = avatar_url(&name);
        Self {
            id,
            name,
            email,
            password,
            avatar_url,
            role,
            color: DEFAULT_USER_COLOR.to_string(),
        }
    }

    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check if this is the seeded primary administrator
    pub fn is_primary_admin(&self) -> bool {
        self.id == PRIMARY_ADMIN_ID
    }

    /// Update user's role
    pub fn update_role(&mut self, role: UserRole) {
        self.role = role;
    }

    /// Whether `identifier` names this user at login.
    ///
    /// Matches the full email or its local part (before `@`), both
    /// case-insensitively.
    pub fn matches_login(&self, identifier: &str) -> bool {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return false;
        }
        if self.email.eq_ignore_ascii_case(identifier) {
            return true;
        }
        let local_part = self.email.split('@').next().unwrap_or_default();
        local_part.eq_ignore_ascii_case(identifier)
    }

    /// Plain-text password comparison
    pub fn check_password(&self, password: &str) -> bool {
        self.password == password
    }
}

/// Deterministic avatar URL for a display name or seed
pub fn avatar_url(seed: &str) -> String {
    format!(
        "{}?seed={}&backgroundColor={}",
        AVATAR_BASE_URL,
        urlencoding::encode(seed),
        AVATAR_BACKGROUND
    )
}

/// Signup data transfer object
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    /// User display name
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// User email address (exact-match unique)
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// User password (stored as-is)
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// User response (safe to return to client, no password)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier
    pub id: String,
    /// User display name
    pub name: String,
    /// User email address
    pub email: String,
    /// Avatar image URL
    pub avatar_url: String,
    /// User role
    pub role: UserRole,
    /// Badge color classes
    pub color: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar_url: user.avatar_url,
            role: user.role,
            color: user.color,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse::from(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User::new(
            "u1".to_string(),
            "Ana Maria".to_string(),
            email.to_string(),
            "secret".to_string(),
            UserRole::Member,
        )
    }

    #[test]
    fn test_login_matches_full_email_case_insensitive() {
        let u = user("carlos@familia.com");
        assert!(u.matches_login("Carlos@Familia.com"));
        assert!(!u.matches_login("carlos@other.com"));
    }

    #[test]
    fn test_login_matches_local_part() {
        let u = user("carlos@familia.com");
        assert!(u.matches_login("carlos"));
        assert!(u.matches_login("CARLOS"));
        assert!(!u.matches_login("carl"));
    }

    #[test]
    fn test_login_matches_bare_identifier_email() {
        let u = user("admin");
        assert!(u.matches_login("admin"));
        assert!(u.matches_login("Admin"));
    }

    #[test]
    fn test_avatar_url_encodes_seed() {
        let url = avatar_url("Ana Maria");
        assert_eq!(
            url,
            "https://api.dicebear.com/7.x/avataaars/svg?seed=Ana%20Maria&backgroundColor=b6e3f4"
        );
        assert_eq!(url, avatar_url("Ana Maria"));
    }

    #[test]
    fn test_role_serializes_uppercase() {
        let json = serde_json::to_string(&UserRole::Admin).unwrap();
        assert_eq!(json, "\"ADMIN\"");
        let role: UserRole = serde_json::from_str("\"MEMBER\"").unwrap();
        assert_eq!(role, UserRole::Member);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(UserRole::Admin.to_string(), "ADMIN");
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Member.is_admin());
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", user("a@b.c"));
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_response_drops_password() {
        let json = serde_json::to_value(UserResponse::from(user("a@b.c"))).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["avatarUrl"], avatar_url("Ana Maria"));
    }
}
