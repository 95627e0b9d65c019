//! Authentication types for the domain layer.
//!
//! These types represent an authenticated principal extracted from a JWT
//! token. They have **no provider dependencies** - the HTTP middleware
//! populates them from the token claims.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::UserId;

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A learner who enrolls in courses.
    Student,
    /// A course author who owns courses and lessons.
    Instructor,
    /// A moderator with override rights over all resources.
    Admin,
}

impl Role {
    /// Parse a role from its wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Self::Student),
            "instructor" => Some(Self::Instructor),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Wire representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Instructor => "instructor",
            Self::Admin => "admin",
        }
    }
}

/// Authenticated principal extracted from a validated token.
#[derive(Debug, Clone)]
pub struct Actor {
    /// The unique user identifier.
    pub id: UserId,

    /// The user's role.
    pub role: Role,
}

impl Actor {
    /// Creates a new actor.
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Returns true if this actor has the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The token carries a role this system does not recognize.
    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_roundtrip() {
        for role in [Role::Student, Role::Instructor, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn role_parse_rejects_unknown() {
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn is_admin_only_for_admin_role() {
        assert!(Actor::new(UserId::new(), Role::Admin).is_admin());
        assert!(!Actor::new(UserId::new(), Role::Student).is_admin());
        assert!(!Actor::new(UserId::new(), Role::Instructor).is_admin());
    }
}
