//! Course entity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    CourseId, OwnedByUser, Timestamp, UserId, ValidationError,
};

/// Publication status of a course.
///
/// Single source of truth for the status vocabulary; adapters map their
/// wire/storage representations through [`CourseStatus::parse`] and
/// [`CourseStatus::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    /// Being authored, not visible to students.
    Draft,
    /// Submitted for moderation.
    Review,
    /// Live and enrollable.
    Published,
}

impl CourseStatus {
    /// Parse a status from its storage representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "review" => Some(Self::Review),
            "published" => Some(Self::Published),
            _ => None,
        }
    }

    /// Storage representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Review => "review",
            Self::Published => "published",
        }
    }
}

/// A course offered on the marketplace.
///
/// Owned exclusively by its instructor; admins have override rights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub instructor_id: UserId,
    pub title: String,
    pub description: Option<String>,
    /// Price in major currency units; zero or negative means free.
    pub price: Decimal,
    pub status: CourseStatus,
    pub created_at: Timestamp,
}

impl Course {
    /// Creates a new draft course.
    pub fn new(
        instructor_id: UserId,
        title: impl Into<String>,
        price: Decimal,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if price.is_sign_negative() && !price.is_zero() {
            return Err(ValidationError::negative("price", price.to_string()));
        }

        Ok(Self {
            id: CourseId::new(),
            instructor_id,
            title,
            description: None,
            price,
            status: CourseStatus::Draft,
            created_at: Timestamp::now(),
        })
    }

    /// Returns true if enrolling in this course requires no payment.
    pub fn is_free(&self) -> bool {
        self.price <= Decimal::ZERO
    }
}

impl OwnedByUser for Course {
    fn owner_id(&self) -> &UserId {
        &self.instructor_id
    }
}
