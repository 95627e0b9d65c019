//! Ownership trait for user-owned resources.
//!
//! Instead of each aggregate implementing its own ad-hoc ownership check,
//! they implement this trait, which gives every handler the same method
//! names and the same `Forbidden` error shape.

use super::{DomainError, ErrorCode, UserId};

/// Trait for aggregates that have a single owner.
///
/// Implementors return the `UserId` of the owning user; the trait provides
/// default implementations for ownership checking.
pub trait OwnedByUser {
    /// Returns the ID of the user who owns this resource.
    fn owner_id(&self) -> &UserId;

    /// Checks if the given user is the owner.
    fn is_owner(&self, user_id: &UserId) -> bool {
        self.owner_id() == user_id
    }

    /// Validates ownership, returning an error if the user is not the owner.
    fn check_ownership(&self, user_id: &UserId) -> Result<(), DomainError> {
        if self.is_owner(user_id) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                "User does not own this resource",
            )
            .with_detail("owner_id", self.owner_id().to_string())
            .with_detail("requested_by", user_id.to_string()))
        }
    }
}
