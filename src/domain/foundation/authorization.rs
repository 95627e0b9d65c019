//! Uniform authorization predicate for mutating operations.
//!
//! Every mutating operation on Course, Lesson, and Enrollment goes through
//! the same `authorize` function with one of two policies, so the rules
//! cannot drift between call sites:
//!
//! - [`Policy::RoleInSet`] - the actor's role must be in a required set
//!   (admins always pass).
//! - [`Policy::OwnerOrAdmin`] - the actor must be the resource owner or
//!   an admin.
//!
//! No actor at all yields `Unauthenticated`; an actor that fails the
//! policy yields `Forbidden`. The function is pure: no state, no I/O.

use super::{Actor, DomainError, ErrorCode, Role, UserId};

/// Authorization policy evaluated by [`authorize`].
#[derive(Debug, Clone, Copy)]
pub enum Policy<'a> {
    /// The actor's role must be one of the listed roles, or admin.
    RoleInSet(&'a [Role]),

    /// The actor must be the resource's owner, or an admin.
    OwnerOrAdmin,
}

/// Evaluates `policy` for `actor` against an optional resource owner.
///
/// Returns the validated actor on success so handlers can use it without
/// re-unwrapping the option. `resource_owner` is only consulted by
/// [`Policy::OwnerOrAdmin`]; a missing owner under that policy denies
/// everyone but admins.
pub fn authorize<'a>(
    actor: Option<&'a Actor>,
    policy: Policy<'_>,
    resource_owner: Option<&UserId>,
) -> Result<&'a Actor, DomainError> {
    let actor = actor.ok_or_else(|| {
        DomainError::new(ErrorCode::Unauthenticated, "Authentication required")
    })?;

    if actor.is_admin() {
        return Ok(actor);
    }

    let allowed = match policy {
        Policy::RoleInSet(roles) => roles.contains(&actor.role),
        Policy::OwnerOrAdmin => resource_owner.is_some_and(|owner| owner == &actor.id),
    };

    if allowed {
        Ok(actor)
    } else {
        Err(
            DomainError::new(ErrorCode::Forbidden, "Forbidden")
                .with_detail("actor_id", actor.id.to_string())
                .with_detail("actor_role", actor.role.as_str()),
        )
    }
}
