//! Authorization rules for every resource/action pair.
//!
//! The whole permission model lives in [`authorize`], a total function
//! over small enums. Usecases call it with the caller's role and their
//! relation to the object; HTTP never enters the picture, so the rule
//! table is testable on its own.

use crate::role::Role;

/// Resource kinds subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Listing,
    Review,
    Profile,
}

/// Actions a caller can attempt on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Create,
    Retrieve,
    Update,
    Delete,
}

/// Caller's relationship to the concrete object being acted on.
///
/// For a `Profile`, `Owner` means the caller is that user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Owner,
    Other,
}

/// Authorization verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Caller must sign in first (HTTP 401).
    Unauthenticated,
    /// Caller is known but not allowed (HTTP 403).
    Forbidden,
}

/// Decide whether the caller may perform `action` on `resource`.
///
/// `caller` is `None` for anonymous requests; the relation carries no
/// meaning for `List` and `Create` and is ignored there. Profile
/// `List`/`Create` have no corresponding route and are never granted.
pub fn authorize(
    resource: Resource,
    action: Action,
    caller: Option<(Role, Relation)>,
) -> Access {
    // Public catalogs short-circuit before any identity check.
    if matches!(
        (resource, action),
        (Resource::Listing | Resource::Review, Action::List)
    ) {
        return Access::Granted;
    }

    let Some((role, relation)) = caller else {
        return Access::Unauthenticated;
    };

    let allowed = match (resource, action) {
        // Any signed-in user may browse details and contribute.
        (
            Resource::Listing | Resource::Review,
            Action::List | Action::Create | Action::Retrieve,
        ) => true,
        // Mutations and profile access stay with the owner unless a
        // moderator steps in.
        (Resource::Listing | Resource::Review, Action::Update | Action::Delete)
        | (Resource::Profile, Action::Retrieve | Action::Update | Action::Delete) => {
            relation == Relation::Owner || role >= Role::Moderator
        }
        (Resource::Profile, Action::List | Action::Create) => false,
    };

    if allowed {
        Access::Granted
    } else {
        Access::Forbidden
    }
}
