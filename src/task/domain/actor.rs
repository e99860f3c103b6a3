//! Caller identity carried into guarded workflow operations.

use super::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role attached to an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// Regular workspace member.
    Member,
    /// Administrator; may reopen any approved task and delete tasks.
    Admin,
}

impl ActorRole {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Authenticated caller identity passed to every guarded operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    user_id: UserId,
    role: ActorRole,
}

impl Actor {
    /// Creates an actor with an explicit role.
    #[must_use]
    pub const fn new(user_id: UserId, role: ActorRole) -> Self {
        Self { user_id, role }
    }

    /// Creates a regular member actor.
    #[must_use]
    pub const fn member(user_id: UserId) -> Self {
        Self::new(user_id, ActorRole::Member)
    }

    /// Creates an administrator actor.
    #[must_use]
    pub const fn admin(user_id: UserId) -> Self {
        Self::new(user_id, ActorRole::Admin)
    }

    /// Returns the caller's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the caller's role.
    #[must_use]
    pub const fn role(&self) -> ActorRole {
        self.role
    }

    /// Returns whether the caller holds the administrator role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, ActorRole::Admin)
    }
}
