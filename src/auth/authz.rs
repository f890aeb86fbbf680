//! Role-based authorization
//!
//! Capabilities derive purely from the resolved user's role. Self-action
//! guards (own role, own account) are business invariants enforced in the
//! session manager's mutations, not here.

use serde::Serialize;

use crate::auth::models::{AuthenticatedUser, Role};
use crate::error::{Error, Result};

/// Actions a role can be permitted to take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    View,
    ManagePlayers,
    ManageMatches,
    ManageSquads,
    ManageMedia,
    ManageUsers,
    ManageSettings,
    UseAssistant,
}

const ADMIN_CAPABILITIES: &[Capability] = &[
    Capability::View,
    Capability::ManagePlayers,
    Capability::ManageMatches,
    Capability::ManageSquads,
    Capability::ManageMedia,
    Capability::ManageUsers,
    Capability::ManageSettings,
    Capability::UseAssistant,
];

const MEDIA_MANAGER_CAPABILITIES: &[Capability] = &[Capability::View, Capability::ManageMedia];

const USER_CAPABILITIES: &[Capability] = &[Capability::View];

/// Capability set for a (possibly unauthenticated) user
pub fn capabilities_for(user: Option<&AuthenticatedUser>) -> &'static [Capability] {
    match user {
        None => &[],
        Some(user) => match user.role {
            Role::Admin => ADMIN_CAPABILITIES,
            Role::MediaManager => MEDIA_MANAGER_CAPABILITIES,
            Role::User => USER_CAPABILITIES,
        },
    }
}

pub fn has_capability(user: Option<&AuthenticatedUser>, capability: Capability) -> bool {
    capabilities_for(user).contains(&capability)
}

/// Fail unless the user is an authenticated admin
pub fn require_admin(user: Option<&AuthenticatedUser>) -> Result<()> {
    match user {
        Some(user) if user.role == Role::Admin => Ok(()),
        _ => Err(Error::Forbidden),
    }
}
