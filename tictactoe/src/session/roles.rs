//! Role assignment by connection order.

use crate::game::{constants::MAX_PARTICIPANTS, entities::Role};

use super::errors::SessionError;

/// Role for the participant that connected `ordinal`-th (zero based).
/// Only the first two connections get a role.
#[must_use]
pub fn role_for_ordinal(ordinal: usize) -> Option<Role> {
    Role::ALL.get(ordinal).copied()
}

/// Hands out roles in connection order for the lifetime of a session.
///
/// Roles are never reassigned: once both have been handed out the session
/// refuses further connections, even after a participant leaves.
#[derive(Debug, Default)]
pub struct RoleAssigner {
    next_ordinal: usize,
}

impl RoleAssigner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next role.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SessionFull`] once both roles are taken.
    pub fn assign_next(&mut self) -> Result<Role, SessionError> {
        let role = role_for_ordinal(self.next_ordinal).ok_or(SessionError::SessionFull)?;
        self.next_ordinal += 1;
        Ok(role)
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.next_ordinal >= MAX_PARTICIPANTS
    }
}
