//! Resolve engine assignees to concrete users.
//!
//! A role is served by the user holding it with the lowest id. A role nobody
//! holds cannot be routed to and fails the completion.

use super::{Assignee, TaskSpec};
use crate::domain::{NewTask, Role, User, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no user holds the {role} role")]
pub struct UnassignedRole {
    pub role: Role,
}

/// Lowest-id user holding `role`.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use onboarding_backend::domain::{Role, User, UserId};
/// use onboarding_backend::domain::workflow::holder_of;
///
/// let user = |id, role| User {
///     id: UserId::new(id),
///     name: format!("user {id}"),
///     email: format!("u{id}@hastane.com"),
///     role,
///     created_at: Utc::now(),
/// };
/// let staff = [user(7, Role::MaliIsler), user(5, Role::MaliIsler), user(2, Role::Admin)];
/// assert_eq!(holder_of(Role::MaliIsler, &staff), Some(UserId::new(5)));
/// assert_eq!(holder_of(Role::Biyomedikal, &staff), None);
/// ```
pub fn holder_of(role: Role, staff: &[User]) -> Option<UserId> {
    staff
        .iter()
        .filter(|user| user.role == role)
        .map(|user| user.id)
        .min()
}

/// Turn a [`TaskSpec`] into an insertable task.
pub fn assign(spec: &TaskSpec, creator: UserId, staff: &[User]) -> Result<NewTask, UnassignedRole> {
    let assigned_to = match spec.assignee {
        Assignee::ContractCreator => creator,
        Assignee::Role(role) => holder_of(role, staff).ok_or(UnassignedRole { role })?,
    };
    Ok(NewTask {
        assigned_to,
        step: spec.step,
        description: spec.description.to_owned(),
    })
}
