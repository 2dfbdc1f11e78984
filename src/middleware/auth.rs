use crate::config::AnswerPolicy;
use crate::db::{AnswerTarget, User};
use crate::error::QaError;

/// Minimum role a route requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Member,
    Expert,
    Admin,
}

impl Role {
    fn granted_to(self, user: &User) -> bool {
        match self {
            Role::Member => true,
            Role::Expert => user.expert,
            Role::Admin => user.admin,
        }
    }
}

/// Ensure the request acts as a user holding `role`.
///
/// Anonymous requests fail with `Unauthenticated` (redirect to login), users
/// lacking the role with `Forbidden` (redirect home).
pub fn require(user: Option<User>, role: Role) -> Result<User, QaError> {
    let user = user.ok_or(QaError::Unauthenticated)?;
    if role.granted_to(&user) {
        Ok(user)
    } else {
        Err(QaError::Forbidden)
    }
}

impl AnswerPolicy {
    /// Whether `expert` may answer `question` under this policy.
    pub fn permits(self, expert: &User, question: &AnswerTarget) -> bool {
        match self {
            AnswerPolicy::AssignedExpert => question.expert_id == expert.id,
            AnswerPolicy::AnyExpert => expert.expert,
        }
    }
}
