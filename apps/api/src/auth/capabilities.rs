use serde::Serialize;

use crate::models::user::Role;

/// What an account may do, resolved once from its role rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capabilities {
    /// Authenticated but holds no role yet.
    None,
    Candidate,
    Manager,
    CandidateManager,
}

impl Capabilities {
    pub fn from_roles(roles: &[Role]) -> Self {
        let candidate = roles.contains(&Role::Candidate);
        let manager = roles.contains(&Role::Manager);
        match (candidate, manager) {
            (true, true) => Capabilities::CandidateManager,
            (true, false) => Capabilities::Candidate,
            (false, true) => Capabilities::Manager,
            (false, false) => Capabilities::None,
        }
    }

    pub fn is_candidate(&self) -> bool {
        matches!(
            self,
            Capabilities::Candidate | Capabilities::CandidateManager
        )
    }

    pub fn is_manager(&self) -> bool {
        matches!(self, Capabilities::Manager | Capabilities::CandidateManager)
    }

    /// Any manager capability blocks applying to jobs, even alongside a candidate role.
    pub fn can_apply(&self) -> bool {
        !self.is_manager()
    }
}
