// ==========================================
// FleetFlow - Access context
// ==========================================
// The caller's identity and role, passed explicitly into every
// orchestrator call (no ambient session state)
// ==========================================

use crate::domain::types::{Permission, Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessContext {
    pub user_id: String,
    pub role: Role,
}

impl AccessContext {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.role.permits(permission)
    }
}
