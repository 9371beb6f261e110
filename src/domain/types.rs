// ==========================================
// FleetFlow - Domain type definitions
// ==========================================
// Roles, permissions and the operator-assignment state machine
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// Role
// ==========================================
// Serialized as snake_case (matches the profiles.role column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    ContractManager,
    PlantCoordinator,
    WorkforceCoordinator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::ContractManager => "contract_manager",
            Role::PlantCoordinator => "plant_coordinator",
            Role::WorkforceCoordinator => "workforce_coordinator",
        }
    }

    /// Whether this role may perform the given action
    pub fn permits(&self, permission: Permission) -> bool {
        match permission {
            Permission::AllocateAssets | Permission::ManageExternalHires => {
                matches!(self, Role::Admin | Role::PlantCoordinator)
            }
            Permission::RankOperators => matches!(
                self,
                Role::Admin | Role::PlantCoordinator | Role::WorkforceCoordinator
            ),
            Permission::AssignOperators => {
                matches!(self, Role::Admin | Role::WorkforceCoordinator)
            }
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "contract_manager" => Ok(Role::ContractManager),
            "plant_coordinator" => Ok(Role::PlantCoordinator),
            "workforce_coordinator" => Ok(Role::WorkforceCoordinator),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

// ==========================================
// Permission
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    AllocateAssets,       // allocate / score / off-hire / reassign
    ManageExternalHires,  // edit or cancel external hires
    RankOperators,
    AssignOperators,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::AllocateAssets => write!(f, "ALLOCATE_ASSETS"),
            Permission::ManageExternalHires => write!(f, "MANAGE_EXTERNAL_HIRES"),
            Permission::RankOperators => write!(f, "RANK_OPERATORS"),
            Permission::AssignOperators => write!(f, "ASSIGN_OPERATORS"),
        }
    }
}

// ==========================================
// AssignmentState
// ==========================================
// Idle -> Ranking -> Ranked -> Assigning -> Assigned | Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentState {
    Idle,
    Ranking,
    Ranked,
    Assigning,
    Assigned,
    Failed,
}

impl AssignmentState {
    /// Ranking may (re)start from Idle, Ranked or Failed
    pub fn can_start_ranking(&self) -> bool {
        matches!(
            self,
            AssignmentState::Idle | AssignmentState::Ranked | AssignmentState::Failed
        )
    }
}

impl fmt::Display for AssignmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentState::Idle => write!(f, "IDLE"),
            AssignmentState::Ranking => write!(f, "RANKING"),
            AssignmentState::Ranked => write!(f, "RANKED"),
            AssignmentState::Assigning => write!(f, "ASSIGNING"),
            AssignmentState::Assigned => write!(f, "ASSIGNED"),
            AssignmentState::Failed => write!(f, "FAILED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        assert!(Role::PlantCoordinator.permits(Permission::AllocateAssets));
        assert!(Role::Admin.permits(Permission::AssignOperators));
        assert!(!Role::WorkforceCoordinator.permits(Permission::AllocateAssets));
        assert!(!Role::PlantCoordinator.permits(Permission::AssignOperators));
        assert!(Role::WorkforceCoordinator.permits(Permission::RankOperators));
        assert!(!Role::ContractManager.permits(Permission::RankOperators));
    }

    #[test]
    fn test_role_round_trip_through_str() {
        for role in [
            Role::Admin,
            Role::ContractManager,
            Role::PlantCoordinator,
            Role::WorkforceCoordinator,
        ] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("driver".parse::<Role>().is_err());
    }

    #[test]
    fn test_ranking_entry_states() {
        assert!(AssignmentState::Idle.can_start_ranking());
        assert!(AssignmentState::Failed.can_start_ranking());
        assert!(AssignmentState::Ranked.can_start_ranking());
        assert!(!AssignmentState::Assigning.can_start_ranking());
        assert!(!AssignmentState::Assigned.can_start_ranking());
    }
}
