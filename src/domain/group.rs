// ==========================================
// FleetFlow - Equipment group model
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentGroup {
    pub id: String,
    pub name: String,
}

/// Certification mandatory for operating equipment in a group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupRequiredTicket {
    pub group_id: String,
    pub ticket_code: String,
}

/// Alternate equipment class usable when the primary is unavailable
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupSubstitution {
    pub group_id: String,
    pub substitute_group_id: String,
}
