use std::fmt;

use serde::{Deserialize, Serialize};

/// The eight course roles a job listing can be routed to.
///
/// Declaration order is significant: it is the tie-break whenever two roles
/// score the same, and the fallback when no role has any evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    DomainExpert,
    FirmwareDeveloper,
    IntegrationEngineer,
    MechDesigner,
    PcbDesigner,
    ProcurementSpecialist,
    ProductArchitect,
    ProductManager,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::DomainExpert,
        Role::FirmwareDeveloper,
        Role::IntegrationEngineer,
        Role::MechDesigner,
        Role::PcbDesigner,
        Role::ProcurementSpecialist,
        Role::ProductArchitect,
        Role::ProductManager,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::DomainExpert => "domain_expert",
            Role::FirmwareDeveloper => "firmware_developer",
            Role::IntegrationEngineer => "integration_engineer",
            Role::MechDesigner => "mech_designer",
            Role::PcbDesigner => "pcb_designer",
            Role::ProcurementSpecialist => "procurement_specialist",
            Role::ProductArchitect => "product_architect",
            Role::ProductManager => "product_manager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
