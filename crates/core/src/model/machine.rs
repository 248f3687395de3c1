use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopfloor_protocol::ThemeToken;

use crate::parsers::timestamp;

/// A tracked machine. Machines are stacked top to bottom in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    #[serde(rename = "machine_id")]
    pub id: u64,
    #[serde(rename = "machine_name")]
    pub name: String,
    #[serde(default)]
    pub machine_type: String,
    #[serde(default)]
    pub site_id: Option<u64>,
    #[serde(rename = "grp_id", default)]
    pub group_id: Option<u64>,
    /// Free-form status as delivered by the source; see [`Machine::status_kind`].
    #[serde(default)]
    pub status: String,
    #[serde(rename = "last_maintenance_utc", default, with = "timestamp::option")]
    pub last_maintenance: Option<DateTime<Utc>>,
    #[serde(rename = "next_maintenance_utc", default, with = "timestamp::option")]
    pub next_maintenance: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Machine {
    pub fn status_kind(&self) -> MachineStatus {
        MachineStatus::from_label(&self.status)
    }
}

/// Machine status as shown in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachineStatus {
    Operational,
    UnderMaintenance,
    Idle,
    UnderUpgrade,
    /// Anything the source sends that is not one of the above.
    Other,
}

impl MachineStatus {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Operational" => Self::Operational,
            "Under Maintenance" => Self::UnderMaintenance,
            "Idle" => Self::Idle,
            "Under Upgrade" => Self::UnderUpgrade,
            _ => Self::Other,
        }
    }

    pub fn fill(self) -> ThemeToken {
        match self {
            Self::Operational => ThemeToken::MachineOperational,
            Self::UnderMaintenance => ThemeToken::MachineUnderMaintenance,
            Self::Idle => ThemeToken::MachineIdle,
            Self::UnderUpgrade => ThemeToken::MachineUnderUpgrade,
            Self::Other => ThemeToken::MachineUnknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels() {
        assert_eq!(MachineStatus::from_label("Operational"), MachineStatus::Operational);
        assert_eq!(
            MachineStatus::from_label("Under Maintenance"),
            MachineStatus::UnderMaintenance
        );
        assert_eq!(MachineStatus::from_label("operational"), MachineStatus::Other);
        assert_eq!(MachineStatus::from_label(""), MachineStatus::Other);
    }

    #[test]
    fn unknown_status_gets_fallback_fill() {
        assert_eq!(MachineStatus::Other.fill(), ThemeToken::MachineUnknown);
        assert_eq!(MachineStatus::Idle.fill(), ThemeToken::MachineIdle);
    }

    #[test]
    fn deserializes_source_field_names() {
        let json = r#"{
            "machine_id": 3,
            "machine_name": "Press 3",
            "machine_type": "Injection",
            "site_id": 1,
            "grp_id": 2,
            "status": "Idle",
            "last_maintenance_utc": "2024-01-02T08:00:00Z",
            "next_maintenance_utc": null,
            "location": "Hall B",
            "serial_number": "SN-3",
            "notes": ""
        }"#;
        let machine: Machine = serde_json::from_str(json).expect("machine fixture");
        assert_eq!(machine.id, 3);
        assert_eq!(machine.group_id, Some(2));
        assert_eq!(machine.status_kind(), MachineStatus::Idle);
        assert!(machine.last_maintenance.is_some());
        assert!(machine.next_maintenance.is_none());
    }
}
