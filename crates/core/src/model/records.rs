use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopfloor_protocol::{RecordKind, RecordRef, ThemeToken};

use crate::parsers::timestamp;

/// Anything drawn as a bar: owned by one machine, spanning `[start, end]`.
///
/// `end >= start` holds for every record that came through `parsers`;
/// zero-length records are valid and are drawn at the minimum bar width.
pub trait TimedRecord {
    const KIND: RecordKind;

    fn id(&self) -> u64;
    /// Id of the machine this record belongs to.
    fn owner(&self) -> u64;
    fn start(&self) -> DateTime<Utc>;
    fn end(&self) -> DateTime<Utc>;

    fn record_ref(&self) -> RecordRef {
        RecordRef::new(Self::KIND, self.id())
    }
}

/// A manufacturing order ("OF") scheduled on a machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManufacturingOrder {
    #[serde(rename = "of_id")]
    pub id: u64,
    pub machine_id: u64,
    #[serde(default)]
    pub machine_name: String,
    #[serde(rename = "start_datetime_utc", with = "timestamp")]
    pub start: DateTime<Utc>,
    #[serde(rename = "end_datetime_utc", with = "timestamp")]
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub mould_cavities: u32,
    #[serde(default)]
    pub quantity_to_do: u64,
    #[serde(default)]
    pub quantity_started: u64,
    #[serde(default)]
    pub quantity_left: u64,
    #[serde(default)]
    pub quantity_produced: u64,
    #[serde(default)]
    pub quantity_defective: u64,
    #[serde(default)]
    pub part_number: String,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub cycle_time_seconds: f64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub site_id: Option<u64>,
    #[serde(rename = "grp_id", default)]
    pub group_id: Option<u64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ManufacturingOrder {
    pub fn status_kind(&self) -> OrderStatus {
        OrderStatus::from_label(&self.status)
    }

    /// Text drawn inside the order bar: part number and progress.
    pub fn bar_label(&self) -> String {
        format!(
            "{} ({}/{})",
            self.part_number, self.quantity_produced, self.quantity_to_do
        )
    }

    /// Label/value rows for a detail popup, in display order. Notes are
    /// omitted when empty.
    pub fn details(&self) -> Vec<(&'static str, String)> {
        const DATE_FORMAT: &str = "%b %d, %Y %H:%M";
        let mut rows = vec![
            ("Machine", self.machine_name.clone()),
            ("Status", self.status.clone()),
            ("Start", self.start.format(DATE_FORMAT).to_string()),
            ("End", self.end.format(DATE_FORMAT).to_string()),
            ("Material", self.material.clone()),
            (
                "Quantity",
                format!(
                    "{} / {} ({} defective)",
                    self.quantity_produced, self.quantity_to_do, self.quantity_defective
                ),
            ),
            ("Cycle Time", format!("{} seconds", self.cycle_time_seconds)),
            ("Cavities", self.mould_cavities.to_string()),
        ];
        if let Some(notes) = self.notes.as_deref().filter(|n| !n.is_empty()) {
            rows.push(("Notes", notes.to_string()));
        }
        rows
    }
}

impl TimedRecord for ManufacturingOrder {
    const KIND: RecordKind = RecordKind::Order;

    fn id(&self) -> u64 {
        self.id
    }
    fn owner(&self) -> u64 {
        self.machine_id
    }
    fn start(&self) -> DateTime<Utc> {
        self.start
    }
    fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

/// Order status as far as coloring is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Completed,
    InProgress,
    Scheduled,
    Delayed,
    Other,
}

impl OrderStatus {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Completed" => Self::Completed,
            "In Progress" => Self::InProgress,
            "Scheduled" => Self::Scheduled,
            "Delayed" => Self::Delayed,
            _ => Self::Other,
        }
    }

    pub fn fill(self) -> ThemeToken {
        match self {
            Self::Completed => ThemeToken::OrderCompleted,
            Self::InProgress => ThemeToken::OrderInProgress,
            Self::Scheduled => ThemeToken::OrderScheduled,
            Self::Delayed => ThemeToken::OrderDelayed,
            Self::Other => ThemeToken::OrderUnknown,
        }
    }
}

/// A period during which a machine was recorded as active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusPeriod {
    #[serde(rename = "history_id")]
    pub id: u64,
    pub machine_id: u64,
    #[serde(default)]
    pub machine_name: String,
    #[serde(rename = "start_datetime_utc", with = "timestamp")]
    pub start: DateTime<Utc>,
    #[serde(rename = "end_datetime_utc", with = "timestamp")]
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub site_id: Option<u64>,
    #[serde(rename = "grp_id", default)]
    pub group_id: Option<u64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TimedRecord for StatusPeriod {
    const KIND: RecordKind = RecordKind::Status;

    fn id(&self) -> u64 {
        self.id
    }
    fn owner(&self) -> u64 {
        self.machine_id
    }
    fn start(&self) -> DateTime<Utc> {
        self.start
    }
    fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

/// A maintenance intervention ("cycle") on a machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceEvent {
    pub id: u64,
    pub machine_id: u64,
    #[serde(rename = "start_date", with = "timestamp")]
    pub start: DateTime<Utc>,
    #[serde(rename = "end_date", with = "timestamp")]
    pub end: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub status: String,
}

impl MaintenanceEvent {
    pub fn kind(&self) -> MaintenanceKind {
        MaintenanceKind::from_label(&self.kind)
    }
}

impl TimedRecord for MaintenanceEvent {
    const KIND: RecordKind = RecordKind::Maintenance;

    fn id(&self) -> u64 {
        self.id
    }
    fn owner(&self) -> u64 {
        self.machine_id
    }
    fn start(&self) -> DateTime<Utc> {
        self.start
    }
    fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaintenanceKind {
    Preventive,
    Corrective,
    Other,
}

impl MaintenanceKind {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Preventive" => Self::Preventive,
            "Corrective" => Self::Corrective,
            _ => Self::Other,
        }
    }

    pub fn fill(self) -> ThemeToken {
        match self {
            Self::Preventive => ThemeToken::MaintenancePreventive,
            Self::Corrective => ThemeToken::MaintenanceCorrective,
            Self::Other => ThemeToken::MaintenanceOther,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn order() -> ManufacturingOrder {
        ManufacturingOrder {
            id: 42,
            machine_id: 1,
            machine_name: "Press 1".into(),
            start: Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 3, 5, 16, 30, 0).unwrap(),
            mould_cavities: 4,
            quantity_to_do: 1000,
            quantity_started: 600,
            quantity_left: 400,
            quantity_produced: 580,
            quantity_defective: 20,
            part_number: "PN-7731".into(),
            material: "PP".into(),
            cycle_time_seconds: 32.5,
            status: "In Progress".into(),
            site_id: None,
            group_id: None,
            notes: None,
        }
    }

    #[test]
    fn order_status_labels() {
        assert_eq!(OrderStatus::from_label("In Progress"), OrderStatus::InProgress);
        assert_eq!(OrderStatus::from_label("Delayed"), OrderStatus::Delayed);
        assert_eq!(OrderStatus::from_label("Cancelled"), OrderStatus::Other);
    }

    #[test]
    fn bar_label_shows_progress() {
        assert_eq!(order().bar_label(), "PN-7731 (580/1000)");
    }

    #[test]
    fn details_rows() {
        let rows = order().details();
        let labels: Vec<_> = rows.iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            vec![
                "Machine",
                "Status",
                "Start",
                "End",
                "Material",
                "Quantity",
                "Cycle Time",
                "Cavities"
            ]
        );
        assert_eq!(rows[2].1, "Mar 05, 2024 08:00");
        assert_eq!(rows[5].1, "580 / 1000 (20 defective)");
        assert_eq!(rows[6].1, "32.5 seconds");
    }

    #[test]
    fn details_include_non_empty_notes() {
        let mut o = order();
        o.notes = Some(String::new());
        assert_eq!(o.details().len(), 8);
        o.notes = Some("mould swap at noon".into());
        let rows = o.details();
        assert_eq!(rows.last().map(|(l, _)| *l), Some("Notes"));
    }

    #[test]
    fn record_refs_carry_kind() {
        assert_eq!(order().record_ref(), RecordRef::new(RecordKind::Order, 42));
    }

    #[test]
    fn maintenance_kind_fallback() {
        assert_eq!(MaintenanceKind::from_label("Preventive"), MaintenanceKind::Preventive);
        assert_eq!(MaintenanceKind::from_label("Inspection"), MaintenanceKind::Other);
    }
}
