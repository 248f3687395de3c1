use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopfloor_protocol::{RecordKind, RecordRef};

use super::{Machine, MaintenanceEvent, ManufacturingOrder, StatusPeriod};

/// Everything one chart is drawn from, as loaded by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub machines: Vec<Machine>,
    #[serde(default)]
    pub orders: Vec<ManufacturingOrder>,
    #[serde(default)]
    pub status_history: Vec<StatusPeriod>,
    #[serde(default)]
    pub maintenance: Vec<MaintenanceEvent>,
}

/// A record looked up by its [`RecordRef`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordView<'a> {
    Status(&'a StatusPeriod),
    Order(&'a ManufacturingOrder),
    Maintenance(&'a MaintenanceEvent),
}

impl Dataset {
    /// Start of the earliest order, used as the initial window anchor.
    pub fn earliest_order_start(&self) -> Option<DateTime<Utc>> {
        self.orders.iter().map(|o| o.start).min()
    }

    pub fn machine(&self, id: u64) -> Option<&Machine> {
        self.machines.iter().find(|m| m.id == id)
    }

    /// Resolve a bar's record reference back to the record, e.g. when the
    /// host handles a tap on that bar.
    pub fn record(&self, r: RecordRef) -> Option<RecordView<'_>> {
        match r.kind {
            RecordKind::Status => self
                .status_history
                .iter()
                .find(|s| s.id == r.id)
                .map(RecordView::Status),
            RecordKind::Order => self
                .orders
                .iter()
                .find(|o| o.id == r.id)
                .map(RecordView::Order),
            RecordKind::Maintenance => self
                .maintenance
                .iter()
                .find(|m| m.id == r.id)
                .map(RecordView::Maintenance),
        }
    }

    pub fn record_count(&self) -> usize {
        self.orders.len() + self.status_history.len() + self.maintenance.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn order(id: u64, day: u32) -> ManufacturingOrder {
        let start = Utc.with_ymd_and_hms(2024, 1, day, 6, 0, 0).unwrap();
        ManufacturingOrder {
            id,
            machine_id: 1,
            machine_name: String::new(),
            start,
            end: start,
            mould_cavities: 0,
            quantity_to_do: 0,
            quantity_started: 0,
            quantity_left: 0,
            quantity_produced: 0,
            quantity_defective: 0,
            part_number: String::new(),
            material: String::new(),
            cycle_time_seconds: 0.0,
            status: String::new(),
            site_id: None,
            group_id: None,
            notes: None,
        }
    }

    #[test]
    fn earliest_order() {
        let data = Dataset {
            orders: vec![order(1, 9), order(2, 3), order(3, 5)],
            ..Dataset::default()
        };
        assert_eq!(
            data.earliest_order_start(),
            Some(Utc.with_ymd_and_hms(2024, 1, 3, 6, 0, 0).unwrap())
        );
        assert_eq!(Dataset::default().earliest_order_start(), None);
    }

    #[test]
    fn record_lookup_respects_kind() {
        let data = Dataset {
            orders: vec![order(7, 2)],
            ..Dataset::default()
        };
        assert!(matches!(
            data.record(RecordRef::new(RecordKind::Order, 7)),
            Some(RecordView::Order(o)) if o.id == 7
        ));
        assert!(data.record(RecordRef::new(RecordKind::Status, 7)).is_none());
    }
}
