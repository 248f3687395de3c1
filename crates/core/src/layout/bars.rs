use std::collections::HashMap;

use serde::Serialize;
use shopfloor_protocol::{Rect, RecordRef, ThemeToken};

use super::filter::WindowRecords;
use super::rows::{RowLayout, SubRow};
use super::scale::TimeScale;
use crate::config::LayoutConfig;
use crate::model::{
    Machine, MaintenanceEvent, MaintenanceKind, ManufacturingOrder, OrderStatus, StatusPeriod,
    TimedRecord,
};

/// A timed record that knows how its bar looks.
pub trait Projectable: TimedRecord {
    fn fill(&self) -> ThemeToken;

    fn opacity(&self) -> f32 {
        1.0
    }

    fn bar_label(&self) -> Option<String> {
        None
    }

    fn sub_row() -> SubRow {
        SubRow::for_kind(Self::KIND)
    }
}

impl Projectable for ManufacturingOrder {
    fn fill(&self) -> ThemeToken {
        let status = self.status_kind();
        if status == OrderStatus::Other {
            tracing::trace!(id = self.id, status = %self.status, "unrecognized order status");
        }
        status.fill()
    }

    fn bar_label(&self) -> Option<String> {
        Some(ManufacturingOrder::bar_label(self))
    }
}

impl Projectable for StatusPeriod {
    fn fill(&self) -> ThemeToken {
        ThemeToken::StatusActive
    }

    fn opacity(&self) -> f32 {
        0.7
    }
}

impl Projectable for MaintenanceEvent {
    fn fill(&self) -> ThemeToken {
        let kind = self.kind();
        if kind == MaintenanceKind::Other {
            tracing::trace!(id = self.id, kind = %self.kind, "unrecognized maintenance type");
        }
        kind.fill()
    }
}

/// A record's rectangle, relative to the top of the content area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub rect: Rect,
    pub fill: ThemeToken,
    pub opacity: f32,
    pub label: Option<String>,
    pub source: RecordRef,
    /// Index of the owning machine's band.
    pub machine: usize,
}

/// Place one record on band `machine`, in its kind's sub-row.
///
/// Width is the whole-minute duration at the scale's density, widened to
/// `min_bar_width`. Bars are not clipped to the window.
pub fn project<R: Projectable>(
    record: &R,
    machine: usize,
    rows: &RowLayout,
    scale: &TimeScale,
    min_bar_width: f64,
) -> Bar {
    let width = scale
        .width_of(record.start(), record.end())
        .max(min_bar_width);
    Bar {
        rect: Rect::new(
            scale.x_at(record.start()),
            rows.row_slot(machine, R::sub_row()),
            width,
            rows.bar_height,
        ),
        fill: record.fill(),
        opacity: record.opacity(),
        label: record.bar_label(),
        source: record.record_ref(),
        machine,
    }
}

/// Project every record onto its machine's band.
///
/// Bars come out grouped by kind (status, orders, maintenance) in record
/// order. Records whose machine is not in `machines` are skipped.
pub fn project_all(
    machines: &[Machine],
    records: &WindowRecords<'_>,
    rows: &RowLayout,
    scale: &TimeScale,
    config: &LayoutConfig,
) -> Vec<Bar> {
    let mut index: HashMap<u64, usize> = HashMap::with_capacity(machines.len());
    for (i, machine) in machines.iter().enumerate() {
        index.entry(machine.id).or_insert(i);
    }

    let mut projector = Projector {
        index: &index,
        rows,
        scale,
        config,
        bars: Vec::with_capacity(records.len()),
        orphans: 0,
    };
    projector.extend(&records.status);
    projector.extend(&records.orders);
    projector.extend(&records.maintenance);

    if projector.orphans > 0 {
        tracing::warn!(
            count = projector.orphans,
            "skipped records owned by unknown machines"
        );
    }
    projector.bars
}

struct Projector<'a> {
    index: &'a HashMap<u64, usize>,
    rows: &'a RowLayout,
    scale: &'a TimeScale,
    config: &'a LayoutConfig,
    bars: Vec<Bar>,
    orphans: usize,
}

impl Projector<'_> {
    fn extend<R: Projectable>(&mut self, records: &[&R]) {
        for record in records {
            let Some(&machine) = self.index.get(&record.owner()) else {
                self.orphans += 1;
                continue;
            };
            self.bars.push(project(
                *record,
                machine,
                self.rows,
                self.scale,
                self.config.min_bar_width,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::interval::IntervalCatalog;
    use crate::layout::scale::compute_scale;
    use crate::model::TimeWindow;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use shopfloor_protocol::RecordKind;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap()
    }

    fn scale() -> TimeScale {
        let window = TimeWindow::new(at(1, 0), at(8, 0)).unwrap();
        compute_scale(&window, &IntervalCatalog::default_interval(), 1024.0)
    }

    fn machine(id: u64) -> Machine {
        serde_json::from_value(serde_json::json!({
            "machine_id": id,
            "machine_name": format!("M{id}"),
            "status": "Operational"
        }))
        .expect("machine fixture")
    }

    fn order(id: u64, machine_id: u64, start: DateTime<Utc>, end: DateTime<Utc>) -> ManufacturingOrder {
        serde_json::from_value(serde_json::json!({
            "of_id": id,
            "machine_id": machine_id,
            "start_datetime_utc": start.to_rfc3339(),
            "end_datetime_utc": end.to_rfc3339(),
            "part_number": "PN-9",
            "quantity_to_do": 10,
            "quantity_produced": 4,
            "status": "Delayed"
        }))
        .expect("order fixture")
    }

    fn maintenance(id: u64, machine_id: u64, kind: &str) -> MaintenanceEvent {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "machine_id": machine_id,
            "start_date": "2024-01-02T00:00:00Z",
            "end_date": "2024-01-02T06:00:00Z",
            "type": kind,
            "status": "Done"
        }))
        .expect("maintenance fixture")
    }

    #[test]
    fn zero_length_order_gets_minimum_width() {
        let config = LayoutConfig::default();
        let rows = RowLayout::from_config(&config);
        let machines = vec![machine(1), machine(2), machine(3)];
        let orders = vec![order(7, 3, at(1, 10), at(1, 10))];
        let records = WindowRecords {
            orders: orders.iter().collect(),
            ..WindowRecords::default()
        };
        let bars = project_all(&machines, &records, &rows, &scale(), &config);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].rect.w, config.min_bar_width);
        assert_eq!(bars[0].rect.y, rows.row_slot(2, SubRow::Order));
        assert_eq!(bars[0].machine, 2);
        assert_eq!(bars[0].source, RecordRef::new(RecordKind::Order, 7));
    }

    #[test]
    fn order_bar_geometry_and_label() {
        let s = scale();
        let bar = project(&order(1, 1, at(2, 0), at(3, 0)), 0, &RowLayout::default(), &s, 20.0);
        assert_eq!(bar.rect.x, s.x_at(at(2, 0)));
        assert_eq!(bar.rect.y, 34.0);
        assert_eq!(bar.rect.h, 30.0);
        assert!((bar.rect.w - 1440.0 * s.pixels_per_minute).abs() < 1e-9);
        assert_eq!(bar.fill, ThemeToken::OrderDelayed);
        assert_eq!(bar.label.as_deref(), Some("PN-9 (4/10)"));
        assert_eq!(bar.opacity, 1.0);
    }

    #[test]
    fn bars_are_not_clipped_to_the_window() {
        let s = scale();
        let bar = project(
            &order(1, 1, at(1, 0) - Duration::days(1), at(1, 12)),
            0,
            &RowLayout::default(),
            &s,
            20.0,
        );
        assert!(bar.rect.x < s.label_width);
    }

    #[test]
    fn status_bars_are_translucent() {
        let period = StatusPeriod {
            id: 3,
            machine_id: 1,
            machine_name: String::new(),
            start: at(1, 0),
            end: at(1, 8),
            site_id: None,
            group_id: None,
            notes: None,
        };
        let bar = project(&period, 0, &RowLayout::default(), &scale(), 20.0);
        assert_eq!(bar.fill, ThemeToken::StatusActive);
        assert_eq!(bar.opacity, 0.7);
        assert_eq!(bar.label, None);
    }

    #[test]
    fn maintenance_fill_falls_back() {
        assert_eq!(
            Projectable::fill(&maintenance(1, 1, "Corrective")),
            ThemeToken::MaintenanceCorrective
        );
        assert_eq!(
            Projectable::fill(&maintenance(2, 1, "Inspection")),
            ThemeToken::MaintenanceOther
        );
    }

    #[test]
    fn unknown_machines_produce_no_bar() {
        let config = LayoutConfig::default();
        let events = vec![maintenance(1, 1, "Preventive"), maintenance(2, 99, "Preventive")];
        let records = WindowRecords {
            maintenance: events.iter().collect(),
            ..WindowRecords::default()
        };
        let bars = project_all(
            &[machine(1)],
            &records,
            &RowLayout::from_config(&config),
            &scale(),
            &config,
        );
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].rect.y, 68.0);
    }

    proptest! {
        #[test]
        fn width_never_below_minimum(
            offset in -5_000i64..15_000,
            len_secs in 0i64..600_000,
            min_width in 0.0f64..50.0,
        ) {
            let start = at(1, 0) + Duration::minutes(offset);
            let o = order(1, 1, start, start + Duration::seconds(len_secs));
            let bar = project(&o, 0, &RowLayout::default(), &scale(), min_width);
            prop_assert!(bar.rect.w >= min_width);
        }
    }
}
