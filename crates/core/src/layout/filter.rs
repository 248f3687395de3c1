use crate::model::{
    Dataset, MaintenanceEvent, ManufacturingOrder, StatusPeriod, TimeWindow, TimedRecord,
};

/// The records of a dataset that touch one window, per kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowRecords<'a> {
    pub status: Vec<&'a StatusPeriod>,
    pub orders: Vec<&'a ManufacturingOrder>,
    pub maintenance: Vec<&'a MaintenanceEvent>,
}

impl<'a> WindowRecords<'a> {
    pub fn select(dataset: &'a Dataset, window: &TimeWindow) -> Self {
        Self {
            status: filter_in_window(&dataset.status_history, window),
            orders: filter_in_window(&dataset.orders, window),
            maintenance: filter_in_window(&dataset.maintenance, window),
        }
    }

    pub fn len(&self) -> usize {
        self.status.len() + self.orders.len() + self.maintenance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Records that touch `window`: the start is inside it, the end is inside
/// it, or the record spans it entirely. Both window edges count as inside.
///
/// Records are not clipped; a bar that begins before the window still starts
/// left of the time origin.
pub fn filter_in_window<'a, R, I>(records: I, window: &TimeWindow) -> Vec<&'a R>
where
    R: TimedRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    records
        .into_iter()
        .filter(|r| overlaps(*r, window))
        .collect()
}

fn overlaps<R: TimedRecord>(record: &R, window: &TimeWindow) -> bool {
    let (start, end) = (record.start(), record.end());
    window.contains(start)
        || window.contains(end)
        || (start <= window.start() && end >= window.end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StatusPeriod;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap()
    }

    fn period(id: u64, start: DateTime<Utc>, end: DateTime<Utc>) -> StatusPeriod {
        StatusPeriod {
            id,
            machine_id: 1,
            machine_name: String::new(),
            start,
            end,
            site_id: None,
            group_id: None,
            notes: None,
        }
    }

    fn window() -> TimeWindow {
        TimeWindow::new(at(2, 0), at(5, 0)).unwrap()
    }

    fn ids(records: &[&StatusPeriod]) -> Vec<u64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn keeps_overlapping_and_drops_disjoint() {
        let records = vec![
            period(1, at(1, 0), at(1, 12)), // entirely before
            period(2, at(1, 12), at(2, 6)), // ends inside
            period(3, at(3, 0), at(3, 6)),  // inside
            period(4, at(4, 12), at(6, 0)), // starts inside
            period(5, at(6, 0), at(7, 0)),  // entirely after
        ];
        assert_eq!(ids(&filter_in_window(&records, &window())), vec![2, 3, 4]);
    }

    #[test]
    fn spanning_record_is_included() {
        let records = vec![period(1, at(1, 0), at(7, 0))];
        assert_eq!(filter_in_window(&records, &window()).len(), 1);
    }

    #[test]
    fn window_edges_are_inclusive() {
        let records = vec![
            period(1, at(1, 0), at(2, 0)),
            period(2, at(5, 0), at(6, 0)),
            period(3, at(2, 0), at(2, 0)),
        ];
        assert_eq!(ids(&filter_in_window(&records, &window())), vec![1, 2, 3]);
    }

    #[test]
    fn selects_each_kind_from_a_dataset() {
        let dataset = Dataset {
            status_history: vec![period(1, at(3, 0), at(3, 4)), period(2, at(9, 0), at(9, 4))],
            ..Dataset::default()
        };
        let selected = WindowRecords::select(&dataset, &window());
        assert_eq!(ids(&selected.status), vec![1]);
        assert!(selected.orders.is_empty());
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn empty_input() {
        let records: Vec<StatusPeriod> = Vec::new();
        assert!(filter_in_window(&records, &window()).is_empty());
    }

    proptest! {
        #[test]
        fn filtering_is_idempotent(
            spans in prop::collection::vec((-2_000i64..12_000, 0i64..6_000), 0..40)
        ) {
            let origin = at(1, 0);
            let records: Vec<_> = spans
                .iter()
                .enumerate()
                .map(|(i, &(offset, len))| {
                    let start = origin + Duration::minutes(offset);
                    period(i as u64, start, start + Duration::minutes(len))
                })
                .collect();
            let once = filter_in_window(&records, &window());
            let twice = filter_in_window(once.iter().copied(), &window());
            prop_assert_eq!(ids(&once), ids(&twice));
        }
    }
}
