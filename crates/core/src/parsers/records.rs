use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ParseError;
use crate::model::{
    Dataset, Machine, MaintenanceEvent, ManufacturingOrder, StatusPeriod, TimedRecord,
};

/// One JSON export, identified by the shape of its records.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordSet {
    Machines(Vec<Machine>),
    Orders(Vec<ManufacturingOrder>),
    StatusHistory(Vec<StatusPeriod>),
    Maintenance(Vec<MaintenanceEvent>),
    /// An empty array: nothing to add, whatever it was meant to hold.
    Empty,
}

impl RecordSet {
    pub fn len(&self) -> usize {
        match self {
            Self::Machines(v) => v.len(),
            Self::Orders(v) => v.len(),
            Self::StatusHistory(v) => v.len(),
            Self::Maintenance(v) => v.len(),
            Self::Empty => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Dataset {
    /// Append a parsed record set to this dataset.
    pub fn absorb(&mut self, records: RecordSet) {
        match records {
            RecordSet::Machines(v) => self.machines.extend(v),
            RecordSet::Orders(v) => self.orders.extend(v),
            RecordSet::StatusHistory(v) => self.status_history.extend(v),
            RecordSet::Maintenance(v) => self.maintenance.extend(v),
            RecordSet::Empty => {}
        }
    }

    /// Append every record of another dataset.
    pub fn merge(&mut self, other: Dataset) {
        self.absorb(RecordSet::Machines(other.machines));
        self.absorb(RecordSet::Orders(other.orders));
        self.absorb(RecordSet::StatusHistory(other.status_history));
        self.absorb(RecordSet::Maintenance(other.maintenance));
    }
}

pub fn parse_machines(data: &[u8]) -> Result<Vec<Machine>, ParseError> {
    Ok(serde_json::from_slice(data)?)
}

pub fn parse_orders(data: &[u8]) -> Result<Vec<ManufacturingOrder>, ParseError> {
    parse_timed(data)
}

pub fn parse_status_history(data: &[u8]) -> Result<Vec<StatusPeriod>, ParseError> {
    parse_timed(data)
}

pub fn parse_maintenance(data: &[u8]) -> Result<Vec<MaintenanceEvent>, ParseError> {
    parse_timed(data)
}

/// Parse a whole dataset object:
/// `{ "machines": [...], "orders": [...], "status_history": [...], "maintenance": [...] }`.
pub fn parse_dataset(data: &[u8]) -> Result<Dataset, ParseError> {
    let dataset: Dataset = serde_json::from_slice(data)?;
    check_ordered(&dataset.orders)?;
    check_ordered(&dataset.status_history)?;
    check_ordered(&dataset.maintenance)?;
    tracing::debug!(
        machines = dataset.machines.len(),
        records = dataset.record_count(),
        "parsed dataset"
    );
    Ok(dataset)
}

/// Detect which kind of records a JSON array holds and parse it.
///
/// Detection looks at the keys of the first element:
/// 1. `of_id` → manufacturing orders.
/// 2. `history_id` → status history.
/// 3. `start_date` → maintenance events.
/// 4. `machine_id` + `machine_name` without a start → machines.
pub fn parse_records_auto(data: &[u8]) -> Result<RecordSet, ParseError> {
    let value: Value = serde_json::from_slice(data)?;
    let Some(items) = value.as_array() else {
        return Err(ParseError::UnknownFormat);
    };
    let Some(first) = items.first() else {
        return Ok(RecordSet::Empty);
    };
    let Some(obj) = first.as_object() else {
        return Err(ParseError::UnknownFormat);
    };

    let records = if obj.contains_key("of_id") {
        RecordSet::Orders(timed_from_value(value)?)
    } else if obj.contains_key("history_id") {
        RecordSet::StatusHistory(timed_from_value(value)?)
    } else if obj.contains_key("start_date") {
        RecordSet::Maintenance(timed_from_value(value)?)
    } else if obj.contains_key("machine_id") && obj.contains_key("machine_name") {
        RecordSet::Machines(serde_json::from_value(value)?)
    } else {
        return Err(ParseError::UnknownFormat);
    };
    tracing::debug!(count = records.len(), "detected record set");
    Ok(records)
}

fn parse_timed<R: DeserializeOwned + TimedRecord>(data: &[u8]) -> Result<Vec<R>, ParseError> {
    let records: Vec<R> = serde_json::from_slice(data)?;
    check_ordered(&records)?;
    Ok(records)
}

fn timed_from_value<R: DeserializeOwned + TimedRecord>(value: Value) -> Result<Vec<R>, ParseError> {
    let records: Vec<R> = serde_json::from_value(value)?;
    check_ordered(&records)?;
    Ok(records)
}

fn check_ordered<R: TimedRecord>(records: &[R]) -> Result<(), ParseError> {
    match records.iter().find(|r| r.end() < r.start()) {
        Some(r) => Err(ParseError::InvertedRecord {
            kind: R::KIND,
            id: r.id(),
        }),
        None => Ok(()),
    }
}
