pub mod records;
pub mod timestamp;

pub use records::{
    RecordSet, parse_dataset, parse_machines, parse_maintenance, parse_orders,
    parse_records_auto, parse_status_history,
};
pub use timestamp::parse_timestamp;

use shopfloor_protocol::RecordKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("{kind:?} record {id} ends before it starts")]
    InvertedRecord { kind: RecordKind, id: u64 },
    #[error("invalid config: {0}")]
    Config(String),
    #[error("unable to detect record type")]
    UnknownFormat,
}
