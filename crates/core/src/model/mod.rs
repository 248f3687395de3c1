pub mod dataset;
pub mod machine;
pub mod records;
pub mod window;

pub use dataset::{Dataset, RecordView};
pub use machine::{Machine, MachineStatus};
pub use records::{
    MaintenanceEvent, MaintenanceKind, ManufacturingOrder, OrderStatus, StatusPeriod, TimedRecord,
};
pub use window::{TimeWindow, WindowError};
