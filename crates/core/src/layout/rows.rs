use serde::Serialize;
use shopfloor_protocol::RecordKind;

use crate::config::LayoutConfig;

/// The three fixed rows inside every machine band, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SubRow {
    Status = 0,
    Order = 1,
    Maintenance = 2,
}

impl SubRow {
    pub const ALL: [SubRow; 3] = [SubRow::Status, SubRow::Order, SubRow::Maintenance];
    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        self as usize
    }

    /// Category label shown in the sidebar next to this row.
    pub fn label(self) -> &'static str {
        match self {
            SubRow::Status => "Status",
            SubRow::Order => "OF",
            SubRow::Maintenance => "Cycles",
        }
    }

    pub fn for_kind(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Status => SubRow::Status,
            RecordKind::Order => SubRow::Order,
            RecordKind::Maintenance => SubRow::Maintenance,
        }
    }
}

/// Vertical geometry of the machine bands, relative to the top of the
/// content area (below the time axis).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RowLayout {
    pub bar_height: f64,
    pub bar_margin: f64,
}

/// One machine's horizontal stripe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub index: usize,
    pub y: f64,
    pub height: f64,
    pub tinted: bool,
}

impl RowLayout {
    pub fn new(bar_height: f64, bar_margin: f64) -> Self {
        Self {
            bar_height,
            bar_margin,
        }
    }

    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new(config.bar_height, config.bar_margin)
    }

    pub fn row_pitch(&self) -> f64 {
        self.bar_height + self.bar_margin
    }

    pub fn band_height(&self) -> f64 {
        SubRow::COUNT as f64 * self.row_pitch()
    }

    pub fn row_slot(&self, machine_index: usize, sub_row: SubRow) -> f64 {
        machine_index as f64 * self.band_height() + sub_row.index() as f64 * self.row_pitch()
    }

    pub fn total_content_height(&self, machine_count: usize) -> f64 {
        machine_count as f64 * self.band_height()
    }

    /// Even bands get the alternate background.
    pub fn is_tinted(&self, machine_index: usize) -> bool {
        machine_index % 2 == 0
    }

    pub fn bands(&self, machine_count: usize) -> Vec<Band> {
        let height = self.band_height();
        (0..machine_count)
            .map(|index| Band {
                index,
                y: index as f64 * height,
                height,
                tinted: self.is_tinted(index),
            })
            .collect()
    }

    /// Machine index and sub-row under content offset `y`, if any row of
    /// `machine_count` bands covers it.
    pub fn slot_at(&self, y: f64, machine_count: usize) -> Option<(usize, SubRow)> {
        let pitch = self.row_pitch();
        if y < 0.0 || pitch <= 0.0 {
            return None;
        }
        // Slot origins built by `row_slot` can land a rounding error short
        // of an exact multiple of the pitch.
        let row = (y / pitch + 1e-9).floor() as usize;
        let machine = row / SubRow::COUNT;
        if machine >= machine_count {
            return None;
        }
        Some((machine, SubRow::ALL[row % SubRow::COUNT]))
    }
}

impl Default for RowLayout {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}
