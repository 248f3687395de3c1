use serde::{Deserialize, Serialize};

use crate::model::window::DEFAULT_WINDOW_DAYS;
use crate::parsers::ParseError;

/// Chart constants that a host may tune.
///
/// Every field has a default, so a partial JSON object (or `{}`) is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Height of one bar, in logical pixels.
    pub bar_height: f64,
    /// Gap below each bar inside its sub-row.
    pub bar_margin: f64,
    /// Height of the time axis strip above the rows.
    pub axis_height: f64,
    /// Narrowest a bar is ever drawn, so zero-length records stay visible.
    pub min_bar_width: f64,
    /// Extra space below the last machine band.
    pub bottom_padding: f64,
    /// Length of the window derived from an anchor date.
    pub window_days: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            bar_height: 30.0,
            bar_margin: 4.0,
            axis_height: 40.0,
            min_bar_width: 20.0,
            bottom_padding: 20.0,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

/// Ten years; keeps every derived window inside chrono's date range.
const MAX_WINDOW_DAYS: u32 = 3660;

impl LayoutConfig {
    pub fn from_json(data: &[u8]) -> Result<Self, ParseError> {
        let config: LayoutConfig = serde_json::from_slice(data)?;
        if !(1..=MAX_WINDOW_DAYS).contains(&config.window_days) {
            return Err(ParseError::Config(format!(
                "window_days must be between 1 and {MAX_WINDOW_DAYS}"
            )));
        }
        if config.bar_height <= 0.0 || config.bar_margin < 0.0 {
            return Err(ParseError::Config(
                "bar_height must be positive and bar_margin non-negative".into(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let config = LayoutConfig::from_json(b"{}").ok();
        assert_eq!(config, Some(LayoutConfig::default()));
    }

    #[test]
    fn partial_override() {
        let config = LayoutConfig::from_json(br#"{"bar_height": 24, "min_bar_width": 8}"#)
            .unwrap_or_default();
        assert_eq!(config.bar_height, 24.0);
        assert_eq!(config.min_bar_width, 8.0);
        assert_eq!(config.bar_margin, 4.0);
        assert_eq!(config.window_days, 7);
    }

    #[test]
    fn rejects_zero_day_window() {
        let err = LayoutConfig::from_json(br#"{"window_days": 0}"#);
        assert!(matches!(err, Err(ParseError::Config(_))));
        let err = LayoutConfig::from_json(br#"{"window_days": 100000}"#);
        assert!(matches!(err, Err(ParseError::Config(_))));
    }
}
