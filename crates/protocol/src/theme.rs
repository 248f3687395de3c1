use serde::{Deserialize, Serialize};

use crate::types::Color;

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    RowTint,

    // Time grid
    GridMajor,
    GridMinor,
    AxisLabelBackground,
    AxisLabelText,

    // Current time indicator
    NowMarker,
    NowMarkerText,

    // Status sub-row
    StatusActive,

    // Manufacturing order sub-row
    OrderCompleted,
    OrderInProgress,
    OrderScheduled,
    OrderDelayed,
    OrderUnknown,
    BarText,

    // Maintenance sub-row
    MaintenancePreventive,
    MaintenanceCorrective,
    MaintenanceOther,

    // Machine sidebar
    MachineOperational,
    MachineUnderMaintenance,
    MachineIdle,
    MachineUnderUpgrade,
    MachineUnknown,
    SidebarText,
    SidebarTextMuted,
}

impl ThemeToken {
    pub const ALL: [ThemeToken; 25] = {
        use ThemeToken::*;
        [
            Background,
            RowTint,
            GridMajor,
            GridMinor,
            AxisLabelBackground,
            AxisLabelText,
            NowMarker,
            NowMarkerText,
            StatusActive,
            OrderCompleted,
            OrderInProgress,
            OrderScheduled,
            OrderDelayed,
            OrderUnknown,
            BarText,
            MaintenancePreventive,
            MaintenanceCorrective,
            MaintenanceOther,
            MachineOperational,
            MachineUnderMaintenance,
            MachineIdle,
            MachineUnderUpgrade,
            MachineUnknown,
            SidebarText,
            SidebarTextMuted,
        ]
    };
}

/// Resolve a token against the light palette the chart ships with.
pub fn resolve(token: ThemeToken) -> Color {
    use ThemeToken::*;
    match token {
        Background => Color::rgb8(0xff, 0xff, 0xff),
        RowTint => Color::rgb8(0xf9, 0xf9, 0xf9),

        GridMajor => Color::rgb8(0xa0, 0xa0, 0xa0),
        GridMinor => Color::rgb8(0xe0, 0xe0, 0xe0),
        AxisLabelBackground => Color::rgb8(0xff, 0xff, 0xff),
        AxisLabelText => Color::rgb8(0x33, 0x33, 0x33),

        NowMarker => Color::rgb8(0xff, 0x57, 0x22), // Deep orange
        NowMarkerText => Color::rgb8(0xff, 0xff, 0xff),

        StatusActive => Color::rgb8(0x4c, 0xaf, 0x50), // Green

        OrderCompleted => Color::rgb8(0x4c, 0xaf, 0x50), // Green
        OrderInProgress => Color::rgb8(0x21, 0x96, 0xf3), // Blue
        OrderScheduled => Color::rgb8(0xff, 0xc1, 0x07), // Amber
        OrderDelayed => Color::rgb8(0xf4, 0x43, 0x36),   // Red
        OrderUnknown => Color::rgb8(0x75, 0x75, 0x75),   // Grey
        BarText => Color::rgb8(0x00, 0x00, 0x00),

        MaintenancePreventive => Color::rgb8(0x8b, 0xc3, 0x4a), // Light green
        MaintenanceCorrective => Color::rgb8(0xff, 0x57, 0x22), // Deep orange
        MaintenanceOther => Color::rgb8(0x9e, 0x9e, 0x9e),

        MachineOperational => Color::rgb8(0x4c, 0xaf, 0x50),
        MachineUnderMaintenance => Color::rgb8(0xff, 0xc1, 0x07),
        MachineIdle => Color::rgb8(0x21, 0x96, 0xf3),
        MachineUnderUpgrade => Color::rgb8(0x9c, 0x27, 0xb0), // Purple
        MachineUnknown => Color::rgb8(0x75, 0x75, 0x75),
        SidebarText => Color::rgb8(0x33, 0x33, 0x33),
        SidebarTextMuted => Color::rgb8(0x66, 0x66, 0x66),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_palette_matches_status_colors() {
        assert_eq!(resolve(ThemeToken::OrderCompleted).to_hex(), "#4caf50");
        assert_eq!(resolve(ThemeToken::OrderInProgress).to_hex(), "#2196f3");
        assert_eq!(resolve(ThemeToken::OrderScheduled).to_hex(), "#ffc107");
        assert_eq!(resolve(ThemeToken::OrderDelayed).to_hex(), "#f44336");
        assert_eq!(resolve(ThemeToken::OrderUnknown).to_hex(), "#757575");
    }

    #[test]
    fn every_token_resolves_opaque() {
        for token in ThemeToken::ALL {
            assert!((resolve(token).a - 1.0).abs() < f32::EPSILON, "{token:?}");
        }
    }
}
