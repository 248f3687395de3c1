use std::io::Write;

use anyhow::Result;
use shopfloor_core::layout::ChartLayout;
use shopfloor_core::parsers::timestamp::format_timestamp;
use shopfloor_protocol::RecordKind;

use crate::load::Session;

/// Per-machine bar counts, in sub-row order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Counts {
    status: usize,
    orders: usize,
    maintenance: usize,
}

fn count_bars(layout: &ChartLayout, machine_count: usize) -> Vec<Counts> {
    let mut counts = vec![Counts::default(); machine_count];
    for bar in &layout.bars {
        let Some(entry) = counts.get_mut(bar.machine) else {
            continue;
        };
        match bar.source.kind {
            RecordKind::Status => entry.status += 1,
            RecordKind::Order => entry.orders += 1,
            RecordKind::Maintenance => entry.maintenance += 1,
        }
    }
    counts
}

pub fn write_summary(out: &mut impl Write, session: &Session) -> Result<()> {
    let layout = session.layout();
    let machines = &session.dataset.machines;

    writeln!(
        out,
        "window   {} → {} ({})",
        format_timestamp(&layout.window.start()),
        format_timestamp(&layout.window.end()),
        layout.interval
    )?;
    writeln!(
        out,
        "canvas   {:.0} × {:.0} px, {} bars, {} major / {} minor grid lines",
        layout.total_width(),
        layout.total_height,
        layout.bars.len(),
        layout.grid.major.len(),
        layout.grid.minor.len()
    )?;
    match &layout.now_marker {
        Some(marker) => writeln!(out, "now      {} at x={:.1}", marker.label, marker.x)?,
        None => writeln!(out, "now      outside the window")?,
    }
    writeln!(out)?;

    let name_width = machines.iter().map(|m| m.name.len()).max().unwrap_or(0);
    for (machine, counts) in machines.iter().zip(count_bars(&layout, machines.len())) {
        writeln!(
            out,
            "{:<name_width$}  {:<18} status {:>3}  orders {:>3}  maintenance {:>3}",
            machine.name,
            machine.status,
            counts.status,
            counts.orders,
            counts.maintenance,
        )?;
    }
    Ok(())
}
