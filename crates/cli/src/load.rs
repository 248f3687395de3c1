use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use chrono::{DateTime, Utc};
use clap::Args;
use shopfloor_core::LayoutConfig;
use shopfloor_core::layout::{ChartInput, ChartLayout, Interval, IntervalCatalog, layout_chart};
use shopfloor_core::model::{Dataset, TimeWindow};
use shopfloor_core::parsers::{parse_dataset, parse_records_auto, parse_timestamp};
use shopfloor_core::views::render_chart;
use shopfloor_protocol::RenderCommand;

#[derive(Args, Debug)]
pub struct ChartArgs {
    /// JSON exports: machines, orders, status history, maintenance, or a
    /// whole dataset object
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Window start (ISO-8601); defaults to the earliest order start
    #[arg(short, long)]
    pub start: Option<String>,

    /// Zoom level label (1h, 4h, 8h, 1d, 2d, 1w, 2w, 1m, 2m, 6m)
    #[arg(short, long, default_value = "1d")]
    pub interval: String,

    /// Viewport width in pixels
    #[arg(short, long, default_value_t = 1024.0)]
    pub width: f64,

    /// Current time (ISO-8601); defaults to the system clock
    #[arg(long)]
    pub now: Option<String>,

    /// Chart constants as a JSON object
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// A loaded dataset and the chart settings it is currently laid out with.
pub struct Session {
    pub dataset: Dataset,
    pub config: LayoutConfig,
    pub window: TimeWindow,
    pub interval: Interval,
    pub viewport_width: f64,
    pub now: DateTime<Utc>,
}

impl Session {
    pub fn open(args: &ChartArgs) -> Result<Self> {
        ensure!(
            args.width.is_finite() && args.width > 0.0,
            "viewport width must be positive, got {}",
            args.width
        );

        let config = match &args.config {
            Some(path) => {
                let data = std::fs::read(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                LayoutConfig::from_json(&data)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => LayoutConfig::default(),
        };

        let mut dataset = Dataset::default();
        for path in &args.files {
            load_file(&mut dataset, path)?;
        }

        let interval: Interval = args.interval.parse()?;
        let now = match &args.now {
            Some(raw) => parse_timestamp(raw).context("parsing --now")?,
            None => Utc::now(),
        };
        let window = match &args.start {
            Some(raw) => {
                let anchor = parse_timestamp(raw).context("parsing --start")?;
                TimeWindow::from_anchor(anchor, config.window_days)
            }
            None => match dataset.earliest_order_start() {
                Some(anchor) => TimeWindow::from_anchor(anchor, config.window_days),
                None => TimeWindow::centered_on(now, config.window_days),
            },
        };

        tracing::debug!(
            machines = dataset.machines.len(),
            records = dataset.record_count(),
            %interval,
            start = %window.start(),
            "opened session"
        );

        Ok(Self {
            dataset,
            config,
            window,
            interval,
            viewport_width: args.width,
            now,
        })
    }

    pub fn layout(&self) -> ChartLayout {
        let input = ChartInput {
            dataset: &self.dataset,
            window: self.window,
            interval: self.interval,
            viewport_width: self.viewport_width,
            config: &self.config,
        };
        layout_chart(&input, Some(self.now))
    }

    pub fn render(&self) -> Vec<RenderCommand> {
        render_chart(&self.layout(), &self.dataset.machines, &self.config)
    }

    /// Step one catalog entry finer (`delta < 0`) or coarser (`delta > 0`).
    pub fn zoom(&mut self, delta: isize) {
        let catalog = IntervalCatalog::all();
        let current = catalog
            .iter()
            .position(|i| *i == self.interval)
            .unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(catalog.len() - 1);
        self.interval = catalog[next];
    }

    /// Jump to a window centered on the current time.
    pub fn today(&mut self) {
        self.now = Utc::now();
        self.window = TimeWindow::centered_on(self.now, self.config.window_days);
    }
}

fn load_file(dataset: &mut Dataset, path: &Path) -> Result<()> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let is_object = data
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{');
    if is_object {
        let parsed = parse_dataset(&data).with_context(|| format!("parsing {}", path.display()))?;
        dataset.merge(parsed);
    } else {
        let records =
            parse_records_auto(&data).with_context(|| format!("parsing {}", path.display()))?;
        tracing::debug!(path = %path.display(), count = records.len(), "loaded records");
        dataset.absorb(records);
    }
    Ok(())
}
