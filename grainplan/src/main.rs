use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;
use timegrain::series::{self, DataPoint};
use timegrain::window::format_instant;
use timegrain::{
    BucketingConfig, Clock, FriendlyDuration, FriendlyRangeConverter, QueryWindow, SystemClock,
    TimeRange,
};
use tracing::{debug, info};

use crate::args::{Aggregate, Args};

mod args;

#[derive(Serialize)]
struct Plan {
    /// Set when the range is exactly one of the friendly durations.
    friendly: Option<FriendlyDuration>,
    window: QueryWindow,
    #[serde(skip_serializing_if = "Option::is_none")]
    series: Option<Vec<SeriesPoint>>,
}

#[derive(Serialize)]
struct SeriesPoint {
    start: String,
    value: f64,
}

fn main() -> Result<()> {
    shared::init_tracing!()?;
    let env_config = shared::load_env_config!()?;
    let args = Args::parse();

    let mut config = match args.config_path.as_ref().or(env_config.config_path.as_ref()) {
        Some(path) => {
            debug!("Loading bucketing config from {path:?}");
            timegrain::config::load(path)
                .with_context(|| format!("Failed to load config from {path:?}"))?
        }
        None => BucketingConfig::default(),
    };
    args.apply_to(&mut config);

    let plan = build_plan(&args, &config, SystemClock)?;
    let output = serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?;
    println!("{output}");

    Ok(())
}

fn build_plan<C: Clock + Copy>(args: &Args, config: &BucketingConfig, clock: C) -> Result<Plan> {
    let converter = FriendlyRangeConverter::with_clock(clock);
    let range = match (args.last, args.start) {
        (Some(last), _) => converter.to_real_range(last, args.end),
        (None, Some(start)) => TimeRange::new(start, args.end.unwrap_or_else(|| clock.now())),
        (None, None) => anyhow::bail!("Either --last or --start is required"),
    };

    let bucketer = config
        .bucketer(range.start, range.end, clock)
        .context("Failed to build bucketer")?;
    let window = QueryWindow::new(&bucketer, config.cap_end_at_now);
    info!(
        "Planned {} buckets of {} from {} to {}",
        window.bucket_count, window.grain, window.start, window.end,
    );

    let series = match &args.points {
        Some(path) => {
            let points = load_points(path)?;
            let buckets = series::bucket_points(&points, &bucketer);
            let aggregated = match args.aggregate {
                Aggregate::Count => series::aggregate_count(&buckets),
                Aggregate::Sum => series::aggregate_sum(&buckets),
                Aggregate::Average => series::aggregate_average(&buckets),
            };
            Some(aggregated.into_iter().map(series_point).collect())
        }
        None => None,
    };

    Ok(Plan {
        friendly: converter.to_friendly_duration(&range).ok(),
        window,
        series,
    })
}

fn series_point((start, value): (DateTime<Utc>, f64)) -> SeriesPoint {
    SeriesPoint {
        start: format_instant(start),
        value,
    }
}

/// Reads one JSON data point per non-blank line.
fn load_points(path: &Path) -> Result<Vec<DataPoint>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read points from {path:?}"))?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str::<DataPoint>(line)
                .with_context(|| format!("Invalid data point on line {} of {path:?}", i + 1))
        })
        .collect()
}
