use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use timegrain::{BucketingConfig, FriendlyDuration};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Plan grid-aligned query windows for a time range",
    long_about = None
)]
pub struct Args {
    #[arg(
        short = 'c',
        long = "config",
        help = "Path to the TOML bucketing config (defaults to $GRAINPLAN_CONFIG)"
    )]
    pub config_path: Option<PathBuf>,
    #[arg(
        short = 'l',
        long,
        conflicts_with = "start",
        help = "Friendly range ending at --end or now: 12h, 1d, 3d, 7d or 30d"
    )]
    pub last: Option<FriendlyDuration>,
    #[arg(
        short = 's',
        long,
        required_unless_present = "last",
        help = "Range start (RFC 3339)"
    )]
    pub start: Option<DateTime<Utc>>,
    #[arg(short = 'e', long, help = "Range end (RFC 3339), defaults to now")]
    pub end: Option<DateTime<Utc>>,
    #[arg(short = 'b', long, help = "Ideal number of buckets")]
    pub buckets: Option<u32>,
    #[arg(
        short = 'g',
        long = "grain",
        help = "Force a grain, in minutes, if the active table has one"
    )]
    pub grain_minutes: Option<u32>,
    #[arg(long, help = "Use the coarse granularity table")]
    pub coarse: bool,
    #[arg(long, help = "Let the aligned end run past now")]
    pub no_cap: bool,
    #[arg(long, help = "JSONL file of {timestamp, value} points to bucket")]
    pub points: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = Aggregate::Count)]
    pub aggregate: Aggregate,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aggregate {
    Count,
    Sum,
    Average,
}

impl Args {
    /// Command-line flags take precedence over the config file.
    pub fn apply_to(&self, config: &mut BucketingConfig) {
        if let Some(buckets) = self.buckets {
            config.ideal_bucket_count = buckets;
        }
        if let Some(minutes) = self.grain_minutes {
            config.forced_grain_minutes = Some(minutes);
        }
        if self.coarse {
            config.coarse_metrics = true;
        }
        if self.no_cap {
            config.cap_end_at_now = false;
        }
    }
}
