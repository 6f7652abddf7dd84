use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bucketer::IntervalBucketer;
use crate::clock::Clock;
use crate::error::Result;

pub const DEFAULT_IDEAL_BUCKET_COUNT: u32 = 100;

/// Bucketing settings persisted as TOML.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BucketingConfig {
    pub ideal_bucket_count: u32,
    /// Draw grains from the coarse table.
    pub coarse_metrics: bool,
    pub forced_grain_minutes: Option<u32>,
    pub cap_end_at_now: bool,
}

impl Default for BucketingConfig {
    fn default() -> Self {
        BucketingConfig {
            ideal_bucket_count: DEFAULT_IDEAL_BUCKET_COUNT,
            coarse_metrics: false,
            forced_grain_minutes: None,
            cap_end_at_now: true,
        }
    }
}

impl BucketingConfig {
    pub fn bucketer(
        &self,
        start: DateTime<Utc>,
        end: impl Into<Option<DateTime<Utc>>>,
        clock: impl Clock,
    ) -> Result<IntervalBucketer> {
        IntervalBucketer::builder(start, end, self.ideal_bucket_count)
            .coarse(self.coarse_metrics)
            .forced_grain_minutes(self.forced_grain_minutes)
            .clock(clock)
            .build()
    }
}

/// Loads a bucketing config. Returns `BucketingConfig::default()` if the file
/// doesn't exist; propagates other I/O and parse errors.
pub fn load(path: &Path) -> io::Result<BucketingConfig> {
    match fs::read_to_string(path) {
        Ok(content) => {
            toml::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BucketingConfig::default()),
        Err(e) => Err(e),
    }
}

pub fn save(path: &Path, config: &BucketingConfig) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, content)
}
