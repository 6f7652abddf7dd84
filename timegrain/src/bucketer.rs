//! Grain selection and grid-aligned bucket boundaries for a time range.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::align::align_to_bucket_start;
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::granularity::{Granularity, GranularityTable};

/// Picks the grain whose bucket count lands closest to `ideal_bucket_count`.
///
/// Walks `table` from the first (coarsest) entry and stops as soon as a
/// candidate is strictly further from the ideal than the current best. Ties
/// keep the earlier entry and do not stop the walk. Returns `None` only for an
/// empty table.
pub fn select_granularity(
    table: &[Granularity],
    total_minutes: f64,
    ideal_bucket_count: u32,
) -> Option<&Granularity> {
    let ideal = f64::from(ideal_bucket_count);
    let distance = |g: &Granularity| (ideal - total_minutes / f64::from(g.minutes)).abs();

    let mut best = table.first()?;
    for candidate in table {
        let best_distance = distance(best);
        let candidate_distance = distance(candidate);
        if candidate_distance < best_distance {
            best = candidate;
        } else if candidate_distance > best_distance {
            break;
        }
    }
    Some(best)
}

/// Bucketing of one `[start, end)` range at a single, fixed grain.
///
/// Built once per query and never mutated. The unaligned range is kept for
/// display; the aligned boundaries are derived on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalBucketer {
    real_start: DateTime<Utc>,
    real_end: Option<DateTime<Utc>>,
    ideal_bucket_count: u32,
    grain: &'static Granularity,
    reference_now: DateTime<Utc>,
}

impl IntervalBucketer {
    /// Bucketer over the standard table, reading "now" from the system clock.
    pub fn new(
        real_start: DateTime<Utc>,
        real_end: impl Into<Option<DateTime<Utc>>>,
        ideal_bucket_count: u32,
    ) -> Result<Self> {
        Self::builder(real_start, real_end, ideal_bucket_count).build()
    }

    pub fn builder(
        real_start: DateTime<Utc>,
        real_end: impl Into<Option<DateTime<Utc>>>,
        ideal_bucket_count: u32,
    ) -> IntervalBucketerBuilder {
        IntervalBucketerBuilder {
            real_start,
            real_end: real_end.into(),
            ideal_bucket_count,
            forced_grain_minutes: None,
            table: GranularityTable::Standard,
            clock: SystemClock,
        }
    }

    pub fn best_granular_start(&self) -> DateTime<Utc> {
        align_to_bucket_start(self.real_start, self.grain.minutes)
    }

    /// Start of the bucket holding the real end, advanced by one full bucket.
    ///
    /// With `cap_at_now` the result never passes the instant captured at
    /// construction.
    pub fn best_granular_end(&self, cap_at_now: bool) -> DateTime<Utc> {
        let end = align_to_bucket_start(self.effective_end(), self.grain.minutes)
            + self.grain.duration();
        if cap_at_now && end > self.reference_now {
            self.reference_now
        } else {
            end
        }
    }

    /// Number of buckets between the aligned boundaries. Never less than one.
    pub fn bucket_count(&self) -> usize {
        let span = (self.best_granular_end(false) - self.best_granular_start()).num_minutes();
        let count = (span / i64::from(self.grain.minutes.max(1))).max(1);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    pub fn grain(&self) -> &'static Granularity {
        self.grain
    }

    pub fn grain_minutes(&self) -> u32 {
        self.grain.minutes
    }

    pub fn grain_kusto_label(&self) -> &'static str {
        self.grain.kusto_label
    }

    pub fn iso_interval(&self) -> &'static str {
        self.grain.iso_duration
    }

    pub fn grain_real_interval(&self) -> &'static str {
        self.grain.timespan
    }

    pub fn real_start(&self) -> DateTime<Utc> {
        self.real_start
    }

    pub fn real_end(&self) -> Option<DateTime<Utc>> {
        self.real_end
    }

    pub fn ideal_bucket_count(&self) -> u32 {
        self.ideal_bucket_count
    }

    pub fn reference_now(&self) -> DateTime<Utc> {
        self.reference_now
    }

    // A missing end collapses the range onto its start.
    fn effective_end(&self) -> DateTime<Utc> {
        self.real_end.unwrap_or(self.real_start)
    }
}

pub struct IntervalBucketerBuilder<C = SystemClock> {
    real_start: DateTime<Utc>,
    real_end: Option<DateTime<Utc>>,
    ideal_bucket_count: u32,
    forced_grain_minutes: Option<u32>,
    table: GranularityTable,
    clock: C,
}

impl<C: Clock> IntervalBucketerBuilder<C> {
    /// Use this grain verbatim if the active table has an entry of exactly
    /// this many minutes; otherwise the grain is selected as usual.
    pub fn forced_grain_minutes(mut self, minutes: impl Into<Option<u32>>) -> Self {
        self.forced_grain_minutes = minutes.into();
        self
    }

    pub fn coarse(mut self, coarse: bool) -> Self {
        self.table = GranularityTable::from_coarse_flag(coarse);
        self
    }

    pub fn table(mut self, table: GranularityTable) -> Self {
        self.table = table;
        self
    }

    pub fn clock<D: Clock>(self, clock: D) -> IntervalBucketerBuilder<D> {
        IntervalBucketerBuilder {
            real_start: self.real_start,
            real_end: self.real_end,
            ideal_bucket_count: self.ideal_bucket_count,
            forced_grain_minutes: self.forced_grain_minutes,
            table: self.table,
            clock,
        }
    }

    pub fn build(self) -> Result<IntervalBucketer> {
        let forced = self.forced_grain_minutes.and_then(|minutes| {
            let grain = self.table.by_minutes(minutes);
            if grain.is_none() {
                warn!("Forced grain of {minutes} minutes is not in the {:?} table", self.table);
            }
            grain
        });

        let grain = match forced {
            Some(grain) => grain,
            None => {
                let end = self.real_end.unwrap_or(self.real_start);
                let total_minutes = (end - self.real_start).num_milliseconds() as f64 / 60_000.0;
                let grain =
                    select_granularity(self.table.entries(), total_minutes, self.ideal_bucket_count)
                    .ok_or_else(|| {
                        Error::InvalidConfiguration("granularity table has no entries".to_owned())
                    })?;
                debug!(
                    "Selected {} grain for a {total_minutes:.1} minute range (ideal {} buckets)",
                    grain.kusto_label, self.ideal_bucket_count,
                );
                grain
            }
        };

        Ok(IntervalBucketer {
            real_start: self.real_start,
            real_end: self.real_end,
            ideal_bucket_count: self.ideal_bucket_count,
            grain,
            reference_now: self.clock.now(),
        })
    }
}
