//! Granularity selection and grid-aligned time bucketing for charted
//! time-series queries.
//!
//! Given a time range and a target number of points, [`IntervalBucketer`]
//! picks a bucket size from a fixed table and exposes bucket boundaries that
//! stay put no matter where inside a bucket the range starts.

pub mod align;
pub mod bucketer;
pub mod clock;
pub mod config;
pub mod error;
pub mod friendly;
pub mod granularity;
pub mod series;
pub mod window;

pub use align::align_to_bucket_start;
pub use bucketer::{IntervalBucketer, IntervalBucketerBuilder, select_granularity};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::BucketingConfig;
pub use error::{Error, Result};
pub use friendly::{FriendlyDuration, FriendlyRangeConverter, TimeRange};
pub use granularity::{Granularity, GranularityTable, GrainClass};
pub use series::{DataPoint, Timestamped};
pub use window::QueryWindow;
