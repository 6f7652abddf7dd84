use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::bucketer::IntervalBucketer;

/// A row that can be placed on the bucket grid.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;

    fn value(&self) -> Option<f64> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub value: Option<f64>,
}

impl Timestamped for DataPoint {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn value(&self) -> Option<f64> {
        self.value
    }
}

pub type Bucket<'a, P> = (DateTime<Utc>, Vec<&'a P>);

/// Splits `points` into the bucketer's grid-aligned buckets.
///
/// Every bucket is emitted, empty or not. Points before the aligned start or
/// at or after the aligned end belong to no bucket and are dropped.
pub fn bucket_points<'a, P: Timestamped>(
    points: &'a [P],
    bucketer: &IntervalBucketer,
) -> Vec<Bucket<'a, P>> {
    let start = bucketer.best_granular_start();
    let bucket_secs = i64::from(bucketer.grain_minutes().max(1)) * 60;
    let num_buckets = bucketer.bucket_count();

    let mut buckets: Vec<Bucket<'a, P>> = (0..num_buckets)
        .map(|i| {
            let bucket_start = start + Duration::seconds(bucket_secs * i as i64);
            (bucket_start, Vec::new())
        })
        .collect();

    for point in points {
        let offset = (point.timestamp() - start).num_seconds();
        if offset < 0 {
            continue;
        }
        let idx = (offset / bucket_secs) as usize;
        if let Some((_, bucket)) = buckets.get_mut(idx) {
            bucket.push(point);
        }
    }

    buckets
}

pub fn aggregate_count<P>(buckets: &[Bucket<'_, P>]) -> Vec<(DateTime<Utc>, f64)> {
    buckets
        .iter()
        .map(|(ts, points)| (*ts, points.len() as f64))
        .collect()
}

pub fn aggregate_sum<P: Timestamped>(buckets: &[Bucket<'_, P>]) -> Vec<(DateTime<Utc>, f64)> {
    buckets
        .iter()
        .map(|(ts, points)| {
            let sum: f64 = points.iter().filter_map(|p| p.value()).sum();
            (*ts, sum)
        })
        .collect()
}

pub fn aggregate_average<P: Timestamped>(
    buckets: &[Bucket<'_, P>],
) -> Vec<(DateTime<Utc>, f64)> {
    buckets
        .iter()
        .map(|(ts, points)| {
            let values: Vec<f64> = points.iter().filter_map(|p| p.value()).collect();
            let avg = if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            };
            (*ts, avg)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn point(ts: &str, value: Option<f64>) -> DataPoint {
        DataPoint {
            timestamp: at(ts),
            value,
        }
    }

    fn five_minute_bucketer() -> IntervalBucketer {
        IntervalBucketer::builder(at("2017-10-18T15:02:10Z"), at("2017-10-18T15:17:40Z"), 3)
            .forced_grain_minutes(5)
            .clock(FixedClock(at("2017-10-18T15:17:40Z")))
            .build()
            .unwrap()
    }

    #[test]
    fn test_buckets_cover_aligned_range() {
        let bucketer = five_minute_bucketer();
        let points: Vec<DataPoint> = Vec::new();
        let buckets = bucket_points(&points, &bucketer);

        let starts: Vec<DateTime<Utc>> = buckets.iter().map(|(ts, _)| *ts).collect();
        assert_eq!(
            starts,
            [
                at("2017-10-18T15:00:00Z"),
                at("2017-10-18T15:05:00Z"),
                at("2017-10-18T15:10:00Z"),
                at("2017-10-18T15:15:00Z"),
            ]
        );
        assert!(buckets.iter().all(|(_, pts)| pts.is_empty()));
    }

    #[test]
    fn test_points_land_in_their_bucket() {
        let bucketer = five_minute_bucketer();
        let points = vec![
            point("2017-10-18T14:59:59Z", Some(100.0)), // before the grid
            point("2017-10-18T15:00:00Z", Some(1.0)),
            point("2017-10-18T15:04:59Z", Some(3.0)),
            point("2017-10-18T15:05:00Z", None),
            point("2017-10-18T15:19:59Z", Some(4.0)),
            point("2017-10-18T15:20:00Z", Some(100.0)), // at the aligned end
        ];
        let buckets = bucket_points(&points, &bucketer);

        let counts: Vec<f64> = aggregate_count(&buckets).into_iter().map(|(_, v)| v).collect();
        assert_eq!(counts, [2.0, 1.0, 0.0, 1.0]);

        let sums: Vec<f64> = aggregate_sum(&buckets).into_iter().map(|(_, v)| v).collect();
        assert_eq!(sums, [4.0, 0.0, 0.0, 4.0]);

        let averages: Vec<f64> = aggregate_average(&buckets)
            .into_iter()
            .map(|(_, v)| v)
            .collect();
        assert_eq!(averages, [2.0, 0.0, 0.0, 4.0]);
    }

    #[test]
    fn test_data_point_json_shape() {
        let parsed: DataPoint =
            serde_json::from_str(r#"{"timestamp":"2017-10-18T15:37:14.331Z"}"#).unwrap();
        assert_eq!(parsed, point("2017-10-18T15:37:14.331Z", None));
    }
}
