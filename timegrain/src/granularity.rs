//! Fixed tables of bucket sizes the bucketer may choose from.
//!
//! Both tables are ordered from the coarsest grain to the finest. Grain
//! selection walks them in that order and stops at the first candidate that
//! moves away from the ideal bucket count, so the ordering is load-bearing.

use serde::Serialize;

pub const MINUTES_PER_HOUR: u32 = 60;
pub const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;

/// One candidate bucket size, with the spellings downstream consumers expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Granularity {
    /// Length of one bucket, in minutes.
    pub minutes: u32,
    /// Grain token used in query-language bin expressions, e.g. `5m`.
    pub kusto_label: &'static str,
    /// ISO-8601 duration for chart axes, e.g. `PT5M`.
    pub iso_duration: &'static str,
    /// `d.hh:mm:ss` timespan, e.g. `00:05:00`.
    pub timespan: &'static str,
}

impl Granularity {
    pub const fn new(
        minutes: u32,
        kusto_label: &'static str,
        iso_duration: &'static str,
        timespan: &'static str,
    ) -> Self {
        Granularity {
            minutes,
            kusto_label,
            iso_duration,
            timespan,
        }
    }

    pub fn class(&self) -> GrainClass {
        GrainClass::of(self.minutes)
    }

    pub fn duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.minutes))
    }
}

pub const ONE_DAY: Granularity = Granularity::new(MINUTES_PER_DAY, "1d", "P1D", "1.00:00:00");
pub const TWELVE_HOURS: Granularity = Granularity::new(720, "12h", "PT12H", "12:00:00");
pub const EIGHT_HOURS: Granularity = Granularity::new(480, "8h", "PT8H", "08:00:00");
pub const SIX_HOURS: Granularity = Granularity::new(360, "6h", "PT6H", "06:00:00");
pub const FOUR_HOURS: Granularity = Granularity::new(240, "4h", "PT4H", "04:00:00");
pub const TWO_HOURS: Granularity = Granularity::new(120, "2h", "PT2H", "02:00:00");
pub const ONE_HOUR: Granularity = Granularity::new(MINUTES_PER_HOUR, "1h", "PT1H", "01:00:00");
pub const THIRTY_MINUTES: Granularity = Granularity::new(30, "30m", "PT30M", "00:30:00");
pub const FIFTEEN_MINUTES: Granularity = Granularity::new(15, "15m", "PT15M", "00:15:00");
pub const FIVE_MINUTES: Granularity = Granularity::new(5, "5m", "PT5M", "00:05:00");
pub const ONE_MINUTE: Granularity = Granularity::new(1, "1m", "PT1M", "00:01:00");

pub static STANDARD: &[Granularity] = &[
    ONE_DAY,
    TWELVE_HOURS,
    EIGHT_HOURS,
    FOUR_HOURS,
    TWO_HOURS,
    ONE_HOUR,
    THIRTY_MINUTES,
    FIFTEEN_MINUTES,
    FIVE_MINUTES,
    ONE_MINUTE,
];

/// Used for metrics backends that only aggregate at coarser grains.
pub static COARSE: &[Granularity] = &[
    ONE_DAY,
    TWELVE_HOURS,
    SIX_HOURS,
    ONE_HOUR,
    THIRTY_MINUTES,
    FIFTEEN_MINUTES,
    FIVE_MINUTES,
    ONE_MINUTE,
];

/// Which table a bucketer draws its grain from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GranularityTable {
    #[default]
    Standard,
    Coarse,
    /// Caller-supplied table; must be ordered by strictly decreasing minutes.
    Custom(&'static [Granularity]),
}

impl GranularityTable {
    pub fn from_coarse_flag(coarse: bool) -> Self {
        if coarse {
            GranularityTable::Coarse
        } else {
            GranularityTable::Standard
        }
    }

    pub fn entries(&self) -> &'static [Granularity] {
        match self {
            GranularityTable::Standard => STANDARD,
            GranularityTable::Coarse => COARSE,
            GranularityTable::Custom(entries) => entries,
        }
    }

    pub fn by_minutes(&self, minutes: u32) -> Option<&'static Granularity> {
        self.entries().iter().find(|g| g.minutes == minutes)
    }

    pub fn by_kusto_label(&self, label: &str) -> Option<&'static Granularity> {
        self.entries().iter().find(|g| g.kusto_label == label)
    }
}

/// Calendar unit a grain anchors to when aligning bucket boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrainClass {
    Day,
    Hour,
    Minute,
}

impl GrainClass {
    pub fn of(minutes: u32) -> Self {
        if minutes >= MINUTES_PER_DAY {
            GrainClass::Day
        } else if minutes >= MINUTES_PER_HOUR {
            GrainClass::Hour
        } else {
            GrainClass::Minute
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_strictly_decreasing() {
        for table in [STANDARD, COARSE] {
            for pair in table.windows(2) {
                assert!(
                    pair[0].minutes > pair[1].minutes,
                    "{} is not coarser than {}",
                    pair[0].kusto_label,
                    pair[1].kusto_label
                );
            }
        }
    }

    #[test]
    fn test_standard_table_contents() {
        let labels: Vec<&str> = STANDARD.iter().map(|g| g.kusto_label).collect();
        assert_eq!(
            labels,
            ["1d", "12h", "8h", "4h", "2h", "1h", "30m", "15m", "5m", "1m"]
        );
    }

    #[test]
    fn test_coarse_table_contents() {
        let labels: Vec<&str> = COARSE.iter().map(|g| g.kusto_label).collect();
        assert_eq!(labels, ["1d", "12h", "6h", "1h", "30m", "15m", "5m", "1m"]);
    }

    #[test]
    fn test_table_selection() {
        assert_eq!(GranularityTable::default(), GranularityTable::Standard);
        assert_eq!(
            GranularityTable::from_coarse_flag(true).entries(),
            COARSE
        );
        assert_eq!(
            GranularityTable::from_coarse_flag(false).entries(),
            STANDARD
        );
    }

    #[test]
    fn test_lookups() {
        let standard = GranularityTable::Standard;
        assert_eq!(standard.by_minutes(480), Some(&EIGHT_HOURS));
        assert_eq!(standard.by_minutes(360), None);
        assert_eq!(GranularityTable::Coarse.by_minutes(360), Some(&SIX_HOURS));
        assert_eq!(standard.by_kusto_label("15m"), Some(&FIFTEEN_MINUTES));
        assert_eq!(standard.by_kusto_label("15 minutes"), None);
    }

    #[test]
    fn test_grain_classes() {
        assert_eq!(ONE_DAY.class(), GrainClass::Day);
        assert_eq!(TWELVE_HOURS.class(), GrainClass::Hour);
        assert_eq!(ONE_HOUR.class(), GrainClass::Hour);
        assert_eq!(THIRTY_MINUTES.class(), GrainClass::Minute);
        assert_eq!(GrainClass::of(59), GrainClass::Minute);
        assert_eq!(GrainClass::of(1439), GrainClass::Hour);
        assert_eq!(GrainClass::of(2880), GrainClass::Day);
    }
}
