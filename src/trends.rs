use std::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};

use crate::error::{Error, Result};
use crate::models::{MoodCounts, ReportStats, SelfReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    OneDay,
    OneWeek,
    OneMonth,
}

impl TimeRange {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::OneDay => "1d",
            TimeRange::OneWeek => "1w",
            TimeRange::OneMonth => "1m",
        }
    }

    /// Lower bound of the window ending at `now`. The month case is real
    /// calendar arithmetic with day-of-month clamping, not a 30-day span.
    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            TimeRange::OneDay => now - Duration::days(1),
            TimeRange::OneWeek => now - Duration::days(7),
            // checked_sub_months only fails at the far edge of the
            // representable range, where an all-inclusive window is fine.
            TimeRange::OneMonth => now
                .checked_sub_months(Months::new(1))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "1d" => Ok(TimeRange::OneDay),
            "1w" => Ok(TimeRange::OneWeek),
            "1m" => Ok(TimeRange::OneMonth),
            other => Err(format!("unknown time range: {other} (expected 1d, 1w or 1m)")),
        }
    }
}

/// Keeps reports on or after the cutoff; the window is open toward the
/// future, so anything at or past `now` stays in.
pub fn filter_by_time_range(
    reports: &[SelfReport],
    range: TimeRange,
    now: DateTime<Utc>,
) -> Vec<SelfReport> {
    let cutoff = range.cutoff(now);
    reports
        .iter()
        .filter(|report| report.timestamp >= cutoff)
        .cloned()
        .collect()
}

/// Ascending by timestamp; stable, so same-timestamp reports keep their
/// input order and charts render deterministically.
pub fn sort_chronological(reports: &mut [SelfReport]) {
    reports.sort_by_key(|report| report.timestamp);
}

pub fn report_stats(reports: &[SelfReport]) -> ReportStats {
    let count = reports.len();
    let mut mood_counts = MoodCounts::default();
    let mut stress_total = 0i64;
    let mut sleep_total = 0.0f64;
    let mut max_sleep: Option<f64> = None;
    let mut min_sleep: Option<f64> = None;

    for report in reports {
        stress_total += i64::from(report.stress_level);
        sleep_total += report.sleep_hours;
        mood_counts.record(report.mood);
        max_sleep = Some(max_sleep.map_or(report.sleep_hours, |m| m.max(report.sleep_hours)));
        min_sleep = Some(min_sleep.map_or(report.sleep_hours, |m| m.min(report.sleep_hours)));
    }

    ReportStats {
        average_stress: if count == 0 {
            0.0
        } else {
            stress_total as f64 / count as f64
        },
        average_sleep: if count == 0 {
            0.0
        } else {
            sleep_total / count as f64
        },
        mood_counts,
        max_sleep,
        min_sleep,
    }
}

/// Extrema for callers that need concrete numbers; fails instead of
/// producing a NaN or panicking on an empty set.
pub fn sleep_extrema(reports: &[SelfReport]) -> Result<(f64, f64)> {
    let stats = report_stats(reports);
    match (stats.min_sleep, stats.max_sleep) {
        (Some(min), Some(max)) => Ok((min, max)),
        _ => Err(Error::EmptyAggregate("sleep extrema")),
    }
}

/// Banding used on the sleep trend card: 8h+ is Good, 6h+ is Fair.
pub fn sleep_quality(average_sleep: f64) -> &'static str {
    if average_sleep >= 8.0 {
        "Good"
    } else if average_sleep >= 6.0 {
        "Fair"
    } else {
        "Poor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mood;
    use chrono::TimeZone;

    fn sample_report(id: i64, stress: i32, mood: Mood, sleep: f64, days_ago: i64) -> SelfReport {
        SelfReport {
            id,
            student_id: 7,
            stress_level: stress,
            mood,
            sleep_hours: sleep,
            comments: String::new(),
            timestamp: Utc::now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn one_week_window_keeps_boundary_inclusive() {
        let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
        let at_cutoff = SelfReport {
            timestamp: now - Duration::days(7),
            ..sample_report(1, 5, Mood::Neutral, 7.0, 0)
        };
        let just_before = SelfReport {
            timestamp: now - Duration::days(7) - Duration::seconds(1),
            ..sample_report(2, 5, Mood::Neutral, 7.0, 0)
        };
        let recent = SelfReport {
            timestamp: now - Duration::days(2),
            ..sample_report(3, 5, Mood::Neutral, 7.0, 0)
        };

        let reports = vec![at_cutoff, just_before, recent];
        let filtered = filter_by_time_range(&reports, TimeRange::OneWeek, now);
        let ids: Vec<i64> = filtered.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn one_month_cutoff_clamps_day_of_month() {
        let now = Utc.with_ymd_and_hms(2026, 3, 31, 9, 0, 0).unwrap();
        let cutoff = TimeRange::OneMonth.cutoff(now);
        assert_eq!(cutoff, Utc.with_ymd_and_hms(2026, 2, 28, 9, 0, 0).unwrap());
    }

    #[test]
    fn one_day_window_excludes_older_reports() {
        let now = Utc::now();
        let reports = vec![
            sample_report(1, 4, Mood::Happy, 8.0, 0),
            sample_report(2, 6, Mood::Sad, 5.0, 3),
        ];
        let filtered = filter_by_time_range(&reports, TimeRange::OneDay, now);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 1);
    }

    #[test]
    fn chronological_sort_is_stable_on_ties() {
        let stamp = Utc.with_ymd_and_hms(2026, 8, 1, 8, 0, 0).unwrap();
        let mut reports = vec![
            SelfReport {
                timestamp: stamp,
                ..sample_report(10, 5, Mood::Neutral, 7.0, 0)
            },
            SelfReport {
                timestamp: stamp - Duration::hours(1),
                ..sample_report(11, 5, Mood::Neutral, 7.0, 0)
            },
            SelfReport {
                timestamp: stamp,
                ..sample_report(12, 5, Mood::Neutral, 7.0, 0)
            },
        ];
        sort_chronological(&mut reports);
        let ids: Vec<i64> = reports.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![11, 10, 12]);
    }

    #[test]
    fn stats_match_worked_example() {
        let reports = vec![
            sample_report(1, 3, Mood::Happy, 8.0, 0),
            sample_report(2, 7, Mood::Sad, 6.5, 1),
            sample_report(3, 9, Mood::Sad, 4.0, 2),
        ];
        let stats = report_stats(&reports);
        assert!((stats.average_stress - 6.333).abs() < 0.001);
        assert!((stats.average_sleep - 6.1666).abs() < 0.001);
        assert_eq!(stats.mood_counts.happy, 1);
        assert_eq!(stats.mood_counts.sad, 2);
        assert_eq!(stats.mood_counts.neutral, 0);
        assert_eq!(stats.max_sleep, Some(8.0));
        assert_eq!(stats.min_sleep, Some(4.0));
        assert_eq!(stats.mood_counts.dominant(), Some(Mood::Sad));
    }

    #[test]
    fn empty_set_yields_defined_values_not_errors() {
        let stats = report_stats(&[]);
        assert_eq!(stats.average_stress, 0.0);
        assert_eq!(stats.average_sleep, 0.0);
        assert_eq!(stats.max_sleep, None);
        assert_eq!(stats.min_sleep, None);
        assert_eq!(stats.mood_counts.dominant(), None);
    }

    #[test]
    fn sleep_extrema_errors_on_empty_set() {
        let err = sleep_extrema(&[]).unwrap_err();
        assert!(matches!(err, Error::EmptyAggregate("sleep extrema")));

        let reports = vec![
            sample_report(1, 5, Mood::Neutral, 6.0, 0),
            sample_report(2, 5, Mood::Neutral, 9.0, 1),
        ];
        assert_eq!(sleep_extrema(&reports).unwrap(), (6.0, 9.0));
    }

    #[test]
    fn sleep_quality_bands() {
        assert_eq!(sleep_quality(8.0), "Good");
        assert_eq!(sleep_quality(7.9), "Fair");
        assert_eq!(sleep_quality(6.0), "Fair");
        assert_eq!(sleep_quality(5.5), "Poor");
        assert_eq!(sleep_quality(0.0), "Poor");
    }

    #[test]
    fn dominant_mood_prefers_happier_on_ties() {
        let mut counts = MoodCounts::default();
        counts.record(Mood::Happy);
        counts.record(Mood::Sad);
        assert_eq!(counts.dominant(), Some(Mood::Happy));
        counts.record(Mood::Sad);
        assert_eq!(counts.dominant(), Some(Mood::Sad));
    }

    #[test]
    fn range_strings_parse() {
        assert_eq!("1d".parse::<TimeRange>(), Ok(TimeRange::OneDay));
        assert_eq!("1w".parse::<TimeRange>(), Ok(TimeRange::OneWeek));
        assert_eq!("1m".parse::<TimeRange>(), Ok(TimeRange::OneMonth));
        assert!("2w".parse::<TimeRange>().is_err());
    }
}
