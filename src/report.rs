use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::{Alert, SelfReport};
use crate::trends::{self, TimeRange};
use crate::triage;

pub fn build_report(
    student_name: Option<&str>,
    range: TimeRange,
    cutoff: DateTime<Utc>,
    reports: &[SelfReport],
    alerts: &[Alert],
) -> String {
    let stats = trends::report_stats(reports);
    let alert_stats = triage::alert_stats(alerts);

    let mut output = String::new();
    let scope_label = student_name.unwrap_or("all students");

    let _ = writeln!(output, "# Wellness Report");
    let _ = writeln!(
        output,
        "Generated for {} ({} window, reports since {})",
        scope_label,
        range.as_str(),
        cutoff.format("%Y-%m-%d")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Self-Report Summary");

    if reports.is_empty() {
        let _ = writeln!(output, "No self-reports in this window.");
    } else {
        let _ = writeln!(output, "- Reports: {}", reports.len());
        let _ = writeln!(output, "- Average stress: {:.1}/10", stats.average_stress);
        let _ = writeln!(
            output,
            "- Average sleep: {:.1}h ({})",
            stats.average_sleep,
            trends::sleep_quality(stats.average_sleep)
        );
        if let (Some(min), Some(max)) = (stats.min_sleep, stats.max_sleep) {
            let _ = writeln!(output, "- Sleep range: {min:.1}h to {max:.1}h");
        }
        let _ = writeln!(
            output,
            "- Mood mix: {} happy, {} neutral, {} sad",
            stats.mood_counts.happy, stats.mood_counts.neutral, stats.mood_counts.sad
        );
        if let Some(mood) = stats.mood_counts.dominant() {
            let _ = writeln!(output, "- Dominant mood: {mood}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Alert Triage");

    if alerts.is_empty() {
        let _ = writeln!(output, "No alerts on file.");
    } else {
        let _ = writeln!(output, "- Total alerts: {}", alert_stats.total);
        let _ = writeln!(
            output,
            "- Open: {} / Acknowledged: {} / Resolved: {}",
            alert_stats.open, alert_stats.acknowledged, alert_stats.resolved
        );
        let _ = writeln!(
            output,
            "- Critical: {} / High: {}",
            alert_stats.critical, alert_stats.high
        );
    }

    let mut latest = reports.to_vec();
    latest.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Latest Reports");

    if latest.is_empty() {
        let _ = writeln!(output, "No self-reports in this window.");
    } else {
        for report in latest.iter().take(5) {
            let comment = if report.comments.is_empty() {
                String::new()
            } else {
                format!(": {}", report.comments)
            };
            let _ = writeln!(
                output,
                "- {} stress {}/10, {} mood, {:.1}h sleep{}",
                report.timestamp.format("%Y-%m-%d"),
                report.stress_level,
                report.mood,
                report.sleep_hours,
                comment
            );
        }
    }

    output
}
