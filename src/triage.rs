use std::str::FromStr;

use crate::models::{Alert, AlertStats, AlertStatus, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(AlertStatus),
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityFilter {
    All,
    Only(Severity),
}

impl FromStr for SeverityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(SeverityFilter::All)
        } else {
            s.parse().map(SeverityFilter::Only)
        }
    }
}

impl StatusFilter {
    fn matches(self, alert: &Alert) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => alert.status == status,
        }
    }
}

impl SeverityFilter {
    fn matches(self, alert: &Alert) -> bool {
        match self {
            SeverityFilter::All => true,
            SeverityFilter::Only(severity) => alert.severity == severity,
        }
    }
}

/// Both predicates must hold. Input order is preserved; no resort.
pub fn filter_alerts<'a>(
    alerts: &'a [Alert],
    status: StatusFilter,
    severity: SeverityFilter,
) -> Vec<&'a Alert> {
    alerts
        .iter()
        .filter(|alert| status.matches(alert) && severity.matches(alert))
        .collect()
}

/// Summary counts over the whole collection, regardless of any filter the
/// caller has applied to its own view.
pub fn alert_stats(alerts: &[Alert]) -> AlertStats {
    let mut stats = AlertStats {
        total: alerts.len(),
        ..AlertStats::default()
    };
    for alert in alerts {
        match alert.status {
            AlertStatus::Open => stats.open += 1,
            AlertStatus::Ack => stats.acknowledged += 1,
            AlertStatus::Resolved => stats.resolved += 1,
        }
        match alert.severity {
            Severity::Critical => stats.critical += 1,
            Severity::High => stats.high += 1,
            Severity::Low | Severity::Medium => {}
        }
    }
    stats
}
