use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LOW" => Ok(Severity::Low),
            "MEDIUM" => Ok(Severity::Medium),
            "HIGH" => Ok(Severity::High),
            "CRITICAL" => Ok(Severity::Critical),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    Open,
    Ack,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertStatus::Open => "OPEN",
            AlertStatus::Ack => "ACK",
            AlertStatus::Resolved => "RESOLVED",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OPEN" => Ok(AlertStatus::Open),
            "ACK" => Ok(AlertStatus::Ack),
            "RESOLVED" => Ok(AlertStatus::Resolved),
            other => Err(format!("unknown alert status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Neutral,
    Sad,
}

impl Mood {
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Neutral => "neutral",
            Mood::Sad => "sad",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "happy" => Ok(Mood::Happy),
            "neutral" => Ok(Mood::Neutral),
            "sad" => Ok(Mood::Sad),
            other => Err(format!("unknown mood: {other}")),
        }
    }
}

/// A backend-generated risk flag tied to a student. The backend alone
/// creates alerts and assigns `ack_at`/`resolved_at`; this side only ever
/// requests a status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub student_id: i64,
    pub risk_score: f64,
    pub severity: Severity,
    pub condition: String,
    pub status: AlertStatus,
    pub triggered_at: DateTime<Utc>,
    #[serde(default)]
    pub ack_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub student_id: i64,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub timestamp: DateTime<Utc>,
}

/// A student-submitted daily wellness entry. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfReport {
    pub id: i64,
    pub student_id: i64,
    pub stress_level: i32,
    pub mood: Mood,
    pub sleep_hours: f64,
    #[serde(default)]
    pub comments: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSelfReport {
    pub student_id: i64,
    pub stress_level: i32,
    pub mood: Mood,
    pub sleep_hours: f64,
    pub comments: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Summary counts over a full alert collection, never a filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlertStats {
    pub total: usize,
    pub open: usize,
    pub acknowledged: usize,
    pub resolved: usize,
    pub critical: usize,
    pub high: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoodCounts {
    pub happy: usize,
    pub neutral: usize,
    pub sad: usize,
}

impl MoodCounts {
    pub fn record(&mut self, mood: Mood) {
        match mood {
            Mood::Happy => self.happy += 1,
            Mood::Neutral => self.neutral += 1,
            Mood::Sad => self.sad += 1,
        }
    }

    pub fn count(&self, mood: Mood) -> usize {
        match mood {
            Mood::Happy => self.happy,
            Mood::Neutral => self.neutral,
            Mood::Sad => self.sad,
        }
    }

    pub fn total(&self) -> usize {
        self.happy + self.neutral + self.sad
    }

    /// Most frequent mood; ties go to the happier one. None when empty.
    pub fn dominant(&self) -> Option<Mood> {
        if self.total() == 0 {
            return None;
        }
        let mut best = Mood::Happy;
        for mood in [Mood::Neutral, Mood::Sad] {
            if self.count(mood) > self.count(best) {
                best = mood;
            }
        }
        Some(best)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportStats {
    pub average_stress: f64,
    pub average_sleep: f64,
    pub mood_counts: MoodCounts,
    pub max_sleep: Option<f64>,
    pub min_sleep: Option<f64>,
}
