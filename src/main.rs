use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};

mod api;
mod error;
mod inbox;
mod lifecycle;
mod models;
mod report;
mod session;
mod store;
mod trends;
mod triage;

use api::ApiClient;
use error::Error;
use inbox::Inbox;
use models::{Alert, AlertStatus, Mood, NewSelfReport, Student};
use session::Session;
use store::{AlertStore, ApiAlertBackend};
use trends::TimeRange;
use triage::{SeverityFilter, StatusFilter};

#[derive(Parser)]
#[command(name = "wellness-triage")]
#[command(about = "Triage CLI for the student wellness backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and triage risk alerts
    Alerts {
        #[command(subcommand)]
        action: AlertsCommand,
    },
    /// View notifications for the logged-in student
    Notifications {
        #[command(subcommand)]
        action: NotificationsCommand,
    },
    /// Windowed wellness statistics for the logged-in student
    Trends {
        #[arg(long, default_value = "1m")]
        range: String,
    },
    /// Submit today's self-report
    Submit {
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..=10))]
        stress: i32,
        #[arg(long)]
        mood: String,
        #[arg(long)]
        sleep: f64,
        #[arg(long, default_value = "")]
        comments: String,
    },
    /// Write a markdown wellness report
    Report {
        #[arg(long, default_value = "1m")]
        range: String,
        #[arg(long)]
        student: Option<i64>,
        #[arg(long, default_value = "wellness-report.md")]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum AlertsCommand {
    /// List alerts with summary counts
    List {
        #[arg(long, default_value = "ALL")]
        status: String,
        #[arg(long, default_value = "ALL")]
        severity: String,
        #[arg(long)]
        student: Option<i64>,
    },
    /// Acknowledge an open alert
    Ack {
        #[arg(long)]
        id: i64,
    },
    /// Resolve an acknowledged alert
    Resolve {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Subcommand)]
enum NotificationsCommand {
    /// Show unread count and recent notifications
    List {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Mark one notification as read
    Read {
        #[arg(long)]
        id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let base_url = std::env::var("WELLNESS_API_URL")
        .context("WELLNESS_API_URL must point at the wellness backend")?;
    let session = Session::from_env().ok();
    let client = ApiClient::new(base_url, session.as_ref().map(|s| s.token().to_string()));

    match cli.command {
        Commands::Alerts { action } => match action {
            AlertsCommand::List {
                status,
                severity,
                student,
            } => {
                let status: StatusFilter = status.parse().map_err(anyhow::Error::msg)?;
                let severity: SeverityFilter = severity.parse().map_err(anyhow::Error::msg)?;
                list_alerts(&client, status, severity, student).await?;
            }
            AlertsCommand::Ack { id } => {
                transition_alert(&client, id, AlertStatus::Ack).await?;
            }
            AlertsCommand::Resolve { id } => {
                transition_alert(&client, id, AlertStatus::Resolved).await?;
            }
        },
        Commands::Notifications { action } => {
            let session = require_session(session)?;
            match action {
                NotificationsCommand::List { limit } => {
                    list_notifications(&client, &session, limit).await?;
                }
                NotificationsCommand::Read { id } => {
                    read_notification(&client, &session, id).await?;
                }
            }
        }
        Commands::Trends { range } => {
            let session = require_session(session)?;
            let range: TimeRange = range.parse().map_err(anyhow::Error::msg)?;
            show_trends(&client, &session, range).await?;
        }
        Commands::Submit {
            stress,
            mood,
            sleep,
            comments,
        } => {
            let session = require_session(session)?;
            anyhow::ensure!(sleep >= 0.0, "sleep hours must be non-negative");
            let mood: Mood = mood.parse().map_err(anyhow::Error::msg)?;
            let report_id = client
                .submit_self_report(&NewSelfReport {
                    student_id: session.user_id(),
                    stress_level: stress,
                    mood,
                    sleep_hours: sleep,
                    comments,
                })
                .await?;
            println!("Report submitted (id {report_id}).");
        }
        Commands::Report {
            range,
            student,
            out,
        } => {
            let range: TimeRange = range.parse().map_err(anyhow::Error::msg)?;
            write_report(&client, range, student, &out).await?;
        }
    }

    Ok(())
}

fn require_session(session: Option<Session>) -> Result<Session, Error> {
    session.ok_or(Error::Unauthenticated)
}

async fn student_names(client: &ApiClient) -> HashMap<i64, Student> {
    match client.list_students().await {
        Ok(students) => students.into_iter().map(|s| (s.id, s)).collect(),
        Err(err) => {
            tracing::warn!(error = %err, "student fetch failed; listing ids only");
            HashMap::new()
        }
    }
}

fn student_label(names: &HashMap<i64, Student>, student_id: i64) -> String {
    names
        .get(&student_id)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| format!("student {student_id}"))
}

fn print_alert_line(alert: &Alert, names: &HashMap<i64, Student>) {
    println!(
        "- #{} [{}/{}] {} risk {:.2}: {} (triggered {})",
        alert.id,
        alert.severity,
        alert.status,
        student_label(names, alert.student_id),
        alert.risk_score,
        alert.condition,
        alert.triggered_at.format("%Y-%m-%d %H:%M")
    );
}

async fn list_alerts(
    client: &ApiClient,
    status: StatusFilter,
    severity: SeverityFilter,
    student: Option<i64>,
) -> anyhow::Result<()> {
    let mut store = AlertStore::new(ApiAlertBackend::new(client, student));
    let alerts = match store.alerts().await {
        Ok(alerts) => alerts.to_vec(),
        Err(err) if err.is_network() => {
            tracing::warn!(error = %err, "alert fetch failed");
            println!("No alerts available.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    // summary cards always reflect the whole collection
    let stats = triage::alert_stats(&alerts);
    println!(
        "{} alerts: {} open, {} acknowledged, {} resolved ({} critical, {} high)",
        stats.total, stats.open, stats.acknowledged, stats.resolved, stats.critical, stats.high
    );

    let names = student_names(client).await;
    let filtered = triage::filter_alerts(&alerts, status, severity);
    if filtered.is_empty() {
        println!("No alerts match the current filters.");
        return Ok(());
    }
    for alert in filtered {
        print_alert_line(alert, &names);
    }
    Ok(())
}

async fn transition_alert(client: &ApiClient, id: i64, target: AlertStatus) -> anyhow::Result<()> {
    let mut store = AlertStore::new(ApiAlertBackend::new(client, None));
    let updated = store.request_transition(id, target).await?;
    println!("Alert #{} is now {}.", updated.id, updated.status);
    if let Some(ack_at) = updated.ack_at {
        println!("Acknowledged at {}.", ack_at.format("%Y-%m-%d %H:%M"));
    }
    if let Some(resolved_at) = updated.resolved_at {
        println!("Resolved at {}.", resolved_at.format("%Y-%m-%d %H:%M"));
    }
    Ok(())
}

async fn list_notifications(
    client: &ApiClient,
    session: &Session,
    limit: usize,
) -> anyhow::Result<()> {
    let notifications = match client.list_notifications(session.user_id()).await {
        Ok(notifications) => notifications,
        Err(err) if err.is_network() => {
            tracing::warn!(error = %err, "notification fetch failed");
            println!("No notifications available.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let inbox = Inbox::new(notifications);
    println!("{} unread notification(s).", inbox.unread_count());
    if inbox.notifications().is_empty() {
        println!("No notifications yet.");
        return Ok(());
    }
    for notification in inbox.recent(limit) {
        let marker = if notification.is_read { " " } else { "*" };
        println!(
            "{marker} #{} {} - {} ({})",
            notification.id,
            notification.title,
            notification.message,
            notification.timestamp.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

async fn read_notification(client: &ApiClient, session: &Session, id: i64) -> anyhow::Result<()> {
    let notifications = client.list_notifications(session.user_id()).await?;
    let mut inbox = Inbox::new(notifications);
    inbox.mark_read(client, id).await?;
    println!(
        "Notification #{id} marked as read; {} unread remaining.",
        inbox.unread_count()
    );
    Ok(())
}

async fn show_trends(client: &ApiClient, session: &Session, range: TimeRange) -> anyhow::Result<()> {
    let reports = match client.list_self_reports(Some(session.user_id())).await {
        Ok(reports) => reports,
        Err(err) if err.is_network() => {
            tracing::warn!(error = %err, "self-report fetch failed");
            println!("No reports available.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let now = Utc::now();
    let mut windowed = trends::filter_by_time_range(&reports, range, now);
    trends::sort_chronological(&mut windowed);

    if windowed.is_empty() {
        println!("No reports in the {} window.", range.as_str());
        return Ok(());
    }

    let stats = trends::report_stats(&windowed);
    println!(
        "{} report(s) in the {} window (since {}):",
        windowed.len(),
        range.as_str(),
        range.cutoff(now).format("%Y-%m-%d")
    );
    println!("- Average stress: {:.1}/10", stats.average_stress);
    println!(
        "- Average sleep: {:.1}h ({})",
        stats.average_sleep,
        trends::sleep_quality(stats.average_sleep)
    );
    if let (Some(min), Some(max)) = (stats.min_sleep, stats.max_sleep) {
        println!("- Sleep range: {min:.1}h to {max:.1}h");
    }
    println!(
        "- Moods: {} happy, {} neutral, {} sad",
        stats.mood_counts.happy, stats.mood_counts.neutral, stats.mood_counts.sad
    );
    if let Some(mood) = stats.mood_counts.dominant() {
        println!("- Dominant mood: {mood}");
    }
    println!();
    for report in &windowed {
        println!(
            "- {}: stress {}/10, {} mood, {:.1}h sleep",
            report.timestamp.format("%Y-%m-%d"),
            report.stress_level,
            report.mood,
            report.sleep_hours
        );
    }
    Ok(())
}

async fn write_report(
    client: &ApiClient,
    range: TimeRange,
    student: Option<i64>,
    out: &PathBuf,
) -> anyhow::Result<()> {
    let reports = client.list_self_reports(student).await?;
    let alerts = client.list_alerts(student).await?;
    let student_name = match student {
        Some(id) => {
            let names = student_names(client).await;
            Some(student_label(&names, id))
        }
        None => None,
    };

    let now = Utc::now();
    let cutoff = range.cutoff(now);
    let mut windowed = trends::filter_by_time_range(&reports, range, now);
    trends::sort_chronological(&mut windowed);

    let report = report::build_report(student_name.as_deref(), range, cutoff, &windowed, &alerts);
    std::fs::write(out, report)?;
    println!("Report written to {}.", out.display());
    Ok(())
}
