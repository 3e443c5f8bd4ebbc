//! Outgoing SMS log endpoint (`/api/logs/`)

use anyhow::{Context, Result};

use super::client::{FetchError, GatewayClient};
use crate::config::Config;
use crate::models::{LogsResponse, OutgoingMessage, StatusSummary};
use crate::table::{OutgoingColumn, SortDirection, TableDisplay, TableOptions};

/// Path of the outgoing log endpoint on the dashboard.
pub const LOGS_PATH: &str = "/api/logs/";

/// Fetch the outgoing log, status summary and per-day counts once.
pub async fn fetch_logs(client: &GatewayClient) -> Result<LogsResponse, FetchError> {
    let resp: LogsResponse = client.get_json(LOGS_PATH).await?;
    tracing::debug!(
        "Fetched {} outgoing messages, {} days of counts",
        resp.messages.as_ref().map_or(0, Vec::len),
        resp.daycount.as_ref().map_or(0, |d| d.len())
    );
    Ok(resp)
}

/// "Pending 2  Processed 40  Failed 1  (43 total)"
pub fn summary_line(summary: &StatusSummary) -> String {
    format!(
        "Pending {}  Processed {}  Failed {}  ({} total)",
        summary.pending,
        summary.processed,
        summary.failed,
        summary.total()
    )
}

/// "Last 7 days: 03-03 9  03-02 0  03-01 5". Days are shown as `MM-DD`.
pub fn activity_line(days: &[(String, u64)]) -> String {
    if days.is_empty() {
        return "Last 7 days: no activity".to_string();
    }
    let counts: Vec<String> = days
        .iter()
        .map(|(day, count)| {
            let short = day.get(5..).filter(|_| day.len() == 10).unwrap_or(day.as_str());
            format!("{} {}", short, count)
        })
        .collect();
    format!("Last 7 days: {}", counts.join("  "))
}

/// Fetch the outgoing log and print it to stdout, newest first, preceded by
/// the status summary and the last seven days of activity.
pub async fn list_outgoing(config: &Config, limit: usize) -> Result<()> {
    let client = GatewayClient::new(config)?;
    let resp = fetch_logs(&client)
        .await
        .context("Failed to fetch outgoing log")?;

    if let Some(summary) = resp.status_summary() {
        println!("{}", summary_line(&summary));
    }
    println!("{}", activity_line(&resp.recent_days()));

    let mut table = TableDisplay::<OutgoingColumn>::new(TableOptions {
        order: vec![(OutgoingColumn::Id, SortDirection::Desc)],
        ..TableOptions::default()
    });
    table.add_data(resp.messages.unwrap_or_default());
    if table.is_empty() {
        println!("(no outgoing messages)");
        return Ok(());
    }

    let rows = table.display_rows();
    println!();
    println!(
        "{:>6}  {:<19}  {:<15}  {:<9}  {:>7}  {:<10}  body",
        "id", "created_at", "mobile", "status", "retries", "device"
    );
    println!("{:-<96}", "");
    for msg in rows.iter().take(limit) {
        println!("{}", format_row(msg));
    }
    if rows.len() > limit {
        println!("... {} more (use --limit)", rows.len() - limit);
    }

    Ok(())
}

fn format_row(msg: &OutgoingMessage) -> String {
    let id = msg.id.map(|id| id.to_string()).unwrap_or_default();
    let status = msg.status.map(|s| s.to_string()).unwrap_or_default();
    let body = msg.body.replace(['\r', '\n'], " ");
    format!(
        "{:>6}  {:<19}  {:<15}  {:<9}  {:>7}  {:<10}  {}",
        id, msg.created_at, msg.mobile, status, msg.retries, msg.device, body
    )
}
