//! Incoming SMS endpoint (`/api/incoming/`)

use anyhow::{Context, Result};

use super::client::{FetchError, GatewayClient};
use crate::config::Config;
use crate::models::{IncomingMessage, IncomingResponse};
use crate::table::{Column, SortDirection, TableDisplay, TableOptions};

/// Path of the incoming-messages endpoint on the dashboard.
pub const INCOMING_PATH: &str = "/api/incoming/";

/// Fetch the incoming-messages payload once.
pub async fn fetch_incoming(client: &GatewayClient) -> Result<IncomingResponse, FetchError> {
    let resp: IncomingResponse = client.get_json(INCOMING_PATH).await?;
    match resp.messages {
        Some(ref msgs) => tracing::debug!("Fetched {} incoming messages", msgs.len()),
        None => tracing::debug!("Incoming response has no messages field"),
    }
    Ok(resp)
}

/// Fetch incoming messages and print them to stdout, newest first.
pub async fn list_incoming(config: &Config, limit: usize) -> Result<()> {
    let client = GatewayClient::new(config)?;
    let resp = fetch_incoming(&client)
        .await
        .context("Failed to fetch incoming messages")?;

    let mut table = TableDisplay::<Column>::new(TableOptions {
        order: vec![(Column::Id, SortDirection::Desc)],
        ..TableOptions::default()
    });
    table.add_data(resp.messages.unwrap_or_default());
    if table.is_empty() {
        println!("(no incoming messages)");
        return Ok(());
    }

    let rows = table.display_rows();
    println!();
    println!("{:>6}  {:<19}  {:<15}  body", "id", "created_at", "mobile");
    println!("{:-<72}", "");
    for msg in rows.iter().take(limit) {
        println!("{}", format_row(msg));
    }
    if rows.len() > limit {
        println!("... {} more (use --limit)", rows.len() - limit);
    }

    Ok(())
}

/// One line of CLI output. Newlines in the body are flattened.
fn format_row(msg: &IncomingMessage) -> String {
    let id = msg.id.map(|id| id.to_string()).unwrap_or_default();
    let body = msg.body.replace(['\r', '\n'], " ");
    format!(
        "{:>6}  {:<19}  {:<15}  {}",
        id, msg.created_at, msg.mobile, body
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server::serve_once;
    use tokio::net::TcpListener;

    fn client_for(url: String) -> GatewayClient {
        GatewayClient::new(&Config {
            server_url: url,
            ..Config::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_messages() {
        let url = serve_once(
            INCOMING_PATH,
            "200 OK",
            r#"{"messages":[{"id":3,"created_at":"t3","mobile":"m3","body":"b3"},{"id":1,"created_at":"t1","mobile":"m1","body":"b1"}]}"#,
        )
        .await;

        let resp = fetch_incoming(&client_for(url)).await.unwrap();
        let msgs = resp.messages.unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].id, Some(3));
        assert_eq!(msgs[1].body, "b1");
    }

    #[tokio::test]
    async fn test_fetch_without_messages_field() {
        let url = serve_once(INCOMING_PATH, "200 OK", "{}").await;
        let resp = fetch_incoming(&client_for(url)).await.unwrap();
        assert!(resp.messages.is_none());
    }

    #[tokio::test]
    async fn test_fetch_server_error() {
        let url = serve_once(INCOMING_PATH, "500 Internal Server Error", "boom").await;
        let err = fetch_incoming(&client_for(url)).await.unwrap_err();
        match err {
            FetchError::Status { status, body, .. } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let url = serve_once(INCOMING_PATH, "200 OK", "<html>not json</html>").await;
        let err = fetch_incoming(&client_for(url)).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }), "{}", err);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = fetch_incoming(&client_for(format!("http://{}", addr)))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }), "{}", err);
    }

    #[test]
    fn test_format_row_flattens_newlines() {
        let msg = IncomingMessage {
            id: Some(42),
            created_at: "2015-01-01 00:00:00".to_string(),
            mobile: "+15550100".to_string(),
            body: "line one\nline two".to_string(),
            device: None,
        };
        let row = format_row(&msg);
        assert!(row.starts_with("    42  "));
        assert!(row.ends_with("line one line two"));

        let blank = format_row(&IncomingMessage {
            body: "partial".to_string(),
            ..IncomingMessage::default()
        });
        assert!(blank.starts_with("        "));
    }
}
