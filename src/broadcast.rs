use crate::client::RelayConnection;
use crate::types::{Event, RelayUrl, Why};
use crate::Error;
use futures_util::future::join_all;
use std::time::Duration;
use tracing::{info, warn};

/// How long to wait on each relay before giving up on it
pub const DEFAULT_RELAY_TIMEOUT: Duration = Duration::from_millis(5000);

/// What a single relay did with our event
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RelayOutcome {
    /// The relay attempted
    pub url: RelayUrl,

    /// Whether the relay accepted the event
    pub ok: bool,

    /// The relay's message, or a description of the local failure
    pub message: String,
}

/// Send a signed event to every relay, each on its own connection and timer.
///
/// All relays are attempted concurrently and the call resolves once every one
/// of them has accepted, rejected, errored, or timed out. A failing relay
/// affects only its own outcome; nothing here propagates as an error.
pub async fn broadcast(urls: &[RelayUrl], event: &Event, timeout: Duration) -> Vec<RelayOutcome> {
    let tasks = urls
        .iter()
        .map(|url| send_to_relay(url.clone(), event.clone(), timeout));
    join_all(tasks).await
}

async fn send_to_relay(url: RelayUrl, event: Event, timeout: Duration) -> RelayOutcome {
    match try_send(&url, event, timeout).await {
        Ok((ok, message)) => {
            if ok {
                info!("{} accepted event: {}", url, message);
            } else {
                match Why::from_reason(&message) {
                    Some(why) => warn!("{} rejected event ({:?}): {}", url, why, message),
                    None => warn!("{} rejected event: {}", url, message),
                }
            }
            RelayOutcome { url, ok, message }
        }
        Err(e) => {
            warn!("{} failed: {}", url, e);
            RelayOutcome {
                url,
                ok: false,
                message: e.to_string(),
            }
        }
    }
}

async fn try_send(url: &RelayUrl, event: Event, timeout: Duration) -> Result<(bool, String), Error> {
    let mut connection = RelayConnection::connect(url.as_str(), timeout).await?;
    let result = connection.post_event(event).await;
    // best effort; the outcome is already decided
    let _ = connection.disconnect().await;
    result
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::RelayMessage;
    use futures_util::{SinkExt, StreamExt};
    use std::time::Instant;
    use tokio::net::TcpListener;
    use tungstenite::protocol::Message;

    // A relay that reads one EVENT frame and acknowledges it
    async fn spawn_acking_relay(accept: bool) -> RelayUrl {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            while let Some(Ok(msg)) = ws.next().await {
                if let Message::Text(s) = msg {
                    let parsed: crate::ClientMessage = serde_json::from_str(&s).unwrap();
                    let crate::ClientMessage::Event(event) = parsed;
                    let reply = RelayMessage::Ok(
                        event.id,
                        accept,
                        if accept { "" } else { "blocked: not today" }.to_string(),
                    );
                    let wire = serde_json::to_string(&reply).unwrap();
                    ws.send(Message::Text(wire.into())).await.unwrap();
                }
            }
        });
        RelayUrl(format!("ws://{}", addr))
    }

    // A relay that accepts the websocket but never answers
    async fn spawn_silent_relay() -> RelayUrl {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            while let Some(Ok(_)) = ws.next().await {
                // swallow everything
            }
        });
        RelayUrl(format!("ws://{}", addr))
    }

    #[tokio::test]
    async fn test_broadcast_isolates_silent_relay() {
        let good = spawn_acking_relay(true).await;
        let silent = spawn_silent_relay().await;
        let event = Event::mock();

        let timeout = Duration::from_millis(500);
        let started = Instant::now();
        let outcomes = broadcast(&[good.clone(), silent.clone()], &event, timeout).await;
        let elapsed = started.elapsed();

        assert_eq!(outcomes.len(), 2);
        let good_outcome = outcomes.iter().find(|o| o.url == good).unwrap();
        assert!(good_outcome.ok);
        let silent_outcome = outcomes.iter().find(|o| o.url == silent).unwrap();
        assert!(!silent_outcome.ok);
        assert_eq!(silent_outcome.message, Error::TimedOut.to_string());

        // bounded by the slowest relay's single timeout, not their sum
        assert!(elapsed < Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn test_broadcast_reports_rejection() {
        let rejecting = spawn_acking_relay(false).await;
        let event = Event::mock();

        let outcomes = broadcast(
            &[rejecting.clone()],
            &event,
            Duration::from_millis(500),
        )
        .await;
        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].ok);
        assert_eq!(outcomes[0].message, "blocked: not today");
    }

    #[tokio::test]
    async fn test_broadcast_reports_connection_failure() {
        // nothing is listening here
        let unreachable = RelayUrl("ws://127.0.0.1:1".to_string());
        let event = Event::mock();

        let outcomes = broadcast(&[unreachable], &event, Duration::from_millis(500)).await;
        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].ok);
    }

    #[tokio::test]
    async fn test_broadcast_with_no_relays_resolves_immediately() {
        let event = Event::mock();
        let outcomes = broadcast(&[], &event, DEFAULT_RELAY_TIMEOUT).await;
        assert!(outcomes.is_empty());
    }
}
