use crate::{ClientMessage, Error, Event, RelayMessage};
use base64::Engine;
use futures_util::{SinkExt, StreamExt};
use http::Uri;
use std::time::Duration;
use tracing::debug;
use tungstenite::protocol::Message;

/// A WebSocket
type Ws =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// A client connection to a relay, used to submit one event and await its
/// acknowledgment.
#[derive(Debug)]
pub struct RelayConnection {
    relay_url: String,
    websocket: Ws,
    timeout: Duration,
}

impl RelayConnection {
    /// Connect to a relay. The websocket handshake must complete within
    /// `timeout`; the same duration later bounds each wait for a reply.
    pub async fn connect(relay_url: &str, timeout: Duration) -> Result<RelayConnection, Error> {
        let (host, uri) = url_to_host_and_uri(relay_url)?;
        let key: [u8; 16] = rand::random();
        let request = http::request::Request::builder()
            .method("GET")
            .header("Host", host)
            .header("Connection", "Upgrade")
            .header("Upgrade", "websocket")
            .header("Sec-WebSocket-Version", "13")
            .header(
                "Sec-WebSocket-Key",
                base64::engine::general_purpose::STANDARD.encode(key),
            )
            .uri(uri)
            .body(())?;

        let (websocket, response) =
            tokio::time::timeout(timeout, tokio_tungstenite::connect_async(request)).await??;

        let status = response.status();
        if status.is_redirection() || status.is_client_error() || status.is_server_error() {
            return Err(Error::WebsocketConnectionFailed(status));
        }

        Ok(RelayConnection {
            relay_url: relay_url.to_string(),
            websocket,
            timeout,
        })
    }

    /// Disconnect from the relay
    pub async fn disconnect(&mut self) -> Result<(), Error> {
        let msg = Message::Close(None);
        self.websocket.send(msg).await?;
        self.websocket.close(None).await?;
        Ok(())
    }

    async fn send_message(&mut self, message: ClientMessage) -> Result<(), Error> {
        let wire = serde_json::to_string(&message)?;
        let msg = Message::Text(wire.into());
        self.websocket.send(msg).await?;
        Ok(())
    }

    async fn wait_for_message(&mut self) -> Result<Option<RelayMessage>, Error> {
        let mut timeout = tokio::time::interval(self.timeout);
        timeout.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let _ = timeout.tick().await; // use up the first immediate tick.

        loop {
            tokio::select! {
                _ = timeout.tick() => {
                    return Ok(None);
                },
                message = self.websocket.next() => {
                    let message = match message {
                        Some(m) => m,
                        None => return Err(Error::Disconnected),
                    }?;

                    match message {
                        Message::Text(s) => {
                            let output: RelayMessage = serde_json::from_str(&s)?;

                            // We never authenticate; note the challenge and keep waiting
                            if let RelayMessage::Auth(ref challenge) = output {
                                debug!("{} sent auth challenge {}", self.relay_url, challenge);
                                continue;
                            }

                            return Ok(Some(output));
                        },
                        Message::Binary(_) => { },
                        Message::Ping(_) => { },
                        Message::Pong(_) => { },
                        Message::Close(_) => return Err(Error::Disconnected),
                        Message::Frame(_) => unreachable!(),
                    }
                },
            }
        }
    }

    /// Post an event to the relay and wait for its acknowledgment
    pub async fn post_event(&mut self, event: Event) -> Result<(bool, String), Error> {
        let event_id = event.id;
        let message = ClientMessage::Event(Box::new(event));
        self.send_message(message).await?;
        loop {
            match self.wait_for_message().await? {
                None => return Err(Error::TimedOut),
                Some(RelayMessage::Ok(id, ok, msg)) => {
                    if id != event_id {
                        continue;
                    }
                    return Ok((ok, msg));
                }
                Some(_) => continue,
            }
        }
    }
}

fn url_to_host_and_uri(url: &str) -> Result<(String, Uri), Error> {
    let uri: Uri = url.parse::<Uri>()?;
    match uri.scheme_str() {
        Some("ws") | Some("wss") => {}
        Some(other) => return Err(Error::InvalidUrlScheme(other.to_owned())),
        None => return Err(Error::InvalidUrlMissingScheme),
    }
    let authority = match uri.authority() {
        Some(auth) => auth.as_str(),
        None => return Err(Error::InvalidUrlMissingAuthority),
    };
    let host = authority
        .find('@')
        .map(|idx| authority.split_at(idx + 1).1)
        .unwrap_or_else(|| authority);
    if host.is_empty() {
        Err(Error::InvalidUrlMissingAuthority)
    } else {
        Ok((host.to_owned(), uri))
    }
}
