use chrono::{DateTime, SecondsFormat, Utc};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::RelayConfig;
use crate::kernel::vote::{Relay, RocketLaunch};

/// Client type for the voting side, which only sends launches.
pub const USER_INTERFACE: &str = "user-interface";
/// Client type for the display side, which listens for launches.
pub const PLANET_DISPLAY: &str = "planet-display";

/// Frames this client sends to the relay server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayMessage {
    #[serde(rename_all = "camelCase")]
    LaunchRocket {
        extension_id: String,
        voter_name: String,
        job_position: String,
        timestamp: String,
    },
    RequestStats {
        timestamp: String,
    },
}

fn rfc3339(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl RelayMessage {
    pub fn launch(rocket: &RocketLaunch) -> Self {
        let sent_at = DateTime::<Utc>::from_timestamp_millis(rocket.timestamp).unwrap_or_else(Utc::now);
        Self::LaunchRocket {
            extension_id: non_empty(&rocket.extension_id, "unknown"),
            voter_name: non_empty(&rocket.voter_name, "Anonymous"),
            job_position: rocket.job_position.clone(),
            timestamp: rfc3339(sent_at),
        }
    }

    pub fn request_stats() -> Self {
        Self::RequestStats { timestamp: rfc3339(Utc::now()) }
    }
}

fn non_empty(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Frames the relay server pushes to connected clients.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayFrame {
    LaunchRocket { extension_id: String, voter_name: String },
    Stats(serde_json::Value),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomingLaunch {
    extension_id: String,
    #[serde(default)]
    voter_name: String,
}

/// Reads one text frame. Unknown types and malformed JSON yield `None`.
pub fn parse_frame(text: &str) -> Option<RelayFrame> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    match value.get("type")?.as_str()? {
        "launch_rocket" => {
            let launch: IncomingLaunch = serde_json::from_value(value).ok()?;
            Some(RelayFrame::LaunchRocket {
                extension_id: launch.extension_id,
                voter_name: non_empty(&launch.voter_name, "Anonymous"),
            })
        }
        "stats_update" | "connection_count" => Some(RelayFrame::Stats(value)),
        _ => None,
    }
}

/// Appends the client type marker the relay server uses to tell quiz
/// clients from display clients.
pub fn client_url(ws_url: &str, client_type: &str) -> String {
    let separator = if ws_url.contains('?') { '&' } else { '?' };
    format!("{ws_url}{separator}clientType={client_type}")
}

/// WebSocket relay client. `launch` queues; a background task owns the
/// socket and reconnects after a fixed delay whenever it drops.
pub struct WsRelay {
    tx: mpsc::UnboundedSender<RocketLaunch>,
    shutdown: CancellationToken,
}

impl WsRelay {
    pub fn spawn(config: &RelayConfig) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(run_relay(
            client_url(&config.ws_url, USER_INTERFACE),
            config.reconnect_delay(),
            rx,
            None,
            shutdown.clone(),
        ));
        (Self { tx, shutdown }, task)
    }

    /// Connects as a display client and forwards every recognised frame
    /// the server pushes.
    pub fn watch(
        config: &RelayConfig,
    ) -> (Self, mpsc::UnboundedReceiver<RelayFrame>, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (frames_tx, frames_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(run_relay(
            client_url(&config.ws_url, PLANET_DISPLAY),
            config.reconnect_delay(),
            rx,
            Some(frames_tx),
            shutdown.clone(),
        ));
        (Self { tx, shutdown }, frames_rx, task)
    }

    pub fn close(&self) {
        self.shutdown.cancel();
    }
}

impl Relay for WsRelay {
    fn launch(&self, rocket: RocketLaunch) {
        if self.tx.send(rocket).is_err() {
            warn!("Relay task has stopped, rocket launch dropped");
        }
    }
}

/// Stand-in when the realtime relay is switched off.
#[derive(Debug, Default)]
pub struct DisabledRelay;

impl Relay for DisabledRelay {
    fn launch(&self, rocket: RocketLaunch) {
        debug!("Relay disabled, not announcing vote for {}", rocket.extension_id);
    }
}

async fn run_relay(
    url: String,
    reconnect: Duration,
    mut rx: mpsc::UnboundedReceiver<RocketLaunch>,
    frames: Option<mpsc::UnboundedSender<RelayFrame>>,
    shutdown: CancellationToken,
) {
    // A launch that failed mid-send is retried first after reconnecting.
    let mut held: Option<RocketLaunch> = None;

    loop {
        if shutdown.is_cancelled() {
            return;
        }

        match connect_async(url.as_str()).await {
            Ok((socket, response)) => {
                info!("Relay connected: {}", response.status());
                let (mut write, mut read) = socket.split();

                if let Err(e) = send(&mut write, &RelayMessage::request_stats()).await {
                    warn!("Relay stats request failed: {}", e);
                }

                'connected: loop {
                    if let Some(rocket) = held.take() {
                        if let Err(e) = send(&mut write, &RelayMessage::launch(&rocket)).await {
                            warn!("Relay send failed: {}", e);
                            held = Some(rocket);
                            break 'connected;
                        }
                    }

                    tokio::select! {
                        _ = shutdown.cancelled() => {
                            let _ = write.send(Message::Close(None)).await;
                            return;
                        }
                        rocket = rx.recv() => match rocket {
                            Some(rocket) => held = Some(rocket),
                            None => {
                                debug!("All relay senders dropped, closing socket");
                                let _ = write.send(Message::Close(None)).await;
                                return;
                            }
                        },
                        incoming = read.next() => match incoming {
                            Some(Ok(Message::Text(text))) => forward(&text, frames.as_ref()),
                            Some(Ok(Message::Close(frame))) => {
                                info!("Relay closed by server: {:?}", frame);
                                break 'connected;
                            }
                            Some(Ok(_)) => {}
                            Some(Err(e)) => {
                                warn!("Relay socket error: {}", e);
                                break 'connected;
                            }
                            None => break 'connected,
                        },
                    }
                }
            }
            Err(e) => warn!("Relay connect to {} failed: {}", url, e),
        }

        info!("Relay reconnecting in {}ms", reconnect.as_millis());
        tokio::select! {
            _ = shutdown.cancelled() => return,
            _ = tokio::time::sleep(reconnect) => {}
        }
    }
}

async fn send<S>(write: &mut S, message: &RelayMessage) -> anyhow::Result<()>
where
    S: futures_util::Sink<Message> + Unpin,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let json = serde_json::to_string(message)?;
    write.send(Message::Text(json)).await?;
    Ok(())
}

fn forward(text: &str, frames: Option<&mpsc::UnboundedSender<RelayFrame>>) {
    let Some(frame) = parse_frame(text) else {
        debug!("Ignoring relay frame: {}", text);
        return;
    };
    if let RelayFrame::Stats(value) = &frame {
        info!("Relay stats: {}", value);
    }
    if let Some(frames) = frames {
        if frames.send(frame).is_err() {
            debug!("Frame receiver dropped");
        }
    }
}
