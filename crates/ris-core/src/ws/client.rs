//! Connection lifecycle for a single RIS Live WebSocket.
//!
//! The lifecycle side owns the write half of the socket:
//! 1. Connects to the endpoint. No retry: a failed handshake is fatal.
//! 2. Sends one `ris_subscribe` message.
//! 3. Sends a `ping` text message every `ping_interval`.
//! 4. On interrupt, sends a close frame and waits (bounded) for the
//!    receiver task to notice the close.
//!
//! The read half is driven elsewhere; the two sides only share the
//! receiver-done signal.

use std::fmt;
use std::time::Duration;

use futures_util::{Sink, SinkExt};
use tokio::net::TcpStream;
use tokio::sync::{oneshot, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::RisError;
use crate::types::{ControlMessage, SubscribeFilter};

/// Stream type returned by [`connect`].
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Flips to `true` once when the process is asked to stop.
pub type ShutdownSignal = watch::Receiver<bool>;

/// Completes (or errors, if the sender is dropped) when the receiver exits.
pub type ReceiverDone = oneshot::Receiver<()>;

/// Lifecycle states of the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    Connecting,
    Subscribed,
    Running,
    Closing,
    Closed,
}

impl ConnState {
    /// Move to `next`, logging the transition.
    pub fn advance(&mut self, next: ConnState) {
        debug!("connection state {self} -> {next}");
        *self = next;
    }
}

impl fmt::Display for ConnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Connecting => "connecting",
            Self::Subscribed => "subscribed",
            Self::Running => "running",
            Self::Closing => "closing",
            Self::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Timing knobs for [`run_loop`].
#[derive(Debug, Clone)]
pub struct LoopOptions {
    /// Interval between keepalive pings. The first ping goes out one
    /// interval after the loop starts.
    pub ping_interval: Duration,
    /// Upper bound on the wait for the receiver after sending a close frame.
    pub close_timeout: Duration,
}

impl From<&ClientConfig> for LoopOptions {
    fn from(cfg: &ClientConfig) -> Self {
        Self { ping_interval: cfg.ping_interval(), close_timeout: cfg.close_timeout() }
    }
}

/// Why [`run_loop`] returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopExit {
    /// Interrupt received and close frame sent. `receiver_done` tells whether
    /// the receiver finished before the close timeout.
    Interrupted { receiver_done: bool },
    /// A keepalive write failed; the connection is presumed dead.
    WriteFailed(String),
}

/// Open the WebSocket. Fails on DNS, TCP, TLS, or handshake errors.
pub async fn connect(url: &Url) -> Result<WsStream, RisError> {
    info!("connecting to {url}");
    let (stream, response) = tokio_tungstenite::connect_async(url.as_str())
        .await
        .map_err(|e| RisError::WebSocket(format!("error connecting to {url}: {e}")))?;
    debug!("handshake complete (HTTP {})", response.status());
    Ok(stream)
}

/// Send one `ris_subscribe` control message.
pub async fn subscribe<S>(sink: &mut S, filter: SubscribeFilter) -> Result<(), RisError>
where
    S: Sink<Message> + Unpin,
    S::Error: fmt::Display,
{
    info!("subscribing to: {filter}");
    let text = ControlMessage::subscribe(filter).to_json()?;
    sink.send(Message::Text(text.into()))
        .await
        .map_err(|e| RisError::WebSocket(format!("subscribe send failed: {e}")))
}

/// Keepalive / interrupt loop.
///
/// `ping` is the pre-serialized keepalive text. Timer and interrupt are
/// raced without priority. Returns only on interrupt or on a write failure.
pub async fn run_loop<S>(
    sink: &mut S,
    ping: &str,
    opts: &LoopOptions,
    shutdown: ShutdownSignal,
    mut receiver_done: ReceiverDone,
) -> LoopExit
where
    S: Sink<Message> + Unpin,
    S::Error: fmt::Display,
{
    let mut state = ConnState::Subscribed;
    state.advance(ConnState::Running);

    let mut ping_timer = tokio::time::interval_at(Instant::now() + opts.ping_interval, opts.ping_interval);
    ping_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let interrupt = interrupted(shutdown);
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            _ = ping_timer.tick() => {
                debug!("sending keepalive");
                if let Err(e) = sink.send(Message::Text(ping.to_owned().into())).await {
                    error!("error during writing to websocket: {e}");
                    state.advance(ConnState::Closed);
                    return LoopExit::WriteFailed(e.to_string());
                }
            }

            _ = &mut interrupt => {
                info!("received interrupt signal, closing connection");
                state.advance(ConnState::Closing);

                let close = CloseFrame { code: CloseCode::Normal, reason: String::new().into() };
                if let Err(e) = sink.send(Message::Close(Some(close))).await {
                    // Peer may already be gone; the receiver wait below still applies.
                    warn!("error during closing websocket: {e}");
                }

                let receiver_done = match tokio::time::timeout(opts.close_timeout, &mut receiver_done).await {
                    Ok(_) => {
                        info!("Receiver channel closed, exiting");
                        true
                    }
                    Err(_) => {
                        warn!("Timeout in closing receiving channel; exiting");
                        false
                    }
                };
                state.advance(ConnState::Closed);
                return LoopExit::Interrupted { receiver_done };
            }
        }
    }
}

/// Resolves once shutdown is requested. A dropped sender never resolves.
async fn interrupted(mut shutdown: ShutdownSignal) {
    if shutdown.wait_for(|requested| *requested).await.is_err() {
        std::future::pending::<()>().await;
    }
}
