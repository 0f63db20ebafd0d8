//! Receiver task: reads frames off the socket and logs one line per message.
//!
//! Each frame is classified by [`process_frame`] and then logged by
//! [`emit`]. Per-frame problems (bad JSON, unknown envelope types) never end
//! the loop; only a transport error, a peer close frame, or the end of the
//! stream does.

use std::fmt;

use futures_util::{Stream, StreamExt};
use ris_core::{Envelope, RawEnvelope};
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::render;

/// What a single frame turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// `ris_message` / `UPDATE`: the summary line.
    Update(String),
    /// `ris_message` with any other inner type: raw frame plus a short line.
    PeerEvent { raw: String, line: String },
    /// Envelope type other than `ris_message`.
    Unhandled(RawEnvelope),
    /// Frame could not be decoded.
    Malformed { error: String, raw: String },
}

/// Decode and render one frame payload.
pub fn process_frame(bytes: &[u8]) -> FrameOutcome {
    match Envelope::from_slice(bytes) {
        Err(e) => FrameOutcome::Malformed { error: e.to_string(), raw: String::from_utf8_lossy(bytes).into_owned() },
        Ok(Envelope::Other(raw)) => FrameOutcome::Unhandled(raw),
        Ok(Envelope::RisMessage(msg)) if msg.is_update() => FrameOutcome::Update(render::update_line(&msg)),
        Ok(Envelope::RisMessage(msg)) => FrameOutcome::PeerEvent {
            raw: String::from_utf8_lossy(bytes).into_owned(),
            line: render::peer_event_line(&msg),
        },
    }
}

/// Write an outcome to the log (and, for peer events, the raw frame to stdout).
pub fn emit(outcome: &FrameOutcome) {
    match outcome {
        FrameOutcome::Update(line) => info!("{line}"),
        FrameOutcome::PeerEvent { raw, line } => {
            println!();
            println!("{raw}");
            info!("{line}");
        }
        FrameOutcome::Unhandled(envelope) => info!("Received unhandled message: {envelope}"),
        FrameOutcome::Malformed { error, raw } => {
            warn!("bad parse: {error}");
            warn!("original message: {raw}");
        }
    }
}

/// Per-outcome frame counters for one receiver run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiveStats {
    pub frames: u64,
    pub updates: u64,
    pub peer_events: u64,
    pub unhandled: u64,
    pub malformed: u64,
}

impl ReceiveStats {
    fn record(&mut self, outcome: &FrameOutcome) {
        self.frames += 1;
        match outcome {
            FrameOutcome::Update(_) => self.updates += 1,
            FrameOutcome::PeerEvent { .. } => self.peer_events += 1,
            FrameOutcome::Unhandled(_) => self.unhandled += 1,
            FrameOutcome::Malformed { .. } => self.malformed += 1,
        }
    }
}

impl fmt::Display for ReceiveStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frames={} updates={} peer_events={} unhandled={} malformed={}",
            self.frames, self.updates, self.peer_events, self.unhandled, self.malformed
        )
    }
}

/// Run the receive loop until the connection ends, then signal `done`.
///
/// `done` fires exactly once. If this future is dropped or aborted first,
/// the sender is dropped instead, which the waiting side also observes.
pub async fn run_receiver<R, E>(stream: R, done: oneshot::Sender<()>) -> ReceiveStats
where
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: fmt::Display,
{
    let stats = receive_loop(stream).await;
    info!("receiver finished: {stats}");
    let _ = done.send(());
    stats
}

async fn receive_loop<R, E>(mut stream: R) -> ReceiveStats
where
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: fmt::Display,
{
    let mut stats = ReceiveStats::default();

    loop {
        let outcome = match stream.next().await {
            Some(Ok(Message::Text(text))) => process_frame(text.as_bytes()),
            // RIS Live only sends text; decode binary the same way rather than drop it.
            Some(Ok(Message::Binary(data))) => process_frame(&data),
            Some(Ok(Message::Close(frame))) => {
                info!("peer closed connection: {frame:?}");
                break;
            }
            Some(Ok(other)) => {
                debug!("ignoring control frame: {other:?}");
                continue;
            }
            Some(Err(e)) => {
                error!("error in receive: {e}");
                break;
            }
            None => {
                warn!("stream ended");
                break;
            }
        };

        emit(&outcome);
        stats.record(&outcome);
    }

    stats
}
