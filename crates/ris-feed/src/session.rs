//! One client session: connect, start the receiver, subscribe, run the
//! keepalive/interrupt loop.
//!
//! ```text
//! connect ──► split ──► sink   ──► subscribe ──► run_loop (ping / interrupt)
//!                   └─► stream ──► run_receiver task ──► done ─┘
//! ```

use futures_util::StreamExt;
use ris_core::config::ClientConfig;
use ris_core::error::RisError;
use ris_core::types::ControlMessage;
use ris_core::ws::{self, ConnState, LoopExit, LoopOptions, ShutdownSignal};
use tokio::sync::oneshot;
use tracing::debug;

use crate::decoder::{self, ReceiveStats};

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub exit: LoopExit,
    /// Receiver counters, if the receiver finished on its own before the
    /// session returned.
    pub stats: Option<ReceiveStats>,
}

/// Run a session until interrupt or a keepalive write failure.
///
/// Returns `Err` only for startup failures: invalid config, handshake,
/// serialization, or a failed subscribe write.
pub async fn run_session(config: &ClientConfig, shutdown: ShutdownSignal) -> Result<SessionReport, RisError> {
    config.validate()?;
    let url = config.endpoint()?;
    let ping = ControlMessage::Ping.to_json()?;

    let mut state = ConnState::Connecting;
    let stream = ws::connect(&url).await?;
    let (mut sink, source) = stream.split();

    let (done_tx, done_rx) = oneshot::channel();
    let receiver = tokio::spawn(decoder::run_receiver(source, done_tx));

    if let Err(e) = ws::subscribe(&mut sink, config.filter()).await {
        receiver.abort();
        return Err(e);
    }
    state.advance(ConnState::Subscribed);

    let exit = ws::run_loop(&mut sink, &ping, &LoopOptions::from(config), shutdown, done_rx).await;

    if !receiver.is_finished() {
        debug!("receiver still blocked on read, aborting it");
        receiver.abort();
    }
    let stats = receiver.await.ok();

    Ok(SessionReport { exit, stats })
}
