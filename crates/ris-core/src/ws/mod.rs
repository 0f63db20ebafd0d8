//! WebSocket connection lifecycle: connect, subscribe, keepalive/interrupt loop.

pub mod client;

pub use client::{
    ConnState, LoopExit, LoopOptions, ReceiverDone, ShutdownSignal, WsStream, connect, run_loop, subscribe,
};
