//! Text rendering of `ris_message` payloads.
//!
//! UPDATE summary:
//!
//! ```text
//! 1695269583.730 UPDATE collector:rrc10.ripe.net, neighbor:24482, prefixes:[{217.29.66.158 [1.1.249.0/24]}], aspath:24482 6939 38040 23969
//! ```
//!
//! Announcement lists render as `[item item ...]` with each item as
//! `{next_hop [prefix prefix ...]}`, then get capped at
//! [`MAX_PREFIXES_WIDTH`] characters.

use ris_core::{Announcement, PathSegment, RisMessage};

/// Longest announcement rendering printed as-is.
pub const MAX_PREFIXES_WIDTH: usize = 48;

/// Characters kept when the announcement rendering is cut.
const TRUNCATED_KEEP: usize = 44;

/// Appended to a cut rendering. Keeps the result at `MAX_PREFIXES_WIDTH`.
const TRUNCATION_MARKER: &str = "...]";

/// Seconds with exactly three decimals.
pub fn format_timestamp(ts: f64) -> String {
    format!("{ts:.3}")
}

/// `[{nh [p1 p2]} {nh [p3]}]`, untruncated.
pub fn format_announcements(announcements: &[Announcement]) -> String {
    let items: Vec<String> = announcements.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(" "))
}

/// Announcement rendering capped at [`MAX_PREFIXES_WIDTH`] characters.
pub fn truncated_announcements(announcements: &[Announcement]) -> String {
    let full = format_announcements(announcements);
    if full.chars().count() <= MAX_PREFIXES_WIDTH {
        return full;
    }
    let mut cut: String = full.chars().take(TRUNCATED_KEEP).collect();
    cut.push_str(TRUNCATION_MARKER);
    cut
}

/// Space-separated AS path, no brackets.
pub fn format_path(path: &[PathSegment]) -> String {
    let hops: Vec<String> = path.iter().map(ToString::to_string).collect();
    hops.join(" ")
}

/// Withdrawals as compact JSON.
pub fn format_withdrawals(withdrawals: &[serde_json::Value]) -> String {
    serde_json::to_string(withdrawals).unwrap_or_else(|_| format!("{withdrawals:?}"))
}

/// One-line summary of an UPDATE.
pub fn update_line(msg: &RisMessage) -> String {
    format!(
        "{} {} collector:{}, neighbor:{}, prefixes:{}, aspath:{}",
        format_timestamp(msg.timestamp),
        msg.msg_type,
        msg.host,
        msg.peer_asn,
        truncated_announcements(&msg.announcements),
        format_path(&msg.path),
    )
}

/// Secondary line for OPEN / NOTIFICATION / RIS_PEER_STATE / ...
pub fn peer_event_line(msg: &RisMessage) -> String {
    format!(
        "{} {} {} {} {}",
        format_timestamp(msg.timestamp),
        msg.msg_type,
        msg.host,
        msg.peer_asn,
        format_withdrawals(&msg.withdrawals),
    )
}
