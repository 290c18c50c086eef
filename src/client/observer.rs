use log::{debug, info, warn};

use super::{AuthOutcome, SessionError};
use crate::protocol::{HeaderInfo, PacketFlags};

const LOG_TARGET: &str = "tacacs_plus_auth";

/// Receives notifications about the progress of authentication sessions.
///
/// Every method does nothing by default.
pub trait SessionObserver {
    /// A packet was written to the transport.
    fn packet_sent(&self, _header: &HeaderInfo, _wire_bytes: &[u8]) {}

    /// Raw bytes were read from the transport, before any attempt to decode them.
    fn bytes_received(&self, _session_id: u32, _wire_bytes: &[u8]) {}

    /// A packet was received and decoded.
    fn packet_received(&self, _header: &HeaderInfo, _wire_bytes: &[u8]) {}

    /// The exchange failed; the error carries details hidden from the [`AuthOutcome`].
    fn exchange_failed(&self, _session_id: u32, _error: &SessionError) {}

    /// The session finished.
    fn outcome(&self, _session_id: u32, _outcome: &AuthOutcome) {}
}

/// Forwards session events to the [`log`] facade.
///
/// Packet headers & obfuscated bodies are logged at debug level, as are raw replies before
/// they are decoded. Bodies of unobfuscated outgoing packets are never logged since they
/// contain the plaintext password.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl SessionObserver for LogObserver {
    fn packet_sent(&self, header: &HeaderInfo, wire_bytes: &[u8]) {
        log_header("sent", header, wire_bytes.len());

        let (header_bytes, body_bytes) = split_packet(wire_bytes);
        debug!(target: LOG_TARGET, "sent header: {}", hex::encode(header_bytes));

        if !header.flags.contains(PacketFlags::UNENCRYPTED) {
            debug!(target: LOG_TARGET, "sent body: {}", hex::encode(body_bytes));
        }
    }

    fn bytes_received(&self, session_id: u32, wire_bytes: &[u8]) {
        let (header_bytes, body_bytes) = split_packet(wire_bytes);

        debug!(
            target: LOG_TARGET,
            "session {session_id:#010x} received header: {}",
            hex::encode(header_bytes)
        );
        debug!(
            target: LOG_TARGET,
            "session {session_id:#010x} received body: {}",
            hex::encode(body_bytes)
        );
    }

    fn packet_received(&self, header: &HeaderInfo, wire_bytes: &[u8]) {
        log_header("received", header, wire_bytes.len());
    }

    fn exchange_failed(&self, session_id: u32, error: &SessionError) {
        warn!(
            target: LOG_TARGET,
            "session {session_id:#010x} failed ({}): {error}",
            error.reason()
        );
    }

    fn outcome(&self, session_id: u32, outcome: &AuthOutcome) {
        match outcome.reason() {
            None => info!(target: LOG_TARGET, "session {session_id:#010x} authenticated"),
            Some(reason) => info!(
                target: LOG_TARGET,
                "session {session_id:#010x} not authenticated: {reason}"
            ),
        }
    }
}

fn log_header(direction: &str, header: &HeaderInfo, length: usize) {
    debug!(
        target: LOG_TARGET,
        "{direction} {length} bytes: session {:#010x}, seq {}, flags {:?}",
        header.session_id,
        header.sequence_number,
        header.flags
    );
}

/// Splits a packet into header & body, tolerating inputs shorter than a header.
fn split_packet(wire_bytes: &[u8]) -> (&[u8], &[u8]) {
    wire_bytes.split_at(HeaderInfo::SIZE.min(wire_bytes.len()))
}
