use std::io;

use thiserror::Error;

use super::{AuthOutcome, FailureReason, LogObserver, SessionContext, SessionObserver};
use crate::builder::{BuildError, PacketBuilder, ReplyPacketBuilder, StartPacketBuilder};
use crate::config::DEFAULT_RECEIVE_LIMIT;
use crate::protocol::authentication::{Reply, Status};
use crate::protocol::{DeserializeError, Packet, PacketFlags};
use crate::transport::Transport;

/// Sequence number of the packet that opens a session.
const START_SEQUENCE_NUMBER: u8 = 1;

/// An error during a TACACS+ authentication exchange.
///
/// These are reported to the [`SessionObserver`] for diagnostics; callers of
/// [`AuthenticationSession::authenticate`] only see the resulting [`FailureReason`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SessionError {
    /// An error occurred when reading/writing a packet.
    #[error(transparent)]
    Transport(#[from] io::Error),

    /// The start packet couldn't be assembled.
    #[error("invalid start packet: {0}")]
    InvalidRequest(#[from] BuildError),

    /// Invalid packet received from a server.
    #[error("invalid packet received from server: {0}")]
    Decode(#[from] DeserializeError),

    /// The reply's session id differs from the one the session was started with.
    #[error("reply session id {received:#010x} doesn't match session id {expected:#010x}")]
    SessionMismatch {
        /// The session id of the request.
        expected: u32,
        /// The session id in the reply.
        received: u32,
    },

    /// The reply's sequence number doesn't follow the start packet's.
    #[error("expected reply with sequence number {expected}, got {received}")]
    SequenceMismatch {
        /// The sequence number a reply should have.
        expected: u8,
        /// The sequence number in the reply.
        received: u8,
    },

    /// The server asked for a continue packet, which isn't supported.
    #[error("server requested unsupported continuation: {0:?}")]
    UnsupportedContinuation(Status),

    /// The server rejected the credentials.
    #[error("authentication rejected by server")]
    AuthenticationRejected,

    /// The server failed while processing the request.
    #[error("server reported an error while authenticating")]
    ServerError,
}

impl SessionError {
    /// The user-facing reason code for this error.
    pub fn reason(&self) -> FailureReason {
        match self {
            SessionError::Transport(_) => FailureReason::Transport,
            SessionError::InvalidRequest(_) => FailureReason::InvalidRequest,
            SessionError::Decode(DeserializeError::TruncatedPacket) => {
                FailureReason::TruncatedReply
            }
            SessionError::Decode(_) => FailureReason::MalformedReply,
            SessionError::SessionMismatch { .. } => FailureReason::SessionMismatch,
            SessionError::SequenceMismatch { .. } => FailureReason::SequenceMismatch,
            SessionError::UnsupportedContinuation(_) => FailureReason::UnsupportedContinuation,
            SessionError::AuthenticationRejected => FailureReason::AuthenticationRejected,
            SessionError::ServerError => FailureReason::ServerError,
        }
    }
}

/// Maps a reply status onto the outcome of a single-packet authentication.
fn evaluate_status(status: Status) -> Result<(), SessionError> {
    match status {
        Status::Pass => Ok(()),
        Status::Fail => Err(SessionError::AuthenticationRejected),
        Status::Error => Err(SessionError::ServerError),

        // anything else needs a CONTINUE (or a different server, for FOLLOW)
        continuation => Err(SessionError::UnsupportedContinuation(continuation)),
    }
}

/// One authentication exchange: a single start packet followed by a single reply.
///
/// Consumed by [`authenticate()`](AuthenticationSession::authenticate), so a session
/// id is never reused for a second exchange.
pub struct AuthenticationSession<'a, O: SessionObserver + ?Sized = LogObserver> {
    session_id: u32,
    secret: &'a [u8],
    observer: &'a O,
    receive_limit: usize,

    /// Sequence number of the last packet sent or received; 0 while idle.
    sequence_number: u8,
}

impl<'a, O: SessionObserver + ?Sized> AuthenticationSession<'a, O> {
    /// Creates an idle session.
    pub fn new(session_id: u32, secret: &'a [u8], observer: &'a O) -> Self {
        Self {
            session_id,
            secret,
            observer,
            receive_limit: DEFAULT_RECEIVE_LIMIT,
            sequence_number: 0,
        }
    }

    /// Sets the maximum number of bytes read for the reply.
    pub fn receive_limit(mut self, receive_limit: usize) -> Self {
        self.receive_limit = receive_limit;
        self
    }

    /// The id of this session.
    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    /// Sends the start packet, waits for the reply and interprets its status.
    pub fn authenticate<T: Transport>(
        mut self,
        mut transport: T,
        context: &SessionContext,
        password: &str,
    ) -> AuthOutcome {
        let outcome = match self.exchange(&mut transport, context, password) {
            Ok(reply) => {
                let body = reply.body();

                match evaluate_status(body.status()) {
                    Ok(()) => AuthOutcome::Success {
                        server_message: body.server_message().to_owned(),
                        data: body.data().to_vec(),
                    },
                    Err(error) => self.fail(error, body.server_message()),
                }
            }
            Err(error) => self.fail(error, ""),
        };

        self.observer.outcome(self.session_id, &outcome);
        outcome
    }

    fn exchange<T: Transport>(
        &mut self,
        transport: &mut T,
        context: &SessionContext,
        password: &str,
    ) -> Result<Packet<Reply>, SessionError> {
        let start = StartPacketBuilder::new()
            .secret(self.secret)
            .username(context.user())
            .password(password)
            .port(context.port())
            .remote_address(context.remote_address())
            .privilege_level(context.privilege_level())
            .authentication_type(context.authentication_type())
            .session_id(self.session_id)
            .sequence_number(START_SEQUENCE_NUMBER)
            .build()?;

        let wire_bytes = start.to_wire_bytes();
        transport.send(&wire_bytes)?;
        self.sequence_number = start.header().sequence_number;
        self.observer.packet_sent(start.header(), &wire_bytes);

        let raw_reply = transport.receive(self.receive_limit)?;
        self.observer.bytes_received(self.session_id, &raw_reply);

        let reply = ReplyPacketBuilder::new()
            .secret(self.secret)
            .parse(&raw_reply)?;
        self.observer.packet_received(reply.header(), &raw_reply);

        let header = reply.header();
        if header.flags.contains(PacketFlags::UNENCRYPTED)
            != start.header().flags.contains(PacketFlags::UNENCRYPTED)
        {
            return Err(DeserializeError::IncorrectUnencryptedFlag.into());
        }

        if header.session_id != self.session_id {
            return Err(SessionError::SessionMismatch {
                expected: self.session_id,
                received: header.session_id,
            });
        }

        let expected_sequence_number = self.sequence_number + 1;
        if header.sequence_number != expected_sequence_number {
            return Err(SessionError::SequenceMismatch {
                expected: expected_sequence_number,
                received: header.sequence_number,
            });
        }

        self.sequence_number = header.sequence_number;
        Ok(reply)
    }

    fn fail(&self, error: SessionError, server_message: &str) -> AuthOutcome {
        self.observer.exchange_failed(self.session_id, &error);

        AuthOutcome::Failure {
            reason: error.reason(),
            server_message: server_message.to_owned(),
        }
    }
}
