use core::fmt;

/// Why an authentication attempt failed.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureReason {
    /// The server rejected the credentials.
    AuthenticationRejected,

    /// The server reported an error while authenticating.
    ServerError,

    /// The server asked for more input, which would need a CONTINUE exchange.
    UnsupportedContinuation,

    /// The reply belonged to a different session.
    SessionMismatch,

    /// The reply had an unexpected sequence number.
    SequenceMismatch,

    /// The reply couldn't be decoded, e.g. due to a wrong shared secret.
    MalformedReply,

    /// Fewer bytes were received than the reply header declared.
    TruncatedReply,

    /// The start packet couldn't be built from the session context.
    InvalidRequest,

    /// The server couldn't be reached, or the connection failed mid-exchange.
    Transport,
}

impl FailureReason {
    /// A stable, machine-readable code for this reason.
    pub fn code(&self) -> &'static str {
        match self {
            FailureReason::AuthenticationRejected => "authentication_rejected",
            FailureReason::ServerError => "server_error",
            FailureReason::UnsupportedContinuation => "unsupported_continuation",
            FailureReason::SessionMismatch => "session_mismatch",
            FailureReason::SequenceMismatch => "sequence_mismatch",
            FailureReason::MalformedReply => "malformed_reply",
            FailureReason::TruncatedReply => "truncated_reply",
            FailureReason::InvalidRequest => "invalid_request",
            FailureReason::Transport => "transport",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The result of an authentication attempt.
#[must_use = "An authentication failure is not reported as an error, so the outcome must be checked."]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The server accepted the credentials.
    Success {
        /// The message returned by the server, intended to be displayed to the user.
        server_message: String,

        /// Extra data returned by the server.
        data: Vec<u8>,
    },

    /// Authentication did not succeed.
    Failure {
        /// Why the attempt failed.
        reason: FailureReason,

        /// The message returned by the server, if a reply was decoded.
        server_message: String,
    },
}

impl AuthOutcome {
    /// Whether the user was authenticated.
    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success { .. })
    }

    /// The failure reason, or `None` on success.
    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            AuthOutcome::Success { .. } => None,
            AuthOutcome::Failure { reason, .. } => Some(*reason),
        }
    }

    /// The message returned by the server, which may be empty.
    pub fn server_message(&self) -> &str {
        match self {
            AuthOutcome::Success { server_message, .. }
            | AuthOutcome::Failure { server_message, .. } => server_message,
        }
    }
}
