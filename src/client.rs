//! An implementation of an RFC8907 TACACS+ authentication client.

use rand::Rng;

use crate::config::ClientConfig;
use crate::transport::{TcpTransport, Transport};

mod context;
pub use context::{SessionContext, SessionContextBuilder};

mod observer;
pub use observer::{LogObserver, SessionObserver};

mod response;
pub use response::{AuthOutcome, FailureReason};

mod session;
pub use session::{AuthenticationSession, SessionError};


/// A supplier of session ids, which should be unpredictable per session.
pub trait SessionIdSource {
    /// Returns the id for a new session.
    fn next_session_id(&mut self) -> u32;
}

impl<F: FnMut() -> u32> SessionIdSource for F {
    fn next_session_id(&mut self) -> u32 {
        self()
    }
}

/// Session ids drawn from the thread-local random number generator, covering the full 32-bit range.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSessionIds;

impl SessionIdSource for RandomSessionIds {
    fn next_session_id(&mut self) -> u32 {
        rand::thread_rng().gen()
    }
}

/// A TACACS+ client.
///
/// Each call to [`authenticate()`](Client::authenticate) opens a fresh connection, runs
/// one authentication session over it and closes it again.
pub struct Client<O = LogObserver, S = RandomSessionIds> {
    config: ClientConfig,
    observer: O,
    session_ids: S,
}

impl Client {
    /// Initializes a new TACACS+ client that logs through the `log` crate and uses random session ids.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            observer: LogObserver,
            session_ids: RandomSessionIds,
        }
    }
}

impl<O: SessionObserver, S: SessionIdSource> Client<O, S> {
    /// Replaces the observer notified about session progress.
    pub fn with_observer<N: SessionObserver>(self, observer: N) -> Client<N, S> {
        Client {
            config: self.config,
            observer,
            session_ids: self.session_ids,
        }
    }

    /// Replaces the source of session ids.
    pub fn with_session_ids<N: SessionIdSource>(self, session_ids: N) -> Client<O, N> {
        Client {
            config: self.config,
            observer: self.observer,
            session_ids,
        }
    }

    /// The configuration this client was created with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Authenticates against the configured server with a plaintext username & password.
    ///
    /// Failing to reach the server is reported as a [`FailureReason::Transport`] failure,
    /// distinct from the server rejecting the credentials.
    pub fn authenticate(&mut self, context: &SessionContext, password: &str) -> AuthOutcome {
        let session_id = self.session_ids.next_session_id();

        match TcpTransport::connect(&self.config) {
            // the connection is closed when the transport is dropped
            Ok(transport) => self.run_session(session_id, transport, context, password),
            Err(error) => {
                let error = SessionError::Transport(error);
                self.observer.exchange_failed(session_id, &error);

                let outcome = AuthOutcome::Failure {
                    reason: error.reason(),
                    server_message: String::new(),
                };
                self.observer.outcome(session_id, &outcome);
                outcome
            }
        }
    }

    /// Authenticates over an already established transport.
    pub fn authenticate_over<T: Transport>(
        &mut self,
        transport: T,
        context: &SessionContext,
        password: &str,
    ) -> AuthOutcome {
        let session_id = self.session_ids.next_session_id();
        self.run_session(session_id, transport, context, password)
    }

    fn run_session<T: Transport>(
        &self,
        session_id: u32,
        transport: T,
        context: &SessionContext,
        password: &str,
    ) -> AuthOutcome {
        AuthenticationSession::new(session_id, self.config.secret(), &self.observer)
            .receive_limit(self.config.receive_limit())
            .authenticate(transport, context, password)
    }
}
