//! Connection & obfuscation settings for a [`Client`](crate::Client).

use std::time::Duration;

use getset::{CopyGetters, Getters};
use log::warn;
use thiserror::Error;

use crate::protocol::HeaderInfo;


/// The TCP port registered for TACACS+.
pub const DEFAULT_PORT: u16 = 49;

/// How long connecting, sending & receiving may each take by default.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Maximum number of bytes read for a server reply by default.
pub const DEFAULT_RECEIVE_LIMIT: usize = 2048;

/// Minimum secret length recommended by [RFC8907 section 10.5.1].
///
/// [RFC8907 section 10.5.1]: https://www.rfc-editor.org/rfc/rfc8907.html#section-10.5.1-3.8.1
const RECOMMENDED_SECRET_LENGTH: usize = 16;

/// An invalid client configuration.
#[non_exhaustive]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No server address was provided.
    #[error("no TACACS+ server address was configured")]
    MissingServer,

    /// The shared secret was empty.
    #[error("the shared secret must not be empty")]
    EmptySecret,

    /// A zero timeout would make every socket operation fail immediately.
    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    /// The receive limit can't even fit a packet header.
    #[error("receive limit must be at least {} bytes", HeaderInfo::SIZE)]
    ReceiveLimitTooSmall,
}

/// Settings for talking to a TACACS+ server.
#[derive(Clone, Getters, CopyGetters)]
pub struct ClientConfig {
    /// Host name or IP address of the server.
    #[getset(get = "pub")]
    server: String,

    /// TCP port of the server.
    #[getset(get_copy = "pub")]
    port: u16,

    secret: Vec<u8>,

    /// Timeout applied to connecting, sending & receiving.
    #[getset(get_copy = "pub")]
    timeout: Duration,

    /// Maximum number of bytes read for a single reply.
    #[getset(get_copy = "pub")]
    receive_limit: usize,
}

impl ClientConfig {
    /// Starts building a configuration.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// The shared secret used for body obfuscation.
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }
}

// secret is left out so it doesn't end up in logs
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("timeout", &self.timeout)
            .field("receive_limit", &self.receive_limit)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ClientConfig`] objects.
pub struct ClientConfigBuilder {
    server: Option<String>,
    port: u16,
    secret: Vec<u8>,
    timeout: Duration,
    receive_limit: usize,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self {
            server: None,
            port: DEFAULT_PORT,
            secret: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            receive_limit: DEFAULT_RECEIVE_LIMIT,
        }
    }
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values for the various fields.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the server host name or IP address.
    pub fn server(mut self, server: &str) -> Self {
        self.server = Some(server.to_owned());
        self
    }

    /// Sets the server port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the shared secret.
    pub fn secret(mut self, secret: &[u8]) -> Self {
        self.secret = secret.to_owned();
        self
    }

    /// Sets the timeout for connecting, sending & receiving.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum number of bytes read for a reply.
    pub fn receive_limit(mut self, receive_limit: usize) -> Self {
        self.receive_limit = receive_limit;
        self
    }

    /// Consumes this builder and validates it into a [`ClientConfig`].
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let server = self
            .server
            .filter(|server| !server.is_empty())
            .ok_or(ConfigError::MissingServer)?;

        if self.secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        if self.receive_limit < HeaderInfo::SIZE {
            return Err(ConfigError::ReceiveLimitTooSmall);
        }

        if self.secret.len() < RECOMMENDED_SECRET_LENGTH {
            warn!(
                target: "tacacs_plus_auth",
                "shared secret for {server} is shorter than the {RECOMMENDED_SECRET_LENGTH} bytes recommended by RFC8907"
            );
        }

        Ok(ClientConfig {
            server,
            port: self.port,
            secret: self.secret,
            timeout: self.timeout,
            receive_limit: self.receive_limit,
        })
    }
}
