//! A synchronous client for TACACS+ ([RFC8907]) authentication.
//!
//! The [`protocol`] module handles packet (de)serialization and body obfuscation,
//! [`builder`] assembles and parses packets, and [`Client`] ties everything together
//! over a blocking TCP connection.
//!
//! [RFC8907]: https://www.rfc-editor.org/rfc/rfc8907.html

pub mod builder;
pub mod client;
pub mod config;
pub mod protocol;
pub mod transport;

pub use builder::{BuildError, PacketBuilder, ReplyPacketBuilder, StartPacketBuilder};
pub use client::{
    AuthOutcome, AuthenticationSession, Client, FailureReason, LogObserver, RandomSessionIds,
    SessionContext, SessionContextBuilder, SessionError, SessionIdSource, SessionObserver,
};
pub use config::{ClientConfig, ClientConfigBuilder, ConfigError};
pub use transport::{TcpTransport, Transport};
