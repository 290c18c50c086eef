use crate::protocol::{AuthenticationType, PrivilegeLevel};

/// Information about the user being authenticated, sent along with their password.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionContext {
    pub(super) user: String,
    pub(super) port: String,
    pub(super) remote_address: String,
    pub(super) privilege_level: PrivilegeLevel,
    pub(super) authentication_type: AuthenticationType,
}

impl SessionContext {
    /// Starts building a context for the given user.
    pub fn builder(user: &str) -> SessionContextBuilder {
        SessionContextBuilder::new(user)
    }

    /// The user being authenticated.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// The port the user is connected through.
    pub fn port(&self) -> &str {
        &self.port
    }

    /// The address the user is connecting from.
    pub fn remote_address(&self) -> &str {
        &self.remote_address
    }

    /// The privilege level requested.
    pub fn privilege_level(&self) -> PrivilegeLevel {
        self.privilege_level
    }

    /// How the password is presented to the server.
    pub fn authentication_type(&self) -> AuthenticationType {
        self.authentication_type
    }
}

/// Builder for [`SessionContext`] objects.
pub struct SessionContextBuilder {
    user: String,
    port: String,
    remote_address: String,
    privilege_level: PrivilegeLevel,
    authentication_type: AuthenticationType,
}

impl SessionContextBuilder {
    /// Creates a new builder for the given user with default values for the other fields.
    ///
    /// The port & remote address default to empty, and the password is sent via an ASCII login.
    pub fn new(user: &str) -> Self {
        Self {
            user: user.to_owned(),
            port: String::new(),
            remote_address: String::new(),
            privilege_level: Default::default(),
            authentication_type: AuthenticationType::Ascii,
        }
    }

    /// Sets the port of the resulting context.
    pub fn port(mut self, port: &str) -> Self {
        self.port = port.to_owned();
        self
    }

    /// Sets the remote address of the resulting context.
    pub fn remote_address(mut self, remote_address: &str) -> Self {
        self.remote_address = remote_address.to_owned();
        self
    }

    /// Sets the privilege level of the resulting context.
    pub fn privilege_level(mut self, privilege_level: PrivilegeLevel) -> Self {
        self.privilege_level = privilege_level;
        self
    }

    /// Sets the authentication type; only single-packet types (ASCII, PAP) can succeed.
    pub fn authentication_type(mut self, authentication_type: AuthenticationType) -> Self {
        self.authentication_type = authentication_type;
        self
    }

    /// Consumes this builder and turns it into a [`SessionContext`].
    pub fn build(self) -> SessionContext {
        SessionContext {
            user: self.user,
            port: self.port,
            remote_address: self.remote_address,
            privilege_level: self.privilege_level,
            authentication_type: self.authentication_type,
        }
    }
}
