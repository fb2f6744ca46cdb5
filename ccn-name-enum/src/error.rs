//! Error types for transport and enumeration operations.

use std::fmt;

use ccn_name::NameError;

/// Errors reported by a [`Transport`](crate::Transport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// No connection to the network is available.
    Offline,
    /// The transport refused the request.
    Rejected {
        /// Reason given by the transport
        reason: String,
    },
    /// An I/O error occurred while sending or storing.
    Io {
        /// Error message
        message: String,
    },
    /// Content could not be signed for publication.
    Signing {
        /// Error message
        message: String,
    },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offline => write!(
                f,
                "transport is offline; no connection to the forwarding daemon"
            ),
            Self::Rejected { reason } => write!(f, "transport rejected the request: {reason}"),
            Self::Io { message } => write!(f, "transport I/O error: {message}"),
            Self::Signing { message } => write!(f, "failed to sign content: {message}"),
        }
    }
}

impl std::error::Error for TransportError {}

impl TransportError {
    /// Creates a `Rejected` error.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Creates an `Io` error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a `Signing` error.
    #[must_use]
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }

    /// Returns true if the transport was offline.
    #[must_use]
    pub const fn is_offline(&self) -> bool {
        matches!(self, Self::Offline)
    }
}

/// Errors returned by the enumeration engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumerationError {
    /// The transport failed; the inner error is passed through unchanged.
    Transport(TransportError),
    /// The name already contains the enumeration marker.
    ReservedMarker {
        /// The offending name
        name: String,
    },
    /// The marked query name could not be built.
    InvalidName(NameError),
}

impl fmt::Display for EnumerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "{e}"),
            Self::ReservedMarker { name } => write!(
                f,
                "name '{name}' contains the reserved enumeration marker"
            ),
            Self::InvalidName(e) => write!(f, "cannot build enumeration query name: {e}"),
        }
    }
}

impl std::error::Error for EnumerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::InvalidName(e) => Some(e),
            Self::ReservedMarker { .. } => None,
        }
    }
}

impl From<TransportError> for EnumerationError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<NameError> for EnumerationError {
    fn from(e: NameError) -> Self {
        Self::InvalidName(e)
    }
}

impl EnumerationError {
    /// Creates a `ReservedMarker` error.
    #[must_use]
    pub fn reserved_marker(name: impl Into<String>) -> Self {
        Self::ReservedMarker { name: name.into() }
    }

    /// Returns the transport error, if this is one.
    #[must_use]
    pub const fn as_transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}
