// SPDX-License-Identifier: MPL-2.0
use crate::domain::infobar::BarId;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Io(String),
    Config(String),
    Protocol(ProtocolError),
}

/// Violations of the container or paired-handle protocol.
///
/// None of these are fatal: the container logs them and carries on with its
/// queues untouched. They are surfaced as values so callers and tests can
/// tell what was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A bar with this id is already in the container.
    DuplicateBar(BarId),

    /// The bar is not in the container.
    UnknownBar(BarId),

    /// A paired handle was constructed with the zero token.
    ZeroHandle,

    /// A paired handle was bound to a second bar.
    AlreadyBound { bound: BarId, requested: BarId },

    /// The container was destroyed; no further mutation is accepted.
    Destroyed,

    /// No live bar is paired with this counterpart token.
    UnknownHandle(u64),

    /// The `x-auto-login` header is missing a required field.
    MalformedHeader(String),
}

impl ProtocolError {
    /// Returns the diagnostics category name for this violation.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ProtocolError::DuplicateBar(_) => "duplicate_bar",
            ProtocolError::UnknownBar(_) => "unknown_bar",
            ProtocolError::ZeroHandle => "zero_handle",
            ProtocolError::AlreadyBound { .. } => "already_bound",
            ProtocolError::Destroyed => "destroyed",
            ProtocolError::UnknownHandle(_) => "unknown_handle",
            ProtocolError::MalformedHeader(_) => "malformed_header",
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::DuplicateBar(id) => {
                write!(f, "Trying to add an info bar that has already been added: {}", id)
            }
            ProtocolError::UnknownBar(id) => {
                write!(f, "Info bar is not in this container: {}", id)
            }
            ProtocolError::ZeroHandle => write!(f, "Counterpart handle must be non-zero"),
            ProtocolError::AlreadyBound { bound, requested } => write!(
                f,
                "Handle already bound to {}, cannot bind to {}",
                bound, requested
            ),
            ProtocolError::Destroyed => write!(f, "Container has been destroyed"),
            ProtocolError::UnknownHandle(raw) => {
                write!(f, "No info bar is paired with handle {:#x}", raw)
            }
            ProtocolError::MalformedHeader(msg) => write!(f, "Malformed x-auto-login header: {}", msg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Protocol(e) => write!(f, "Protocol Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<ProtocolError> for Error {
    fn from(err: ProtocolError) -> Self {
        Error::Protocol(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::infobar::BarIdSource;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn protocol_error_wraps_and_formats() {
        let id = BarIdSource::new().next_id();
        let err: Error = ProtocolError::DuplicateBar(id).into();
        assert_eq!(
            format!("{}", err),
            "Protocol Error: Trying to add an info bar that has already been added: bar#1"
        );
    }

    #[test]
    fn unknown_handle_is_printed_in_hex() {
        let err = ProtocolError::UnknownHandle(255);
        assert_eq!(err.to_string(), "No info bar is paired with handle 0xff");
        assert_eq!(err.kind(), "unknown_handle");
    }
}
