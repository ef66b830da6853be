//! Shared error type across otpchat crates.

use thiserror::Error;

/// Stable error codes, used as a structured log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Inbound bytes were not a valid envelope, or the payload did not fit its shape.
    MalformedEnvelope,
    /// Envelope without a type tag.
    EmptyEventType,
    /// Envelope type tag with no known shape or handler.
    UnsupportedEventType,
    /// Login collaborator refused or answered without a token.
    LoginFailed,
    /// Persistent connection is gone.
    TransportClosed,
    /// Operation not valid in the current connection state.
    InvalidState,
    /// Configuration rejected.
    BadConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Anything else.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and tests.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MalformedEnvelope => "MALFORMED_ENVELOPE",
            ErrorCode::EmptyEventType => "EMPTY_EVENT_TYPE",
            ErrorCode::UnsupportedEventType => "UNSUPPORTED_EVENT_TYPE",
            ErrorCode::LoginFailed => "LOGIN_FAILED",
            ErrorCode::TransportClosed => "TRANSPORT_CLOSED",
            ErrorCode::InvalidState => "INVALID_STATE",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ChatError>;

/// Unified error type used by core and client.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),
    #[error("empty event type")]
    EmptyEventType,
    #[error("unsupported event type: {0}")]
    UnsupportedEventType(String),
    #[error("login failed: {0}")]
    LoginFailed(String),
    #[error("transport closed")]
    TransportClosed,
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl ChatError {
    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            ChatError::MalformedEnvelope(_) => ErrorCode::MalformedEnvelope,
            ChatError::EmptyEventType => ErrorCode::EmptyEventType,
            ChatError::UnsupportedEventType(_) => ErrorCode::UnsupportedEventType,
            ChatError::LoginFailed(_) => ErrorCode::LoginFailed,
            ChatError::TransportClosed => ErrorCode::TransportClosed,
            ChatError::InvalidState(_) => ErrorCode::InvalidState,
            ChatError::BadConfig(_) => ErrorCode::BadConfig,
            ChatError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            ChatError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Per-message failures never escalate to the connection.
    pub fn is_per_message(&self) -> bool {
        matches!(
            self,
            ChatError::MalformedEnvelope(_)
                | ChatError::EmptyEventType
                | ChatError::UnsupportedEventType(_)
        )
    }
}
