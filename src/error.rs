//! Error taxonomy shared by builders, conversions and the client.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every failure this crate can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// A request was malformed; raised by `build()` before any network interaction.
    #[error("validation error: {0}")]
    Validation(String),
    /// The channel or connection failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The remote service reported a semantic failure for a unary operation.
    #[error(transparent)]
    Application(#[from] ApplicationError),
    /// A scan chunk carried a non-empty error; buffered items were discarded.
    #[error("scan stream error: {message}")]
    Stream {
        /// The error reported by the remote service.
        message: String,
    },
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the request was rejected by `build()`.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether the channel failed.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Whether the remote service rejected a unary operation.
    pub fn is_application(&self) -> bool {
        matches!(self, Self::Application(_))
    }

    /// Whether a scan stream reported an error chunk.
    pub fn is_stream(&self) -> bool {
        matches!(self, Self::Stream { .. })
    }

    /// Whether a conditional write was rejected by its condition expression.
    pub fn is_condition_check_failed(&self) -> bool {
        matches!(
            self,
            Self::Application(ApplicationError {
                kind: ApplicationErrorKind::ConditionCheckFailed,
                ..
            })
        )
    }
}

/// Channel or connection failure, surfaced unchanged.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The address could not be turned into an endpoint.
    #[error("invalid address {address}: {message}")]
    InvalidAddress {
        /// The rejected address.
        address: String,
        /// Why it was rejected.
        message: String,
    },
    /// The eager connection attempt failed.
    #[error("failed to connect to {address}: {message}")]
    Connect {
        /// The address that was dialled.
        address: String,
        /// The underlying failure.
        message: String,
    },
    /// The client was closed before or while the call was running.
    #[error("channel is closed")]
    Closed,
    /// The call failed at the transport level.
    #[error("transport status {code:?}: {message}")]
    Status {
        /// The gRPC status code.
        code: tonic::Code,
        /// The status message.
        message: String,
    },
    /// The response could not be decoded into the value model.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Kind of semantic failure reported by the remote service.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum ApplicationErrorKind {
    /// The addressed item or resource does not exist.
    #[error("not found")]
    NotFound,
    /// The service rejected an argument.
    #[error("invalid argument")]
    InvalidArgument,
    /// A condition expression evaluated to false.
    #[error("condition check failed")]
    ConditionCheckFailed,
    /// A transaction was cancelled by the service.
    #[error("transaction aborted")]
    TransactionAborted,
    /// The item or resource already exists.
    #[error("already exists")]
    AlreadyExists,
    /// A quota or rate limit was hit.
    #[error("resource exhausted")]
    ResourceExhausted,
    /// The service does not implement the operation.
    #[error("unimplemented")]
    Unimplemented,
    /// The caller may not perform the operation.
    #[error("permission denied")]
    PermissionDenied,
    /// The response carried a non-empty error field.
    #[error("remote error")]
    Remote,
}

/// Semantic failure reported by the remote service.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ApplicationError {
    /// What went wrong.
    pub kind: ApplicationErrorKind,
    /// The message reported by the service.
    pub message: String,
}

impl ApplicationError {
    /// Create an application error.
    pub fn new(kind: ApplicationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<tonic::Status> for Error {
    fn from(status: tonic::Status) -> Self {
        let message = status.message().to_string();
        let kind = match status.code() {
            tonic::Code::NotFound => ApplicationErrorKind::NotFound,
            tonic::Code::InvalidArgument => ApplicationErrorKind::InvalidArgument,
            tonic::Code::FailedPrecondition => ApplicationErrorKind::ConditionCheckFailed,
            tonic::Code::Aborted => ApplicationErrorKind::TransactionAborted,
            tonic::Code::AlreadyExists => ApplicationErrorKind::AlreadyExists,
            tonic::Code::ResourceExhausted => ApplicationErrorKind::ResourceExhausted,
            tonic::Code::Unimplemented => ApplicationErrorKind::Unimplemented,
            tonic::Code::PermissionDenied => ApplicationErrorKind::PermissionDenied,
            code => return Self::Transport(TransportError::Status { code, message }),
        };
        Self::Application(ApplicationError { kind, message })
    }
}

/// Turn the optional error field of a unary response into an `Err`.
pub(crate) fn check_remote_error(error: Option<String>) -> Result<()> {
    match error {
        Some(message) if !message.is_empty() => Err(ApplicationError::new(
            ApplicationErrorKind::Remote,
            message,
        )
        .into()),
        _ => Ok(()),
    }
}
