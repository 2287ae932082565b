// SPDX-License-Identifier: MPL-2.0
use crate::application::port::RemoteError;
use crate::domain::processing::ParameterError;
use std::fmt;

/// HTTP status the server answers with when an upload name already exists.
pub const STATUS_CONFLICT: u16 = 409;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Transport failure: connection refused, timeout, broken body.
    Network(String),
    /// Non-2xx answer from the server, or an answer that could not be decoded.
    Server { status: Option<u16>, message: String },
    /// Upload rejected because an image with the same name exists.
    DuplicateName(String),
    /// Client-side validation failure.
    InvalidParameter(String),
    /// A response arrived after a newer request for the same slot was issued.
    StaleResponseDiscarded,
    /// The operation needs a selected image.
    NoSelection,
    Io(String),
    Config(String),
}

impl Error {
    /// Returns `true` for errors that are never shown to the user.
    #[must_use]
    pub fn is_silent(&self) -> bool {
        matches!(self, Error::StaleResponseDiscarded)
    }

    /// HTTP status attached to the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Server { status, .. } => *status,
            Error::DuplicateName(_) => Some(STATUS_CONFLICT),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Network(e) => write!(f, "Network Error: {}", e),
            Error::Server {
                status: Some(status),
                message,
            } => write!(f, "Server Error ({}): {}", status, message),
            Error::Server {
                status: None,
                message,
            } => write!(f, "Server Error: {}", message),
            Error::DuplicateName(name) => write!(f, "Duplicate Name: {}", name),
            Error::InvalidParameter(e) => write!(f, "Invalid Parameter: {}", e),
            Error::StaleResponseDiscarded => write!(f, "Stale response discarded"),
            Error::NoSelection => write!(f, "No image selected"),
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<RemoteError> for Error {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Network(message) => Error::Network(message),
            RemoteError::Status { status, message } => Error::Server {
                status: Some(status),
                message,
            },
            RemoteError::Decode(message) => Error::Server {
                status: None,
                message,
            },
            RemoteError::Request(message) => Error::InvalidParameter(message),
        }
    }
}

impl From<ParameterError> for Error {
    fn from(err: ParameterError) -> Self {
        Error::InvalidParameter(err.to_string())
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

pub type Result<T> = std::result::Result<T, Error>;
