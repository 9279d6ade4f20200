use std::fmt;

use crate::types::Mode;

#[derive(Debug)]
pub enum Error {
    Http(reqwest::Error),
    Status(u16),
    Protocol(String),
    CommandRejected(String),
    UnsupportedMode(Mode),
    InvalidOption(String),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(e) => write!(f, "HTTP error: {e}"),
            Error::Status(code) => write!(f, "unexpected HTTP status: {code}"),
            Error::Protocol(msg) => write!(f, "protocol error: {msg}"),
            Error::CommandRejected(path) => write!(f, "device rejected command: {path}"),
            Error::UnsupportedMode(mode) => write!(f, "mode has no command: {mode:?}"),
            Error::InvalidOption(msg) => write!(f, "invalid option: {msg}"),
            Error::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Raised to coordinator listeners when a refresh did not produce fresh data.
/// The cached status is still readable, it is just stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateFailed;

impl fmt::Display for UpdateFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Innova connection issue")
    }
}

impl std::error::Error for UpdateFailed {}
