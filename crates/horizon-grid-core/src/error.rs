//! Errors of the core crate.

use std::fmt;

#[derive(Debug)]
pub enum CoreError {
    Signal(SignalError),
    /// A layout measurement was NaN, infinite or negative.
    InvalidGeometry(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signal(err) => write!(f, "signal error: {err}"),
            Self::InvalidGeometry(msg) => write!(f, "invalid geometry: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Signal(err) => Some(err),
            Self::InvalidGeometry(_) => None,
        }
    }
}

impl From<SignalError> for CoreError {
    fn from(err: SignalError) -> Self {
        Self::Signal(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalError {
    /// The slot was never connected or is already gone.
    InvalidConnection,
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConnection => f.write_str("no slot with this connection id"),
        }
    }
}

impl std::error::Error for SignalError {}

pub type Result<T> = std::result::Result<T, CoreError>;
