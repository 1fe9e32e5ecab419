//! Error handling for the limecap tool
//!
//! This module provides a unified error type for all operations: capture
//! configuration validation, SoapySDR driver calls, the burst count check,
//! and record file serialization.

use std::fmt;
use std::io;

/// A specialized Result type for limecap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for limecap operations
#[derive(Debug)]
pub enum Error {
    /// I/O error while writing a record file
    Io(io::Error),

    /// Invalid capture configuration (channel plan, missing parameters)
    Config(String),

    /// SoapySDR driver call failed
    SoapySdr(soapysdr::Error),

    /// The blocking read returned a different element count than requested
    Capture { expected: usize, read: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::SoapySdr(err) => write!(f, "SoapySDR error: {}", err),
            Error::Capture { expected, read } => write!(
                f,
                "Capture error: read {} of {} requested samples",
                read, expected
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::SoapySdr(err) => Some(err),
            _ => None,
        }
    }
}

// From conversions for common error types

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<soapysdr::Error> for Error {
    fn from(err: soapysdr::Error) -> Self {
        Error::SoapySdr(err)
    }
}

impl Error {
    /// Create a configuration error with a custom message
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_config_error_constructor() {
        let err = Error::config("channel amount has to be 1 or 2");
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: channel amount has to be 1 or 2"
        );
    }

    #[test]
    fn test_capture_error_display() {
        let err = Error::Capture {
            expected: 2_000_000,
            read: 0,
        };
        assert_eq!(
            err.to_string(),
            "Capture error: read 0 of 2000000 requested samples"
        );
    }

    #[test]
    fn test_error_source() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = Error::Io(io_err);
        assert!(err.source().is_some());

        let err = Error::Config("bad plan".to_string());
        assert!(err.source().is_none());
    }
}
