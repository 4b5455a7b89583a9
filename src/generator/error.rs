//! Generator error types

use std::fmt;

/// Errors that can occur while configuring or running a generator
#[derive(Debug)]
pub enum GeneratorError {
    /// A generation parameter is out of range or inconsistent with another one.
    /// Raised before any record is written.
    InvalidConfiguration {
        /// Name of the offending configuration field
        field: &'static str,
        /// Description of the problem
        message: String,
    },

    /// Failure writing to or flushing the output sink
    Io(std::io::Error),

    /// A configuration file could not be decoded
    ConfigFormat(serde_json::Error),

    /// A CSV line could not be parsed into an event record
    MalformedRecord {
        /// The offending line
        line: String,
        /// What was wrong with it
        reason: String,
    },
}

impl GeneratorError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        GeneratorError::InvalidConfiguration {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn malformed(line: &str, reason: impl Into<String>) -> Self {
        GeneratorError::MalformedRecord {
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorError::InvalidConfiguration { field, message } => {
                write!(f, "Invalid configuration: {}: {}", field, message)
            }
            GeneratorError::Io(err) => write!(f, "I/O error: {}", err),
            GeneratorError::ConfigFormat(err) => write!(f, "Configuration format error: {}", err),
            GeneratorError::MalformedRecord { line, reason } => {
                write!(f, "Malformed record '{}': {}", line, reason)
            }
        }
    }
}

impl std::error::Error for GeneratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeneratorError::Io(err) => Some(err),
            GeneratorError::ConfigFormat(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GeneratorError {
    fn from(err: std::io::Error) -> Self {
        GeneratorError::Io(err)
    }
}

impl From<fmt::Error> for GeneratorError {
    fn from(err: fmt::Error) -> Self {
        GeneratorError::Io(std::io::Error::other(err))
    }
}

impl From<serde_json::Error> for GeneratorError {
    fn from(err: serde_json::Error) -> Self {
        GeneratorError::ConfigFormat(err)
    }
}
