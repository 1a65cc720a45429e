// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for hepcodec.
//!
//! Provides error types for event-record I/O operations:
//! - Flat-record validation (sentinel, bounds, and length checks)
//! - Open facade configuration
//! - Format read/write failures
//! - Attribute coercion

use std::fmt;

/// Errors that can occur during event-record operations.
#[derive(Debug, Clone)]
pub enum HepError {
    /// Relation range with a negative endpoint that is not the sentinel
    MalformedSentinel {
        /// Offending range, in the 0-based internal convention
        lo: i64,
        /// Offending range, in the 0-based internal convention
        hi: i64,
        /// What is wrong with it
        detail: String,
    },

    /// Relation range endpoint outside the particle array
    OutOfRange {
        /// Offending endpoint, in the 0-based internal convention
        endpoint: i64,
        /// Number of particles in the record
        n_particles: usize,
    },

    /// Parallel arrays of a flat record disagree on length
    LengthMismatch {
        /// Array name
        field: String,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Format name not in the known set
    UnknownFormat {
        /// Name that was requested or detected
        name: String,
    },

    /// Stream cannot rewind after format sniffing
    NotSeekable {
        /// What was being opened
        context: String,
    },

    /// Mode string other than "r" or "w", or an operation against the mode
    InvalidMode {
        /// Offending mode or operation
        mode: String,
        /// Why it was rejected
        reason: String,
    },

    /// Format primitive failed mid-read (not clean end-of-data)
    ReadFailed {
        /// Format context (e.g., "hepmc3", "lhef")
        format: String,
        /// Error message
        message: String,
    },

    /// Format primitive or sink failed mid-write
    WriteFailed {
        /// Format context (e.g., "hepmc2", "gzip")
        format: String,
        /// Error message
        message: String,
    },

    /// Stored attribute string does not parse as the requested type
    UnparsableAttribute {
        /// Attribute name
        name: String,
        /// Requested target type
        target: String,
        /// Underlying parse error
        cause: String,
    },

    /// Attribute already coerced to a different type
    AlreadyConverted {
        /// Attribute name
        name: String,
        /// Type it currently holds
        stored: String,
        /// Type that was requested
        requested: String,
    },

    /// Other error
    Other(String),
}

impl HepError {
    /// Create a malformed sentinel error.
    pub fn malformed_sentinel(lo: i64, hi: i64, detail: impl Into<String>) -> Self {
        HepError::MalformedSentinel {
            lo,
            hi,
            detail: detail.into(),
        }
    }

    /// Create an out-of-range error.
    pub fn out_of_range(endpoint: i64, n_particles: usize) -> Self {
        HepError::OutOfRange {
            endpoint,
            n_particles,
        }
    }

    /// Create a length mismatch error.
    pub fn length_mismatch(field: impl Into<String>, expected: usize, actual: usize) -> Self {
        HepError::LengthMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Create an "unknown format" error.
    pub fn unknown_format(name: impl Into<String>) -> Self {
        HepError::UnknownFormat { name: name.into() }
    }

    /// Create a "not seekable" error.
    pub fn not_seekable(context: impl Into<String>) -> Self {
        HepError::NotSeekable {
            context: context.into(),
        }
    }

    /// Create an invalid mode error.
    pub fn invalid_mode(mode: impl Into<String>, reason: impl Into<String>) -> Self {
        HepError::InvalidMode {
            mode: mode.into(),
            reason: reason.into(),
        }
    }

    /// Create a read failure error.
    pub fn read_failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        HepError::ReadFailed {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Create a write failure error.
    pub fn write_failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        HepError::WriteFailed {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Create an unparsable attribute error.
    pub fn unparsable_attribute(
        name: impl Into<String>,
        target: impl Into<String>,
        cause: impl Into<String>,
    ) -> Self {
        HepError::UnparsableAttribute {
            name: name.into(),
            target: target.into(),
            cause: cause.into(),
        }
    }

    /// Create an already-converted error.
    pub fn already_converted(
        name: impl Into<String>,
        stored: impl Into<String>,
        requested: impl Into<String>,
    ) -> Self {
        HepError::AlreadyConverted {
            name: name.into(),
            stored: stored.into(),
            requested: requested.into(),
        }
    }

    /// True for record validation failures (sentinel, bounds, lengths).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            HepError::MalformedSentinel { .. }
                | HepError::OutOfRange { .. }
                | HepError::LengthMismatch { .. }
        )
    }

    /// True for configuration failures raised before any I/O.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            HepError::UnknownFormat { .. }
                | HepError::NotSeekable { .. }
                | HepError::InvalidMode { .. }
        )
    }

    /// True for stream-level read/write failures.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            HepError::ReadFailed { .. } | HepError::WriteFailed { .. }
        )
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            HepError::MalformedSentinel { lo, hi, detail } => vec![
                ("lo", lo.to_string()),
                ("hi", hi.to_string()),
                ("detail", detail.clone()),
            ],
            HepError::OutOfRange {
                endpoint,
                n_particles,
            } => vec![
                ("endpoint", endpoint.to_string()),
                ("n_particles", n_particles.to_string()),
            ],
            HepError::LengthMismatch {
                field,
                expected,
                actual,
            } => vec![
                ("field", field.clone()),
                ("expected", expected.to_string()),
                ("actual", actual.to_string()),
            ],
            HepError::UnknownFormat { name } => vec![("format", name.clone())],
            HepError::NotSeekable { context } => vec![("context", context.clone())],
            HepError::InvalidMode { mode, reason } => {
                vec![("mode", mode.clone()), ("reason", reason.clone())]
            }
            HepError::ReadFailed { format, message } => {
                vec![("format", format.clone()), ("message", message.clone())]
            }
            HepError::WriteFailed { format, message } => {
                vec![("format", format.clone()), ("message", message.clone())]
            }
            HepError::UnparsableAttribute {
                name,
                target,
                cause,
            } => vec![
                ("attribute", name.clone()),
                ("target", target.clone()),
                ("cause", cause.clone()),
            ],
            HepError::AlreadyConverted {
                name,
                stored,
                requested,
            } => vec![
                ("attribute", name.clone()),
                ("stored", stored.clone()),
                ("requested", requested.clone()),
            ],
            HepError::Other(msg) => vec![("message", msg.clone())],
        }
    }
}

impl fmt::Display for HepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HepError::MalformedSentinel { lo, hi, detail } => {
                write!(f, "Malformed sentinel in range ({lo}, {hi}): {detail}")
            }
            HepError::OutOfRange {
                endpoint,
                n_particles,
            } => write!(
                f,
                "Range endpoint {endpoint} out of bounds for {n_particles} particles"
            ),
            HepError::LengthMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "Length mismatch in '{field}': expected {expected} entries, got {actual}"
            ),
            HepError::UnknownFormat { name } => {
                write!(f, "Unknown format: '{name}'")
            }
            HepError::NotSeekable { context } => {
                write!(f, "Cannot rewind after format detection: {context}")
            }
            HepError::InvalidMode { mode, reason } => {
                write!(f, "Invalid mode '{mode}': {reason}")
            }
            HepError::ReadFailed { format, message } => {
                write!(f, "{format} read error: {message}")
            }
            HepError::WriteFailed { format, message } => {
                write!(f, "{format} write error: {message}")
            }
            HepError::UnparsableAttribute {
                name,
                target,
                cause,
            } => write!(f, "Cannot parse attribute '{name}' as {target}: {cause}"),
            HepError::AlreadyConverted {
                name,
                stored,
                requested,
            } => write!(
                f,
                "Attribute '{name}' already parsed as {stored}, cannot reparse as {requested}"
            ),
            HepError::Other(msg) => write!(f, "Other error: {msg}"),
        }
    }
}

impl std::error::Error for HepError {}

impl From<std::io::Error> for HepError {
    fn from(err: std::io::Error) -> Self {
        HepError::ReadFailed {
            format: "stream".to_string(),
            message: err.to_string(),
        }
    }
}

/// Result type for hepcodec operations.
pub type Result<T> = std::result::Result<T, HepError>;
