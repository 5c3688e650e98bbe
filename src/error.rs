//! Crate-wide error type.
//!
//! The core distinguishes two call sites for the same underlying parse
//! failure (see [`crate::parse`]): a scanning failure is swallowed by the
//! caller, a compile-time failure is fatal. Both are represented by the
//! same [`Error`] variants; the *policy* lives at the call site, not in
//! the type.

use std::fmt;

/// Errors raised while compiling patterns or parsing address literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A candidate span failed strict IPv4 literal parsing.
    MalformedV4,
    /// A candidate span failed strict IPv6 literal parsing.
    MalformedV6,
    /// A pattern token was not a valid single address, CIDR, or range.
    MalformedPattern(String),
    /// A CIDR pattern had low bits set and strict mode was requested.
    UnalignedCidr(String),
    /// An I/O failure at the driver boundary (file open, read, write).
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedV4 => f.write_str("malformed IPv4 literal"),
            Self::MalformedV6 => f.write_str("malformed IPv6 literal"),
            Self::MalformedPattern(p) => write!(f, "malformed pattern: {p}"),
            Self::UnalignedCidr(p) => {
                write!(f, "unaligned CIDR in strict mode: {p}")
            }
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Convenience alias used throughout the core.
pub type Result<T> = std::result::Result<T, Error>;
