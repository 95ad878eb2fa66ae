use std::fmt::{self, Display};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// What the tokenizer ran into where a production failed to match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Found {
    Char(char),
    EndOfInput,
}

impl Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Found::Char(' ') => f.write_str("SP"),
            Found::Char(c) if c.is_control() => write!(f, "{:?}", c),
            Found::Char(c) => write!(f, "'{c}'"),
            Found::EndOfInput => f.write_str("end of input"),
        }
    }
}

/// A field did not match its production.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("syntax error at byte {position}: expected {expected}, found {found}")]
pub struct SyntaxError {
    /// Byte offset into the input.
    pub position: usize,
    pub expected: &'static str,
    pub found: Found,
}

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("unicode error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("prival {0} is out of range 0..=191")]
    PrivalOutOfRange(u8),
    #[error("bad facility code {0}")]
    BadFacility(u8),
    #[error("bad severity code {0}")]
    BadSeverity(u8),
    #[error("version {0} is out of range 1..=999")]
    InvalidVersion(u16),
    #[error("invalid {field} {value:?}")]
    InvalidHeaderField { field: &'static str, value: String },
    #[error("invalid {kind} {value:?}")]
    InvalidSdName { kind: &'static str, value: String },
}

impl Error {
    /// Returns the syntax error if parsing failed on a production.
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            Error::Syntax(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let err = Error::from(SyntaxError {
            position: 0,
            expected: "'<'",
            found: Found::Char('T'),
        });
        assert_eq!(
            err.to_string(),
            "syntax error at byte 0: expected '<', found 'T'"
        );

        let err = SyntaxError {
            position: 12,
            expected: "SP",
            found: Found::EndOfInput,
        };
        assert_eq!(
            err.to_string(),
            "syntax error at byte 12: expected SP, found end of input"
        );

        assert_eq!(
            Error::PrivalOutOfRange(200).to_string(),
            "prival 200 is out of range 0..=191"
        );
    }
}
