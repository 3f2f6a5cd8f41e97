//! Errors raised while interpreting registration vocabulary.

use thiserror::Error;

/// Errors that occur while parsing an object type flag expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagParseError {
    /// A term did not name any known `asOBJ_` flag.
    #[error("unknown object type flag '{0}'")]
    UnknownFlag(String),

    /// The expression contained no flags at all.
    #[error("empty object type flag expression")]
    Empty,
}
