//! Crate error taxonomy.

use thiserror::Error;

/// Errors reported by pattern compilation and automaton construction.
///
/// Word recognition is never an error: a word the automaton rejects is a
/// normal `false` result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Reserved for future lexer restrictions; today every character maps to
    /// some token.
    #[error("character {0:?} cannot start a token")]
    InvalidToken(char),

    /// A closing bracket without a matching opening one, or an opening
    /// bracket never closed.
    #[error("unbalanced brackets in pattern")]
    UnbalancedBrackets,

    /// The pattern contained no tokens at all.
    #[error("empty pattern")]
    EmptyPattern,

    /// Postfix evaluation found an operator without enough operands, or
    /// finished with more than one automaton on the stack.
    #[error("malformed pattern: operators and operands do not line up")]
    MalformedExpression,

    /// Determinization was cut short by a caller-supplied state ceiling.
    #[error("determinization exceeded the ceiling of {limit} states")]
    StateLimitExceeded {
        /// The ceiling that was exceeded.
        limit: usize,
    },
}

/// Convenience alias for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
