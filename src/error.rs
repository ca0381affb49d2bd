use thiserror::Error;

/// A malformed pattern. Positions are character indices into the pattern.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("invalid character `{character}` at {position}")]
    InvalidCharacter { position: usize, character: char },
    #[error("`#` at {position} is reserved for the end marker")]
    ReservedEndMarker { position: usize },
    #[error("unmatched `)` at {position}")]
    UnmatchedClose { position: usize },
    #[error("unclosed `(` at {position}")]
    UnclosedGroup { position: usize },
    #[error("misplaced operator `{character}` at {position}")]
    MisplacedOperator { position: usize, character: char },
    #[error("empty group at {position}")]
    EmptyGroup { position: usize },
}

impl SyntaxError {
    /// The character index the error points at.
    pub fn position(&self) -> usize {
        match *self {
            SyntaxError::InvalidCharacter { position, .. }
            | SyntaxError::ReservedEndMarker { position }
            | SyntaxError::UnmatchedClose { position }
            | SyntaxError::UnclosedGroup { position }
            | SyntaxError::MisplacedOperator { position, .. }
            | SyntaxError::EmptyGroup { position } => position,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    /// An internal invariant broke. Validated patterns never produce this.
    #[error("structural violation: {0}")]
    Structural(&'static str),
    #[error("`{0}` cannot stand for epsilon")]
    InvalidEpsilon(char),
    #[error("DFA state limit exceeded: {states} states (max: {max})")]
    StateLimitExceeded { states: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
