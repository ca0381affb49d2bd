use crate::error::{Error, Result};
use crate::regex::END_MARKER;

/// Knobs for compiling a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// The character that stands for the empty string in patterns.
    pub epsilon: char,
    /// Upper bound on the number of unminimized DFA states.
    pub state_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            epsilon: 'ε',
            state_limit: None,
        }
    }
}

impl Config {
    pub fn new() -> Config {
        Config::default()
    }

    pub fn with_epsilon(mut self, epsilon: char) -> Config {
        self.epsilon = epsilon;
        self
    }

    pub fn with_state_limit(mut self, limit: usize) -> Config {
        self.state_limit = Some(limit);
        self
    }

    /// Rejects an epsilon symbol that collides with an operand, an operator
    /// or the end marker.
    pub fn check(&self) -> Result<()> {
        match self.epsilon {
            c if c.is_ascii_alphanumeric() => Err(Error::InvalidEpsilon(c)),
            c @ ('|' | '*' | '.' | '(' | ')' | END_MARKER) => Err(Error::InvalidEpsilon(c)),
            _ => Ok(()),
        }
    }
}
