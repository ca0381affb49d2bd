//! Regular expressions to minimal DFAs by direct construction: an augmented
//! syntax tree is annotated with nullable / firstpos / lastpos, followpos is
//! derived from it, and DFA states are discovered as sets of leaf positions
//! before partition refinement collapses them.
//!
//! ```
//! use posdfa::Regex;
//!
//! let re: Regex = "(a|b)*abb".parse().unwrap();
//! assert!(re.is_match("babb"));
//! assert!(!re.is_match("ab"));
//! assert_eq!(re.dfa().len(), 4);
//! ```

use std::str;

use bit_set::BitSet;

pub use config::Config;
pub use dfa::{Dfa, State, StateId};
pub use error::{Error, Result, SyntaxError};
pub use followpos::Followpos;
pub use regex::Token;
pub use tree::{AnnotatedTree, Attributes, Leaf, Node, NodeId, SyntaxTree};

pub mod config;
pub mod dfa;
pub mod error;
pub mod followpos;
pub mod partition;
pub mod regex;
pub mod tree;
#[cfg(test)]
mod tests;

/// A compiled pattern, with every intermediate stage kept for inspection.
#[derive(Debug, Clone)]
pub struct Regex {
    pattern: String,
    postfix: Vec<Token>,
    tree: AnnotatedTree,
    followpos: Followpos,
    dfa: Dfa,
    configurations: Vec<BitSet>,
    minimal: Dfa,
}

impl Regex {
    pub fn new(pattern: &str) -> Result<Regex> {
        Regex::with_config(pattern, &Config::default())
    }

    pub fn with_config(pattern: &str, config: &Config) -> Result<Regex> {
        let postfix = regex::parse(pattern, config)?;
        let tree = SyntaxTree::from_postfix(&postfix)?.annotate();
        let followpos = Followpos::new(&tree);
        let (dfa, configurations) = Dfa::from_followpos(tree.start(), &followpos, config)?;
        let minimal = dfa.minimize();
        Ok(Regex {
            pattern: pattern.to_owned(),
            postfix,
            tree,
            followpos,
            dfa,
            configurations,
            minimal,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The augmented postfix sequence, end marker included.
    pub fn postfix(&self) -> &[Token] {
        &self.postfix
    }

    pub fn tree(&self) -> &AnnotatedTree {
        &self.tree
    }

    pub fn followpos(&self) -> &Followpos {
        &self.followpos
    }

    /// The DFA as discovered, before minimization.
    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    /// The position set behind each state of `dfa()`.
    pub fn configurations(&self) -> &[BitSet] {
        &self.configurations
    }

    pub fn minimal(&self) -> &Dfa {
        &self.minimal
    }

    pub fn is_match(&self, input: &str) -> bool {
        self.minimal.accepts(input)
    }
}

impl str::FromStr for Regex {
    type Err = Error;
    fn from_str(s: &str) -> Result<Regex> {
        Regex::new(s)
    }
}
