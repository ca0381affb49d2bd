use std::fmt;

use crate::config::Config;
use crate::error::{Error, Result, SyntaxError};

/// The end marker appended to every pattern. Reserved in user input.
pub const END_MARKER: char = '#';

/// A single pattern token.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    /// An ASCII alphanumeric operand.
    Symbol(char),
    /// The empty string. Displays as `ε`; `render` uses the configured symbol.
    Epsilon,
    /// The `#` leaf that marks acceptance.
    EndMarker,
    Alt,
    Star,
    Concat,
    Open,
    Close,
}

impl Token {
    fn classify(c: char, config: &Config) -> Option<Token> {
        if c == config.epsilon {
            return Some(Token::Epsilon);
        }
        match c {
            '|' => Some(Token::Alt),
            '*' => Some(Token::Star),
            '.' => Some(Token::Concat),
            '(' => Some(Token::Open),
            ')' => Some(Token::Close),
            END_MARKER => Some(Token::EndMarker),
            c if c.is_ascii_alphanumeric() => Some(Token::Symbol(c)),
            _ => None,
        }
    }

    /// Symbols, epsilon and the end marker: everything that becomes a leaf.
    pub fn is_operand(self) -> bool {
        matches!(self, Token::Symbol(_) | Token::Epsilon | Token::EndMarker)
    }

    fn precedence(self) -> u8 {
        match self {
            Token::Star => 3,
            Token::Concat => 2,
            Token::Alt => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Token::Symbol(c) => write!(f, "{}", c),
            Token::Epsilon => write!(f, "ε"),
            Token::EndMarker => write!(f, "{}", END_MARKER),
            Token::Alt => write!(f, "|"),
            Token::Star => write!(f, "*"),
            Token::Concat => write!(f, "."),
            Token::Open => write!(f, "("),
            Token::Close => write!(f, ")"),
        }
    }
}

/// Renders a token sequence back to pattern text, spelling epsilon as
/// `config.epsilon`.
pub fn render(tokens: &[Token], config: &Config) -> String {
    tokens
        .iter()
        .map(|&t| match t {
            Token::Epsilon => config.epsilon.to_string(),
            t => t.to_string(),
        })
        .collect()
}

/*
Checks, each a full pass over the pattern, first failure wins:
  (a) alphabet:     alnum | epsilon | '|' '*' '(' ')' '.'   ('#' reserved)
  (b) groups:       every ')' closes an open '(', nothing left open
  (c) ends:         '|' neither first nor last, '*' not first
  (d) alternation:  '|' not after '|' '(' and not before '|' ')'
  (e) operands:     '.' placed like '|' and not before '*',
                    '*' not after '(' '|' '.', no "()"
*/

/// Validates `pattern` and returns its tokens, without concatenation markers.
pub fn validate(pattern: &str, config: &Config) -> Result<Vec<Token>> {
    config.check()?;
    let mut tokens = Vec::with_capacity(pattern.len());
    for (position, character) in pattern.chars().enumerate() {
        match Token::classify(character, config) {
            None => return Err(SyntaxError::InvalidCharacter { position, character }.into()),
            Some(Token::EndMarker) => return Err(SyntaxError::ReservedEndMarker { position }.into()),
            Some(t) => tokens.push(t),
        }
    }
    check_groups(&tokens)?;
    check_ends(&tokens)?;
    check_alternation(&tokens)?;
    check_operands(&tokens)?;
    Ok(tokens)
}

fn misplaced(position: usize, token: Token) -> SyntaxError {
    SyntaxError::MisplacedOperator {
        position,
        character: token.to_string().chars().next().unwrap_or('?'),
    }
}

fn check_groups(tokens: &[Token]) -> std::result::Result<(), SyntaxError> {
    let mut open = Vec::new();
    for (position, &t) in tokens.iter().enumerate() {
        match t {
            Token::Open => open.push(position),
            Token::Close => {
                if open.pop().is_none() {
                    return Err(SyntaxError::UnmatchedClose { position });
                }
            }
            _ => {}
        }
    }
    match open.pop() {
        Some(position) => Err(SyntaxError::UnclosedGroup { position }),
        None => Ok(()),
    }
}

fn check_ends(tokens: &[Token]) -> std::result::Result<(), SyntaxError> {
    if let Some(&first) = tokens.first() {
        if first == Token::Alt || first == Token::Star {
            return Err(misplaced(0, first));
        }
    }
    if let Some(&Token::Alt) = tokens.last() {
        return Err(misplaced(tokens.len() - 1, Token::Alt));
    }
    Ok(())
}

fn check_alternation(tokens: &[Token]) -> std::result::Result<(), SyntaxError> {
    for (i, window) in tokens.windows(2).enumerate() {
        match (window[0], window[1]) {
            (Token::Alt, Token::Alt) | (Token::Open, Token::Alt) => {
                return Err(misplaced(i + 1, Token::Alt))
            }
            (Token::Alt, Token::Close) => return Err(misplaced(i, Token::Alt)),
            _ => {}
        }
    }
    Ok(())
}

fn check_operands(tokens: &[Token]) -> std::result::Result<(), SyntaxError> {
    for (i, &t) in tokens.iter().enumerate() {
        let prev = if i > 0 { Some(tokens[i - 1]) } else { None };
        let next = tokens.get(i + 1).copied();
        let bad = match t {
            Token::Concat => {
                matches!(prev, None | Some(Token::Alt) | Some(Token::Open) | Some(Token::Concat))
                    || matches!(
                        next,
                        None | Some(Token::Alt)
                            | Some(Token::Close)
                            | Some(Token::Concat)
                            | Some(Token::Star)
                    )
            }
            Token::Star => {
                matches!(prev, Some(Token::Open) | Some(Token::Alt) | Some(Token::Concat))
            }
            Token::Open if next == Some(Token::Close) => {
                return Err(SyntaxError::EmptyGroup { position: i });
            }
            _ => false,
        };
        if bad {
            return Err(misplaced(i, t));
        }
    }
    Ok(())
}

/// Inserts explicit `Concat` tokens between juxtaposed operands.
pub fn normalize(tokens: &[Token]) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len() * 2);
    for (i, &t) in tokens.iter().enumerate() {
        out.push(t);
        if let Some(&next) = tokens.get(i + 1) {
            let ends = t.is_operand() || t == Token::Close || t == Token::Star;
            let starts = next.is_operand() || next == Token::Open;
            if ends && starts {
                out.push(Token::Concat);
            }
        }
    }
    out
}

/// Shunting-yard conversion of a normalized infix sequence.
pub fn to_postfix(tokens: &[Token]) -> Result<Vec<Token>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();
    for &t in tokens {
        match t {
            Token::Symbol(_) | Token::Epsilon | Token::EndMarker => output.push(t),
            Token::Open => stack.push(t),
            Token::Close => loop {
                match stack.pop() {
                    Some(Token::Open) => break,
                    Some(op) => output.push(op),
                    None => return Err(Error::Structural("unmatched `)` in infix sequence")),
                }
            },
            Token::Alt | Token::Star | Token::Concat => {
                while let Some(&top) = stack.last() {
                    if top == Token::Open || top.precedence() < t.precedence() {
                        break;
                    }
                    output.push(top);
                    stack.pop();
                }
                stack.push(t);
            }
        }
    }
    while let Some(t) = stack.pop() {
        if t == Token::Open {
            return Err(Error::Structural("unclosed `(` in infix sequence"));
        }
        output.push(t);
    }
    Ok(output)
}

/// Appends the end marker so the whole pattern `r` becomes `(r)#`.
pub fn augment(mut postfix: Vec<Token>) -> Vec<Token> {
    let empty = postfix.is_empty();
    postfix.push(Token::EndMarker);
    if !empty {
        postfix.push(Token::Concat);
    }
    postfix
}

/// Runs validation, normalization and conversion, returning augmented postfix.
pub fn parse(pattern: &str, config: &Config) -> Result<Vec<Token>> {
    let tokens = validate(pattern, config)?;
    let infix = normalize(&tokens);
    Ok(augment(to_postfix(&infix)?))
}
