use std::collections::BTreeSet;

use assert_matches::assert_matches;
use proptest::prelude::*;

use crate::regex::{self, render};
use crate::*;

fn postfix(pattern: &str) -> String {
    render(Regex::new(pattern).unwrap().postfix(), &Config::default())
}

fn syntax_error(pattern: &str) -> SyntaxError {
    match Regex::new(pattern) {
        Err(Error::Syntax(e)) => e,
        other => panic!("{:?} gave {:?}", pattern, other.map(|r| r.minimal().clone())),
    }
}

/// Every string over `alphabet` of length at most `max`.
fn strings(alphabet: &[char], max: usize) -> Vec<String> {
    let mut out = vec![String::new()];
    let mut layer = vec![String::new()];
    for _ in 0..max {
        layer = layer
            .iter()
            .flat_map(|s| alphabet.iter().map(move |&c| format!("{}{}", s, c)))
            .collect();
        out.extend(layer.iter().cloned());
    }
    out
}

#[test]
fn test_regex_normalize() {
    let config = Config::default();
    let norm = |p: &str| render(&regex::normalize(&regex::validate(p, &config).unwrap()), &config);
    assert_eq!(norm("(a|b)*abb"), "(a|b)*.a.b.b");
    assert_eq!(norm("ab(c)d*e"), "a.b.(c).d*.e");
    assert_eq!(norm("a.b"), "a.b");
    assert_eq!(norm("a**b"), "a**.b");
    assert_eq!(norm("εa"), "ε.a");
    assert_eq!(norm(""), "");
}

#[test]
fn test_regex_postfix() {
    assert_eq!(postfix("(a|b)*abb"), "ab|*a.b.b.#.");
    assert_eq!(postfix(""), "#");
    assert_eq!(postfix("a"), "a#.");
    assert_eq!(postfix("a|b"), "ab|#.");
    assert_eq!(postfix("ab*"), "ab*.#.");
    assert_eq!(postfix("a.b"), "ab.#.");
    assert_eq!(postfix("a|bc|d"), "abc.|d|#.");
    assert_eq!(postfix("(ab)*c"), "ab.*c.#.");
}

#[test]
fn test_postfix_unbalanced_groups() {
    use crate::Token::*;
    assert_matches!(regex::to_postfix(&[Close]), Err(Error::Structural(_)));
    assert_matches!(regex::to_postfix(&[Open, Symbol('a')]), Err(Error::Structural(_)));
    assert_matches!(regex::to_postfix(&[Symbol('a'), Close]), Err(Error::Structural(_)));
    assert_eq!(regex::to_postfix(&[Open, Symbol('a'), Close]), Ok(vec![Symbol('a')]));
}

#[test]
fn test_regex_parse_error() {
    use crate::SyntaxError::*;
    assert_eq!(syntax_error("|ab"), MisplacedOperator { position: 0, character: '|' });
    assert_eq!(syntax_error("ab|"), MisplacedOperator { position: 2, character: '|' });
    assert_eq!(syntax_error("*a"), MisplacedOperator { position: 0, character: '*' });
    assert_eq!(syntax_error("a||b"), MisplacedOperator { position: 2, character: '|' });
    assert_eq!(syntax_error("(|a)"), MisplacedOperator { position: 1, character: '|' });
    assert_eq!(syntax_error("(a|)"), MisplacedOperator { position: 2, character: '|' });
    assert_eq!(syntax_error("(*a)"), MisplacedOperator { position: 1, character: '*' });
    assert_eq!(syntax_error("a|*b"), MisplacedOperator { position: 2, character: '*' });
    assert_eq!(syntax_error(".a"), MisplacedOperator { position: 0, character: '.' });
    assert_eq!(syntax_error("a."), MisplacedOperator { position: 1, character: '.' });
    assert_eq!(syntax_error("a.*"), MisplacedOperator { position: 1, character: '.' });
    assert_eq!(syntax_error("a+b"), InvalidCharacter { position: 1, character: '+' });
    assert_eq!(syntax_error("a b"), InvalidCharacter { position: 1, character: ' ' });
    assert_eq!(syntax_error("a#"), ReservedEndMarker { position: 1 });
    assert_eq!(syntax_error("a)"), UnmatchedClose { position: 1 });
    assert_eq!(syntax_error("((a)"), UnclosedGroup { position: 0 });
    assert_eq!(syntax_error("a()"), EmptyGroup { position: 1 });
    // The alphabet pass runs before the group pass.
    assert_eq!(syntax_error(")a#"), ReservedEndMarker { position: 2 });
    // The group pass runs before the operator passes.
    assert_eq!(syntax_error("|a)"), UnmatchedClose { position: 2 });
}

#[test]
fn test_error_display() {
    assert_eq!(
        Error::from(SyntaxError::MisplacedOperator { position: 0, character: '|' }).to_string(),
        "syntax error: misplaced operator `|` at 0"
    );
    assert_eq!(
        Error::StateLimitExceeded { states: 9, max: 8 }.to_string(),
        "DFA state limit exceeded: 9 states (max: 8)"
    );
    assert_eq!(SyntaxError::UnclosedGroup { position: 3 }.position(), 3);
}

#[test]
fn test_leading_alt_fails_before_tree() {
    assert_matches!(
        "|ab".parse::<Regex>(),
        Err(Error::Syntax(SyntaxError::MisplacedOperator { position: 0, .. }))
    );
    assert_matches!(regex::validate("|ab", &Config::default()), Err(_));
}

#[test]
fn test_scenario_abb() {
    let re = Regex::new("(a|b)*abb").unwrap();
    for s in &["abb", "aabb", "babb", "ababb", "bbbabb"] {
        assert!(re.is_match(s), "{:?}", s);
    }
    for s in &["ab", "a", "", "abba", "c", "abbc"] {
        assert!(!re.is_match(s), "{:?}", s);
    }
}

#[test]
fn test_scenario_star() {
    let re = Regex::new("a*").unwrap();
    for s in &["", "a", "aaa"] {
        assert!(re.is_match(s), "{:?}", s);
    }
    for s in &["b", "ab"] {
        assert!(!re.is_match(s), "{:?}", s);
    }
    assert_eq!(re.minimal().len(), 1);
}

#[test]
fn test_scenario_alt() {
    let re = Regex::new("(a|b)").unwrap();
    assert!(re.is_match("a"));
    assert!(re.is_match("b"));
    assert!(!re.is_match(""));
    assert!(!re.is_match("ab"));
    // The end marker must follow both branches, not just the last one.
    let bare = Regex::new("a|bc").unwrap();
    assert!(bare.is_match("a"));
    assert!(bare.is_match("bc"));
    assert!(!bare.is_match("b"));
}

#[test]
fn test_empty_pattern_and_epsilon() {
    let empty = Regex::new("").unwrap();
    assert!(empty.is_match(""));
    assert!(!empty.is_match("a"));
    assert!(empty.minimal().alphabet.is_empty());

    let eps = Regex::new("ε").unwrap();
    assert!(eps.is_match(""));
    assert!(!eps.is_match("ε"));

    let opt = Regex::new("a(ε|b)c").unwrap();
    assert!(opt.is_match("ac"));
    assert!(opt.is_match("abc"));
    assert!(!opt.is_match("abbc"));
}

#[test]
fn test_configured_epsilon() {
    let config = Config::default().with_epsilon('_');
    let re = Regex::with_config("a(_|b)", &config).unwrap();
    assert!(re.is_match("a"));
    assert!(re.is_match("ab"));
    assert_eq!(
        Regex::with_config("a(ε|b)", &config).unwrap_err(),
        Error::Syntax(SyntaxError::InvalidCharacter { position: 2, character: 'ε' })
    );
}

#[test]
fn test_reserved_epsilon() {
    for &c in &['#', '|', '*', '.', '(', ')', 'a', 'Z', '0'] {
        let config = Config::default().with_epsilon(c);
        assert_eq!(config.check(), Err(Error::InvalidEpsilon(c)));
        assert_eq!(Regex::with_config("ab", &config).unwrap_err(), Error::InvalidEpsilon(c));
        assert_matches!(regex::validate("", &config), Err(Error::InvalidEpsilon(_)));
    }
    // `#` stays reserved whatever epsilon is.
    let config = Config::default().with_epsilon('_');
    assert_eq!(config.check(), Ok(()));
    assert_eq!(
        Regex::with_config("a#b", &config).unwrap_err(),
        Error::Syntax(SyntaxError::ReservedEndMarker { position: 1 })
    );
    assert_eq!(
        Error::InvalidEpsilon('#').to_string(),
        "`#` cannot stand for epsilon"
    );
}

#[test]
fn test_render_configured_epsilon() {
    let config = Config::default().with_epsilon('_');
    let re = Regex::with_config("a(_|b)", &config).unwrap();
    assert_eq!(render(re.postfix(), &config), "a_b|.#.");
    assert_eq!(render(re.postfix(), &Config::default()), "aεb|.#.");
}

#[test]
fn test_state_limit() {
    let config = Config::default().with_state_limit(4);
    assert!(Regex::with_config("(a|b)*abb", &config).is_ok());
    let config = Config::default().with_state_limit(2);
    assert_matches!(
        Regex::with_config("(a|b)*abb", &config),
        Err(Error::StateLimitExceeded { max: 2, .. })
    );
}

#[test]
fn test_followpos_domain() {
    for pattern in &["(a|b)*abb", "a(ε|b)c", "((ab)*|c)*d", ""] {
        let re = Regex::new(pattern).unwrap();
        let f = re.followpos();
        assert_eq!(f.len(), re.tree().leaf_count());
        assert_eq!(f.end_position(), Some(re.tree().end_position()));
        let positions: Vec<_> = f.iter().map(|(p, _, _)| p).collect();
        assert_eq!(positions, (1..=f.len()).collect::<Vec<_>>());
    }
}

#[test]
fn test_language_preserved() {
    let patterns = [
        "(a|b)*abb",
        "a*",
        "(a|b)",
        "ab|cb",
        "a|ab",
        "(a*b*)*",
        "((a|b)(a|b))*",
        "a(b|c)*a",
        "(ab|a)(bc|c)",
        "c*(a|ε)b*",
        "a**|b",
    ];
    for pattern in &patterns {
        let re = Regex::new(pattern).unwrap();
        let (dfa, min) = (re.dfa(), re.minimal());
        assert!(min.len() <= dfa.len(), "{}", pattern);
        assert_eq!(&min.minimize(), min, "{}", pattern);
        for s in strings(&['a', 'b', 'c'], 6) {
            assert_eq!(dfa.accepts(&s), min.accepts(&s), "{} on {:?}", pattern, s);
        }
    }
}

#[test]
fn test_accepting_configurations() {
    let re = Regex::new("(a|b)*abb").unwrap();
    let end = re.tree().end_position();
    for (s, set) in re.configurations().iter().enumerate() {
        assert_eq!(re.dfa().is_accepting(s as StateId), set.contains(end));
    }
}

#[derive(Clone, Debug)]
enum Ast {
    Sym(char),
    Eps,
    Cat(Box<Ast>, Box<Ast>),
    Alt(Box<Ast>, Box<Ast>),
    Star(Box<Ast>),
}

impl Ast {
    fn pattern(&self) -> String {
        match *self {
            Ast::Sym(c) => c.to_string(),
            Ast::Eps => "ε".to_owned(),
            Ast::Cat(ref l, ref r) => format!("({})({})", l.pattern(), r.pattern()),
            Ast::Alt(ref l, ref r) => format!("({}|{})", l.pattern(), r.pattern()),
            Ast::Star(ref x) => format!("({})*", x.pattern()),
        }
    }

    /// Indices where a match of `self` starting at `i` can end.
    fn ends(&self, s: &[char], i: usize) -> BTreeSet<usize> {
        match *self {
            Ast::Sym(c) => s.get(i).filter(|&&x| x == c).map(|_| i + 1).into_iter().collect(),
            Ast::Eps => Some(i).into_iter().collect(),
            Ast::Cat(ref l, ref r) => l.ends(s, i).into_iter().flat_map(|j| r.ends(s, j)).collect(),
            Ast::Alt(ref l, ref r) => {
                let mut out = l.ends(s, i);
                out.extend(r.ends(s, i));
                out
            }
            Ast::Star(ref x) => {
                let mut seen: BTreeSet<usize> = Some(i).into_iter().collect();
                let mut frontier = vec![i];
                while let Some(j) = frontier.pop() {
                    for k in x.ends(s, j) {
                        if seen.insert(k) {
                            frontier.push(k);
                        }
                    }
                }
                seen
            }
        }
    }
}

fn ast() -> impl Strategy<Value = Ast> {
    let leaf = prop_oneof![
        4 => prop::sample::select(vec!['a', 'b']).prop_map(Ast::Sym),
        1 => Just(Ast::Eps),
    ];
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Ast::Cat(Box::new(l), Box::new(r))),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Ast::Alt(Box::new(l), Box::new(r))),
            inner.prop_map(|x| Ast::Star(Box::new(x))),
        ]
    })
}

proptest! {
    #[test]
    fn prop_matches_reference(ast in ast(), input in "[abc]{0,6}") {
        let re = Regex::new(&ast.pattern()).unwrap();
        let chars: Vec<char> = input.chars().collect();
        let expected = ast.ends(&chars, 0).contains(&chars.len());
        prop_assert_eq!(re.is_match(&input), expected);
        prop_assert_eq!(re.dfa().accepts(&input), expected);
    }

    #[test]
    fn prop_minimal_is_canonical(ast in ast()) {
        let re = Regex::new(&ast.pattern()).unwrap();
        prop_assert!(re.minimal().len() <= re.dfa().len());
        prop_assert_eq!(&re.minimal().minimize(), re.minimal());
        prop_assert_eq!(&re.dfa().minimize(), re.minimal());
    }
}
