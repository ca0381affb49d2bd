use std::collections::BTreeSet;

use bit_set::BitSet;

use crate::tree::{AnnotatedTree, Leaf, Node};

/// For each leaf position, the positions that can come right after it, and
/// the symbol found at that position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Followpos {
    // Both indexed by `position - 1`.
    follow: Vec<BitSet>,
    symbols: Vec<Leaf>,
}

impl Followpos {
    pub fn new(tree: &AnnotatedTree) -> Followpos {
        let n = tree.leaf_count();
        let mut follow = vec![BitSet::with_capacity(n + 1); n];
        let mut symbols = vec![Leaf::Epsilon; n];
        for &node in tree.nodes() {
            match node {
                Node::Leaf { symbol, position } => symbols[position - 1] = symbol,
                Node::Cat(l, r) => {
                    let first = &tree.attributes(r).firstpos;
                    for p in tree.attributes(l).lastpos.iter() {
                        follow[p - 1].union_with(first);
                    }
                }
                Node::Star(c) => {
                    let a = tree.attributes(c);
                    for p in a.lastpos.iter() {
                        follow[p - 1].union_with(&a.firstpos);
                    }
                }
                Node::Alt(..) => {}
            }
        }
        Followpos { follow, symbols }
    }

    /// Number of positions; positions run over `1..=len()`.
    pub fn len(&self) -> usize {
        self.follow.len()
    }

    pub fn is_empty(&self) -> bool {
        self.follow.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&BitSet> {
        position.checked_sub(1).and_then(|i| self.follow.get(i))
    }

    pub fn symbol(&self, position: usize) -> Option<Leaf> {
        position.checked_sub(1).and_then(|i| self.symbols.get(i)).copied()
    }

    /// `(position, symbol, followpos)` in ascending position order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Leaf, &BitSet)> + '_ {
        self.follow
            .iter()
            .zip(self.symbols.iter())
            .enumerate()
            .map(|(i, (f, &s))| (i + 1, s, f))
    }

    /// Position of the `#` leaf.
    pub fn end_position(&self) -> Option<usize> {
        self.symbols.iter().position(|&s| s == Leaf::End).map(|i| i + 1)
    }

    /// The input alphabet, sorted: every leaf symbol except epsilon and `#`.
    pub fn alphabet(&self) -> Vec<char> {
        let set: BTreeSet<char> = self
            .symbols
            .iter()
            .filter_map(|s| match *s {
                Leaf::Char(c) => Some(c),
                _ => None,
            })
            .collect();
        set.into_iter().collect()
    }
}
