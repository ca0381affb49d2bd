//! The augmented syntax tree and its nullable/firstpos/lastpos attributes.
//!
//! Nodes live in a flat arena in postfix order, so every child is stored
//! before its parent and a forward sweep over the arena is a post-order walk.

use bit_set::BitSet;

use crate::error::{Error, Result};
use crate::regex::Token;

pub type NodeId = usize;

/// What a leaf matches.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Leaf {
    Char(char),
    Epsilon,
    End,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// An operand occurrence. `position` is in `1..=n`.
    Leaf { symbol: Leaf, position: usize },
    Cat(NodeId, NodeId),
    Alt(NodeId, NodeId),
    Star(NodeId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    leaves: usize,
}

impl SyntaxTree {
    /// Builds the tree from an augmented postfix sequence.
    pub fn from_postfix(postfix: &[Token]) -> Result<SyntaxTree> {
        let mut nodes = Vec::with_capacity(postfix.len());
        let mut stack: Vec<NodeId> = Vec::new();
        let mut leaves = 0;
        for &t in postfix {
            let node = match t {
                Token::Symbol(c) => {
                    leaves += 1;
                    Node::Leaf { symbol: Leaf::Char(c), position: leaves }
                }
                Token::Epsilon => {
                    leaves += 1;
                    Node::Leaf { symbol: Leaf::Epsilon, position: leaves }
                }
                Token::EndMarker => {
                    leaves += 1;
                    Node::Leaf { symbol: Leaf::End, position: leaves }
                }
                Token::Star => {
                    let child = stack.pop().ok_or(Error::Structural("`*` without operand"))?;
                    Node::Star(child)
                }
                Token::Concat | Token::Alt => {
                    let right = stack.pop().ok_or(Error::Structural("binary operator without right operand"))?;
                    let left = stack.pop().ok_or(Error::Structural("binary operator without left operand"))?;
                    if t == Token::Concat {
                        Node::Cat(left, right)
                    } else {
                        Node::Alt(left, right)
                    }
                }
                Token::Open | Token::Close => {
                    return Err(Error::Structural("parenthesis in postfix sequence"));
                }
            };
            stack.push(nodes.len());
            nodes.push(node);
        }
        match (stack.len(), stack.last()) {
            (1, Some(&root)) if root + 1 == nodes.len() => Ok(SyntaxTree { nodes, leaves }),
            (0, _) => Err(Error::Structural("empty postfix sequence")),
            _ => Err(Error::Structural("postfix sequence left more than one tree")),
        }
    }

    pub fn root(&self) -> NodeId {
        self.nodes.len() - 1
    }

    pub fn node(&self, id: NodeId) -> Node {
        self.nodes[id]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of leaves, which is also the largest position.
    pub fn leaf_count(&self) -> usize {
        self.leaves
    }

    /// Computes nullable, firstpos and lastpos for every node.
    pub fn annotate(self) -> AnnotatedTree {
        let width = self.leaves + 1;
        let mut attrs: Vec<Attributes> = Vec::with_capacity(self.nodes.len());
        for &node in &self.nodes {
            let a = match node {
                Node::Leaf { symbol: Leaf::Epsilon, .. } => Attributes {
                    nullable: true,
                    firstpos: BitSet::with_capacity(width),
                    lastpos: BitSet::with_capacity(width),
                },
                Node::Leaf { position, .. } => {
                    let mut set = BitSet::with_capacity(width);
                    set.insert(position);
                    Attributes { nullable: false, firstpos: set.clone(), lastpos: set }
                }
                Node::Alt(l, r) => {
                    let (l, r) = (&attrs[l], &attrs[r]);
                    let mut firstpos = l.firstpos.clone();
                    firstpos.union_with(&r.firstpos);
                    let mut lastpos = l.lastpos.clone();
                    lastpos.union_with(&r.lastpos);
                    Attributes { nullable: l.nullable || r.nullable, firstpos, lastpos }
                }
                Node::Cat(l, r) => {
                    let (l, r) = (&attrs[l], &attrs[r]);
                    let mut firstpos = l.firstpos.clone();
                    if l.nullable {
                        firstpos.union_with(&r.firstpos);
                    }
                    let mut lastpos = r.lastpos.clone();
                    if r.nullable {
                        lastpos.union_with(&l.lastpos);
                    }
                    Attributes { nullable: l.nullable && r.nullable, firstpos, lastpos }
                }
                Node::Star(c) => Attributes {
                    nullable: true,
                    firstpos: attrs[c].firstpos.clone(),
                    lastpos: attrs[c].lastpos.clone(),
                },
            };
            attrs.push(a);
        }
        AnnotatedTree { tree: self, attrs }
    }
}

/// Derived attributes of one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attributes {
    pub nullable: bool,
    pub firstpos: BitSet,
    pub lastpos: BitSet,
}

/// A syntax tree whose attributes have all been computed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotatedTree {
    tree: SyntaxTree,
    attrs: Vec<Attributes>,
}

impl AnnotatedTree {
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn node(&self, id: NodeId) -> Node {
        self.tree.node(id)
    }

    pub fn nodes(&self) -> &[Node] {
        self.tree.nodes()
    }

    pub fn attributes(&self, id: NodeId) -> &Attributes {
        &self.attrs[id]
    }

    pub fn leaf_count(&self) -> usize {
        self.tree.leaf_count()
    }

    /// The end marker is always the last leaf.
    pub fn end_position(&self) -> usize {
        self.tree.leaf_count()
    }

    /// `firstpos` of the root: the start configuration of the DFA.
    pub fn start(&self) -> &BitSet {
        &self.attrs[self.root()].firstpos
    }
}
