//! Moore-style partition refinement over the states of a `Dfa`.

use std::collections::HashMap;

use crate::dfa::{Dfa, StateId};

/// Disjoint, non-empty blocks of states covering the whole DFA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    blocks: Vec<Vec<StateId>>,
    block_of: Vec<usize>,
}

/// Where a state goes on each alphabet symbol, as block indices. `None` is a
/// missing transition, distinct from every real block.
type Signature = Vec<Option<usize>>;

impl Partition {
    /// Starts from accepting / non-accepting and splits until stable.
    pub fn refine(dfa: &Dfa) -> Partition {
        let (accepting, rejecting): (Vec<StateId>, Vec<StateId>) =
            (0..dfa.len() as StateId).partition(|&s| dfa.is_accepting(s));
        let mut blocks: Vec<Vec<StateId>> = vec![accepting, rejecting];
        blocks.retain(|b| !b.is_empty());

        loop {
            let block_of = index(&blocks, dfa.len());
            let mut next = Vec::with_capacity(blocks.len());
            let mut split = false;
            for block in &blocks {
                let groups = split_block(dfa, block, &block_of);
                split |= groups.len() > 1;
                next.extend(groups);
            }
            blocks = next;
            if !split {
                let block_of = index(&blocks, dfa.len());
                return Partition { blocks, block_of };
            }
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Vec<StateId>] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> &[StateId] {
        &self.blocks[index]
    }

    pub fn block_of(&self, state: StateId) -> usize {
        self.block_of[state as usize]
    }
}

fn index(blocks: &[Vec<StateId>], states: usize) -> Vec<usize> {
    let mut block_of = vec![0; states];
    for (i, block) in blocks.iter().enumerate() {
        for &s in block {
            block_of[s as usize] = i;
        }
    }
    block_of
}

fn signature(dfa: &Dfa, state: StateId, block_of: &[usize]) -> Signature {
    dfa.alphabet
        .iter()
        .map(|&c| dfa.transition(state, c).map(|t| block_of[t as usize]))
        .collect()
}

// Groups come out in order of their first member, members keep their order.
fn split_block(dfa: &Dfa, block: &[StateId], block_of: &[usize]) -> Vec<Vec<StateId>> {
    let mut groups: Vec<Vec<StateId>> = Vec::new();
    let mut by_signature: HashMap<Signature, usize> = HashMap::new();
    for &s in block {
        let sig = signature(dfa, s, block_of);
        match by_signature.get(&sig) {
            Some(&g) => groups[g].push(s),
            None => {
                by_signature.insert(sig, groups.len());
                groups.push(vec![s]);
            }
        }
    }
    groups
}
