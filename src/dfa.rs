use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, VecDeque};

use bit_set::BitSet;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::followpos::Followpos;
use crate::partition::Partition;
use crate::tree::Leaf;

pub type StateId = u32;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    pub by_char: BTreeMap<char, StateId>,
    pub accepting: bool,
}

/// A partial DFA: a missing transition rejects. State `0` is the start state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    /// Sorted input alphabet.
    pub alphabet: Vec<char>,
    pub states: Vec<State>,
}

struct Discovery {
    ids: BTreeMap<BitSet, StateId>,
    configurations: Vec<BitSet>,
    queue: VecDeque<StateId>,
    limit: Option<usize>,
}

impl Discovery {
    fn index(&mut self, set: BitSet) -> Result<StateId> {
        let next_index = self.configurations.len();
        match self.ids.entry(set) {
            Entry::Vacant(view) => {
                if let Some(max) = self.limit {
                    if next_index >= max {
                        return Err(Error::StateLimitExceeded { states: next_index + 1, max });
                    }
                }
                self.configurations.push(view.key().clone());
                self.queue.push_back(next_index as StateId);
                view.insert(next_index as StateId);
                Ok(next_index as StateId)
            }
            Entry::Occupied(view) => Ok(*view.get()),
        }
    }
}

impl Dfa {
    /// Explores position sets breadth-first from `start`. Returns the DFA and
    /// the position set behind each state.
    pub fn from_followpos(
        start: &BitSet,
        follow: &Followpos,
        config: &Config,
    ) -> Result<(Dfa, Vec<BitSet>)> {
        let alphabet = follow.alphabet();
        let end = follow.end_position();
        let mut discovery = Discovery {
            ids: BTreeMap::new(),
            configurations: Vec::new(),
            queue: VecDeque::new(),
            limit: config.state_limit,
        };
        let mut states = Vec::new();

        discovery.index(start.clone())?;

        // Ids are handed out in queue order, so `states[id]` lines up.
        while let Some(id) = discovery.queue.pop_front() {
            let current = discovery.configurations[id as usize].clone();
            let mut by_char = BTreeMap::new();
            for &a in &alphabet {
                let mut next = BitSet::with_capacity(follow.len() + 1);
                for p in current.iter() {
                    if follow.symbol(p) == Some(Leaf::Char(a)) {
                        if let Some(f) = follow.get(p) {
                            next.union_with(f);
                        }
                    }
                }
                if !next.is_empty() {
                    by_char.insert(a, discovery.index(next)?);
                }
            }
            let accepting = end.map_or(false, |e| current.contains(e));
            states.push(State { by_char, accepting });
        }

        Ok((Dfa { alphabet, states }, discovery.configurations))
    }

    pub fn start(&self) -> StateId {
        0
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn transition(&self, state: StateId, symbol: char) -> Option<StateId> {
        self.states
            .get(state as usize)
            .and_then(|s| s.by_char.get(&symbol))
            .copied()
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.states.get(state as usize).map_or(false, |s| s.accepting)
    }

    pub fn accepting(&self) -> Vec<StateId> {
        (0..self.states.len() as StateId)
            .filter(|&s| self.is_accepting(s))
            .collect()
    }

    /// Every `(state, symbol, target)` triple, by state then symbol.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, char, StateId)> + '_ {
        self.states.iter().enumerate().flat_map(|(s, state)| {
            state
                .by_char
                .iter()
                .map(move |(&c, &t)| (s as StateId, c, t))
        })
    }

    pub fn state_name(&self, state: StateId) -> String {
        format!("S{}", state)
    }

    /// Runs `input` through the table.
    pub fn accepts(&self, input: &str) -> bool {
        self.accepts_iter(input.chars())
    }

    pub fn accepts_iter<I: IntoIterator<Item = char>>(&self, input: I) -> bool {
        let mut cur = self.start();
        for c in input {
            match self.transition(cur, c) {
                Some(next) => cur = next,
                None => return false,
            }
        }
        self.is_accepting(cur)
    }

    /// Collapses indistinguishable states. Blocks are numbered in
    /// breadth-first order from the start block, so equivalent minimal
    /// DFAs compare equal. States unreachable from the start are dropped.
    pub fn minimize(&self) -> Dfa {
        let alphabet = self.alphabet.clone();
        if self.states.is_empty() {
            return Dfa { alphabet, states: Vec::new() };
        }
        let partition = Partition::refine(self);
        let mut names: Vec<Option<StateId>> = vec![None; partition.len()];
        let mut queue = VecDeque::new();
        let mut states = Vec::new();

        let start = partition.block_of(self.start());
        names[start] = Some(0);
        queue.push_back(start);
        let mut next_name: StateId = 1;

        while let Some(block) = queue.pop_front() {
            let mut state = State::default();
            for &member in partition.block(block) {
                let original = &self.states[member as usize];
                state.accepting |= original.accepting;
                for (&c, &target) in &original.by_char {
                    let target = partition.block_of(target);
                    let name = match names[target] {
                        Some(name) => name,
                        None => {
                            let name = next_name;
                            next_name += 1;
                            names[target] = Some(name);
                            queue.push_back(target);
                            name
                        }
                    };
                    state.by_char.insert(c, name);
                }
            }
            states.push(state);
        }

        Dfa { alphabet, states }
    }
}
