use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use log::debug;

use crate::Grammar;

use super::{Production, Symbol};

/// A production of the augmented grammar with a dot position in its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub production: usize,
    pub position: usize,
}

impl Item {
    pub fn new(production: usize, position: usize) -> Self {
        Self {
            production,
            position,
        }
    }
}

/// Canonical (sorted) item set, so equal sets compare and hash equal no
/// matter how they were built.
pub type ItemSet = BTreeSet<Item>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LRState {
    pub items: ItemSet,
    pub edges: BTreeMap<Symbol, usize>,
}

impl LRState {
    fn new(items: ItemSet) -> Self {
        Self {
            items,
            edges: BTreeMap::new(),
        }
    }

    /// Items that were not added by closure.
    pub fn kernel(&self) -> impl Iterator<Item = &Item> {
        self.items
            .iter()
            .filter(|item| item.position > 0 || item.production == 0)
    }

    pub fn extend(&self) -> impl Iterator<Item = &Item> {
        self.items
            .iter()
            .filter(|item| item.position == 0 && item.production != 0)
    }
}

/// Canonical LR(0) collection over the augmented grammar.
///
/// Production 0 of [`LRFSM::productions`] is `S' -> S`; production `i + 1`
/// is production `i` of the original grammar.
#[derive(Debug, Clone)]
pub struct LRFSM {
    pub productions: Vec<Production>,
    pub states: Vec<LRState>,
    pub start: usize,
    by_head: HashMap<Symbol, Vec<usize>>,
}

impl LRFSM {
    fn augment(grammar: &Grammar) -> Self {
        let productions: Vec<Production> = std::iter::once(Production::new(
            grammar.augmented_start(),
            vec![grammar.start_symbol()],
        ))
        .chain(grammar.productions().iter().cloned())
        .collect();

        let mut by_head: HashMap<Symbol, Vec<usize>> = HashMap::new();
        for (i, p) in productions.iter().enumerate() {
            by_head.entry(p.head).or_default().push(i);
        }

        Self {
            productions,
            states: Vec::new(),
            start: 0,
            by_head,
        }
    }

    pub fn augmented_start(&self) -> Symbol {
        self.productions[0].head
    }

    /// Symbol right after the dot of `item`, if any.
    pub fn next_symbol(&self, item: &Item) -> Option<Symbol> {
        self.productions
            .get(item.production)
            .and_then(|p| p.symbol_at(item.position))
    }

    pub fn closure(&self, kernel: ItemSet) -> ItemSet {
        let mut q: VecDeque<Item> = kernel.iter().copied().collect();
        let mut items = kernel;

        while let Some(item) = q.pop_front() {
            let Some(symbol @ Symbol::NonTerminal(_)) = self.next_symbol(&item) else {
                continue;
            };
            for &p in self.by_head.get(&symbol).into_iter().flatten() {
                let new_item = Item::new(p, 0);
                if items.insert(new_item) {
                    q.push_back(new_item);
                }
            }
        }

        items
    }

    /// Closure of the items of `items` with the dot moved over `symbol`.
    /// Empty when no item expects `symbol`.
    pub fn goto(&self, items: &ItemSet, symbol: Symbol) -> ItemSet {
        let kernel: ItemSet = items
            .iter()
            .filter(|item| self.next_symbol(item) == Some(symbol))
            .map(|item| Item::new(item.production, item.position + 1))
            .collect();

        if kernel.is_empty() {
            kernel
        } else {
            self.closure(kernel)
        }
    }

    /// Target of the transition from `state` on `symbol`.
    pub fn transition(&self, state: usize, symbol: Symbol) -> Option<usize> {
        self.states
            .get(state)
            .and_then(|s| s.edges.get(&symbol))
            .copied()
    }

    pub fn transitions(&self) -> impl Iterator<Item = (usize, Symbol, usize)> + '_ {
        self.states
            .iter()
            .enumerate()
            .flat_map(|(u, s)| s.edges.iter().map(move |(&e, &v)| (u, e, v)))
    }
}

impl Grammar {
    pub fn to_lr0_fsm(&self) -> LRFSM {
        let mut fsm = LRFSM::augment(self);
        let symbols: Vec<Symbol> = self.symbol_iter().collect();

        let start_state = fsm.closure(ItemSet::from([Item::new(0, 0)]));
        let mut index: HashMap<ItemSet, usize> = HashMap::from([(start_state.clone(), 0)]);
        fsm.states.push(LRState::new(start_state));
        let mut q: VecDeque<usize> = VecDeque::from([0]);

        while let Some(u) = q.pop_front() {
            for &symbol in &symbols {
                let items = fsm.goto(&fsm.states[u].items, symbol);
                if items.is_empty() {
                    continue;
                }

                let v = match index.get(&items) {
                    Some(&v) => v,
                    None => {
                        let v = fsm.states.len();
                        index.insert(items.clone(), v);
                        fsm.states.push(LRState::new(items));
                        q.push_back(v);
                        v
                    }
                };
                fsm.states[u].edges.insert(symbol, v);
            }
        }

        debug!(
            "LR(0) automaton: {} states, {} transitions",
            fsm.states.len(),
            fsm.transitions().count()
        );
        fsm
    }
}
