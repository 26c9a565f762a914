use std::collections::{BTreeSet, HashMap};

use log::{debug, info};

use super::{FirstSets, FollowSets, Grammar, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LL1Entry {
    Production(usize),
    Conflict,
}

/// Prediction table indexed by (non-terminal, lookahead).
#[derive(Debug, Clone, Default)]
pub struct LL1Table {
    cells: HashMap<(Symbol, Symbol), LL1Entry>,
    candidates: HashMap<(Symbol, Symbol), BTreeSet<usize>>,
    is_ll1: bool,
}

impl LL1Table {
    pub fn get(&self, non_terminal: Symbol, lookahead: Symbol) -> Option<LL1Entry> {
        self.cells.get(&(non_terminal, lookahead)).copied()
    }

    /// Every production that was placed in the cell, conflicting or not.
    pub fn candidates(&self, non_terminal: Symbol, lookahead: Symbol) -> Option<&BTreeSet<usize>> {
        self.candidates.get(&(non_terminal, lookahead))
    }

    pub fn is_ll1(&self) -> bool {
        self.is_ll1
    }

    pub fn conflicts(&self) -> impl Iterator<Item = (Symbol, Symbol)> + '_ {
        self.cells
            .iter()
            .filter(|(_, entry)| **entry == LL1Entry::Conflict)
            .map(|(cell, _)| *cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn place(&mut self, non_terminal: Symbol, lookahead: Symbol, production: usize) {
        let key = (non_terminal, lookahead);
        self.candidates.entry(key).or_default().insert(production);
        match self.cells.get(&key).copied() {
            None => {
                self.cells.insert(key, LL1Entry::Production(production));
            }
            Some(LL1Entry::Production(existing)) if existing != production => {
                debug!(
                    "LL(1) conflict at ({}, {}): productions {} and {}",
                    non_terminal, lookahead, existing, production
                );
                self.cells.insert(key, LL1Entry::Conflict);
                self.is_ll1 = false;
            }
            Some(_) => {}
        }
    }
}

impl Grammar {
    pub fn generate_ll1_table(&self, first: &FirstSets, follow: &FollowSets) -> LL1Table {
        let mut table = LL1Table {
            is_ll1: true,
            ..Default::default()
        };

        for (index, production) in self.productions().iter().enumerate() {
            let first_alpha = first.of_string(&production.body);
            for &t in first_alpha.iter().filter(|s| **s != Symbol::Epsilon) {
                table.place(production.head, t, index);
            }

            if first_alpha.contains(&Symbol::Epsilon) {
                for &f in follow.get(production.head).into_iter().flatten() {
                    table.place(production.head, f, index);
                }
            }
        }

        info!(
            "LL(1) table: {} cells, grammar is{} LL(1)",
            table.len(),
            if table.is_ll1() { "" } else { " not" }
        );
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_for(grammar: &str) -> (Grammar, LL1Table) {
        let g = Grammar::parse(grammar).unwrap();
        let first = g.calculate_first();
        let follow = g.calculate_follow(&first);
        let table = g.generate_ll1_table(&first, &follow);
        (g, table)
    }

    #[test]
    fn balanced_grammar_is_ll1() {
        let (_, table) = table_for("S -> a S b | e");
        let s = Symbol::NonTerminal('S');

        assert!(table.is_ll1());
        assert_eq!(table.get(s, Symbol::Terminal('a')), Some(LL1Entry::Production(0)));
        assert_eq!(table.get(s, Symbol::Terminal('b')), Some(LL1Entry::Production(1)));
        assert_eq!(table.get(s, Symbol::EndMarker), Some(LL1Entry::Production(1)));
        assert_eq!(table.conflicts().count(), 0);
    }

    #[test]
    fn common_prefix_conflicts() {
        let (_, table) = table_for("S -> a S | a");
        let cell = (Symbol::NonTerminal('S'), Symbol::Terminal('a'));

        assert!(!table.is_ll1());
        assert_eq!(table.get(cell.0, cell.1), Some(LL1Entry::Conflict));
        assert_eq!(table.conflicts().collect::<Vec<_>>(), vec![cell]);
        assert_eq!(
            table.candidates(cell.0, cell.1),
            Some(&BTreeSet::from([0, 1]))
        );
    }

    #[test]
    fn left_recursion_terminates_and_conflicts() {
        let (_, table) = table_for("S -> S a | a");
        assert!(!table.is_ll1());
        assert_eq!(
            table.get(Symbol::NonTerminal('S'), Symbol::Terminal('a')),
            Some(LL1Entry::Conflict)
        );
    }

    #[test]
    fn conflict_cells_stay_conflicts() {
        let (_, table) = table_for("S -> a | a b | a c");
        assert_eq!(
            table.get(Symbol::NonTerminal('S'), Symbol::Terminal('a')),
            Some(LL1Entry::Conflict)
        );
        assert_eq!(
            table
                .candidates(Symbol::NonTerminal('S'), Symbol::Terminal('a'))
                .map(BTreeSet::len),
            Some(3)
        );
    }

    #[test]
    fn verdict_matches_conflict_cells() {
        for grammar in ["S -> a S b | e", "S -> a S | a", "E -> T X\nX -> + T X | e\nT -> i"] {
            let (_, table) = table_for(grammar);
            assert_eq!(table.is_ll1(), table.conflicts().count() == 0);
        }
    }
}
