use std::collections::HashMap;
use std::fmt;

use log::{debug, info};
use serde::Serialize;

use super::{lr_dfa::LRFSM, FollowSets, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConflictKind {
    /// A shift collided with another action. Shift/shift cannot happen since
    /// every (state, terminal) pair has at most one transition.
    ShiftReduce,
    /// Two reductions, or a reduction meeting the accept action.
    ReduceReduce,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKind::ShiftReduce => write!(f, "S/R conflict"),
            ConflictKind::ReduceReduce => write!(f, "R/R conflict"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Shift(usize),
    /// Reduce by a production of the original (non-augmented) grammar.
    Reduce(usize),
    Accept,
    Error(ConflictKind),
}

impl Action {
    fn collision(existing: &Action, new: &Action) -> ConflictKind {
        match (existing, new) {
            (_, Action::Shift(_)) | (Action::Shift(_), _) => ConflictKind::ShiftReduce,
            _ => ConflictKind::ReduceReduce,
        }
    }
}

/// SLR(1) action and goto tables.
#[derive(Debug, Clone, Default)]
pub struct SLR1Table {
    action: HashMap<(usize, Symbol), Action>,
    goto: HashMap<(usize, Symbol), usize>,
    candidates: HashMap<(usize, Symbol), Vec<Action>>,
    states: usize,
    is_slr1: bool,
}

impl SLR1Table {
    pub fn action(&self, state: usize, lookahead: Symbol) -> Option<Action> {
        self.action.get(&(state, lookahead)).copied()
    }

    pub fn goto(&self, state: usize, non_terminal: Symbol) -> Option<usize> {
        self.goto.get(&(state, non_terminal)).copied()
    }

    /// Every distinct action that was placed in the cell, in placement order.
    pub fn candidates(&self, state: usize, lookahead: Symbol) -> &[Action] {
        self.candidates
            .get(&(state, lookahead))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_slr1(&self) -> bool {
        self.is_slr1
    }

    pub fn state_count(&self) -> usize {
        self.states
    }

    pub fn conflicts(&self) -> impl Iterator<Item = (usize, Symbol, ConflictKind)> + '_ {
        self.action.iter().filter_map(|(&(s, la), action)| match action {
            Action::Error(kind) => Some((s, la, *kind)),
            _ => None,
        })
    }

    fn place(&mut self, state: usize, lookahead: Symbol, action: Action) {
        let key = (state, lookahead);
        let candidates = self.candidates.entry(key).or_default();
        if !candidates.contains(&action) {
            candidates.push(action);
        }

        match self.action.get(&key).copied() {
            None => {
                self.action.insert(key, action);
            }
            Some(Action::Error(_)) => {}
            Some(existing) if existing == action => {}
            Some(existing) => {
                let kind = Action::collision(&existing, &action);
                debug!(
                    "SLR(1) {} in state {} on {}: {:?} vs {:?}",
                    kind, state, lookahead, existing, action
                );
                self.action.insert(key, Action::Error(kind));
                self.is_slr1 = false;
            }
        }
    }
}

impl LRFSM {
    pub fn to_slr1_table(&self, follow: &FollowSets) -> SLR1Table {
        let mut table = SLR1Table {
            states: self.states.len(),
            is_slr1: true,
            ..Default::default()
        };

        for (s, state) in self.states.iter().enumerate() {
            for item in &state.items {
                let production = &self.productions[item.production];
                match production.symbol_at(item.position) {
                    Some(x @ Symbol::Terminal(_)) => {
                        if let Some(target) = self.transition(s, x) {
                            table.place(s, x, Action::Shift(target));
                        }
                    }
                    Some(_) => {}
                    None if item.production == 0 => {
                        table.place(s, Symbol::EndMarker, Action::Accept);
                    }
                    None => {
                        for &f in follow.get(production.head).into_iter().flatten() {
                            table.place(s, f, Action::Reduce(item.production - 1));
                        }
                    }
                }
            }
        }

        for (u, symbol, v) in self.transitions() {
            if symbol.is_non_terminal() {
                table.goto.insert((u, symbol), v);
            }
        }

        info!(
            "SLR(1) table: {} states, grammar is{} SLR(1)",
            table.state_count(),
            if table.is_slr1() { "" } else { " not" }
        );
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Grammar;

    fn table_for(grammar: &str) -> (LRFSM, SLR1Table) {
        let g = Grammar::parse(grammar).unwrap();
        let first = g.calculate_first();
        let follow = g.calculate_follow(&first);
        let fsm = g.to_lr0_fsm();
        let table = fsm.to_slr1_table(&follow);
        (fsm, table)
    }

    #[test]
    fn balanced_grammar_is_slr1() {
        let (fsm, table) = table_for("S -> a S b | e");
        let a = Symbol::Terminal('a');
        let b = Symbol::Terminal('b');
        let s = Symbol::NonTerminal('S');

        assert!(table.is_slr1());
        let after_a = fsm.transition(0, a).unwrap();
        assert_eq!(table.action(0, a), Some(Action::Shift(after_a)));
        assert_eq!(table.action(0, Symbol::EndMarker), Some(Action::Reduce(1)));
        assert_eq!(table.action(0, b), Some(Action::Reduce(1)));
        assert_eq!(table.action(0, Symbol::Terminal('z')), None);
        let after_s = table.goto(0, s).unwrap();
        assert_eq!(table.action(after_s, Symbol::EndMarker), Some(Action::Accept));
    }

    #[test]
    fn left_recursion_is_slr1() {
        let (_, table) = table_for("S -> S a | a");
        assert!(table.is_slr1());
        assert_eq!(table.conflicts().count(), 0);
    }

    #[test]
    fn goto_table_only_holds_non_terminals() {
        let (fsm, table) = table_for("E -> E + T | T\nT -> T * F | F\nF -> ( E ) | i");
        for (u, symbol, v) in fsm.transitions() {
            if symbol.is_non_terminal() {
                assert_eq!(table.goto(u, symbol), Some(v));
            } else {
                assert_eq!(table.goto(u, symbol), None);
                assert_eq!(table.action(u, symbol), Some(Action::Shift(v)));
            }
        }
        assert!(table.is_slr1());
    }

    #[test]
    fn shift_reduce_conflict() {
        // dangling else: S -> i S | i S t S | a
        let (_, table) = table_for("S -> i S | i S t S | a");
        assert!(!table.is_slr1());
        assert!(table
            .conflicts()
            .any(|(_, la, kind)| la == Symbol::Terminal('t') && kind == ConflictKind::ShiftReduce));
    }

    #[test]
    fn reduce_reduce_conflict() {
        let (_, table) = table_for("S -> A | B\nA -> a\nB -> a");
        assert!(!table.is_slr1());
        let conflicts: Vec<_> = table.conflicts().collect();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].1, Symbol::EndMarker);
        assert_eq!(conflicts[0].2, ConflictKind::ReduceReduce);
        assert_eq!(table.candidates(conflicts[0].0, Symbol::EndMarker).len(), 2);
    }

    #[test]
    fn error_cells_stay_errors() {
        let (_, table) = table_for("S -> A | B | C\nA -> a\nB -> a\nC -> a");
        let conflicts: Vec<_> = table.conflicts().collect();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(table.candidates(conflicts[0].0, Symbol::EndMarker).len(), 3);
        assert_eq!(
            table.action(conflicts[0].0, Symbol::EndMarker),
            Some(Action::Error(ConflictKind::ReduceReduce))
        );
    }

    #[test]
    fn verdict_matches_error_cells() {
        for grammar in ["S -> a S b | e", "S -> A | B\nA -> a\nB -> a", "S -> S a | a"] {
            let (_, table) = table_for(grammar);
            assert_eq!(table.is_slr1(), table.conflicts().count() == 0);
        }
    }

    #[test]
    fn reduce_on_accept_cell_is_reduce_reduce() {
        // S' -> S. and A -> S. share a state, FOLLOW(A) holds $.
        let (_, table) = table_for("S -> A\nA -> S | a");
        assert!(!table.is_slr1());
        let conflicts: Vec<_> = table.conflicts().collect();
        assert_eq!(conflicts.len(), 1);
        let (state, lookahead, kind) = conflicts[0];
        assert_eq!(lookahead, Symbol::EndMarker);
        assert_eq!(kind, ConflictKind::ReduceReduce);
        assert_eq!(
            table.candidates(state, lookahead),
            &[Action::Accept, Action::Reduce(1)]
        );
    }
}
