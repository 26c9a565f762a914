use std::collections::{BTreeSet, HashMap};

use log::debug;

use super::{Grammar, Symbol};

/// FIRST sets of every terminal, non-terminal and epsilon.
///
/// Sets only ever hold terminals and epsilon; the end marker has no entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FirstSets {
    sets: HashMap<Symbol, BTreeSet<Symbol>>,
}

impl FirstSets {
    pub fn get(&self, symbol: Symbol) -> Option<&BTreeSet<Symbol>> {
        self.sets.get(&symbol)
    }

    /// Whether epsilon is in FIRST(`symbol`).
    pub fn nullable(&self, symbol: Symbol) -> bool {
        symbol == Symbol::Epsilon
            || self
                .sets
                .get(&symbol)
                .map_or(false, |set| set.contains(&Symbol::Epsilon))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &BTreeSet<Symbol>)> {
        self.sets.iter()
    }

    /// FIRST of a symbol sequence. Epsilon is included iff every symbol of
    /// `alpha` can derive the empty string (trivially so for an empty `alpha`).
    pub fn of_string(&self, alpha: &[Symbol]) -> BTreeSet<Symbol> {
        let mut first = BTreeSet::new();
        if alpha == [Symbol::Epsilon] {
            first.insert(Symbol::Epsilon);
            return first;
        }

        for &symbol in alpha {
            if !self.add_non_epsilon_first(symbol, &mut first) {
                return first;
            }
        }
        first.insert(Symbol::Epsilon);
        first
    }

    /// Adds FIRST(`symbol`) minus epsilon into `out` and reports whether
    /// `symbol` can derive the empty string. Symbols without an entry are
    /// treated as freshly initialized.
    fn add_non_epsilon_first(&self, symbol: Symbol, out: &mut BTreeSet<Symbol>) -> bool {
        match (self.sets.get(&symbol), symbol) {
            (Some(set), _) => {
                out.extend(set.iter().filter(|s| **s != Symbol::Epsilon).copied());
                set.contains(&Symbol::Epsilon)
            }
            (None, Symbol::Terminal(_)) => {
                out.insert(symbol);
                false
            }
            (None, Symbol::Epsilon) => true,
            (None, Symbol::NonTerminal(_)) | (None, Symbol::EndMarker) => false,
        }
    }
}

/// FOLLOW sets of every non-terminal. Sets only ever hold terminals and the
/// end marker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FollowSets {
    sets: HashMap<Symbol, BTreeSet<Symbol>>,
}

impl FollowSets {
    pub fn get(&self, non_terminal: Symbol) -> Option<&BTreeSet<Symbol>> {
        self.sets.get(&non_terminal)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &BTreeSet<Symbol>)> {
        self.sets.iter()
    }
}

impl Grammar {
    pub fn calculate_first(&self) -> FirstSets {
        let mut first = FirstSets::default();
        first
            .sets
            .insert(Symbol::Epsilon, BTreeSet::from([Symbol::Epsilon]));
        for t in self.terminal_iter().filter(Symbol::is_terminal) {
            first.sets.insert(t, BTreeSet::from([t]));
        }
        for nt in self.non_terminal_iter() {
            first.sets.insert(nt, BTreeSet::new());
        }

        let mut passes = 1;
        while self.first_pass(&mut first) {
            passes += 1;
        }
        debug!("FIRST sets converged after {} passes", passes);
        first
    }

    /// One sweep over all productions. Returns whether any set grew.
    fn first_pass(&self, first: &mut FirstSets) -> bool {
        let mut changed = false;
        for production in self.productions() {
            let addition = first.of_string(&production.body);
            let set = first.sets.entry(production.head).or_default();
            let before = set.len();
            set.extend(addition);
            changed |= set.len() > before;
        }
        changed
    }

    pub fn calculate_follow(&self, first: &FirstSets) -> FollowSets {
        let mut follow = FollowSets::default();
        for nt in self.non_terminal_iter() {
            follow.sets.insert(nt, BTreeSet::new());
        }
        follow
            .sets
            .entry(self.start_symbol())
            .or_default()
            .insert(Symbol::EndMarker);

        let mut passes = 1;
        while self.follow_pass(first, &mut follow) {
            passes += 1;
        }
        debug!("FOLLOW sets converged after {} passes", passes);
        follow
    }

    fn follow_pass(&self, first: &FirstSets, follow: &mut FollowSets) -> bool {
        let mut changed = false;
        for production in self.productions().iter().filter(|p| !p.is_epsilon()) {
            for (i, &symbol) in production.body.iter().enumerate() {
                if !symbol.is_non_terminal() {
                    continue;
                }

                let beta = &production.body[i + 1..];
                let mut addition = BTreeSet::new();
                let mut inherits_head = beta.is_empty();
                if !beta.is_empty() {
                    let first_beta = first.of_string(beta);
                    inherits_head = first_beta.contains(&Symbol::Epsilon);
                    addition.extend(first_beta.into_iter().filter(|s| *s != Symbol::Epsilon));
                }
                if inherits_head {
                    if let Some(head_follow) = follow.sets.get(&production.head) {
                        addition.extend(head_follow.iter().copied());
                    }
                }

                let set = follow.sets.entry(symbol).or_default();
                let before = set.len();
                set.extend(addition);
                changed |= set.len() > before;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(c: char) -> Symbol {
        Symbol::Terminal(c)
    }

    fn nt(c: char) -> Symbol {
        Symbol::NonTerminal(c)
    }

    fn set<const N: usize>(symbols: [Symbol; N]) -> BTreeSet<Symbol> {
        BTreeSet::from(symbols)
    }

    const EXPR: &str = "E -> T X
X -> + T X | e
T -> F Y
Y -> * F Y | e
F -> ( E ) | i";

    #[test]
    fn first_of_expression_grammar() {
        let g = Grammar::parse(EXPR).unwrap();
        let first = g.calculate_first();

        assert_eq!(first.get(nt('E')), Some(&set([t('('), t('i')])));
        assert_eq!(first.get(nt('T')), Some(&set([t('('), t('i')])));
        assert_eq!(first.get(nt('X')), Some(&set([t('+'), Symbol::Epsilon])));
        assert_eq!(first.get(nt('Y')), Some(&set([t('*'), Symbol::Epsilon])));
        assert!(first.nullable(nt('X')));
        assert!(!first.nullable(nt('F')));
    }

    #[test]
    fn follow_of_expression_grammar() {
        let g = Grammar::parse(EXPR).unwrap();
        let first = g.calculate_first();
        let follow = g.calculate_follow(&first);

        assert_eq!(follow.get(nt('E')), Some(&set([t(')'), Symbol::EndMarker])));
        assert_eq!(follow.get(nt('X')), Some(&set([t(')'), Symbol::EndMarker])));
        assert_eq!(
            follow.get(nt('T')),
            Some(&set([t('+'), t(')'), Symbol::EndMarker]))
        );
        assert_eq!(
            follow.get(nt('F')),
            Some(&set([t('+'), t('*'), t(')'), Symbol::EndMarker]))
        );
    }

    #[test]
    fn terminals_and_epsilon_are_their_own_first() {
        let g = Grammar::parse(EXPR).unwrap();
        let first = g.calculate_first();
        for terminal in g.terminal_iter().filter(Symbol::is_terminal) {
            assert_eq!(first.get(terminal), Some(&set([terminal])));
        }
        assert_eq!(first.get(Symbol::Epsilon), Some(&set([Symbol::Epsilon])));
        assert_eq!(first.get(Symbol::EndMarker), None);
    }

    #[test]
    fn sets_never_leak_markers() {
        let g = Grammar::parse("S -> A B | e\nA -> a A | e\nB -> b | A").unwrap();
        let first = g.calculate_first();
        let follow = g.calculate_follow(&first);

        assert!(first.iter().all(|(_, s)| !s.contains(&Symbol::EndMarker)));
        assert!(follow.iter().all(|(_, s)| !s.contains(&Symbol::Epsilon)));
        assert!(follow
            .get(g.start_symbol())
            .unwrap()
            .contains(&Symbol::EndMarker));
    }

    #[test]
    fn recomputation_is_idempotent_and_stable() {
        let g = Grammar::parse(EXPR).unwrap();
        let mut first = g.calculate_first();
        assert_eq!(first, g.calculate_first());
        assert!(!g.first_pass(&mut first));

        let mut follow = g.calculate_follow(&first);
        assert_eq!(follow, g.calculate_follow(&first));
        assert!(!g.follow_pass(&first, &mut follow));
    }

    #[test]
    fn first_of_string_stops_at_non_nullable() {
        let g = Grammar::parse(EXPR).unwrap();
        let first = g.calculate_first();

        assert_eq!(first.of_string(&[Symbol::Epsilon]), set([Symbol::Epsilon]));
        assert_eq!(first.of_string(&[]), set([Symbol::Epsilon]));
        assert_eq!(first.of_string(&[nt('X'), nt('Y')]), set([t('+'), t('*'), Symbol::Epsilon]));
        assert_eq!(first.of_string(&[nt('X'), t(')'), nt('Y')]), set([t('+'), t(')')]));
        assert_eq!(first.of_string(&[t('z')]), set([t('z')]));
        assert_eq!(first.of_string(&[Symbol::EndMarker, t('z')]), set([]));
    }

    #[test]
    fn epsilon_production_makes_head_nullable() {
        let g = Grammar::parse("S -> a | e").unwrap();
        let first = g.calculate_first();
        assert_eq!(first.get(nt('S')), Some(&set([t('a'), Symbol::Epsilon])));
    }
}
