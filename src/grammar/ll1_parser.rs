use log::trace;

use super::{
    recognizer::{join_symbols, Recognizer, TraceStep},
    Grammar, LL1Entry, LL1Table, RejectReason, Symbol,
};

/// Predictive parser walking an [`LL1Table`].
#[derive(Debug, Clone, Copy)]
pub struct LL1Parser<'a> {
    grammar: &'a Grammar,
    table: &'a LL1Table,
}

impl<'a> LL1Parser<'a> {
    pub fn new(grammar: &'a Grammar, table: &'a LL1Table) -> Self {
        Self { grammar, table }
    }
}

impl Recognizer for LL1Parser<'_> {
    fn name(&self) -> &'static str {
        "LL(1)"
    }

    fn run(
        &self,
        input: &[Symbol],
        mut steps: Option<&mut Vec<TraceStep>>,
    ) -> Result<(), RejectReason> {
        let tokens: Vec<Symbol> = input
            .iter()
            .copied()
            .chain(std::iter::once(Symbol::EndMarker))
            .collect();
        let mut stack = vec![Symbol::EndMarker, self.grammar.start_symbol()];
        let mut cursor = 0;

        while let Some(&top) = stack.last() {
            let cur = tokens.get(cursor).copied().unwrap_or(Symbol::EndMarker);

            let action = match top {
                Symbol::Epsilon => {
                    stack.pop();
                    "pop ϵ".to_string()
                }
                Symbol::EndMarker | Symbol::Terminal(_) if self.grammar.is_terminal(top) => {
                    if top != cur {
                        return Err(RejectReason::UnexpectedSymbol {
                            expected: top,
                            found: cur,
                            position: cursor,
                        });
                    }
                    stack.pop();
                    cursor += 1;
                    format!("match {}", cur)
                }
                Symbol::NonTerminal(_) if self.grammar.is_non_terminal(top) => {
                    let index = match self.table.get(top, cur) {
                        Some(LL1Entry::Production(index)) => index,
                        Some(LL1Entry::Conflict) => {
                            return Err(RejectReason::Conflict {
                                row: top.to_string(),
                                lookahead: cur,
                                position: cursor,
                            })
                        }
                        None => {
                            return Err(RejectReason::NoEntry {
                                row: top.to_string(),
                                lookahead: cur,
                                position: cursor,
                            })
                        }
                    };
                    let production = self
                        .grammar
                        .production(index)
                        .ok_or(RejectReason::UnknownProduction(index))?;
                    stack.pop();
                    if !production.is_epsilon() {
                        stack.extend(production.body.iter().rev());
                    }
                    format!("output {}", production)
                }
                _ => return Err(RejectReason::MalformedStack(top)),
            };

            trace!("LL(1) {}: {}", cursor, action);
            if let Some(steps) = steps.as_deref_mut() {
                steps.push(TraceStep {
                    stack: join_symbols(&stack),
                    input: join_symbols(&tokens[cursor.min(tokens.len())..]),
                    action,
                });
            }
        }

        if cursor == tokens.len() {
            Ok(())
        } else {
            Err(RejectReason::TrailingInput(cursor))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::symbol::symbols_of;

    fn check(grammar: &str, accepted: &[&str], rejected: &[&str]) {
        let g = Grammar::parse(grammar).unwrap();
        let first = g.calculate_first();
        let follow = g.calculate_follow(&first);
        let table = g.generate_ll1_table(&first, &follow);
        let parser = LL1Parser::new(&g, &table);

        for input in accepted {
            assert!(parser.accepts_str(input), "{:?} should be accepted", input);
        }
        for input in rejected {
            assert!(!parser.accepts_str(input), "{:?} should be rejected", input);
        }
    }

    #[test]
    fn balanced_strings() {
        check("S -> a S b | e", &["", "ab", "aabb", "aaabbb"], &["a", "ba", "abb", "aab"]);
    }

    #[test]
    fn expression_grammar() {
        check(
            "E -> T X\nX -> + T X | e\nT -> F Y\nY -> * F Y | e\nF -> ( E ) | i",
            &["i", "i+i", "i*(i+i)", "(i)"],
            &["", "i+", "(i", "i i)", "+"],
        );
    }

    #[test]
    fn empty_input_through_epsilon_alternative() {
        check("S -> a | e", &["", "a"], &["aa", "b"]);
    }

    #[test]
    fn unknown_symbols_reject() {
        check("S -> a S b | e", &[], &["z", "aXb", "a$b", "ab$"]);
    }

    #[test]
    fn conflict_cells_reject() {
        let g = Grammar::parse("S -> a S | a").unwrap();
        let first = g.calculate_first();
        let follow = g.calculate_follow(&first);
        let table = g.generate_ll1_table(&first, &follow);
        let parser = LL1Parser::new(&g, &table);

        assert!(matches!(
            parser.recognize(&symbols_of("a")),
            Err(RejectReason::Conflict { .. })
        ));
    }

    #[test]
    fn trace_ends_with_match_of_end_marker() {
        let g = Grammar::parse("S -> a S b | e").unwrap();
        let first = g.calculate_first();
        let follow = g.calculate_follow(&first);
        let table = g.generate_ll1_table(&first, &follow);
        let trace = LL1Parser::new(&g, &table).trace(&symbols_of("ab"));

        assert!(trace.accepted());
        assert_eq!(trace.steps[0].action, "output S -> a S b");
        assert_eq!(trace.steps.last().map(|s| s.action.as_str()), Some("match $"));
        assert_eq!(trace.steps.last().map(|s| s.stack.as_str()), Some(""));
    }
}
