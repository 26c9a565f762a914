use log::trace;

use super::{
    recognizer::{join_symbols, Recognizer, TraceStep},
    Action, Grammar, RejectReason, SLR1Table, Symbol,
};

/// Shift-reduce parser walking an [`SLR1Table`].
///
/// The parse stack is kept as a state stack plus a parallel symbol stack;
/// the symbols only feed traces.
#[derive(Debug, Clone, Copy)]
pub struct SLR1Parser<'a> {
    grammar: &'a Grammar,
    table: &'a SLR1Table,
}

impl<'a> SLR1Parser<'a> {
    pub fn new(grammar: &'a Grammar, table: &'a SLR1Table) -> Self {
        Self { grammar, table }
    }
}

impl Recognizer for SLR1Parser<'_> {
    fn name(&self) -> &'static str {
        "SLR(1)"
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
        let verdict = self.drive(&tokens, &mut steps);
        if verdict.is_err() {
            describe(&mut steps, "error".to_string());
        }
        verdict
    }
}

impl SLR1Parser<'_> {
    fn drive(
        &self,
        tokens: &[Symbol],
        steps: &mut Option<&mut Vec<TraceStep>>,
    ) -> Result<(), RejectReason> {
        let mut states: Vec<usize> = vec![0];
        let mut symbols: Vec<Symbol> = Vec::new();
        let mut cursor = 0;

        loop {
            let state = *states.last().ok_or(RejectReason::StackUnderflow(0))?;
            let cur = tokens.get(cursor).copied().unwrap_or(Symbol::EndMarker);

            if let Some(steps) = steps.as_deref_mut() {
                let stack = std::iter::once(state_label(states[0]))
                    .chain(
                        symbols
                            .iter()
                            .zip(states.iter().skip(1))
                            .map(|(sym, s)| format!("{} {}", sym, state_label(*s))),
                    )
                    .collect::<Vec<_>>()
                    .join(" ");
                steps.push(TraceStep {
                    stack,
                    input: join_symbols(&tokens[cursor.min(tokens.len())..]),
                    action: String::new(),
                });
            }

            let action = self.table.action(state, cur).ok_or(RejectReason::NoEntry {
                row: state_label(state),
                lookahead: cur,
                position: cursor,
            })?;

            let description = match action {
                Action::Shift(target) => {
                    symbols.push(cur);
                    states.push(target);
                    cursor += 1;
                    format!("shift {}", target)
                }
                Action::Reduce(index) => {
                    let production = self
                        .grammar
                        .production(index)
                        .ok_or(RejectReason::UnknownProduction(index))?;
                    let n = production.len();
                    if states.len() <= n || symbols.len() < n {
                        return Err(RejectReason::StackUnderflow(index));
                    }
                    states.truncate(states.len() - n);
                    symbols.truncate(symbols.len() - n);

                    let exposed = *states.last().ok_or(RejectReason::StackUnderflow(index))?;
                    let target = self.table.goto(exposed, production.head).ok_or(
                        RejectReason::NoGoto {
                            state: exposed,
                            non_terminal: production.head,
                        },
                    )?;
                    symbols.push(production.head);
                    states.push(target);
                    format!("reduce {}", production)
                }
                Action::Accept => {
                    if cursor + 1 != tokens.len() {
                        return Err(RejectReason::PrematureAccept(cursor));
                    }
                    describe(steps, "accept".to_string());
                    trace!("SLR(1) {}: accept", cursor);
                    return Ok(());
                }
                Action::Error(_) => {
                    return Err(RejectReason::Conflict {
                        row: state_label(state),
                        lookahead: cur,
                        position: cursor,
                    })
                }
            };

            trace!("SLR(1) {}: {}", cursor, description);
            describe(steps, description);
        }
    }
}

fn state_label(state: usize) -> String {
    format!("I{}", state)
}

fn describe(steps: &mut Option<&mut Vec<TraceStep>>, action: String) {
    if let Some(step) = steps.as_deref_mut().and_then(|s| s.last_mut()) {
        step.action = action;
    }
}
