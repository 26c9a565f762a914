use serde::Serialize;

use super::{symbol::symbols_of, RejectReason, Symbol};

/// One row of a parse trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    pub stack: String,
    pub input: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTrace {
    pub steps: Vec<TraceStep>,
    pub verdict: Result<(), RejectReason>,
}

impl ParseTrace {
    pub fn accepted(&self) -> bool {
        self.verdict.is_ok()
    }
}

/// A table-driven recognizer. Implementations never mutate their tables, so
/// any number of parses may run against the same tables at once.
pub trait Recognizer {
    fn name(&self) -> &'static str;

    /// Runs one parse over `input` (the end marker is appended internally),
    /// pushing a [`TraceStep`] per iteration when `trace` is given.
    fn run(&self, input: &[Symbol], trace: Option<&mut Vec<TraceStep>>)
        -> Result<(), RejectReason>;

    fn recognize(&self, input: &[Symbol]) -> Result<(), RejectReason> {
        self.run(input, None)
    }

    fn accepts(&self, input: &[Symbol]) -> bool {
        self.recognize(input).is_ok()
    }

    fn accepts_str(&self, input: &str) -> bool {
        self.accepts(&symbols_of(input))
    }

    fn trace(&self, input: &[Symbol]) -> ParseTrace {
        let mut steps = Vec::new();
        let verdict = self.run(input, Some(&mut steps));
        ParseTrace { steps, verdict }
    }
}

pub(crate) fn join_symbols<'a>(symbols: impl IntoIterator<Item = &'a Symbol>) -> String {
    symbols
        .into_iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
