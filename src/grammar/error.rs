use thiserror::Error;

use super::Symbol;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarError {
    #[error("grammar has no productions")]
    NoProductions,
    #[error("Line {line}: too many \"->\"")]
    TooManyArrows { line: usize },
    #[error("Line {line}: cannot find left side")]
    MissingLeftSide { line: usize },
    #[error("Line {line}: left side must be a single uppercase letter, found \"{found}\"")]
    InvalidHead { line: usize, found: String },
    #[error("Line {line}: no alternatives on the right side")]
    NoAlternatives { line: usize },
    #[error("Line {line}: invalid production count \"{found}\"")]
    InvalidCount { line: usize, found: String },
    #[error("non-terminal '{0}' must be a single uppercase letter")]
    InvalidNonTerminal(char),
    #[error("{0} -> ...: ϵ-productions may not contain other symbols")]
    EpsilonNotAlone(char),
    #[error("{0} -> ...: production body is empty")]
    EmptyBody(char),
    #[error("{0} -> ...: '$' is reserved for the end marker")]
    ReservedEndMarker(char),
    #[error("no productions found for non-terminal '{0}'")]
    NonTerminalNoProductions(char),
}

/// Why a recognizer rejected its input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("expected {expected}, found {found} at position {position}")]
    UnexpectedSymbol {
        expected: Symbol,
        found: Symbol,
        position: usize,
    },
    #[error("no table entry for ({row}, {lookahead}) at position {position}")]
    NoEntry {
        row: String,
        lookahead: Symbol,
        position: usize,
    },
    #[error("conflicting table entry for ({row}, {lookahead}) at position {position}")]
    Conflict {
        row: String,
        lookahead: Symbol,
        position: usize,
    },
    #[error("unexpected symbol {0} on the parse stack")]
    MalformedStack(Symbol),
    #[error("parse stack underflow while reducing by production {0}")]
    StackUnderflow(usize),
    #[error("no goto entry for ({state}, {non_terminal})")]
    NoGoto { state: usize, non_terminal: Symbol },
    #[error("production {0} does not exist")]
    UnknownProduction(usize),
    #[error("accepted before the end of input at position {0}")]
    PrematureAccept(usize),
    #[error("input remains after the parse stack emptied at position {0}")]
    TrailingInput(usize),
}
