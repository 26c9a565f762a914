pub mod analysis;
pub mod error;
pub mod first_follow;
pub mod grammar;
pub mod ll1_parser;
pub mod ll1_table;
pub mod lr_dfa;
pub mod parse;
pub mod pretty_print;
pub mod recognizer;
pub mod slr1_parser;
pub mod slr1_table;
pub mod symbol;

pub use analysis::Analysis;
pub use error::{GrammarError, RejectReason};
pub use first_follow::{FirstSets, FollowSets};
pub use grammar::{Grammar, GrammarBuilder};
pub use ll1_parser::LL1Parser;
pub use ll1_table::{LL1Entry, LL1Table};
pub use recognizer::{ParseTrace, Recognizer, TraceStep};
pub use slr1_parser::SLR1Parser;
pub use slr1_table::{Action, ConflictKind, SLR1Table};
pub use symbol::{Production, Symbol};

pub const EPSILON: &str = "ϵ";
pub const END_MARK: &str = "$";
