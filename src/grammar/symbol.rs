use std::fmt;

use serde::Serialize;

use super::{END_MARK, EPSILON};

/// A grammar symbol. Terminals and non-terminals are single characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Symbol {
    Terminal(char),
    NonTerminal(char),
    Epsilon,
    EndMarker,
}

impl Symbol {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    pub fn is_non_terminal(&self) -> bool {
        matches!(self, Symbol::NonTerminal(_))
    }

    /// Terminal or end marker, i.e. something that can be a lookahead.
    pub fn is_lookahead(&self) -> bool {
        matches!(self, Symbol::Terminal(_) | Symbol::EndMarker)
    }

    /// Classifies a single input character the way grammar bodies do.
    pub fn from_input_char(c: char) -> Self {
        if c.to_string() == END_MARK {
            Symbol::EndMarker
        } else if c.is_ascii_uppercase() {
            Symbol::NonTerminal(c)
        } else {
            Symbol::Terminal(c)
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(c) | Symbol::NonTerminal(c) => write!(f, "{}", c),
            Symbol::Epsilon => write!(f, "{}", EPSILON),
            Symbol::EndMarker => write!(f, "{}", END_MARK),
        }
    }
}

/// Turns an input line into terminal symbols. Whitespace is skipped.
pub fn symbols_of(input: &str) -> Vec<Symbol> {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(Symbol::from_input_char)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
    pub head: Symbol,
    pub body: Vec<Symbol>,
}

impl Production {
    pub fn new(head: Symbol, body: Vec<Symbol>) -> Self {
        Self { head, body }
    }

    pub fn is_epsilon(&self) -> bool {
        self.body == [Symbol::Epsilon]
    }

    /// Number of symbols the production derives; zero for the epsilon body.
    pub fn len(&self) -> usize {
        if self.is_epsilon() {
            0
        } else {
            self.body.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Symbol right after `dot`, if any. The epsilon body has none.
    pub fn symbol_at(&self, dot: usize) -> Option<Symbol> {
        if self.is_epsilon() {
            None
        } else {
            self.body.get(dot).copied()
        }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.head)?;
        for s in &self.body {
            write!(f, " {}", s)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_input() {
        assert_eq!(
            symbols_of("a b$"),
            vec![Symbol::Terminal('a'), Symbol::Terminal('b'), Symbol::EndMarker]
        );
        assert_eq!(Symbol::from_input_char('S'), Symbol::NonTerminal('S'));
    }

    #[test]
    fn epsilon_production() {
        let p = Production::new(Symbol::NonTerminal('S'), vec![Symbol::Epsilon]);
        assert!(p.is_epsilon());
        assert_eq!(p.len(), 0);
        assert_eq!(p.symbol_at(0), None);
        assert_eq!(p.to_string(), "S -> ϵ");
    }
}
