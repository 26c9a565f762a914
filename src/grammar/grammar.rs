use std::collections::{BTreeSet, HashMap};

use log::warn;

use super::{GrammarError, Production, Symbol};

/// Non-alphanumeric characters accepted as terminals in production bodies.
const PUNCTUATION_TERMINALS: [char; 4] = ['+', '*', '(', ')'];

/// Bodies consisting of exactly one of these derive the empty string.
const EPSILON_SPELLINGS: [&str; 3] = ["e", "ϵ", "ε"];

/// A validated context-free grammar. Frozen once built.
#[derive(Debug, Clone)]
pub struct Grammar {
    terminals: BTreeSet<Symbol>,
    non_terminals: BTreeSet<Symbol>,
    productions: Vec<Production>,
    alternatives: HashMap<Symbol, Vec<usize>>,
    start_symbol: Symbol,
}

impl Grammar {
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::new()
    }

    /// Terminals including the end marker.
    pub fn terminals(&self) -> &BTreeSet<Symbol> {
        &self.terminals
    }

    pub fn non_terminals(&self) -> &BTreeSet<Symbol> {
        &self.non_terminals
    }

    pub fn terminal_iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.terminals.iter().copied()
    }

    pub fn non_terminal_iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.non_terminals.iter().copied()
    }

    /// Every symbol except epsilon, terminals first.
    pub fn symbol_iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.terminal_iter().chain(self.non_terminal_iter())
    }

    pub fn is_terminal(&self, symbol: Symbol) -> bool {
        self.terminals.contains(&symbol)
    }

    pub fn is_non_terminal(&self, symbol: Symbol) -> bool {
        self.non_terminals.contains(&symbol)
    }

    /// Productions in declaration order; the position is the production index.
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn production(&self, index: usize) -> Option<&Production> {
        self.productions.get(index)
    }

    /// Indices of the alternatives of `non_terminal`, in declaration order.
    pub fn alternatives(&self, non_terminal: Symbol) -> &[usize] {
        self.alternatives
            .get(&non_terminal)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn start_symbol(&self) -> Symbol {
        self.start_symbol
    }

    /// A non-terminal that does not occur in the grammar, used as the head of
    /// the augmented start production.
    pub fn augmented_start(&self) -> Symbol {
        ['′', '″', '‴']
            .into_iter()
            .chain('\u{E000}'..='\u{F8FF}')
            .map(Symbol::NonTerminal)
            .find(|s| !self.non_terminals.contains(s) && !self.terminals.contains(s))
            .unwrap_or(Symbol::NonTerminal('\u{F8FF}'))
    }
}

/// Accumulates productions and freezes them into a [`Grammar`].
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    productions: Vec<Production>,
    start_symbol: Option<Symbol>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `head -> body`. Uppercase letters are non-terminals; lowercase
    /// letters, digits and `+*()` are terminals; whitespace is skipped and any
    /// other character is ignored with a warning. Duplicates are dropped.
    pub fn add_production(&mut self, head: char, body: &str) -> Result<&mut Self, GrammarError> {
        if !head.is_ascii_uppercase() {
            return Err(GrammarError::InvalidNonTerminal(head));
        }
        let body = Self::parse_body(head, body)?;
        self.push(Production::new(Symbol::NonTerminal(head), body));
        Ok(self)
    }

    /// Sets the start symbol. Defaults to the head of the first production.
    pub fn start(&mut self, start: char) -> Result<&mut Self, GrammarError> {
        if !start.is_ascii_uppercase() {
            return Err(GrammarError::InvalidNonTerminal(start));
        }
        self.start_symbol = Some(Symbol::NonTerminal(start));
        Ok(self)
    }

    fn push(&mut self, production: Production) {
        if !self.productions.contains(&production) {
            self.productions.push(production);
        }
    }

    fn parse_body(head: char, body: &str) -> Result<Vec<Symbol>, GrammarError> {
        let trimmed = body.trim();
        if EPSILON_SPELLINGS.contains(&trimmed) {
            return Ok(vec![Symbol::Epsilon]);
        }

        let mut symbols = Vec::new();
        for c in trimmed.chars() {
            let symbol = match c {
                c if c.is_whitespace() => continue,
                c if EPSILON_SPELLINGS.contains(&c.to_string().as_str()) => {
                    return Err(GrammarError::EpsilonNotAlone(head))
                }
                '$' => return Err(GrammarError::ReservedEndMarker(head)),
                c if c.is_ascii_uppercase() => Symbol::NonTerminal(c),
                c if c.is_ascii_lowercase()
                    || c.is_ascii_digit()
                    || PUNCTUATION_TERMINALS.contains(&c) =>
                {
                    Symbol::Terminal(c)
                }
                c => {
                    warn!("{} -> {}: ignoring unrecognized character '{}'", head, body, c);
                    continue;
                }
            };
            symbols.push(symbol);
        }

        if symbols.is_empty() {
            return Err(GrammarError::EmptyBody(head));
        }
        Ok(symbols)
    }

    /// Validates and freezes the grammar. The end marker joins the terminals.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        let start_symbol = match (self.start_symbol, self.productions.first()) {
            (Some(s), _) => s,
            (None, Some(p)) => p.head,
            (None, None) => return Err(GrammarError::NoProductions),
        };

        let mut terminals = BTreeSet::from([Symbol::EndMarker]);
        let mut non_terminals = BTreeSet::new();
        let mut alternatives: HashMap<Symbol, Vec<usize>> = HashMap::new();

        for (i, production) in self.productions.iter().enumerate() {
            non_terminals.insert(production.head);
            alternatives.entry(production.head).or_default().push(i);
            for &symbol in &production.body {
                match symbol {
                    Symbol::Terminal(_) => {
                        terminals.insert(symbol);
                    }
                    Symbol::NonTerminal(_) => {
                        non_terminals.insert(symbol);
                    }
                    Symbol::Epsilon | Symbol::EndMarker => {}
                }
            }
        }

        if let Some(&Symbol::NonTerminal(c)) = non_terminals
            .iter()
            .chain(std::iter::once(&start_symbol))
            .find(|nt| !alternatives.contains_key(nt))
        {
            return Err(GrammarError::NonTerminalNoProductions(c));
        }

        Ok(Grammar {
            terminals,
            non_terminals,
            productions: self.productions,
            alternatives,
            start_symbol,
        })
    }
}
