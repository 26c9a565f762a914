use std::collections::HashSet;

use crowbook_text_processing::escape;
use serde::Serialize;

use super::{
    analysis::Analysis,
    lr_dfa::{Item, LRFSM},
    recognizer::{ParseTrace, TraceStep},
    Action, ConflictKind, FirstSets, FollowSets, Grammar, LL1Table, Production, SLR1Table, Symbol,
    EPSILON,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    LaTeX,
    JSON,
}

/// Something that can be shown as plain text, LaTeX or JSON.
pub trait Output: Serialize {
    fn to_plaintext(&self) -> String;

    fn to_latex(&self) -> String;

    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
    }

    fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Plain => self.to_plaintext(),
            OutputFormat::LaTeX => self.to_latex(),
            OutputFormat::JSON => self.to_json(),
        }
    }
}

/// Right-aligns every column and joins the cells with ` | `.
fn align_columns(output: &[Vec<String>]) -> String {
    let columns = output.iter().map(Vec::len).max().unwrap_or(0);
    let width: Vec<usize> = (0..columns)
        .map(|j| {
            output
                .iter()
                .filter_map(|line| line.get(j))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    output
        .iter()
        .map(|line| {
            line.iter()
                .enumerate()
                .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn tex_symbol(s: &str, terminal_set: &HashSet<&str>) -> String {
    if s == EPSILON {
        "\\epsilon".to_string()
    } else if terminal_set.contains(s) {
        format!("\\text{{{}}}", escape::tex(s))
    } else {
        escape::tex(s).to_string()
    }
}

fn names(symbols: impl IntoIterator<Item = Symbol>) -> Vec<String> {
    symbols.into_iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput {
    pub left: String,
    pub rights: Vec<Vec<String>>,
}

impl ProductionOutput {
    fn new(left: Symbol) -> Self {
        Self {
            left: left.to_string(),
            rights: Vec::new(),
        }
    }

    fn from_production(production: &Production) -> Self {
        Self {
            left: production.head.to_string(),
            rights: vec![names(production.body.iter().copied())],
        }
    }

    pub fn to_plaintext(&self, left_width: usize, multiline: bool) -> String {
        self.rights
            .iter()
            .map(|right| right.join(" "))
            .enumerate()
            .map(|(i, right)| {
                if i == 0 {
                    format!("{:>width$} -> {}", self.left, right, width = left_width)
                } else if multiline {
                    format!("{:>width$}  | {}", "", right, width = left_width)
                } else {
                    format!(" | {}", right)
                }
            })
            .collect::<Vec<_>>()
            .join(if multiline { "\n" } else { "" })
    }

    pub fn to_latex(&self, and_sign: bool, terminal_set: &HashSet<&str>) -> String {
        if self.rights.is_empty() {
            return String::new();
        }

        let left = if and_sign {
            format!("{} & \\rightarrow & ", escape::tex(self.left.as_str()))
        } else {
            format!("{} \\rightarrow ", escape::tex(self.left.as_str()))
        };
        let right = self
            .rights
            .iter()
            .map(|right| {
                right
                    .iter()
                    .map(|s| tex_symbol(s, terminal_set))
                    .collect::<Vec<_>>()
                    .join(" \\ ")
            })
            .collect::<Vec<_>>()
            .join(" \\mid ");

        left + &right
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutputVec {
    terminals: Vec<String>,
    productions: Vec<ProductionOutput>,
}

impl Output for ProductionOutputVec {
    fn to_plaintext(&self) -> String {
        let index_width = self.productions.len().saturating_sub(1).to_string().len();
        let left_max_len = self
            .productions
            .iter()
            .map(|p| p.left.chars().count())
            .max()
            .unwrap_or(0);
        self.productions
            .iter()
            .enumerate()
            .map(|(i, p)| {
                format!(
                    "{:>iw$}: {}",
                    i,
                    p.to_plaintext(left_max_len, true),
                    iw = index_width
                )
            })
            .collect::<Vec<String>>()
            .join("\n")
    }

    fn to_latex(&self) -> String {
        let terminal_set: HashSet<&str> = self.terminals.iter().map(String::as_str).collect();
        std::iter::once("\\[\\begin{array}{rcll}".to_string())
            .chain(
                self.productions
                    .iter()
                    .enumerate()
                    .map(|(i, p)| format!("{} & {}", i, p.to_latex(true, &terminal_set))),
            )
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<String>>()
            .join("\\\\\n")
    }
}

impl Grammar {
    pub fn to_production_output_vec(&self) -> ProductionOutputVec {
        ProductionOutputVec {
            terminals: names(self.terminal_iter()),
            productions: self
                .productions()
                .iter()
                .map(ProductionOutput::from_production)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct NonTerminalOutput {
    name: String,
    nullable: bool,
    first: Vec<String>,
    follow: Vec<String>,
}

impl NonTerminalOutput {
    fn to_plaintext(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.name,
            self.nullable,
            self.first.join(", "),
            self.follow.join(", ")
        )
    }

    fn to_latex(&self) -> String {
        fn f(a: &[String]) -> String {
            a.iter()
                .map(|s| {
                    if s == EPSILON {
                        r"$\epsilon$".to_string()
                    } else {
                        escape::tex(s.as_str()).to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(r"\ ")
        }

        format!(
            "{} & {} & {} & {}",
            escape::tex(self.name.as_str()),
            self.nullable,
            f(&self.first),
            f(&self.follow)
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NonTerminalOutputVec {
    data: Vec<NonTerminalOutput>,
}

impl Output for NonTerminalOutputVec {
    fn to_plaintext(&self) -> String {
        std::iter::once("Symbol | Nullable | First | Follow".to_string())
            .chain(self.data.iter().map(|s| s.to_plaintext()))
            .collect::<Vec<String>>()
            .join("\n")
    }

    fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|e| e.to_latex())
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        "\\begin{tabular}{c|c|c|c}\n".to_string()
            + "Symbol & Nullable & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

impl Grammar {
    /// FIRST and FOLLOW of every non-terminal, with epsilon listed last in
    /// FIRST when the non-terminal is nullable.
    pub fn to_non_terminal_output_vec(
        &self,
        first: &FirstSets,
        follow: &FollowSets,
    ) -> NonTerminalOutputVec {
        let data = self
            .non_terminal_iter()
            .map(|nt| {
                let mut first_names = names(
                    first
                        .get(nt)
                        .into_iter()
                        .flatten()
                        .copied()
                        .filter(|s| *s != Symbol::Epsilon),
                );
                if first.nullable(nt) {
                    first_names.push(EPSILON.to_string());
                }
                NonTerminalOutput {
                    name: nt.to_string(),
                    nullable: first.nullable(nt),
                    first: first_names,
                    follow: names(follow.get(nt).into_iter().flatten().copied()),
                }
            })
            .collect();
        NonTerminalOutputVec { data }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LL1ParsingTable {
    is_ll1: bool,
    terminals: Vec<String>,
    rows: Vec<(String, Vec<ProductionOutput>)>,
}

impl Output for LL1ParsingTable {
    fn to_plaintext(&self) -> String {
        let mut header: Vec<String> = vec![String::new()];
        header.extend(self.terminals.iter().cloned());
        let mut output: Vec<Vec<String>> = vec![header];
        for (left, row) in &self.rows {
            let mut line: Vec<String> = vec![left.clone()];
            line.extend(
                row.iter()
                    .map(|productions| productions.to_plaintext(left.chars().count(), false)),
            );
            output.push(line);
        }
        align_columns(&output)
    }

    fn to_latex(&self) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len()),
        )];
        header.extend(
            self.terminals
                .iter()
                .map(|t| format!("\\text{{{}}}", escape::tex(t.as_str()))),
        );
        let header = header.join(" & ");

        let terminal_set: HashSet<&str> = self.terminals.iter().map(String::as_str).collect();
        let output = self
            .rows
            .iter()
            .map(|(left, row)| {
                std::iter::once(escape::tex(left.as_str()).to_string())
                    .chain(row.iter().map(|productions| {
                        let cell = productions.to_latex(false, &terminal_set);
                        if productions.rights.len() > 1 {
                            format!("{{\\color{{red}}{}}}", cell)
                        } else {
                            cell
                        }
                    }))
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]"
    }
}

impl LL1Table {
    /// One row per non-terminal, one column per lookahead. Conflict cells
    /// list every production that competed for them.
    pub fn to_output(&self, grammar: &Grammar) -> LL1ParsingTable {
        let terminals: Vec<Symbol> = grammar.terminal_iter().collect();
        let rows = grammar
            .non_terminal_iter()
            .map(|nt| {
                let row = terminals
                    .iter()
                    .map(|&t| {
                        let mut cell = ProductionOutput::new(nt);
                        for &index in self.candidates(nt, t).into_iter().flatten() {
                            if let Some(p) = grammar.production(index) {
                                cell.rights.push(names(p.body.iter().copied()));
                            }
                        }
                        cell
                    })
                    .collect();
                (nt.to_string(), row)
            })
            .collect();

        LL1ParsingTable {
            is_ll1: self.is_ll1(),
            terminals: names(terminals),
            rows,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct LRStateOutput {
    kernel: Vec<String>,
    extend: Vec<String>,
    edges: Vec<(String, usize)>,
}

impl LRStateOutput {
    fn to_plaintext(&self) -> String {
        let kernel = self.kernel.join("\n");

        let extend = if !self.extend.is_empty() {
            format!("\n---\n{}", self.extend.join("\n"))
        } else {
            String::new()
        };

        let edges = if !self.edges.is_empty() {
            format!(
                "\n===\n{}",
                self.edges
                    .iter()
                    .map(|(k, v)| format!("- {} -> {}", k, v))
                    .collect::<Vec<_>>()
                    .join("\n")
            )
        } else {
            String::new()
        };

        format!("{}{}{}", kernel, extend, edges)
    }

    fn node_to_latex(&self, id: usize) -> String {
        let content = self
            .kernel
            .iter()
            .chain(self.extend.iter())
            .map(|e| format!("${}$", escape::tex(e.as_str()).replace(EPSILON, "\\epsilon")))
            .collect::<Vec<_>>()
            .join(" \\\\ \n");
        format!(
            "\\node [block] (I_{}){}\n{{\n$I_{}$\\\\\n{}\n}};",
            id,
            if id > 0 {
                if id % 2 == 0 {
                    format!(" [below of = I_{}] ", id - 2)
                } else {
                    format!(" [right of = I_{}] ", id - 1)
                }
            } else {
                String::new()
            },
            id,
            content
        )
    }

    fn edge_to_latex(&self, id: usize) -> String {
        self.edges
            .iter()
            .map(|(e, v)| {
                format!(
                    "\\path [->] (I_{}) edge {} node [above]{{{}}} (I_{});",
                    id,
                    if id == *v { "[loop left]" } else { "[right]" },
                    escape::tex(e.as_str()),
                    v
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LRFSMOutput {
    states: Vec<LRStateOutput>,
    start: usize,
}

impl Output for LRFSMOutput {
    fn to_plaintext(&self) -> String {
        let states = self
            .states
            .iter()
            .enumerate()
            .map(|(i, s)| format!("I{}\n{}", i, s.to_plaintext()))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!("{}\n\nstart: {}", states, self.start)
    }

    fn to_latex(&self) -> String {
        format!(
            "\\begin{{tikzpicture}}[node distance=5cm,block/.style={{state, rectangle, text width=6em}}]\n{}\n\\end{{tikzpicture}}",
            self.states
                .iter()
                .enumerate()
                .map(|(i, s)| s.node_to_latex(i))
                .chain(self.states.iter().enumerate().map(|(i, s)| s.edge_to_latex(i)))
                .collect::<Vec<_>>()
                .join("\n")
        )
    }
}

impl LRFSM {
    fn head_name(&self, production: usize) -> String {
        if production == 0 {
            format!("{}'", self.productions[0].body[0])
        } else {
            self.productions[production].head.to_string()
        }
    }

    /// `A -> x . y` for an item of this automaton.
    pub fn item_to_string(&self, item: &Item) -> String {
        let production = &self.productions[item.production];
        let mut right: Vec<String> = Vec::new();
        if production.is_epsilon() {
            right.push(".".to_string());
        } else {
            for (i, s) in production.body.iter().enumerate() {
                if i == item.position {
                    right.push(".".to_string());
                }
                right.push(s.to_string());
            }
            if item.position == production.body.len() {
                right.push(".".to_string());
            }
        }
        format!("{} -> {}", self.head_name(item.production), right.join(" "))
    }

    pub fn to_output(&self) -> LRFSMOutput {
        let states = self
            .states
            .iter()
            .map(|state| LRStateOutput {
                kernel: state.kernel().map(|i| self.item_to_string(i)).collect(),
                extend: state.extend().map(|i| self.item_to_string(i)).collect(),
                edges: state
                    .edges
                    .iter()
                    .map(|(e, v)| (e.to_string(), *v))
                    .collect(),
            })
            .collect();
        LRFSMOutput {
            states,
            start: self.start,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum LRParsingTableAction {
    Shift(usize),
    Reduce((String, Vec<String>)),
    Accept,
}

impl LRParsingTableAction {
    pub fn to_plaintext(&self) -> String {
        match self {
            LRParsingTableAction::Reduce(r) => {
                format!("r({} -> {})", r.0, r.1.join(" "))
            }
            LRParsingTableAction::Shift(s) => {
                format!("s{}", s)
            }
            LRParsingTableAction::Accept => "acc".to_string(),
        }
    }

    pub fn to_latex(&self, terminal_set: &HashSet<&str>) -> String {
        match self {
            LRParsingTableAction::Reduce(r) => {
                format!(
                    "reduce ${} \\rightarrow {}$",
                    escape::tex(r.0.as_str()),
                    r.1.iter()
                        .map(|s| tex_symbol(s, terminal_set))
                        .collect::<Vec<_>>()
                        .join(" \\  ")
                )
            }
            LRParsingTableAction::Shift(s) => {
                format!("shift {}", s)
            }
            LRParsingTableAction::Accept => "accept".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LRParsingTableCell {
    actions: Vec<LRParsingTableAction>,
    conflict: Option<ConflictKind>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LRParsingTable {
    is_slr1: bool,
    terminals: Vec<String>,
    non_terminals: Vec<String>,
    action: Vec<Vec<LRParsingTableCell>>,
    goto: Vec<Vec<Option<usize>>>,
}

impl Output for LRParsingTable {
    fn to_plaintext(&self) -> String {
        let mut output: Vec<Vec<String>> = Vec::new();

        output.push(vec![String::new()]);
        for s in self.terminals.iter().chain(self.non_terminals.iter()) {
            output[0].push(s.clone());
        }

        for (i, (r1, r2)) in self.action.iter().zip(self.goto.iter()).enumerate() {
            let row: Vec<String> = std::iter::once(i.to_string())
                .chain(r1.iter().map(|cell| {
                    let actions = cell
                        .actions
                        .iter()
                        .map(|action| action.to_plaintext())
                        .collect::<Vec<_>>()
                        .join("; ");
                    match cell.conflict {
                        Some(kind) => format!("{} ({})", actions, kind),
                        None => actions,
                    }
                }))
                .chain(
                    r2.iter()
                        .map(|goto| goto.map(|g| g.to_string()).unwrap_or_default()),
                )
                .collect::<Vec<_>>();
            output.push(row);
        }

        align_columns(&output)
    }

    fn to_latex(&self) -> String {
        let header: String = format!(
            "\\begin{{tabular}}{{c{}}}\n & \\multicolumn{{{}}}{{c}}{{action}} & \\multicolumn{{{}}}{{|c}}{{goto}}\\\\",
            "|l".repeat(self.terminals.len() + self.non_terminals.len()),
            self.terminals.len(),
            self.non_terminals.len(),
        );

        let mut first_row: Vec<String> = vec![String::new()];
        for s in self.terminals.iter().chain(self.non_terminals.iter()) {
            first_row.push(escape::tex(s.as_str()).to_string());
        }
        let first_row = first_row.join(" & ");

        let terminal_set: HashSet<&str> = self.terminals.iter().map(String::as_str).collect();

        let content = self
            .action
            .iter()
            .zip(self.goto.iter())
            .enumerate()
            .map(|(i, (r1, r2))| {
                std::iter::once(i.to_string())
                    .chain(r1.iter().map(|cell| {
                        let r = cell
                            .actions
                            .iter()
                            .map(|action| action.to_latex(&terminal_set))
                            .collect::<Vec<_>>()
                            .join("; ");
                        if cell.conflict.is_some() {
                            format!("{{\\color{{red}}{}}}", r)
                        } else {
                            r
                        }
                    }))
                    .chain(
                        r2.iter()
                            .map(|goto| goto.map(|g| g.to_string()).unwrap_or_default()),
                    )
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join(" \\\\\n");

        format!(
            "{}\n{} \\\\\\hline\n{}\n\\end{{tabular}}",
            header, first_row, content
        )
    }
}

impl SLR1Table {
    pub fn to_output(&self, grammar: &Grammar) -> LRParsingTable {
        let terminals: Vec<Symbol> = grammar.terminal_iter().collect();
        let non_terminals: Vec<Symbol> = grammar.non_terminal_iter().collect();

        let to_action = |action: &Action| match *action {
            Action::Shift(s) => Some(LRParsingTableAction::Shift(s)),
            Action::Reduce(index) => grammar.production(index).map(|p| {
                LRParsingTableAction::Reduce((p.head.to_string(), names(p.body.iter().copied())))
            }),
            Action::Accept => Some(LRParsingTableAction::Accept),
            Action::Error(_) => None,
        };

        let action = (0..self.state_count())
            .map(|state| {
                terminals
                    .iter()
                    .map(|&t| LRParsingTableCell {
                        actions: self
                            .candidates(state, t)
                            .iter()
                            .filter_map(to_action)
                            .collect(),
                        conflict: match self.action(state, t) {
                            Some(Action::Error(kind)) => Some(kind),
                            _ => None,
                        },
                    })
                    .collect()
            })
            .collect();

        let goto = (0..self.state_count())
            .map(|state| {
                non_terminals
                    .iter()
                    .map(|&nt| self.goto(state, nt))
                    .collect()
            })
            .collect();

        LRParsingTable {
            is_slr1: self.is_slr1(),
            terminals: names(terminals),
            non_terminals: names(non_terminals),
            action,
            goto,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceOutput {
    parser: String,
    steps: Vec<TraceStep>,
    accepted: bool,
    reason: Option<String>,
}

impl Output for TraceOutput {
    fn to_plaintext(&self) -> String {
        let mut output: Vec<Vec<String>> =
            vec![vec!["Stack".to_string(), "Input".to_string(), "Action".to_string()]];
        output.extend(
            self.steps
                .iter()
                .map(|s| vec![s.stack.clone(), s.input.clone(), s.action.clone()]),
        );
        let verdict = match &self.reason {
            None => "yes".to_string(),
            Some(reason) => format!("no ({})", reason),
        };
        format!("{}\n{}", align_columns(&output), verdict)
    }

    fn to_latex(&self) -> String {
        let tex = |s: &str| escape::tex(s).replace(EPSILON, "$\\epsilon$");
        let rows = self
            .steps
            .iter()
            .map(|s| format!("{} & {} & {}", tex(&s.stack), tex(&s.input), tex(&s.action)))
            .collect::<Vec<_>>()
            .join("\\\\\n");
        format!(
            "\\begin{{tabular}}{{l|r|l}}\nStack & Input & Action\\\\\\hline\n{}\\\\\n\\end{{tabular}}",
            rows
        )
    }
}

impl ParseTrace {
    pub fn to_output(&self, parser: &str) -> TraceOutput {
        TraceOutput {
            parser: parser.to_string(),
            steps: self.steps.clone(),
            accepted: self.accepted(),
            reason: self.verdict.as_ref().err().map(|e| e.to_string()),
        }
    }
}

/// Everything the analysis produced, for JSON consumers.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutput {
    productions: ProductionOutputVec,
    non_terminals: NonTerminalOutputVec,
    is_ll1: bool,
    is_slr1: bool,
    ll1_table: LL1ParsingTable,
    lr0_fsm: LRFSMOutput,
    slr1_table: LRParsingTable,
}

impl Output for AnalysisOutput {
    fn to_plaintext(&self) -> String {
        let yes_no = |b: bool| if b { "Yes" } else { "No" };
        [
            self.productions.to_plaintext(),
            self.non_terminals.to_plaintext(),
            format!("Grammar is LL(1): {}", yes_no(self.is_ll1)),
            self.ll1_table.to_plaintext(),
            self.lr0_fsm.to_plaintext(),
            format!("Grammar is SLR(1): {}", yes_no(self.is_slr1)),
            self.slr1_table.to_plaintext(),
        ]
        .join("\n\n")
    }

    fn to_latex(&self) -> String {
        [
            self.productions.to_latex(),
            self.non_terminals.to_latex(),
            self.ll1_table.to_latex(),
            self.lr0_fsm.to_latex(),
            self.slr1_table.to_latex(),
        ]
        .join("\n\n")
    }
}

impl Analysis {
    pub fn to_output(&self) -> AnalysisOutput {
        AnalysisOutput {
            productions: self.grammar.to_production_output_vec(),
            non_terminals: self
                .grammar
                .to_non_terminal_output_vec(&self.first, &self.follow),
            is_ll1: self.is_ll1(),
            is_slr1: self.is_slr1(),
            ll1_table: self.ll1.to_output(&self.grammar),
            lr0_fsm: self.fsm.to_output(),
            slr1_table: self.slr1.to_output(&self.grammar),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{symbol::symbols_of, Recognizer};

    fn analyze(grammar: &str) -> Analysis {
        Analysis::new(Grammar::parse(grammar).unwrap())
    }

    #[test]
    fn productions_are_indexed() {
        let a = analyze("S -> a S b | e");
        assert_eq!(
            a.grammar.to_production_output_vec().to_plaintext(),
            "0: S -> a S b\n1: S -> ϵ"
        );
    }

    #[test]
    fn first_follow_plaintext() {
        let a = analyze("S -> a S b | e");
        let out = a
            .grammar
            .to_non_terminal_output_vec(&a.first, &a.follow)
            .to_plaintext();
        assert_eq!(out, "Symbol | Nullable | First | Follow\nS | true | a, ϵ | b, $");
    }

    #[test]
    fn ll1_conflicts_list_every_production() {
        let a = analyze("S -> a S | a");
        let out = a.ll1.to_output(&a.grammar).to_plaintext();
        assert!(out.contains("S -> a S | a"), "{}", out);
        assert!(a.ll1.to_output(&a.grammar).to_latex().contains("\\color{red}"));
    }

    #[test]
    fn fsm_plaintext_marks_augmented_start() {
        let a = analyze("S -> a S b | e");
        let out = a.fsm.to_output().to_plaintext();
        assert!(out.starts_with("I0\nS' -> . S\n---\n"), "{}", out);
        assert!(out.contains("S -> ."), "{}", out);
        assert!(out.ends_with("start: 0"));
    }

    #[test]
    fn slr1_conflicts_are_tagged() {
        let a = analyze("S -> A | B\nA -> a\nB -> a");
        let out = a.slr1.to_output(&a.grammar).to_plaintext();
        assert!(out.contains("r(A -> a); r(B -> a) (R/R conflict)"), "{}", out);
    }

    #[test]
    fn json_outputs_parse_back() {
        let a = analyze("S -> a S b | e");
        let value: serde_json::Value = serde_json::from_str(&a.to_output().to_json()).unwrap();
        assert_eq!(value["is_ll1"], true);
        assert_eq!(value["is_slr1"], true);
        assert_eq!(value["non_terminals"]["data"][0]["name"], "S");
    }

    #[test]
    fn trace_plaintext_ends_with_verdict() {
        let a = analyze("S -> a S b | e");
        let out = a
            .slr1_parser()
            .trace(&symbols_of("a"))
            .to_output("SLR(1)")
            .to_plaintext();
        assert!(out.lines().last().unwrap().starts_with("no ("), "{}", out);
    }

    #[test]
    fn analysis_renders_in_every_format() {
        let a = analyze("S -> a S b | e");
        let out = a.to_output();

        let plain = out.render(OutputFormat::Plain);
        assert!(plain.starts_with("0: S -> a S b"), "{}", plain);
        assert!(plain.contains("Grammar is LL(1): Yes"), "{}", plain);
        assert!(plain.contains("Grammar is SLR(1): Yes"), "{}", plain);

        let latex = out.render(OutputFormat::LaTeX);
        assert!(latex.contains("\\begin{tikzpicture}"), "{}", latex);

        let json: serde_json::Value =
            serde_json::from_str(&out.render(OutputFormat::JSON)).unwrap();
        assert_eq!(json["slr1_table"]["is_slr1"], true);
    }
}
