extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

pub mod grammar;
pub use grammar::pretty_print::{Output, OutputFormat};
pub use grammar::{Analysis, Grammar, Recognizer, Symbol};

fn error_json(e: impl std::fmt::Display) -> String {
    serde_json::json!({ "error": e.to_string() }).to_string()
}

#[wasm_bindgen]
pub fn first_follow_to_json(grammar: &str) -> String {
    match crate::Grammar::parse(grammar) {
        Ok(g) => {
            let first = g.calculate_first();
            let follow = g.calculate_follow(&first);
            g.to_non_terminal_output_vec(&first, &follow).to_json()
        }
        Err(e) => error_json(e),
    }
}

#[wasm_bindgen]
pub fn analysis_to_json(grammar: &str) -> String {
    match crate::Grammar::parse(grammar) {
        Ok(g) => Analysis::new(g).to_output().to_json(),
        Err(e) => error_json(e),
    }
}


#[cfg(test)]
mod end_to_end_tests {
    use crate::{Analysis, Grammar, Recognizer, Symbol};

    fn analyze(grammar: &str) -> Analysis {
        Analysis::new(Grammar::parse(grammar).unwrap())
    }

    fn both_accept(a: &Analysis, input: &str) -> (bool, bool) {
        (
            a.ll1_parser().accepts_str(input),
            a.slr1_parser().accepts_str(input),
        )
    }

    #[test]
    fn balanced_grammar_is_ll1_and_slr1() {
        let a = analyze("S -> a S b | e");
        assert!(a.is_ll1());
        assert!(a.is_slr1());

        for input in ["ab", "aabb"] {
            assert_eq!(both_accept(&a, input), (true, true), "{}", input);
        }
        for input in ["a", "ba"] {
            assert_eq!(both_accept(&a, input), (false, false), "{}", input);
        }
    }

    #[test]
    fn left_recursion_is_slr1_only() {
        let a = analyze("S -> S a | a");
        assert!(!a.is_ll1());
        assert!(a.is_slr1());
        assert!(a.slr1_parser().accepts_str("aaa"));
    }

    #[test]
    fn common_prefix_is_not_ll1() {
        let a = analyze("S -> a S | a");
        let s = Symbol::NonTerminal('S');
        assert_eq!(
            a.first.get(s).cloned(),
            Some([Symbol::Terminal('a')].into_iter().collect())
        );
        assert!(!a.is_ll1());
        assert!(a.is_slr1());
        assert!(a.slr1_parser().accepts_str("aaa"));
        assert!(!a.ll1_parser().accepts_str("aaa"));
    }

    #[test]
    fn empty_input_accepted_through_epsilon() {
        let a = analyze("S -> a | e");
        let s = Symbol::NonTerminal('S');
        assert_eq!(
            a.first.get(s).cloned(),
            Some([Symbol::Terminal('a'), Symbol::Epsilon].into_iter().collect())
        );
        assert_eq!(both_accept(&a, ""), (true, true));
    }

    #[test]
    fn foreign_symbols_reject_cleanly() {
        let grammars = [
            "S -> a S b | e",
            "E -> E + T | T\nT -> T * F | F\nF -> ( E ) | i",
            "E -> T X\nX -> + T X | e\nT -> F Y\nY -> * F Y | e\nF -> ( E ) | i",
        ];
        for grammar in grammars {
            let a = analyze(grammar);
            for input in ["z", "a?b", "i+Q", "9"] {
                let symbols = crate::grammar::symbol::symbols_of(input);
                for result in [
                    a.ll1_parser().recognize(&symbols),
                    a.slr1_parser().recognize(&symbols),
                ] {
                    assert!(
                        !matches!(result, Err(crate::grammar::RejectReason::MalformedStack(_))),
                        "{} on {}: {:?}",
                        grammar,
                        input,
                        result
                    );
                    assert!(result.is_err());
                }
            }
        }
    }

    #[test]
    fn ll1_and_slr1_agree_on_ll1_grammars() {
        let a = analyze("E -> T X\nX -> + T X | e\nT -> F Y\nY -> * F Y | e\nF -> ( E ) | i");
        assert!(a.is_ll1() && a.is_slr1());
        for input in ["i", "i+i", "(i*i)+i", "i+", ")(", "", "((i)"] {
            let (ll1, slr1) = both_accept(&a, input);
            assert_eq!(ll1, slr1, "{}", input);
        }
    }

    #[test]
    fn counted_file_layout_end_to_end() {
        let a = analyze("2\nS -> aAb c\nA -> d e");
        assert!(a.is_ll1());
        assert_eq!(both_accept(&a, "adb"), (true, true));
        assert_eq!(both_accept(&a, "ab"), (true, true));
        assert_eq!(both_accept(&a, "c"), (true, true));
        assert_eq!(both_accept(&a, "adbc"), (false, false));
    }
}
