use log::{debug, info};

use super::{
    lr_dfa::LRFSM, FirstSets, FollowSets, Grammar, LL1Parser, LL1Table, Recognizer, SLR1Parser,
    SLR1Table,
};

/// Everything derived from one grammar, built once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub grammar: Grammar,
    pub first: FirstSets,
    pub follow: FollowSets,
    pub ll1: LL1Table,
    pub fsm: LRFSM,
    pub slr1: SLR1Table,
}

impl Analysis {
    pub fn new(grammar: Grammar) -> Self {
        debug!(
            "analyzing grammar: {} terminals, {} non-terminals, {} productions",
            grammar.terminals().len(),
            grammar.non_terminals().len(),
            grammar.productions().len()
        );
        let first = grammar.calculate_first();
        let follow = grammar.calculate_follow(&first);
        let ll1 = grammar.generate_ll1_table(&first, &follow);
        let fsm = grammar.to_lr0_fsm();
        let slr1 = fsm.to_slr1_table(&follow);
        info!(
            "grammar is LL(1): {}, SLR(1): {}",
            ll1.is_ll1(),
            slr1.is_slr1()
        );

        Self {
            grammar,
            first,
            follow,
            ll1,
            fsm,
            slr1,
        }
    }

    pub fn is_ll1(&self) -> bool {
        self.ll1.is_ll1()
    }

    pub fn is_slr1(&self) -> bool {
        self.slr1.is_slr1()
    }

    pub fn ll1_parser(&self) -> LL1Parser<'_> {
        LL1Parser::new(&self.grammar, &self.ll1)
    }

    pub fn slr1_parser(&self) -> SLR1Parser<'_> {
        SLR1Parser::new(&self.grammar, &self.slr1)
    }

    /// The LL(1) parser when the grammar is LL(1), otherwise the SLR(1)
    /// parser when it is SLR(1), otherwise nothing.
    pub fn preferred_parser(&self) -> Option<Box<dyn Recognizer + '_>> {
        if self.is_ll1() {
            Some(Box::new(self.ll1_parser()))
        } else if self.is_slr1() {
            Some(Box::new(self.slr1_parser()))
        } else {
            None
        }
    }
}
