use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::{
    alphabet::Expression,
    automaton::Nfa,
    definition::NfaDefinition,
    math::{IndexSet, StateIndex},
    state::{State, StateSet},
    Show,
};

impl Nfa {
    /// Extends `set` by everything that is reachable from it through empty-symbol
    /// transitions. Every state enters the worklist at most once, so cycles of empty
    /// transitions are fine.
    pub(crate) fn close(&self, set: &mut IndexSet) {
        let column = self.epsilon_column();
        let mut worklist: Vec<StateIndex> = set.iter().collect();
        while let Some(q) = worklist.pop() {
            for p in self.successor_indices(q, column) {
                if set.insert(p) {
                    worklist.push(p);
                }
            }
        }
    }

    /// The empty-symbol closure of the state with index `q`.
    pub(crate) fn closure_of_index(&self, q: StateIndex) -> IndexSet {
        let mut set = IndexSet::with_capacity(self.size());
        set.insert(q);
        self.close(&mut set);
        set
    }

    /// Reads the symbol at the given position from every state of `current` and closes the
    /// union of all successors under empty-symbol transitions.
    pub(crate) fn advance(&self, current: &IndexSet, position: usize) -> IndexSet {
        let mut next = IndexSet::with_capacity(self.size());
        for q in current {
            next.union_with(self.successor_indices(q, position));
        }
        self.close(&mut next);
        next
    }

    /// Computes the set of states that can be reached from `state` by following zero or more
    /// empty-symbol transitions. The set always contains `state` itself. Returns `None` if
    /// `state` does not belong to `self`.
    ///
    /// # Example
    /// ```
    /// use finite_automata::prelude::*;
    ///
    /// let nfa = Nfa::builder()
    ///     .with_transitions([
    ///         ("q0", Expression::Epsilon, "q1"),
    ///         ("q1", Expression::Epsilon, "q0"),
    ///         ("q1", Expression::from('a'), "q2"),
    ///     ])
    ///     .into_nfa("q0")
    ///     .unwrap();
    /// let closure = nfa.epsilon_closure(&State::from("q0")).unwrap();
    /// assert_eq!(closure.show(), "{q0,q1}");
    /// ```
    pub fn epsilon_closure(&self, state: &State) -> Option<StateSet> {
        let q = self.index_of(state)?;
        let closure = self.closure_of_index(q);
        trace!(
            "closure of {} is {}",
            state.show(),
            self.labels(&closure).show()
        );
        Some(self.labels(&closure))
    }

    /// Builds an equivalent automaton without empty-symbol transitions.
    ///
    /// For a state `s` and a symbol `a`, the new successors are all states reachable by an
    /// `a`-transition from the closure of `s`, closed again under empty-symbol transitions.
    /// A state is final if its closure contains a final state. States, alphabet and initial
    /// state stay the same. An automaton without empty-symbol transitions is returned as it
    /// is, so applying this twice gives the same result as applying it once.
    pub fn eliminate_lambda(&self) -> Nfa {
        if !self.has_epsilon_transitions() {
            return self.clone();
        }

        let closures: Vec<IndexSet> = (0..self.size())
            .map(|q| self.closure_of_index(q))
            .collect();

        let mut definition = NfaDefinition::new(self.initial_state().clone());
        definition.states = self.states().cloned().collect();
        definition.input_symbols = self.alphabet().universe().collect();

        for (source, closure) in self.states().zip(&closures) {
            if !closure.is_disjoint(self.accepting()) {
                definition.final_states.insert(source.clone());
            }

            let mut row = BTreeMap::new();
            for (position, sym) in self.alphabet().universe().enumerate() {
                let successors = self.advance(closure, position);
                if !successors.is_empty() {
                    row.insert(Expression::Symbol(sym), self.labels(&successors));
                }
            }
            if !row.is_empty() {
                definition.transitions.insert(source.clone(), row);
            }
        }

        let eliminated = Nfa::derived(definition, "lambda elimination");
        debug!(
            "eliminated empty transitions, {} edges remain",
            eliminated.transitions().count()
        );
        eliminated
    }
}
