use std::collections::VecDeque;

use tracing::debug;

use crate::{
    alphabet::Expression,
    automaton::{Dfa, Nfa},
    definition::{DfaDefinition, NfaDefinition},
    math::{IndexSet, StateIndex},
    state::State,
};

/// Breadth-first search from `start`, where `successors` lists the direct successors of an
/// index. Gives the reachable indices in the order in which they were discovered.
pub(crate) fn breadth_first<F, I>(start: StateIndex, size: usize, mut successors: F) -> Vec<StateIndex>
where
    F: FnMut(StateIndex) -> I,
    I: IntoIterator<Item = StateIndex>,
{
    let mut seen = IndexSet::with_capacity(size);
    seen.insert(start);
    let mut order = vec![start];
    let mut queue = VecDeque::from([start]);
    while let Some(q) = queue.pop_front() {
        for p in successors(q) {
            if seen.insert(p) {
                order.push(p);
                queue.push_back(p);
            }
        }
    }
    order
}

impl Dfa {
    /// Indices of all states reachable from the initial state, in breadth-first order.
    /// Successors are explored in the order of their symbols.
    pub(crate) fn reachable_indices(&self) -> Vec<StateIndex> {
        let width = self.alphabet().size();
        breadth_first(self.initial_index(), self.size(), |q| {
            (0..width).filter_map(move |position| self.successor_index(q, position))
        })
    }

    /// Iterates over the states that are reachable from the initial state, in breadth-first
    /// order.
    pub fn reachable_states(&self) -> impl Iterator<Item = &State> + '_ {
        self.reachable_indices()
            .into_iter()
            .map(|q| self.label(q))
    }

    /// Returns an automaton in which every state is reachable from the initial state. All
    /// other states are dropped together with their transitions.
    pub fn remove_unreachable(&self) -> Dfa {
        let reachable: IndexSet = self.reachable_indices().into_iter().collect();
        if reachable.len() == self.size() {
            return self.clone();
        }

        let mut definition = DfaDefinition::new(self.initial_state().clone());
        definition.input_symbols = self.alphabet().universe().collect();
        definition.states = reachable.iter().map(|q| self.label(q).clone()).collect();
        definition.final_states = reachable
            .iter()
            .filter(|q| self.is_accepting_index(*q))
            .map(|q| self.label(q).clone())
            .collect();
        for (q, sym, p) in self.transitions() {
            if definition.states.contains(q) {
                definition
                    .transitions
                    .entry(q.clone())
                    .or_default()
                    .insert(Expression::Symbol(sym), p.clone());
            }
        }

        debug!(
            "removed {} unreachable states",
            self.size() - definition.states.len()
        );
        Dfa::derived(definition, "removal of unreachable states")
    }
}

impl Nfa {
    /// Indices of all states reachable from the initial state, in breadth-first order. Both
    /// symbol and empty-symbol transitions are followed.
    pub(crate) fn reachable_indices(&self) -> Vec<StateIndex> {
        let width = self.alphabet().size() + 1;
        breadth_first(self.initial_index(), self.size(), |q| {
            (0..width).flat_map(move |column| self.successor_indices(q, column).iter())
        })
    }

    /// Iterates over the states that are reachable from the initial state, in breadth-first
    /// order.
    pub fn reachable_states(&self) -> impl Iterator<Item = &State> + '_ {
        self.reachable_indices()
            .into_iter()
            .filter_map(|q| self.state(q))
    }

    /// Returns an automaton in which every state is reachable from the initial state.
    pub fn remove_unreachable(&self) -> Nfa {
        let reachable: IndexSet = self.reachable_indices().into_iter().collect();
        if reachable.len() == self.size() {
            return self.clone();
        }

        let mut definition = NfaDefinition::new(self.initial_state().clone());
        definition.input_symbols = self.alphabet().universe().collect();
        definition.states = self.labels(&reachable);
        definition.final_states = self
            .final_states()
            .filter(|q| definition.states.contains(*q))
            .cloned()
            .collect();
        for (q, expression, p) in self.transitions() {
            if definition.states.contains(q) {
                definition
                    .transitions
                    .entry(q.clone())
                    .or_default()
                    .entry(expression)
                    .or_default()
                    .insert(p.clone());
            }
        }

        debug!(
            "removed {} unreachable states",
            self.size() - definition.states.len()
        );
        Nfa::derived(definition, "removal of unreachable states")
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn trims_deterministic() {
        let dfa = Dfa::builder()
            .with_transitions([
                ("q0", 'a', "q1"),
                ("q1", 'a', "q0"),
                ("q2", 'a', "q1"),
                ("q3", 'b', "q3"),
            ])
            .with_final_states(["q1", "q3"])
            .into_dfa("q0")
            .unwrap();
        assert_eq!(
            dfa.reachable_states().map(|q| q.show()).collect::<Vec<_>>(),
            vec!["q0", "q1"]
        );

        let trimmed = dfa.remove_unreachable();
        assert_eq!(trimmed.size(), 2);
        assert_eq!(trimmed.alphabet(), dfa.alphabet());
        assert_eq!(
            trimmed.final_states().cloned().collect::<Vec<_>>(),
            vec![State::from("q1")]
        );
        for word in ["", "a", "aa", "ab", "aaa"] {
            assert_eq!(dfa.accepts(word), trimmed.accepts(word), "{word}");
        }
        assert_eq!(trimmed.remove_unreachable(), trimmed);
    }

    #[test]
    fn trims_nondeterministic_along_epsilon() {
        let nfa = Nfa::builder()
            .with_transitions([
                ("q0", Expression::Epsilon, "q2"),
                ("q2", Expression::from('a'), "q3"),
                ("q1", Expression::from('a'), "q0"),
            ])
            .with_final_states(["q3"])
            .into_nfa("q0")
            .unwrap();
        let trimmed = nfa.remove_unreachable();
        assert_eq!(
            trimmed.states().map(|q| q.show()).collect::<Vec<_>>(),
            vec!["q0", "q2", "q3"]
        );
        assert_eq!(trimmed.accepts("a"), Ok(true));
        assert!(trimmed.has_epsilon_transitions());
    }

    #[cfg(feature = "random")]
    #[test]
    fn trimming_preserves_language() {
        use crate::random;

        for seed in 0..30 {
            let mut rng = fastrand::Rng::with_seed(seed);
            let dfa = random::random_dfa(&mut rng, 6, 2, 0.8);
            let trimmed = dfa.remove_unreachable();
            assert_eq!(trimmed.size(), trimmed.reachable_states().count());
            for word in random::random_words(&mut rng, dfa.alphabet(), 25, 7) {
                assert_eq!(dfa.accepts(&word), trimmed.accepts(&word), "seed {seed}");
            }
        }
    }
}
