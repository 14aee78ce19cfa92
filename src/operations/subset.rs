use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::{
    alphabet::Expression,
    automaton::{Dfa, Nfa},
    definition::DfaDefinition,
    math::{IndexSet, Set},
    state::State,
    Show,
};

impl Nfa {
    fn subset_label(&self, subset: &IndexSet) -> State {
        State::subset(self.labels(subset))
    }

    /// Builds an equivalent deterministic automaton through the subset construction. Only
    /// subsets that are reachable from the closure of the initial state are created, and the
    /// empty subset is never created. The result is therefore partial whenever some reachable
    /// subset has no successor on a symbol.
    ///
    /// Every state of the result is a [`State::Merged`] of the states it stands for, so its
    /// label reads like `{q0,q1}`.
    ///
    /// # Example
    /// ```
    /// use finite_automata::prelude::*;
    ///
    /// let nfa = Nfa::builder()
    ///     .with_transitions([
    ///         ("q0", Expression::from('a'), "q0"),
    ///         ("q0", Expression::from('a'), "q1"),
    ///         ("q1", Expression::from('b'), "q2"),
    ///     ])
    ///     .with_final_states(["q2"])
    ///     .into_nfa("q0")
    ///     .unwrap();
    /// let dfa = nfa.determinize();
    /// assert_eq!(dfa.size(), 3);
    /// assert_eq!(dfa.initial_state().show(), "{q0}");
    /// assert!(dfa.accepts("aab").unwrap());
    /// ```
    pub fn determinize(&self) -> Dfa {
        let start = self.closure_of_index(self.initial_index());
        let mut definition = DfaDefinition::new(self.subset_label(&start));
        definition.input_symbols = self.alphabet().universe().collect();

        let mut seen: Set<IndexSet> = Set::default();
        seen.insert(start.clone());
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            let source = self.subset_label(&current);
            definition.states.insert(source.clone());
            if !current.is_disjoint(self.accepting()) {
                definition.final_states.insert(source.clone());
            }

            for (position, sym) in self.alphabet().universe().enumerate() {
                let next = self.advance(&current, position);
                if next.is_empty() {
                    continue;
                }
                let target = self.subset_label(&next);
                trace!("{} --{sym}--> {}", source.show(), target.show());
                definition
                    .transitions
                    .entry(source.clone())
                    .or_default()
                    .insert(Expression::Symbol(sym), target);
                if seen.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }

        debug!(
            "subset construction yields {} states from {}",
            definition.states.len(),
            self.size()
        );
        Dfa::derived(definition, "subset construction")
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn subsets_follow_closures() {
        let nfa = crate::tests::no_double_b_nfa();
        let dfa = nfa.determinize();

        let q0 = State::subset([State::from("q0")]);
        let q12 = State::subset([State::from("q1"), State::from("q2")]);
        assert_eq!(dfa.initial_state(), &q0);
        assert_eq!(dfa.size(), 2);
        assert_eq!(dfa.successor(&q0, 'a'), Some(&q12));
        assert_eq!(dfa.successor(&q0, 'b'), None);
        assert_eq!(dfa.successor(&q12, 'a'), Some(&q12));
        assert_eq!(dfa.successor(&q12, 'b'), Some(&q0));
        assert!(dfa.is_final(&q12));
        assert!(!dfa.is_total());

        for word in ["", "a", "ab", "aba", "abba", "aaba"] {
            assert_eq!(nfa.accepts(word), dfa.accepts(word), "{word}");
        }
    }

    #[test]
    fn round_trip_through_nfa() {
        let dfa = crate::tests::ends_in_double_dfa();
        let back = dfa.to_nfa().determinize();
        assert_eq!(back.size(), dfa.size());
        assert_eq!(back.minimize().size(), dfa.minimize().size());
    }

    #[cfg(feature = "random")]
    #[test]
    fn determinization_preserves_language() {
        use crate::random;

        for seed in 0..40 {
            let mut rng = fastrand::Rng::with_seed(seed);
            let nfa = random::random_nfa(&mut rng, 5, 2, 0.3, 0.1);
            let dfa = nfa.determinize();
            for word in random::random_words(&mut rng, nfa.alphabet(), 30, 8) {
                assert_eq!(nfa.accepts(&word), dfa.accepts(&word), "seed {seed}");
            }
        }
    }
}
