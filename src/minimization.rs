use crate::{
    automaton::Dfa,
    math::{Partition, StateIndex},
};

mod partition_refinement;
use partition_refinement::Refinement;

/// Decides how the states of a minimized automaton are labelled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StateNaming {
    /// Every state keeps the label of the states it was merged from, like `{q0,q2}`. A state
    /// that was not merged with anything keeps its original label.
    #[default]
    Retain,
    /// States are renamed to `q0, q1, ...` in breadth-first order, see [`Dfa::renaming`].
    Sequential,
}

impl Dfa {
    /// Computes the minimal automaton that accepts the same words as `self`.
    ///
    /// First, all states that can not be reached from the initial state are removed. Then the
    /// remaining states are split into final and non-final ones and these classes are refined
    /// until no two states of a class disagree on the class they move to. Every class becomes
    /// one state of the result, labelled with [`crate::State::merge`] of its members.
    ///
    /// A partial automaton stays partial: states that can never reach a final state are
    /// dropped together with the transitions into them, unless such a dead state was already
    /// present, in which case it collects every missing transition.
    ///
    /// The labels of the result only depend on the labels of `self`, so minimizing twice gives
    /// the same automaton as minimizing once.
    ///
    /// # Example
    /// ```
    /// use finite_automata::prelude::*;
    ///
    /// let dfa = Dfa::builder()
    ///     .with_transitions([("p", 'a', "q"), ("q", 'a', "r"), ("r", 'a', "q")])
    ///     .with_final_states(["q", "r"])
    ///     .into_dfa("p")
    ///     .unwrap();
    /// let minimized = dfa.minimize();
    /// assert_eq!(minimized.size(), 2);
    /// assert_eq!(minimized.successor(&"p".into(), 'a').unwrap().show(), "{q,r}");
    /// ```
    pub fn minimize(&self) -> Dfa {
        self.minimize_with(StateNaming::Retain)
    }

    /// Computes the minimal automaton, see [`Dfa::minimize`], and labels its states according
    /// to `naming`.
    pub fn minimize_with(&self, naming: StateNaming) -> Dfa {
        let trimmed = self.remove_unreachable();
        let minimized = Refinement::compute(&trimmed).quotient(&trimmed);
        match naming {
            StateNaming::Retain => minimized,
            StateNaming::Sequential => minimized.renamed(),
        }
    }

    /// Groups the states of `self` into classes of states that accept the same words. The
    /// classes hold state indices and are ordered by their least index.
    pub fn equivalence_classes(&self) -> Partition<StateIndex> {
        Refinement::compute(self).partition()
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn partial_stays_partial() {
        let dfa = Dfa::builder()
            .with_alphabet_symbols(['a', 'b'])
            .with_transitions([("q0", 'a', "q1"), ("q1", 'a', "q2"), ("q2", 'a', "q1")])
            .with_final_states(["q1", "q2"])
            .into_dfa("q0")
            .unwrap();
        let min = dfa.minimize();
        assert_eq!(min.size(), 2);
        assert!(!min.is_total());
        let block = State::merge(["q1", "q2"].map(State::from));
        assert_eq!(min.successor(&"q0".into(), 'a'), Some(&block));
        assert_eq!(min.successor(&block, 'a'), Some(&block));
        assert_eq!(min.successor(&block, 'b'), None);
    }

    #[test_log::test]
    fn existing_dead_state_collects_missing_transitions() {
        let dfa = Dfa::builder()
            .with_transitions([
                ("q0", 'a', "q1"),
                ("q0", 'b', "dead"),
                ("dead", 'a', "dead"),
                ("dead", 'b', "dead"),
                ("q1", 'a', "q1"),
                ("q2", 'a', "q1"),
            ])
            .with_final_states(["q1"])
            .into_dfa("q0")
            .unwrap();
        let min = dfa.minimize();
        assert_eq!(min.size(), 3);
        assert!(min.is_total());
        assert_eq!(min.successor(&"q1".into(), 'b'), Some(&State::from("dead")));
        assert_eq!(min.index_of(&"q2".into()), None);
    }

    #[test]
    fn sequential_names() {
        let dfa = Dfa::builder()
            .with_transitions([
                ("q0", '0', "q0"),
                ("q0", '1', "q1"),
                ("q1", '0', "q0"),
                ("q1", '1', "q2"),
                ("q2", '0', "q2"),
                ("q2", '1', "q1"),
            ])
            .with_final_states(["q1"])
            .into_dfa("q0")
            .unwrap();
        let min = dfa.minimize_with(StateNaming::Sequential);
        assert_eq!(
            min.states().map(|q| q.show()).collect::<Vec<_>>(),
            vec!["q0", "q1"]
        );
        assert!(min.is_final(&"q1".into()));
        assert_eq!(min.successor(&"q1".into(), '1'), Some(&State::from("q0")));
        for word in ["", "1", "11", "101", "0110"] {
            assert_eq!(dfa.accepts(word), min.accepts(word), "{word}");
        }
    }

    #[test]
    fn classes_of_equivalent_states() {
        let dfa = crate::tests::ends_in_double_dfa();
        assert_eq!(dfa.equivalence_classes().size(), dfa.size());
        assert_eq!(dfa.minimize(), dfa);
    }

    #[cfg(feature = "random")]
    #[test]
    fn minimization_is_idempotent_and_preserves_language() {
        use crate::random;

        for seed in 0..60 {
            let mut rng = fastrand::Rng::with_seed(seed);
            let dfa = random::random_dfa(&mut rng, 7, 2, 0.85);
            let min = dfa.minimize();
            assert_eq!(min.minimize(), min, "seed {seed}");
            assert_eq!(min.equivalence_classes().size(), min.size(), "seed {seed}");
            assert_eq!(min.reachable_states().count(), min.size(), "seed {seed}");
            assert!(min.size() <= dfa.size());
            for word in random::random_words(&mut rng, dfa.alphabet(), 30, 9) {
                assert_eq!(dfa.accepts(&word), min.accepts(&word), "seed {seed}");
            }
        }
    }
}
