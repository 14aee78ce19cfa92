use tracing::debug;

use crate::{
    alphabet::{Expression, Symbol},
    automaton::{Automaton, Dfa, Nfa},
    builder::Builder,
    error::ValidationError,
    state::State,
};

/// Read access to an automaton that was built by some other library. The data is read once
/// by [`Automaton::import`] and never referenced afterwards.
pub trait ForeignAutomaton {
    /// All declared states.
    fn states(&self) -> Vec<State>;
    /// All declared input symbols.
    fn input_symbols(&self) -> Vec<Symbol>;
    /// All edges as `(source, expression, target)`. A non-deterministic automaton lists one
    /// triple for every target.
    fn transitions(&self) -> Vec<(State, Expression, State)>;
    /// The initial state.
    fn initial_state(&self) -> State;
    /// The accepting states.
    fn final_states(&self) -> Vec<State>;
    /// Whether the automaton is to be imported as a [`Dfa`].
    fn is_deterministic(&self) -> bool;
}

impl Automaton {
    /// Builds a fresh automaton from the data of `foreign` and runs the validator on it.
    /// Nothing about `foreign` is trusted: undeclared states or symbols, and two different
    /// targets for the same state and symbol of a deterministic automaton are all reported.
    ///
    /// # Example
    /// ```
    /// use finite_automata::prelude::*;
    ///
    /// struct Toggle;
    ///
    /// impl ForeignAutomaton for Toggle {
    ///     fn states(&self) -> Vec<State> {
    ///         vec!["even".into(), "odd".into()]
    ///     }
    ///     fn input_symbols(&self) -> Vec<char> {
    ///         vec!['x']
    ///     }
    ///     fn transitions(&self) -> Vec<(State, Expression, State)> {
    ///         vec![
    ///             ("even".into(), 'x'.into(), "odd".into()),
    ///             ("odd".into(), 'x'.into(), "even".into()),
    ///         ]
    ///     }
    ///     fn initial_state(&self) -> State {
    ///         "even".into()
    ///     }
    ///     fn final_states(&self) -> Vec<State> {
    ///         vec!["odd".into()]
    ///     }
    ///     fn is_deterministic(&self) -> bool {
    ///         true
    ///     }
    /// }
    ///
    /// let automaton = Automaton::import(&Toggle).unwrap();
    /// assert!(automaton.is_deterministic());
    /// assert!(automaton.accepts("xxx").unwrap());
    /// ```
    pub fn import<F: ForeignAutomaton + ?Sized>(foreign: &F) -> Result<Automaton, ValidationError> {
        let builder = Builder::new()
            .with_transitions(foreign.transitions())
            .with_final_states(foreign.final_states());
        let states = foreign.states().into_iter().collect();
        let input_symbols = foreign.input_symbols().into_iter().collect();

        let automaton = if foreign.is_deterministic() {
            let mut definition = builder.into_dfa_definition(foreign.initial_state())?;
            definition.states = states;
            definition.input_symbols = input_symbols;
            Automaton::from(Dfa::new(definition)?)
        } else {
            let mut definition = builder.into_nfa_definition(foreign.initial_state());
            definition.states = states;
            definition.input_symbols = input_symbols;
            Automaton::from(Nfa::new(definition)?)
        };
        debug!(
            "imported {} automaton with {} states",
            if automaton.is_deterministic() {
                "deterministic"
            } else {
                "non-deterministic"
            },
            automaton.size()
        );
        Ok(automaton)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::prelude::*;

    /// Mirrors the plain-data layout automata libraries commonly use: a map from state to a
    /// map from symbol to successors, where the empty string stands for the empty symbol.
    struct Plain {
        states: Vec<&'static str>,
        input_symbols: Vec<char>,
        transitions: BTreeMap<&'static str, BTreeMap<&'static str, Vec<&'static str>>>,
        initial_state: &'static str,
        final_states: Vec<&'static str>,
        deterministic: bool,
    }

    impl ForeignAutomaton for Plain {
        fn states(&self) -> Vec<State> {
            self.states.iter().map(|q| State::from(*q)).collect()
        }
        fn input_symbols(&self) -> Vec<Symbol> {
            self.input_symbols.clone()
        }
        fn transitions(&self) -> Vec<(State, Expression, State)> {
            let mut edges = vec![];
            for (q, row) in &self.transitions {
                for (symbol, targets) in row {
                    let expression = match symbol.chars().next() {
                        Some(sym) => Expression::Symbol(sym),
                        None => Expression::Epsilon,
                    };
                    for p in targets {
                        edges.push((State::from(*q), expression, State::from(*p)));
                    }
                }
            }
            edges
        }
        fn initial_state(&self) -> State {
            self.initial_state.into()
        }
        fn final_states(&self) -> Vec<State> {
            self.final_states.iter().map(|q| State::from(*q)).collect()
        }
        fn is_deterministic(&self) -> bool {
            self.deterministic
        }
    }

    fn plain_nfa() -> Plain {
        Plain {
            states: vec!["q0", "q1", "q2"],
            input_symbols: vec!['a', 'b'],
            transitions: BTreeMap::from([
                ("q0", BTreeMap::from([("a", vec!["q1"])])),
                ("q1", BTreeMap::from([("a", vec!["q1"]), ("", vec!["q2"])])),
                ("q2", BTreeMap::from([("b", vec!["q0"])])),
            ]),
            initial_state: "q0",
            final_states: vec!["q1"],
            deterministic: false,
        }
    }

    #[test]
    fn imports_nondeterministic() {
        let imported = Automaton::import(&plain_nfa()).unwrap();
        assert_eq!(
            imported,
            Automaton::from(crate::tests::no_double_b_nfa())
        );
    }

    #[test]
    fn revalidates_foreign_data() {
        let mut undeclared = plain_nfa();
        undeclared.final_states.push("q7");
        assert_eq!(
            Automaton::import(&undeclared),
            Err(ValidationError::FinalStateNotInStates { state: "q7".into() })
        );

        let mut deterministic = plain_nfa();
        deterministic.deterministic = true;
        assert_eq!(
            Automaton::import(&deterministic),
            Err(ValidationError::InvalidSymbolInAlphabet {
                symbol: Expression::Epsilon,
                state: Some("q1".into())
            })
        );

        let mut conflicting = plain_nfa();
        conflicting.deterministic = true;
        conflicting.transitions.insert(
            "q1",
            BTreeMap::from([("a", vec!["q1", "q2"])]),
        );
        assert!(matches!(
            Automaton::import(&conflicting),
            Err(ValidationError::ConflictingTransition { .. })
        ));

        let mut empty = plain_nfa();
        empty.states.clear();
        empty.transitions.clear();
        empty.final_states.clear();
        assert_eq!(Automaton::import(&empty), Err(ValidationError::NoStates));
    }
}
