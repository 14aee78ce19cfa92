use std::collections::{btree_map::Entry, BTreeMap, BTreeSet};

use crate::{
    alphabet::{Expression, Symbol},
    automaton::{Dfa, Nfa},
    definition::{Definition, DfaDefinition, NfaDefinition},
    error::ValidationError,
    state::{State, StateSet},
    validate::Completeness,
};

/// Helper struct for the construction of automata from a list of edges. It stores the
/// declared states and symbols, the edges and the final states, and turns them into a
/// validated [`Dfa`] or [`Nfa`].
///
/// If no states are declared, the states are inferred from the edges and the initial state.
/// If no symbols are declared, the alphabet consists of the symbols that appear on at least
/// one edge.
///
/// # Example
///
/// We want to create a DFA with two states q0 and q1 over the alphabet `['a', 'b']`, where
/// reading `b` toggles between the states and `a` stays put. Further, q0 should be initial
/// and q1 should be accepting.
/// ```
/// use finite_automata::prelude::*;
///
/// let dfa = Dfa::builder()
///     .with_transitions([("q0", 'a', "q0"), ("q0", 'b', "q1"), ("q1", 'a', "q1"), ("q1", 'b', "q0")])
///     .with_final_states(["q1"])
///     .into_dfa("q0")
///     .unwrap();
/// assert!(!dfa.accepts("abab").unwrap());
/// assert!(dfa.accepts("aab").unwrap());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Builder {
    states: Vec<State>,
    symbols: Vec<Symbol>,
    edges: Vec<(State, Expression, State)>,
    final_states: Vec<State>,
    completeness: Completeness,
}

impl Builder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares states. Once at least one state is declared, no states are inferred.
    pub fn with_states<S: Into<State>, I: IntoIterator<Item = S>>(mut self, states: I) -> Self {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// By default, the only alphabet symbols of the automaton that is built are the ones
    /// that appear on at least one edge. Declaring symbols with this method replaces that
    /// inference, so symbols without edges can be part of the alphabet.
    pub fn with_alphabet_symbols<I: IntoIterator<Item = Symbol>>(mut self, symbols: I) -> Self {
        self.symbols.extend(symbols);
        self
    }

    /// Adds a list of transitions to `self`. A transition is given as a tuple of source,
    /// expression (a `char` or [`Expression::Epsilon`]) and target.
    pub fn with_transitions<S, E, T, I>(mut self, iter: I) -> Self
    where
        S: Into<State>,
        E: Into<Expression>,
        T: Into<State>,
        I: IntoIterator<Item = (S, E, T)>,
    {
        self.edges.extend(
            iter.into_iter()
                .map(|(q, e, p)| (q.into(), e.into(), p.into())),
        );
        self
    }

    /// Marks the given states as accepting.
    pub fn with_final_states<S: Into<State>, I: IntoIterator<Item = S>>(
        mut self,
        states: I,
    ) -> Self {
        self.final_states
            .extend(states.into_iter().map(Into::into));
        self
    }

    /// Demands that a deterministic automaton built from `self` is total, see
    /// [`Completeness::Total`].
    pub fn require_total(mut self) -> Self {
        self.completeness = Completeness::Total;
        self
    }

    fn skeleton<T>(&self, initial: State) -> Definition<T> {
        let states: BTreeSet<State> = if self.states.is_empty() {
            self.edges
                .iter()
                .flat_map(|(q, _, p)| [q.clone(), p.clone()])
                .chain(std::iter::once(initial.clone()))
                .collect()
        } else {
            self.states.iter().cloned().collect()
        };
        let input_symbols = if self.symbols.is_empty() {
            self.edges.iter().filter_map(|(_, e, _)| e.symbol()).collect()
        } else {
            self.symbols.iter().copied().collect()
        };
        Definition {
            states,
            input_symbols,
            transitions: BTreeMap::new(),
            initial_state: initial,
            final_states: self.final_states.iter().cloned().collect(),
        }
    }

    /// Collects `self` into a [`DfaDefinition`] without validating it. Fails only if two
    /// edges give different targets for the same state and expression.
    pub fn into_dfa_definition<S: Into<State>>(
        self,
        initial: S,
    ) -> Result<DfaDefinition, ValidationError> {
        let mut definition: DfaDefinition = self.skeleton(initial.into());
        for (q, e, p) in self.edges {
            match definition.transitions.entry(q.clone()).or_default().entry(e) {
                Entry::Vacant(slot) => {
                    slot.insert(p);
                }
                Entry::Occupied(existing) if existing.get() != &p => {
                    return Err(ValidationError::ConflictingTransition {
                        state: q,
                        symbol: e,
                        first: existing.get().clone(),
                        second: p,
                    });
                }
                Entry::Occupied(_) => {}
            }
        }
        Ok(definition)
    }

    /// Collects `self` into an [`NfaDefinition`] without validating it.
    pub fn into_nfa_definition<S: Into<State>>(self, initial: S) -> NfaDefinition {
        let mut definition: NfaDefinition = self.skeleton(initial.into());
        for (q, e, p) in self.edges {
            definition
                .transitions
                .entry(q)
                .or_default()
                .entry(e)
                .or_insert_with(StateSet::new)
                .insert(p);
        }
        definition
    }

    /// Builds a validated [`Dfa`] with the given initial state.
    pub fn into_dfa<S: Into<State>>(self, initial: S) -> Result<Dfa, ValidationError> {
        let completeness = self.completeness;
        Dfa::with_completeness(self.into_dfa_definition(initial)?, completeness)
    }

    /// Builds a validated [`Nfa`] with the given initial state.
    pub fn into_nfa<S: Into<State>>(self, initial: S) -> Result<Nfa, ValidationError> {
        Nfa::new(self.into_nfa_definition(initial))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn infers_states_and_symbols() {
        let def = Builder::new()
            .with_transitions([("q0", 'a', "q1"), ("q1", 'b', "q2")])
            .into_dfa_definition("q0")
            .unwrap();
        assert_eq!(def.states.len(), 3);
        assert_eq!(def.input_symbols.iter().copied().collect::<Vec<_>>(), vec!['a', 'b']);
    }

    #[test]
    fn declared_states_are_not_extended() {
        let result = Builder::new()
            .with_states(["q0"])
            .with_transitions([("q0", 'a', "q1")])
            .into_dfa("q0");
        assert_eq!(
            result,
            Err(ValidationError::UnknownStateReferenced {
                state: "q1".into()
            })
        );
    }

    #[test]
    fn detects_conflicting_edges() {
        let result = Builder::new()
            .with_transitions([("q0", 'a', "q1"), ("q0", 'a', "q0"), ("q1", 'a', "q1")])
            .into_dfa("q0");
        assert!(matches!(
            result,
            Err(ValidationError::ConflictingTransition { .. })
        ));

        let repeated = Builder::new()
            .with_transitions([("q0", 'a', "q0"), ("q0", 'a', "q0")])
            .into_dfa("q0");
        assert!(repeated.is_ok());
    }

    #[test]
    fn totality_is_opt_in() {
        let partial = Builder::new()
            .with_alphabet_symbols(['a', 'b'])
            .with_transitions([("q0", 'a', "q0")])
            .into_dfa("q0");
        assert!(partial.is_ok());

        let total = Builder::new()
            .with_alphabet_symbols(['a', 'b'])
            .with_transitions([("q0", 'a', "q0")])
            .require_total()
            .into_dfa("q0");
        assert_eq!(
            total,
            Err(ValidationError::MissingTransition {
                state: "q0".into(),
                symbol: 'b'
            })
        );
    }

    #[test]
    fn nondeterministic_edges_are_grouped() {
        let def = Builder::new()
            .with_transitions([
                ("q0", Expression::from('a'), "q0"),
                ("q0", Expression::from('a'), "q1"),
                ("q0", Expression::Epsilon, "q1"),
            ])
            .into_nfa_definition("q0");
        assert_eq!(def.input_symbols.len(), 1);
        let row = &def.transitions[&State::from("q0")];
        assert_eq!(row[&Expression::from('a')].len(), 2);
        assert_eq!(row[&Expression::Epsilon].len(), 1);
    }
}
