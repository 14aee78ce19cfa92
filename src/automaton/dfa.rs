use itertools::Itertools;

use crate::{
    alphabet::{Alphabet, Expression, Symbol},
    builder::Builder,
    definition::{Definition, DfaDefinition},
    error::ValidationError,
    math::{IndexSet, StateIndex},
    state::State,
    validate::{validate, Completeness},
    Show,
};

/// A deterministic finite automaton (DFA). Every state has at most one successor per symbol.
/// If a state has no successor for some symbol, a run that needs it is rejected right away.
///
/// A [`Dfa`] can only be obtained through validation (see [`Dfa::new`]) and offers no way of
/// being changed afterwards, all transformations return a new automaton. Two automata are
/// equal if they have the same states, alphabet, transitions, initial and final states.
///
/// Internally, states are stored in the order of their labels and the transitions form a dense
/// table with one row per state and one column per symbol.
#[derive(Clone, PartialEq, Eq)]
pub struct Dfa {
    states: Vec<State>,
    alphabet: Alphabet,
    table: Vec<Option<StateIndex>>,
    initial: StateIndex,
    accepting: IndexSet,
}

impl Dfa {
    /// Instantiates a new [`Builder`].
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Validates `definition` and builds a (possibly partial) [`Dfa`] from it.
    pub fn new(definition: DfaDefinition) -> Result<Self, ValidationError> {
        Self::with_completeness(definition, Completeness::Partial)
    }

    /// Validates `definition` under the given [`Completeness`] and builds a [`Dfa`] from it.
    pub fn with_completeness(
        definition: DfaDefinition,
        completeness: Completeness,
    ) -> Result<Self, ValidationError> {
        validate(&definition, completeness)?;
        Ok(Self::assemble(definition))
    }

    /// Builds the automaton that results from a transformation. The definition still passes
    /// through the validator, a violation means the transformation is broken.
    pub(crate) fn derived(definition: DfaDefinition, operation: &'static str) -> Self {
        match Self::new(definition) {
            Ok(dfa) => dfa,
            Err(e) => panic!("{operation} produced an inconsistent automaton: {e}"),
        }
    }

    fn assemble(definition: DfaDefinition) -> Self {
        let Definition {
            states,
            input_symbols,
            transitions,
            initial_state,
            final_states,
        } = definition;
        let states = states.into_iter().collect_vec();
        let alphabet = Alphabet::from_iter(input_symbols);
        let index = |q: &State| {
            states
                .binary_search(q)
                .expect("validated automaton references only declared states")
        };

        let width = alphabet.size();
        let mut table = vec![None; states.len() * width];
        for (q, row) in &transitions {
            let source = index(q);
            for (expression, p) in row {
                let position = expression
                    .symbol()
                    .and_then(|sym| alphabet.position(sym))
                    .expect("validated automaton uses only declared symbols");
                table[source * width + position] = Some(index(p));
            }
        }

        let mut accepting = IndexSet::with_capacity(states.len());
        for q in &final_states {
            accepting.insert(index(q));
        }
        let initial = index(&initial_state);

        Self {
            states,
            alphabet,
            table,
            initial,
            accepting,
        }
    }

    /// Re-runs the validator on the exported definition of `self`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate(&self.to_definition(), Completeness::Partial)
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Returns the alphabet.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Iterates over all states in ascending order of their labels.
    pub fn states(&self) -> std::slice::Iter<'_, State> {
        self.states.iter()
    }

    /// Gives the state with the given index.
    pub fn state(&self, index: StateIndex) -> Option<&State> {
        self.states.get(index)
    }

    /// Gives the index of `state`, if it belongs to `self`.
    pub fn index_of(&self, state: &State) -> Option<StateIndex> {
        self.states.binary_search(state).ok()
    }

    /// Returns the initial state.
    pub fn initial_state(&self) -> &State {
        &self.states[self.initial]
    }

    /// Returns the index of the initial state.
    pub fn initial_index(&self) -> StateIndex {
        self.initial
    }

    /// Iterates over the accepting states.
    pub fn final_states(&self) -> impl Iterator<Item = &State> + '_ {
        self.accepting.iter().map(|q| &self.states[q])
    }

    /// Returns true if `state` is accepting.
    pub fn is_final(&self, state: &State) -> bool {
        self.index_of(state)
            .is_some_and(|q| self.accepting.contains(q))
    }

    pub(crate) fn label(&self, q: StateIndex) -> &State {
        &self.states[q]
    }

    pub(crate) fn is_accepting_index(&self, q: StateIndex) -> bool {
        self.accepting.contains(q)
    }

    /// Gives the successor of `state` on `symbol`. Returns `None` if there is no such
    /// transition or if state or symbol are unknown.
    pub fn successor(&self, state: &State, symbol: Symbol) -> Option<&State> {
        let q = self.index_of(state)?;
        let position = self.alphabet.position(symbol)?;
        self.successor_index(q, position).map(|p| &self.states[p])
    }

    /// Gives the index of the successor of the state with index `q` on the symbol at the
    /// given position of the alphabet.
    pub fn successor_index(&self, q: StateIndex, symbol_position: usize) -> Option<StateIndex> {
        self.table[q * self.alphabet.size() + symbol_position]
    }

    /// Iterates over all transitions as triples `(source, symbol, target)`, ordered by source
    /// and then by symbol.
    pub fn transitions(&self) -> impl Iterator<Item = (&State, Symbol, &State)> + '_ {
        (0..self.size()).flat_map(move |q| {
            self.alphabet
                .universe()
                .enumerate()
                .filter_map(move |(position, sym)| {
                    self.successor_index(q, position)
                        .map(|p| (&self.states[q], sym, &self.states[p]))
                })
        })
    }

    /// Returns true if every state has a successor for every symbol.
    pub fn is_total(&self) -> bool {
        self.table.iter().all(Option::is_some)
    }

    /// Exports `self` in label form.
    pub fn to_definition(&self) -> DfaDefinition {
        let mut definition = DfaDefinition::new(self.initial_state().clone());
        definition.states = self.states.iter().cloned().collect();
        definition.input_symbols = self.alphabet.universe().collect();
        definition.final_states = self.final_states().cloned().collect();
        for (q, sym, p) in self.transitions() {
            definition
                .transitions
                .entry(q.clone())
                .or_default()
                .insert(Expression::Symbol(sym), p.clone());
        }
        definition
    }
}

impl std::fmt::Debug for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "DFA over {} with initial state {} and final states {}",
            self.alphabet.show(),
            self.initial_state().show(),
            self.final_states().cloned().collect::<crate::state::StateSet>().show()
        )?;
        for (q, sym, p) in self.transitions() {
            writeln!(f, "{} --{}--> {}", q.show(), sym, p.show())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn dfa_accessors() {
        let dfa = Dfa::builder()
            .with_alphabet_symbols(['a', 'b'])
            .with_transitions([("q1", 'a', "q0"), ("q0", 'a', "q1"), ("q0", 'b', "q0")])
            .with_final_states(["q1"])
            .into_dfa("q0")
            .unwrap();

        assert_eq!(dfa.size(), 2);
        assert_eq!(dfa.initial_state(), &State::from("q0"));
        assert_eq!(dfa.initial_index(), 0);
        assert!(dfa.is_final(&State::from("q1")));
        assert!(!dfa.is_final(&State::from("q0")));
        assert!(!dfa.is_final(&State::from("q7")));
        assert!(!dfa.is_total());
        assert_eq!(dfa.successor(&"q0".into(), 'a'), Some(&State::from("q1")));
        assert_eq!(dfa.successor(&"q1".into(), 'b'), None);
        assert_eq!(dfa.successor(&"q1".into(), 'z'), None);
        assert_eq!(
            dfa.transitions()
                .map(|(q, a, p)| (q.show(), a, p.show()))
                .collect::<Vec<_>>(),
            vec![
                ("q0".to_string(), 'a', "q1".to_string()),
                ("q0".to_string(), 'b', "q0".to_string()),
                ("q1".to_string(), 'a', "q0".to_string()),
            ]
        );
        assert_eq!(dfa.validate(), Ok(()));
    }

    #[test]
    fn definition_round_trip_is_structural() {
        let dfa = crate::tests::ends_in_double_dfa();
        let rebuilt = Dfa::with_completeness(dfa.to_definition(), Completeness::Total).unwrap();
        assert_eq!(dfa, rebuilt);
        assert!(dfa.is_total());
    }
}
