use itertools::Itertools;

use crate::{
    alphabet::{Alphabet, Expression},
    automaton::Dfa,
    builder::Builder,
    definition::{Definition, NfaDefinition},
    error::ValidationError,
    math::{IndexSet, StateIndex},
    state::{State, StateSet},
    validate::{validate, Completeness},
    Show,
};

/// A non-deterministic finite automaton (NFA). A state may have any number of successors for
/// a symbol, and transitions on the empty symbol ([`Expression::Epsilon`]) change the state
/// without consuming input.
///
/// Like [`Dfa`], an [`Nfa`] is validated on construction and never changes afterwards.
/// Transitions are stored as one set of successor indices per state and expression, where the
/// last column of each row holds the empty-symbol successors.
#[derive(Clone, PartialEq, Eq)]
pub struct Nfa {
    states: Vec<State>,
    alphabet: Alphabet,
    table: Vec<IndexSet>,
    initial: StateIndex,
    accepting: IndexSet,
}

impl Nfa {
    /// Instantiates a new [`Builder`].
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Validates `definition` and builds an [`Nfa`] from it.
    pub fn new(definition: NfaDefinition) -> Result<Self, ValidationError> {
        validate(&definition, Completeness::Partial)?;
        Ok(Self::assemble(definition))
    }

    /// Builds the automaton that results from a transformation. The definition still passes
    /// through the validator, a violation means the transformation is broken.
    pub(crate) fn derived(definition: NfaDefinition, operation: &'static str) -> Self {
        match Self::new(definition) {
            Ok(nfa) => nfa,
            Err(e) => panic!("{operation} produced an inconsistent automaton: {e}"),
        }
    }

    fn assemble(definition: NfaDefinition) -> Self {
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

        let n = states.len();
        let width = alphabet.size() + 1;
        let mut table = vec![IndexSet::with_capacity(n); n * width];
        for (q, row) in &transitions {
            let source = index(q);
            for (expression, targets) in row {
                let column = match expression {
                    Expression::Symbol(sym) => alphabet
                        .position(*sym)
                        .expect("validated automaton uses only declared symbols"),
                    Expression::Epsilon => width - 1,
                };
                let cell = &mut table[source * width + column];
                for p in targets {
                    cell.insert(index(p));
                }
            }
        }

        let mut accepting = IndexSet::with_capacity(n);
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

    /// Returns the alphabet. It never contains the empty symbol.
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

    pub(crate) fn accepting(&self) -> &IndexSet {
        &self.accepting
    }

    fn width(&self) -> usize {
        self.alphabet.size() + 1
    }

    /// The column of the empty symbol in the transition table.
    pub(crate) fn epsilon_column(&self) -> usize {
        self.alphabet.size()
    }

    /// Gives the successors of the state with index `q` in the given column, where columns
    /// are symbol positions and [`Nfa::epsilon_column`] is the empty symbol.
    pub(crate) fn successor_indices(&self, q: StateIndex, column: usize) -> &IndexSet {
        &self.table[q * self.width() + column]
    }

    /// Translates a set of indices back into labels.
    pub(crate) fn labels(&self, indices: &IndexSet) -> StateSet {
        indices.iter().map(|q| self.states[q].clone()).collect()
    }

    /// Gives the direct successors of `state` on `expression`, without taking empty-symbol
    /// closures into account. Unknown states and symbols have no successors.
    pub fn successors(&self, state: &State, expression: Expression) -> StateSet {
        let Some(q) = self.index_of(state) else {
            return StateSet::new();
        };
        let column = match expression {
            Expression::Symbol(sym) => match self.alphabet.position(sym) {
                Some(position) => position,
                None => return StateSet::new(),
            },
            Expression::Epsilon => self.epsilon_column(),
        };
        self.labels(self.successor_indices(q, column))
    }

    /// Iterates over all edges `(source, expression, target)`, ordered by source, then by
    /// expression (proper symbols before the empty symbol) and then by target.
    pub fn transitions(&self) -> impl Iterator<Item = (&State, Expression, &State)> + '_ {
        let expressions = self
            .alphabet
            .universe()
            .map(Expression::Symbol)
            .chain(std::iter::once(Expression::Epsilon))
            .collect_vec();
        (0..self.size())
            .cartesian_product(expressions.into_iter().enumerate())
            .flat_map(move |(q, (column, expression))| {
                self.successor_indices(q, column)
                    .iter()
                    .map(move |p| (&self.states[q], expression, &self.states[p]))
            })
    }

    /// Returns true if at least one transition is labelled with the empty symbol.
    pub fn has_epsilon_transitions(&self) -> bool {
        let column = self.epsilon_column();
        (0..self.size()).any(|q| !self.successor_indices(q, column).is_empty())
    }

    /// Exports `self` in label form. Empty successor sets are omitted.
    pub fn to_definition(&self) -> NfaDefinition {
        let mut definition = NfaDefinition::new(self.initial_state().clone());
        definition.states = self.states.iter().cloned().collect();
        definition.input_symbols = self.alphabet.universe().collect();
        definition.final_states = self.final_states().cloned().collect();
        for (q, expression, p) in self.transitions() {
            definition
                .transitions
                .entry(q.clone())
                .or_default()
                .entry(expression)
                .or_default()
                .insert(p.clone());
        }
        definition
    }
}

impl From<&Dfa> for Nfa {
    fn from(dfa: &Dfa) -> Self {
        let mut definition = NfaDefinition::new(dfa.initial_state().clone());
        definition.states = dfa.states().cloned().collect();
        definition.input_symbols = dfa.alphabet().universe().collect();
        definition.final_states = dfa.final_states().cloned().collect();
        for (q, sym, p) in dfa.transitions() {
            definition
                .transitions
                .entry(q.clone())
                .or_default()
                .insert(Expression::Symbol(sym), StateSet::from([p.clone()]));
        }
        Nfa::derived(definition, "embedding of a DFA")
    }
}

impl Dfa {
    /// Views `self` as a non-deterministic automaton with singleton successor sets.
    pub fn to_nfa(&self) -> Nfa {
        Nfa::from(self)
    }
}

impl std::fmt::Debug for Nfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "NFA over {} with initial state {} and final states {}",
            self.alphabet.show(),
            self.initial_state().show(),
            self.labels(&self.accepting).show()
        )?;
        for (q, expression, p) in self.transitions() {
            writeln!(f, "{} --{}--> {}", q.show(), expression, p.show())?;
        }
        Ok(())
    }
}
