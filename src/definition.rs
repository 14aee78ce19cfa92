use std::collections::{BTreeMap, BTreeSet};

use crate::{
    alphabet::{Expression, Symbol},
    state::{State, StateSet},
};

/// The raw, label-based description of an automaton: the five components states, input
/// symbols, transitions, initial state and final states. It is what models are built from
/// and what they export through `to_definition`, so it is also the form in which renderers
/// receive an automaton.
///
/// A definition is plain data and may be inconsistent. Turning it into a model runs the
/// validator, see [`crate::validate`].
///
/// The type parameter `T` is the successor of a transition: a single [`State`] for
/// deterministic automata ([`DfaDefinition`]) and a [`StateSet`] for non-deterministic ones
/// ([`NfaDefinition`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Definition<T> {
    /// All states.
    pub states: BTreeSet<State>,
    /// The declared alphabet.
    pub input_symbols: BTreeSet<Symbol>,
    /// For every state the successors on each expression.
    pub transitions: BTreeMap<State, BTreeMap<Expression, T>>,
    /// The initial state.
    pub initial_state: State,
    /// The accepting states.
    pub final_states: BTreeSet<State>,
}

/// Definition of a deterministic automaton.
pub type DfaDefinition = Definition<State>;
/// Definition of a non-deterministic automaton.
pub type NfaDefinition = Definition<StateSet>;

/// The successor of a transition in a [`Definition`].
pub trait Successors {
    /// Whether this kind of successor belongs to a deterministic automaton.
    const DETERMINISTIC: bool;
    /// Iterates over all target states.
    fn targets(&self) -> Box<dyn Iterator<Item = &State> + '_>;
    /// Replaces every target state `q` by `f(q)`.
    fn relabel<F: Fn(&State) -> State>(&self, f: &F) -> Self;
}

impl Successors for State {
    const DETERMINISTIC: bool = true;
    fn targets(&self) -> Box<dyn Iterator<Item = &State> + '_> {
        Box::new(std::iter::once(self))
    }
    fn relabel<F: Fn(&State) -> State>(&self, f: &F) -> Self {
        f(self)
    }
}

impl Successors for StateSet {
    const DETERMINISTIC: bool = false;
    fn targets(&self) -> Box<dyn Iterator<Item = &State> + '_> {
        Box::new(self.iter())
    }
    fn relabel<F: Fn(&State) -> State>(&self, f: &F) -> Self {
        self.iter().map(f).collect()
    }
}

impl<T> Definition<T> {
    /// Creates a definition with a single (initial) state and nothing else.
    pub fn new<S: Into<State>>(initial_state: S) -> Self {
        let initial_state = initial_state.into();
        Self {
            states: BTreeSet::from([initial_state.clone()]),
            input_symbols: BTreeSet::new(),
            transitions: BTreeMap::new(),
            initial_state,
            final_states: BTreeSet::new(),
        }
    }

    /// Iterates over all transitions as triples `(source, expression, successor)`.
    pub fn transition_triples(&self) -> impl Iterator<Item = (&State, Expression, &T)> + '_ {
        self.transitions
            .iter()
            .flat_map(|(q, row)| row.iter().map(move |(e, t)| (q, *e, t)))
    }
}

impl<T: Successors> Definition<T> {
    /// Iterates over all edges `(source, expression, target)`, flattening successor sets.
    pub fn edges(&self) -> impl Iterator<Item = (&State, Expression, &State)> + '_ {
        self.transition_triples()
            .flat_map(|(q, e, t)| t.targets().map(move |p| (q, e, p)))
    }

    /// Renames every state `q` to `f(q)`. The caller has to make sure that `f` is injective
    /// on the states of `self`.
    pub fn map_states<F: Fn(&State) -> State>(&self, f: F) -> Self {
        Self {
            states: self.states.iter().map(&f).collect(),
            input_symbols: self.input_symbols.clone(),
            transitions: self
                .transitions
                .iter()
                .map(|(q, row)| {
                    (
                        f(q),
                        row.iter().map(|(e, t)| (*e, t.relabel(&f))).collect(),
                    )
                })
                .collect(),
            initial_state: f(&self.initial_state),
            final_states: self.final_states.iter().map(&f).collect(),
        }
    }
}
