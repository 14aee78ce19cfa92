use tracing::trace;

use crate::{
    automaton::{Dfa, Nfa},
    math::{Bijection, IndexSet, StateIndex},
    state::State,
};

/// Assigns `q0, q1, ...` to the given states, first to the ones in `order` and then to the
/// remaining ones in ascending order of their labels.
fn sequential<'a>(
    order: Vec<StateIndex>,
    states: impl ExactSizeIterator<Item = &'a State>,
) -> Bijection<State, State> {
    let mut placed = IndexSet::with_capacity(states.len());
    let indices: Vec<StateIndex> = order
        .into_iter()
        .chain(0..states.len())
        .filter(|q| placed.insert(*q))
        .collect();
    let labels: Vec<&State> = states.collect();

    let mut bijection = Bijection::new();
    for (fresh, q) in indices.into_iter().enumerate() {
        bijection.insert(labels[q].clone(), State::named(format!("q{fresh}")));
    }
    bijection
}

impl Dfa {
    /// Maps every state to a fresh label `q0, q1, ...`. The numbers are handed out in
    /// breadth-first order from the initial state, unreachable states come last in the order
    /// of their labels.
    pub fn renaming(&self) -> Bijection<State, State> {
        sequential(self.reachable_indices(), self.states())
    }

    /// Gives an automaton that differs from `self` only in that every state is renamed
    /// according to [`Dfa::renaming`].
    pub fn renamed(&self) -> Dfa {
        let renaming = self.renaming();
        trace!("renaming {} states", renaming.len());
        let definition = self.to_definition().map_states(|q| {
            renaming
                .get_by_left(q)
                .cloned()
                .unwrap_or_else(|| q.clone())
        });
        Dfa::derived(definition, "renaming")
    }
}

impl Nfa {
    /// Maps every state to a fresh label `q0, q1, ...` in breadth-first order from the
    /// initial state, see [`Dfa::renaming`].
    pub fn renaming(&self) -> Bijection<State, State> {
        sequential(self.reachable_indices(), self.states())
    }

    /// Gives an automaton that differs from `self` only in that every state is renamed
    /// according to [`Nfa::renaming`].
    pub fn renamed(&self) -> Nfa {
        let renaming = self.renaming();
        let definition = self.to_definition().map_states(|q| {
            renaming
                .get_by_left(q)
                .cloned()
                .unwrap_or_else(|| q.clone())
        });
        Nfa::derived(definition, "renaming")
    }
}
