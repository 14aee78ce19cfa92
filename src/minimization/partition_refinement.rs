use std::hash::Hash;

use tracing::{debug, trace};

use crate::{
    alphabet::Expression,
    automaton::Dfa,
    definition::DfaDefinition,
    math::{Map, Partition, StateIndex},
    state::State,
    Show,
};

/// Numbers the given keys by their first occurrence, equal keys get equal numbers. Also gives
/// the number of distinct keys.
fn number_by_first_occurrence<K: Hash + Eq>(keys: impl Iterator<Item = K>) -> (Vec<usize>, usize) {
    let mut ids: Map<K, usize> = Map::default();
    let numbers = keys
        .map(|key| {
            let next = ids.len();
            *ids.entry(key).or_insert(next)
        })
        .collect();
    (numbers, ids.len())
}

/// The result of Moore's partition refinement on a [`Dfa`]. A partial automaton is treated as
/// if every missing transition led into an extra rejecting sink state, which gets the index
/// right after the last real state.
#[derive(Debug, Clone)]
pub(crate) struct Refinement {
    classes: Vec<usize>,
    sink: Option<StateIndex>,
    real: usize,
}

impl Refinement {
    /// Starts from the split into final and non-final states and splits classes as long as two
    /// states of the same class move into different classes on some symbol.
    pub(crate) fn compute(dfa: &Dfa) -> Self {
        let real = dfa.size();
        let width = dfa.alphabet().size();
        let sink = (!dfa.is_total()).then_some(real);
        let universe = real + usize::from(sink.is_some());
        let successor = |q: StateIndex, position: usize| -> StateIndex {
            if q >= real {
                q
            } else {
                dfa.successor_index(q, position).unwrap_or(real)
            }
        };

        let (mut classes, mut count) =
            number_by_first_occurrence((0..universe).map(|q| q < real && dfa.is_accepting_index(q)));
        let mut round = 0;
        loop {
            round += 1;
            let (refined, refined_count) = number_by_first_occurrence((0..universe).map(|q| {
                let successors: Vec<usize> =
                    (0..width).map(|position| classes[successor(q, position)]).collect();
                (classes[q], successors)
            }));
            trace!("refinement round {round} gives {refined_count} classes");
            if refined_count == count {
                break;
            }
            classes = refined;
            count = refined_count;
        }

        Self {
            classes,
            sink,
            real,
        }
    }

    /// Groups the real states into their classes, ordered by their least index.
    pub(crate) fn partition(&self) -> Partition<StateIndex> {
        Partition::from_classes(0..self.real, |q| self.classes[q])
    }

    fn class_of_successor(&self, dfa: &Dfa, q: StateIndex, position: usize) -> Option<usize> {
        dfa.successor_index(q, position)
            .or(self.sink)
            .map(|p| self.classes[p])
    }

    /// Builds the automaton whose states are the classes of `dfa`. A class is labelled by
    /// merging the labels of its states. The class of the sink is only materialized if it
    /// contains real states, then all missing transitions lead into it.
    pub(crate) fn quotient(&self, dfa: &Dfa) -> Dfa {
        let blocks = self.partition();
        let mut labels: Map<usize, State> = Map::default();
        for block in &blocks {
            if let Some(&representative) = block.first() {
                labels.insert(
                    self.classes[representative],
                    State::merge(block.iter().map(|&q| dfa.label(q).clone())),
                );
            }
        }

        let initial = labels
            .get(&self.classes[dfa.initial_index()])
            .cloned()
            .expect("every real state belongs to a block");
        let mut definition = DfaDefinition::new(initial);
        definition.states = labels.values().cloned().collect();
        definition.input_symbols = dfa.alphabet().universe().collect();

        for block in &blocks {
            let Some(&representative) = block.first() else {
                continue;
            };
            let source = &labels[&self.classes[representative]];
            if dfa.is_accepting_index(representative) {
                definition.final_states.insert(source.clone());
            }
            for (position, sym) in dfa.alphabet().universe().enumerate() {
                let target = self
                    .class_of_successor(dfa, representative, position)
                    .and_then(|class| labels.get(&class));
                if let Some(target) = target {
                    definition
                        .transitions
                        .entry(source.clone())
                        .or_default()
                        .insert(Expression::Symbol(sym), target.clone());
                }
            }
        }

        debug!(
            "merged {} states into {} blocks, initial block is {}",
            dfa.size(),
            definition.states.len(),
            definition.initial_state.show()
        );
        Dfa::derived(definition, "minimization")
    }
}
