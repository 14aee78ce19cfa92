use std::{collections::BTreeSet, fmt::Display};

use itertools::Itertools;

use crate::Show;

/// An ordered set of states. Traces of non-deterministic runs report these.
pub type StateSet = BTreeSet<State>;

/// Identifies a state of an automaton. States have no identity beyond their label, so two
/// states with equal labels are the same state.
///
/// A [`State::Merged`] state stands for a set of other states, it is produced when several
/// states are collapsed into one (minimization, subset construction). The constituent states
/// stay available through [`State::constituents`], while [`Show`] renders the canonical label
/// `{q0,q2}`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum State {
    /// A plain state with a textual label.
    Named(String),
    /// A state that consists of a set of other states.
    Merged(StateSet),
}

impl State {
    /// Creates a plain state with the given label.
    pub fn named<S: Into<String>>(label: S) -> Self {
        State::Named(label.into())
    }

    /// Collapses the given states into one. A single state is returned unchanged, which
    /// keeps the labels of states that were not merged with anything.
    pub fn merge<I: IntoIterator<Item = State>>(states: I) -> Self {
        let mut states: StateSet = states.into_iter().collect();
        if states.len() == 1 {
            return states.pop_first().expect("set has one element");
        }
        State::Merged(states)
    }

    /// Creates a state that represents the given set of states. In contrast to
    /// [`State::merge`], a singleton set is not unwrapped, so distinct sets always lead
    /// to distinct labels.
    pub fn subset<I: IntoIterator<Item = State>>(states: I) -> Self {
        State::Merged(states.into_iter().collect())
    }

    /// Returns true if `self` consists of other states.
    pub fn is_merged(&self) -> bool {
        matches!(self, State::Merged(_))
    }

    /// Iterates over the states that `self` was built from. A plain state yields itself.
    pub fn constituents(&self) -> Box<dyn Iterator<Item = &State> + '_> {
        match self {
            State::Named(_) => Box::new(std::iter::once(self)),
            State::Merged(states) => Box::new(states.iter()),
        }
    }

    /// Collects the plain labels that `self` ultimately consists of, descending through
    /// nested merged states.
    pub fn originals(&self) -> BTreeSet<&str> {
        match self {
            State::Named(label) => BTreeSet::from([label.as_str()]),
            State::Merged(states) => states.iter().flat_map(|q| q.originals()).collect(),
        }
    }
}

impl Show for State {
    fn show(&self) -> String {
        match self {
            State::Named(label) => label.clone(),
            State::Merged(states) => format!("{{{}}}", states.iter().map(|q| q.show()).join(",")),
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.show())
    }
}

impl From<&str> for State {
    fn from(value: &str) -> Self {
        State::Named(value.to_string())
    }
}

impl From<String> for State {
    fn from(value: String) -> Self {
        State::Named(value)
    }
}

impl From<&String> for State {
    fn from(value: &String) -> Self {
        State::Named(value.clone())
    }
}

impl From<&State> for State {
    fn from(value: &State) -> Self {
        value.clone()
    }
}
