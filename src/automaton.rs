mod dfa;
pub use dfa::Dfa;

mod nfa;
pub use nfa::Nfa;

use crate::{
    alphabet::Alphabet,
    error::{InvalidSymbolError, OperationError, ValidationError},
    minimization::StateNaming,
    run::{Configuration, Trace},
    state::State,
    word::Word,
};

/// Either a deterministic or a non-deterministic automaton. Operations that exist for both
/// kinds dispatch on the variant, operations that only make sense for one kind return an
/// [`OperationError`] when applied to the other.
///
/// # Example
/// ```
/// use finite_automata::prelude::*;
///
/// let nfa = Nfa::builder()
///     .with_transitions([("q0", Expression::from('a'), "q1"), ("q0", Expression::Epsilon, "q1")])
///     .with_final_states(["q1"])
///     .into_nfa("q0")
///     .unwrap();
/// let automaton = Automaton::from(nfa);
/// assert!(automaton.accepts("").unwrap());
/// assert_eq!(
///     automaton.minimize(),
///     Err(OperationError::RequiresDeterministic { operation: "minimize" })
/// );
/// assert!(automaton.determinize().minimize().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Automaton {
    /// A [`Dfa`].
    Deterministic(Dfa),
    /// An [`Nfa`].
    NonDeterministic(Nfa),
}

impl Automaton {
    /// Returns true for the deterministic variant.
    pub fn is_deterministic(&self) -> bool {
        matches!(self, Automaton::Deterministic(_))
    }

    /// Gives the deterministic automaton, if `self` is one.
    pub fn as_dfa(&self) -> Option<&Dfa> {
        match self {
            Automaton::Deterministic(dfa) => Some(dfa),
            Automaton::NonDeterministic(_) => None,
        }
    }

    /// Gives the non-deterministic automaton, if `self` is one.
    pub fn as_nfa(&self) -> Option<&Nfa> {
        match self {
            Automaton::Deterministic(_) => None,
            Automaton::NonDeterministic(nfa) => Some(nfa),
        }
    }

    /// Re-runs the validator.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Automaton::Deterministic(dfa) => dfa.validate(),
            Automaton::NonDeterministic(nfa) => nfa.validate(),
        }
    }

    /// Returns the alphabet.
    pub fn alphabet(&self) -> &Alphabet {
        match self {
            Automaton::Deterministic(dfa) => dfa.alphabet(),
            Automaton::NonDeterministic(nfa) => nfa.alphabet(),
        }
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        match self {
            Automaton::Deterministic(dfa) => dfa.size(),
            Automaton::NonDeterministic(nfa) => nfa.size(),
        }
    }

    /// Returns the initial state.
    pub fn initial_state(&self) -> &State {
        match self {
            Automaton::Deterministic(dfa) => dfa.initial_state(),
            Automaton::NonDeterministic(nfa) => nfa.initial_state(),
        }
    }

    /// Runs `word` and records every step. Deterministic runs report single states,
    /// non-deterministic runs report the set of active states.
    pub fn simulate<W: Word + ?Sized>(
        &self,
        word: &W,
    ) -> Result<Trace<Configuration>, InvalidSymbolError> {
        Ok(match self {
            Automaton::Deterministic(dfa) => dfa.simulate(word)?.map(Configuration::State),
            Automaton::NonDeterministic(nfa) => nfa.simulate(word)?.map(Configuration::States),
        })
    }

    /// Returns true if `word` is accepted.
    pub fn accepts<W: Word + ?Sized>(&self, word: &W) -> Result<bool, InvalidSymbolError> {
        match self {
            Automaton::Deterministic(dfa) => dfa.accepts(word),
            Automaton::NonDeterministic(nfa) => nfa.accepts(word),
        }
    }

    /// Minimizes a deterministic automaton, keeping the labels of merged states.
    pub fn minimize(&self) -> Result<Automaton, OperationError> {
        self.minimize_with(StateNaming::Retain)
    }

    /// Minimizes a deterministic automaton, labelling states according to `naming`.
    pub fn minimize_with(&self, naming: StateNaming) -> Result<Automaton, OperationError> {
        match self {
            Automaton::Deterministic(dfa) => Ok(dfa.minimize_with(naming).into()),
            Automaton::NonDeterministic(_) => Err(OperationError::RequiresDeterministic {
                operation: "minimize",
            }),
        }
    }

    /// Removes all empty-symbol transitions from a non-deterministic automaton.
    pub fn eliminate_lambda(&self) -> Result<Automaton, OperationError> {
        match self {
            Automaton::Deterministic(_) => Err(OperationError::RequiresNondeterministic {
                operation: "eliminate_lambda",
            }),
            Automaton::NonDeterministic(nfa) => Ok(nfa.eliminate_lambda().into()),
        }
    }

    /// Returns an equivalent deterministic automaton. A deterministic automaton is returned
    /// as it is.
    pub fn determinize(&self) -> Automaton {
        match self {
            Automaton::Deterministic(dfa) => dfa.clone().into(),
            Automaton::NonDeterministic(nfa) => nfa.determinize().into(),
        }
    }

    /// Drops all states that are not reachable from the initial state.
    pub fn remove_unreachable(&self) -> Automaton {
        match self {
            Automaton::Deterministic(dfa) => dfa.remove_unreachable().into(),
            Automaton::NonDeterministic(nfa) => nfa.remove_unreachable().into(),
        }
    }
}

impl From<Dfa> for Automaton {
    fn from(value: Dfa) -> Self {
        Automaton::Deterministic(value)
    }
}

impl From<Nfa> for Automaton {
    fn from(value: Nfa) -> Self {
        Automaton::NonDeterministic(value)
    }
}
