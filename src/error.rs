use thiserror::Error;

use crate::{
    alphabet::{Expression, Symbol},
    state::State,
};

/// Describes why a [`crate::Definition`] does not describe a well-formed automaton.
/// Every variant names the offending state and/or symbol.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ValidationError {
    /// The set of states is empty.
    #[error("an automaton needs at least one state")]
    NoStates,
    /// A transition starts in or leads to a state that was not declared.
    #[error("state `{state}` is referenced by a transition but not declared")]
    UnknownStateReferenced {
        /// The undeclared state.
        state: State,
    },
    /// The initial state was not declared.
    #[error("initial state `{state}` is not among the declared states")]
    InitialStateMissing {
        /// The initial state.
        state: State,
    },
    /// A final state was not declared.
    #[error("final state `{state}` is not among the declared states")]
    FinalStateNotInStates {
        /// The undeclared final state.
        state: State,
    },
    /// A deterministic automaton that must be total has no successor for some pair.
    #[error("state `{state}` has no transition on symbol `{symbol}`")]
    MissingTransition {
        /// The state lacking a transition.
        state: State,
        /// The symbol it has no transition for.
        symbol: Symbol,
    },
    /// A symbol is used on a transition without being declared, a reserved symbol is
    /// declared, or the empty symbol is used by a deterministic automaton.
    #[error("symbol `{symbol}` is not valid for this alphabet{}", .state.as_ref().map(|q| format!(" (on a transition of `{q}`)")).unwrap_or_default())]
    InvalidSymbolInAlphabet {
        /// The offending symbol.
        symbol: Expression,
        /// The source state of the transition using it, if it occurs on a transition.
        state: Option<State>,
    },
    /// Two different successors were given for the same pair in a deterministic automaton.
    #[error("state `{state}` has conflicting transitions on `{symbol}` to `{first}` and `{second}`")]
    ConflictingTransition {
        /// The source state.
        state: State,
        /// The symbol.
        symbol: Expression,
        /// The successor seen first.
        first: State,
        /// The conflicting successor.
        second: State,
    },
}

/// The input of a simulation contains a symbol that is not part of the alphabet.
/// This is a caller error and distinct from a run that is rejected.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
#[error("symbol `{symbol}` at position {position} is not part of the alphabet")]
pub struct InvalidSymbolError {
    /// The offending symbol.
    pub symbol: Symbol,
    /// The 1-based position of the symbol in the input word.
    pub position: usize,
}

/// An operation was applied to the wrong kind of [`crate::Automaton`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum OperationError {
    /// The operation is only defined for deterministic automata.
    #[error("`{operation}` requires a deterministic automaton")]
    RequiresDeterministic {
        /// Name of the operation.
        operation: &'static str,
    },
    /// The operation is only defined for non-deterministic automata.
    #[error("`{operation}` requires a non-deterministic automaton")]
    RequiresNondeterministic {
        /// Name of the operation.
        operation: &'static str,
    },
}
