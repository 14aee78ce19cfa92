//! Library for modelling, transforming and simulating finite automata over finite alphabets.
//!
//! An automaton is either deterministic ([`Dfa`]) or non-deterministic ([`Nfa`]), and the sum type
//! [`Automaton`] lets both be handled through the same API surface. Automata are built from a
//! label-based [`Definition`] (usually through the [`Builder`]) and are validated eagerly: a model
//! that exists is structurally consistent. No method mutates a model, every transformation
//! returns a fresh, independently validated automaton.
//!
//! The supported transformations are
//! - removal of unreachable states and minimization by partition refinement ([`Dfa::minimize`]),
//! - elimination of empty-symbol (lambda) transitions ([`Nfa::eliminate_lambda`]),
//! - conversion between the two kinds ([`Nfa::determinize`], [`Dfa::to_nfa`]).
//!
//! Running a word through an automaton produces a [`run::Trace`], an ordered list of steps
//! together with a [`run::Verdict`]. For non-deterministic automata every step records the whole
//! set of active states. Traces and the read-only accessors of the models are what renderers
//! (tables, diagrams) consume; rendering itself is not part of this crate.
//!
//! States are identified by their label ([`State`]). States that arise from merging several
//! states, be it in minimization or in the subset construction, keep the set of labels they
//! were made from and display as `{q0,q2}`.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use finite_automata::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        alphabet::{Alphabet, Expression, Symbol},
        automaton::{Automaton, Dfa, Nfa},
        builder::Builder,
        convert::ForeignAutomaton,
        definition::{Definition, DfaDefinition, NfaDefinition},
        error::{InvalidSymbolError, OperationError, ValidationError},
        math,
        math::StateIndex,
        minimization::StateNaming,
        run::{Configuration, Step, Trace, Verdict},
        state::{State, StateSet},
        validate::Completeness,
        word::Word,
        Show,
    };
}

/// Defines symbols, the empty symbol and alphabets.
pub mod alphabet;
pub use alphabet::Alphabet;

/// Defines the labels that identify states.
pub mod state;
pub use state::State;

/// Input words, i.e. finite sequences of symbols.
pub mod word;

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

/// Error types of the crate.
pub mod error;

/// The raw, label-based description of an automaton.
pub mod definition;
pub use definition::Definition;

/// Fluent construction of automata from lists of edges.
pub mod builder;
pub use builder::Builder;

/// Checks the structural consistency of a [`Definition`].
pub mod validate;

/// Defines deterministic and non-deterministic automata and the [`Automaton`] sum type over both.
pub mod automaton;
pub use automaton::{Automaton, Dfa, Nfa};

/// Transformations that produce new automata: epsilon closures and lambda elimination,
/// reachability, subset construction and renaming of states.
pub mod operations;

/// Contains the minimization of deterministic automata.
pub mod minimization;

/// Simulation of words on automata, producing step-by-step traces.
pub mod run;

/// The boundary to automata that were built by some other library.
pub mod convert;

/// Implements the generation of random automata and words.
#[cfg(feature = "random")]
pub mod random;

use itertools::Itertools;
use std::collections::BTreeSet;

/// Helper trait which can be used to display states, transitions and such.
pub trait Show {
    /// Returns a human readable representation of `self`, for a state that should be
    /// for example q0, q1, q2, ... and for a step (q0, a, q1) it should be (q0, a, q1).
    /// Just use something that makes sense. This is mainly used for logging and by
    /// renderers that need a compact label.
    fn show(&self) -> String;
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for usize {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl Show for bool {
    fn show(&self) -> String {
        match self {
            true => "+",
            false => "-",
        }
        .to_string()
    }
}

/// Sets are shown as `{a,b,c}`, the empty set is shown as `∅`.
impl<S: Show> Show for BTreeSet<S> {
    fn show(&self) -> String {
        if self.is_empty() {
            return "∅".to_string();
        }
        format!("{{{}}}", self.iter().map(|x| x.show()).join(","))
    }
}

impl<S: Show> Show for [S] {
    fn show(&self) -> String {
        format!("[{}]", self.iter().map(|x| x.show()).join(", "))
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        self.as_slice().show()
    }
}

impl<S: Show, T: Show> Show for (S, T) {
    fn show(&self) -> String {
        format!("({}, {})", self.0.show(), self.1.show())
    }
}

impl<S: Show> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}
