use fastrand::Rng;
use tracing::debug;

use crate::{
    alphabet::{Alphabet, Expression, Symbol},
    automaton::{Dfa, Nfa},
    definition::{DfaDefinition, NfaDefinition},
    state::{State, StateSet},
};

fn label(q: usize) -> State {
    State::named(format!("q{q}"))
}

/// Draws a random (possibly partial) [`Dfa`] with states `q0` to `q{size - 1}` over the first
/// `symbols` letters of the alphabet. The initial state is `q0`.
/// 1. Every state is final with probability one half.
/// 2. For every state and symbol, a transition to a uniformly drawn target is added with
///    probability `density`, so a `density` of `1.0` gives a total automaton.
///
/// States may be unreachable from `q0`.
pub fn random_dfa(rng: &mut Rng, size: usize, symbols: usize, density: f64) -> Dfa {
    assert!(size > 0, "an automaton needs at least one state");
    let alphabet = Alphabet::of_size(symbols);
    let mut definition = DfaDefinition::new(label(0));
    definition.states = (0..size).map(label).collect();
    definition.input_symbols = alphabet.universe().collect();
    definition.final_states = (0..size).filter(|_| rng.bool()).map(label).collect();

    for q in 0..size {
        for sym in alphabet.universe() {
            if rng.f64() < density {
                definition
                    .transitions
                    .entry(label(q))
                    .or_default()
                    .insert(Expression::Symbol(sym), label(rng.usize(..size)));
            }
        }
    }

    let dfa = Dfa::derived(definition, "random generation");
    debug!("drew random DFA with {} transitions", dfa.transitions().count());
    dfa
}

/// Draws a random [`Nfa`] with states `q0` to `q{size - 1}` over the first `symbols` letters of
/// the alphabet, with initial state `q0`. Every possible edge `(q, a, p)` is added with
/// probability `density` and every possible empty-symbol edge `(q, ε, p)` with probability
/// `epsilon_density`. Every state is final with probability one half.
pub fn random_nfa(
    rng: &mut Rng,
    size: usize,
    symbols: usize,
    density: f64,
    epsilon_density: f64,
) -> Nfa {
    assert!(size > 0, "an automaton needs at least one state");
    let alphabet = Alphabet::of_size(symbols);
    let mut definition = NfaDefinition::new(label(0));
    definition.states = (0..size).map(label).collect();
    definition.input_symbols = alphabet.universe().collect();
    definition.final_states = (0..size).filter(|_| rng.bool()).map(label).collect();

    let expressions: Vec<(Expression, f64)> = alphabet
        .universe()
        .map(|sym| (Expression::Symbol(sym), density))
        .chain(std::iter::once((Expression::Epsilon, epsilon_density)))
        .collect();
    for q in 0..size {
        for &(expression, probability) in &expressions {
            let targets: StateSet = (0..size)
                .filter(|_| rng.f64() < probability)
                .map(label)
                .collect();
            if !targets.is_empty() {
                definition
                    .transitions
                    .entry(label(q))
                    .or_default()
                    .insert(expression, targets);
            }
        }
    }

    let nfa = Nfa::derived(definition, "random generation");
    debug!("drew random NFA with {} transitions", nfa.transitions().count());
    nfa
}

/// Draws a word of length at most `max_length` whose symbols are drawn uniformly from
/// `alphabet`. Over an empty alphabet, the word is always empty.
pub fn random_word(rng: &mut Rng, alphabet: &Alphabet, max_length: usize) -> Vec<Symbol> {
    if alphabet.is_empty() {
        return vec![];
    }
    let length = rng.usize(..=max_length);
    (0..length)
        .map(|_| alphabet[rng.usize(..alphabet.size())])
        .collect()
}

/// Draws `count` words with [`random_word`].
pub fn random_words(
    rng: &mut Rng,
    alphabet: &Alphabet,
    count: usize,
    max_length: usize,
) -> Vec<Vec<Symbol>> {
    (0..count)
        .map(|_| random_word(rng, alphabet, max_length))
        .collect()
}
