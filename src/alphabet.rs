use std::fmt::Display;

use itertools::Itertools;

use crate::{error::InvalidSymbolError, Show};

/// A symbol is a single `char`. Words are sequences of symbols and every transition that
/// consumes input is labelled with one.
pub type Symbol = char;

/// Spellings of the empty symbol. These may never be declared as input symbols.
pub const RESERVED_SYMBOLS: [Symbol; 2] = ['ε', 'λ'];

/// Returns true if `symbol` is one of the [`RESERVED_SYMBOLS`].
pub fn is_reserved(symbol: Symbol) -> bool {
    RESERVED_SYMBOLS.contains(&symbol)
}

/// The label of a transition. It is either a proper [`Symbol`] or the empty symbol, which
/// is consumed without reading any input and is only legal in non-deterministic automata.
///
/// Symbols are ordered before the empty symbol, so iterating over a sorted map of
/// expressions yields the proper symbols first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expression {
    /// A proper input symbol.
    Symbol(Symbol),
    /// The empty symbol (ε/λ).
    Epsilon,
}

impl Expression {
    /// Returns the underlying symbol, or `None` for the empty symbol.
    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            Expression::Symbol(sym) => Some(*sym),
            Expression::Epsilon => None,
        }
    }

    /// Returns true if `self` is the empty symbol.
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Expression::Epsilon)
    }
}

impl From<Symbol> for Expression {
    fn from(value: Symbol) -> Self {
        Expression::Symbol(value)
    }
}

impl Show for Expression {
    fn show(&self) -> String {
        match self {
            Expression::Symbol(sym) => sym.to_string(),
            Expression::Epsilon => "ε".to_string(),
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.show())
    }
}

/// A finite alphabet of `char` symbols. The symbols are kept sorted and free of duplicates,
/// which gives every symbol a stable position. Automata use this position to index their
/// transition tables.
///
/// # Example
/// ```
/// use finite_automata::prelude::*;
///
/// let alphabet = Alphabet::from_iter(['b', 'a', 'b']);
/// assert_eq!(alphabet.size(), 2);
/// assert_eq!(alphabet.position('b'), Some(1));
/// assert!(!alphabet.contains('c'));
/// ```
#[derive(Clone, Hash, PartialEq, Eq, Debug, PartialOrd, Ord, Default)]
pub struct Alphabet(Vec<Symbol>);

impl Alphabet {
    /// Creates a new [`Alphabet`] of the given size. The symbols are just the first `size` letters
    /// of the alphabet, i.e. 'a' to 'z'.
    pub fn of_size(size: usize) -> Self {
        assert!(size <= 26, "Alphabet is too large");
        Self((0..size).map(|i| (b'a' + i as u8) as char).collect())
    }

    /// The number of symbols.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if `symbol` belongs to the alphabet.
    pub fn contains(&self, symbol: Symbol) -> bool {
        self.position(symbol).is_some()
    }

    /// Gives the position of `symbol` in the sorted list of symbols.
    pub fn position(&self, symbol: Symbol) -> Option<usize> {
        self.0.binary_search(&symbol).ok()
    }

    /// Iterates over all symbols in ascending order.
    pub fn universe(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.0.iter().copied()
    }

    /// Gives the symbols as a sorted slice.
    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    /// Translates a word into the positions of its symbols. Fails on the first symbol that
    /// is not part of the alphabet.
    pub fn positions_of(&self, word: &[Symbol]) -> Result<Vec<usize>, InvalidSymbolError> {
        word.iter()
            .enumerate()
            .map(|(i, &symbol)| {
                self.position(symbol).ok_or(InvalidSymbolError {
                    symbol,
                    position: i + 1,
                })
            })
            .collect()
    }
}

impl std::ops::Index<usize> for Alphabet {
    type Output = Symbol;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl FromIterator<Symbol> for Alphabet {
    fn from_iter<T: IntoIterator<Item = Symbol>>(iter: T) -> Self {
        Self(iter.into_iter().unique().sorted().collect())
    }
}

impl Show for Alphabet {
    fn show(&self) -> String {
        format!("{{{}}}", self.0.iter().join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_positions() {
        let alphabet = Alphabet::of_size(3);
        assert_eq!(alphabet.symbols(), &['a', 'b', 'c']);
        assert_eq!(alphabet[2], 'c');
        assert_eq!(alphabet.positions_of(&['c', 'a']), Ok(vec![2, 0]));
        assert_eq!(
            alphabet.positions_of(&['a', 'x', 'y']),
            Err(InvalidSymbolError {
                symbol: 'x',
                position: 2
            })
        );
    }

    #[test]
    fn expressions_order_epsilon_last() {
        let mut expressions = vec![Expression::Epsilon, 'b'.into(), 'a'.into()];
        expressions.sort();
        assert_eq!(
            expressions,
            vec![
                Expression::Symbol('a'),
                Expression::Symbol('b'),
                Expression::Epsilon
            ]
        );
        assert_eq!(Expression::Epsilon.show(), "ε");
        assert!(is_reserved('λ'));
        assert!(!is_reserved('a'));
    }
}
