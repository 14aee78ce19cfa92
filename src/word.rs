use crate::alphabet::Symbol;

/// A finite word, i.e. a finite sequence of symbols that can be read by an automaton.
///
/// This is implemented for string types (each `char` is one symbol) as well as for slices,
/// arrays and vectors of symbols.
pub trait Word {
    /// Collects the symbols of `self` in order.
    fn symbols(&self) -> Vec<Symbol>;

    /// The number of symbols in `self`.
    fn length(&self) -> usize {
        self.symbols().len()
    }
}

impl Word for str {
    fn symbols(&self) -> Vec<Symbol> {
        self.chars().collect()
    }

    fn length(&self) -> usize {
        self.chars().count()
    }
}

impl Word for String {
    fn symbols(&self) -> Vec<Symbol> {
        self.as_str().symbols()
    }

    fn length(&self) -> usize {
        self.as_str().length()
    }
}

impl Word for [Symbol] {
    fn symbols(&self) -> Vec<Symbol> {
        self.to_vec()
    }

    fn length(&self) -> usize {
        self.len()
    }
}

impl Word for Vec<Symbol> {
    fn symbols(&self) -> Vec<Symbol> {
        self.clone()
    }

    fn length(&self) -> usize {
        self.len()
    }
}

impl<const N: usize> Word for [Symbol; N] {
    fn symbols(&self) -> Vec<Symbol> {
        self.to_vec()
    }

    fn length(&self) -> usize {
        N
    }
}

#[cfg(test)]
mod tests {
    use super::Word;

    #[test]
    fn words_from_strings_and_slices() {
        assert_eq!("abc".symbols(), vec!['a', 'b', 'c']);
        assert_eq!(String::from("λx").length(), 2);
        assert_eq!(['a', 'b'].symbols(), vec!['a', 'b']);
        assert_eq!(vec!['z'].length(), 1);
        assert_eq!("".length(), 0);
    }
}
