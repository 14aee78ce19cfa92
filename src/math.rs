use std::{collections::BTreeSet, hash::Hash};

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;
/// Type alias for sets whose iteration order must be deterministic.
pub type OrderedSet<S> = BTreeSet<S>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa.
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;

/// States of an automaton are stored in the order of their labels, the position of a
/// state in that order is its index.
pub type StateIndex = usize;

/// A set of state indices, backed by a bit vector over the stable state ordering.
pub type IndexSet = bit_set::BitSet;

/// A partition is a different view on an equivalence relation, by grouping elements of
/// type `I` into their respective classes under the relation.
#[derive(Debug, Clone)]
pub struct Partition<I: Hash + Eq>(Vec<BTreeSet<I>>);

impl<I: Hash + Eq> std::ops::Deref for Partition<I> {
    type Target = Vec<BTreeSet<I>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a, I: Hash + Eq> IntoIterator for &'a Partition<I> {
    type Item = &'a BTreeSet<I>;
    type IntoIter = std::slice::Iter<'a, BTreeSet<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<I: Hash + Eq> PartialEq for Partition<I> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|o| other.contains(o))
    }
}
impl<I: Hash + Eq> Eq for Partition<I> {}

impl<I: Hash + Eq + Ord + Copy> Partition<I> {
    /// Returns the size of the partition, i.e. the number of classes.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Builds a new partition from an iterator that yields iterators which yield elements
    /// of type `I`. Empty classes are dropped.
    pub fn new<X: IntoIterator<Item = I>, Y: IntoIterator<Item = X>>(iter: Y) -> Self {
        Self(
            iter.into_iter()
                .map(|it| it.into_iter().collect::<BTreeSet<_>>())
                .filter(|class| !class.is_empty())
                .collect(),
        )
    }

    /// Groups elements by the class identifier that `class_of` assigns to them. Classes
    /// are ordered by their least element.
    pub fn from_classes<X: IntoIterator<Item = I>>(
        elements: X,
        class_of: impl Fn(I) -> usize,
    ) -> Self {
        let mut classes: Vec<BTreeSet<I>> = vec![];
        let mut position: Map<usize, usize> = Map::default();
        for element in elements {
            let id = class_of(element);
            let pos = *position.entry(id).or_insert_with(|| {
                classes.push(BTreeSet::new());
                classes.len() - 1
            });
            classes[pos].insert(element);
        }
        classes.sort_by(|x, y| x.first().cmp(&y.first()));
        Self(classes)
    }

    /// Tries to find the position of the class containing `element`.
    pub fn class_of(&self, element: &I) -> Option<usize> {
        self.0.iter().position(|class| class.contains(element))
    }
}

impl<I: Hash + Eq + Ord> From<Vec<BTreeSet<I>>> for Partition<I> {
    fn from(value: Vec<BTreeSet<I>>) -> Self {
        Self(value)
    }
}
