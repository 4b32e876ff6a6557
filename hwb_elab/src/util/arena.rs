use std::fmt::{Debug, Formatter};
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Declares a new key type for use with [Arena].
/// Each key type should be used with exactly one arena,
/// which is checked at runtime on a best-effort basis.
#[macro_export]
macro_rules! new_index_type {
    ($vis:vis $name:ident) => {
        #[derive(Copy, Clone, Eq, PartialEq, Hash)]
        $vis struct $name($crate::util::arena::Idx);

        // trick to make the imports not leak outside of the macro
        const _: () = {
            use $crate::util::arena::Idx;
            use $crate::util::arena::IndexType;

            impl IndexType for $name {
                fn new(idx: Idx) -> Self {
                    Self(idx)
                }
                fn inner(&self) -> Idx {
                    self.0
                }
            }

            impl std::fmt::Debug for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "<{} {}>", stringify!($name), self.0.index())
                }
            }
        };
    };
}

pub trait IndexType: Sized + Debug + Copy + Eq + Hash {
    fn new(idx: Idx) -> Self;
    fn inner(&self) -> Idx;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Idx {
    index: usize,
    check: u64,
}

impl Idx {
    pub fn index(&self) -> usize {
        self.index
    }
}

pub struct Arena<K: IndexType, T> {
    values: Vec<T>,
    check: u64,
    ph: PhantomData<K>,
}

impl<K: IndexType, T> Arena<K, T> {
    pub fn push(&mut self, value: T) -> K {
        let key = K::new(Idx {
            index: self.values.len(),
            check: self.check,
        });
        self.values.push(value);
        key
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> {
        let check = self.check;
        self.values
            .iter()
            .enumerate()
            .map(move |(index, value)| (K::new(Idx { index, check }), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    fn check_key(&self, key: K) {
        assert_eq!(
            self.check,
            key.inner().check,
            "Arena index {:?} used in arena which did not create it",
            key
        );
    }
}

impl<K: IndexType, T> Index<K> for Arena<K, T> {
    type Output = T;
    fn index(&self, key: K) -> &Self::Output {
        self.check_key(key);
        &self.values[key.inner().index]
    }
}

impl<K: IndexType, T> IndexMut<K> for Arena<K, T> {
    fn index_mut(&mut self, key: K) -> &mut Self::Output {
        self.check_key(key);
        &mut self.values[key.inner().index]
    }
}

impl<K: IndexType, T> Default for Arena<K, T> {
    fn default() -> Self {
        Self {
            values: vec![],
            check: rand::random(),
            ph: PhantomData,
        }
    }
}

impl<K: IndexType, T: Debug> Debug for Arena<K, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod test {
    use crate::util::arena::Arena;

    new_index_type!(TestIdx);

    #[test]
    fn push_and_index() {
        let mut arena: Arena<TestIdx, char> = Default::default();
        let ai = arena.push('a');
        let bi = arena.push('b');
        assert_eq!(arena[ai], 'a');
        assert_eq!(arena[bi], 'b');
        assert_ne!(ai, bi);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn iter_in_push_order() {
        let mut arena: Arena<TestIdx, char> = Default::default();
        let ai = arena.push('a');
        let bi = arena.push('b');
        let actual: Vec<(TestIdx, &char)> = arena.iter().collect();
        assert_eq!(actual, vec![(ai, &'a'), (bi, &'b')]);
    }
}
