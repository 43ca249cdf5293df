//! A brute-force reference model for checking interval maps against

use std::{ops::Range, slice};

use crate::{lowest::Lowest, map::CanonicalIntervalMap};

/// Error produced when a [`CanonicalIntervalMap`] disagrees with a
/// [`DenseMap`] or breaks its own invariants
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError<K, V> {
    /// The map has no breakpoint at [`Lowest::LOWEST`]
    #[error("No breakpoint found at the lowest key")]
    MissingLowest,
    /// Two consecutive breakpoints hold the same value
    #[error("Breakpoint at {key:?} repeats the value of its predecessor")]
    Redundant {
        /// The key of the second, redundant breakpoint
        key: K,
    },
    /// The map returned the wrong value for a key
    #[error("Value at key {key} was {actual:?}, expected {expected:?}")]
    Mismatch {
        /// The dense index of the key
        key: usize,
        /// The value held by the reference model
        expected: V,
        /// The value returned by the map
        actual: V,
    },
    /// A dense index could not be converted to the map's key type
    #[error("Index {0} is not representable as a map key")]
    UnrepresentableKey(usize),
}

/// A plain array of values over the keys `[0, len)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct DenseMap<V>(Vec<V>);

impl<V: Clone> DenseMap<V> {
    /// Construct a dense map of `len` keys, all holding `default`
    #[must_use]
    pub fn new(len: usize, default: V) -> Self { Self(vec![default; len]) }

    /// Set every key in `range` to `value`.  The range is clamped to the
    /// length of the map, and empty or reversed ranges do nothing.
    pub fn assign(&mut self, range: Range<usize>, value: V) {
        let Range { start, end } = range;
        let end = end.min(self.0.len());

        if start < end {
            self.0[start..end].fill(value);
        }
    }
}

impl<V> DenseMap<V> {
    /// Return the value at `key`, if it is in range
    #[inline]
    #[must_use]
    pub fn get(&self, key: usize) -> Option<&V> { self.0.get(key) }

    /// Return the number of keys covered
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.0.len() }

    /// Returns whether the map covers no keys
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Iterate over the values in key order
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, V> { self.0.iter() }
}

impl<V: Clone + PartialEq> DenseMap<V> {
    /// Verify that `map` is in canonical form and agrees with this model on
    /// every key in `[0, len)`
    ///
    /// # Errors
    /// Returns the first invariant violation or disagreement found.
    pub fn check<K: Lowest + Clone + TryFrom<usize>>(
        &self,
        map: &CanonicalIntervalMap<K, V>,
    ) -> Result<(), CheckError<K, V>> {
        let mut breaks = map.breakpoints();

        let Some((first, mut last)) = breaks.next() else {
            return Err(CheckError::MissingLowest);
        };

        if *first != K::LOWEST {
            return Err(CheckError::MissingLowest);
        }

        for (key, val) in breaks {
            if val == last {
                return Err(CheckError::Redundant { key: key.clone() });
            }

            last = val;
        }

        for (i, expected) in self.0.iter().enumerate() {
            let key = K::try_from(i).map_err(|_| CheckError::UnrepresentableKey(i))?;
            let actual = map.lookup(&key);

            if actual != expected {
                return Err(CheckError::Mismatch {
                    key: i,
                    expected: expected.clone(),
                    actual: actual.clone(),
                });
            }
        }

        Ok(())
    }
}

impl<'a, V> IntoIterator for &'a DenseMap<V> {
    type IntoIter = slice::Iter<'a, V>;
    type Item = &'a V;

    #[inline]
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dense_assign() {
        let mut dense = DenseMap::new(6, 0);

        dense.assign(1..3, 1);
        dense.assign(4..2, 9);
        dense.assign(3..3, 9);
        dense.assign(4..100, 2);

        assert_eq!(dense.iter().copied().collect::<Vec<_>>(), [0, 1, 1, 0, 2, 2]);
        assert_eq!(dense.get(6), None);
        assert!(!dense.is_empty());
    }

    #[test]
    fn check_agrees() {
        let mut dense = DenseMap::new(10, 0);
        let mut map = CanonicalIntervalMap::<u8, u32>::new(0);

        for (b, e, v) in [(2, 5, 7), (4, 8, 7), (9, 10, 1), (0, 3, 2)] {
            dense.assign(b..e, v);
            map.assign(u8::try_from(b).unwrap(), u8::try_from(e).unwrap(), v);
            assert_eq!(dense.check(&map), Ok(()));
        }
    }

    #[test]
    fn check_mismatch() {
        let mut dense = DenseMap::new(10, 0);
        let mut map = CanonicalIntervalMap::<u8, u32>::new(0);

        dense.assign(2..5, 7);
        map.assign(2, 6, 7);

        assert_eq!(
            dense.check(&map),
            Err(CheckError::Mismatch {
                key: 5,
                expected: 0,
                actual: 7,
            })
        );
    }

    #[test]
    fn check_unrepresentable() {
        let dense = DenseMap::new(300, 0);
        let map = CanonicalIntervalMap::<u8, u32>::new(0);

        assert_eq!(dense.check(&map), Err(CheckError::UnrepresentableKey(256)));
    }

    #[test]
    fn error_messages() {
        let err = CheckError::<u8, char>::Mismatch {
            key: 3,
            expected: 'a',
            actual: 'b',
        };
        assert_eq!(err.to_string(), "Value at key 3 was 'b', expected 'a'");

        let err = CheckError::<u8, char>::Redundant { key: 4 };
        assert_eq!(err.to_string(), "Breakpoint at 4 repeats the value of its predecessor");
    }
}
