//! The canonical piecewise-constant map

use std::{
    borrow::Borrow,
    collections::{
        BTreeMap,
        btree_map::{self, Entry},
    },
    fmt, iter,
    ops::{Bound, Index, Range},
};

use crate::lowest::Lowest;

/// A half-open run of keys `[start, end)`, unbounded above when `end` is
/// `None`
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval<T> {
    /// The first key of the run (inclusive)
    pub start: T,
    /// The first key past the run (exclusive), if any
    pub end: Option<T>,
}

impl<T: fmt::Debug> fmt::Debug for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(ref e) => fmt::Debug::fmt(&(&self.start..e), f),
            None => fmt::Debug::fmt(&(&self.start..), f),
        }
    }
}

impl<T> Interval<T> {
    /// Borrow the bounds of this interval
    #[must_use]
    pub fn as_ref(&self) -> Interval<&T> {
        let Self { start, end } = self;
        Interval {
            start,
            end: end.as_ref(),
        }
    }
}

impl<K: Ord> Interval<&K> {
    /// Returns whether `key` lies inside this run
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.start <= key && self.end.is_none_or(|e| key < e)
    }
}

impl<K: Clone> Interval<&K> {
    /// Clone the bounds out of a borrowed interval
    #[must_use]
    pub fn cloned(self) -> Interval<K> {
        let Self { start, end } = self;
        Interval {
            start: start.clone(),
            end: end.cloned(),
        }
    }
}

/// A total function from `K` to `V`, stored as the ordered set of keys at
/// which its value changes.
///
/// Each breakpoint `(k, v)` states that the function is `v` from `k` up to
/// the next breakpoint.  The map upholds two invariants after every
/// mutation:
///
/// - there is always a breakpoint at [`Lowest::LOWEST`], so every key has a
///   value, and
/// - no two consecutive breakpoints hold equal values.
///
/// Together these make the representation unique, so two maps compare equal
/// exactly when they describe the same function.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalIntervalMap<K, V> {
    breakpoints: BTreeMap<K, V>,
}

impl<K: Lowest, V: Default> Default for CanonicalIntervalMap<K, V> {
    fn default() -> Self { Self::new(V::default()) }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for CanonicalIntervalMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.intervals()
            .fold(&mut f.debug_map(), |d, (k, v)| d.entry(&k, v))
            .finish()
    }
}

impl<K: Lowest, V> CanonicalIntervalMap<K, V> {
    /// Construct a map with the value `default` over the whole domain
    #[must_use]
    pub fn new(default: V) -> Self {
        let mut breakpoints = BTreeMap::new();
        breakpoints.insert(K::LOWEST, default);
        Self { breakpoints }
    }
}

impl<K, V> CanonicalIntervalMap<K, V> {
    /// Iterate over the raw breakpoints in key order
    #[inline]
    #[must_use]
    pub fn breakpoints(&self) -> Breakpoints<'_, K, V> { Breakpoints(self.breakpoints.iter()) }

    /// Consume the map, yielding its breakpoints in key order
    #[inline]
    #[must_use]
    pub fn into_breakpoints(self) -> IntoBreakpoints<K, V> {
        IntoBreakpoints(self.breakpoints.into_iter())
    }

    /// Iterate over the maximal runs of equal value in key order
    #[inline]
    #[must_use]
    pub fn intervals(&self) -> Intervals<'_, K, V> {
        Intervals(self.breakpoints.iter().peekable())
    }
}

#[cfg(any(test, feature = "test"))]
impl<K: Lowest + fmt::Debug, V: PartialEq + fmt::Debug> CanonicalIntervalMap<K, V> {
    /// Panic if the map is missing its lowest breakpoint or holds two equal
    /// neighbours
    pub fn assert_invariants(&self) {
        assert!(
            self.breakpoints.first_key_value().is_some_and(|(k, _)| *k == K::LOWEST),
            "Missing breakpoint at {:?} in {self:?}",
            K::LOWEST,
        );

        let mut last = None;
        for (key, val) in &self.breakpoints {
            assert!(
                last.replace(val) != Some(val),
                "Redundant breakpoint at {key:?} in {self:?}"
            );
        }
    }
}

impl<K: Ord, V> CanonicalIntervalMap<K, V> {
    /// Return the value of the function at `key`
    #[inline]
    pub fn lookup<Q: ?Sized + Ord>(&self, key: &Q) -> &V
    where K: Borrow<Q> {
        self.breakpoints
            .range((Bound::Unbounded, Bound::Included(key)))
            .next_back()
            .map_or_else(|| unreachable!("Key precedes the lowest breakpoint"), |(_, v)| v)
    }

    /// Return the maximal run of equal value containing `key`, along with its
    /// value
    pub fn interval<Q: ?Sized + Ord>(&self, key: &Q) -> (Interval<&K>, &V)
    where K: Borrow<Q> {
        let Some((start, value)) = self
            .breakpoints
            .range((Bound::Unbounded, Bound::Included(key)))
            .next_back()
        else {
            unreachable!("Key precedes the lowest breakpoint")
        };
        let end = self
            .breakpoints
            .range((Bound::Excluded(key), Bound::Unbounded))
            .next()
            .map(|(k, _)| k);

        (Interval { start, end }, value)
    }
}

impl<K: Clone + Ord, V: Clone + PartialEq> CanonicalIntervalMap<K, V> {
    /// Construct a map with the value `default`, then assign each range in
    /// `it` in order
    pub fn from_iter_with_default<I: IntoIterator<Item = (Range<K>, V)>>(
        it: I,
        default: V,
    ) -> Self
    where
        K: Lowest,
    {
        let mut me = Self::new(default);
        me.extend(it);
        me
    }

    fn assign_internal(&mut self, begin: K, end: K, value: V, over: &mut Vec<K>) {
        if begin >= end {
            return;
        }

        debug_assert!(over.is_empty());
        over.extend(
            self.breakpoints
                .range((Bound::Excluded(&begin), Bound::Excluded(&end)))
                .map(|(k, _)| k.clone()),
        );

        // The value in effect just before `end` is held by the last interior
        // breakpoint, or by whatever governs `begin` if there are none
        let tail = match over.pop() {
            Some(key) => self
                .breakpoints
                .remove(&key)
                .unwrap_or_else(|| unreachable!()),
            None => self.lookup(&begin).clone(),
        };

        for key in over.drain(..) {
            let ok = self.breakpoints.remove(&key).is_some();
            debug_assert!(ok);
        }

        match self.breakpoints.entry(end) {
            Entry::Occupied(o) if *o.get() == value => {
                o.remove();
            },
            Entry::Vacant(v) if tail != value => {
                v.insert(tail);
            },
            Entry::Occupied(_) | Entry::Vacant(_) => (),
        }

        let joins_prev = self
            .breakpoints
            .range((Bound::Unbounded, Bound::Excluded(&begin)))
            .next_back()
            .is_some_and(|(_, v)| *v == value);

        match self.breakpoints.entry(begin) {
            Entry::Occupied(o) if joins_prev => {
                o.remove();
            },
            Entry::Occupied(mut o) => {
                o.insert(value);
            },
            Entry::Vacant(v) if !joins_prev => {
                v.insert(value);
            },
            Entry::Vacant(_) => (),
        }
    }

    /// Set the function to `value` for every key in `[begin, end)`.
    ///
    /// Keys outside the range are unaffected.  If `!(begin < end)` the range
    /// is empty and nothing happens.
    #[inline]
    pub fn assign(&mut self, begin: K, end: K, value: V) {
        self.assign_internal(begin, end, value, &mut vec![]);
    }
}

impl<K: Ord, Q: ?Sized + Ord, V> Index<&Q> for CanonicalIntervalMap<K, V>
where K: Borrow<Q>
{
    type Output = V;

    #[inline]
    fn index(&self, key: &Q) -> &V { self.lookup(key) }
}

impl<K: Clone + Ord, V: Clone + PartialEq> Extend<(Range<K>, V)> for CanonicalIntervalMap<K, V> {
    fn extend<I: IntoIterator<Item = (Range<K>, V)>>(&mut self, it: I) {
        let mut over = vec![];

        for (Range { start, end }, value) in it {
            self.assign_internal(start, end, value, &mut over);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a CanonicalIntervalMap<K, V> {
    type IntoIter = Breakpoints<'a, K, V>;
    type Item = (&'a K, &'a V);

    #[inline]
    fn into_iter(self) -> Self::IntoIter { self.breakpoints() }
}

impl<K, V> IntoIterator for CanonicalIntervalMap<K, V> {
    type IntoIter = IntoBreakpoints<K, V>;
    type Item = (K, V);

    #[inline]
    fn into_iter(self) -> Self::IntoIter { self.into_breakpoints() }
}

/// Iterator over the breakpoints of a [`CanonicalIntervalMap`]
#[derive(Debug, Clone)]
#[repr(transparent)]
pub struct Breakpoints<'a, K, V>(btree_map::Iter<'a, K, V>);

impl<'a, K, V> Iterator for Breakpoints<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> { self.0.next() }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<K, V> DoubleEndedIterator for Breakpoints<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> { self.0.next_back() }
}

impl<K, V> ExactSizeIterator for Breakpoints<'_, K, V> {}

impl<K, V> iter::FusedIterator for Breakpoints<'_, K, V> {}

/// Owning iterator over the breakpoints of a [`CanonicalIntervalMap`]
#[derive(Debug)]
#[repr(transparent)]
pub struct IntoBreakpoints<K, V>(btree_map::IntoIter<K, V>);

impl<K, V> Iterator for IntoBreakpoints<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> { self.0.next() }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<K, V> DoubleEndedIterator for IntoBreakpoints<K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> { self.0.next_back() }
}

impl<K, V> ExactSizeIterator for IntoBreakpoints<K, V> {}

impl<K, V> iter::FusedIterator for IntoBreakpoints<K, V> {}

/// Iterator over the runs of a [`CanonicalIntervalMap`]
#[derive(Debug, Clone)]
#[repr(transparent)]
pub struct Intervals<'a, K, V>(iter::Peekable<btree_map::Iter<'a, K, V>>);

impl<'a, K, V> Iterator for Intervals<'a, K, V> {
    type Item = (Interval<&'a K>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (start, value) = self.0.next()?;
        let end = self.0.peek().map(|&(k, _)| k);
        Some((Interval { start, end }, value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<K, V> ExactSizeIterator for Intervals<'_, K, V> {}

impl<K, V> iter::FusedIterator for Intervals<'_, K, V> {}
