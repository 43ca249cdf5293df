//! Key types with a minimum representable value

use std::time::Duration;

/// A totally ordered type with a least element.
///
/// [`CanonicalIntervalMap`](crate::CanonicalIntervalMap) anchors its first
/// breakpoint at [`Lowest::LOWEST`], so every key compares greater than or
/// equal to it.  Implementations must uphold `Self::LOWEST <= k` for all `k`.
///
/// Key types with no natural minimum can be wrapped in [`Option`], whose
/// `None` sorts before every `Some(_)` and acts as an open lower bound.
pub trait Lowest: Ord {
    /// The least value of the type
    const LOWEST: Self;
}

macro_rules! min_impl {
    () => {};

    ($t:ty $(, $($tt:tt)*)?) => {
        impl Lowest for $t {
            const LOWEST: Self = <$t>::MIN;
        }

        min_impl!($($($tt)*)?);
    };
}

min_impl!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, char
);

impl Lowest for bool {
    const LOWEST: Self = false;
}

impl Lowest for () {
    const LOWEST: Self = ();
}

impl Lowest for Duration {
    const LOWEST: Self = Duration::ZERO;
}

impl Lowest for String {
    const LOWEST: Self = String::new();
}

impl Lowest for &str {
    const LOWEST: Self = "";
}

impl<T: Ord> Lowest for Vec<T> {
    const LOWEST: Self = Vec::new();
}

impl<T: Ord> Lowest for Option<T> {
    const LOWEST: Self = None;
}

macro_rules! tuple_impl {
    ($($t:ident),+) => {
        impl<$($t: Lowest),+> Lowest for ($($t,)+) {
            const LOWEST: Self = ($($t::LOWEST,)+);
        }
    };
}

tuple_impl!(A);
tuple_impl!(A, B);
tuple_impl!(A, B, C);
tuple_impl!(A, B, C, D);

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    fn assert_lowest<T: Lowest + std::fmt::Debug>(val: &T) {
        assert!(T::LOWEST <= *val, "{:?} > {val:?}", T::LOWEST);
    }

    #[test]
    fn char_is_nul() {
        assert_eq!(char::LOWEST, '\0');
    }

    #[test]
    fn open_bound_sorts_first() {
        assert!(Option::<i64>::LOWEST < Some(i64::MIN));
        assert!(Option::<String>::LOWEST < Some(String::new()));
    }

    proptest! {
        #[test]
        fn ints(a in any::<i32>(), b in any::<u64>(), c in any::<i128>()) {
            assert_lowest(&a);
            assert_lowest(&b);
            assert_lowest(&c);
        }

        #[test]
        fn strings(s in ".*") {
            assert_lowest(&s);
            assert_lowest(&s.as_str());
        }

        #[test]
        fn vecs(v in prop::collection::vec(any::<u8>(), 0..16)) {
            assert_lowest(&v);
        }

        #[test]
        fn tuples(a in any::<i8>(), b in any::<bool>(), c in any::<char>()) {
            assert_lowest(&(a, b, c));
            assert_lowest(&(Some(a), ()));
        }

        #[test]
        fn durations(d in any::<Duration>()) {
            assert_lowest(&d);
            assert!(Duration::LOWEST <= d.saturating_sub(d));
        }
    }
}
