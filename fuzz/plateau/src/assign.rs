use arbitrary::Arbitrary;
use plateau::{CanonicalIntervalMap, oracle::DenseMap};

const KEYS: usize = 1 << u8::BITS;

#[derive(Debug, Clone, Copy, Arbitrary)]
pub struct Op {
    begin: u8,
    end: u8,
    value: u8,
}

pub fn run_differential(default: u8, ops: &[Op]) {
    let mut map = CanonicalIntervalMap::<u8, u8>::new(default);
    let mut dense = DenseMap::new(KEYS, default);

    for &Op { begin, end, value } in ops {
        let before = map.breakpoints().len();

        map.assign(begin, end, value);
        dense.assign(begin.into()..end.into(), value);

        map.assert_invariants();
        assert!(map.breakpoints().len() <= before + 2, "{map:?}");

        if let Err(e) = dense.check(&map) {
            panic!("{e} after {begin}..{end} = {value}: {map:?}");
        }
    }

    let rebuilt = CanonicalIntervalMap::from_iter_with_default(
        ops.iter().map(|&Op { begin, end, value }| (begin..end, value)),
        default,
    );
    assert_eq!(map, rebuilt);
}
