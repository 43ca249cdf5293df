use fuzz_plateau::assign::{Op, run_differential};

fn main() {
    afl::fuzz!(|data: (u8, Vec<Op>)| {
        let (default, ops) = data;
        run_differential(default, &ops);
    });
}
