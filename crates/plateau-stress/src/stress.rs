use std::io::prelude::*;

use anyhow::{Context, Result};
use plateau::{CanonicalIntervalMap, oracle::DenseMap};
use rand::{Rng, SeedableRng, rngs::StdRng};

#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub seed: u64,
    pub iterations: u64,
    pub keys: u32,
    pub values: u32,
    pub check_every: u64,
}

#[derive(Debug)]
pub struct Report {
    pub map: CanonicalIntervalMap<u32, u32>,
    pub dense: DenseMap<u32>,
    pub no_ops: u64,
    pub checks: u64,
}

fn check(report: &mut Report, iteration: u64) -> Result<()> {
    let _s = tracing::debug_span!("check", iteration).entered();

    report
        .dense
        .check(&report.map)
        .with_context(|| format!("Map diverged after {iteration} assignment(s)"))?;
    report.checks += 1;

    tracing::trace!(breakpoints = report.map.breakpoints().len(), "Check passed");
    Ok(())
}

pub fn run(config: &Config) -> Result<Report> {
    let &Config {
        seed,
        iterations,
        keys,
        values,
        check_every,
    } = config;

    let _s = tracing::info_span!("stress", seed).entered();
    tracing::debug!(iterations, keys, values, "Starting stress run");

    let mut rng = StdRng::seed_from_u64(seed);
    let mut report = Report {
        map: CanonicalIntervalMap::new(0),
        dense: DenseMap::new(keys as usize, 0),
        no_ops: 0,
        checks: 0,
    };

    for i in 1..=iterations {
        let begin = rng.gen_range(0..=keys);
        let end = rng.gen_range(0..=keys);
        let value = rng.gen_range(0..values);

        tracing::trace!(begin, end, value, "assign");

        if begin >= end {
            report.no_ops += 1;
        }

        report.map.assign(begin, end, value);
        report.dense.assign(begin as usize..end as usize, value);

        if check_every != 0 && i % check_every == 0 {
            check(&mut report, i)?;
        }

        if i % (1 << 16) == 0 {
            tracing::debug!(
                iteration = i,
                breakpoints = report.map.breakpoints().len(),
                "Progress"
            );
        }
    }

    check(&mut report, iterations)?;

    Ok(report)
}

pub fn dump(report: &Report, mut out: impl Write) -> Result<()> {
    for (i, v) in report.dense.iter().enumerate() {
        writeln!(out, "{i} {v}")?;
    }

    writeln!(out)?;

    for (k, v) in &report.map {
        writeln!(out, "{k} {v}")?;
    }

    out.flush()?;
    Ok(())
}
