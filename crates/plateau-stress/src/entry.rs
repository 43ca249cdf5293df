use anyhow::{Context, Result, ensure};
use clap::Parser;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, prelude::*};

use crate::stress::{self, Config};

#[derive(Debug, Parser)]
#[command(version, author, about)]
struct Opts {
    /// Print more verbose logs
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log filter, using env_logger-like syntax.  Overrides --verbose
    #[arg(long, env = "RUST_LOG")]
    log_filter: Option<String>,

    /// Seed for the random operation stream.  Chosen at random if omitted
    #[arg(long, env = "PLATEAU_SEED")]
    seed: Option<u64>,

    /// Number of random assignments to perform
    #[arg(short = 'n', long, default_value_t = 1 << 20)]
    iterations: u64,

    /// Size of the key domain under test
    #[arg(long, default_value_t = 10)]
    keys: u32,

    /// Number of distinct values to assign
    #[arg(long, default_value_t = 10)]
    values: u32,

    /// Compare against the reference model every N assignments, or only at
    /// the end if 0
    #[arg(long, default_value_t = 1)]
    check_every: u64,

    /// Print the final reference model and breakpoints
    #[arg(long)]
    dump: bool,
}

fn init_subscriber(verbose: u8, log_filter: Option<&str>) -> Result<()> {
    let filter = match log_filter {
        Some(f) => EnvFilter::try_new(f).with_context(|| format!("Invalid log filter {f:?}"))?,
        None => EnvFilter::builder()
            .with_default_directive(
                match (cfg!(debug_assertions), verbose) {
                    (false, 0) => LevelFilter::INFO,
                    (false, 1) | (true, 0) => LevelFilter::DEBUG,
                    _ => LevelFilter::TRACE,
                }
                .into(),
            )
            .parse_lossy(""),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(false)
                .with_line_number(false),
        )
        .with(filter)
        .try_init()
        .context("Error initializing logger")
}

#[inline]
pub fn main() {
    let opts = Opts::parse();

    if let Err(e) = init_subscriber(opts.verbose, opts.log_filter.as_deref()) {
        eprintln!("{e:?}");
        std::process::exit(1);
    }

    tracing::debug!("{opts:#?}");

    std::process::exit(run(opts).map_or_else(
        |e| {
            tracing::error!("{e:?}");
            1
        },
        |()| 0,
    ));
}

#[inline]
fn run(
    Opts {
        verbose: _,
        log_filter: _,
        seed,
        iterations,
        keys,
        values,
        check_every,
        dump,
    }: Opts,
) -> Result<()> {
    ensure!(keys > 0, "Key domain must not be empty");
    ensure!(values > 0, "Value alphabet must not be empty");

    let seed = seed.unwrap_or_else(rand::random);

    let config = Config {
        seed,
        iterations,
        keys,
        values,
        check_every,
    };

    let report = stress::run(&config).with_context(|| format!("Stress run failed (seed {seed})"))?;

    tracing::info!(
        seed,
        iterations,
        breakpoints = report.map.breakpoints().len(),
        no_ops = report.no_ops,
        checks = report.checks,
        "Stress run passed",
    );

    if dump {
        stress::dump(&report, std::io::stdout().lock()).context("Error writing dump")?;
    }

    Ok(())
}
