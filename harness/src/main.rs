use std::process;

use argh::FromArgs;
use mapalloc_bench::config::{BenchConfig, ConfigError, DEFAULT_ALLOCATIONS, DEFAULT_MAX_ALLOC_SIZE};
use mapalloc_bench::distribution::Distribution;
use mapalloc_bench::report;
use mapalloc_bench::scenario::Bench;
use mapalloc_bench::size::parse_size;
use mapalloc_bench::target::{MapTarget, SystemTarget, Target, TargetKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Measure allocate, zero-allocate, resize and release latency.
#[derive(Debug, FromArgs)]
struct Args {
    /// number of calls per scenario
    #[argh(option, short = 'n', default = "DEFAULT_ALLOCATIONS")]
    allocations: usize,
    /// largest request size, with an optional K, M or G suffix
    #[argh(
        option,
        short = 's',
        default = "DEFAULT_MAX_ALLOC_SIZE",
        from_str_fn(parse_size_arg)
    )]
    max_size: usize,
    /// size distribution: uniform (0), weighted (1) or exponential (2)
    #[argh(option, short = 'd', default = "Distribution::Exponential")]
    distribution: Distribution,
    /// write every payload byte after allocating
    #[argh(switch, short = 'm')]
    memset: bool,
    /// seed for the size generator
    #[argh(option)]
    seed: Option<u64>,
    /// allocator to measure: mapalloc or system
    #[argh(option, default = "TargetKind::Mapalloc")]
    target: TargetKind,
}

fn parse_size_arg(value: &str) -> Result<usize, String> {
    parse_size(value).map_err(|err| err.to_string())
}

impl From<Args> for BenchConfig {
    fn from(args: Args) -> Self {
        BenchConfig {
            allocations: args.allocations,
            max_alloc_size: args.max_size,
            distribution: args.distribution,
            memset: args.memset,
            seed: args.seed,
            target: args.target,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn measure<T: Target>(config: &BenchConfig, target: &T) {
    let histograms = Bench::new(config, target).run();

    println!("{}", report::render_all(histograms.named()));
}

fn run(config: &BenchConfig) -> Result<(), ConfigError> {
    config.validate()?;

    info!(
        allocations = config.allocations,
        max_alloc_size = config.max_alloc_size,
        distribution = %config.distribution,
        memset = config.memset,
        allocator = %config.target,
        "starting benchmark"
    );

    match config.target {
        TargetKind::Mapalloc => measure(config, &MapTarget::new()),
        TargetKind::System => measure(config, &SystemTarget),
    }

    Ok(())
}

fn main() {
    init_logging();

    let args: Args = argh::from_env();
    let config = BenchConfig::from(args);

    if let Err(err) = run(&config) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}
