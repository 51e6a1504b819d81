//! Explore the branches of a random program and prune infeasible paths.
//!
//! Every branch condition is a small random clause over the program's
//! inputs. The explorer extends the path condition with the condition (or
//! its negation) at each branch and asks the oracle whether the path is
//! still feasible. Path prefixes are shared between siblings, so most
//! queries hit the formula cache.
//!
//! Run with:
//! ```bash
//! cargo run --example path_conditions -- --backend fraig --vars 12 --depth 10 --precheck
//! ```

use clap::Parser;
use color_eyre::eyre::ensure;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use satexpr::backend::{Backend, BackendKind};
use satexpr::config::Config;
use satexpr::formula::Formula;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Backend tag (`native`, `fraig`, ...).
    #[clap(long, value_name = "TAG", default_value = "native")]
    backend: String,

    /// Number of program inputs.
    #[clap(long, value_name = "INT", default_value = "10")]
    vars: usize,

    /// Number of nested branches.
    #[clap(long, value_name = "INT", default_value = "8")]
    depth: usize,

    /// Literals per branch condition.
    #[clap(long, value_name = "INT", default_value = "2")]
    width: usize,

    /// Diagnostics level (above 4 prints every solver call).
    #[clap(long, value_name = "INT", default_value = "0")]
    verbosity: u8,

    /// Try bounded simulation before the exact solver.
    #[clap(long)]
    precheck: bool,

    /// Random seed.
    #[clap(long, value_name = "INT", default_value = "42")]
    seed: u64,
}

struct Explorer {
    oracle: Backend,
    inputs: Vec<Formula>,
    conditions: Vec<Formula>,
    feasible: usize,
    pruned: usize,
}

impl Explorer {
    fn explore(&mut self, pc: Formula, depth: usize) -> color_eyre::Result<()> {
        if !self.oracle.is_sat(pc)? {
            self.pruned += 1;
            return Ok(());
        }
        if depth == self.conditions.len() {
            self.feasible += 1;
            return Ok(());
        }
        let cond = self.conditions[depth];
        let taken = self.oracle.and(pc, cond);
        self.explore(taken, depth + 1)?;
        let not_cond = self.oracle.not(cond);
        let skipped = self.oracle.and(pc, not_cond);
        self.explore(skipped, depth + 1)
    }
}

/// `depth` random clauses of `width` literals over `inputs`.
fn random_conditions(
    oracle: &mut Backend,
    inputs: &[Formula],
    depth: usize,
    width: usize,
    seed: u64,
) -> color_eyre::Result<Vec<Formula>> {
    ensure!(
        width == 0 || !inputs.is_empty(),
        "branch conditions of width {} need at least one input variable",
        width
    );

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut conditions = Vec::with_capacity(depth);
    for _ in 0..depth {
        let mut lits = Vec::with_capacity(width);
        for _ in 0..width {
            let v = inputs[rng.gen_range(0..inputs.len())];
            lits.push(if rng.gen_bool(0.5) { oracle.not(v) } else { v });
        }
        conditions.push(oracle.or_many(lits));
    }
    Ok(conditions)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbosity > 4 {
            simplelog::LevelFilter::Trace
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    println!("args = {:?}", args);
    let time_total = std::time::Instant::now();

    let kind: BackendKind = args.backend.parse()?;
    let config = Config::default()
        .with_backend(kind)
        .with_fraig_precheck(args.precheck)
        .with_seed(args.seed)
        .with_verbosity(args.verbosity);
    let mut oracle = Backend::from_config(&config)?;

    let inputs: Vec<Formula> = (0..args.vars).map(|_| oracle.new_var()).collect();

    let conditions = random_conditions(&mut oracle, &inputs, args.depth, args.width, args.seed)?;

    let mut explorer = Explorer {
        oracle,
        inputs,
        conditions,
        feasible: 0,
        pruned: 0,
    };
    let root = explorer.oracle.const_true();
    explorer.explore(root, 0)?;

    println!("backend: {}", explorer.oracle.kind());
    println!("inputs: {}", explorer.inputs.len());
    println!("feasible paths: {}", explorer.feasible);
    println!("pruned paths: {}", explorer.pruned);
    println!("cache entries: {}", explorer.oracle.num_entries());
    println!("stats: {:?}", explorer.oracle.stats());
    println!("total time: {:.3} s", time_total.elapsed().as_secs_f64());

    Ok(())
}
