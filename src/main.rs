//! parbench CLI Entry Point
//!
//! Resolves the run configuration, executes one kernel and prints its
//! record to stdout. Logs and errors go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Multiply two 1024x1024 matrices on 8 threads
//! parbench matmul --size 1024 --threads 8
//!
//! # Defaults from the environment
//! BENCH_SIZE=10000000 BENCH_THREADS=4 parbench mcpi
//!
//! # Stencil with an explicit iteration count
//! parbench stencil --size 512 --threads 4 --iters 200
//! ```

use std::process::ExitCode;

use log::{debug, error};

use parbench::config::resolver::{
    DEFAULT_ITERATION_COUNT, DEFAULT_PROBLEM_SIZE, DEFAULT_THREAD_COUNT,
};
use parbench::config::{requests_verbose, resolve_from_process, Command};
use parbench::execution::Engine;
use parbench::monitoring::MetricsReporter;
use parbench::{APP_NAME, VERSION};

/// Configures the logging system. Output goes to stderr so stdout holds
/// only the benchmark record.
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            use std::io::Write;

            match record.level() {
                log::Level::Warn | log::Level::Error => {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .init();
}

/// Prints usage information.
fn print_usage() {
    eprintln!("Usage: parbench <PROBLEM> [OPTIONS]");
    eprintln!();
    eprintln!("Problems:");
    eprintln!("  matmul              Dense square matrix multiplication");
    eprintln!("  mcpi                Monte Carlo estimation of pi");
    eprintln!("  stencil             Iterative 4-point stencil diffusion");
    eprintln!();
    eprintln!("Options:");
    eprintln!(
        "  --size N            Matrix/grid dimension or sample count (default: {}, env BENCH_SIZE)",
        DEFAULT_PROBLEM_SIZE
    );
    eprintln!(
        "  --threads N         Worker threads (default: {}, env BENCH_THREADS)",
        DEFAULT_THREAD_COUNT
    );
    eprintln!(
        "  --iters N           Stencil iterations (default: {}, env BENCH_ITERS)",
        DEFAULT_ITERATION_COUNT
    );
    eprintln!("  --verbose           Enable debug logging");
    eprintln!("  --help              Show this help message");
    eprintln!("  --version           Show version information");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  parbench matmul --size 512 --threads 4");
    eprintln!("  parbench stencil --size 1024 --iters 50");
}

/// Main application entry point.
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    // Resolution logs environment fallbacks, so the logger comes first.
    setup_logging(requests_verbose(&args));

    let command = resolve_from_process(&args).map_err(|e| {
        eprintln!("Error: {}", e);
        eprintln!();
        print_usage();
        e
    })?;

    let invocation = match command {
        Command::Help => {
            print_usage();
            return Ok(());
        }
        Command::Version => {
            println!("{} {}", APP_NAME, VERSION);
            return Ok(());
        }
        Command::Run(invocation) => invocation,
    };

    debug!("{} v{}", APP_NAME, VERSION);

    let engine = Engine::new(invocation.problem, invocation.config);
    engine
        .run_and_report(&mut MetricsReporter::stdout())
        .map_err(|e| {
            error!("Failed to write benchmark record: {}", e);
            e
        })?;

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
