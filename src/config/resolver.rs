//! Configuration Resolution
//!
//! Merges built-in defaults, `BENCH_*` environment variables and
//! command-line flags into a validated [`Invocation`].
//!
//! Precedence is: explicit flag > environment variable > built-in default.
//! Environment values are lenient (bad values are logged and replaced),
//! explicit flags are strict (bad values are errors).

use log::{debug, warn};
use thiserror::Error;

use super::model::{Configuration, Problem, MIN_ITERATION_COUNT, MIN_THREAD_COUNT};

/// Default problem size when neither flag nor environment sets one.
pub const DEFAULT_PROBLEM_SIZE: usize = 1024;

/// Default worker count.
pub const DEFAULT_THREAD_COUNT: usize = 1;

/// Default stencil iteration count.
pub const DEFAULT_ITERATION_COUNT: usize = 100;

/// Environment variable holding the default problem size.
pub const ENV_PROBLEM_SIZE: &str = "BENCH_SIZE";

/// Environment variable holding the default worker count.
pub const ENV_THREAD_COUNT: &str = "BENCH_THREADS";

/// Environment variable holding the default stencil iteration count.
pub const ENV_ITERATION_COUNT: &str = "BENCH_ITERS";

/// Errors raised while resolving a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("No problem given (expected one of: matmul, mcpi, stencil)")]
    MissingProblem,

    #[error("Unknown problem: '{0}' (expected one of: matmul, mcpi, stencil)")]
    UnknownProblem(String),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("{option} is not supported by {problem}")]
    UnsupportedOption { option: String, problem: Problem },

    #[error("{0} requires a number argument")]
    MissingValue(String),

    #[error("Invalid value for {option}: {value}")]
    InvalidValue { option: String, value: String },

    #[error("{option} must be at least {minimum} (got {value})")]
    BelowMinimum {
        option: String,
        value: i64,
        minimum: usize,
    },
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run a benchmark.
    Run(Invocation),
    /// Print usage and exit.
    Help,
    /// Print version and exit.
    Version,
}

/// A fully resolved benchmark run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub problem: Problem,
    pub config: Configuration,
    pub verbose: bool,
}

/// Flag values seen on the command line, before defaults are applied.
#[derive(Debug, Default)]
struct Overrides {
    problem: Option<Problem>,
    problem_size: Option<i64>,
    thread_count: Option<i64>,
    iteration_count: Option<i64>,
    verbose: bool,
}

/// Outcome of walking the argument list.
#[derive(Debug)]
enum Parsed {
    Overrides(Overrides),
    Help,
    Version,
}

/// Resolves `args` against the process environment.
///
/// Environment fallbacks are reported through `warn!`, so the logger must
/// be installed before this runs. Use [`requests_verbose`] to pick its
/// level up front.
pub fn resolve_from_process(args: &[String]) -> Result<Command, ConfigError> {
    resolve(args, |name| std::env::var(name).ok())
}

/// Whether `args` ask for verbose output.
///
/// Only scans for `--verbose`/`-v`; values following `--size`, `--threads`
/// and `--iters` are skipped. Nothing is validated.
pub fn requests_verbose(args: &[String]) -> bool {
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--verbose" | "-v" => return true,
            "--size" | "--threads" | "--iters" => {
                rest.next();
            }
            _ => {}
        }
    }
    false
}

/// Resolves `args` (including the program name at index 0) using `env`
/// to look up environment defaults.
///
/// # Example
///
/// ```rust
/// use parbench::config::{resolve, Command, Problem};
///
/// let args: Vec<String> = ["parbench", "stencil", "--size", "64"]
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
///
/// let command = resolve(&args, |name| match name {
///     "BENCH_ITERS" => Some("5".to_string()),
///     _ => None,
/// })
/// .unwrap();
///
/// let Command::Run(invocation) = command else { panic!("expected a run") };
/// assert_eq!(invocation.problem, Problem::Stencil);
/// assert_eq!(invocation.config.problem_size, 64);
/// assert_eq!(invocation.config.iteration_count, 5);
/// ```
pub fn resolve<F>(args: &[String], env: F) -> Result<Command, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let overrides = match parse_arguments(args)? {
        Parsed::Overrides(overrides) => overrides,
        Parsed::Help => return Ok(Command::Help),
        Parsed::Version => return Ok(Command::Version),
    };

    let problem = overrides.problem.ok_or(ConfigError::MissingProblem)?;

    if overrides.iteration_count.is_some() && !problem.uses_iterations() {
        return Err(ConfigError::UnsupportedOption {
            option: "--iters".to_string(),
            problem,
        });
    }

    let problem_size = match overrides.problem_size {
        Some(size) => check_minimum("--size", size, problem.minimum_size())?,
        None => env_default(
            &env,
            ENV_PROBLEM_SIZE,
            DEFAULT_PROBLEM_SIZE,
            problem.minimum_size(),
        ),
    };

    let thread_count = match overrides.thread_count {
        Some(threads) => check_minimum("--threads", threads, MIN_THREAD_COUNT)?,
        None => env_default(&env, ENV_THREAD_COUNT, DEFAULT_THREAD_COUNT, MIN_THREAD_COUNT),
    };

    let iteration_count = match overrides.iteration_count {
        Some(iterations) => check_minimum("--iters", iterations, MIN_ITERATION_COUNT)?,
        None => env_default(
            &env,
            ENV_ITERATION_COUNT,
            DEFAULT_ITERATION_COUNT,
            MIN_ITERATION_COUNT,
        ),
    };

    let config = Configuration::new(problem_size, thread_count, iteration_count);
    debug!("Resolved {} configuration: {:?}", problem, config);

    Ok(Command::Run(Invocation {
        problem,
        config,
        verbose: overrides.verbose,
    }))
}

/// Walks the argument list, stopping early for help or version.
fn parse_arguments(args: &[String]) -> Result<Parsed, ConfigError> {
    let mut overrides = Overrides::default();
    let mut i = 1; // Skip program name

    while i < args.len() {
        let arg = &args[i];

        match arg.as_str() {
            "--help" | "-h" => return Ok(Parsed::Help),
            "--version" | "-V" => return Ok(Parsed::Version),
            "--verbose" | "-v" => {
                overrides.verbose = true;
            }
            "--size" => {
                i += 1;
                overrides.problem_size = Some(flag_value(args, i, "--size")?);
            }
            "--threads" => {
                i += 1;
                overrides.thread_count = Some(flag_value(args, i, "--threads")?);
            }
            "--iters" => {
                i += 1;
                overrides.iteration_count = Some(flag_value(args, i, "--iters")?);
            }
            arg if arg.starts_with('-') => {
                return Err(ConfigError::UnknownOption(arg.to_string()));
            }
            _ => {
                if overrides.problem.is_some() {
                    return Err(ConfigError::UnexpectedArgument(arg.clone()));
                }
                overrides.problem = Some(arg.parse()?);
            }
        }
        i += 1;
    }

    Ok(Parsed::Overrides(overrides))
}

/// Parses the integer following a flag. Range checks happen later.
fn flag_value(args: &[String], index: usize, option: &str) -> Result<i64, ConfigError> {
    let raw = args
        .get(index)
        .ok_or_else(|| ConfigError::MissingValue(option.to_string()))?;

    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        option: option.to_string(),
        value: raw.clone(),
    })
}

fn check_minimum(option: &str, value: i64, minimum: usize) -> Result<usize, ConfigError> {
    match usize::try_from(value) {
        Ok(accepted) if accepted >= minimum => Ok(accepted),
        _ => Err(ConfigError::BelowMinimum {
            option: option.to_string(),
            value,
            minimum,
        }),
    }
}

/// Reads an integer default from the environment.
///
/// Unparseable values fall back to `default`; values below `minimum` are
/// clamped. Both cases are logged.
fn env_default<F>(env: &F, name: &str, default: usize, minimum: usize) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = env(name) else {
        return default.max(minimum);
    };

    match raw.trim().parse::<i64>() {
        Ok(value) if value >= minimum as i64 => usize::try_from(value).unwrap_or(default),
        Ok(value) => {
            warn!(
                "{}={} is below the minimum of {}; using {}",
                name, value, minimum, minimum
            );
            minimum
        }
        Err(_) => {
            warn!("Ignoring {}='{}': not an integer; using {}", name, raw, default);
            default.max(minimum)
        }
    }
}
