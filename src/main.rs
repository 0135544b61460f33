use clap::{arg, command, value_parser, ArgAction, ArgMatches, Command};
use colored::Colorize;
use factorials::check::{print_report, run_checks};
use factorials::sequential::{iterative, recursive};
use factorials::{
    factorial_with, lazy_sequence, FactorialBuilder, FactorialError, FactorialRequest,
    ParallelConfig, Strategy, ValueComputer,
};
use serde::Serialize;
use std::process::ExitCode;
use tracing::Level;

fn main() -> ExitCode {
    let matches = command!()
        .subcommand_required(true)
        .arg(arg!(-v --verbose ... "Log more, repeat for even more").global(true))
        .subcommand(
            Command::new("compute")
                .about("Compute n! with one strategy")
                .arg(arg!(<n> "The number to take the factorial of").value_parser(value_parser!(i64)))
                .arg(
                    arg!(-s --strategy <STRATEGY> "Which strategy to use")
                        .value_parser(value_parser!(Strategy))
                        .default_value("iterative"),
                )
                .arg(
                    arg!(-c --"chunk-size" <SIZE> "Chunk size for partitioned strategies")
                        .value_parser(value_parser!(i64)),
                )
                .arg(
                    arg!(-w --workers <COUNT> "Worker bound for partitioned strategies")
                        .value_parser(value_parser!(i64)),
                )
                .arg(arg!(--json "Print the result as JSON").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("check")
                .about("Cross-check every strategy against the reference")
                .arg(
                    arg!([n] ... "Inputs to check")
                        .value_parser(value_parser!(u64))
                        .default_values(["0", "1", "5", "10", "20"]),
                )
                .arg(
                    arg!(-c --"chunk-size" <SIZE> ... "Chunk sizes for partitioned strategies")
                        .value_parser(value_parser!(u64).range(1..))
                        .default_values(["1", "2", "3", "16"]),
                )
                .arg(
                    arg!(-w --workers <COUNT> "Worker bound for partitioned strategies")
                        .value_parser(value_parser!(i64)),
                ),
        )
        .subcommand(
            Command::new("sequence")
                .about("Print the first factorials, lazily")
                .arg(arg!(<count> "How many to print").value_parser(value_parser!(usize))),
        )
        .subcommand(Command::new("demo").about("Compute 5! directly, recursively and via a builder"))
        .get_matches();

    init_tracing(matches.get_count("verbose"));

    let result = match matches.subcommand() {
        Some(("compute", args)) => run_compute(args),
        Some(("check", args)) => run_check(args),
        Some(("sequence", args)) => {
            run_sequence(*args.get_one::<usize>("count").unwrap_or(&0));
            Ok(true)
        }
        Some(("demo", _)) => run_demo(),
        _ => unreachable!(),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("{}", format!("{:?}", error.to_report()).bright_red());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn parallel_config(args: &ArgMatches) -> Result<ParallelConfig, FactorialError> {
    match args.get_one::<i64>("workers") {
        Some(&workers) => ParallelConfig::default().with_workers(workers),
        None => Ok(ParallelConfig::default()),
    }
}

#[derive(Serialize)]
struct ComputeOutput {
    strategy: Strategy,
    n: u64,
    chunk_size: Option<u64>,
    digits: usize,
    value: String,
}

fn run_compute(args: &ArgMatches) -> Result<bool, FactorialError> {
    let n = *args.get_one::<i64>("n").unwrap_or(&0);
    let strategy = *args
        .get_one::<Strategy>("strategy")
        .unwrap_or(&Strategy::Iterative);
    let chunk_size = args.get_one::<i64>("chunk-size").copied();
    let config = parallel_config(args)?;

    let request = FactorialRequest::new(n, chunk_size)?;
    let value = factorial_with(strategy, request, &config)?.to_string();

    if args.get_flag("json") {
        let output = ComputeOutput {
            strategy,
            n: request.n(),
            chunk_size: strategy
                .is_partitioned()
                .then(|| request.chunk_size_or(&config)),
            digits: value.len(),
            value,
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{json}"),
            Err(error) => {
                eprintln!("{}", format!("Could not encode result: {error}").bright_red());
                return Ok(false);
            }
        }
    } else {
        println!("{}! = {}", request.n(), value);
    }
    Ok(true)
}

fn run_check(args: &ArgMatches) -> Result<bool, FactorialError> {
    let ns: Vec<u64> = args
        .get_many::<u64>("n")
        .map(|ns| ns.copied().collect())
        .unwrap_or_default();
    let chunk_sizes: Vec<u64> = args
        .get_many::<u64>("chunk-size")
        .map(|sizes| sizes.copied().collect())
        .unwrap_or_default();
    let config = parallel_config(args)?;

    println!("{}", "Checking strategies...".bright_blue());
    println!();
    let report = run_checks(&ns, &chunk_sizes, &config);
    print_report(&report);
    Ok(report.is_passed())
}

fn run_sequence(count: usize) {
    for (index, value) in lazy_sequence().take(count) {
        println!("{index}! = {value}");
    }
}

fn run_demo() -> Result<bool, FactorialError> {
    println!("{}", "factorial computed directly...".bright_blue());
    println!("5! = {}", iterative(5)?);

    println!("{}", "factorial computed recursively...".bright_blue());
    println!("5! = {}", recursive(5)?);

    println!("{}", "factorial from a factorial builder...".bright_blue());
    let computer = FactorialBuilder::new().factorial(5).build()?;
    println!("5! = {}", computer.compute());
    Ok(true)
}
