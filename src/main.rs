use clap::{Parser, Subcommand};
use fibunacci::{HarnessConfig, Strategy};

#[derive(Parser)]
#[command(name = "fibunacci")]
#[command(about = "Evaluate the fibunacci recurrence and check the native module")]
#[command(version)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single term
    #[command(alias = "e")]
    Eval {
        n: i64,

        #[arg(long, value_enum, default_value = "recursive")]
        strategy: CliStrategy,
    },

    /// Print the first terms of the sequence
    #[command(alias = "s")]
    Sequence {
        #[arg(short, long, default_value_t = 11)]
        count: usize,

        #[arg(long, value_enum, default_value = "recursive")]
        strategy: CliStrategy,
    },

    /// Load the built library and compare it with the in-process evaluator
    #[command(alias = "p")]
    Parity {
        #[arg(short, long, conflicts_with = "library")]
        config: Option<String>,

        #[arg(short, long)]
        library: Option<String>,

        #[arg(long, value_enum)]
        strategy: Option<CliStrategy>,
    },

    Info,
}

#[derive(clap::ValueEnum, Clone)]
enum CliStrategy {
    Recursive,
    Iterative,
}

impl From<CliStrategy> for Strategy {
    fn from(strategy: CliStrategy) -> Self {
        match strategy {
            CliStrategy::Recursive => Strategy::Recursive,
            CliStrategy::Iterative => Strategy::Iterative,
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Eval { n, strategy } => {
            let strategy: Strategy = strategy.into();
            match strategy.evaluate(n) {
                Ok(term) => println!("{term}"),
                Err(e) => {
                    eprintln!("❌ {e}");
                    std::process::exit(1);
                }
            }
        }

        Commands::Sequence { count, strategy } => {
            match fibunacci::sequence(strategy.into(), count) {
                Ok(terms) => {
                    for (n, term) in terms.iter().enumerate() {
                        println!("f({n}) = {term}");
                    }
                }
                Err(e) => {
                    eprintln!("❌ {e}");
                    std::process::exit(1);
                }
            }
        }

        Commands::Parity {
            config,
            library,
            strategy,
        } => run_parity(config, library, strategy),

        Commands::Info => {
            println!("fibunacci v{}", env!("CARGO_PKG_VERSION"));
            println!("f(0) = f(1) = 1, f(n) = f(n-1) + f(n-2)");
            println!("Max step: {}", fibunacci::MAX_STEP);
            println!("ABI version: {}", fibunacci::ffi::ABI_VERSION);
            println!();
            println!("Commands:");
            println!("  eval      Evaluate a single term");
            println!("  sequence  Print the first terms of the sequence");
            println!("  parity    Compare the native library with the in-process evaluator");
            println!("  info      Show version and usage information");
        }
    }
}

#[cfg(not(target_os = "windows"))]
fn run_parity(config: Option<String>, library: Option<String>, strategy: Option<CliStrategy>) {
    let mut harness = match (config, library) {
        (Some(path), _) => match HarnessConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load {path}: {e}");
                std::process::exit(1);
            }
        },
        (None, Some(library)) => HarnessConfig::new(library),
        (None, None) => {
            let path = fibunacci::default_library_path("target/release");
            HarnessConfig::new(path.to_string_lossy())
        }
    };

    if let Some(strategy) = strategy {
        harness.strategy = strategy.into();
    }

    match fibunacci::run_harness(&harness) {
        Ok(records) => {
            for record in &records {
                if harness.verbose {
                    println!("✅ f({}) = {}", record.step, record.actual);
                }
            }
            println!("🎉 {} steps match {}", records.len(), harness.library_path);
        }
        Err(e) => {
            eprintln!("❌ Parity check failed: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(target_os = "windows")]
fn run_parity(_config: Option<String>, _library: Option<String>, _strategy: Option<CliStrategy>) {
    eprintln!("❌ Loading the native module is not supported on this platform");
    std::process::exit(1);
}
