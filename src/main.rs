//! tmplweave CLI
//!
//! Usage:
//!   tmplweave [OPTIONS] <TEMPLATE> [ARGS]...
//!
//! Options:
//!   -c, --config <FILE>      Options file (TOML format)
//!   -f, --fallback <TEXT>    Text for holes without a value
//!   -m, --max-length <N>     Truncate output to N characters
//!       --json               Parse ARGS as JSON values
//!   -r, --relations          Print the relation trace after the output
//!       --check              Lint the template instead of formatting it
//!   -v, --verbose            Enable debug logging
//!   -h, --help               Print help

use std::path::PathBuf;

use clap::Parser;
use log::debug;

use tmplweave::{expand_arguments, format_with_relations, lint, Argument, Options};

#[derive(Parser)]
#[command(name = "tmplweave")]
#[command(about = "Format message templates from the command line")]
struct Cli {
    /// Template text, e.g. "Hello {name}, you have {count,3} new messages"
    template: String,

    /// Arguments bound to the template holes
    args: Vec<String>,

    /// Options file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Text substituted for holes without a value
    #[arg(short, long)]
    fallback: Option<String>,

    /// Truncate output to this many characters
    #[arg(short, long)]
    max_length: Option<usize>,

    /// Parse arguments as JSON values
    #[arg(long)]
    json: bool,

    /// Print the relation trace after the output
    #[arg(short, long)]
    relations: bool,

    /// Lint the template; exit with status 1 when there are warnings
    #[arg(long)]
    check: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    // Load options, command-line flags win over the file
    let mut options = match &cli.config {
        Some(path) => match Options::from_file(path) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("Error loading options '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };
    if let Some(fallback) = cli.fallback.clone() {
        options = options.with_fallback(fallback);
    }
    if let Some(max_length) = cli.max_length {
        options = options.with_max_length(max_length);
    }
    debug!("{:?}", options);

    let arguments = match parse_arguments(&cli.args, cli.json) {
        Ok(arguments) => arguments,
        Err(e) => {
            eprintln!("Error parsing arguments: {}", e);
            std::process::exit(1);
        }
    };

    if cli.check {
        let count = expand_arguments(&arguments).len();
        let warnings = lint::check(&cli.template, Some(count));
        for warning in &warnings {
            eprint!("{}", warning.report(&cli.template, "template"));
        }
        if !warnings.is_empty() {
            std::process::exit(1);
        }
        return;
    }

    let (output, relations) = format_with_relations(&options, &cli.template, &arguments);
    println!("{}", output);

    if cli.relations {
        println!("{}", relations);
        for relation in &relations {
            println!("  {}", relation);
        }
    }
}

fn parse_arguments(raw: &[String], json: bool) -> Result<Vec<Argument>, serde_json::Error> {
    if json {
        return raw
            .iter()
            .map(|text| serde_json::from_str::<serde_json::Value>(text).map(Argument::from))
            .collect();
    }
    Ok(raw.iter().map(|text| infer_argument(text)).collect())
}

/// Integer, float or boolean when the text parses as one, otherwise a string
fn infer_argument(text: &str) -> Argument {
    if let Ok(n) = text.parse::<i64>() {
        return Argument::Int(n);
    }
    if let Ok(x) = text.parse::<f64>() {
        if x.is_finite() {
            return Argument::Float(x);
        }
    }
    match text {
        "true" => Argument::Bool(true),
        "false" => Argument::Bool(false),
        _ => Argument::from(text),
    }
}
