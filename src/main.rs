use std::{
    io::{self, Read},
    path::PathBuf,
};

use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use log::LevelFilter;
use scrape_filter::cli::{
    self, CheckOptions, CheckResult, CliError, FilterOptions, load_schema,
};

#[derive(ClapParser)]
#[command(name = "sfl")]
#[command(about = "SFL - A filter language deciding which scraped items a spider keeps")]
#[command(version)]
struct Cli {
    /// Log level
    #[arg(short, long, global = true, value_enum, default_value_t = Verbosity::Warn)]
    verbosity: Verbosity,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Verbosity {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<Verbosity> for LevelFilter {
    fn from(v: Verbosity) -> Self {
        match v {
            Verbosity::Off => LevelFilter::Off,
            Verbosity::Error => LevelFilter::Error,
            Verbosity::Warn => LevelFilter::Warn,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check the syntax of a script, and its names against a schema
    Check {
        /// The SFL script
        script: String,

        /// Spider schema (JSON)
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Print the parse tree
        #[arg(short, long)]
        tree: bool,
    },

    /// List the components, attributes and variables of a spider
    Detail {
        /// Spider schema (JSON)
        #[arg(short, long)]
        schema: PathBuf,
    },

    /// Filter scraped items given as JSON lines
    Filter {
        /// The SFL script
        script: String,

        /// Spider schema (JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// JSON lines input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'sfl docs' to list categories)
        category: String,
    },
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbosity.into())
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Check {
            script,
            schema,
            tree,
        } => run_check(script, schema, tree),
        Commands::Detail { schema } => {
            load_schema(&schema, "").map(|registry| print!("{}", registry.detail()))
        }
        Commands::Filter {
            script,
            schema,
            input,
            pretty,
        } => run_filter(script, schema, input, pretty),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => {
            cli::get_doc_category(&category).map(|content| print!("{}", content))
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(script: String, schema: Option<PathBuf>, tree: bool) -> Result<(), CliError> {
    let result = cli::execute_check(&CheckOptions { script, schema })?;

    if tree {
        print!("{}", result.program());
    }
    match result {
        CheckResult::SyntaxValid(_) => println!("Syntax is valid"),
        CheckResult::SchemaValid(_) => println!("Script is valid for this spider"),
    }
    Ok(())
}

fn run_filter(
    script: String,
    schema: PathBuf,
    input: Option<String>,
    pretty: bool,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let summary = cli::execute_filter(&FilterOptions {
        script,
        schema,
        input,
    })?;

    for item in &summary.kept {
        let json = if pretty {
            serde_json::to_string_pretty(item)
        } else {
            serde_json::to_string(item)
        }?;
        println!("{}", json);
    }
    Ok(())
}
