use clap::{Parser, Subcommand};
use colored::*;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use doxyref::{Config, DescribeError, EmphasisStyle, Session};

mod init;
mod search;

use init::init_config;
use search::{interactive_search, print_reply};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "doxyref")]
#[command(about = "Quick class and method lookup in Doxygen XML docs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./doxyref.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory containing one Doxygen XML folder per API version
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// How emphasized text is rendered
    #[arg(long, global = true, value_enum)]
    emphasis: Option<EmphasisStyle>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a documentation version and report what was indexed
    Load {
        /// API version folder under the docs root
        api: String,
    },
    /// Describe a class, a method, or Class::method
    Describe {
        /// API version folder under the docs root
        api: String,
        /// Class name, method name, or Class::method
        query: String,
        /// Method to look up inside the class given as query
        method: Option<String>,
        /// Only print method signatures
        #[arg(long)]
        signature: bool,
        /// Print the reply as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive load/describe shell
    Shell {
        /// API version to load on startup
        api: Option<String>,
    },
    /// Initialize a new doxyref.toml configuration file
    Init {
        /// Overwrite existing doxyref.toml if present
        #[arg(long)]
        force: bool,
    },
}

#[derive(Serialize)]
struct JsonReply<'a> {
    api: &'a str,
    query: &'a str,
    method: Option<&'a str>,
    lines: &'a [String],
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_config(&cli).and_then(|config| run(cli.command, config));

    if let Err(e) = result {
        eprintln!("\n{} {}", "❌".red(), e.red());
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config, String> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?,
        None => Config::load(),
    };

    // CLI flags override the config file
    if let Some(root) = &cli.root {
        config.docs_root = root.clone();
    }
    if let Some(emphasis) = cli.emphasis {
        config.emphasis = emphasis;
    }
    Ok(config)
}

fn run(command: Commands, config: Config) -> Result<(), String> {
    let mut session = Session::new(config);

    match command {
        Commands::Load { api } => {
            let summary = load(&mut session, &api)?;
            println!("{}", summary);
            Ok(())
        }
        Commands::Describe {
            api,
            query,
            method,
            signature,
            json,
        } => {
            load(&mut session, &api)?;
            let method = method.as_deref();
            let reply = if signature {
                session.signatures(&query, method)
            } else {
                session.describe(&query, method)
            };
            let lines = reply.map_err(describe_error)?;

            if json {
                let out = JsonReply {
                    api: &api,
                    query: &query,
                    method,
                    lines: &lines,
                };
                let text = serde_json::to_string_pretty(&out).map_err(|e| e.to_string())?;
                println!("{}", text);
            } else {
                print_reply(&lines);
            }
            Ok(())
        }
        Commands::Shell { api } => {
            if let Some(api) = api {
                let summary = load(&mut session, &api)?;
                println!("{} {}", "📚".cyan(), summary);
            }
            interactive_search(&mut session)
        }
        Commands::Init { force } => init_config(force),
    }
}

fn load(session: &mut Session, api: &str) -> Result<String, String> {
    session.load(api).map_err(|e| {
        if e.is_not_found() {
            "Doxygen XML not found.".to_string()
        } else {
            e.to_string()
        }
    })
}

fn describe_error(e: DescribeError) -> String {
    match e {
        DescribeError::Source(source) if source.is_not_found() => "Doxygen XML not found.".to_string(),
        other => other.to_string(),
    }
}
