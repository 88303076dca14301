//! Command line front end for declaration files.
//!
//! Usage:
//!   fpp check FILE...   parse, report `path:line: error` for each failing file
//!   fpp list FILE       one line per definition
//!   fpp fmt FILE        print canonical source
//!   fpp lint FILE...    parse, then report lint findings
//!   fpp dump FILE       render message declarations as AggregateChanged event classes
//!
//! `-` reads stdin. Exit code 1 on any parse failure or error-level lint finding.
//! Log level comes from `RUST_LOG` (default `warn`, `--verbose` for `debug`).

use anyhow::Context;
use clap::{Parser as ClapParser, Subcommand};
use fppdsl::lint::{lint, LintMessage, Severity};
use fppdsl::{dump, parse, AggregateChangedDumper, DefinitionCollection, DefinitionKind};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "fpp", version, about = "Parse and inspect declaration DSL files")]
struct Cli {
    /// Log parser progress at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse files and report the first diagnostic of each
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List parsed definitions
    List { file: PathBuf },
    /// Print the canonical form of a file
    Fmt { file: PathBuf },
    /// Parse files and run lint rules on the result
    Lint {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Render the message declarations of a file as event classes
    Dump { file: PathBuf },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut src = String::new();
        io::stdin()
            .read_to_string(&mut src)
            .context("reading stdin")?;
        return Ok(src);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn display_path(path: &Path) -> String {
    if path == Path::new("-") {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}

/// Parse one file, printing its diagnostic on failure.
fn load(path: &Path) -> anyhow::Result<Option<DefinitionCollection>> {
    let src = read_source(path)?;
    match parse(&src) {
        Ok(collection) => Ok(Some(collection)),
        Err(e) => {
            eprintln!("{}:{}: error: {}", display_path(path), e.line(), e);
            Ok(None)
        }
    }
}

fn kind_str(kind: DefinitionKind) -> &'static str {
    match kind {
        DefinitionKind::Data => "data",
        DefinitionKind::Enum => "enum",
        DefinitionKind::Message => "message",
    }
}

fn list(collection: &DefinitionCollection) {
    for d in collection {
        let derivings: Vec<&str> = d.derivings.iter().map(|x| x.name()).collect();
        let mut line = format!(
            "{:<8}{} ({} argument(s))",
            kind_str(d.kind),
            d.qualified_name(),
            d.arguments.len()
        );
        if let Some(message_name) = &d.message_name {
            line.push_str(&format!(" as {}", message_name));
        }
        if !derivings.is_empty() {
            line.push_str(&format!(" deriving {}", derivings.join(", ")));
        }
        println!("{}", line);
    }
}

/// Message declarations only; data and enum definitions have no event form.
fn events_of(collection: &DefinitionCollection) -> DefinitionCollection {
    let mut events = DefinitionCollection::new();
    for d in collection {
        if d.kind == DefinitionKind::Message {
            events.add_definition(d.clone());
        } else {
            tracing::warn!(name = %d.qualified_name(), kind = kind_str(d.kind), "skipping non-message definition");
        }
    }
    events
}

fn print_lint_message(path: &str, m: &LintMessage) {
    let severity_str = match m.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    };
    println!(
        "{}: {}: {}: {} [{}]",
        path,
        m.definition,
        severity_str,
        m.message,
        m.rule.id()
    );
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut has_error = false;

    match cli.command {
        Command::Check { files } => {
            for path in &files {
                match load(path)? {
                    Some(collection) => {
                        tracing::info!(path = %path.display(), definitions = collection.len(), "ok")
                    }
                    None => has_error = true,
                }
            }
        }
        Command::List { file } => match load(&file)? {
            Some(collection) => list(&collection),
            None => has_error = true,
        },
        Command::Fmt { file } => match load(&file)? {
            Some(collection) => print!("{}", collection.to_source()),
            None => has_error = true,
        },
        Command::Dump { file } => match load(&file)? {
            Some(collection) => {
                let code = dump(&events_of(&collection), &AggregateChangedDumper)
                    .with_context(|| format!("dumping {}", display_path(&file)))?;
                print!("{}", code);
            }
            None => has_error = true,
        },
        Command::Lint { files } => {
            let mut total_warnings = 0usize;
            let mut total_errors = 0usize;
            for path in &files {
                let Some(collection) = load(path)? else {
                    has_error = true;
                    continue;
                };
                let shown = display_path(path);
                for m in lint(&collection) {
                    match m.severity {
                        Severity::Error => total_errors += 1,
                        Severity::Warning => total_warnings += 1,
                    }
                    print_lint_message(&shown, &m);
                }
            }
            if total_errors > 0 || total_warnings > 0 {
                eprintln!(
                    "lint: {} error(s), {} warning(s)",
                    total_errors, total_warnings
                );
            }
            if total_errors > 0 {
                has_error = true;
            }
        }
    }

    if has_error {
        std::process::exit(1);
    }
    Ok(())
}
