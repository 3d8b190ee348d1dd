use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use oos::diagnostic::{ansi::AnsiRenderer, json, registry, Diagnostic};
use oos::{Dispatcher, Script};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Ansi,
    Json,
}

/// Run a JSON message script against a fresh runtime.
#[derive(Debug, Parser)]
#[command(name = "oos", version)]
struct Cli {
    /// Script to run
    #[arg(required_unless_present_any = ["explain", "list_classes"])]
    script: Option<PathBuf>,

    /// Diagnostic output format
    #[arg(long, value_enum, default_value_t = Format::Ansi)]
    format: Format,

    /// Never color diagnostics
    #[arg(long)]
    no_color: bool,

    /// More logging on stderr (-v debug, -vv trace). RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print the explanation of an error code and exit
    #[arg(long, value_name = "CODE")]
    explain: Option<String>,

    /// Print the classes a fresh runtime knows and exit
    #[arg(long)]
    list_classes: bool,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "oos=debug",
        _ => "oos=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn report(cli: &Cli, d: &Diagnostic) {
    match cli.format {
        Format::Json => eprintln!("{}", json::render(d)),
        Format::Ansi => {
            let use_color = !cli.no_color && std::io::stderr().is_terminal();
            eprint!("{}", AnsiRenderer { use_color }.render(d));
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(code) = &cli.explain {
        match registry::lookup(code) {
            Some(entry) => {
                print!("{}", entry.long);
                return;
            }
            None => {
                let d = Diagnostic::error(format!("unknown error code '{}'", code))
                    .with_suggestion("codes look like OOS-M002");
                report(&cli, &d);
                std::process::exit(1);
            }
        }
    }

    let mut dispatcher = match Dispatcher::try_new() {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            report(&cli, &Diagnostic::from(&e));
            std::process::exit(1);
        }
    };

    if cli.list_classes {
        for name in dispatcher.registry().names() {
            println!("{}", name);
        }
        return;
    }

    let Some(path) = &cli.script else {
        return;
    };
    let result = Script::load(path).and_then(|script| {
        tracing::info!(path = %path.display(), steps = script.steps.len(), "running script");
        let stdout = std::io::stdout();
        script.run(&mut dispatcher, &mut stdout.lock())
    });
    if let Err(e) = result {
        tracing::debug!(code = e.code(), "script failed");
        report(&cli, &Diagnostic::from(&e));
        std::process::exit(1);
    }
}
