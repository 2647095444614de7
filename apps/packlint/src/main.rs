//! Packlint CLI binary entry point.
//! Resolves configuration, runs the validator and prints results.

use clap::Parser;
use packlint::cli::{Cli, Commands};
use packlint::config;
use packlint::lint::Validator;
use packlint::output;
use packlint::rules::Registry;
use packlint::utils;
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Rules { output } => {
            output::print_rules(&Registry::with_defaults(), output.as_deref().unwrap_or("human"));
        }
        Commands::Order { output } => {
            output::print_order(&Registry::with_defaults(), output.as_deref().unwrap_or("human"));
        }
        Commands::Lint {
            root,
            rule,
            settings,
            output,
            verbose,
        } => {
            let eff = match config::resolve_effective(
                root.as_deref(),
                settings.as_deref(),
                output.as_deref(),
                verbose,
            ) {
                Ok(eff) => eff,
                Err(e) => {
                    eprintln!("{} {}", utils::error_prefix(), e);
                    std::process::exit(2);
                }
            };
            init_logging(&eff.settings.log_level, eff.verbose);
            if eff.config_file.is_none() && settings.is_none() && eff.output != "json" {
                eprintln!(
                    "{} No packlint config found in {}; using defaults.",
                    utils::note_prefix(),
                    eff.project_root.display()
                );
            }

            let validator = Validator::new(&eff.project_root, eff.settings.clone());
            let outcome = match rule.as_deref() {
                Some(name) => match validator.run_specific(name) {
                    Some(outcome) => outcome,
                    None => {
                        eprintln!(
                            "{} Unknown rule '{}'. Run `packlint rules` to list them.",
                            utils::error_prefix(),
                            name
                        );
                        std::process::exit(2);
                    }
                },
                None => {
                    if eff.output != "json" {
                        eprintln!(
                            "{} Running {} rules from {}",
                            utils::info_prefix(),
                            validator.registry().execution_order().len(),
                            eff.project_root.display()
                        );
                    }
                    validator.run()
                }
            };
            output::print_lint(&outcome, &eff.output);
            if !outcome.report.is_valid() && eff.settings.exit_on_error {
                std::process::exit(1);
            }
        }
    }
}
