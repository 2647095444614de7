//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "packlint",
    version,
    about = "Validate Minecraft Add-On behavior and resource packs",
    long_about = "Packlint checks a behavior pack and a resource pack against Marketplace Add-On rules: structure, manifest, namespace, limits, naming and content policy.\n\nConfiguration precedence: CLI > packlint.toml > defaults.",
    after_help = "Examples:\n  packlint lint\n  packlint lint --root ./my-addon --output json\n  packlint lint --rule manifest\n  packlint order",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current packlint version.")]
    Version,
    /// Validate the Add-On
    #[command(
        about = "Run validation",
        long_about = "Run every rule in registry order (or a single rule with --rule) and print the findings. Errors make the run fail; warnings and possible issues do not.",
        after_help = "Examples:\n  packlint lint --output json\n  packlint lint --rule \"File Structure\" --verbose\n  packlint lint --settings '{\"required_namespace_prefix\": \"FFS\"}'"
    )]
    Lint {
        #[arg(long, help = "Project root holding the packs (default: detected from current dir)")]
        root: Option<String>,
        #[arg(long, help = "Run only this rule (id or name)")]
        rule: Option<String>,
        #[arg(long, help = "Inline settings JSON; replaces the config file")]
        settings: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Debug logging on stderr")]
        verbose: bool,
    },
    /// List rules
    #[command(about = "List rules", long_about = "List registered rules with ids and descriptions.")]
    Rules {
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Show execution order
    #[command(about = "Show execution order", long_about = "Print rule names in the order they run.")]
    Order {
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}
