//! sign_rules: inspect, check and exercise gesture rule tables.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hand_frame::FingerStates;
use sign_table::GestureRuleTable;

#[derive(Parser, Debug)]
#[command(name = "sign_rules", about = "Inspect and test hand-sign rule tables")]
struct Cli {
    /// TOML rule table; the baseline table when omitted
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the table as a legend
    Show {
        /// Print as TOML instead (a starting point for a custom table)
        #[arg(long)]
        toml: bool,
    },
    /// Validate the table given with --rules
    Check,
    /// Classify signature strings, e.g. `classify 01000 10001`
    Classify {
        #[arg(required = true)]
        signatures: Vec<FingerStates>,
    },
    /// Print the symbol for all 32 signatures
    Coverage,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sign_rules=info,sign_table=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let table = GestureRuleTable::load_or_baseline(cli.rules.as_deref())
        .context("failed loading rule table")?;

    match cli.command {
        Command::Show { toml: true } => print!("{}", table.to_toml_string()?),
        Command::Show { toml: false } => print_legend(&table),
        Command::Check => {
            let source = cli.rules
                .as_ref()
                .map_or_else(|| "baseline".to_string(), |p| p.display().to_string());
            println!("{source}: {} gestures, sentinel {:?}: ok", table.len(), table.sentinel().as_str());
        }
        Command::Classify { signatures } => {
            for s in signatures {
                println!("{s}  {}", table.symbol_for(s));
            }
        }
        Command::Coverage => {
            for s in FingerStates::all() {
                let sym = table.symbol_for(s);
                let mark = if table.is_sentinel(sym) { "" } else { "  ✓" };
                println!("{s}  {sym}{mark}");
            }
        }
    }
    Ok(())
}

fn print_legend(table: &GestureRuleTable) {
    println!();
    println!("  ┌─ Supported gestures ─────────────────────────────");
    println!("  │  signature  symbol  shape");
    for rule in table.rules() {
        println!(
            "  │  {}      {:<6}  {}",
            rule.signature,
            rule.symbol,
            rule.description.as_deref().unwrap_or(""),
        );
    }
    println!("  │");
    println!("  └─ anything else → {}", table.sentinel());
    println!();
}
