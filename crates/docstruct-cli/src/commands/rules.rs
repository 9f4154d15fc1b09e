//! Rules command - inspect and check rule sets.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

use docstruct_core::extract::RuleSet;
use docstruct_core::profiles::biography;

/// Arguments for the rules command.
#[derive(Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    command: RulesCommand,
}

#[derive(Subcommand)]
enum RulesCommand {
    /// Print the built-in biography rule set as JSON
    Show {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compile a rule file and report problems
    Check {
        /// Rule file (JSON array of rule definitions)
        file: PathBuf,
    },
}

pub fn run(args: RulesArgs) -> anyhow::Result<()> {
    match args.command {
        RulesCommand::Show { output } => show_rules(output),
        RulesCommand::Check { file } => check_rules(&file),
    }
}

fn show_rules(output: Option<PathBuf>) -> anyhow::Result<()> {
    let json = biography::rule_set()?.to_json()?;

    match output {
        Some(path) => {
            fs::write(&path, format!("{}\n", json))?;
            println!(
                "{} Wrote {} rules to {}",
                style("✓").green(),
                biography::rules().len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn check_rules(file: &Path) -> anyhow::Result<()> {
    let rules = RuleSet::from_file(file)
        .map_err(|e| anyhow::anyhow!("Rule file {} is invalid: {}", file.display(), e))?;

    println!(
        "{} {} rules compiled from {}",
        style("✓").green(),
        rules.len(),
        file.display()
    );
    for rule in rules.iter() {
        let label = rule.label().unwrap_or("-");
        println!("  {} ({})", rule.field_id(), label);
    }

    Ok(())
}
