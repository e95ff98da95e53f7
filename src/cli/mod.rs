//! Command-line interface for taskgen.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{
    generate::GenerateArgs, import::ImportArgs, init::InitArgs, reminders::RemindersArgs,
    rules::RulesArgs, task::TaskArgs,
};

#[derive(Parser, Debug)]
#[command(name = "taskgen", version, about = "Generate prioritized follow-up tasks from quotations and leads")]
pub struct Cli {
    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file to use instead of .taskgen/config.yaml
    #[arg(long, short, global = true, env = "TASKGEN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory, default config and database
    Init(InitArgs),
    /// Load quotations, leads and employees from a JSON file
    Import(ImportArgs),
    /// Run one task generation pass
    Generate(GenerateArgs),
    /// Inspect the rule catalog
    Rules(RulesArgs),
    /// Inspect and update generated tasks
    Task(TaskArgs),
    /// Inspect scheduled reminders
    Reminders(RemindersArgs),
}

/// Print `err` in the requested format and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let chain: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let body = serde_json::json!({
            "success": false,
            "error": err.to_string(),
            "causes": chain,
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("  Caused by: {cause}");
        }
    }
    std::process::exit(1);
}
