//! Rule catalog CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::{Cell, Color};

use crate::cli::output::{output, priority_cell, table, CommandOutput};
use crate::domain::models::Config;
use crate::services::{RuleCatalog, RuleSummary};

#[derive(Args, Debug)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub command: RulesCommands,
}

#[derive(Subcommand, Debug)]
pub enum RulesCommands {
    /// List rules in evaluation order with their enabled state
    List,
}

#[derive(Debug, serde::Serialize)]
pub struct RuleListOutput {
    pub rules: Vec<RuleSummary>,
}

impl CommandOutput for RuleListOutput {
    fn to_human(&self) -> String {
        let mut t = table(["ID", "SUBJECT", "PRIORITY", "ENABLED", "DESCRIPTION"]);
        for rule in &self.rules {
            let enabled = if rule.enabled {
                Cell::new("yes").fg(Color::Green)
            } else {
                Cell::new("no").fg(Color::DarkGrey)
            };
            t.add_row(vec![
                Cell::new(&rule.id),
                Cell::new(rule.subject_type.as_str()),
                priority_cell(rule.priority_hint),
                enabled,
                Cell::new(&rule.description),
            ]);
        }
        t.to_string()
    }
}

pub async fn execute(args: RulesArgs, config: &Config, json_mode: bool) -> Result<()> {
    match args.command {
        RulesCommands::List => {
            let catalog = RuleCatalog::from_config(&config.engine);
            output(&RuleListOutput { rules: catalog.summaries() }, json_mode);
        }
    }
    Ok(())
}
