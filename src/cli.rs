use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// MealPlanMaker: builds macro-balanced meal plans and renders printable reports.
#[derive(Parser, Debug)]
#[command(name = "meal_plan_maker")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Catalog JSON file. The built-in catalog is used when omitted.
    #[arg(short, long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Settings JSON file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set (e.g. "debug").
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

/// Output shape of the `plan` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain report text, split into parts when over budget.
    #[default]
    Text,
    /// `{status, formatted_text, continuation_available, continuation_text}` JSON.
    Json,
    /// The full plan record as JSON.
    Record,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a meal plan from a request file or interactive prompts.
    Plan {
        /// Plan request JSON file. Prompts interactively when omitted.
        #[arg(short, long)]
        request: Option<PathBuf>,

        /// Date printed in the report header (defaults to today).
        #[arg(long)]
        date: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also write the plan's line items to this CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Inspect or edit the food table.
    #[command(subcommand)]
    Foods(FoodsCommand),

    /// Check the catalog for broken references.
    Validate,
}

#[derive(Subcommand, Debug)]
pub enum FoodsCommand {
    /// List foods, optionally by category.
    List {
        #[arg(long)]
        category: Option<String>,
    },

    /// Show one food's nutrition values.
    Show { id: String },

    /// Add or update foods from a CSV file. Requires --catalog.
    Import { path: PathBuf },

    /// Remove a food that nothing references. Requires --catalog.
    Delete {
        id: String,

        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Plan {
            request: None,
            date: None,
            format: OutputFormat::Text,
            csv: None,
        }
    }
}
