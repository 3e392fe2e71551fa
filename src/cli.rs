use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use llmcost::{OutputTokens, Selection};

#[derive(Parser, Debug)]
#[command(
    name = "llmcost",
    about = "Estimate and compare the cost of one LLM query"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Price catalog file (JSON, or TOML with a .toml extension)
    #[arg(long, global = true)]
    pub pricing: Option<PathBuf>,

    /// Output format: table (default), json
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Show rates and per-component costs
    #[arg(long, global = true)]
    pub details: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List providers in the price catalog
    Providers,
    /// List models offered by a provider
    Models {
        /// Provider name as it appears in the catalog
        provider: String,
    },
    /// Price one query for a single provider and model
    Quote {
        #[arg(long)]
        provider: String,
        #[arg(long)]
        model: String,
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Price the same query for up to three provider/model pairs
    Compare {
        /// Provider and model to compare; repeat up to 3 times
        #[arg(
            long = "pick",
            num_args = 2,
            value_names = ["PROVIDER", "MODEL"],
            action = ArgAction::Append,
            required = true
        )]
        picks: Vec<String>,
        #[command(flatten)]
        query: QueryArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Input text to count tokens for
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// Read input text from a file ("-" for stdin)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Expected number of output tokens
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub output_tokens: OutputTokens,
}

#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
}

/// Pair up the flat `--pick P M` values. Provider and model are never
/// recovered from a combined label.
pub fn selections(picks: &[String]) -> Vec<Selection> {
    picks
        .chunks_exact(2)
        .map(|pair| Selection::new(&pair[0], &pair[1]))
        .collect()
}
