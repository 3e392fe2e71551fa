mod cli;
mod config;
mod logging;
mod output;

use std::fs;
use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Command, OutputFormat, QueryArgs};
use llmcost::{load_pricing, Cl100kTokenizer, CostEngine, PricingMap};

fn read_input_text(query: &QueryArgs) -> Result<String> {
    match (&query.text, &query.file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) if path.as_os_str() == "-" => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read input text from stdin")?;
            Ok(buf)
        }
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input text from {}", path.display())),
        (None, None) => Ok(String::new()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose);

    let config = config::load_config();
    let format = cli.format.or(config.format).unwrap_or(OutputFormat::Table);
    let details = cli.details || config.details.unwrap_or(false);

    let pricing_path =
        config::resolve_pricing_path(cli.pricing.as_deref(), &config, config::pricing_from_env());
    let pricing = load_pricing(&pricing_path)
        .with_context(|| format!("Failed to load price catalog {}", pricing_path.display()))?;

    let rendered = match cli.command {
        Command::Providers => output::render_list("Provider", &pricing.providers(), format)?,
        Command::Models { ref provider } => {
            let models = pricing.models(provider);
            if models.is_empty() {
                eprintln!("Unknown provider: {provider}");
            }
            output::render_list("Model", &models, format)?
        }
        Command::Quote {
            ref provider,
            ref model,
            ref query,
        } => {
            let text = read_input_text(query)?;
            let engine = CostEngine::new(&pricing, Cl100kTokenizer::new()?);
            let quote = engine.quote(provider, model, &text, query.output_tokens)?;
            output::render_quote(&quote, details, format)?
        }
        Command::Compare {
            ref picks,
            ref query,
        } => {
            let text = read_input_text(query)?;
            let engine = CostEngine::new(&pricing, Cl100kTokenizer::new()?);
            let comparison =
                engine.compare(&cli::selections(picks), &text, query.output_tokens)?;
            output::render_comparison(&comparison, details, format)?
        }
    };

    println!("{rendered}");
    Ok(())
}
