//! Price a single LLM query from a static rate table.
//!
//! Rates are per million tokens and come from a [`PriceCatalog`] loaded once
//! at startup. Input text is counted with a [`TokenCounter`] (by default the
//! `cl100k_base` vocabulary) and the total is rounded to
//! [`COST_DECIMALS`](cost::COST_DECIMALS) decimal places.
//!
//! ```no_run
//! use llmcost::{load_pricing, Cl100kTokenizer, CostEngine, OutputTokens};
//!
//! # fn main() -> Result<(), llmcost::Error> {
//! let catalog = load_pricing("pricing_data.json".as_ref())?;
//! let engine = CostEngine::new(catalog, Cl100kTokenizer::new()?);
//! let quote = engine.quote("OpenAI", "gpt-4", "hello world", OutputTokens::new(100))?;
//! println!("${:.10}", quote.total_cost);
//! # Ok(())
//! # }
//! ```

pub mod compare;
pub mod cost;
pub mod error;
pub mod pricing;
pub mod tokenizer;
pub mod types;

pub use compare::MAX_SELECTIONS;
pub use cost::{CostEngine, PricingMap};
pub use error::{Error, LoadError, Result};
pub use pricing::{load_pricing, PriceCatalog};
pub use tokenizer::{Cl100kTokenizer, TokenCounter};
pub use types::{Comparison, OutputTokens, Quote, Rate, Selection};
