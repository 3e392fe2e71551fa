use std::collections::HashSet;

use tracing::debug;

use crate::cost::{CostEngine, PricingMap};
use crate::error::{Error, Result};
use crate::tokenizer::TokenCounter;
use crate::types::{Comparison, OutputTokens, Selection};

/// Most (provider, model) pairs a single comparison accepts.
pub const MAX_SELECTIONS: usize = 3;

impl<P: PricingMap, T: TokenCounter> CostEngine<P, T> {
    /// Quote every selection against the same input and pick the cheapest.
    ///
    /// The selection set must hold 1 to [`MAX_SELECTIONS`] distinct pairs.
    /// Equal totals go to the pair listed first. Fails as a whole if any
    /// pair is missing from the catalog.
    pub fn compare(
        &self,
        selections: &[Selection],
        input_text: &str,
        output_tokens: OutputTokens,
    ) -> Result<Comparison> {
        validate_selections(selections)?;

        let input_tokens = self.tokenizer().count_tokens(input_text);
        let quotes = selections
            .iter()
            .map(|s| self.quote_counted(&s.provider, &s.model, input_tokens, output_tokens))
            .collect::<Result<Vec<_>>>()?;

        let comparison = Comparison::new(quotes)
            .ok_or_else(|| Error::invalid("select at least one (provider, model) pair"))?;
        let best = comparison.cheapest();
        debug!(
            candidates = comparison.quotes().len(),
            provider = %best.provider,
            model = %best.model,
            total_cost = best.total_cost,
            "picked cheapest selection"
        );

        Ok(comparison)
    }
}

fn validate_selections(selections: &[Selection]) -> Result<()> {
    if selections.is_empty() {
        return Err(Error::invalid("select at least one (provider, model) pair"));
    }
    if selections.len() > MAX_SELECTIONS {
        return Err(Error::invalid(format!(
            "select at most {MAX_SELECTIONS} (provider, model) pairs, got {}",
            selections.len()
        )));
    }

    let mut seen = HashSet::new();
    for s in selections {
        if !seen.insert(s) {
            return Err(Error::invalid(format!("{s} is selected more than once")));
        }
    }
    Ok(())
}
