use tracing::debug;

use crate::error::{Error, Result};
use crate::tokenizer::TokenCounter;
use crate::types::{OutputTokens, Quote, Rate};

/// Decimal places the total cost is rounded to.
pub const COST_DECIMALS: usize = 10;

const TOKENS_PER_RATE_UNIT: f64 = 1_000_000.0;

/// Trait for looking up rates by provider and model.
pub trait PricingMap {
    fn rate(&self, provider: &str, model: &str) -> Option<&Rate>;

    /// Provider identifiers in catalog order.
    fn providers(&self) -> Vec<&str>;

    /// Model identifiers of `provider` in catalog order, empty when unknown.
    fn models(&self, provider: &str) -> Vec<&str>;

    fn has_provider(&self, provider: &str) -> bool {
        self.providers().contains(&provider)
    }

    fn lookup(&self, provider: &str, model: &str) -> Result<Rate> {
        if let Some(rate) = self.rate(provider, model) {
            return Ok(*rate);
        }
        if self.has_provider(provider) {
            Err(Error::UnknownModel {
                provider: provider.to_string(),
                model: model.to_string(),
            })
        } else {
            Err(Error::UnknownProvider(provider.to_string()))
        }
    }
}

impl<P: PricingMap + ?Sized> PricingMap for &P {
    fn rate(&self, provider: &str, model: &str) -> Option<&Rate> {
        (**self).rate(provider, model)
    }

    fn providers(&self) -> Vec<&str> {
        (**self).providers()
    }

    fn models(&self, provider: &str) -> Vec<&str> {
        (**self).models(provider)
    }

    fn has_provider(&self, provider: &str) -> bool {
        (**self).has_provider(provider)
    }
}

/// Round to [`COST_DECIMALS`] places.
///
/// Goes through the shortest-exact decimal formatter, so the result is the
/// correctly rounded value of the binary input with ties to even.
pub fn round_cost(value: f64) -> f64 {
    format!("{:.*}", COST_DECIMALS, value)
        .parse()
        .unwrap_or(value)
}

/// Cost of `tokens` at `rate_per_million`.
pub fn component_cost(rate_per_million: f64, tokens: u64) -> f64 {
    rate_per_million / TOKENS_PER_RATE_UNIT * tokens as f64
}

/// Resolves rates, counts input tokens and prices queries.
pub struct CostEngine<P, T> {
    pricing: P,
    tokenizer: T,
}

impl<P: PricingMap, T: TokenCounter> CostEngine<P, T> {
    pub fn new(pricing: P, tokenizer: T) -> Self {
        Self { pricing, tokenizer }
    }

    pub fn pricing(&self) -> &P {
        &self.pricing
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    pub fn list_providers(&self) -> Vec<&str> {
        self.pricing.providers()
    }

    pub fn list_models(&self, provider: &str) -> Vec<&str> {
        self.pricing.models(provider)
    }

    pub fn quote(
        &self,
        provider: &str,
        model: &str,
        input_text: &str,
        output_tokens: OutputTokens,
    ) -> Result<Quote> {
        let rate = self.pricing.lookup(provider, model)?;
        let input_tokens = self.tokenizer.count_tokens(input_text);
        Ok(price(provider, model, rate, input_tokens, output_tokens.get()))
    }

    /// Like [`quote`](Self::quote) with an already counted input.
    pub(crate) fn quote_counted(
        &self,
        provider: &str,
        model: &str,
        input_tokens: u64,
        output_tokens: OutputTokens,
    ) -> Result<Quote> {
        let rate = self.pricing.lookup(provider, model)?;
        Ok(price(provider, model, rate, input_tokens, output_tokens.get()))
    }
}

fn price(
    provider: &str,
    model: &str,
    rate: Rate,
    input_tokens: u64,
    output_tokens: u64,
) -> Quote {
    let input_cost = component_cost(rate.input, input_tokens);
    let output_cost = component_cost(rate.output, output_tokens);
    let total_cost = round_cost(input_cost + output_cost);

    debug!(provider, model, input_tokens, output_tokens, total_cost, "priced query");

    Quote {
        provider: provider.to_string(),
        model: model.to_string(),
        rate,
        input_tokens,
        output_tokens,
        input_cost,
        output_cost,
        total_cost,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Counts whitespace-separated words; keeps tests off the real vocabulary.
    pub(crate) struct WordCounter;

    impl TokenCounter for WordCounter {
        fn count_tokens(&self, text: &str) -> u64 {
            text.split_whitespace().count() as u64
        }
    }

    pub(crate) struct StaticPricing {
        order: Vec<(&'static str, Vec<&'static str>)>,
        rates: HashMap<(String, String), Rate>,
    }

    impl StaticPricing {
        pub(crate) fn new(entries: &[(&'static str, &'static str, f64, f64)]) -> Self {
            let mut order: Vec<(&'static str, Vec<&'static str>)> = Vec::new();
            let mut rates = HashMap::new();
            for &(p, m, i, o) in entries {
                match order.iter_mut().find(|(name, _)| *name == p) {
                    Some((_, models)) => models.push(m),
                    None => order.push((p, vec![m])),
                }
                rates.insert((p.to_string(), m.to_string()), Rate::new(i, o));
            }
            Self { order, rates }
        }
    }

    impl PricingMap for StaticPricing {
        fn rate(&self, provider: &str, model: &str) -> Option<&Rate> {
            self.rates.get(&(provider.to_string(), model.to_string()))
        }

        fn providers(&self) -> Vec<&str> {
            self.order.iter().map(|(p, _)| *p).collect()
        }

        fn models(&self, provider: &str) -> Vec<&str> {
            self.order
                .iter()
                .find(|(p, _)| *p == provider)
                .map(|(_, models)| models.clone())
                .unwrap_or_default()
        }
    }

    fn engine() -> CostEngine<StaticPricing, WordCounter> {
        CostEngine::new(
            StaticPricing::new(&[
                ("OpenAI", "gpt-4", 30.0, 60.0),
                ("OpenAI", "gpt-4o-mini", 0.15, 0.6),
                ("Anthropic", "claude-3-haiku", 0.25, 1.25),
            ]),
            WordCounter,
        )
    }

    #[test]
    fn output_only_quote() {
        let q = engine()
            .quote("OpenAI", "gpt-4", "", OutputTokens::new(1000))
            .unwrap();
        assert_eq!(q.input_tokens, 0);
        assert_eq!(q.output_tokens, 1000);
        assert_eq!(q.total_cost, 0.06);
        assert_eq!(format!("{:.10}", q.total_cost), "0.0600000000");
    }

    #[test]
    fn input_only_quote() {
        let q = engine()
            .quote("OpenAI", "gpt-4", "hello world", OutputTokens::new(0))
            .unwrap();
        assert_eq!(q.input_tokens, 2);
        assert_eq!(q.total_cost, 0.00006);
        assert_eq!(format!("{:.10}", q.total_cost), "0.0000600000");
    }

    #[test]
    fn total_matches_rounded_formula_for_every_pair() {
        let engine = engine();
        let text = "one two three four five six seven";
        for provider in engine.list_providers() {
            for model in engine.list_models(provider) {
                for out in [0_u64, 1, 7, 999, 123_456] {
                    let q = engine
                        .quote(provider, model, text, OutputTokens::new(out))
                        .unwrap();
                    let rate = engine.pricing().rate(provider, model).unwrap();
                    let expected = round_cost(
                        rate.input / 1e6 * q.input_tokens as f64 + rate.output / 1e6 * out as f64,
                    );
                    assert_eq!(q.total_cost.to_bits(), expected.to_bits());
                }
            }
        }
    }

    #[test]
    fn quote_is_pure() {
        let engine = engine();
        let a = engine
            .quote("Anthropic", "claude-3-haiku", "a b c", OutputTokens::new(17))
            .unwrap();
        let b = engine
            .quote("Anthropic", "claude-3-haiku", "a b c", OutputTokens::new(17))
            .unwrap();
        assert_eq!(a.total_cost.to_bits(), b.total_cost.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_pairs_are_not_found() {
        let engine = engine();
        let err = engine
            .quote("Acme", "ghost-9", "hello", OutputTokens::new(10))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownProvider(ref p) if p == "Acme"));
        assert!(err.is_not_found());

        let err = engine
            .quote("OpenAI", "ghost-9", "hello", OutputTokens::new(10))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownModel { .. }));
        assert!(err.is_not_found());
    }

    #[test]
    fn list_models_of_unknown_provider_is_empty() {
        assert!(engine().list_models("Acme").is_empty());
        assert_eq!(engine().list_providers(), vec!["OpenAI", "Anthropic"]);
    }

    #[test]
    fn rounding_drops_digits_past_the_tenth() {
        assert_eq!(round_cost(0.123456789049), 0.123456789);
        assert_eq!(round_cost(0.123456789051), 0.1234567891);
        assert_eq!(round_cost(0.0), 0.0);
    }

    #[test]
    fn rounding_ties_go_to_even() {
        // exactly 0.00048828125 and 0.00146484375 in binary
        assert_eq!(round_cost(1.0 / 2048.0), 0.0004882812);
        assert_eq!(round_cost(3.0 / 2048.0), 0.0014648438);
        assert_eq!(format!("{:.10}", round_cost(1.0 / 2048.0)), "0.0004882812");
    }

    #[test]
    fn component_costs_are_unrounded() {
        let q = engine()
            .quote("OpenAI", "gpt-4o-mini", "x", OutputTokens::new(3))
            .unwrap();
        assert_eq!(q.input_cost, 0.15 / 1e6);
        assert_eq!(q.output_cost, 0.6 / 1e6 * 3.0);
    }
}
