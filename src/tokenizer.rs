//! Input token counting.
//!
//! Costs are linear in the token count, so the vocabulary is pinned:
//! [`Cl100kTokenizer`] uses the `cl100k_base` BPE ranks shipped with
//! tiktoken-rs. Anything implementing [`TokenCounter`] can stand in for it.

use tiktoken_rs::CoreBPE;

use crate::error::LoadError;

/// Counts the tokens a piece of text encodes to.
pub trait TokenCounter {
    fn count_tokens(&self, text: &str) -> u64;
}

impl<T: TokenCounter + ?Sized> TokenCounter for &T {
    fn count_tokens(&self, text: &str) -> u64 {
        (**self).count_tokens(text)
    }
}

/// `cl100k_base` tokenizer (GPT-3.5 / GPT-4 family vocabulary).
pub struct Cl100kTokenizer {
    bpe: CoreBPE,
}

impl Cl100kTokenizer {
    pub fn new() -> Result<Self, LoadError> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| LoadError::Tokenizer(e.to_string()))?;
        Ok(Self { bpe })
    }
}

impl TokenCounter for Cl100kTokenizer {
    /// Special-token markers like `<|endoftext|>` are encoded as plain text.
    fn count_tokens(&self, text: &str) -> u64 {
        if text.is_empty() {
            return 0;
        }
        self.bpe.encode_ordinary(text).len() as u64
    }
}
