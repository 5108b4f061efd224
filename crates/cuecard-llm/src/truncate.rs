use crate::error::LlmError;

/// Cuts a prompt down to a token budget using the generation model's tokenization.
pub trait Truncator: Send + Sync {
    /// Deterministically truncate `text` to at most `max_tokens` tokens.
    /// Text already within budget is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying tokenizer fails.
    fn truncate(&self, text: &str, max_tokens: usize) -> Result<String, LlmError>;
}

/// Counts whitespace-separated words as tokens. Used when no tokenizer file is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTruncator;

impl Truncator for WhitespaceTruncator {
    fn truncate(&self, text: &str, max_tokens: usize) -> Result<String, LlmError> {
        if max_tokens == 0 {
            return Ok(String::new());
        }
        let mut words = 0;
        let mut in_word = false;
        let mut cut = None;
        for (idx, ch) in text.char_indices() {
            if ch.is_whitespace() {
                if in_word && words == max_tokens && cut.is_none() {
                    cut = Some(idx);
                }
                in_word = false;
            } else if !in_word {
                if words == max_tokens {
                    return Ok(text[..cut.unwrap_or(idx)].to_owned());
                }
                in_word = true;
                words += 1;
            }
        }
        Ok(text.to_owned())
    }
}

/// Truncates with a `HuggingFace` `tokenizer.json`, matching the generation model's encoder.
#[cfg(feature = "tokenizers")]
pub struct HfTruncator {
    tokenizer: tokenizers::Tokenizer,
}

#[cfg(feature = "tokenizers")]
impl HfTruncator {
    /// # Errors
    ///
    /// Returns [`LlmError::ModelLoad`] if the tokenizer file cannot be loaded.
    pub fn from_file(path: &std::path::Path) -> Result<Self, LlmError> {
        let tokenizer = tokenizers::Tokenizer::from_file(path)
            .map_err(|e| LlmError::ModelLoad(format!("{}: {e}", path.display())))?;
        Ok(Self { tokenizer })
    }

    fn encode_ids(&self, text: &str, add_special_tokens: bool) -> Result<Vec<u32>, LlmError> {
        self.tokenizer
            .encode(text, add_special_tokens)
            .map(|encoding| encoding.get_ids().to_vec())
            .map_err(|e| LlmError::Tokenizer(e.to_string()))
    }
}

/// The budget counts the special tokens the post-processor adds (such as a
/// trailing EOS), so content is cut to leave room for them.
#[cfg(feature = "tokenizers")]
impl Truncator for HfTruncator {
    fn truncate(&self, text: &str, max_tokens: usize) -> Result<String, LlmError> {
        let total = self.encode_ids(text, true)?.len();
        if total <= max_tokens {
            return Ok(text.to_owned());
        }
        let content = self.encode_ids(text, false)?;
        let special = total.saturating_sub(content.len());
        let keep = max_tokens.saturating_sub(special).min(content.len());
        tracing::debug!(tokens = total, special, max_tokens, "truncating prompt");
        self.tokenizer
            .decode(&content[..keep], true)
            .map_err(|e| LlmError::Tokenizer(e.to_string()))
    }
}
