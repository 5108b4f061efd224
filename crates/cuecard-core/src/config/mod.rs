mod env;
mod types;


pub use types::*;

use std::path::Path;

use anyhow::{Context, bail};

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if the resulting configuration is invalid.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error naming the first setting that cannot drive the pipeline.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.document.max_file_size == 0 {
            bail!("document.max_file_size must be greater than 0");
        }
        if self.relevance.cue_words.iter().all(|w| w.trim().is_empty()) {
            bail!("relevance.cue_words must contain at least one word");
        }
        if !(1..=4).contains(&self.keyphrase.max_ngram) {
            bail!(
                "keyphrase.max_ngram must be between 1 and 4, got {}",
                self.keyphrase.max_ngram
            );
        }
        if self.llm.model.trim().is_empty() {
            bail!("llm.model must not be empty");
        }
        if self.llm.timeout_secs == 0 {
            bail!("llm.timeout_secs must be greater than 0");
        }
        if self.generation.max_input_tokens == 0 || self.generation.max_output_tokens == 0 {
            bail!("generation token limits must be greater than 0");
        }
        if self.flashcards.top_k == 0 {
            bail!("flashcards.top_k must be greater than 0");
        }
        Ok(())
    }
}
