use crate::core::time_sum::{extract_time_tokens, sum_tokens, TimeTotal};
use crate::core::{Pipeline, Storage, TimeToken};
use crate::utils::error::Result;

/// read file → pick time tokens → exact decimal sum → one line of text.
pub struct TimeSumPipeline<S: Storage> {
    storage: S,
    source: String,
}

impl<S: Storage> TimeSumPipeline<S> {
    pub fn new(storage: S, source: impl Into<String>) -> Self {
        Self {
            storage,
            source: source.into(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for TimeSumPipeline<S> {
    type Extracted = Vec<TimeToken>;
    type Transformed = TimeTotal;

    async fn extract(&self) -> Result<Vec<TimeToken>> {
        let data = self.storage.read_file(&self.source).await?;
        // PGN files are not always valid UTF-8; time tokens are plain ASCII
        let text = String::from_utf8_lossy(&data);
        let tokens = extract_time_tokens(&text);
        tracing::debug!("Found {} time tokens in {}", tokens.len(), self.source);
        Ok(tokens)
    }

    async fn transform(&self, tokens: Vec<TimeToken>) -> Result<TimeTotal> {
        sum_tokens(&tokens, &self.source)
    }

    async fn load(&self, total: TimeTotal) -> Result<String> {
        tracing::debug!("Summed {} values", total.token_count);
        Ok(total.to_string())
    }
}
