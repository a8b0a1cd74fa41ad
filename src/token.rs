const CHARS_PER_TOKEN: usize = 4;

/// Trait for estimating token counts in text.
///
/// Estimates are approximations for sizing a prompt before the remote call;
/// they are never exact and every report labels them as estimates.
pub trait TokenEstimator: Send + Sync {
    /// Estimates the number of tokens in the given text.
    fn estimate(&self, text: &str) -> usize;
}

/// Character-based tokenizer.
///
/// Uses a heuristic of approximately 4 characters per token,
/// which works reasonably well for source code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleTokenizer;

impl TokenEstimator for SimpleTokenizer {
    fn estimate(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }

        let char_count = text.chars().count();
        char_count
            .saturating_add(CHARS_PER_TOKEN - 1)
            .saturating_div(CHARS_PER_TOKEN)
            .max(1)
    }
}
