use std::time::Duration;
use nw_core::DecodingParams;

/// Delay between retry attempts of a failed model call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackoffPolicy {
    Fixed(Duration),
    /// Doubles per attempt, starting at `base` and capped at `max`.
    Exponential { base: Duration, max: Duration },
}

impl BackoffPolicy {
    /// Delay to sleep after the given zero-based failed attempt.
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            BackoffPolicy::Fixed(d) => *d,
            BackoffPolicy::Exponential { base, max } => {
                let exp = base.saturating_mul(2u32.saturating_pow(attempt));
                exp.min(*max)
            }
        }
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        BackoffPolicy::Fixed(Duration::from_secs(1))
    }
}

/// Summarization parameters and pipeline tuning knobs.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub max_length: usize,
    pub min_length: usize,
    pub sampling: bool,
    pub beam_count: usize,
    pub temperature: f64,
    pub batch_size: usize,
    pub retry_attempts: u32,
    pub chunk_size: usize,
    pub backoff: BackoffPolicy,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_length: 600,
            min_length: 50,
            sampling: false,
            beam_count: 4,
            temperature: 1.0,
            batch_size: 8,
            retry_attempts: 3,
            chunk_size: 1000,
            backoff: BackoffPolicy::default(),
        }
    }
}

impl SummaryConfig {
    pub fn decoding_params(&self) -> DecodingParams {
        DecodingParams {
            max_length: self.max_length,
            min_length: self.min_length,
            sampling: self.sampling,
            beam_count: self.beam_count,
            temperature: self.temperature,
        }
    }
}
