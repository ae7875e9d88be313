// ==========================================
// Manufacturing Scheduler - Explanation service boundary
// ==========================================
// Trait for the external text-generation collaborator. The engine
// defines the contract; transports implement it. A deterministic
// templated implementation doubles as the local fallback, so a slow
// or failing service can never fail a schedule mutation.
// ==========================================

pub mod prompt;
pub mod template;

pub use template::TemplatedExplanationService;

use crate::domain::interpretation::SchedulingInterpretation;
use crate::domain::schedule::Schedule;
use async_trait::async_trait;
use thiserror::Error;

// ==========================================
// Error type
// ==========================================
#[derive(Error, Debug)]
pub enum ExplanationError {
    #[error("explanation service unavailable: {0}")]
    Unavailable(String),

    #[error("explanation service returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error("explanation service call timed out after {0} ms")]
    Timeout(u64),
}

pub type ExplanationResult<T> = Result<T, ExplanationError>;

// ==========================================
// ExplanationService trait
// ==========================================

/// External natural-language collaborator.
///
/// Implementations may suspend for a network round trip; callers are
/// expected to apply their own deadline and fall back to templated
/// text on failure. No method here may be required for a schedule
/// mutation to succeed.
#[async_trait]
pub trait ExplanationService: Send + Sync {
    /// Free-form text generation from a prepared prompt.
    async fn generate_explanation(&self, prompt: &str) -> ExplanationResult<String>;

    /// Interpret a natural-language scheduling request, producing
    /// structured change suggestions. The caller builds `prompt` with
    /// `prompt::build_interpretation_prompt`; `schedule` is passed
    /// alongside for implementations that answer without a model.
    async fn interpret_request(
        &self,
        prompt: &str,
        schedule: &Schedule,
    ) -> ExplanationResult<SchedulingInterpretation>;

    /// Narrative analysis of the schedule's current state. The caller
    /// builds `prompt` with `prompt::build_analysis_prompt`.
    async fn analyze_schedule(
        &self,
        prompt: &str,
        schedule: &Schedule,
    ) -> ExplanationResult<String>;
}
