//! Advisor: pluggable, trait-based producer of advisory prose.
//!
//! Default: `LlmAdvisor` (Claude via `LlmClient`). Tests plug in canned
//! advisors. `AppState` holds an `Option<Arc<dyn Advisor>>`; `None` means no
//! API key was configured and every advisor route answers 503.

use async_trait::async_trait;

use crate::advising::prompts::{build_fallback_prompt, build_initial_prompt, build_rag_prompt};
use crate::errors::AppError;
use crate::llm_client::prompts::ADVISOR_SYSTEM;
use crate::llm_client::LlmClient;
use crate::recommendation::ranking::RankedRecommendation;

/// Implement this to swap the text-generation backend without touching
/// the handlers.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// First advice after an analysis: sharpens the rule-based shortlist.
    async fn initial_advice(
        &self,
        summary: &str,
        recommendation: &RankedRecommendation,
    ) -> Result<String, AppError>;

    /// Answers a follow-up question from retrieved profile context.
    async fn answer_with_context(&self, question: &str, context: &str) -> Result<String, AppError>;

    /// Answers a question asked outside any session, with no profile on file.
    async fn answer_without_profile(&self, question: &str) -> Result<String, AppError>;
}

pub struct LlmAdvisor {
    llm: LlmClient,
}

impl LlmAdvisor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Advisor for LlmAdvisor {
    async fn initial_advice(
        &self,
        summary: &str,
        recommendation: &RankedRecommendation,
    ) -> Result<String, AppError> {
        let prompt = build_initial_prompt(summary, recommendation);
        Ok(self.llm.complete(&prompt, ADVISOR_SYSTEM).await?)
    }

    async fn answer_with_context(&self, question: &str, context: &str) -> Result<String, AppError> {
        let prompt = build_rag_prompt(question, context);
        Ok(self.llm.complete(&prompt, ADVISOR_SYSTEM).await?)
    }

    async fn answer_without_profile(&self, question: &str) -> Result<String, AppError> {
        let prompt = build_fallback_prompt(question);
        Ok(self.llm.complete(&prompt, ADVISOR_SYSTEM).await?)
    }
}
