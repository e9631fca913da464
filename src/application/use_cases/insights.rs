// ============================================================
// INSIGHTS USE CASE
// ============================================================
// Build prompts from the filtered subset and run text generation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::domain::record::Record;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::clean_generated_text;

/// Records included in a generation prompt.
pub const SAMPLE_SIZE: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationKind {
    /// HTML fragment for the insights panel.
    Summary,
    /// Plain-text follow-up email body.
    Email,
}

impl GenerationKind {
    fn instruction(self) -> &'static str {
        match self {
            GenerationKind::Summary => concat!(
                "You are a compliance analyst reviewing agreement records. ",
                "Write a concise summary of the sample with: 1. an executive summary; ",
                "2. a bulleted list of the three most frequent issue buckets; ",
                "3. a bulleted list of the teams, cities or employees with the most non-compliant agreements; ",
                "4. one or two actionable recommendations. ",
                "Format the answer as simple HTML using only <p>, <h3>, <ul> and <li> tags, with bold headings."
            ),
            GenerationKind::Email => concat!(
                "You are a compliance manager writing a follow-up email about non-compliant agreements in a filtered report. ",
                "The email must: 1. start with a clear subject line; ",
                "2. address the relevant team(s), or \"All Teams\"; ",
                "3. state how many non-compliant agreements the current view contains; ",
                "4. list the most common issue buckets; ",
                "5. politely ask for a review of these agreements and a corrective action plan. ",
                "Use plain text only, no HTML tags."
            ),
        }
    }
}

/// The five fields sent to the generator for each sampled record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRow<'a> {
    pub status: &'a str,
    pub city: &'a str,
    pub team: &'a str,
    pub issue_bucket: &'a str,
    pub employee: &'a str,
}

pub fn sample(subset: &[Record]) -> Vec<SampleRow<'_>> {
    subset
        .iter()
        .take(SAMPLE_SIZE)
        .map(|record| SampleRow {
            status: &record.status,
            city: &record.city,
            team: &record.team,
            issue_bucket: &record.issue_bucket,
            employee: &record.employee_identifier,
        })
        .collect()
}

pub fn build_prompt(kind: GenerationKind, subset: &[Record]) -> Result<String> {
    let sample_json = serde_json::to_string_pretty(&sample(subset))
        .map_err(|e| AppError::Internal(format!("Failed to serialize sample: {}", e)))?;
    let invalid = subset.iter().filter(|record| !record.is_valid()).count();

    Ok(format!(
        "{}\n\nThe current view holds {} agreements, {} of them non-compliant. \
         A sample of up to {} records in JSON format:\n{}",
        kind.instruction(),
        subset.len(),
        invalid,
        SAMPLE_SIZE,
        sample_json
    ))
}

/// Disables one triggering control while its generation call is in flight.
#[derive(Debug, Default)]
pub struct ControlLatch {
    busy: AtomicBool,
}

impl ControlLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` if the control is already busy.
    pub fn try_acquire(&self) -> Option<LatchGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LatchGuard { latch: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Re-enables the control on drop, whatever the outcome.
pub struct LatchGuard<'a> {
    latch: &'a ControlLatch,
}

impl Drop for LatchGuard<'_> {
    fn drop(&mut self) {
        self.latch.busy.store(false, Ordering::Release);
    }
}

pub struct InsightsUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    summary_latch: ControlLatch,
    email_latch: ControlLatch,
}

impl InsightsUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self {
            llm_client,
            summary_latch: ControlLatch::new(),
            email_latch: ControlLatch::new(),
        }
    }

    fn latch(&self, kind: GenerationKind) -> &ControlLatch {
        match kind {
            GenerationKind::Summary => &self.summary_latch,
            GenerationKind::Email => &self.email_latch,
        }
    }

    pub fn is_busy(&self, kind: GenerationKind) -> bool {
        self.latch(kind).is_busy()
    }

    /// Generate text for `kind` from an already-built prompt.
    ///
    /// The caller builds the prompt while holding the session, then releases
    /// it before awaiting here.
    pub async fn execute(
        &self,
        config: &LLMConfig,
        kind: GenerationKind,
        prompt: &str,
    ) -> Result<String> {
        let _guard = self.latch(kind).try_acquire().ok_or_else(|| {
            AppError::Busy(format!("{:?} generation is already running", kind))
        })?;

        info!(kind = ?kind, prompt_chars = prompt.len(), "Requesting generated text");

        let raw = self
            .llm_client
            .generate(config, prompt)
            .await
            .map_err(|err| {
                error!(kind = ?kind, error = %err, "Text generation failed");
                match err {
                    AppError::GenerationError(_) => err,
                    other => AppError::GenerationError(other.to_string()),
                }
            })?;

        let cleaned = clean_generated_text(&raw);
        if cleaned.is_empty() {
            return Err(AppError::GenerationError(
                "generator returned an empty response".to_string(),
            ));
        }
        Ok(cleaned)
    }
}
