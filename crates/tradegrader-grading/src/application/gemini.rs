//! Grader backed by Google's Gemini `generateContent` REST endpoint.

use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, instrument};
use tradegrader_core::error::DomainError;

use super::grader::TradeGrader;
use crate::domain::scoring::{GradeReport, parse_grading_text};

/// Public Gemini API host.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(25);

pub(crate) fn format_reqwest_error(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !cause_msg.is_empty() && !message.contains(&cause_msg) {
            message.push_str(": ");
            message.push_str(&cause_msg);
        }
        source = cause.source();
    }
    message
}

/// Builds the grading prompt for a trade seen from the user's side.
#[must_use]
pub fn build_prompt(incoming: &[String], outgoing: &[String]) -> String {
    format!(
        "You are a fantasy football expert analyzing a trade from MY team's perspective. \
Score this trade on a scale of 0-100 based on whether it is good for MY team.

TRADE DETAILS (from MY perspective):
I am GETTING: {getting}
I am GIVING UP: {giving}

Consider value received versus value given up, recent form, positional needs and \
roster construction, injury risk, playoff schedule strength (weeks 15-17), age and \
long-term value, and opportunity in each player's current team.

Scoring guide:
- 80-100: Excellent trade for me, clear win
- 65-79: Good trade, favorable value
- 50-64: Fair trade, roughly even value
- 35-49: Poor trade, losing value
- 0-34: Very poor trade, significant loss

Answer in exactly this format:
SCORE: [0-100 integer score]
GRADE: [Excellent/Good/Fair/Poor/Very Poor]
ANALYSIS: [3-4 sentences on the value I get versus what I give up]",
        getting = incoming.join(", "),
        giving = outgoing.join(", "),
    )
}

/// Concatenates the text parts of the first candidate.
fn extract_text(body: &Value) -> Option<String> {
    let parts = body
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    (!text.trim().is_empty()).then_some(text)
}

/// Grades trades by prompting a Gemini model.
#[derive(Debug, Clone)]
pub struct GeminiGrader {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGrader {
    /// Creates a grader for `model` on the public API.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the HTTP client cannot be
    /// built.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DomainError::Infrastructure(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_BASE.to_owned(),
        })
    }

    /// Points the grader at another host, e.g. a local stub.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim().trim_end_matches('/').to_owned();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl TradeGrader for GeminiGrader {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip(self, incoming, outgoing), fields(model = %self.model))]
    async fn grade(
        &self,
        incoming: &[String],
        outgoing: &[String],
    ) -> Result<GradeReport, DomainError> {
        let payload = json!({
            "contents": [
                { "parts": [ { "text": build_prompt(incoming, outgoing) } ] }
            ]
        });

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DomainError::Upstream(format_reqwest_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::Upstream(format!(
                "gemini returned {status}: {}",
                body.chars().take(400).collect::<String>()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| DomainError::Upstream(format!("unreadable gemini response: {e}")))?;
        let text = extract_text(&body)
            .ok_or_else(|| DomainError::Upstream("gemini response carried no text".to_owned()))?;

        let report = parse_grading_text(&text);
        debug!(score = report.score, grade = %report.grade, "gemini graded trade");
        Ok(report)
    }
}
