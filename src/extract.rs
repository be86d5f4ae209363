//! Criteria extraction via the external generative-language API.
//!
//! The model call is a collaborator: we send the user prompt wrapped in a
//! fixed instruction block and take back `{title[], description[],
//! tags[]}`. An unreachable service, a non-2xx upstream status, or a
//! structurally invalid payload all surface as upstream errors — nothing
//! here is recovered locally.

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::error::ApiError;
use crate::models::SearchCriteria;

#[derive(Clone)]
pub struct CriteriaExtractor {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl CriteriaExtractor {
    pub fn new(url: String, api_key: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            url,
            api_key,
        })
    }

    pub async fn extract(&self, prompt: &str) -> Result<SearchCriteria, ApiError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(ApiError::Upstream {
                status: None,
                message: "criteria extraction is not configured".to_string(),
            });
        };

        let body = json!({
            "contents": [{
                "parts": [{ "text": extraction_instruction(prompt) }]
            }],
            "generationConfig": {
                "temperature": 0.2,
                "topK": 40,
                "topP": 0.8,
                "maxOutputTokens": 1024,
            }
        });

        let response = self
            .client
            .post(&self.url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "criteria extraction request failed");
                ApiError::Upstream {
                    status: None,
                    message: format!("failed to reach the extraction service: {e}"),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Upstream {
                status: StatusCode::from_u16(status.as_u16()).ok(),
                message: format!("extraction service answered {status}"),
            });
        }

        let payload: Value = response.json().await.map_err(|e| {
            error!(error = %e, "extraction response was not JSON");
            upstream_invalid(e.to_string())
        })?;

        let text = payload
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .ok_or_else(|| upstream_invalid("response carried no candidate text"))?;

        let criteria = parse_criteria_text(text)?;
        debug!(?criteria, "extracted search criteria");
        Ok(criteria)
    }
}

fn extraction_instruction(prompt: &str) -> String {
    format!(
        r#"Extract search criteria from this prompt: "{prompt}".
Return a JSON object with the following fields only:
- title: an array of potential title keywords
- description: an array of descriptive keywords
- tags: an array of relevant technology tags
Example format:
{{
    "title": ["portfolio website"],
    "description": ["simple"],
    "tags": ["html", "css"]
}}"#
    )
}

/// Model output arrives as prose-wrapped JSON, usually inside a Markdown
/// code fence. Strip fences, parse, and demand all three array fields;
/// even empty ones must be present.
fn parse_criteria_text(text: &str) -> Result<SearchCriteria, ApiError> {
    let cleaned = text.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();

    let value: Value = serde_json::from_str(cleaned)
        .map_err(|e| upstream_invalid(format!("candidate text is not JSON: {e}")))?;

    for field in ["title", "description", "tags"] {
        if !value.get(field).map(Value::is_array).unwrap_or(false) {
            return Err(upstream_invalid(format!(
                "`{field}` is missing or not an array"
            )));
        }
    }

    SearchCriteria::from_json(&value).map_err(|e| upstream_invalid(e.to_string()))
}

fn upstream_invalid(detail: impl std::fmt::Display) -> ApiError {
    ApiError::Upstream {
        status: None,
        message: format!("extraction service returned an invalid payload: {detail}"),
    }
}
