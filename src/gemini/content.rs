use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct GenerateContentRequest {
    pub(super) contents: Vec<Content>,
}

impl GenerateContentRequest {
    pub(super) fn prompt(text: impl ToString) -> Self {
        Self {
            contents: vec![Content {
                role: Some(String::from("user")),
                parts: vec![Part::text(text)],
            }],
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct GenerateContentResponse {
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub(super) struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    /// Set on the reasoning parts of thinking models.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    thought: bool,
}

impl Part {
    fn text(s: impl ToString) -> Self {
        Self {
            text: Some(s.to_string()),
            thought: false,
        }
    }
}

/// The text a model produced for one prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResult {
    pub text: String,
    pub model_version: Option<String>,
    pub finish_reason: Option<String>,
    pub block_reason: Option<String>,
}

impl From<GenerateContentResponse> for GenerationResult {
    fn from(resp: GenerateContentResponse) -> Self {
        let block_reason = resp.prompt_feedback.and_then(|f| f.block_reason);
        let Some(candidate) = resp.candidates.into_iter().next() else {
            return Self {
                model_version: resp.model_version,
                block_reason,
                ..Default::default()
            };
        };
        let text = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter(|p| !p.thought)
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();
        Self {
            text,
            model_version: resp.model_version,
            finish_reason: candidate.finish_reason,
            block_reason,
        }
    }
}

impl From<&str> for GenerationResult {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_request() {
        let req = GenerateContentRequest::prompt("hi there");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "contents": [{ "role": "user", "parts": [{ "text": "hi there" }] }]
            })
        );
    }

    #[test]
    fn serde_response_text() {
        let json = r#"
            {
              "candidates": [
                {
                  "content": {
                    "parts": [
                      { "text": "thinking about years", "thought": true },
                      { "text": " Hello! " },
                      { "text": "It's 2025. " }
                    ],
                    "role": "model"
                  },
                  "finishReason": "STOP",
                  "index": 0
                }
              ],
              "usageMetadata": { "promptTokenCount": 12, "totalTokenCount": 20 },
              "modelVersion": "gemini-1.5-flash-002"
            }
        "#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let result = GenerationResult::from(resp);
        assert_eq!(result.text, " Hello! It's 2025. ");
        assert_eq!(result.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(result.model_version.as_deref(), Some("gemini-1.5-flash-002"));
    }

    #[test]
    fn serde_blocked_prompt() {
        let json = r#"{ "promptFeedback": { "blockReason": "SAFETY" } }"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let result = GenerationResult::from(resp);
        assert!(result.text.is_empty());
        assert_eq!(result.block_reason.as_deref(), Some("SAFETY"));
    }
}
