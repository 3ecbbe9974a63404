//! `OpenAI` and `OpenAI`-compatible chat completions provider

use super::types::{LlmRequest, LlmResponse, Usage};
use super::{LlmError, LlmService};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI-compatible service implementation
pub struct OpenAIService {
    client: Client,
    api_key: String,
    api_name: &'static str,
    base_url: String,
    model_id: &'static str,
}

impl OpenAIService {
    /// `base_url` overrides the API root (e.g. a local vLLM or Ollama server);
    /// `gateway` takes precedence over it.
    pub fn new(
        api_key: String,
        model_id: &'static str,
        api_name: &'static str,
        gateway: Option<&str>,
        base_url: Option<&str>,
    ) -> Result<Self, LlmError> {
        let base_url = match (gateway, base_url) {
            (Some(gw), _) => format!("{}/openai/v1/chat/completions", gw.trim_end_matches('/')),
            (None, Some(root)) => format!("{}/chat/completions", root.trim_end_matches('/')),
            (None, None) => "https://api.openai.com/v1/chat/completions".to_string(),
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| LlmError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            api_name,
            base_url,
            model_id,
        })
    }

    fn translate_request<'a>(&self, request: &'a LlmRequest) -> OpenAIRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system.as_deref() {
            messages.push(OpenAIMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(OpenAIMessage {
            role: "user",
            content: &request.prompt,
        });

        OpenAIRequest {
            model: self.api_name,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
        }
    }

    fn normalize_response(&self, resp: OpenAIResponse) -> Result<LlmResponse, LlmError> {
        let text = resp
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| LlmError::empty_response(self.model_id))?;

        let usage = resp.usage.map_or_else(Usage::default, |u| Usage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        });

        Ok(LlmResponse { text, usage })
    }
}

#[async_trait]
impl LlmService for OpenAIService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&self.translate_request(request))
            .send()
            .await
            .map_err(|e| LlmError::from_transport(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<OpenAIErrorResponse>(&body)
                .map_or(body, |parsed| parsed.error.message);
            return Err(LlmError::from_status(status, &message));
        }

        let parsed: OpenAIResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::unknown(format!("Failed to parse response: {e}")))?;

        self.normalize_response(parsed)
    }

    fn model_id(&self) -> &str {
        self.model_id
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[allow(clippy::struct_field_names)]
struct OpenAIUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorResponse {
    error: OpenAIError,
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(base_url: Option<&str>) -> OpenAIService {
        OpenAIService::new("k".to_string(), "gpt-4o-mini", "gpt-4o-mini", None, base_url).unwrap()
    }

    #[test]
    fn test_system_prompt_becomes_first_message() {
        let request = LlmRequest {
            system: Some("json only".to_string()),
            ..LlmRequest::user_prompt("hi")
        }
        .with_max_tokens(64);
        let body = serde_json::to_value(service(None).translate_request(&request)).unwrap();
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert_eq!(body["max_tokens"], 64);
        assert_eq!(body["stream"], false);
    }

    #[test]
    fn test_base_url_override() {
        let svc = service(Some("http://localhost:11434/v1/"));
        assert_eq!(svc.base_url, "http://localhost:11434/v1/chat/completions");
    }

    #[test]
    fn test_normalize_missing_usage() {
        let resp: OpenAIResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"ok"}}]}"#).unwrap();
        let out = service(None).normalize_response(resp).unwrap();
        assert_eq!(out.text, "ok");
        assert_eq!(out.usage.input_tokens, 0);
    }

    #[test]
    fn test_normalize_null_content_is_error() {
        let resp: OpenAIResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(service(None).normalize_response(resp).is_err());
    }
}
