//! Ollama backend: non-streaming `POST /api/generate`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{api_error, LlmError, SuggestionBackend};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaError {
    error: String,
}

pub struct OllamaBackend {
    client: Client,
    endpoint: String,
    model: String,
    temperature: f32,
}

impl OllamaBackend {
    pub fn new(client: Client, base_url: String, model: String, temperature: f32) -> Self {
        Self {
            client,
            endpoint: generate_endpoint(&base_url),
            model,
            temperature,
        }
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        }
    }
}

#[async_trait]
impl SuggestionBackend for OllamaBackend {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response, |body| {
                serde_json::from_str::<OllamaError>(body)
                    .ok()
                    .map(|e| e.error)
            })
            .await);
        }

        let generated: GenerateResponse = response.json().await?;
        debug!(
            "Ollama call succeeded: prompt_tokens={:?}, output_tokens={:?}",
            generated.prompt_eval_count, generated.eval_count
        );

        Ok(generated.response)
    }
}

fn generate_endpoint(base_url: &str) -> String {
    format!("{}/api/generate", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        assert_eq!(
            generate_endpoint("http://localhost:11434/"),
            "http://localhost:11434/api/generate"
        );
        assert_eq!(
            generate_endpoint("http://ollama:11434"),
            "http://ollama:11434/api/generate"
        );
    }

    #[test]
    fn test_request_body_is_non_streaming_with_temperature() {
        let backend = OllamaBackend::new(
            Client::new(),
            "http://localhost:11434".to_string(),
            "llama3".to_string(),
            0.7,
        );
        let body = serde_json::to_value(backend.request_body("hello")).unwrap();
        assert_eq!(body["model"], "llama3");
        assert_eq!(body["prompt"], "hello");
        assert_eq!(body["stream"], false);
        assert!((body["options"]["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_response_deserializes_without_counts() {
        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"model":"llama3","response":"Add Kubernetes","done":true}"#)
                .unwrap();
        assert_eq!(parsed.response, "Add Kubernetes");
        assert!(parsed.eval_count.is_none());
    }
}
