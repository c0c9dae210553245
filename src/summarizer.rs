//! Article summarization through an OpenAI-compatible LLM API.
//!
//! # Architecture
//!
//! - [`Summarize`]: Core trait the digest pipeline depends on
//! - [`ChatSummarizer`]: `POST {endpoint}/chat/completions` client
//! - [`RetrySummarize`]: Decorator that adds retry logic to any [`Summarize`] implementation
//!
//! # Retry Strategy
//!
//! - Exponential backoff starting at 1 second
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd

use crate::config::SummarizerConfig;
use crate::error::SummarizeError;
use crate::utils::truncate_for_log;
use rand::{rng, Rng};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

const SYSTEM_PROMPT: &str = "You summarize news articles. Reply with a neutral summary of \
at most three sentences. Do not add commentary or information that is not in the article.";

/// Anything that can turn article text into a short summary.
pub trait Summarize {
    /// Summarize the full body text of one article.
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError>;
}

/// Wrapper that adds exponential backoff retry logic to any [`Summarize`] implementation.
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetrySummarize<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetrySummarize<T>
where
    T: Summarize,
{
    /// Create a new retry wrapper around an existing [`Summarize`] implementation.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = ChatSummarizer::new(&config.summarizer)?;
    /// let summarizer = RetrySummarize::new(client, 3, Duration::from_secs(1));
    /// ```
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetrySummarize<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetrySummarize")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> Summarize for RetrySummarize<T>
where
    T: Summarize,
{
    #[instrument(level = "info", skip_all)]
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.summarize(text).await {
                Ok(summary) => return Ok(summary),
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "summarize() exhausted retries"
                        );
                        return Err(e);
                    }

                    // backoff calc
                    let shift = (attempt - 1).min(16) as u32;
                    let delay = self
                        .base_delay
                        .saturating_mul(1 << shift)
                        .min(self.max_delay);
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                        ?delay,
                        error = %e,
                        "summarize() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Summarizer backed by an OpenAI-compatible chat-completions endpoint
/// (OpenAI, Ollama, llama.cpp server, vLLM, ...).
#[derive(Debug, Clone)]
pub struct ChatSummarizer {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl ChatSummarizer {
    pub fn new(config: &SummarizerConfig) -> Result<Self, SummarizeError> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: format!("{}/chat/completions", config.endpoint.trim_end_matches('/')),
            model: config.model.clone(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
        })
    }
}

impl Summarize for ChatSummarizer {
    #[instrument(level = "info", skip_all, fields(model = %self.model, chars = text.len()))]
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        let t0 = Instant::now();
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            stream: false,
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %truncate_for_log(&body, 300), "Summarizer returned an error");
            return Err(SummarizeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let summary = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();
        if summary.is_empty() {
            return Err(SummarizeError::EmptyResponse);
        }

        info!(elapsed_ms = t0.elapsed().as_millis() as u64, "Summarized article");
        Ok(summary)
    }
}

/// Build the default summarizer stack: [`ChatSummarizer`] wrapped in [`RetrySummarize`].
pub fn summarizer_from_config(
    config: &SummarizerConfig,
) -> Result<RetrySummarize<ChatSummarizer>, SummarizeError> {
    let client = ChatSummarizer::new(config)?;
    Ok(RetrySummarize::new(
        client,
        config.max_retries,
        StdDuration::from_secs(1),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Flaky {
        failures: usize,
        calls: AtomicUsize,
    }

    impl Summarize for Flaky {
        async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(SummarizeError::EmptyResponse)
            } else {
                Ok(format!("summary of {text}"))
            }
        }
    }

    fn config_for(server: &MockServer) -> SummarizerConfig {
        SummarizerConfig {
            endpoint: format!("{}/v1", server.uri()),
            model: "test-model".to_string(),
            api_key: Some("sk-test".to_string()),
            timeout_secs: 5,
            max_retries: 0,
        }
    }

    #[tokio::test]
    async fn test_retry_recovers_after_failures() {
        let flaky = Flaky {
            failures: 2,
            calls: AtomicUsize::new(0),
        };
        let retry = RetrySummarize::new(flaky, 3, StdDuration::from_millis(1));

        let summary = retry.summarize("text").await.unwrap();
        assert_eq!(summary, "summary of text");
        assert_eq!(retry.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up() {
        let flaky = Flaky {
            failures: usize::MAX,
            calls: AtomicUsize::new(0),
        };
        let retry = RetrySummarize::new(flaky, 1, StdDuration::from_millis(1));

        assert!(retry.summarize("text").await.is_err());
        assert_eq!(retry.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_chat_summarizer_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({"model": "test-model", "stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "  Short summary. \n"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let summarizer = ChatSummarizer::new(&config_for(&server)).unwrap();
        let summary = summarizer.summarize("Long article body").await.unwrap();
        assert_eq!(summary, "Short summary.");
    }

    #[tokio::test]
    async fn test_chat_summarizer_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let summarizer = ChatSummarizer::new(&config_for(&server)).unwrap();
        let err = summarizer.summarize("text").await.unwrap_err();
        assert!(matches!(err, SummarizeError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_chat_summarizer_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let summarizer = ChatSummarizer::new(&config_for(&server)).unwrap();
        let err = summarizer.summarize("text").await.unwrap_err();
        assert!(matches!(err, SummarizeError::EmptyResponse));
    }
}
