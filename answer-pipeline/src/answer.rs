use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use common::{error::AppError, utils::config::AppConfig};
use tokio::time::timeout;
use tracing::info;

use crate::{
    greeting::{is_greeting, GREETING_RESPONSE},
    sanitize::clean_response,
};

/// Documents are clipped to this many characters before prompt assembly;
/// longer documents are silently truncated, not summarized or chunked.
pub const MAX_DOCUMENT_CHARS: usize = 8000;
/// Output cap forwarded to the completion endpoint.
const MAX_COMPLETION_TOKENS: u32 = 2000;
/// Upper bound on the remote call. There is no retry.
const COMPLETION_TIMEOUT_SECS: u64 = 60;

/// Answers a question about extracted document text with a single remote
/// completion request. Conversational greetings short-circuit to a canned
/// reply without any network traffic.
pub async fn answer_question(
    client: &Client<OpenAIConfig>,
    config: &AppConfig,
    document_text: &str,
    question: &str,
    temperature: f32,
) -> Result<String, AppError> {
    if is_greeting(question) {
        return Ok(GREETING_RESPONSE.to_string());
    }

    if config.openrouter_api_key.is_empty() {
        return Err(AppError::Configuration(
            "OpenRouter API key not configured".to_string(),
        ));
    }

    let prompt = build_prompt(document_text, question);

    let request = CreateChatCompletionRequestArgs::default()
        .model(config.openrouter_model.clone())
        .messages([ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()?
            .into()])
        .temperature(temperature)
        .max_completion_tokens(MAX_COMPLETION_TOKENS)
        .build()?;

    let response = timeout(
        Duration::from_secs(COMPLETION_TIMEOUT_SECS),
        client.chat().create(request),
    )
    .await
    .map_err(|_| {
        AppError::Upstream(format!(
            "Completion request timed out after {COMPLETION_TIMEOUT_SECS}s"
        ))
    })??;

    let content = response
        .choices
        .first()
        .and_then(|choice| choice.message.content.clone())
        .ok_or_else(|| AppError::Upstream("Completion response carried no message".to_string()))?;

    info!(
        model = %config.openrouter_model,
        response_chars = content.len(),
        "Received completion response"
    );

    Ok(clean_response(&content))
}

/// Variant that prepends caller-supplied context ahead of the document text.
/// The combined text flows through the same pipeline, including the greeting
/// short-circuit and the document character cap.
pub async fn answer_question_with_context(
    client: &Client<OpenAIConfig>,
    config: &AppConfig,
    document_text: &str,
    question: &str,
    context: &str,
    temperature: f32,
) -> Result<String, AppError> {
    let combined = format!("{context}\n\nDocument Content:\n{document_text}");
    answer_question(client, config, &combined, question, temperature).await
}

fn build_prompt(document_text: &str, question: &str) -> String {
    let clipped = truncate_document(document_text, MAX_DOCUMENT_CHARS);

    format!(
        r"You are a helpful document analysis assistant. Analyze the following document and answer the user's question.

<document>
{clipped}
</document>

User Question: {question}

Instructions:
- Provide a clear, direct answer based ONLY on the document content
- Be concise but complete
- If the information is not in the document, politely say so
- Use proper formatting with paragraphs for readability
- Do not include any special characters, escape sequences, or formatting markers"
    )
}

fn truncate_document(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> Client<OpenAIConfig> {
        Client::with_config(
            OpenAIConfig::new()
                .with_api_key("test-key")
                .with_api_base(base_url),
        )
    }

    fn test_config() -> AppConfig {
        AppConfig {
            openrouter_api_key: "test-key".to_string(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_truncate_document_clips_at_char_boundary() {
        let text = "ä".repeat(9000);
        let clipped = truncate_document(&text, MAX_DOCUMENT_CHARS);
        assert_eq!(clipped.chars().count(), MAX_DOCUMENT_CHARS);

        let short = truncate_document("short", MAX_DOCUMENT_CHARS);
        assert_eq!(short, "short");
    }

    #[test]
    fn test_prompt_embeds_clipped_document() {
        let text = "a".repeat(9000);
        let prompt = build_prompt(&text, "what is this?");

        let embedded_a_count = prompt.chars().filter(|c| *c == 'a').count();
        // "a" occurs in the instruction scaffolding too; the document block
        // must contribute exactly the cap.
        let scaffolding_a_count = build_prompt("", "what is this?")
            .chars()
            .filter(|c| *c == 'a')
            .count();
        assert_eq!(embedded_a_count - scaffolding_a_count, MAX_DOCUMENT_CHARS);
        assert!(prompt.contains("what is this?"));
    }

    #[tokio::test]
    async fn test_greeting_short_circuits_without_remote_call() {
        // Intentionally unroutable endpoint: a remote call would error out
        let client = test_client("http://127.0.0.1:1/v1");
        let config = test_config();

        let answer = answer_question(&client, &config, "", "hello there", 0.7)
            .await
            .expect("Greeting must not require the remote endpoint");
        assert_eq!(answer, GREETING_RESPONSE);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_a_configuration_error() {
        let client = test_client("http://127.0.0.1:1/v1");
        let config = AppConfig::default();

        let result =
            answer_question(&client, &config, "doc text", "What is the revenue?", 0.7).await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_answer_is_cleaned_before_returning() {
        let mut server = mockito::Server::new_async().await;
        let body = serde_json::json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 0,
            "model": "openrouter/auto",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "  Revenue was \\n$5M.  "
                },
                "finish_reason": "stop"
            }]
        });
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = test_client(&server.url());
        let config = test_config();

        let answer = answer_question(
            &client,
            &config,
            "Annual report text",
            "What is the total revenue?",
            0.7,
        )
        .await
        .expect("Mocked completion should succeed");

        assert_eq!(answer, "Revenue was $5M.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upstream_failure_surfaces_as_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let client = test_client(&server.url());
        let config = test_config();

        let result = answer_question(&client, &config, "doc", "What happened?", 0.7).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_context_variant_keeps_greeting_short_circuit() {
        let client = test_client("http://127.0.0.1:1/v1");
        let config = test_config();

        let answer = answer_question_with_context(
            &client,
            &config,
            "document body",
            "good evening",
            "prior conversation",
            0.2,
        )
        .await
        .expect("Greeting must not require the remote endpoint");
        assert_eq!(answer, GREETING_RESPONSE);
    }
}
