use serde::Serialize;
use serde_json::Value;

use crate::SuggestionError;

const MESSAGES_API_URL: &'static str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &'static str = "2023-06-01";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

pub(crate) async fn create_message(
    client: &reqwest::Client,
    api_key: &str,
    model: &str,
    max_tokens: u32,
    prompt: &str,
) -> Result<Value, SuggestionError> {
    let body = MessagesRequest {
        model,
        max_tokens,
        messages: [Message {
            role: "user",
            content: prompt,
        }],
    };
    tracing::debug!(model, max_tokens, prompt_len = prompt.len(), "requesting suggestions");
    let res = client
        .post(MESSAGES_API_URL)
        .header("x-api-key", api_key)
        .header("anthropic-version", API_VERSION)
        .json(&body)
        .send()
        .await
        .map_err(SuggestionError::Fetch)?;
    crate::read_json(res).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_has_single_user_message() {
        let body = MessagesRequest {
            model: "claude-3-5-haiku-20241022",
            max_tokens: 512,
            messages: [Message {
                role: "user",
                content: "hi",
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "claude-3-5-haiku-20241022",
                "max_tokens": 512,
                "messages": [{ "role": "user", "content": "hi" }]
            })
        );
    }
}
