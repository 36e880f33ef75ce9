use serde::Serialize;
use serde_json::Value;

mod anthropic_api;
mod prompt;
mod relay_api;

pub use prompt::{build_prompt, PromptWord};

pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_MAX_TOKENS: u32 = 512;

#[derive(Debug, thiserror::Error)]
pub enum SuggestionError {
    #[error("could not reach the suggestion service: {0}")]
    Fetch(#[source] reqwest::Error),
    #[error("suggestion service responded with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("could not read the suggestion response: {0}")]
    Deserialize(#[source] reqwest::Error),
    #[error("no suggestion endpoint or API key is configured")]
    MissingApiKey,
}

/// Where suggestion requests are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Talk to the Messages API directly with a locally held key.
    Anthropic {
        api_key: String,
        model: String,
        max_tokens: u32,
    },
    /// Post the word list to a hosted endpoint that holds the key and builds the prompt.
    Relay { url: String },
}

impl Backend {
    /// A relay endpoint wins over a local key; neither is an error.
    pub fn resolve(
        endpoint: Option<String>,
        api_key: Option<String>,
        model: Option<String>,
        max_tokens: Option<u32>,
    ) -> Result<Self, SuggestionError> {
        if let Some(url) = endpoint.filter(|url| !url.trim().is_empty()) {
            return Ok(Backend::Relay { url });
        }
        match api_key.filter(|key| !key.trim().is_empty()) {
            Some(api_key) => Ok(Backend::Anthropic {
                api_key,
                model: model.unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
                max_tokens: max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            }),
            None => Err(SuggestionError::MissingApiKey),
        }
    }
}

pub struct Suggester {
    client: reqwest::Client,
    backend: Backend,
}

impl Suggester {
    pub fn new(backend: Backend) -> Self {
        Self {
            client: reqwest::Client::new(),
            backend,
        }
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Asks for five new words based on `words` and hands back the service's raw response.
    pub async fn suggest<W>(&self, words: &[W]) -> Result<Value, SuggestionError>
    where
        W: PromptWord + Serialize,
    {
        match &self.backend {
            Backend::Anthropic {
                api_key,
                model,
                max_tokens,
            } => {
                let prompt = build_prompt(words);
                anthropic_api::create_message(&self.client, api_key, model, *max_tokens, &prompt)
                    .await
            }
            Backend::Relay { url } => relay_api::request_suggestions(&self.client, url, words).await,
        }
    }
}

/// Joins the text blocks of a Messages API response. `None` when the value has no
/// text content, in which case callers show the raw structure instead.
pub fn extract_text(response: &Value) -> Option<String> {
    let blocks = response.get("content")?.as_array()?;
    let texts = blocks
        .iter()
        .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .collect::<Vec<&str>>();
    if texts.is_empty() {
        None
    } else {
        Some(texts.join("\n"))
    }
}

pub(crate) async fn read_json(res: reqwest::Response) -> Result<Value, SuggestionError> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(SuggestionError::Status { status, body });
    }
    res.json::<Value>()
        .await
        .map_err(SuggestionError::Deserialize)
}
