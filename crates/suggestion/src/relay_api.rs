use serde::Serialize;
use serde_json::Value;

use crate::SuggestionError;

#[derive(Serialize)]
struct RelayRequest<'a, W> {
    vocabulary: &'a [W],
}

pub(crate) async fn request_suggestions<W: Serialize>(
    client: &reqwest::Client,
    url: &str,
    words: &[W],
) -> Result<Value, SuggestionError> {
    tracing::debug!(url, words = words.len(), "posting word list to relay");
    let res = client
        .post(url)
        .json(&RelayRequest { vocabulary: words })
        .send()
        .await
        .map_err(SuggestionError::Fetch)?;
    crate::read_json(res).await
}
