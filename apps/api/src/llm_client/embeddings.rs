//! Embedding client for corpus indexing.
//!
//! Only used at startup (bulk) and once per query by `EmbeddingIndex`.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::LlmError;

const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";
pub const EMBEDDING_MODEL: &str = "text-embedding-3-small";
/// Inputs per request. Keeps bulk indexing requests under provider limits.
const BATCH_SIZE: usize = 64;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Clone)]
pub struct EmbeddingClient {
    client: Client,
    api_key: String,
}

impl EmbeddingClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(60)).build()?,
            api_key,
        })
    }

    /// Embeds every input, preserving input order in the returned vectors.
    pub async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        let mut vectors = Vec::with_capacity(inputs.len());

        for batch in inputs.chunks(BATCH_SIZE) {
            let response = self
                .client
                .post(OPENAI_EMBEDDINGS_URL)
                .bearer_auth(&self.api_key)
                .json(&EmbeddingRequest {
                    model: EMBEDDING_MODEL,
                    input: batch,
                })
                .send()
                .await
                .map_err(LlmError::from_transport)?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body: EmbeddingResponse = response.json().await.map_err(LlmError::from_transport)?;
            vectors.extend(order_by_index(body.data, batch.len())?);
        }

        debug!("Embedded {} inputs with {}", inputs.len(), EMBEDDING_MODEL);
        Ok(vectors)
    }
}

/// The API may return data out of order; reorder and check nothing is missing.
fn order_by_index(mut data: Vec<EmbeddingDatum>, expected: usize) -> Result<Vec<Vec<f32>>, LlmError> {
    if data.len() != expected {
        return Err(LlmError::EmptyContent);
    }
    data.sort_by_key(|d| d.index);
    Ok(data.into_iter().map(|d| d.embedding).collect())
}
