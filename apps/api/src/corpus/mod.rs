// Corpus layer: record loading, search indexes, and the retrievers built on them.
// Indexes are built once at startup and are read-only while serving queries.

pub mod handlers;
pub mod index;
pub mod loader;
pub mod retriever;
pub mod sample;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::embeddings::EmbeddingClient;
use crate::llm_client::LlmError;
use crate::models::CorpusRecord;
use index::{EmbeddingIndex, KeywordIndex};
use retriever::CorpusRetriever;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to read data file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse data file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse CSV data file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Search engine error: {0}")]
    Search(String),

    #[error("Embedding error: {0}")]
    Embedding(#[from] LlmError),
}

/// Builds a retriever over `records`.
///
/// Uses the embedding index when a client is supplied and indexing succeeds;
/// otherwise falls back to the in-process keyword index.
pub async fn build_retriever<T: CorpusRecord>(
    records: Vec<T>,
    embeddings: Option<&EmbeddingClient>,
) -> CorpusRetriever<T> {
    let texts: Vec<String> = records.iter().map(CorpusRecord::descriptive_text).collect();

    if let Some(client) = embeddings {
        match EmbeddingIndex::build(client.clone(), &texts).await {
            Ok(index) => {
                info!("Built embedding index for {} ({} records)", T::CORPUS, texts.len());
                return CorpusRetriever::new(records, Arc::new(index));
            }
            Err(e) => warn!(
                "Embedding index for {} unavailable, using keyword index: {e}",
                T::CORPUS
            ),
        }
    }

    info!("Built keyword index for {} ({} records)", T::CORPUS, texts.len());
    CorpusRetriever::new(records, Arc::new(KeywordIndex::build(&texts)))
}
