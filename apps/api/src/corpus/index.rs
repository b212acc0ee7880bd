//! Search indexes — the similarity engines behind each corpus retriever.
//!
//! Default: `KeywordIndex` (pure-Rust TF-IDF cosine, deterministic, no network).
//! Optional: `EmbeddingIndex` (dense vectors from the embedding API).
//!
//! Both return hits as positions into the record list they were built from,
//! ordered by score with ties kept in insertion order.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;

use super::CorpusError;
use crate::llm_client::embeddings::EmbeddingClient;

/// A single search result: the record's insertion position and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub position: usize,
    pub score: f32,
}

/// The similarity-search engine. The retriever owns the records; the engine
/// owns scoring and ranking.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>, CorpusError>;
}

/// Sorts by descending score and keeps the first `top_k`.
/// Non-positive scores are dropped. `sort_by` is stable, so equal scores
/// stay in insertion order.
fn rank_hits(scores: impl IntoIterator<Item = (usize, f32)>, top_k: usize) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = scores
        .into_iter()
        .filter(|(_, score)| *score > 0.0)
        .map(|(position, score)| SearchHit { position, score })
        .collect();
    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    hits.truncate(top_k);
    hits
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordIndex
// ────────────────────────────────────────────────────────────────────────────

const STOP_WORDS: &[&str] = &[
    "a", "about", "an", "and", "any", "are", "as", "at", "be", "by", "can", "do", "find", "for",
    "from", "get", "how", "i", "in", "is", "it", "me", "my", "of", "on", "or", "show", "some",
    "that", "the", "there", "to", "what", "where", "which", "with", "you",
];

/// Lower-cased word tokens with stop words removed and plurals folded.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .filter(|t| !STOP_WORDS.contains(&t.as_str()))
        .map(|t| stem(&t))
        .collect()
}

fn stem(token: &str) -> String {
    if token.len() > 4 && token.ends_with("ies") {
        format!("{}y", &token[..token.len() - 3])
    } else if token.len() > 3 && token.ends_with('s') && !token.ends_with("ss") {
        token[..token.len() - 1].to_string()
    } else {
        token.to_string()
    }
}

/// In-process TF-IDF index with cosine scoring.
///
/// Weights: (1 + ln tf) × idf, idf = ln((1 + N) / (1 + df)) + 1, vectors L2-normalized.
pub struct KeywordIndex {
    idf: HashMap<String, f32>,
    documents: Vec<HashMap<String, f32>>,
}

impl KeywordIndex {
    pub fn build(texts: &[String]) -> Self {
        let term_counts: Vec<HashMap<String, u32>> =
            texts.iter().map(|t| count_terms(&tokenize(t))).collect();

        let mut document_frequency: HashMap<String, u32> = HashMap::new();
        for counts in &term_counts {
            for term in counts.keys() {
                *document_frequency.entry(term.clone()).or_default() += 1;
            }
        }

        let n = texts.len() as f32;
        let idf: HashMap<String, f32> = document_frequency
            .into_iter()
            .map(|(term, df)| (term, ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0))
            .collect();

        let documents = term_counts
            .iter()
            .map(|counts| weigh(counts, &idf))
            .collect();

        Self { idf, documents }
    }

    fn score(&self, query: &str, top_k: usize) -> Vec<SearchHit> {
        let query_vector = weigh(&count_terms(&tokenize(query)), &self.idf);
        if query_vector.is_empty() {
            return Vec::new();
        }

        let scores = self.documents.iter().enumerate().map(|(position, doc)| {
            let dot: f32 = query_vector
                .iter()
                .filter_map(|(term, qw)| doc.get(term).map(|dw| qw * dw))
                .sum();
            (position, dot)
        });

        rank_hits(scores, top_k)
    }
}

#[async_trait]
impl SearchIndex for KeywordIndex {
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>, CorpusError> {
        Ok(self.score(query, top_k))
    }
}

fn count_terms(tokens: &[String]) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_default() += 1;
    }
    counts
}

/// Unknown terms (absent from the index vocabulary) get no weight.
fn weigh(counts: &HashMap<String, u32>, idf: &HashMap<String, f32>) -> HashMap<String, f32> {
    let mut weights: HashMap<String, f32> = counts
        .iter()
        .filter_map(|(term, tf)| {
            idf.get(term)
                .map(|idf| (term.clone(), (1.0 + (*tf as f32).ln()) * idf))
        })
        .collect();

    let norm = weights.values().map(|w| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        weights.values_mut().for_each(|w| *w /= norm);
    }
    weights
}

// ────────────────────────────────────────────────────────────────────────────
// EmbeddingIndex
// ────────────────────────────────────────────────────────────────────────────

/// Dense-vector index. Document vectors are fetched once at build time;
/// each search embeds only the query.
pub struct EmbeddingIndex {
    client: EmbeddingClient,
    vectors: Vec<Vec<f32>>,
}

impl EmbeddingIndex {
    pub async fn build(client: EmbeddingClient, texts: &[String]) -> Result<Self, CorpusError> {
        let vectors = if texts.is_empty() {
            Vec::new()
        } else {
            client.embed(texts).await?
        };
        Ok(Self { client, vectors })
    }
}

#[async_trait]
impl SearchIndex for EmbeddingIndex {
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>, CorpusError> {
        if self.vectors.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self
            .client
            .embed(&[query.to_string()])
            .await?
            .pop()
            .ok_or_else(|| CorpusError::Search("empty query embedding".to_string()))?;

        let scores = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, v)| (position, cosine_similarity(&query_vector, v)));

        Ok(rank_hits(scores, top_k))
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
