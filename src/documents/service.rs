use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};

use super::types::{Document, Post};

/// Errors that can occur while listing or analysing documents.
#[derive(Debug)]
pub enum DocumentsError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The API answered with a non-success status.
    Api { status: u16, message: String },
    /// The response body was not the expected JSON.
    Parse(String),
}

impl fmt::Display for DocumentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentsError::Network(msg) => write!(f, "network error: {msg}"),
            DocumentsError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            DocumentsError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for DocumentsError {}

/// Produces the ordered list of documents shown in the table.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn list_documents(&self) -> Result<Vec<Document>, DocumentsError>;
}

/// Runs an analysis on a document and returns a short status line.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, document: &Document) -> Result<String, DocumentsError>;
}

/// Lists documents derived from `GET {base_url}/posts`.
pub struct JsonPlaceholderSource {
    base_url: String,
    limit: usize,
    client: reqwest::Client,
}

impl JsonPlaceholderSource {
    pub fn new(base_url: String, limit: usize) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            limit,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl DocumentSource for JsonPlaceholderSource {
    async fn list_documents(&self) -> Result<Vec<Document>, DocumentsError> {
        let url = format!("{}/posts", self.base_url);
        info!("Fetching documents from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DocumentsError::Network(e.to_string()))?;

        debug!("Documents response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Documents API error: {} - {}", status, message);
            return Err(DocumentsError::Api { status, message });
        }

        let posts: Vec<Post> = response
            .json()
            .await
            .map_err(|e| DocumentsError::Parse(e.to_string()))?;

        let mut rng = rand::thread_rng();
        let documents: Vec<Document> = posts
            .iter()
            .take(self.limit)
            .map(|post| Document::from_post(post, &mut rng))
            .collect();

        info!(
            "Loaded {} documents ({} posts received)",
            documents.len(),
            posts.len()
        );
        Ok(documents)
    }
}

/// Stand-in for `POST /api/analyze`: waits, then reports success.
pub struct MockAnalysis {
    delay: Duration,
}

pub const ANALYSIS_COMPLETE: &str = "Analysis complete";

impl MockAnalysis {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl AnalysisService for MockAnalysis {
    async fn analyze(&self, document: &Document) -> Result<String, DocumentsError> {
        info!("Analyzing {} (mocked, {:?})", document.file_name, self.delay);
        tokio::time::sleep(self.delay).await;
        Ok(ANALYSIS_COMPLETE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> Document {
        Document {
            file_name: "a_b_c.pdf".into(),
            version: "v1.1".into(),
            size: "512 KB".into(),
            upload_date: "01.02.2024".into(),
            description: "desc".into(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_analysis_waits_for_delay() {
        let analysis = MockAnalysis::new(Duration::from_millis(1000));
        let start = tokio::time::Instant::now();
        let result = analysis.analyze(&sample_document()).await.unwrap();
        assert_eq!(result, ANALYSIS_COMPLETE);
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let source = JsonPlaceholderSource::new("http://example.test/".into(), 10);
        assert_eq!(source.base_url, "http://example.test");
    }

    #[test]
    fn test_error_display() {
        let err = DocumentsError::Api {
            status: 503,
            message: "down".into(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 503): down");
    }
}
