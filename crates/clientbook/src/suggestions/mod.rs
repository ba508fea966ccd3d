//! Exercise suggestions for the client detail view.
//!
//! Suggestions come from a read-only remote exercise catalog. Each detail
//! view triggers one fetch; failures are reported as [`FetchError`] and the
//! view shows [`UNAVAILABLE_PLACEHOLDER`] instead. Nothing is retried or
//! cached.
//!
//! # Example
//!
//! ```no_run
//! use clientbook::config::SuggestionsConfig;
//! use clientbook::suggestions::{ExerciseCatalog, HttpExerciseCatalog};
//!
//! # async fn demo() -> Result<(), clientbook::suggestions::FetchError> {
//! let catalog = HttpExerciseCatalog::new(&SuggestionsConfig::default())?;
//! for exercise in catalog.fetch_suggestions(5).await? {
//!     println!("{}: {}", exercise.name, exercise.description);
//! }
//! # Ok(())
//! # }
//! ```

pub mod sanitize;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::SuggestionsConfig;

/// Text shown in place of suggestions when the fetch fails.
pub const UNAVAILABLE_PLACEHOLDER: &str = "Exercise suggestions are unavailable right now.";

/// Errors that can occur while fetching suggestions.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or its body could not be decoded.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Endpoint that was queried.
        url: String,
    },
}

/// One exercise as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseSummary {
    /// Exercise name.
    pub name: String,
    /// Plain-text description preview.
    pub description: String,
}

/// One exercise as returned by the catalog. Unused fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExerciseEntry {
    /// Exercise name.
    pub name: String,
    /// Raw description, usually an HTML fragment.
    pub description: String,
}

impl ExerciseEntry {
    /// Create an entry from a name and raw description.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExercisePage {
    #[serde(default)]
    results: Vec<ExerciseEntry>,
}

/// A bounded, lazily sanitized sequence of exercise summaries.
///
/// Descriptions are cleaned up as each item is pulled.
#[derive(Debug)]
pub struct Suggestions {
    entries: std::iter::Take<std::vec::IntoIter<ExerciseEntry>>,
    preview_chars: usize,
}

impl Suggestions {
    /// Wrap raw entries, yielding at most `limit` of them.
    #[must_use]
    pub fn new(entries: Vec<ExerciseEntry>, limit: usize, preview_chars: usize) -> Self {
        Self {
            entries: entries.into_iter().take(limit),
            preview_chars,
        }
    }
}

impl Iterator for Suggestions {
    type Item = ExerciseSummary;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|entry| ExerciseSummary {
            name: sanitize::strip_markup(&entry.name),
            description: sanitize::description_preview(&entry.description, self.preview_chars),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

/// A source of exercise suggestions.
#[async_trait]
pub trait ExerciseCatalog: Send + Sync {
    /// Fetch up to `limit` exercise summaries.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] on network failure or a non-success response.
    async fn fetch_suggestions(&self, limit: usize) -> Result<Suggestions, FetchError>;
}

/// Catalog backed by an HTTP endpoint returning `{"results": [...]}`.
#[derive(Debug, Clone)]
pub struct HttpExerciseCatalog {
    client: reqwest::Client,
    endpoint: String,
    language: u32,
    preview_chars: usize,
}

impl HttpExerciseCatalog {
    /// Build a catalog client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &SuggestionsConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            language: config.language,
            preview_chars: config.preview_chars,
        })
    }

    /// The endpoint queried by this catalog.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ExerciseCatalog for HttpExerciseCatalog {
    async fn fetch_suggestions(&self, limit: usize) -> Result<Suggestions, FetchError> {
        debug!(endpoint = %self.endpoint, limit, "Fetching exercise suggestions");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("language", self.language.to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %self.endpoint, status = status.as_u16(), "Exercise catalog request failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let page: ExercisePage = response.json().await?;
        debug!(received = page.results.len(), "Exercise catalog responded");
        Ok(Suggestions::new(page.results, limit, self.preview_chars))
    }
}
