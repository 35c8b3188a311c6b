//! HTTP access to the notes API.

use std::time::Duration;

use uuid::Uuid;

use nota_core::{CreateNoteRequest, Error, ListFilter, Note, Result, UpdateNoteRequest};

/// Request timeout, after which a call counts as a network failure.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Thin client for the notes REST surface.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL (no trailing slash needed).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-success response to the matching error variant.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = resp
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| format!("HTTP {}", status));

        match status {
            reqwest::StatusCode::NOT_FOUND => Err(Error::NotFound(message)),
            reqwest::StatusCode::BAD_REQUEST => Err(Error::InvalidInput(message)),
            _ => Err(Error::Request(message)),
        }
    }

    /// Fetch notes in the given scope.
    pub async fn list(&self, filter: ListFilter) -> Result<Vec<Note>> {
        let resp = self
            .http
            .get(self.url("/notes"))
            .query(&[("filter", filter.to_string())])
            .send()
            .await?;
        let notes = Self::check(resp).await?.json().await?;
        Ok(notes)
    }

    /// Fetch one note by id.
    pub async fn get(&self, id: Uuid) -> Result<Note> {
        let resp = self.http.get(self.url(&format!("/notes/{}", id))).send().await?;
        let note = Self::check(resp).await?.json().await?;
        Ok(note)
    }

    /// Create a note, returning the stored record.
    pub async fn create(&self, req: &CreateNoteRequest) -> Result<Note> {
        let resp = self.http.post(self.url("/notes")).json(req).send().await?;
        let note = Self::check(resp).await?.json().await?;
        Ok(note)
    }

    /// Partially update a note, returning the merged record.
    pub async fn update(&self, id: Uuid, req: &UpdateNoteRequest) -> Result<Note> {
        let resp = self
            .http
            .put(self.url(&format!("/notes/{}", id)))
            .json(req)
            .send()
            .await?;
        let note = Self::check(resp).await?.json().await?;
        Ok(note)
    }

    /// Move a note to the trash.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let resp = self
            .http
            .delete(self.url(&format!("/notes/{}", id)))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Restore a trashed note.
    pub async fn restore(&self, id: Uuid) -> Result<()> {
        let resp = self
            .http
            .post(self.url(&format!("/notes/{}/restore", id)))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Permanently delete a note.
    pub async fn purge(&self, id: Uuid) -> Result<()> {
        let resp = self
            .http
            .delete(self.url(&format!("/notes/{}/purge", id)))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }
}
