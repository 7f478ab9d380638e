use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::models::Workout;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid workouts URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Response is not a workout list: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for the workout training API.
#[derive(Clone)]
pub struct WorkoutClient {
    client: reqwest::Client,
    base_url: Arc<Url>,
}

impl WorkoutClient {
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: Arc::new(base_url),
        })
    }

    /// `{base}/workouts`, plus `user_id` when the filter is non-empty.
    pub fn workouts_url(&self, user_id: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.join("workouts")?;
        if !user_id.is_empty() {
            url.query_pairs_mut().append_pair("user_id", user_id);
        }
        Ok(url)
    }

    async fn fetch_body(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        Ok(body)
    }

    pub async fn fetch_workouts(&self, user_id: &str) -> Result<Vec<Workout>, FetchError> {
        let url = self.workouts_url(user_id)?;
        tracing::debug!(%url, "fetching workouts");
        let body = self.fetch_body(&url).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
