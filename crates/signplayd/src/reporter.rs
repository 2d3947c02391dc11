//! Best-effort backend client: score telemetry and color-quiz content.
//!
//! Score posts are fire-and-forget: a failure is a warning in the log and
//! nothing else. The quiz-content fetch returns its error so the caller can
//! fall back to the builtin question table.

use signplay_games::colors::ColorQuestion;
use signplay_games::session::ScoreEvent;
use tracing::{debug, warn};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct ScoreReporter {
    client: reqwest::Client,
    base_url: String,
}

impl ScoreReporter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    /// Fire-and-forget: spawns the POST and never surfaces the outcome
    /// beyond the log.
    pub fn report(&self, event: ScoreEvent) {
        let client = self.client.clone();
        let url = format!("{}/api/score", self.base_url);
        tokio::spawn(async move {
            match post_score(&client, &url, &event).await {
                Ok(body) => debug!("score saved: {body}"),
                Err(e) => warn!("score save failed: {e}"),
            }
        });
    }

    /// Fetch the next color question from the quiz-content endpoint.
    pub async fn next_color_question(&self) -> Result<ColorQuestion, BackendError> {
        let url = format!("{}/color-quiz-next", self.base_url);
        let question = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(question)
    }
}

impl Default for ScoreReporter {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL)
    }
}

async fn post_score(
    client: &reqwest::Client,
    url: &str,
    event: &ScoreEvent,
) -> Result<String, BackendError> {
    let response = client
        .post(url)
        .json(event)
        .send()
        .await?
        .error_for_status()?;
    Ok(response.text().await?)
}
