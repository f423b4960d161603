use crate::a2a::{ClientConfig, CreateTaskRequest, sse::FrameDecoder};
use futures::StreamExt;
use menovibe_core::{EventStream, MenovibeError, Result};
use reqwest::{Url, header};
use serde::Deserialize;

#[derive(Deserialize)]
struct CreatedTask {
    #[serde(default)]
    task_id: Option<String>,
}

/// One caller's view of a remote task endpoint: create a task, then read its updates.
///
/// No retries are attempted; every network failure surfaces as
/// [`MenovibeError::CreationFailed`] or [`MenovibeError::StreamFailed`].
pub struct TaskChannel {
    http_client: reqwest::Client,
    address: String,
    base_url: Url,
    config: ClientConfig,
}

impl TaskChannel {
    pub fn new(address: &str, config: ClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| MenovibeError::Config(format!("failed to build HTTP client: {}", e)))?;
        Self::with_client(http_client, address, config)
    }

    pub fn with_client(
        http_client: reqwest::Client,
        address: &str,
        config: ClientConfig,
    ) -> Result<Self> {
        let address = address.trim().trim_end_matches('/').to_string();
        let base_url = Url::parse(&address).map_err(|e| {
            MenovibeError::Config(format!("invalid agent address '{}': {}", address, e))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(MenovibeError::Config(format!(
                "agent address '{}' must use http or https",
                address
            )));
        }
        Ok(Self { http_client, address, base_url, config })
    }

    /// The address this channel talks to, without a trailing slash.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // http(s) URLs always have a path to extend
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `POST {base}/v1/tasks` with `{"user_id": owner_id}`; returns the issued task id.
    pub async fn create_task(&self, owner_id: &str) -> Result<String> {
        let url = self.endpoint(&["v1", "tasks"]);
        let response = self
            .http_client
            .post(url.clone())
            .timeout(self.config.creation_timeout)
            .json(&CreateTaskRequest { user_id: Some(owner_id.to_string()) })
            .send()
            .await
            .map_err(|e| MenovibeError::CreationFailed(describe("POST", &url, &e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MenovibeError::CreationFailed(format!(
                "POST {} returned HTTP {}",
                url, status
            )));
        }

        let created: CreatedTask = response.json().await.map_err(|e| {
            MenovibeError::CreationFailed(format!("POST {} returned an unreadable body: {}", url, e))
        })?;

        match created.task_id.filter(|id| !id.is_empty()) {
            Some(task_id) => {
                tracing::debug!(%url, %task_id, "task created");
                Ok(task_id)
            }
            None => Err(MenovibeError::CreationFailed(format!(
                "POST {} response lacks a task_id",
                url
            ))),
        }
    }

    /// `GET {base}/v1/tasks/{task_id}/updates?message=..` as an event stream.
    ///
    /// The stream ends after yielding `end_of_stream`. If the connection drops or the
    /// body ends first, the final item is a [`MenovibeError::StreamFailed`].
    pub async fn open_updates(&self, task_id: &str, message: &str) -> Result<EventStream> {
        let mut url = self.endpoint(&["v1", "tasks", task_id, "updates"]);
        url.query_pairs_mut().append_pair("message", message);

        let mut request =
            self.http_client.get(url.clone()).header(header::ACCEPT, "text/event-stream");
        if let Some(timeout) = self.config.stream_timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MenovibeError::StreamFailed(describe("GET", &url, &e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MenovibeError::StreamFailed(format!("GET {} returned HTTP {}", url, status)));
        }
        tracing::debug!(%url, "update stream opened");

        let stream = async_stream::stream! {
            let mut decoder = FrameDecoder::new();
            let mut body = response.bytes_stream();

            while let Some(chunk) = body.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(MenovibeError::StreamFailed(describe("GET", &url, &e)));
                        return;
                    }
                };
                for event in decoder.feed(&chunk) {
                    yield Ok(event);
                }
                if decoder.is_finished() {
                    return;
                }
            }

            for event in decoder.finish() {
                yield Ok(event);
            }
            if !decoder.is_finished() {
                yield Err(MenovibeError::StreamFailed(format!(
                    "GET {} closed before end_of_stream",
                    url
                )));
            }
        };

        Ok(Box::pin(stream))
    }
}

fn describe(method: &str, url: &Url, err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("{} {} timed out", method, url)
    } else if err.is_connect() {
        format!("{} {} could not connect: {}", method, url, err)
    } else {
        format!("{} {} failed: {}", method, url, err)
    }
}
