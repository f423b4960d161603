use crate::ServerConfig;
use crate::a2a::{CreateTaskRequest, CreateTaskResponse, UpdatesQuery};
use crate::rest::ApiError;
use axum::{
    extract::{Path, Query, State, rejection::JsonRejection},
    response::{
        Json,
        sse::{Event as SseEvent, KeepAlive, Sse},
    },
};
use futures::{FutureExt, Stream, StreamExt};
use menovibe_core::{Event, MenovibeError, Task, TaskStatus};
use std::{collections::HashMap, convert::Infallible, panic::AssertUnwindSafe, sync::Arc};
use tokio::sync::{RwLock, mpsc};
use tokio_stream::wrappers::ReceiverStream;
use tracing::Instrument;

/// In-flight tasks, keyed by task id. Entries are dropped when their stream ends.
#[derive(Default)]
pub struct TaskRegistry {
    tasks: RwLock<HashMap<String, Task>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, task: Task) -> Option<Task> {
        self.tasks.write().await.insert(task.task_id.clone(), task)
    }

    /// Registers `task_id` if it was never created; update requests may arrive cold.
    pub async fn adopt(&self, task_id: &str) -> menovibe_core::Result<()> {
        let mut tasks = self.tasks.write().await;
        if !tasks.contains_key(task_id) {
            tracing::debug!(task_id, "adopting task that was not created here");
            tasks.insert(task_id.to_string(), Task::for_owner(task_id)?);
        }
        Ok(())
    }

    pub async fn get(&self, task_id: &str) -> Option<Task> {
        self.tasks.read().await.get(task_id).cloned()
    }

    pub async fn advance(&self, task_id: &str, status: TaskStatus) -> menovibe_core::Result<()> {
        match self.tasks.write().await.get_mut(task_id) {
            Some(task) => task.advance(status),
            None => Err(MenovibeError::InvalidRequest(format!("unknown task {}", task_id))),
        }
    }

    pub async fn remove(&self, task_id: &str) -> Option<Task> {
        self.tasks.write().await.remove(task_id)
    }

    /// Records the terminal status and discards the task.
    pub async fn finish(&self, task_id: &str, status: TaskStatus) -> Option<Task> {
        let mut tasks = self.tasks.write().await;
        let mut task = tasks.remove(task_id)?;
        if let Err(e) = task.advance(status) {
            tracing::debug!(task_id, error = %e, "ignoring late status change");
        }
        Some(task)
    }

    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[derive(Clone)]
pub struct TaskController {
    config: ServerConfig,
    registry: Arc<TaskRegistry>,
}

impl TaskController {
    pub fn new(config: ServerConfig, registry: Arc<TaskRegistry>) -> Self {
        Self { config, registry }
    }
}

/// POST /v1/tasks
pub async fn create_task(
    State(controller): State<TaskController>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<Json<CreateTaskResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let expose = controller.config.security.expose_error_details;

    let task = Task::for_owner(request.user_id.unwrap_or_default())
        .map_err(|e| ApiError::from_error(&e, expose))?;
    let response = CreateTaskResponse { task_id: task.task_id.clone(), status: task.status };

    if controller.registry.insert(task).await.is_some() {
        tracing::debug!(task_id = %response.task_id, "replaced existing task");
    }
    tracing::info!(
        task_id = %response.task_id,
        agent = controller.config.generator.name(),
        "task created"
    );
    Ok(Json(response))
}

/// GET /v1/tasks/{task_id}/updates?message=...
pub async fn task_updates(
    State(controller): State<TaskController>,
    Path(task_id): Path<String>,
    Query(query): Query<UpdatesQuery>,
) -> Result<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>, ApiError> {
    let expose = controller.config.security.expose_error_details;
    controller.registry.adopt(&task_id).await.map_err(|e| ApiError::from_error(&e, expose))?;

    let message = query.message.unwrap_or_else(|| controller.config.default_message.clone());

    let (tx, rx) = mpsc::channel(controller.config.channel_capacity);
    let keep_alive = controller.config.keep_alive_interval;
    let span = menovibe_telemetry::task_stream_span(controller.config.generator.name(), &task_id);
    tokio::spawn(run_task(controller, task_id, message, tx).instrument(span));

    let frames = ReceiverStream::new(rx)
        .filter_map(|event| futures::future::ready(to_frame(&event).map(Ok)));
    Ok(Sse::new(frames).keep_alive(KeepAlive::new().interval(keep_alive).text("ping")))
}

fn to_frame(event: &Event) -> Option<SseEvent> {
    match serde_json::to_string(event) {
        Ok(data) => Some(SseEvent::default().data(data)),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode event");
            None
        }
    }
}

/// The caller dropped its connection.
struct Disconnected;

enum Outcome {
    Completed,
    Failed,
}

async fn run_task(
    controller: TaskController,
    task_id: String,
    message: String,
    tx: mpsc::Sender<Event>,
) {
    let outcome = match AssertUnwindSafe(generate_into(&controller, &task_id, &message, &tx))
        .catch_unwind()
        .await
    {
        Ok(outcome) => outcome,
        Err(_) => {
            let err = MenovibeError::GenerationFailed("generation loop panicked".to_string());
            report_failure(&controller, &tx, &err).await
        }
    };

    match outcome {
        Ok(outcome) => {
            if tx.send(Event::EndOfStream).await.is_err() {
                tracing::debug!("caller left before end_of_stream");
            }
            let status = match outcome {
                Outcome::Completed => TaskStatus::Complete,
                Outcome::Failed => TaskStatus::Error,
            };
            controller.registry.finish(&task_id, status).await;
            tracing::info!(%status, "task stream finished");
        }
        Err(Disconnected) => {
            controller.registry.remove(&task_id).await;
            tracing::info!("caller disconnected, generation abandoned");
        }
    }
}

async fn generate_into(
    controller: &TaskController,
    task_id: &str,
    message: &str,
    tx: &mpsc::Sender<Event>,
) -> Result<Outcome, Disconnected> {
    let config = &controller.config;

    let session = match config.session_store.get_or_create(task_id).await {
        Ok(session) => session,
        Err(e) => return report_failure(controller, tx, &e).await,
    };

    if let Err(e) = controller.registry.advance(task_id, TaskStatus::Streaming).await {
        tracing::debug!(error = %e, "task not tracked as streaming");
    }

    let mut chunks = match config.generator.generate(&session, message).await {
        Ok(chunks) => chunks,
        Err(e) => return report_failure(controller, tx, &e).await,
    };

    loop {
        let next = tokio::select! {
            next = chunks.next() => next,
            _ = tx.closed() => return Err(Disconnected),
        };
        match next {
            None => return Ok(Outcome::Completed),
            Some(Ok(chunk)) if chunk.is_empty() => continue,
            Some(Ok(chunk)) => {
                tx.send(Event::text(chunk)).await.map_err(|_| Disconnected)?;
            }
            Some(Err(e)) => return report_failure(controller, tx, &e).await,
        }
    }
}

async fn report_failure(
    controller: &TaskController,
    tx: &mpsc::Sender<Event>,
    err: &MenovibeError,
) -> Result<Outcome, Disconnected> {
    tracing::warn!(error = %err, "generation failed");
    let text = if controller.config.security.expose_error_details {
        format!("An error occurred: {}", err)
    } else {
        "An error occurred while generating a response.".to_string()
    };
    tx.send(Event::error(text)).await.map_err(|_| Disconnected)?;
    Ok(Outcome::Failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_registry_lifecycle() {
        let registry = TaskRegistry::new();
        registry.insert(Task::for_owner("u1").unwrap()).await;
        registry.advance("u1", TaskStatus::Streaming).await.unwrap();
        assert_eq!(registry.get("u1").await.unwrap().status, TaskStatus::Streaming);

        let finished = registry.finish("u1", TaskStatus::Complete).await.unwrap();
        assert_eq!(finished.status, TaskStatus::Complete);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_registry_adopt_is_idempotent() {
        let registry = TaskRegistry::new();
        registry.adopt("u1").await.unwrap();
        registry.advance("u1", TaskStatus::Streaming).await.unwrap();
        registry.adopt("u1").await.unwrap();
        assert_eq!(registry.get("u1").await.unwrap().status, TaskStatus::Streaming);
        assert!(registry.adopt("").await.is_err());
        registry.adopt(" ").await.unwrap();
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_registry_unknown_task() {
        let registry = TaskRegistry::new();
        assert!(registry.advance("missing", TaskStatus::Streaming).await.is_err());
        assert!(registry.finish("missing", TaskStatus::Complete).await.is_none());
    }

    #[test]
    fn test_frame_payload() {
        // axum renders the frame as `data: <json>\n\n`
        assert!(to_frame(&Event::EndOfStream).is_some());
    }
}
