use async_trait::async_trait;
use futures::StreamExt;
use menovibe_core::{
    AggregatedResult, ErrorEventPolicy, Event, Generator, MenovibeError, Result, Session,
    TextStream,
};
use menovibe_server::{
    AgentCard, ClientConfig, RemoteAgentClient, ServerConfig, TaskChannel, create_app,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn frames(events: &[Event]) -> String {
    events.iter().map(|e| menovibe_server::a2a::encode_frame(e).unwrap()).collect()
}

fn sse(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/event-stream")
        .set_body_string(body)
}

async fn mount_task(server: &MockServer, task_id: &str, updates: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/v1/tasks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"task_id": task_id, "status": "processing"})),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/tasks/{}/updates", task_id)))
        .respond_with(updates)
        .mount(server)
        .await;
}

fn expect_error(result: AggregatedResult) -> String {
    match result {
        AggregatedResult::Error(message) => message,
        other => panic!("expected an error result, got {:?}", other),
    }
}

#[tokio::test]
async fn test_text_fragments_are_concatenated() {
    let server = MockServer::start().await;
    mount_task(
        &server,
        "t1",
        sse(frames(&[Event::text("Try "), Event::text("magnesium."), Event::EndOfStream])),
    )
    .await;

    let client = RemoteAgentClient::new(&server.uri()).unwrap();
    assert_eq!(client.invoke("sleep?").await, AggregatedResult::Text("Try magnesium.".into()));
}

#[tokio::test]
async fn test_message_travels_in_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "t1"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/tasks/t1/updates"))
        .and(query_param("message", "hot flashes & sleep"))
        .respond_with(sse(frames(&[Event::text("ok"), Event::EndOfStream])))
        .expect(1)
        .mount(&server)
        .await;

    let client = RemoteAgentClient::new(&server.uri()).unwrap();
    assert_eq!(client.invoke("hot flashes & sleep").await, AggregatedResult::Text("ok".into()));
}

#[tokio::test]
async fn test_each_call_uses_a_fresh_owner() {
    let server = MockServer::start().await;
    mount_task(&server, "t1", sse(frames(&[Event::EndOfStream]))).await;

    let client = RemoteAgentClient::new(&server.uri()).unwrap();
    client.invoke("a").await;
    client.invoke("b").await;

    let owners: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .map(|r| {
            let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
            body["user_id"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(owners.len(), 2);
    assert_ne!(owners[0], owners[1]);
}

#[tokio::test]
async fn test_error_only_stream_depends_on_policy() {
    let server = MockServer::start().await;
    mount_task(&server, "t1", sse(frames(&[Event::error("boom"), Event::EndOfStream]))).await;

    let surfacing = RemoteAgentClient::new(&server.uri()).unwrap();
    assert_eq!(surfacing.invoke("x").await, AggregatedResult::Error("boom".into()));

    let tolerant = RemoteAgentClient::with_config(
        &server.uri(),
        ClientConfig::default().with_error_policy(ErrorEventPolicy::Tolerate),
    )
    .unwrap();
    assert_eq!(tolerant.invoke("x").await, AggregatedResult::Text(String::new()));
}

#[tokio::test]
async fn test_error_events_skipped_when_text_present() {
    let server = MockServer::start().await;
    mount_task(
        &server,
        "t1",
        sse(frames(&[Event::text("a"), Event::error("boom"), Event::text("b"), Event::EndOfStream])),
    )
    .await;

    let client = RemoteAgentClient::new(&server.uri()).unwrap();
    assert_eq!(client.invoke("x").await, AggregatedResult::Text("ab".into()));
}

#[tokio::test]
async fn test_frames_after_sentinel_are_ignored() {
    let server = MockServer::start().await;
    let mut body = frames(&[Event::text("kept"), Event::EndOfStream]);
    body.push_str(&frames(&[Event::text("dropped")]));
    body.push_str(": comment\n\n");
    mount_task(&server, "t1", sse(body)).await;

    let client = RemoteAgentClient::new(&server.uri()).unwrap();
    assert_eq!(client.invoke("x").await, AggregatedResult::Text("kept".into()));
}

#[tokio::test]
async fn test_noise_lines_are_skipped() {
    let server = MockServer::start().await;
    let body = format!(
        ": ping\n\nevent: message\ndata: not json\n\n{}",
        frames(&[Event::text("fine"), Event::EndOfStream])
    );
    mount_task(&server, "t1", sse(body)).await;

    let client = RemoteAgentClient::new(&server.uri()).unwrap();
    assert_eq!(client.invoke("x").await, AggregatedResult::Text("fine".into()));
}

#[tokio::test]
async fn test_creation_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/tasks"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = RemoteAgentClient::new(&server.uri()).unwrap();
    let message = expect_error(client.invoke("x").await);
    assert!(message.contains(&server.uri()), "{}", message);
    assert!(message.contains("500"), "{}", message);
}

#[tokio::test]
async fn test_creation_without_task_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "processing"})))
        .mount(&server)
        .await;

    let client = RemoteAgentClient::new(&server.uri()).unwrap();
    assert!(expect_error(client.invoke("x").await).contains("task_id"));
}

#[tokio::test]
async fn test_creation_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/tasks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"task_id": "t1"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig::default().with_creation_timeout(Duration::from_millis(100));
    let client = RemoteAgentClient::with_config(&server.uri(), config).unwrap();
    assert!(expect_error(client.invoke("x").await).contains("timed out"));
}

#[tokio::test]
async fn test_updates_http_error() {
    let server = MockServer::start().await;
    mount_task(&server, "t1", ResponseTemplate::new(404)).await;

    let client = RemoteAgentClient::new(&server.uri()).unwrap();
    assert!(expect_error(client.invoke("x").await).contains("404"));
}

#[tokio::test]
async fn test_body_ending_without_sentinel() {
    let server = MockServer::start().await;
    mount_task(&server, "t1", sse(frames(&[Event::text("half an ans")]))).await;

    let client = RemoteAgentClient::new(&server.uri()).unwrap();
    let message = expect_error(client.invoke("x").await);
    assert!(message.contains("end_of_stream"), "{}", message);
}

#[tokio::test]
async fn test_unreachable_address() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let result = menovibe_server::a2a::invoke(&address, "x").await;
    assert!(expect_error(result).contains(&address));
}

#[tokio::test]
async fn test_channel_stream_ends_after_sentinel() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/tasks"))
        .and(body_json(json!({"user_id": "owner-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "owner-1"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/tasks/owner-1/updates"))
        .respond_with(sse(frames(&[Event::text("hi"), Event::EndOfStream])))
        .mount(&server)
        .await;

    let channel = TaskChannel::new(&server.uri(), ClientConfig::default()).unwrap();
    let task_id = channel.create_task("owner-1").await.unwrap();
    assert_eq!(task_id, "owner-1");

    let events: Vec<Event> =
        channel.open_updates(&task_id, "hello").await.unwrap().map(|e| e.unwrap()).collect().await;
    assert_eq!(events, vec![Event::text("hi"), Event::EndOfStream]);
}

#[tokio::test]
async fn test_channel_errors_are_typed() {
    let server = MockServer::start().await;
    mount_task(&server, "t1", ResponseTemplate::new(503)).await;

    let channel = TaskChannel::new(&server.uri(), ClientConfig::default()).unwrap();
    assert!(matches!(
        channel.open_updates("t1", "x").await,
        Err(MenovibeError::StreamFailed(_))
    ));

    let broken = MockServer::start().await;
    let channel = TaskChannel::new(&broken.uri(), ClientConfig::default()).unwrap();
    assert!(matches!(channel.create_task("u").await, Err(MenovibeError::CreationFailed(_))));
}

struct EchoGenerator;

#[async_trait]
impl Generator for EchoGenerator {
    fn name(&self) -> &str {
        "echo"
    }

    async fn generate(&self, _session: &Session, message: &str) -> Result<TextStream> {
        let words: Vec<String> = message.split_inclusive(' ').map(str::to_string).collect();
        Ok(Box::pin(futures::stream::iter(words.into_iter().map(Ok))))
    }
}

#[tokio::test]
async fn test_round_trip_against_live_endpoint() {
    let card = AgentCard::builder().name("Echo").build();
    let app = create_app(ServerConfig::new(Arc::new(EchoGenerator), card));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = RemoteAgentClient::new(&address).unwrap();
    assert_eq!(
        client.invoke("eat more leafy greens").await,
        AggregatedResult::Text("eat more leafy greens".into())
    );
}
