use futures::StreamExt;
use menovibe_core::{AggregatedResult, Event, Generator, MenovibeError, Session};
use menovibe_dispatch::{Dispatch, DispatchConfig};
use menovibe_server::{AgentCard, AgentSkill, a2a::encode_frame};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sse(events: &[Event]) -> ResponseTemplate {
    let body: String = events.iter().map(|e| encode_frame(e).unwrap()).collect();
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/event-stream")
        .set_body_string(body)
}

async fn specialist(name: &str, reply: &[Event]) -> MockServer {
    let server = MockServer::start().await;
    let card = AgentCard::builder()
        .name(name)
        .description(format!("{} for menopause questions", name))
        .url(server.uri())
        .skill(AgentSkill::new("advice", "Advice", "Answers questions").with_tags(["menopause"]))
        .build();

    Mock::given(method("GET"))
        .and(path("/agent-card"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&card))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/tasks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"task_id": "t1", "status": "processing"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/tasks/t1/updates"))
        .respond_with(sse(reply))
        .mount(&server)
        .await;
    server
}

fn unused_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    address
}

#[tokio::test]
async fn test_discover_names_specialists_from_cards() {
    let nutrition = specialist("Nutrition Expert", &[Event::EndOfStream]).await;
    let missing = unused_address();

    let config = DispatchConfig::new([nutrition.uri(), missing.clone()])
        .unwrap()
        .with_card_timeout(Duration::from_secs(2));
    let dispatch = Dispatch::discover(&config).await.unwrap();

    let descriptors: Vec<_> = dispatch.descriptors().cloned().collect();
    assert_eq!(descriptors.len(), 2);
    assert_eq!(descriptors[0].name, "nutrition_expert");
    assert_eq!(descriptors[0].tags, vec!["menopause"]);
    assert!(descriptors[1].name.starts_with("agent_127_0_0_1_"));
    assert_eq!(descriptors[1].base_url, missing);
}

#[tokio::test]
async fn test_call_by_name() {
    let reply = [Event::text("Walk "), Event::text("daily."), Event::EndOfStream];
    let coach = specialist("Life Coach", &reply).await;
    let dispatch =
        Dispatch::discover(&DispatchConfig::new([coach.uri()]).unwrap()).await.unwrap();

    assert_eq!(
        dispatch.call("life_coach", "tips?").await,
        AggregatedResult::Text("Walk daily.".into())
    );
}

#[tokio::test]
async fn test_tool_execute_returns_text_or_error_values() {
    let coach = specialist("Life Coach", &[Event::text("Breathe."), Event::EndOfStream]).await;
    let missing = unused_address();
    let dispatch = Dispatch::new(&DispatchConfig::new([coach.uri(), missing]).unwrap()).unwrap();

    let tools = dispatch.tools();
    let ok = tools[0].execute(json!({"request": "stress?"})).await.unwrap();
    assert_eq!(ok, json!({"text": "Breathe."}));

    let failed = tools[1].execute(json!({"request": "stress?"})).await.unwrap();
    assert!(failed["error"].as_str().unwrap().contains("127.0.0.1"));
    assert!(failed.get("text").is_none());
}

#[tokio::test]
async fn test_relay_forwards_owner_and_chunks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/tasks"))
        .and(body_json(json!({"user_id": "caller-7"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "caller-7"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/tasks/caller-7/updates"))
        .and(query_param("message", "hot flashes"))
        .respond_with(sse(&[Event::text("Layer "), Event::text("clothing."), Event::EndOfStream]))
        .mount(&server)
        .await;

    let dispatch = Dispatch::new(&DispatchConfig::new([server.uri()]).unwrap()).unwrap();
    let name = dispatch.descriptors().next().unwrap().name.clone();
    let relay = dispatch.relay(&name).unwrap();
    assert_eq!(relay.name(), name);

    let chunks: Vec<String> = relay
        .generate(&Session::new("caller-7"), "hot flashes")
        .await
        .unwrap()
        .map(|c| c.unwrap())
        .collect()
        .await;
    assert_eq!(chunks, vec!["Layer ", "clothing."]);
}

#[tokio::test]
async fn test_relay_turns_remote_error_into_failure() {
    let reply =
        [Event::text("Par"), Event::error("model down"), Event::text("ignored"), Event::EndOfStream];
    let server = specialist("Nutrition Expert", &reply).await;
    let dispatch =
        Dispatch::discover(&DispatchConfig::new([server.uri()]).unwrap()).await.unwrap();
    let relay = dispatch.relay("nutrition_expert").unwrap();

    let items: Vec<_> = relay.generate(&Session::new("u1"), "hi").await.unwrap().collect().await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().unwrap(), "Par");
    assert!(matches!(&items[1], Err(MenovibeError::GenerationFailed(text)) if text == "model down"));
}
