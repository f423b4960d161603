use anyhow::{Context, Result, bail};
use menovibe_core::AggregatedResult;
use menovibe_dispatch::{Dispatch, DispatchConfig};
use menovibe_server::{
    AgentCard, AgentSkill, ClientConfig, ListenConfig, RemoteAgentClient, ServerConfig, create_app,
};
use std::{sync::Arc, time::Duration};

pub async fn invoke(url: &str, stream_timeout: Option<u64>, text: &str) -> Result<()> {
    let config =
        ClientConfig::default().with_stream_timeout(stream_timeout.map(Duration::from_secs));
    let client = RemoteAgentClient::with_config(url, config)?;

    match client.invoke(text).await {
        AggregatedResult::Text(answer) => {
            println!("{}", answer);
            Ok(())
        }
        AggregatedResult::Error(message) => bail!(message),
    }
}

pub async fn agents(offline: bool) -> Result<()> {
    let config = DispatchConfig::from_env()?;
    let dispatch =
        if offline { Dispatch::new(&config)? } else { Dispatch::discover(&config).await? };

    for descriptor in dispatch.descriptors() {
        println!("{}\t{}", descriptor.name, descriptor.base_url);
        println!("    {}", descriptor.description);
        if !descriptor.tags.is_empty() {
            println!("    tags: {}", descriptor.tags.join(", "));
        }
    }
    Ok(())
}

pub async fn relay(target: &str, port: Option<u16>) -> Result<()> {
    let mut listen = ListenConfig::from_env()?;
    if let Some(port) = port {
        listen = ListenConfig::new(listen.host, port);
    }

    let dispatch = Dispatch::discover(&DispatchConfig::from_env()?).await?;
    let descriptor = dispatch
        .descriptors()
        .find(|d| d.name == target)
        .cloned()
        .with_context(|| format!("no specialist named '{}'", target))?;
    let generator = Arc::new(dispatch.relay(target)?);

    let card = AgentCard::builder()
        .name(format!("{} relay", descriptor.name))
        .description(format!("Relays tasks to {}", descriptor.base_url))
        .url(listen.public_url.clone())
        .skill(
            AgentSkill::new(descriptor.name.clone(), descriptor.name.clone(), descriptor.description)
                .with_tags(descriptor.tags),
        )
        .build();
    let app = create_app(ServerConfig::new(generator, card));

    let addr = listen.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, public_url = %listen.public_url, %target, "relay listening");
    println!("Relay to {} listening on http://{}", target, addr);
    println!("Press Ctrl+C to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
