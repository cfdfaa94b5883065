use std::io::Write;

use anyhow::{bail, Result};
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fund_advisor::api::{ApiClient, StreamEvent};
use fund_advisor::chat::Reconciler;
use fund_advisor::global;

/// Streams one question to the backend from the terminal:
/// `chat_example "How risky is fund 110011?" quant`
#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "warn");
    }
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let question = args
        .next()
        .unwrap_or_else(|| "How should I balance my fund holdings this week?".to_string());
    let agent = args
        .next()
        .unwrap_or_else(|| global::DEFAULT_AGENT.to_string());

    let client = ApiClient::from_env();
    let mut reconciler = Reconciler::new();
    let session = match reconciler.submit(&question) {
        Some(session) => session,
        None => bail!("question must not be empty"),
    };
    println!("you> {question}");
    print!("{agent}> ");
    std::io::stdout().flush()?;

    let (tx, mut rx) = mpsc::channel(global::EVENT_CHANNEL_CAPACITY);
    let errors = tx.clone();
    let streamer = client.clone();
    let prompt = question.clone();
    tokio::spawn(async move {
        if let Err(err) = streamer.stream_chat(&prompt, &agent, tx).await {
            let _ = errors
                .send(StreamEvent::Error {
                    message: err.to_string(),
                })
                .await;
        }
    });

    while let Some(event) = rx.recv().await {
        match event {
            StreamEvent::Start { agent } => reconciler.on_meta(session, &agent),
            StreamEvent::Chunk { content, .. } => {
                print!("{content}");
                std::io::stdout().flush()?;
                reconciler.on_fragment(session, &content);
            }
            StreamEvent::Error { message } => reconciler.on_error(session, &message),
            StreamEvent::Done { .. } => reconciler.on_complete(session),
        }
    }
    reconciler.on_complete(session);
    println!();

    println!("--- transcript ---");
    for message in reconciler.transcript().iter() {
        let who = message
            .agent
            .clone()
            .unwrap_or_else(|| message.role.as_str().to_string());
        println!("[{who}] {}", message.content);
    }
    Ok(())
}
