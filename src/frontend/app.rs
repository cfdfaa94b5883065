use dioxus::html::input_data::keyboard_types::Key;
use dioxus::prelude::*;
use tokio::sync::mpsc;
use tracing::warn;

use super::components::*;
use crate::api::{ApiClient, StreamEvent, DEFAULT_AGENTS};
use crate::chat::{Reconciler, Role};
use crate::global;

pub fn app(cx: Scope) -> Element {
    let client = use_ref(cx, ApiClient::from_env);
    let reconciler = use_ref(cx, Reconciler::new);
    let agents = use_ref(cx, || DEFAULT_AGENTS.clone());
    let agent_key = use_state(cx, || global::DEFAULT_AGENT.to_string());
    let draft = use_ref(cx, String::new);
    let clean = use_state(cx, || false);

    use_future(cx, (), move |_| {
        to_owned![client, agents];
        async move {
            let api = client.read().clone();
            match api.list_agents().await {
                Ok(list) if !list.is_empty() => *agents.write() = list,
                Ok(_) => {}
                Err(err) => warn!(%err, "agent listing unavailable, keeping builtin list"),
            }
        }
    });

    let send = move |_| {
        let text = draft.read().clone();
        let session = match reconciler.write().submit(&text) {
            Some(session) => session,
            None => return,
        };
        draft.set(String::new());
        clean.set(true);

        cx.spawn({
            to_owned![reconciler, client, agent_key];

            async move {
                let api = client.read().clone();
                let agent = (*agent_key.current()).clone();
                let (tx, mut rx) = mpsc::channel::<StreamEvent>(global::EVENT_CHANNEL_CAPACITY);

                let errors = tx.clone();
                tokio::spawn(async move {
                    if let Err(err) = api.stream_chat(&text, &agent, tx).await {
                        let _ = errors
                            .send(StreamEvent::Error {
                                message: err.to_string(),
                            })
                            .await;
                    }
                });

                while let Some(event) = rx.recv().await {
                    match event {
                        StreamEvent::Start { agent } => {
                            reconciler.write().on_meta(session, &agent)
                        }
                        StreamEvent::Chunk { content, .. } => {
                            reconciler.write().on_fragment(session, &content)
                        }
                        StreamEvent::Error { message } => {
                            reconciler.write().on_error(session, &message)
                        }
                        StreamEvent::Done { .. } => reconciler.write().on_complete(session),
                    }
                }
                // Body can end without a terminal event; a no-op if the
                // session already finished.
                reconciler.write().on_complete(session);
            }
        })
    };

    let send_enter = move |e: Event<KeyboardData>| {
        if let Key::Enter = e.data.key() {
            send(0);
        }
    };

    let send_button = move |_| {
        send(0);
    };

    let busy = reconciler.read().is_busy();

    cx.render(rsx!(
        style { include_str!("./style.css") }
        div {
            id: "header",
            h1 {"Fund Advisor"}
            h2 {"AI-assisted fund insights"}
        }
        div {
            id: "agent-bar",
            span { class: "agent-label", "Agent:" }
            AgentPicker {
                agents: agents.read().clone(),
                selected: agent_key,
            }
        }
        div {
            id: "chat-window",
            class: "chat-window",
            for msg in reconciler.read().transcript().iter() {
                match msg.role {
                    Role::User => rsx!(UserMessage { content: msg.content.clone() }),
                    Role::Assistant => rsx!(AssistantMessage {
                        content: msg.content.clone(),
                        agent: msg.agent.clone(),
                    }),
                }
            }
            if busy {
                rsx!(Loading{})
            }
        }
        div {
            id: "input-area",
            UserInput {
                draft: draft,
                clean: clean,
                on_press: send_enter,
            }
            button {
                id: "send-button",
                onclick: send_button, "Send" }
        }
        div {
            id: "bottom-holder"
        }
    ))
}
