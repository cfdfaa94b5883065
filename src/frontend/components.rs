#![allow(non_snake_case)]

use dioxus::prelude::*;

use crate::api::AgentInfo;

#[derive(PartialEq, Props)]
pub struct ContentProps {
    content: String,
}

pub fn UserMessage(cx: Scope<ContentProps>) -> Element {
    cx.render(rsx!(
        div {
            class: "chat-message user-message",
            "{cx.props.content}"
        }
    ))
}

#[derive(PartialEq, Props)]
pub struct AssistantProps {
    content: String,
    // The caller always has an Option in hand; keep the setter taking one.
    #[props(!optional)]
    agent: Option<String>,
}

pub fn AssistantMessage(cx: Scope<AssistantProps>) -> Element {
    let agent = cx.props.agent.clone().unwrap_or_default();
    let tagged = !agent.is_empty();
    cx.render(rsx!(
        div {
            class: "chat-message other-message",
            if tagged {
                rsx!(div { class: "agent-tag", "{agent}" })
            }
            "{cx.props.content}"
        }
    ))
}

pub fn Loading(cx: Scope) -> Element {
    cx.render(rsx!(
        div {
            class: "chat-message other-message",
            div {
                class: "spinner",
            }
        }
    ))
}

#[derive(Props)]
pub struct DraftProps<'a> {
    draft: &'a UseRef<String>,
    clean: &'a UseState<bool>,
    on_press: EventHandler<'a, Event<KeyboardData>>,
}

pub fn UserInput<'a>(cx: Scope<'a, DraftProps<'a>>) -> Element<'a> {
    let draft = cx.props.draft;
    let clean = cx.props.clean;
    if **clean {
        clean.set(false);
        cx.render(rsx!(textarea {
            id: "user-input",
            placeholder: "Ask about funds, holdings, or strategy",
            value: "",
            oninput: |e| {
                draft.set(e.value.clone());
            },
            onkeypress: |e| cx.props.on_press.call(e),
        }))
    } else {
        cx.render(rsx!(textarea {
            id: "user-input",
            placeholder: "Ask about funds, holdings, or strategy",
            oninput: |e| {
                draft.set(e.value.clone());
            },
            onkeypress: |e| cx.props.on_press.call(e),
        }))
    }
}

#[derive(Props)]
pub struct AgentPickerProps<'a> {
    agents: Vec<AgentInfo>,
    selected: &'a UseState<String>,
}

pub fn AgentPicker<'a>(cx: Scope<'a, AgentPickerProps<'a>>) -> Element<'a> {
    let selected = cx.props.selected;
    cx.render(rsx!(
        select {
            id: "agent-picker",
            onchange: |e| selected.set(e.value.clone()),
            for agent in cx.props.agents.iter() {
                if agent.key == **selected {
                    rsx!(option {
                        value: "{agent.key}",
                        selected: "true",
                        title: "{agent.description}",
                        "{agent.name}"
                    })
                } else {
                    rsx!(option {
                        value: "{agent.key}",
                        title: "{agent.description}",
                        "{agent.name}"
                    })
                }
            }
        }
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_props_setter_takes_optional_agent() {
        let props = AssistantProps::builder()
            .content("hello".to_string())
            .agent(Some("quant".to_string()))
            .build();
        assert_eq!(props.agent.as_deref(), Some("quant"));

        let untagged = AssistantProps::builder()
            .content("hello".to_string())
            .agent(None)
            .build();
        assert!(untagged.agent.is_none());
    }
}
