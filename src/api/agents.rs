use lazy_static::lazy_static;
use serde::Deserialize;

/// One entry of `GET /api/agents`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentInfo {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub paradigm: String,
    #[serde(default)]
    pub description: String,
}

impl AgentInfo {
    fn builtin(key: &str, name: &str, description: &str) -> AgentInfo {
        AgentInfo {
            key: key.to_string(),
            name: name.to_string(),
            paradigm: String::new(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct AgentsResponse {
    pub agents: Vec<AgentInfo>,
}

lazy_static! {
    /// Picker contents when the backend can't be reached. Mirrors the agents
    /// the server registers, with the default agent first.
    pub static ref DEFAULT_AGENTS: Vec<AgentInfo> = vec![
        AgentInfo::builtin(
            "strategist",
            "Strategist",
            "Overall decisions and final recommendations",
        ),
        AgentInfo::builtin("advisor", "Advisor", "Step-by-step investment planning"),
        AgentInfo::builtin("quant", "Quant", "Quantitative analysis and risk assessment"),
        AgentInfo::builtin("analyst", "Analyst", "Technical analysis with self-review"),
        AgentInfo::builtin("coordinator", "Coordinator", "Intent recognition and routing"),
        AgentInfo::builtin(
            "intelligence",
            "Intelligence",
            "Market intelligence search and analysis",
        ),
        AgentInfo::builtin(
            "shadow_analyst",
            "Shadow Analyst",
            "Blogger holdings analysis and shadow-following advice",
        ),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_server_listing() {
        let body = r#"{
            "agents": [
                {"name": "Strategist", "key": "strategist", "paradigm": "ReActAgent",
                 "description": "Overall decisions"},
                {"name": "Quant", "key": "quant", "paradigm": "SimpleAgent", "description": ""}
            ]
        }"#;
        let parsed: AgentsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.agents.len(), 2);
        assert_eq!(parsed.agents[0].key, "strategist");
        assert_eq!(parsed.agents[1].paradigm, "SimpleAgent");
    }

    #[test]
    fn default_agents_start_with_default_key() {
        assert_eq!(DEFAULT_AGENTS[0].key, crate::global::DEFAULT_AGENT);
    }
}
