use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Which backend agent produced an assistant message, once known.
    pub agent: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Message {
        Message {
            role: Role::User,
            content: content.into(),
            agent: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Message {
        Message {
            role: Role::Assistant,
            content: content.into(),
            agent: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("transcript is empty")]
    Empty,

    #[error("last message is {found}, expected {expected}")]
    RoleMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// Ordered, append-only conversation history. Messages are never removed or
/// reordered; only the last message may be mutated, through the explicit
/// role-checked operations below.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Transcript {
        Transcript::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn append_to_last(&mut self, role: Role, fragment: &str) -> Result<(), TranscriptError> {
        let last = self.last_mut_of(role)?;
        last.content.push_str(fragment);
        Ok(())
    }

    pub fn replace_last(&mut self, role: Role, content: &str) -> Result<(), TranscriptError> {
        let last = self.last_mut_of(role)?;
        last.content.clear();
        last.content.push_str(content);
        Ok(())
    }

    pub fn tag_last(&mut self, role: Role, agent: &str) -> Result<(), TranscriptError> {
        let last = self.last_mut_of(role)?;
        last.agent = Some(agent.to_string());
        Ok(())
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn last_mut_of(&mut self, role: Role) -> Result<&mut Message, TranscriptError> {
        let last = self.messages.last_mut().ok_or(TranscriptError::Empty)?;
        if last.role != role {
            return Err(TranscriptError::RoleMismatch {
                expected: role.as_str(),
                found: last.role.as_str(),
            });
        }
        Ok(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_insertion_order() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("hello"));
        transcript.push(Message::assistant("hi"));

        let roles: Vec<Role> = transcript.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn append_to_last_grows_content() {
        let mut transcript = Transcript::new();
        transcript.push(Message::assistant(""));
        transcript.append_to_last(Role::Assistant, "a").unwrap();
        transcript.append_to_last(Role::Assistant, "b").unwrap();
        assert_eq!(transcript.last().unwrap().content, "ab");
    }

    #[test]
    fn append_to_last_rejects_role_mismatch() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("hello"));
        let err = transcript.append_to_last(Role::Assistant, "x").unwrap_err();
        assert_eq!(
            err,
            TranscriptError::RoleMismatch {
                expected: "assistant",
                found: "user",
            }
        );
        assert_eq!(transcript.last().unwrap().content, "hello");
    }

    #[test]
    fn append_to_last_rejects_empty_transcript() {
        let mut transcript = Transcript::new();
        let err = transcript.append_to_last(Role::Assistant, "x").unwrap_err();
        assert_eq!(err, TranscriptError::Empty);
    }

    #[test]
    fn replace_last_overwrites_content() {
        let mut transcript = Transcript::new();
        transcript.push(Message::assistant("partial"));
        transcript.replace_last(Role::Assistant, "done").unwrap();
        assert_eq!(transcript.last().unwrap().content, "done");
    }

    #[test]
    fn tag_last_records_agent() {
        let mut transcript = Transcript::new();
        transcript.push(Message::assistant(""));
        transcript.tag_last(Role::Assistant, "strategist").unwrap();
        assert_eq!(
            transcript.last().unwrap().agent.as_deref(),
            Some("strategist")
        );
    }
}
