use tracing::{debug, warn};

use super::session::{SessionId, SessionState};
use super::transcript::{Message, Role, Transcript};
use crate::global;

/// Folds streamed response fragments into the transcript.
///
/// One submit appends a user message and an empty assistant placeholder,
/// then every fragment of the response is appended to that placeholder until
/// the stream terminates. At most one session is outstanding at a time;
/// submits while busy are rejected, and events carrying a stale session id
/// are dropped.
#[derive(Debug, Default)]
pub struct Reconciler {
    transcript: Transcript,
    last_id: u64,
    current: Option<SessionId>,
    state: SessionState,
}

impl Reconciler {
    pub fn new() -> Reconciler {
        Reconciler::default()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Accepts a user input and opens a new session.
    ///
    /// Returns `None` without touching the transcript if the input is blank
    /// or a previous request is still in flight.
    pub fn submit(&mut self, text: &str) -> Option<SessionId> {
        if let Some(current) = self.current {
            debug!(%current, "submit rejected, request in flight");
            return None;
        }
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.transcript.push(Message::user(text));
        self.transcript.push(Message::assistant(""));

        self.last_id += 1;
        let session = SessionId::new(self.last_id);
        self.current = Some(session);
        self.state = SessionState::Sending;
        Some(session)
    }

    /// Records which backend agent is answering.
    pub fn on_meta(&mut self, session: SessionId, agent: &str) {
        if !self.is_current(session) {
            return;
        }
        if let Err(err) = self.transcript.tag_last(Role::Assistant, agent) {
            warn!(%session, %err, "no assistant target for agent tag");
        }
    }

    /// Appends one fragment to the pending assistant message. Fragments are
    /// applied in arrival order; the transport is trusted to preserve it.
    pub fn on_fragment(&mut self, session: SessionId, fragment: &str) {
        if !self.is_current(session) {
            return;
        }
        self.state = SessionState::Streaming;
        if let Err(err) = self.transcript.append_to_last(Role::Assistant, fragment) {
            warn!(%session, %err, "dropping fragment, no assistant target");
        }
    }

    /// Terminates the session with a transport error. If nothing was
    /// received yet the placeholder becomes a visible error message; partial
    /// content already streamed is kept as-is.
    pub fn on_error(&mut self, session: SessionId, message: &str) {
        if !self.is_current(session) {
            return;
        }
        if self.pending_is_empty() {
            let text = format!("Error: {}", message);
            if let Err(err) = self.transcript.replace_last(Role::Assistant, &text) {
                warn!(%session, %err, "no assistant target for error");
            }
        } else {
            warn!(%session, error = message, "late stream error, partial response kept");
        }
        self.finish();
    }

    /// Terminates the session normally. A stream that ended without a single
    /// fragment (silent timeout) leaves the fallback notice instead of an
    /// empty bubble.
    pub fn on_complete(&mut self, session: SessionId) {
        if !self.is_current(session) {
            return;
        }
        if self.pending_is_empty() {
            if let Err(err) = self
                .transcript
                .replace_last(Role::Assistant, global::FALLBACK_NOTICE)
            {
                warn!(%session, %err, "no assistant target for fallback notice");
            }
        }
        self.finish();
    }

    fn is_current(&self, session: SessionId) -> bool {
        match self.current {
            Some(current) if current == session => true,
            _ => {
                debug!(%session, "dropping event from stale session");
                false
            }
        }
    }

    fn pending_is_empty(&self) -> bool {
        self.transcript
            .last()
            .map(|m| m.content.is_empty())
            .unwrap_or(true)
    }

    fn finish(&mut self) {
        self.current = None;
        self.state = SessionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(reconciler: &Reconciler) -> Vec<(Role, String)> {
        reconciler
            .transcript()
            .iter()
            .map(|m| (m.role, m.content.clone()))
            .collect()
    }

    #[test]
    fn submit_appends_user_then_placeholder() {
        let mut reconciler = Reconciler::new();
        let session = reconciler.submit("hello");
        assert!(session.is_some());
        assert_eq!(
            contents(&reconciler),
            vec![
                (Role::User, "hello".to_string()),
                (Role::Assistant, String::new()),
            ]
        );
        assert!(reconciler.is_busy());
        assert_eq!(reconciler.state(), SessionState::Sending);
    }

    #[test]
    fn submit_rejects_blank_input() {
        let mut reconciler = Reconciler::new();
        assert!(reconciler.submit("").is_none());
        assert!(reconciler.submit("   \n\t").is_none());
        assert!(reconciler.transcript().is_empty());
        assert!(!reconciler.is_busy());
    }

    #[test]
    fn submit_rejects_while_busy() {
        let mut reconciler = Reconciler::new();
        reconciler.submit("first").unwrap();
        assert!(reconciler.submit("second").is_none());
        // No transcript mutation from the rejected submit.
        assert_eq!(reconciler.transcript().len(), 2);
    }

    #[test]
    fn fragments_concatenate_in_order() {
        let mut reconciler = Reconciler::new();
        let session = reconciler.submit("question").unwrap();
        for fragment in ["one ", "two ", "three"] {
            reconciler.on_fragment(session, fragment);
        }
        assert_eq!(reconciler.state(), SessionState::Streaming);
        reconciler.on_complete(session);
        assert_eq!(
            reconciler.transcript().last().unwrap().content,
            "one two three"
        );
        assert!(!reconciler.is_busy());
    }

    #[test]
    fn complete_without_fragments_leaves_fallback() {
        let mut reconciler = Reconciler::new();
        let session = reconciler.submit("question").unwrap();
        reconciler.on_complete(session);
        assert_eq!(
            reconciler.transcript().last().unwrap().content,
            global::FALLBACK_NOTICE
        );
        assert!(!reconciler.is_busy());
    }

    #[test]
    fn error_before_fragments_becomes_message() {
        let mut reconciler = Reconciler::new();
        let session = reconciler.submit("question").unwrap();
        reconciler.on_error(session, "backend unreachable");
        let last = reconciler.transcript().last().unwrap().content.clone();
        assert!(last.contains("backend unreachable"));
        assert!(!reconciler.is_busy());
    }

    #[test]
    fn error_after_fragments_preserves_partial() {
        let mut reconciler = Reconciler::new();
        let session = reconciler.submit("question").unwrap();
        reconciler.on_fragment(session, "a");
        reconciler.on_fragment(session, "b");
        reconciler.on_error(session, "connection reset");
        assert_eq!(reconciler.transcript().last().unwrap().content, "ab");
        assert!(!reconciler.is_busy());
    }

    #[test]
    fn stale_session_events_are_dropped() {
        let mut reconciler = Reconciler::new();
        let first = reconciler.submit("first").unwrap();
        reconciler.on_complete(first);

        let second = reconciler.submit("second").unwrap();
        reconciler.on_fragment(first, "stale");
        reconciler.on_error(first, "stale error");
        assert!(reconciler.is_busy());
        assert_eq!(reconciler.transcript().last().unwrap().content, "");

        reconciler.on_fragment(second, "fresh");
        reconciler.on_complete(second);
        assert_eq!(reconciler.transcript().last().unwrap().content, "fresh");
    }

    #[test]
    fn terminal_events_are_idempotent() {
        let mut reconciler = Reconciler::new();
        let session = reconciler.submit("question").unwrap();
        reconciler.on_fragment(session, "hi");
        reconciler.on_complete(session);
        // The channel may flush trailing events after the stream ended.
        reconciler.on_complete(session);
        reconciler.on_fragment(session, "late");
        assert_eq!(reconciler.transcript().last().unwrap().content, "hi");
        assert!(!reconciler.is_busy());
    }

    #[test]
    fn meta_tags_responding_agent() {
        let mut reconciler = Reconciler::new();
        let session = reconciler.submit("question").unwrap();
        reconciler.on_meta(session, "quant");
        reconciler.on_fragment(session, "answer");
        reconciler.on_complete(session);
        assert_eq!(
            reconciler.transcript().last().unwrap().agent.as_deref(),
            Some("quant")
        );
    }

    #[test]
    fn end_to_end_hello() {
        let mut reconciler = Reconciler::new();
        let session = reconciler.submit("hello").unwrap();
        reconciler.on_fragment(session, "H");
        reconciler.on_fragment(session, "i");
        reconciler.on_complete(session);

        assert_eq!(
            contents(&reconciler),
            vec![
                (Role::User, "hello".to_string()),
                (Role::Assistant, "Hi".to_string()),
            ]
        );
        assert!(!reconciler.is_busy());
        assert_eq!(reconciler.state(), SessionState::Idle);
    }

    #[test]
    fn submit_accepted_again_after_terminal() {
        let mut reconciler = Reconciler::new();
        let first = reconciler.submit("one").unwrap();
        reconciler.on_error(first, "boom");
        let second = reconciler.submit("two");
        assert!(second.is_some());
        assert_ne!(Some(first), second);
        assert_eq!(reconciler.transcript().len(), 4);
    }
}
