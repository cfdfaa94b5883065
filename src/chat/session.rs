use std::fmt;

/// Tags every stream event with the request that produced it, so events from
/// a superseded request can be discarded instead of landing in the wrong
/// assistant message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(u64);

impl SessionId {
    pub(crate) fn new(raw: u64) -> SessionId {
        SessionId(raw)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Lifecycle of the one outstanding request.
///
/// `Sending` begins at submit, `Streaming` on the first fragment. Terminal
/// outcomes (completed or errored) collapse back to `Idle`; the next submit
/// is always accepted afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Sending,
    Streaming,
}
