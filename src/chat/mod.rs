mod reconciler;
mod session;
mod transcript;

pub use reconciler::Reconciler;
pub use session::{SessionId, SessionState};
pub use transcript::{Message, Role, Transcript, TranscriptError};
