mod agents;
mod client;
mod events;

pub use agents::{AgentInfo, DEFAULT_AGENTS};
pub use client::{ApiClient, ApiError};
pub use events::{SseBuffer, StreamEvent};
