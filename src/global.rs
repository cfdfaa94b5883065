pub static DEFAULT_AGENT: &str = "strategist";

/// Shown when a stream ends cleanly without ever producing a fragment.
pub static FALLBACK_NOTICE: &str = "No response received. Please try again.";

pub static DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

pub const EVENT_CHANNEL_CAPACITY: usize = 32;
