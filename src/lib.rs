pub mod api;
pub mod chat;
pub mod frontend;
pub mod global;

pub use frontend::start_server;
