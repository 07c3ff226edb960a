pub mod http;
pub mod messages;
pub mod server;
pub mod session;

pub use server::GameSession;
